//! Membership diff of two ordered sequences.
//!
//! Used by child-list reconciliation to find out which children were added or
//! removed between two option assignments. The algorithm is the generic
//! O(n·m) one: the lists involved are small, and a linear scan beats building
//! two temporary hash sets there.

use std::ptr;

/// Result of [`array_diff`].
///
/// Both lists borrow their items from the inputs and keep input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayDiff<'a, T> {
    /// Items of the first sequence missing from the second.
    pub removed: Vec<&'a T>,
    /// Items of the second sequence missing from the first.
    pub added: Vec<&'a T>,
}

impl<'a, T> ArrayDiff<'a, T> {
    fn empty() -> Self {
        Self {
            removed: Vec::new(),
            added: Vec::new(),
        }
    }

    /// Returns true if neither side changed.
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

fn same_slice<T>(a: &[T], b: &[T]) -> bool {
    ptr::eq(a.as_ptr(), b.as_ptr()) && a.len() == b.len()
}

fn non_empty<T>(s: Option<&[T]>) -> Option<&[T]> {
    s.filter(|s| !s.is_empty())
}

/// An item is kept if it sits at the same index in `other`, or anywhere in it.
#[inline]
fn is_kept<T: PartialEq>(item: &T, index: usize, other: &[T]) -> bool {
    other.get(index).is_some_and(|o| o == item) || other.contains(item)
}

/// Calculates the diff between two sequences.
///
/// `removed` holds every item of `a` which is not contained in `b`, `added`
/// every item of `b` which is not contained in `a`. An absent sequence
/// behaves like an empty one.
///
/// # Examples
///
/// ```
/// use aux_util::array_diff::array_diff;
///
/// let a = [1, 2, 3];
/// let b = [1, 3, 4];
/// let diff = array_diff(Some(&a[..]), Some(&b[..]));
/// assert_eq!(diff.removed, vec![&2]);
/// assert_eq!(diff.added, vec![&4]);
/// ```
pub fn array_diff<'a, T: PartialEq>(a: Option<&'a [T]>, b: Option<&'a [T]>) -> ArrayDiff<'a, T> {
    if let (Some(a), Some(b)) = (a, b) {
        if same_slice(a, b) {
            return ArrayDiff::empty();
        }
    }

    let Some(a) = non_empty(a) else {
        return ArrayDiff {
            removed: Vec::new(),
            added: b.map(|b| b.iter().collect()).unwrap_or_default(),
        };
    };

    let Some(b) = non_empty(b) else {
        return ArrayDiff {
            removed: a.iter().collect(),
            added: Vec::new(),
        };
    };

    ArrayDiff {
        removed: a
            .iter()
            .enumerate()
            .filter(|(i, item)| !is_kept(*item, *i, b))
            .map(|(_, item)| item)
            .collect(),
        added: b
            .iter()
            .enumerate()
            .filter(|(i, item)| !is_kept(*item, *i, a))
            .map(|(_, item)| item)
            .collect(),
    }
}

/// Calls `removed(item, index, a)` for every item of `a` missing from `b`,
/// then `added(item, index, b)` for every item of `b` missing from `a`.
///
/// Produces the same items in the same order as [`array_diff`] without
/// allocating the result lists.
///
/// # Examples
///
/// ```
/// use aux_util::array_diff::for_each_array_diff;
///
/// let mut removed = Vec::new();
/// let mut added = Vec::new();
/// for_each_array_diff(
///     Some(&["a", "b"][..]),
///     Some(&["b", "c"][..]),
///     |item, index, _| removed.push((*item, index)),
///     |item, index, _| added.push((*item, index)),
/// );
/// assert_eq!(removed, vec![("a", 0)]);
/// assert_eq!(added, vec![("c", 1)]);
/// ```
pub fn for_each_array_diff<'a, T, R, A>(
    a: Option<&'a [T]>,
    b: Option<&'a [T]>,
    mut removed: R,
    mut added: A,
) where
    T: PartialEq,
    R: FnMut(&'a T, usize, &'a [T]),
    A: FnMut(&'a T, usize, &'a [T]),
{
    if let (Some(a), Some(b)) = (a, b) {
        if same_slice(a, b) {
            return;
        }
    }

    let Some(a) = non_empty(a) else {
        if let Some(b) = b {
            for (i, item) in b.iter().enumerate() {
                added(item, i, b);
            }
        }
        return;
    };

    let Some(b) = non_empty(b) else {
        for (i, item) in a.iter().enumerate() {
            removed(item, i, a);
        }
        return;
    };

    for (i, item) in a.iter().enumerate() {
        if !is_kept(item, i, b) {
            removed(item, i, a);
        }
    }

    for (i, item) in b.iter().enumerate() {
        if !is_kept(item, i, a) {
            added(item, i, b);
        }
    }
}
