//! Sets of closed integer intervals.
//!
//! An [`Intervals`] value stores a flat list `[s0, e0, s1, e1, ...]` of
//! closed ranges. The list is kept sorted, the ranges are disjoint and there
//! is a gap of at least one between neighbours (`e_i + 1 < s_{i+1}`), so
//! every set has exactly one representation.
//!
//! The level meter renderer uses these sets to compute which pixel ranges
//! changed between two frames: [`diff_intervals`] reports added and removed
//! ranges without materializing a result set. The binary operations are all
//! built on top of the sweep in [`iterate_two_intervals`].

use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;
use thiserror::Error;

/// Errors produced when building or modifying an interval set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntervalError {
    #[error("Argument is not an intervals set: odd length {0}")]
    OddLength(usize),
    #[error("lhs <= rhs violated: [{lo}, {hi}]")]
    InvertedRange { lo: i64, hi: i64 },
    #[error("Intervals not sorted or not merged at index {index}")]
    Malformed { index: usize },
}

/// Membership of a sub-range produced by [`iterate_two_intervals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum IntervalMask {
    /// In neither set.
    Neither = 0,
    /// Only in the first set.
    OnlyFirst = 1,
    /// Only in the second set.
    OnlySecond = 2,
    /// In both sets.
    Both = 3,
}

impl IntervalMask {
    fn from_membership(in_first: bool, in_second: bool) -> Self {
        match (in_first, in_second) {
            (false, false) => IntervalMask::Neither,
            (true, false) => IntervalMask::OnlyFirst,
            (false, true) => IntervalMask::OnlySecond,
            (true, true) => IntervalMask::Both,
        }
    }

    /// The numeric mask: bit 0 for the first set, bit 1 for the second.
    pub fn bits(self) -> u8 {
        self as u8
    }
}

/// A set of closed integer intervals.
///
/// # Examples
///
/// ```
/// use aux_util::intervals::Intervals;
///
/// let mut set = Intervals::new();
/// set.add_interval(0, 5).unwrap();
/// set.add_interval(10, 20).unwrap();
/// assert_eq!(set.as_slice(), &[0, 5, 10, 20]);
///
/// set.add_interval(5, 10).unwrap();
/// assert_eq!(set.as_slice(), &[0, 20]);
///
/// set.invert(-5, 25);
/// assert_eq!(set.as_slice(), &[-5, -1, 21, 25]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct Intervals {
    bounds: Vec<i64>,
}

impl Intervals {
    /// The empty set.
    pub fn new() -> Self {
        Self { bounds: Vec::new() }
    }

    /// Builds a set from its flat representation.
    ///
    /// # Errors
    ///
    /// Fails if `bounds` has odd length, contains an inverted range, or is
    /// not sorted and maximally merged.
    pub fn from_bounds(bounds: Vec<i64>) -> Result<Self, IntervalError> {
        let set = Self { bounds };
        if let Err(err) = set.check_invariants() {
            #[cfg(feature = "tracing")]
            tracing::debug!(message = "intervals.rejected", error = %err);
            return Err(err);
        }
        Ok(set)
    }

    /// Verifies the representation invariant.
    pub fn check_invariants(&self) -> Result<(), IntervalError> {
        let b = &self.bounds;
        if b.len() & 1 != 0 {
            return Err(IntervalError::OddLength(b.len()));
        }
        for i in (0..b.len()).step_by(2) {
            if b[i] > b[i + 1] {
                return Err(IntervalError::InvertedRange {
                    lo: b[i],
                    hi: b[i + 1],
                });
            }
            if i >= 2 && b[i - 1].saturating_add(1) >= b[i] {
                return Err(IntervalError::Malformed { index: i });
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Number of ranges in the set.
    pub fn len(&self) -> usize {
        self.bounds.len() / 2
    }

    pub fn clear(&mut self) {
        self.bounds.clear();
    }

    /// The flat `[lo, hi, lo, hi, ...]` representation.
    pub fn as_slice(&self) -> &[i64] {
        &self.bounds
    }

    pub fn into_bounds(self) -> Vec<i64> {
        self.bounds
    }

    /// Iterates over the ranges as `(lo, hi)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.bounds.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }

    /// Returns true if `point` lies inside one of the ranges.
    pub fn contains(&self, point: i64) -> bool {
        let ranges = self.len();
        let (mut lo, mut hi) = (0, ranges);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let (start, end) = (self.bounds[2 * mid], self.bounds[2 * mid + 1]);
            if point < start {
                hi = mid;
            } else if point > end {
                lo = mid + 1;
            } else {
                return true;
            }
        }
        false
    }

    /// Adds the closed interval `[lo, hi]`, merging it with overlapping and
    /// adjacent ranges.
    ///
    /// # Errors
    ///
    /// Returns [`IntervalError::InvertedRange`] if `lo > hi`; the set is left
    /// untouched in that case.
    pub fn add_interval(&mut self, lo: i64, hi: i64) -> Result<&mut Self, IntervalError> {
        if lo > hi {
            return Err(IntervalError::InvertedRange { lo, hi });
        }
        self.insert(lo, hi);
        Ok(self)
    }

    fn insert(&mut self, lo: i64, hi: i64) {
        let b = &mut self.bounds;
        let mut i = 0;

        while i < b.len() {
            let (start, end) = (b[i], b[i + 1]);

            // lo comes after this range with a gap of at least one
            if lo > end.saturating_add(1) {
                i += 2;
                continue;
            }

            // hi comes before this range with a gap of at least one
            if hi.saturating_add(1) < start {
                b.insert(i, hi);
                b.insert(i, lo);
                return;
            }

            b[i] = start.min(lo);
            if hi <= end {
                return;
            }

            // absorb following ranges which overlap or touch [.., hi]
            let mut new_end = hi;
            let mut j = i + 2;
            while j < b.len() && b[j] <= new_end.saturating_add(1) {
                new_end = new_end.max(b[j + 1]);
                j += 2;
            }
            b[i + 1] = new_end;
            b.drain(i + 2..j);
            return;
        }

        b.extend([lo, hi]);
    }

    /// Adds every range of `other`.
    pub fn add_intervals(&mut self, other: &Intervals) -> &mut Self {
        for (lo, hi) in other.iter() {
            self.insert(lo, hi);
        }
        self
    }

    /// Replaces the set with its complement within `[min, max]`.
    ///
    /// Ranges outside of the window are dropped. Inverting twice with the same
    /// bounds restores a set which lies within the window.
    pub fn invert(&mut self, min: i64, max: i64) -> &mut Self {
        let mut inverted = Vec::with_capacity(self.bounds.len() + 2);

        if min <= max {
            // next candidate point not covered by the set
            let mut next = Some(min);

            for (lo, hi) in self.iter() {
                if hi < min {
                    continue;
                }
                if lo > max {
                    break;
                }
                if let Some(start) = next {
                    if start < lo {
                        inverted.extend([start, lo - 1]);
                    }
                }
                next = hi.checked_add(1);
                if next.is_none() {
                    break;
                }
            }

            if let Some(start) = next {
                if start <= max {
                    inverted.extend([start, max]);
                }
            }
        }

        self.bounds = inverted;
        self
    }
}

impl TryFrom<Vec<i64>> for Intervals {
    type Error = IntervalError;

    fn try_from(bounds: Vec<i64>) -> Result<Self, Self::Error> {
        Intervals::from_bounds(bounds)
    }
}

impl From<Intervals> for Vec<i64> {
    fn from(set: Intervals) -> Self {
        set.bounds
    }
}

/// Returns the membership of `pos` in the range at `index` together with the
/// last point (capped at `max`) for which that membership holds.
fn segment(bounds: &[i64], index: usize, pos: i64, max: i64) -> (bool, i64) {
    match bounds.get(index..index + 2) {
        Some(&[lo, hi]) if lo <= pos => (true, hi.min(max)),
        // lo > pos, so lo - 1 cannot underflow
        Some(&[lo, _]) => (false, (lo - 1).min(max)),
        _ => (false, max),
    }
}

/// Walks two interval sets in lockstep over `[min, max]`.
///
/// `callback(lo, hi, mask)` is called for every maximal sub-range of the
/// window in which membership in `a` and `b` does not change. The sub-ranges
/// are reported in ascending order and together cover the whole window.
/// Returning [`ControlFlow::Break`] from the callback stops the walk, in which
/// case `Break` is returned.
///
/// # Examples
///
/// ```
/// use std::ops::ControlFlow;
/// use aux_util::intervals::{iterate_two_intervals, IntervalMask, Intervals};
///
/// let a = Intervals::from_bounds(vec![0, 4]).unwrap();
/// let b = Intervals::from_bounds(vec![3, 6]).unwrap();
/// let mut seen = Vec::new();
/// iterate_two_intervals(&a, &b, 0, 8, |lo, hi, mask| {
///     seen.push((lo, hi, mask));
///     ControlFlow::Continue(())
/// });
/// assert_eq!(seen, vec![
///     (0, 2, IntervalMask::OnlyFirst),
///     (3, 4, IntervalMask::Both),
///     (5, 6, IntervalMask::OnlySecond),
///     (7, 8, IntervalMask::Neither),
/// ]);
/// ```
pub fn iterate_two_intervals<F>(
    a: &Intervals,
    b: &Intervals,
    min: i64,
    max: i64,
    mut callback: F,
) -> ControlFlow<()>
where
    F: FnMut(i64, i64, IntervalMask) -> ControlFlow<()>,
{
    let (a, b) = (a.as_slice(), b.as_slice());
    let (mut ia, mut ib) = (0, 0);
    let mut pos = min;

    while pos <= max {
        while ia < a.len() && a[ia + 1] < pos {
            ia += 2;
        }
        while ib < b.len() && b[ib + 1] < pos {
            ib += 2;
        }

        let (in_a, end_a) = segment(a, ia, pos, max);
        let (in_b, end_b) = segment(b, ib, pos, max);
        let end = end_a.min(end_b);

        if callback(pos, end, IntervalMask::from_membership(in_a, in_b)).is_break() {
            return ControlFlow::Break(());
        }

        match end.checked_add(1) {
            Some(next) => pos = next,
            None => break,
        }
    }

    ControlFlow::Continue(())
}

/// Calls `callback(lo, hi)` for each range, starting at range number
/// `start_index`.
pub fn for_each_interval<F>(set: &Intervals, start_index: usize, mut callback: F)
where
    F: FnMut(i64, i64),
{
    for (lo, hi) in set.iter().skip(start_index) {
        callback(lo, hi);
    }
}

/// Reports the difference between two interval sets.
///
/// `add(lo, hi)` is called for every range contained in `current` but not in
/// `prev`, `remove(lo, hi)` for every range contained in `prev` but not in
/// `current`. Both are called in ascending order, interleaved. Returning
/// [`ControlFlow::Break`] from either callback stops the walk and is passed
/// back to the caller.
///
/// # Examples
///
/// ```
/// use std::ops::ControlFlow;
/// use aux_util::intervals::{diff_intervals, Intervals};
///
/// let prev = Intervals::from_bounds(vec![1, 12]).unwrap();
/// let current = Intervals::from_bounds(vec![2, 3, 10, 14]).unwrap();
/// let mut added = Vec::new();
/// let mut removed = Vec::new();
/// let flow = diff_intervals(
///     &prev,
///     &current,
///     |lo, hi| {
///         added.push((lo, hi));
///         ControlFlow::Continue(())
///     },
///     |lo, hi| {
///         removed.push((lo, hi));
///         ControlFlow::Continue(())
///     },
/// );
/// assert!(flow.is_continue());
/// assert_eq!(added, vec![(13, 14)]);
/// assert_eq!(removed, vec![(1, 1), (4, 9)]);
/// ```
pub fn diff_intervals<A, R>(
    prev: &Intervals,
    current: &Intervals,
    mut add: A,
    mut remove: R,
) -> ControlFlow<()>
where
    A: FnMut(i64, i64) -> ControlFlow<()>,
    R: FnMut(i64, i64) -> ControlFlow<()>,
{
    if prev.is_empty() {
        return current.iter().try_for_each(|(lo, hi)| add(lo, hi));
    }
    if current.is_empty() {
        return prev.iter().try_for_each(|(lo, hi)| remove(lo, hi));
    }

    let (min, max) = span(prev, current);
    iterate_two_intervals(prev, current, min, max, |lo, hi, mask| match mask {
        IntervalMask::OnlyFirst => remove(lo, hi),
        IntervalMask::OnlySecond => add(lo, hi),
        IntervalMask::Neither | IntervalMask::Both => ControlFlow::Continue(()),
    })
}

/// Smallest window containing both non-empty sets.
fn span(a: &Intervals, b: &Intervals) -> (i64, i64) {
    let (a, b) = (a.as_slice(), b.as_slice());
    (a[0].min(b[0]), a[a.len() - 1].max(b[b.len() - 1]))
}

/// Returns the intersection of two interval sets.
pub fn intersect_intervals(a: &Intervals, b: &Intervals) -> Intervals {
    let mut intersection = Intervals::new();

    if !a.is_empty() && !b.is_empty() {
        let (min, max) = span(a, b);
        let _ = iterate_two_intervals(a, b, min, max, |lo, hi, mask| {
            // Both segments are always separated by another segment, so
            // pushing keeps the set merged.
            if mask == IntervalMask::Both {
                intersection.bounds.extend([lo, hi]);
            }
            ControlFlow::Continue(())
        });
    }

    intersection
}

/// Returns the union of two interval sets.
pub fn union_intervals(a: &Intervals, b: &Intervals) -> Intervals {
    let mut union = a.clone();
    union.add_intervals(b);
    union
}
