//! Bitsets over 32-bit limbs.
//!
//! The redraw scheduler keeps one bit per widget to track pending
//! invalidations. Bit `n` lives in limb `n >> 5`; inside a limb bits are
//! stored MSB first, so offset 0 is `1 << 31`. With that layout
//! [`get_first_bit`] is a single `leading_zeros` and scanning limbs in order
//! yields bit indices in ascending order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of bits per limb.
pub const LIMB_BITS: usize = 32;

const LIMB_SHIFT: usize = 5;
const LIMB_OFFSET_MASK: usize = LIMB_BITS - 1;

/// Returns the offset of the lowest set bit within `limb`, or [`LIMB_BITS`]
/// for a zero limb.
#[inline]
pub fn get_first_bit(limb: u32) -> u32 {
    limb.leading_zeros()
}

/// Returns the mask selecting `offset` within a limb.
#[inline]
pub fn get_limb_mask(offset: u32) -> u32 {
    1 << (31 - (offset & 31))
}

/// Maps a limb number and an offset within that limb to a bit index.
#[inline]
pub fn get_bit_index(limb_index: usize, offset: u32) -> usize {
    (limb_index << LIMB_SHIFT) + offset as usize
}

#[inline]
fn locate(n: usize) -> (usize, u32) {
    (n >> LIMB_SHIFT, get_limb_mask((n & LIMB_OFFSET_MASK) as u32))
}

/// A vector of bit flags.
///
/// Bits beyond the allocated limbs read as unset. [`Bitset::set_bit`] and
/// [`Bitset::set_bit_list`] grow the storage when needed.
///
/// # Examples
///
/// ```
/// use aux_util::bitset::Bitset;
///
/// let mut set = Bitset::new(44);
/// set.set_bit(3).set_bit(40);
/// assert!(set.test_bit(40));
/// assert!(!set.test_bit(41));
/// assert_eq!(set.ones().collect::<Vec<_>>(), vec![3, 40]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bitset {
    limbs: Vec<u32>,
}

impl Bitset {
    /// Allocates a zeroed bitset for `n` bits, rounded up to whole limbs.
    pub fn new(n: usize) -> Self {
        Self {
            limbs: vec![0; n.div_ceil(LIMB_BITS)],
        }
    }

    /// Number of bits the current storage can hold.
    pub fn capacity(&self) -> usize {
        self.limbs.len() * LIMB_BITS
    }

    pub fn limbs(&self) -> &[u32] {
        &self.limbs
    }

    pub fn is_empty(&self) -> bool {
        self.limbs.iter().all(|&limb| limb == 0)
    }

    /// Clears all bits, keeping the storage.
    pub fn clear(&mut self) {
        self.limbs.fill(0);
    }

    fn limb_mut(&mut self, index: usize) -> &mut u32 {
        if index >= self.limbs.len() {
            self.limbs.resize(index + 1, 0);
        }
        &mut self.limbs[index]
    }

    /// Sets bit `n`.
    ///
    /// Storage grows to the limb holding `n` when `n` lies past
    /// [`capacity`](Self::capacity); bits within the capacity never allocate.
    ///
    /// # Panics
    ///
    /// Growing allocates `n / 32 + 1` limbs, so an `n` whose limb count does
    /// not fit in memory aborts on allocation failure.
    pub fn set_bit(&mut self, n: usize) -> &mut Self {
        let (index, mask) = locate(n);
        *self.limb_mut(index) |= mask;
        self
    }

    pub fn clear_bit(&mut self, n: usize) -> &mut Self {
        let (index, mask) = locate(n);
        if let Some(limb) = self.limbs.get_mut(index) {
            *limb &= !mask;
        }
        self
    }

    pub fn test_bit(&self, n: usize) -> bool {
        let (index, mask) = locate(n);
        self.limbs.get(index).is_some_and(|limb| limb & mask != 0)
    }

    /// Returns true if every bit of `list` is set.
    pub fn test_bit_list(&self, list: &BitList) -> bool {
        list.entries.iter().all(|&(index, mask)| {
            self.limbs
                .get(index)
                .is_some_and(|limb| limb & mask == mask)
        })
    }

    /// Returns true if at least one bit of `list` is set.
    pub fn test_any_bit_list(&self, list: &BitList) -> bool {
        list.entries
            .iter()
            .any(|&(index, mask)| self.limbs.get(index).is_some_and(|limb| limb & mask != 0))
    }

    /// Sets every bit of `list`, growing storage like [`set_bit`](Self::set_bit).
    ///
    /// # Panics
    ///
    /// Same as [`set_bit`](Self::set_bit) for the highest listed bit.
    pub fn set_bit_list(&mut self, list: &BitList) -> &mut Self {
        for &(index, mask) in &list.entries {
            *self.limb_mut(index) |= mask;
        }
        self
    }

    /// Iterates over the indices of all set bits in ascending order.
    ///
    /// Runs in time proportional to the number of limbs plus the number of
    /// set bits.
    pub fn ones(&self) -> Ones<'_> {
        Ones {
            limbs: &self.limbs,
            index: 0,
            current: self.limbs.first().copied().unwrap_or(0),
        }
    }
}

impl fmt::Display for Bitset {
    /// Comma separated limb values.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, limb) in self.limbs.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{limb}")?;
        }
        Ok(())
    }
}

/// Iterator returned by [`Bitset::ones`].
#[derive(Debug, Clone)]
pub struct Ones<'a> {
    limbs: &'a [u32],
    index: usize,
    current: u32,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.current == 0 {
            self.index += 1;
            self.current = *self.limbs.get(self.index)?;
        }
        let bit = get_first_bit(self.current);
        self.current &= !get_limb_mask(bit);
        Some(get_bit_index(self.index, bit))
    }
}

/// A fixed set of bit indices, grouped by limb.
///
/// Testing or setting a bit list touches every limb once instead of once per
/// bit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitList {
    entries: Vec<(usize, u32)>,
}

impl BitList {
    /// Precomputes the `(limb index, mask)` pairs for `indices`.
    ///
    /// # Examples
    ///
    /// ```
    /// use aux_util::bitset::{BitList, Bitset};
    ///
    /// let list = BitList::new(&[3, 5, 33]);
    /// assert_eq!(list.entries(), &[(0, (1 << 28) | (1 << 26)), (1, 1 << 30)]);
    ///
    /// let mut set = Bitset::new(64);
    /// set.set_bit(3).set_bit(5);
    /// assert!(!set.test_bit_list(&list));
    /// assert!(set.test_any_bit_list(&list));
    /// ```
    pub fn new(indices: &[usize]) -> Self {
        let mut set = Bitset::default();
        for &n in indices {
            set.set_bit(n);
        }

        let entries: Vec<(usize, u32)> = set
            .limbs
            .iter()
            .enumerate()
            .filter(|(_, &limb)| limb != 0)
            .map(|(index, &limb)| (index, limb))
            .collect();

        #[cfg(feature = "tracing")]
        tracing::trace!(
            message = "bitlist.create",
            bits = indices.len(),
            limbs = entries.len()
        );

        Self { entries }
    }

    pub fn entries(&self) -> &[(usize, u32)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
