//! aux-util - Redraw-optimization utilities for AUX
//!
//! Small, self-contained data structures used by the widget toolkit to avoid
//! redundant work between renders: membership diffs of child lists, option
//! map comparison and merging, interval sets for meter repaint ranges and
//! bitsets for pending invalidations.

pub mod array_diff;
pub mod bitset;
pub mod fuzzer;
pub mod intervals;
pub mod objects;

// Re-exports for convenience
pub use array_diff::{array_diff, for_each_array_diff, ArrayDiff};
pub use bitset::{get_bit_index, get_first_bit, get_limb_mask, BitList, Bitset, LIMB_BITS};
pub use fuzzer::Fuzzer;
pub use intervals::{
    diff_intervals, for_each_interval, intersect_intervals, iterate_two_intervals,
    union_intervals, IntervalError, IntervalMask, Intervals,
};
pub use objects::{compare_objects, merge_objects, object_shadows, strict_equal, ObjectError};
