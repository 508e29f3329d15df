//! Property-based tests for interval sets.

use std::collections::BTreeSet;
use std::ops::ControlFlow;

use aux_util::intervals::{
    diff_intervals, intersect_intervals, iterate_two_intervals, union_intervals, IntervalMask,
    Intervals,
};
use proptest::prelude::*;

const MIN: i64 = -64;
const MAX: i64 = 64;

fn arbitrary_ranges() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((MIN..=MAX, 0i64..12), 0..12).prop_map(|ranges| {
        ranges
            .into_iter()
            .map(|(lo, len)| (lo, (lo + len).min(MAX)))
            .collect()
    })
}

fn build(ranges: &[(i64, i64)]) -> Intervals {
    let mut set = Intervals::new();
    for &(lo, hi) in ranges {
        set.add_interval(lo, hi).expect("generated ranges are valid");
    }
    set
}

fn points(set: &Intervals) -> BTreeSet<i64> {
    set.iter().flat_map(|(lo, hi)| lo..=hi).collect()
}

proptest! {
    #[test]
    fn add_interval_keeps_invariants(ranges in arbitrary_ranges()) {
        let mut set = Intervals::new();
        for &(lo, hi) in &ranges {
            set.add_interval(lo, hi).expect("valid");
            prop_assert!(set.check_invariants().is_ok(), "{:?}", set);
        }
    }

    #[test]
    fn add_interval_is_order_independent(ranges in arbitrary_ranges()) {
        let forward = build(&ranges);
        let mut reversed_ranges = ranges.clone();
        reversed_ranges.reverse();
        let reversed = build(&reversed_ranges);
        prop_assert_eq!(forward, reversed);
    }

    #[test]
    fn add_interval_covers_exactly_the_added_points(ranges in arbitrary_ranges()) {
        let set = build(&ranges);
        let expected: BTreeSet<i64> = ranges.iter().flat_map(|&(lo, hi)| lo..=hi).collect();
        prop_assert_eq!(points(&set), expected);
    }

    #[test]
    fn invert_twice_is_identity(ranges in arbitrary_ranges()) {
        let set = build(&ranges);
        let mut twice = set.clone();
        twice.invert(MIN, MAX).invert(MIN, MAX);
        prop_assert_eq!(twice, set);
    }

    #[test]
    fn invert_is_complement(ranges in arbitrary_ranges()) {
        let set = build(&ranges);
        let mut inverted = set.clone();
        inverted.invert(MIN, MAX);
        prop_assert!(inverted.check_invariants().is_ok());
        for p in MIN..=MAX {
            prop_assert_ne!(set.contains(p), inverted.contains(p));
        }
    }

    #[test]
    fn union_via_diff_matches_union(a in arbitrary_ranges(), b in arbitrary_ranges()) {
        let a = build(&a);
        let b = build(&b);
        let mut union = a.clone();
        let flow = diff_intervals(
            &a,
            &b,
            |lo, hi| {
                union.add_interval(lo, hi).expect("valid");
                ControlFlow::Continue(())
            },
            |_, _| ControlFlow::Continue(()),
        );
        prop_assert!(flow.is_continue());
        prop_assert_eq!(union, union_intervals(&a, &b));
    }

    #[test]
    fn intersection_matches_point_sets(a in arbitrary_ranges(), b in arbitrary_ranges()) {
        let a = build(&a);
        let b = build(&b);
        let intersection = intersect_intervals(&a, &b);
        prop_assert!(intersection.check_invariants().is_ok());
        let expected: BTreeSet<i64> = points(&a).intersection(&points(&b)).copied().collect();
        prop_assert_eq!(points(&intersection), expected);
    }

    #[test]
    fn sweep_partitions_the_window(a in arbitrary_ranges(), b in arbitrary_ranges()) {
        let a = build(&a);
        let b = build(&b);
        let mut next = MIN;
        let mut last_mask = None;
        let _ = iterate_two_intervals(&a, &b, MIN, MAX, |lo, hi, mask| {
            assert_eq!(lo, next);
            assert!(lo <= hi);
            assert_ne!(Some(mask), last_mask);
            for p in [lo, hi] {
                let expected = match (a.contains(p), b.contains(p)) {
                    (false, false) => IntervalMask::Neither,
                    (true, false) => IntervalMask::OnlyFirst,
                    (false, true) => IntervalMask::OnlySecond,
                    (true, true) => IntervalMask::Both,
                };
                assert_eq!(mask, expected);
            }
            next = hi + 1;
            last_mask = Some(mask);
            ControlFlow::Continue(())
        });
        prop_assert_eq!(next, MAX + 1);
    }
}
