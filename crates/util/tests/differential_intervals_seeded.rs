use std::collections::BTreeSet;
use std::ops::ControlFlow;

use aux_util::bitset::{BitList, Bitset};
use aux_util::fuzzer::Fuzzer;
use aux_util::intervals::{diff_intervals, intersect_intervals, union_intervals, Intervals};

const SEEDS: [u64; 6] = [1, 2, 3, 42, 1337, 0xdead_beef];

fn model_points(ranges: &[(i64, i64)]) -> BTreeSet<i64> {
    ranges.iter().flat_map(|&(lo, hi)| lo..=hi).collect()
}

fn model_to_bounds(points: &BTreeSet<i64>) -> Vec<i64> {
    let mut bounds: Vec<i64> = Vec::new();
    for &p in points {
        match bounds.last_mut() {
            Some(hi) if *hi + 1 == p => *hi = p,
            _ => bounds.extend([p, p]),
        }
    }
    bounds
}

fn build(ranges: &[(i64, i64)]) -> Intervals {
    let mut set = Intervals::new();
    for &(lo, hi) in ranges {
        set.add_interval(lo, hi).expect("fuzzer ranges are valid");
    }
    set
}

#[test]
fn differential_intervals_seeded_matches_point_model() {
    for seed in SEEDS {
        let mut fuzzer = Fuzzer::from_u64(seed);
        for case in 0..200 {
            let count_a = fuzzer.random_index(10);
            let count_b = fuzzer.random_index(10);
            let ranges_a = fuzzer.random_ranges(count_a, -100, 100, 15);
            let ranges_b = fuzzer.random_ranges(count_b, -100, 100, 15);

            let a = build(&ranges_a);
            let b = build(&ranges_b);
            let pa = model_points(&ranges_a);
            let pb = model_points(&ranges_b);

            assert_eq!(a.as_slice(), model_to_bounds(&pa), "seed {seed} case {case}");

            let union: BTreeSet<i64> = pa.union(&pb).copied().collect();
            let inter: BTreeSet<i64> = pa.intersection(&pb).copied().collect();
            assert_eq!(union_intervals(&a, &b).as_slice(), model_to_bounds(&union));
            assert_eq!(intersect_intervals(&a, &b).as_slice(), model_to_bounds(&inter));

            let mut added = BTreeSet::new();
            let mut removed = BTreeSet::new();
            let _ = diff_intervals(
                &a,
                &b,
                |lo, hi| {
                    added.extend(lo..=hi);
                    ControlFlow::Continue(())
                },
                |lo, hi| {
                    removed.extend(lo..=hi);
                    ControlFlow::Continue(())
                },
            );
            let expected_added: BTreeSet<i64> = pb.difference(&pa).copied().collect();
            let expected_removed: BTreeSet<i64> = pa.difference(&pb).copied().collect();
            assert_eq!(added, expected_added, "seed {seed} case {case}");
            assert_eq!(removed, expected_removed, "seed {seed} case {case}");

            let mut inverted = a.clone();
            inverted.invert(-120, 120);
            let complement: BTreeSet<i64> = (-120..=120).filter(|p| !pa.contains(p)).collect();
            assert_eq!(inverted.as_slice(), model_to_bounds(&complement));
        }
    }
}

#[test]
fn differential_bitset_seeded_matches_set_model() {
    for seed in SEEDS {
        let mut fuzzer = Fuzzer::from_u64(seed);
        for _ in 0..100 {
            let count = fuzzer.random_index(40);
            let indices = fuzzer.random_indices(count, 300);
            let model: BTreeSet<usize> = indices.iter().copied().collect();

            let mut set = Bitset::new(300);
            for &i in &indices {
                set.set_bit(i);
            }
            assert_eq!(set.ones().collect::<BTreeSet<_>>(), model);

            let mut via_list = Bitset::new(300);
            via_list.set_bit_list(&BitList::new(&indices));
            assert_eq!(via_list, set);

            let queried = fuzzer.random_indices(4, 300);
            let list = BitList::new(&queried);
            assert_eq!(set.test_bit_list(&list), queried.iter().all(|i| model.contains(i)));
            assert_eq!(set.test_any_bit_list(&list), queried.iter().any(|i| model.contains(i)));

            let victim = *fuzzer.pick(&[0usize, 31, 32, 299]);
            set.clear_bit(victim);
            assert!(!set.test_bit(victim));
        }
    }
}

#[test]
fn differential_array_diff_seeded_matches_filter_model() {
    use aux_util::array_diff::array_diff;

    for seed in SEEDS {
        let mut fuzzer = Fuzzer::from_u64(seed);
        for _ in 0..100 {
            let len_a = fuzzer.random_index(12);
            let len_b = fuzzer.random_index(12);
            let a = fuzzer.random_sequence(len_a, 8);
            let b = fuzzer.random_sequence(len_b, 8);
            let diff = array_diff(Some(&a[..]), Some(&b[..]));
            let removed: Vec<i64> = diff.removed.into_iter().copied().collect();
            let added: Vec<i64> = diff.added.into_iter().copied().collect();
            let expected_removed: Vec<i64> = a.iter().copied().filter(|x| !b.contains(x)).collect();
            let expected_added: Vec<i64> = b.iter().copied().filter(|x| !a.contains(x)).collect();
            assert_eq!(removed, expected_removed);
            assert_eq!(added, expected_added);
        }
    }
}
