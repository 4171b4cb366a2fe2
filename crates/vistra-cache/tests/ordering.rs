//! Property tests for cache ordering and byte-accounting invariants.

use proptest::prelude::*;

use vistra_cache::FrameCache;
use vistra_test_utils::test_frame;

proptest! {
    #[test]
    fn ascending_inserts_iterate_in_insertion_order(
        numbers in prop::collection::btree_set(0u32..10_000, 1..50),
    ) {
        let numbers: Vec<u32> = numbers.into_iter().collect();
        let mut cache = FrameCache::new();
        for &n in &numbers {
            cache.insert(test_frame(n, n as f32, 1)).unwrap();
        }

        let stored: Vec<u32> = cache.iter().map(|f| f.frame_number).collect();
        prop_assert_eq!(&stored, &numbers);
        for &n in &numbers {
            prop_assert_eq!(cache.frame_at_number(n).unwrap().frame_number, n);
        }
    }

    #[test]
    fn total_bytes_always_matches_the_sum_of_frames(
        sizes in prop::collection::vec(1usize..30, 1..30),
    ) {
        let mut cache = FrameCache::new();
        for (n, agents) in sizes.iter().enumerate() {
            cache.insert(test_frame(n as u32, n as f32, *agents)).unwrap();
        }
        let sum: usize = cache.iter().map(|f| f.size).sum();
        prop_assert_eq!(cache.total_bytes(), sum);
    }

    #[test]
    fn eviction_always_keeps_a_suffix(
        count in 2usize..20,
        limit in 1usize..4096,
    ) {
        let mut cache = FrameCache::with_limit(limit);
        for n in 0..count {
            cache.insert(test_frame(n as u32, n as f32, 1)).unwrap();
        }
        cache.evict_if_over_limit();

        // Never empty, and whatever survives is the newest run.
        prop_assert!(!cache.is_empty());
        let first = cache.first_frame_number().unwrap() as usize;
        let stored: Vec<u32> = cache.iter().map(|f| f.frame_number).collect();
        let expected: Vec<u32> = (first..count).map(|n| n as u32).collect();
        prop_assert_eq!(stored, expected);
        prop_assert_eq!(cache.last_frame_number(), Some(count as u32 - 1));
    }
}
