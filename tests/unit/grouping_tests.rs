/*!
 * Tests for word grouping
 */

use srtscribe::grouping::{partition, GroupingConfig};

fn sizes(n: usize, min_size: usize, max_size: usize) -> Vec<usize> {
    let items: Vec<usize> = (0..n).collect();
    partition(&items, min_size, max_size).iter().map(|g| g.len()).collect()
}

#[test]
fn test_partition_withDefaultBounds_shouldMatchKnownSplits() {
    assert_eq!(sizes(0, 4, 6), Vec::<usize>::new());
    assert_eq!(sizes(1, 4, 6), vec![1]);
    assert_eq!(sizes(3, 4, 6), vec![3]);
    assert_eq!(sizes(6, 4, 6), vec![6]);
    assert_eq!(sizes(7, 4, 6), vec![4, 3]);
    assert_eq!(sizes(9, 4, 6), vec![5, 4]);
    assert_eq!(sizes(10, 4, 6), vec![6, 4]);
    assert_eq!(sizes(12, 4, 6), vec![6, 6]);
    assert_eq!(sizes(13, 4, 6), vec![6, 4, 3]);
    assert_eq!(sizes(20, 4, 6), vec![6, 6, 4, 4]);
}

#[test]
fn test_partition_shouldPreserveSequenceExactly() {
    for n in 0..60 {
        let items: Vec<usize> = (0..n).collect();
        let groups = partition(&items, 4, 6);
        let rejoined: Vec<usize> = groups.iter().flat_map(|g| g.iter().copied()).collect();
        assert_eq!(rejoined, items, "sequence changed for n = {}", n);
    }
}

#[test]
fn test_partition_shouldNeverYieldEmptyGroups() {
    for (min_size, max_size) in [(1, 1), (2, 3), (4, 6), (5, 5), (3, 10)] {
        for n in 0..50 {
            let items: Vec<usize> = (0..n).collect();
            assert!(partition(&items, min_size, max_size).iter().all(|g| !g.is_empty()));
        }
    }
}

#[test]
fn test_partition_withDefaultBounds_shouldKeepAllButLastGroupInRange() {
    for n in 1..80 {
        let groups = sizes(n, 4, 6);
        let (last, leading) = groups.split_last().unwrap();
        assert!(leading.iter().all(|&size| (4..=6).contains(&size)), "n = {}: {:?}", n, groups);
        assert!(*last >= 1 && *last <= 6);
        if n < 4 {
            assert_eq!(groups, vec![n]);
        }
    }
}

#[test]
fn test_partition_withDegenerateBounds_shouldClamp() {
    assert_eq!(sizes(3, 0, 0), vec![1, 1, 1]);
    assert_eq!(sizes(5, 9, 2), vec![2, 2, 1]);
}

#[test]
fn test_groupingConfig_default_shouldBeFourToSix() {
    let config = GroupingConfig::default();
    assert_eq!(config.min_words, 4);
    assert_eq!(config.max_words, 6);
}

#[test]
fn test_groupingConfig_new_withInvertedBounds_shouldFail() {
    assert!(GroupingConfig::new(6, 4).is_err());
    assert!(GroupingConfig::new(0, 4).is_err());
    assert!(GroupingConfig::new(2, 2).is_ok());
}

#[test]
fn test_groupingConfig_partition_shouldUseConfiguredBounds() {
    let config = GroupingConfig::new(2, 3).unwrap();
    let items: Vec<u8> = (0..7).collect();
    let groups: Vec<usize> = config.partition(&items).iter().map(|g| g.len()).collect();
    assert_eq!(groups, vec![3, 2, 2]);
}
