//! Edge case tests for microagg.
//!
//! Tests unusual inputs and boundary conditions that could cause failures.

use microagg::data::{Attribute, Dataset, NumericKind};
use microagg::replace::{CentroidSubstitution, GroupPermutation, GroupReplacer, HybridSynthesis};
use microagg::{sse_distance, Mdav, Partition, SdcError};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn column(values: &[f64]) -> Dataset {
    Dataset::from_rows(
        vec![Attribute::quasi_identifier("x")],
        values.iter().map(|&v| vec![v]),
    )
    .unwrap()
}

// =============================================================================
// Group size boundaries
// =============================================================================

#[test]
fn exactly_k_records() {
    let ds = column(&[4.0, 8.0, 15.0]);
    let p = Mdav::new(3).unwrap().partition(&ds).unwrap();
    assert_eq!(p.num_groups(), 1);
    assert_eq!(p.group_size(0), 3);
}

#[test]
fn exactly_two_k_records() {
    // n = 2k triggers the half iteration: one group around the farthest record,
    // the rest as a second group.
    let ds = column(&[1.0, 2.0, 3.0, 4.0]);
    let p = Mdav::new(2).unwrap().partition(&ds).unwrap();
    assert_eq!(p.num_groups(), 2);
    assert!(p.groups().iter().all(|g| g.len() == 2));
}

#[test]
fn seven_records_split_three_and_four() {
    let ds = column(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    let p = Mdav::new(3).unwrap().partition(&ds).unwrap();
    let mut sizes: Vec<usize> = p.groups().iter().map(Vec::len).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![3, 4]);
}

#[test]
fn large_k_relative_to_n() {
    let values: Vec<f64> = (1..=19u8).map(f64::from).collect();
    let ds = column(&values);
    let p = Mdav::new(10).unwrap().partition(&ds).unwrap();
    assert_eq!(p.num_groups(), 1);
    assert_eq!(p.group_size(0), 19);
}

#[test]
fn k_below_two_is_rejected() {
    assert!(matches!(Mdav::new(0), Err(SdcError::InvalidK { k: 0 })));
    assert!(matches!(Mdav::new(1), Err(SdcError::InvalidK { k: 1 })));
}

// =============================================================================
// Degenerate values
// =============================================================================

#[test]
fn all_records_identical() {
    let ds = column(&[3.0; 9]);
    let p = Mdav::new(3).unwrap().partition(&ds).unwrap();
    assert!(p.is_well_formed());
    assert_eq!(p.num_groups(), 3);

    let out = CentroidSubstitution::new().replace(&ds, &p).unwrap();
    assert_eq!(out.column(0), vec![3.0; 9]);
}

#[test]
fn zero_variance_attribute_contributes_nothing() {
    let d = sse_distance(&[1.0, 5.0], &[1.0, 9.0], &[0.0, 4.0]);
    let expected = sse_distance(&[5.0], &[9.0], &[4.0]);
    assert!((d - expected).abs() < 1e-12);
}

#[test]
fn equal_components_contribute_nothing() {
    let d = sse_distance(&[0.0, 2.0], &[8.0, 2.0], &[4.0, 1.0]);
    // var({0, 8}) = 16, normalized by 4
    assert!((d - 2.0).abs() < 1e-12);
}

#[test]
fn negative_values_are_grouped_by_magnitude_order() {
    let ds = column(&[-30.0, -31.0, -32.0, 40.0, 41.0, 42.0]);
    let p = Mdav::new(3).unwrap().partition(&ds).unwrap();
    for g in p.groups() {
        let negative = g.iter().filter(|&&r| ds.value(r, 0) < 0.0).count();
        assert!(negative == 0 || negative == g.len());
    }
}

#[test]
fn integer_centroid_rounds_ties_to_even() {
    let ds = Dataset::from_rows(
        vec![Attribute::quasi_identifier("x").with_kind(NumericKind::Integer)],
        [1.0, 2.0, 3.0, 4.0].iter().map(|&v| vec![v]),
    )
    .unwrap();
    let mut p = Partition::new(&ds, 2);
    p.add_group(vec![0, 1]);
    p.add_group(vec![2, 3]);
    let out = CentroidSubstitution::new().replace(&ds, &p).unwrap();
    // 1.5 -> 2, 3.5 -> 4
    assert_eq!(out.column(0), vec![2.0, 2.0, 4.0, 4.0]);
}

// =============================================================================
// Replacement preconditions
// =============================================================================

#[test]
fn partition_of_other_size_is_rejected() {
    let small = column(&[1.0, 2.0, 3.0]);
    let large = column(&[1.0, 2.0, 3.0, 4.0]);
    let p = Mdav::new(3).unwrap().partition(&small).unwrap();
    let err = CentroidSubstitution::new().replace(&large, &p).unwrap_err();
    assert!(matches!(err, SdcError::ShapeMismatch { .. }));
}

#[test]
fn centroid_without_quasi_identifiers_fails() {
    let ds = Dataset::from_rows(
        vec![Attribute::confidential("c")],
        (1..=4u8).map(|i| vec![f64::from(i)]),
    )
    .unwrap();
    let mut p = Partition::new(&ds, 2);
    p.add_group(vec![0, 1, 2, 3]);
    let err = CentroidSubstitution::new().replace(&ds, &p).unwrap_err();
    assert!(matches!(err, SdcError::NoAttributes(_)));
    assert!(ds.quasi_identifier_dataset().is_err());
}

#[test]
fn singleton_groups_are_left_unchanged_by_permutation() {
    let ds = column(&[5.0, 6.0, 7.0]);
    let mut p = Partition::new(&ds, 1);
    for i in 0..3 {
        p.add_group(vec![i]);
    }
    let out = GroupPermutation::new(StdRng::seed_from_u64(1))
        .replace(&ds, &p)
        .unwrap();
    assert_eq!(out.column(0), ds.column(0));
}

#[test]
fn hybrid_on_single_valued_groups_is_a_no_op() {
    let ds = Dataset::from_rows(
        vec![Attribute::confidential("c")],
        [2.0, 2.0, 2.0, 8.0, 8.0, 8.0].iter().map(|&v| vec![v]),
    )
    .unwrap();
    let p = Mdav::new(3).unwrap().partition(&ds).unwrap();
    let out = HybridSynthesis::new(StdRng::seed_from_u64(3))
        .replace(&ds, &p)
        .unwrap();
    assert_eq!(out.column(0), ds.column(0));
}

#[test]
fn merged_partition_stays_well_formed() {
    let ds = column(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let mut p = Mdav::new(3).unwrap().partition(&ds).unwrap();
    p.merge(0, 1);
    assert!(p.is_well_formed());
    assert_eq!(p.group_size(0), 6);
    assert_eq!(p.group_size(1), 0);
}
