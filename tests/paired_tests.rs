// Paired filter tests: two-plane deletion and union semantics.

mod common;

use bloom_variants::{
    BloomFilter, DeletableBloomFilter, Error, OrdinaryBloomFilter, PairedBloomFilter,
};

fn filter(num_hashes: u8, num_bits: u16) -> PairedBloomFilter<str> {
    PairedBloomFilter::new(num_hashes, num_bits).unwrap()
}

// =============================================================================
// Test 1: Insert, query, delete round
// =============================================================================
#[test]
fn insert_delete_query() {
    common::init_logging();
    let mut bf = filter(4, 32);

    bf.insert("Hello world!");
    assert!(bf.query("Hello world!"));
    assert!(!bf.query("foo bar baz"));

    bf.insert("foo bar baz");
    assert!(bf.delete("foo bar baz"));
    assert!(!bf.query("foo bar baz"));
    assert!(bf.query("Hello world!"));

    assert_eq!(bf.positive_count(), 8);
    assert_eq!(bf.negative_count(), 4);
}

// =============================================================================
// Test 2: Deleting an absent element changes nothing
// =============================================================================
#[test]
fn delete_absent_is_noop() {
    let mut bf = filter(4, 32);
    bf.insert("Hello world!");
    let before = bf.clone();

    assert!(!bf.delete("foo bar baz"));
    assert_eq!(bf, before);
}

// =============================================================================
// Test 3: Re-inserting after delete does not resurrect
// =============================================================================
#[test]
fn deletion_is_sticky() {
    let mut bf = filter(4, 32);
    bf.insert("Hello world!");
    assert!(bf.delete("Hello world!"));

    bf.insert("Hello world!");
    assert!(!bf.query("Hello world!"));
    assert!(!bf.delete("Hello world!"));
}

// =============================================================================
// Test 4: Unrelated deletions can false-negate a member
// =============================================================================
#[test]
fn unrelated_deletes_cause_false_negative() {
    // Two hashes over 16 slots:
    //   alpha → {1, 6}, beta → {5, 8}
    //   ghost_33 → {1, 8}, ghost_174 → {5, 6}
    let mut bf = filter(2, 16);
    bf.insert("alpha");
    bf.insert("beta");

    // Both ghosts are false positives, so their deletes go through.
    assert!(bf.delete("ghost_33"));
    assert!(bf.query("alpha"));
    assert!(bf.delete("ghost_174"));

    // Every negative bit of alpha is now set.
    assert!(!bf.query("alpha"));
}

// =============================================================================
// Test 5: Union ORs positives and ANDs negatives
// =============================================================================
#[test]
fn union_combines_planes() {
    let mut a = filter(4, 32);
    let mut b = filter(4, 32);

    a.insert("Hello world!");
    b.insert("Hello world!");
    b.insert("foo bar baz");
    b.delete("Hello world!");

    // Only b recorded the delete, so the union keeps the element.
    a.union(&b).unwrap();
    assert!(a.query("Hello world!"));
    assert!(a.query("foo bar baz"));
    assert_eq!(a.negative_count(), 0);

    // Once both sides agree, the delete survives the union.
    let mut c = filter(4, 32);
    c.insert("Hello world!");
    c.delete("Hello world!");
    c.union(&b).unwrap();
    assert!(!c.query("Hello world!"));
    assert!(c.query("foo bar baz"));
    assert_eq!(c.negative_count(), 4);
}

// =============================================================================
// Test 6: Union of different shapes fails
// =============================================================================
#[test]
fn union_shape_mismatch() {
    let mut a = filter(4, 32);
    let b = filter(5, 32);
    assert!(matches!(a.union(&b), Err(Error::ShapeMismatch { .. })));
}

// =============================================================================
// Test 7: Conversion to ordinary drops deletions
// =============================================================================
#[test]
fn to_ordinary_drops_deletions() {
    let mut bf = filter(4, 32);
    bf.insert("Hello world!");
    bf.insert("foo bar baz");
    bf.delete("foo bar baz");

    let ordinary: OrdinaryBloomFilter<str> = bf.to_ordinary();
    assert!(ordinary.query("Hello world!"));
    assert!(ordinary.query("foo bar baz"));
    assert_eq!(ordinary.count_ones(), bf.positive_count());
}

// =============================================================================
// Test 8: Members survive without deletes
// =============================================================================
#[test]
fn no_false_negatives_without_deletes() {
    let keys = common::random_keys(9, 500);
    let mut bf = filter(7, 8192);
    for k in &keys {
        bf.insert(k);
    }
    for k in &keys {
        assert!(bf.query(k));
    }
    assert!(bf.estimated_false_positive_rate() < 0.01);
}
