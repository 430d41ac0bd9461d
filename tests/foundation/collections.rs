//! Integration tests for persistent collections

use weft_foundation::LtVec;

#[test]
fn push_back_leaves_original_untouched() {
    let empty: LtVec<i32> = LtVec::new();
    let one = empty.push_back(1);
    let two = one.push_back(2);

    assert!(empty.is_empty());
    assert_eq!(one.len(), 1);
    assert_eq!(two.len(), 2);
    assert_eq!(two.first(), Some(&1));
    assert_eq!(two.last(), Some(&2));
}

#[test]
fn concat_and_iterate() {
    let a: LtVec<i32> = (1..=3).collect();
    let b: LtVec<i32> = (4..=5).collect();
    let joined = a.concat(&b);
    let items: Vec<i32> = joined.iter().copied().collect();
    assert_eq!(items, vec![1, 2, 3, 4, 5]);
    assert_eq!(a.len(), 3);
}

#[test]
fn ordering_is_lexicographic() {
    let short: LtVec<i32> = vec![1, 2].into_iter().collect();
    let long: LtVec<i32> = vec![1, 2, 0].into_iter().collect();
    let bigger: LtVec<i32> = vec![2].into_iter().collect();
    assert!(short < long);
    assert!(long < bigger);
}
