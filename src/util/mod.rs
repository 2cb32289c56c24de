pub mod agenda;
pub mod parsing;
pub mod tree;

use fnv::{FnvHashMap, FnvHashSet};

/// A `HashMap` with `usize` keys.
/// It uses the `Fnv` hasher to provide fast access and insert
/// functionality with these keys.
pub type IntMap<T> = FnvHashMap<usize, T>;
/// A `HashSet` with `usize` keys.
/// It uses the `Fnv` hasher to provide fast access and insert
/// functionality with these keys.
pub type IntSet = FnvHashSet<usize>;

/// Fills a `Vec` with default entries until it can access it at
/// the specified index to return the mutable reference.
pub fn vec_entry<T>(v: &mut Vec<T>, i: usize) -> &mut T
where
    T: Default + Clone,
{
    if i >= v.len() {
        let diff = i - v.len() + 1;
        v.extend(vec![Default::default(); diff]);
    }
    v.get_mut(i).unwrap()
}

/// All tuples that pick one element from each of the given lists, in
/// list order. The product of zero lists is the single empty tuple.
pub fn cartesian_product<A>(lists: &[Vec<A>]) -> Vec<Vec<A>>
where
    A: Clone,
{
    let mut tuples = vec![Vec::with_capacity(lists.len())];

    for list in lists {
        tuples = tuples
            .iter()
            .flat_map(|prefix| {
                list.iter().map(move |element| {
                    let mut tuple = prefix.clone();
                    tuple.push(element.clone());
                    tuple
                })
            })
            .collect();
    }

    tuples
}

use time::{Duration, PreciseTime};
pub fn with_time<B, F>(f: F) -> (B, Duration)
where
    F: FnOnce() -> B,
{
    let t0 = PreciseTime::now();
    let result = f();
    let t1 = PreciseTime::now();

    (result, t0.to(t1))
}
