use integeriser::{HashIntegeriser, Integeriser};
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::hash::Hash;

use crate::grammars::mcfg::Span;
use crate::util::IntMap;

/// An instantiated nonterminal: a head together with one span of the
/// input per component. Items are value types; two items are the same
/// iff their heads and span tuples are equal.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub struct Item<N> {
    pub head: N,
    pub spans: Vec<Span>,
}

impl<N> Item<N> {
    pub fn new(head: N, spans: Vec<Span>) -> Self {
        Item { head, spans }
    }

    pub fn fanout(&self) -> usize {
        self.spans.len()
    }
}

impl<N: Display> Display for Item<N> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let spans: Vec<String> = self.spans.iter().map(|span| span.to_string()).collect();
        write!(f, "{}({})", self.head, spans.join(", "))
    }
}

/// One way of deducing an item: a rule index and the chart ids of the
/// child items, in rule order. Axioms have no children.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Backpointer {
    pub rule: usize,
    pub children: Vec<usize>,
}

/// An append-only arena of deduced items. Every item receives a stable
/// integer id on first insertion and insertion is idempotent, so the
/// same item deduced along many paths is stored once while all of its
/// derivations accumulate in the backpointer table.
#[derive(Debug)]
pub struct Chart<N>
where
    N: Clone + Eq + Hash,
{
    items: HashIntegeriser<Item<N>>,
    by_head: HashMap<N, Vec<usize>>,
    backpointers: IntMap<Vec<Backpointer>>,
}

impl<N> Chart<N>
where
    N: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Chart {
            items: HashIntegeriser::new(),
            by_head: HashMap::new(),
            backpointers: IntMap::default(),
        }
    }

    /// Inserts the item and reports whether it was new.
    pub fn insert(&mut self, item: Item<N>) -> (usize, bool) {
        match self.items.find_key(&item) {
            Some(id) => (id, false),
            None => {
                let head = item.head.clone();
                let id = self.items.integerise(item);
                self.by_head.entry(head).or_insert_with(Vec::new).push(id);
                (id, true)
            }
        }
    }

    pub fn contains(&self, item: &Item<N>) -> bool {
        self.items.find_key(item).is_some()
    }

    pub fn find(&self, item: &Item<N>) -> Option<usize> {
        self.items.find_key(item)
    }

    pub fn get(&self, id: usize) -> &Item<N> {
        self.items
            .find_value(id)
            .expect("[ERROR] chart ids are assigned contiguously")
    }

    pub fn len(&self) -> usize {
        self.items.size()
    }

    pub fn is_empty(&self) -> bool {
        self.items.size() == 0
    }

    pub fn items(&self) -> impl Iterator<Item = &Item<N>> {
        (0..self.len()).map(move |id| self.get(id))
    }

    /// The ids of all items with the given head, in insertion order.
    pub fn items_with_head(&self, head: &N) -> &[usize] {
        self.by_head.get(head).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Records a derivation of the item; duplicates are ignored.
    pub fn add_backpointer(&mut self, id: usize, backpointer: Backpointer) {
        let derivations = self.backpointers.entry(id).or_insert_with(Vec::new);
        if !derivations.contains(&backpointer) {
            derivations.push(backpointer);
        }
    }

    pub fn backpointers(&self, id: usize) -> &[Backpointer] {
        self.backpointers
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The ids of all goal items for an input of length `n`: fanout 1,
    /// span `[0, n)`, and headed by one of the initial nonterminals.
    pub fn goal_items(&self, initial: &[N], n: usize) -> Vec<usize> {
        initial
            .iter()
            .filter_map(|head| self.find(&Item::new(head.clone(), vec![Span::new(0, n)])))
            .collect()
    }
}

impl<N> Default for Chart<N>
where
    N: Clone + Eq + Hash,
{
    fn default() -> Self {
        Chart::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(head: char, spans: &[(usize, usize)]) -> Item<char> {
        Item::new(
            head,
            spans.iter().map(|&(i, j)| Span::new(i, j)).collect(),
        )
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut chart = Chart::new();

        let (a, new_a) = chart.insert(item('A', &[(0, 1)]));
        let (b, new_b) = chart.insert(item('A', &[(1, 2)]));
        let (c, new_c) = chart.insert(item('A', &[(0, 1)]));

        assert!(new_a && new_b && !new_c);
        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(chart.len(), 2);
        assert!(chart.contains(&item('A', &[(1, 2)])));
        assert!(!chart.contains(&item('B', &[(0, 1)])));
    }

    #[test]
    fn test_items_with_head() {
        let mut chart = Chart::new();
        let (a, _) = chart.insert(item('A', &[(0, 1)]));
        let (b, _) = chart.insert(item('B', &[(1, 2)]));
        let (c, _) = chart.insert(item('A', &[(1, 2), (3, 4)]));

        assert_eq!(chart.items_with_head(&'A'), &[a, c]);
        assert_eq!(chart.items_with_head(&'B'), &[b]);
        assert!(chart.items_with_head(&'C').is_empty());
    }

    #[test]
    fn test_backpointers_deduplicate() {
        let mut chart = Chart::new();
        let (id, _) = chart.insert(item('A', &[(0, 1)]));

        let backpointer = Backpointer {
            rule: 0,
            children: vec![],
        };
        chart.add_backpointer(id, backpointer.clone());
        chart.add_backpointer(id, backpointer);
        chart.add_backpointer(
            id,
            Backpointer {
                rule: 1,
                children: vec![],
            },
        );

        assert_eq!(chart.backpointers(id).len(), 2);
    }

    #[test]
    fn test_goal_items() {
        let mut chart = Chart::new();
        chart.insert(item('A', &[(0, 1)]));
        let (goal, _) = chart.insert(item('S', &[(0, 3)]));
        chart.insert(item('S', &[(0, 2)]));
        chart.insert(item('S', &[(0, 1), (2, 3)]));

        assert_eq!(chart.goal_items(&['S'], 3), vec![goal]);
        assert!(chart.goal_items(&['S'], 4).is_empty());
        assert!(chart.goal_items(&[], 3).is_empty());
    }
}
