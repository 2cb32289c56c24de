use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::hash::Hash;

use crate::grammars::mcfg::{Composition, Mcfg, VarT};
use crate::recognisable::chart::Chart;
use crate::util::tree::Tree;
use crate::util::{cartesian_product, IntSet};

/// A node label in a derivation tree. A phrase carries the head of the
/// rule that built it together with the rule's composition, so that the
/// yield of the node can be read off component by component; a word is an
/// input token.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub enum NodeLabel<N, T> {
    Phrase(N, Composition<T>),
    Word(T),
}

impl<N: Display, T: Display> Display for NodeLabel<N, T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            NodeLabel::Phrase(ref head, _) => write!(f, "{}", head),
            NodeLabel::Word(ref token) => write!(f, "{}", token),
        }
    }
}

pub type DerivationTree<N, T> = Tree<NodeLabel<N, T>>;

impl<N, T> Tree<NodeLabel<N, T>> {
    /// The tokens of the `component`-th part of this constituent's yield,
    /// in input order. The children of a phrase are visited in the order
    /// prescribed by its composition, not in tree order.
    pub fn yield_component(&self, component: usize) -> Vec<&T> {
        match self.root {
            NodeLabel::Word(ref token) => vec![token],
            NodeLabel::Phrase(_, ref composition) => {
                let mut tokens = Vec::new();
                for symbol in &composition.composition[component] {
                    match *symbol {
                        VarT::T(ref token) => tokens.push(token),
                        VarT::Var(i, j) => {
                            tokens.extend(self.children[i as usize].yield_component(j as usize))
                        }
                    }
                }
                tokens
            }
        }
    }

    /// The full yield of a fanout-1 constituent.
    pub fn word_yield(&self) -> Vec<&T> {
        self.yield_component(0)
    }

    /// Whether some phrase of the tree is headed by the given nonterminal.
    pub fn contains_phrase(&self, nonterminal: &N) -> bool
    where
        N: PartialEq,
    {
        match self.root {
            NodeLabel::Phrase(ref head, _) if head == nonterminal => true,
            _ => self
                .children
                .iter()
                .any(|child| child.contains_phrase(nonterminal)),
        }
    }
}

/// All derivation trees for the chart item with the given id.
pub fn trees_for_item<N, T>(
    grammar: &Mcfg<N, T>,
    chart: &Chart<N>,
    id: usize,
) -> BTreeSet<DerivationTree<N, T>>
where
    N: Clone + Eq + Hash + Ord,
    T: Clone + Eq + Hash + Ord,
{
    let mut visited = IntSet::default();
    collect_trees(grammar, chart, id, &mut visited)
}

/// Walks the backpointer DAG. `visited` holds the item ids on the current
/// path; a derivation that revisits one of them is cyclic and is skipped,
/// while the other derivations of the same item are still explored.
fn collect_trees<N, T>(
    grammar: &Mcfg<N, T>,
    chart: &Chart<N>,
    id: usize,
    visited: &mut IntSet,
) -> BTreeSet<DerivationTree<N, T>>
where
    N: Clone + Eq + Hash + Ord,
    T: Clone + Eq + Hash + Ord,
{
    let mut trees = BTreeSet::new();
    if !visited.insert(id) {
        return trees;
    }

    for backpointer in chart.backpointers(id) {
        let rule = &grammar.rules()[backpointer.rule];
        let label = NodeLabel::Phrase(rule.head.clone(), rule.composition.clone());

        if backpointer.children.is_empty() {
            if let Some(token) = rule.terminal_token() {
                trees.insert(Tree::new(
                    label,
                    vec![Tree::leaf(NodeLabel::Word(token.clone()))],
                ));
            }
            continue;
        }

        let child_sets: Vec<Vec<DerivationTree<N, T>>> = backpointer
            .children
            .iter()
            .map(|&child| {
                collect_trees(grammar, chart, child, visited)
                    .into_iter()
                    .collect()
            })
            .collect();
        if child_sets.iter().any(|set| set.is_empty()) {
            continue;
        }
        for children in cartesian_product(&child_sets) {
            trees.insert(Tree::new(label.clone(), children));
        }
    }

    visited.remove(&id);
    trees
}
