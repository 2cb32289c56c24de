use std::collections::BTreeSet;
use std::hash::Hash;

use crate::grammars::mcfg::{Mcfg, Span};
use crate::recognisable::chart::{Backpointer, Chart, Item};
use crate::recognisable::derivation::{self, DerivationTree};
use crate::recognisable::{Parser, StepLimitExceeded};
use crate::util::agenda::{Agenda, Capacity, Queue};
use crate::util::cartesian_product;

/// An agenda-based deductive parser in the style of Shieber, Schabes &
/// Pereira. Terminal rules seed the chart; every item taken from the
/// agenda is combined with the chart items along the grammar's rules
/// until no new items can be deduced.
#[derive(Debug, Clone, Copy)]
pub struct AgendaParser {
    step_limit: Capacity,
}

impl AgendaParser {
    pub fn new() -> Self {
        AgendaParser {
            step_limit: Capacity::Infinite,
        }
    }

    /// Aborts with `StepLimitExceeded` once `limit` items have been
    /// processed.
    pub fn with_step_limit(limit: usize) -> Self {
        AgendaParser {
            step_limit: Capacity::Limit(limit),
        }
    }

    /// Saturates the chart for `word` using a FIFO agenda.
    pub fn fill_chart<N, T>(
        &self,
        grammar: &Mcfg<N, T>,
        word: &[T],
    ) -> Result<Chart<N>, StepLimitExceeded>
    where
        N: Clone + Eq + Hash,
        T: Clone + Eq + Hash + Ord,
    {
        self.fill_chart_with(Queue::new(), grammar, word)
    }

    /// Saturates the chart using a caller-supplied agenda. The set of
    /// items in the saturated chart does not depend on the agenda order.
    pub fn fill_chart_with<A, N, T>(
        &self,
        mut agenda: A,
        grammar: &Mcfg<N, T>,
        word: &[T],
    ) -> Result<Chart<N>, StepLimitExceeded>
    where
        A: Agenda<Item = usize>,
        N: Clone + Eq + Hash,
        T: Clone + Eq + Hash + Ord,
    {
        let mut chart = Chart::new();

        for (position, token) in word.iter().enumerate() {
            for &rule_id in grammar.terminal_rules(token) {
                let head = grammar.rules()[rule_id].head.clone();
                let item = Item::new(head, vec![Span::new(position, position + 1)]);
                let (id, new) = chart.insert(item);
                chart.add_backpointer(
                    id,
                    Backpointer {
                        rule: rule_id,
                        children: Vec::new(),
                    },
                );
                if new {
                    agenda.enqueue(id);
                }
            }
        }

        let mut steps = 0;
        while let Some(trigger) = agenda.dequeue() {
            if self.step_limit <= Capacity::Limit(steps) {
                return Err(StepLimitExceeded);
            }
            steps += 1;

            let trigger_head = chart.get(trigger).head.clone();
            for &(rule_id, position) in grammar.rules_with_successor(&trigger_head) {
                let rule = &grammar.rules()[rule_id];

                // candidate chart items per tail position, with the
                // trigger pinned to `position`
                let candidates: Vec<Vec<usize>> = rule
                    .tail
                    .iter()
                    .enumerate()
                    .map(|(k, nonterminal)| {
                        if k == position {
                            vec![trigger]
                        } else {
                            chart.items_with_head(nonterminal).to_vec()
                        }
                    })
                    .collect();

                for children in cartesian_product(&candidates) {
                    let instantiated = {
                        let spans: Vec<&[Span]> = children
                            .iter()
                            .map(|&id| chart.get(id).spans.as_slice())
                            .collect();
                        rule.instantiate(&spans)
                    };
                    if let Some(spans) = instantiated {
                        let (id, new) = chart.insert(Item::new(rule.head.clone(), spans));
                        chart.add_backpointer(
                            id,
                            Backpointer {
                                rule: rule_id,
                                children,
                            },
                        );
                        if new {
                            agenda.enqueue(id);
                        }
                    }
                }
            }
        }

        Ok(chart)
    }
}

impl Default for AgendaParser {
    fn default() -> Self {
        AgendaParser::new()
    }
}

impl<N, T> Parser<N, T> for AgendaParser
where
    N: Clone + Eq + Hash + Ord,
    T: Clone + Eq + Hash + Ord,
{
    fn recognise(&self, grammar: &Mcfg<N, T>, word: &[T]) -> Result<bool, StepLimitExceeded> {
        let chart = self.fill_chart(grammar, word)?;
        Ok(!chart.goal_items(grammar.initial(), word.len()).is_empty())
    }

    fn parse(
        &self,
        grammar: &Mcfg<N, T>,
        word: &[T],
    ) -> Result<BTreeSet<DerivationTree<N, T>>, StepLimitExceeded> {
        let chart = self.fill_chart(grammar, word)?;
        let mut trees = BTreeSet::new();
        for goal in chart.goal_items(grammar.initial(), word.len()) {
            trees.extend(derivation::trees_for_item(grammar, &chart, goal));
        }
        Ok(trees)
    }
}
