use std::collections::{BTreeSet, HashMap};
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::hash::Hash;
use std::slice;

use crate::recognisable::derivation::DerivationTree;
use crate::recognisable::{AgendaParser, Mode, Outcome, Parser, StepLimitExceeded};
use crate::util::vec_entry;

mod from_str;

/// Variable names used when a composition is rendered in surface notation.
const VARIABLE_NAMES: &[u8; 26] = b"uvwxyzabcdefghijklmnopqrst";

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub enum VarT<T> {
    /// `Var(i, j)` represents the `j`th component of the `i`th successor.
    /// Indexing starts from `0`.
    Var(u8, u8),
    T(T),
}

/// The composition function of an MCFG rule: one sequence of symbols per
/// component of the head nonterminal.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub struct Composition<T> {
    pub composition: Vec<Vec<VarT<T>>>,
}

impl<T> From<Vec<Vec<VarT<T>>>> for Composition<T> {
    fn from(composition: Vec<Vec<VarT<T>>>) -> Self {
        Composition { composition }
    }
}

impl<T> Composition<T> {
    pub fn fanout(&self) -> usize {
        self.composition.len()
    }

    pub fn iter(&self) -> slice::Iter<Vec<VarT<T>>> {
        self.composition.iter()
    }
}

/// A half-open interval `[begin, end)` of input positions.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct Span {
    pub begin: usize,
    pub end: usize,
}

impl Span {
    pub fn new(begin: usize, end: usize) -> Self {
        Span { begin, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}

/// A linear, non-deleting rule of a multiple context-free grammar.
///
/// ```
/// use std::str::FromStr;
/// use mcfg_parser::grammars::mcfg::{Composition, McfgRule, VarT};
///
/// let rule: McfgRule<String, String> = McfgRule::from_str("Swhmain(v, uw) -> NP(u) VPwhmain(v, w)").unwrap();
///
/// assert_eq!(rule.head, "Swhmain");
/// assert_eq!(rule.tail, vec!["NP".to_string(), "VPwhmain".to_string()]);
/// assert_eq!(
///     rule.composition,
///     Composition::from(vec![
///         vec![VarT::Var(1, 0)],
///         vec![VarT::Var(0, 0), VarT::Var(1, 1)],
///     ])
/// );
/// ```
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub struct McfgRule<N, T> {
    pub head: N,
    pub tail: Vec<N>,
    pub composition: Composition<T>,
}

impl<N, T> McfgRule<N, T> {
    /// Checks the rule for well-formedness:
    /// * no component of the composition is empty,
    /// * a rule with an empty tail is a single literal token (a terminal rule),
    /// * a rule with a non-empty tail contains only variables,
    /// * every variable refers to a declared successor (`i < tail.len()`),
    /// * every variable occurs exactly once (linear), and
    /// * the components used per successor are exactly `0..k` for some
    ///   `k ≥ 1` (non-deleting).
    pub fn new(head: N, tail: Vec<N>, composition: Composition<T>) -> Result<Self, RuleError> {
        if composition.iter().any(|component| component.is_empty()) {
            return Err(RuleError::EmptyComponent);
        }

        if tail.is_empty() {
            let rule = McfgRule {
                head,
                tail,
                composition,
            };
            if rule.terminal_token().is_none() {
                return Err(RuleError::MalformedTerminalRule);
            }
            return Ok(rule);
        }

        let rank = tail.len();
        let mut occurrences: Vec<Vec<u8>> = Vec::new();
        for symbol in composition.iter().flat_map(|component| component.iter()) {
            match *symbol {
                VarT::T(_) => return Err(RuleError::TerminalInComposition),
                VarT::Var(i, j) => {
                    if i as usize >= rank {
                        return Err(RuleError::UndeclaredVariable(i, j));
                    }
                    let js = vec_entry(&mut occurrences, i as usize);
                    if js.contains(&j) {
                        return Err(RuleError::NonLinear(i, j));
                    }
                    js.push(j);
                }
            }
        }

        if occurrences.len() < rank {
            return Err(RuleError::Deleting(occurrences.len() as u8));
        }
        for (i, mut js) in occurrences.into_iter().enumerate() {
            js.sort();
            if js.is_empty() || js.iter().enumerate().any(|(k, &j)| j as usize != k) {
                return Err(RuleError::Deleting(i as u8));
            }
        }

        Ok(McfgRule {
            head,
            tail,
            composition,
        })
    }

    /// A terminal rule, e.g. `D(the)`.
    pub fn terminal(head: N, token: T) -> Self {
        McfgRule {
            head,
            tail: Vec::new(),
            composition: Composition::from(vec![vec![VarT::T(token)]]),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.tail.is_empty()
    }

    /// The token of a terminal rule.
    pub fn terminal_token(&self) -> Option<&T> {
        if self.tail.is_empty()
            && self.composition.composition.len() == 1
            && self.composition.composition[0].len() == 1
        {
            if let VarT::T(ref token) = self.composition.composition[0][0] {
                return Some(token);
            }
        }
        None
    }

    /// For each successor the number of its components mentioned in the
    /// composition. For a well-formed rule this is the successor's fanout.
    pub fn successor_fanouts(&self) -> Vec<usize> {
        let mut fanouts = vec![0; self.tail.len()];
        for symbol in self.composition.iter().flat_map(|component| component.iter()) {
            if let VarT::Var(i, j) = *symbol {
                let fanout = &mut fanouts[i as usize];
                *fanout = (*fanout).max(j as usize + 1);
            }
        }
        fanouts
    }

    /// Binds the rule's variables to the span tuples of its successors and
    /// returns the span tuple of the head, or `None` if the spans do not
    /// fit together.
    ///
    /// Consecutive variables within a component must be bound to adjacent
    /// spans, and the spans bound to distinct variables must be pairwise
    /// non-overlapping.
    pub fn instantiate(&self, children: &[&[Span]]) -> Option<Vec<Span>> {
        if children.len() != self.tail.len() {
            return None;
        }

        let mut spans = Vec::with_capacity(self.composition.fanout());
        let mut referenced = Vec::new();

        for component in self.composition.iter() {
            let mut bound: Option<Span> = None;
            for symbol in component {
                let span = match *symbol {
                    VarT::Var(i, j) => *children.get(i as usize)?.get(j as usize)?,
                    VarT::T(_) => return None,
                };
                bound = match bound {
                    None => Some(span),
                    Some(prefix) => {
                        if prefix.end != span.begin {
                            return None;
                        }
                        Some(Span::new(prefix.begin, span.end))
                    }
                };
                referenced.push(span);
            }
            spans.push(bound?);
        }

        referenced.sort();
        for window in referenced.windows(2) {
            if window[1].begin < window[0].end {
                return None;
            }
        }

        Some(spans)
    }
}

/// Displays the rule in surface notation, with variable names assigned in
/// declaration order, e.g. `S(uv) -> NP(u) VP(v)`.
impl<N: Display, T: Display> Display for McfgRule<N, T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if let Some(token) = self.terminal_token() {
            return write!(f, "{}({})", self.head, token);
        }

        let fanouts = self.successor_fanouts();
        let mut offsets = vec![0; fanouts.len()];
        for i in 1..fanouts.len() {
            offsets[i] = offsets[i - 1] + fanouts[i - 1];
        }
        let name = |i: usize, j: usize| -> char {
            *VARIABLE_NAMES.get(offsets[i] + j).unwrap_or(&b'?') as char
        };

        let components: Vec<String> = self
            .composition
            .iter()
            .map(|component| {
                component
                    .iter()
                    .map(|symbol| match *symbol {
                        VarT::Var(i, j) => name(i as usize, j as usize).to_string(),
                        VarT::T(ref token) => token.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .concat()
            })
            .collect();
        write!(f, "{}({}) ->", self.head, components.join(", "))?;

        for (i, nonterminal) in self.tail.iter().enumerate() {
            let arguments: Vec<String> = (0..fanouts[i]).map(|j| name(i, j).to_string()).collect();
            write!(f, " {}({})", nonterminal, arguments.join(", "))?;
        }
        Ok(())
    }
}

/// Rejection reasons for `McfgRule::new`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RuleError {
    EmptyComponent,
    MalformedTerminalRule,
    TerminalInComposition,
    UndeclaredVariable(u8, u8),
    NonLinear(u8, u8),
    Deleting(u8),
}

impl Display for RuleError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            RuleError::EmptyComponent => write!(f, "a component of the composition is empty"),
            RuleError::MalformedTerminalRule => {
                write!(f, "a terminal rule must consist of a single literal token")
            }
            RuleError::TerminalInComposition => {
                write!(f, "a rule with successors must not contain literal tokens")
            }
            RuleError::UndeclaredVariable(i, j) => {
                write!(f, "the variable ({}, {}) refers to no successor", i, j)
            }
            RuleError::NonLinear(i, j) => {
                write!(f, "the variable ({}, {}) occurs more than once", i, j)
            }
            RuleError::Deleting(i) => {
                write!(f, "some component of successor {} is never used", i)
            }
        }
    }
}

impl Error for RuleError {}

/// Rejection reasons for `Mcfg::new`. The `usize` payload is the index of
/// the offending rule.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum GrammarError {
    InconsistentFanout(usize),
    CompositionMismatch(usize),
    UnknownInitial,
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            GrammarError::InconsistentFanout(idx) => {
                write!(f, "rule {} assigns its head a conflicting fanout", idx)
            }
            GrammarError::CompositionMismatch(idx) => write!(
                f,
                "rule {} uses a successor with the wrong number of components",
                idx
            ),
            GrammarError::UnknownInitial => {
                write!(f, "an initial nonterminal is mentioned by no rule")
            }
        }
    }
}

impl Error for GrammarError {}

/// A multiple context-free grammar: a list of rules together with the
/// initial nonterminals. Construction validates the rules against each
/// other and precomputes the lookup tables used during parsing.
#[derive(Debug, Clone)]
pub struct Mcfg<N, T> {
    rules: Vec<McfgRule<N, T>>,
    initial: Vec<N>,
    alphabet: BTreeSet<T>,
    fanouts: HashMap<N, usize>,
    head_index: HashMap<N, Vec<usize>>,
    terminal_index: HashMap<T, Vec<usize>>,
    rhs_index: HashMap<N, Vec<(usize, usize)>>,
}

impl<N, T> Mcfg<N, T>
where
    N: Clone + Eq + Hash,
    T: Clone + Eq + Hash + Ord,
{
    /// Instantiates a new MCFG from a list of rules. The rules are checked
    /// for consistency with regards to
    /// * one fanout per nonterminal, on heads and tails alike, and
    /// * initial nonterminals that are mentioned by some rule.
    pub fn new(rules: Vec<McfgRule<N, T>>, initial: Vec<N>) -> Result<Self, GrammarError> {
        let mut fanouts: HashMap<N, usize> = HashMap::new();
        for (idx, rule) in rules.iter().enumerate() {
            let fanout = fanouts
                .entry(rule.head.clone())
                .or_insert_with(|| rule.composition.fanout());
            if *fanout != rule.composition.fanout() {
                return Err(GrammarError::InconsistentFanout(idx));
            }
        }

        for (idx, rule) in rules.iter().enumerate() {
            for (nonterminal, used) in rule.tail.iter().zip(rule.successor_fanouts()) {
                if let Some(&fanout) = fanouts.get(nonterminal) {
                    if fanout != used {
                        return Err(GrammarError::CompositionMismatch(idx));
                    }
                }
            }
        }

        for symbol in &initial {
            let mentioned =
                fanouts.contains_key(symbol) || rules.iter().any(|r| r.tail.contains(symbol));
            if !mentioned {
                return Err(GrammarError::UnknownInitial);
            }
        }

        let mut alphabet = BTreeSet::new();
        let mut head_index: HashMap<N, Vec<usize>> = HashMap::new();
        let mut terminal_index: HashMap<T, Vec<usize>> = HashMap::new();
        let mut rhs_index: HashMap<N, Vec<(usize, usize)>> = HashMap::new();
        for (idx, rule) in rules.iter().enumerate() {
            head_index
                .entry(rule.head.clone())
                .or_insert_with(Vec::new)
                .push(idx);
            if let Some(token) = rule.terminal_token() {
                alphabet.insert(token.clone());
                terminal_index
                    .entry(token.clone())
                    .or_insert_with(Vec::new)
                    .push(idx);
            }
            for (position, nonterminal) in rule.tail.iter().enumerate() {
                rhs_index
                    .entry(nonterminal.clone())
                    .or_insert_with(Vec::new)
                    .push((idx, position));
            }
        }

        Ok(Mcfg {
            rules,
            initial,
            alphabet,
            fanouts,
            head_index,
            terminal_index,
            rhs_index,
        })
    }

    pub fn rules(&self) -> &[McfgRule<N, T>] {
        &self.rules
    }

    pub fn initial(&self) -> &[N] {
        &self.initial
    }

    /// The terminal symbols of the grammar, i.e. the tokens of its
    /// terminal rules.
    pub fn alphabet(&self) -> &BTreeSet<T> {
        &self.alphabet
    }

    pub fn fanout(&self, nonterminal: &N) -> Option<usize> {
        self.fanouts.get(nonterminal).cloned()
    }

    /// The indices of all rules with the given head.
    pub fn rules_with_head(&self, nonterminal: &N) -> &[usize] {
        self.head_index
            .get(nonterminal)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The indices of all terminal rules for the given token.
    pub fn terminal_rules(&self, token: &T) -> &[usize] {
        self.terminal_index
            .get(token)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All `(rule index, position)` pairs such that the rule mentions the
    /// given nonterminal at that position of its tail.
    pub fn rules_with_successor(&self, nonterminal: &N) -> &[(usize, usize)] {
        self.rhs_index
            .get(nonterminal)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl<N, T> Mcfg<N, T>
where
    N: Clone + Eq + Hash + Ord,
    T: Clone + Eq + Hash + Ord,
{
    /// Decides whether `word` is in the language of the grammar, using the
    /// default `AgendaParser`.
    pub fn recognise(&self, word: &[T]) -> bool {
        AgendaParser::new()
            .recognise(self, word)
            .expect("[ERROR] a parser without step limit does not abort")
    }

    /// All derivation trees for `word`, using the default `AgendaParser`.
    pub fn parse(&self, word: &[T]) -> BTreeSet<DerivationTree<N, T>> {
        AgendaParser::new()
            .parse(self, word)
            .expect("[ERROR] a parser without step limit does not abort")
    }

    /// Dispatches `word` to the given parser strategy.
    pub fn run<P>(
        &self,
        parser: &P,
        word: &[T],
        mode: Mode,
    ) -> Result<Outcome<N, T>, StepLimitExceeded>
    where
        P: Parser<N, T>,
    {
        parser.run(self, word, mode)
    }
}

impl<N: Display, T: Display> Display for Mcfg<N, T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let initials: Vec<String> = self.initial.iter().map(|n| n.to_string()).collect();
        writeln!(f, "initial: [{}]", initials.join(", "))?;
        writeln!(f)?;
        for rule in &self.rules {
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}
