use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::hash::Hash;
use std::str::FromStr;

use crate::grammars::mcfg::Mcfg;

pub mod chart;
pub mod derivation;
mod recogniser;

pub use self::chart::{Backpointer, Chart, Item};
pub use self::derivation::{DerivationTree, NodeLabel};
pub use self::recogniser::AgendaParser;

/// What to do with an input word.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Mode {
    Recognise,
    Parse,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recognise" | "recognize" => Ok(Mode::Recognise),
            "parse" => Ok(Mode::Parse),
            _ => Err(format!(
                "mode must be \"recognise\" or \"parse\", not \"{}\"",
                s
            )),
        }
    }
}

/// The result of running a parser in a given `Mode`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Outcome<N, T> {
    Recognised(bool),
    Parses(BTreeSet<DerivationTree<N, T>>),
}

/// Returned when the deduction loop reaches its step limit before the
/// chart is saturated. The partial chart is discarded.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct StepLimitExceeded;

impl Display for StepLimitExceeded {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "the parser exceeded its step limit")
    }
}

impl Error for StepLimitExceeded {}

/// A pluggable parsing strategy for multiple context-free grammars.
pub trait Parser<N, T>
where
    N: Clone + Eq + Hash + Ord,
    T: Clone + Eq + Hash + Ord,
{
    /// Decides whether `word` is in the language of `grammar`.
    fn recognise(&self, grammar: &Mcfg<N, T>, word: &[T]) -> Result<bool, StepLimitExceeded>;

    /// All derivation trees of `word` in `grammar`.
    fn parse(
        &self,
        grammar: &Mcfg<N, T>,
        word: &[T],
    ) -> Result<BTreeSet<DerivationTree<N, T>>, StepLimitExceeded>;

    fn run(
        &self,
        grammar: &Mcfg<N, T>,
        word: &[T],
        mode: Mode,
    ) -> Result<Outcome<N, T>, StepLimitExceeded> {
        match mode {
            Mode::Recognise => self.recognise(grammar, word).map(Outcome::Recognised),
            Mode::Parse => self.parse(grammar, word).map(Outcome::Parses),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!("recognise".parse(), Ok(Mode::Recognise));
        assert_eq!("recognize".parse(), Ok(Mode::Recognise));
        assert_eq!("parse".parse(), Ok(Mode::Parse));
        assert!("analyse".parse::<Mode>().is_err());
        assert!("".parse::<Mode>().is_err());
    }
}
