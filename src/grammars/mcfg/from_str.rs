use nom::{is_space, IResult};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::str::FromStr;

use crate::grammars::mcfg::{Composition, Mcfg, McfgRule, VarT};
use crate::util::parsing::{parse_initials, parse_token, parse_vec};

/// A nonterminal with its raw argument strings, e.g. `("NP", ["uv"])`.
type RawElement<N> = (N, Vec<String>);

impl<N, T> FromStr for Mcfg<N, T>
where
    N: FromStr + Clone + Eq + Hash,
    N::Err: Debug,
    T: FromStr + Clone + Eq + Hash + Ord,
    T::Err: Debug,
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('%'));

        let initial = match lines.next() {
            Some(line) => match parse_initials(line.as_bytes()) {
                IResult::Done(_, result) => result,
                _ => {
                    return Err(format!(
                        "Malformed declaration of initial nonterminals: {}",
                        line
                    ))
                }
            },
            None => return Err("Given string is empty.".to_string()),
        };

        let mut rules = Vec::new();
        for line in lines {
            rules.push(line.parse()?);
        }
        Mcfg::new(rules, initial).map_err(|e| e.to_string())
    }
}

impl<N, T> FromStr for McfgRule<N, T>
where
    N: FromStr,
    N::Err: Debug,
    T: FromStr,
    T::Err: Debug,
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_mcfg_rule(s.as_bytes()) {
            IResult::Done(rest, (lhs, tail)) if rest.is_empty() => assemble_rule(lhs, tail),
            _ => Err(format!("Could not parse {}", s)),
        }
    }
}

fn parse_element<N>(input: &[u8]) -> IResult<&[u8], RawElement<N>>
where
    N: FromStr,
    N::Err: Debug,
{
    do_parse!(
        input,
        head: parse_token >>
            arguments: call!(|x| parse_vec(x, parse_token, "(", ")", ",")) >>
            ((head, arguments))
    )
}

fn parse_mcfg_rule<N>(
    input: &[u8],
) -> IResult<&[u8], (RawElement<N>, Option<Vec<RawElement<N>>>)>
where
    N: FromStr,
    N::Err: Debug,
{
    do_parse!(
        input,
        lhs: parse_element >>
            take_while!(is_space) >>
            tail: opt!(complete!(do_parse!(
                alt!(tag!("→") | tag!("->")) >>
                    take_while!(is_space) >>
                    elements: many1!(complete!(do_parse!(
                        element: parse_element >>
                            take_while!(is_space) >>
                            (element)
                    ))) >>
                    (elements)
            ))) >>
            take_while!(is_space) >>
            opt!(complete!(do_parse!(
                tag!("%") >> take_while!(|_| true) >> (())
            ))) >>
            ((lhs, tail))
    )
}

/// Resolves the single-letter variables of the surface notation into
/// `Var(i, j)` references by their position in the right side.
fn assemble_rule<N, T>(
    (head, components): RawElement<N>,
    tail_elements: Option<Vec<RawElement<N>>>,
) -> Result<McfgRule<N, T>, String>
where
    T: FromStr,
    T::Err: Debug,
{
    let tail_elements = match tail_elements {
        None => {
            if components.len() != 1 {
                return Err(format!(
                    "a terminal rule must have exactly one token, found {}",
                    components.len()
                ));
            }
            return Ok(McfgRule::terminal(head, components[0].parse().unwrap()));
        }
        Some(elements) => elements,
    };

    let mut variables: HashMap<char, (u8, u8)> = HashMap::new();
    for (i, (_, arguments)) in tail_elements.iter().enumerate() {
        for (j, argument) in arguments.iter().enumerate() {
            let mut characters = argument.chars();
            let letter = match (characters.next(), characters.next()) {
                (Some(letter), None) => letter,
                _ => {
                    return Err(format!(
                        "right side variables must be single letters: {}",
                        argument
                    ))
                }
            };
            if variables.insert(letter, (i as u8, j as u8)).is_some() {
                return Err(format!("variable {} duplicated on the right side", letter));
            }
        }
    }

    let mut composition = Vec::with_capacity(components.len());
    for component in &components {
        let mut symbols = Vec::with_capacity(component.len());
        for letter in component.chars() {
            match variables.get(&letter) {
                Some(&(i, j)) => symbols.push(VarT::Var(i, j)),
                None => {
                    return Err(format!(
                        "variable {} is not declared on the right side",
                        letter
                    ))
                }
            }
        }
        composition.push(symbols);
    }

    let tail = tail_elements
        .into_iter()
        .map(|(nonterminal, _)| nonterminal)
        .collect();
    McfgRule::new(head, tail, Composition::from(composition)).map_err(|e| e.to_string())
}
