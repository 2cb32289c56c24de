use nom::{is_space, IResult};
use std::fmt::Debug;
use std::str::{from_utf8, FromStr};

/// Parses a token (i.e. a terminal symbol or a non-terminal symbol):
/// a non-empty string containing neither whitespace nor any of the
/// symbols `'"'`, `'-'`, `'→'`, `','`, `';'`, `'('`, `')'`, `'['`, `']'`.
pub fn parse_token<A>(input: &[u8]) -> IResult<&[u8], A>
where
    A: FromStr,
    A::Err: Debug,
{
    named!(
        parse_token_s<&str>,
        map_res!(is_not!(" \t\"-→,;()[]"), from_utf8)
    );

    parse_token_s(input).map(|x| x.parse().unwrap())
}

/// Parses the `input` into a `Vec<A>` given an `inner_parser` for type `A`, an `opening` delimiter, a `closing` delimiter, and a `separator`.
/// The `inner_parser` must not consume the `separator`s or the `closing` delimiter of the given `input`.
pub fn parse_vec<'a, A, P>(
    input: &'a [u8],
    inner_parser: P,
    opening: &str,
    closing: &str,
    separator: &str,
) -> IResult<&'a [u8], Vec<A>>
where
    P: Fn(&'a [u8]) -> IResult<&'a [u8], A>,
{
    do_parse!(
        input,
        tag!(opening) >>
            take_while!(is_space) >>
            result: many0!(
                do_parse!(
                    opt!(tag!(separator)) >>
                        take_while!(is_space) >>
                        the_token: inner_parser >>
                        take_while!(is_space) >>
                        (the_token)
                )
            ) >>
            tag!(closing) >>
            (result)
    )
}

/// Parses a declaration of the form `initial: [...]` into a vector of type `A`.
pub fn parse_initials<A>(input: &[u8]) -> IResult<&[u8], Vec<A>>
where
    A: FromStr,
    A::Err: Debug,
{
    do_parse!(
        input,
        tag!("initial:") >>
            take_while!(is_space) >>
            result: call!(|x| parse_vec(x, parse_token, "[", "]", ",")) >>
            (result)
    )
}
