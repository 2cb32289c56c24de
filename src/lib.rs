#![warn(clippy::all)]

extern crate fnv;
extern crate integeriser;
#[macro_use]
extern crate nom;
extern crate time;

pub mod grammars;
pub mod recognisable;
pub mod util;
