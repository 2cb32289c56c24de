extern crate clap;
extern crate mcfg_parser;

use clap::{App, Arg, ArgMatches, SubCommand};
use std::fs::File;
use std::io::Read;
use std::process::exit;

use mcfg_parser::grammars::mcfg::Mcfg;
use mcfg_parser::recognisable::{AgendaParser, Mode, Outcome};
use mcfg_parser::util::with_time;

fn main() {
    let matches = App::new("mcfg-parser")
        .version("0.1")
        .about("Agenda-based deductive parsing for multiple context-free grammars")
        .subcommand(word_sub_command(
            "recognise",
            "Reads a list of words from stdin and decides for each if it is in the language.",
        ))
        .subcommand(word_sub_command(
            "parse",
            "Reads a list of words from stdin and prints their derivation trees.",
        ))
        .get_matches();

    match matches.subcommand() {
        ("recognise", Some(sub_matches)) => handle_sub_matches(sub_matches, Mode::Recognise),
        ("parse", Some(sub_matches)) => handle_sub_matches(sub_matches, Mode::Parse),
        _ => (),
    }
}

fn word_sub_command<'a, 'b>(name: &str, about: &'b str) -> App<'a, 'b> {
    SubCommand::with_name(name)
        .about(about)
        .arg(
            Arg::with_name("grammar")
                .required(true)
                .index(1)
                .help("The file that contains the grammar."),
        )
        .arg(
            Arg::with_name("steps")
                .short("s")
                .long("steps")
                .takes_value(true)
                .help("Abort a parse after the given number of agenda steps."),
        )
        .arg(
            Arg::with_name("time")
                .long("time")
                .help("Print the time spent on each word."),
        )
}

fn handle_sub_matches(matches: &ArgMatches, mode: Mode) {
    let mut grammar_file = File::open(matches.value_of("grammar").unwrap()).unwrap();
    let mut grammar_string = String::new();
    let _ = grammar_file.read_to_string(&mut grammar_string);
    let grammar: Mcfg<String, String> = match grammar_string.parse() {
        Ok(grammar) => grammar,
        Err(error) => {
            eprintln!("{}", error);
            exit(1)
        }
    };

    let parser = match matches.value_of("steps") {
        Some(steps) => AgendaParser::with_step_limit(steps.parse().unwrap()),
        None => AgendaParser::new(),
    };

    let mut corpus = String::new();
    let _ = std::io::stdin().read_to_string(&mut corpus);

    for sentence in corpus.lines() {
        let word: Vec<String> = sentence.split_whitespace().map(|w| w.to_string()).collect();
        let (outcome, duration) = with_time(|| grammar.run(&parser, &word, mode));

        match outcome {
            Ok(Outcome::Recognised(result)) => println!("{}: {}", result, sentence),
            Ok(Outcome::Parses(trees)) => {
                println!("{} parse(s): {}", trees.len(), sentence);
                for tree in trees {
                    println!("  {}", tree);
                }
            }
            Err(error) => println!("{}: {}", error, sentence),
        }

        if matches.is_present("time") {
            println!("  took {} ms", duration.num_milliseconds());
        }
    }
}
