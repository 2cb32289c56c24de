use std::collections::BTreeSet;

use mcfg_parser::grammars::mcfg::Mcfg;
use mcfg_parser::recognisable::{AgendaParser, DerivationTree, NodeLabel, Parser};

/// A fragment of English with wh-movement and relative clauses; the
/// dislocated constituents make the grammar properly multiple
/// context-free.
const GRAMMAR: &str = "initial: [S]\n\
                       S(uv) -> NP(u) VP(v)\n\
                       S(uv) -> NPwh(u) VP(v)\n\
                       S(vuw) -> Aux(u) Swhmain(v, w)\n\
                       S(uvw) -> NPdisloc(u, v) VP(w)\n\
                       S(uwv) -> NPwhdisloc(u, v) VP(w)\n\
                       Sbar(uv) -> C(u) S(v)\n\
                       Sbarwh(v, uw) -> C(u) Swhemb(v, w)\n\
                       Sbarwh(u, v) -> NPwh(u) VP(v)\n\
                       Swhmain(v, uw) -> NP(u) VPwhmain(v, w)\n\
                       Swhmain(w, uxv) -> NPdisloc(u, v) VPwhmain(w, x)\n\
                       Swhemb(v, uw) -> NP(u) VPwhemb(v, w)\n\
                       Swhemb(w, uxv) -> NPdisloc(u, v) VPwhemb(w, x)\n\
                       Src(v, uw) -> NP(u) VPrc(v, w)\n\
                       Src(w, uxv) -> NPdisloc(u, v) VPrc(w, x)\n\
                       Src(u, v) -> N(u) VP(v)\n\
                       Swhrc(u, v) -> Nwh(u) VP(v)\n\
                       Swhrc(v, uw) -> NP(u) VPwhrc(v, w)\n\
                       Sbarwhrc(v, uw) -> C(u) Swhrc(v, w)\n\
                       VP(uv) -> Vpres(u) NP(v)\n\
                       VP(uv) -> Vpres(u) Sbar(v)\n\
                       VPwhmain(u, v) -> NPwh(u) Vroot(v)\n\
                       VPwhmain(u, wv) -> NPwhdisloc(u, v) Vroot(w)\n\
                       VPwhmain(v, uw) -> Vroot(u) Sbarwh(v, w)\n\
                       VPwhemb(u, v) -> NPwh(u) Vpres(v)\n\
                       VPwhemb(u, wv) -> NPwhdisloc(u, v) Vpres(w)\n\
                       VPwhemb(v, uw) -> Vpres(u) Sbarwh(v, w)\n\
                       VPrc(u, v) -> N(u) Vpres(v)\n\
                       VPrc(v, uw) -> Vpres(u) Nrc(v, w)\n\
                       VPwhrc(u, v) -> Nwh(u) Vpres(v)\n\
                       VPwhrc(v, uw) -> Vpres(u) Sbarwhrc(v, w)\n\
                       NP(uv) -> D(u) N(v)\n\
                       NP(uvw) -> D(u) Nrc(v, w)\n\
                       NPdisloc(uv, w) -> D(u) Nrc(v, w)\n\
                       NPwh(uv) -> Dwh(u) N(v)\n\
                       NPwh(uvw) -> Dwh(u) Nrc(v, w)\n\
                       NPwhdisloc(uv, w) -> Dwh(u) Nrc(v, w)\n\
                       Nrc(v, uw) -> C(u) Src(v, w)\n\
                       Nrc(u, vw) -> N(u) Swhrc(v, w)\n\
                       Nrc(u, vwx) -> Nrc(u, v) Swhrc(w, x)\n\
                       N(uv) -> N(u) N(v)\n\
                       NP(uv) -> NP(u) PP(v)\n\
                       PP(uv) -> P(u) NP(v)\n\
                       VP(uv) -> VP(u) PP(v)\n\
                       Dwh(which)\n\
                       Nwh(who)\n\
                       D(the)\n\
                       D(a)\n\
                       N(greyhound)\n\
                       N(human)\n\
                       N(saw)\n\
                       N(salmon)\n\
                       Vpres(saw)\n\
                       Vroot(see)\n\
                       Vpres(believes)\n\
                       Vroot(believe)\n\
                       Aux(does)\n\
                       Aux(did)\n\
                       C(that)\n\
                       P(with)";

fn example_grammar() -> Mcfg<String, String> {
    GRAMMAR.parse().unwrap()
}

fn word(sentence: &str) -> Vec<String> {
    sentence.split_whitespace().map(|w| w.to_string()).collect()
}

fn root_head(tree: &DerivationTree<String, String>) -> &str {
    match tree.root {
        NodeLabel::Phrase(ref head, _) => head,
        NodeLabel::Word(ref token) => token,
    }
}

#[test]
fn test_recognise_grammatical_sentences() {
    let grammar = example_grammar();

    for sentence in &[
        "the human saw the greyhound",
        "the human believes that the greyhound saw a salmon",
        "which human that saw a salmon believes the greyhound",
        "the human that believes the salmon that believes a human saw the greyhound",
        "the human saw the greyhound with a salmon",
        "which human did the greyhound see",
    ] {
        assert!(grammar.recognise(&word(sentence)), "rejected: {}", sentence);
    }
}

#[test]
fn test_recognise_ungrammatical_sentences() {
    let grammar = example_grammar();

    for sentence in &[
        "the human saw greyhound",
        "the human believe that the greyhound saw a salmon",
        "who saw a salmon",
        "the the greyhound",
        "saw",
    ] {
        assert!(!grammar.recognise(&word(sentence)), "accepted: {}", sentence);
    }
}

#[test]
fn test_empty_input() {
    let grammar = example_grammar();

    assert!(!grammar.recognise(&[]));
    assert!(grammar.parse(&[]).is_empty());
}

#[test]
fn test_parse_simple_transitive_sentence() {
    let grammar = example_grammar();
    let input = word("the human saw the greyhound");

    let trees = grammar.parse(&input);
    assert_eq!(trees.len(), 1);

    let tree = trees.iter().next().unwrap();
    assert_eq!(root_head(tree), "S");
    assert_eq!(
        tree.to_string(),
        "(S (NP (D the) (N human)) (VP (Vpres saw) (NP (D the) (N greyhound))))"
    );
    assert_eq!(tree.word_yield(), input.iter().collect::<Vec<_>>());
}

#[test]
fn test_parse_relative_clause_is_discontiguous() {
    let grammar = example_grammar();
    let input = word("the human that believes the salmon saw the greyhound");

    assert!(grammar.recognise(&input));

    let trees = grammar.parse(&input);
    assert!(!trees.is_empty());
    assert!(trees
        .iter()
        .any(|tree| tree.contains_phrase(&"Nrc".to_string())));
    for tree in &trees {
        assert_eq!(tree.word_yield(), input.iter().collect::<Vec<_>>());
    }
}

#[test]
fn test_parse_wh_question() {
    let grammar = example_grammar();
    let input = word("which human did the greyhound see");

    let trees = grammar.parse(&input);
    assert!(!trees.is_empty());

    for tree in &trees {
        assert_eq!(root_head(tree), "S");
        // the auxiliary heads the first tree-order child of the root but
        // surfaces in the middle of the yield
        assert_eq!(root_head(&tree.children[0]), "Aux");
        assert_eq!(tree.word_yield(), input.iter().collect::<Vec<_>>());
    }
}

#[test]
fn test_parse_pp_attachment_is_ambiguous() {
    let grammar = example_grammar();
    let input = word("the human saw the greyhound with the salmon");

    let trees = grammar.parse(&input);
    assert_eq!(trees.len(), 2);

    // one reading attaches the PP to the VP, the other to the object NP
    let renderings: BTreeSet<String> = trees.iter().map(|tree| tree.to_string()).collect();
    assert!(renderings
        .iter()
        .any(|tree| tree.contains("(VP (VP (Vpres saw)")));
    assert!(renderings
        .iter()
        .any(|tree| tree.contains("(NP (NP (D the) (N greyhound)) (PP")));

    for tree in &trees {
        assert_eq!(tree.word_yield(), input.iter().collect::<Vec<_>>());
    }
}

#[test]
fn test_parse_ungrammatical_yields_empty_set() {
    let grammar = example_grammar();

    assert!(grammar.parse(&word("the the greyhound")).is_empty());
    assert!(grammar.parse(&word("saw")).is_empty());
}

#[test]
fn test_parse_is_idempotent() {
    let grammar = example_grammar();
    let input = word("the human saw the greyhound with the salmon");

    let parser = AgendaParser::new();
    let first = parser.parse(&grammar, &input).unwrap();
    let second = parser.parse(&grammar, &input).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_chart_is_saturated() {
    use mcfg_parser::grammars::mcfg::Span;
    use mcfg_parser::recognisable::Item;
    use mcfg_parser::util::cartesian_product;

    let grammar = example_grammar();
    let input = word("the human saw the greyhound");
    let chart = AgendaParser::new().fill_chart(&grammar, &input).unwrap();

    // every item was deduced somehow
    for id in 0..chart.len() {
        assert!(!chart.backpointers(id).is_empty(), "{}", chart.get(id));
    }

    // and no rule application over chart items leads out of the chart
    for rule in grammar.rules() {
        if rule.is_terminal() {
            continue;
        }
        let candidates: Vec<Vec<usize>> = rule
            .tail
            .iter()
            .map(|nonterminal| chart.items_with_head(nonterminal).to_vec())
            .collect();
        for children in cartesian_product(&candidates) {
            let spans: Vec<&[Span]> = children
                .iter()
                .map(|&id| chart.get(id).spans.as_slice())
                .collect();
            if let Some(spans) = rule.instantiate(&spans) {
                assert!(chart.contains(&Item::new(rule.head.clone(), spans)));
            }
        }
    }
}

#[test]
fn test_grammar_level_rules() {
    use mcfg_parser::grammars::mcfg::McfgRule;

    assert!("S(uu) -> NP(u)".parse::<McfgRule<String, String>>().is_err());
    assert!("S(uv) -> NP(u)".parse::<McfgRule<String, String>>().is_err());
    assert!("S(u) -> NP(u)".parse::<McfgRule<String, String>>().is_ok());
}
