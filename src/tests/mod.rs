use super::*;
use crate::{helpers, inspectors};

mod templates;

/// Parses `input`, dumps the tree when debug logging is enabled, and checks
/// the round-trip law before handing the tree back for further assertions.
#[track_caller]
fn run_test(input: &str) -> Tree<'_> {
    let _ = env_logger::try_init();
    let tree = parse(input);
    log::debug!(
        "{:#?}",
        inspectors::inspect(&FileMap::new(input), tree.root())
    );
    assert_round_trip(&tree);
    tree
}

/// Checks `serialize(parse(s)) == s`, in aggregate and node by node.
#[track_caller]
fn assert_round_trip(tree: &Tree<'_>) {
    pretty_assertions::assert_eq!(tree.serialize(), tree.source());
    for node in tree.root() {
        assert_node_round_trip(tree, node);
    }
}

/// Checks that every node in a subtree serializes to exactly the source
/// text its span covers.
#[track_caller]
fn assert_node_round_trip(tree: &Tree<'_>, node: &Spanned<Node>) {
    let mut out = String::new();
    tree.serialize_node(node, &mut out).unwrap();
    pretty_assertions::assert_eq!(out, tree.raw(node.span));

    match &node.node {
        Node::Template { name, parameters } => {
            for node in name {
                assert_node_round_trip(tree, node);
            }
            for parameter in parameters {
                for node in &parameter.content {
                    assert_node_round_trip(tree, node);
                }
            }
        }
        Node::Link { target, segments } => {
            for node in target {
                assert_node_round_trip(tree, node);
            }
            for segment in segments {
                for node in &segment.content {
                    assert_node_round_trip(tree, node);
                }
            }
        }
        _ => {}
    }
}

/// The kind of every node in a list, for shape assertions.
fn kinds(nodes: &[Spanned<Node>]) -> Vec<NodeKind> {
    nodes.iter().map(|node| node.kind()).collect()
}

/// Dialect samples in the shape of real wiki pages. Every one must survive
/// the round trip byte for byte.
const CORPUS: &[&str] = &[
    "",
    "plain paragraph text\nwith a newline",
    "'''bold''' and ''italic'' are inert here",
    "{{Pyro}}",
    "{{Hydro|nobg=1}}",
    "{{Other Languages|en=Dandelion Wine|zhs=蒲公英酒|zht=蒲公英酒|ja=タンポポのお酒}}",
    "{{Quote|I never dream.|Diluc}}",
    "{{About|the wine|the flower|Dandelion}}",
    "{{ #if : thing|foo|bar}}",
    "{{#if: {{{1|}}}|yes|no}}",
    "{{#DPL:\n|category = Chapters\n|mode = userformat\n}}",
    "{{subst:Stub}}",
    "{{ns:4}}",
    "{{!}}",
    "{{=}}",
    "{{color|#FFD780FF|gold text}}",
    "{{Outer|{{Inner}}}}",
    "{{Outer|key={{Inner|1}}}}",
    "{{T||b}}",
    "{{T|v|}}",
    "{{T|=empty key}}",
    "{{T|a=1|a=2}}",
    "{{a | b = http://www.example.com/ | c = d}}",
    "{{a|[[b|alt=]]}}",
    "{{a|https://example.com|c=d e}}",
    "{{Icon|[[File:Icon.png|20px]]|text}}",
    "{{Character Infobox\n|image = Char.png\n|element = Anemo\n}}",
    "{{Recipe\n|Flour = 4\n|Dandelion Seed = 3\n<!--|Sugar = 1-->\n}}",
    "{{Dialogue Start}}\n:'''Paimon:''' Hello!\n{{Dialogue End}}",
    "[[Mondstadt]]",
    "[[Dandelion Wine|the wine]]",
    "[[Category:Food]]",
    "[[File:Item Dandelion Seed.png|20px|link=Dandelion Seed]]",
    "[[Link|a|b=c|d=e=f]]mazing",
    "[https://genshin.hoyoverse.com/ Official Site]",
    "[//example.com protocol relative]",
    "a<!--c-->b",
    "<!-- standalone -->",
    "<nowiki>{{raw|x=1}}</nowiki>",
    "<pre>{{also raw}}</pre>",
    "<NOWIKI>case</nowiki >",
    "<nowiki/>",
    "text {{unterminated",
    "[[unclosed",
    "[unclosed",
    "lone { brace and [ bracket",
    "stray closers }} ]] ] = |",
];

#[test]
fn corpus_round_trip() {
    for input in CORPUS {
        run_test(input);
    }
}
