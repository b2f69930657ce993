use super::*;
use pretty_assertions::assert_eq;

#[test]
fn identity() {
    let tree = run_test("{{Pyro}}");
    assert_eq!(kinds(tree.root()), [NodeKind::Template]);
    let Node::Template { name, parameters } = &tree.root()[0].node else {
        panic!("expected a template");
    };
    assert_eq!(helpers::raw(tree.source(), name), "Pyro");
    assert!(parameters.is_empty());
}

#[test]
fn nesting() {
    let tree = run_test("{{Outer|{{Inner}}}}");
    assert_eq!(kinds(tree.root()), [NodeKind::Template]);
    let Node::Template { name, parameters } = &tree.root()[0].node else {
        panic!("expected a template");
    };
    assert_eq!(helpers::raw(tree.source(), name), "Outer");
    assert_eq!(parameters.len(), 1);
    assert!(!parameters[0].is_named());
    assert_eq!(kinds(parameters[0].value()), [NodeKind::Template]);

    let Node::Template { name, .. } = &parameters[0].value()[0].node else {
        panic!("expected a nested template");
    };
    assert_eq!(helpers::raw(tree.source(), name), "Inner");
}

#[test]
fn named_and_positional() {
    let tree = run_test("{{Card|Dandelion Wine|type=Drink|3}}");
    let templates = helpers::templates(&tree);
    assert_eq!(templates.len(), 1);
    let card = &templates[0];
    assert_eq!(card.parameters.len(), 3);
    assert!(!card.parameters[0].is_named());
    assert!(card.parameters[1].is_named());
    assert!(!card.parameters[2].is_named());
    assert_eq!(card.value("1"), Some("Dandelion Wine"));
    assert_eq!(card.value("type"), Some("Drink"));
    assert_eq!(card.value("2"), Some("3"));
}

#[test]
fn whitespace_survives() {
    let tree = run_test("{{a | b = http://www.example.com/ | c = d}}");
    let Node::Template { parameters, .. } = &tree.root()[0].node else {
        panic!("expected a template");
    };
    let source = tree.source();
    assert_eq!(
        helpers::raw(source, parameters[0].name().unwrap()),
        " b "
    );
    assert_eq!(
        helpers::raw(source, parameters[0].value()),
        " http://www.example.com/ "
    );
}

#[test]
fn first_equals_splits() {
    let tree = run_test("{{T|a=b=c}}");
    let Node::Template { parameters, .. } = &tree.root()[0].node else {
        panic!("expected a template");
    };
    let source = tree.source();
    assert_eq!(helpers::raw(source, parameters[0].name().unwrap()), "a");
    assert_eq!(helpers::raw(source, parameters[0].value()), "b=c");
    assert_eq!(helpers::raw(source, parameters[0].combined()), "a=b=c");
}

#[test]
fn empty_key() {
    let tree = run_test("{{T|=empty key}}");
    let Node::Template { parameters, .. } = &tree.root()[0].node else {
        panic!("expected a template");
    };
    assert!(parameters[0].is_named());
    assert!(parameters[0].name().unwrap().is_empty());
    assert_eq!(helpers::raw(tree.source(), parameters[0].value()), "empty key");
}

#[test]
fn empty_positional_parameters() {
    let tree = run_test("{{T||b}}");
    let templates = helpers::templates(&tree);
    assert_eq!(templates[0].parameters.len(), 2);
    assert_eq!(templates[0].value("1"), Some(""));
    assert_eq!(templates[0].value("2"), Some("b"));
}

#[test]
fn parser_function_condition_stays_in_name() {
    let tree = run_test("{{ #if : thing|foo|bar}}");
    let templates = helpers::templates(&tree);
    assert_eq!(templates[0].name_raw(), " #if : thing");
    assert_eq!(templates[0].value("1"), Some("foo"));
    assert_eq!(templates[0].value("2"), Some("bar"));
}

#[test]
fn subst_and_namespace_prefixes_stay_in_name() {
    let tree = run_test("{{subst:Stub}}");
    assert_eq!(helpers::templates(&tree)[0].name_raw(), "subst:Stub");

    let tree = run_test("{{ns:4}}");
    assert_eq!(helpers::templates(&tree)[0].name_raw(), "ns:4");
}

#[test]
fn magic_tokens_are_zero_parameter_calls() {
    for (input, name) in [("{{!}}", "!"), ("{{=}}", "=")] {
        let tree = run_test(input);
        let templates = helpers::templates(&tree);
        assert_eq!(templates[0].name_raw(), name);
        assert!(templates[0].parameters.is_empty());
    }
}

#[test]
fn comment_in_name() {
    let tree = run_test("{{T<!--c-->|a}}");
    let Node::Template { name, .. } = &tree.root()[0].node else {
        panic!("expected a template");
    };
    assert_eq!(kinds(name), [NodeKind::Text, NodeKind::Comment]);
}

#[test]
fn comment_in_parameter() {
    let tree = run_test("{{T|a<!--note-->|b}}");
    let Node::Template { parameters, .. } = &tree.root()[0].node else {
        panic!("expected a template");
    };
    assert_eq!(
        kinds(&parameters[0].content),
        [NodeKind::Text, NodeKind::Comment]
    );
}

#[test]
fn missing_parameter_lookups() {
    let tree = run_test("{{Other Languages|en=Dandelion Wine|2nd|extra = spaced }}");
    let templates = helpers::templates(&tree);
    let call = &templates[0];
    assert_eq!(call.value("en"), Some("Dandelion Wine"));
    assert_eq!(call.value("1"), Some("2nd"));
    assert_eq!(call.value("extra"), Some("spaced"));
    assert!(call.parameter("missing").is_none());
    assert!(call.parameter("2").is_none());
}

#[test]
fn templates_named_matches_nested_calls_case_insensitively() {
    let tree = run_test("{{Hydro}} and {{hydro}} and {{Pyro|{{Hydro}}}}");
    assert_eq!(helpers::templates_named(&tree, "Hydro").len(), 3);
    assert_eq!(helpers::templates_named(&tree, "pyro").len(), 1);
    assert_eq!(helpers::templates(&tree).len(), 4);
}

#[test]
fn depth_cap_degrades_to_text() {
    let config = Configuration {
        max_depth: 2,
        ..Configuration::DEFAULT
    };
    let tree = Parser::new(&config).parse("{{a|{{b|{{c}}}}}}");
    assert_round_trip(&tree);
    assert_eq!(helpers::templates(&tree).len(), 2);
}

#[test]
fn deep_nesting_is_capped() {
    let mut input = "{{a|".repeat(50);
    input.push('x');
    input.push_str(&"}}".repeat(50));
    let tree = run_test(&input);
    assert_eq!(helpers::templates(&tree).len(), crate::config::MAX_DEPTH);
}
