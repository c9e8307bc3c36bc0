use sam::language::*;
use sam::parsing::parse;

fn names(document: &Document, id: NodeId) -> Vec<&str> {
    document
        .children(id)
        .map(|node| node.name().unwrap_or("#"))
        .collect()
}

fn nth(document: &Document, id: NodeId, i: usize) -> NodeId {
    document
        .node(id)
        .children()[i]
}

#[test]
fn placement_by_indentation() {
    let document = parse(
        r#"
sam:
a:
  b: one
  c: two
d:
    e: three
        "#
        .trim_ascii(),
    )
    .unwrap();

    assert_eq!(names(&document, NodeId::ROOT), vec!["a", "d"]);
    assert_eq!(names(&document, nth(&document, NodeId::ROOT, 0)), vec!["b", "c"]);
    assert_eq!(names(&document, nth(&document, NodeId::ROOT, 1)), vec!["e"]);
}

#[test]
fn dedent_finds_the_right_ancestor() {
    let document = parse(
        r#"
sam:
chapter:
    section:
        subsection:
            detail: deep
    another: back at section level
        "#
        .trim_ascii(),
    )
    .unwrap();

    let chapter = nth(&document, NodeId::ROOT, 0);
    assert_eq!(names(&document, chapter), vec!["section", "another"]);
}

#[test]
fn literal_asterisk_and_bold() {
    let document = parse("sam:\n2 \\* 3 is *six*\n").unwrap();
    let p = document.node(nth(&document, NodeId::ROOT, 0));
    let content = p
        .content
        .as_ref()
        .unwrap();

    assert_eq!(
        content.items(),
        &[
            Inline::Text("2 * 3 is ".to_string()),
            Inline::Decoration(Decoration {
                kind: DecorationKind::Bold,
                text: "six".to_string(),
            }),
        ]
    );
}

#[test]
fn records_become_elements() {
    let document = parse(
        r#"
sam:
people:: name, age
    Ann, 30
        "#
        .trim_ascii(),
    )
    .unwrap();

    let people = nth(&document, NodeId::ROOT, 0);
    let record = nth(&document, people, 0);
    assert_eq!(names(&document, record), vec!["name", "age"]);

    let values: Vec<_> = document
        .children(record)
        .map(|node| {
            node.content
                .as_ref()
                .unwrap()
                .items()
                .to_vec()
        })
        .collect();
    assert_eq!(
        values,
        vec![
            vec![Inline::Text("Ann".to_string())],
            vec![Inline::Text("30".to_string())]
        ]
    );
}

#[test]
fn record_set_ends_at_shallower_line() {
    let document = parse(
        r#"
sam:
section: S
    people:: name, age
        Ann, 30
after: x
        "#
        .trim_ascii(),
    )
    .unwrap();

    assert_eq!(names(&document, NodeId::ROOT), vec!["section", "after"]);

    let section = nth(&document, NodeId::ROOT, 0);
    assert_eq!(names(&document, section), vec!["people"]);

    let people = nth(&document, section, 0);
    assert_eq!(names(&document, people), vec!["record"]);
}

#[test]
fn lists_inside_blocks() {
    let document = parse(
        r#"
sam:
steps:
    1. Boil water
    2. Add coffee
       Stir gently.

    Serve.
        "#
        .trim_ascii(),
    )
    .unwrap();

    let steps = nth(&document, NodeId::ROOT, 0);
    assert_eq!(names(&document, steps), vec!["ol", "p"]);

    let ol = nth(&document, steps, 0);
    assert_eq!(names(&document, ol), vec!["li", "li"]);

    let second = nth(&document, ol, 1);
    let p = document.node(nth(&document, second, 0));
    assert_eq!(
        p.content
            .as_ref()
            .unwrap()
            .items(),
        &[Inline::Text("Add coffee Stir gently.".to_string())]
    );
}

#[test]
fn reverse_order_for_history() {
    let document = parse(
        r#"
sam:
first: {A}(alpha)
second: {B}(beta)
        "#
        .trim_ascii(),
    )
    .unwrap();

    let order: Vec<_> = document
        .reversed()
        .filter_map(|id| {
            document
                .node(id)
                .name()
        })
        .collect();
    assert_eq!(order, vec!["second", "first"]);
}

#[test]
fn namespaces_follow_explicit_declarations() {
    let document = parse(
        r#"
sam:{urn:doc}
outer:
    ```(xml (urn:other))
    <x/>
    ```
    inner: text
        "#
        .trim_ascii(),
    )
    .unwrap();

    let outer = nth(&document, NodeId::ROOT, 0);
    assert_eq!(
        document
            .node(outer)
            .namespace,
        Some("urn:doc".to_string())
    );

    let code = document.node(nth(&document, outer, 0));
    assert_eq!(code.namespace, Some("urn:other".to_string()));

    let inner = document.node(nth(&document, outer, 1));
    assert_eq!(inner.namespace, Some("urn:doc".to_string()));
}
