use super::*;

fn label(node: &Node) -> String {
    match &node.kind {
        Kind::Root => "root".to_string(),
        Kind::Block(name) => name
            .as_str()
            .to_string(),
        Kind::Comment(_) => "#comment".to_string(),
        Kind::Citation(_) => "#citation".to_string(),
        Kind::Embedded(_) => "#xml".to_string(),
    }
}

fn children(document: &Document, id: NodeId) -> Vec<String> {
    document
        .children(id)
        .map(label)
        .collect()
}

fn child(document: &Document, id: NodeId, i: usize) -> NodeId {
    document
        .node(id)
        .children()[i]
}

fn text_of(document: &Document, id: NodeId) -> Option<Vec<Inline>> {
    document
        .node(id)
        .content
        .as_ref()
        .map(|flow| {
            flow.items()
                .to_vec()
        })
}

fn text(s: &str) -> Inline {
    Inline::Text(s.to_string())
}

#[test]
fn declaration_required() {
    assert_eq!(parse(""), Err(ParsingError::InvalidDeclaration(1)));
    assert_eq!(parse("hello"), Err(ParsingError::InvalidDeclaration(1)));
    assert_eq!(parse("sam:{}\n"), Err(ParsingError::InvalidDeclaration(1)));

    let document = parse("sam:\n").unwrap();
    assert_eq!(document.len(), 1);
    assert_eq!(document.namespace, None);
    assert_eq!(document.schema, None);
}

#[test]
fn declaration_details() {
    let document = parse("sam:{http://example.com/ns}\n").unwrap();
    assert_eq!(document.namespace, Some("http://example.com/ns".to_string()));

    let document = parse("sam: article.rng\n").unwrap();
    assert_eq!(document.schema, Some("article.rng".to_string()));
}

#[test]
fn blocks_nest_by_indent() {
    let document = parse(
        "sam:\nsection: Title\n    Some text.\n\n    sub: thing\nnext: x\n",
    )
    .unwrap();

    assert_eq!(children(&document, NodeId::ROOT), vec!["section", "next"]);

    let section = child(&document, NodeId::ROOT, 0);
    assert_eq!(children(&document, section), vec!["p", "sub"]);
    assert_eq!(text_of(&document, section), Some(vec![text("Title")]));

    let p = child(&document, section, 0);
    assert_eq!(text_of(&document, p), Some(vec![text("Some text.")]));
}

#[test]
fn block_attributes() {
    let document = parse("sam:\nnote:(*n1 ?web) Careful\n").unwrap();
    let note = document.node(child(&document, NodeId::ROOT, 0));
    assert_eq!(note.attributes.get("id"), Some(&"n1".to_string()));
    assert_eq!(note.attributes.get("conditions"), Some(&"web".to_string()));

    assert_eq!(
        parse("sam:\nnote:(bogus) x\n"),
        Err(ParsingError::UnexpectedAttribute(2, "bogus".to_string()))
    );
}

#[test]
fn paragraphs_join_lines() {
    let document = parse("sam:\nOne line\n  and another.\n\nSecond.\n").unwrap();
    assert_eq!(children(&document, NodeId::ROOT), vec!["p", "p"]);

    let first = child(&document, NodeId::ROOT, 0);
    assert_eq!(
        text_of(&document, first),
        Some(vec![text("One line and another.")])
    );
}

#[test]
fn paragraph_ends_at_shallower_line() {
    let document = parse("sam:\nsection: A\n    para text\nnext: B\n").unwrap();
    assert_eq!(children(&document, NodeId::ROOT), vec!["section", "next"]);

    let section = child(&document, NodeId::ROOT, 0);
    assert_eq!(children(&document, section), vec!["p"]);
    assert_eq!(
        text_of(&document, child(&document, section, 0)),
        Some(vec![text("para text")])
    );
}

#[test]
fn paragraphs_cannot_have_children() {
    assert_eq!(
        parse("sam:\nA paragraph.\n\n    nested: no\n"),
        Err(ParsingError::ParagraphChildren(4))
    );
}

#[test]
fn lists() {
    let document = parse("sam:\n* one\n* two\n\n1. first\n").unwrap();
    assert_eq!(children(&document, NodeId::ROOT), vec!["ul", "ol"]);

    let ul = child(&document, NodeId::ROOT, 0);
    assert_eq!(children(&document, ul), vec!["li", "li"]);

    let li = child(&document, ul, 0);
    assert_eq!(children(&document, li), vec!["p"]);
    assert_eq!(
        text_of(&document, child(&document, li, 0)),
        Some(vec![text("one")])
    );
}

#[test]
fn list_item_ends_paragraph() {
    let document = parse("sam:\nIntroduction\n* item\n").unwrap();
    assert_eq!(children(&document, NodeId::ROOT), vec!["p", "ul"]);
}

#[test]
fn list_item_attributes() {
    let document = parse("sam:\n* (*first) one\n").unwrap();
    let ul = child(&document, NodeId::ROOT, 0);
    let li = document.node(child(&document, ul, 0));
    assert_eq!(li.attributes.get("id"), Some(&"first".to_string()));
}

#[test]
fn labeled_lists() {
    let document = parse("sam:\n|Term| The definition.\n").unwrap();
    let ll = child(&document, NodeId::ROOT, 0);
    assert_eq!(label(document.node(ll)), "ll");

    let li = child(&document, ll, 0);
    assert_eq!(children(&document, li), vec!["label", "p"]);
    assert_eq!(
        text_of(&document, child(&document, li, 0)),
        Some(vec![text("Term")])
    );
}

#[test]
fn nested_list_content() {
    let document = parse("sam:\n* outer\n\n  More about outer.\n\n  * inner\n").unwrap();
    let ul = child(&document, NodeId::ROOT, 0);
    let li = child(&document, ul, 0);
    assert_eq!(children(&document, li), vec!["p", "p", "ul"]);
}

#[test]
fn code_blocks() {
    let document = parse("sam:\n  ```(python)\n  def f():\n      return 1\n  ```\n").unwrap();
    let block = document.node(child(&document, NodeId::ROOT, 0));

    assert_eq!(label(block), "codeblock");
    assert_eq!(block.attributes.get("language"), Some(&"python".to_string()));

    let content = block
        .content
        .as_ref()
        .unwrap();
    assert!(content.is_preformatted());
    assert_eq!(
        content.items(),
        &[text("def f():\n    return 1\n")]
    );
}

#[test]
fn code_block_markup_is_literal() {
    let document = parse("sam:\n```\n*not bold* {x}\n\n# not a comment\n```\n").unwrap();
    let block = document.node(child(&document, NodeId::ROOT, 0));
    assert_eq!(
        block
            .content
            .as_ref()
            .unwrap()
            .items(),
        &[text("*not bold* {x}\n\n# not a comment\n")]
    );
}

#[test]
fn code_block_metadata() {
    let document = parse("sam:\n```(rust \"main.rs\" (urn:code) *listing)\nfn main() {}\n```\n").unwrap();
    let block = document.node(child(&document, NodeId::ROOT, 0));
    assert_eq!(block.attributes.get("language"), Some(&"rust".to_string()));
    assert_eq!(block.attributes.get("source"), Some(&"main.rs".to_string()));
    assert_eq!(block.attributes.get("id"), Some(&"listing".to_string()));
    assert_eq!(block.namespace, Some("urn:code".to_string()));
}

#[test]
fn code_blocks_take_no_children() {
    let document = parse("sam:\n```(python)\nx = 1\n```\n    after\n").unwrap();
    assert_eq!(children(&document, NodeId::ROOT), vec!["codeblock", "p"]);

    let block = child(&document, NodeId::ROOT, 0);
    assert!(document
        .node(block)
        .children()
        .is_empty());
}

#[test]
fn unclosed_code_block() {
    assert_eq!(
        parse("sam:\n```(python)\nprint(1)\n"),
        Err(ParsingError::UnexpectedEndOfInput(2, "code block"))
    );
}

#[test]
fn records() {
    let document = parse("sam:\npeople:: name, age\n    Ann, 30\n    Bob, 25\n\nafter: x\n").unwrap();
    assert_eq!(children(&document, NodeId::ROOT), vec!["people", "after"]);

    let people = child(&document, NodeId::ROOT, 0);
    assert_eq!(children(&document, people), vec!["record", "record"]);

    let record = child(&document, people, 1);
    assert_eq!(children(&document, record), vec!["name", "age"]);
    assert_eq!(
        text_of(&document, child(&document, record, 0)),
        Some(vec![text("Bob")])
    );
}

#[test]
fn record_escaped_commas() {
    let document = parse("sam:\nplaces:: place, note\n    Paris, big\\, old\n").unwrap();
    let places = child(&document, NodeId::ROOT, 0);
    let record = child(&document, places, 0);
    assert_eq!(
        text_of(&document, child(&document, record, 1)),
        Some(vec![text("big, old")])
    );
}

#[test]
fn record_field_count() {
    assert_eq!(
        parse("sam:\npeople:: name, age\n    Ann, 30, extra\n"),
        Err(ParsingError::FieldCount(3, 2, 3))
    );
}

#[test]
fn embedded_xml() {
    let document = parse("sam:\n<?xml version=\"1.0\"?>\n<a>\n  <b/>\n</a>\nAfter.\n").unwrap();
    assert_eq!(children(&document, NodeId::ROOT), vec!["#xml", "p"]);

    let island = document.node(child(&document, NodeId::ROOT, 0));
    assert_eq!(island.kind, Kind::Embedded("<a>\n  <b/>\n</a>".to_string()));
}

#[test]
fn embedded_xml_takes_no_children() {
    let document = parse(
        "sam:\n<?xml version=\"1.0\"?>\n<svg><rect/></svg>\n    Indented text after the island.\n",
    )
    .unwrap();
    assert_eq!(children(&document, NodeId::ROOT), vec!["#xml", "p"]);

    let island = child(&document, NodeId::ROOT, 0);
    assert!(document
        .node(island)
        .children()
        .is_empty());
    assert_eq!(
        text_of(&document, child(&document, NodeId::ROOT, 1)),
        Some(vec![text("Indented text after the island.")])
    );
}

#[test]
fn embedded_xml_problems() {
    assert_eq!(
        parse("sam:\n<?xml version=\"1.1\"?>\n<a/>\n"),
        Err(ParsingError::EmbeddedVersion(2, "1.1".to_string()))
    );
    assert_eq!(
        parse("sam:\n<?xml version=\"1.0\" encoding=\"latin-1\"?>\n<a/>\n"),
        Err(ParsingError::EmbeddedEncoding(2, "latin-1".to_string()))
    );
    assert!(matches!(
        parse("sam:\n<?xml version=\"1.0\"?>\n<a></b>\n"),
        Err(ParsingError::EmbeddedMalformed(3, _))
    ));
    assert_eq!(
        parse("sam:\n<?xml version=\"1.0\"?>\n<a>\n"),
        Err(ParsingError::UnexpectedEndOfInput(2, "embedded XML"))
    );
}

#[test]
fn comments_do_not_move_current() {
    let document = parse("sam:\nsection:\n    # a note\n    Body text.\n").unwrap();
    let section = child(&document, NodeId::ROOT, 0);
    assert_eq!(children(&document, section), vec!["#comment", "p"]);
    assert_eq!(
        document
            .node(child(&document, section, 0))
            .kind,
        Kind::Comment("a note".to_string())
    );
}

#[test]
fn blockquotes() {
    let document = parse("sam:\n\"\"\"[*source]\n    Quoted text.\n").unwrap();
    let quote = child(&document, NodeId::ROOT, 0);
    assert_eq!(label(document.node(quote)), "blockquote");
    assert_eq!(children(&document, quote), vec!["#citation", "p"]);

    assert_eq!(
        parse("sam:\n\"\"\"[*source] trailing\n"),
        Err(ParsingError::ExtraText(2, "trailing".to_string()))
    );
}

#[test]
fn single_line_constructs() {
    let document = parse(
        "sam:\n$version = 1.2\n| A line  of verse\n>>>(image.png *logo)\n~~~(*boiler)\n",
    )
    .unwrap();
    assert_eq!(
        children(&document, NodeId::ROOT),
        vec!["string", "line", "insert", "fragment"]
    );

    let string = document.node(child(&document, NodeId::ROOT, 0));
    assert_eq!(string.attributes.get("name"), Some(&"version".to_string()));

    let line = child(&document, NodeId::ROOT, 1);
    assert_eq!(
        text_of(&document, line),
        Some(vec![text("A line  of verse")])
    );

    let insert = document.node(child(&document, NodeId::ROOT, 2));
    assert_eq!(insert.attributes.get("type"), Some(&"other".to_string()));
    assert_eq!(insert.attributes.get("item"), Some(&"image.png".to_string()));
    assert_eq!(insert.attributes.get("id"), Some(&"logo".to_string()));
}

#[test]
fn identifiers_are_unique() {
    assert_eq!(
        parse("sam:\na:(*x) one\nb:(*x) two\n"),
        Err(ParsingError::DuplicateId(3, "x".to_string()))
    );
    assert_eq!(
        parse("sam:\na:(#x) one\n* (#x) two\n"),
        Err(ParsingError::DuplicateName(3, "x".to_string()))
    );
}

#[test]
fn annotations_recalled_across_blocks() {
    let document = parse("sam:\n{SAM}(language) is a markup.\n\nAgain {SAM}.\n").unwrap();
    let second = child(&document, NodeId::ROOT, 1);
    assert_eq!(
        text_of(&document, second),
        Some(vec![
            text("Again "),
            Inline::Annotation(Annotation {
                kind: "language".to_string(),
                text: "SAM".to_string(),
                specifically: None,
                namespace: None,
            }),
            text("."),
        ])
    );

    assert_eq!(
        parse("sam:\nAgain {SAM}.\n"),
        Err(ParsingError::UnresolvedAnnotation(2, "SAM".to_string()))
    );
}

#[test]
fn invalid_element_names() {
    assert_eq!(
        parse("sam:\n9lives: cat\n"),
        Err(ParsingError::InvalidName(2, "9lives".to_string()))
    );
}

#[test]
fn splitting_fields() {
    assert_eq!(split_fields("a, b ,c"), vec!["a", "b", "c"]);
    assert_eq!(split_fields(r"a\, b, c"), vec![r"a\, b", "c"]);
    assert_eq!(split_fields(""), vec![""]);
}
