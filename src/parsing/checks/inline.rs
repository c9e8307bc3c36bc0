use super::*;

fn flow(text: &str) -> Vec<Inline> {
    let document = Document::new();
    parse(text, 1, &document)
        .unwrap()
        .items()
        .to_vec()
}

fn text(s: &str) -> Inline {
    Inline::Text(s.to_string())
}

fn decoration(kind: DecorationKind, s: &str) -> Inline {
    Inline::Decoration(Decoration {
        kind,
        text: s.to_string(),
    })
}

#[test]
fn plain_text() {
    assert_eq!(flow("Hello World"), vec![text("Hello World")]);
    assert_eq!(flow(""), vec![]);
}

#[test]
fn escaping() {
    assert_eq!(flow(r"2 \* 3"), vec![text("2 * 3")]);
    assert_eq!(flow(r"\{not\}"), vec![text("{not}")]);
    assert_eq!(flow(r"C:\temp"), vec![text(r"C:\temp")]);
    assert_eq!(flow(r"trailing\"), vec![text(r"trailing\")]);
    assert_eq!(flow(r"a\\b"), vec![text(r"a\b")]);
}

#[test]
fn decorations() {
    assert_eq!(flow("*bold*"), vec![decoration(DecorationKind::Bold, "bold")]);
    assert_eq!(
        flow("some _italic_ text"),
        vec![
            text("some "),
            decoration(DecorationKind::Italic, "italic"),
            text(" text")
        ]
    );
    assert_eq!(
        flow(r#"say "hello""#),
        vec![text("say "), decoration(DecorationKind::Quotes, "hello")]
    );
    assert_eq!(
        flow(r"*a\*b*"),
        vec![decoration(DecorationKind::Bold, "a*b")]
    );
}

#[test]
fn unmatched_sigils_are_literal() {
    assert_eq!(flow("2 * 3"), vec![text("2 * 3")]);
    assert_eq!(flow("**"), vec![text("**")]);
    assert_eq!(flow("a > b"), vec![text("a > b")]);
    assert_eq!(flow("open { brace"), vec![text("open { brace")]);
    assert_eq!(flow("[]"), vec![text("[]")]);
}

#[test]
fn inline_code() {
    assert_eq!(
        flow("run `ls -l` now"),
        vec![
            text("run "),
            decoration(DecorationKind::Mono, "ls -l"),
            text(" now")
        ]
    );
    assert_eq!(
        flow("`a``b`"),
        vec![decoration(DecorationKind::Mono, "a`b")]
    );
    assert_eq!(
        flow(r"`*not bold* \n`"),
        vec![decoration(DecorationKind::Mono, r"*not bold* \n")]
    );
}

#[test]
fn annotations() {
    assert_eq!(
        flow(r#"{Spain}(country "ES" (geo))"#),
        vec![Inline::Annotation(Annotation {
            kind: "country".to_string(),
            text: "Spain".to_string(),
            specifically: Some("ES".to_string()),
            namespace: Some("geo".to_string()),
        })]
    );

    assert_eq!(
        flow("{SAM}(language) and {SAM} again"),
        vec![
            Inline::Annotation(Annotation {
                kind: "language".to_string(),
                text: "SAM".to_string(),
                specifically: None,
                namespace: None,
            }),
            text(" and "),
            Inline::Annotation(Annotation {
                kind: "language".to_string(),
                text: "SAM".to_string(),
                specifically: None,
                namespace: None,
            }),
            text(" again"),
        ]
    );
}

#[test]
fn annotation_links() {
    assert_eq!(
        flow("{home page}(https://example.com/home)"),
        vec![Inline::Annotation(Annotation {
            kind: "link".to_string(),
            text: "home page".to_string(),
            specifically: Some("https://example.com/home".to_string()),
            namespace: None,
        })]
    );
}

#[test]
fn unresolved_annotation() {
    let document = Document::new();
    assert_eq!(
        parse("A {Y} here", 9, &document),
        Err(ParsingError::UnresolvedAnnotation(9, "Y".to_string()))
    );
}

#[test]
fn citations() {
    assert_eq!(
        flow("see [*intro chapter one]"),
        vec![
            text("see "),
            Inline::Citation(Citation {
                kind: CitationKind::IdRef,
                value: "intro".to_string(),
                extra: Some("chapter one".to_string()),
            })
        ]
    );
    assert_eq!(
        flow("[#overview]"),
        vec![Inline::Citation(Citation {
            kind: CitationKind::NameRef,
            value: "overview".to_string(),
            extra: None,
        })]
    );
    assert_eq!(
        flow("[Moby Dick, p. 12]"),
        vec![Inline::Citation(Citation {
            kind: CitationKind::Citation,
            value: "Moby Dick, p. 12".to_string(),
            extra: None,
        })]
    );
}

#[test]
fn inline_inserts() {
    assert_eq!(
        flow("Version >($version) now"),
        vec![
            text("Version "),
            Inline::Insert(Insert {
                kind: InsertKind::String,
                item: "version".to_string(),
                id: None,
                name: None,
                conditions: None,
            }),
            text(" now"),
        ]
    );

    let document = Document::new();
    assert_eq!(
        parse(">($version bogus)", 2, &document),
        Err(ParsingError::UnexpectedAttribute(2, "bogus".to_string()))
    );
}
