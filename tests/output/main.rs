use sam::output::{serialize, to_string, OutputError};
use sam::parsing::parse;

fn compile(source: &str) -> String {
    let document = parse(source).unwrap();
    to_string(&document)
}

#[test]
fn complete_document() {
    let xml = compile(
        r#"
sam:
article:(*top) A Short Article
    An opening paragraph with *emphasis*.

    * first point
    * second point

    ```(shell)
    ls -l > out.txt
    ```
        "#
        .trim_ascii(),
    );

    assert_eq!(
        xml,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<sam>
<article id="top"><title>A Short Article</title>
<p>An opening paragraph with <decoration type="bold">emphasis</decoration>.</p>
<ul>
<li>
<p>first point</p>
</li>
<li>
<p>second point</p>
</li>
</ul>
<codeblock language="shell"><![CDATA[ls -l > out.txt
]]></codeblock>
</article>
</sam>
"#
    );
}

#[test]
fn one_root_element() {
    let xml = compile("sam:\nfirst: a\nsecond: b\n");
    let body = xml
        .lines()
        .skip(1)
        .collect::<Vec<_>>();
    assert_eq!(body.first(), Some(&"<sam>"));
    assert_eq!(body.last(), Some(&"</sam>"));
    assert_eq!(
        body.iter()
            .filter(|line| **line == "<sam>")
            .count(),
        1
    );
}

#[test]
fn code_kept_verbatim() {
    let xml = compile(
        r#"
sam:
```(python)
x = "*not bold*"   # {not an annotation}
```
        "#
        .trim_ascii(),
    );
    assert!(xml.contains(
        "<![CDATA[x = \"*not bold*\"   # {not an annotation}\n]]>"
    ));
}

#[test]
fn text_after_embedded_xml_kept() {
    let xml = compile(
        "sam:\n<?xml version=\"1.0\"?>\n<svg><rect/></svg>\n    Indented text after the island.\n",
    );
    assert!(xml.contains("<svg><rect/></svg>\n<p>Indented text after the island.</p>\n</sam>\n"));
}

#[test]
fn records_serialized() {
    let xml = compile(
        r#"
sam:
people:: name, age
    Ann, 30
        "#
        .trim_ascii(),
    );
    assert!(xml.contains(
        "<people>\n<record>\n<name>Ann</name>\n<age>30</age>\n</record>\n</people>\n"
    ));
}

#[test]
fn labeled_list_serialized() {
    let xml = compile("sam:\n|SAM| Semantic Authoring Markdown\n");
    assert!(xml.contains(
        "<ll>\n<li>\n<label>SAM</label>\n<p>Semantic Authoring Markdown</p>\n</li>\n</ll>\n"
    ));
}

#[test]
fn blockquote_citation() {
    let xml = compile(
        r#"
sam:
"""[Hamlet, Act 3]
    To be, or not to be.
        "#
        .trim_ascii(),
    );
    assert!(xml.contains(
        "<blockquote>\n<citation>Hamlet, Act 3</citation>\n<p>To be, or not to be.</p>\n</blockquote>\n"
    ));
}

#[test]
fn attribute_values_escaped() {
    let xml = compile("sam:\nSee {the docs}(link \"a&b\").\n");
    assert!(xml.contains(
        "<annotation specifically=\"a&amp;b\" type=\"link\">the docs</annotation>"
    ));
}

#[test]
fn only_xml_is_supported() {
    let document = parse("sam:\n").unwrap();
    match serialize(&document, "html") {
        Err(error) => {
            assert_eq!(error, OutputError::UnknownFormat("html".to_string()));
            assert_eq!(error.to_string(), "unknown output format 'html'");
        }
        Ok(_) => panic!("html should not be accepted"),
    }
}
