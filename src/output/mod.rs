//! Output generation: serializing a parsed Document as XML

use std::fmt;
use tracing::debug;

use crate::language::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputError {
    UnknownFormat(String),
}

impl OutputError {
    pub fn message(&self) -> String {
        match self {
            OutputError::UnknownFormat(format) => {
                format!("unknown output format '{}'", format)
            }
        }
    }
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Begin serializing the document in the named format. The returned
/// iterator does the work lazily, one chunk per node.
pub fn serialize<'d>(document: &'d Document, format: &str) -> Result<Chunks<'d>, OutputError> {
    match format {
        "xml" => {
            debug!("Serializing {} nodes as XML", document.len());
            Ok(Chunks::new(document))
        }
        _ => Err(OutputError::UnknownFormat(format.to_string())),
    }
}

/// Serialize the whole document to a single String.
pub fn to_string(document: &Document) -> String {
    Chunks::new(document).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Prolog,
    Body,
    Epilogue,
    Done,
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Open(NodeId),
    Close(NodeId),
}

/// Pieces of XML in document order. Walks the tree depth first with an
/// explicit stack of pending steps.
pub struct Chunks<'d> {
    document: &'d Document,
    phase: Phase,
    stack: Vec<Step>,
}

impl<'d> Chunks<'d> {
    fn new(document: &'d Document) -> Chunks<'d> {
        let stack = document
            .root()
            .children()
            .iter()
            .rev()
            .map(|id| Step::Open(*id))
            .collect();

        Chunks {
            document,
            phase: Phase::Prolog,
            stack,
        }
    }

    fn prolog(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        if let Some(schema) = &self
            .document
            .schema
        {
            out.push_str("<?xml-model href=\"");
            escape_attribute(&mut out, schema);
            out.push_str("\"?>\n");
        }
        out.push_str("<sam>\n");
        out
    }

    fn open(&mut self, id: NodeId) -> String {
        let document = self.document;
        let node = document.node(id);
        let mut out = String::new();

        match &node.kind {
            Kind::Root => {}
            Kind::Block(name) => {
                out.push('<');
                out.push_str(name.as_str());
                if let Some(namespace) = self.namespace_declaration(node) {
                    out.push_str(" xmlns=\"");
                    escape_attribute(&mut out, namespace);
                    out.push('"');
                }
                attributes(&mut out, &node.attributes);

                if node
                    .children()
                    .is_empty()
                {
                    match &node.content {
                        Some(content) if !content.is_empty() => {
                            out.push('>');
                            flow(&mut out, content);
                            out.push_str("</");
                            out.push_str(name.as_str());
                            out.push('>');
                        }
                        _ => out.push_str("/>"),
                    }
                } else {
                    out.push('>');
                    if let Some(content) = &node.content {
                        if !content.is_empty() {
                            out.push_str("<title>");
                            flow(&mut out, content);
                            out.push_str("</title>");
                        }
                    }

                    self.stack
                        .push(Step::Close(id));
                    self.stack
                        .extend(
                            node.children()
                                .iter()
                                .rev()
                                .map(|child| Step::Open(*child)),
                        );
                }
            }
            Kind::Comment(text) => {
                out.push_str("<!-- ");
                out.push_str(&comment(text));
                out.push_str(" -->");
            }
            Kind::Citation(value) => citation(&mut out, value),
            Kind::Embedded(text) => out.push_str(text),
        }

        out.push('\n');
        out
    }

    fn close(&self, id: NodeId) -> String {
        match self
            .document
            .node(id)
            .name()
        {
            Some(name) => format!("</{}>\n", name),
            None => String::new(),
        }
    }

    /// A block declares its namespace when it is top level or when it
    /// differs from the one its parent is in.
    fn namespace_declaration<'n>(&self, node: &'n Node) -> Option<&'n str> {
        let namespace = node
            .namespace
            .as_deref()?;

        match node.parent() {
            Some(parent) if parent != NodeId::ROOT => {
                let inherited = self
                    .document
                    .node(parent)
                    .namespace
                    .as_deref();
                if inherited == Some(namespace) {
                    None
                } else {
                    Some(namespace)
                }
            }
            _ => Some(namespace),
        }
    }
}

impl<'d> Iterator for Chunks<'d> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        match self.phase {
            Phase::Prolog => {
                self.phase = Phase::Body;
                Some(self.prolog())
            }
            Phase::Body => match self
                .stack
                .pop()
            {
                Some(Step::Open(id)) => Some(self.open(id)),
                Some(Step::Close(id)) => Some(self.close(id)),
                None => {
                    self.phase = Phase::Epilogue;
                    self.next()
                }
            },
            Phase::Epilogue => {
                self.phase = Phase::Done;
                Some("</sam>\n".to_string())
            }
            Phase::Done => None,
        }
    }
}

fn attributes(out: &mut String, attributes: &Attributes) {
    for (key, value) in attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        escape_attribute(out, value);
        out.push('"');
    }
}

fn flow(out: &mut String, flow: &Flow) {
    if flow.is_preformatted() {
        for item in flow.items() {
            if let Inline::Text(text) = item {
                cdata(out, text);
            }
        }
        return;
    }

    for item in flow.items() {
        match item {
            Inline::Text(text) => escape_text(out, text),
            Inline::Decoration(decoration) => {
                out.push_str("<decoration type=\"");
                out.push_str(
                    decoration
                        .kind
                        .as_str(),
                );
                out.push_str("\">");
                escape_text(out, &decoration.text);
                out.push_str("</decoration>");
            }
            Inline::Annotation(annotation) => {
                let mut map = Attributes::new();
                map.insert(
                    "type",
                    annotation
                        .kind
                        .clone(),
                );
                if let Some(specifically) = &annotation.specifically {
                    map.insert("specifically", specifically.clone());
                }
                if let Some(namespace) = &annotation.namespace {
                    map.insert("namespace", namespace.clone());
                }
                out.push_str("<annotation");
                attributes(out, &map);
                out.push('>');
                escape_text(out, &annotation.text);
                out.push_str("</annotation>");
            }
            Inline::Citation(value) => citation(out, value),
            Inline::Insert(insert) => {
                out.push_str("<insert");
                attributes(out, &insert.attributes());
                out.push_str("/>");
            }
        }
    }
}

fn citation(out: &mut String, citation: &Citation) {
    let (key, body) = match citation.kind {
        CitationKind::IdRef => (
            Some("idref"),
            citation
                .extra
                .as_deref(),
        ),
        CitationKind::NameRef => (
            Some("nameref"),
            citation
                .extra
                .as_deref(),
        ),
        CitationKind::Citation => (None, Some(citation.value.as_str())),
    };

    out.push_str("<citation");
    if let Some(key) = key {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        escape_attribute(out, &citation.value);
        out.push('"');
    }

    match body {
        Some(body) => {
            out.push('>');
            escape_text(out, body);
            out.push_str("</citation>");
        }
        None => out.push_str("/>"),
    }
}

fn escape_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attribute(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// A CDATA section cannot contain its own terminator, so `]]>` is split
/// across two sections.
fn cdata(out: &mut String, text: &str) {
    out.push_str("<![CDATA[");
    out.push_str(&text.replace("]]>", "]]]]><![CDATA[>"));
    out.push_str("]]>");
}

// "--" is not allowed inside an XML comment
fn comment(text: &str) -> String {
    let mut result = text.to_string();
    while result.contains("--") {
        result = result.replace("--", "- -");
    }
    result
}

#[cfg(test)]
mod check {
    use super::*;
    use crate::parsing::parse;

    fn render(source: &str) -> String {
        let document = parse(source).unwrap();
        to_string(&document)
    }

    #[test]
    fn empty_document() {
        assert_eq!(
            render("sam:\n"),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<sam>\n</sam>\n"
        );
    }

    #[test]
    fn schema_model() {
        assert_eq!(
            render("sam: article.rng\n"),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<?xml-model href=\"article.rng\"?>\n<sam>\n</sam>\n"
        );
    }

    #[test]
    fn unknown_format() {
        let document = Document::new();
        assert_eq!(
            serialize(&document, "json").err(),
            Some(OutputError::UnknownFormat("json".to_string()))
        );
        assert!(serialize(&document, "xml").is_ok());
    }

    #[test]
    fn blocks_and_titles() {
        let xml = render("sam:\nsection:(*s1) Intro\n    Hello & welcome.\n");
        assert!(xml.contains(
            "<section id=\"s1\"><title>Intro</title>\n<p>Hello &amp; welcome.</p>\n</section>\n"
        ));

        let xml = render("sam:\nempty:\nnote: Short\n");
        assert!(xml.contains("<empty/>\n<note>Short</note>\n"));
    }

    #[test]
    fn inline_elements() {
        let xml = render("sam:\nSome *bold* and {Spain}(country \"ES\") see [*intro p. 3]\n");
        assert!(xml.contains("<decoration type=\"bold\">bold</decoration>"));
        assert!(xml.contains(
            "<annotation specifically=\"ES\" type=\"country\">Spain</annotation>"
        ));
        assert!(xml.contains("<citation idref=\"intro\">p. 3</citation>"));

        let xml = render("sam:\nSee [Hamlet, Act 1] and [#overview] >($version)\n");
        assert!(xml.contains("<citation>Hamlet, Act 1</citation>"));
        assert!(xml.contains("<citation nameref=\"overview\"/>"));
        assert!(xml.contains("<insert item=\"version\" type=\"string\"/>"));
    }

    #[test]
    fn code_in_cdata() {
        let xml = render("sam:\n```(python)\nprint(\"*not bold*\")\n```\n");
        assert!(xml.contains(
            "<codeblock language=\"python\"><![CDATA[print(\"*not bold*\")\n]]></codeblock>"
        ));
    }

    #[test]
    fn cdata_terminator_split() {
        let mut out = String::new();
        cdata(&mut out, "a]]>b");
        assert_eq!(out, "<![CDATA[a]]]]><![CDATA[>b]]>");
    }

    #[test]
    fn comments_are_safe() {
        assert_eq!(comment("a -- b"), "a - - b");
        assert!(!comment("a --- b").contains("--"));

        let xml = render("sam:\n# note -- here\n");
        assert!(xml.contains("<!-- note - - here -->\n"));
    }

    #[test]
    fn escaping() {
        let mut out = String::new();
        escape_attribute(&mut out, "a<\"b\">&");
        assert_eq!(out, "a&lt;&quot;b&quot;&gt;&amp;");

        let mut out = String::new();
        escape_text(&mut out, "\"quoted\" <tag>");
        assert_eq!(out, "\"quoted\" &lt;tag&gt;");
    }

    #[test]
    fn namespaces_declared_where_they_change() {
        let xml = render("sam:{urn:a}\nouter:\n    inner: x\n    ```(text (urn:b))\n    data\n    ```\n");
        assert!(xml.contains("<outer xmlns=\"urn:a\">"));
        assert!(xml.contains("<inner>x</inner>"));
        assert!(xml.contains("<codeblock xmlns=\"urn:b\" language=\"text\">"));
    }

    #[test]
    fn embedded_verbatim() {
        let xml = render("sam:\n<?xml version=\"1.0\"?>\n<svg><rect/></svg>\n");
        assert!(xml.contains("\n<svg><rect/></svg>\n</sam>\n"));
    }

    #[test]
    fn chunks_are_lazy() {
        let document = parse("sam:\na: one\nb: two\n").unwrap();
        let mut chunks = serialize(&document, "xml").unwrap();
        assert!(chunks
            .next()
            .unwrap()
            .starts_with("<?xml"));
        assert_eq!(chunks.next(), Some("<a>one</a>\n".to_string()));
        assert_eq!(chunks.next(), Some("<b>two</b>\n".to_string()));
        assert_eq!(chunks.next(), Some("</sam>\n".to_string()));
        assert_eq!(chunks.next(), None);
    }
}
