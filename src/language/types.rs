//! Types representing the document tree built from SAM markup

use std::collections::BTreeMap;

/// A legal XML element (local) name.
#[derive(Eq, Debug, PartialEq, Clone)]
pub struct Name(pub String);

impl Name {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// inline content

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationKind {
    Bold,
    Italic,
    Mono,
    Quotes,
}

impl DecorationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecorationKind::Bold => "bold",
            DecorationKind::Italic => "italic",
            DecorationKind::Mono => "mono",
            DecorationKind::Quotes => "quotes",
        }
    }
}

#[derive(Eq, Debug, PartialEq, Clone)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub text: String,
}

#[derive(Eq, Debug, PartialEq, Clone)]
pub struct Annotation {
    pub kind: String,
    pub text: String,
    pub specifically: Option<String>,
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CitationKind {
    IdRef,
    NameRef,
    Citation,
}

#[derive(Eq, Debug, PartialEq, Clone)]
pub struct Citation {
    pub kind: CitationKind,
    pub value: String,
    pub extra: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertKind {
    String,
    Id,
    Name,
    Fragment,
    Other,
}

impl InsertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsertKind::String => "string",
            InsertKind::Id => "id",
            InsertKind::Name => "name",
            InsertKind::Fragment => "fragment",
            InsertKind::Other => "other",
        }
    }
}

#[derive(Eq, Debug, PartialEq, Clone)]
pub struct Insert {
    pub kind: InsertKind,
    pub item: String,
    pub id: Option<String>,
    pub name: Option<String>,
    pub conditions: Option<String>,
}

impl Insert {
    /// The insert's fields as attributes, in the form used both by block
    /// inserts and by the serializer for inline ones.
    pub fn attributes(&self) -> Attributes {
        let mut attributes = Attributes::new();
        attributes.insert("type", self.kind.as_str().to_string());
        attributes.insert("item", self.item.clone());
        if let Some(id) = &self.id {
            attributes.insert("id", id.clone());
        }
        if let Some(name) = &self.name {
            attributes.insert("name", name.clone());
        }
        if let Some(conditions) = &self.conditions {
            attributes.insert("conditions", conditions.clone());
        }
        attributes
    }
}

#[derive(Eq, Debug, PartialEq, Clone)]
pub enum Inline {
    Text(String),
    Decoration(Decoration),
    Annotation(Annotation),
    Citation(Citation),
    Insert(Insert),
}

/// The ordered inline content of a block. A preformatted Flow holds
/// verbatim text which is neither escape-processed when parsed nor
/// entity-escaped when written.
#[derive(Eq, Debug, PartialEq, Clone, Default)]
pub struct Flow {
    items: Vec<Inline>,
    preformatted: bool,
}

impl Flow {
    pub fn new() -> Flow {
        Flow::default()
    }

    pub fn preformatted(text: String) -> Flow {
        Flow {
            items: vec![Inline::Text(text)],
            preformatted: true,
        }
    }

    pub fn is_preformatted(&self) -> bool {
        self.preformatted
    }

    pub fn items(&self) -> &[Inline] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items
            .is_empty()
    }

    /// Append literal text, merging with a preceding text item.
    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Inline::Text(previous)) = self
            .items
            .last_mut()
        {
            previous.push_str(text);
        } else {
            self.items
                .push(Inline::Text(text.to_string()));
        }
    }

    pub fn push(&mut self, item: Inline) {
        match item {
            Inline::Text(text) => self.push_text(&text),
            other => self
                .items
                .push(other),
        }
    }

    /// Annotations in this flow, most recent first.
    pub fn annotations_reversed(&self) -> impl Iterator<Item = &Annotation> {
        self.items
            .iter()
            .rev()
            .filter_map(|item| match item {
                Inline::Annotation(annotation) => Some(annotation),
                _ => None,
            })
    }
}

impl From<&str> for Flow {
    fn from(text: &str) -> Flow {
        let mut flow = Flow::new();
        flow.push_text(text);
        flow
    }
}

// block structure

/// Attribute keys are fixed by the markup, so they are static strings.
/// BTreeMap gives the stable ordering the serializer relies on.
pub type Attributes = BTreeMap<&'static str, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

#[derive(Eq, Debug, PartialEq, Clone)]
pub enum Kind {
    Root,
    Block(Name),
    Comment(String),
    Citation(Citation),
    Embedded(String),
}

#[derive(Eq, Debug, PartialEq, Clone)]
pub struct Node {
    pub kind: Kind,
    pub attributes: Attributes,
    pub content: Option<Flow>,
    pub namespace: Option<String>,
    pub(crate) explicit_namespace: bool,
    pub indent: isize,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

pub const PARAGRAPH: &str = "p";

impl Node {
    fn with_kind(kind: Kind, indent: isize) -> Node {
        Node {
            kind,
            attributes: Attributes::new(),
            content: None,
            namespace: None,
            explicit_namespace: false,
            indent,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn root() -> Node {
        Node::with_kind(Kind::Root, -1)
    }

    pub fn block(name: Name, indent: usize) -> Node {
        Node::with_kind(Kind::Block(name), indent as isize)
    }

    pub fn comment(text: &str, indent: usize) -> Node {
        Node::with_kind(Kind::Comment(text.to_string()), indent as isize)
    }

    pub fn citation(citation: Citation, indent: usize) -> Node {
        Node::with_kind(Kind::Citation(citation), indent as isize)
    }

    pub fn embedded(text: String, indent: usize) -> Node {
        Node::with_kind(Kind::Embedded(text), indent as isize)
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Node {
        self.attributes = attributes;
        self
    }

    pub fn with_content(mut self, content: Flow) -> Node {
        self.content = Some(content);
        self
    }

    pub fn with_namespace(mut self, namespace: Option<String>) -> Node {
        if namespace.is_some() {
            self.namespace = namespace;
            self.explicit_namespace = true;
        }
        self
    }

    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            Kind::Block(name) => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn is_paragraph(&self) -> bool {
        self.name() == Some(PARAGRAPH)
    }

    /// Code blocks and embedded XML carry their content verbatim and take
    /// no children.
    pub fn is_verbatim(&self) -> bool {
        match &self.kind {
            Kind::Embedded(_) => true,
            Kind::Block(_) => self
                .content
                .as_ref()
                .is_some_and(|content| content.is_preformatted()),
            _ => false,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// The finished tree. Nodes live in an arena and refer to each other by
/// index; the root sentinel is always at index 0.
#[derive(Eq, Debug, PartialEq, Clone)]
pub struct Document {
    pub(crate) nodes: Vec<Node>,
    pub namespace: Option<String>,
    pub schema: Option<String>,
}

impl Default for Document {
    fn default() -> Self {
        Document {
            nodes: vec![Node::root()],
            namespace: None,
            schema: None,
        }
    }
}

impl Document {
    pub fn new() -> Document {
        Document::default()
    }

    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.root()
            .children
            .is_empty()
    }

    /// Direct children of the given node, in document order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node> {
        self.node(id)
            .children
            .iter()
            .map(|child| self.node(*child))
    }

    /// Node ids in reverse document order: for each node, its children (last
    /// first) come before the node itself. The root is not included.
    pub fn reversed(&self) -> Reversed<'_> {
        Reversed {
            document: self,
            stack: vec![(NodeId::ROOT, false)],
        }
    }
}

pub struct Reversed<'d> {
    document: &'d Document,
    stack: Vec<(NodeId, bool)>,
}

impl<'d> Iterator for Reversed<'d> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        while let Some((id, expanded)) = self
            .stack
            .pop()
        {
            if expanded {
                return Some(id);
            }
            if id != NodeId::ROOT {
                self.stack
                    .push((id, true));
            }
            for child in self
                .document
                .node(id)
                .children
                .iter()
            {
                self.stack
                    .push((*child, false));
            }
        }
        None
    }
}

// validation

/// Names of elements must be legal XML local names: a letter or underscore
/// followed by letters, digits, hyphens, periods and underscores.
pub fn validate_name(input: &str) -> Option<Name> {
    let mut chars = input.chars();
    let first = chars.next()?;
    if !(first.is_alphabetic() || first == '_') {
        return None;
    }
    if chars.all(|c| c.is_alphanumeric() || c == '-' || c == '.' || c == '_') {
        Some(Name(input.to_string()))
    } else {
        None
    }
}

pub fn validate_namespace(input: &str) -> Option<&str> {
    let re = regex!(r"^[^\s<>&]+$");
    if re.is_match(input) {
        Some(input)
    } else {
        None
    }
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn name_rules() {
        assert_eq!(validate_name("p"), Some(Name("p".to_string())));
        assert_eq!(validate_name("section"), Some(Name("section".to_string())));
        assert_eq!(validate_name("_x-1.2"), Some(Name("_x-1.2".to_string())));
        assert_eq!(validate_name("énoncé"), Some(Name("énoncé".to_string())));
        assert!(validate_name("").is_none());
        assert!(validate_name("2col").is_none());
        assert!(validate_name("-dash").is_none());
        assert!(validate_name("a:b").is_none());
        assert!(validate_name("two words").is_none());
    }

    #[test]
    fn merging_text() {
        let mut flow = Flow::new();
        flow.push_text("Hello");
        flow.push(Inline::Text(", ".to_string()));
        flow.push_text("");
        flow.push_text("World");
        assert_eq!(flow.items(), &[Inline::Text("Hello, World".to_string())]);
        assert!(!flow.is_preformatted());
    }

    #[test]
    fn reverse_document_order() {
        let mut document = Document::new();
        // root -> a -> (b, c), root -> d
        let names = ["a", "b", "c", "d"];
        for name in names {
            let node = Node::block(validate_name(name).unwrap(), 0);
            document
                .nodes
                .push(node);
        }
        document.nodes[0].children = vec![NodeId(1), NodeId(4)];
        document.nodes[1].children = vec![NodeId(2), NodeId(3)];

        let order: Vec<&str> = document
            .reversed()
            .map(|id| {
                document
                    .node(id)
                    .name()
                    .unwrap()
            })
            .collect();

        assert_eq!(order, vec!["d", "c", "b", "a"]);
    }
}
