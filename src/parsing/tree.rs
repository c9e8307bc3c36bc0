//! Assembly of the document tree. Every block is placed by comparing its
//! indent to that of the current node; the builder also keeps the state
//! that spans paragraphs: declared ids and names, the active record schema,
//! and the document's default namespace.

use std::collections::HashSet;
use tracing::debug;

use crate::language::*;
use crate::parsing::parser::ParsingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    Ordered,
    Labeled,
}

impl ListKind {
    fn element(&self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
            ListKind::Labeled => "ll",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub name: Name,
    pub fields: Vec<Name>,
}

#[derive(Debug)]
pub struct Builder {
    document: Document,
    current: NodeId,
    ids: HashSet<String>,
    names: HashSet<String>,
    schema: Option<Schema>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            document: Document::new(),
            current: NodeId::ROOT,
            ids: HashSet::new(),
            names: HashSet::new(),
            schema: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn declare_root(&mut self, namespace: Option<String>, schema: Option<String>) {
        self.document
            .namespace = namespace;
        self.document
            .schema = schema;
    }

    pub fn finish(self) -> Document {
        self.document
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.document.nodes[id.0]
    }

    fn parent_of(&self, id: NodeId) -> NodeId {
        self.node(id)
            .parent
            .unwrap_or(NodeId::ROOT)
    }

    /// Work out which node a block at the given indent would be attached
    /// to, without changing anything. Code blocks and embedded XML are
    /// closed once read, so a deeper line after one becomes its sibling.
    pub fn placement(&self, indent: isize, line: usize) -> Result<NodeId, ParsingError> {
        let current = self.node(self.current);

        if current.indent < indent {
            if current.is_paragraph() {
                return Err(ParsingError::ParagraphChildren(line));
            }
            if current.is_verbatim() {
                return Ok(self.parent_of(self.current));
            }
            Ok(self.current)
        } else if current.indent == indent {
            Ok(self.parent_of(self.current))
        } else {
            let mut ancestor = self.parent_of(self.current);
            while self
                .node(ancestor)
                .indent
                >= indent
            {
                ancestor = self.parent_of(ancestor);
            }
            Ok(ancestor)
        }
    }

    /// Place a node by the indent rule and make it current.
    pub fn insert(&mut self, node: Node, line: usize) -> Result<NodeId, ParsingError> {
        let parent = self.placement(node.indent, line)?;
        let id = self.attach(parent, node);
        self.current = id;
        Ok(id)
    }

    /// Add a node as the last child of the given parent, leaving the current
    /// node where it is.
    pub fn attach(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        if !node.explicit_namespace {
            node.namespace = self.inherited_namespace(parent);
        }
        node.parent = Some(parent);

        let id = NodeId(
            self.document
                .nodes
                .len(),
        );
        self.document
            .nodes
            .push(node);
        self.document.nodes[parent.0]
            .children
            .push(id);
        id
    }

    /// The nearest explicitly declared namespace among the ancestors, or
    /// failing that the default from the root declaration.
    fn inherited_namespace(&self, parent: NodeId) -> Option<String> {
        let mut ancestor = Some(parent);
        while let Some(id) = ancestor {
            let node = self.node(id);
            if node.explicit_namespace {
                return node
                    .namespace
                    .clone();
            }
            ancestor = node.parent;
        }
        self.document
            .namespace
            .clone()
    }

    /// Comments go wherever the indent rule says, except that they don't
    /// nest under paragraphs. They never become the current node.
    pub fn comment(&mut self, node: Node) -> NodeId {
        let mut parent = match self.placement(node.indent, 0) {
            Ok(parent) => parent,
            Err(_) => self.current,
        };
        if self
            .node(parent)
            .is_paragraph()
        {
            parent = self.parent_of(parent);
        }
        self.attach(parent, node)
    }

    pub fn set_content(&mut self, id: NodeId, content: Flow) {
        self.document.nodes[id.0].content = Some(content);
    }

    /// Record the id and name attributes of a new block, failing if either
    /// has been seen before in this document.
    pub fn declare(&mut self, attributes: &Attributes, line: usize) -> Result<(), ParsingError> {
        if let Some(id) = attributes.get("id") {
            if self
                .ids
                .contains(id)
            {
                return Err(ParsingError::DuplicateId(line, id.clone()));
            }
        }
        if let Some(name) = attributes.get("name") {
            if self
                .names
                .contains(name)
            {
                return Err(ParsingError::DuplicateName(line, name.clone()));
            }
        }
        if let Some(id) = attributes.get("id") {
            self.ids
                .insert(id.clone());
        }
        if let Some(name) = attributes.get("name") {
            self.names
                .insert(name.clone());
        }
        Ok(())
    }

    /// Add a list item. The item joins the list at the same indent if that
    /// list is the last thing at the insertion point, otherwise a new list
    /// is started. Returns the item and the paragraph that will receive the
    /// item's text; the paragraph becomes current.
    pub fn list_item(
        &mut self,
        kind: ListKind,
        indent: usize,
        content: usize,
        attributes: Attributes,
        label: Option<Flow>,
        line: usize,
    ) -> Result<(NodeId, NodeId), ParsingError> {
        let element = kind.element();
        let parent = self.placement(indent as isize, line)?;

        let existing = self
            .node(parent)
            .children
            .last()
            .copied()
            .filter(|last| {
                let node = self.node(*last);
                node.name() == Some(element) && node.indent == indent as isize
            });

        let list = match existing {
            Some(list) => list,
            None => {
                debug!("Starting {} at line {}", element, line);
                let node = Node::block(Name(element.to_string()), indent);
                self.insert(node, line)?
            }
        };

        self.declare(&attributes, line)?;
        let node = Node::block(Name("li".to_string()), indent).with_attributes(attributes);
        let item = self.attach(list, node);

        if let Some(label) = label {
            let node = Node::block(Name("label".to_string()), indent).with_content(label);
            self.attach(item, node);
        }

        let node = Node::block(Name(PARAGRAPH.to_string()), content);
        let paragraph = self.attach(item, node);

        self.current = paragraph;
        Ok((item, paragraph))
    }

    pub fn begin_records(&mut self, schema: Schema) {
        self.schema = Some(schema);
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema
            .as_ref()
    }

    pub fn end_records(&mut self) {
        if let Some(schema) = self
            .schema
            .take()
        {
            debug!("Closed record set {}", schema.name.as_str());
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Builder::new()
    }
}

/// The annotations visible from a point in the parse: those already
/// appended to the flow under construction, then everything committed to the
/// document, most recent first.
pub struct History<'a> {
    pub pending: &'a Flow,
    pub document: &'a Document,
}

impl<'a> History<'a> {
    pub fn annotations(&self) -> impl Iterator<Item = &'a Annotation> + '_ {
        let document = self.document;
        let committed = document
            .reversed()
            .filter_map(move |id| {
                document
                    .node(id)
                    .content
                    .as_ref()
            })
            .flat_map(|flow| flow.annotations_reversed());

        self.pending
            .annotations_reversed()
            .chain(committed)
    }

    pub fn recall(&self, text: &str) -> Option<&'a Annotation> {
        self.annotations()
            .find(|annotation| annotation.text == text)
    }
}

#[cfg(test)]
mod check {
    use super::*;

    fn block(name: &str, indent: usize) -> Node {
        Node::block(validate_name(name).unwrap(), indent)
    }

    fn names(builder: &Builder, id: NodeId) -> Vec<String> {
        builder
            .document()
            .children(id)
            .map(|node| {
                node.name()
                    .unwrap_or("")
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn placement_by_indent() {
        let mut builder = Builder::new();

        let a = builder
            .insert(block("a", 0), 1)
            .unwrap();
        let b = builder
            .insert(block("b", 2), 2)
            .unwrap();
        let c = builder
            .insert(block("c", 2), 3)
            .unwrap();
        let d = builder
            .insert(block("d", 0), 4)
            .unwrap();
        let e = builder
            .insert(block("e", 4), 5)
            .unwrap();

        assert_eq!(names(&builder, NodeId::ROOT), vec!["a", "d"]);
        assert_eq!(names(&builder, a), vec!["b", "c"]);
        assert_eq!(names(&builder, d), vec!["e"]);

        let document = builder.finish();
        assert_eq!(document.node(b).parent(), Some(a));
        assert_eq!(document.node(c).parent(), Some(a));
        assert_eq!(document.node(e).parent(), Some(d));
    }

    #[test]
    fn placement_walks_back_to_nearest_shallower() {
        let mut builder = Builder::new();

        builder
            .insert(block("a", 0), 1)
            .unwrap();
        let b = builder
            .insert(block("b", 4), 2)
            .unwrap();
        builder
            .insert(block("c", 8), 3)
            .unwrap();

        // indent 6 is deeper than b but shallower than c
        let d = builder
            .insert(block("d", 6), 4)
            .unwrap();
        assert_eq!(
            builder
                .document()
                .node(d)
                .parent(),
            Some(b)
        );
    }

    #[test]
    fn paragraphs_take_no_children() {
        let mut builder = Builder::new();

        builder
            .insert(block("p", 0), 1)
            .unwrap();
        let result = builder.insert(block("section", 4), 2);
        assert_eq!(result, Err(ParsingError::ParagraphChildren(2)));
    }

    #[test]
    fn list_items_share_a_list() {
        let mut builder = Builder::new();

        let (one, p) = builder
            .list_item(ListKind::Unordered, 0, 2, Attributes::new(), None, 1)
            .unwrap();
        assert_eq!(builder.current(), p);

        let (two, _) = builder
            .list_item(ListKind::Unordered, 0, 2, Attributes::new(), None, 2)
            .unwrap();

        assert_eq!(names(&builder, NodeId::ROOT), vec!["ul"]);
        let document = builder.finish();
        assert_eq!(document.node(one).parent(), document.node(two).parent());
    }

    #[test]
    fn different_list_kinds_start_new_lists() {
        let mut builder = Builder::new();

        builder
            .list_item(ListKind::Unordered, 0, 2, Attributes::new(), None, 1)
            .unwrap();
        builder
            .list_item(ListKind::Ordered, 0, 3, Attributes::new(), None, 2)
            .unwrap();

        assert_eq!(names(&builder, NodeId::ROOT), vec!["ul", "ol"]);
    }

    #[test]
    fn nested_list_under_item() {
        let mut builder = Builder::new();

        let (item, _) = builder
            .list_item(ListKind::Unordered, 0, 2, Attributes::new(), None, 1)
            .unwrap();
        builder
            .list_item(ListKind::Unordered, 2, 4, Attributes::new(), None, 2)
            .unwrap();

        assert_eq!(names(&builder, item), vec!["p", "ul"]);
    }

    #[test]
    fn duplicate_identifiers() {
        let mut builder = Builder::new();

        let mut attributes = Attributes::new();
        attributes.insert("id", "sameid".to_string());

        assert_eq!(builder.declare(&attributes, 1), Ok(()));
        assert_eq!(
            builder.declare(&attributes, 5),
            Err(ParsingError::DuplicateId(5, "sameid".to_string()))
        );

        let mut attributes = Attributes::new();
        attributes.insert("id", "otherid".to_string());
        attributes.insert("name", "thing".to_string());
        assert_eq!(builder.declare(&attributes, 6), Ok(()));

        let mut attributes = Attributes::new();
        attributes.insert("name", "thing".to_string());
        assert_eq!(
            builder.declare(&attributes, 7),
            Err(ParsingError::DuplicateName(7, "thing".to_string()))
        );
    }

    #[test]
    fn namespaces_inherit() {
        let mut builder = Builder::new();
        builder.declare_root(Some("urn:default".to_string()), None);

        let a = builder
            .insert(block("a", 0), 1)
            .unwrap();
        let b = builder
            .insert(block("b", 2).with_namespace(Some("urn:other".to_string())), 2)
            .unwrap();
        let c = builder
            .insert(block("c", 4), 3)
            .unwrap();

        let document = builder.finish();
        assert_eq!(
            document
                .node(a)
                .namespace
                .as_deref(),
            Some("urn:default")
        );
        assert_eq!(
            document
                .node(b)
                .namespace
                .as_deref(),
            Some("urn:other")
        );
        assert_eq!(
            document
                .node(c)
                .namespace
                .as_deref(),
            Some("urn:other")
        );
    }

    #[test]
    fn recalling_annotations() {
        let mut builder = Builder::new();

        let mut flow = Flow::new();
        flow.push(Inline::Annotation(Annotation {
            kind: "first".to_string(),
            text: "X".to_string(),
            specifically: None,
            namespace: None,
        }));
        builder
            .insert(block("p", 0).with_content(flow), 1)
            .unwrap();

        let mut flow = Flow::new();
        flow.push(Inline::Annotation(Annotation {
            kind: "second".to_string(),
            text: "X".to_string(),
            specifically: None,
            namespace: None,
        }));
        builder
            .insert(block("p", 0).with_content(flow), 2)
            .unwrap();

        let pending = Flow::new();
        let history = History {
            pending: &pending,
            document: builder.document(),
        };
        assert_eq!(
            history
                .recall("X")
                .map(|annotation| annotation
                    .kind
                    .as_str()),
            Some("second")
        );
        assert_eq!(history.recall("Y"), None);
    }
}
