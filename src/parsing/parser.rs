//! The structural parser. Input is consumed a line at a time by a state
//! machine; each state either classifies the next line or carries the
//! context of a multi-line construct (paragraph, code block, record set)
//! until it is finished.

use regex::Regex;
use std::fmt;
use tracing::debug;

use crate::language::*;
use crate::parsing::attributes::{read_attributes, read_insert};
use crate::parsing::embedded::{Checker, Fault};
use crate::parsing::inline::{self, read_citation};
use crate::parsing::source::{Line, Source};
use crate::parsing::tree::{Builder, ListKind, Schema};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    IllegalParserState(usize),
    InvalidDeclaration(usize),
    Confused(usize),
    UnexpectedEndOfInput(usize, &'static str),
    ParagraphChildren(usize),
    ExtraText(usize, String),
    UnexpectedAttribute(usize, String),
    DuplicateId(usize, String),
    DuplicateName(usize, String),
    MultipleIds(usize),
    MultipleNames(usize),
    UnresolvedAnnotation(usize, String),
    FieldCount(usize, usize, usize),
    EmbeddedVersion(usize, String),
    EmbeddedEncoding(usize, String),
    EmbeddedMalformed(usize, String),
    InvalidName(usize, String),
}

impl ParsingError {
    /// The line the problem was detected on, 1-origin.
    pub fn line(&self) -> usize {
        match self {
            ParsingError::IllegalParserState(line) => *line,
            ParsingError::InvalidDeclaration(line) => *line,
            ParsingError::Confused(line) => *line,
            ParsingError::UnexpectedEndOfInput(line, _) => *line,
            ParsingError::ParagraphChildren(line) => *line,
            ParsingError::ExtraText(line, _) => *line,
            ParsingError::UnexpectedAttribute(line, _) => *line,
            ParsingError::DuplicateId(line, _) => *line,
            ParsingError::DuplicateName(line, _) => *line,
            ParsingError::MultipleIds(line) => *line,
            ParsingError::MultipleNames(line) => *line,
            ParsingError::UnresolvedAnnotation(line, _) => *line,
            ParsingError::FieldCount(line, _, _) => *line,
            ParsingError::EmbeddedVersion(line, _) => *line,
            ParsingError::EmbeddedEncoding(line, _) => *line,
            ParsingError::EmbeddedMalformed(line, _) => *line,
            ParsingError::InvalidName(line, _) => *line,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ParsingError::IllegalParserState(_) => "illegal parser state".to_string(),
            ParsingError::InvalidDeclaration(_) => {
                "document must begin with a sam: declaration".to_string()
            }
            ParsingError::Confused(_) => "unable to make sense of this line".to_string(),
            ParsingError::UnexpectedEndOfInput(_, within) => {
                format!("input ended before the {} was closed", within)
            }
            ParsingError::ParagraphChildren(_) => {
                "a paragraph cannot contain nested content".to_string()
            }
            ParsingError::ExtraText(_, text) => format!("unexpected text '{}'", text),
            ParsingError::UnexpectedAttribute(_, token) => {
                format!("unrecognized attribute '{}'", token)
            }
            ParsingError::DuplicateId(_, id) => format!("id '{}' is already in use", id),
            ParsingError::DuplicateName(_, name) => {
                format!("name '{}' is already in use", name)
            }
            ParsingError::MultipleIds(_) => "only one id may be given".to_string(),
            ParsingError::MultipleNames(_) => "only one name may be given".to_string(),
            ParsingError::UnresolvedAnnotation(_, text) => {
                format!("no earlier annotation of '{}' to take a type from", text)
            }
            ParsingError::FieldCount(_, expected, found) => {
                format!("record has {} fields but {} were declared", found, expected)
            }
            ParsingError::EmbeddedVersion(_, version) => {
                format!("XML version '{}' is not supported", version)
            }
            ParsingError::EmbeddedEncoding(_, encoding) => {
                format!("XML encoding '{}' is not supported", encoding)
            }
            ParsingError::EmbeddedMalformed(_, reason) => {
                format!("embedded XML is not well-formed: {}", reason)
            }
            ParsingError::InvalidName(_, name) => format!("'{}' is not a valid name", name),
        }
    }
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line(), self.message())
    }
}

/// A paragraph whose lines are still being gathered.
#[derive(Debug)]
struct Pending {
    node: NodeId,
    text: String,
    indent: usize,
    line: usize,
}

/// An open code block.
#[derive(Debug)]
struct Fence {
    node: NodeId,
    fence: String,
    indent: usize,
    body: String,
    line: usize,
}

#[derive(Debug)]
struct Records {
    node: NodeId,
    indent: usize,
}

#[derive(Debug)]
enum State<'i> {
    New,
    Sam,
    Comment(Line<'i>),
    RecordStart(Line<'i>),
    Record(Records),
    CodeblockStart(Line<'i>),
    Codeblock(Fence),
    BlockquoteStart(Line<'i>),
    FragmentStart(Line<'i>),
    ListItem(Line<'i>),
    NumListItem(Line<'i>),
    LabeledListItem(Line<'i>),
    BlockInsert(Line<'i>),
    StringDef(Line<'i>),
    LineStart(Line<'i>),
    EmbeddedXml(Line<'i>),
    Block(Line<'i>),
    ParagraphStart(Line<'i>),
    Paragraph(Pending),
    End,
}

/// Parse a complete SAM document.
pub fn parse(content: &str) -> Result<Document, ParsingError> {
    let mut parser = Parser::new(content);
    parser.run()?;
    Ok(parser
        .builder
        .finish())
}

struct Parser<'i> {
    source: Source<'i>,
    builder: Builder,
}

impl<'i> Parser<'i> {
    fn new(content: &'i str) -> Parser<'i> {
        Parser {
            source: Source::new(content),
            builder: Builder::new(),
        }
    }

    fn run(&mut self) -> Result<(), ParsingError> {
        let mut state = State::New;

        loop {
            state = match state {
                State::New => self.read_declaration()?,
                State::Sam => self.classify(),
                State::Comment(line) => self.read_comment(line),
                State::RecordStart(line) => self.read_record_start(line)?,
                State::Record(records) => self.read_record(records)?,
                State::CodeblockStart(line) => self.read_codeblock_start(line)?,
                State::Codeblock(fence) => self.read_codeblock(fence)?,
                State::BlockquoteStart(line) => self.read_blockquote(line)?,
                State::FragmentStart(line) => self.read_fragment(line)?,
                State::ListItem(line) => self.read_list_item(line, ListKind::Unordered)?,
                State::NumListItem(line) => self.read_list_item(line, ListKind::Ordered)?,
                State::LabeledListItem(line) => self.read_list_item(line, ListKind::Labeled)?,
                State::BlockInsert(line) => self.read_block_insert(line)?,
                State::StringDef(line) => self.read_string_def(line)?,
                State::LineStart(line) => self.read_line_start(line)?,
                State::EmbeddedXml(line) => self.read_embedded(line)?,
                State::Block(line) => self.read_block(line)?,
                State::ParagraphStart(line) => self.read_paragraph_start(line)?,
                State::Paragraph(pending) => self.read_paragraph(pending)?,
                State::End => break,
            };
        }

        debug!(
            "Parsed {} lines into {} nodes",
            self.source
                .number(),
            self.builder
                .document()
                .len()
        );
        Ok(())
    }

    fn inline(&self, text: &str, line: usize) -> Result<Flow, ParsingError> {
        inline::parse(text, line, self.builder.document())
    }

    fn read_declaration(&mut self) -> Result<State<'i>, ParsingError> {
        let line = self
            .source
            .next_line()
            .ok_or(ParsingError::InvalidDeclaration(1))?;

        let cap = declaration()
            .captures(line.text)
            .ok_or(ParsingError::InvalidDeclaration(line.number))?;

        let namespace = match cap.name("namespace") {
            Some(one) => Some(
                validate_namespace(one.as_str())
                    .ok_or(ParsingError::InvalidDeclaration(line.number))?
                    .to_string(),
            ),
            None => None,
        };
        let schema = cap
            .name("schema")
            .map(|one| {
                one.as_str()
                    .to_string()
            });

        debug!("Declaration namespace {:?} schema {:?}", namespace, schema);
        self.builder
            .declare_root(namespace, schema);
        Ok(State::Sam)
    }

    /// Decide what the next line begins. The order of the tests matters:
    /// earlier patterns take precedence over later, more general, ones.
    fn classify(&mut self) -> State<'i> {
        let line = match self
            .source
            .next_line()
        {
            Some(line) => line,
            None => return State::End,
        };
        let text = line.text;

        if is_comment(text) {
            State::Comment(line)
        } else if is_record_start(text) {
            State::RecordStart(line)
        } else if line.is_blank() {
            State::Sam
        } else if is_codeblock_start(text) {
            State::CodeblockStart(line)
        } else if is_blockquote_start(text) {
            State::BlockquoteStart(line)
        } else if is_fragment_start(text) {
            State::FragmentStart(line)
        } else if is_list_item(text) {
            State::ListItem(line)
        } else if is_num_list_item(text) {
            State::NumListItem(line)
        } else if is_labeled_list_item(text) {
            State::LabeledListItem(line)
        } else if is_block_insert(text) {
            State::BlockInsert(line)
        } else if is_string_def(text) {
            State::StringDef(line)
        } else if is_line_start(text) {
            State::LineStart(line)
        } else if is_embedded_xml(text) {
            State::EmbeddedXml(line)
        } else if is_block_start(text) {
            State::Block(line)
        } else {
            State::ParagraphStart(line)
        }
    }

    fn read_comment(&mut self, line: Line<'i>) -> State<'i> {
        let text = line
            .text
            .trim_start()
            .trim_start_matches('#')
            .trim();

        self.builder
            .comment(Node::comment(text, line.indent()));
        State::Sam
    }

    fn read_block(&mut self, line: Line<'i>) -> Result<State<'i>, ParsingError> {
        let n = line.number;
        let cap = block_start()
            .captures(line.text)
            .ok_or(ParsingError::Confused(n))?;

        let element = &cap["element"];
        let name =
            validate_name(element).ok_or_else(|| ParsingError::InvalidName(n, element.to_string()))?;

        let attributes = optional_attributes(cap.name("attributes"), n)?;
        self.builder
            .declare(&attributes, n)?;

        let mut node = Node::block(name, line.indent()).with_attributes(attributes);
        if let Some(content) = cap
            .name("content")
            .map(|one| one.as_str())
            .filter(|content| !content.is_empty())
        {
            node = node.with_content(self.inline(content, n)?);
        }

        self.builder
            .insert(node, n)?;
        Ok(State::Sam)
    }

    fn read_paragraph_start(&mut self, line: Line<'i>) -> Result<State<'i>, ParsingError> {
        let indent = line.indent();
        let node = Node::block(Name(PARAGRAPH.to_string()), indent);
        let node = self
            .builder
            .insert(node, line.number)?;

        Ok(State::Paragraph(Pending {
            node,
            text: line
                .text
                .trim()
                .to_string(),
            indent,
            line: line.number,
        }))
    }

    /// Gather continuation lines. A paragraph ends at a blank line, at the
    /// end of input, at a line indented less than the paragraph, or at a
    /// line that starts a list item.
    fn read_paragraph(&mut self, mut pending: Pending) -> Result<State<'i>, ParsingError> {
        let line = match self
            .source
            .next_line()
        {
            Some(line) => line,
            None => {
                self.finish_paragraph(pending)?;
                return Ok(State::End);
            }
        };

        if line.is_blank() {
            self.finish_paragraph(pending)?;
            return Ok(State::Sam);
        }

        let text = line.text;
        if line.indent() < pending.indent
            || is_list_item(text)
            || is_num_list_item(text)
            || is_labeled_list_item(text)
        {
            self.source
                .push_back()?;
            self.finish_paragraph(pending)?;
            return Ok(State::Sam);
        }

        if !pending
            .text
            .is_empty()
        {
            pending
                .text
                .push(' ');
        }
        pending
            .text
            .push_str(text.trim());
        Ok(State::Paragraph(pending))
    }

    fn finish_paragraph(&mut self, pending: Pending) -> Result<(), ParsingError> {
        if pending
            .text
            .is_empty()
        {
            return Ok(());
        }
        let flow = self.inline(&pending.text, pending.line)?;
        self.builder
            .set_content(pending.node, flow);
        Ok(())
    }

    fn read_list_item(&mut self, line: Line<'i>, kind: ListKind) -> Result<State<'i>, ParsingError> {
        let n = line.number;
        let re = match kind {
            ListKind::Unordered => list_item(),
            ListKind::Ordered => num_list_item(),
            ListKind::Labeled => labeled_list_item(),
        };
        let cap = re
            .captures(line.text)
            .ok_or(ParsingError::Confused(n))?;

        let attributes = optional_attributes(cap.name("attributes"), n)?;

        let label = match cap.name("label") {
            Some(label) => Some(self.inline(label.as_str(), n)?),
            None => None,
        };

        let (column, content) = match cap.name("content") {
            Some(content) => (
                line.text[..content.start()]
                    .chars()
                    .count(),
                content
                    .as_str()
                    .trim(),
            ),
            None => (
                line.text
                    .chars()
                    .count(),
                "",
            ),
        };

        let (_, paragraph) =
            self.builder
                .list_item(kind, line.indent(), column, attributes, label, n)?;

        Ok(State::Paragraph(Pending {
            node: paragraph,
            text: content.to_string(),
            indent: column,
            line: n,
        }))
    }

    fn read_record_start(&mut self, line: Line<'i>) -> Result<State<'i>, ParsingError> {
        let n = line.number;
        let cap = record_start()
            .captures(line.text)
            .ok_or(ParsingError::Confused(n))?;

        let element = &cap["name"];
        let name =
            validate_name(element).ok_or_else(|| ParsingError::InvalidName(n, element.to_string()))?;

        let mut fields = Vec::new();
        for field in split_fields(cap["fields"].trim()) {
            let field =
                validate_name(field).ok_or_else(|| ParsingError::InvalidName(n, field.to_string()))?;
            fields.push(field);
        }

        let indent = line.indent();
        let node = self
            .builder
            .insert(Node::block(name.clone(), indent), n)?;

        self.builder
            .begin_records(Schema { name, fields });
        Ok(State::Record(Records { node, indent }))
    }

    /// Each line is a record, its values matched positionally against the
    /// declared fields. A blank line, a shallower line, or the end of input
    /// finishes the set.
    fn read_record(&mut self, records: Records) -> Result<State<'i>, ParsingError> {
        let line = match self
            .source
            .next_line()
        {
            Some(line) => line,
            None => {
                self.builder
                    .end_records();
                return Ok(State::End);
            }
        };

        if line.is_blank() {
            self.builder
                .end_records();
            return Ok(State::Sam);
        }

        if line.indent() < records.indent {
            self.source
                .push_back()?;
            self.builder
                .end_records();
            return Ok(State::Sam);
        }

        let n = line.number;
        let fields = match self
            .builder
            .schema()
        {
            Some(schema) => schema
                .fields
                .clone(),
            None => return Err(ParsingError::IllegalParserState(n)),
        };

        let values = split_fields(line.text.trim());
        if values.len() != fields.len() {
            return Err(ParsingError::FieldCount(n, fields.len(), values.len()));
        }

        let indent = line.indent();
        let mut children = Vec::with_capacity(fields.len());
        for (field, value) in fields
            .into_iter()
            .zip(values)
        {
            let mut node = Node::block(field, indent);
            if !value.is_empty() {
                node = node.with_content(self.inline(value, n)?);
            }
            children.push(node);
        }

        let record = self
            .builder
            .attach(records.node, Node::block(Name("record".to_string()), indent));
        for node in children {
            self.builder
                .attach(record, node);
        }

        Ok(State::Record(records))
    }

    fn read_codeblock_start(&mut self, line: Line<'i>) -> Result<State<'i>, ParsingError> {
        let n = line.number;
        let cap = codeblock_start()
            .captures(line.text)
            .ok_or(ParsingError::Confused(n))?;

        let mut attributes = Attributes::new();
        let mut namespace = None;

        if let Some(meta) = cap.name("meta") {
            let meta = codeblock_meta()
                .captures(meta.as_str())
                .ok_or(ParsingError::Confused(n))?;

            attributes = optional_attributes(meta.name("other"), n)?;

            if let Some(language) = meta.name("language") {
                attributes.insert(
                    "language",
                    language
                        .as_str()
                        .to_string(),
                );
            }
            if let Some(source) = meta.name("source") {
                attributes.insert(
                    "source",
                    source
                        .as_str()
                        .to_string(),
                );
            }
            if let Some(one) = meta.name("namespace") {
                let one = validate_namespace(one.as_str())
                    .ok_or_else(|| ParsingError::ExtraText(n, one.as_str().to_string()))?;
                namespace = Some(one.to_string());
            }
        }

        self.builder
            .declare(&attributes, n)?;

        let indent = line.indent();
        let node = Node::block(Name("codeblock".to_string()), indent)
            .with_attributes(attributes)
            .with_namespace(namespace);
        let node = self
            .builder
            .insert(node, n)?;

        Ok(State::Codeblock(Fence {
            node,
            fence: cap["fence"].to_string(),
            indent,
            body: String::new(),
            line: n,
        }))
    }

    /// Lines are taken verbatim, less the indent of the opening fence,
    /// until a line consisting of the same fence.
    fn read_codeblock(&mut self, mut fence: Fence) -> Result<State<'i>, ParsingError> {
        let line = self
            .source
            .next_line()
            .ok_or(ParsingError::UnexpectedEndOfInput(fence.line, "code block"))?;

        if line
            .text
            .trim()
            == fence.fence
        {
            debug!(
                "Code block from line {} to {}",
                fence.line, line.number
            );
            self.builder
                .set_content(fence.node, Flow::preformatted(fence.body));
            return Ok(State::Sam);
        }

        fence
            .body
            .push_str(strip_indent(line.text, fence.indent));
        fence
            .body
            .push('\n');
        Ok(State::Codeblock(fence))
    }

    fn read_blockquote(&mut self, line: Line<'i>) -> Result<State<'i>, ParsingError> {
        let n = line.number;
        let cap = blockquote_start()
            .captures(line.text)
            .ok_or(ParsingError::Confused(n))?;

        let attributes = optional_attributes(cap.name("attributes"), n)?;

        let rest = cap["rest"].trim();
        let citation = if rest.is_empty() {
            None
        } else {
            let inner = rest
                .strip_prefix('[')
                .and_then(|after| after.split_once(']'));
            match inner {
                Some((inner, after)) if !inner.trim().is_empty() => {
                    let after = after.trim();
                    if !after.is_empty() {
                        return Err(ParsingError::ExtraText(n, after.to_string()));
                    }
                    Some(read_citation(inner.trim()))
                }
                _ => return Err(ParsingError::ExtraText(n, rest.to_string())),
            }
        };

        self.builder
            .declare(&attributes, n)?;

        let indent = line.indent();
        let node = Node::block(Name("blockquote".to_string()), indent).with_attributes(attributes);
        let node = self
            .builder
            .insert(node, n)?;

        if let Some(citation) = citation {
            self.builder
                .attach(node, Node::citation(citation, indent));
        }
        Ok(State::Sam)
    }

    fn read_fragment(&mut self, line: Line<'i>) -> Result<State<'i>, ParsingError> {
        let n = line.number;
        let cap = fragment_start()
            .captures(line.text)
            .ok_or(ParsingError::Confused(n))?;

        let attributes = optional_attributes(cap.name("attributes"), n)?;
        self.builder
            .declare(&attributes, n)?;

        let node = Node::block(Name("fragment".to_string()), line.indent()).with_attributes(attributes);
        self.builder
            .insert(node, n)?;
        Ok(State::Sam)
    }

    fn read_block_insert(&mut self, line: Line<'i>) -> Result<State<'i>, ParsingError> {
        let n = line.number;
        let cap = block_insert()
            .captures(line.text)
            .ok_or(ParsingError::Confused(n))?;

        let insert = read_insert(&cap["attributes"], n)?;
        let attributes = insert.attributes();
        self.builder
            .declare(&attributes, n)?;

        let node = Node::block(Name("insert".to_string()), line.indent()).with_attributes(attributes);
        self.builder
            .insert(node, n)?;
        Ok(State::Sam)
    }

    fn read_string_def(&mut self, line: Line<'i>) -> Result<State<'i>, ParsingError> {
        let n = line.number;
        let cap = string_def()
            .captures(line.text)
            .ok_or(ParsingError::Confused(n))?;

        let mut attributes = Attributes::new();
        attributes.insert("name", cap["name"].to_string());

        let mut node = Node::block(Name("string".to_string()), line.indent()).with_attributes(attributes);
        let value = cap["value"].trim();
        if !value.is_empty() {
            node = node.with_content(self.inline(value, n)?);
        }

        self.builder
            .insert(node, n)?;
        Ok(State::Sam)
    }

    fn read_line_start(&mut self, line: Line<'i>) -> Result<State<'i>, ParsingError> {
        let n = line.number;
        let cap = line_start()
            .captures(line.text)
            .ok_or(ParsingError::Confused(n))?;

        let attributes = optional_attributes(cap.name("attributes"), n)?;
        self.builder
            .declare(&attributes, n)?;

        let mut node = Node::block(Name("line".to_string()), line.indent()).with_attributes(attributes);
        let text = cap["text"].trim_end();
        if !text.is_empty() {
            node = node.with_content(self.inline(text, n)?);
        }

        self.builder
            .insert(node, n)?;
        Ok(State::Sam)
    }

    /// An island of XML runs from its declaration until the root element
    /// closes and a line arrives that cannot belong to the island. That line
    /// is handed back to be classified normally.
    fn read_embedded(&mut self, line: Line<'i>) -> Result<State<'i>, ParsingError> {
        let n = line.number;
        let cap = xml_declaration()
            .captures(line.text)
            .ok_or_else(|| {
                ParsingError::EmbeddedMalformed(n, "incomplete XML declaration".to_string())
            })?;

        let pseudo = &cap["pseudo"];
        match pseudo_attribute(pseudo, "version") {
            Some("1.0") => {}
            Some(version) => return Err(ParsingError::EmbeddedVersion(n, version.to_string())),
            None => return Err(ParsingError::EmbeddedVersion(n, String::new())),
        }
        if let Some(encoding) = pseudo_attribute(pseudo, "encoding") {
            if !encoding.eq_ignore_ascii_case("UTF-8") {
                return Err(ParsingError::EmbeddedEncoding(n, encoding.to_string()));
            }
        }

        let mut checker = Checker::new();

        let rest = cap["rest"].trim();
        if !rest.is_empty() {
            let mut chunk = rest.to_string();
            chunk.push('\n');
            match checker.feed(&chunk) {
                Ok(()) => {}
                Err(Fault::Trailing) => {
                    return Err(ParsingError::ExtraText(n, rest.to_string()));
                }
                Err(Fault::Malformed(reason)) => {
                    return Err(ParsingError::EmbeddedMalformed(n, reason));
                }
            }
        }

        loop {
            let next = match self
                .source
                .next_line()
            {
                Some(next) => next,
                None if checker.is_complete() => break,
                None => return Err(ParsingError::UnexpectedEndOfInput(n, "embedded XML")),
            };

            let mut chunk = next
                .text
                .to_string();
            chunk.push('\n');
            match checker.feed(&chunk) {
                Ok(()) => {}
                Err(Fault::Trailing) => {
                    self.source
                        .push_back()?;
                    break;
                }
                Err(Fault::Malformed(reason)) => {
                    return Err(ParsingError::EmbeddedMalformed(next.number, reason));
                }
            }
        }

        let text = checker
            .text()
            .trim_end()
            .to_string();
        debug!("Embedded XML from line {}, {} bytes", n, text.len());

        self.builder
            .insert(Node::embedded(text, line.indent()), n)?;
        Ok(State::Sam)
    }
}

fn optional_attributes(
    text: Option<regex::Match<'_>>,
    line: usize,
) -> Result<Attributes, ParsingError> {
    match text {
        Some(text) => read_attributes(text.as_str(), line),
        None => Ok(Attributes::new()),
    }
}

/// Split on commas that are not escaped. Backslashes are left in place for
/// the inline parser to deal with.
fn split_fields(text: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut start = 0;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == ',' {
            fields.push(text[start..i].trim());
            start = i + 1;
        }
    }
    fields.push(text[start..].trim());
    fields
}

/// Remove up to `indent` leading whitespace characters.
fn strip_indent(text: &str, indent: usize) -> &str {
    let mut rest = text;
    for _ in 0..indent {
        match rest
            .chars()
            .next()
        {
            Some(c) if c.is_whitespace() => rest = &rest[c.len_utf8()..],
            _ => break,
        }
    }
    rest
}

fn pseudo_attribute<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    let re = regex!(r#"(?P<key>[A-Za-z]+)\s*=\s*(?:"(?P<double>[^"]*)"|'(?P<single>[^']*)')"#);
    re.captures_iter(text)
        .find(|cap| &cap["key"] == key)
        .and_then(|cap| {
            cap.name("double")
                .or_else(|| cap.name("single"))
        })
        .map(|one| one.as_str())
}

fn declaration() -> &'static Regex {
    regex!(r"^sam:\s*(?:\{(?P<namespace>[^}]*)\}|(?P<schema>\S+))?\s*$")
}

fn record_start() -> &'static Regex {
    regex!(r"^\s*(?P<name>[\w\-.]+)::(?P<fields>.*)$")
}

fn codeblock_start() -> &'static Regex {
    regex!(r"^\s*(?P<fence>```[^\s(]*)(?:\((?P<meta>.*)\))?\s*$")
}

fn codeblock_meta() -> &'static Regex {
    regex!(
        r#"^\s*(?P<language>[^\s"'()?*#][^\s"'()]*)?\s*(?:["'](?P<source>[^"']*)["'])?\s*(?:\((?P<namespace>[^)]*)\))?\s*(?P<other>.*?)\s*$"#
    )
}

fn blockquote_start() -> &'static Regex {
    regex!(r#"^\s*(?:"""|'''|blockquote:)(?:\((?P<attributes>[^)]*)\))?(?P<rest>.*)$"#)
}

fn fragment_start() -> &'static Regex {
    regex!(r"^\s*~~~(?:\((?P<attributes>[^)]*)\))?\s*$")
}

fn list_item() -> &'static Regex {
    regex!(r"^\s*\*\s+(?:\((?P<attributes>[?*#][^)]*)\)\s*)?(?P<content>.*)$")
}

fn num_list_item() -> &'static Regex {
    regex!(r"^\s*\d+\.\s+(?:\((?P<attributes>[?*#][^)]*)\)\s*)?(?P<content>.*)$")
}

fn labeled_list_item() -> &'static Regex {
    regex!(
        r"^\s*\|(?P<label>[^\s|](?:[^|\\]|\\.)*?)\|(?:\((?P<attributes>[?*#][^)]*)\))?\s+(?P<content>.*)$"
    )
}

fn block_insert() -> &'static Regex {
    regex!(r"^\s*>>>\((?P<attributes>[^)]*)\)\s*$")
}

fn string_def() -> &'static Regex {
    regex!(r"^\s*\$(?P<name>[\w\-.]+)\s*=\s*(?P<value>.*)$")
}

fn line_start() -> &'static Regex {
    regex!(r"^\s*\|(?:\((?P<attributes>[^)]*)\))?\s(?P<text>.*)$")
}

fn xml_declaration() -> &'static Regex {
    regex!(r"^\s*<\?xml(?P<pseudo>[^?]*)\?>(?P<rest>.*)$")
}

fn block_start() -> &'static Regex {
    regex!(r"^\s*(?P<element>[\w\-.]+):(?:\((?P<attributes>[^)]*)\))?(?:\s+(?P<content>.*?))?\s*$")
}

fn is_comment(content: &str) -> bool {
    let re = regex!(r"^\s*#");
    re.is_match(content)
}

fn is_record_start(content: &str) -> bool {
    record_start().is_match(content)
}

fn is_codeblock_start(content: &str) -> bool {
    codeblock_start().is_match(content)
}

fn is_blockquote_start(content: &str) -> bool {
    blockquote_start().is_match(content)
}

fn is_fragment_start(content: &str) -> bool {
    fragment_start().is_match(content)
}

fn is_list_item(content: &str) -> bool {
    list_item().is_match(content)
}

fn is_num_list_item(content: &str) -> bool {
    num_list_item().is_match(content)
}

fn is_labeled_list_item(content: &str) -> bool {
    labeled_list_item().is_match(content)
}

fn is_block_insert(content: &str) -> bool {
    block_insert().is_match(content)
}

fn is_string_def(content: &str) -> bool {
    string_def().is_match(content)
}

fn is_line_start(content: &str) -> bool {
    line_start().is_match(content)
}

fn is_embedded_xml(content: &str) -> bool {
    let re = regex!(r"^\s*<\?xml[\s?]");
    re.is_match(content)
}

fn is_block_start(content: &str) -> bool {
    block_start().is_match(content)
}

#[cfg(test)]
#[path = "checks/parser.rs"]
mod check;
