//! Inline markup: the character-level state machine that turns the text of
//! one paragraph into a Flow.

use crate::language::*;
use crate::parsing::attributes::read_insert;
use crate::parsing::parser::ParsingError;
use crate::parsing::tree::History;

/// Characters which, preceded by a backslash, stand for themselves.
const ESCAPABLE: &[char] = &['\\', '(', '{', '}', '[', ']', '_', '*', ',', '`'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Para,
    Escape,
    AnnotationStart,
    CitationStart,
    BoldStart,
    ItalicStart,
    MonoStart,
    QuotesStart,
    InlineInsert,
}

/// Parse the given text into a Flow. The document is consulted when an
/// annotation without a type needs to borrow one from an earlier
/// annotation with the same text.
pub fn parse(text: &str, line: usize, document: &Document) -> Result<Flow, ParsingError> {
    let mut parser = InlineParser {
        source: text,
        position: 0,
        buffer: String::new(),
        flow: Flow::new(),
        document,
        line,
    };

    parser.run()?;
    Ok(parser.flow)
}

struct InlineParser<'a> {
    source: &'a str,
    position: usize,
    buffer: String,
    flow: Flow,
    document: &'a Document,
    line: usize,
}

impl<'a> InlineParser<'a> {
    fn run(&mut self) -> Result<(), ParsingError> {
        let mut state = State::Para;

        loop {
            state = match state {
                State::Para => match self.next_char() {
                    None => break,
                    Some('\\') => State::Escape,
                    Some('{') => State::AnnotationStart,
                    Some('[') => State::CitationStart,
                    Some('*') => State::BoldStart,
                    Some('_') => State::ItalicStart,
                    Some('`') => State::MonoStart,
                    Some('"') => State::QuotesStart,
                    Some('>') => State::InlineInsert,
                    Some(c) => {
                        self.buffer
                            .push(c);
                        State::Para
                    }
                },
                State::Escape => {
                    match self.next_char() {
                        Some(c) if ESCAPABLE.contains(&c) => self
                            .buffer
                            .push(c),
                        Some(c) => {
                            self.buffer
                                .push('\\');
                            self.buffer
                                .push(c);
                        }
                        None => self
                            .buffer
                            .push('\\'),
                    }
                    State::Para
                }
                State::AnnotationStart => {
                    match self.annotation()? {
                        Some((annotation, width)) => {
                            self.emit(Inline::Annotation(annotation), width)
                        }
                        None => self
                            .buffer
                            .push('{'),
                    }
                    State::Para
                }
                State::CitationStart => {
                    match self.citation() {
                        Some((citation, width)) => self.emit(Inline::Citation(citation), width),
                        None => self
                            .buffer
                            .push('['),
                    }
                    State::Para
                }
                State::BoldStart => self.decoration(DecorationKind::Bold, '*'),
                State::ItalicStart => self.decoration(DecorationKind::Italic, '_'),
                State::QuotesStart => self.decoration(DecorationKind::Quotes, '"'),
                State::MonoStart => {
                    match mono(self.rest()) {
                        Some((text, width)) => self.emit(
                            Inline::Decoration(Decoration {
                                kind: DecorationKind::Mono,
                                text,
                            }),
                            width,
                        ),
                        None => self
                            .buffer
                            .push('`'),
                    }
                    State::Para
                }
                State::InlineInsert => {
                    match self.insert()? {
                        Some((insert, width)) => self.emit(Inline::Insert(insert), width),
                        None => self
                            .buffer
                            .push('>'),
                    }
                    State::Para
                }
            };
        }

        self.flush();
        Ok(())
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self
            .rest()
            .chars()
            .next()?;
        self.position += c.len_utf8();
        Some(c)
    }

    fn rest(&self) -> &'a str {
        &self.source[self.position..]
    }

    fn flush(&mut self) {
        if !self
            .buffer
            .is_empty()
        {
            self.flow
                .push_text(&self.buffer);
            self.buffer
                .clear();
        }
    }

    /// Append a recognized span and skip over the rest of it (the opening
    /// sigil having already been consumed).
    fn emit(&mut self, item: Inline, width: usize) {
        self.flush();
        self.flow
            .push(item);
        self.position += width;
    }

    fn decoration(&mut self, kind: DecorationKind, delimiter: char) -> State {
        let rest = self.rest();
        match closing(rest, delimiter) {
            Some(end) if end > 0 => {
                let text = unescape(&rest[..end]);
                self.emit(
                    Inline::Decoration(Decoration { kind, text }),
                    end + delimiter.len_utf8(),
                );
            }
            _ => self
                .buffer
                .push(delimiter),
        }
        State::Para
    }

    fn annotation(&self) -> Result<Option<(Annotation, usize)>, ParsingError> {
        let rest = self.rest();
        let end = match closing(rest, '}') {
            Some(end) if end > 0 => end,
            _ => return Ok(None),
        };

        let text = unescape(&rest[..end]);
        let mut width = end + 1;

        let (mut kind, mut specifically, mut namespace) = match annotation_detail(&rest[width..]) {
            Some((detail, w)) => {
                width += w;
                detail
            }
            None => (String::new(), None, None),
        };

        let re = regex!(r"^[A-Za-z][A-Za-z0-9+.\-]*://\S+$");
        if re.is_match(&kind) {
            specifically = Some(kind);
            kind = "link".to_string();
        }

        if kind.is_empty() {
            let history = History {
                pending: &self.flow,
                document: self.document,
            };
            let previous = history
                .recall(&text)
                .ok_or_else(|| ParsingError::UnresolvedAnnotation(self.line, text.clone()))?;

            kind = previous
                .kind
                .clone();
            specifically = specifically.or_else(|| {
                previous
                    .specifically
                    .clone()
            });
            namespace = namespace.or_else(|| {
                previous
                    .namespace
                    .clone()
            });
        }

        Ok(Some((
            Annotation {
                kind,
                text,
                specifically,
                namespace,
            },
            width,
        )))
    }

    fn citation(&self) -> Option<(Citation, usize)> {
        let rest = self.rest();
        let end = closing(rest, ']')?;
        let inner = rest[..end].trim();
        if inner.is_empty() {
            return None;
        }
        Some((read_citation(inner), end + 1))
    }

    fn insert(&self) -> Result<Option<(Insert, usize)>, ParsingError> {
        let rest = self.rest();
        let inner = match rest.strip_prefix('(') {
            Some(inner) => inner,
            None => return Ok(None),
        };
        let end = match closing(inner, ')') {
            Some(end) => end,
            None => return Ok(None),
        };
        if inner[..end]
            .trim()
            .is_empty()
        {
            return Ok(None);
        }

        let insert = read_insert(&inner[..end], self.line)?;
        Ok(Some((insert, 1 + end + 1)))
    }
}

type Detail = (String, Option<String>, Option<String>);

/// The parenthesised part of an annotation: `(type "specifically" (ns))`,
/// each part optional. Returns the parts and the width consumed.
fn annotation_detail(text: &str) -> Option<(Detail, usize)> {
    let inner = text.strip_prefix('(')?;
    let mut rest = inner.trim_start();

    let end = rest
        .find(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '(' | ')'))
        .unwrap_or(rest.len());
    let kind = rest[..end].to_string();
    rest = rest[end..].trim_start();

    let mut specifically = None;
    if let Some(quote) = rest
        .chars()
        .next()
        .filter(|c| *c == '"' || *c == '\'')
    {
        let close = rest[1..].find(quote)?;
        specifically = Some(rest[1..1 + close].to_string());
        rest = rest[1 + close + 1..].trim_start();
    }

    let mut namespace = None;
    if let Some(after) = rest.strip_prefix('(') {
        let close = after.find(')')?;
        let value = after[..close].trim();
        if !value.is_empty() {
            namespace = Some(value.to_string());
        }
        rest = after[close + 1..].trim_start();
    }

    let rest = rest.strip_prefix(')')?;
    Some(((kind, specifically, namespace), text.len() - rest.len()))
}

/// Interpret the inside of a citation: `*id extra`, `#name extra`, or free
/// text.
pub(crate) fn read_citation(inner: &str) -> Citation {
    let free = || Citation {
        kind: CitationKind::Citation,
        value: unescape(inner),
        extra: None,
    };

    let (kind, body) = if let Some(body) = inner.strip_prefix('*') {
        (CitationKind::IdRef, body)
    } else if let Some(body) = inner.strip_prefix('#') {
        (CitationKind::NameRef, body)
    } else {
        return free();
    };

    if body.is_empty() || body.starts_with(char::is_whitespace) {
        return free();
    }

    let (value, extra) = match body.split_once(char::is_whitespace) {
        Some((value, extra)) => (value, Some(unescape(extra.trim()))),
        None => (body, None),
    };

    Citation {
        kind,
        value: value.to_string(),
        extra,
    }
}

/// Position of the first occurrence of the delimiter not preceded by a
/// backslash.
fn closing(text: &str, delimiter: char) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == delimiter {
            return Some(i);
        }
    }
    None
}

/// Inline code runs to the next single backtick; a doubled backtick stands
/// for a literal one. No other escaping applies.
fn mono(text: &str) -> Option<(String, usize)> {
    let mut result = String::new();
    let mut chars = text
        .char_indices()
        .peekable();

    while let Some((i, c)) = chars.next() {
        if c == '`' {
            if let Some((_, '`')) = chars.peek() {
                chars.next();
                result.push('`');
                continue;
            }
            if result.is_empty() {
                return None;
            }
            return Some((result, i + 1));
        }
        result.push(c);
    }
    None
}

pub(crate) fn unescape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some(next) if ESCAPABLE.contains(&next) => result.push(next),
            Some(next) => {
                result.push('\\');
                result.push(next);
            }
            None => result.push('\\'),
        }
    }
    result
}

#[cfg(test)]
#[path = "checks/inline.rs"]
mod check;
