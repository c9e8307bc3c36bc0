//! Well-formedness checking for islands of foreign XML. Text is fed in as
//! it arrives; the checker consumes every complete construct and holds back
//! anything cut off at the end of the buffer until more text is supplied.
//! Once the root element has closed, anything other than whitespace,
//! comments, and processing instructions is reported as Fault::Trailing,
//! which is how the parser knows the island has ended.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    Trailing,
    Malformed(String),
}

#[derive(Debug, Default)]
pub struct Checker {
    buffer: String,
    position: usize,
    open: Vec<String>,
    started: bool,
}

enum Scan {
    Consumed(usize),
    Incomplete,
}

impl Checker {
    pub fn new() -> Checker {
        Checker::default()
    }

    /// True once the root element has been closed.
    pub fn is_complete(&self) -> bool {
        self.started && self
            .open
            .is_empty()
    }

    /// Everything accepted so far.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Add text and check as much of it as can be checked. On a fault the
    /// checker is left as it was before this call.
    pub fn feed(&mut self, text: &str) -> Result<(), Fault> {
        let length = self
            .buffer
            .len();
        let position = self.position;
        let open = self
            .open
            .clone();
        let started = self.started;

        self.buffer
            .push_str(text);

        let result = self.scan();
        if result.is_err() {
            self.buffer
                .truncate(length);
            self.position = position;
            self.open = open;
            self.started = started;
        }
        result
    }

    fn scan(&mut self) -> Result<(), Fault> {
        loop {
            let rest = &self.buffer[self.position..];
            if rest.is_empty() {
                return Ok(());
            }

            let scan = if rest.starts_with('<') {
                self.markup()?
            } else if self.is_complete() || !self.started {
                self.prolog_text()?
            } else {
                self.character_data()?
            };

            match scan {
                Scan::Consumed(width) => self.position += width,
                Scan::Incomplete => return Ok(()),
            }
        }
    }

    // outside the root element only whitespace is allowed
    fn prolog_text(&self) -> Result<Scan, Fault> {
        let rest = &self.buffer[self.position..];
        let width = rest
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len());

        if width == 0 {
            if self.is_complete() {
                return Err(Fault::Trailing);
            }
            return Err(Fault::Malformed(
                "text before the root element".to_string(),
            ));
        }
        Ok(Scan::Consumed(width))
    }

    fn character_data(&self) -> Result<Scan, Fault> {
        let rest = &self.buffer[self.position..];
        let width = rest
            .find('<')
            .unwrap_or(rest.len());
        let text = &rest[..width];

        if text.contains("]]>") {
            return Err(Fault::Malformed("']]>' in character data".to_string()));
        }

        let mut remaining = text;
        while let Some(i) = remaining.find('&') {
            let after = &remaining[i + 1..];
            match after.find(';') {
                Some(end) => {
                    check_reference(&after[..end])?;
                    remaining = &after[end + 1..];
                }
                None if width == rest.len() => {
                    // might be completed by the next chunk
                    let consumed = text.len() - remaining.len() + i;
                    return Ok(if consumed == 0 {
                        Scan::Incomplete
                    } else {
                        Scan::Consumed(consumed)
                    });
                }
                None => {
                    return Err(Fault::Malformed("unterminated reference".to_string()));
                }
            }
        }

        Ok(Scan::Consumed(width))
    }

    fn markup(&mut self) -> Result<Scan, Fault> {
        let rest = &self.buffer[self.position..];
        let complete = self.is_complete();

        if rest.starts_with("<!--") {
            return Ok(match rest[4..].find("-->") {
                Some(end) => {
                    if rest[4..4 + end].contains("--") {
                        return Err(Fault::Malformed("'--' inside a comment".to_string()));
                    }
                    Scan::Consumed(4 + end + 3)
                }
                None => Scan::Incomplete,
            });
        }

        if rest.starts_with("<?") {
            let target: String = rest[2..]
                .chars()
                .take_while(|c| !c.is_whitespace() && *c != '?')
                .collect();
            if target.eq_ignore_ascii_case("xml") {
                if complete {
                    return Err(Fault::Trailing);
                }
                return Err(Fault::Malformed(
                    "misplaced XML declaration".to_string(),
                ));
            }
            return Ok(match rest.find("?>") {
                Some(end) => Scan::Consumed(end + 2),
                None => Scan::Incomplete,
            });
        }

        if complete {
            return Err(Fault::Trailing);
        }

        if rest.starts_with("<!") {
            if rest.starts_with("<![CDATA[") {
                if !self.started {
                    return Err(Fault::Malformed(
                        "CDATA section outside the root element".to_string(),
                    ));
                }
                return Ok(match rest.find("]]>") {
                    Some(end) => Scan::Consumed(end + 3),
                    None => Scan::Incomplete,
                });
            }
            if rest.len() < 9 {
                return Ok(Scan::Incomplete);
            }
            if rest.starts_with("<!DOCTYPE") && !self.started {
                return Ok(doctype(rest));
            }
            return Err(Fault::Malformed("unexpected markup declaration".to_string()));
        }

        if let Some(after) = rest.strip_prefix("</") {
            let end = match after.find('>') {
                Some(end) => end,
                None => return Ok(Scan::Incomplete),
            };
            let name = after[..end].trim_end();
            return match self
                .open
                .pop()
            {
                Some(expected) if expected == name => Ok(Scan::Consumed(2 + end + 1)),
                Some(expected) => Err(Fault::Malformed(format!(
                    "closing tag '{}' does not match '{}'",
                    name, expected
                ))),
                None => Err(Fault::Malformed(format!("unexpected closing tag '{}'", name))),
            };
        }

        let (end, name, empty) = match start_tag(rest)? {
            Some(tag) => tag,
            None => return Ok(Scan::Incomplete),
        };
        if !empty {
            self.open
                .push(name);
        }
        self.started = true;
        Ok(Scan::Consumed(end))
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == ':'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == ':' || c == '-' || c == '.'
}

fn check_name(name: &str) -> Result<(), Fault> {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if is_name_start(c) && chars.all(is_name_char) => Ok(()),
        _ => Err(Fault::Malformed(format!("invalid name '{}'", name))),
    }
}

fn check_reference(reference: &str) -> Result<(), Fault> {
    let valid = if let Some(hex) = reference
        .strip_prefix("#x")
        .or_else(|| reference.strip_prefix("#X"))
    {
        u32::from_str_radix(hex, 16).is_ok()
    } else if let Some(decimal) = reference.strip_prefix('#') {
        decimal
            .parse::<u32>()
            .is_ok()
    } else {
        check_name(reference).is_ok()
    };

    if valid {
        Ok(())
    } else {
        Err(Fault::Malformed(format!("invalid reference '&{};'", reference)))
    }
}

// Skips over the internal subset, if any; its content isn't checked.
fn doctype(rest: &str) -> Scan {
    let mut depth = 0;
    let mut quote = None;
    for (i, c) in rest
        .char_indices()
        .skip(2)
    {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth -= 1,
            (None, '>') if depth == 0 => return Scan::Consumed(i + 1),
            _ => {}
        }
    }
    Scan::Incomplete
}

/// Parse a start tag at the beginning of the text, returning its width, its
/// name, and whether it was self-closing; None if the tag isn't finished
/// yet.
fn start_tag(rest: &str) -> Result<Option<(usize, String, bool)>, Fault> {
    let body = &rest[1..];

    let name_end = body
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .unwrap_or(body.len());
    if name_end == body.len() {
        return Ok(None);
    }
    let name = &body[..name_end];
    check_name(name)?;

    let mut seen: Vec<&str> = Vec::new();
    let mut i = name_end;
    loop {
        let remaining = &body[i..];
        let trimmed = remaining.trim_start();
        let skipped = remaining.len() - trimmed.len();
        i += skipped;

        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.starts_with("/>") {
            return Ok(Some((1 + i + 2, name.to_string(), true)));
        }
        if trimmed.starts_with('/') {
            if trimmed.len() == 1 {
                return Ok(None);
            }
            return Err(Fault::Malformed(format!("stray '/' in tag '{}'", name)));
        }
        if trimmed.starts_with('>') {
            return Ok(Some((1 + i + 1, name.to_string(), false)));
        }
        if skipped == 0 {
            return Err(Fault::Malformed(format!(
                "attributes in tag '{}' must be separated by whitespace",
                name
            )));
        }

        // attribute: name = "value"
        let equals = match trimmed.find('=') {
            Some(equals) => equals,
            None => {
                return match trimmed.find('>') {
                    Some(_) => Err(Fault::Malformed(format!(
                        "attribute without value in tag '{}'",
                        name
                    ))),
                    None => Ok(None),
                }
            }
        };
        let attribute = trimmed[..equals].trim_end();
        check_name(attribute)?;
        if seen.contains(&attribute) {
            return Err(Fault::Malformed(format!(
                "duplicate attribute '{}' in tag '{}'",
                attribute, name
            )));
        }
        seen.push(attribute);

        let value = trimmed[equals + 1..].trim_start();
        let offset = trimmed.len() - value.len();
        let quote = match value.chars().next() {
            Some(q @ '"') | Some(q @ '\'') => q,
            Some(_) => {
                return Err(Fault::Malformed(format!(
                    "unquoted value for attribute '{}'",
                    attribute
                )))
            }
            None => return Ok(None),
        };
        let close = match value[1..].find(quote) {
            Some(close) => close,
            None => return Ok(None),
        };
        if value[1..1 + close].contains('<') {
            return Err(Fault::Malformed(format!(
                "'<' in value of attribute '{}'",
                attribute
            )));
        }
        i += offset + 1 + close + 1;
    }
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn complete_document() {
        let mut checker = Checker::new();
        assert_eq!(checker.feed("<a href=\"x\">\n"), Ok(()));
        assert!(!checker.is_complete());
        assert_eq!(checker.feed("  <b/> text &amp; more\n"), Ok(()));
        assert_eq!(checker.feed("</a>\n"), Ok(()));
        assert!(checker.is_complete());
        assert_eq!(checker.feed("\n"), Ok(()));
        assert_eq!(checker.feed("<!-- trailing comment -->\n"), Ok(()));
    }

    #[test]
    fn trailing_content_after_root() {
        let mut checker = Checker::new();
        assert_eq!(checker.feed("<a>text</a>\n"), Ok(()));
        assert_eq!(checker.feed("Some more prose\n"), Err(Fault::Trailing));
        assert_eq!(checker.feed("<b/>\n"), Err(Fault::Trailing));
        assert_eq!(checker.text(), "<a>text</a>\n");
    }

    #[test]
    fn tags_split_across_lines() {
        let mut checker = Checker::new();
        assert_eq!(checker.feed("<a\n"), Ok(()));
        assert_eq!(checker.feed("   class='big'\n"), Ok(()));
        assert_eq!(checker.feed("   >\n"), Ok(()));
        assert_eq!(checker.feed("</a>"), Ok(()));
        assert!(checker.is_complete());
    }

    #[test]
    fn malformed_input() {
        let mut checker = Checker::new();
        assert_eq!(checker.feed("<a>"), Ok(()));
        assert!(matches!(checker.feed("</b>"), Err(Fault::Malformed(_))));

        let mut checker = Checker::new();
        assert!(matches!(checker.feed("text"), Err(Fault::Malformed(_))));

        let mut checker = Checker::new();
        assert!(matches!(
            checker.feed("<a x='1' x='2'/>"),
            Err(Fault::Malformed(_))
        ));

        let mut checker = Checker::new();
        assert!(matches!(
            checker.feed("<a>&bad name;</a>"),
            Err(Fault::Malformed(_))
        ));
    }
}
