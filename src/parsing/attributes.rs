//! Attribute tokens, as found in parentheses after block markers and in
//! inserts: `?condition`, `#name`, `*id`.

use crate::language::*;
use crate::parsing::parser::ParsingError;

pub fn read_attributes(text: &str, line: usize) -> Result<Attributes, ParsingError> {
    let mut attributes = Attributes::new();
    for token in text.split_whitespace() {
        read_token(&mut attributes, token, line)?;
    }
    Ok(attributes)
}

fn read_token(attributes: &mut Attributes, token: &str, line: usize) -> Result<(), ParsingError> {
    let mut chars = token.chars();
    let sigil = chars.next();
    let value = chars.as_str();

    if value.is_empty() {
        return Err(ParsingError::UnexpectedAttribute(line, token.to_string()));
    }

    match sigil {
        Some('?') => {
            attributes
                .entry("conditions")
                .and_modify(|conditions| {
                    conditions.push(' ');
                    conditions.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }
        Some('#') => {
            if attributes.contains_key("name") {
                return Err(ParsingError::MultipleNames(line));
            }
            attributes.insert("name", value.to_string());
        }
        Some('*') => {
            if attributes.contains_key("id") {
                return Err(ParsingError::MultipleIds(line));
            }
            attributes.insert("id", value.to_string());
        }
        _ => return Err(ParsingError::UnexpectedAttribute(line, token.to_string())),
    }
    Ok(())
}

/// Parse the tokens of an insert. The first token says what is being
/// inserted; the rest are ordinary attributes of the insert itself.
pub fn read_insert(text: &str, line: usize) -> Result<Insert, ParsingError> {
    let mut tokens = text.split_whitespace();

    let first = tokens
        .next()
        .ok_or(ParsingError::Confused(line))?;

    let mut chars = first.chars();
    let sigil = chars.next();
    let rest = chars.as_str();

    let (kind, item) = match sigil {
        _ if rest.is_empty() => (InsertKind::Other, first),
        Some('$') => (InsertKind::String, rest),
        Some('*') => (InsertKind::Id, rest),
        Some('#') => (InsertKind::Name, rest),
        Some('~') => (InsertKind::Fragment, rest),
        _ => (InsertKind::Other, first),
    };

    let mut attributes = Attributes::new();
    for token in tokens {
        read_token(&mut attributes, token, line)?;
    }

    Ok(Insert {
        kind,
        item: item.to_string(),
        id: attributes.remove("id"),
        name: attributes.remove("name"),
        conditions: attributes.remove("conditions"),
    })
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn attribute_tokens() {
        let attributes = read_attributes("*intro #overview ?web ?print", 3).unwrap();
        assert_eq!(attributes.get("id"), Some(&"intro".to_string()));
        assert_eq!(attributes.get("name"), Some(&"overview".to_string()));
        assert_eq!(attributes.get("conditions"), Some(&"web print".to_string()));

        assert_eq!(read_attributes("", 1), Ok(Attributes::new()));
    }

    #[test]
    fn attribute_failures() {
        assert_eq!(
            read_attributes("*one *two", 2),
            Err(ParsingError::MultipleIds(2))
        );
        assert_eq!(
            read_attributes("#one #two", 2),
            Err(ParsingError::MultipleNames(2))
        );
        assert_eq!(
            read_attributes("*one plain", 4),
            Err(ParsingError::UnexpectedAttribute(4, "plain".to_string()))
        );
        assert_eq!(
            read_attributes("*", 4),
            Err(ParsingError::UnexpectedAttribute(4, "*".to_string()))
        );
    }

    #[test]
    fn insert_tokens() {
        let insert = read_insert("$version", 1).unwrap();
        assert_eq!(insert.kind, InsertKind::String);
        assert_eq!(insert.item, "version");

        let insert = read_insert("~boilerplate ?web", 1).unwrap();
        assert_eq!(insert.kind, InsertKind::Fragment);
        assert_eq!(insert.item, "boilerplate");
        assert_eq!(insert.conditions, Some("web".to_string()));

        let insert = read_insert("images/logo.png *logo #brand", 1).unwrap();
        assert_eq!(insert.kind, InsertKind::Other);
        assert_eq!(insert.item, "images/logo.png");
        assert_eq!(insert.id, Some("logo".to_string()));
        assert_eq!(insert.name, Some("brand".to_string()));

        assert_eq!(
            read_insert("*a extra", 7),
            Err(ParsingError::UnexpectedAttribute(7, "extra".to_string()))
        );
    }
}
