use sam::parsing::ParsingError;

/// Generate the headline and a longer explanation for a parsing error.
pub fn generate_error_message(error: &ParsingError) -> (String, String) {
    match error {
        ParsingError::IllegalParserState(_) => (
            "Illegal parser state".to_string(),
            "Internal parser error. This should not have happened! Sorry.".to_string(),
        ),
        ParsingError::InvalidDeclaration(_) => (
            "Invalid declaration".to_string(),
            r#"
A SAM document must begin with a declaration on its first line:

    sam:

The declaration can optionally name a default namespace for the elements
in the document, enclosed in braces, or a schema to associate with the
output:

    sam:{http://example.com/ns/article}
    sam: article.rng
            "#
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::Confused(_) => (
            "Unrecognized line".to_string(),
            "The parser was unable to work out what this line is meant to be.".to_string(),
        ),
        ParsingError::UnexpectedEndOfInput(_, within) => (
            format!("Unterminated {}", within),
            format!(
                r#"
The {} that starts on this line was still open when the input ran out.
A code block is closed by a line containing the same fence that opened
it; embedded XML is finished once its root element closes.
                "#,
                within
            )
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::ParagraphChildren(_) => (
            "Paragraphs cannot contain other blocks".to_string(),
            r#"
This line is indented further than the paragraph before it, which would
make it a child of that paragraph. Paragraphs only hold text. Either
reduce the indent so it lines up with the paragraph, or put the text
inside a block:

    note: Heading
        Some text.
        more: detail
            "#
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::ExtraText(_, text) => (
            "Unexpected text".to_string(),
            format!(
                "The text '{}' follows a complete construct on this line and has no meaning there.",
                text
            ),
        ),
        ParsingError::UnexpectedAttribute(_, token) => (
            format!("Unrecognized attribute '{}'", token),
            r#"
Attributes given in parentheses must each begin with a sigil
identifying what they are:

    *identifier
    #name
    ?condition
            "#
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::DuplicateId(_, id) => (
            format!("Duplicate id '{}'", id),
            "Each id must be unique within a document. This one was used on an earlier block."
                .to_string(),
        ),
        ParsingError::DuplicateName(_, name) => (
            format!("Duplicate name '{}'", name),
            "Each name must be unique within a document. This one was used on an earlier block."
                .to_string(),
        ),
        ParsingError::MultipleIds(_) => (
            "More than one id".to_string(),
            "A block can only have one id; only one '*' attribute is allowed.".to_string(),
        ),
        ParsingError::MultipleNames(_) => (
            "More than one name".to_string(),
            "A block can only have one name; only one '#' attribute is allowed.".to_string(),
        ),
        ParsingError::UnresolvedAnnotation(_, text) => (
            format!("Unresolved annotation '{}'", text),
            format!(
                r#"
An annotation without a type in parentheses borrows the type of an
earlier annotation of the same text. No earlier annotation of '{}' was
found. Give this one its type explicitly:

    {{{}}}(type)
                "#,
                text, text
            )
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::FieldCount(_, expected, found) => (
            "Wrong number of fields".to_string(),
            format!(
                "The record set declared {} fields but this record has {}. Commas within a value can be escaped as '\\,'.",
                expected, found
            ),
        ),
        ParsingError::EmbeddedVersion(_, version) => (
            "Unsupported XML version".to_string(),
            format!(
                "Embedded XML must declare version=\"1.0\"; this island declared '{}'.",
                version
            ),
        ),
        ParsingError::EmbeddedEncoding(_, encoding) => (
            "Unsupported XML encoding".to_string(),
            format!(
                "Embedded XML is always UTF-8, but this island declared encoding '{}'.",
                encoding
            ),
        ),
        ParsingError::EmbeddedMalformed(_, reason) => (
            "Malformed embedded XML".to_string(),
            format!("The embedded XML is not well-formed: {}.", reason),
        ),
        ParsingError::InvalidName(_, name) => (
            format!("Invalid name '{}'", name),
            r#"
Element and field names must begin with a letter or underscore, and
continue with letters, digits, '-', '.', or '_'.
            "#
            .trim_ascii()
            .to_string(),
        ),
    }
}
