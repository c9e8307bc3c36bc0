use sam::parsing::{parse, ParsingError};

/// Check that parsing fails with an error of the expected kind, reported
/// against the expected line.
fn expect_error(content: &str, expected: ParsingError) {
    match parse(content) {
        Ok(_) => panic!(
            "Expected parsing to fail, but it succeeded for input: {}",
            content
        ),
        Err(error) => {
            if std::mem::discriminant(&error) != std::mem::discriminant(&expected) {
                panic!(
                    "Expected error type like {:?} but got: {:?} for input '{}'",
                    expected, error, content
                );
            }
            assert_eq!(error.line(), expected.line(), "wrong line for {:?}", error);
        }
    }
}

#[test]
fn missing_declaration() {
    expect_error(
        r#"
section: Introduction
        "#
        .trim_ascii(),
        ParsingError::InvalidDeclaration(1),
    );
}

#[test]
fn paragraph_with_children() {
    expect_error(
        r#"
sam:
Some opening text.

    indented: too far
        "#
        .trim_ascii(),
        ParsingError::ParagraphChildren(4),
    );
}

#[test]
fn duplicate_ids() {
    expect_error(
        r#"
sam:
section:(*intro) First

section:(*intro) Second
        "#
        .trim_ascii(),
        ParsingError::DuplicateId(4, String::new()),
    );
}

#[test]
fn distinct_ids() {
    let result = parse(
        r#"
sam:
section:(*one) First
section:(*two) Second
        "#
        .trim_ascii(),
    );
    assert!(result.is_ok());
}

#[test]
fn duplicate_names() {
    expect_error(
        r#"
sam:
~~~(#shared)
>>>(image.png #shared)
        "#
        .trim_ascii(),
        ParsingError::DuplicateName(3, String::new()),
    );
}

#[test]
fn two_ids_on_one_block() {
    expect_error(
        r#"
sam:
section:(*a *b) Title
        "#
        .trim_ascii(),
        ParsingError::MultipleIds(2),
    );
}

#[test]
fn two_names_on_one_block() {
    expect_error(
        r#"
sam:
section:(#a #b) Title
        "#
        .trim_ascii(),
        ParsingError::MultipleNames(2),
    );
}

#[test]
fn bad_attribute() {
    expect_error(
        r#"
sam:
section:(plain) Title
        "#
        .trim_ascii(),
        ParsingError::UnexpectedAttribute(2, String::new()),
    );
}

#[test]
fn annotation_without_history() {
    expect_error(
        r#"
sam:
We use {Y} here.
        "#
        .trim_ascii(),
        ParsingError::UnresolvedAnnotation(2, String::new()),
    );
}

#[test]
fn too_many_fields() {
    expect_error(
        r#"
sam:
people:: name, age
    Ann, 30, London
        "#
        .trim_ascii(),
        ParsingError::FieldCount(3, 2, 3),
    );
}

#[test]
fn unclosed_code_block() {
    expect_error(
        r#"
sam:
```(python)
print("hello")
        "#
        .trim_ascii(),
        ParsingError::UnexpectedEndOfInput(2, "code block"),
    );
}

#[test]
fn embedded_versions() {
    expect_error(
        r#"
sam:
<?xml version="2.0"?>
<a/>
        "#
        .trim_ascii(),
        ParsingError::EmbeddedVersion(2, String::new()),
    );
    expect_error(
        r#"
sam:
<?xml version="1.0" encoding="ISO-8859-1"?>
<a/>
        "#
        .trim_ascii(),
        ParsingError::EmbeddedEncoding(2, String::new()),
    );
}

#[test]
fn embedded_malformed() {
    expect_error(
        r#"
sam:
<?xml version="1.0"?>
<a>
  <b></c>
</a>
        "#
        .trim_ascii(),
        ParsingError::EmbeddedMalformed(4, String::new()),
    );
}

#[test]
fn embedded_unfinished() {
    expect_error(
        r#"
sam:
<?xml version="1.0"?>
<a>
  <b/>
        "#
        .trim_ascii(),
        ParsingError::UnexpectedEndOfInput(2, "embedded XML"),
    );
}

#[test]
fn citation_with_trailing_text() {
    expect_error(
        r#"
sam:
"""[Hamlet] and more
    To be or not to be.
        "#
        .trim_ascii(),
        ParsingError::ExtraText(2, String::new()),
    );
}

#[test]
fn invalid_element_name() {
    expect_error(
        r#"
sam:
section:
    -bad: name
        "#
        .trim_ascii(),
        ParsingError::InvalidName(3, String::new()),
    );
}

#[test]
fn invalid_field_name() {
    expect_error(
        r#"
sam:
people:: name, 2nd
        "#
        .trim_ascii(),
        ParsingError::InvalidName(2, String::new()),
    );
}

#[test]
fn error_messages_name_the_line() {
    let error = parse("sam:\nsection:(*x) a\nother:(*x) b").unwrap_err();
    assert_eq!(error.to_string(), "line 3: id 'x' is already in use");
}
