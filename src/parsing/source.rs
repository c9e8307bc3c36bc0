//! Line-at-a-time access to the input, with a single slot of pushback.

use crate::parsing::parser::ParsingError;

/// One line of input. The number is 1-origin, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'i> {
    pub text: &'i str,
    pub number: usize,
}

impl<'i> Line<'i> {
    /// Column of the first non-whitespace character.
    pub fn indent(&self) -> usize {
        self.text
            .chars()
            .take_while(|c| c.is_whitespace())
            .count()
    }

    pub fn is_blank(&self) -> bool {
        self.text
            .trim()
            .is_empty()
    }
}

#[derive(Debug)]
pub struct Source<'i> {
    lines: std::str::Lines<'i>,
    number: usize,
    previous: Option<Line<'i>>,
    pending: bool,
}

impl<'i> Source<'i> {
    pub fn new(content: &'i str) -> Source<'i> {
        Source {
            lines: content.lines(),
            number: 0,
            previous: None,
            pending: false,
        }
    }

    pub fn next_line(&mut self) -> Option<Line<'i>> {
        if self.pending {
            self.pending = false;
            return self.previous;
        }

        let text = self
            .lines
            .next()?;
        self.number += 1;

        let line = Line {
            text: text.trim_end_matches('\r'),
            number: self.number,
        };
        self.previous = Some(line);
        Some(line)
    }

    /// Restore the most recently consumed line so the next call to
    /// next_line() returns it again. Only one line can be outstanding.
    pub fn push_back(&mut self) -> Result<(), ParsingError> {
        if self.pending || self
            .previous
            .is_none()
        {
            return Err(ParsingError::IllegalParserState(self.number));
        }
        self.pending = true;
        Ok(())
    }

    /// Number of the line most recently returned.
    pub fn number(&self) -> usize {
        self.number
    }
}
