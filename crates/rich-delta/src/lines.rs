//! Line iteration over a document delta.
//!
//! [`Lines`] walks the inserts of a delta and yields one `(line, attributes)`
//! pair per separator, where `attributes` are those of the separator itself
//! (block formats such as alignment or headers live there). Content after the
//! last separator comes out once more with no attributes. The first non-insert
//! op ends the walk.

use crate::attributes::AttributeMap;
use crate::delta::Delta;
use crate::iterator::OpIterator;
use crate::op::{Op, OpType};

pub const DEFAULT_LINE_SEPARATOR: &str = "\n";

/// Char distance from byte position `start` to the next `separator` in `text`.
fn find_from(text: &str, separator: &str, start: usize) -> Option<usize> {
    if separator.is_empty() {
        return None;
    }
    let tail = &text[start..];
    tail.find(separator).map(|at| tail[..at].chars().count())
}

#[derive(Debug, Clone)]
pub struct Lines<'a> {
    iter: OpIterator<'a>,
    separator: &'a str,
    separator_length: usize,
    line: Delta,
    finished: bool,
}

impl<'a> Lines<'a> {
    pub(crate) fn new(delta: &'a Delta, separator: &'a str) -> Self {
        Self {
            iter: OpIterator::new(delta.ops()),
            separator,
            separator_length: separator.chars().count(),
            line: Delta::new(),
            finished: false,
        }
    }
}

impl Iterator for Lines<'_> {
    type Item = (Delta, Option<AttributeMap>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        while self.iter.has_next() {
            if self.iter.peek_type() != OpType::Insert {
                self.finished = true;
                return None;
            }
            let found = self
                .iter
                .peek()
                .and_then(Op::text)
                .and_then(|text| find_from(text, self.separator, self.iter.byte_offset()));
            match found {
                None => {
                    if let Some(op) = self.iter.next_op() {
                        self.line.push(op);
                    }
                }
                Some(0) => {
                    let attributes = self
                        .iter
                        .next_len(self.separator_length)
                        .and_then(|op| op.attributes().cloned());
                    return Some((std::mem::take(&mut self.line), attributes));
                }
                Some(index) => {
                    if let Some(op) = self.iter.next_len(index) {
                        self.line.push(op);
                    }
                }
            }
        }
        self.finished = true;
        if !self.line.is_empty() {
            return Some((std::mem::take(&mut self.line), None));
        }
        None
    }
}

impl Delta {
    pub fn lines(&self) -> Lines<'_> {
        Lines::new(self, DEFAULT_LINE_SEPARATOR)
    }

    pub fn lines_with<'a>(&'a self, separator: &'a str) -> Lines<'a> {
        Lines::new(self, separator)
    }

    /// Call `f` for every line; returning `false` stops the walk.
    pub fn each_line<F>(&self, f: F)
    where
        F: FnMut(&Delta, Option<&AttributeMap>) -> bool,
    {
        self.each_line_with(f, DEFAULT_LINE_SEPARATOR);
    }

    pub fn each_line_with<F>(&self, mut f: F, separator: &str)
    where
        F: FnMut(&Delta, Option<&AttributeMap>) -> bool,
    {
        for (line, attributes) in self.lines_with(separator) {
            if !f(&line, attributes.as_ref()) {
                break;
            }
        }
    }
}
