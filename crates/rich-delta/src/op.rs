//! The atomic change operation.
//!
//! An [`Op`] is one of:
//! - `Insert`: new content, either text or a single embed (length 1)
//! - `Delete(n)`: remove `n` units
//! - `Retain`: skip `n` units, optionally reformatting them
//!
//! Lengths count Unicode scalar values.

use serde_json::Value;

use crate::attributes::AttributeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpType {
    Insert,
    Delete,
    Retain,
}

/// Content carried by an insert.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertValue {
    Text(String),
    /// An opaque object (image, formula, mention, ...). Always length 1.
    Embed(Value),
}

impl InsertValue {
    pub fn length(&self) -> usize {
        match self {
            InsertValue::Text(text) => text.chars().count(),
            InsertValue::Embed(_) => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Insert {
        value: InsertValue,
        attributes: Option<AttributeMap>,
    },
    Delete(usize),
    Retain {
        length: usize,
        attributes: Option<AttributeMap>,
    },
}

fn normalize(attributes: Option<AttributeMap>) -> Option<AttributeMap> {
    attributes.filter(|attributes| !attributes.is_empty())
}

/// Bytes spanned by the first `length` chars of `text`.
fn char_span(text: &str, length: usize) -> usize {
    text.char_indices().nth(length).map_or(text.len(), |(at, _)| at)
}

impl Op {
    pub fn insert(text: impl Into<String>, attributes: Option<AttributeMap>) -> Self {
        Op::Insert {
            value: InsertValue::Text(text.into()),
            attributes: normalize(attributes),
        }
    }

    pub fn insert_embed(embed: Value, attributes: Option<AttributeMap>) -> Self {
        Op::Insert {
            value: InsertValue::Embed(embed),
            attributes: normalize(attributes),
        }
    }

    pub fn delete(length: usize) -> Self {
        Op::Delete(length)
    }

    pub fn retain(length: usize, attributes: Option<AttributeMap>) -> Self {
        Op::Retain {
            length,
            attributes: normalize(attributes),
        }
    }

    pub fn op_type(&self) -> OpType {
        match self {
            Op::Insert { .. } => OpType::Insert,
            Op::Delete(_) => OpType::Delete,
            Op::Retain { .. } => OpType::Retain,
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, Op::Insert { .. })
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Op::Delete(_))
    }

    pub fn is_retain(&self) -> bool {
        matches!(self, Op::Retain { .. })
    }

    pub fn is_text_insert(&self) -> bool {
        matches!(
            self,
            Op::Insert {
                value: InsertValue::Text(_),
                ..
            }
        )
    }

    /// Number of document units this op covers.
    pub fn length(&self) -> usize {
        match self {
            Op::Insert { value, .. } => value.length(),
            Op::Delete(length) => *length,
            Op::Retain { length, .. } => *length,
        }
    }

    pub fn attributes(&self) -> Option<&AttributeMap> {
        match self {
            Op::Insert { attributes, .. } | Op::Retain { attributes, .. } => attributes.as_ref(),
            Op::Delete(_) => None,
        }
    }

    /// The inserted text, if this is a text insert.
    pub fn text(&self) -> Option<&str> {
        match self {
            Op::Insert {
                value: InsertValue::Text(text),
                ..
            } => Some(text),
            _ => None,
        }
    }

    /// The `length` units of this op starting at `byte_offset`, plus the
    /// number of bytes they span.
    ///
    /// `byte_offset` only matters for text and must sit on a char boundary.
    /// Embeds are indivisible and come back whole.
    pub(crate) fn slice(&self, byte_offset: usize, length: usize) -> (Op, usize) {
        match self {
            Op::Insert {
                value: InsertValue::Text(text),
                attributes,
            } => {
                let tail = &text[byte_offset..];
                let span = char_span(tail, length);
                let op = Op::Insert {
                    value: InsertValue::Text(tail[..span].to_string()),
                    attributes: attributes.clone(),
                };
                (op, span)
            }
            Op::Insert { .. } => (self.clone(), 0),
            Op::Delete(_) => (Op::Delete(length), 0),
            Op::Retain { attributes, .. } => (
                Op::Retain {
                    length,
                    attributes: attributes.clone(),
                },
                0,
            ),
        }
    }
}
