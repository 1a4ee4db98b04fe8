//! Split-on-read cursor over a list of ops.
//!
//! Every multi-delta walk (compose, transform, slice, line iteration) reads
//! ops through an [`OpIterator`] so partial overlap is handled in one place.
//!
//! Past the end of the list the cursor behaves like an endless attribute-free
//! retain: [`OpIterator::peek_type`] reports `Retain`,
//! [`OpIterator::peek_length`] reports `usize::MAX`, and reads yield plain
//! retains of the requested length.

use crate::delta::Delta;
use crate::op::{Op, OpType};

#[derive(Debug, Clone)]
pub struct OpIterator<'a> {
    ops: &'a [Op],
    index: usize,
    /// Units consumed from the current op.
    offset: usize,
    /// Byte position of `offset` inside a text insert, zero otherwise.
    byte_offset: usize,
    /// Length of the current op, counted once when the cursor lands on it.
    op_length: usize,
}

impl<'a> OpIterator<'a> {
    pub fn new(ops: &'a [Op]) -> Self {
        Self {
            ops,
            index: 0,
            offset: 0,
            byte_offset: 0,
            op_length: ops.first().map_or(0, Op::length),
        }
    }

    pub fn has_next(&self) -> bool {
        self.index < self.ops.len()
    }

    /// The op under the cursor, whole, regardless of how much was consumed.
    pub fn peek(&self) -> Option<&'a Op> {
        self.ops.get(self.index)
    }

    /// Units already consumed from the op under the cursor.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Units left in the op under the cursor.
    pub fn peek_length(&self) -> usize {
        if self.has_next() {
            self.op_length - self.offset
        } else {
            usize::MAX
        }
    }

    pub(crate) fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    pub fn peek_type(&self) -> OpType {
        self.peek().map_or(OpType::Retain, Op::op_type)
    }

    /// Read the next `length` units of the current op.
    ///
    /// Never crosses into the following op. Returns `None` for a zero-length
    /// read.
    ///
    /// # Panics
    ///
    /// If `length` exceeds [`peek_length`](Self::peek_length).
    pub fn next_len(&mut self, length: usize) -> Option<Op> {
        if length == 0 {
            return None;
        }
        if !self.has_next() {
            return Some(Op::retain(length, None));
        }
        Some(self.take(length))
    }

    /// Read the remainder of the current op, `None` at the end of the list.
    pub fn next_op(&mut self) -> Option<Op> {
        if !self.has_next() {
            return None;
        }
        Some(self.take(self.peek_length()))
    }

    /// Everything not yet consumed, splitting the current op at the cursor.
    pub fn rest(&self) -> Delta {
        if !self.has_next() {
            return Delta::new();
        }
        if self.offset == 0 {
            return Delta::from_ops(self.ops[self.index..].to_vec());
        }
        let mut cursor = self.clone();
        let mut ops = Vec::with_capacity(self.ops.len() - self.index);
        ops.extend(cursor.next_op());
        ops.extend_from_slice(&self.ops[cursor.index..]);
        Delta::from_ops(ops)
    }

    fn take(&mut self, length: usize) -> Op {
        let remaining = self.op_length - self.offset;
        assert!(
            length <= remaining,
            "cursor read of {length} units crosses an op boundary ({remaining} left)"
        );
        let (out, bytes) = self.ops[self.index].slice(self.byte_offset, length);
        if length == remaining {
            self.index += 1;
            self.offset = 0;
            self.byte_offset = 0;
            self.op_length = self.ops.get(self.index).map_or(0, Op::length);
        } else {
            self.offset += length;
            self.byte_offset += bytes;
        }
        out
    }
}
