//! The change list.
//!
//! A [`Delta`] is an ordered list of [`Op`]s kept in canonical form by
//! [`Delta::push`]:
//!
//! - adjacent deletes are merged,
//! - an insert never follows a delete (it is moved in front of it),
//! - adjacent text inserts with equal attributes are concatenated,
//! - adjacent retains with equal attributes are summed.
//!
//! The algebra (`compose`, `invert`, `transform`, `slice`, `concat`) never
//! mutates its inputs and always returns a fresh delta.

use serde_json::Value;
use tracing::trace;

use crate::attributes::{self, AttributeMap};
use crate::iterator::OpIterator;
use crate::op::{InsertValue, Op, OpType};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Delta {
    pub(crate) ops: Vec<Op>,
}

/// Text that carries no visible content: empty, whitespace or zero-width spaces.
fn is_blank(text: &str) -> bool {
    text.chars().all(|c| c.is_whitespace() || c == '\u{200B}')
}

impl Delta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already decoded list of ops as-is, without canonicalizing.
    ///
    /// Zero-length ops are dropped since they carry no change.
    pub fn from_ops(ops: Vec<Op>) -> Self {
        let ops = ops.into_iter().filter(|op| op.length() > 0).collect();
        Self { ops }
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<Op> {
        self.ops
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Op> {
        self.ops.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    // ── Building ──────────────────────────────────────────────────────────

    /// Insert text. Blank text is ignored; use [`push`](Self::push) to add a
    /// bare separator such as `"\n"`.
    pub fn insert(
        &mut self,
        text: impl Into<String>,
        attributes: Option<AttributeMap>,
    ) -> &mut Self {
        let text = text.into();
        if is_blank(&text) {
            return self;
        }
        self.push(Op::insert(text, attributes))
    }

    /// Insert a single embed. A null embed is ignored.
    pub fn insert_embed(&mut self, embed: Value, attributes: Option<AttributeMap>) -> &mut Self {
        if embed.is_null() {
            return self;
        }
        self.push(Op::insert_embed(embed, attributes))
    }

    pub fn delete(&mut self, length: usize) -> &mut Self {
        if length == 0 {
            return self;
        }
        self.push(Op::delete(length))
    }

    pub fn retain(&mut self, length: usize, attributes: Option<AttributeMap>) -> &mut Self {
        if length == 0 {
            return self;
        }
        self.push(Op::retain(length, attributes))
    }

    /// Append an op, merging it into the tail where the canonical form allows.
    pub fn push(&mut self, new_op: Op) -> &mut Self {
        if new_op.length() == 0 {
            return self;
        }
        let mut index = self.ops.len();
        let Some(last) = self.ops.last_mut() else {
            self.ops.push(new_op);
            return self;
        };
        if let (Op::Delete(length), Op::Delete(more)) = (&mut *last, &new_op) {
            *length += more;
            return self;
        }
        // Inserting before or after a delete at the same spot is equivalent,
        // so inserts always go first.
        if last.is_delete() && new_op.is_insert() {
            index -= 1;
            if index == 0 {
                self.ops.insert(0, new_op);
                return self;
            }
        }
        let previous = &mut self.ops[index - 1];
        if previous.attributes() == new_op.attributes() {
            match (previous, &new_op) {
                (
                    Op::Insert {
                        value: InsertValue::Text(text),
                        ..
                    },
                    Op::Insert {
                        value: InsertValue::Text(more),
                        ..
                    },
                ) => {
                    text.push_str(more);
                    return self;
                }
                (Op::Retain { length, .. }, Op::Retain { length: more, .. }) => {
                    *length += more;
                    return self;
                }
                _ => {}
            }
        }
        self.ops.insert(index, new_op);
        self
    }

    /// Drop a trailing attribute-free retain.
    pub fn chop(&mut self) -> &mut Self {
        if matches!(
            self.ops.last(),
            Some(Op::Retain {
                attributes: None,
                ..
            })
        ) {
            self.ops.pop();
        }
        self
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    pub fn filter<P>(&self, mut predicate: P) -> Vec<Op>
    where
        P: FnMut(&Op) -> bool,
    {
        self.ops.iter().filter(|op| predicate(*op)).cloned().collect()
    }

    pub fn for_each<F>(&self, f: F)
    where
        F: FnMut(&Op),
    {
        self.ops.iter().for_each(f);
    }

    pub fn map<T, F>(&self, f: F) -> Vec<T>
    where
        F: FnMut(&Op) -> T,
    {
        self.ops.iter().map(f).collect()
    }

    /// Split ops into `(passed, failed)`.
    pub fn partition<P>(&self, mut predicate: P) -> (Vec<Op>, Vec<Op>)
    where
        P: FnMut(&Op) -> bool,
    {
        self.ops.iter().cloned().partition(|op| predicate(op))
    }

    pub fn reduce<T, F>(&self, initial: T, f: F) -> T
    where
        F: FnMut(T, &Op) -> T,
    {
        self.ops.iter().fold(initial, f)
    }

    /// Total units covered by all ops.
    pub fn length(&self) -> usize {
        self.reduce(0, |length, op| length + op.length())
    }

    /// How much this delta grows (or shrinks) the document.
    pub fn change_length(&self) -> isize {
        self.reduce(0isize, |length, op| match op {
            Op::Insert { .. } => length + op.length() as isize,
            Op::Delete(n) => length - *n as isize,
            Op::Retain { .. } => length,
        })
    }

    /// Concatenated text of all text inserts. Embeds contribute nothing.
    pub fn plain_text(&self) -> String {
        self.ops.iter().filter_map(Op::text).collect()
    }

    // ── Algebra ───────────────────────────────────────────────────────────

    /// The ops covering document positions `[start, end)`.
    ///
    /// # Panics
    ///
    /// If `end < start`.
    pub fn slice(&self, start: usize, end: usize) -> Delta {
        assert!(start <= end, "slice end {end} precedes start {start}");
        let mut ops = Vec::new();
        let mut iter = OpIterator::new(&self.ops);
        let mut index = 0;
        while index < end && iter.has_next() {
            let collect = index >= start;
            let wanted = if collect { end - index } else { start - index };
            let Some(op) = iter.next_len(wanted.min(iter.peek_length())) else {
                break;
            };
            index += op.length();
            if collect {
                ops.push(op);
            }
        }
        Delta { ops }
    }

    pub fn slice_from(&self, start: usize) -> Delta {
        self.slice(start, usize::MAX)
    }

    /// `self` followed by `other`, merging across the seam.
    pub fn concat(&self, other: &Delta) -> Delta {
        let mut delta = self.clone();
        if let Some((first, rest)) = other.ops.split_first() {
            delta.push(first.clone());
            delta.ops.extend_from_slice(rest);
        }
        delta
    }

    /// The single delta equivalent to applying `self` and then `other`.
    pub fn compose(&self, other: &Delta) -> Delta {
        let mut this_iter = OpIterator::new(&self.ops);
        let mut other_iter = OpIterator::new(&other.ops);
        let mut delta = Delta::new();

        // A plain leading retain in `other` cannot touch the inserts it skips.
        if let Some(Op::Retain {
            length: first_length,
            attributes: None,
        }) = other_iter.peek()
        {
            let mut first_left = *first_length;
            while this_iter.peek_type() == OpType::Insert && this_iter.peek_length() <= first_left {
                first_left -= this_iter.peek_length();
                delta.ops.extend(this_iter.next_op());
            }
            other_iter.next_len(first_length - first_left);
        }

        while this_iter.has_next() || other_iter.has_next() {
            if other_iter.peek_type() == OpType::Insert {
                delta.ops_push(other_iter.next_op());
            } else if this_iter.peek_type() == OpType::Delete {
                delta.ops_push(this_iter.next_op());
            } else {
                let length = this_iter.peek_length().min(other_iter.peek_length());
                let (Some(this_op), Some(other_op)) =
                    (this_iter.next_len(length), other_iter.next_len(length))
                else {
                    break;
                };
                match other_op {
                    Op::Retain {
                        attributes: other_attributes,
                        ..
                    } => {
                        // Keep nulls when composing onto a retain, drop them on inserts.
                        let attributes = attributes::compose(
                            this_op.attributes(),
                            other_attributes.as_ref(),
                            this_op.is_retain(),
                        );
                        let new_op = match this_op {
                            Op::Insert { value, .. } => Op::Insert { value, attributes },
                            _ => Op::Retain { length, attributes },
                        };
                        delta.push(new_op.clone());
                        if !other_iter.has_next() && delta.ops.last() == Some(&new_op) {
                            let mut delta = delta.concat(&this_iter.rest());
                            delta.chop();
                            trace!(ops = delta.ops.len(), "compose short-circuited on trailing retain");
                            return delta;
                        }
                    }
                    Op::Delete(_) if this_op.is_retain() => {
                        delta.push(other_op);
                    }
                    // An insert deleted by `other` cancels out.
                    _ => {}
                }
            }
        }
        delta.chop();
        trace!(ops = delta.ops.len(), "composed delta");
        delta
    }

    /// The delta that undoes `self` on the document `base` it was applied to.
    pub fn invert(&self, base: &Delta) -> Delta {
        let mut inverted = Delta::new();
        let mut base_iter = OpIterator::new(&base.ops);
        for op in &self.ops {
            if op.is_insert() {
                inverted.delete(op.length());
                continue;
            }
            if let Op::Retain {
                length,
                attributes: None,
            } = op
            {
                inverted.retain(*length, None);
            }
            // Walk the stretch of `base` this op covered, clamped to its end.
            let mut left = op.length();
            while left > 0 && base_iter.has_next() {
                let step = left.min(base_iter.peek_length());
                let Some(base_op) = base_iter.next_len(step) else {
                    break;
                };
                left -= step;
                match op {
                    Op::Delete(_) => {
                        inverted.push(base_op);
                    }
                    Op::Retain {
                        attributes: Some(op_attributes),
                        ..
                    } => {
                        let attributes =
                            attributes::invert(Some(op_attributes), base_op.attributes());
                        inverted.retain(step, attributes);
                    }
                    _ => {}
                }
            }
        }
        inverted.chop();
        trace!(ops = inverted.ops.len(), "inverted delta");
        inverted
    }

    /// Rewrite `other`, made concurrently with `self`, to apply after `self`.
    ///
    /// `priority` says `self` happened first: its inserts go before `other`'s
    /// at the same spot and its formats win on shared keys.
    pub fn transform(&self, other: &Delta, priority: bool) -> Delta {
        let mut this_iter = OpIterator::new(&self.ops);
        let mut other_iter = OpIterator::new(&other.ops);
        let mut delta = Delta::new();

        while this_iter.has_next() || other_iter.has_next() {
            if this_iter.peek_type() == OpType::Insert
                && (priority || other_iter.peek_type() != OpType::Insert)
            {
                let length = this_iter.peek_length();
                this_iter.next_op();
                delta.retain(length, None);
            } else if other_iter.peek_type() == OpType::Insert {
                delta.ops_push(other_iter.next_op());
            } else {
                let length = this_iter.peek_length().min(other_iter.peek_length());
                let (Some(this_op), Some(other_op)) =
                    (this_iter.next_len(length), other_iter.next_len(length))
                else {
                    break;
                };
                // Our delete either makes theirs redundant or removes what they retain.
                if this_op.is_delete() {
                    continue;
                }
                if other_op.is_delete() {
                    delta.push(other_op);
                } else {
                    let attributes = attributes::transform(
                        this_op.attributes(),
                        other_op.attributes(),
                        priority,
                    );
                    delta.retain(length, attributes);
                }
            }
        }
        delta.chop();
        trace!(ops = delta.ops.len(), priority, "transformed delta");
        delta
    }

    /// Where `index` ends up once this delta is applied.
    pub fn transform_position(&self, mut index: usize, priority: bool) -> usize {
        let mut iter = OpIterator::new(&self.ops);
        let mut offset = 0;
        while iter.has_next() && offset <= index {
            let length = iter.peek_length();
            let op_type = iter.peek_type();
            iter.next_op();
            match op_type {
                OpType::Delete => {
                    index -= length.min(index - offset);
                    continue;
                }
                OpType::Insert if offset < index || !priority => index += length,
                _ => {}
            }
            offset += length;
        }
        index
    }

    fn ops_push(&mut self, op: Option<Op>) {
        if let Some(op) = op {
            self.push(op);
        }
    }
}

impl<'a> IntoIterator for &'a Delta {
    type Item = &'a Op;
    type IntoIter = std::slice::Iter<'a, Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

impl From<Vec<Op>> for Delta {
    fn from(ops: Vec<Op>) -> Self {
        Delta::from_ops(ops)
    }
}
