#![allow(dead_code)]

use proptest::prelude::*;
use rich_delta::{AttributeMap, Delta, Op};
use serde_json::{json, Value};

pub fn attrs(value: Value) -> Option<AttributeMap> {
    value.as_object().cloned()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn text(value: &str) -> Delta {
    let mut delta = Delta::new();
    delta.insert(value, None);
    delta
}

// ── Random edits ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Action {
    Insert(String, usize),
    InsertEmbed(usize),
    Retain(usize, usize),
    Delete(usize),
}

fn insert_attributes(choice: usize) -> Option<AttributeMap> {
    match choice % 3 {
        0 => None,
        1 => attrs(json!({"bold": true})),
        _ => attrs(json!({"color": "blue"})),
    }
}

fn retain_attributes(choice: usize) -> Option<AttributeMap> {
    match choice % 5 {
        0 => None,
        1 => attrs(json!({"bold": true})),
        2 => attrs(json!({"bold": null})),
        3 => attrs(json!({"color": "red"})),
        _ => attrs(json!({"italic": true, "bold": null})),
    }
}

fn embed(choice: usize) -> Value {
    json!({ "image": format!("{choice}.png") })
}

fn insert_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => ("[a-z\n]{1,4}", 0..3usize).prop_map(|(text, choice)| Action::Insert(text, choice)),
        1 => (0..2usize).prop_map(Action::InsertEmbed),
    ]
}

pub fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        insert_action(),
        (1..5usize, 0..5usize).prop_map(|(length, choice)| Action::Retain(length, choice)),
        (1..5usize).prop_map(Action::Delete),
    ]
}

pub fn actions() -> impl Strategy<Value = Vec<Action>> {
    prop::collection::vec(action(), 0..8)
}

/// A document: a delta made of inserts only.
pub fn document() -> impl Strategy<Value = Delta> {
    prop::collection::vec(insert_action(), 0..6).prop_map(|actions| change_against(0, &actions))
}

/// Build a change that stays within a document of `length` units.
pub fn change_against(length: usize, actions: &[Action]) -> Delta {
    let mut delta = Delta::new();
    let mut remaining = length;
    for action in actions {
        match action {
            Action::Insert(text, choice) => {
                delta.push(Op::insert(text.clone(), insert_attributes(*choice)));
            }
            Action::InsertEmbed(choice) => {
                delta.insert_embed(embed(*choice), None);
            }
            Action::Retain(length, choice) => {
                let length = (*length).min(remaining);
                delta.retain(length, retain_attributes(*choice));
                remaining -= length;
            }
            Action::Delete(length) => {
                let length = (*length).min(remaining);
                delta.delete(length);
                remaining -= length;
            }
        }
    }
    delta
}

/// Build a change with no bound on what it retains or deletes.
pub fn free_change(actions: &[Action]) -> Delta {
    change_against(usize::MAX, actions)
}
