//! Formatting attributes and their algebra.
//!
//! An [`AttributeMap`] is a flat `key -> value` map carried by inserts and
//! retains. Keys have three states:
//!
//! - missing: no opinion about the format,
//! - present with a value: set the format,
//! - present with `Value::Null`: clear the format.
//!
//! Every function here returns `None` rather than an empty map, so callers
//! never have to tell "absent" and "empty" apart.

use serde_json::{Map, Value};

pub type AttributeMap = Map<String, Value>;

fn non_empty(attributes: AttributeMap) -> Option<AttributeMap> {
    if attributes.is_empty() {
        None
    } else {
        Some(attributes)
    }
}

/// Apply `b` on top of `a`.
///
/// Values in `b` overwrite those in `a`. A null in `b` clears the key. With
/// `keep_null` the null itself is kept in the result, which is what a retain
/// needs: its pending "clear" still has to reach the document underneath.
pub fn compose(
    a: Option<&AttributeMap>,
    b: Option<&AttributeMap>,
    keep_null: bool,
) -> Option<AttributeMap> {
    let mut attributes = AttributeMap::new();
    if let Some(a) = a {
        for (key, value) in a {
            match b.and_then(|b| b.get(key)) {
                Some(Value::Null) if !keep_null => {}
                Some(other) => {
                    attributes.insert(key.clone(), other.clone());
                }
                None => {
                    attributes.insert(key.clone(), value.clone());
                }
            }
        }
    }
    if let Some(b) = b {
        for (key, value) in b {
            if a.is_some_and(|a| a.contains_key(key)) {
                continue;
            }
            if keep_null || !value.is_null() {
                attributes.insert(key.clone(), value.clone());
            }
        }
    }
    non_empty(attributes)
}

/// The smallest map that turns `a` into `b` when composed onto it.
pub fn diff(a: Option<&AttributeMap>, b: Option<&AttributeMap>) -> Option<AttributeMap> {
    let empty = AttributeMap::new();
    let a = a.unwrap_or(&empty);
    let b = b.unwrap_or(&empty);
    let mut attributes = AttributeMap::new();
    for key in a.keys().chain(b.keys()) {
        if attributes.contains_key(key) {
            continue;
        }
        let target = b.get(key);
        if a.get(key) != target {
            attributes.insert(key.clone(), target.cloned().unwrap_or(Value::Null));
        }
    }
    non_empty(attributes)
}

/// The map that undoes `attributes` on content formatted with `base`.
///
/// Only keys named by `attributes` are touched. A key the base never had is
/// reverted with an explicit null.
pub fn invert(
    attributes: Option<&AttributeMap>,
    base: Option<&AttributeMap>,
) -> Option<AttributeMap> {
    let attributes = attributes?;
    let mut inverted = AttributeMap::new();
    for (key, value) in attributes {
        match base.and_then(|base| base.get(key)) {
            Some(previous) if previous != value => {
                inverted.insert(key.clone(), previous.clone());
            }
            Some(_) => {}
            None => {
                inverted.insert(key.clone(), Value::Null);
            }
        }
    }
    non_empty(inverted)
}

/// Adjust `right` so it can be applied after the concurrent `left`.
///
/// Without `priority` the right side wins outright and `left` is not
/// consulted. With `priority` the left side already owns every key it
/// mentions, so those keys are dropped from `right`.
pub fn transform(
    left: Option<&AttributeMap>,
    right: Option<&AttributeMap>,
    priority: bool,
) -> Option<AttributeMap> {
    let right = right?;
    let Some(left) = left else {
        return non_empty(right.clone());
    };
    if !priority {
        return non_empty(right.clone());
    }
    let attributes = right
        .iter()
        .filter(|(key, _)| !left.contains_key(*key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    non_empty(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> AttributeMap {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    // ── compose ───────────────────────────────────────────────────────────

    #[test]
    fn compose_with_missing_side() {
        let format = attrs(json!({"bold": true, "color": "red"}));
        assert_eq!(compose(None, Some(&format), false), Some(format.clone()));
        assert_eq!(compose(Some(&format), None, false), Some(format.clone()));
        assert_eq!(compose(None, None, false), None);
    }

    #[test]
    fn compose_adds_and_overrides() {
        let format = attrs(json!({"bold": true, "color": "red"}));
        assert_eq!(
            compose(Some(&format), Some(&attrs(json!({"italic": true}))), false),
            Some(attrs(json!({"bold": true, "italic": true, "color": "red"})))
        );
        assert_eq!(
            compose(Some(&format), Some(&attrs(json!({"color": "blue"}))), false),
            Some(attrs(json!({"bold": true, "color": "blue"})))
        );
    }

    #[test]
    fn compose_null_removes_key() {
        let format = attrs(json!({"bold": true, "color": "red"}));
        assert_eq!(
            compose(Some(&format), Some(&attrs(json!({"bold": null}))), false),
            Some(attrs(json!({"color": "red"})))
        );
        assert_eq!(
            compose(
                Some(&format),
                Some(&attrs(json!({"bold": null, "color": null}))),
                false
            ),
            None
        );
        assert_eq!(
            compose(Some(&format), Some(&attrs(json!({"italic": null}))), false),
            Some(format.clone())
        );
    }

    #[test]
    fn compose_keep_null_preserves_clear() {
        let format = attrs(json!({"color": "blue"}));
        let update = attrs(json!({"bold": true, "color": "red", "font": null}));
        assert_eq!(
            compose(Some(&format), Some(&update), true),
            Some(attrs(json!({"bold": true, "color": "red", "font": null})))
        );
        assert_eq!(
            compose(
                Some(&attrs(json!({"bold": true}))),
                Some(&attrs(json!({"bold": null}))),
                true
            ),
            Some(attrs(json!({"bold": null})))
        );
    }

    // ── diff ──────────────────────────────────────────────────────────────

    #[test]
    fn diff_matrix() {
        let format = attrs(json!({"bold": true, "color": "red"}));
        assert_eq!(diff(None, Some(&format)), Some(format.clone()));
        assert_eq!(
            diff(Some(&format), None),
            Some(attrs(json!({"bold": null, "color": null})))
        );
        assert_eq!(diff(Some(&format), Some(&format)), None);
        assert_eq!(diff(None, None), None);
        assert_eq!(
            diff(
                Some(&format),
                Some(&attrs(json!({"bold": true, "italic": true, "color": "red"})))
            ),
            Some(attrs(json!({"italic": true})))
        );
        assert_eq!(
            diff(Some(&format), Some(&attrs(json!({"bold": true})))),
            Some(attrs(json!({"color": null})))
        );
        assert_eq!(
            diff(
                Some(&format),
                Some(&attrs(json!({"bold": true, "color": "blue"})))
            ),
            Some(attrs(json!({"color": "blue"})))
        );
    }

    // ── invert ────────────────────────────────────────────────────────────

    #[test]
    fn invert_missing_attributes() {
        let base = attrs(json!({"bold": true}));
        assert_eq!(invert(None, Some(&base)), None);
        assert_eq!(invert(None, None), None);
    }

    #[test]
    fn invert_without_base_clears_every_key() {
        let format = attrs(json!({"bold": true}));
        assert_eq!(
            invert(Some(&format), None),
            Some(attrs(json!({"bold": null})))
        );
    }

    #[test]
    fn invert_matrix() {
        assert_eq!(
            invert(
                Some(&attrs(json!({"bold": true}))),
                Some(&attrs(json!({"italic": true})))
            ),
            Some(attrs(json!({"bold": null})))
        );
        assert_eq!(
            invert(
                Some(&attrs(json!({"bold": null}))),
                Some(&attrs(json!({"bold": true})))
            ),
            Some(attrs(json!({"bold": true})))
        );
        assert_eq!(
            invert(
                Some(&attrs(json!({"color": "red"}))),
                Some(&attrs(json!({"color": "blue"})))
            ),
            Some(attrs(json!({"color": "blue"})))
        );
        assert_eq!(
            invert(
                Some(&attrs(json!({"color": "red"}))),
                Some(&attrs(json!({"color": "red"})))
            ),
            None
        );
    }

    #[test]
    fn invert_combined() {
        let attributes =
            attrs(json!({"bold": true, "italic": null, "color": "red", "size": "12px"}));
        let base =
            attrs(json!({"font": "serif", "italic": true, "color": "blue", "size": "12px"}));
        assert_eq!(
            invert(Some(&attributes), Some(&base)),
            Some(attrs(json!({"bold": null, "italic": true, "color": "blue"})))
        );
    }

    // ── transform ─────────────────────────────────────────────────────────

    #[test]
    fn transform_matrix() {
        let left = attrs(json!({"bold": true, "color": "red", "font": null}));
        let right = attrs(json!({"color": "blue", "font": "serif", "italic": true}));

        assert_eq!(transform(None, Some(&left), false), Some(left.clone()));
        assert_eq!(transform(Some(&right), None, false), None);
        assert_eq!(transform(None, None, false), None);
        assert_eq!(
            transform(Some(&left), Some(&right), true),
            Some(attrs(json!({"italic": true})))
        );
    }

    #[test]
    fn transform_without_priority_ignores_left() {
        let left = attrs(json!({"bold": true, "color": "red", "font": null}));
        let right = attrs(json!({"color": "blue", "font": "serif", "italic": true}));
        assert_eq!(transform(Some(&left), Some(&right), false), Some(right.clone()));
        assert_eq!(
            transform(Some(&right), Some(&right), false),
            Some(right.clone())
        );
    }

    #[test]
    fn transform_priority_drops_keys_left_already_set() {
        assert_eq!(
            transform(
                Some(&attrs(json!({"bold": true}))),
                Some(&attrs(json!({"bold": true, "italic": true}))),
                true
            ),
            Some(attrs(json!({"italic": true})))
        );
        assert_eq!(
            transform(
                Some(&attrs(json!({"bold": true}))),
                Some(&attrs(json!({"bold": false}))),
                true
            ),
            None
        );
    }
}
