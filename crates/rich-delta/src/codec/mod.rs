//! Boundary encodings for deltas.
//!
//! - [`json`]: the `{"ops": [{insert|delete|retain, attributes?}, ...]}` form

pub mod json;
