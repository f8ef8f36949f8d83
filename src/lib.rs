//! # prettyrepr
//!
//! Width-aware, cycle-safe representations of nested values and
//! constructor-style objects, plus JSON save/load helpers.
//!
//! ```
//! use prettyrepr::{render, ReprOptions, Value};
//!
//! let value = Value::dict([("b", Value::from(2)), ("a", Value::from(1))]);
//! assert_eq!(render(&value, &ReprOptions::default()), "{'a': 1, 'b': 2}");
//! ```

pub mod config;
pub mod persist;
pub mod renderer;
pub mod value;

#[cfg(test)]
mod tests;

pub use persist::*;
pub use renderer::*;
pub use value::*;
