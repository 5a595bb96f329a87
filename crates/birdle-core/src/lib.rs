//! birdle-core: Shared types for the birdle region filter
//!
//! Holds the pieces of the filter form that do not need a store: the `Any`
//! sentinel, choice lists, the allow-list splitter and field cleaning.

pub mod errors;
pub mod types;
pub mod validation;

pub use errors::*;
pub use types::*;
pub use validation::*;
