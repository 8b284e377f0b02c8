// src/temporal/mod.rs

pub mod behaviors;
pub mod predicate;
pub mod quantifiers;
pub mod relations;

pub use behaviors::{Behaviors, Side};
pub use predicate::{BinaryPredicate, UnaryPredicate};
pub use quantifiers::Window;
