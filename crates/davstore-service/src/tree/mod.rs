//! Path to node resolution.

pub mod resolver;

pub use resolver::{Resolution, TreeResolver};
