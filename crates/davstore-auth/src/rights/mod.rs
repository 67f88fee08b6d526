//! Path rights policy.

pub mod policy;

pub use policy::{PathRights, Rights};
