//! Effect causality engine

pub mod effect;
pub mod engine;

pub use effect::{Consequence, Effect};
