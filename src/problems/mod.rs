//! # Problems
//!
//! Ready-made [`Chromosome`](crate::chromosome::Chromosome) encodings:
//!
//! - [`Word`]: evolve a string towards a target word.
//! - [`Route`]: evolve a closed tour over a [`CostMatrix`].
pub mod route;
pub mod word;

pub use route::{CostMatrix, Route};
pub use word::Word;
