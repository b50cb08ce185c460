#![deny(missing_docs)]

//! Implementation of [Dancing Links](https://en.wikipedia.org/wiki/Dancing_Links)
//! and [Algorithm X](https://en.wikipedia.org/wiki/Knuth%27s_Algorithm_X) for solving
//!  [exact cover](https://en.wikipedia.org/wiki/Exact_cover) problems.
//!
//! The matrix is built incrementally from named columns and rows on a
//! [`Solver`]. Primary columns must be covered exactly once and secondary
//! columns at most once. Solutions are either pushed to a cancellable listener
//! by [`Solver::solve`] or pulled one at a time from [`Solver::solutions`].
//!
//! Typed problems can implement [`ExactCover`] and be turned into a solver with
//! [`ExactCover::encode`].

mod error;
pub(crate) mod matrix;
pub mod problem;
mod report;
pub mod solutions;
mod solver;

pub use error::{Error, Result};
pub use problem::{Encoding, ExactCover};
pub use report::Solution;
pub use solutions::Solutions;
pub use solver::{ColumnRef, Config, Listener, Solver};
