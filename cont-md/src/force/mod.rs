//! Force definitions and their parameter tables

mod bond;
mod continuity;

pub(crate) use bond::*;
pub use continuity::*;
