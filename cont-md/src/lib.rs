//! A library for restraining particle chains in particle dynamics simulations
//!
//! The central object is the [`force::ContinuityForce`]: an editable table of
//! chain bonds that can be compiled into any number of running
//! [`runtime::Context`]s. Compilation freezes the chain topology per context;
//! coefficient edits on the live force are carried over explicitly with
//! [`force::ContinuityForce::update_parameters_in_context`] without rebuilding
//! the context.

mod error;

pub mod force;
pub mod runtime;

pub(crate) mod kernel;

pub use error::{Error, Result};
