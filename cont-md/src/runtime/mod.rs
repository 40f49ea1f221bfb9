//! All things related to running contexts: systems, platforms and state

mod context;
mod registry;
mod state;
mod system;

pub use context::{Context, ContextId, KernelHandle, KernelID};
pub(crate) use context::KernelInstance;
pub use registry::*;
pub use system::*;
