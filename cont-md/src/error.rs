//! Error types shared across the crate

use thiserror::Error;

/// Errors surfaced by bond-table edits, context compilation, parameter
/// synchronization and kernel evaluation.
///
/// All of these are detected synchronously at the call that triggers them.
/// They signal contract violations, not transient conditions, so none of them
/// should be retried.
#[derive(Debug, Error)]
pub enum Error {
    /// A bond index was passed that no bond has been assigned to.
    #[error("bond index {index} is out of range ({count} bonds defined)")]
    BondIndexOutOfRange { index: usize, count: usize },

    /// The cached particle count of a bond does not match its chain length.
    #[error("particle count {count} does not match chain length {actual}")]
    ParticleCountMismatch { count: usize, actual: usize },

    /// A bond references a particle the target system does not have.
    /// Detected when the force is compiled into a context.
    #[error("bond {bond} references particle {particle}, but the system only has {num_particles} particles")]
    ParticleIndexOutOfRange {
        bond: usize,
        particle: usize,
        num_particles: usize,
    },

    /// The bond table grew or shrank after the force was compiled.
    #[error("bond count changed since compilation ({compiled} compiled, {current} now)")]
    StructuralChange { compiled: usize, current: usize },

    /// The chain of an existing bond changed length after the force was
    /// compiled. Only coefficient edits may be synchronized into a context.
    #[error("chain of bond {bond} changed length since compilation ({compiled} compiled, {current} now)")]
    ChainTopologyChange {
        bond: usize,
        compiled: usize,
        current: usize,
    },

    /// Two consecutive particles of a restrained chain coincide, leaving the
    /// force direction undefined.
    #[error("zero separation between particles {first} and {second} of bond {bond}")]
    DegenerateGeometry {
        bond: usize,
        first: usize,
        second: usize,
    },

    /// No platform with the given name is registered.
    #[error("no platform registered under the name {0:?}")]
    UnknownPlatform(String),

    /// A platform name was registered twice.
    #[error("platform {0:?} is already registered")]
    PlatformRedefined(String),

    /// The force has not been compiled into the given context.
    #[error("force is not attached to this context")]
    NotAttached,

    /// The force has already been compiled into the given context.
    #[error("force is already attached to this context")]
    AlreadyAttached,

    /// A position buffer of the wrong length was supplied.
    #[error("expected {expected} position components, got {actual}")]
    InvalidPositions { expected: usize, actual: usize },

    /// A particle index was passed that the system does not have.
    #[error("particle index {index} is out of range ({count} particles defined)")]
    UnknownParticle { index: usize, count: usize },

    /// Allocation of a state buffer failed.
    #[error("cannot allocate state buffer: {0}")]
    Allocation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
