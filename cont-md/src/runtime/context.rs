//! A running simulation context holding compiled kernels and particle state

use std::sync::atomic::{AtomicU64, Ordering};

use slotmap::{DefaultKey, SlotMap};

use crate::error::{Error, Result};
use crate::force::BondTable;
use crate::kernel::ContinuityKernel;

use super::registry::{PlatformKind, PlatformRegistry};
use super::state::StateBuffer;
use super::system::System;

pub type KernelID = DefaultKey;

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of one context, unique for the lifetime of the process.
///
/// Forces key their compiled kernels by this, so identities must never
/// repeat even across contexts built from separate registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

impl ContextId {
    fn allocate() -> Self {
        Self(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Typed handle to one compiled kernel inside one context.
///
/// Returned from [`ContinuityForce::compile`](crate::force::ContinuityForce::compile)
/// and stored by the owning force, so the synchronization path never has to
/// recover a concrete kernel type from an opaque context entry.
#[derive(Debug, Clone, Copy)]
pub struct KernelHandle {
    context: ContextId,
    kernel: KernelID,
}

impl KernelHandle {
    pub(crate) fn new(context: ContextId, kernel: KernelID) -> Self {
        Self { context, kernel }
    }

    pub fn get_context_id(&self) -> ContextId {
        self.context
    }

    pub(crate) fn get_kernel_id(&self) -> KernelID {
        self.kernel
    }
}

/// Compiled kernel instances, keyed by the force kind they were built from
pub(crate) enum KernelInstance {
    Continuity(ContinuityKernel),
}

/// One running simulation context.
///
/// Owns an immutable copy of the system size, the position and force buffers,
/// and every kernel compiled into it. Forces stay editable outside; a context
/// only learns about coefficient edits through an explicit synchronization
/// call, never implicitly.
pub struct Context {
    /// Identity of this context
    id: ContextId,
    /// Kernel factory selector of the platform this context runs on
    platform: PlatformKind,
    /// Number of particles of the system this context was built for
    num_particles: usize,
    /// Flat particle positions, stride 3, in nm
    positions: StateBuffer,
    /// Flat force accumulation buffer, stride 3, in kJ/mol/nm
    forces: StateBuffer,
    /// Compiled kernels, in no particular order
    kernels: SlotMap<KernelID, KernelInstance>,
}

impl Context {
    /// Create a context for a system on the named platform
    pub fn new(system: &System, registry: &PlatformRegistry, platform_name: &str) -> Result<Self> {
        let (_, entry) = registry
            .get_platform_by_name(platform_name)
            .ok_or_else(|| Error::UnknownPlatform(platform_name.to_string()))?;
        let num_particles = system.get_particle_count();
        Ok(Self {
            id: ContextId::allocate(),
            platform: entry.get_kind(),
            num_particles,
            positions: StateBuffer::zeroed(3 * num_particles)?,
            forces: StateBuffer::zeroed(3 * num_particles)?,
            kernels: SlotMap::with_key(),
        })
    }

    pub fn get_id(&self) -> ContextId {
        self.id
    }

    pub fn get_particle_count(&self) -> usize {
        self.num_particles
    }

    pub(crate) fn get_platform_kind(&self) -> PlatformKind {
        self.platform
    }

    /// Set all particle positions from a flat buffer (stride 3)
    pub fn set_positions(&mut self, positions: &[f64]) -> Result<()> {
        let expected = 3 * self.num_particles;
        if positions.len() != expected {
            return Err(Error::InvalidPositions {
                expected,
                actual: positions.len(),
            });
        }
        self.positions.as_f64_slice_mut().copy_from_slice(positions);
        Ok(())
    }

    /// Get the current particle positions as a flat slice (stride 3)
    pub fn get_positions(&self) -> &[f64] {
        self.positions.as_f64_slice()
    }

    /// Get the forces accumulated by the last `evaluate` call (stride 3)
    pub fn get_forces(&self) -> &[f64] {
        self.forces.as_f64_slice()
    }

    /// Run every compiled kernel against the current positions.
    ///
    /// The force buffer is cleared first, then each kernel accumulates its
    /// contributions into it (if `want_forces` is set). Returns the total
    /// potential energy in kJ/mol, or 0.0 if `want_energy` is not set.
    pub fn evaluate(&mut self, want_forces: bool, want_energy: bool) -> Result<f64> {
        self.forces.fill(0.0);
        let positions = self.positions.as_f64_slice();
        let forces = self.forces.as_f64_slice_mut();
        let mut energy = 0.0;
        for (_, kernel) in self.kernels.iter() {
            match kernel {
                KernelInstance::Continuity(kernel) => {
                    energy += kernel.execute(positions, forces, want_forces, want_energy)?;
                }
            }
        }
        Ok(energy)
    }

    /// Get an (estimate) of the memory allocated for particle state
    pub fn get_memory_usage(&self) -> usize {
        self.positions.get_memory_usage() + self.forces.get_memory_usage()
    }

    pub(crate) fn install_kernel(&mut self, kernel: KernelInstance) -> KernelID {
        self.kernels.insert(kernel)
    }

    /// Forward a coefficient synchronization to one compiled continuity kernel
    pub(crate) fn copy_continuity_parameters(
        &mut self,
        kernel: KernelID,
        table: &BondTable,
    ) -> Result<()> {
        match self.kernels.get_mut(kernel) {
            None => Err(Error::NotAttached),
            Some(KernelInstance::Continuity(kernel)) => kernel.copy_parameters(table),
        }
    }
}
