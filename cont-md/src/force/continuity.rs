//! The continuity force: a chain-spacing restraint over particle chains

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::kernel::ContinuityKernel;
use crate::runtime::{Context, ContextId, KernelHandle, KernelInstance, PlatformKind};

use super::bond::BondTable;

/// A bonded force restraining the spacing of consecutive particles along
/// ordered chains to a per-bond equilibrium length.
///
/// Every consecutive pair of a chain contributes `k * (r - length)^2` to the
/// potential energy, with `r` the current pair distance. Lengths are measured
/// in nm, energies in kJ/mol and force constants in kJ/mol/nm^2.
///
/// Bonds are appended with [`add_bond`](Self::add_bond) and stay editable
/// afterwards through [`set_bond_parameters`](Self::set_bond_parameters).
/// Compiling the force into a [`Context`] freezes its topology for that
/// context; later coefficient edits reach the context through
/// [`update_parameters_in_context`](Self::update_parameters_in_context)
/// without invalidating any compiled state.
#[derive(Default)]
pub struct ContinuityForce {
    /// All bonds defined on this force
    bonds: BondTable,
    /// Compiled kernels of this force, one per attached context
    attachments: HashMap<ContextId, KernelHandle>,
}

impl ContinuityForce {
    pub fn new() -> Self {
        Self {
            bonds: BondTable::new(),
            attachments: HashMap::new(),
        }
    }

    /// Get the number of bonds defined on this force
    pub fn get_num_bonds(&self) -> usize {
        self.bonds.len()
    }

    /// Add a bond over an ordered particle chain and return its index.
    ///
    /// `count` must equal `particles.len()`; the particle indices themselves
    /// are only validated against a system when the force is compiled.
    pub fn add_bond(
        &mut self,
        particles: Vec<usize>,
        count: usize,
        length: f64,
        stiffness: f64,
    ) -> Result<usize> {
        self.bonds.add(particles, count, length, stiffness)
    }

    /// Get the chain, chain length and coefficients of a bond
    pub fn get_bond_parameters(&self, index: usize) -> Result<(&[usize], usize, f64, f64)> {
        let bond = self.bonds.get(index)?;
        Ok((
            bond.get_particles(),
            bond.get_count(),
            bond.get_length(),
            bond.get_stiffness(),
        ))
    }

    /// Replace all fields of an existing bond.
    ///
    /// Contexts compiled before this call keep their topology snapshot; only
    /// `length` and `stiffness` edits can be carried over to them via
    /// [`update_parameters_in_context`](Self::update_parameters_in_context).
    pub fn set_bond_parameters(
        &mut self,
        index: usize,
        particles: Vec<usize>,
        count: usize,
        length: f64,
        stiffness: f64,
    ) -> Result<()> {
        self.bonds.set(index, particles, count, length, stiffness)
    }

    /// This restraint never wraps distances across periodic boundaries
    pub fn uses_periodic_boundary_conditions(&self) -> bool {
        false
    }

    /// Compile this force into a context.
    ///
    /// Copies the current bond table into an immutable topology snapshot plus
    /// a coefficient snapshot owned by the new kernel, validating every
    /// particle index against the context's system size. The returned handle
    /// is also stored internally so the synchronization path can find the
    /// kernel again.
    pub fn compile(&mut self, context: &mut Context) -> Result<KernelHandle> {
        if self.attachments.contains_key(&context.get_id()) {
            return Err(Error::AlreadyAttached);
        }
        let kernel = match context.get_platform_kind() {
            PlatformKind::Reference => {
                ContinuityKernel::initialize(context.get_particle_count(), &self.bonds)?
            }
        };
        log::debug!(
            "compiled continuity force into context {:?} ({} bonds, {} pairs)",
            context.get_id(),
            kernel.get_bond_count(),
            kernel.get_pair_count()
        );
        let kernel_id = context.install_kernel(KernelInstance::Continuity(kernel));
        let handle = KernelHandle::new(context.get_id(), kernel_id);
        self.attachments.insert(context.get_id(), handle);
        Ok(handle)
    }

    /// Copy the current per-bond coefficients into an attached context.
    ///
    /// Only `length` and `stiffness` values are carried over. The bond count
    /// and every chain length must be unchanged since compilation; the set of
    /// particles in a bond cannot be changed, nor can new bonds be added.
    pub fn update_parameters_in_context(&self, context: &mut Context) -> Result<()> {
        let handle = self
            .attachments
            .get(&context.get_id())
            .ok_or(Error::NotAttached)?;
        context.copy_continuity_parameters(handle.get_kernel_id(), &self.bonds)?;
        log::debug!(
            "synchronized {} bond parameter sets into context {:?}",
            self.bonds.len(),
            context.get_id()
        );
        Ok(())
    }
}
