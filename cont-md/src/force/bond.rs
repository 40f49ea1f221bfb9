//! Bond definitions and the parameter table backing a continuity force

use crate::error::{Error, Result};

/// One restraint term: an ordered chain of particle indices restrained to a
/// common equilibrium spacing.
///
/// The chain is fixed once the bond has been created; only `length` and
/// `stiffness` may change afterwards. Particle indices are validated against
/// the target system when the owning force is compiled into a context, not
/// here.
#[derive(Debug, Clone)]
pub(crate) struct ChainBond {
    /// Ordered particle indices; consecutive pairs are restrained
    particles: Vec<usize>,
    /// Cached chain length, kept equal to `particles.len()`
    count: usize,
    /// Equilibrium spacing in nm
    length: f64,
    /// Force constant in kJ/mol/nm^2
    stiffness: f64,
}

impl ChainBond {
    pub(crate) fn new(
        particles: Vec<usize>,
        count: usize,
        length: f64,
        stiffness: f64,
    ) -> Result<Self> {
        if count != particles.len() {
            return Err(Error::ParticleCountMismatch {
                count,
                actual: particles.len(),
            });
        }
        Ok(Self {
            particles,
            count,
            length,
            stiffness,
        })
    }

    /// Get the particle chain of this bond
    pub(crate) fn get_particles(&self) -> &[usize] {
        &self.particles
    }

    /// Get the number of particles in the chain
    pub(crate) fn get_count(&self) -> usize {
        self.count
    }

    /// Get the equilibrium spacing in nm
    pub(crate) fn get_length(&self) -> f64 {
        self.length
    }

    /// Get the force constant in kJ/mol/nm^2
    pub(crate) fn get_stiffness(&self) -> f64 {
        self.stiffness
    }
}

/// Ordered store of all bonds defined on a force.
///
/// Topology is append-only: bonds are never removed and their zero-based
/// index is assigned in insertion order and stays stable for the lifetime of
/// the table.
#[derive(Debug, Default)]
pub(crate) struct BondTable {
    bonds: Vec<ChainBond>,
}

impl BondTable {
    pub(crate) fn new() -> Self {
        Self { bonds: Vec::new() }
    }

    pub(crate) fn len(&self) -> usize {
        self.bonds.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &ChainBond> {
        self.bonds.iter()
    }

    /// Append a new bond and return its index
    pub(crate) fn add(
        &mut self,
        particles: Vec<usize>,
        count: usize,
        length: f64,
        stiffness: f64,
    ) -> Result<usize> {
        self.bonds
            .push(ChainBond::new(particles, count, length, stiffness)?);
        Ok(self.bonds.len() - 1)
    }

    pub(crate) fn get(&self, index: usize) -> Result<&ChainBond> {
        self.bonds.get(index).ok_or(Error::BondIndexOutOfRange {
            index,
            count: self.bonds.len(),
        })
    }

    /// Replace all fields of an existing bond.
    ///
    /// The table layer accepts a changed chain here; contexts compiled
    /// earlier reject such an edit when parameters are next synchronized.
    pub(crate) fn set(
        &mut self,
        index: usize,
        particles: Vec<usize>,
        count: usize,
        length: f64,
        stiffness: f64,
    ) -> Result<()> {
        let bond_count = self.bonds.len();
        let entry = self.bonds.get_mut(index).ok_or(Error::BondIndexOutOfRange {
            index,
            count: bond_count,
        })?;
        *entry = ChainBond::new(particles, count, length, stiffness)?;
        Ok(())
    }
}
