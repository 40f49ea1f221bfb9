//! Snapshots separating compiled topology from live-editable coefficients

use crate::error::{Error, Result};
use crate::force::BondTable;

/// Immutable copy of one bond's chain, taken when the force is compiled
#[derive(Debug)]
pub(crate) struct BondTopology {
    particles: Box<[usize]>,
}

impl BondTopology {
    pub(crate) fn get_particles(&self) -> &[usize] {
        &self.particles
    }

    pub(crate) fn get_count(&self) -> usize {
        self.particles.len()
    }
}

/// Immutable copy of the whole bond topology of a force.
///
/// Captured exactly once per context. This is the only place where particle
/// indices are validated against the size of the target system; the bond
/// table itself defers that check.
#[derive(Debug)]
pub(crate) struct TopologySnapshot {
    bonds: Vec<BondTopology>,
}

impl TopologySnapshot {
    pub(crate) fn capture(table: &BondTable, num_particles: usize) -> Result<Self> {
        let mut bonds = Vec::with_capacity(table.len());
        for (index, bond) in table.iter().enumerate() {
            for &particle in bond.get_particles() {
                if particle >= num_particles {
                    return Err(Error::ParticleIndexOutOfRange {
                        bond: index,
                        particle,
                        num_particles,
                    });
                }
            }
            bonds.push(BondTopology {
                particles: bond.get_particles().into(),
            });
        }
        Ok(Self { bonds })
    }

    pub(crate) fn get_bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Total number of restrained consecutive pairs
    pub(crate) fn get_pair_count(&self) -> usize {
        self.bonds
            .iter()
            .map(|bond| bond.get_count().saturating_sub(1))
            .sum()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &BondTopology> {
        self.bonds.iter()
    }
}

/// Per-bond coefficients of the harmonic restraint
#[derive(Debug, Clone, Copy)]
pub(crate) struct BondCoefficients {
    length: f64,
    stiffness: f64,
}

impl BondCoefficients {
    pub(crate) fn get_length(&self) -> f64 {
        self.length
    }

    pub(crate) fn get_stiffness(&self) -> f64 {
        self.stiffness
    }
}

/// Mutable copy of all bond coefficients of a compiled force.
///
/// Unlike the topology this may be replaced wholesale while the context
/// lives, so coefficient edits never invalidate the compiled chain layout.
#[derive(Debug)]
pub(crate) struct ParameterSnapshot {
    coefficients: Vec<BondCoefficients>,
}

impl ParameterSnapshot {
    pub(crate) fn capture(table: &BondTable) -> Self {
        Self {
            coefficients: table
                .iter()
                .map(|bond| BondCoefficients {
                    length: bond.get_length(),
                    stiffness: bond.get_stiffness(),
                })
                .collect(),
        }
    }

    /// Replace all coefficients from the current table contents.
    ///
    /// The table must still describe the compiled topology: the bond count
    /// and every per-bond chain length have to match the snapshot. Edits to
    /// the particle indices themselves are not scanned for and are undefined
    /// with respect to the compiled chains.
    pub(crate) fn synchronize(
        &mut self,
        table: &BondTable,
        topology: &TopologySnapshot,
    ) -> Result<()> {
        if table.len() != topology.get_bond_count() {
            return Err(Error::StructuralChange {
                compiled: topology.get_bond_count(),
                current: table.len(),
            });
        }
        for (index, (bond, compiled)) in table.iter().zip(topology.iter()).enumerate() {
            if bond.get_count() != compiled.get_count() {
                return Err(Error::ChainTopologyChange {
                    bond: index,
                    compiled: compiled.get_count(),
                    current: bond.get_count(),
                });
            }
        }
        self.coefficients = Self::capture(table).coefficients;
        Ok(())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &BondCoefficients> {
        self.coefficients.iter()
    }
}
