//! Reference-platform evaluator for the continuity restraint

use crate::error::{Error, Result};
use crate::force::BondTable;

use super::{ParameterSnapshot, TopologySnapshot};

/// Compiled evaluator for one continuity force in one context.
///
/// Owns an immutable topology snapshot and a live-editable coefficient
/// snapshot. Evaluation is stateless apart from these: each call reads the
/// provided positions and accumulates into the provided force buffer.
#[derive(Debug)]
pub(crate) struct ContinuityKernel {
    topology: TopologySnapshot,
    parameters: ParameterSnapshot,
}

impl ContinuityKernel {
    /// Validate the bond table against the system size and capture both
    /// snapshots
    pub(crate) fn initialize(num_particles: usize, table: &BondTable) -> Result<Self> {
        let topology = TopologySnapshot::capture(table, num_particles)?;
        let parameters = ParameterSnapshot::capture(table);
        Ok(Self {
            topology,
            parameters,
        })
    }

    pub(crate) fn get_bond_count(&self) -> usize {
        self.topology.get_bond_count()
    }

    pub(crate) fn get_pair_count(&self) -> usize {
        self.topology.get_pair_count()
    }

    /// Replace the coefficient snapshot from the current table contents
    pub(crate) fn copy_parameters(&mut self, table: &BondTable) -> Result<()> {
        self.parameters.synchronize(table, &self.topology)
    }

    /// Evaluate the restraint for the given flat position buffer (stride 3).
    ///
    /// Returns the potential energy in kJ/mol (0.0 if `want_energy` is not
    /// set) and accumulates force contributions additively into `forces`
    /// when `want_forces` is set. A particle shared by several pairs receives
    /// the sum of all its contributions.
    pub(crate) fn execute(
        &self,
        positions: &[f64],
        forces: &mut [f64],
        want_forces: bool,
        want_energy: bool,
    ) -> Result<f64> {
        let mut energy = 0.0;
        for (index, (chain, coefficients)) in
            self.topology.iter().zip(self.parameters.iter()).enumerate()
        {
            for pair in chain.get_particles().windows(2) {
                let (first, second) = (pair[0], pair[1]);
                let p1 = &positions[3 * first..3 * first + 3];
                let p2 = &positions[3 * second..3 * second + 3];
                let delta = [p2[0] - p1[0], p2[1] - p1[1], p2[2] - p1[2]];
                let r = (delta[0] * delta[0] + delta[1] * delta[1] + delta[2] * delta[2]).sqrt();
                // The force direction is undefined for coincident particles
                if r == 0.0 {
                    return Err(Error::DegenerateGeometry {
                        bond: index,
                        first,
                        second,
                    });
                }
                let dr = r - coefficients.get_length();
                if want_energy {
                    energy += coefficients.get_stiffness() * dr * dr;
                }
                if want_forces {
                    let scale = 2.0 * coefficients.get_stiffness() * dr / r;
                    for axis in 0..3 {
                        forces[3 * first + axis] += scale * delta[axis];
                        forces[3 * second + axis] -= scale * delta[axis];
                    }
                }
            }
        }
        Ok(energy)
    }
}
