//! Structures describing the particle system a context is built for

use crate::error::{Error, Result};

/// Definition of the particles a simulation operates on.
///
/// Forces reference particles by the zero-based index returned from
/// [`add_particle`](System::add_particle). The system itself carries no
/// positions; those live in each [`Context`](crate::runtime::Context).
#[derive(Debug, Default)]
pub struct System {
    /// Particle masses in amu, indexed by particle
    masses: Vec<f64>,
}

impl System {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a particle and return its index
    pub fn add_particle(&mut self, mass: f64) -> usize {
        self.masses.push(mass);
        self.masses.len() - 1
    }

    /// Get the number of particles
    pub fn get_particle_count(&self) -> usize {
        self.masses.len()
    }

    /// Get the mass of a single particle
    pub fn get_particle_mass(&self, index: usize) -> Result<f64> {
        self.masses
            .get(index)
            .copied()
            .ok_or(Error::UnknownParticle {
                index,
                count: self.masses.len(),
            })
    }
}
