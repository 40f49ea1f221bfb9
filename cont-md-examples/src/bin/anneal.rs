use anyhow::{anyhow, Result};
use ndarray::prelude::*;
use rand::SeedableRng;
use rand::Rng;

use cont_md::force::ContinuityForce;
use cont_md::runtime::{Context, PlatformRegistry, System, REFERENCE_PLATFORM};

const NUM_PARTICLES: usize = 12;
const NUM_STEPS: usize = 600;
const TIME_STEP: f64 = 4e-3;
const REST_LENGTH: f64 = 1.0;
const STIFFNESS_START: f64 = 0.5;
const STIFFNESS_END: f64 = 40.0;
const POS_RNG_SEED: u64 = 987654321;

/// Anneal the restraint stiffness on a jittered chain while it relaxes.
///
/// Demonstrates the synchronization path: the bond coefficients are edited on
/// the live force every step and carried into the running context without
/// rebuilding it.
fn main() -> Result<()> {
    env_logger::init();
    // Read output path from args
    let output_file = std::env::args()
        .nth(1)
        .ok_or(anyhow!("Usage: anneal <output path>"))?;

    let registry = PlatformRegistry::with_reference();
    let mut system = System::new();
    for _ in 0..NUM_PARTICLES {
        system.add_particle(1.0);
    }

    let mut force = ContinuityForce::new();
    force.add_bond(
        (0..NUM_PARTICLES).collect(),
        NUM_PARTICLES,
        REST_LENGTH,
        STIFFNESS_START,
    )?;

    let mut context = Context::new(&system, &registry, REFERENCE_PLATFORM)?;
    force.compile(&mut context)?;

    // Jittered lattice along x as the starting configuration
    let mut rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(POS_RNG_SEED);
    let mut positions = vec![0.0; 3 * NUM_PARTICLES];
    for i in 0..NUM_PARTICLES {
        positions[3 * i] = i as f64 + rng.gen_range(-0.25..0.25);
        positions[3 * i + 1] = rng.gen_range(-0.25..0.25);
        positions[3 * i + 2] = rng.gen_range(-0.25..0.25);
    }
    context.set_positions(&positions)?;

    let mut results_e: Array1<f64> = Array1::zeros((NUM_STEPS,));
    let mut results_k: Array1<f64> = Array1::zeros((NUM_STEPS,));
    let mut results_t: Array1<f64> = Array1::zeros((NUM_STEPS,));

    for step in 0..NUM_STEPS {
        // Ramp the stiffness and push the new coefficients into the context
        let fraction = step as f64 / (NUM_STEPS - 1) as f64;
        let stiffness = STIFFNESS_START + (STIFFNESS_END - STIFFNESS_START) * fraction;
        force.set_bond_parameters(
            0,
            (0..NUM_PARTICLES).collect(),
            NUM_PARTICLES,
            REST_LENGTH,
            stiffness,
        )?;
        force.update_parameters_in_context(&mut context)?;

        let energy = context.evaluate(true, true)?;
        results_t[step] = step as f64 * TIME_STEP;
        results_e[step] = energy;
        results_k[step] = stiffness;

        for i in 0..NUM_PARTICLES {
            let mobility = TIME_STEP / system.get_particle_mass(i)?;
            for axis in 0..3 {
                positions[3 * i + axis] += mobility * context.get_forces()[3 * i + axis];
            }
        }
        context.set_positions(&positions)?;
    }

    let mut writer = ndarray_npy::NpzWriter::new(std::fs::File::create(output_file)?);
    writer.add_array("E", &results_e)?;
    writer.add_array("k", &results_k)?;
    writer.add_array("t", &results_t)?;
    writer.add_array("x", &aview1(&positions).to_owned())?;
    writer.add_array("l0", &array![REST_LENGTH])?;

    Ok(())
}
