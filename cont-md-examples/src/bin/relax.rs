use anyhow::{anyhow, Result};
use ndarray::prelude::*;

use cont_md::force::ContinuityForce;
use cont_md::runtime::{Context, PlatformRegistry, System, REFERENCE_PLATFORM};

const NUM_PARTICLES: usize = 16;
const NUM_STEPS: usize = 400;
const TIME_STEP: f64 = 5e-3;
const REST_LENGTH: f64 = 1.0;
const STIFFNESS: f64 = 25.0;
const INITIAL_SPACING: f64 = 1.6;

/// Relax an overstretched chain towards its equilibrium spacing with plain
/// overdamped dynamics and record the trajectory
fn main() -> Result<()> {
    env_logger::init();
    // Read output path from args
    let output_file = std::env::args()
        .nth(1)
        .ok_or(anyhow!("Usage: relax <output path>"))?;

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
        STIFFNESS,
    )?;

    let mut context = Context::new(&system, &registry, REFERENCE_PLATFORM)?;
    force.compile(&mut context)?;

    // Start from a uniformly overstretched chain along x
    let mut positions = vec![0.0; 3 * NUM_PARTICLES];
    for i in 0..NUM_PARTICLES {
        positions[3 * i] = i as f64 * INITIAL_SPACING;
    }
    context.set_positions(&positions)?;

    // Allocate storage for the trajectory
    let mut results_x: Array2<f64> = Array2::zeros((NUM_STEPS, 3 * NUM_PARTICLES));
    let mut results_e: Array1<f64> = Array1::zeros((NUM_STEPS,));
    let mut results_t: Array1<f64> = Array1::zeros((NUM_STEPS,));

    for step in 0..NUM_STEPS {
        let energy = context.evaluate(true, true)?;

        results_t[step] = step as f64 * TIME_STEP;
        results_e[step] = energy;
        results_x.row_mut(step).assign(&aview1(&positions));

        // Overdamped update: drift along the force, scaled by inverse mass
        for i in 0..NUM_PARTICLES {
            let mobility = TIME_STEP / system.get_particle_mass(i)?;
            for axis in 0..3 {
                positions[3 * i + axis] += mobility * context.get_forces()[3 * i + axis];
            }
        }
        context.set_positions(&positions)?;
    }

    let mut writer = ndarray_npy::NpzWriter::new(std::fs::File::create(output_file)?);
    writer.add_array("x", &results_x)?;
    writer.add_array("E", &results_e)?;
    writer.add_array("t", &results_t)?;
    writer.add_array("k", &array![STIFFNESS])?;
    writer.add_array("l0", &array![REST_LENGTH])?;

    Ok(())
}
