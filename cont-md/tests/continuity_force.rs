//! Tests compiling the continuity force into a context and checking energies
//! and forces against the analytic expectations

use cont_md::force::ContinuityForce;
use cont_md::runtime::{Context, PlatformRegistry, System, REFERENCE_PLATFORM};
use cont_md::Error;
use rand::SeedableRng;
use rand_distr::Distribution;

const FD_OFFSET: f64 = 1e-3;
const FD_TOLERANCE: f64 = 1e-2;
const ENERGY_TOLERANCE: f64 = 1e-5;
const POS_RNG_SEED: u64 = 12345678910;

/// Relative comparison against a scale of at least one
fn assert_close(expected: f64, found: f64, tolerance: f64) {
    let scale = expected.abs().max(1.0);
    assert!(
        (found - expected).abs() < tolerance * scale,
        "expected {}, found {}",
        expected,
        found
    );
}

/// Build a context over `num_particles` unit-mass particles on the reference
/// platform
fn reference_context(num_particles: usize) -> Context {
    let registry = PlatformRegistry::with_reference();
    let mut system = System::new();
    for _ in 0..num_particles {
        system.add_particle(1.0);
    }
    Context::new(&system, &registry, REFERENCE_PLATFORM).unwrap()
}

/// Central-difference approximation of the forces at the given positions
fn central_difference_forces(context: &mut Context, positions: &[f64]) -> Vec<f64> {
    let mut differences = vec![0.0; positions.len()];
    for dof in 0..positions.len() {
        let mut offset_positions = positions.to_vec();
        offset_positions[dof] = positions[dof] - FD_OFFSET;
        context.set_positions(&offset_positions).unwrap();
        let e1 = context.evaluate(false, true).unwrap();
        offset_positions[dof] = positions[dof] + FD_OFFSET;
        context.set_positions(&offset_positions).unwrap();
        let e2 = context.evaluate(false, true).unwrap();
        differences[dof] = (e1 - e2) / (2.0 * FD_OFFSET);
    }
    context.set_positions(positions).unwrap();
    differences
}

/// Positions of the ten-particle chain with a stretched last pair
fn stretched_chain_positions() -> Vec<f64> {
    let mut positions = Vec::new();
    for i in 0..10 {
        positions.push(i as f64);
        positions.push(0.7);
        positions.push(if i == 9 { 2.1 } else { 0.5 });
    }
    positions
}

#[test]
fn chain_energy_comes_from_the_stretched_pair() {
    let mut context = reference_context(10);
    let mut force = ContinuityForce::new();
    force.add_bond((0..10).collect(), 10, 1.0, 17.0).unwrap();
    force.compile(&mut context).unwrap();

    let positions = stretched_chain_positions();
    context.set_positions(&positions).unwrap();
    let energy = context.evaluate(true, true).unwrap();

    // Pairs 0..=8 sit exactly at the equilibrium spacing; only the last pair
    // is stretched
    let delta: [f64; 3] = [1.0, 0.0, 1.6];
    let dr = (delta[0] * delta[0] + delta[1] * delta[1] + delta[2] * delta[2]).sqrt() - 1.0;
    assert_close(17.0 * dr * dr, energy, ENERGY_TOLERANCE);
}

#[test]
fn chain_forces_match_central_differences() {
    let mut context = reference_context(10);
    let mut force = ContinuityForce::new();
    force.add_bond((0..10).collect(), 10, 1.0, 17.0).unwrap();
    force.compile(&mut context).unwrap();

    let positions = stretched_chain_positions();
    context.set_positions(&positions).unwrap();
    context.evaluate(true, true).unwrap();
    let forces = context.get_forces().to_vec();

    let differences = central_difference_forces(&mut context, &positions);
    for dof in 0..positions.len() {
        assert_close(differences[dof], forces[dof], FD_TOLERANCE);
    }
}

#[test]
fn parameters_update_without_rebuilding_the_context() {
    let mut context = reference_context(2);
    let mut force = ContinuityForce::new();
    force.add_bond(vec![0, 1], 2, 0.5, 1.5).unwrap();
    force.compile(&mut context).unwrap();

    context
        .set_positions(&[1.0, 0.0, 0.0, 2.0, 0.0, 0.0])
        .unwrap();
    let energy = context.evaluate(false, true).unwrap();
    assert_close(1.5 * (1.0 - 0.5) * (1.0 - 0.5), energy, ENERGY_TOLERANCE);

    force
        .set_bond_parameters(0, vec![0, 1], 2, 0.9, 2.2)
        .unwrap();
    // Edits stay invisible to the context until explicitly synchronized
    let energy = context.evaluate(false, true).unwrap();
    assert_close(1.5 * (1.0 - 0.5) * (1.0 - 0.5), energy, ENERGY_TOLERANCE);

    force.update_parameters_in_context(&mut context).unwrap();
    let energy = context.evaluate(false, true).unwrap();
    assert_close(2.2 * (1.0 - 0.9) * (1.0 - 0.9), energy, ENERGY_TOLERANCE);
}

#[test]
fn shared_particle_forces_cancel() {
    let mut context = reference_context(3);
    let mut force = ContinuityForce::new();
    force.add_bond(vec![0, 1], 2, 0.5, 17.0).unwrap();
    force.add_bond(vec![0, 2], 2, 0.5, 17.0).unwrap();
    force.compile(&mut context).unwrap();

    let positions = [0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
    context.set_positions(&positions).unwrap();
    let energy = context.evaluate(true, true).unwrap();

    // Both bonds are stretched by the same amount
    assert_close(2.0 * 17.0 * 0.5 * 0.5, energy, ENERGY_TOLERANCE);
    // The contributions of the two bonds on the shared particle cancel
    let forces = context.get_forces();
    for axis in 0..3 {
        assert_close(0.0, forces[axis], ENERGY_TOLERANCE);
    }
}

#[test]
fn single_particle_chain_contributes_nothing() {
    let mut context = reference_context(2);
    let mut force = ContinuityForce::new();
    force.add_bond(vec![0], 1, 1.0, 17.0).unwrap();
    force.compile(&mut context).unwrap();

    context
        .set_positions(&[0.0, 0.0, 0.0, 5.0, 0.0, 0.0])
        .unwrap();
    let energy = context.evaluate(true, true).unwrap();
    assert_eq!(energy, 0.0);
    assert!(context.get_forces().iter().all(|&f| f == 0.0));
}

#[test]
fn added_bond_after_compile_fails_synchronization() {
    let mut context = reference_context(3);
    let mut force = ContinuityForce::new();
    force.add_bond(vec![0, 1], 2, 1.0, 10.0).unwrap();
    force.compile(&mut context).unwrap();

    force.add_bond(vec![1, 2], 2, 1.0, 10.0).unwrap();
    assert!(matches!(
        force.update_parameters_in_context(&mut context),
        Err(Error::StructuralChange {
            compiled: 1,
            current: 2
        })
    ));
}

#[test]
fn changed_chain_length_after_compile_fails_synchronization() {
    let mut context = reference_context(3);
    let mut force = ContinuityForce::new();
    force.add_bond(vec![0, 1], 2, 1.0, 10.0).unwrap();
    force.compile(&mut context).unwrap();

    force
        .set_bond_parameters(0, vec![0, 1, 2], 3, 1.0, 10.0)
        .unwrap();
    assert!(matches!(
        force.update_parameters_in_context(&mut context),
        Err(Error::ChainTopologyChange {
            bond: 0,
            compiled: 2,
            current: 3
        })
    ));
}

#[test]
fn compile_validates_particle_indices() {
    let mut context = reference_context(3);
    let mut force = ContinuityForce::new();
    force.add_bond(vec![0, 5], 2, 1.0, 10.0).unwrap();
    assert!(matches!(
        force.compile(&mut context),
        Err(Error::ParticleIndexOutOfRange {
            bond: 0,
            particle: 5,
            num_particles: 3
        })
    ));
}

#[test]
fn coincident_particles_fail_evaluation() {
    let mut context = reference_context(2);
    let mut force = ContinuityForce::new();
    force.add_bond(vec![0, 1], 2, 1.0, 10.0).unwrap();
    force.compile(&mut context).unwrap();

    context
        .set_positions(&[1.0, 2.0, 3.0, 1.0, 2.0, 3.0])
        .unwrap();
    assert!(matches!(
        context.evaluate(true, true),
        Err(Error::DegenerateGeometry {
            bond: 0,
            first: 0,
            second: 1
        })
    ));
}

#[test]
fn synchronization_requires_prior_compilation() {
    let mut context = reference_context(2);
    let force = ContinuityForce::new();
    assert!(matches!(
        force.update_parameters_in_context(&mut context),
        Err(Error::NotAttached)
    ));
}

#[test]
fn double_compilation_into_one_context_is_rejected() {
    let mut context = reference_context(2);
    let mut force = ContinuityForce::new();
    force.add_bond(vec![0, 1], 2, 1.0, 10.0).unwrap();
    force.compile(&mut context).unwrap();
    assert!(matches!(
        force.compile(&mut context),
        Err(Error::AlreadyAttached)
    ));
}

#[test]
fn separate_contexts_stay_independent() {
    let registry = PlatformRegistry::with_reference();
    let mut system = System::new();
    system.add_particle(1.0);
    system.add_particle(1.0);

    let mut force = ContinuityForce::new();
    force.add_bond(vec![0, 1], 2, 0.5, 1.5).unwrap();

    let mut first = Context::new(&system, &registry, REFERENCE_PLATFORM).unwrap();
    let mut second = Context::new(&system, &registry, REFERENCE_PLATFORM).unwrap();
    force.compile(&mut first).unwrap();
    force.compile(&mut second).unwrap();

    let positions = [1.0, 0.0, 0.0, 2.0, 0.0, 0.0];
    first.set_positions(&positions).unwrap();
    second.set_positions(&positions).unwrap();

    // Synchronizing one context leaves the other on its compiled parameters
    force
        .set_bond_parameters(0, vec![0, 1], 2, 0.9, 2.2)
        .unwrap();
    force.update_parameters_in_context(&mut first).unwrap();

    let updated = first.evaluate(false, true).unwrap();
    let stale = second.evaluate(false, true).unwrap();
    assert_close(2.2 * (1.0 - 0.9) * (1.0 - 0.9), updated, ENERGY_TOLERANCE);
    assert_close(1.5 * (1.0 - 0.5) * (1.0 - 0.5), stale, ENERGY_TOLERANCE);
}

#[test]
fn unknown_platform_is_rejected() {
    let registry = PlatformRegistry::with_reference();
    let mut system = System::new();
    system.add_particle(1.0);
    assert!(matches!(
        Context::new(&system, &registry, "gpu"),
        Err(Error::UnknownPlatform(_))
    ));
}

#[test]
fn wrong_position_buffer_length_is_rejected() {
    let mut context = reference_context(2);
    assert!(matches!(
        context.set_positions(&[0.0; 5]),
        Err(Error::InvalidPositions {
            expected: 6,
            actual: 5
        })
    ));
}

#[test]
fn randomized_chain_forces_match_central_differences() {
    const NUM_PARTICLES: usize = 8;

    let mut rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(POS_RNG_SEED);
    let jitter = rand_distr::Uniform::new(-0.3, 0.3);

    // Jittered lattice along x, so no pair ever gets close to coincident
    let mut positions = Vec::new();
    for i in 0..NUM_PARTICLES {
        positions.push(i as f64 + jitter.sample(&mut rng));
        positions.push(jitter.sample(&mut rng));
        positions.push(jitter.sample(&mut rng));
    }

    let mut context = reference_context(NUM_PARTICLES);
    let mut force = ContinuityForce::new();
    force
        .add_bond((0..NUM_PARTICLES).collect(), NUM_PARTICLES, 0.8, 5.3)
        .unwrap();
    force.add_bond(vec![1, 4, 6], 3, 2.0, 2.1).unwrap();
    force.compile(&mut context).unwrap();

    context.set_positions(&positions).unwrap();
    context.evaluate(true, true).unwrap();
    let forces = context.get_forces().to_vec();

    let differences = central_difference_forces(&mut context, &positions);
    for dof in 0..positions.len() {
        assert_close(differences[dof], forces[dof], FD_TOLERANCE);
    }
}
