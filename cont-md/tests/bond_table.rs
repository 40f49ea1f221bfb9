//! Tests for the editable bond table behind the continuity force

use cont_md::force::ContinuityForce;
use cont_md::Error;

#[test]
fn bond_indices_count_up_from_zero() {
    let mut force = ContinuityForce::new();
    for expected in 0..5 {
        let index = force
            .add_bond(vec![expected, expected + 1], 2, 1.0, 10.0)
            .unwrap();
        assert_eq!(index, expected);
    }
    assert_eq!(force.get_num_bonds(), 5);
}

#[test]
fn parameters_round_trip_through_set_and_get() {
    let mut force = ContinuityForce::new();
    force.add_bond(vec![0, 1, 2], 3, 1.0, 17.0).unwrap();

    force
        .set_bond_parameters(0, vec![3, 4, 5, 6], 4, 1.25, 42.5)
        .unwrap();

    let (particles, count, length, stiffness) = force.get_bond_parameters(0).unwrap();
    assert_eq!(particles, &[3, 4, 5, 6]);
    assert_eq!(count, 4);
    assert_eq!(length, 1.25);
    assert_eq!(stiffness, 42.5);
}

#[test]
fn mismatched_count_is_rejected() {
    let mut force = ContinuityForce::new();
    let result = force.add_bond(vec![0, 1], 3, 1.0, 10.0);
    assert!(matches!(
        result,
        Err(Error::ParticleCountMismatch { count: 3, actual: 2 })
    ));
    assert_eq!(force.get_num_bonds(), 0);

    force.add_bond(vec![0, 1], 2, 1.0, 10.0).unwrap();
    let result = force.set_bond_parameters(0, vec![0, 1, 2], 2, 1.0, 10.0);
    assert!(matches!(
        result,
        Err(Error::ParticleCountMismatch { count: 2, actual: 3 })
    ));
    // The entry is untouched after the rejected edit
    let (particles, count, _, _) = force.get_bond_parameters(0).unwrap();
    assert_eq!(particles, &[0, 1]);
    assert_eq!(count, 2);
}

#[test]
fn out_of_range_index_is_rejected() {
    let mut force = ContinuityForce::new();
    force.add_bond(vec![0, 1], 2, 1.0, 10.0).unwrap();

    assert!(matches!(
        force.get_bond_parameters(1),
        Err(Error::BondIndexOutOfRange { index: 1, count: 1 })
    ));
    assert!(matches!(
        force.set_bond_parameters(7, vec![0, 1], 2, 1.0, 10.0),
        Err(Error::BondIndexOutOfRange { index: 7, count: 1 })
    ));
}

#[test]
fn never_uses_periodic_boundary_conditions() {
    assert!(!ContinuityForce::new().uses_periodic_boundary_conditions());
}
