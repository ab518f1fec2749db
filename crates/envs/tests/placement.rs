//! Rejection-sampled object placement.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use envs::scene::{sample_positions, SceneSpec};
use envs::EnvError;

fn spec(min_spacing: f32, max_attempts: u32) -> SceneSpec {
    SceneSpec {
        placement_low: Vec3::new(0.0, 0.0, -0.2),
        placement_high: Vec3::new(0.5, 0.5, -0.2),
        min_spacing,
        max_placement_attempts: max_attempts,
        ..SceneSpec::default()
    }
}

#[test]
fn sampled_positions_respect_spacing() {
    let mut rng = SmallRng::seed_from_u64(3);
    let spec = spec(0.1, 1000);
    let positions = sample_positions(&mut rng, &spec, 4).unwrap();
    assert_eq!(positions.len(), 4);
    for (i, a) in positions.iter().enumerate() {
        for b in &positions[i + 1..] {
            assert!(a.distance(*b) >= 0.1, "spacing violated: {a} vs {b}");
        }
    }
}

#[test]
fn positions_stay_inside_the_volume() {
    let mut rng = SmallRng::seed_from_u64(11);
    let spec = spec(0.05, 1000);
    for p in sample_positions(&mut rng, &spec, 6).unwrap() {
        assert!((0.0..=0.5).contains(&p.x));
        assert!((0.0..=0.5).contains(&p.y));
        assert!((p.z - (-0.2)).abs() < 1e-6);
    }
}

#[test]
fn infeasible_spacing_errors_instead_of_spinning() {
    let mut rng = SmallRng::seed_from_u64(5);
    // Spacing far larger than the volume diagonal: only one placement fits.
    let spec = spec(10.0, 50);
    let err = sample_positions(&mut rng, &spec, 3).unwrap_err();
    match err {
        EnvError::PlacementInfeasible {
            placed,
            requested,
            attempts,
        } => {
            assert_eq!(placed, 1);
            assert_eq!(requested, 3);
            assert_eq!(attempts, 50);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn zero_objects_need_no_attempts() {
    let mut rng = SmallRng::seed_from_u64(1);
    let spec = spec(10.0, 1);
    assert!(sample_positions(&mut rng, &spec, 0).unwrap().is_empty());
}
