use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scenemath::{Matrix4, Quaternion, Vector3};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

pub const EPSILON: f32 = 1e-4;

static INIT: Once = Once::new();

/// Routes both `tracing` spans and `log` records to the test output.
///
/// Use `RUST_LOG=scenemath=debug` to see the fallback warnings.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_log::LogTracer::init();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

/// Seeded so failures can be reproduced.
pub fn rng() -> StdRng {
    StdRng::seed_from_u64(0x5eed_0f_a11)
}

pub fn random_vector(rng: &mut impl Rng, range: f32) -> Vector3 {
    Vector3::new(
        rng.random_range(-range..range),
        rng.random_range(-range..range),
        rng.random_range(-range..range),
    )
}

pub fn random_rotation(rng: &mut impl Rng) -> Quaternion {
    loop {
        let q = Quaternion::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        // reject short samples, normalizing them loses precision
        if Quaternion::dot(q, q) > 0.1 {
            return q.normalized();
        }
    }
}

/// Euler angles in degrees away from the gimbal lock poles
pub fn random_euler(rng: &mut impl Rng) -> Vector3 {
    Vector3::new(
        rng.random_range(0.0..360.0),
        rng.random_range(-80.0..80.0),
        rng.random_range(0.0..360.0),
    )
}

pub fn assert_vector_eq(actual: Vector3, expected: Vector3) {
    assert!(
        actual.approx_eq(expected, EPSILON),
        "expected {expected}, got {actual}"
    );
}

pub fn assert_matrix_eq(actual: &Matrix4, expected: &Matrix4) {
    for i in 0..16 {
        assert!(
            (actual[i] - expected[i]).abs() < EPSILON,
            "element {i} differs\nexpected:\n{expected}got:\n{actual}"
        );
    }
}
