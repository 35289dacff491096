//! Transforms applied to whole slices of vectors
//!
//! With the `parallel` feature the work is spread over the rayon thread
//! pool, otherwise the slices are processed sequentially. Results are the
//! same either way.

use crate::error::MathError;
use crate::math::matrix4::Matrix4;
use crate::math::quaternion::Quaternion;
use crate::math::vec::Vector3;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::instrument;

/// Applies [`Matrix4::multiply_point3x4`] to every point.
#[instrument(skip_all, fields(points = points.len()))]
pub fn transform_points(matrix: &Matrix4, points: &mut [Vector3]) {
    let transform = |p: &mut Vector3| *p = matrix.multiply_point3x4(*p);

    #[cfg(feature = "parallel")]
    points.par_iter_mut().for_each(transform);

    #[cfg(not(feature = "parallel"))]
    points.iter_mut().for_each(transform);
}

/// Applies [`Matrix4::multiply_vector`] to every direction.
#[instrument(skip_all, fields(directions = directions.len()))]
pub fn transform_directions(matrix: &Matrix4, directions: &mut [Vector3]) {
    let transform = |d: &mut Vector3| *d = matrix.multiply_vector(*d);

    #[cfg(feature = "parallel")]
    directions.par_iter_mut().for_each(transform);

    #[cfg(not(feature = "parallel"))]
    directions.iter_mut().for_each(transform);
}

#[instrument(skip_all, fields(vectors = vectors.len()))]
pub fn rotate_vectors(rotation: Quaternion, vectors: &mut [Vector3]) {
    let rotate = |v: &mut Vector3| *v = rotation * *v;

    #[cfg(feature = "parallel")]
    vectors.par_iter_mut().for_each(rotate);

    #[cfg(not(feature = "parallel"))]
    vectors.iter_mut().for_each(rotate);
}

/// Applies [`Matrix4::multiply_point`] to every point.
///
/// The slice is only written when every point could be projected, otherwise
/// the first error in slice order is returned and the points are unchanged.
#[instrument(skip_all, fields(points = points.len()))]
pub fn project_points(matrix: &Matrix4, points: &mut [Vector3]) -> Result<(), MathError> {
    let project = |p: &Vector3| matrix.multiply_point(*p);

    #[cfg(feature = "parallel")]
    let results: Vec<Result<Vector3, MathError>> = points.par_iter().map(project).collect();

    #[cfg(not(feature = "parallel"))]
    let results: Vec<Result<Vector3, MathError>> = points.iter().map(project).collect();

    let mut projected = Vec::with_capacity(results.len());
    for r in results {
        projected.push(r?);
    }
    points.copy_from_slice(&projected);
    Ok(())
}
