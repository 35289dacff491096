//! Scenemath is the affine math kernel shared by the engine runtime and its
//! scripting layer.
//!
//! It provides vectors, quaternions, 3x3 and 4x4 matrices, colors, planes and
//! axis aligned bounds as plain `Copy` values. Operations that can fail on
//! degenerate input return a [`MathError`] instead of producing NaN.
//!
//! Conventions: matrices are column-major and multiply column vectors,
//! angles are in degrees, +Y is up and +Z is forward.

pub mod bounds;
pub mod color;
mod error;
pub mod math;

pub use bounds::Bounds;
pub use color::{Color, Color32, ColorHex};
pub use error::MathError;
pub use math::{Matrix3, Matrix4, Plane, PlaneSide, Quaternion, Ray, Vector2, Vector3, Vector4};
