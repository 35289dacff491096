//! Vector, rotation and matrix math
//!
//! This module provides:
//! - Scalar helpers and angle utilities (scalar submodule)
//! - Float to integer quantization (quantize submodule)
//! - `Vector2`, `Vector3` and `Vector4`
//! - `Quaternion` rotations with euler angles in degrees
//! - Column-major `Matrix3` and `Matrix4`
//! - `Plane` and `Ray`
//! - Slice wide transforms (batch submodule)

pub mod batch;
mod matrix3;
mod matrix4;
mod plane;
pub mod quantize;
mod quaternion;
pub mod scalar;
mod vec;

pub use matrix3::*;
pub use matrix4::*;
pub use plane::*;
pub use quaternion::*;
pub use vec::*;
