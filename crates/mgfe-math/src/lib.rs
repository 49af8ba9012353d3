//! Fixed-dimension vector arithmetic.
//!
//! Small dense vectors with a compile-time dimension, used for geometric
//! quantities (coordinates, gradients) where a heap-allocated vector would
//! be wasteful. Accumulation routines follow append semantics: the
//! destination keeps its prior value and the terms are added on top.

mod vector;

pub use vector::{
    MathVector, Scalar, Vector2, Vector3, Vector4, vec_add, vec_append, vec_pow,
    vec_scale_append, vec_subtract,
};
