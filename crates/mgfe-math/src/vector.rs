//! `MathVector` and component-wise arithmetic helpers.

use std::fmt;
use std::ops::{AddAssign, Index, IndexMut, MulAssign, SubAssign};

use num_traits::Float;

/// Scalar element type for [`MathVector`].
///
/// Blanket-implemented for every float type that supports the required
/// arithmetic, in practice `f32` and `f64`.
pub trait Scalar:
    Float + AddAssign + SubAssign + MulAssign + Default + fmt::Debug + 'static
{
}

impl<T> Scalar for T where
    T: Float + AddAssign + SubAssign + MulAssign + Default + fmt::Debug + 'static
{
}

/// Fixed-dimension numeric vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MathVector<T: Scalar, const DIM: usize> {
    components: [T; DIM],
}

/// 2D vector
pub type Vector2<T> = MathVector<T, 2>;
/// 3D vector
pub type Vector3<T> = MathVector<T, 3>;
/// 4D vector
pub type Vector4<T> = MathVector<T, 4>;

impl<T: Scalar, const DIM: usize> MathVector<T, DIM> {
    /// Create a vector from its components.
    pub fn new(components: [T; DIM]) -> Self {
        Self { components }
    }

    /// Vector with every component equal to `value`.
    pub fn from_scalar(value: T) -> Self {
        Self {
            components: [value; DIM],
        }
    }

    /// Zero vector.
    pub fn zeros() -> Self {
        Self::from_scalar(T::zero())
    }

    /// Number of components.
    pub fn dim(&self) -> usize {
        DIM
    }

    /// Components as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.components
    }

    /// In-place accumulation: `self += other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mgfe_math::MathVector;
    ///
    /// let mut a = MathVector::new([1.0, 2.0, 3.0]);
    /// a.append(&MathVector::new([0.5, 0.5, 0.5]));
    /// assert_eq!(a[0], 1.5);
    /// ```
    pub fn append(&mut self, other: &Self) {
        for i in 0..DIM {
            self.components[i] += other.components[i];
        }
    }
}

impl<T: Scalar, const DIM: usize> Default for MathVector<T, DIM> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<T: Scalar, const DIM: usize> From<[T; DIM]> for MathVector<T, DIM> {
    fn from(components: [T; DIM]) -> Self {
        Self { components }
    }
}

impl<T: Scalar, const DIM: usize> Index<usize> for MathVector<T, DIM> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.components[i]
    }
}

impl<T: Scalar, const DIM: usize> IndexMut<usize> for MathVector<T, DIM> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.components[i]
    }
}

/// Accumulate every term onto `dest`: `dest += t_0 + t_1 + ...`.
///
/// The prior value of `dest` is kept; start from [`MathVector::zeros`] for a
/// plain sum.
pub fn vec_append<T: Scalar, const DIM: usize>(
    dest: &mut MathVector<T, DIM>,
    terms: &[&MathVector<T, DIM>],
) {
    for i in 0..DIM {
        for term in terms {
            dest[i] += term[i];
        }
    }
}

/// Weighted accumulation: `dest += w_0 * v_0 + w_1 * v_1 + ...`.
///
/// # Examples
///
/// ```
/// use mgfe_math::{MathVector, vec_scale_append};
///
/// let a = MathVector::new([1.0, 0.0]);
/// let b = MathVector::new([0.0, 1.0]);
/// let mut out = MathVector::zeros();
/// vec_scale_append(&mut out, &[(2.0, &a), (3.0, &b)]);
/// assert_eq!(out.as_slice(), &[2.0, 3.0]);
/// ```
pub fn vec_scale_append<T: Scalar, const DIM: usize>(
    dest: &mut MathVector<T, DIM>,
    terms: &[(T, &MathVector<T, DIM>)],
) {
    for i in 0..DIM {
        for (weight, term) in terms {
            dest[i] += *weight * term[i];
        }
    }
}

/// Overwrite `dest` with the sum of the terms.
pub fn vec_add<T: Scalar, const DIM: usize>(
    dest: &mut MathVector<T, DIM>,
    terms: &[&MathVector<T, DIM>],
) {
    for i in 0..DIM {
        dest[i] = T::zero();
        for term in terms {
            dest[i] += term[i];
        }
    }
}

/// Component-wise difference: `dest = a - b`.
pub fn vec_subtract<T: Scalar, const DIM: usize>(
    dest: &mut MathVector<T, DIM>,
    a: &MathVector<T, DIM>,
    b: &MathVector<T, DIM>,
) {
    for i in 0..DIM {
        dest[i] = a[i] - b[i];
    }
}

/// Component-wise exponentiation: `dest[i] = src[i]^exponent`.
pub fn vec_pow<T: Scalar, const DIM: usize>(
    dest: &mut MathVector<T, DIM>,
    src: &MathVector<T, DIM>,
    exponent: T,
) {
    for i in 0..DIM {
        dest[i] = src[i].powf(exponent);
    }
}
