//! Square matrices and the transforms the pipeline is built from.
//!
//! Matrices are stored column-major, matching the convention of GPU shading
//! languages: `self.0[c][r]` is the element at column `c`, row `r`, and
//! composition satisfies `(A ∘ B)(v) = A(B(v))`.

use core::ops::{Add, Div, Mul, Sub};

use super::{
    angle::{rads, Angle},
    approx::ApproxEq,
    vec::{Vec3, Vector},
};

/// An `N`×`N` matrix of `f32` elements, stored column-major.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix<const N: usize>(pub [[f32; N]; N]);

/// A 2×2 matrix.
pub type Mat2 = Matrix<2>;
/// A 3×3 matrix.
pub type Mat3 = Matrix<3>;
/// A 4×4 matrix.
pub type Mat4 = Matrix<4>;

/// Creates a [`Matrix`] from visually row-major input.
///
/// # Examples
/// ```
/// use softrast_core::{mat, math::Mat2};
///
/// let m: Mat2 = mat![
///     1.0, 2.0;
///     3.0, 4.0;
/// ];
/// // Storage is column-major:
/// assert_eq!(m.0, [[1.0, 3.0], [2.0, 4.0]]);
/// ```
#[macro_export]
macro_rules! mat {
    ( $( $( $elem:expr ),+ );+ $(;)? ) => {
        $crate::math::mat::Matrix::from_rows([
            $([$($elem),+]),+
        ])
    };
}

impl<const N: usize> Matrix<N> {
    /// Returns a matrix with the given columns.
    #[inline]
    pub const fn new(cols: [[f32; N]; N]) -> Self {
        Self(cols)
    }

    /// Returns a matrix with the given rows.
    pub const fn from_rows(rows: [[f32; N]; N]) -> Self {
        let mut cols = [[0.0; N]; N];
        let mut c = 0;
        while c < N {
            let mut r = 0;
            while r < N {
                cols[c][r] = rows[r][c];
                r += 1;
            }
            c += 1;
        }
        Self(cols)
    }

    /// Returns the `N`×`N` identity matrix: the neutral element of both
    /// matrix-matrix and matrix-vector multiplication.
    pub const fn identity() -> Self {
        let mut cols = [[0.0; N]; N];
        let mut i = 0;
        while i < N {
            cols[i][i] = 1.0;
            i += 1;
        }
        Self(cols)
    }

    /// Returns `self` with its rows and columns swapped.
    #[must_use]
    pub const fn transpose(&self) -> Self {
        Self::from_rows(self.0)
    }

    /// Returns the composite transform of `self` and `inner`, such that
    /// applying the result is equivalent to applying `inner` first:
    /// `(self ∘ inner)(v) = self(inner(v))`.
    #[must_use]
    pub fn compose(&self, inner: &Self) -> Self {
        let mut cols = [[0.0; N]; N];
        for c in 0..N {
            for r in 0..N {
                let mut sum = 0.0;
                for k in 0..N {
                    sum += self.0[k][r] * inner.0[c][k];
                }
                cols[c][r] = sum;
            }
        }
        Self(cols)
    }

    /// Applies `self` to a vector.
    #[must_use]
    pub fn apply(&self, v: &Vector<N>) -> Vector<N> {
        let mut out = [0.0; N];
        for r in 0..N {
            let mut sum = 0.0;
            for c in 0..N {
                sum += self.0[c][r] * v.0[c];
            }
            out[r] = sum;
        }
        Vector(out)
    }

    /// Returns whether every element of `self` is finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().flatten().all(|e| e.is_finite())
    }
}

impl Mat4 {
    /// Applies `self` to a 3-vector as a *point*: the vector is extended
    /// with an implicit w = 1, transformed, and truncated back, so
    /// translation takes effect.
    #[must_use]
    pub fn apply_point(&self, p: &Vec3) -> Vec3 {
        self.apply(&p.to_vec4(1.0)).xyz()
    }
}

//
// Free functions
//

/// Returns a matrix applying a translation to points (w = 1 vectors).
pub const fn translate(t: Vec3) -> Mat4 {
    translate3(t.0[0], t.0[1], t.0[2])
}

/// Returns a matrix applying a translation by the given offsets.
pub const fn translate3(x: f32, y: f32, z: f32) -> Mat4 {
    mat![
        1.0, 0.0, 0.0,  x ;
        0.0, 1.0, 0.0,  y ;
        0.0, 0.0, 1.0,  z ;
        0.0, 0.0, 0.0, 1.0;
    ]
}

/// Returns a matrix applying a scaling by a vector of factors.
pub const fn scale(s: Vec3) -> Mat4 {
    scale3(s.0[0], s.0[1], s.0[2])
}

/// Returns a matrix applying a scaling by the given factors.
pub const fn scale3(x: f32, y: f32, z: f32) -> Mat4 {
    mat![
         x,  0.0, 0.0, 0.0;
        0.0,  y,  0.0, 0.0;
        0.0, 0.0,  z,  0.0;
        0.0, 0.0, 0.0, 1.0;
    ]
}

/// Returns a matrix applying a rotation about the x-axis.
pub fn rotate_x(a: Angle) -> Mat4 {
    let (sin, cos) = a.sin_cos();
    mat![
        1.0,  0.0,  0.0, 0.0;
        0.0,  cos, -sin, 0.0;
        0.0,  sin,  cos, 0.0;
        0.0,  0.0,  0.0, 1.0;
    ]
}

/// Returns a matrix applying a rotation about the y-axis.
pub fn rotate_y(a: Angle) -> Mat4 {
    let (sin, cos) = a.sin_cos();
    mat![
         cos, 0.0,  sin, 0.0;
         0.0, 1.0,  0.0, 0.0;
        -sin, 0.0,  cos, 0.0;
         0.0, 0.0,  0.0, 1.0;
    ]
}

/// Returns a matrix applying a rotation about the z-axis.
pub fn rotate_z(a: Angle) -> Mat4 {
    let (sin, cos) = a.sin_cos();
    mat![
        cos, -sin, 0.0, 0.0;
        sin,  cos, 0.0, 0.0;
        0.0,  0.0, 1.0, 0.0;
        0.0,  0.0, 0.0, 1.0;
    ]
}

/// Returns the Euler rotation Rx(v.x) ∘ Ry(v.y) ∘ Rz(v.z), with the
/// components of `v` in radians.
pub fn rotate_euler(v: Vec3) -> Mat4 {
    rotate_x(rads(v.x()))
        .compose(&rotate_y(rads(v.y())))
        .compose(&rotate_z(rads(v.z())))
}

/// Creates a right-handed perspective projection matrix for a camera
/// looking down −z, mapping the frustum to the clip cube [-1, 1]³.
///
/// With t = tan(fov/2), a the aspect ratio, s = sign(near), n = near and
/// f = far, the matrix is
/// ```text
///     ⎛ s/(a·t)    0         0            0      ⎞
///     ⎜   0       s/t        0            0      ⎟
///     ⎜   0        0    (n+f)/(n−f)  −2nf/(f−n)  ⎟
///     ⎝   0        0        −1            0      ⎠
/// ```
/// so that clip w receives −z, the view-space depth.
pub fn perspective(fov: Angle, aspect: f32, near: f32, far: f32) -> Mat4 {
    debug_assert!(near != 0.0 && near.abs() < far.abs());
    let t = (fov.to_rads() * 0.5).tan();
    let s = if near > 0.0 { 1.0 } else { -1.0 };
    mat![
        s / (aspect * t),   0.0,                       0.0,                          0.0;
                     0.0, s / t,                       0.0,                          0.0;
                     0.0,   0.0, (near + far) / (near - far), -2.0 * near * far / (far - near);
                     0.0,   0.0,                      -1.0,                          0.0;
    ]
}

/// Returns the matrix whose y basis vector is sent to `up` and z basis
/// vector to `back`, with the x basis completing a right-handed frame.
pub(crate) fn from_basis(right: Vec3, up: Vec3, back: Vec3) -> Mat4 {
    mat![
        right.x(), up.x(), back.x(), 0.0;
        right.y(), up.y(), back.y(), 0.0;
        right.z(), up.z(), back.z(), 0.0;
              0.0,    0.0,      0.0, 1.0;
    ]
}

//
// Trait impls
//

impl<const N: usize> Default for Matrix<N> {
    /// Returns the identity matrix.
    fn default() -> Self {
        Self::identity()
    }
}

impl<const N: usize> From<[[f32; N]; N]> for Matrix<N> {
    fn from(cols: [[f32; N]; N]) -> Self {
        Self(cols)
    }
}

impl<const N: usize> Add for Matrix<N> {
    type Output = Self;
    fn add(mut self, rhs: Self) -> Self {
        for c in 0..N {
            for r in 0..N {
                self.0[c][r] += rhs.0[c][r];
            }
        }
        self
    }
}

impl<const N: usize> Sub for Matrix<N> {
    type Output = Self;
    fn sub(mut self, rhs: Self) -> Self {
        for c in 0..N {
            for r in 0..N {
                self.0[c][r] -= rhs.0[c][r];
            }
        }
        self
    }
}

impl<const N: usize> Mul<f32> for Matrix<N> {
    type Output = Self;
    fn mul(mut self, rhs: f32) -> Self {
        for col in &mut self.0 {
            for e in col {
                *e *= rhs;
            }
        }
        self
    }
}

impl<const N: usize> Div<f32> for Matrix<N> {
    type Output = Self;
    fn div(self, rhs: f32) -> Self {
        self * rhs.recip()
    }
}

/// Matrix-matrix multiplication; equivalent to [`Matrix::compose`].
impl<const N: usize> Mul for Matrix<N> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.compose(&rhs)
    }
}

/// Matrix-vector multiplication; equivalent to [`Matrix::apply`].
impl<const N: usize> Mul<Vector<N>> for Matrix<N> {
    type Output = Vector<N>;
    #[inline]
    fn mul(self, rhs: Vector<N>) -> Vector<N> {
        self.apply(&rhs)
    }
}

impl<const N: usize> ApproxEq<Self, f32> for Matrix<N> {
    fn approx_eq_eps(&self, other: &Self, eps: &f32) -> bool {
        self.0
            .iter()
            .zip(&other.0)
            .all(|(a, b)| a.approx_eq_eps(b, eps))
    }
    fn relative_epsilon() -> f32 {
        f32::relative_epsilon()
    }
}

//
// Unit tests
//
