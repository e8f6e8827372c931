//! Fixed-dimension real vectors.

use core::{
    array,
    ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign,
          Neg, Sub, SubAssign},
};

use super::{ApproxEq, Lerp};

/// A vector of `N` `f32` components.
///
/// The component count is fixed at the type level; use the [`Vec2`],
/// [`Vec3`], and [`Vec4`] aliases and the [`vec2`], [`vec3`], and [`vec4`]
/// constructor functions for the dimensions the pipeline works in.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vector<const N: usize>(pub [f32; N]);

impl<const N: usize> Default for Vector<N> {
    fn default() -> Self {
        Vector([0.0; N])
    }
}

/// A 2-vector.
pub type Vec2 = Vector<2>;
/// A 3-vector.
pub type Vec3 = Vector<3>;
/// A 4-vector.
pub type Vec4 = Vector<4>;

/// Returns a 2-vector with components `x` and `y`.
#[inline]
pub const fn vec2(x: f32, y: f32) -> Vec2 {
    Vector([x, y])
}

/// Returns a 3-vector with components `x`, `y`, and `z`.
#[inline]
pub const fn vec3(x: f32, y: f32, z: f32) -> Vec3 {
    Vector([x, y, z])
}

/// Returns a 4-vector with components `x`, `y`, `z`, and `w`.
#[inline]
pub const fn vec4(x: f32, y: f32, z: f32, w: f32) -> Vec4 {
    Vector([x, y, z, w])
}

/// Returns a vector with all components equal to `s`.
#[inline]
pub fn splat<const N: usize>(s: f32) -> Vector<N> {
    Vector([s; N])
}

impl<const N: usize> Vector<N> {
    /// The zero vector.
    pub const ZERO: Self = Vector([0.0; N]);

    /// Returns a vector with the given components.
    #[inline]
    pub const fn new(repr: [f32; N]) -> Self {
        Self(repr)
    }

    /// Returns the dot product of `self` and `other`.
    #[inline]
    pub fn dot(&self, other: &Self) -> f32 {
        let mut sum = 0.0;
        for i in 0..N {
            sum += self.0[i] * other.0[i];
        }
        sum
    }

    /// Returns the length of `self`, squared.
    #[inline]
    pub fn len_sqr(&self) -> f32 {
        self.dot(self)
    }

    /// Returns the length (magnitude) of `self`.
    #[inline]
    pub fn len(&self) -> f32 {
        self.len_sqr().sqrt()
    }

    /// Returns `self` normalized to unit length, or the zero vector if
    /// `self` is zero or too close to it.
    #[inline]
    #[must_use]
    pub fn normalize(&self) -> Self {
        let len_sqr = self.len_sqr();
        if len_sqr < 1e-12 {
            return Self::ZERO;
        }
        *self * len_sqr.sqrt().recip()
    }

    /// Returns a vector obtained by applying `f` component-wise.
    #[inline]
    #[must_use]
    pub fn map(self, mut f: impl FnMut(f32) -> f32) -> Self {
        Self(array::from_fn(|i| f(self.0[i])))
    }

    /// Returns `true` if every component of `self` is finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }
}

impl Vec2 {
    /// Returns the x component of `self`.
    #[inline]
    pub const fn x(&self) -> f32 {
        self.0[0]
    }
    /// Returns the y component of `self`.
    #[inline]
    pub const fn y(&self) -> f32 {
        self.0[1]
    }

    /// Returns the 2D cross product of `self` and `other`.
    ///
    /// The scalar analog of the 3D cross product: its magnitude is the
    /// signed area of the parallelogram spanned by the operands.
    #[inline]
    pub fn cross(&self, other: &Self) -> f32 {
        self.x() * other.y() - self.y() * other.x()
    }
}

impl Vec3 {
    /// Unit vector codirectional with the x-axis.
    pub const X: Self = vec3(1.0, 0.0, 0.0);
    /// Unit vector codirectional with the y-axis.
    pub const Y: Self = vec3(0.0, 1.0, 0.0);
    /// Unit vector codirectional with the z-axis.
    pub const Z: Self = vec3(0.0, 0.0, 1.0);

    /// Returns the x component of `self`.
    #[inline]
    pub const fn x(&self) -> f32 {
        self.0[0]
    }
    /// Returns the y component of `self`.
    #[inline]
    pub const fn y(&self) -> f32 {
        self.0[1]
    }
    /// Returns the z component of `self`.
    #[inline]
    pub const fn z(&self) -> f32 {
        self.0[2]
    }

    /// Returns the cross product of `self` and `other`: a vector orthogonal
    /// to both operands, with length equal to the area of the parallelogram
    /// they span.
    #[inline]
    pub fn cross(&self, other: &Self) -> Self {
        let (s, o) = (self, other);
        vec3(
            s.y() * o.z() - s.z() * o.y(),
            s.z() * o.x() - s.x() * o.z(),
            s.x() * o.y() - s.y() * o.x(),
        )
    }

    /// Returns `self` extended into a 4-vector with the given w component.
    #[inline]
    pub const fn to_vec4(self, w: f32) -> Vec4 {
        vec4(self.0[0], self.0[1], self.0[2], w)
    }
}

impl Vec4 {
    /// Returns the x component of `self`.
    #[inline]
    pub const fn x(&self) -> f32 {
        self.0[0]
    }
    /// Returns the y component of `self`.
    #[inline]
    pub const fn y(&self) -> f32 {
        self.0[1]
    }
    /// Returns the z component of `self`.
    #[inline]
    pub const fn z(&self) -> f32 {
        self.0[2]
    }
    /// Returns the w component of `self`.
    #[inline]
    pub const fn w(&self) -> f32 {
        self.0[3]
    }

    /// Returns the x and y components of `self` as a 2-vector.
    #[inline]
    pub const fn xy(self) -> Vec2 {
        vec2(self.0[0], self.0[1])
    }

    /// Returns `self` truncated to a 3-vector.
    #[inline]
    pub const fn xyz(self) -> Vec3 {
        vec3(self.0[0], self.0[1], self.0[2])
    }
}

/// Returns the barycentric coordinates of `p` with respect to the triangle
/// `abc`, computed from signed sub-triangle areas over the signed parent
/// area.
///
/// Returns `(-1, -1, -1)` if the triangle is degenerate (zero area); use
/// [`is_barycentric_valid`] to test the result before interpolating.
pub fn barycentric(p: Vec2, [a, b, c]: [Vec2; 3]) -> Vec3 {
    let cx = vec3(a.x() - b.x(), a.x() - c.x(), p.x() - a.x());
    let cy = vec3(a.y() - b.y(), a.y() - c.y(), p.y() - a.y());
    let r = cx.cross(&cy);
    if r.z() == 0.0 {
        return vec3(-1.0, -1.0, -1.0);
    }
    let (u, v) = (r.x() / r.z(), r.y() / r.z());
    vec3(1.0 - u - v, u, v)
}

/// Returns whether `bc` describes a point inside its triangle: all weights
/// non-negative and summing to at most 1 + ε.
#[inline]
pub fn is_barycentric_valid(bc: Vec3) -> bool {
    const EPS: f32 = 1e-6;
    bc.x() >= 0.0
        && bc.y() >= 0.0
        && bc.z() >= 0.0
        && bc.x() + bc.y() + bc.z() <= 1.0 + EPS
}

//
// Local trait impls
//

impl<const N: usize> Lerp for Vector<N> {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        *self + (*other - *self) * t
    }
}

impl<const N: usize> ApproxEq<Self, f32> for Vector<N> {
    fn approx_eq_eps(&self, other: &Self, eps: &f32) -> bool {
        self.0.approx_eq_eps(&other.0, eps)
    }
    fn relative_epsilon() -> f32 {
        f32::relative_epsilon()
    }
}

//
// Foreign trait impls
//

impl<const N: usize> From<[f32; N]> for Vector<N> {
    #[inline]
    fn from(repr: [f32; N]) -> Self {
        Self(repr)
    }
}

impl<const N: usize> Index<usize> for Vector<N> {
    type Output = f32;
    #[inline]
    fn index(&self, i: usize) -> &f32 {
        &self.0[i]
    }
}

impl<const N: usize> IndexMut<usize> for Vector<N> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        &mut self.0[i]
    }
}

impl<const N: usize> Add for Vector<N> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(array::from_fn(|i| self.0[i] + rhs.0[i]))
    }
}

impl<const N: usize> Sub for Vector<N> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(array::from_fn(|i| self.0[i] - rhs.0[i]))
    }
}

impl<const N: usize> Neg for Vector<N> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        self.map(|c| -c)
    }
}

impl<const N: usize> Mul<f32> for Vector<N> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        self.map(|c| c * rhs)
    }
}

impl<const N: usize> Mul<Vector<N>> for f32 {
    type Output = Vector<N>;
    #[inline]
    fn mul(self, rhs: Vector<N>) -> Vector<N> {
        rhs * self
    }
}

/// Component-wise multiplication.
impl<const N: usize> Mul for Vector<N> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self(array::from_fn(|i| self.0[i] * rhs.0[i]))
    }
}

impl<const N: usize> Div<f32> for Vector<N> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: f32) -> Self {
        self.map(|c| c / rhs)
    }
}

impl<const N: usize> AddAssign for Vector<N> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<const N: usize> SubAssign for Vector<N> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<const N: usize> MulAssign<f32> for Vector<N> {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl<const N: usize> DivAssign<f32> for Vector<N> {
    #[inline]
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}

//
// Unit tests
//

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;

    use super::*;

    #[test]
    fn length() {
        assert_approx_eq!(vec2(-3.0, 4.0).len(), 5.0);
        assert_approx_eq!(vec3(1.0, -2.0, 3.0).len(), 14.0f32.sqrt());
    }

    #[test]
    fn normalize() {
        assert_approx_eq!(vec2(3.0, 4.0).normalize(), vec2(0.6, 0.8));
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
    }

    #[test]
    fn arithmetic() {
        assert_eq!(vec2(1.0, 2.0) + vec2(-2.0, 1.0), vec2(-1.0, 3.0));
        assert_eq!(vec3(1.0, 2.0, 0.0) - vec3(-2.0, 1.0, -1.0),
                   vec3(3.0, 1.0, 1.0));
        assert_eq!(vec3(1.0, -2.0, 3.0) * 3.0, vec3(3.0, -6.0, 9.0));
        assert_eq!(3.0 * vec3(1.0, -2.0, 3.0), vec3(3.0, -6.0, 9.0));
        assert_eq!(vec2(3.0, -6.0) / 3.0, vec2(1.0, -2.0));
        assert_eq!(-vec2(1.0, -2.0), vec2(-1.0, 2.0));
    }

    #[test]
    fn dot_product() {
        assert_eq!(vec2(1.0, -2.0).dot(&vec2(2.0, 3.0)), -4.0);
        assert_eq!(vec3(1.0, -2.0, 3.0).dot(&vec3(2.0, 3.0, -1.0)), -7.0);
    }

    #[test]
    fn cross_product_basis_vectors() {
        assert_eq!(Vec3::X.cross(&Vec3::Y), Vec3::Z);
        assert_eq!(Vec3::Y.cross(&Vec3::Z), Vec3::X);
        assert_eq!(Vec3::Z.cross(&Vec3::X), Vec3::Y);
    }

    #[test]
    fn cross_anticommutative() {
        let a = vec3(1.0, 2.0, 3.0);
        let b = vec3(-4.0, 5.0, -6.0);
        assert_eq!(a.cross(&b), -b.cross(&a));

        let u = vec2(2.0, -1.0);
        let v = vec2(3.0, 5.0);
        assert_eq!(u.cross(&v), -v.cross(&u));
    }

    #[test]
    fn barycentric_at_vertices() {
        let tri = [vec2(0.0, 0.0), vec2(2.0, 0.0), vec2(0.0, 2.0)];
        assert_eq!(barycentric(tri[0], tri), vec3(1.0, 0.0, 0.0));
        assert_eq!(barycentric(tri[1], tri), vec3(0.0, 1.0, 0.0));
        assert_eq!(barycentric(tri[2], tri), vec3(0.0, 0.0, 1.0));
    }

    #[test]
    fn barycentric_partition_of_unity() {
        let tri = [vec2(0.5, 1.0), vec2(7.0, 2.5), vec2(3.0, 8.0)];
        for (px, py) in [(3.0, 3.0), (4.0, 4.0), (3.5, 2.2), (3.2, 6.0)] {
            let bc = barycentric(vec2(px, py), tri);
            assert!(is_barycentric_valid(bc), "{bc:?}");
            assert_approx_eq!(bc.x() + bc.y() + bc.z(), 1.0, eps = 1e-4);
        }
    }

    #[test]
    fn barycentric_degenerate() {
        let tri = [vec2(0.0, 0.0), vec2(1.0, 1.0), vec2(2.0, 2.0)];
        let bc = barycentric(vec2(0.5, 0.5), tri);
        assert_eq!(bc, vec3(-1.0, -1.0, -1.0));
        assert!(!is_barycentric_valid(bc));
    }

    #[test]
    fn barycentric_outside_is_invalid() {
        let tri = [vec2(0.0, 0.0), vec2(4.0, 0.0), vec2(0.0, 4.0)];
        assert!(!is_barycentric_valid(barycentric(vec2(3.0, 3.0), tri)));
        assert!(!is_barycentric_valid(barycentric(vec2(-1.0, 1.0), tri)));
    }
}
