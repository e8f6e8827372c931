//! The camera and its view frustum.

use crate::math::{
    angle::Angle,
    mat::{self, perspective, rotate_euler, translate, Mat4},
    vec::{vec3, Vec3},
};

/// The truncated pyramid of space visible to a perspective camera, plus
/// the projection matrix derived from it.
///
/// Invariants: `0 < near < far`, `fov ∈ (0, π)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frustum {
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
    pub fov: Angle,
    pub proj: Mat4,
}

impl Frustum {
    /// Returns a frustum with the given parameters and its perspective
    /// projection matrix.
    pub fn new(near: f32, far: f32, aspect: f32, fov: Angle) -> Self {
        Self {
            near,
            far,
            aspect,
            fov,
            proj: perspective(fov, aspect, near, far),
        }
    }

    /// Returns whether the view-space point `pt` lies inside all six
    /// frustum planes.
    ///
    /// The side planes are expressed by their outward normals derived from
    /// the field of view and aspect ratio; the near and far planes are
    /// simple z comparisons (the camera looks down −z).
    pub fn contains(&self, pt: Vec3) -> bool {
        let half_h = self.near * (self.fov * 0.5).tan() / self.aspect;
        let (sin, cos) = (self.fov * 0.5).sin_cos();
        !(vec3(cos, 0.0, sin).dot(&pt) >= 0.0          // right
            || vec3(-cos, 0.0, sin).dot(&pt) >= 0.0    // left
            || vec3(0.0, self.near, half_h).dot(&pt) >= 0.0   // top
            || vec3(0.0, -self.near, half_h).dot(&pt) >= 0.0  // bottom
            || pt.z() >= -self.near
            || pt.z() <= -self.far)
    }
}

/// A camera with a position and an Euler-angle orientation.
///
/// The view matrix and view direction are recomputed by every mutator, so
/// they are always consistent with `position` and `rotation`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    position: Vec3,
    rotation: Vec3,
    pub view_mat: Mat4,
    pub view_dir: Vec3,
    pub frustum: Frustum,
}

impl Camera {
    /// Returns a camera at the origin looking down −z.
    pub fn new(near: f32, far: f32, aspect: f32, fov: Angle) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            view_mat: Mat4::identity(),
            view_dir: -Vec3::Z,
            frustum: Frustum::new(near, far, aspect, fov),
        }
    }

    /// Returns the position of `self`.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Returns the Euler rotation of `self`, in radians per axis.
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Moves the camera to `position`.
    pub fn move_to(&mut self, position: Vec3) {
        self.position = position;
        self.recalculate();
    }

    /// Moves the camera by `offset`.
    pub fn move_offset(&mut self, offset: Vec3) {
        self.position += offset;
        self.recalculate();
    }

    /// Sets the Euler rotation of the camera, in radians per axis.
    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.recalculate();
    }

    /// Points the camera at `target`, bypassing the Euler rotation: the
    /// view matrix and view direction are set directly from the resulting
    /// orthonormal frame (world y is up).
    pub fn look_at(&mut self, target: Vec3) {
        let fwd = (target - self.position).normalize();
        if fwd == Vec3::ZERO {
            return;
        }
        let back = -fwd;
        let right = Vec3::Y.cross(&back).normalize();
        let up = back.cross(&right);
        // Inverse of an orthonormal frame is its transpose.
        let orient = mat::from_basis(right, up, back).transpose();
        self.view_mat = orient.compose(&translate(-self.position));
        self.view_dir = fwd;
    }

    fn recalculate(&mut self) {
        let rot = rotate_euler(-self.rotation);
        self.view_mat = rot.compose(&translate(-self.position));
        self.view_dir = rot.apply_point(&vec3(0.0, 0.0, -1.0));
    }
}
