use glam::{DVec3, Mat4, Vec3};

/// View matrix for an eye looking at the origin with +Y up.
pub fn look_at_origin(eye: DVec3) -> Mat4 {
    Mat4::look_at_rh(eye.as_vec3(), Vec3::ZERO, Vec3::Y)
}

/// `projection * view * model`.
///
/// Column vectors: the model transform is applied to a vertex first.
#[inline]
pub fn compose_mvp(projection: &Mat4, view: &Mat4, model: &Mat4) -> Mat4 {
    *projection * *view * *model
}
