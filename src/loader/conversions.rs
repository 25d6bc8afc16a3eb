use glam::{Affine3A, Mat3, Quat, Vec2, Vec3, Vec4};
use nifscene_files::common::types::{C2Vector, C3Vector, C4Quaternion, CColor4, NiTransform};

#[inline]
pub fn vec3(v: &C3Vector) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[inline]
pub fn vec2(v: &C2Vector) -> Vec2 {
    Vec2::new(v.x, v.y)
}

#[inline]
pub fn color(c: &CColor4) -> Vec4 {
    Vec4::new(c.r, c.g, c.b, c.a)
}

#[inline]
pub fn quat(q: &C4Quaternion) -> Quat {
    Quat::from_xyzw(q.x, q.y, q.z, q.w)
}

/// The file stores the rotation row major for column vectors, glam wants columns.
#[inline]
pub fn affine(transform: &NiTransform) -> Affine3A {
    let rotation = Mat3::from_cols_array_2d(&transform.rotation.rows).transpose();
    Affine3A::from_mat3_translation(rotation * transform.scale, vec3(&transform.translation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nifscene_files::common::types::Matrix3;

    #[test]
    fn transforms_rotate_then_scale_then_translate() {
        // 90 degrees around Z: x -> y
        let transform = NiTransform {
            translation: C3Vector::new(10.0, 0.0, 0.0),
            rotation: Matrix3 {
                rows: [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            },
            scale: 2.0,
        };

        let point = affine(&transform).transform_point3(Vec3::X);
        assert!(point.abs_diff_eq(Vec3::new(10.0, 2.0, 0.0), 1e-6));
    }
}
