use nalgebra::{Matrix3, Rotation3, UnitQuaternion, Vector3};

const MIN_AXIS_NORM: f64 = 1e-9;

/// Orientation whose +Z axis points along `forward` and whose +Y axis is as
/// close to `up_hint` as the constraint allows.
///
/// When `up_hint` is (nearly) parallel to `forward`, the world axis least
/// aligned with `forward` is used instead, so the result is always defined
/// for a non-zero `forward`. Returns `None` for a zero-length `forward`.
pub fn look_rotation(
    forward: &Vector3<f64>,
    up_hint: &Vector3<f64>,
) -> Option<UnitQuaternion<f64>> {
    let z = forward.try_normalize(MIN_AXIS_NORM)?;

    let x = up_hint
        .cross(&z)
        .try_normalize(MIN_AXIS_NORM)
        .or_else(|| least_aligned_axis(&z).cross(&z).try_normalize(MIN_AXIS_NORM))?;
    let y = z.cross(&x);

    let basis = Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[x, y, z]));
    Some(UnitQuaternion::from_rotation_matrix(&basis))
}

fn least_aligned_axis(v: &Vector3<f64>) -> Vector3<f64> {
    let a = v.abs();
    if a.x <= a.y && a.x <= a.z {
        Vector3::x()
    } else if a.y <= a.z {
        Vector3::y()
    } else {
        Vector3::z()
    }
}
