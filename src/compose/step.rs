use glam::{Mat4, Vec3};

/// One elementary transform in a composition chain.
///
/// Angles are in degrees, matching the units display profiles are authored
/// in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformStep {
    Scale(Vec3),
    RotateX(f32),
    RotateY(f32),
    RotateZ(f32),
    /// Euler rotation applied as `Rx * Ry * Rz`.
    RotateEuler(Vec3),
    Translate(Vec3),
}

impl TransformStep {
    #[inline]
    #[must_use]
    pub fn uniform_scale(factor: f32) -> Self {
        TransformStep::Scale(Vec3::splat(factor))
    }

    #[inline]
    #[must_use]
    pub fn translate(x: f32, y: f32, z: f32) -> Self {
        TransformStep::Translate(Vec3::new(x, y, z))
    }

    /// Matrix form of this step.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        match *self {
            TransformStep::Scale(s) => Mat4::from_scale(s),
            TransformStep::RotateX(deg) => Mat4::from_rotation_x(deg.to_radians()),
            TransformStep::RotateY(deg) => Mat4::from_rotation_y(deg.to_radians()),
            TransformStep::RotateZ(deg) => Mat4::from_rotation_z(deg.to_radians()),
            TransformStep::RotateEuler(deg) => {
                Mat4::from_rotation_x(deg.x.to_radians())
                    * Mat4::from_rotation_y(deg.y.to_radians())
                    * Mat4::from_rotation_z(deg.z.to_radians())
            }
            TransformStep::Translate(t) => Mat4::from_translation(t),
        }
    }

    /// Applies this step after `acc`: the step acts in the space produced by
    /// everything already accumulated.
    #[inline]
    #[must_use]
    pub fn apply(&self, acc: Mat4) -> Mat4 {
        self.matrix() * acc
    }
}

/// Folds a step list onto `acc` in order.
#[must_use]
pub fn apply_steps<'a, I>(acc: Mat4, steps: I) -> Mat4
where
    I: IntoIterator<Item = &'a TransformStep>,
{
    steps.into_iter().fold(acc, |acc, step| step.apply(acc))
}
