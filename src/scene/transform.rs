use glam::{Affine3A, Mat4, Quat, Vec3};

/// Transform component of a scene node.
///
/// Holds TRS properties plus the cached local and world matrices. The local
/// matrix is rebuilt from TRS only when a property changed since the last
/// update.
///
/// A node can also carry a baked local matrix ([`Transform::set_local_matrix`]).
/// Proxies use this: their placement is a composed matrix that may contain
/// shear, which TRS cannot represent.
#[derive(Debug, Clone)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,

    pub(crate) local_matrix: Affine3A,
    pub(crate) world_matrix: Affine3A,

    baked: Option<Affine3A>,

    last_position: Vec3,
    last_rotation: Quat,
    last_scale: Vec3,
    force_update: bool,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,

            local_matrix: Affine3A::IDENTITY,
            world_matrix: Affine3A::IDENTITY,

            baked: None,

            last_position: Vec3::ZERO,
            last_rotation: Quat::IDENTITY,
            last_scale: Vec3::ONE,
            force_update: true,
        }
    }

    /// Rebuilds the local matrix if needed. Returns whether it changed.
    pub fn update_local_matrix(&mut self) -> bool {
        if let Some(baked) = self.baked {
            let changed = self.force_update;
            self.local_matrix = baked;
            self.force_update = false;
            return changed;
        }

        let changed = self.position != self.last_position
            || self.rotation != self.last_rotation
            || self.scale != self.last_scale
            || self.force_update;

        if changed {
            self.local_matrix =
                Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position);

            self.last_position = self.position;
            self.last_rotation = self.rotation;
            self.last_scale = self.scale;
            self.force_update = false;
        }

        changed
    }

    /// Sets the rotation from Euler angles in degrees, applied X then Y then Z.
    pub fn set_rotation_degrees(&mut self, degrees: Vec3) {
        self.rotation = Quat::from_rotation_x(degrees.x.to_radians())
            * Quat::from_rotation_y(degrees.y.to_radians())
            * Quat::from_rotation_z(degrees.z.to_radians());
    }

    /// Bakes a local matrix. TRS properties are ignored until
    /// [`Transform::clear_local_matrix`] is called.
    pub fn set_local_matrix(&mut self, matrix: Affine3A) {
        self.baked = Some(matrix);
        self.mark_dirty();
    }

    /// Drops a baked matrix and goes back to TRS.
    pub fn clear_local_matrix(&mut self) {
        self.baked = None;
        self.mark_dirty();
    }

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> &Affine3A {
        &self.local_matrix
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }

    #[inline]
    #[must_use]
    pub fn world_matrix_as_mat4(&self) -> Mat4 {
        Mat4::from(self.world_matrix)
    }

    pub fn set_world_matrix(&mut self, mat: Affine3A) {
        self.world_matrix = mat;
    }

    pub fn mark_dirty(&mut self) {
        self.force_update = true;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
