use glam::{Affine3A, Quat, Vec3};

/// World placement of the entity hosting a skeleton.
///
/// The resolver only goes through this trait. It never looks the owner up
/// in a scene.
pub trait OwnerTransform {
    fn world_transform(&self) -> Affine3A;

    fn world_rotation(&self) -> Quat {
        let (_, rotation, _) = self.world_transform().to_scale_rotation_translation();
        rotation
    }

    fn local_to_world(&self, point: Vec3) -> Vec3 {
        self.world_transform().transform_point3(point)
    }

    fn world_to_local(&self, point: Vec3) -> Vec3 {
        self.world_transform().inverse().transform_point3(point)
    }
}

impl OwnerTransform for Affine3A {
    #[inline]
    fn world_transform(&self) -> Affine3A {
        *self
    }
}

/// TRS transform of a skeleton owner with a cached world matrix.
///
/// `position`/`rotation`/`scale` are relative to the owner's parent. The world
/// matrix is refreshed by [`Transform::update_world_matrix`].
#[derive(Debug, Clone)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,

    local_matrix: Affine3A,
    world_matrix: Affine3A,
    world_rotation: Quat,

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
            world_rotation: Quat::IDENTITY,

            last_position: Vec3::ZERO,
            last_rotation: Quat::IDENTITY,
            last_scale: Vec3::ONE,
            force_update: true,
        }
    }

    /// A root-level transform with its world matrix already computed.
    #[must_use]
    pub fn from_trs(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        let mut transform = Self {
            position,
            rotation,
            scale,
            ..Self::new()
        };
        transform.update_world_matrix(None);
        transform
    }

    /// Rebuilds the local matrix if position, rotation or scale changed.
    fn update_local_matrix(&mut self) {
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
    }

    /// Recomputes the world matrix from the parent's (identity for roots).
    pub fn update_world_matrix(&mut self, parent: Option<(&Affine3A, Quat)>) {
        self.update_local_matrix();
        match parent {
            Some((parent_world, parent_rotation)) => {
                self.world_matrix = *parent_world * self.local_matrix;
                self.world_rotation = (parent_rotation * self.rotation).normalize();
            }
            None => {
                self.world_matrix = self.local_matrix;
                self.world_rotation = self.rotation.normalize();
            }
        }
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
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl OwnerTransform for Transform {
    #[inline]
    fn world_transform(&self) -> Affine3A {
        self.world_matrix
    }

    #[inline]
    fn world_rotation(&self) -> Quat {
        self.world_rotation
    }
}
