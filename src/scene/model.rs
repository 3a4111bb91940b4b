use glam::Vec3;
use slotmap::new_key_type;

use crate::host::ModelFormat;
use crate::profile::DisplayProfiles;

new_key_type! {
    pub struct ModelKey;
}

/// Axis-aligned box in model units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    pub from: Vec3,
    pub to: Vec3,
}

impl Cuboid {
    #[must_use]
    pub fn new(from: Vec3, to: Vec3) -> Self {
        Self { from, to }
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.from + self.to) * 0.5
    }
}

/// Render geometry of a model: a list of cuboids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub cuboids: Vec<Cuboid>,
}

impl Geometry {
    #[must_use]
    pub fn new(cuboids: Vec<Cuboid>) -> Self {
        Self { cuboids }
    }

    /// A single 16×16×16 block spanning the item grid.
    #[must_use]
    pub fn block() -> Self {
        Self::new(vec![Cuboid::new(Vec3::ZERO, Vec3::splat(16.0))])
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cuboids.is_empty()
    }
}

/// Another open project that can be bound onto a locator.
#[derive(Debug, Clone)]
pub struct SourceModel {
    pub name: String,
    pub format: ModelFormat,
    geometry: Geometry,
    display: Option<DisplayProfiles>,
    version: u64,
}

impl SourceModel {
    #[must_use]
    pub fn new(name: impl Into<String>, format: ModelFormat, geometry: Geometry) -> Self {
        Self {
            name: name.into(),
            format,
            geometry,
            display: None,
            version: 0,
        }
    }

    #[must_use]
    pub fn with_display(mut self, display: DisplayProfiles) -> Self {
        self.display = Some(display);
        self
    }

    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[must_use]
    pub fn display(&self) -> Option<&DisplayProfiles> {
        self.display.as_ref()
    }

    /// Edit counter, bumped by every geometry edit.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Edits the geometry in place.
    pub fn edit_geometry(&mut self, edit: impl FnOnce(&mut Geometry)) {
        edit(&mut self.geometry);
        self.version += 1;
    }
}
