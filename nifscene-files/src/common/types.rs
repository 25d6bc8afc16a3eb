use std::fmt::{Display, Formatter};

/// Index of a record inside a [`crate::nif::file::NifFile`]. Empty references (`-1` on disk)
/// are modeled as `Option<RecordIndex>` instead.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordIndex(pub u32);

impl RecordIndex {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for RecordIndex {
    fn from(value: u32) -> Self {
        RecordIndex(value)
    }
}

impl Display for RecordIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct C3Vector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl C3Vector {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        C3Vector { x, y, z }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct C2Vector {
    pub x: f32,
    pub y: f32,
}

impl C2Vector {
    pub const fn new(x: f32, y: f32) -> Self {
        C2Vector { x, y }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct C4Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for C4Quaternion {
    fn default() -> Self {
        C4Quaternion {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

/// Floating point RGBA, as used by vertex colors and color keys.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CColor4 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for CColor4 {
    fn default() -> Self {
        CColor4 {
            r: 1.0,
            g: 1.0,
            b: 1.0,
            a: 1.0,
        }
    }
}

/// Row major 3x3 rotation matrix, stored the way the file stores it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix3 {
    pub rows: [[f32; 3]; 3],
}

impl Matrix3 {
    pub const IDENTITY: Matrix3 = Matrix3 {
        rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };
}

impl Default for Matrix3 {
    fn default() -> Self {
        Matrix3::IDENTITY
    }
}

/// Local transformation of a node: the rotation is applied before the uniform scale, then translated.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NiTransform {
    pub translation: C3Vector,
    pub rotation: Matrix3,
    pub scale: f32,
}

impl NiTransform {
    pub const IDENTITY: NiTransform = NiTransform {
        translation: C3Vector::new(0.0, 0.0, 0.0),
        rotation: Matrix3::IDENTITY,
        scale: 1.0,
    };

    pub fn from_translation(translation: C3Vector) -> Self {
        NiTransform {
            translation,
            ..NiTransform::IDENTITY
        }
    }
}

impl Default for NiTransform {
    fn default() -> Self {
        NiTransform::IDENTITY
    }
}
