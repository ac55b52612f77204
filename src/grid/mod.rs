//! Grid families and their attribute data.
//!
//! Three families are supported: [`UniformGrid`] (origin + spacing +
//! orientation), [`RectilinearGrid`] (three 1-D coordinate arrays) and
//! [`CurvilinearGrid`] (an explicit point array). Coordinate element types
//! are abstracted by the [`Scalar`] trait so `f32`, `f64` and integer
//! lattices all match with the appropriate equality rule.

pub mod curvilinear;
pub mod markers;
pub mod rectilinear;
pub mod uniform;

pub use curvilinear::CurvilinearGrid;
pub use rectilinear::RectilinearGrid;
pub use uniform::UniformGrid;

use bytemuck::Pod;
use std::fmt::Debug;

/// Coordinate element type: the wire knows its code, and equality follows
/// the type (exact for integer lattices, relative-epsilon for floats).
pub trait Scalar:
    Copy + PartialEq + PartialOrd + Pod + Send + Sync + Debug + 'static
{
    /// Type code carried in wire headers.
    const WIRE_CODE: u16;

    /// Value equality with the tolerance appropriate for the type.
    fn values_equal(a: Self, b: Self) -> bool;

    /// Lossy view for distance computations.
    fn as_f64(self) -> f64;
}

impl Scalar for f64 {
    const WIRE_CODE: u16 = 1;

    #[inline]
    fn values_equal(a: Self, b: Self) -> bool {
        (a - b).abs() < (f64::EPSILON * a.abs().max(b.abs())).max(f64::MIN_POSITIVE)
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self
    }
}

impl Scalar for f32 {
    const WIRE_CODE: u16 = 2;

    #[inline]
    fn values_equal(a: Self, b: Self) -> bool {
        (a - b).abs() < (f32::EPSILON * a.abs().max(b.abs())).max(f32::MIN_POSITIVE)
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl Scalar for i32 {
    const WIRE_CODE: u16 = 3;

    #[inline]
    fn values_equal(a: Self, b: Self) -> bool {
        a == b
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl Scalar for i64 {
    const WIRE_CODE: u16 = 4;

    #[inline]
    fn values_equal(a: Self, b: Self) -> bool {
        a == b
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }
}

/// `NearlyEqual` for geometry comparisons outside the `Scalar` machinery.
#[inline]
pub(crate) fn nearly_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < (f64::EPSILON * a.abs().max(b.abs())).max(f64::MIN_POSITIVE)
}

/// One named field over the cells or points of a grid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldArray {
    pub name: String,
    pub values: Vec<f64>,
}

impl FieldArray {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Attribute data of one association (cells or points): the ghost marker
/// array plus any number of named fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeSet {
    /// Ghost marker array; `None` when the grid carries no markers.
    pub ghosts: Option<Vec<u8>>,
    /// Named field arrays, all of the association's length.
    pub fields: Vec<FieldArray>,
}

impl AttributeSet {
    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldArray> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up a field by name, mutably.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut FieldArray> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Allocate (or reuse) the ghost marker array at `len`, zero-filled.
    pub fn ensure_ghosts(&mut self, len: usize) -> &mut Vec<u8> {
        let ghosts = self.ghosts.get_or_insert_with(Vec::new);
        ghosts.clear();
        ghosts.resize(len, 0);
        ghosts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_equality_is_relative() {
        assert!(f64::values_equal(1.0, 1.0 + f64::EPSILON * 0.5));
        assert!(!f64::values_equal(1.0, 1.0 + 1e-9));
        assert!(f64::values_equal(0.0, 0.0));
        assert!(!f64::values_equal(0.0, 1e-300));
    }

    #[test]
    fn integer_equality_is_exact() {
        assert!(i32::values_equal(7, 7));
        assert!(!i32::values_equal(7, 8));
    }

    #[test]
    fn attribute_set_lookup() {
        let mut attrs = AttributeSet::default();
        attrs.fields.push(FieldArray::new("density", vec![1.0, 2.0]));
        assert!(attrs.field("density").is_some());
        assert!(attrs.field("pressure").is_none());
        attrs.field_mut("density").unwrap().values[0] = 3.0;
        assert_eq!(attrs.field("density").unwrap().values[0], 3.0);
    }
}
