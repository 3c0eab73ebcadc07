//! Point source adapter bridging attribute storage to the codec.
//!
//! The codec consumes points through this minimal capability interface
//! (length plus indexed O(1) access) so that attribute representation
//! details never leak into the recursive core.

use pointkd_types::{Point3, PointAttribute};

/// Read-only, fixed-length, indexable view over a point sequence.
pub trait PointSource {
    /// Total number of points.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The coordinate vector of point `index`. `index < len()`.
    fn point(&self, index: usize) -> Point3;
}

/// [`PointSource`] backed by a [`PointAttribute`] without copying.
///
/// Float attributes yield their upstream-quantized integer grid values;
/// integer attributes yield their values directly.
pub struct AttributePointSource<'a> {
    attribute: &'a PointAttribute,
}

impl<'a> AttributePointSource<'a> {
    pub fn new(attribute: &'a PointAttribute) -> Self {
        Self { attribute }
    }
}

impl PointSource for AttributePointSource<'_> {
    fn len(&self) -> usize {
        self.attribute.len()
    }

    fn point(&self, index: usize) -> Point3 {
        self.attribute.uint_vector(index)
    }
}

impl PointSource for Vec<Point3> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn point(&self, index: usize) -> Point3 {
        self[index]
    }
}
