//! Read-only attribute storage consumed by the codec.
//!
//! The recursive encoder destructively reorders its input, so it never
//! operates on this store directly; it copies values into a private
//! working buffer first. The store itself is immutable once built.

use crate::constants::POINT_DIMS;
use crate::error::{PointKdError, Result};
use crate::point::Point3;

/// Attribute value type. The codec supports exactly these two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeDataType {
    /// 32-bit float, pre-quantized upstream to integer grid values.
    Float32,
    /// 32-bit unsigned integer.
    Uint32,
}

/// A per-point data channel: fixed-arity numeric vectors in flat storage.
///
/// Indexed access is O(1); the store is never mutated by encode or decode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointAttribute {
    data_type: AttributeDataType,
    components: usize,
    values: Vec<u32>,
}

impl PointAttribute {
    /// Build an integer attribute from flat component storage.
    ///
    /// `values.len()` must be a multiple of `components`.
    pub fn from_uint_values(values: Vec<u32>, components: usize) -> Result<Self> {
        if components == 0 || values.len() % components != 0 {
            return Err(PointKdError::UnsupportedComponentCount(components));
        }
        Ok(Self {
            data_type: AttributeDataType::Uint32,
            components,
            values,
        })
    }

    /// Build a float attribute from values already quantized upstream.
    ///
    /// Each value must be a non-negative whole number (a quantization grid
    /// index); it is stored as its integer representation. The quantization
    /// transform itself lives outside this crate.
    pub fn from_quantized_floats(values: &[f32], components: usize) -> Result<Self> {
        if components == 0 || values.len() % components != 0 {
            return Err(PointKdError::UnsupportedComponentCount(components));
        }
        let values = values.iter().map(|&v| v as u32).collect();
        Ok(Self {
            data_type: AttributeDataType::Float32,
            components,
            values,
        })
    }

    #[inline]
    pub fn data_type(&self) -> AttributeDataType {
        self.data_type
    }

    #[inline]
    pub fn components(&self) -> usize {
        self.components
    }

    /// Number of points stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len() / self.components
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The coordinate vector for point `index`.
    ///
    /// Only valid for 3-component attributes; dispatch validates the
    /// component count before the codec ever calls this.
    #[inline]
    pub fn uint_vector(&self, index: usize) -> Point3 {
        debug_assert_eq!(self.components, POINT_DIMS);
        let base = index * self.components;
        [
            self.values[base],
            self.values[base + 1],
            self.values[base + 2],
        ]
    }
}
