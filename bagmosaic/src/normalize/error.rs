//! Error types for tile normalization.

use thiserror::Error;

use crate::citymodel::ModelError;

/// Result type for normalization operations.
pub type TileResult<T> = Result<T, TileError>;

/// Errors that make a single tile unusable.
///
/// None of these affect other tiles of the same run.
#[derive(Debug, Error)]
pub enum TileError {
    /// The tile file could not be read or parsed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A building lacks the ground-elevation attribute.
    #[error("building {building} has no '{attribute}' attribute")]
    MissingAttribute { building: String, attribute: String },

    /// The ground-elevation attribute is not a number.
    #[error("building {building} attribute '{attribute}' is not a number: {value}")]
    InvalidAttribute {
        building: String,
        attribute: String,
        value: String,
    },

    /// A building lists a child that is not in the tile.
    #[error("building {building} references missing part {child}")]
    MissingChild { building: String, child: String },

    /// The tile vertices are not quantized.
    #[error("tile has no transform; vertices must be quantized for base correction")]
    MissingTransform,

    /// The transform's vertical scale cannot be used as a divisor.
    #[error("transform z scale must be positive, got {0}")]
    InvalidScale(f64),

    /// The ground level does not fit in vertex units.
    #[error("building {building} ground level {ground} is out of range")]
    GroundOutOfRange { building: String, ground: f64 },

    /// Subtracting the base moved a vertex out of the integer range.
    #[error("vertex {index} overflows when lowered by {base}")]
    HeightOverflow { index: usize, base: i64 },

    /// A boundary references a vertex that does not exist.
    #[error("vertex index {index} out of range ({len} vertices)")]
    IndexOutOfRange { index: usize, len: usize },
}
