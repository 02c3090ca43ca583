//! Boundary-condition tags.
//!
//! The tag selects which mirroring rule the boundary enforcer applies at the
//! grid edges. It is a closed set: the enforcer branches on it directly.

use serde::{Deserialize, Serialize};

use crate::error::{EddyError, EddyResult};

/// Edge rule applied to a field after every write.
///
/// - `Scalar` — edge cells copy their interior neighbour (reflective).
/// - `VelocityX` — left/right edges negate, top/bottom copy.
/// - `VelocityY` — top/bottom edges negate, left/right copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum BoundaryType {
    Scalar = 0,
    VelocityX = 1,
    VelocityY = 2,
}

impl BoundaryType {
    /// All boundary types, in tag order.
    pub fn all() -> &'static [BoundaryType] {
        &[
            BoundaryType::Scalar,
            BoundaryType::VelocityX,
            BoundaryType::VelocityY,
        ]
    }

    /// Numeric tag as passed to device kernels.
    #[inline]
    pub fn tag(self) -> u32 {
        self as u32
    }

    /// Whether the left/right edges (`i = 0`, `i = N+1`) are negated.
    #[inline]
    pub fn negates_x_walls(self) -> bool {
        self == BoundaryType::VelocityX
    }

    /// Whether the bottom/top edges (`j = 0`, `j = N+1`) are negated.
    #[inline]
    pub fn negates_y_walls(self) -> bool {
        self == BoundaryType::VelocityY
    }

    /// Short name for logs and telemetry.
    pub fn name(self) -> &'static str {
        match self {
            BoundaryType::Scalar => "scalar",
            BoundaryType::VelocityX => "velocity_x",
            BoundaryType::VelocityY => "velocity_y",
        }
    }
}

impl TryFrom<u32> for BoundaryType {
    type Error = EddyError;

    fn try_from(tag: u32) -> EddyResult<Self> {
        match tag {
            0 => Ok(BoundaryType::Scalar),
            1 => Ok(BoundaryType::VelocityX),
            2 => Ok(BoundaryType::VelocityY),
            other => Err(EddyError::InvalidBoundary(other)),
        }
    }
}
