use std::fmt;
use std::str::FromStr;

use crate::foundation::core::{Point, Point3D};
use crate::foundation::error::{MeshResult, MeshWarpError};

/// Depth at which [`DepthNormalization::Linear`] leaves positions unscaled.
pub const REFERENCE_DEPTH: f64 = 0.0;
/// Strength used by [`DepthNormalization::linear`] and the `"linear"` policy name.
pub const DEFAULT_LINEAR_STRENGTH: f64 = 1.0;
/// Strength used by [`DepthNormalization::perspective`] and the `"perspective"` policy name.
pub const DEFAULT_PERSPECTIVE_STRENGTH: f64 = 1.0;

/// How a target vertex's depth turns into its effective 2D position.
///
/// The policy is global to a transform: every vertex follows the same law.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DepthNormalization {
    /// `(x, y)` passes through unchanged; `z` is auxiliary data only.
    #[default]
    None,
    /// Scale `(x, y)` about the projection center by `1 + strength * (z - REFERENCE_DEPTH)`.
    Linear {
        /// Scale change per unit of depth.
        strength: f64,
    },
    /// Perspective divide about the projection center by `1 + strength * z`.
    Perspective {
        /// Perspective strength `k`; must be non-negative.
        strength: f64,
    },
}

impl DepthNormalization {
    /// Linear policy with [`DEFAULT_LINEAR_STRENGTH`].
    pub fn linear() -> Self {
        Self::Linear {
            strength: DEFAULT_LINEAR_STRENGTH,
        }
    }

    /// Perspective policy with [`DEFAULT_PERSPECTIVE_STRENGTH`].
    pub fn perspective() -> Self {
        Self::Perspective {
            strength: DEFAULT_PERSPECTIVE_STRENGTH,
        }
    }

    /// Canonical lower-case name: `none`, `linear` or `perspective`.
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Linear { .. } => "linear",
            Self::Perspective { .. } => "perspective",
        }
    }

    /// Strength carried by the policy, `0.0` for [`DepthNormalization::None`].
    pub fn strength(self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Linear { strength } | Self::Perspective { strength } => strength,
        }
    }

    /// Check the carried strength.
    pub fn validate(self) -> MeshResult<()> {
        match self {
            Self::None => Ok(()),
            Self::Linear { strength } => {
                if !strength.is_finite() {
                    return Err(MeshWarpError::unsupported_policy(format!(
                        "linear strength must be finite, got {strength}"
                    )));
                }
                Ok(())
            }
            Self::Perspective { strength } => {
                if !strength.is_finite() || strength < 0.0 {
                    return Err(MeshWarpError::unsupported_policy(format!(
                        "perspective strength must be finite and >= 0, got {strength}"
                    )));
                }
                Ok(())
            }
        }
    }

    /// Effective 2D position of a target point about `center`.
    ///
    /// `vertex` only labels the error: a scale or divisor that is not strictly positive would
    /// mirror the vertex through the center, which is reported as [`MeshWarpError::InvalidMesh`].
    pub(crate) fn resolve(self, vertex: usize, to: Point3D, center: Point) -> MeshResult<Point> {
        let factor = match self {
            Self::None => return Ok(to.xy()),
            Self::Linear { strength } => {
                let scale = 1.0 + strength * (to.z - REFERENCE_DEPTH);
                if scale <= 0.0 || !scale.is_finite() {
                    return Err(MeshWarpError::invalid_mesh(format!(
                        "vertex {vertex} at depth {} collapses under linear depth scaling",
                        to.z
                    )));
                }
                scale
            }
            Self::Perspective { strength } => {
                let divisor = 1.0 + to.z * strength;
                if divisor <= 0.0 || !divisor.is_finite() {
                    return Err(MeshWarpError::invalid_mesh(format!(
                        "vertex {vertex} at depth {} is behind the projection plane",
                        to.z
                    )));
                }
                1.0 / divisor
            }
        };
        Ok(center + (to.xy() - center) * factor)
    }
}

impl fmt::Display for DepthNormalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Linear { strength } | Self::Perspective { strength } => {
                write!(f, "{}({strength})", self.name())
            }
        }
    }
}

impl FromStr for DepthNormalization {
    type Err = MeshWarpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_policy(s)
    }
}

/// Parse a policy name (`none`, `linear`, `perspective`; case-insensitive). Named policies use
/// the default strengths. Anything else is [`MeshWarpError::UnsupportedPolicy`].
pub fn parse_policy(name: &str) -> MeshResult<DepthNormalization> {
    let trimmed = name.trim();
    if trimmed.eq_ignore_ascii_case("none") {
        Ok(DepthNormalization::None)
    } else if trimmed.eq_ignore_ascii_case("linear") {
        Ok(DepthNormalization::linear())
    } else if trimmed.eq_ignore_ascii_case("perspective") {
        Ok(DepthNormalization::perspective())
    } else {
        Err(MeshWarpError::unsupported_policy(format!(
            "unknown depth normalization '{trimmed}' (expected none, linear or perspective)"
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/policy.rs"]
mod tests;
