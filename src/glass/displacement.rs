use std::path::Path;

use anyhow::Context;
use image::RgbaImage;
use rayon::prelude::*;

use crate::foundation::core::{Point, Size, Vec2};
use crate::foundation::error::{MeshResult, MeshWarpError};
use crate::glass::bezier::DisplacementBezier;
use crate::glass::sdf::{clamp_corner_radius, rounded_rect_gradient, rounded_rect_sdf};

/// Channel value encoding zero displacement.
pub const NEUTRAL_CHANNEL: u8 = 127;

/// Largest displacement map side in pixels accepted by [`DisplacementMap::generate`].
pub const MAX_MAP_DIMENSION: u32 = 16384;

/// RGBA8 displacement field over a rounded rectangle.
///
/// R and G hold the inward displacement along x and y as `127 + d * 127`, so `127` is neutral,
/// `0` is full negative and `254` full positive. B is unused and A is opaque. Displacement is
/// strongest on the outline and fades linearly to zero `edge_distance` points inside it.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplacementMap {
    image: RgbaImage,
}

impl DisplacementMap {
    /// Rasterize the field for a `size` rectangle at `scale` pixels per point.
    ///
    /// The corner radius is clamped to half the shorter side. A zero `edge_distance` displaces
    /// only pixels on or outside the outline.
    #[tracing::instrument(level = "debug")]
    pub fn generate(
        size: Size,
        corner_radius: f64,
        edge_distance: f64,
        scale: f64,
    ) -> MeshResult<Self> {
        if !(size.is_finite() && scale.is_finite() && scale > 0.0) {
            return Err(MeshWarpError::validation(format!(
                "displacement map needs a finite size and a positive scale, got {size:?} at {scale}"
            )));
        }
        if !corner_radius.is_finite() || !edge_distance.is_finite() || edge_distance < 0.0 {
            return Err(MeshWarpError::validation(
                "corner radius and edge distance must be finite, edge distance non-negative",
            ));
        }

        let (px_w, px_h) = (size.width * scale, size.height * scale);
        let limit = f64::from(MAX_MAP_DIMENSION);
        if px_w > limit || px_h > limit {
            return Err(MeshWarpError::validation(format!(
                "displacement map of {px_w}x{px_h} pixels exceeds {MAX_MAP_DIMENSION} per side"
            )));
        }
        let width = px_w as u32;
        let height = px_h as u32;
        if width == 0 || height == 0 {
            return Err(MeshWarpError::validation(format!(
                "displacement map would be {width}x{height} pixels"
            )));
        }
        let radius = clamp_corner_radius(size, corner_radius);

        let row_len = width as usize * 4;
        let mut data = vec![0u8; row_len * height as usize];
        data.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(py, row)| {
                let y = py as f64 / scale;
                for (px, pixel) in row.chunks_exact_mut(4).enumerate() {
                    let p = Point::new(px as f64 / scale, y);
                    let inward = -rounded_rect_gradient(p, size, radius);
                    let dist_from_edge = -rounded_rect_sdf(p, size, radius);
                    let weight = edge_weight(dist_from_edge, edge_distance);
                    pixel[0] = encode_channel(inward.x * weight);
                    pixel[1] = encode_channel(inward.y * weight);
                    pixel[2] = 0;
                    pixel[3] = 255;
                }
            });

        let image = RgbaImage::from_raw(width, height, data).ok_or_else(|| {
            MeshWarpError::validation("displacement buffer does not match its dimensions")
        })?;
        Ok(Self { image })
    }

    /// Wrap an existing RGBA8 image.
    pub fn from_image(image: RgbaImage) -> MeshResult<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(MeshWarpError::validation("displacement map is empty"));
        }
        Ok(Self { image })
    }

    /// Decode a map previously written with [`DisplacementMap::save_png`].
    pub fn open(path: impl AsRef<Path>) -> MeshResult<Self> {
        let path = path.as_ref();
        let img = image::open(path)
            .with_context(|| format!("read displacement map {}", path.display()))?;
        Self::from_image(img.to_rgba8())
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Underlying image.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Take the underlying image.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Bilinearly sample the displacement at pixel coordinates `(x, y)`.
    ///
    /// Coordinates are clamped to the image. The decoded vector lies roughly in `[-1, 1]` per
    /// axis; `bezier` reshapes its magnitude and keeps its direction.
    pub fn sample(&self, x: f64, y: f64, bezier: &DisplacementBezier) -> Vec2 {
        let max_x = f64::from(self.width() - 1);
        let max_y = f64::from(self.height() - 1);
        let cx = x.clamp(0.0, max_x);
        let cy = y.clamp(0.0, max_y);

        let x0 = cx as u32;
        let y0 = cy as u32;
        let x1 = (x0 + 1).min(self.width() - 1);
        let y1 = (y0 + 1).min(self.height() - 1);
        let fx = cx - f64::from(x0);
        let fy = cy - f64::from(y0);

        let at = |sx: u32, sy: u32| {
            let p = self.image.get_pixel(sx, sy).0;
            Vec2::new(f64::from(p[0]), f64::from(p[1]))
        };
        let top = at(x0, y0).lerp(at(x1, y0), fx);
        let bottom = at(x0, y1).lerp(at(x1, y1), fx);
        let c = top.lerp(bottom, fy);

        let neutral = f64::from(NEUTRAL_CHANNEL);
        let d = Vec2::new((c.x - neutral) / neutral, (c.y - neutral) / neutral);
        let mag = d.hypot();
        if mag > 0.0 {
            d * (bezier.ease(mag) / mag)
        } else {
            d
        }
    }

    /// Write the map as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> MeshResult<()> {
        let path = path.as_ref();
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("write displacement map {}", path.display()))?;
        Ok(())
    }
}

fn edge_weight(dist_from_edge: f64, edge_distance: f64) -> f64 {
    if edge_distance > 0.0 {
        (1.0 - dist_from_edge / edge_distance).clamp(0.0, 1.0)
    } else if dist_from_edge <= 0.0 {
        1.0
    } else {
        0.0
    }
}

fn encode_channel(d: f64) -> u8 {
    let neutral = f64::from(NEUTRAL_CHANNEL);
    (neutral + d * neutral).clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/glass/displacement.rs"]
mod tests;
