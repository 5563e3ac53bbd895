use std::f64::consts::{FRAC_PI_2, PI};

use crate::foundation::core::{BezPath, Point, Point3D, Size};
use crate::foundation::error::{MeshResult, MeshWarpError};
use crate::foundation::math::smoothstep01;
use crate::glass::bezier::DisplacementBezier;
use crate::glass::displacement::DisplacementMap;
use crate::glass::sdf::{clamp_corner_radius, rounded_rect_sdf};
use crate::mesh::builder::MeshBuilder;
use crate::mesh::descriptor::{MeshDescriptor, Vertex, VertexIndex};

/// Depth given to the anchor vertex at the centre of each corner fan.
pub const CORNER_ANCHOR_DEPTH: f64 = -0.02;

/// Largest accepted [`GlassMeshParams::corner_resolution`].
pub const MAX_CORNER_RESOLUTION: u32 = 256;

/// Extra displacement on the outline, fading out across `outer_edge_distance`.
const EDGE_BOOST_GAIN: f64 = 0.5;

/// Parameters for [`generate_glass_mesh`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GlassMeshParams {
    /// Size of the glass surface in points.
    pub size: Size,
    /// Corner radius in points, clamped to half the shorter side.
    pub corner_radius: f64,
    /// Largest source offset in points.
    pub displacement_magnitude: f64,
    /// Angular and radial sampling density of the corner wedges.
    pub corner_resolution: u32,
    /// Width in points of the outer band that gets extra rings and extra displacement.
    pub outer_edge_distance: f64,
    /// Falloff distance used when rasterizing the displacement map.
    pub edge_distance: f64,
    /// Mesh inset in points. Negative values grow the mesh past the outline.
    pub inset: f64,
    /// Easing applied to sampled displacement magnitudes.
    pub bezier: DisplacementBezier,
    /// Also emit an outline path of every face.
    pub wireframe: bool,
}

impl Default for GlassMeshParams {
    fn default() -> Self {
        Self::new(Size::new(100.0, 100.0), 20.0)
    }
}

impl GlassMeshParams {
    /// Parameters with the stock glass look for a surface of `size` and `corner_radius`.
    pub fn new(size: Size, corner_radius: f64) -> Self {
        Self {
            size,
            corner_radius,
            displacement_magnitude: 20.0,
            corner_resolution: 12,
            outer_edge_distance: 2.0,
            edge_distance: corner_radius.clamp(0.0, 12.0),
            inset: -1.0,
            bezier: DisplacementBezier::default(),
            wireframe: false,
        }
    }

    /// Check that every parameter is usable.
    pub fn validate(&self) -> MeshResult<()> {
        let Size { width, height } = self.size;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(MeshWarpError::validation(format!(
                "glass size must be positive and finite, got {width}x{height}"
            )));
        }
        let finite = [
            ("corner_radius", self.corner_radius),
            ("displacement_magnitude", self.displacement_magnitude),
            ("outer_edge_distance", self.outer_edge_distance),
            ("edge_distance", self.edge_distance),
            ("inset", self.inset),
        ];
        if let Some((name, v)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(MeshWarpError::validation(format!(
                "{name} must be finite, got {v}"
            )));
        }
        if self.corner_radius < 0.0 {
            return Err(MeshWarpError::validation("corner_radius must be non-negative"));
        }
        if self.corner_resolution > MAX_CORNER_RESOLUTION {
            return Err(MeshWarpError::validation(format!(
                "corner_resolution must be <= {MAX_CORNER_RESOLUTION}, got {}",
                self.corner_resolution
            )));
        }
        if !self.bezier.is_valid() {
            return Err(MeshWarpError::validation(format!(
                "displacement bezier x control points must lie in [0, 1], got {:?}",
                self.bezier
            )));
        }
        Ok(())
    }

    /// Rasterize the matching displacement map at one pixel per point.
    pub fn displacement_map(&self) -> MeshResult<DisplacementMap> {
        self.validate()?;
        DisplacementMap::generate(self.size, self.corner_radius, self.edge_distance, 1.0)
    }
}

/// Output of [`generate_glass_mesh`].
#[derive(Clone, Debug)]
pub struct GlassMesh {
    /// The refraction mesh, in normalized `[0, 1]` coordinates.
    pub descriptor: MeshDescriptor,
    /// Face outlines in points, when requested.
    pub wireframe: Option<BezPath>,
}

/// Build a refraction mesh for a rounded-rectangle glass surface.
///
/// Topology: edge strips along the four sides, a centre patch, and a polar wedge per corner that
/// collapses into a fan around a slightly sunk anchor. Seams between regions share coordinates
/// but not vertices. Every vertex's `to` is its normalized position on the surface; `from` is
/// pulled inward by the sampled displacement. Faces lying entirely outside the outline are
/// dropped.
#[tracing::instrument(
    skip(params, map),
    fields(
        width = params.size.width,
        height = params.size.height,
        resolution = params.corner_resolution
    )
)]
pub fn generate_glass_mesh(
    params: &GlassMeshParams,
    map: &DisplacementMap,
) -> MeshResult<GlassMesh> {
    params.validate()?;

    let mut g = Generator::new(params, map);
    let Size { width, height } = params.size;
    let r = g.radius;
    let res = params.corner_resolution as usize;

    let angular_steps = {
        let base = res.max(3);
        base + base % 2
    };
    let radial_steps = res.max(2);
    let segments = (res / 2 + 1).max(2);

    let depth_factors = depth_factors(radial_steps, params.outer_edge_distance, r);
    let outer_to_inner: Vec<f64> = depth_factors.iter().rev().copied().collect();
    let angular: Vec<f64> = (0..=angular_steps)
        .map(|i| i as f64 / angular_steps as f64)
        .collect();

    let top_x = linear_positions(segments, r, width - r);
    let side_y = linear_positions(segments, r, height - r);
    let top_y: Vec<f64> = outer_to_inner.iter().map(|f| r * (1.0 - f)).collect();
    let bottom_y: Vec<f64> = depth_factors.iter().map(|f| height - r + r * f).collect();
    let left_x: Vec<f64> = outer_to_inner.iter().map(|f| r * (1.0 - f)).collect();
    let right_x: Vec<f64> = depth_factors.iter().map(|f| width - r + r * f).collect();

    g.strip(&top_x, &top_y);
    g.strip(&top_x, &bottom_y);
    g.strip(&left_x, &side_y);
    g.strip(&right_x, &side_y);
    g.strip(&top_x, &side_y);

    let rings: Vec<f64> = outer_to_inner.iter().copied().filter(|&f| f > 0.0).collect();
    g.corner(Point::new(r, r), PI, 1.5 * PI, &rings, &angular);
    g.corner(Point::new(width - r, r), 1.5 * PI, 2.0 * PI, &rings, &angular);
    g.corner(Point::new(width - r, height - r), FRAC_PI_2, 0.0, &rings, &angular);
    g.corner(Point::new(r, height - r), PI, FRAC_PI_2, &rings, &angular);

    let skipped = g.skipped;
    let wireframe = g.wireframe.take();
    let descriptor = g.builder.finish()?;
    tracing::debug!(
        vertices = descriptor.vertex_count(),
        faces = descriptor.face_count(),
        skipped,
        "glass mesh generated"
    );
    Ok(GlassMesh {
        descriptor,
        wireframe,
    })
}

struct Generator<'a> {
    params: &'a GlassMeshParams,
    map: &'a DisplacementMap,
    radius: f64,
    usable: Size,
    builder: MeshBuilder,
    points: Vec<Point>,
    wireframe: Option<BezPath>,
    skipped: usize,
}

impl<'a> Generator<'a> {
    fn new(params: &'a GlassMeshParams, map: &'a DisplacementMap) -> Self {
        let Size { width, height } = params.size;
        Self {
            params,
            map,
            radius: clamp_corner_radius(params.size, params.corner_radius),
            usable: Size::new(
                (width - params.inset * 2.0).max(1.0),
                (height - params.inset * 2.0).max(1.0),
            ),
            builder: MeshBuilder::new(),
            points: Vec::new(),
            wireframe: params.wireframe.then(BezPath::new),
            skipped: 0,
        }
    }

    fn add_vertex(&mut self, p: Point, depth: f64) -> VertexIndex {
        let size = self.params.size;
        let u = p.x / size.width;
        let v = p.y / size.height;
        let mapped_u = self.params.inset / size.width + u * self.usable.width / size.width;
        let mapped_v = self.params.inset / size.height + v * self.usable.height / size.height;

        let d = self.map.sample(
            mapped_u * f64::from(self.map.width() - 1),
            mapped_v * f64::from(self.map.height() - 1),
            &self.params.bezier,
        );
        let world = Point::new(
            self.params.inset + u * self.usable.width,
            self.params.inset + v * self.usable.height,
        );
        let boost = self.edge_boost(world);
        let magnitude = self.params.displacement_magnitude;
        let from = Point::new(
            (mapped_u + d.x * magnitude / size.width * boost).clamp(0.0, 1.0),
            (mapped_v + d.y * magnitude / size.height * boost).clamp(0.0, 1.0),
        );

        self.points
            .push(Point::new(mapped_u * size.width, mapped_v * size.height));
        self.builder
            .add_vertex(Vertex::new(from, Point3D::new(mapped_u, mapped_v, depth)))
    }

    fn edge_boost(&self, world: Point) -> f64 {
        let band = self.params.outer_edge_distance.max(0.0);
        if band <= 0.0 {
            return 1.0;
        }
        let dist = (-rounded_rect_sdf(world, self.params.size, self.radius)).max(0.0);
        1.0 + smoothstep01((band - dist) / band) * EDGE_BOOST_GAIN
    }

    fn add_face(&mut self, idx: [VertexIndex; 4]) {
        let p = idx.map(|i| self.points[i as usize]);
        if p.iter()
            .all(|&q| rounded_rect_sdf(q, self.params.size, self.radius) > 0.0)
        {
            self.skipped += 1;
            return;
        }
        self.builder.add_quad(idx[0], idx[1], idx[2], idx[3]);
        if let Some(path) = self.wireframe.as_mut() {
            path.move_to(p[0]);
            path.line_to(p[1]);
            path.line_to(p[2]);
            path.line_to(p[3]);
            path.close_path();
        }
    }

    fn strip(&mut self, xs: &[f64], ys: &[f64]) {
        let mut grid: Vec<Vec<VertexIndex>> = Vec::with_capacity(ys.len());
        for &y in ys {
            let mut row = Vec::with_capacity(xs.len());
            for &x in xs {
                row.push(self.add_vertex(Point::new(x, y), 0.0));
            }
            grid.push(row);
        }
        for r in 0..grid.len().saturating_sub(1) {
            for c in 0..xs.len().saturating_sub(1) {
                self.add_face([grid[r][c], grid[r][c + 1], grid[r + 1][c + 1], grid[r + 1][c]]);
            }
        }
    }

    fn corner(&mut self, center: Point, start: f64, end: f64, rings: &[f64], angular: &[f64]) {
        if rings.is_empty() {
            return;
        }
        let radius = self.radius;
        let mut ring_indices: Vec<Vec<VertexIndex>> = Vec::with_capacity(rings.len());
        for &f in rings {
            let rr = radius * f;
            let mut ring = Vec::with_capacity(angular.len());
            for &t in angular {
                let a = start + (end - start) * t;
                let p = Point::new(center.x + rr * a.cos(), center.y + rr * a.sin());
                ring.push(self.add_vertex(p, 0.0));
            }
            ring_indices.push(ring);
        }

        for pair in ring_indices.windows(2) {
            let (outer, inner) = (&pair[0], &pair[1]);
            for i in 0..outer.len() - 1 {
                self.add_face([outer[i], outer[i + 1], inner[i + 1], inner[i]]);
            }
        }

        // Collapse the innermost ring into double-width quads around the anchor.
        let Some(innermost) = ring_indices.last() else {
            return;
        };
        let segments = innermost.len() - 1;
        if segments < 2 {
            return;
        }
        let anchor = self.add_vertex(center, CORNER_ANCHOR_DEPTH);
        let mut i = 0;
        while i + 2 <= segments {
            self.add_face([anchor, innermost[i], innermost[i + 1], innermost[i + 2]]);
            i += 2;
        }
        if i < segments {
            let last = innermost[segments];
            self.add_face([anchor, innermost[segments - 1], last, last]);
        }
    }
}

/// Radial sampling from the corner centre (`0`) to the arc (`1`): evenly spaced inner rings up to
/// the outer band, then the band edge and the arc itself.
fn depth_factors(count: usize, band: f64, max_radius: f64) -> Vec<f64> {
    if count == 0 || max_radius <= 0.0 {
        return vec![0.0, 1.0];
    }
    let band_norm = (band / max_radius).clamp(0.0, 1.0);
    let inner_segments = count.saturating_sub(1).max(1);
    let inner_max = (1.0 - band_norm).max(0.0);

    let mut factors: Vec<f64> = (0..=inner_segments)
        .map(|i| inner_max * i as f64 / inner_segments as f64)
        .collect();
    for v in [inner_max, 1.0] {
        if factors.last().is_some_and(|last| (last - v).abs() < 1e-4) {
            continue;
        }
        factors.push(v);
    }
    factors
}

fn linear_positions(count: usize, start: f64, end: f64) -> Vec<f64> {
    (0..=count)
        .map(|i| start + (end - start) * (i as f64 / count as f64))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/glass/generate.rs"]
mod tests;
