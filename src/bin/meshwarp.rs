use std::{
    io::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "meshwarp", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a rounded-rectangle glass mesh and print its summary.
    Glass(GlassArgs),
    /// Build a transform from a mesh descriptor JSON and print its summary.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct GlassArgs {
    /// Surface width in points.
    #[arg(long)]
    width: f64,

    /// Surface height in points.
    #[arg(long)]
    height: f64,

    /// Corner radius in points.
    #[arg(long)]
    corner_radius: f64,

    /// Corner wedge sampling density.
    #[arg(long, default_value_t = 12)]
    resolution: u32,

    /// Depth normalization: none, linear or perspective.
    #[arg(long, default_value = "none")]
    policy: String,

    /// Write the mesh descriptor as JSON.
    #[arg(long)]
    out_mesh: Option<PathBuf>,

    /// Write the displacement map as PNG.
    #[arg(long)]
    out_map: Option<PathBuf>,

    /// Include the face outlines as an SVG path in the summary.
    #[arg(long)]
    wireframe: bool,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input mesh descriptor JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Depth normalization: none, linear or perspective.
    #[arg(long, default_value = "none")]
    policy: String,

    /// Bilinear subdivision steps per face.
    #[arg(long, default_value_t = 0)]
    subdivide: u32,
}

#[derive(serde::Serialize)]
struct Summary {
    policy: String,
    vertices: usize,
    faces: usize,
    triangles: usize,
    bounds: [f64; 4],
    fingerprint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    wireframe: Option<String>,
}

impl Summary {
    fn new(t: &meshwarp::MeshTransform, wireframe: Option<String>) -> Self {
        let b = t.bounds();
        Self {
            policy: t.policy().to_string(),
            vertices: t.vertex_count(),
            faces: t.face_count(),
            triangles: t.triangle_count(),
            bounds: [b.x0, b.y0, b.x1, b.y1],
            fingerprint: format!("{:016x}", t.fingerprint()),
            wireframe,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Glass(args) => cmd_glass(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn cmd_glass(args: GlassArgs) -> anyhow::Result<()> {
    let mut params = meshwarp::GlassMeshParams::new(
        meshwarp::Size::new(args.width, args.height),
        args.corner_radius,
    );
    params.corner_resolution = args.resolution;
    params.wireframe = args.wireframe;

    let map = params.displacement_map()?;
    let glass = meshwarp::generate_glass_mesh(&params, &map)?;
    let transform =
        meshwarp::MeshTransformBuilder::named(&args.policy)?.build(&glass.descriptor)?;

    if let Some(path) = &args.out_map {
        map.save_png(path)?;
    }
    if let Some(path) = &args.out_mesh {
        write_descriptor_json(path, &glass.descriptor)?;
    }

    let wireframe = glass.wireframe.map(|p| p.to_svg());
    print_summary(&Summary::new(&transform, wireframe))
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let desc = read_descriptor_json(&args.in_path)?;
    let transform = meshwarp::MeshTransformBuilder::named(&args.policy)?
        .subdivision_steps(args.subdivide)
        .build(&desc)?;
    print_summary(&Summary::new(&transform, None))
}

fn read_descriptor_json(path: &Path) -> anyhow::Result<meshwarp::MeshDescriptor> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("open mesh '{}'", path.display()))?;
    let desc = meshwarp::MeshDescriptor::from_json(&json)
        .with_context(|| format!("parse mesh '{}'", path.display()))?;
    Ok(desc)
}

fn write_descriptor_json(path: &Path, desc: &meshwarp::MeshDescriptor) -> anyhow::Result<()> {
    let json = desc.to_json_pretty()?;
    std::fs::write(path, json).with_context(|| format!("write mesh '{}'", path.display()))?;
    Ok(())
}

fn print_summary(summary: &Summary) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, summary).with_context(|| "serialize summary")?;
    writeln!(out)?;
    Ok(())
}
