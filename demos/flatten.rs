//! Flattens a bulge polyline and an elliptic arc and prints the vertices.
//!
//! Usage:
//! ```text
//! cargo run --example flatten               # distance 0.01
//! cargo run --example flatten -- 0.001      # custom distance
//! RUST_LOG=dxfpath=debug cargo run --example flatten
//! ```

use dxfpath::geometry::Ellipse;
use dxfpath::math::{Ocs, Point3, Vector3};
use dxfpath::tessellation::DEFAULT_FLATTENING_SEGMENTS;
use dxfpath::{Path, Result};

fn main() -> Result<()> {
    // Default: WARN for everything, INFO for dxfpath.
    // Override with RUST_LOG env var (e.g. RUST_LOG=dxfpath=trace).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("flatten=info".parse().unwrap_or_default())
        .add_directive("dxfpath=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let distance = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<f64>().ok())
        .unwrap_or(0.01);

    // Slot shape: two straight sides joined by semicircles.
    let mut slot = Path::default();
    slot.add_2d_polyline(
        [(0.0, 0.0, 0.0), (4.0, 0.0, 1.0), (4.0, 2.0, 0.0), (0.0, 2.0, 1.0)],
        true,
        &Ocs::default(),
        0.0,
    )?;
    report("slot", &slot, distance);

    let arc = Ellipse::from_arc(Point3::new(0.0, 0.0, 0.0), 2.0, Vector3::z(), 30.0, 300.0)?;
    let mut path = Path::default();
    path.add_ellipse(&arc, 1, true);
    report("arc", &path, distance);

    Ok(())
}

fn report(name: &str, path: &Path, distance: f64) {
    let vertices: Vec<Point3> = path.flattening(distance, DEFAULT_FLATTENING_SEGMENTS).collect();
    tracing::info!(
        name,
        commands = path.len(),
        vertices = vertices.len(),
        closed = path.is_closed(),
        clockwise = path.has_clockwise_orientation(),
        "flattened path"
    );
    for v in &vertices {
        println!("{name}\t{:.6}\t{:.6}\t{:.6}", v.x, v.y, v.z);
    }
}
