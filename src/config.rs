//! Startup configuration.
//!
//! [`SimulationConfig`] holds the solenoid geometry and flow constants. It is
//! built once before the event loop starts and only handed out by shared
//! reference afterwards. [`Args`] is the command line, and
//! [`load_catalog`] turns it into the ordered list of image identifiers.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use glam::Vec3;

use crate::error::AppError;
use crate::simulation::types::{AssetId, NUM_PARTICLES};

/// Radius of the sphere around the origin inside which particles are reset.
pub const NEAR_POLE_DISTANCE: f32 = 0.2;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    coil_radius: f32,
    half_height: f32,
    dipole_moment: Vec3,
    flow_speed: f32,
    inner_bound: f32,
    outer_bound: f32,
    particle_count: usize,
    image_size: f32,
    point_size: f32,
}

impl SimulationConfig {
    /// Build a configuration from the coil geometry. The pole planes sit at
    /// `z = ±coil_height / 2` and the outer reset sphere scales with the coil.
    pub fn new(coil_radius: f32, coil_height: f32, dipole_strength: f32, flow_speed: f32) -> Self {
        Self {
            coil_radius,
            half_height: coil_height / 2.0,
            dipole_moment: Vec3::new(0.0, 0.0, dipole_strength),
            flow_speed,
            inner_bound: NEAR_POLE_DISTANCE,
            outer_bound: coil_height * 2.5,
            particle_count: NUM_PARTICLES,
            image_size: 0.6,
            point_size: 0.4,
        }
    }

    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    pub fn coil_radius(&self) -> f32 {
        self.coil_radius
    }

    /// Axial coordinate of the upper pole plane.
    pub fn half_height(&self) -> f32 {
        self.half_height
    }

    pub fn dipole_moment(&self) -> Vec3 {
        self.dipole_moment
    }

    pub fn flow_speed(&self) -> f32 {
        self.flow_speed
    }

    /// `R_min`: particles closer than this to the origin are reset.
    pub fn inner_bound(&self) -> f32 {
        self.inner_bound
    }

    /// `R_max`: particles farther than this from the origin are reset.
    pub fn outer_bound(&self) -> f32 {
        self.outer_bound
    }

    pub fn particle_count(&self) -> usize {
        self.particle_count
    }

    pub fn image_size(&self) -> f32 {
        self.image_size
    }

    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    /// Radius of the sphere used for the initial scatter of particles.
    pub fn spawn_radius(&self) -> f32 {
        self.outer_bound * 0.8
    }

    /// True inside the solenoid bore, where the flow is uniform and axial.
    pub fn is_inside_coil(&self, position: Vec3) -> bool {
        let radial_sq = position.x * position.x + position.y * position.y;
        radial_sq < self.coil_radius * self.coil_radius && position.z.abs() < self.half_height
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(1.5, 5.0, 15.0, 0.5)
    }
}

/// Magnetic field lines through a solenoid, drawn with particles.
#[derive(Parser, Debug, Default)]
#[command(version, about)]
pub struct Args {
    /// Image identifiers shown on the particles, in order.
    pub images: Vec<String>,

    /// File with one image identifier per line.
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Number of particles.
    #[arg(long, default_value_t = NUM_PARTICLES)]
    pub particles: usize,

    /// Seed for particle placement; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start with the point cloud even when images are available.
    #[arg(long)]
    pub point_cloud: bool,
}

impl Args {
    pub fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig::default().with_particle_count(self.particles)
    }
}

/// Collect the image catalog: entries from `--catalog` first, then the
/// positional identifiers.
pub fn load_catalog(args: &Args) -> Result<Vec<AssetId>, AppError> {
    let mut catalog = Vec::new();

    if let Some(path) = &args.catalog {
        let contents = fs::read_to_string(path).map_err(|source| AppError::Catalog {
            path: path.clone(),
            source,
        })?;
        catalog.extend(parse_catalog(&contents));
    }

    catalog.extend(args.images.iter().map(|image| AssetId::from(image.as_str())));
    Ok(catalog)
}

fn parse_catalog(contents: &str) -> impl Iterator<Item = AssetId> + '_ {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(AssetId::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bounds() {
        let config = SimulationConfig::default();
        assert_eq!(config.half_height(), 2.5);
        // R_max = 2.5 x (2h)
        assert_eq!(config.outer_bound(), 2.5 * (2.0 * config.half_height()));
        assert!(config.inner_bound() < config.half_height());
        assert_eq!(config.dipole_moment(), Vec3::new(0.0, 0.0, 15.0));
    }

    #[test]
    fn test_inside_coil() {
        let config = SimulationConfig::default();
        assert!(config.is_inside_coil(Vec3::ZERO));
        assert!(config.is_inside_coil(Vec3::new(1.0, 0.0, 2.0)));
        assert!(!config.is_inside_coil(Vec3::new(1.5, 0.0, 0.0)));
        assert!(!config.is_inside_coil(Vec3::new(0.0, 0.0, 2.5)));
        assert!(!config.is_inside_coil(Vec3::new(0.0, 0.0, -3.0)));
    }

    #[test]
    fn test_parse_catalog() {
        let contents = "# backgrounds\nnebula.png\n\n  aurora.jpg \n";
        let catalog: Vec<AssetId> = parse_catalog(contents).collect();
        assert_eq!(catalog, vec![AssetId::from("nebula.png"), AssetId::from("aurora.jpg")]);
    }

    #[test]
    fn test_load_catalog_order() {
        let dir = std::env::temp_dir().join(format!("solenoid-flow-catalog-{}", std::process::id()));
        fs::write(&dir, "a.png\nb.png\n").unwrap();

        let args = Args {
            images: vec!["c.png".to_string()],
            catalog: Some(dir.clone()),
            ..Args::default()
        };
        let catalog = load_catalog(&args).unwrap();
        fs::remove_file(&dir).unwrap();

        let names: Vec<&str> = catalog.iter().map(|id| id.as_ref()).collect();
        assert_eq!(names, ["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn test_missing_catalog_file() {
        let args = Args {
            catalog: Some(PathBuf::from("/nonexistent/solenoid-flow/catalog.txt")),
            ..Args::default()
        };
        assert!(matches!(load_catalog(&args), Err(AppError::Catalog { .. })));
    }
}
