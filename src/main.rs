use clap::Parser;

use solenoid_flow::app::{self, Startup};
use solenoid_flow::config::{Args, load_catalog};
use solenoid_flow::error::AppError;
use solenoid_flow::simulation::types::ParticleMode;

fn main() -> Result<(), AppError> {
    env_logger::init();
    let args = Args::parse();

    let catalog = load_catalog(&args)?;
    log::info!("Loaded {} image(s)", catalog.len());

    let preferred_mode = if args.point_cloud {
        ParticleMode::PointCloud
    } else {
        ParticleMode::Billboard
    };

    app::run(Startup {
        config: args.simulation_config(),
        catalog,
        preferred_mode,
        seed: args.seed,
    })
}
