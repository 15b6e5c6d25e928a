use glam::{Quat, Vec2, Vec3};
use rand::SeedableRng;
use rand::rngs::StdRng;

use solenoid_flow::picking::{PickingController, Viewport};
use solenoid_flow::rendering::camera::Camera;
use solenoid_flow::simulation::billboard::BillboardSystem;
use solenoid_flow::simulation::field::DipoleField;
use solenoid_flow::simulation::integrator::{Integrator, StepOutcome};
use solenoid_flow::simulation::point_cloud::PointCloudSystem;
use solenoid_flow::simulation::reset::ResetPolicy;
use solenoid_flow::simulation::trait_def::ParticleSystem;
use solenoid_flow::{AssetId, ParticleMode, SimulationConfig, SimulationManager};

const TOLERANCE: f32 = 1e-4;

fn catalog() -> Vec<AssetId> {
    ["first.jpg", "second.jpg", "third.jpg"]
        .into_iter()
        .map(AssetId::from)
        .collect()
}

fn assert_in_shell(config: &SimulationConfig, positions: &[Vec3]) {
    let inner = config.inner_bound() * config.inner_bound();
    let outer = config.outer_bound() * config.outer_bound();
    for (i, p) in positions.iter().enumerate() {
        let r2 = p.length_squared();
        assert!(p.is_finite(), "particle {} is not finite: {:?}", i, p);
        assert!(
            r2 >= inner - TOLERANCE && r2 <= outer + TOLERANCE,
            "particle {} left the shell: {:?}",
            i,
            p
        );
    }
}

#[test]
fn test_billboards_stay_in_shell() {
    let config = SimulationConfig::default();
    let mut system = BillboardSystem::new(&config, &catalog(), 11).unwrap();
    assert_in_shell(&config, system.positions());

    let view = Quat::from_rotation_y(0.4);
    for frame in 0..900 {
        // Mix of normal frames, stalls and garbage deltas
        let dt = match frame % 7 {
            0 => 0.5,
            1 => f32::NAN,
            2 => -1.0,
            _ => 1.0 / 60.0,
        };
        system.step_all(dt, view);
        assert_in_shell(&config, system.positions());
    }
}

#[test]
fn test_point_cloud_stays_in_shell() {
    let config = SimulationConfig::default().with_particle_count(250);
    let mut system = PointCloudSystem::new(&config, 12);

    for _ in 0..900 {
        system.step_all(1.0 / 30.0, Quat::IDENTITY);
        assert_in_shell(&config, system.positions());
    }
    assert_eq!(system.len(), 250);
}

#[test]
fn test_field_reference_values() {
    let field = DipoleField::new(Vec3::new(0.0, 0.0, 15.0));

    assert_eq!(field.field(Vec3::ZERO), Vec3::ZERO);

    let on_x = field.field(Vec3::X);
    let on_y = field.field(Vec3::Y);
    assert!(on_x.abs_diff_eq(Vec3::new(0.0, 0.0, -15.0), TOLERANCE));
    assert!((on_x.length() - on_y.length()).abs() < TOLERANCE);
    assert!(on_y.z < 0.0);
}

#[test]
fn test_bore_flow_is_axial() {
    let config = SimulationConfig::default();
    let integrator = Integrator::new(&config);

    let offset = integrator.displacement(Vec3::ZERO, 1.0 / 30.0).unwrap();
    assert!(offset.abs_diff_eq(Vec3::new(0.0, 0.0, config.flow_speed() / 30.0), 1e-6));
}

#[test]
fn test_vanishing_field_sends_particles_back_to_pole() {
    let config = SimulationConfig::new(1.5, 5.0, 0.0, 0.5);
    let integrator = Integrator::new(&config);
    let mut rng = StdRng::seed_from_u64(31);

    let exterior = Vec3::new(3.0, 2.0, 4.0);
    assert!(integrator.displacement(exterior, 1.0 / 30.0).is_none());
    match integrator.step(exterior, 1.0 / 30.0, &mut rng) {
        StepOutcome::Reset(p) => assert!(p.z <= -config.half_height()),
        other => panic!("expected a reset, got {:?}", other),
    }

    let interior = Vec3::new(0.5, 0.0, -1.0);
    match integrator.step(interior, 1.0 / 30.0, &mut rng) {
        StepOutcome::Advanced(p) => {
            let moved = p - interior;
            assert!(moved.truncate().length() < 1e-6);
            assert!((moved.z - config.flow_speed() / 30.0).abs() < 1e-6);
        }
        other => panic!("expected an advance, got {:?}", other),
    }

    // Every particle keeps cycling through the shell
    let mut system = PointCloudSystem::new(&config.clone().with_particle_count(100), 32);
    for _ in 0..100 {
        system.step_all(1.0 / 30.0, Quat::IDENTITY);
        assert_in_shell(&config, system.positions());
    }
}

#[test]
fn test_reinitialized_positions_below_lower_pole() {
    let config = SimulationConfig::default();
    let policy = ResetPolicy::new(&config);
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..2000 {
        let p = policy.reinitialize(&mut rng);
        assert!(p.z <= -config.half_height());
        assert!(Vec2::new(p.x, p.y).length() <= 0.5 + 1e-6);
        assert!(!policy.should_reset(p));
    }
}

#[test]
fn test_mode_switch_keeps_particle_count() {
    let config = SimulationConfig::default();
    let n = config.particle_count();
    let mut manager = SimulationManager::new(config, catalog(), ParticleMode::Billboard, Some(21));

    assert_eq!(manager.mode(), ParticleMode::Billboard);
    assert_eq!(manager.renderable_count(), n);
    assert_eq!(manager.quad_count(), n);

    assert!(manager.switch_mode(ParticleMode::PointCloud));
    assert_eq!(manager.renderable_count(), n);
    assert_eq!(manager.quad_count(), 0);

    manager.step(1.0 / 60.0, Quat::IDENTITY);

    assert!(manager.switch_mode(ParticleMode::Billboard));
    assert_eq!(manager.renderable_count(), n);
    assert_eq!(manager.quad_count(), n);
}

#[test]
fn test_empty_catalog_starts_point_cloud() {
    let manager = SimulationManager::new(SimulationConfig::default(), Vec::new(), ParticleMode::Billboard, None);
    assert_eq!(manager.mode(), ParticleMode::PointCloud);
    assert_eq!(manager.renderable_count(), SimulationConfig::default().particle_count());
}

#[test]
fn test_pick_returns_nearer_billboard() {
    let config = SimulationConfig::default();
    let positions = vec![Vec3::new(0.0, 0.0, -4.0), Vec3::new(0.0, 0.0, 4.0)];
    let mut system = BillboardSystem::with_positions(&config, positions, &catalog(), 5).unwrap();

    let camera = Camera::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, 800.0 / 600.0);
    system.face(camera.rotation());

    let selection = PickingController
        .pick(&system, Vec2::new(400.0, 300.0), Viewport::new(800, 600), &camera)
        .unwrap();
    assert_eq!(selection.index, 1);
    assert_eq!(selection.tag.as_ref(), "second.jpg");
}

#[test]
fn test_pick_misses_empty_space() {
    let config = SimulationConfig::default();
    let system = BillboardSystem::with_positions(&config, vec![Vec3::new(0.0, 0.0, 4.0)], &catalog(), 6).unwrap();
    let camera = Camera::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, 1.0);

    assert!(
        PickingController
            .pick(&system, Vec2::new(5.0, 5.0), Viewport::new(600, 600), &camera)
            .is_none()
    );
}

#[test]
fn test_same_seed_same_flow() {
    let config = SimulationConfig::default();
    let mut a = PointCloudSystem::new(&config, 77);
    let mut b = PointCloudSystem::new(&config, 77);

    for _ in 0..120 {
        a.step_all(1.0 / 30.0, Quat::IDENTITY);
        b.step_all(1.0 / 30.0, Quat::IDENTITY);
    }
    assert_eq!(a.positions(), b.positions());
}
