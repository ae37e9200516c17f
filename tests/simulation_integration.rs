use flock_common::{FlockConfig, RenderOptions, SteeringParams, UpdateMode, Vec2};
use flock_engine::{Agent, ClusterDetector, FlockSimulation, World};

fn config(update_mode: &str, count: usize, seed: u64) -> FlockConfig {
    let text = format!(
        r#"
        [world]
        width = 400.0
        height = 300.0
        update_mode = "{update_mode}"

        [population]
        count = {count}
        seed = {seed}

        [run]
        steps = 50

        [output]
        base_filename = "unused"
        save_agents_in_snapshot = true
        "#
    );
    FlockConfig::from_toml_str(&text).expect("test config parses")
}

#[test]
fn seeded_runs_are_reproducible() {
    let mut a = FlockSimulation::new(config("sequential", 60, 9)).unwrap();
    let mut b = FlockSimulation::new(config("sequential", 60, 9)).unwrap();
    for _ in 0..100 {
        assert_eq!(a.step(), b.step());
    }
    assert_eq!(a.world().agents(), b.world().agents());

    let mut c = FlockSimulation::new(config("sequential", 60, 10)).unwrap();
    c.step();
    assert_ne!(a.world().agents()[0].position, c.world().agents()[0].position);
}

#[test]
fn step_invariants_hold_with_live_retuning() {
    for mode in ["sequential", "synchronized"] {
        let mut sim = FlockSimulation::new(config(mode, 120, 1)).unwrap();
        let width = sim.world().width();
        let height = sim.world().height();
        for step in 0..300u64 {
            if step == 150 {
                let tuned = SteeringParams {
                    max_speed: 5.0,
                    max_force: 0.5,
                    perception_radius: 80.0,
                    separation_weight: 2.0,
                    ..Default::default()
                };
                sim.set_params(tuned).unwrap();
            }
            let report = sim.step();
            assert_eq!(report.step, step + 1);
            assert_eq!(report.cluster.labels.len(), 120);
            assert_eq!(report.cluster.cluster_sizes().len(), report.cluster.count);

            let max_speed = sim.params().max_speed;
            for agent in sim.world().agents() {
                assert!(agent.velocity.length() <= max_speed + 1e-4);
                assert!(agent.position.x >= 0.0 && agent.position.x <= width);
                assert!(agent.position.y >= 0.0 && agent.position.y <= height);
            }
        }
    }
}

#[test]
fn report_matches_fresh_detection() {
    let mut sim = FlockSimulation::new(config("sequential", 80, 4)).unwrap();
    let detector = ClusterDetector::new(sim.config().cluster_params());
    for _ in 0..20 {
        let report = sim.step();
        assert_eq!(report.cluster, detector.detect(&sim.world().positions()));
        assert_eq!(sim.last_cluster(), &report.cluster);
    }
}

#[test]
fn invalid_tunables_are_rejected_before_the_core() {
    let mut sim = FlockSimulation::new(config("sequential", 10, 2)).unwrap();
    let before = *sim.params();
    let bad = SteeringParams { max_speed: -1.0, ..Default::default() };
    assert!(sim.set_params(bad).is_err());
    assert_eq!(*sim.params(), before);
}

#[test]
fn frame_exposes_headings_and_optional_highlight() {
    let mut sim = FlockSimulation::new(config("sequential", 25, 3)).unwrap();
    sim.step();
    let highlighted = sim.choose_highlighted_agent();
    assert!(highlighted.map_or(false, |idx| idx < 25));

    let shown = sim.frame(&RenderOptions { show_highlight_radius: true, highlighted_agent: highlighted });
    assert_eq!(shown.step, 1);
    assert_eq!(shown.agents.len(), 25);
    assert_eq!(shown.cluster_count, sim.last_cluster().count);
    let ring = shown.highlight.expect("highlight requested");
    let agent = &sim.world().agents()[highlighted.unwrap()];
    assert_eq!(ring.center, agent.position);
    assert_eq!(ring.radius, agent.perception_radius);
    for (frame, agent) in shown.agents.iter().zip(sim.world().agents()) {
        assert_eq!(frame.heading, agent.velocity.heading());
    }

    let hidden = sim.frame(&RenderOptions { show_highlight_radius: false, highlighted_agent: highlighted });
    assert!(hidden.highlight.is_none());
    // Rendering options never feed back into the simulation.
    assert_eq!(shown.agents, hidden.agents);
}

#[test]
fn snapshots_capture_cluster_metrics() {
    let mut sim = FlockSimulation::new(config("synchronized", 40, 8)).unwrap();
    sim.record_snapshot();
    for _ in 0..5 {
        sim.step();
    }
    sim.record_snapshot();

    let snapshots = sim.recorded_snapshots();
    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[0].step, 0);
    assert_eq!(snapshots[1].step, 5);
    let last = &snapshots[1];
    assert_eq!(last.cluster_count, sim.last_cluster().count);
    assert_eq!(last.cluster_sizes.iter().sum::<usize>() + last.noise_count, 40);
    assert_eq!(last.agents.as_ref().map(Vec::len), Some(40));
    assert!(last.mean_speed > 0.0 && last.mean_speed <= sim.params().max_speed + 1e-4);
}

#[test]
fn switching_update_mode_mid_run() {
    let mut sim = FlockSimulation::new(config("sequential", 30, 6)).unwrap();
    sim.step();
    sim.set_update_mode(UpdateMode::Synchronized);
    assert_eq!(sim.world().mode(), UpdateMode::Synchronized);
    sim.step();
    assert_eq!(sim.current_step(), 2);
}

#[test]
fn tight_groups_count_as_clusters_after_a_step() {
    // Two small stationary groups far apart; one step of flocking keeps them separate.
    let offsets = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (2.0, 2.0), (-1.0, -1.0)];
    let mut agents: Vec<Agent> = offsets
        .iter()
        .map(|&(dx, dy)| Agent::new(Vec2::new(60.0 + dx, 60.0 + dy), Vec2::zero()))
        .collect();
    agents.extend(offsets.iter().map(|&(dx, dy)| Agent::new(Vec2::new(300.0 + dx, 200.0 + dy), Vec2::zero())));

    let mut world = World::new(400.0, 300.0, agents);
    world.step(&SteeringParams::default());
    let result = ClusterDetector::new(Default::default()).detect(&world.positions());
    assert_eq!(result.count, 2);
    assert_eq!(result.noise_count(), 0);
}
