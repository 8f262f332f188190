use super::*;
use crate::observation::Observation;
use alloc::vec;

struct Constant(u8);

impl Policy for Constant {
    fn evaluate(&mut self, _observation: &Observation) -> u8 {
        self.0
    }
}

/// Cycles through a fixed action script.
struct Script {
    actions: Vec<u8>,
    cursor: usize,
}

impl Policy for Script {
    fn evaluate(&mut self, _observation: &Observation) -> u8 {
        let action = self.actions[self.cursor % self.actions.len()];
        self.cursor += 1;
        action
    }
}

fn boxed<'a>(policies: Vec<Box<dyn Policy + 'a>>) -> Vec<Box<dyn Policy + 'a>> {
    policies
}

fn far_obstacles() -> SimConfig {
    // Obstacles spawn so far right that they never reach the agents.
    SimConfig {
        world_width: 10_000_000,
        ..SimConfig::default()
    }
}

#[test]
fn empty_population_is_rejected_before_any_tick() {
    let result = Generation::new(SimConfig::default(), 1, 1, Vec::new());
    assert!(matches!(result, Err(SimError::EmptyPopulation)));
}

#[test]
fn invalid_config_is_rejected() {
    let config = SimConfig {
        tick_cap: 0,
        ..SimConfig::default()
    };
    let result = Generation::new(config, 1, 1, boxed(vec![Box::new(Constant(0))]));
    assert!(matches!(
        result,
        Err(SimError::InvalidConfig {
            field: "tick_cap",
            ..
        })
    ));
}

#[test]
fn out_of_range_action_is_fatal() {
    let mut generation = Generation::new(
        far_obstacles(),
        7,
        1,
        boxed(vec![Box::new(Constant(0)), Box::new(Script {
            actions: vec![0, 0, 0, 3],
            cursor: 0,
        })]),
    )
    .expect("generation");

    for _ in 0..3 {
        generation.step().expect("valid ticks");
    }
    let err = generation.step().expect_err("action 3 must be rejected");
    assert_eq!(
        err,
        SimError::InvalidAction {
            agent: 1,
            tick: 4,
            action: 3
        }
    );
    assert_eq!(
        generation.status(),
        GenerationStatus::Terminated(TerminationReason::ContractViolation)
    );
    assert_eq!(
        generation.step(),
        Err(SimError::GenerationTerminated { tick: 4 })
    );

    let report = generation.report();
    assert_eq!(report.termination, Some(TerminationReason::ContractViolation));
    assert_eq!(report.distances, vec![60, 60]);
}

#[test]
fn violation_leaves_every_agent_at_previous_tick() {
    // The ducker would die on tick 46; the scripted runner breaks the contract
    // on that same tick.
    let mut actions = vec![0; 45];
    actions.push(3);
    let mut generation = Generation::new(
        SimConfig::default(),
        0xDEAD_BEEF,
        1,
        boxed(vec![Box::new(Constant(2)), Box::new(Script { actions, cursor: 0 })]),
    )
    .expect("generation");

    for _ in 0..45 {
        generation.step().expect("valid ticks");
    }
    let err = generation.step().expect_err("action 3 must be rejected");
    assert_eq!(
        err,
        SimError::InvalidAction {
            agent: 1,
            tick: 46,
            action: 3
        }
    );

    let alive = generation
        .agents()
        .iter()
        .filter(|agent| agent.is_alive())
        .count();
    let report = generation.report();
    assert_eq!(alive, 2);
    assert_eq!(report.alive_count, alive);
    assert_eq!(generation.agents()[0].died_at(), None);
    assert_eq!(report.distances, vec![900, 900]);
    assert_eq!(report.ticks_lived, vec![45, 45]);
}

#[test]
fn tick_cap_terminates_exactly_at_cap() {
    let config = SimConfig {
        tick_cap: 250,
        ..far_obstacles()
    };
    let mut generation =
        Generation::new(config, 3, 1, boxed(vec![Box::new(Constant(0))])).expect("generation");

    for expected_tick in 1..250 {
        let outcome = generation.step().expect("step");
        assert_eq!(outcome.tick, expected_tick);
        assert_eq!(outcome.status, GenerationStatus::Running);
    }
    let last = generation.step().expect("final step");
    assert_eq!(last.tick, 250);
    assert_eq!(
        last.status,
        GenerationStatus::Terminated(TerminationReason::TickCap)
    );
    assert!(generation.step().is_err());
}

#[test]
fn all_dead_terminates_before_cap() {
    let report = run_generation(
        SimConfig::default(),
        0xDEAD_BEEF,
        1,
        boxed(vec![Box::new(Constant(0)), Box::new(Constant(2))]),
    )
    .expect("run");

    assert_eq!(report.termination, Some(TerminationReason::AllDead));
    assert_eq!(report.ticks, 47);
    assert_eq!(report.alive_count, 0);
    assert_eq!(report.distances, vec![920, 900]);
    assert_eq!(report.ticks_lived, vec![46, 45]);
    assert_eq!(report.fitness, vec![920.0 / 50.0, 900.0 / 50.0]);
}

#[test]
fn abort_keeps_fitness_retrievable() {
    let mut generation = Generation::new(
        far_obstacles(),
        11,
        4,
        boxed(vec![Box::new(Constant(0)), Box::new(Constant(2))]),
    )
    .expect("generation");

    let report = generation
        .run_until(|generation| generation.state().tick() == 10)
        .expect("run");
    assert_eq!(report.termination, Some(TerminationReason::Aborted));
    assert_eq!(report.generation, 4);
    assert_eq!(report.ticks, 10);
    assert_eq!(report.distances, vec![200, 200]);
    assert_eq!(report.fitness, vec![4.0, 4.0]);
    assert_eq!(generation.fitness(), report.fitness);

    generation.abort();
    assert_eq!(
        generation.status(),
        GenerationStatus::Terminated(TerminationReason::Aborted)
    );
}

#[test]
fn distance_is_monotonic_and_frozen_after_death() {
    let mut generation = Generation::new(
        SimConfig::default(),
        0xC0FF_EE11,
        1,
        boxed(vec![Box::new(Constant(0)), Box::new(Constant(2))]),
    )
    .expect("generation");

    let mut previous = vec![0u64; 2];
    let mut death_tick: Vec<Option<u32>> = vec![None; 2];
    while !generation.is_terminated() {
        let outcome = generation.step().expect("step");
        for (index, agent) in generation.agents().iter().enumerate() {
            assert!(agent.distance() >= previous[index]);
            if let Some(tick) = death_tick[index] {
                assert!(!agent.is_alive(), "agent {index} revived at {}", outcome.tick);
                assert_eq!(agent.distance(), previous[index]);
                assert_eq!(agent.died_at(), Some(tick));
            } else if !agent.is_alive() {
                death_tick[index] = Some(outcome.tick);
                assert_eq!(agent.died_at(), Some(outcome.tick));
            }
            previous[index] = agent.distance();
        }
    }

    // Runner meets the first obstacle (a bird) standing; the ducker passes under it.
    assert_eq!(death_tick, vec![Some(47), Some(105)]);
}

#[test]
fn pose_pins_height_every_tick() {
    let config = SimConfig::default();
    let mut generation = Generation::new(
        config,
        0x1234_5678,
        1,
        boxed(vec![
            Box::new(Script {
                actions: vec![0, 1, 2, 2, 0, 2, 1, 1, 0],
                cursor: 0,
            }),
            Box::new(Script {
                actions: vec![2, 2, 2, 1],
                cursor: 0,
            }),
            Box::new(Constant(1)),
        ]),
    )
    .expect("generation");

    while !generation.is_terminated() {
        generation.step().expect("step");
        for agent in generation.agents() {
            match agent.pose() {
                Pose::Running => assert_eq!(agent.y(), config.ground_y),
                Pose::Ducking => assert_eq!(agent.y(), config.duck_y),
                Pose::Jumping => assert!(agent.y() < config.ground_y),
            }
        }
    }
}

#[test]
fn agents_accrue_post_ramp_speed() {
    let config = SimConfig {
        tick_cap: 101,
        ..far_obstacles()
    };
    let mut generation =
        Generation::new(config, 1, 1, boxed(vec![Box::new(Constant(0))])).expect("generation");

    for _ in 0..99 {
        generation.step().expect("step");
    }
    assert_eq!(generation.agents()[0].distance(), 99 * 20);
    let outcome = generation.step().expect("tick 100");
    assert_eq!(outcome.speed, 21);
    assert_eq!(generation.agents()[0].distance(), 99 * 20 + 21);
}

#[test]
fn obstacles_scroll_at_pre_ramp_speed() {
    let config = SimConfig {
        ramp_interval: 1,
        ..far_obstacles()
    };
    let mut state = SimulationState::new(&config, 9);
    state.advance(&config);
    assert_eq!(state.speed(), 21);
    assert_eq!(
        state.obstacles().active()[0].rect.x,
        config.world_width - 20
    );
    state.advance(&config);
    assert_eq!(
        state.obstacles().active()[0].rect.x,
        config.world_width - 20 - 21
    );
}

#[test]
fn retired_obstacle_is_replaced_on_next_tick() {
    let config = SimConfig::default();
    let mut state = SimulationState::new(&config, 0xDEAD_BEEF);
    let mut saw_gap = false;
    for _ in 0..600 {
        let before = state.obstacles().spawned();
        state.advance(&config);
        if state.obstacles().active().is_empty() {
            saw_gap = true;
            state.advance(&config);
            assert_eq!(state.obstacles().active().len(), 1);
            assert_eq!(state.obstacles().spawned(), before + 1);
        }
        assert!(state.obstacles().active().len() <= 1);
    }
    assert!(saw_gap);
}

#[test]
fn same_seed_same_generation() {
    let run = |seed| {
        run_generation(
            SimConfig::default(),
            seed,
            1,
            boxed(vec![
                Box::new(Constant(0)),
                Box::new(Script {
                    actions: vec![2, 0, 1],
                    cursor: 0,
                }),
            ]),
        )
        .expect("run")
    };
    assert_eq!(run(42), run(42));
}

#[test]
fn evaluate_population_writes_sinks_in_order() {
    let mut members = vec![(Constant(0), 0.0f64), (Constant(2), 0.0f64)];
    let report =
        evaluate_population(SimConfig::default(), 0xDEAD_BEEF, 2, &mut members).expect("run");
    assert_eq!(members[0].1, 920.0 / 50.0);
    assert_eq!(members[1].1, 900.0 / 50.0);
    assert_eq!(report.generation, 2);
    assert_eq!(report.best_index(), Some(0));
}

#[test]
fn snapshot_reflects_shared_state() {
    let mut generation = Generation::new(
        SimConfig::default(),
        0xDEAD_BEEF,
        3,
        boxed(vec![Box::new(Constant(2))]),
    )
    .expect("generation");
    generation.step().expect("step");

    let snapshot = generation.snapshot();
    assert_eq!(snapshot.generation, 3);
    assert_eq!(snapshot.tick, 1);
    assert_eq!(snapshot.speed, 20);
    assert_eq!(snapshot.alive_count, 1);
    assert_eq!(snapshot.agents[0].pose, Pose::Ducking);
    assert_eq!(snapshot.agents[0].y, 340);
    assert_eq!(snapshot.obstacles.len(), 1);
    assert_eq!(snapshot.obstacles[0].kind, ObstacleKind::SmallCactus);
    assert_eq!(snapshot.obstacles[0].x, 1_080);
}

#[test]
fn generation_counter_hands_out_ordinals() {
    let mut counter = GenerationCounter::new();
    assert_eq!(counter.current(), 0);
    assert_eq!(counter.next_ordinal(), 1);
    assert_eq!(counter.next_ordinal(), 2);
    assert_eq!(counter.current(), 2);
}
