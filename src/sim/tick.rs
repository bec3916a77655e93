//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. One call to
//! `tick` is one millisecond of simulated time; every heartbeat is a timer
//! polled here in a fixed order:
//!
//! countdown -> player motion -> scoring -> spawning -> falling -> growth

use rand::Rng;

use super::collision::object_hits_player;
use super::difficulty::{self, Difficulty};
use super::spawner::roll_object;
use super::state::{GameEvent, GamePhase, GameState, Growth, RemovalReason};
use crate::consts::*;

/// Held movement keys for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
}

/// Advance the game state by one base tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Nothing is scheduled outside the countdown and the run itself
    match state.phase {
        GamePhase::NotStarted | GamePhase::GameOver => return,
        _ => {}
    }

    state.now_us += SIM_TICK_US;
    let now = state.now_us;

    apply_input(state, input);

    if let GamePhase::Countdown { remaining } = state.phase {
        if state.timers.countdown.poll(now) {
            if remaining > 0 {
                state.events.push(GameEvent::CountdownTick { n: remaining });
                state.phase = GamePhase::Countdown {
                    remaining: remaining - 1,
                };
            } else {
                begin_running(state);
            }
        }
        return;
    }

    state.elapsed_ticks += 1;

    if state.timers.player.poll(now) && state.player.step() {
        state.events.push(GameEvent::PlayerMoved {
            position: state.player.position,
        });
    }

    if state.timers.score.poll(now) {
        let score = state.score + SCORE_PER_SECOND;
        state.set_score(score);
        state.events.push(GameEvent::ScoreChanged { score });
    }

    if state.timers.spawn.poll(now) {
        spawn(state);
    }

    if state.timers.fall.poll(now) && fall_step(state) {
        return;
    }

    grow_objects(state);

    state.debug_check_invariants();
}

/// Enter the countdown that precedes a run
pub fn begin_countdown(state: &mut GameState) {
    state.phase = GamePhase::Countdown {
        remaining: COUNTDOWN_FROM,
    };
    state.timers.countdown.arm(state.now_us);
    log::info!("Countdown started");
}

/// Countdown finished: arm every run heartbeat
fn begin_running(state: &mut GameState) {
    let now = state.now_us;
    state.phase = GamePhase::Running;
    state.timers.countdown.disarm();
    state.timers.score.arm(now);
    state.timers.player.arm(now);
    state.timers.fall.arm(now);
    let interval = difficulty::spawn_interval_ms(state.score);
    state.timers.spawn.rearm(now, interval * 1_000);
    state.events.push(GameEvent::ScoreChanged { score: state.score });
    log::info!("Run started (seed {})", state.seed);
}

/// Sync held keys into the player, emitting animation changes
fn apply_input(state: &mut GameState, input: &TickInput) {
    if let Some(animation) = state.player.set_intent(input.move_left, input.move_right) {
        state.events.push(GameEvent::PlayerAnimation { state: animation });
    }
}

/// Spawn one object and re-arm the spawner from the current difficulty
fn spawn(state: &mut GameState) {
    let id = state.next_entity_id();
    debug_assert!(
        state.objects.iter().all(|o| o.id != id),
        "duplicate object id {id}"
    );
    let object = roll_object(&mut state.rng, id, state.elapsed_ticks);
    state.events.push(GameEvent::ObjectSpawned {
        id,
        x: object.x,
        size: object.size,
        variant: object.variant,
    });
    log::debug!("Spawned object {} (size {:.1} at {:.1}%)", id, object.size, object.x);
    state.objects.push(object);
    state.spawned += 1;

    let interval = Difficulty::for_score(state.score).spawn_interval_ms;
    state.timers.spawn.rearm(state.now_us, interval * 1_000);
}

/// Move every live object one fall step.
///
/// Off-screen removal is decided before the collision test for the same
/// object. Returns true if the run ended on this step.
fn fall_step(state: &mut GameState) -> bool {
    let step = Difficulty::for_score(state.score).fall_step();
    let height = state.settings.playfield_height;
    let now = state.now_us;

    let mut i = 0;
    while i < state.objects.len() {
        let object = &mut state.objects[i];
        object.y += step;

        if object.y > height {
            let id = object.id;
            state.objects.remove(i);
            state.removed += 1;
            state.events.push(GameEvent::ObjectRemoved {
                id,
                reason: RemovalReason::Offscreen,
            });
            log::debug!("Object {} left the playfield", id);
            continue;
        }

        state.events.push(GameEvent::ObjectMoved {
            id: object.id,
            y: object.y,
            size: object.size,
        });

        if object_hits_player(object, &state.player, &state.settings) {
            let id = object.id;
            state.objects.remove(i);
            state.removed += 1;
            state.events.push(GameEvent::ObjectRemoved {
                id,
                reason: RemovalReason::Collision,
            });
            end_run(state);
            return true;
        }

        if object.growth.is_none()
            && object.y > height - GROWTH_ZONE
            && state.rng.random_bool(GROWTH_CHANCE)
        {
            object.growth = Some(Growth::start(now));
        }

        i += 1;
    }

    false
}

/// Advance in-flight growth effects (cosmetic; collisions see the new size)
fn grow_objects(state: &mut GameState) {
    let now = state.now_us;
    for object in &mut state.objects {
        let Some(growth) = object.growth.as_mut() else {
            continue;
        };
        if !growth.timer.poll(now) {
            continue;
        }
        object.size *= GROWTH_FACTOR;
        growth.steps_left -= 1;
        if growth.steps_left == 0 {
            object.growth = None;
        }
        state.events.push(GameEvent::ObjectMoved {
            id: object.id,
            y: object.y,
            size: object.size,
        });
    }
}

/// Collision: stop every heartbeat and report the final score
fn end_run(state: &mut GameState) {
    debug_assert!(state.phase.is_running(), "game over outside a run");
    state.phase = GamePhase::GameOver;
    state.timers.disarm_all();
    for object in &mut state.objects {
        object.growth = None;
    }
    state.events.push(GameEvent::GameOver { score: state.score });
    log::info!(
        "Game over: score {} after {} ms, {} objects spawned",
        state.score,
        state.elapsed_ticks,
        state.spawned
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::{FallingObject, PlayerAnimation};

    fn running_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Settings::default());
        begin_countdown(&mut state);
        let input = TickInput::default();
        while !state.phase.is_running() {
            tick(&mut state, &input);
        }
        state.events.clear();
        state
    }

    fn run_ms(state: &mut GameState, input: &TickInput, ms: u64) {
        for _ in 0..ms {
            tick(state, input);
        }
    }

    #[test]
    fn test_tick_is_noop_before_start() {
        let mut state = GameState::new(1, Settings::default());
        run_ms(&mut state, &TickInput::default(), 5_000);
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert_eq!(state.now_us, 0);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_countdown_sequence() {
        let mut state = GameState::new(1, Settings::default());
        begin_countdown(&mut state);
        run_ms(&mut state, &TickInput::default(), 4_000);

        let countdown: Vec<u8> = state
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::CountdownTick { n } => Some(*n),
                _ => None,
            })
            .collect();
        assert_eq!(countdown, vec![3, 2, 1]);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.events.last(), Some(&GameEvent::ScoreChanged { score: 0 }));
        assert_eq!(state.score, 0);
        assert!(state.objects.is_empty());
    }

    #[test]
    fn test_no_motion_during_countdown() {
        let mut state = GameState::new(1, Settings::default());
        begin_countdown(&mut state);
        let left = TickInput {
            move_left: true,
            ..Default::default()
        };
        run_ms(&mut state, &left, 3_500);
        assert_eq!(state.player.position, 50.0);
        assert_eq!(state.player.animation, PlayerAnimation::WalkLeft);
    }

    #[test]
    fn test_first_second_scores_and_rearms_spawner() {
        let mut state = running_state(5);
        run_ms(&mut state, &TickInput::default(), 1_000);
        assert_eq!(state.score, 10);
        assert!((state.speed_multiplier - 1.01).abs() < 1e-6);
        assert_eq!(state.spawned, 1);
        assert_eq!(state.timers.spawn.period_us(), 990_000);
    }

    #[test]
    fn test_score_increments_every_second() {
        let mut state = running_state(5);
        for second in 1..=5u64 {
            run_ms(&mut state, &TickInput::default(), 1_000);
            if state.phase == GamePhase::GameOver {
                break;
            }
            assert_eq!(state.score, second * 10);
            assert!((state.speed_multiplier - (1.0 + state.score as f32 / 1000.0)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_spawn_interval_floor_at_high_score() {
        let mut state = running_state(9);
        state.set_score(850);
        // Fire the pending spawn, which re-arms from the new score
        let due = state.timers.spawn.due_us().unwrap();
        state.objects.clear();
        state.now_us = due - SIM_TICK_US;
        state.timers.fall.disarm();
        state.timers.score.disarm();
        tick(&mut state, &TickInput::default());
        assert_eq!(state.timers.spawn.period_us(), 200_000);
    }

    #[test]
    fn test_spawner_rearms_from_score_at_every_firing() {
        let mut state = running_state(4321);
        // Objects hang at the top so the run cannot end
        state.timers.fall.disarm();
        let input = TickInput::default();

        let mut firings = 0;
        let mut last_spawn_us = state.now_us;
        let mut expected_gap_us = difficulty::spawn_interval_ms(0) * 1_000;
        while state.now_us < 16_000_000 {
            let spawned = state.spawned;
            tick(&mut state, &input);
            if state.spawned == spawned {
                continue;
            }
            firings += 1;
            assert_eq!(state.now_us - last_spawn_us, expected_gap_us);
            expected_gap_us = difficulty::spawn_interval_ms(state.score) * 1_000;
            assert_eq!(state.timers.spawn.period_us(), expected_gap_us);
            last_spawn_us = state.now_us;
        }
        assert!(firings >= 10, "only {firings} spawns");
        assert_eq!(state.phase, GamePhase::Running);
        // Every firing after the first used a shorter interval
        assert!(expected_gap_us < 990_000);
    }

    #[test]
    fn test_fall_step_scales_with_score() {
        let mut state = running_state(5);
        state.timers.spawn.disarm();
        state.set_score(500);
        let id = state.next_entity_id();
        let mut object = FallingObject::new(id, 0.0, 50.0, 1, 0);
        object.y = 0.0;
        state.objects.push(object);
        state.spawned += 1;

        // Fall timer was armed at the run start; let exactly one step fire
        let due = state.timers.fall.due_us().unwrap_or(state.now_us);
        while state.now_us < due {
            tick(&mut state, &TickInput::default());
        }

        assert!((state.objects[0].y - 1.5 * 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_player_moves_at_sixty_hz() {
        let mut state = running_state(5);
        state.timers.spawn.disarm();
        let right = TickInput {
            move_right: true,
            ..Default::default()
        };
        run_ms(&mut state, &right, 1_000);
        // ~60 steps of 0.5%
        assert!((state.player.position - 80.0).abs() <= 0.5);
        run_ms(&mut state, &right, 2_000);
        assert_eq!(state.player.position, 100.0);
    }

    #[test]
    fn test_offscreen_removal() {
        let mut state = running_state(5);
        state.timers.spawn.disarm();
        let id = state.next_entity_id();
        // Far to the left of the player so it can only leave off-screen
        let mut object = FallingObject::new(id, 0.0, 50.0, 1, 0);
        object.y = state.settings.playfield_height - 0.5;
        state.objects.push(object);
        state.spawned += 1;

        run_ms(&mut state, &TickInput::default(), 20);

        assert!(state.objects.is_empty());
        assert!(state.events.contains(&GameEvent::ObjectRemoved {
            id,
            reason: RemovalReason::Offscreen,
        }));
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_offscreen_checked_before_collision() {
        let mut state = running_state(5);
        state.timers.spawn.disarm();
        // Huge object right over the player that exits this fall step
        let id = state.next_entity_id();
        let mut object = FallingObject::new(id, 45.0, 230.0, 1, 0);
        object.y = state.settings.playfield_height - 0.1;
        state.objects.push(object);
        state.spawned += 1;

        run_ms(&mut state, &TickInput::default(), 20);

        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.events.contains(&GameEvent::ObjectRemoved {
            id,
            reason: RemovalReason::Offscreen,
        }));
    }

    #[test]
    fn test_collision_ends_run() {
        let mut state = running_state(5);
        state.timers.spawn.disarm();
        let player_top = state.settings.playfield_height - state.settings.player_height;
        let hit_id = state.next_entity_id();
        let mut hit = FallingObject::new(hit_id, 50.0, 60.0, 1, 0);
        hit.y = player_top - 60.0;
        let other_id = state.next_entity_id();
        let other = FallingObject::new(other_id, 0.0, 50.0, 2, 0);
        state.objects.push(hit);
        state.objects.push(other);
        state.spawned += 2;

        run_ms(&mut state, &TickInput::default(), 20);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::ObjectRemoved {
            id: hit_id,
            reason: RemovalReason::Collision,
        }));
        assert_eq!(state.events.last(), Some(&GameEvent::GameOver { score: 0 }));
        // Processing stopped: the second object did not move this step
        assert_eq!(state.objects.len(), 1);
        assert_eq!(state.objects[0].y, SPAWN_OFFSET_Y);
        assert!(!state.timers.fall.is_armed());
    }

    #[test]
    fn test_nothing_changes_after_game_over() {
        let mut state = running_state(5);
        state.timers.spawn.disarm();
        let id = state.next_entity_id();
        let mut hit = FallingObject::new(id, 50.0, 60.0, 1, 0);
        hit.y = state.settings.playfield_height - state.settings.player_height - 59.0;
        state.objects.push(hit);
        state.spawned += 1;
        run_ms(&mut state, &TickInput::default(), 20);
        assert_eq!(state.phase, GamePhase::GameOver);

        state.events.clear();
        let snapshot = (state.score, state.now_us, state.player.clone());
        let input = TickInput {
            move_left: true,
            ..Default::default()
        };
        run_ms(&mut state, &input, 10_000);
        assert!(state.events.is_empty());
        assert_eq!((state.score, state.now_us, state.player.clone()), snapshot);
    }

    #[test]
    fn test_growth_is_bounded() {
        let mut state = running_state(5);
        state.timers.spawn.disarm();
        state.timers.fall.disarm();
        let id = state.next_entity_id();
        let mut object = FallingObject::new(id, 0.0, 50.0, 1, 0);
        object.growth = Some(Growth::start(state.now_us));
        state.objects.push(object);
        state.spawned += 1;

        run_ms(&mut state, &TickInput::default(), 200);

        let size = state.objects[0].size;
        assert!((size - 50.0 * 1.02f32.powi(3)).abs() < 1e-3);
        assert!(state.objects[0].growth.is_none());
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = running_state(99999);
        let mut state2 = running_state(99999);

        let inputs = [
            TickInput {
                move_left: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                move_right: true,
                ..Default::default()
            },
        ];

        for input in &inputs {
            run_ms(&mut state1, input, 3_000);
            run_ms(&mut state2, input, 3_000);
        }

        assert_eq!(state1.events, state2.events);
        assert_eq!(state1.objects, state2.objects);
        assert_eq!(state1.score, state2.score);
    }
}
