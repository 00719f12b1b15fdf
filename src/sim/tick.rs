//! Per-frame simulation tick
//!
//! Core game loop that advances the session. One call is one animation frame;
//! spawn, ramp, and held-input timers advance by the frame's elapsed time.

use super::spawn::spawn_burst;
use super::state::{GameEvent, GameState};
use super::find_collision;

/// Input events accepted by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    MoveLeftStart,
    MoveLeftEnd,
    MoveRightStart,
    MoveRightEnd,
    /// One full player width, immediately (touch/click buttons)
    NudgeLeft,
    NudgeRight,
    Restart,
}

/// Input queued since the previous tick, applied in order
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub events: Vec<InputEvent>,
}

impl TickInput {
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }
}

/// Advance the game state by one animation frame of `dt_ms` milliseconds.
///
/// Order within a frame:
/// 1. input events
/// 2. held-direction repeats
/// 3. debris fall, exits, and score
/// 4. speed ramp
/// 5. spawning
/// 6. collision
///
/// Every player move is also checked for collision as it happens, so a
/// frame with several moves cannot step through a debris box.
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    state.events.clear();

    for &event in &input.events {
        if apply_input(state, event) {
            check_collision(state);
        }
    }

    // Nothing runs in the terminal state
    if state.is_over() {
        return;
    }

    state.time_ticks += 1;
    let tuning = state.tuning;

    // Held directions, each on its own timer
    let left_steps = state.controls.left.advance(dt_ms);
    let right_steps = state.controls.right.advance(dt_ms);
    let steps = std::iter::repeat_n(-tuning.player_speed, left_steps as usize)
        .chain(std::iter::repeat_n(tuning.player_speed, right_steps as usize));
    for dx in steps {
        state.player.shift(dx, &tuning);
        if check_collision(state) {
            return;
        }
    }

    advance_debris(state);

    for _ in 0..state.ramp_timer.advance(dt_ms) {
        ramp_speed(state);
    }

    for _ in 0..state.spawn_timer.advance(dt_ms) {
        spawn_burst(state);
    }

    check_collision(state);
}

/// End the game if any debris overlaps the player. Returns true on a hit.
pub fn check_collision(state: &mut GameState) -> bool {
    let tuning = state.tuning;
    let Some(hit) = find_collision(&state.player, &state.debris, &tuning) else {
        return false;
    };
    log::debug!("Debris {} hit the player at x={}", hit.id, state.player.x);
    state.end();
    true
}

/// Apply a single input event. Movement is ignored once the game is over.
/// Returns true when the player position changed.
pub fn apply_input(state: &mut GameState, event: InputEvent) -> bool {
    if event == InputEvent::Restart {
        state.restart();
        state.events.push(GameEvent::Restarted);
        return false;
    }
    if state.is_over() {
        return false;
    }

    let tuning = state.tuning;
    let before = state.player.x;
    match event {
        InputEvent::MoveLeftStart => state.controls.left.press(),
        InputEvent::MoveLeftEnd => state.controls.left.release(),
        InputEvent::MoveRightStart => state.controls.right.press(),
        InputEvent::MoveRightEnd => state.controls.right.release(),
        InputEvent::NudgeLeft => state.player.shift(-tuning.player_width, &tuning),
        InputEvent::NudgeRight => state.player.shift(tuning.player_width, &tuning),
        InputEvent::Restart => {}
    }
    state.player.x != before
}

/// Move all debris down by the fall speed and collect the ones that left
/// the play area. Returns how many were dodged this frame.
pub fn advance_debris(state: &mut GameState) -> u32 {
    let speed = state.fall_speed;
    let height = state.tuning.height;

    for debris in &mut state.debris {
        debris.y += speed;
    }

    let before = state.debris.len();
    state.debris.retain(|d| d.y < height);
    let dodged = (before - state.debris.len()) as u32;

    if dodged > 0 {
        state.score += dodged as u64;
        state.events.push(GameEvent::Scored { dodged });
    }
    dodged
}

/// Raise the fall speed by one increment, capped at the maximum
pub fn ramp_speed(state: &mut GameState) {
    let max = state.tuning.max_speed;
    if state.fall_speed >= max {
        return;
    }
    state.fall_speed = (state.fall_speed + state.tuning.speed_increment).min(max);
    state.events.push(GameEvent::SpeedUp);
    log::debug!("Fall speed now {:.1}", state.fall_speed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Debris, GameStatus};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    /// A frame short enough that no timer fires
    const QUIET_DT: f32 = 0.0;
    const FRAME_DT: f32 = 16.0;

    fn events(list: &[InputEvent]) -> TickInput {
        TickInput {
            events: list.to_vec(),
        }
    }

    /// State whose spawn and ramp timers never fire during a test
    fn quiet_state() -> GameState {
        let tuning = Tuning {
            spawn_interval_ms: 1.0e9,
            ramp_interval_ms: 1.0e9,
            ..Tuning::default()
        };
        GameState::with_tuning(12345, tuning).unwrap()
    }

    fn push_debris(state: &mut GameState, x: f32, y: f32) -> u32 {
        let id = state.next_entity_id();
        state.debris.push(Debris { id, x, y });
        id
    }

    #[test]
    fn test_debris_exits_after_exact_tick_count() {
        let mut state = quiet_state();
        state.player.x = 360.0;
        push_debris(&mut state, 0.0, 0.0);

        let input = TickInput::default();
        for i in 1..200 {
            tick(&mut state, &input, FRAME_DT);
            assert_eq!(state.debris[0].y, 3.0 * i as f32);
            assert_eq!(state.score, 0);
        }

        tick(&mut state, &input, FRAME_DT);
        assert!(state.debris.is_empty());
        assert_eq!(state.score, 1);
        assert!(state.events.contains(&GameEvent::Scored { dodged: 1 }));
        assert_eq!(state.status, GameStatus::Active);
    }

    #[test]
    fn test_score_counts_every_exit_in_one_tick() {
        let mut state = quiet_state();
        state.player.x = 0.0;
        push_debris(&mut state, 200.0, 598.0);
        push_debris(&mut state, 250.0, 597.0);
        push_debris(&mut state, 300.0, 100.0);

        tick(&mut state, &TickInput::default(), QUIET_DT);
        assert_eq!(state.score, 2);
        assert_eq!(state.debris.len(), 1);
        assert_eq!(state.debris[0].x, 300.0);
        assert_eq!(state.debris[0].y, 103.0);
    }

    #[test]
    fn test_collision_ends_game_without_scoring() {
        let mut state = quiet_state();
        // Will be inside the player band after one step
        push_debris(&mut state, 180.0, 540.0);

        tick(&mut state, &TickInput::default(), QUIET_DT);
        assert_eq!(state.status, GameStatus::Over);
        assert_eq!(state.score, 0);
        assert!(state.events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn test_no_collision_keeps_active() {
        let mut state = quiet_state();
        push_debris(&mut state, 0.0, 540.0);
        tick(&mut state, &TickInput::default(), QUIET_DT);
        assert_eq!(state.status, GameStatus::Active);
    }

    #[test]
    fn test_over_freezes_everything() {
        let mut state = GameState::new(9);
        push_debris(&mut state, 0.0, 100.0);
        state.end();

        let before_y = state.debris[0].y;
        let before_speed = state.fall_speed;
        let before_x = state.player.x;
        let input = events(&[InputEvent::MoveLeftStart, InputEvent::NudgeRight]);
        for _ in 0..500 {
            tick(&mut state, &input, FRAME_DT * 10.0);
        }

        assert_eq!(state.debris.len(), 1);
        assert_eq!(state.debris[0].y, before_y);
        assert_eq!(state.fall_speed, before_speed);
        assert_eq!(state.player.x, before_x);
        assert!(!state.controls.left.pressed);
    }

    #[test]
    fn test_restart_is_total_reset() {
        let mut state = GameState::new(77);
        for _ in 0..400 {
            tick(&mut state, &TickInput::default(), FRAME_DT);
        }
        state.score = 42;
        state.player.x = 0.0;
        state.end();

        tick(&mut state, &events(&[InputEvent::Restart]), QUIET_DT);
        assert_eq!(state.status, GameStatus::Active);
        assert_eq!(state.player.x, 180.0);
        assert!(state.debris.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.fall_speed, 3.0);
        assert!(state.events.contains(&GameEvent::Restarted));
    }

    #[test]
    fn test_ramp_starts_from_zero_after_restart() {
        let mut state = GameState::with_tuning(
            1,
            Tuning {
                spawn_interval_ms: 1.0e9,
                ..Tuning::default()
            },
        )
        .unwrap();
        tick(&mut state, &TickInput::default(), 1500.0);
        state.end();
        tick(&mut state, &events(&[InputEvent::Restart]), QUIET_DT);

        // 1500 ms of ramp progress from the old session is gone
        tick(&mut state, &TickInput::default(), 1000.0);
        assert_eq!(state.fall_speed, 3.0);
        tick(&mut state, &TickInput::default(), 1000.0);
        assert!((state.fall_speed - 3.3).abs() < 1e-5);
    }

    #[test]
    fn test_speed_ramp_caps_at_max() {
        let mut state = quiet_state();
        for _ in 0..100 {
            ramp_speed(&mut state);
        }
        assert_eq!(state.fall_speed, 12.0);
    }

    #[test]
    fn test_spawn_timer_fires_once_per_second() {
        let mut state = GameState::with_tuning(
            3,
            Tuning {
                burst_chance: 0.0,
                ..Tuning::default()
            },
        )
        .unwrap();
        state.player.x = 0.0;
        tick(&mut state, &TickInput::default(), 999.0);
        assert!(state.debris.is_empty());
        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.debris.len(), 1);
        assert_eq!(state.debris[0].y, 0.0);
        assert!(state.events.contains(&GameEvent::Spawned { count: 1 }));
    }

    #[test]
    fn test_nudges_move_full_width_and_clamp() {
        let mut state = quiet_state();
        tick(&mut state, &events(&[InputEvent::NudgeLeft]), QUIET_DT);
        assert_eq!(state.player.x, 140.0);
        let many_left = events(&[InputEvent::NudgeLeft; 10]);
        tick(&mut state, &many_left, QUIET_DT);
        assert_eq!(state.player.x, 0.0);
        let many_right = events(&[InputEvent::NudgeRight; 20]);
        tick(&mut state, &many_right, QUIET_DT);
        assert_eq!(state.player.x, 360.0);
    }

    #[test]
    fn test_held_direction_repeats_until_released() {
        let mut state = quiet_state();
        tick(&mut state, &events(&[InputEvent::MoveLeftStart]), FRAME_DT);
        assert_eq!(state.player.x, 176.0);
        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.player.x, 172.0);

        // Key repeat must not add a second timer
        tick(&mut state, &events(&[InputEvent::MoveLeftStart]), FRAME_DT);
        assert_eq!(state.player.x, 168.0);

        tick(&mut state, &events(&[InputEvent::MoveLeftEnd]), FRAME_DT);
        assert_eq!(state.player.x, 168.0);
    }

    #[test]
    fn test_both_directions_are_independent() {
        let mut state = quiet_state();
        tick(&mut state, &events(&[InputEvent::MoveLeftStart]), FRAME_DT);
        assert_eq!(state.player.x, 176.0);

        // Both held: each timer fires, the moves cancel out
        tick(&mut state, &events(&[InputEvent::MoveRightStart]), FRAME_DT);
        assert_eq!(state.player.x, 176.0);
        assert!(state.controls.left.pressed && state.controls.right.pressed);

        // Releasing left leaves right moving
        tick(&mut state, &events(&[InputEvent::MoveLeftEnd]), FRAME_DT);
        assert_eq!(state.player.x, 180.0);
        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.player.x, 184.0);

        tick(&mut state, &events(&[InputEvent::MoveRightEnd]), FRAME_DT);
        assert_eq!(state.player.x, 184.0);
    }

    #[test]
    fn test_game_over_cancels_held_movement() {
        let mut state = quiet_state();
        push_debris(&mut state, 160.0, 540.0);
        tick(&mut state, &events(&[InputEvent::MoveRightStart]), FRAME_DT);
        assert!(state.is_over());
        assert!(!state.controls.right.pressed);

        tick(&mut state, &events(&[InputEvent::Restart]), QUIET_DT);
        tick(&mut state, &TickInput::default(), FRAME_DT * 10.0);
        assert_eq!(state.player.x, 180.0);
    }

    #[test]
    fn test_nudge_into_resting_debris_ends_game() {
        let mut state = quiet_state();
        push_debris(&mut state, 140.0, 570.0);

        tick(&mut state, &events(&[InputEvent::NudgeLeft]), FRAME_DT);
        assert!(state.is_over());
        assert_eq!(state.player.x, 140.0);
        // The hit happened before the fall, so nothing moved or scored
        assert_eq!(state.debris[0].y, 570.0);
        assert_eq!(state.score, 0);
        assert!(state.events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn test_nudge_into_exiting_debris_is_a_hit_not_a_dodge() {
        let mut state = quiet_state();
        // Would leave the area on this frame's fall
        push_debris(&mut state, 140.0, 598.0);

        tick(&mut state, &events(&[InputEvent::NudgeLeft]), QUIET_DT);
        assert!(state.is_over());
        assert_eq!(state.score, 0);
        assert_eq!(state.debris.len(), 1);
    }

    #[test]
    fn test_repeated_nudges_cannot_pass_through_debris() {
        let mut state = quiet_state();
        push_debris(&mut state, 145.0, 560.0);

        let two_left = events(&[InputEvent::NudgeLeft, InputEvent::NudgeLeft]);
        tick(&mut state, &two_left, QUIET_DT);
        assert!(state.is_over());
        // Stopped at the first overlapping position
        assert_eq!(state.player.x, 140.0);
    }

    #[test]
    fn test_held_move_into_resting_debris_ends_game() {
        let mut state = quiet_state();
        // Touching edge at x = 180 is not an overlap
        push_debris(&mut state, 150.0, 570.0);
        tick(&mut state, &TickInput::default(), QUIET_DT);
        assert!(!state.is_over());

        // Three repeats are due, the first one already overlaps
        tick(&mut state, &events(&[InputEvent::MoveLeftStart]), 48.0);
        assert!(state.is_over());
        assert_eq!(state.player.x, 176.0);
        assert_eq!(state.debris[0].y, 573.0);
        assert_eq!(state.score, 0);
        assert!(!state.controls.left.pressed);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        let inputs = [
            events(&[InputEvent::MoveLeftStart]),
            TickInput::default(),
            events(&[InputEvent::MoveLeftEnd, InputEvent::NudgeRight]),
            TickInput::default(),
        ];

        for _ in 0..100 {
            for input in &inputs {
                tick(&mut state1, input, 50.0);
                tick(&mut state2, input, 50.0);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.debris, state2.debris);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.status, state2.status);
    }

    fn input_event() -> impl Strategy<Value = InputEvent> {
        prop_oneof![
            Just(InputEvent::MoveLeftStart),
            Just(InputEvent::MoveLeftEnd),
            Just(InputEvent::MoveRightStart),
            Just(InputEvent::MoveRightEnd),
            Just(InputEvent::NudgeLeft),
            Just(InputEvent::NudgeRight),
        ]
    }

    proptest! {
        #[test]
        fn prop_invariants_hold_for_any_input(
            seed in any::<u64>(),
            frames in prop::collection::vec(
                (prop::collection::vec(input_event(), 0..3), 0.0f32..120.0),
                1..300,
            ),
        ) {
            let mut state = GameState::new(seed);
            let max_x = state.tuning().player_max_x();
            let mut last_score = 0;
            let mut last_speed = state.fall_speed;

            for (list, dt) in frames {
                let was_active = !state.is_over();
                let before: Vec<(u32, f32)> =
                    state.debris.iter().map(|d| (d.id, d.y)).collect();
                let speed = state.fall_speed;

                tick(&mut state, &TickInput { events: list }, dt);

                prop_assert!(state.player.x >= 0.0 && state.player.x <= max_x);
                prop_assert!(state.fall_speed <= state.tuning().max_speed);
                prop_assert!(state.fall_speed >= last_speed);
                prop_assert!(state.score >= last_score);

                if was_active {
                    // Every survivor moved by exactly the pre-ramp speed, or
                    // not at all when a move ended the game before the fall,
                    // and every missing one is credited
                    let mut exited = 0;
                    for (id, y) in before {
                        match state.debris.iter().find(|d| d.id == id) {
                            Some(d) => {
                                prop_assert!(
                                    d.y == y + speed || (state.is_over() && d.y == y)
                                );
                            }
                            None => exited += 1,
                        }
                    }
                    prop_assert_eq!(state.score - last_score, exited);
                }

                last_score = state.score;
                last_speed = state.fall_speed;
            }
        }
    }
}
