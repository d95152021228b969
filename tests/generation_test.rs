//! Integration test: the per-generation frame loop
//!
//! Runs whole generations with scripted entrants and checks termination,
//! scoring, fitness bookkeeping and pipe recycling.

use flappy_neuro::config::Settings;
use flappy_neuro::core::{
    DoneReason, Entrant, FrameView, Generation, GenerationState, Headless, Presenter,
    ScriptedEntrant, Session, Signal,
};
use flappy_neuro::flappy::{passed_count, SpriteSet};
use flappy_neuro::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Settings with a fixed gap spanning y 150..350 and a short pipe pool.
fn fixed_gap_settings(pipe_count: usize) -> Settings {
    Settings {
        pipe_count,
        pipe_top_min_height: 150,
        pipe_top_max_height: 151,
        ..Default::default()
    }
}

/// Presenter that asks to quit once `frames` frames have been shown.
struct QuitAfter {
    frames: u32,
    shown: u32,
}

impl Presenter for QuitAfter {
    fn pace(&mut self, _fps: u32) -> Result<Signal> {
        Ok(if self.shown >= self.frames {
            Signal::Quit
        } else {
            Signal::Continue
        })
    }

    fn present(&mut self, view: &FrameView<'_>) -> Result<()> {
        assert_eq!(view.frame, u64::from(self.shown) + 1);
        self.shown += 1;
        Ok(())
    }
}

#[test]
fn test_idle_bird_hits_floor_after_21_frames() {
    let mut session = Session::new(Settings::default(), Some(1));
    let mut entrants = vec![ScriptedEntrant::constant(0.0)];
    let outcome = session.run_generation(&mut entrants, &mut Headless).unwrap();

    assert_eq!(outcome.reason, DoneReason::NoSurvivors);
    assert_eq!(outcome.frames, 21);
    assert_eq!(outcome.score, 0);
    assert_eq!(outcome.failures.floor, 1);
    assert!((outcome.elapsed - 0.33).abs() < 1e-9);

    let settings = session.settings();
    let expected = outcome.elapsed - settings.failed_penalty;
    assert!((entrants[0].fitness().unwrap() - expected).abs() < 1e-9);
}

#[test]
fn test_always_jumping_bird_hits_ceiling() {
    let mut session = Session::new(Settings::default(), Some(1));
    let mut entrants = vec![ScriptedEntrant::constant(1.0)];
    let outcome = session.run_generation(&mut entrants, &mut Headless).unwrap();

    assert_eq!(outcome.reason, DoneReason::NoSurvivors);
    assert_eq!(outcome.failures.ceiling, 1);
    assert!(outcome.frames <= 60);
}

#[test]
fn test_gap_follower_clears_the_pool() {
    let mut session = Session::new(fixed_gap_settings(5), Some(2));
    let mut entrants = vec![ScriptedEntrant::follow_gap(40.0)];
    let outcome = session.run_generation(&mut entrants, &mut Headless).unwrap();

    assert_eq!(outcome.reason, DoneReason::PipesExhausted);
    assert_eq!(outcome.score, 5);
    assert_eq!(outcome.survivors, 1);
    assert_eq!(outcome.failures.total(), 0);

    // Survivors carry no penalty
    let expected = outcome.elapsed + outcome.score as f64;
    assert!((entrants[0].fitness().unwrap() - expected).abs() < 1e-9);
}

#[test]
fn test_score_cap_ends_generation() {
    let settings = Settings {
        max_score: 3,
        ..fixed_gap_settings(10)
    };
    let mut session = Session::new(settings, Some(3));
    let mut entrants = vec![ScriptedEntrant::follow_gap(40.0)];
    let outcome = session.run_generation(&mut entrants, &mut Headless).unwrap();

    assert_eq!(outcome.reason, DoneReason::ScoreCap);
    assert_eq!(outcome.score, 3);
    // Third pipe (x = 900) passes x = 150 once its left edge is below 98
    assert_eq!(outcome.frames, 161);
}

#[test]
fn test_score_matches_passed_pipes_and_never_drops() {
    let settings = fixed_gap_settings(6);
    let sprites = SpriteSet::default();
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let mut entrants = vec![ScriptedEntrant::follow_gap(40.0)];
    let mut generation = Generation::new(0, &settings, &sprites, &mut entrants, &mut rng);

    let mut last = 0;
    while generation.step() == GenerationState::Running {
        let score = generation.score();
        assert!(score >= last);
        assert_eq!(score, passed_count(generation.pipes(), settings.bird_start_x));
        last = score;
    }
    assert_eq!(
        generation.state(),
        GenerationState::Done(DoneReason::PipesExhausted)
    );
    assert_eq!(generation.score(), 6);
}

#[test]
fn test_recycling_lets_score_exceed_pool() {
    let settings = Settings {
        pipe_recycle: true,
        max_score: 10,
        ..fixed_gap_settings(3)
    };
    let sprites = SpriteSet::default();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut entrants = vec![ScriptedEntrant::follow_gap(40.0)];
    let mut generation = Generation::new(0, &settings, &sprites, &mut entrants, &mut rng);

    let mut last = 0;
    loop {
        let state = generation.step();
        let score = generation.score();
        assert!(score >= last, "score dropped from {last} to {score}");
        last = score;
        assert_eq!(generation.pipes().len(), 3);
        if state != GenerationState::Running {
            assert_eq!(state, GenerationState::Done(DoneReason::ScoreCap));
            break;
        }
    }
    assert_eq!(last, 10);
}

#[test]
fn test_mixed_population_keeps_fitness_aligned() {
    let mut session = Session::new(fixed_gap_settings(4), Some(6));
    let mut entrants = vec![
        ScriptedEntrant::constant(0.0),
        ScriptedEntrant::follow_gap(40.0),
        ScriptedEntrant::constant(1.0),
        ScriptedEntrant::follow_gap(40.0),
    ];
    let outcome = session.run_generation(&mut entrants, &mut Headless).unwrap();

    assert_eq!(outcome.reason, DoneReason::PipesExhausted);
    assert_eq!(outcome.survivors, 2);
    assert_eq!(outcome.failures.floor, 1);
    assert_eq!(outcome.failures.ceiling, 1);

    let survivor = entrants[1].fitness().unwrap();
    assert_eq!(entrants[3].fitness(), Some(survivor));
    // The floor bird died first, so it has the lowest fitness
    assert!(entrants[0].fitness().unwrap() < entrants[2].fitness().unwrap());
    assert!(entrants[2].fitness().unwrap() < survivor);
}

#[test]
fn test_quit_ends_generation_immediately() {
    let mut session = Session::new(fixed_gap_settings(5), Some(7));
    let mut entrants = vec![ScriptedEntrant::follow_gap(40.0); 3];
    let mut presenter = QuitAfter { frames: 30, shown: 0 };
    let outcome = session.run_generation(&mut entrants, &mut presenter).unwrap();

    assert_eq!(outcome.reason, DoneReason::Quit);
    assert_eq!(outcome.frames, 30);
    assert_eq!(outcome.survivors, 3);
}

#[test]
fn test_fitness_reset_between_generations() {
    let mut session = Session::new(Settings::default(), Some(8));
    let mut entrants = vec![ScriptedEntrant::constant(0.0)];
    session.run_generation(&mut entrants, &mut Headless).unwrap();
    let first = entrants[0].fitness().unwrap();
    session.run_generation(&mut entrants, &mut Headless).unwrap();
    // Same script, same outcome: fitness is recomputed, not accumulated
    assert_eq!(entrants[0].fitness(), Some(first));
    assert_eq!(session.generation(), 2);
}
