use crate::card::CardIndex;
use crate::rng::GameRng;
use crate::simulation::config::{SimConfig, SimGoals};
use crate::simulation::deck::Deck;
use crate::simulation::engine::{run_trial, TrialResult, WinMethod};
use log::debug;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Running totals over trials. Merging is commutative and associative, so
/// tallies from parallel workers can be combined in any order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrialTally {
    pub trials: u64,
    pub draw_successes: u64,
    pub win_successes: u64,
    pub wincon_wins: u64,
    pub damage_wins: u64,
    pub total_mulligans: u64,
    pub win_turn_sum: u64,
    pub first_win_turns: BTreeMap<u32, u64>,
}

impl TrialTally {
    pub fn record(&mut self, result: &TrialResult) {
        self.trials += 1;
        self.total_mulligans += u64::from(result.mulligans);
        if result.draw_goal_met {
            self.draw_successes += 1;
        }
        if let Some(turn) = result.won_on_turn {
            self.win_successes += 1;
            self.win_turn_sum += u64::from(turn);
            *self.first_win_turns.entry(turn).or_insert(0) += 1;
            match result.win_method {
                Some(WinMethod::Wincon) => self.wincon_wins += 1,
                Some(WinMethod::Damage) => self.damage_wins += 1,
                None => {}
            }
        }
    }

    pub fn merge(mut self, other: TrialTally) -> TrialTally {
        self.trials += other.trials;
        self.draw_successes += other.draw_successes;
        self.win_successes += other.win_successes;
        self.wincon_wins += other.wincon_wins;
        self.damage_wins += other.damage_wins;
        self.total_mulligans += other.total_mulligans;
        self.win_turn_sum += other.win_turn_sum;
        for (turn, count) in other.first_win_turns {
            *self.first_win_turns.entry(turn).or_insert(0) += count;
        }
        self
    }

    fn rate(count: u64, trials: u64) -> f64 {
        if trials == 0 {
            0.0
        } else {
            count as f64 / trials as f64
        }
    }

    pub fn finish(self, goals: &SimGoals, config: &SimConfig, seed: u64) -> AggregateResult {
        let average_win_turn = (self.win_successes > 0)
            .then(|| self.win_turn_sum as f64 / self.win_successes as f64);

        AggregateResult {
            trials: self.trials,
            draw_ok_rate: Self::rate(self.draw_successes, self.trials),
            win_ok_rate: Self::rate(self.win_successes, self.trials),
            first_win_turn_distribution: self.first_win_turns,
            goals: *goals,
            max_mulligans: config.max_mulligans,
            seed,
            parallel: config.parallel,
            average_mulligans: Self::rate(self.total_mulligans, self.trials),
            average_win_turn,
            wincon_wins: self.wincon_wins,
            damage_wins: self.damage_wins,
        }
    }
}

/// Summary of a whole run, echoing the settings it was produced with
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub trials: u64,
    pub draw_ok_rate: f64,
    pub win_ok_rate: f64,
    /// Turn -> number of trials first winning on it (only turns with wins)
    pub first_win_turn_distribution: BTreeMap<u32, u64>,
    #[serde(flatten)]
    pub goals: SimGoals,
    pub max_mulligans: u32,
    pub seed: u64,
    pub parallel: bool,
    pub average_mulligans: f64,
    pub average_win_turn: Option<f64>,
    pub wincon_wins: u64,
    pub damage_wins: u64,
}

/// Run `config.trials` trials and summarise them
pub fn run_simulation(
    deck: &Deck,
    index: &(impl CardIndex + Sync),
    goals: &SimGoals,
    config: &SimConfig,
) -> AggregateResult {
    run_simulation_with_progress(deck, index, goals, config, &|_: u64| {})
}

/// Same as [`run_simulation`], calling `progress(1)` after every trial.
///
/// Sequential runs draw every trial from one generator seeded once, so a
/// seed reproduces the run exactly. Parallel runs give trial `i` its own
/// generator seeded with `seed ^ i`; they are reproducible too, but do not
/// match the sequential stream.
pub fn run_simulation_with_progress(
    deck: &Deck,
    index: &(impl CardIndex + Sync),
    goals: &SimGoals,
    config: &SimConfig,
    progress: &(dyn Fn(u64) + Sync),
) -> AggregateResult {
    debug_assert!(deck.check_invariants());

    let seed = config.seed.unwrap_or_else(|| GameRng::new(None).seed());
    let pool: Vec<&str> = deck.library().iter().map(String::as_str).collect();
    debug!(
        "simulating '{}': {} trials, seed {}, {} mulligans max, parallel={}",
        deck.name(),
        config.trials,
        seed,
        config.max_mulligans,
        config.parallel
    );

    let tally = if config.parallel {
        (0..config.trials)
            .into_par_iter()
            .map(|i| {
                let mut rng = GameRng::for_trial(seed, i as u64);
                let result = run_trial(&pool, index, goals, config.max_mulligans, &mut rng);
                progress(1);
                result
            })
            .fold(TrialTally::default, |mut tally, result| {
                tally.record(&result);
                tally
            })
            .reduce(TrialTally::default, TrialTally::merge)
    } else {
        let mut rng = GameRng::new(Some(seed));
        let mut tally = TrialTally::default();
        for _ in 0..config.trials {
            let result = run_trial(&pool, index, goals, config.max_mulligans, &mut rng);
            tally.record(&result);
            progress(1);
        }
        tally
    };

    let result = tally.finish(goals, config, seed);
    debug!(
        "'{}': draw ok {:.3}, win ok {:.3}",
        deck.name(),
        result.draw_ok_rate,
        result.win_ok_rate
    );
    result
}
