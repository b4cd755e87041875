use clap::{Args, Parser, Subcommand};
use commander_goldfish::card::{CardDatabase, CardIndex};
use commander_goldfish::rng::GameRng;
use commander_goldfish::simulation::config::{SimConfig, SimGoals, SimSettings};
use commander_goldfish::simulation::deck::{parse_deck_file, Deck};
use commander_goldfish::simulation::{run_simulation_with_progress, AggregateResult};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "commander-goldfish")]
#[command(about = "Monte Carlo goldfish simulator for Commander decks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one deck
    Run {
        /// Deck file to use ("-" reads stdin)
        #[arg(short, long)]
        deck: String,

        #[command(flatten)]
        sim: SimArgs,
    },

    /// Simulate two decks with identical settings
    Compare {
        /// First deck file
        deck1: String,

        /// Second deck file
        deck2: String,

        #[command(flatten)]
        sim: SimArgs,
    },
}

#[derive(Args)]
struct SimArgs {
    /// Card database (JSON array of card records)
    #[arg(short, long)]
    cards: String,

    /// Number of trials
    #[arg(short, long)]
    trials: Option<usize>,

    /// Seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Mulligans allowed before a hand is force-kept
    #[arg(long)]
    max_mulligans: Option<u32>,

    /// Turn on which card-draw advantage is checked
    #[arg(long)]
    draw_by: Option<u32>,

    /// Last turn a win counts on
    #[arg(long)]
    win_by: Option<u32>,

    /// Cumulative damage needed to win
    #[arg(long)]
    damage: Option<u32>,

    /// Run trials on all cores
    #[arg(short, long)]
    parallel: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// JSON settings file with "goals" and "config" sections
    #[arg(long)]
    config: Option<String>,
}

impl SimArgs {
    /// Settings file first, then explicit flags on top
    fn settings(&self) -> (SimGoals, SimConfig) {
        let settings = match &self.config {
            Some(path) => match SimSettings::from_file(path) {
                Ok(settings) => settings,
                Err(e) => {
                    eprintln!("✗ Failed to load settings '{}': {}", path, e);
                    std::process::exit(1);
                }
            },
            None => SimSettings::default(),
        };

        let mut goals = settings.goals;
        let mut config = settings.config;
        if let Some(t) = self.draw_by {
            goals.draw_by_turn = t;
        }
        if let Some(t) = self.win_by {
            goals.win_by_turn = t;
        }
        if let Some(d) = self.damage {
            goals.damage_threshold = d;
        }
        if let Some(n) = self.trials {
            config.trials = n;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(k) = self.max_mulligans {
            config.max_mulligans = k;
        }
        config.parallel |= self.parallel;
        (goals, config)
    }
}

/// JSON output wrapper
#[derive(Serialize)]
struct Report<'a> {
    deck: &'a str,
    commanders: &'a [String],
    generated_at: String,
    #[serde(flatten)]
    result: &'a AggregateResult,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match cli.command {
        Commands::Run { deck, sim } => run_deck(&deck, &sim),
        Commands::Compare { deck1, deck2, sim } => compare_decks(&deck1, &deck2, &sim),
    }
}

fn load_cards(path: &str) -> CardDatabase {
    match CardDatabase::from_file(path) {
        Ok(db) => {
            eprintln!("✓ Loaded {} cards from {}", db.card_count(), path);
            db
        }
        Err(e) => {
            eprintln!("✗ Failed to load cards: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_deck(path: &str, db: &mut CardDatabase) -> Deck {
    let deck = match parse_deck_file(path) {
        Ok(deck) => deck,
        Err(e) => {
            eprintln!("✗ Failed to parse deck file '{}': {}", path, e);
            std::process::exit(1);
        }
    };

    db.apply_inline_tags(&deck);
    let missing = db.missing_from(&deck);
    if !missing.is_empty() {
        warn!(
            "{} card(s) in '{}' not in the card database, treated as free spells: {}",
            missing.len(),
            deck.name(),
            missing.join(", ")
        );
    }
    deck
}

fn simulate(deck: &Deck, db: &CardDatabase, goals: &SimGoals, config: &SimConfig, quiet: bool) -> AggregateResult {
    let bar = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(config.trials as u64)
    };
    let style = ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    bar.set_style(style);
    bar.set_message(deck.name().to_string());

    let result = run_simulation_with_progress(deck, db, goals, config, &|n: u64| bar.inc(n));
    bar.finish_and_clear();
    result
}

fn run_deck(deck_file: &str, sim: &SimArgs) {
    let mut db = load_cards(&sim.cards);
    let deck = load_deck(deck_file, &mut db);
    let (goals, config) = sim.settings();

    let start = std::time::Instant::now();
    let result = simulate(&deck, &db, &goals, &config, sim.json);
    let elapsed = start.elapsed();
    info!("'{}' done in {:.2?}", deck.name(), elapsed);

    if sim.json {
        print_json(&[(&deck, &result)]);
        return;
    }

    println!("\n=== Commander Goldfish ===\n");
    println!("Deck: {} ({})", deck.name(), deck.commanders().join(" + "));
    print_summary(&deck, &db, &result);
    println!();
    println!(
        "Simulation completed in {:.2?} ({:.0} trials/sec)",
        elapsed,
        result.trials as f64 / elapsed.as_secs_f64()
    );
}

fn compare_decks(deck1_file: &str, deck2_file: &str, sim: &SimArgs) {
    let mut db = load_cards(&sim.cards);
    let deck1 = load_deck(deck1_file, &mut db);
    let deck2 = load_deck(deck2_file, &mut db);
    let (goals, config) = sim.settings();

    // Pin the seed so both decks see the same settings
    let config = SimConfig {
        seed: Some(config.seed.unwrap_or_else(|| GameRng::new(None).seed())),
        ..config
    };

    let result1 = simulate(&deck1, &db, &goals, &config, sim.json);
    let result2 = simulate(&deck2, &db, &goals, &config, sim.json);

    if sim.json {
        print_json(&[(&deck1, &result1), (&deck2, &result2)]);
        return;
    }

    println!("\n=== Commander Deck Comparison ===\n");
    println!("Deck 1: {}", deck1.name());
    print_summary(&deck1, &db, &result1);
    println!("\nDeck 2: {}", deck2.name());
    print_summary(&deck2, &db, &result2);

    println!("\n=== Difference (deck 2 - deck 1) ===\n");
    println!(
        "Draw goal: {:+.1} pts",
        (result2.draw_ok_rate - result1.draw_ok_rate) * 100.0
    );
    println!(
        "Win goal:  {:+.1} pts",
        (result2.win_ok_rate - result1.win_ok_rate) * 100.0
    );
    if let (Some(a), Some(b)) = (result1.average_win_turn, result2.average_win_turn) {
        println!("Average win turn: {:+.2}", b - a);
    }
}

fn print_json(runs: &[(&Deck, &AggregateResult)]) {
    let generated_at = chrono::Utc::now().to_rfc3339();
    let reports: Vec<Report> = runs
        .iter()
        .map(|&(deck, result)| Report {
            deck: deck.name(),
            commanders: deck.commanders(),
            generated_at: generated_at.clone(),
            result,
        })
        .collect();

    let output = if reports.len() == 1 {
        serde_json::to_string_pretty(&reports[0])
    } else {
        serde_json::to_string_pretty(&reports)
    };
    match output {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("✗ Failed to serialize results: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_summary(deck: &Deck, db: &CardDatabase, result: &AggregateResult) {
    let lands = deck.library().iter().filter(|c| db.is_land(c)).count();
    println!("Library: {} cards, {} lands", deck.library().len(), lands);
    println!(
        "Trials: {}  Seed: {}  Max mulligans: {}{}",
        result.trials,
        result.seed,
        result.max_mulligans,
        if result.parallel { "  (parallel)" } else { "" }
    );
    println!(
        "Goals: draw engine by turn {}, win by turn {} ({} damage)",
        result.goals.draw_by_turn, result.goals.win_by_turn, result.goals.damage_threshold
    );
    println!();

    println!("=== Results ===\n");
    println!("Draw goal met:  {:5.1}%", result.draw_ok_rate * 100.0);
    println!(
        "Win goal met:   {:5.1}% (wincon {}, damage {})",
        result.win_ok_rate * 100.0,
        result.wincon_wins,
        result.damage_wins
    );
    match result.average_win_turn {
        Some(turn) => println!("Average win turn: {:.2}", turn),
        None => println!("Average win turn: -"),
    }
    println!("Average mulligans: {:.2}", result.average_mulligans);
    println!();

    if result.trials == 0 {
        return;
    }

    println!("Turn distribution:");
    for (turn, count) in &result.first_win_turn_distribution {
        let pct = *count as f64 / result.trials as f64 * 100.0;
        let bar = "█".repeat((pct / 2.0) as usize);
        println!("  Turn {:2}: {:5.1}% {} ({})", turn, pct, bar, count);
    }

    let wins: u64 = result.first_win_turn_distribution.values().sum();
    let no_win = result.trials - wins;
    if no_win > 0 {
        let pct = no_win as f64 / result.trials as f64 * 100.0;
        println!("  No win:  {:5.1}% ({})", pct, no_win);
    }
}
