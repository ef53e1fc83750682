// rehearsal: run a full interview battle headless, at virtual speed.
//
// The audience is scripted from the seed: it sometimes skips thinking
// time, sometimes ends a turn early, and votes at a random moment of the
// judging window (or not at all).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use interview_battle::{
    GameRng, Input, Phase, QuestionBank, RoleInfo, RoundMachine, SessionConfig, SettingsStore, TeamId,
    TracingPresenter,
};

/// Question document bundled with the binary.
const DEMO_QUESTIONS: &str = include_str!("../../data/questions.json");

/// Upper bound on simulated steps, in case a script never ends a match.
const MAX_STEPS: u64 = 10_000_000;

#[derive(Parser, Debug)]
#[command(name = "rehearsal", about = "Run a scripted interview battle without a screen")]
struct Args {
    /// Question document (JSON keyed by role). Defaults to the bundled set.
    #[arg(long)]
    questions: Option<PathBuf>,

    /// Role to play: key, title or card code (DEV, PM, QA, ...).
    #[arg(long, default_value = "developer")]
    role: String,

    /// Seed for question selection and the scripted audience.
    #[arg(long, env = "INTERVIEW_BATTLE_SEED")]
    seed: Option<u64>,

    /// Use the short tutorial timings.
    #[arg(long)]
    tutorial: bool,

    /// Settings file (JSON). Ignored with --tutorial.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Virtual milliseconds per simulation step.
    #[arg(long, default_value_t = 100)]
    step_ms: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let bank = match &args.questions {
        Some(path) => QuestionBank::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => QuestionBank::from_json(DEMO_QUESTIONS)?,
    };

    let config = if args.tutorial {
        SessionConfig::tutorial()
    } else {
        let store = args.settings.clone().map_or_else(SettingsStore::from_env, SettingsStore::new);
        info!(path = %store.path().display(), "loading settings");
        store.load().into_config()
    };

    let role = RoleInfo::lookup(&args.role).map_or(args.role.as_str(), |info| info.key);
    let rng = args.seed.map_or_else(GameRng::from_entropy, GameRng::new);
    info!(role, seed = rng.seed(), tutorial = args.tutorial, "rehearsal starting");

    let mut machine = RoundMachine::initialize(config, &bank, role, &rng, TracingPresenter)?;
    machine.start_questions_display();

    let step = Duration::from_millis(args.step_ms.max(1));
    let mut audience = rng.for_context("audience");
    let mut steps = 0;
    while !machine.is_over() && steps < MAX_STEPS {
        let input = match machine.phase() {
            Phase::Thinking if audience.gen_range_usize(0..50) == 0 => Some(Input::SkipThinking),
            Phase::Team1Turn | Phase::Team2Turn if audience.gen_range_usize(0..200) == 0 => Some(Input::EndTurn),
            Phase::Judging if audience.gen_range_usize(0..30) == 0 => {
                let loser = *audience.choose(&TeamId::ALL).unwrap_or(&TeamId::Team1);
                Some(Input::Vote(loser))
            }
            _ => None,
        };
        if let Some(input) = input {
            machine.handle(input);
        }
        machine.advance(step);
        steps += 1;
    }

    let snapshot = machine.session().snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    match machine.outcome() {
        Some(outcome) => println!("{outcome} after {} virtual seconds", machine.clock().now().as_secs()),
        None => println!("no outcome after {steps} steps"),
    }
    Ok(())
}
