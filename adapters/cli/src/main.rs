#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays snake arcade rounds with an autopilot.

mod autopilot;
mod config;
mod presenter;
mod store;

use std::{fmt, io, path::PathBuf};

use anyhow::{Context, Result as AnyResult};
use clap::Parser;
use snake_arcade_core::{EndReason, ModeId, RoundPhase};
use snake_arcade_rendering::TextBackend;
use snake_arcade_session::{HighScoreStore, InputIntent, MemoryStore, Session, SessionConfig};
use snake_arcade_world::query;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::{FileConfig, Overrides, RenderMode, Settings},
    presenter::ConsolePresenter,
    store::FileStore,
};

/// Command-line arguments accepted by the binary.
#[derive(Debug, Parser)]
#[command(name = "snake-arcade")]
#[command(about = "Plays a headless snake arcade round driven by a greedy autopilot")]
struct Args {
    /// Mode to play
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    /// Seed for every random decision in the session
    #[arg(long)]
    seed: Option<u64>,
    /// Upper bound on simulation ticks before the run stops
    #[arg(long)]
    ticks: Option<u32>,
    /// TOML file providing defaults for the other options
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON file holding the persisted high score
    #[arg(long)]
    high_score_file: Option<PathBuf>,
    /// How frames are shown while playing
    #[arg(long, value_enum)]
    render: Option<RenderMode>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            mode: self.mode.map(ModeId::from),
            seed: self.seed,
            ticks: self.ticks,
            high_score_file: self.high_score_file.clone(),
            render: self.render,
        }
    }
}

/// Mode names accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum ModeArg {
    Classic,
    Portal,
    Enemy,
    Shadow,
    Maze,
    Poison,
    Speed,
    TimeAttack,
    Boss,
    BossRush,
}

impl From<ModeArg> for ModeId {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Classic => Self::Classic,
            ModeArg::Portal => Self::Portal,
            ModeArg::Enemy => Self::Enemy,
            ModeArg::Shadow => Self::Shadow,
            ModeArg::Maze => Self::Maze,
            ModeArg::Poison => Self::Poison,
            ModeArg::Speed => Self::Speed,
            ModeArg::TimeAttack => Self::TimeAttack,
            ModeArg::Boss => Self::Boss,
            ModeArg::BossRush => Self::BossRush,
        }
    }
}

/// Entry point for the snake arcade command-line interface.
fn main() -> AnyResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let file = match &args.config {
        Some(path) => FileConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(file, args.overrides()).context("invalid settings")?;
    info!(
        mode = settings.mode.label(),
        seed = settings.seed,
        ticks = settings.ticks,
        "starting run"
    );

    let summary = match settings.high_score_file.clone() {
        Some(path) => run(&settings, FileStore::new(path))?,
        None => run(&settings, MemoryStore::default())?,
    };
    println!("{summary}");
    Ok(())
}

fn run<S: HighScoreStore>(settings: &Settings, store: S) -> AnyResult<RunSummary> {
    let backend = match settings.render {
        RenderMode::Text => Some(TextBackend::new(io::stdout())),
        RenderMode::None => None,
    };
    let mut presenter = ConsolePresenter::new(backend);
    let mut session = Session::new(
        SessionConfig {
            seed: settings.seed,
            clock_period: settings.clock_period,
        },
        store,
    );

    session.start(settings.mode, &mut presenter);
    let mut ticks = 0;
    while session.phase() == RoundPhase::Playing && ticks < settings.ticks {
        let snapshot = query::snapshot(session.world());
        if let Some(direction) = autopilot::steer(&snapshot) {
            session.handle_input(InputIntent::Direction(direction), &mut presenter);
        }
        session.advance(snapshot.tick_period, &mut presenter);
        ticks += 1;
        if let Some(error) = presenter.take_render_error() {
            return Err(error.context("failed to render frame"));
        }
    }

    Ok(RunSummary {
        mode: settings.mode,
        phase: session.phase(),
        reason: presenter.end_reason(),
        ticks,
        frames: presenter.frames(),
        score: presenter.score(),
        high_score: presenter.high_score().max(session.high_score()),
        time_remaining: presenter.time_remaining(),
        banner_shown: presenter.banner().is_some(),
    })
}

/// Final state of a run printed on exit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RunSummary {
    mode: ModeId,
    phase: RoundPhase,
    reason: Option<EndReason>,
    ticks: u32,
    frames: u64,
    score: u32,
    high_score: u32,
    time_remaining: Option<u32>,
    banner_shown: bool,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match (self.phase, self.banner_shown) {
            (RoundPhase::Victory, true) => "victory".to_owned(),
            (RoundPhase::GameOver, true) => match self.reason {
                Some(reason) => format!("game over ({reason:?})"),
                None => "game over".to_owned(),
            },
            _ => "stopped".to_owned(),
        };
        write!(
            f,
            "{}: {status} after {} ticks, {} frames, score {}, high score {}",
            self.mode.label(),
            self.ticks,
            self.frames,
            self.score,
            self.high_score
        )?;
        if let Some(seconds) = self.time_remaining {
            write!(f, ", {seconds}s left")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(mode: ModeId, seed: u64, ticks: u32) -> Settings {
        Settings::resolve(
            FileConfig::default(),
            Overrides {
                mode: Some(mode),
                seed: Some(seed),
                ticks: Some(ticks),
                ..Overrides::default()
            },
        )
        .expect("valid settings")
    }

    #[test]
    fn tick_limit_stops_a_running_round() {
        let summary = run(&settings(ModeId::Classic, 3, 5), MemoryStore::default())
            .expect("run succeeds");

        assert_eq!(summary.phase, RoundPhase::Playing);
        assert_eq!(summary.ticks, 5);
        assert_eq!(summary.frames, 5);
        assert!(summary.to_string().starts_with("Classic: stopped after 5 ticks"));
    }

    #[test]
    fn runs_are_reproducible_per_seed() {
        for mode in ModeId::ALL {
            let first = run(&settings(mode, 21, 400), MemoryStore::default()).expect("run");
            let second = run(&settings(mode, 21, 400), MemoryStore::default()).expect("run");
            assert_eq!(first, second, "{} diverged", mode.label());
        }
    }

    #[test]
    fn autopilot_scores_in_classic() {
        let summary = run(&settings(ModeId::Classic, 5, 400), MemoryStore::default())
            .expect("run succeeds");
        assert!(summary.score >= 10, "autopilot never ate: {summary}");
    }

    #[test]
    fn timed_summary_reports_remaining_seconds() {
        let summary = run(&settings(ModeId::TimeAttack, 8, 20), MemoryStore::default())
            .expect("run succeeds");
        assert!(summary.time_remaining.is_some());
        assert!(summary.to_string().contains("s left"));
    }

    #[test]
    fn mode_arguments_map_onto_every_mode() {
        use clap::ValueEnum;

        let mapped: Vec<ModeId> = ModeArg::value_variants()
            .iter()
            .map(|mode| ModeId::from(*mode))
            .collect();
        assert_eq!(mapped, ModeId::ALL.to_vec());
    }
}
