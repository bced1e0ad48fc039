//! Duck Race entry point
//!
//! The browser build starts from `duck_race::web`; natively this is a small
//! terminal race that shares the same engine, history and settings.

#[cfg(not(target_arch = "wasm32"))]
mod terminal {
    use std::io::{IsTerminal, Write};
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    use anyhow::{Context, bail};
    use clap::Parser;

    use duck_race::consts::FINISH_POSITION;
    use duck_race::formatting::{format_race_timer, format_time};
    use duck_race::platform::{Clock, FileStore, SystemClock};
    use duck_race::{
        GamePhase, NullAudio, RaceConfig, RaceDuration, RaceEngine, RaceHistory, RaceTuning,
        Settings,
    };

    const BAR_WIDTH: usize = 40;
    /// Longest sleep between engine updates
    const MAX_IDLE_MS: f64 = 50.0;

    fn parse_duration(s: &str) -> Result<RaceDuration, String> {
        RaceDuration::from_str(s).ok_or_else(|| format!("expected 3, 5, 10 or 15 seconds, got {s:?}"))
    }

    /// Race rubber ducks in the terminal to pick a winner.
    #[derive(Parser, Debug)]
    #[command(version, about, long_about = None)]
    struct Args {
        /// Participant labels; each may hold a comma or newline separated list
        labels: Vec<String>,

        /// Target race length: 3s, 5s, 10s or 15s (defaults to the saved setting)
        #[arg(long, short, value_parser = parse_duration)]
        duration: Option<RaceDuration>,

        /// Seed for a reproducible race
        #[arg(long)]
        seed: Option<u64>,

        /// Directory holding history and settings
        #[arg(long, default_value = ".duck_race")]
        data_dir: PathBuf,

        /// JSON file overriding race balance
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// Print past races and exit
        #[arg(long)]
        history: bool,

        /// Forget past races and exit
        #[arg(long)]
        clear_history: bool,
    }

    fn load_tuning(path: &Path) -> anyhow::Result<RaceTuning> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading tuning file {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("parsing tuning file {}", path.display()))
    }

    fn print_history(engine: &RaceEngine) {
        let history = engine.history();
        if history.is_empty() {
            println!("No races yet.");
            return;
        }
        for entry in history {
            println!(
                "{}  {:<20} {}  ({})",
                entry.timestamp_display,
                entry.winner_label,
                format_time(entry.duration_ms),
                entry.participant_labels.join(", ")
            );
        }
    }

    fn bar(progress: f64) -> String {
        let filled = ((progress / FINISH_POSITION) * BAR_WIDTH as f64).round() as usize;
        let filled = filled.min(BAR_WIDTH);
        format!("{}>{}", "~".repeat(filled), " ".repeat(BAR_WIDTH - filled))
    }

    /// Draw one frame, over the previous one when `redraw` is set
    fn draw(out: &mut impl Write, engine: &RaceEngine, redraw: bool) -> anyhow::Result<()> {
        let labels = engine.labels();
        let lines = labels.len() + 1;
        if redraw {
            write!(out, "\x1b[{lines}A")?;
        }

        let status = match engine.phase() {
            GamePhase::Countdown => format!("Starting in {}...", engine.countdown()),
            GamePhase::Paused => "Paused".to_string(),
            _ => format!("Race time {}", format_race_timer(engine.elapsed_ms())),
        };
        writeln!(out, "\x1b[2K{status}")?;

        let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        for (label, &progress) in labels.iter().zip(engine.positions()) {
            writeln!(out, "\x1b[2K{label:>width$} |{}|", bar(progress))?;
        }
        out.flush()?;
        Ok(())
    }

    pub fn run() -> anyhow::Result<()> {
        env_logger::init();
        let args = Args::parse();

        let mut store = FileStore::new(&args.data_dir);
        let mut settings = Settings::load(&store);
        if let Some(duration) = args.duration {
            settings.race_duration = duration;
            settings.save(&mut store);
        }

        let clock = SystemClock;
        let mut engine = RaceEngine::new(Box::new(clock), Box::new(NullAudio), Box::new(store));
        if let Some(path) = &args.tuning {
            engine = engine.with_tuning(load_tuning(path)?);
        }
        if let Some(seed) = args.seed {
            engine = engine.with_seed(seed);
        }

        if args.clear_history {
            engine.clear_history();
            println!("History cleared.");
            return Ok(());
        }
        if args.history {
            print_history(&engine);
            return Ok(());
        }

        let mut config = RaceConfig::new(settings.race_duration);
        for text in &args.labels {
            config.add_from_text(text);
        }
        if !config.can_start() {
            bail!(
                "need at least {} more participant(s), e.g. `duck-race Pho \"Bun Bo\"`",
                config.missing_count()
            );
        }
        if !engine.start_race(config.labels(), config.duration_ms()) {
            bail!("race could not start");
        }

        let mut out = std::io::stdout().lock();
        let animate = out.is_terminal();
        let mut drawn = false;
        while engine.phase() != GamePhase::Result {
            let now = clock.now_ms();
            let wait = engine
                .next_due_ms()
                .map_or(MAX_IDLE_MS, |due| (due - now).clamp(0.0, MAX_IDLE_MS));
            std::thread::sleep(Duration::from_secs_f64(wait / 1000.0));

            engine.update();
            if animate {
                draw(&mut out, &engine, drawn)?;
                drawn = true;
            }
        }
        if !animate {
            draw(&mut out, &engine, false)?;
        }

        let winner = engine
            .winner_label()
            .context("race ended without a winner")?;
        writeln!(
            out,
            "\n{winner} wins! ({})",
            format_time(engine.elapsed_ms())
        )?;
        log::info!(
            "History: {} race(s) kept in {}",
            engine.history().len(),
            args.data_dir.join(format!("{}.json", RaceHistory::STORAGE_KEY)).display()
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    terminal::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is duck_race::web::start, this is just to satisfy the compiler
}
