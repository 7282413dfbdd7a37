//! Disklock demo entry point
//!
//! Starts a seeded session and plays it headless: either the autopilot
//! solve or a recorded replay. Prints the win summary at the end.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use clap::Parser;

    use disklock::replay::{ReplaySequence, load_replay_from_path};
    use disklock::sim::{GameState, LockState, apply_input, solve_script};
    use disklock::{LockError, Settings};

    #[derive(Debug, Parser)]
    #[command(name = "disklock", about = "Headless disk-detainer picking session")]
    struct Args {
        /// Session seed (random when omitted)
        #[arg(long)]
        seed: Option<u32>,
        /// Settings JSON file
        #[arg(long, default_value = "disklock.json")]
        settings: PathBuf,
        /// Play a recorded replay instead of the autopilot
        #[arg(long, conflicts_with = "seed")]
        replay: Option<PathBuf>,
        /// Write the autopilot inputs as a replay file
        #[arg(long, conflicts_with = "replay")]
        record: Option<PathBuf>,
    }

    fn init_logging(settings: &Settings) {
        let default_level = if settings.debug { "debug" } else { "info" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .init();
    }

    fn play(args: &Args) -> Result<LockState, LockError> {
        if let Some(path) = &args.replay {
            let replay = load_replay_from_path(path)?;
            log::info!(
                "Replaying {} frames from {}",
                replay.frames.len(),
                path.display()
            );
            return replay.run();
        }

        let mut state = LockState::new(args.seed);
        let script = solve_script(&state);

        if let Some(path) = &args.record {
            let json = ReplaySequence::record(state.seed, &script).to_json()?;
            std::fs::write(path, json).map_err(|err| LockError::io(path, err))?;
            log::info!("Replay written to {}", path.display());
        }

        for input in &script {
            apply_input(&mut state, input);
        }
        Ok(state)
    }

    pub fn run() -> ExitCode {
        let args = Args::parse();

        let settings = match Settings::load(&args.settings) {
            Ok(settings) => settings,
            Err(err) => {
                eprintln!("{err}, using default settings");
                Settings::default()
            }
        };
        init_logging(&settings);
        log::info!("Disklock starting...");

        match play(&args) {
            Ok(state) => match (state.game_state, &state.win) {
                (GameState::Ended, Some(win)) => {
                    println!("Seed {}: {win}", state.seed);
                    ExitCode::SUCCESS
                }
                (phase, _) => {
                    println!("Seed {}: lock not open ({phase:?})", state.seed);
                    ExitCode::FAILURE
                }
            },
            Err(err) => {
                log::error!("{err}");
                ExitCode::FAILURE
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The engine is embedded by the web host; there is no wasm binary
}
