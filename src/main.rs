use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use tokio_util::sync::CancellationToken;

mod cli;

use cli::{Cli, Command};
use commit_whisper::ai::{CommitSuggester, SuggestionBackend};
use commit_whisper::app::{self, App, ExitStatus};
use commit_whisper::config::{self, Config};
use commit_whisper::error::ConfigError;
use commit_whisper::git::GitChangeSource;
use commit_whisper::logging;
use commit_whisper::session::SuggestionController;

fn main() -> Result<ExitCode> {
    // Install color-eyre panic hook for better error messages
    color_eyre::install()?;

    if let Some(path) = logging::init().wrap_err("Failed to open log file")? {
        log::info!("Logging to {}", path.display());
    }

    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref(), cli.overrides())?;
    log::debug!("Effective config: {:?}", config);

    match cli.command {
        Command::Edit { file } => run_editor(&file, config),
        Command::Suggest => run_suggest(&config),
        Command::Setup => run_setup(cli.config.as_deref()),
        Command::Config => print_config(&config),
    }
}

fn suggester(config: &Config) -> Result<CommitSuggester<GitChangeSource>> {
    let workdir = std::env::current_dir().wrap_err("Cannot determine working directory")?;
    Ok(CommitSuggester::from_config(
        GitChangeSource::new(workdir),
        config,
    ))
}

fn run_editor(file: &Path, config: Config) -> Result<ExitCode> {
    let backend = suggester(&config)?;
    let controller = SuggestionController::spawn(config, backend);
    let mut app = App::open(file, controller)
        .wrap_err_with(|| format!("Cannot open {}", file.display()))?;

    // Initialize terminal (handles raw mode, alternate screen, etc.)
    let mut terminal = ratatui::init();
    let result = app::run(&mut terminal, &mut app);
    ratatui::restore();

    // Non-zero exit makes git abort the commit
    Ok(match result? {
        ExitStatus::Saved => ExitCode::SUCCESS,
        ExitStatus::Aborted => ExitCode::FAILURE,
    })
}

fn run_suggest(config: &Config) -> Result<ExitCode> {
    let backend = suggester(config)?;
    match backend.generate(&CancellationToken::new()) {
        Ok(message) => {
            println!("{}", message);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("commit-whisper: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run_setup(path: Option<&Path>) -> Result<ExitCode> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => config::config_path().ok_or(ConfigError::NoHomeDir)?,
    };

    if config::write_default_config(&path)? {
        println!("Wrote default config to {}", path.display());
    } else {
        println!("Config already exists at {}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn print_config(config: &Config) -> Result<ExitCode> {
    let rendered =
        toml::to_string_pretty(config).map_err(|e| ConfigError::Serialize(e.to_string()))?;
    print!("{}", rendered);
    Ok(ExitCode::SUCCESS)
}
