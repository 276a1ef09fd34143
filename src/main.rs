/*!
 * Command-line interface for mediabrowse
 */

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::ThreadPoolBuilder;
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mediabrowse::config::{Args, Command, Config, SettingsAction};
use mediabrowse::error::{MediaError, Result};
use mediabrowse::report::Reporter;
use mediabrowse::MediaBrowser;

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| args.log_level.as_str().into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("Command failed: {}", e);
            eprintln!("Error: {}", e.public_message());
            if let MediaError::MissingSetting(key) = &e {
                eprintln!("Setting {} is not initialized; run `mediabrowse settings init`", key);
            }
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}

fn run(args: Args) -> Result<()> {
    if let Command::Completions { shell } = args.command {
        clap_complete::generate(shell, &mut Args::command(), "mediabrowse", &mut io::stdout());
        return Ok(());
    }

    // Create and validate configuration
    let config = Config::from_args(&args);
    config.validate()?;

    // Configure thread pool
    if let Err(e) = ThreadPoolBuilder::new()
        .num_threads(config.num_threads)
        .build_global()
    {
        warn!("Failed to set thread pool size: {}", e);
    }

    let browser = MediaBrowser::new(config)?;
    let reporter = Reporter::new(args.format);

    let output = match args.command {
        Command::Browse { path, page, query } => {
            let view = browser.browse(&path, page.as_deref(), query.as_deref())?;
            reporter.browse(&view)?
        }
        Command::Watch { path } => reporter.watch(&browser.watch(&path)?)?,
        Command::Media { path } => reporter.media(&browser.media(&path)?)?,
        Command::Delete { path } => reporter.delete(&browser.delete_video(&path)?)?,
        Command::Size { recalculate } => {
            if recalculate {
                let progress = ProgressBar::new_spinner();
                progress.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.green} {msg} {elapsed_precise}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                progress.enable_steady_tick(Duration::from_millis(100));
                progress.set_message("Measuring media library...");

                let result = browser.recalculate_storage();
                progress.finish_and_clear();
                result?;
            }
            reporter.storage(&browser.storage())?
        }
        Command::Settings { action } => {
            let settings = browser.settings();
            match action {
                SettingsAction::Show => {}
                SettingsAction::Set { key, value } => {
                    settings.set_raw(&key, &value)?;
                }
                SettingsAction::Init => {
                    for key in settings.seed_defaults()? {
                        debug!("Seeded default for {}", key);
                    }
                }
            }
            reporter.settings(&settings.all()?)?
        }
        Command::Completions { .. } => unreachable!("handled before configuration"),
    };

    println!("{}", output);
    Ok(())
}
