// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, Context};
use log::{LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use srtscribe::app_config::{Config, LogLevel};
use srtscribe::app_controller::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the transcription service
    Serve {
        /// Interface to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Serve a canned transcript JSON instead of calling the recognizer
        #[arg(long, value_name = "FILE")]
        mock_transcript: Option<PathBuf>,
    },

    /// Upload an audio file to the service and save the subtitles
    Transcribe {
        /// Audio file to transcribe (wav, mp3, flac, ogg, m4a)
        #[arg(value_name = "AUDIO")]
        audio: PathBuf,

        /// Output .srt path (defaults to <audio stem>.srt next to the audio)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Service base URL (overrides config)
        #[arg(long, env = "SRTSCRIBE_API_URL")]
        api_url: Option<String>,

        /// Also print the subtitles to stdout
        #[arg(long)]
        print: bool,
    },

    /// Render a recognizer transcript JSON into subtitles without the service
    Render {
        /// JSON file with an array of segments or {"segments": [...]}
        #[arg(value_name = "SEGMENTS_JSON")]
        input: PathBuf,

        /// Output .srt path (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions for srtscribe
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// srtscribe - speech to SubRip subtitles
///
/// Runs a small transcription service that turns recognizer word timings
/// into SubRip subtitles, and a client that uploads audio to it.
#[derive(Parser, Debug)]
#[command(name = "srtscribe")]
#[command(version)]
#[command(about = "Audio transcription to SubRip subtitles")]
#[command(long_about = "srtscribe turns timed speech recognition output into SubRip (.srt) subtitles.

EXAMPLES:
    srtscribe serve                              # Run the service with conf.json settings
    srtscribe serve --mock-transcript demo.json  # Serve a canned transcript (no recognizer)
    srtscribe transcribe talk.mp3                # Upload and save talk.srt
    srtscribe transcribe talk.mp3 -o out.srt     # Choose the output path
    srtscribe render segments.json -o talk.srt   # Render a transcript offline
    srtscribe completions bash > srtscribe.bash  # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // Dependencies (hyper, reqwest) only surface warnings and errors
        let own_crate = metadata.target().starts_with("srtscribe");
        metadata.level() <= self.level && (own_crate || metadata.level() <= Level::Warn)
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Everything passes the logger; the max level does the filtering
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "srtscribe", &mut std::io::stdout());
        return Ok(());
    }

    // If log level is set via command line, apply it immediately
    if let Some(level) = &cli.log_level {
        let level: LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;

    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    match cli.command {
        Commands::Serve { host, port, mock_transcript } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let controller = Controller::with_config(config)?;
            controller.run_server(mock_transcript).await?;
        }
        Commands::Transcribe { audio, output, api_url, print } => {
            if let Some(api_url) = api_url {
                config.client.api_url = api_url;
            }

            let controller = Controller::with_config(config)?;
            controller
                .run_transcribe(&audio, output, print)
                .await
                .with_context(|| format!("Failed to transcribe {:?}", audio))?;
        }
        Commands::Render { input, output } => {
            let controller = Controller::with_config(config)?;
            controller
                .run_render(&input, output)
                .with_context(|| format!("Failed to render {:?}", input))?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
