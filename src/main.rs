use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info};
use screen_journey::api::{self, AnalyzeMode, StageError};
use screen_journey::config::{ConfigError, ModelConfig};
use screen_journey::core::layout::WorkspaceLayout;
use screen_journey::core::model::{ChatCompletionsClient, ModelError};
use screen_journey::core::video::ExtractionConfig;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "screen-journey",
    version,
    about = "Screen recording -> frames -> per-frame analysis -> user journey -> summary"
)]
struct Cli {
    /// Workspace root holding videos/, frames/, analysis_results/ and journeys/
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract one frame per interval from the first video in videos/
    Extract {
        /// Seconds between extracted frames
        #[arg(long, default_value_t = 2)]
        interval_secs: u32,
    },

    /// Describe frames with the vision model
    Analyze {
        #[arg(long, value_enum, default_value_t = ModeArg::Single)]
        mode: ModeArg,

        /// Frames per window (window/running modes)
        #[arg(long, default_value_t = 2)]
        window_size: usize,

        /// Frames the window advances between requests
        #[arg(long, default_value_t = 1)]
        stride: usize,
    },

    /// Write the journey title before a running-mode analysis
    InitJourney,

    /// Synthesize all analyses into the journey document
    Synthesize {
        /// Do not prefix the document with a "# User Journey" title
        #[arg(long, default_value_t = false)]
        no_title: bool,
    },

    /// Condense the journey document into a numbered summary
    Summarize,

    /// Run extract, analyze (single), synthesize and summarize in order
    Run {
        #[arg(long, default_value_t = 2)]
        interval_secs: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// One request per frame, one file per frame
    Single,
    /// Overlapping windows, one file per window
    Window,
    /// Overlapping windows appended to the journey document
    Running,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Stage(#[from] StageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

fn model_client() -> Result<ChatCompletionsClient, CliError> {
    let config = ModelConfig::from_env()?;
    Ok(ChatCompletionsClient::new(config)?)
}

fn extraction(interval_secs: u32) -> ExtractionConfig {
    ExtractionConfig {
        interval_secs,
        ..Default::default()
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let layout = WorkspaceLayout::new(cli.root);

    match cli.cmd {
        Commands::Extract { interval_secs } => {
            let stats = api::extract_frames(&layout, extraction(interval_secs))?;
            info!(
                "🎞️ {} frames saved to {:?}",
                stats.extracted_frames, stats.output_dir
            );
        }
        Commands::Analyze {
            mode,
            window_size,
            stride,
        } => {
            let mode = match mode {
                ModeArg::Single => AnalyzeMode::Single,
                ModeArg::Window => AnalyzeMode::Window { window_size, stride },
                ModeArg::Running => AnalyzeMode::Running { window_size, stride },
            };
            // 先检查视频名，缺失时不需要 API key 也能给出明确错误
            layout.read_video_name().map_err(StageError::from)?;
            let client = model_client()?;
            api::analyze_frames(&layout, &client, mode)?;
        }
        Commands::InitJourney => {
            let path = api::init_journey(&layout)?;
            info!("📄 Journey initialized at {:?}", path);
        }
        Commands::Synthesize { no_title } => {
            layout.read_video_name().map_err(StageError::from)?;
            let client = model_client()?;
            api::synthesize_journey(&layout, &client, !no_title)?;
        }
        Commands::Summarize => {
            layout.read_video_name().map_err(StageError::from)?;
            let client = model_client()?;
            api::generate_summary(&layout, &client)?;
        }
        Commands::Run { interval_secs } => {
            let client = model_client()?;
            if let Some(summary) = api::run_pipeline(&layout, &client, extraction(interval_secs))? {
                info!("🏁 Pipeline complete, summary at {:?}", summary);
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    screen_journey::init_logging();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ {}", e);
            ExitCode::from(1)
        }
    }
}
