use std::error::Error;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use trilingual_scenes::audio::{shared, AlsaOutput};
use trilingual_scenes::config::Settings;
use trilingual_scenes::gemini::GeminiClient;
use trilingual_scenes::init_app_dirs;
use trilingual_scenes::session::{run_session_loop, App};
use trilingual_scenes::ui::{Cli, TerminalRenderer};

const LOG_TARGET: &str = "trilingual_scenes::main";

/// Logs go to a file so they never interleave with the screen.
fn init_logging(log_path: &Path, json: bool) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = Arc::new(OpenOptions::new().create(true).append(true).open(log_path)?);

    let (json_layer, text_layer) = if json {
        (Some(fmt::layer().json().with_writer(file)), None)
    } else {
        (None, Some(fmt::layer().with_ansi(false).with_writer(file)))
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trilingual_scenes=info")))
        .with(json_layer)
        .with(text_layer)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Parse command-line arguments and initialize CLI
    let cli = Cli::new();
    let args = &cli.args;

    // Initialize application directories
    init_app_dirs()?;

    let log_path = args.log_file.as_ref().map(PathBuf::from).unwrap_or_else(Settings::default_log_path);
    init_logging(&log_path, args.log_json)?;

    // Load configuration from file or create default
    let config_path = match &args.config {
        Some(path) => Path::new(path).to_path_buf(),
        None => Settings::default_path(),
    };
    let mut settings = Settings::load(&config_path)?;
    info!(target: LOG_TARGET, "Loaded settings from {}", config_path.display());

    // Command line and environment take precedence over the config file
    args.apply_to(&mut settings);

    if let Err(e) = settings.validate() {
        error!(target: LOG_TARGET, "Invalid configuration: {}", e);
        return Err(e.into());
    }

    let client = GeminiClient::from_settings(&settings)?;
    info!(
        target: LOG_TARGET,
        "Using {} with {} words per list (reference language: {})",
        client.api_base_url(),
        client.vocabulary_count(),
        client.reference_language()
    );

    let output = shared(Box::new(AlsaOutput::new(&settings.alsa_device)));
    let mut app = App::new(
        Arc::new(client),
        output,
        settings.scenario_catalogue(),
        settings.default_language,
        settings.sample_rate,
    );

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut renderer = TerminalRenderer::new();

    tokio::select! {
        result = run_session_loop(&mut app, stdin, &mut renderer) => {
            if let Err(e) = result {
                error!(target: LOG_TARGET, "Session loop failed: {}", e);
                return Err(e.into());
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!(target: LOG_TARGET, "Received Ctrl+C, shutting down.");
        }
    }

    info!(target: LOG_TARGET, "Goodbye.");
    Ok(())
}
