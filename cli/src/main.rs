//! CLI entrypoint for llm-consensus
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use consensus_application::{
    BatchOptions, BatchProgressNotifier, NoProgress, RunConsensusInput, RunConsensusUseCase,
    RunRecorder,
};
use consensus_domain::{ConsensusAnalyzer, ModelId, OutputFormat, Prompt};
use consensus_infrastructure::config::parse_model_list;
use consensus_infrastructure::{
    ConfigLoader, FileConfig, HttpCompletionGateway, JsonlRunRecorder, Severity,
};
use consensus_presentation::{
    Cli, ConsoleFormatter, OutputFormatter, ProgressReporter, SimpleProgress,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered log lines reach the file
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting llm-consensus");

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let config = load_config(&cli)?;
    check_config(&config)?;

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    let catalog = config.catalog();

    if cli.list_models {
        print!("{}", ConsoleFormatter::format_catalog(&catalog));
        return Ok(());
    }

    let Some(text) = cli.prompt.as_deref() else {
        bail!("A prompt is required. Run with --help for usage.");
    };
    let Some(prompt) = Prompt::try_new(text) else {
        bail!("Prompt cannot be empty");
    };

    let models = select_models(&cli, &config)?;
    let options = batch_options(&cli, &config)?;
    let analyzer = match cli.similarity_threshold {
        Some(t) if !(0.0..=1.0).contains(&t) => {
            bail!("--similarity-threshold must be between 0 and 1, got {t}")
        }
        Some(t) => ConsensusAnalyzer::with_threshold(t),
        None => config.analysis.analyzer(),
    };
    let format: OutputFormat = cli
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();

    // === Dependency Injection ===
    let api_key = config.gateway.resolve_api_key()?;
    let gateway = Arc::new(
        HttpCompletionGateway::new(
            &config.gateway.base_url,
            api_key,
            config.gateway.http_timeout(),
        )
        .context("Failed to set up the completion gateway")?,
    );

    let mut use_case = RunConsensusUseCase::new(gateway, catalog).with_analyzer(analyzer);
    if let Some(recorder) = open_recorder(&cli, &config) {
        use_case = use_case.with_recorder(recorder);
    }

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let input = RunConsensusInput::new(prompt, models).with_options(options);

    let progress: Box<dyn BatchProgressNotifier> = if cli.quiet || !config.output.show_progress {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        // Redirected stderr gets plain lines instead of bar redraws
        Box::new(SimpleProgress)
    };

    let run = use_case
        .execute_with_progress(input, progress.as_ref(), &cancel)
        .await?;

    println!("{}", ConsoleFormatter.render(&run, format));

    Ok(())
}

/// Initialize logging based on verbosity level
///
/// `RUST_LOG` is ignored; the level comes from `-v` only.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .with_context(|| format!("--log-file {} has no file name", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Could not create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();

    Ok(Some(guard))
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    if cli.no_config {
        return Ok(ConfigLoader::load_defaults());
    }
    ConfigLoader::load(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))
}

/// Log warnings, fail on errors
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in issues.iter().filter(|i| i.severity == Severity::Warning) {
        warn!("{}", issue.message);
    }

    let errors: Vec<String> = issues
        .iter()
        .filter(|i| i.is_error())
        .map(|i| i.message.clone())
        .collect();
    if !errors.is_empty() {
        bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }
    Ok(())
}

/// `-m` flags win over `[models] selected`, which wins over the catalog default
fn select_models(cli: &Cli, config: &FileConfig) -> Result<Vec<ModelId>> {
    if cli.models.is_empty() {
        let models = config.default_models();
        if models.is_empty() {
            bail!("No models selected and the model catalog is empty");
        }
        return Ok(models);
    }

    let (models, issues) = parse_model_list("--model", cli.models.iter().map(String::as_str));
    for issue in &issues {
        if issue.is_error() {
            bail!("{}", issue.message);
        }
        warn!("{}", issue.message);
    }
    Ok(models)
}

/// Overlay CLI flags onto the configured batch options
fn batch_options(cli: &Cli, config: &FileConfig) -> Result<BatchOptions> {
    let mut options = config.batch.to_batch_options();
    if let Some(prompt) = &cli.system_prompt {
        options = options.with_system_prompt(prompt.clone());
    }
    if let Some(t) = cli.temperature {
        options = options.with_temperature(t);
    }
    if let Some(max) = cli.max_tokens {
        options = options.with_max_tokens(max);
    }
    if let Some(ms) = cli.timeout_ms {
        options = options.with_timeout(Duration::from_millis(ms));
    }
    if let Some(n) = cli.concurrency {
        options = options.with_concurrency(n);
    }
    Ok(options.validated()?)
}

fn open_recorder(cli: &Cli, config: &FileConfig) -> Option<Arc<dyn RunRecorder>> {
    let path = cli.record.clone().or_else(|| config.record.resolved_path())?;
    match JsonlRunRecorder::new(&path) {
        Some(recorder) => {
            info!(path = %path.display(), "Recording runs");
            Some(Arc::new(recorder))
        }
        None => {
            warn!("Run recording disabled: could not open {}", path.display());
            None
        }
    }
}

/// Ctrl-C cancels outstanding requests; settled results are still reported
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling outstanding requests");
            cancel.cancel();
        }
    });
}
