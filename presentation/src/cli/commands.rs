//! CLI command definitions

use clap::{Parser, ValueEnum};
use consensus_domain::OutputFormat;
use std::path::PathBuf;

/// Output format for consensus runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    /// Per-model responses, groups, insights and statistics
    Full,
    /// Group distribution and insights only
    Summary,
    /// JSON output
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Full => OutputFormat::Full,
            OutputFormatArg::Summary => OutputFormat::Summary,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for llm-consensus
#[derive(Parser, Debug)]
#[command(name = "llm-consensus")]
#[command(author, version, about = "Ask many LLMs the same question and measure how much they agree")]
#[command(long_about = r#"
llm-consensus sends one prompt to several models through an OpenAI-compatible
gateway, groups answers that are near-identical after normalization, and
reports how strongly the models agree.

Configuration files are loaded from (in priority order):
1. --config <path>                        Explicit config file
2. ./consensus.toml                       Project-level config
3. ~/.config/llm-consensus/config.toml    Global config

The gateway credential is read from $OPENROUTER_API_KEY unless
[gateway] api_key_env names another variable.

Example:
  llm-consensus "What is the capital of Australia? Answer with one word."
  llm-consensus -m openai/gpt-4o -m anthropic/claude-3.5-sonnet -o full "Pick a number from 1 to 10"
  llm-consensus --list-models
"#)]
pub struct Cli {
    /// The prompt sent to every model
    pub prompt: Option<String>,

    /// Models to query (can be specified multiple times)
    #[arg(short, long = "model", value_name = "MODEL")]
    pub models: Vec<String>,

    /// System prompt sent ahead of the user prompt
    #[arg(long, value_name = "TEXT")]
    pub system_prompt: Option<String>,

    /// Sampling temperature (0.0 - 2.0)
    #[arg(long, value_name = "T")]
    pub temperature: Option<f32>,

    /// Completion token limit per model
    #[arg(long, value_name = "N")]
    pub max_tokens: Option<u32>,

    /// Per-model request timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Requests issued together per chunk
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Minimum similarity (0.0 - 1.0) for two answers to be grouped
    #[arg(long, value_name = "RATIO")]
    pub similarity_threshold: Option<f64>,

    /// Output format [default: summary]
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormatArg>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// List the model catalog and exit
    #[arg(long)]
    pub list_models: bool,

    /// Append each completed run to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub record: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
