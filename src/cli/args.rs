//! CLI argument definitions
//!
//! The `Cli` struct and its subcommands, parsed with clap derive.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// procsynth - text-to-BPMN process synthesis
#[derive(Parser)]
#[command(name = "procsynth")]
#[command(about = "Turn plain-language process descriptions into BPMN 2.0 diagrams")]
#[command(long_about = r#"
procsynth turns a free-text process description, or a guided questionnaire,
into a BPMN 2.0 XML document with diagram layout. Configured external text
generators are tried first; when none answers, a local deterministic pipeline
produces the diagram.

EXAMPLES:
  # Generate from an inline description
  procsynth generate --title "Order Fulfilment" \
      --description "We receive the order, verify payment, then ship the product."

  # Generate from a file and write the document next to it
  procsynth generate --title "Intake" --file intake.txt --output intake.bpmn

  # Generate from questionnaire answers (JSON object of key -> answer)
  procsynth guided --title "Claims" --industry finance --answers answers.json

  # Optimize a document and record the result in a history file
  procsynth optimize --input claims.bpmn --industry finance \
      --goal focus=speed --history claims-history.json

  # Check and inspect documents
  procsynth validate claims.bpmn
  procsynth assess claims.bpmn

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > config file > defaults
  The config file is --config, then $PROCSYNTH_CONFIG, then ./procsynth.toml,
  then <user config dir>/procsynth/config.toml
  Use `procsynth config` to see effective values and where they came from

EXIT CODES:
  0 success, 1 internal failure, 2 invalid arguments/input/config,
  3 validation failure, 4 provider quota exhausted
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Primary generator provider (openai, huggingface, none)
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Secondary generator provider, tried after the primary is rate limited
    #[arg(long, global = true)]
    pub fallback_provider: Option<String>,

    /// Model for the primary provider
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Timeout for each external generator call, in seconds
    #[arg(long, global = true)]
    pub call_timeout: Option<u64>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a BPMN document from a free-text description
    Generate {
        /// Process title (3 to 200 characters)
        #[arg(long)]
        title: String,

        /// Industry context (general, manufacturing, healthcare, finance)
        #[arg(long, default_value = "general")]
        industry: String,

        /// Description text (10 to 5000 characters)
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        description: Option<String>,

        /// Read the description from a file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Emit the document, metadata and generation report as JSON
        #[arg(long)]
        json: bool,

        /// Write the output to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Generate a BPMN document from questionnaire answers
    Guided {
        /// Process title (3 to 200 characters)
        #[arg(long)]
        title: String,

        /// Industry context (general, manufacturing, healthcare, finance)
        #[arg(long, default_value = "general")]
        industry: String,

        /// JSON file holding an object of question key -> answer
        #[arg(long)]
        answers: PathBuf,

        /// Emit the document, metadata and generation report as JSON
        #[arg(long)]
        json: bool,

        /// Write the output to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Optimize an existing BPMN document
    Optimize {
        /// Document to optimize
        #[arg(long)]
        input: PathBuf,

        /// Industry context (general, manufacturing, healthcare, finance)
        #[arg(long, default_value = "general")]
        industry: String,

        /// Optimization goal as key=value (repeatable)
        #[arg(long = "goal", value_name = "KEY=VALUE", value_parser = parse_goal)]
        goals: Vec<(String, String)>,

        /// History file: read, appended to, and rewritten
        #[arg(long)]
        history: Option<PathBuf>,

        /// Emit the record, summary and generation report as JSON
        #[arg(long)]
        json: bool,

        /// Write the optimized document to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Check a BPMN document and print its cleaned form
    Validate {
        /// Document to check
        file: PathBuf,

        /// Also require the start event, end event and a single process
        #[arg(long)]
        strict: bool,
    },

    /// Print element counts and complexity of a BPMN document as JSON
    Assess {
        /// Document to assess
        file: PathBuf,
    },

    /// Show effective configuration and where each value came from
    Config,
}

fn parse_goal(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}
