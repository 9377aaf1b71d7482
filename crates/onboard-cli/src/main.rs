//! # onboard-cli
//!
//! Command-line front end for the lawyer onboarding validation engine.
//!
//! Reads onboarding state snapshots as JSON, validates them and reports the
//! outcome as text or JSON. Exits with status 1 when the checked step or
//! application cannot move forward.

mod config;

use anyhow::Context;
use clap::Parser;
use config::CliConfig;
use onboard_model::{EnhancedOnboardingState, OnboardingStep, Value};
use onboard_session::{Error as SessionError, OnboardingStore};
use onboard_validation::{StepRules, ValidationEngine, ValidationReporter, Validator};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "onboard")]
#[command(about = "Lawyer onboarding validation CLI")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
enum Commands {
    /// Validate one step of an onboarding state
    Validate {
        /// State file path (JSON)
        state: PathBuf,

        /// Step to validate; defaults to the state's current step
        #[arg(short, long)]
        step: Option<OnboardingStep>,

        /// Print every error instead of the prioritized subset
        #[arg(long)]
        all: bool,

        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a single field
    Field {
        /// State file path (JSON)
        state: PathBuf,

        /// Step the field belongs to
        #[arg(short, long)]
        step: OnboardingStep,

        /// Field name, e.g. email
        #[arg(short, long)]
        field: String,

        /// Candidate value; defaults to the value stored in the state
        #[arg(long)]
        value: Option<String>,

        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate every data step and report whether onboarding can complete
    Summary {
        /// State file path (JSON)
        state: PathBuf,

        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the rule tables
    Rules {
        /// Only list this step
        #[arg(short, long)]
        step: Option<OnboardingStep>,
    },

    /// Try to move the state to its next step
    Advance {
        /// State file path (JSON)
        state: PathBuf,

        /// Write the updated state back to the file
        #[arg(short, long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref()).await?;
    let engine = ValidationEngine::new().with_config(config.validation);

    match cli.command {
        Commands::Validate {
            state,
            step,
            all,
            json,
        } => {
            let state = load_state(&state).await?;
            let step = step.unwrap_or(state.current_step);
            tracing::info!(step = %step, "Validating step");

            let result = engine.validate_step(step, &state);
            if json {
                print_json(&result)?;
            } else {
                let reporter = ValidationReporter::new().prioritized_only(!all);
                print!("{}", reporter.render_result(&engine, &result));
            }
            Ok(exit_code(result.can_proceed))
        }
        Commands::Field {
            state,
            step,
            field,
            value,
            json,
        } => {
            let state = load_state(&state).await?;
            let value = value.map_or_else(|| state.field_value(&field), Value::from);
            tracing::info!(step = %step, field = %field, "Validating field");

            let result = engine.validate_field(step, &field, &value, &state);
            if json {
                print_json(&result)?;
            } else {
                print!("{}", ValidationReporter::new().render_result(&engine, &result));
            }
            Ok(exit_code(result.can_proceed))
        }
        Commands::Summary { state, json } => {
            let state = load_state(&state).await?;
            let summary = engine.validation_summary(&state);
            if json {
                print_json(&summary)?;
            } else {
                print!("{}", ValidationReporter::new().render_summary(&summary));
            }
            Ok(exit_code(summary.can_complete_onboarding))
        }
        Commands::Rules { step } => {
            let steps = match step {
                Some(step) => vec![step],
                None => OnboardingStep::ALL.to_vec(),
            };
            for step in steps {
                print_rules(&engine, step);
            }
            println!(
                "field validation debounce: {}ms, success message shown for {}ms",
                config.session.debounce_ms, config.session.success_display_ms
            );
            Ok(ExitCode::SUCCESS)
        }
        Commands::Advance { state: path, write } => {
            let state = load_state(&path).await?;
            let mut store = OnboardingStore::from_state(state, Arc::new(engine));
            let from = store.current_step();

            let code = match store.advance() {
                Ok(to) => {
                    println!("{from} -> {to}");
                    ExitCode::SUCCESS
                }
                Err(SessionError::StepBlocked { step, blocking }) => {
                    println!("{step} is blocked by {blocking} error(s):");
                    print_error_map(&store);
                    ExitCode::FAILURE
                }
                Err(e @ SessionError::SubmitRejected { .. }) => {
                    println!("{e}");
                    print_error_map(&store);
                    ExitCode::FAILURE
                }
                Err(e) => return Err(e).context("advance failed"),
            };

            if write {
                save_state(&path, &store.into_state()).await?;
                tracing::info!(path = %path.display(), "State written");
            }
            Ok(code)
        }
    }
}

async fn load_state(path: &Path) -> anyhow::Result<EnhancedOnboardingState> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read state {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid state file {}", path.display()))
}

async fn save_state(path: &Path, state: &EnhancedOnboardingState) -> anyhow::Result<()> {
    let mut text = serde_json::to_string_pretty(state)?;
    text.push('\n');
    tokio::fs::write(path, text)
        .await
        .with_context(|| format!("failed to write state {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_rules(engine: &ValidationEngine, step: OnboardingStep) {
    match engine.rules().get(step) {
        Some(StepRules::Fields(fields)) if !fields.is_empty() => {
            println!("{step}:");
            for rule in fields {
                let validators: Vec<&str> = rule.validators.iter().map(Validator::name).collect();
                println!(
                    "  {:<16} {:<9} {:<8} {}",
                    rule.field,
                    if rule.required { "required" } else { "optional" },
                    rule.priority,
                    validators.join(", ")
                );
            }
        }
        Some(StepRules::Composite(members)) => {
            let members: Vec<&str> = members.iter().copied().map(OnboardingStep::as_str).collect();
            println!("{step}: all of {}", members.join(", "));
        }
        _ => println!("{step}: no rules"),
    }
}

fn print_error_map(store: &OnboardingStore) {
    for (field, messages) in store.errors() {
        for message in messages {
            println!("  {field}: {message}");
        }
    }
}

fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
