use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use skein::completion::TextCompletion;
use skein::completion::human::HumanCompletion;
use skein::config::Settings;
use skein::consts::{INPUT_VARIABLE, default_settings_path};
use skein::context::ExecutionContext;
use skein::engine::{Engine, Orchestrator, RunState};
use skein::function::FunctionHandle;
use skein::prompts::samples::register_samples;
use skein::registry::FunctionRegistry;
use skein::{skills, telemetry};

#[derive(Debug, Clone, ValueEnum)]
enum Completion {
    /// Type completions at the terminal
    Human,
    /// No backend; prompt functions fail
    Off,
}

#[derive(Parser)]
#[command(name = "skein", version, about = "Thread one context through a pipeline of skills.")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Settings file (default: ~/.skein/settings.json)
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    /// Directory of prompt functions, overrides the settings file
    #[arg(long, global = true)]
    skills_dir: Option<PathBuf>,

    /// Backend for prompt functions
    #[arg(short, long, value_enum, default_value_t = Completion::Human, global = true)]
    completion: Completion,
}

#[derive(Subcommand)]
enum Command {
    /// List registered functions
    List,
    /// Run functions in order over one context
    Run {
        /// Function as Collection.Function (repeat to build a pipeline)
        #[arg(short, long = "function", required = true)]
        functions: Vec<FunctionHandle>,

        /// Value for the INPUT variable
        #[arg(short, long)]
        input: Option<String>,

        /// Extra variable as KEY=VALUE (repeatable)
        #[arg(long = "var", value_parser = parse_var)]
        vars: Vec<(String, String)>,

        /// Request cancellation after this many seconds
        #[arg(short, long)]
        timeout: Option<u64>,
    },
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if key.trim().is_empty() {
        return Err(format!("empty variable name in '{raw}'"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = match cli.settings.clone().or_else(default_settings_path) {
        Some(path) => Settings::load(&path)?,
        None => Settings::default(),
    };
    if let Some(dir) = cli.skills_dir.clone() {
        settings.skills_dir = Some(dir);
    }

    telemetry::init(&settings.log_filter)?;

    let registry = Arc::new(build_registry(&settings)?);

    match cli.command {
        Command::List => {
            print_functions(&registry);
            Ok(())
        }
        Command::Run {
            functions,
            input,
            vars,
            timeout,
        } => {
            let completion: Option<Arc<dyn TextCompletion>> = match cli.completion {
                Completion::Human => Some(Arc::new(HumanCompletion)),
                Completion::Off => None,
            };
            let mut orchestrator = Orchestrator::new(registry);
            if let Some(completion) = completion {
                orchestrator = orchestrator.with_completion(completion);
            }

            let mut context = ExecutionContext::from_variables(vars);
            if let Some(input) = input {
                context.set(INPUT_VARIABLE, input);
            }
            run_pipeline(&orchestrator, context, &functions, timeout).await
        }
    }
}

/// Registry lifecycle is owned here: filled once, then shared read-only.
fn build_registry(settings: &Settings) -> Result<FunctionRegistry> {
    let mut registry = FunctionRegistry::new();
    skills::register_builtin(&mut registry, settings)?;
    register_samples(&mut registry, settings.skills.as_deref())?;
    if let Some(dir) = &settings.skills_dir {
        registry.load_semantic_skills(dir, settings.skills.as_deref(), &settings.completion)?;
    }
    Ok(registry)
}

async fn run_pipeline(
    orchestrator: &Orchestrator,
    context: ExecutionContext,
    functions: &[FunctionHandle],
    timeout: Option<u64>,
) -> Result<()> {
    // Ctrl+C or the timeout cancels the run between steps, not the process
    let cancel = context.cancel_handle();
    let watcher = tokio::spawn(async move {
        let deadline = async {
            match timeout {
                Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => eprintln!("\ninterrupted"),
            _ = deadline => tracing::warn!(seconds = ?timeout, "timeout reached, cancelling"),
        }
        cancel.cancel();
    });

    let result = orchestrator.run(context, functions).await;
    watcher.abort();
    let context = result?;

    match context.outcome() {
        Ok(text) => println!("\n=> {}", text),
        Err(e) => return Err(e.clone().into()),
    }
    if RunState::settled(&context) == RunState::Cancelled {
        eprintln!("run cancelled before all steps finished");
    }
    Ok(())
}

fn print_functions(registry: &FunctionRegistry) {
    for descriptor in registry.descriptors() {
        let kind = if registry.has_native(&descriptor.collection, &descriptor.name) {
            "native"
        } else {
            "semantic"
        };
        println!("{} [{}] {}", descriptor, kind, descriptor.description);
        for param in &descriptor.parameters {
            match &param.default_value {
                Some(default) if !default.is_empty() => println!(
                    "    ${}  {} (default: {})",
                    param.name, param.description, default
                ),
                _ => println!("    ${}  {}", param.name, param.description),
            }
        }
    }
}
