//! Onboarding question CLI
//!
//! # Usage
//!
//! ```bash
//! # Translate against a name fixture
//! ob-nlq translate "Which customers should provide Passport?" --names demos/names.yaml
//!
//! # Translate against the live database (feature `database`)
//! ob-nlq translate "How many documents has Ramesh Sharma submitted?"
//!
//! # Translate and execute (feature `database`)
//! ob-nlq --format json run "Show all customers"
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use ob_nlq::config::NlqConfig;
use ob_nlq::reference::{InMemoryReferenceSource, ReferenceSource};
use ob_nlq::translator::{translate_with_resolver, TranslatedQuery, TranslationParts};

#[derive(Parser)]
#[command(name = "ob-nlq")]
#[command(version = "0.1.0")]
#[command(about = "Translate onboarding questions into parameterized SQL")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: json or pretty (default)
    #[arg(long, short = 'o', global = true, default_value = "pretty", value_enum)]
    format: OutputFormat,

    /// YAML config file (defaults come from the environment)
    #[arg(long, short, global = true, env = "OB_NLQ_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a question without executing it
    Translate {
        question: String,

        /// YAML fixture with customers, processes and document_types lists
        #[arg(long)]
        names: Option<PathBuf>,
    },

    /// Translate, validate and execute a question
    #[cfg(feature = "database")]
    Run { question: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match NlqConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => return report(Err(e.into()), cli.format),
        },
        None => NlqConfig::from_env(),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Translate { question, names } => {
            cmd_translate(&question, names, &config, cli.format).await
        }
        #[cfg(feature = "database")]
        Commands::Run { question } => cmd_run(&question, &config, cli.format).await,
    };

    report(result, cli.format)
}

fn report(result: Result<()>, format: OutputFormat) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            if format == OutputFormat::Json {
                println!("{}", serde_json::json!({ "error": format!("{:#}", e) }));
            } else {
                eprintln!("{}: {:#}", "error".red().bold(), e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn reference_source(
    names: Option<PathBuf>,
    config: &NlqConfig,
) -> Result<Box<dyn ReferenceSource>> {
    if let Some(path) = names {
        let source = InMemoryReferenceSource::from_yaml_file(&path)
            .with_context(|| format!("loading name fixture {}", path.display()))?;
        return Ok(Box::new(source));
    }

    #[cfg(feature = "database")]
    {
        let pool = config
            .database
            .connect()
            .await
            .context("connecting to reference database")?;
        Ok(Box::new(ob_nlq::reference::PgReferenceSource::new(pool)))
    }

    #[cfg(not(feature = "database"))]
    {
        let _ = config;
        anyhow::bail!("no --names fixture given and database support is not compiled in")
    }
}

async fn cmd_translate(
    question: &str,
    names: Option<PathBuf>,
    config: &NlqConfig,
    format: OutputFormat,
) -> Result<()> {
    let source = reference_source(names, config).await?;
    let result = translate_with_resolver(question, source.as_ref(), &config.entity_resolver()).await;

    match format {
        OutputFormat::Json => {
            let output = match &result {
                Ok(query) => serde_json::to_value(query),
                Err(_) => serde_json::to_value(TranslationParts::from(result.clone())),
            }?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Pretty => match &result {
            Ok(query) => print_translation(query),
            Err(e) => println!("{} {}", "NO MATCH".yellow().bold(), e),
        },
    }
    Ok(())
}

fn print_translation(query: &TranslatedQuery) {
    println!("{} {:?}", "OK".green().bold(), query.intent);
    println!();
    println!("{}:", "SQL".cyan().bold());
    for line in query.sql().lines() {
        println!("  {}", line);
    }
    if !query.params().is_empty() {
        println!();
        println!("{}:", "Params".cyan().bold());
        for (i, param) in query.params().iter().enumerate() {
            println!("  ${} = {:?}", i + 1, param);
        }
    }
}

#[cfg(feature = "database")]
async fn cmd_run(question: &str, config: &NlqConfig, format: OutputFormat) -> Result<()> {
    use ob_nlq::executor::QueryExecutor;

    let pool = config
        .database
        .connect()
        .await
        .context("connecting to database")?;
    let executor = QueryExecutor::new(pool, config.entity_resolver());
    let response = executor.run(question).await;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Pretty => {
            if let Some(message) = &response.message {
                println!("{} {}", "FAILED".red().bold(), message);
            } else {
                println!("{} {} row(s)", "OK".green().bold(), response.rows.len());
                for row in &response.rows {
                    println!("  {}", row.to_string().dimmed());
                }
            }
        }
    }
    Ok(())
}
