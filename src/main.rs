use anyhow::Context;
use clap::{Parser, Subcommand};
use fieldsense_core::{FieldRule, FieldSignals, FieldType};
use fieldsense_engine::{EngineConfig, FieldEngine, NoGenerativeService};
use fieldsense_storage::FileStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

/// Classify form fields from the text around them
#[derive(Parser, Debug)]
#[command(name = "fieldsense")]
#[command(about = "Form field classifier with a learning loop", long_about = None)]
struct Args {
    /// Directory holding learned entries and rules
    #[arg(short, long, default_value = "./data", global = true)]
    data_dir: PathBuf,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify one field
    Classify {
        /// Visible label text
        label: Vec<String>,

        /// Attribute text such as name, id or placeholder (repeatable)
        #[arg(short, long)]
        attr: Vec<String>,

        /// Surrounding context such as a section heading (repeatable)
        #[arg(short = 'x', long)]
        context: Vec<String>,

        /// Print every prototype score instead of one result
        #[arg(long)]
        scores: bool,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a confirmed signal to type mapping
    Learn {
        signals: String,
        field_type: FieldType,
    },

    /// List learned entries, oldest first
    Entries {
        #[arg(long)]
        json: bool,
    },

    /// Delete all learned entries
    Clear,

    /// Import field rules and rebuild learned entries from them
    Retrain {
        /// JSON file with an array of rules
        #[arg(long)]
        rules: PathBuf,
    },

    /// Classify the bundled samples and report accuracy
    Evaluate {
        #[arg(long)]
        json: bool,
    },

    /// Bundled dataset statistics
    Stats {
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    debug!("Data directory: {:?}", args.data_dir);

    let store = Arc::new(FileStore::new(&args.data_dir)?);
    let engine = FieldEngine::new(store, Arc::new(NoGenerativeService), config)?;

    match args.command {
        Command::Classify {
            label,
            attr,
            context,
            scores,
            json,
        } => {
            let primary = if label.is_empty() {
                Vec::new()
            } else {
                vec![label.join(" ")]
            };
            let signals = FieldSignals::new(primary, attr, context);
            if scores {
                for (field_type, score) in engine.scores(&signals).await {
                    println!("{:<20} {:.3}", field_type, score);
                }
            } else {
                match engine.classify(&signals).await {
                    Some(result) if json => println!("{}", serde_json::to_string_pretty(&result)?),
                    Some(result) => println!(
                        "{} {:.3} ({:?})",
                        result.field_type, result.confidence, result.source
                    ),
                    None => anyhow::bail!("no usable signal text"),
                }
            }
        }
        Command::Learn {
            signals,
            field_type,
        } => {
            let signals = FieldSignals::from_primary(signals);
            if !engine.record_learned_mapping(&signals, field_type).await {
                anyhow::bail!("nothing stored for {:?}", signals.signal_text());
            }
            println!("{} -> {}", signals.signal_text(), field_type);
        }
        Command::Entries { json } => {
            let entries = engine.learned_entries().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for entry in entries {
                    println!("{:<20} {}", entry.field_type, entry.normalized_signals);
                }
            }
        }
        Command::Clear => {
            engine.clear_learned().await;
            println!("Learned entries cleared");
        }
        Command::Retrain { rules } => {
            let text = tokio::fs::read_to_string(&rules)
                .await
                .with_context(|| format!("failed to read {}", rules.display()))?;
            let rules: Vec<FieldRule> =
                serde_json::from_str(&text).context("rules file is not a JSON array of rules")?;
            let imported = engine.import_rules(&rules).await?;
            println!("Imported {} of {} rules", imported, rules.len());
        }
        Command::Evaluate { json } => {
            let report = engine.evaluate().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "accuracy {:.3} ({}/{}), confident {}",
                    report.accuracy(),
                    report.overall.correct,
                    report.overall.total,
                    report.confident
                );
                for (difficulty, tally) in &report.by_difficulty {
                    println!(
                        "  {:<8} {:.3} ({}/{})",
                        format!("{:?}", difficulty),
                        tally.accuracy(),
                        tally.correct,
                        tally.total
                    );
                }
                for miss in &report.misses {
                    let predicted = miss
                        .predicted
                        .map(|t| t.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "  miss {:?}: expected {}, got {} ({:.3})",
                        miss.text, miss.expected, predicted, miss.confidence
                    );
                }
            }
        }
        Command::Stats { json } => {
            let stats = engine.dataset_stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{} samples", stats.total);
                for (category, count) in &stats.by_category {
                    println!("  {:<10} {}", category, count);
                }
            }
        }
    }

    engine.shutdown().await;
    Ok(())
}
