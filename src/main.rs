//! causeway CLI: causal inference over rule-based models.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use causeway::config::{SessionConfig, UnknownPolicy};
use causeway::graph::{Graph, GraphLiteral};
use causeway::input::read_json;
use causeway::model::Model;
use causeway::scenario::SignalingCascade;
use causeway::solver::Session;
use causeway::structure::Structure;
use causeway::z3::{Config, Context};

#[derive(Parser)]
#[command(name = "causeway", version, about = "Causal inference over rule-based models")]
struct Cli {
    /// Session config file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Per-check solver timeout in milliseconds.
    #[arg(long, global = true)]
    timeout_ms: Option<u32>,

    /// How to treat unknown solver results: "fail" or "assume_unsat".
    #[arg(long, global = true)]
    unknown_policy: Option<UnknownPolicy>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the RAF/MEK1/ERK1 signaling-cascade candidates.
    Demo {
        /// Print reports as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Check whether a structure holds in a concrete graph.
    Match {
        /// Graph literal (JSON).
        #[arg(long)]
        graph: PathBuf,

        /// Structure (JSON).
        #[arg(long)]
        structure: PathBuf,
    },

    /// Print the effective session configuration as TOML.
    Config,
}

#[derive(Serialize)]
struct DemoRow<'a> {
    name: &'a str,
    description: &'a str,
    #[serde(flatten)]
    report: causeway::causal::InferenceReport,
    candidate: bool,
    candidate_unique: bool,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = Some(timeout_ms);
    }
    if let Some(policy) = cli.unknown_policy {
        config.unknown_policy = policy;
    }
    config.validate()?;

    match cli.command {
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
        }

        Commands::Demo { json } => {
            let ctx = Context::new(&Config::new());
            let session = Session::new(&ctx, config)?;
            let model = Model::from_config(&session, "cascade");
            let cascade = SignalingCascade::new();

            let mut rows = Vec::new();
            for candidate in cascade.candidates(&session, &model)? {
                let report = candidate.query.report(&session)?;
                rows.push(DemoRow {
                    name: candidate.name,
                    description: candidate.description,
                    report,
                    candidate: report.is_candidate(),
                    candidate_unique: report.is_candidate_unique(),
                });
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&rows).into_diagnostic()?);
            } else {
                println!("context:   RAF bound to HRAS{{GTP}} phosphorylates MEK1");
                println!("statement: ERK1 ends up phosphorylated");
                println!();
                println!(
                    "{:<26} {:>8} {:>9} {:>11} {:>7}  verdict",
                    "candidate", "explains", "not-false", "not-vacuous", "unique"
                );
                for row in &rows {
                    let verdict = if row.candidate_unique {
                        "candidate unique inference"
                    } else if row.candidate {
                        "candidate inference"
                    } else {
                        "rejected"
                    };
                    println!(
                        "{:<26} {:>8} {:>9} {:>11} {:>7}  {verdict}",
                        row.name,
                        mark(row.report.explains),
                        mark(row.report.not_false),
                        mark(row.report.not_vacuous),
                        mark(row.report.unique),
                    );
                }
            }
        }

        Commands::Match { graph, structure } => {
            let literal: GraphLiteral = read_json(&graph)?;
            let structure: Structure = read_json(&structure)?;

            let ctx = Context::new(&Config::new());
            let session = Session::new(&ctx, config)?;
            let encoded = Graph::from_literal(&session, &literal);
            let formula = structure.holds_in(&encoded, &session)?;
            let holds = session.check_sat(&formula)?;

            println!(
                "{structure} ({} agents) {} in graph ({} nodes)",
                structure.agent_count(),
                if holds { "holds" } else { "does not hold" },
                literal.node_count()
            );
        }
    }

    Ok(())
}

fn mark(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
