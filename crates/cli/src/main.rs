use anyhow::Result;
use clap::{Parser, Subcommand};
use moldcast::api::{IntegerKernel, RobustKernel};
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;

mod commands;
mod provenance;

use commands::{Backend, Coord, Opts};

#[derive(Parser)]
#[command(name = "moldcast")]
#[command(about = "Top edges and pullout directions of single-mold castings")]
struct Cmd {
    /// Use the exact integer kernel (inputs must have integer coordinates)
    #[arg(long, global = true)]
    exact: bool,

    /// Check simplicity and non-degeneracy before analysis
    #[arg(long, global = true)]
    validate: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// List all top edges of a polygon with their pullout ranges
    Analyze {
        #[arg(long)]
        input: PathBuf,
        /// Print JSON instead of the plain listing
        #[arg(long)]
        json: bool,
    },
    /// Print the unique top edge for one pullout direction
    Lookup {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        dx: String,
        #[arg(long, allow_hyphen_values = true)]
        dy: String,
    },
    /// Compare case files against their expected top edges
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Analyze many polygons into one CSV (+ provenance sidecar)
    Batch {
        #[arg(long, num_args = 1.., required = true)]
        inputs: Vec<PathBuf>,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a provenance JSON block, optionally summarizing a batch CSV
    Report {
        #[arg(long)]
        from: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    let opts = Opts {
        validate: cmd.validate,
    };
    if cmd.exact {
        dispatch::<i64, IntegerKernel>(cmd.action, opts)
    } else {
        dispatch::<f64, RobustKernel>(cmd.action, opts)
    }
}

fn dispatch<T: Coord, K: Backend<T>>(action: Action, opts: Opts) -> Result<()> {
    tracing::debug!(kernel = K::NAME, validate = opts.validate, "dispatch");
    match action {
        Action::Analyze { input, json } => commands::analyze::<T, K>(&input, json, opts),
        Action::Lookup { input, dx, dy } => commands::lookup::<T, K>(&input, &dx, &dy, opts),
        Action::Check { files } => commands::check::<T, K>(&files, opts),
        Action::Batch { inputs, out } => {
            commands::batch::<T, K>(&inputs, &out, opts).map(|_| ())
        }
        Action::Report { from } => report(from),
    }
}

fn report(from: Option<PathBuf>) -> Result<()> {
    let summary = match &from {
        Some(csv) => Some(commands::summarize_batch(csv)?),
        None => None,
    };
    let params = serde_json::json!({ "from": from, "summary": summary });
    let doc = provenance::provenance_doc(&[], &provenance::Payload::new(params));
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
