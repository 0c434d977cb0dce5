use std::path::PathBuf;

use clap::Subcommand;

use nodedash::model::ModelType;

mod cli_exec;
mod cli_runtime;

#[derive(Subcommand)]
enum Commands {
    /// List nodes and the models each one serves
    Nodes {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// List images available for inference
    Images {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Train a new model on a node
    Train {
        /// Name for the new model
        #[arg(long)]
        model_name: String,
        /// Node to train on (defaults to the first node)
        #[arg(long)]
        node: Option<String>,
        /// Base architecture
        #[arg(long, default_value = "mobilenet")]
        model_type: ModelType,
        #[arg(long, default_value_t = 1)]
        epochs: u32,
        #[arg(long, default_value_t = 32)]
        batch_size: u32,
        #[arg(long, default_value_t = 0.001)]
        learning_rate: f64,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify an image with a node's model
    Infer {
        /// Image path as listed by `nodedash images`
        #[arg(long)]
        image: String,
        /// Node to run on (defaults to the first node)
        #[arg(long)]
        node: Option<String>,
        /// Model to use (defaults to the node's first model)
        #[arg(long)]
        model: Option<String>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Download an image for local viewing
    Preview {
        #[arg(long)]
        image: String,
        /// Where to write the bytes
        #[arg(long)]
        out: PathBuf,
    },

    /// Show the report a node keeps for one of its models
    Report {
        #[arg(long)]
        node: String,
        /// Model name
        #[arg(long)]
        name: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    if let Err(err) = cli_runtime::run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
