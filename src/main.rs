mod commands;
mod config;
mod context;
mod livediff;
mod output;
mod stack;
mod traits;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{DiffCommand, PreviewCommand, PreviewFormat, PreviewSide};
use config::LiveDiffConfig;
use context::Context;
use std::path::Path;
use traits::RealFileSystem;

#[derive(Parser)]
#[command(name = "kusion-livediff")]
#[command(about = "Live diff between the runtime status and the desired spec of a Kusion stack", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to <config dir>/kusion-livediff/config.yaml)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Preview tool to run, overriding the config file
    #[arg(long, global = true, env = "KUSION_BIN")]
    kusion_bin: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the runtime status of a stack against its spec
    Diff {
        /// Path to the stack directory (defaults to current directory)
        #[arg(short, long)]
        path: Option<String>,

        /// Stack name (defaults to the name in stack.yaml)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Print the runtime and spec snapshots of a stack
    Preview {
        /// Path to the stack directory (defaults to current directory)
        #[arg(short, long)]
        path: Option<String>,

        /// Stack name (defaults to the name in stack.yaml)
        #[arg(short, long)]
        name: Option<String>,

        /// Snapshot to print
        #[arg(long, value_enum, default_value_t = PreviewSide::All)]
        side: PreviewSide,

        /// Output format
        #[arg(long, value_enum, default_value_t = PreviewFormat::Yaml)]
        format: PreviewFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = LiveDiffConfig::load(&RealFileSystem, cli.config.as_deref().map(Path::new))?;
    if let Some(bin) = cli.kusion_bin {
        config.preview_command = bin;
    }

    let ctx = Context::new(config);

    let result = match cli.command {
        Commands::Diff { path, name } => {
            DiffCommand::execute(&ctx, path.as_deref(), name.as_deref())
        }
        Commands::Preview {
            path,
            name,
            side,
            format,
        } => PreviewCommand::execute(&ctx, path.as_deref(), name.as_deref(), side, format),
    };

    if let Err(e) = &result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
