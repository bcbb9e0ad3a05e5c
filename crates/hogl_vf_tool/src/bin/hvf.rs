//! # hvf
//!
//! Pack, inspect and edit HOGL virtual files.
//!
//! ```text
//! hvf pack assets.toml -o assets.hvf
//! hvf list assets.hvf
//! hvf extract assets.hvf shader.vert -o basic.vert
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use hogl_vf_tool::commands;
use hogl_vf_tool::ToolResult;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hvf")]
#[command(about = "Pack and inspect HOGL virtual files", long_about = None)]
struct Args {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a virtual file from a TOML manifest
    Pack {
        /// Manifest path
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print header fields and items
    List {
        /// Virtual file to inspect
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Write one item's payload to a file
    Extract {
        /// Virtual file to read
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Item name
        name: String,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Rename an item in place
    Rename {
        /// Virtual file to edit
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Item index
        index: usize,
        /// New item name
        new_name: String,
    },
    /// Change the name stride in place
    Restride {
        /// Virtual file to edit
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// New stride in bytes
        new_len: u32,
    },
    /// Convert a legacy-layout file to the current layout
    Upgrade {
        /// Legacy file
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Command) -> ToolResult<()> {
    match command {
        Command::Pack { manifest, output } => {
            let summary = commands::pack(&manifest, &output)?;
            println!(
                "packed {} items ({} data bytes) into {}",
                summary.items,
                summary.buffer_size,
                output.display()
            );
        }
        Command::List { file } => {
            commands::list(&file, &mut std::io::stdout().lock())?;
        }
        Command::Extract { file, name, output } => {
            let written = commands::extract(&file, &name, &output)?;
            println!("wrote {written} bytes to {}", output.display());
        }
        Command::Rename { file, index, new_name } => {
            commands::rename(&file, index, &new_name)?;
        }
        Command::Restride { file, new_len } => {
            commands::restride(&file, new_len)?;
        }
        Command::Upgrade { file, output } => {
            let items = commands::upgrade(&file, &output)?;
            println!("upgraded {items} items into {}", output.display());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("hvf: {e}");
            ExitCode::FAILURE
        }
    }
}
