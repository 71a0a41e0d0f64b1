// src/cli/args.rs
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Base URL of the notes API, overrides the config file
    #[arg(short, long, value_name = "URL", env = "NOTESHARE_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Path to config file (optional)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List all notes
    List {
        /// Output notes as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a note
    Create {
        #[arg(short, long)]
        title: String,

        #[arg(short = 'm', long)]
        content: String,

        /// Output the created note as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit title and/or content of a note (full replace on the server)
    #[command(group(ArgGroup::new("fields").required(true).multiple(true).args(["title", "content"])))]
    Edit {
        #[arg(value_name = "NOTE_ID")]
        note_id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short = 'm', long)]
        content: Option<String>,
    },

    /// Delete a note
    Delete {
        #[arg(value_name = "NOTE_ID")]
        note_id: String,
    },

    /// Create a public link for a note
    Share {
        #[arg(value_name = "NOTE_ID")]
        note_id: String,
    },

    /// Show a note someone shared, by token or share URL
    Shared {
        #[arg(value_name = "TOKEN_OR_URL")]
        token: String,

        /// Output the note as JSON
        #[arg(long)]
        json: bool,
    },
}
