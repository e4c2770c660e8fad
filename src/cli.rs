use clap::Parser;
use std::path::PathBuf;

use crate::model::{Options, Selection};

/// Extract marked documentation blocks from source files as JSON Lines.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Emit function blocks only
    #[arg(short = 'f', long, overrides_with = "generic")]
    pub functions: bool,
    /// Emit generic blocks only
    #[arg(short = 'g', long, overrides_with = "functions")]
    pub generic: bool,
    /// Write records to FILE instead of standard output
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,
    /// Filetype for inputs whose extension is missing or unrecognised
    #[arg(short = 't', long = "type", value_name = "FILETYPE")]
    pub filetype: Option<String>,
    /// Show debug diagnostics
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,
    /// Only report errors
    #[arg(short, long)]
    pub quiet: bool,
    /// Input files, processed in order (`-` reads standard input)
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,
}

impl Cli {
    pub fn selection(&self) -> Selection {
        match (self.functions, self.generic) {
            (true, _) => Selection::Functions,
            (_, true) => Selection::Generic,
            _ => Selection::All,
        }
    }

    pub fn options(&self) -> Options {
        Options {
            files: self.files.clone(),
            default_filetype: self.filetype.clone(),
            selection: self.selection(),
        }
    }
}
