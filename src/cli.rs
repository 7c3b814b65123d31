use clap::Parser;

use crate::zip::{DuplicatePolicy, LoadOptions};

#[derive(Parser, Debug)]
#[command(name = "zipmap")]
#[command(version)]
#[command(about = "A memory-mapped unzip utility", long_about = None)]
#[command(after_help = "Examples:\n  \
  zipmap data1.zip -x joe        extract all files except joe from data1.zip\n  \
  zipmap -p foo.zip | more       send contents of foo.zip via pipe into more\n  \
  zipmap -l archive.zip          list files in archive.zip")]
pub struct Cli {
    /// ZIP file path
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Files to extract (default: all)
    #[arg(value_name = "FILES")]
    pub files: Vec<String>,

    /// List files (short format)
    #[arg(short = 'l')]
    pub list: bool,

    /// List verbosely
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Display archive comment only
    #[arg(short = 'z')]
    pub comment: bool,

    /// Extract files to pipe, no messages
    #[arg(short = 'p')]
    pub pipe: bool,

    /// Extract files into exdir
    #[arg(short = 'd', value_name = "DIR")]
    pub extract_dir: Option<String>,

    /// Exclude files that follow
    #[arg(short = 'x', value_name = "FILE", num_args = 1..)]
    pub exclude: Vec<String>,

    /// Never overwrite existing files
    #[arg(short = 'n')]
    pub never_overwrite: bool,

    /// Overwrite files WITHOUT prompting
    #[arg(short = 'o')]
    pub overwrite: bool,

    /// Junk paths (do not make directories)
    #[arg(short = 'j')]
    pub junk_paths: bool,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,

    /// Read the archive into memory instead of mapping it
    #[arg(long)]
    pub no_mmap: bool,

    /// Fail on duplicate entry names instead of keeping the first
    #[arg(long)]
    pub strict: bool,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.pipe
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }

    /// Archive load settings selected on the command line.
    pub fn load_options(&self) -> LoadOptions {
        let duplicates = if self.strict {
            DuplicatePolicy::Error
        } else {
            DuplicatePolicy::FirstWins
        };
        LoadOptions::new()
            .use_mmap(!self.no_mmap)
            .duplicates(duplicates)
    }
}
