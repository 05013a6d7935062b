use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "ziptext")]
#[command(version)]
#[command(about = "A text viewer for ZIP archives and the files beside them", long_about = None)]
#[command(after_help = "Examples:\n  \
  ziptext notes.zip              browse text entries of notes.zip interactively\n  \
  ziptext -l notes.zip           list qualifying entries and exit\n  \
  ziptext notes.zip docs/a.md    print one entry to stdout and exit\n  \
  ziptext report_v2.sql          browse the sibling .sql files of report_v2.sql\n  \
  ziptext --save-extensions txt,md,log   persist a new extension allow-list")]
pub struct Cli {
    /// ZIP archive or text file to open
    #[arg(value_name = "FILE", required_unless_present = "save_extensions")]
    pub file: Option<String>,

    /// Entry to print to stdout (non-interactive)
    #[arg(value_name = "ENTRY")]
    pub entry: Option<String>,

    /// List entries (one name per line)
    #[arg(short = 'l')]
    pub list: bool,

    /// List verbosely (timestamp and kind per entry)
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Show directory entries of the archive
    #[arg(short = 'd', long = "dirs")]
    pub show_dirs: bool,

    /// Extension allow-list for this run (comma-separated, overrides config)
    #[arg(short = 'x', long = "extensions", value_name = "LIST")]
    pub extensions: Option<String>,

    /// Persist a new extension allow-list and exit
    #[arg(long = "save-extensions", value_name = "LIST")]
    pub save_extensions: Option<String>,

    /// Quiet mode (suppress banners and prompts)
    #[arg(short = 'q')]
    pub quiet: bool,
}

impl Cli {
    /// One-shot mode: list or print, no interactive loop.
    pub fn is_one_shot(&self) -> bool {
        self.list || self.verbose || self.entry.is_some()
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet || self.entry.is_some()
    }
}
