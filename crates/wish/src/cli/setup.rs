use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use wishapp::model::WishFilter;

/// Returns the version string, including git hash and commit date for non-release builds.
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "wish",
    bin_name = "wish",
    version = get_version(),
    disable_help_subcommand = true
)]
#[command(about = "Keep a wishlist, optionally shared across devices", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Use this directory for local data instead of the default
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List wishes (default)
    #[command(alias = "ls", display_order = 1)]
    List {
        /// Which wishes to show
        #[arg(short, long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,
    },

    /// Add a wish
    #[command(alias = "a", display_order = 2)]
    Add {
        /// Category (defaults to "General")
        #[arg(short, long)]
        category: Option<String>,

        /// Wish text (words are joined with spaces)
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Toggle a wish's completed flag
    #[command(display_order = 3)]
    Done {
        /// Position in the list or id prefix
        selector: String,
    },

    /// Toggle a wish's priority flag
    #[command(display_order = 4)]
    Star {
        /// Position in the list or id prefix
        selector: String,
    },

    /// Remove a wish
    #[command(alias = "rm", display_order = 5)]
    Remove {
        /// Position in the list or id prefix
        selector: String,
    },

    /// Show categories and how many wishes each holds
    #[command(alias = "cats", display_order = 6)]
    Categories,

    /// Share the list with other devices
    #[command(display_order = 7)]
    Sync {
        #[command(subcommand)]
        action: SyncAction,
    },

    /// Keep pulling from the remote and re-render on change, until Ctrl-C
    #[command(display_order = 8)]
    Watch {
        /// Which wishes to show
        #[arg(short, long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,
    },
}

#[derive(Subcommand, Debug)]
pub enum SyncAction {
    /// Generate a new sync code and upload this list to it
    Create,
    /// Join an existing sync code (replaces the local list)
    Join { code: String },
    /// Fetch the shared list now
    Pull,
    /// Upload this list now
    Push,
    /// Show the remote mode and sync code
    Status,
    /// Stop syncing; keep the local list
    Leave,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    All,
    Pending,
    Completed,
    Priority,
}

impl From<FilterArg> for WishFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => WishFilter::All,
            FilterArg::Pending => WishFilter::Pending,
            FilterArg::Completed => WishFilter::Completed,
            FilterArg::Priority => WishFilter::Priority,
        }
    }
}
