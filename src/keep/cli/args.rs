use clap::{Parser, Subcommand};

/// "0.4.0" for releases, "0.4.0@abc1234" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("KEEP_GIT_HASH");
    const IS_RELEASE: &str = env!("KEEP_IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{}", VERSION, GIT_HASH)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "keep", bin_name = "keep", version = get_version())]
#[command(about = "Keep short notes in fixed-size binary stores", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Operate on a group instead of the default store
    #[arg(short, long, global = true, value_name = "GROUP")]
    pub group: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Save one or more notes
    #[command(visible_alias = "create", alias = "new")]
    Add {
        /// Note texts, one note each
        #[arg(required = true, num_args = 1..)]
        texts: Vec<String>,
    },

    /// Show notes by id
    Read {
        /// Ids of the notes (e.g. 1 3 5)
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// List all notes, newest first
    #[command(visible_alias = "ls", alias = "list")]
    All {
        /// Oldest first
        #[arg(long)]
        inc: bool,
    },

    /// Delete notes by id
    #[command(visible_alias = "rm", alias = "delete")]
    Forget {
        /// Ids of the notes (e.g. 1 3 5)
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Manage note groups
    Group {
        #[command(subcommand)]
        action: GroupCommands,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (file-ext, default-store, log-level)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Initialize the store directory (optional utility)
    Init,

    /// Check a store's header against its notes and fix the counts
    Doctor,
}

#[derive(Subcommand, Debug)]
pub enum GroupCommands {
    /// Create a group
    New {
        name: String,

        /// What the group is for
        #[arg(default_value = "")]
        description: String,
    },

    /// List groups
    #[command(alias = "list")]
    Ls,

    /// Show a group's details
    #[command(alias = "describe")]
    Desc { name: String },

    /// Delete a group and all of its notes
    #[command(alias = "delete")]
    Rm { name: String },
}
