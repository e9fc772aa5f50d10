use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format for releases: "v0.3.0"
/// Format for dev builds: "v0.3.0\ndev: abc1234 2024-01-15 14:30"
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "staticpages",
    bin_name = "staticpages",
    version = get_version(),
    disable_help_subcommand = true
)]
#[command(about = "Localized static pages with a navigation tree", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Store directory (overrides config and STATICPAGES_DATA_DIR)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Config file (defaults to ./staticpages.toml when present)
    #[arg(long, global = true, value_name = "FILE", help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List pages that render in a locale
    #[command(alias = "ls")]
    List {
        theme: String,

        /// Display locale (defaults to the default locale)
        #[arg(long)]
        locale: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Show one page
    Show {
        theme: String,

        file_name: String,

        /// Display locale (defaults to the default locale)
        #[arg(long)]
        locale: Option<String>,

        /// Load as for display: require the locale's translation, compose documents
        #[arg(long)]
        frontend: bool,

        #[arg(long)]
        json: bool,
    },

    /// Print the navigation tree
    Tree {
        theme: String,

        #[arg(long)]
        json: bool,
    },

    /// Create a page, or update one with --file-name, from a JSON document
    Save {
        theme: String,

        /// Page document: { parent, view_bag, markup, placeholders, translations }
        input: PathBuf,

        /// Existing page to update
        #[arg(long)]
        file_name: Option<String>,
    },

    /// Delete a page and every page below it
    #[command(alias = "rm")]
    Delete { theme: String, file_name: String },

    /// Repair the tree index against the page rows
    Doctor { theme: String },
}
