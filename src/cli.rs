use crate::tools::ExportFormat;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "docindex-mcp", version)]
#[command(about = "Read static documentation search indexes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the MCP server on stdio (default)
    Serve,
    /// Check an index's structure; exits non-zero when errors are found
    Validate {
        path: String,
        /// Treat unrecognized categories as errors
        #[arg(long)]
        strict: bool,
    },
    /// Summarize entries, pages and categories
    Stats { path: String },
    /// List pages in generation order
    Pages { path: String },
    /// List entries, optionally filtered
    List {
        path: String,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        page: Option<String>,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Show all entries at an exact location
    Show { path: String, location: String },
    /// Re-serialize an index
    Export {
        path: String,
        #[arg(short, long, default_value = "js")]
        format: ExportFormat,
    },
    /// Find search_index.js files under a directory
    Discover { root: String },
}
