pub mod segment;
pub mod ui;
pub mod video;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vidsearch")]
#[command(about = "Semantic search over spoken-word video transcripts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `vidsearch_core=trace` (RUST_LOG wins)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage and search the video database
    Video {
        #[command(subcommand)]
        command: VideoCommand,
    },
    /// Segment a cached transcript file and print the chunks
    Segment {
        /// Transcript JSON (as written to the transcript cache)
        transcript: PathBuf,

        /// Token budget per chunk (defaults to chunking.tokens_per_chunk)
        #[arg(long)]
        max_tokens: Option<usize>,
    },
}

#[derive(Subcommand)]
pub enum VideoCommand {
    /// Populate the database from the video catalog file
    Populate {
        /// Drop all stored videos first
        #[arg(long)]
        drop_db_first: bool,

        /// Catalog file (defaults to core.videos_file)
        #[arg(long, value_name = "FILE")]
        videos_file: Option<PathBuf>,
    },
    /// Find video passages using semantic search
    Search {
        query: String,

        /// Number of results (defaults to search.top_k)
        #[arg(long)]
        top: Option<usize>,
    },
    /// Fetch, segment and store one video
    Create {
        /// YouTube video id, the `v=` part of the URL
        #[arg(long)]
        id: String,

        #[arg(long)]
        title: String,

        /// Metadata as a JSON object
        #[arg(long, default_value = "{}")]
        meta: String,
    },
    /// List stored videos
    List {
        #[arg(long)]
        limit: Option<usize>,

        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Show one stored video
    Get { video_id: u64 },
    /// Export stored videos to a catalog JSON file
    ExportAll {
        #[arg(long)]
        file_path: PathBuf,
    },
}
