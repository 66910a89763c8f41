//! CLI definitions for QuizLens.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// QuizLens CLI.
#[derive(Parser)]
#[command(name = "quizlens")]
#[command(about = "AI answer suggestions for quiz pages")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the analysis proxy
    Serve {
        /// Server host (overrides [server].host)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides [server].port)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Ask the proxy about one question and print the JSON result
    Ask {
        /// Question text
        #[arg(short, long)]
        question: String,

        /// Answer choice, in display order (repeatable)
        #[arg(short, long = "answer", required = true)]
        answers: Vec<String>,

        /// Also request the explanation (fast pass, then deep pass)
        #[arg(long)]
        deep: bool,

        /// Proxy URL (overrides [client].proxy_url and AI_PROXY_URL)
        #[arg(long, env = "QUIZLENS_PROXY_URL")]
        proxy_url: Option<String>,
    },

    /// Run the suggestion engine against a JSON page description
    Watch {
        /// Page description file; edits are picked up as page mutations
        #[arg(short, long)]
        page: PathBuf,

        /// Proxy URL (overrides [client].proxy_url and AI_PROXY_URL)
        #[arg(long, env = "QUIZLENS_PROXY_URL")]
        proxy_url: Option<String>,
    },
}
