// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the quire command-line interface.
//!
//! Two subcommands, both of which index the given document files first:
//! `search` runs a query and prints ranked results with snippets, and `stats`
//! prints what the engine knows about the documents afterwards.

pub mod display;
pub mod load;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "quire",
    about = "Full-text search over parsed documents, with fuzzy matching and highlighting",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Index document files and search them
    Search {
        /// Document JSON files (id, title, content, structure)
        #[arg(required = true)]
        documents: Vec<PathBuf>,

        /// Search query
        #[arg(short, long)]
        query: String,

        /// Match case exactly
        #[arg(long)]
        case_sensitive: bool,

        /// Only match whole tokens, never inside larger words
        #[arg(long)]
        whole_words: bool,

        /// Only report occurrences inside headings
        #[arg(long)]
        headings_only: bool,

        /// Maximum number of results to return
        #[arg(short = 'n', long, default_value = "20")]
        max_results: usize,

        /// Snippet context in characters, split around the match
        #[arg(short, long, default_value = "80", allow_hyphen_values = true)]
        context: i64,

        /// Search only this document id (default: every document given)
        #[arg(long)]
        current: Option<u32>,

        /// Print results as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Engine config file (JSON, camelCase keys)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Index document files and print registry, index and timing statistics
    Stats {
        /// Document JSON files
        #[arg(required = true)]
        documents: Vec<PathBuf>,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,

        /// Engine config file (JSON, camelCase keys)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}
