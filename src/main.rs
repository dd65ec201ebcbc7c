// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use quire::{
    DocId, EngineConfig, IndexReport, SearchEngine, SearchOptions, SearchResult, SearchScope,
    Snippet, TabSet, INDEX_OPERATION, SEARCH_OPERATION,
};

mod cli;
use cli::display::*;
use cli::load::{load_documents, FileSource};
use cli::{Cli, Commands};

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Search {
            documents,
            query,
            case_sensitive,
            whole_words,
            headings_only,
            max_results,
            context,
            current,
            json,
            config,
        } => {
            let scope = if current.is_some() {
                SearchScope::CurrentDocument
            } else {
                SearchScope::AllOpenDocuments
            };
            let options = SearchOptions {
                case_sensitive,
                whole_words,
                headings_only,
                include_context: true,
                context_length: context,
                max_results,
                scope,
            };
            run_search(&documents, &query, &options, current.map(DocId), json, config.as_deref())
        }
        Commands::Stats {
            documents,
            json,
            config,
        } => run_stats(&documents, json, config.as_deref()),
    };

    if let Err(e) = outcome {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

/// Log to stderr. `QUIRE_LOG` wins over `RUST_LOG`; the default is warnings only.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("QUIRE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load config and documents, index everything.
fn build_engine(
    paths: &[PathBuf],
    config: Option<&Path>,
) -> Result<(SearchEngine, Vec<IndexReport>, Vec<DocId>)> {
    let config = match config {
        Some(path) => EngineConfig::from_json_file(path).map_err(anyhow::Error::msg)?,
        None => EngineConfig::default(),
    };
    let loaded = load_documents(paths)
        .map_err(anyhow::Error::msg)
        .context("loading documents")?;

    // One entry per id, so every id is indexed exactly once
    let source = Arc::new(FileSource::new());
    let mut ids = Vec::with_capacity(loaded.len());
    let mut documents = Vec::with_capacity(loaded.len());
    for (path, document) in loaded {
        source.register(document.id, path);
        ids.push(document.id);
        documents.push(document);
    }

    let engine = SearchEngine::new(config, source);
    let reports = engine.index_documents(documents);
    for report in &reports {
        if let quire::IndexStatus::Failed { reason } = &report.status {
            eprintln!("⚠️  document {} was not indexed: {}", report.id, reason);
        }
    }
    Ok((engine, reports, ids))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonHit<'a> {
    #[serde(flatten)]
    result: &'a SearchResult,
    title: String,
    snippet: Option<Snippet>,
}

fn run_search(
    paths: &[PathBuf],
    query: &str,
    options: &SearchOptions,
    current: Option<DocId>,
    json: bool,
    config: Option<&Path>,
) -> Result<()> {
    let (engine, _, ids) = build_engine(paths, config)?;
    let tabs = TabSet::new(current, ids);
    let results = engine.search(query, options, &tabs)?;

    let title_of = |id: DocId| {
        engine
            .registry()
            .get(id)
            .map(|entry| entry.title)
            .unwrap_or_else(|| format!("#{}", id))
    };
    let snippet_of = |result: &SearchResult| match engine.snippet(result, options) {
        Ok(snippet) => snippet.map(|s| (*s).clone()),
        Err(err) => {
            tracing::warn!("{}", err);
            None
        }
    };

    if json {
        let hits: Vec<JsonHit> = results
            .iter()
            .map(|result| JsonHit {
                result,
                title: title_of(result.doc_id),
                snippet: snippet_of(result),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    section_top(&format!("RESULTS \"{}\"", clip(query, 40)));
    if results.is_empty() {
        row(&themed(GRAY, &[], "  no matches"));
    }
    let (open, close) = highlight_markers();
    for (rank, result) in results.iter().enumerate() {
        row(&format!(
            " {:>3}. {} {} {} {} {}",
            rank + 1,
            score_value(result.score),
            pad_right(&element_label(result.position.element), 4),
            pad_right(&match_type_label(&result.match_type), 10),
            themed(GRAY, &[], &format!("L{:<4}", result.position.line)),
            clip(&title_of(result.doc_id), 36)
        ));
        if let Some(snippet) = snippet_of(result) {
            row(&format!("        {}", snippet.render(&open, &close)));
        }
    }
    if let Some(timing) = engine.history().summary(SEARCH_OPERATION) {
        section_mid("TIMING");
        row(&format!(" search {} ms", timing_ms(timing.last)));
    }
    section_bot();
    Ok(())
}

fn run_stats(paths: &[PathBuf], json: bool, config: Option<&Path>) -> Result<()> {
    let (engine, reports, _) = build_engine(paths, config)?;

    if json {
        let history: Vec<_> = engine
            .history()
            .operations()
            .into_iter()
            .map(|op| {
                let summary = engine.history().summary(&op);
                (op, summary)
            })
            .collect();
        let value = serde_json::json!({
            "documents": engine.registry().list(),
            "reports": reports,
            "engine": engine.stats(),
            "history": history,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    section_top("DOCUMENTS");
    for entry in engine.registry().list() {
        row(&format!(
            " {:>4}  {}  {}  {}  rev {}  {}",
            entry.id,
            pad_right(&clip(&entry.title, 28), 28),
            pad_left(&format_chars(entry.size), 12),
            pad_right(&status_label(&entry.status), 10),
            entry.revision,
            themed(GRAY, &[], &entry.indexed_at.format("%H:%M:%S").to_string())
        ));
    }

    let stats = engine.stats();
    section_mid("INDEX");
    row(&format!(
        " {} documents  {} terms  {} postings",
        stats.index.documents, stats.index.terms, stats.index.postings
    ));
    row(&format!(
        " content cache {}/{}  snippets {}",
        stats.cache.len,
        stats.cache.capacity,
        stats.cached_snippets
    ));

    section_mid("TIMING (ms)");
    if let Some(timing) = engine.history().summary(INDEX_OPERATION) {
        row(&format!(
            " index  n={:<3} avg {} min {} max {}",
            timing.count,
            timing_ms(timing.average),
            timing_ms(timing.min),
            timing_ms(timing.max)
        ));
    }
    section_bot();
    Ok(())
}
