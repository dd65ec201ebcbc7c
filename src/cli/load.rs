// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Reading document files for the CLI.
//!
//! Each file holds one `Document` as JSON. Files are parsed in parallel with a
//! progress bar (under the `parallel` feature). The engine gets a [`FileSource`]
//! so content evicted from its cache is re-read from the same file.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[cfg(feature = "parallel")]
use indicatif::{ProgressBar, ProgressStyle};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use quire::{DocId, Document, DocumentSource};

/// Parse one document file.
pub fn read_document(path: &Path) -> Result<Document, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_json::from_str::<Document>(&raw)
        .map_err(|e| format!("Invalid document JSON in {}: {}", path.display(), e))
}

#[cfg(feature = "parallel")]
fn create_progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {prefix:<12} [{bar:40.cyan/dim}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━━╸")
}

/// Parse every file, in input order. The first unreadable file fails the load.
///
/// Files sharing an id collapse to one entry: the later file's document, in the
/// earlier file's slot.
pub fn load_documents(paths: &[PathBuf]) -> Result<Vec<(PathBuf, Document)>, String> {
    #[cfg(feature = "parallel")]
    let loaded = {
        let progress = ProgressBar::new(paths.len() as u64);
        progress.set_style(create_progress_style());
        progress.set_prefix("Loading");
        progress.set_message("documents...");
        if !atty::is(atty::Stream::Stderr) {
            progress.set_draw_target(indicatif::ProgressDrawTarget::hidden());
        }
        let loaded = paths
            .par_iter()
            .map(|path| {
                let document = read_document(path);
                progress.inc(1);
                document.map(|document| (path.clone(), document))
            })
            .collect::<Result<Vec<_>, String>>();
        progress.finish_and_clear();
        loaded
    };
    #[cfg(not(feature = "parallel"))]
    let loaded = paths
        .iter()
        .map(|path| read_document(path).map(|document| (path.clone(), document)))
        .collect::<Result<Vec<_>, String>>();

    let mut slots: HashMap<DocId, usize> = HashMap::new();
    let mut unique: Vec<(PathBuf, Document)> = Vec::new();
    for (path, document) in loaded? {
        match slots.get(&document.id) {
            Some(&slot) => {
                tracing::warn!(
                    doc = %document.id,
                    "{} reuses the id of {}; the later file wins",
                    path.display(),
                    unique[slot].0.display()
                );
                unique[slot] = (path, document);
            }
            None => {
                slots.insert(document.id, unique.len());
                unique.push((path, document));
            }
        }
    }
    Ok(unique)
}

/// Document source backed by the files the documents came from.
#[derive(Debug, Default)]
pub struct FileSource {
    paths: RwLock<HashMap<DocId, PathBuf>>,
}

impl FileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, id: DocId, path: PathBuf) {
        self.paths.write().insert(id, path);
    }
}

impl DocumentSource for FileSource {
    fn load(&self, id: DocId) -> Option<Arc<Document>> {
        let path = self.paths.read().get(&id).cloned()?;
        match read_document(&path) {
            Ok(document) if document.id == id => Some(Arc::new(document)),
            Ok(document) => {
                tracing::warn!(
                    expected = %id,
                    found = %document.id,
                    "{} no longer holds the expected document",
                    path.display()
                );
                None
            }
            Err(err) => {
                tracing::warn!(doc = %id, "{}", err);
                None
            }
        }
    }
}
