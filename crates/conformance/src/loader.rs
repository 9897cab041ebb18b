//! Fixture discovery and parsing.
//!
//! Discovery walks the corpus root recursively and returns every `*.json`
//! file in lexicographic path order, so two runs over the same corpus see
//! the same cases in the same order. A file that cannot be parsed aborts
//! the load with the file's path and the parser's message.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConformanceError, Result};
use crate::fixture::Fixture;

const FIXTURE_EXTENSION: &str = "json";

/// Every fixture file under `corpus`, sorted.
pub fn discover(corpus: &Path) -> Result<Vec<PathBuf>> {
    if !corpus.is_dir() {
        return Err(ConformanceError::CorpusNotFound {
            path: corpus.to_path_buf(),
        });
    }
    let mut files = Vec::new();
    walk(corpus, &mut files)?;
    files.sort();
    debug!(target: "crudcheck::loader", corpus = %corpus.display(), count = files.len(), "Discovered fixtures");
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        // Symlinked directories are not followed.
        if entry.file_type()?.is_dir() {
            walk(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == FIXTURE_EXTENSION) {
            files.push(path);
        }
    }
    Ok(())
}

/// Parse fixture text. `filename` is recorded on the fixture and used in
/// error messages.
pub fn load_fixture_str(filename: &str, content: &str) -> Result<Fixture> {
    let mut fixture: Fixture =
        serde_json::from_str(content).map_err(|e| ConformanceError::malformed(filename, e))?;
    fixture.filename = filename.to_string();
    Ok(fixture)
}

/// Read and parse one fixture file. The recorded filename is `path`
/// relative to `corpus`.
pub fn load_fixture(corpus: &Path, path: &Path) -> Result<Fixture> {
    let filename = relative_name(corpus, path);
    let content = fs::read_to_string(path).map_err(|e| ConformanceError::malformed(path, e))?;
    let mut fixture: Fixture =
        serde_json::from_str(&content).map_err(|e| ConformanceError::malformed(path, e))?;
    fixture.filename = filename;
    debug!(target: "crudcheck::loader", file = %fixture.filename, cases = fixture.tests.len(), "Loaded fixture");
    Ok(fixture)
}

/// Discover and parse every fixture under `corpus`.
///
/// Stops at the first malformed file.
pub fn load_corpus(corpus: &Path) -> Result<Vec<Fixture>> {
    let fixtures = discover(corpus)?
        .iter()
        .map(|path| load_fixture(corpus, path))
        .collect::<Result<Vec<_>>>()?;
    info!(target: "crudcheck::loader", corpus = %corpus.display(), fixtures = fixtures.len(), "Loaded corpus");
    Ok(fixtures)
}

fn relative_name(corpus: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(corpus).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
