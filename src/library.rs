use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::{debug, error, info};
use walkdir::WalkDir;

use crate::catalog::{self, Catalog};
use crate::config::ScanConfig;
use crate::models::MetadataRecord;
use crate::thumbnail::{self, PosterSource};
use crate::title;

/// Literal suffix check, so `movieXmp4` counts as a video just like `movie.mp4`.
pub fn is_video_file(name: &str, suffixes: &[String]) -> bool {
    suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
}

/// Every file below `root` whose name passes [`is_video_file`], in traversal order.
pub fn media_files(root: &Path, suffixes: &[String]) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(anyhow::anyhow!("Library directory does not exist: {:?}", root));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                error!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        // follows links: symlinked files count, symlinked directories do not
        if entry.path().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if is_video_file(&name, suffixes) {
            debug!("Found media file: {:?}", entry.path());
            files.push(entry.path().to_path_buf());
        }
    }

    Ok(files)
}

/// The output document: every record found so far, mirrored to disk.
#[derive(Debug)]
pub struct MetadataStore {
    path: PathBuf,
    records: Vec<MetadataRecord>,
    writes: usize,
}

impl MetadataStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            records: Vec::new(),
            writes: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[MetadataRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// How many times the document has been written.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn push(&mut self, record: MetadataRecord) -> Result<()> {
        self.records.push(record);
        self.flush()
    }

    /// Rewrite the whole document.
    ///
    /// The JSON goes to a sibling temp file first and is renamed over the
    /// target, so readers never see a half-written array.
    pub fn flush(&mut self) -> Result<()> {
        info!("Writing metadata to {:?}", self.path);
        let json = to_pretty_json(&self.records)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("Failed to write {:?}", tmp))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {:?}", self.path))?;

        self.writes += 1;
        Ok(())
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut ser)
        .context("Failed to serialize metadata")?;
    Ok(out)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_seen: usize,
    pub records_added: usize,
    pub writes: usize,
}

/// Normalize, look up and thumbnail a single file.
pub fn process_file<C, P>(
    path: &Path,
    catalog: &C,
    posters: &P,
    thumbnail_size: u32,
) -> Result<Option<MetadataRecord>>
where
    C: Catalog + ?Sized,
    P: PosterSource + ?Sized,
{
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    let filepath = path.to_string_lossy().to_string();
    info!("Processing file: {}", filename);

    let guess = title::normalize(&filename);
    info!("Cleaned title: {:?}", guess.title);
    info!("Year: {}", guess.year.as_deref().unwrap_or("none"));

    let Some(mut record) = catalog::fetch(catalog, &guess, &filename, &filepath)? else {
        return Ok(None);
    };

    thumbnail::attach_thumbnail(&mut record, posters, thumbnail_size);
    Ok(Some(record))
}

/// Walk the library and write every found record to `store`.
///
/// The document is rewritten after each record and once more at the end.
/// A malformed catalog answer stops the run; whatever was written before
/// stays on disk.
pub fn run_with_store<C, P>(
    config: &ScanConfig,
    catalog: &C,
    posters: &P,
    store: &mut MetadataStore,
) -> Result<RunSummary>
where
    C: Catalog + ?Sized,
    P: PosterSource + ?Sized,
{
    info!("Starting metadata extraction in {:?}", config.library_root);
    let files = media_files(&config.library_root, &config.extensions)?;
    info!("Found {} candidate media files", files.len());

    let mut summary = RunSummary::default();
    for path in &files {
        summary.files_seen += 1;
        if let Some(record) = process_file(path, catalog, posters, config.thumbnail_size)? {
            store.push(record)?;
            summary.records_added += 1;
        }
    }

    store.flush()?;
    summary.writes = store.writes();
    info!(
        "Finished: {} of {} files matched, {} records in {:?}",
        summary.records_added,
        summary.files_seen,
        store.len(),
        store.path()
    );

    Ok(summary)
}

/// [`run_with_store`] writing to the configured output path.
pub fn run<C, P>(config: &ScanConfig, catalog: &C, posters: &P) -> Result<RunSummary>
where
    C: Catalog + ?Sized,
    P: PosterSource + ?Sized,
{
    let mut store = MetadataStore::new(&config.output_path);
    run_with_store(config, catalog, posters, &mut store)
}
