//! Multi-line JSON file discovery and reading
//!
//! FHIR multi-line JSON comes in two flavors (`.ndjson` and `.jsonl`, either
//! optionally gzipped) and under wildly inconsistent filenames: bulk clients
//! write `1.Condition.ndjson`, ETL tools write `Condition.001.ndjson`, and
//! vendor exports are often opaque blobs someone renamed by hand. So nothing
//! here trusts filenames: each candidate file's first line is parsed and its
//! `resourceType` decides what the file holds.
//!
//! I/O and JSON errors are logged and skipped, never raised. This code is
//! built for large piles of externally produced JSON, where aborting on a
//! single bad line you don't control rarely makes sense.

use flate2::read::GzDecoder;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One parsed line of a multi-line JSON file, with position metadata for
/// resumable reads.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonLine {
    /// The parsed line of content (not required to be an object)
    pub value: Value,
    /// Zero-based line number in the file
    pub line_num: usize,
    /// Byte offset of the line start (of the stored bytes; after
    /// decompression for gzipped files)
    pub byte_offset: u64,
}

/// List multi-line JSON files in a directory, keyed by path, valued by the
/// resource type sniffed from each file's first line.
///
/// - Does not recurse into sub-folders; symlinks are followed.
/// - I/O and JSON errors are logged, not raised.
/// - A missing directory yields an empty map.
/// - `resources` of `None` returns every multi-line JSON file found, even
///   those whose first line has no `resourceType`.
/// - Paths iterate in a consistent (sorted) order across calls.
pub fn list_multiline_json_in_dir(
    dir: impl AsRef<Path>,
    resources: Option<&[&str]>,
) -> BTreeMap<PathBuf, Option<String>> {
    let dir = dir.as_ref();
    let mut results = BTreeMap::new();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!("Could not list '{}': {err}", dir.display());
            return results;
        }
    };

    for entry in entries {
        let Ok(entry) = entry else { continue };
        let path = entry.path();
        // metadata() follows symlinks
        let is_file = fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false);
        if !is_file || !has_multiline_json_extension(&path) {
            continue;
        }
        match sniff_resource_type(&path) {
            Ok(resource_type) => {
                let wanted = match (resources, &resource_type) {
                    (None, _) => true,
                    (Some(filter), Some(found)) => filter.contains(&found.as_str()),
                    (Some(_), None) => false,
                };
                if wanted {
                    results.insert(path, resource_type);
                }
            }
            Err(err) => warn!("Could not read from '{}': {err}", path.display()),
        }
    }

    results
}

/// Lazily read parsed JSON values from every matching file in a directory.
///
/// Files are visited in sorted order, rows in file order, so the overall
/// sequence is consistent across calls. Lines that fail to parse are logged
/// and skipped.
pub fn read_multiline_json_from_dir(
    dir: impl AsRef<Path>,
    resources: Option<&[&str]>,
) -> impl Iterator<Item = Value> {
    list_multiline_json_in_dir(dir, resources)
        .into_keys()
        .flat_map(read_multiline_json)
}

/// Lazily read parsed JSON values from one multi-line JSON file.
///
/// A missing or unreadable file is logged and yields nothing. Empty lines
/// are skipped (some producers leave a trailing newline or worse; be
/// graceful).
pub fn read_multiline_json(path: impl AsRef<Path>) -> impl Iterator<Item = Value> {
    read_multiline_json_with_details(path).map(|line| line.value)
}

/// Like [`read_multiline_json`], but with line numbers and byte offsets for
/// each parsed line, so a caller can bookmark progress.
pub fn read_multiline_json_with_details(path: impl AsRef<Path>) -> JsonLines {
    let path = path.as_ref().to_path_buf();
    let reader = match open_multiline_json(&path) {
        Ok(reader) => Some(reader),
        Err(err) => {
            warn!("Could not read from '{}': {err}", path.display());
            None
        }
    };
    JsonLines {
        path,
        reader,
        line_num: 0,
        byte_offset: 0,
    }
}

/// Iterator over the parsed lines of one file. See
/// [`read_multiline_json_with_details`].
pub struct JsonLines {
    path: PathBuf,
    reader: Option<Box<dyn BufRead>>,
    line_num: usize,
    byte_offset: u64,
}

impl Iterator for JsonLines {
    type Item = JsonLine;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => {
                    self.reader = None;
                    return None;
                }
                Ok(n) => {
                    let line_num = self.line_num;
                    let byte_offset = self.byte_offset;
                    self.line_num += 1;
                    self.byte_offset += n as u64;

                    let line = trim_line_ending(&buf);
                    if line.is_empty() {
                        continue;
                    }
                    match serde_json::from_slice(line) {
                        Ok(value) => {
                            return Some(JsonLine {
                                value,
                                line_num,
                                byte_offset,
                            });
                        }
                        Err(err) => {
                            warn!(
                                "Could not decode '{}:{}': {err}",
                                self.path.display(),
                                line_num + 1
                            );
                        }
                    }
                }
                Err(err) => {
                    warn!("Could not read from '{}': {err}", self.path.display());
                    self.reader = None;
                    return None;
                }
            }
        }
    }
}

/// Open a file for line reading, transparently decompressing `.gz`.
fn open_multiline_json(path: &Path) -> std::io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    if has_extension(path, "gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Parse the first line of a file and pull out its `resourceType`, if any.
///
/// All records in a multi-line FHIR file should be the same resource, so the
/// first line is enough. `resourceType` need not be the first key, so the
/// whole line is parsed.
fn sniff_resource_type(path: &Path) -> std::io::Result<Option<String>> {
    let mut reader = open_multiline_json(path)?;
    let mut buf = Vec::new();
    reader.read_until(b'\n', &mut buf)?;

    let line = trim_line_ending(&buf);
    if line.is_empty() {
        return Ok(None);
    }
    let parsed: Value = serde_json::from_slice(line)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
    Ok(parsed
        .get("resourceType")
        .and_then(Value::as_str)
        .map(str::to_string))
}

/// `.jsonl` / `.ndjson`, optionally followed by `.gz`, case-insensitive.
fn has_multiline_json_extension(path: &Path) -> bool {
    if has_extension(path, "gz") {
        let stem = path.file_stem().map(PathBuf::from).unwrap_or_default();
        has_multiline_json_extension(&stem)
    } else {
        has_extension(path, "jsonl") || has_extension(path, "ndjson")
    }
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}

fn trim_line_ending(buf: &[u8]) -> &[u8] {
    let mut line = buf;
    while let Some((b'\n' | b'\r', rest)) = line.split_last() {
        line = rest;
    }
    line
}
