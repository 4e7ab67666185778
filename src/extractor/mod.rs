//! Record extraction from experiment documents.
//!
//! One document in, one [`ExperimentRecord`] out. Every field is
//! independently optional and extracted by a literal-label rule; the
//! first match wins and later occurrences are ignored. Missing fields
//! are never an error. The only failures are I/O and non-UTF-8 content.

use crate::models::{ExperimentRecord, Rating};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Heading prefix of the title line, e.g. `# Experiment 001: ...`.
const TITLE_PREFIX: &str = "# Experiment ";
/// Title id that is a template placeholder, not a real id.
const TITLE_PLACEHOLDER: &str = "ID";
/// Marker introducing the rating, closed by `**`.
const RATING_PREFIX: &str = "**Rating: ";
/// Marker introducing the tag line.
const TAGS_MARKER: &str = "**Tags:**";

/// Where an extracted labeled value is stored on the record.
#[derive(Debug, Clone, Copy)]
enum Field {
    Date,
    Recorder,
    Model,
    Target,
}

impl Field {
    fn assign(self, record: &mut ExperimentRecord, value: String) {
        match self {
            Field::Date => record.date = Some(value),
            Field::Recorder => record.recorder = Some(value),
            Field::Model => record.model = Some(value),
            Field::Target => record.target = Some(value),
        }
    }
}

/// The field grammar: label literal plus destination. Adding a labeled
/// field to the document format is a new row here, not a new code path.
const FIELD_RULES: [(Field, &str); 4] = [
    (Field::Date, "- Date:"),
    (Field::Recorder, "- Recorder:"),
    (Field::Model, "- Model:"),
    (Field::Target, "- Target:"),
];

/// Failure to obtain the text of a document.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The file could not be read at all.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file was read but is not valid UTF-8.
    #[error("{path} is not valid UTF-8")]
    Decode { path: PathBuf },
}

/// Read one document and extract its record.
///
/// The fallback id is the filename stem; extraction itself cannot fail.
pub fn read_record(path: &Path) -> Result<ExperimentRecord, RecordError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::InvalidData {
            RecordError::Decode {
                path: path.to_path_buf(),
            }
        } else {
            RecordError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(extract_record(&content, &stem))
}

/// Extract a record from document text.
///
/// `fallback_id` is kept as the record id unless the document carries a
/// usable title id.
pub fn extract_record(content: &str, fallback_id: &str) -> ExperimentRecord {
    let mut record = ExperimentRecord::with_id(fallback_id);

    if let Some(id) = extract_title_id(content) {
        record.id = id;
    }
    for (field, label) in FIELD_RULES {
        if let Some(value) = extract_labeled(content, label) {
            field.assign(&mut record, value);
        }
    }
    record.rating = extract_rating(content);
    if let Some(rest) = extract_tag_line(content) {
        record.tags = parse_tags(rest);
    }

    record
}

/// Id from the first `# Experiment <id>:` heading, unless it is empty
/// or the template placeholder. A heading without the closing colon is
/// not a title line.
fn extract_title_id(content: &str) -> Option<String> {
    for line in content.lines() {
        if let Some(rest) = line.strip_prefix(TITLE_PREFIX) {
            let Some((id, _)) = rest.split_once(':') else {
                continue;
            };
            let id = id.trim();
            if id.is_empty() || id == TITLE_PLACEHOLDER {
                return None;
            }
            return Some(id.to_string());
        }
    }
    None
}

/// Value of the first line starting with `label`, trimmed. A value that
/// trims to nothing counts as absent.
fn extract_labeled(content: &str, label: &str) -> Option<String> {
    for line in content.lines() {
        if let Some(rest) = line.strip_prefix(label) {
            let value = rest.trim();
            if value.is_empty() {
                return None;
            }
            return Some(value.to_string());
        }
    }
    None
}

/// Rating from the first `**Rating: <glyph>**` marker. An unrecognized
/// glyph leaves the rating absent; `〇` normalizes to `○` inside
/// [`Rating::from_glyph`].
fn extract_rating(content: &str) -> Option<Rating> {
    let start = content.find(RATING_PREFIX)? + RATING_PREFIX.len();
    let rest = &content[start..];
    // The marker must be closed; an unterminated `**Rating: ` is not a rating.
    let (glyph, _) = rest.split_once("**")?;
    Rating::from_glyph(glyph.trim())
}

/// Remainder of the first line containing the `**Tags:**` marker,
/// starting at the marker.
fn extract_tag_line(content: &str) -> Option<&str> {
    let start = content.find(TAGS_MARKER)?;
    let rest = &content[start..];
    Some(rest.lines().next().unwrap_or(rest))
}

/// Extract every inline-code token from a tag line.
///
/// A token is the non-empty text between two backticks, containing
/// neither backticks nor backslashes. A single backslash immediately
/// before either delimiter is tolerated and stripped, so `` `x` ``,
/// `` \`x` ``, `` `x`\ `` and `` \`x`\ `` all yield `x`.
fn parse_tags(line: &str) -> Vec<String> {
    let bytes = line.as_bytes();
    let mut tags = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }
        // Opening delimiter. Scan the candidate token.
        let start = i + 1;
        let mut j = start;
        while j < bytes.len() && bytes[j] != b'`' && bytes[j] != b'\\' {
            j += 1;
        }
        match bytes.get(j) {
            // Plain closing delimiter.
            Some(b'`') if j > start => {
                tags.push(line[start..j].to_string());
                i = j + 1;
            }
            // Escaped closing delimiter: backslash directly before `.
            Some(b'\\') if j > start && bytes.get(j + 1) == Some(&b'`') => {
                tags.push(line[start..j].to_string());
                i = j + 2;
            }
            // Empty token or stray backslash: resume at the stop point so
            // a closing backtick can open the next candidate.
            Some(_) => i = j,
            None => break,
        }
    }

    tags
}
