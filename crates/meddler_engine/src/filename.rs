//! Post filename parsing.
//!
//! Medium names exported post files one of two ways:
//!
//! - published: `YYYY-MM-DD_<Title-Slug>-<hex-id>.html`
//! - draft:     `draft_<Title-Slug>-<hex-id>.html`
//!
//! The trailing hyphen-delimited segment is the platform id (variable-length
//! hex); everything before it is the raw slug.

/// Fields decoded from one post filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilename {
    /// `YYYY-MM-DD` from the filename prefix; `None` for drafts.
    pub date: Option<String>,
    /// Normalized, never empty.
    pub slug: String,
    pub medium_id: String,
    pub is_draft: bool,
}

/// Parses a post filename into date, slug, Medium id and draft flag.
pub fn parse_filename(filename: &str) -> ParsedFilename {
    let base = filename.strip_suffix(".html").unwrap_or(filename);
    let is_draft = base.starts_with("draft_");

    let (date, remainder) = if is_draft {
        (None, &base["draft_".len()..])
    } else {
        match split_date_prefix(base) {
            Some((date, rest)) => (Some(date.to_string()), rest),
            None => (None, base),
        }
    };

    let (raw_slug, medium_id) = match remainder.rfind('-') {
        Some(idx) => (&remainder[..idx], &remainder[idx + 1..]),
        None => (remainder, remainder),
    };

    let mut slug = normalize_slug(raw_slug);
    if slug.is_empty() {
        slug = if medium_id.is_empty() {
            "untitled".to_string()
        } else {
            medium_id.to_string()
        };
    }

    ParsedFilename {
        date,
        slug,
        medium_id: medium_id.to_string(),
        is_draft,
    }
}

/// Normalizes a raw filename slug into `[a-z0-9-]`.
///
/// The step order is contractual: collapse hyphen runs (Medium encodes
/// punctuation as `--`), then fix the possessive artifact `-s-` -> `s-`,
/// then lowercase, strip and trim. Reordering changes output for titles
/// containing both patterns adjacently.
pub fn normalize_slug(raw: &str) -> String {
    let mut collapsed = String::with_capacity(raw.len());
    let mut prev_hyphen = false;
    for c in raw.chars() {
        if c == '-' {
            if !prev_hyphen {
                collapsed.push(c);
            }
            prev_hyphen = true;
        } else {
            collapsed.push(c);
            prev_hyphen = false;
        }
    }

    let possessive_fixed = collapsed.replace("-s-", "s-");

    let lowered = possessive_fixed.to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();

    stripped.trim_matches('-').to_string()
}

/// Splits a leading `YYYY-MM-DD_` prefix, requiring a non-empty remainder.
fn split_date_prefix(base: &str) -> Option<(&str, &str)> {
    let bytes = base.as_bytes();
    if bytes.len() < 12 {
        return None;
    }
    let date_ok = bytes[..10].iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    if date_ok && bytes[10] == b'_' {
        Some((&base[..10], &base[11..]))
    } else {
        None
    }
}
