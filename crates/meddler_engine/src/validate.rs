//! Export validation.
//!
//! A cheap pre-flight over the export root: confirms this looks like a
//! Medium export, pulls the author name out of README.html and counts the
//! post files, so the front-end can show a summary before converting.

use crate::source::ExportSource;

/// Directories that count as supplementary data when `posts/` is absent.
const SUPPLEMENTARY_DIRS: [&str; 6] = [
    "profile",
    "bookmarks",
    "claps",
    "lists",
    "partner-program",
    "interests",
];

/// Outcome of validating one export root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub message: String,
    pub warning: Option<String>,
    pub author_name: Option<String>,
    pub published_count: usize,
    pub draft_count: usize,
}

/// Validates that `source` points at a Medium export.
pub fn validate_export(source: &dyn ExportSource) -> ValidationResult {
    let mut result = ValidationResult {
        valid: false,
        message: String::new(),
        warning: None,
        author_name: None,
        published_count: 0,
        draft_count: 0,
    };

    if !source.exists("README.html") {
        result.message =
            "This doesn't look like a Medium export. No README.html found.".to_string();
        return result;
    }

    // Author name is informational; failure to read it is non-fatal.
    if let Ok(readme) = source.read_to_string("README.html") {
        result.author_name = archive_author(&readme);
    }

    if !source.exists("posts") {
        let has_supplementary = SUPPLEMENTARY_DIRS.iter().any(|dir| source.exists(dir));
        if has_supplementary {
            result.valid = true;
            result.warning = Some(
                "No posts/ directory found. Only supplementary data will be processed."
                    .to_string(),
            );
            result.message = "Valid Medium export (supplementary data only).".to_string();
        } else {
            result.message =
                "This export doesn't contain any posts or supplementary data.".to_string();
        }
        return result;
    }

    let post_files = source.list_html_files("posts").unwrap_or_default();
    if post_files.is_empty() {
        result.warning = Some(
            "The posts/ directory is empty. Only supplementary data will be processed."
                .to_string(),
        );
    }
    for file in &post_files {
        if file.starts_with("draft_") {
            result.draft_count += 1;
        } else {
            result.published_count += 1;
        }
    }

    result.valid = true;
    result.message = "Valid Medium export.".to_string();
    result
}

/// Pulls the author out of README.html's "Archive for <name>" banner.
fn archive_author(readme: &str) -> Option<String> {
    let (_, rest) = readme.split_once("Archive for ")?;
    let name: String = rest.chars().take_while(|c| *c != '<').collect();
    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::archive_author;

    #[test]
    fn author_is_read_up_to_the_next_tag() {
        let html = "<h1>Archive for Jane Writer</h1>";
        assert_eq!(archive_author(html).as_deref(), Some("Jane Writer"));
    }

    #[test]
    fn missing_banner_yields_none() {
        assert_eq!(archive_author("<h1>Export</h1>"), None);
    }
}
