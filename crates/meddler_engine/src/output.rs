//! Output path conventions per SSG target.
//!
//! Every path is a pure function of metadata + config, relative to the
//! output base directory.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate};

use meddler_core::{MeddlerConfig, OutputFormat, PostMetadata, SsgTarget};

/// Relative output path for one converted post.
pub fn post_output_path(metadata: &PostMetadata, config: &MeddlerConfig) -> PathBuf {
    let ext = match config.output_format {
        OutputFormat::StructuredJson => "json",
        OutputFormat::Html => "html",
        OutputFormat::Markdown => "md",
    };
    let slug = if metadata.slug.is_empty() {
        &metadata.medium_id
    } else {
        &metadata.slug
    };
    let to_drafts = metadata.draft && config.separate_drafts;

    match config.target {
        SsgTarget::Hugo => {
            // Page bundles: one directory per post with an index file.
            let dir = if to_drafts {
                "content/drafts"
            } else {
                "content/posts"
            };
            Path::new(dir).join(slug).join(format!("index.{ext}"))
        }
        SsgTarget::Jekyll => {
            if to_drafts {
                Path::new("_drafts").join(format!("{slug}.{ext}"))
            } else {
                let prefix = date_prefix(metadata.date.as_deref());
                Path::new("_posts").join(format!("{prefix}-{slug}.{ext}"))
            }
        }
        SsgTarget::Astro => {
            let dir = if to_drafts {
                "src/content/drafts"
            } else {
                "src/content/posts"
            };
            Path::new(dir).join(format!("{slug}.{ext}"))
        }
        SsgTarget::Eleventy | SsgTarget::Generic => {
            let dir = if to_drafts { "drafts" } else { "posts" };
            Path::new(dir).join(format!("{slug}.{ext}"))
        }
    }
}

/// Jekyll's `_posts/` files carry a date prefix; unparseable dates get a
/// sentinel so the file still lands somewhere visible.
fn date_prefix(date: Option<&str>) -> String {
    date.and_then(|raw| {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.date_naive())
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
            .ok()
    })
    .map(|d| d.format("%Y-%m-%d").to_string())
    .unwrap_or_else(|| "0000-00-00".to_string())
}

/// Base directory (relative to the output base) that image paths prefix.
pub fn images_base_dir(target: SsgTarget) -> &'static str {
    match target {
        SsgTarget::Hugo => "static",
        SsgTarget::Jekyll => "assets",
        SsgTarget::Astro => "public",
        SsgTarget::Eleventy | SsgTarget::Generic => "",
    }
}

/// Directory the supplementary JSON data files are written into.
pub fn data_dir(target: SsgTarget) -> &'static str {
    match target {
        SsgTarget::Hugo | SsgTarget::Generic => "data",
        SsgTarget::Jekyll | SsgTarget::Eleventy => "_data",
        SsgTarget::Astro => "src/data",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meddler_core::{PostType, SsgTarget};

    fn metadata(slug: &str, draft: bool, date: Option<&str>) -> PostMetadata {
        PostMetadata {
            title: "T".into(),
            subtitle: String::new(),
            date: date.map(str::to_string),
            slug: slug.into(),
            canonical_url: None,
            author: None,
            author_username: None,
            medium_id: "abc123".into(),
            draft,
            tags: Vec::new(),
            image: None,
            image_caption: None,
            post_type: if draft {
                PostType::Draft
            } else {
                PostType::Published
            },
            earnings: None,
            filename: "f.html".into(),
        }
    }

    #[test]
    fn hugo_uses_page_bundles() {
        let mut config = MeddlerConfig::default();
        config.target = SsgTarget::Hugo;
        let path = post_output_path(&metadata("my-post", false, None), &config);
        assert_eq!(path, PathBuf::from("content/posts/my-post/index.md"));
    }

    #[test]
    fn jekyll_prefixes_published_posts_with_the_date() {
        let mut config = MeddlerConfig::default();
        config.target = SsgTarget::Jekyll;
        let path = post_output_path(&metadata("my-post", false, Some("2020-05-14")), &config);
        assert_eq!(path, PathBuf::from("_posts/2020-05-14-my-post.md"));
    }

    #[test]
    fn jekyll_drafts_skip_the_date_prefix() {
        let mut config = MeddlerConfig::default();
        config.target = SsgTarget::Jekyll;
        let path = post_output_path(&metadata("wip", true, None), &config);
        assert_eq!(path, PathBuf::from("_drafts/wip.md"));
    }

    #[test]
    fn generic_splits_drafts_only_when_configured() {
        let mut config = MeddlerConfig::default();
        let path = post_output_path(&metadata("wip", true, None), &config);
        assert_eq!(path, PathBuf::from("drafts/wip.md"));

        config.separate_drafts = false;
        let path = post_output_path(&metadata("wip", true, None), &config);
        assert_eq!(path, PathBuf::from("posts/wip.md"));
    }

    #[test]
    fn structured_json_changes_the_extension() {
        let mut config = MeddlerConfig::default();
        config.output_format = meddler_core::OutputFormat::StructuredJson;
        let path = post_output_path(&metadata("p", false, None), &config);
        assert_eq!(path, PathBuf::from("posts/p.json"));
    }
}
