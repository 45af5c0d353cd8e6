//! Conversion orchestrator.
//!
//! Drives one run: discover post files, convert each through the
//! metadata -> body -> front matter -> output pipeline, download images,
//! extract the supplementary datasets, and write the report. Posts are
//! processed strictly one at a time in filename-sorted order; any failure
//! inside a single post's pipeline is recorded and the run continues.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use thiserror::Error;

use engine_logging::{engine_debug, engine_info, engine_warn};
use kuchiki::traits::TendrilSink;
use meddler_core::{
    ConversionReport, ConvertedPost, ImageMode, MeddlerConfig, OutputFormat, PostMetadata,
    PostType, ProfileData,
};

use crate::convert::{convert_body, ConvertError};
use crate::extract::extract_metadata;
use crate::fetch::{ImageDownloader, ImageFetchSettings, ImageJob};
use crate::frontmatter::{generate_front_matter, FrontMatterError};
use crate::output::{data_dir, images_base_dir, post_output_path};
use crate::persist::{ensure_output_dir, AtomicFileWriter, PersistError};
use crate::source::{ExportSource, SourceError};
use crate::supplementary::{
    parse_about, parse_bookmarks, parse_claps, parse_earnings, parse_following, parse_highlights,
    parse_interests, parse_list, parse_profile, parse_publications, InterestsInput,
};

/// Fatal failures that abort the whole run before/outside per-post work.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("source error: {0}")]
    Source(#[from] SourceError),
    #[error("report serialization failed: {0}")]
    Report(#[from] serde_json::Error),
}

/// Failures inside one post's pipeline. Caught per post, never fatal.
#[derive(Debug, Error)]
enum PostError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error(transparent)]
    FrontMatter(#[from] FrontMatterError),
    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of one supplementary dataset; reported as a warning keyed by
/// the dataset directory, other datasets proceed independently.
#[derive(Debug, Error)]
enum SupplementaryError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

enum PostOutcome {
    Converted(Box<ConvertedUnit>),
    SkippedDraft,
    SkippedResponse,
}

struct ConvertedUnit {
    post: ConvertedPost,
    content: String,
}

/// Runs one conversion over `source` into `config.output`.
///
/// Returns the aggregated report; the same report is also written as
/// `meddler-report.json` unless `dry_run` is set.
pub fn run_conversion(
    source: &dyn ExportSource,
    config: &MeddlerConfig,
    dry_run: bool,
) -> Result<ConversionReport, EngineError> {
    let generated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut report = ConversionReport::new(config, generated_at);

    let earnings_map = if config.front_matter.inject_earnings {
        match load_earnings_map(source) {
            Ok(map) => map,
            Err(err) => {
                report.record_warning("partner-program/", err.to_string());
                HashMap::new()
            }
        }
    } else {
        HashMap::new()
    };

    let post_files = source.list_html_files("posts")?;
    report.summary.posts_found = post_files.len();
    if post_files.is_empty() {
        engine_warn!("no posts found in this export; only supplementary data will be processed");
    }

    let output_base = config.output.clone();
    if !dry_run {
        ensure_output_dir(&output_base)?;
    }
    let writer = AtomicFileWriter::new(output_base.clone());

    let images_base = output_base.join(images_base_dir(config.target));
    let mut image_jobs: Vec<ImageJob> = Vec::new();
    let mut converted = 0usize;
    let mut skipped = 0usize;

    for file in &post_files {
        match convert_one(source, config, file, &earnings_map) {
            Ok(PostOutcome::SkippedDraft) => {
                skipped += 1;
            }
            Ok(PostOutcome::SkippedResponse) => {
                report.summary.responses_skipped += 1;
                skipped += 1;
            }
            Ok(PostOutcome::Converted(unit)) => {
                if unit.post.metadata.post_type == PostType::Response {
                    report.summary.responses_included += 1;
                }

                if !dry_run {
                    if let Err(err) = writer.write(&unit.post.output_path, &unit.content) {
                        report.record_error(file, err.to_string());
                        continue;
                    }
                }

                if config.images.mode != ImageMode::Reference {
                    for image in &unit.post.images {
                        if let Some(local_path) = &image.local_path {
                            image_jobs.push(ImageJob {
                                url: image.original_url.clone(),
                                dest: images_base.join(local_path),
                            });
                        }
                    }
                }

                converted += 1;
                if unit.post.metadata.draft {
                    report.summary.drafts_converted += 1;
                }
                engine_debug!("converted {}", unit.post.metadata.slug);
            }
            Err(err) => {
                engine_warn!("failed to convert {}: {}", file, err);
                report.record_error(file, err.to_string());
            }
        }
    }
    report.summary.posts_converted = converted - report.summary.drafts_converted;
    engine_info!("converted {} posts ({} skipped)", converted, skipped);

    if !dry_run && !image_jobs.is_empty() {
        match ImageDownloader::new(ImageFetchSettings::default()) {
            Ok(downloader) => {
                let outcome = downloader.download_all(&image_jobs);
                report.summary.images_downloaded = outcome.downloaded;
                report.summary.images_failed = outcome.failures.len();
                for (url, message) in outcome.failures {
                    report.record_warning(url, message);
                }
            }
            Err(err) => {
                report.record_warning("images", err.to_string());
            }
        }
    }

    if config.supplementary.any_enabled() {
        convert_supplementary(source, config, &writer, &mut report, dry_run);
    }

    if !dry_run {
        let report_json = serde_json::to_string_pretty(&report)?;
        writer.write(Path::new("meddler-report.json"), &report_json)?;
    }

    Ok(report)
}

/// The per-post pipeline: metadata -> earnings join -> skip filters ->
/// body -> front matter -> assembled content + output path.
fn convert_one(
    source: &dyn ExportSource,
    config: &MeddlerConfig,
    filename: &str,
    earnings_map: &HashMap<String, f64>,
) -> Result<PostOutcome, PostError> {
    let html = source.read_to_string(&format!("posts/{filename}"))?;
    let mut metadata = extract_metadata(&html, filename);

    if let Some(earnings) = earnings_map.get(&metadata.medium_id) {
        metadata.earnings = Some(*earnings);
    }

    if metadata.draft && !config.include_drafts {
        return Ok(PostOutcome::SkippedDraft);
    }
    if metadata.post_type == PostType::Response && !config.include_responses {
        return Ok(PostOutcome::SkippedResponse);
    }

    let body = convert_body(&html, config, &metadata.slug)?;
    let front_matter = generate_front_matter(&metadata, config)?;

    let content = match config.output_format {
        OutputFormat::Markdown => {
            if front_matter.is_empty() {
                format!("# {}\n\n{}\n", metadata.title, body.markdown)
            } else {
                format!("{}\n\n{}\n", front_matter, body.markdown)
            }
        }
        OutputFormat::Html => build_clean_html(&html, &metadata),
        OutputFormat::StructuredJson => {
            let mut doc = serde_json::Map::new();
            doc.insert("metadata".to_string(), json_metadata(&metadata));
            doc.insert(
                "content".to_string(),
                serde_json::Value::String(body.markdown.clone()),
            );
            serde_json::to_string_pretty(&serde_json::Value::Object(doc))?
        }
    };

    let output_path = post_output_path(&metadata, config);
    Ok(PostOutcome::Converted(Box::new(ConvertedUnit {
        post: ConvertedPost {
            metadata,
            front_matter,
            body: body.markdown,
            output_path,
            images: body.images,
        },
        content,
    })))
}

/// Clean HTML output: the bare body content wrapped in a minimal document,
/// stripped of the export's styling.
fn build_clean_html(html: &str, metadata: &PostMetadata) -> String {
    let document = kuchiki::parse_html().one(html);

    if let Ok(styles) = document.select("style") {
        let styles: Vec<_> = styles.collect();
        for style in styles {
            style.as_node().detach();
        }
    }

    let body = document
        .select_first(r#"section[data-field="body"]"#)
        .map(|section| {
            let mut out = Vec::new();
            for child in section.as_node().children() {
                let _ = child.serialize(&mut out);
            }
            String::from_utf8_lossy(&out).into_owned()
        })
        .unwrap_or_default();

    let subtitle = if metadata.subtitle.is_empty() {
        String::new()
    } else {
        format!("\n    <p><em>{}</em></p>", metadata.subtitle)
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"UTF-8\">\n  \
         <title>{title}</title>\n</head>\n<body>\n  <article>\n    <h1>{title}</h1>{subtitle}\n{body}\n  \
         </article>\n</body>\n</html>",
        title = metadata.title,
        subtitle = subtitle,
        body = body,
    )
}

/// Ordered metadata object for structured JSON output.
fn json_metadata(metadata: &PostMetadata) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    map.insert("title".into(), metadata.title.clone().into());
    if !metadata.subtitle.is_empty() {
        map.insert("subtitle".into(), metadata.subtitle.clone().into());
    }
    map.insert(
        "date".into(),
        metadata
            .date
            .clone()
            .map(serde_json::Value::String)
            .unwrap_or(serde_json::Value::Null),
    );
    map.insert("slug".into(), metadata.slug.clone().into());
    if let Some(url) = &metadata.canonical_url {
        map.insert("canonical_url".into(), url.clone().into());
    }
    if let Some(author) = &metadata.author {
        map.insert("author".into(), author.clone().into());
    }
    map.insert("medium_id".into(), metadata.medium_id.clone().into());
    map.insert("draft".into(), metadata.draft.into());
    map.insert("tags".into(), metadata.tags.clone().into());
    map.insert("type".into(), metadata.post_type.as_str().into());
    if let Some(earnings) = metadata.earnings {
        map.insert("earnings".into(), serde_json::json!(earnings));
    }
    serde_json::Value::Object(map)
}

fn load_earnings_map(source: &dyn ExportSource) -> Result<HashMap<String, f64>, SourceError> {
    let htmls = read_all_html(source, "partner-program")?;
    let mut map = HashMap::new();
    for entry in parse_earnings(&htmls) {
        if !entry.medium_id.is_empty() {
            map.insert(entry.medium_id, entry.earnings);
        }
    }
    Ok(map)
}

/// Reads every HTML document of a paginated dataset, filename-sorted.
fn read_all_html(source: &dyn ExportSource, subdir: &str) -> Result<Vec<String>, SourceError> {
    let mut htmls = Vec::new();
    for file in source.list_html_files(subdir)? {
        htmls.push(source.read_to_string(&format!("{subdir}/{file}"))?);
    }
    Ok(htmls)
}

/// Converts every enabled supplementary dataset. Datasets fail
/// independently: an error becomes a warning keyed by the directory and the
/// remaining datasets still run.
fn convert_supplementary(
    source: &dyn ExportSource,
    config: &MeddlerConfig,
    writer: &AtomicFileWriter,
    report: &mut ConversionReport,
    dry_run: bool,
) {
    let data_base = PathBuf::from(data_dir(config.target));

    fn apply(
        report: &mut ConversionReport,
        key: &str,
        result: Result<usize, SupplementaryError>,
    ) {
        match result {
            Ok(files) => report.summary.supplementary_files += files,
            Err(err) => report.record_warning(key, err.to_string()),
        }
    }

    if config.supplementary.profile {
        let result = write_profile(source, writer, &data_base, dry_run);
        apply(report, "profile/", result);
    }
    if config.supplementary.bookmarks {
        let result = write_dataset(source, writer, &data_base, "bookmarks", dry_run, |htmls| {
            serde_json::to_string_pretty(&parse_bookmarks(htmls))
        });
        apply(report, "bookmarks/", result);
    }
    if config.supplementary.claps {
        let result = write_dataset(source, writer, &data_base, "claps", dry_run, |htmls| {
            serde_json::to_string_pretty(&parse_claps(htmls))
        });
        apply(report, "claps/", result);
    }
    if config.supplementary.highlights {
        let result = write_dataset(source, writer, &data_base, "highlights", dry_run, |htmls| {
            serde_json::to_string_pretty(&parse_highlights(htmls))
        });
        apply(report, "highlights/", result);
    }
    if config.supplementary.interests {
        let result = write_interests(source, writer, &data_base, dry_run);
        apply(report, "interests/", result);
    }
    if config.supplementary.lists {
        let result = write_lists(source, writer, &data_base, dry_run);
        apply(report, "lists/", result);
    }
    if config.supplementary.earnings {
        let result = write_earnings(source, writer, &data_base, dry_run);
        apply(report, "partner-program/", result);
    }
    if config.supplementary.social_graph {
        let result = write_following(source, writer, &data_base, dry_run);
        apply(report, "following/", result);
    }

    engine_info!(
        "supplementary data: {} files generated",
        report.summary.supplementary_files
    );
}

/// A single-file dataset fed by one paginated directory. Writes nothing and
/// counts nothing when the directory is absent or empty.
fn write_dataset(
    source: &dyn ExportSource,
    writer: &AtomicFileWriter,
    data_base: &Path,
    name: &str,
    dry_run: bool,
    serialize: impl Fn(&[String]) -> Result<String, serde_json::Error>,
) -> Result<usize, SupplementaryError> {
    let htmls = read_all_html(source, name)?;
    if htmls.is_empty() {
        return Ok(0);
    }
    let json = serialize(&htmls)?;
    if !dry_run {
        writer.write(&data_base.join(format!("{name}.json")), &json)?;
    }
    Ok(1)
}

fn write_profile(
    source: &dyn ExportSource,
    writer: &AtomicFileWriter,
    data_base: &Path,
    dry_run: bool,
) -> Result<usize, SupplementaryError> {
    let mut files = 0usize;

    let mut profile = if source.exists("profile/profile.html") {
        parse_profile(&source.read_to_string("profile/profile.html")?)
    } else {
        ProfileData::default()
    };
    if source.exists("profile/about.html") {
        let bio = parse_about(&source.read_to_string("profile/about.html")?);
        if !bio.is_empty() {
            profile.bio = Some(bio);
        }
    }

    let author_json = serde_json::to_string_pretty(&profile)?;
    if !dry_run {
        writer.write(&data_base.join("author.json"), &author_json)?;
    }
    files += 1;

    if source.exists("profile/publications.html") {
        let publications =
            parse_publications(&source.read_to_string("profile/publications.html")?);
        if !publications.is_empty() {
            let json = serde_json::to_string_pretty(&publications)?;
            if !dry_run {
                writer.write(&data_base.join("publications.json"), &json)?;
            }
            files += 1;
        }
    }

    Ok(files)
}

fn write_interests(
    source: &dyn ExportSource,
    writer: &AtomicFileWriter,
    data_base: &Path,
    dry_run: bool,
) -> Result<usize, SupplementaryError> {
    if !source.exists("interests") {
        return Ok(0);
    }

    let read_if_exists = |name: &str| -> Result<Option<String>, SourceError> {
        let rel = format!("interests/{name}");
        if source.exists(&rel) {
            Ok(Some(source.read_to_string(&rel)?))
        } else {
            Ok(None)
        }
    };

    let input = InterestsInput {
        tags: read_if_exists("tags.html")?,
        topics: read_if_exists("topics.html")?,
        publications: read_if_exists("publications.html")?,
        writers: read_if_exists("writers.html")?,
    };
    let json = serde_json::to_string_pretty(&parse_interests(&input))?;
    if !dry_run {
        writer.write(&data_base.join("interests.json"), &json)?;
    }
    Ok(1)
}

/// Reading lists get one JSON file per list under `lists/`.
fn write_lists(
    source: &dyn ExportSource,
    writer: &AtomicFileWriter,
    data_base: &Path,
    dry_run: bool,
) -> Result<usize, SupplementaryError> {
    let mut files = 0usize;
    for file in source.list_html_files("lists")? {
        let html = source.read_to_string(&format!("lists/{file}"))?;
        let list = parse_list(&html, &file);
        let json = serde_json::to_string_pretty(&list)?;
        if !dry_run {
            let out_name = format!("{}.json", file.strip_suffix(".html").unwrap_or(&file));
            writer.write(&data_base.join("lists").join(out_name), &json)?;
        }
        files += 1;
    }
    Ok(files)
}

fn write_earnings(
    source: &dyn ExportSource,
    writer: &AtomicFileWriter,
    data_base: &Path,
    dry_run: bool,
) -> Result<usize, SupplementaryError> {
    let htmls = read_all_html(source, "partner-program")?;
    if htmls.is_empty() {
        return Ok(0);
    }
    let json = serde_json::to_string_pretty(&parse_earnings(&htmls))?;
    if !dry_run {
        writer.write(&data_base.join("earnings.json"), &json)?;
    }
    Ok(1)
}

fn write_following(
    source: &dyn ExportSource,
    writer: &AtomicFileWriter,
    data_base: &Path,
    dry_run: bool,
) -> Result<usize, SupplementaryError> {
    let users = read_all_html(source, "users-following")?;
    let pubs = read_all_html(source, "pubs-following")?;
    let topics = read_all_html(source, "topics-following")?;
    if users.is_empty() && pubs.is_empty() && topics.is_empty() {
        return Ok(0);
    }

    let following = parse_following(&users, &pubs, &topics);
    let json = serde_json::to_string_pretty(&following)?;
    if !dry_run {
        writer.write(&data_base.join("following.json"), &json)?;
    }
    Ok(1)
}
