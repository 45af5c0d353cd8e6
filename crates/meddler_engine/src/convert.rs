//! Post body conversion.
//!
//! Converts the `section[data-field="body"]` of a post into Markdown plus an
//! ordered list of image references. The DOM is prepared in a fixed step
//! order (collect images, strip duplicated title/subtitle, optional featured
//! removal, divider removal, src rewrite) before the content is extracted
//! through a three-tier fallback and rendered by the rule-based Markdown
//! engine. Each step mutates state the next depends on.

use kuchiki::traits::TendrilSink;
use kuchiki::{ElementData, NodeDataRef, NodeRef};
use thiserror::Error;

use meddler_core::{ImageMode, ImageRef, MeddlerConfig, SectionBreakMode};

use crate::markdown::MarkdownRenderer;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("invalid selector: {0}")]
    Selector(&'static str),
    #[error("markdown rendering failed: {0}")]
    Render(#[from] std::io::Error),
}

/// Result of converting one post body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyOutput {
    pub markdown: String,
    pub images: Vec<ImageRef>,
}

/// One collected `<img>`: the reference handed back to the caller plus the
/// DOM node it came from, so the later src rewrite targets exactly the node
/// each path was computed for.
struct CollectedImage {
    element: NodeDataRef<ElementData>,
    local_path: Option<String>,
}

/// Converts a post's HTML body into Markdown.
///
/// A missing body section yields empty output, not an error.
pub fn convert_body(
    html: &str,
    config: &MeddlerConfig,
    slug: &str,
) -> Result<BodyOutput, ConvertError> {
    let document = kuchiki::parse_html().one(html);
    let Ok(body) = document.select_first(r#"section[data-field="body"]"#) else {
        return Ok(BodyOutput::default());
    };
    let body = body.as_node();

    // Collect every image before any mutation.
    let (images, collected) = collect_images(body, config, slug)?;

    // The body repeats the title/subtitle that already live in front matter.
    detach_all(body, "h3.graf--title")?;
    detach_all(body, "h4.graf--subtitle")?;

    if config.images.extract_featured && config.images.remove_featured_from_body {
        if let Ok(figure) = body.select_first("figure") {
            figure.as_node().detach();
        }
    }

    detach_all(body, "div.section-divider")?;

    // Rewrite surviving imgs to the paths computed at collection time.
    if config.images.mode != ImageMode::Reference {
        for image in &collected {
            if let Some(path) = &image.local_path {
                image
                    .element
                    .attributes
                    .borrow_mut()
                    .insert("src", path.clone());
            }
        }
    }

    let separator = match config.content.section_breaks {
        SectionBreakMode::Hr => "<hr>",
        SectionBreakMode::Spacing => "<br><br>",
        SectionBreakMode::None => "",
    };

    let html_content = match extract_inner_sections(body, separator)? {
        Some(content) => content,
        None => match extract_body_sections(body, separator)? {
            Some(content) => content,
            None => inner_html(body),
        },
    };

    let renderer = MarkdownRenderer::new(config);
    let markdown = renderer.render(&html_content)?;
    let markdown = collapse_blank_lines(&markdown).trim().to_string();

    Ok(BodyOutput { markdown, images })
}

fn collect_images(
    body: &NodeRef,
    config: &MeddlerConfig,
    slug: &str,
) -> Result<(Vec<ImageRef>, Vec<CollectedImage>), ConvertError> {
    let mut images = Vec::new();
    let mut collected = Vec::new();

    for img in select_all(body, "img")? {
        let Some(src) = attr(&img, "src") else {
            continue;
        };

        let caption = img
            .as_node()
            .ancestors()
            .find(|node| is_element(node, "figure"))
            .and_then(|figure| figure.select_first("figcaption").ok())
            .map(|cap| cap.text_contents().trim().to_string())
            .filter(|text| !text.is_empty());
        let alt = caption
            .or_else(|| attr(&img, "alt"))
            .unwrap_or_default();

        let local_path = (config.images.mode != ImageMode::Reference)
            .then(|| image_local_path(config, slug, images.len() + 1, &src));

        images.push(ImageRef {
            original_url: src,
            local_path: local_path.clone(),
            alt,
            width: attr(&img, "data-width").and_then(|v| v.parse().ok()),
            height: attr(&img, "data-height").and_then(|v| v.parse().ok()),
            data_image_id: attr(&img, "data-image-id"),
        });
        collected.push(CollectedImage {
            element: img,
            local_path,
        });
    }

    Ok((images, collected))
}

/// Local path for the `index`-th image (1-based) of a post.
fn image_local_path(config: &MeddlerConfig, slug: &str, index: usize, src: &str) -> String {
    let ext = guess_image_extension(src);
    if config.images.per_post_dirs {
        format!("{}/{}/{:02}.{}", config.images.output_dir, slug, index, ext)
    } else {
        format!("{}/{}-{:02}.{}", config.images.output_dir, slug, index, ext)
    }
}

fn guess_image_extension(url: &str) -> &'static str {
    let lower = url.to_lowercase();
    if lower.contains(".png") {
        "png"
    } else if lower.contains(".gif") {
        "gif"
    } else if lower.contains(".webp") {
        "webp"
    } else if lower.contains(".svg") {
        "svg"
    } else {
        "jpeg"
    }
}

/// Tier 1: every `.section-inner` fragment across the body, joined.
fn extract_inner_sections(
    body: &NodeRef,
    separator: &str,
) -> Result<Option<String>, ConvertError> {
    let parts: Vec<String> = select_all(body, ".section-inner")?
        .iter()
        .map(|inner| inner_html(inner.as_node()))
        .filter(|content| !content.trim().is_empty())
        .collect();

    Ok(Some(parts.join(separator)).filter(|content| !content.is_empty()))
}

/// Tier 2: per top-level body section, preferring nested `.section-inner`,
/// then `.section-content`, then the section's own content.
fn extract_body_sections(
    body: &NodeRef,
    separator: &str,
) -> Result<Option<String>, ConvertError> {
    let mut parts = Vec::new();
    for section in select_all(body, "section.section--body")? {
        let section = section.as_node();
        let inners = select_all(section, ".section-inner")?;
        let content = if inners.is_empty() {
            match section.select_first(".section-content") {
                Ok(wrapper) => inner_html(wrapper.as_node()),
                Err(()) => inner_html(section),
            }
        } else {
            inners
                .iter()
                .map(|inner| inner_html(inner.as_node()))
                .collect::<String>()
        };
        if !content.trim().is_empty() {
            parts.push(content);
        }
    }

    Ok(Some(parts.join(separator)).filter(|content| !content.is_empty()))
}

fn select_all(
    root: &NodeRef,
    selector: &'static str,
) -> Result<Vec<NodeDataRef<ElementData>>, ConvertError> {
    Ok(root
        .select(selector)
        .map_err(|()| ConvertError::Selector(selector))?
        .collect())
}

/// Detaches every match. Matches are collected first because detaching
/// invalidates the live iterator.
fn detach_all(root: &NodeRef, selector: &'static str) -> Result<(), ConvertError> {
    for node in select_all(root, selector)? {
        node.as_node().detach();
    }
    Ok(())
}

fn attr(element: &NodeDataRef<ElementData>, name: &str) -> Option<String> {
    element
        .attributes
        .borrow()
        .get(name)
        .map(str::to_string)
}

fn is_element(node: &NodeRef, tag: &str) -> bool {
    node.as_element().is_some_and(|el| &*el.name.local == tag)
}

/// Serialized content of a node, excluding the node itself.
fn inner_html(node: &NodeRef) -> String {
    let mut out = Vec::new();
    for child in node.children() {
        let _ = child.serialize(&mut out);
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Collapses runs of three or more newlines to exactly two.
fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0usize;
    for c in text.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push(c);
            }
        } else {
            newlines = 0;
            out.push(c);
        }
    }
    out
}
