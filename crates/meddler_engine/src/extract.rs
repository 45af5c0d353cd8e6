//! Post metadata extraction.
//!
//! Medium's export HTML is loosely structured microformat markup; every
//! field here is optional in practice, so each extraction degrades to a
//! null/empty value rather than failing the post.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use meddler_core::{PostMetadata, PostType};

use crate::filename::parse_filename;
use crate::response::{detect_response, ResponseThresholds};

static TITLE_HEADING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1.p-name").expect("hardcoded selector is valid"));
static PAGE_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("hardcoded selector is valid"));
static SUBTITLE_SECTION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"section[data-field="subtitle"]"#).expect("hardcoded selector is valid")
});
static FOOTER_TIME: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("footer time.dt-published").expect("hardcoded selector is valid")
});
static CANONICAL_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.p-canonical").expect("hardcoded selector is valid"));
static AUTHOR_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.p-author").expect("hardcoded selector is valid"));
static BODY_SECTION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"section[data-field="body"]"#).expect("hardcoded selector is valid")
});
static FIGURE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("figure").expect("hardcoded selector is valid"));
static IMG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("hardcoded selector is valid"));
static FIGCAPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("figcaption").expect("hardcoded selector is valid"));

/// Extracts all metadata from one Medium post HTML document.
pub fn extract_metadata(html: &str, filename: &str) -> PostMetadata {
    let doc = Html::parse_document(html);
    let parsed = parse_filename(filename);

    let title = first_text(&doc, &TITLE_HEADING)
        .or_else(|| first_text(&doc, &PAGE_TITLE))
        .unwrap_or_else(|| "Untitled".to_string());

    let subtitle = first_text(&doc, &SUBTITLE_SECTION).unwrap_or_default();

    // Prefer the machine-readable footer timestamp over the filename date.
    let date = doc
        .select(&FOOTER_TIME)
        .next()
        .and_then(|el| el.value().attr("datetime"))
        .map(str::to_string)
        .or(parsed.date);

    let canonical_url = doc
        .select(&CANONICAL_LINK)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(str::to_string);

    let author_el = doc.select(&AUTHOR_LINK).next();
    let author = author_el
        .map(|el| element_text(el))
        .filter(|text| !text.is_empty());
    let author_username = author_el
        .and_then(|el| el.value().attr("href"))
        .and_then(username_from_href);

    let (image, image_caption) = featured_image(&doc);

    let is_draft = parsed.is_draft;
    let is_response = !is_draft && detect_response(&doc, &ResponseThresholds::default());
    let post_type = if is_draft {
        PostType::Draft
    } else if is_response {
        PostType::Response
    } else {
        PostType::Published
    };

    PostMetadata {
        title,
        subtitle,
        date,
        slug: parsed.slug,
        canonical_url,
        author,
        author_username,
        medium_id: parsed.medium_id,
        draft: is_draft,
        tags: Vec::new(),
        image,
        image_caption,
        post_type,
        earnings: None,
        filename: filename.to_string(),
    }
}

/// First image of the first body figure, with its caption.
fn featured_image(doc: &Html) -> (Option<String>, Option<String>) {
    let Some(body) = doc.select(&BODY_SECTION).next() else {
        return (None, None);
    };
    let Some(figure) = body.select(&FIGURE).next() else {
        return (None, None);
    };

    let image = figure
        .select(&IMG)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::to_string);
    let caption = figure
        .select(&FIGCAPTION)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty());

    (image, caption)
}

/// Path segment after `@` in an author profile link.
fn username_from_href(href: &str) -> Option<String> {
    let after = href.split('@').nth(1)?;
    let username: String = after.chars().take_while(|c| *c != '/').collect();
    if username.is_empty() {
        None
    } else {
        Some(username)
    }
}

fn first_text(doc: &Html, selector: &Selector) -> Option<String> {
    doc.select(selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
