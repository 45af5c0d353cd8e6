use meddler_core::{EmbedMode, ImageMode, MeddlerConfig, SectionBreakMode, SsgTarget};
use meddler_engine::{convert_body, RULE_ORDER};
use pretty_assertions::assert_eq;

fn wrap_body(body: &str) -> String {
    format!(
        r#"<html><head><title>T</title></head><body>
        <section data-field="body" class="e-content">{body}</section>
        </body></html>"#
    )
}

fn download_config() -> MeddlerConfig {
    let mut config = MeddlerConfig::default();
    config.images.mode = ImageMode::Download;
    config
}

#[test]
fn missing_body_section_yields_empty_output() {
    let output = convert_body(
        "<html><body><p>stray</p></body></html>",
        &MeddlerConfig::default(),
        "slug",
    )
    .unwrap();
    assert_eq!(output.markdown, "");
    assert!(output.images.is_empty());
}

#[test]
fn images_are_collected_in_document_order_with_stable_indices() {
    let body = r#"<div class="section-inner">
        <figure><img src="https://cdn.example/a.png"><figcaption>First</figcaption></figure>
        <p>between</p>
        <figure><img src="https://cdn.example/b.gif" alt="second"></figure>
        <img src="https://cdn.example/c" data-width="640" data-height="480" data-image-id="1*c">
    </div>"#;
    let output = convert_body(&wrap_body(body), &download_config(), "my-post").unwrap();

    assert_eq!(output.images.len(), 3);
    assert_eq!(output.images[0].original_url, "https://cdn.example/a.png");
    assert_eq!(output.images[0].local_path.as_deref(), Some("images/my-post/01.png"));
    assert_eq!(output.images[0].alt, "First");
    assert_eq!(output.images[1].local_path.as_deref(), Some("images/my-post/02.gif"));
    assert_eq!(output.images[1].alt, "second");
    // No recognized extension substring defaults to jpeg.
    assert_eq!(output.images[2].local_path.as_deref(), Some("images/my-post/03.jpeg"));
    assert_eq!(output.images[2].width, Some(640));
    assert_eq!(output.images[2].height, Some(480));
    assert_eq!(output.images[2].data_image_id.as_deref(), Some("1*c"));

    // Rewritten srcs line up one-to-one with the returned image list.
    for image in &output.images {
        assert!(
            output.markdown.contains(image.local_path.as_deref().unwrap()),
            "missing {:?} in markdown: {}",
            image.local_path,
            output.markdown
        );
    }
}

#[test]
fn flat_image_layout_uses_slug_prefixed_names() {
    let body = r#"<div class="section-inner"><img src="https://cdn.example/a.png"></div>"#;
    let mut config = download_config();
    config.images.per_post_dirs = false;
    let output = convert_body(&wrap_body(body), &config, "my-post").unwrap();
    assert_eq!(
        output.images[0].local_path.as_deref(),
        Some("images/my-post-01.png")
    );
}

#[test]
fn reference_mode_keeps_original_urls() {
    let body = r#"<div class="section-inner"><img src="https://cdn.example/a.png"></div>"#;
    let output = convert_body(&wrap_body(body), &MeddlerConfig::default(), "s").unwrap();
    assert_eq!(output.images[0].local_path, None);
    assert!(output.markdown.contains("https://cdn.example/a.png"));
}

#[test]
fn duplicate_title_and_subtitle_are_removed_from_the_body() {
    let body = r#"<div class="section-inner">
        <h3 class="graf--title">The Title</h3>
        <h4 class="graf--subtitle">The Subtitle</h4>
        <p>Actual content.</p>
    </div>"#;
    let output = convert_body(&wrap_body(body), &MeddlerConfig::default(), "s").unwrap();
    assert!(!output.markdown.contains("The Title"));
    assert!(!output.markdown.contains("The Subtitle"));
    assert!(output.markdown.contains("Actual content."));
}

#[test]
fn featured_figure_removal_keeps_later_images_aligned() {
    let body = r#"<div class="section-inner">
        <figure><img src="https://cdn.example/featured.png"></figure>
        <p>text</p>
        <figure><img src="https://cdn.example/inline.png"></figure>
    </div>"#;
    let mut config = download_config();
    config.images.remove_featured_from_body = true;
    let output = convert_body(&wrap_body(body), &config, "post").unwrap();

    // Both images are still reported with their own indices.
    assert_eq!(output.images.len(), 2);
    assert_eq!(output.images[0].local_path.as_deref(), Some("images/post/01.png"));
    assert_eq!(output.images[1].local_path.as_deref(), Some("images/post/02.png"));

    // The body keeps only the second image, under the second image's path.
    assert!(!output.markdown.contains("images/post/01.png"));
    assert!(output.markdown.contains("images/post/02.png"));
}

#[test]
fn section_breaks_separate_inner_sections() {
    let body = r#"
        <section class="section--body"><div class="section-inner"><p>one</p></div></section>
        <section class="section--body"><div class="section-inner"><p>two</p></div></section>"#;

    let output = convert_body(&wrap_body(body), &MeddlerConfig::default(), "s").unwrap();
    let one = output.markdown.find("one").unwrap();
    let hr = output.markdown.find("---").unwrap();
    let two = output.markdown.find("two").unwrap();
    assert!(one < hr && hr < two, "unexpected markdown: {}", output.markdown);

    let mut config = MeddlerConfig::default();
    config.content.section_breaks = SectionBreakMode::None;
    let output = convert_body(&wrap_body(body), &config, "s").unwrap();
    assert!(!output.markdown.contains("---"));
}

#[test]
fn section_dividers_render_as_nothing() {
    let body = r#"<div class="section-inner">
        <hr class="section-divider">
        <p>content</p>
    </div>
    <div class="section-divider"><hr></div>"#;
    let mut config = MeddlerConfig::default();
    config.content.section_breaks = SectionBreakMode::None;
    let output = convert_body(&wrap_body(body), &config, "s").unwrap();
    assert!(!output.markdown.contains("---"));
    assert!(output.markdown.contains("content"));
}

#[test]
fn fallback_extraction_tries_section_content_then_raw_body() {
    // Tier 2: section--body without .section-inner, with .section-content.
    let body = r#"<section class="section--body">
        <div class="section-content"><p>wrapped</p></div>
    </section>"#;
    let output = convert_body(&wrap_body(body), &MeddlerConfig::default(), "s").unwrap();
    assert!(output.markdown.contains("wrapped"));

    // Tier 3: no recognized structure at all falls back to the whole body.
    let body = r#"<p>bare paragraph</p>"#;
    let output = convert_body(&wrap_body(body), &MeddlerConfig::default(), "s").unwrap();
    assert!(output.markdown.contains("bare paragraph"));
}

#[test]
fn drop_caps_render_as_bare_text() {
    let body = r#"<div class="section-inner">
        <p><span class="graf-dropCap">O</span>nce upon a time.</p>
    </div>"#;
    let output = convert_body(&wrap_body(body), &MeddlerConfig::default(), "s").unwrap();
    assert!(output.markdown.contains("Once upon a time."));
    assert!(!output.markdown.contains("dropCap"));
}

#[test]
fn mixtape_cards_render_as_links() {
    let body = r#"<div class="section-inner">
        <div class="graf--mixtapeEmbed">
            <a href="https://example.com/article">
                <strong class="markup--strong">Linked Title</strong>
                <em class="markup--em">A description</em>
            </a>
        </div>
    </div>"#;
    let output = convert_body(&wrap_body(body), &MeddlerConfig::default(), "s").unwrap();
    assert!(
        output
            .markdown
            .contains("[**Linked Title** — *A description*](https://example.com/article)"),
        "markdown: {}",
        output.markdown
    );
}

#[test]
fn mixtape_without_description_degrades_to_title_only() {
    let body = r#"<div class="section-inner">
        <div class="graf--mixtapeEmbed">
            <a href="https://example.com/a"><strong>Only Title</strong></a>
        </div>
    </div>"#;
    let output = convert_body(&wrap_body(body), &MeddlerConfig::default(), "s").unwrap();
    assert!(output
        .markdown
        .contains("[**Only Title**](https://example.com/a)"));
}

#[test]
fn iframe_placeholder_mode_emits_a_link() {
    let body = r#"<div class="section-inner">
        <iframe src="https://www.youtube.com/embed/dQw4w9WgXcQ"></iframe>
    </div>"#;
    let mut config = MeddlerConfig::default();
    config.embeds.mode = EmbedMode::Placeholders;
    let output = convert_body(&wrap_body(body), &config, "s").unwrap();
    assert!(output
        .markdown
        .contains("[Embedded content](https://www.youtube.com/embed/dQw4w9WgXcQ)"));
}

#[test]
fn iframe_shortcode_mode_recognizes_known_providers() {
    let body = r#"<div class="section-inner">
        <iframe src="https://www.youtube.com/embed/dQw4w9WgXcQ"></iframe>
        <iframe src="https://gist.github.com/octocat/abcdef0123456789.js"></iframe>
        <iframe src="https://twitter.com/user/status/1234567890"></iframe>
    </div>"#;
    let mut config = MeddlerConfig::default();
    config.embeds.mode = EmbedMode::Shortcodes;
    config.embeds.shortcode_format = SsgTarget::Hugo;
    let output = convert_body(&wrap_body(body), &config, "s").unwrap();

    assert!(output.markdown.contains(r#"{{< youtube "dQw4w9WgXcQ" >}}"#));
    assert!(output.markdown.contains(r#"{{< gist "octocat""#));
    assert!(output.markdown.contains(r#"{{< tweet "1234567890" >}}"#));

    config.embeds.shortcode_format = SsgTarget::Generic;
    let output = convert_body(&wrap_body(body), &config, "s").unwrap();
    assert!(output.markdown.contains(r#"{% youtube "dQw4w9WgXcQ" %}"#));
    assert!(output
        .markdown
        .contains("<script src=\"https://gist.github.com/octocat/"));
}

#[test]
fn unrecognized_shortcode_embeds_fall_back_to_raw_iframes() {
    let body = r#"<div class="section-inner">
        <iframe src="https://player.example.com/x" width="640" height="360"></iframe>
    </div>"#;
    let mut config = MeddlerConfig::default();
    config.embeds.mode = EmbedMode::Shortcodes;
    let output = convert_body(&wrap_body(body), &config, "s").unwrap();
    assert!(output.markdown.contains(
        r#"<iframe src="https://player.example.com/x" width="640" height="360" frameborder="0"></iframe>"#
    ));
}

#[test]
fn raw_mode_defaults_missing_dimensions() {
    let body = r#"<div class="section-inner">
        <iframe src="https://player.example.com/x"></iframe>
    </div>"#;
    let output = convert_body(&wrap_body(body), &MeddlerConfig::default(), "s").unwrap();
    assert!(output.markdown.contains(
        r#"<iframe src="https://player.example.com/x" width="100%" height="400" frameborder="0"></iframe>"#
    ));
}

#[test]
fn excess_blank_lines_collapse_and_edges_are_trimmed() {
    let body = r#"<div class="section-inner">
        <p>a</p><div></div><div></div><p>b</p>
    </div>"#;
    let output = convert_body(&wrap_body(body), &MeddlerConfig::default(), "s").unwrap();
    assert!(!output.markdown.contains("\n\n\n"));
    assert!(!output.markdown.starts_with('\n'));
    assert!(!output.markdown.ends_with('\n'));
}

#[test]
fn custom_rules_keep_their_contractual_order() {
    assert_eq!(
        RULE_ORDER,
        ["drop_cap", "section_divider", "mixtape_embed", "iframe_embed"]
    );
}
