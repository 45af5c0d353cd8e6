use meddler_core::PostType;
use meddler_engine::{extract_metadata, parse_filename};
use pretty_assertions::assert_eq;

fn post_html(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><title>Page Title</title></head>
<body>
<article class="h-entry">
  <header><h1 class="p-name">Hello World</h1></header>
  <section data-field="subtitle" class="p-summary">
    A subtitle
  </section>
  <section data-field="body" class="e-content">{body}</section>
  <footer>
    <p>By <a href="https://medium.com/@janedoe" class="p-author h-card">Jane Doe</a> on
      <time class="dt-published" datetime="2020-05-14T12:00:00.000Z">May 14, 2020</time>.</p>
    <p><a class="p-canonical" href="https://medium.com/@janedoe/hello-world-abc123def456">
      Canonical link</a></p>
  </footer>
</article>
</body></html>"#
    )
}

const FULL_BODY: &str = r#"
<section class="section--body section--first">
  <div class="section-content"><div class="section-inner sectionLayout--insetColumn">
    <h3 class="graf--title">Hello World</h3>
    <figure class="graf--figure">
      <img class="graf-image" data-image-id="1*abc.jpeg" data-width="800" data-height="600"
           src="https://cdn-images-1.medium.com/max/800/1*abc.jpeg">
      <figcaption class="imageCaption">A caption</figcaption>
    </figure>
    <p class="graf--p">First paragraph of the post.</p>
    <h4 class="graf--h4">A real subheading</h4>
    <p class="graf--p">Second paragraph with more words in it.</p>
  </div></div>
</section>"#;

#[test]
fn metadata_is_extracted_from_the_designated_elements() {
    let html = post_html(FULL_BODY);
    let metadata = extract_metadata(&html, "2020-05-14_Hello-World-abc123def456.html");

    assert_eq!(metadata.title, "Hello World");
    assert_eq!(metadata.subtitle, "A subtitle");
    assert_eq!(metadata.date.as_deref(), Some("2020-05-14T12:00:00.000Z"));
    assert_eq!(metadata.slug, "hello-world");
    assert_eq!(metadata.medium_id, "abc123def456");
    assert_eq!(
        metadata.canonical_url.as_deref(),
        Some("https://medium.com/@janedoe/hello-world-abc123def456")
    );
    assert_eq!(metadata.author.as_deref(), Some("Jane Doe"));
    assert_eq!(metadata.author_username.as_deref(), Some("janedoe"));
    assert!(!metadata.draft);
    assert_eq!(metadata.post_type, PostType::Published);
    assert_eq!(
        metadata.image.as_deref(),
        Some("https://cdn-images-1.medium.com/max/800/1*abc.jpeg")
    );
    assert_eq!(metadata.image_caption.as_deref(), Some("A caption"));
    assert_eq!(metadata.filename, "2020-05-14_Hello-World-abc123def456.html");
    assert!(metadata.tags.is_empty());
    assert_eq!(metadata.earnings, None);
}

#[test]
fn footer_timestamp_is_preferred_over_the_filename_date() {
    let html = post_html(FULL_BODY);
    let metadata = extract_metadata(&html, "2019-01-01_Hello-World-abc123def456.html");
    assert_eq!(metadata.date.as_deref(), Some("2020-05-14T12:00:00.000Z"));
}

#[test]
fn missing_footer_timestamp_falls_back_to_the_filename_date() {
    let html = r#"<html><head><title>T</title></head><body>
        <section data-field="body"><p>text</p></section></body></html>"#;
    let metadata = extract_metadata(html, "2020-05-14_Hello-World-abc123def456.html");
    assert_eq!(metadata.date.as_deref(), Some("2020-05-14"));
}

#[test]
fn title_falls_back_to_the_page_title_then_untitled() {
    let html = r#"<html><head><title>Fallback Title</title></head><body></body></html>"#;
    let metadata = extract_metadata(html, "2020-05-14_X-abc123.html");
    assert_eq!(metadata.title, "Fallback Title");

    let metadata = extract_metadata("<html></html>", "2020-05-14_X-abc123.html");
    assert_eq!(metadata.title, "Untitled");
}

#[test]
fn draft_filenames_classify_as_drafts() {
    let html = post_html(FULL_BODY);
    let metadata = extract_metadata(&html, "draft_Hello-World-abc123def456.html");
    assert!(metadata.draft);
    assert_eq!(metadata.post_type, PostType::Draft);
    // Drafts have no filename date and this fixture's footer date still wins.
    assert_eq!(metadata.date.as_deref(), Some("2020-05-14T12:00:00.000Z"));
}

#[test]
fn short_flat_posts_classify_as_responses() {
    let body = r#"<p class="graf--p">Totally agree with this, thanks for writing it.</p>"#;
    let html = post_html(body);
    let metadata = extract_metadata(&html, "2020-05-14_Re-Something-abc123.html");
    assert_eq!(metadata.post_type, PostType::Response);
}

#[test]
fn fifty_characters_of_loose_text_is_a_response() {
    // No matched paragraphs, no headings, no images, 50 chars of text.
    let body = format!("<div>{}</div>", "x".repeat(50));
    let html = post_html(&body);
    let metadata = extract_metadata(&html, "2020-05-14_Short-abc123.html");
    assert_eq!(metadata.post_type, PostType::Response);
}

#[test]
fn missing_optional_elements_degrade_to_none() {
    let filler = "plenty of plain text. ".repeat(40);
    let html = format!(
        r#"<html><head><title>T</title></head><body>
        <section data-field="body"><p>{filler}</p></section></body></html>"#
    );
    let metadata = extract_metadata(&html, "2020-05-14_Plain-abc123.html");

    assert_eq!(metadata.canonical_url, None);
    assert_eq!(metadata.author, None);
    assert_eq!(metadata.author_username, None);
    assert_eq!(metadata.image, None);
    assert_eq!(metadata.image_caption, None);
    assert_eq!(metadata.subtitle, "");
    assert_eq!(metadata.post_type, PostType::Published);
}

#[test]
fn filename_parse_worked_examples() {
    let parsed = parse_filename("2020-05-14_How-I-Learned-to-Stop-Worrying-ab12cd34ef56.html");
    assert_eq!(parsed.date.as_deref(), Some("2020-05-14"));
    assert_eq!(parsed.slug, "how-i-learned-to-stop-worrying");
    assert_eq!(parsed.medium_id, "ab12cd34ef56");
    assert!(!parsed.is_draft);

    let parsed = parse_filename("draft_Untitled-Draft-000011112222.html");
    assert_eq!(parsed.date, None);
    assert_eq!(parsed.slug, "untitled-draft");
    assert_eq!(parsed.medium_id, "000011112222");
    assert!(parsed.is_draft);
}
