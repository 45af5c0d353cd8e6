//! Response/comment detection.
//!
//! Medium exports short responses left on other posts as regular post files.
//! There is no marker distinguishing them, so classification is a pure
//! heuristic over the document: tiny, flat, image-free posts are assumed to
//! be responses. Misclassification in either direction is possible and
//! accepted; callers treat the result as a best-effort label, not a fact.

use std::sync::LazyLock;

use scraper::{Html, Selector};

static BODY_SECTION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"section[data-field="body"]"#).expect("hardcoded selector is valid")
});
static PARAGRAPHS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"p.graf--p, p[class*="graf--p"]"#).expect("hardcoded selector is valid")
});
static SUBHEADINGS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h3:not(.graf--title), h4:not(.graf--subtitle), h2")
        .expect("hardcoded selector is valid")
});
static FIGURES: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("figure.graf--figure, img.graf-image").expect("hardcoded selector is valid")
});

/// Tunable limits for [`detect_response`].
///
/// The defaults reproduce the reference behavior. Neither number is
/// principled; they are preserved, not endorsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseThresholds {
    /// A response has at most this many body paragraphs.
    pub max_paragraphs: usize,
    /// A response has at most this many characters of body text.
    pub max_text_len: usize,
}

impl Default for ResponseThresholds {
    fn default() -> Self {
        Self {
            max_paragraphs: 3,
            max_text_len: 500,
        }
    }
}

/// Returns true when the document looks like a short response rather than a
/// full post: few paragraphs, no subheadings, no figures, little text.
pub fn detect_response(doc: &Html, thresholds: &ResponseThresholds) -> bool {
    let Some(body) = doc.select(&BODY_SECTION).next() else {
        return false;
    };

    if body.select(&PARAGRAPHS).count() > thresholds.max_paragraphs {
        return false;
    }
    if body.select(&SUBHEADINGS).next().is_some() {
        return false;
    }
    if body.select(&FIGURES).next().is_some() {
        return false;
    }

    let text_len = body.text().collect::<String>().trim().chars().count();
    text_len <= thresholds.max_text_len
}

#[cfg(test)]
mod tests {
    use super::{detect_response, ResponseThresholds};
    use scraper::Html;

    fn body(inner: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><body><section data-field="body">{inner}</section></body></html>"#
        ))
    }

    #[test]
    fn short_flat_post_is_a_response() {
        let doc = body(r#"<p class="graf--p">Nice article, thanks!</p>"#);
        assert!(detect_response(&doc, &ResponseThresholds::default()));
    }

    #[test]
    fn long_text_is_not_a_response_regardless_of_structure() {
        let long = "x".repeat(501);
        let doc = body(&format!(r#"<p class="graf--p">{long}</p>"#));
        assert!(!detect_response(&doc, &ResponseThresholds::default()));
    }

    #[test]
    fn subheadings_disqualify() {
        let doc = body(r#"<p class="graf--p">short</p><h3>Part one</h3>"#);
        assert!(!detect_response(&doc, &ResponseThresholds::default()));
    }

    #[test]
    fn figures_disqualify() {
        let doc = body(
            r#"<p class="graf--p">short</p><figure class="graf--figure"><img src="x"></figure>"#,
        );
        assert!(!detect_response(&doc, &ResponseThresholds::default()));
    }

    #[test]
    fn missing_body_section_is_not_a_response() {
        let doc = Html::parse_document("<html><body><p>loose</p></body></html>");
        assert!(!detect_response(&doc, &ResponseThresholds::default()));
    }

    #[test]
    fn thresholds_are_honored_at_the_boundary() {
        let doc = body(
            r#"<p class="graf--p">a</p><p class="graf--p">b</p>
               <p class="graf--p">c</p><p class="graf--p">d</p>"#,
        );
        assert!(!detect_response(&doc, &ResponseThresholds::default()));
        let relaxed = ResponseThresholds {
            max_paragraphs: 4,
            max_text_len: 500,
        };
        assert!(detect_response(&doc, &relaxed));
    }
}
