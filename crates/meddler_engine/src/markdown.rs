//! Rule-based HTML -> Markdown rendering.
//!
//! The renderer wraps `htmd` (ATX headings, fenced code, `-` bullets, `---`
//! rules, `*`/`**` emphasis) and layers Medium-specific custom rules on top.
//! The rules form an explicit ordered sequence ([`RULE_ORDER`]); for every
//! element claimed by a custom handler the dispatcher walks that sequence and
//! the first matching rule renders the element. Elements no rule matches fall
//! back to a per-tag default.

use std::rc::Rc;

use htmd::{
    element_handler::{HandlerResult, Handlers},
    Element, HtmlToMarkdown,
};
use htmd::options::{BulletListMarker, CodeBlockStyle, HeadingStyle, HrStyle, Options};
use markup5ever_rcdom::{Node, NodeData};
use url::Url;

use meddler_core::{EmbedMode, MeddlerConfig, SsgTarget};

/// The custom rules in evaluation order. First match wins; later rules are
/// not consulted for an element an earlier rule rendered.
pub const RULE_ORDER: [&str; 4] = [
    "drop_cap",
    "section_divider",
    "mixtape_embed",
    "iframe_embed",
];

/// The slice of config the custom rules need.
#[derive(Debug, Clone, Copy)]
struct RenderConfig {
    embed_mode: EmbedMode,
    shortcode_format: SsgTarget,
}

/// HTML -> Markdown renderer configured for one conversion run.
pub struct MarkdownRenderer {
    converter: HtmlToMarkdown,
}

impl MarkdownRenderer {
    pub fn new(config: &MeddlerConfig) -> Self {
        let cfg = RenderConfig {
            embed_mode: config.embeds.mode,
            shortcode_format: config.embeds.shortcode_format,
        };

        let converter = HtmlToMarkdown::builder()
            .skip_tags(vec!["script", "style", "noscript"])
            .options(Options {
                heading_style: HeadingStyle::Atx,
                hr_style: HrStyle::Dashes,
                bullet_list_marker: BulletListMarker::Dash,
                code_block_style: CodeBlockStyle::Fenced,
                ..Default::default()
            })
            .add_handler(vec!["span"], as_element_handler(move |handlers, element| {
                dispatch(cfg, handlers, &element, "span").or_else(|| {
                    // Default: spans are transparent inline wrappers.
                    Some(HandlerResult::from(
                        handlers.walk_children(element.node).content,
                    ))
                })
            }))
            .add_handler(vec!["hr"], as_element_handler(move |handlers, element| {
                dispatch(cfg, handlers, &element, "hr")
                    .or_else(|| Some(HandlerResult::from("\n\n---\n\n".to_string())))
            }))
            .add_handler(vec!["div"], as_element_handler(move |handlers, element| {
                dispatch(cfg, handlers, &element, "div").or_else(|| {
                    let content = handlers.walk_children(element.node).content;
                    let trimmed = content.trim_matches('\n');
                    if trimmed.is_empty() {
                        Some(HandlerResult::from(String::new()))
                    } else {
                        Some(HandlerResult::from(format!("\n\n{trimmed}\n\n")))
                    }
                })
            }))
            .add_handler(vec!["iframe"], as_element_handler(move |handlers, element| {
                dispatch(cfg, handlers, &element, "iframe")
            }))
            .add_handler(vec!["em", "i"], as_element_handler(move |handlers, element| {
                let content = handlers.walk_children(element.node).content;
                let trimmed = content.trim();
                if trimmed.is_empty() {
                    Some(HandlerResult::from(String::new()))
                } else {
                    Some(HandlerResult::from(format!("*{trimmed}*")))
                }
            }))
            .build();

        Self { converter }
    }

    /// Renders an HTML fragment to Markdown.
    pub fn render(&self, html: &str) -> std::io::Result<String> {
        self.converter.convert(html)
    }
}

/// Coerces a closure to the element-handler signature so its argument
/// lifetimes are inferred as higher-ranked. The sibling handlers get this for
/// free from their `dispatch` call; the `em`/`i` handler calls no such helper,
/// so without this the closure's parameter types cannot be inferred.
fn as_element_handler<F>(f: F) -> F
where
    F: Fn(&dyn Handlers, Element) -> Option<HandlerResult>,
{
    f
}

/// Walks [`RULE_ORDER`] and renders with the first rule that matches.
fn dispatch(
    cfg: RenderConfig,
    handlers: &dyn Handlers,
    element: &Element,
    tag: &str,
) -> Option<HandlerResult> {
    for rule in RULE_ORDER {
        let rendered = match rule {
            "drop_cap" => drop_cap(handlers, element, tag),
            "section_divider" => section_divider(element, tag),
            "mixtape_embed" => mixtape_embed(element, tag),
            "iframe_embed" => iframe_embed(cfg, element, tag),
            _ => None,
        };
        if rendered.is_some() {
            return rendered;
        }
    }
    None
}

/// Medium drop caps are styling only; render the bare letter.
fn drop_cap(handlers: &dyn Handlers, element: &Element, tag: &str) -> Option<HandlerResult> {
    if tag != "span" || !has_class(element, "graf-dropCap") {
        return None;
    }
    Some(HandlerResult::from(
        handlers.walk_children(element.node).content,
    ))
}

/// Structural section dividers duplicate the section-break separator the
/// body converter already inserts; render nothing.
fn section_divider(element: &Element, tag: &str) -> Option<HandlerResult> {
    if tag != "hr" || !has_class(element, "section-divider") {
        return None;
    }
    Some(HandlerResult::from(String::new()))
}

/// Mixtape embeds are linked article preview cards. Render as a one-line
/// link, degrading as title/description go missing.
fn mixtape_embed(element: &Element, tag: &str) -> Option<HandlerResult> {
    if tag != "div" || !class_contains(element, "mixtapeEmbed") {
        return None;
    }

    let Some(anchor) = find_descendant(element.node, "a") else {
        return Some(HandlerResult::from(String::new()));
    };
    let href = node_attr(&anchor, "href").unwrap_or_default();
    let title = find_descendant(element.node, "strong")
        .map(|n| node_text(&n).trim().to_string())
        .unwrap_or_default();
    let desc = find_descendant(element.node, "em")
        .map(|n| node_text(&n).trim().to_string())
        .unwrap_or_default();

    let rendered = if !title.is_empty() && !desc.is_empty() {
        format!("\n[**{title}** — *{desc}*]({href})\n")
    } else if !title.is_empty() {
        format!("\n[**{title}**]({href})\n")
    } else {
        let text = node_text(&anchor).trim().to_string();
        let text = if text.is_empty() { href.clone() } else { text };
        format!("\n[{text}]({href})\n")
    };
    Some(HandlerResult::from(rendered))
}

/// Renders `<iframe>` embeds per the configured embed mode.
fn iframe_embed(cfg: RenderConfig, element: &Element, tag: &str) -> Option<HandlerResult> {
    if tag != "iframe" {
        return None;
    }
    let src = get_attr(element.attrs, "src").unwrap_or_default();

    let rendered = match cfg.embed_mode {
        EmbedMode::Placeholders => format!("\n[Embedded content]({src})\n"),
        EmbedMode::Shortcodes => match detect_shortcode(&src, cfg.shortcode_format) {
            Some(shortcode) => format!("\n{shortcode}\n"),
            None => raw_iframe(element, &src),
        },
        EmbedMode::RawHtml => raw_iframe(element, &src),
    };
    Some(HandlerResult::from(rendered))
}

fn raw_iframe(element: &Element, src: &str) -> String {
    let width = get_attr(element.attrs, "width").unwrap_or_else(|| "100%".to_string());
    let height = get_attr(element.attrs, "height").unwrap_or_else(|| "400".to_string());
    format!(
        "\n<iframe src=\"{src}\" width=\"{width}\" height=\"{height}\" frameborder=\"0\"></iframe>\n"
    )
}

/// Recognizes known embed providers and emits the target's shortcode.
fn detect_shortcode(src: &str, format: SsgTarget) -> Option<String> {
    let url = parse_embed_url(src)?;
    let host = url.host_str()?.to_ascii_lowercase();
    let segments: Vec<String> = url
        .path_segments()?
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    // YouTube: /embed/<video-id>
    if (host == "youtube.com" || host.ends_with(".youtube.com"))
        && segments.first().map(String::as_str) == Some("embed")
    {
        let id = segments.get(1)?;
        if !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Some(if format == SsgTarget::Hugo {
                format!("{{{{< youtube \"{id}\" >}}}}")
            } else {
                format!("{{% youtube \"{id}\" %}}")
            });
        }
        return None;
    }

    // GitHub Gist: gist.github.com/<user>/<hex-id>, often with a .js suffix.
    if host == "gist.github.com" {
        let user = segments.first()?;
        let id: String = segments
            .get(1)?
            .chars()
            .take_while(|c| c.is_ascii_digit() || ('a'..='f').contains(c))
            .collect();
        if !id.is_empty() {
            return Some(if format == SsgTarget::Hugo {
                format!("{{{{< gist \"{user}\" \"{id}\" >}}}}")
            } else {
                format!("<script src=\"https://gist.github.com/{user}/{id}.js\"></script>")
            });
        }
        return None;
    }

    // Twitter/X status embeds: twitter.com/<user>/status/<id>
    if (host == "twitter.com" || host.ends_with(".twitter.com"))
        && segments.len() >= 3
        && segments[1] == "status"
    {
        let id = &segments[2];
        if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
            return Some(if format == SsgTarget::Hugo {
                format!("{{{{< tweet \"{id}\" >}}}}")
            } else {
                format!("{{% tweet \"{id}\" %}}")
            });
        }
        return None;
    }

    None
}

fn parse_embed_url(src: &str) -> Option<Url> {
    if let Ok(url) = Url::parse(src) {
        return Some(url);
    }
    // Protocol-relative srcs show up in older exports.
    if let Some(rest) = src.strip_prefix("//") {
        return Url::parse(&format!("https://{rest}")).ok();
    }
    None
}

// === rcdom helpers ===

fn get_attr(attrs: &[html5ever::Attribute], name: &str) -> Option<String> {
    attrs
        .iter()
        .find(|a| &*a.name.local == name)
        .map(|a| a.value.to_string())
        .filter(|v| !v.trim().is_empty())
}

fn has_class(element: &Element, class: &str) -> bool {
    get_attr(element.attrs, "class")
        .is_some_and(|value| value.split_whitespace().any(|token| token == class))
}

fn class_contains(element: &Element, needle: &str) -> bool {
    get_attr(element.attrs, "class").is_some_and(|value| value.contains(needle))
}

fn find_descendant(node: &Rc<Node>, tag: &str) -> Option<Rc<Node>> {
    for child in node.children.borrow().iter() {
        if let NodeData::Element { ref name, .. } = child.data {
            if &*name.local == tag {
                return Some(child.clone());
            }
        }
        if let Some(found) = find_descendant(child, tag) {
            return Some(found);
        }
    }
    None
}

/// Raw text content of a node tree.
fn node_text(node: &Rc<Node>) -> String {
    let mut text = String::new();
    collect_text(node, &mut text);
    text
}

fn collect_text(node: &Rc<Node>, out: &mut String) {
    match &node.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        NodeData::Comment { .. } | NodeData::ProcessingInstruction { .. } => {}
        _ => {
            for child in node.children.borrow().iter() {
                collect_text(child, out);
            }
        }
    }
}

fn node_attr(node: &Rc<Node>, name: &str) -> Option<String> {
    if let NodeData::Element { ref attrs, .. } = node.data {
        attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == name)
            .map(|a| a.value.to_string())
    } else {
        None
    }
}
