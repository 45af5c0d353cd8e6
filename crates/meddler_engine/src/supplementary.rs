//! Supplementary dataset extractors.
//!
//! Each function turns one family of export HTML documents into a flat list
//! of typed records through straightforward element selection. Paginated
//! datasets receive their documents in filename-sorted order. Malformed
//! entries are skipped silently; a dataset that fails entirely is the
//! caller's problem to report.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use meddler_core::{
    BookmarkEntry, ClapEntry, ConnectedAccounts, EarningsEntry, FollowedUser, FollowingData,
    HighlightEntry, InterestsData, ListData, ListPost, NamedLink, ProfileData, PublicationRole,
    PublicationRoleKind,
};

static LI: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li").expect("hardcoded selector is valid"));
static LI_ENTRY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li.h-entry").expect("hardcoded selector is valid"));
static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("hardcoded selector is valid"));
static CITE_ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.h-cite").expect("hardcoded selector is valid"));
static PUBLISHED_TIME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("time.dt-published").expect("hardcoded selector is valid"));
static PARAGRAPH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("hardcoded selector is valid"));
static BODY_SECTION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"section[data-field="body"]"#).expect("hardcoded selector is valid")
});
static SECTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("section").expect("hardcoded selector is valid"));
static PROFILE_NAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3.p-name").expect("hardcoded selector is valid"));
static PROFILE_PHOTO: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img.u-photo").expect("hardcoded selector is valid"));
static PROFILE_URL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.u-url").expect("hardcoded selector is valid"));
static ROLE_HEADING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h4").expect("hardcoded selector is valid"));
static HIGHLIGHT_SPAN: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"span.markup--highlight, span[name="selection"]"#)
        .expect("hardcoded selector is valid")
});
static LIST_NAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1.p-name").expect("hardcoded selector is valid"));
static LIST_SUMMARY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2.p-summary").expect("hardcoded selector is valid"));
static LIST_FOOTER_LINK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"footer a[href*="list"]"#).expect("hardcoded selector is valid")
});
static LIST_POST: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"li[data-field="post"]"#).expect("hardcoded selector is valid")
});

/// Extracts profile data from `profile/profile.html`.
///
/// Label-prefixed `<li>` items are matched case-sensitively against the full
/// item text; when a label occurs more than once the last match wins.
pub fn parse_profile(html: &str) -> ProfileData {
    let doc = Html::parse_document(html);

    let display_name = first_text(&doc, &PROFILE_NAME);
    let avatar_url = doc
        .select(&PROFILE_PHOTO)
        .next()
        .and_then(|el| el.value().attr("src"))
        .map(str::to_string);

    let username = doc
        .select(&PROFILE_URL)
        .next()
        .and_then(|el| el.value().attr("href"))
        .and_then(username_from_href);

    let email = labeled_item(&doc, "Email address:");
    let medium_user_id = labeled_item(&doc, "Medium user ID:");
    let created_at = labeled_item(&doc, "Created at:");

    let twitter = twitter_handle(&doc);
    let twitter_id = labeled_item(&doc, "X account ID:");
    let facebook = labeled_item(&doc, "Facebook display name:");
    let facebook_id = labeled_item(&doc, "Facebook account ID:");

    let membership_date = doc
        .select(&SECTION)
        .map(|section| element_text(section))
        .find_map(|text| {
            text.split_once("Became a Medium member at ")
                .map(|(_, rest)| rest.trim().to_string())
        })
        .filter(|text| !text.is_empty());

    ProfileData {
        display_name,
        username,
        email,
        medium_user_id,
        avatar_url,
        bio: None, // extracted separately from about.html
        created_at,
        connected_accounts: ConnectedAccounts {
            twitter,
            twitter_id,
            facebook,
            facebook_id,
        },
        membership_date,
    }
}

/// Extracts the bio from `profile/about.html` as blank-line-joined
/// paragraphs.
pub fn parse_about(html: &str) -> String {
    let doc = Html::parse_document(html);
    let Some(body) = doc.select(&BODY_SECTION).next() else {
        return String::new();
    };

    body.select(&PARAGRAPH)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Extracts publication roles from `profile/publications.html`: an `<h4>`
/// role heading followed by a `<ul>` of publication links.
pub fn parse_publications(html: &str) -> Vec<PublicationRole> {
    let doc = Html::parse_document(html);
    let mut roles = Vec::new();

    for heading in doc.select(&ROLE_HEADING) {
        let kind = match element_text(heading).to_lowercase().as_str() {
            "editor" => PublicationRoleKind::Editor,
            "writer" => PublicationRoleKind::Writer,
            _ => continue,
        };

        let Some(list) = next_element_sibling(heading).filter(|el| el.value().name() == "ul")
        else {
            continue;
        };

        for item in list.select(&LI) {
            let Some(link) = item.select(&ANCHOR).next() else {
                continue;
            };
            let full_text = element_text(item);
            roles.push(PublicationRole {
                name: element_text(link),
                url: link.value().attr("href").unwrap_or_default().to_string(),
                role: kind,
                ownership_note: parenthesized(&full_text),
            });
        }
    }

    roles
}

/// Parses bookmarks from `bookmarks/bookmarks-NNNN.html` documents.
pub fn parse_bookmarks(htmls: &[String]) -> Vec<BookmarkEntry> {
    let mut entries = Vec::new();
    for html in htmls {
        let doc = Html::parse_document(html);
        for item in doc.select(&LI) {
            let Some(link) = item.select(&CITE_ANCHOR).next() else {
                continue;
            };
            entries.push(BookmarkEntry {
                title: element_text(link),
                url: link.value().attr("href").unwrap_or_default().to_string(),
                date_bookmarked: item
                    .select(&PUBLISHED_TIME)
                    .next()
                    .map(element_text)
                    .filter(|text| !text.is_empty()),
            });
        }
    }
    entries
}

/// Parses claps from `claps/claps-NNNN.html` documents.
///
/// The clap count comes from a `+N` prefix in the entry text; entries
/// without the prefix count as 1, not 0.
pub fn parse_claps(htmls: &[String]) -> Vec<ClapEntry> {
    let mut entries = Vec::new();
    for html in htmls {
        let doc = Html::parse_document(html);
        for item in doc.select(&LI_ENTRY) {
            let Some(link) = item.select(&CITE_ANCHOR).next() else {
                continue;
            };
            let text = item.text().collect::<String>();
            entries.push(ClapEntry {
                title: element_text(link),
                url: link.value().attr("href").unwrap_or_default().to_string(),
                claps: clap_count(&text),
                date: item
                    .select(&PUBLISHED_TIME)
                    .next()
                    .map(element_text)
                    .filter(|t| !t.is_empty()),
            });
        }
    }
    entries
}

fn clap_count(text: &str) -> u32 {
    let Some(rest) = text.strip_prefix('+') else {
        return 1;
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(1)
}

/// Parses highlights from `highlights/highlights-NNNN.html` documents.
pub fn parse_highlights(htmls: &[String]) -> Vec<HighlightEntry> {
    let mut entries = Vec::new();
    for html in htmls {
        let doc = Html::parse_document(html);
        for item in doc.select(&LI_ENTRY) {
            let quote = {
                let highlighted: String = item
                    .select(&HIGHLIGHT_SPAN)
                    .flat_map(|span| span.text())
                    .collect();
                if highlighted.trim().is_empty() {
                    item.select(&PARAGRAPH)
                        .flat_map(|p| p.text())
                        .collect::<String>()
                        .trim()
                        .to_string()
                } else {
                    highlighted.trim().to_string()
                }
            };
            if quote.is_empty() {
                continue;
            }
            entries.push(HighlightEntry {
                quote,
                date: item
                    .select(&PUBLISHED_TIME)
                    .next()
                    .map(element_text)
                    .filter(|t| !t.is_empty()),
            });
        }
    }
    entries
}

/// Parses a single reading list from `lists/<name>.html`.
pub fn parse_list(html: &str, filename: &str) -> ListData {
    let doc = Html::parse_document(html);

    let name = first_text(&doc, &LIST_NAME)
        .or_else(|| first_text(&doc, &LIST_SUMMARY))
        .unwrap_or_else(|| {
            filename
                .strip_suffix(".html")
                .unwrap_or(filename)
                .to_string()
        });

    let date = doc.select(&PUBLISHED_TIME).next().map(|el| {
        el.value()
            .attr("datetime")
            .map(str::to_string)
            .unwrap_or_else(|| element_text(el))
    });

    let list_url = doc
        .select(&LIST_FOOTER_LINK)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(str::to_string);

    let mut posts = Vec::new();
    for item in doc.select(&LIST_POST) {
        let Some(link) = item.select(&ANCHOR).next() else {
            continue;
        };
        posts.push(ListPost {
            title: element_text(link),
            url: link.value().attr("href").unwrap_or_default().to_string(),
        });
    }

    ListData {
        name,
        date,
        list_url,
        posts,
    }
}

/// Parses partner-program earnings from `partner-program/posts-NNNN.html`.
///
/// The Medium id is the last hyphen-delimited segment of the entry URL's
/// final path component, mirroring the post filename convention; it is the
/// sole join key back to post metadata.
pub fn parse_earnings(htmls: &[String]) -> Vec<EarningsEntry> {
    let mut entries = Vec::new();
    for html in htmls {
        let doc = Html::parse_document(html);
        for item in doc.select(&LI_ENTRY) {
            let Some(link) = item.select(&ANCHOR).next() else {
                continue;
            };
            let href = link.value().attr("href").unwrap_or_default().to_string();
            let text = item.text().collect::<String>();

            entries.push(EarningsEntry {
                title: element_text(link),
                medium_id: medium_id_from_url(&href),
                url: href,
                earnings: trailing_dollar_amount(&text).unwrap_or(0.0),
            });
        }
    }
    entries
}

/// Matches a trailing `$amount` (with optional trailing whitespace).
fn trailing_dollar_amount(text: &str) -> Option<f64> {
    let trimmed = text.trim_end();
    let dollar = trimmed.rfind('$')?;
    let amount = &trimmed[dollar + 1..];
    if amount.is_empty() || !amount.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.') {
        return None;
    }
    amount.replace(',', "").parse().ok()
}

fn medium_id_from_url(href: &str) -> String {
    let last_segment = href.split('/').next_back().unwrap_or_default();
    match last_segment.rfind('-') {
        Some(idx) => last_segment[idx + 1..].to_string(),
        None => String::new(),
    }
}

/// Parses the social graph from the three `*-following/` directories.
pub fn parse_following(
    users_htmls: &[String],
    pubs_htmls: &[String],
    topics_htmls: &[String],
) -> FollowingData {
    FollowingData {
        users: link_items(users_htmls)
            .into_iter()
            .map(|link| FollowedUser {
                username: link.name,
                url: link.url,
            })
            .collect(),
        publications: link_items(pubs_htmls),
        topics: link_items(topics_htmls),
    }
}

/// The four optional interest documents.
#[derive(Debug, Clone, Default)]
pub struct InterestsInput {
    pub tags: Option<String>,
    pub topics: Option<String>,
    pub publications: Option<String>,
    pub writers: Option<String>,
}

/// Parses interests from the `interests/` directory files.
pub fn parse_interests(input: &InterestsInput) -> InterestsData {
    let parse = |html: &Option<String>| match html {
        Some(html) => link_items(std::slice::from_ref(html)),
        None => Vec::new(),
    };

    InterestsData {
        tags: parse(&input.tags),
        topics: parse(&input.topics),
        publications: parse(&input.publications),
        writers: parse(&input.writers),
    }
}

/// `<li><a>` pairs across a set of documents.
fn link_items(htmls: &[String]) -> Vec<NamedLink> {
    let mut items = Vec::new();
    for html in htmls {
        let doc = Html::parse_document(html);
        for item in doc.select(&LI) {
            let Some(link) = item.select(&ANCHOR).next() else {
                continue;
            };
            items.push(NamedLink {
                name: element_text(link),
                url: link.value().attr("href").unwrap_or_default().to_string(),
            });
        }
    }
    items
}

/// Scans `<li>` items for a label prefix; the last matching item wins.
fn labeled_item(doc: &Html, label: &str) -> Option<String> {
    let mut value = None;
    for item in doc.select(&LI) {
        let text = item.text().collect::<String>();
        if let Some(rest) = text.strip_prefix(label) {
            value = Some(rest.trim().to_string());
        }
    }
    value
}

/// Connected X/Twitter handle: prefer the profile link, fall back to the
/// label text.
fn twitter_handle(doc: &Html) -> Option<String> {
    let mut handle = None;
    for item in doc.select(&LI) {
        let text = item.text().collect::<String>();
        if let Some(rest) = text.strip_prefix("X:") {
            let from_link = item
                .select(&ANCHOR)
                .next()
                .and_then(|a| a.value().attr("href"))
                .and_then(|href| {
                    href.split_once("twitter.com/")
                        .map(|(_, after)| after.split('/').next().unwrap_or("").to_string())
                })
                .filter(|h| !h.is_empty());
            handle = Some(from_link.unwrap_or_else(|| rest.trim().to_string()));
        }
    }
    handle
}

fn username_from_href(href: &str) -> Option<String> {
    let after = href.split('@').nth(1)?;
    let username: String = after.chars().take_while(|c| *c != '/').collect();
    if username.is_empty() {
        None
    } else {
        Some(username)
    }
}

fn parenthesized(text: &str) -> Option<String> {
    let open = text.find('(')?;
    let close = text[open + 1..].find(')')?;
    let inner = &text[open + 1..open + 1 + close];
    if inner.is_empty() {
        None
    } else {
        Some(inner.to_string())
    }
}

fn next_element_sibling(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.next_siblings().find_map(ElementRef::wrap)
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
