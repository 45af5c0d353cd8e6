//! Typed records for the supplementary export datasets.
//!
//! These serialize with the field names the JSON data files use.

use serde::Serialize;

/// Profile data extracted from `profile/profile.html` (+ `about.html`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    pub display_name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub medium_user_id: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub created_at: Option<String>,
    pub connected_accounts: ConnectedAccounts,
    pub membership_date: Option<String>,
}

/// Third-party accounts linked to the Medium profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedAccounts {
    pub twitter: Option<String>,
    pub twitter_id: Option<String>,
    pub facebook: Option<String>,
    pub facebook_id: Option<String>,
}

/// Role the user holds in a publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationRoleKind {
    Editor,
    Writer,
}

/// Publication the user is editor or writer for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationRole {
    pub name: String,
    pub url: String,
    pub role: PublicationRoleKind,
    pub ownership_note: Option<String>,
}

/// One bookmarked post.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkEntry {
    pub title: String,
    pub url: String,
    pub date_bookmarked: Option<String>,
}

/// One clapped-for post with its clap count.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClapEntry {
    pub title: String,
    pub url: String,
    pub claps: u32,
    pub date: Option<String>,
}

/// One highlighted quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightEntry {
    pub quote: String,
    pub date: Option<String>,
}

/// A post referenced from a reading list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPost {
    pub title: String,
    pub url: String,
}

/// One reading list with its posts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListData {
    pub name: String,
    pub date: Option<String>,
    pub list_url: Option<String>,
    pub posts: Vec<ListPost>,
}

/// One partner-program earnings entry. `medium_id` joins back to
/// [`crate::PostMetadata::medium_id`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsEntry {
    pub title: String,
    pub url: String,
    pub medium_id: String,
    pub earnings: f64,
}

/// A followed user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowedUser {
    pub username: String,
    pub url: String,
}

/// A named link (publication, topic, tag or writer).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedLink {
    pub name: String,
    pub url: String,
}

/// Social graph: who and what the user follows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowingData {
    pub users: Vec<FollowedUser>,
    pub publications: Vec<NamedLink>,
    pub topics: Vec<NamedLink>,
}

/// Interests: tags, topics, publications and writers marked as interesting.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestsData {
    pub tags: Vec<NamedLink>,
    pub topics: Vec<NamedLink>,
    pub publications: Vec<NamedLink>,
    pub writers: Vec<NamedLink>,
}
