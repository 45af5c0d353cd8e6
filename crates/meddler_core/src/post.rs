use std::path::PathBuf;

/// Classification of a post inside the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostType {
    Published,
    Draft,
    /// A short comment left on someone else's post. Medium exports these as
    /// regular post files; classification is heuristic (see the response
    /// detector) and may occasionally be wrong in either direction.
    Response,
}

impl PostType {
    /// The wire name used in front matter and structured JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Published => "published",
            PostType::Draft => "draft",
            PostType::Response => "response",
        }
    }
}

/// Metadata extracted from a single Medium post HTML file.
#[derive(Debug, Clone, PartialEq)]
pub struct PostMetadata {
    pub title: String,
    /// Empty string when the post has no subtitle section.
    pub subtitle: String,
    /// ISO-ish date string; `None` for drafts without a filename date.
    pub date: Option<String>,
    /// Never empty: falls back to the Medium id, then to "untitled".
    pub slug: String,
    pub canonical_url: Option<String>,
    pub author: Option<String>,
    pub author_username: Option<String>,
    /// Hex token from the filename. Stable across runs; it is the join key
    /// for partner-program earnings lookups.
    pub medium_id: String,
    pub draft: bool,
    pub tags: Vec<String>,
    /// Featured image URL (first image of the first body figure).
    pub image: Option<String>,
    pub image_caption: Option<String>,
    pub post_type: PostType,
    /// Filled in after extraction when earnings injection is enabled and the
    /// partner-program data contains a matching Medium id.
    pub earnings: Option<f64>,
    /// The originating filename inside `posts/`.
    pub filename: String,
}

/// Reference to one image found in a post body, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRef {
    pub original_url: String,
    /// Local path relative to the target's images base directory. `None`
    /// when the image mode leaves URLs untouched.
    pub local_path: Option<String>,
    /// Figcaption text when present, else the `alt` attribute, else empty.
    pub alt: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub data_image_id: Option<String>,
}

/// A fully converted post, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedPost {
    pub metadata: PostMetadata,
    pub front_matter: String,
    pub body: String,
    /// Output path relative to the output base directory.
    pub output_path: PathBuf,
    pub images: Vec<ImageRef>,
}
