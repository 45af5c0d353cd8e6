use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Front matter syntax emitted ahead of each converted post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrontMatterFormat {
    Yaml,
    Toml,
    Json,
    None,
}

/// Shape of the converted post files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Markdown,
    Html,
    #[serde(rename = "structured-json")]
    StructuredJson,
}

/// Static site generator whose layout conventions the output follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SsgTarget {
    Generic,
    Hugo,
    Eleventy,
    Jekyll,
    Astro,
}

/// How `<img>` elements found in post bodies are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageMode {
    /// Leave the original CDN URLs in place.
    Reference,
    /// Rewrite to local paths and download the files.
    Download,
    /// Same as download; no further processing is performed.
    Optimize,
}

/// How `<iframe>` embeds are rendered in Markdown output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbedMode {
    RawHtml,
    Shortcodes,
    Placeholders,
}

/// Separator emitted between top-level body sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionBreakMode {
    Hr,
    None,
    Spacing,
}

/// Rendering of the post date in front matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    Iso8601,
    #[serde(rename = "yyyy-mm-dd")]
    YyyyMmDd,
    Unix,
}

/// Treatment of Medium's decorative drop-cap spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropCapMode {
    Strip,
    Preserve,
}

/// Front matter generation options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatterOptions {
    /// Extra key/value pairs appended after the extracted fields. A key that
    /// collides with an extracted field overwrites it in place.
    pub extra_fields: Vec<(String, String)>,
    pub date_format: DateFormat,
    pub inject_earnings: bool,
    pub unquoted_dates: bool,
    pub rewrite_image_urls: bool,
    pub image_base_url: String,
}

impl Default for FrontMatterOptions {
    fn default() -> Self {
        Self {
            extra_fields: Vec::new(),
            date_format: DateFormat::Iso8601,
            inject_earnings: false,
            unquoted_dates: false,
            rewrite_image_urls: false,
            image_base_url: "/images".to_string(),
        }
    }
}

/// Image handling options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    pub mode: ImageMode,
    /// Directory (relative to the images base) local image paths start with.
    pub output_dir: String,
    /// One subdirectory per post instead of a flat `{slug}-{index}` layout.
    pub per_post_dirs: bool,
    pub extract_featured: bool,
    pub remove_featured_from_body: bool,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            mode: ImageMode::Reference,
            output_dir: "images".to_string(),
            per_post_dirs: true,
            extract_featured: true,
            remove_featured_from_body: false,
        }
    }
}

/// Embed handling options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedOptions {
    pub mode: EmbedMode,
    /// Shortcode dialect; follows the SSG target once the override pass ran.
    pub shortcode_format: SsgTarget,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            mode: EmbedMode::RawHtml,
            shortcode_format: SsgTarget::Hugo,
        }
    }
}

/// Body content options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentOptions {
    pub section_breaks: SectionBreakMode,
    pub drop_caps: DropCapMode,
}

impl Default for ContentOptions {
    fn default() -> Self {
        Self {
            section_breaks: SectionBreakMode::Hr,
            drop_caps: DropCapMode::Strip,
        }
    }
}

/// Per-dataset toggles for supplementary export data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplementaryOptions {
    pub bookmarks: bool,
    pub claps: bool,
    pub highlights: bool,
    pub interests: bool,
    pub lists: bool,
    pub earnings: bool,
    pub social_graph: bool,
    pub profile: bool,
}

impl Default for SupplementaryOptions {
    fn default() -> Self {
        Self {
            bookmarks: true,
            claps: true,
            highlights: true,
            interests: true,
            lists: true,
            earnings: true,
            social_graph: true,
            profile: true,
        }
    }
}

impl SupplementaryOptions {
    /// True when at least one dataset is enabled.
    pub fn any_enabled(&self) -> bool {
        self.bookmarks
            || self.claps
            || self.highlights
            || self.interests
            || self.lists
            || self.earnings
            || self.social_graph
            || self.profile
    }

    /// Disables every dataset.
    pub fn disable_all(&mut self) {
        *self = Self {
            bookmarks: false,
            claps: false,
            highlights: false,
            interests: false,
            lists: false,
            earnings: false,
            social_graph: false,
            profile: false,
        };
    }
}

/// A single configuration snapshot for one conversion run.
///
/// The config is built once (CLI flags, optionally on top of a saved
/// profile), the SSG override pass runs once, and the value is then threaded
/// immutably through every component. Nothing reads process-wide state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeddlerConfig {
    /// Root of the extracted Medium export.
    pub input: PathBuf,
    /// Output directory for every generated file.
    pub output: PathBuf,
    pub format: FrontMatterFormat,
    pub output_format: OutputFormat,
    pub target: SsgTarget,

    pub include_drafts: bool,
    pub include_responses: bool,
    /// Write drafts into the target's drafts directory instead of posts.
    pub separate_drafts: bool,

    pub front_matter: FrontMatterOptions,
    pub images: ImageOptions,
    pub embeds: EmbedOptions,
    pub content: ContentOptions,
    pub supplementary: SupplementaryOptions,

    pub include_all: bool,
    pub verbose: bool,
}

impl Default for MeddlerConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: PathBuf::from("./meddler-output"),
            format: FrontMatterFormat::Yaml,
            output_format: OutputFormat::Markdown,
            target: SsgTarget::Generic,
            include_drafts: true,
            include_responses: false,
            separate_drafts: true,
            front_matter: FrontMatterOptions::default(),
            images: ImageOptions::default(),
            embeds: EmbedOptions::default(),
            content: ContentOptions::default(),
            supplementary: SupplementaryOptions::default(),
            include_all: false,
            verbose: false,
        }
    }
}

impl MeddlerConfig {
    /// Applies SSG-specific default overrides.
    ///
    /// Runs exactly once at config-build time, never per post: Hugo prefers
    /// TOML front matter and shortcode embeds; Jekyll, Eleventy and Astro
    /// cannot consume TOML front matter and fall back to YAML.
    pub fn apply_target_defaults(&mut self) {
        match self.target {
            SsgTarget::Hugo => {
                if self.format == FrontMatterFormat::Yaml {
                    self.format = FrontMatterFormat::Toml;
                }
                if self.embeds.mode == EmbedMode::RawHtml {
                    self.embeds.mode = EmbedMode::Shortcodes;
                }
                self.embeds.shortcode_format = SsgTarget::Hugo;
            }
            SsgTarget::Jekyll | SsgTarget::Eleventy | SsgTarget::Astro => {
                if self.format == FrontMatterFormat::Toml {
                    self.format = FrontMatterFormat::Yaml;
                }
            }
            SsgTarget::Generic => {}
        }
    }
}
