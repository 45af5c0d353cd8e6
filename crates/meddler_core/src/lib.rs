//! Meddler core: pure data model for the Medium export converter.
//!
//! No I/O lives here. The engine crate parses and converts; this crate only
//! defines the configuration, the per-post metadata, the supplementary data
//! records and the conversion report those components exchange.
mod config;
mod post;
mod report;
mod supplementary;

pub use config::{
    ContentOptions, DateFormat, DropCapMode, EmbedMode, EmbedOptions, FrontMatterFormat,
    FrontMatterOptions, ImageMode, ImageOptions, MeddlerConfig, OutputFormat, SectionBreakMode,
    SsgTarget, SupplementaryOptions,
};
pub use post::{ConvertedPost, ImageRef, PostMetadata, PostType};
pub use report::{ConversionReport, ReportConfig, ReportMessage, ReportSummary};
pub use supplementary::{
    BookmarkEntry, ClapEntry, ConnectedAccounts, EarningsEntry, FollowedUser, FollowingData,
    HighlightEntry, InterestsData, ListData, ListPost, NamedLink, ProfileData, PublicationRole,
    PublicationRoleKind,
};
