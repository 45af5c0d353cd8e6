//! Meddler engine: the Medium-export conversion pipeline.
//!
//! Leaf to root: filename/metadata parsing, body conversion (DOM preparation
//! plus rule-based Markdown rendering), front matter serialization, the
//! supplementary dataset extractors, and the orchestrator that drives one
//! conversion run and aggregates the report.
mod convert;
mod decode;
mod engine;
mod extract;
mod fetch;
mod filename;
mod frontmatter;
mod markdown;
mod output;
mod persist;
mod response;
mod source;
mod supplementary;
mod validate;

pub use convert::{convert_body, BodyOutput, ConvertError};
pub use decode::{decode_html, DecodedHtml};
pub use engine::{run_conversion, EngineError};
pub use extract::extract_metadata;
pub use fetch::{
    DownloadOutcome, ImageDownloader, ImageFetchError, ImageFetchSettings, ImageFetcher, ImageJob,
    ReqwestImageFetcher,
};
pub use filename::{parse_filename, normalize_slug, ParsedFilename};
pub use frontmatter::{
    build_front_matter_data, format_date, generate_front_matter, FieldValue, FrontMatterData,
    FrontMatterError,
};
pub use markdown::{MarkdownRenderer, RULE_ORDER};
pub use output::{data_dir, images_base_dir, post_output_path};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use response::{detect_response, ResponseThresholds};
pub use source::{DirExportSource, ExportSource, SourceError};
pub use supplementary::{
    parse_about, parse_bookmarks, parse_claps, parse_earnings, parse_following, parse_highlights,
    parse_interests, parse_list, parse_profile, parse_publications, InterestsInput,
};
pub use validate::{validate_export, ValidationResult};
