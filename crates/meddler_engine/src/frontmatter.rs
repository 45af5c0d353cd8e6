//! Front matter assembly and serialization.
//!
//! Field inclusion order is contractual, so the intermediate document is an
//! insertion-ordered key/value list rather than a map. The three serializers
//! (YAML with `---` fences, TOML with `+++` fences, pretty JSON without
//! fences) all consume the same document.

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use thiserror::Error;

use meddler_core::{DateFormat, FrontMatterFormat, MeddlerConfig, PostMetadata, PostType};

#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("yaml serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("toml serialization failed: {0}")]
    Toml(#[from] toml::ser::Error),
    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// A front matter value. There is deliberately no null variant: absent
/// fields are omitted at build time, which also keeps TOML (which has no
/// null) trivially serializable.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    Bool(bool),
    Num(f64),
    List(Vec<String>),
}

/// Insertion-ordered front matter document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatterData {
    fields: Vec<(String, FieldValue)>,
}

impl FrontMatterData {
    /// Sets a key. An existing key is overwritten in place, keeping its
    /// original position; new keys append.
    pub fn set(&mut self, key: impl Into<String>, value: FieldValue) {
        let key = key.into();
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.fields.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, FieldValue)> {
        self.fields.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Formats a date string per the configured style.
///
/// Unparseable dates pass through verbatim; they are never dropped.
pub fn format_date(date: Option<&str>, format: DateFormat) -> Option<String> {
    let date = date?;
    let Some(parsed) = parse_date(date) else {
        return Some(date.to_string());
    };

    Some(match format {
        DateFormat::Iso8601 => parsed.to_rfc3339_opts(SecondsFormat::Millis, true),
        DateFormat::YyyyMmDd => parsed.format("%Y-%m-%d").to_string(),
        DateFormat::Unix => parsed.timestamp().to_string(),
    })
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        return Some(Utc.from_utc_datetime(&midnight));
    }
    None
}

/// Builds the ordered front matter document for one post.
pub fn build_front_matter_data(metadata: &PostMetadata, config: &MeddlerConfig) -> FrontMatterData {
    let mut data = FrontMatterData::default();

    data.set("title", FieldValue::Str(metadata.title.clone()));

    if !metadata.subtitle.is_empty() {
        data.set("subtitle", FieldValue::Str(metadata.subtitle.clone()));
    }

    if let Some(date) = format_date(metadata.date.as_deref(), config.front_matter.date_format) {
        data.set("date", FieldValue::Str(date));
    }

    data.set("slug", FieldValue::Str(metadata.slug.clone()));

    if let Some(url) = &metadata.canonical_url {
        data.set("canonical_url", FieldValue::Str(url.clone()));
    }
    if let Some(author) = &metadata.author {
        data.set("author", FieldValue::Str(author.clone()));
    }

    data.set("medium_id", FieldValue::Str(metadata.medium_id.clone()));
    data.set("draft", FieldValue::Bool(metadata.draft));

    if !metadata.tags.is_empty() {
        data.set("tags", FieldValue::List(metadata.tags.clone()));
    }

    if config.images.extract_featured {
        if let Some(image) = &metadata.image {
            data.set("image", FieldValue::Str(image.clone()));
            if let Some(caption) = &metadata.image_caption {
                data.set("image_caption", FieldValue::Str(caption.clone()));
            }
        }
    }

    if metadata.post_type == PostType::Response {
        data.set("type", FieldValue::Str("response".to_string()));
    }

    if config.front_matter.inject_earnings {
        if let Some(earnings) = metadata.earnings {
            data.set("earnings", FieldValue::Num(earnings));
        }
    }

    for (key, value) in &config.front_matter.extra_fields {
        data.set(key.clone(), FieldValue::Str(value.clone()));
    }

    data
}

/// Serializes the front matter block for one post. Format `none` yields an
/// empty string; the caller substitutes a bare `# title` heading.
pub fn generate_front_matter(
    metadata: &PostMetadata,
    config: &MeddlerConfig,
) -> Result<String, FrontMatterError> {
    if config.format == FrontMatterFormat::None {
        return Ok(String::new());
    }

    let data = build_front_matter_data(metadata, config);

    match config.format {
        FrontMatterFormat::Yaml | FrontMatterFormat::None => serialize_yaml(&data),
        FrontMatterFormat::Toml => serialize_toml(&data),
        FrontMatterFormat::Json => serialize_json(&data),
    }
}

/// YAML keeps every string a string: serde_yaml has no timestamp type, so
/// dates can never be re-typed into date nodes by a downstream parser.
fn serialize_yaml(data: &FrontMatterData) -> Result<String, FrontMatterError> {
    let mut mapping = serde_yaml::Mapping::new();
    for (key, value) in data.iter() {
        mapping.insert(serde_yaml::Value::String(key.clone()), yaml_value(value));
    }
    let yaml = serde_yaml::to_string(&mapping)?;
    Ok(format!("---\n{}\n---", yaml.trim_end()))
}

fn yaml_value(value: &FieldValue) -> serde_yaml::Value {
    match value {
        FieldValue::Str(s) => serde_yaml::Value::String(s.clone()),
        FieldValue::Bool(b) => serde_yaml::Value::Bool(*b),
        FieldValue::Num(n) => serde_yaml::Value::Number((*n).into()),
        FieldValue::List(items) => serde_yaml::Value::Sequence(
            items
                .iter()
                .map(|item| serde_yaml::Value::String(item.clone()))
                .collect(),
        ),
    }
}

fn serialize_toml(data: &FrontMatterData) -> Result<String, FrontMatterError> {
    let mut table = toml::value::Table::new();
    for (key, value) in data.iter() {
        table.insert(key.clone(), toml_value(value));
    }
    let toml = toml::to_string(&table)?;
    Ok(format!("+++\n{}\n+++", toml.trim_end()))
}

fn toml_value(value: &FieldValue) -> toml::Value {
    match value {
        FieldValue::Str(s) => toml::Value::String(s.clone()),
        FieldValue::Bool(b) => toml::Value::Boolean(*b),
        FieldValue::Num(n) => toml::Value::Float(*n),
        FieldValue::List(items) => toml::Value::Array(
            items
                .iter()
                .map(|item| toml::Value::String(item.clone()))
                .collect(),
        ),
    }
}

fn serialize_json(data: &FrontMatterData) -> Result<String, FrontMatterError> {
    Ok(serde_json::to_string_pretty(&json_object(data))?)
}

/// The front matter document as an ordered JSON object.
pub(crate) fn json_object(data: &FrontMatterData) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for (key, value) in data.iter() {
        map.insert(key.clone(), json_value(value));
    }
    serde_json::Value::Object(map)
}

fn json_value(value: &FieldValue) -> serde_json::Value {
    match value {
        FieldValue::Str(s) => serde_json::Value::String(s.clone()),
        FieldValue::Bool(b) => serde_json::Value::Bool(*b),
        FieldValue::Num(n) => serde_json::json!(n),
        FieldValue::List(items) => serde_json::Value::Array(
            items
                .iter()
                .map(|item| serde_json::Value::String(item.clone()))
                .collect(),
        ),
    }
}
