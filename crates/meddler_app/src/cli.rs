//! Command-line argument parsing and config assembly.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use meddler_core::{
    DateFormat, EmbedMode, FrontMatterFormat, ImageMode, MeddlerConfig, OutputFormat, SsgTarget,
};

#[derive(Debug, Parser)]
#[command(
    name = "meddler",
    version,
    about = "Convert a Medium data export into clean, portable formats for static site generators."
)]
pub struct Cli {
    /// Path to the extracted Medium export folder.
    pub input: PathBuf,

    /// Output directory.
    #[arg(short, long, default_value = "./meddler-output")]
    pub output: PathBuf,

    /// Front matter format: yaml, toml, json, none.
    #[arg(short, long, default_value = "yaml")]
    pub format: String,

    /// Output format: markdown, html, structured-json.
    #[arg(long, default_value = "markdown")]
    pub output_format: String,

    /// Target SSG: generic, hugo, eleventy, jekyll, astro.
    #[arg(short, long, default_value = "generic")]
    pub target: String,

    /// Exclude draft posts.
    #[arg(long)]
    pub no_drafts: bool,

    /// Include short responses/comments.
    #[arg(long)]
    pub responses: bool,

    /// Image handling: reference, download, optimize.
    #[arg(long, default_value = "reference")]
    pub images: String,

    /// Embed handling: raw_html, shortcodes, placeholders.
    #[arg(long)]
    pub embeds: Option<String>,

    /// Date format in front matter: iso8601, yyyy-mm-dd, unix.
    #[arg(long, default_value = "iso8601")]
    pub date_format: String,

    /// Inject partner program earnings into front matter.
    #[arg(long)]
    pub earnings: bool,

    /// Skip supplementary data conversion.
    #[arg(long)]
    pub no_supplementary: bool,

    /// Extra front matter field as key=value; repeatable.
    #[arg(long = "extra-field", value_name = "KEY=VALUE")]
    pub extra_fields: Vec<String>,

    /// Load a saved RON config profile before applying flags.
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Preview what would be generated without writing files.
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose logging output.
    #[arg(long)]
    pub verbose: bool,
}

/// Builds the immutable run config from an optional profile plus flags.
/// SSG-specific defaults are applied last, once.
pub fn build_config(cli: &Cli) -> anyhow::Result<MeddlerConfig> {
    let mut config = match &cli.profile {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("read config profile: {}", path.display()))?;
            ron::from_str(&text)
                .with_context(|| format!("parse config profile: {}", path.display()))?
        }
        None => MeddlerConfig::default(),
    };

    config.input = cli.input.clone();
    config.output = cli.output.clone();
    config.format = parse_format(&cli.format)?;
    config.output_format = parse_output_format(&cli.output_format)?;
    config.target = parse_target(&cli.target)?;
    config.include_drafts = !cli.no_drafts;
    config.include_responses = cli.responses;
    config.images.mode = parse_image_mode(&cli.images)?;
    if let Some(embeds) = &cli.embeds {
        config.embeds.mode = parse_embed_mode(embeds)?;
    }
    config.embeds.shortcode_format = config.target;
    config.front_matter.date_format = parse_date_format(&cli.date_format)?;
    config.front_matter.inject_earnings = cli.earnings;
    for field in &cli.extra_fields {
        let Some((key, value)) = field.split_once('=') else {
            bail!("invalid --extra-field {field:?}: expected KEY=VALUE");
        };
        config
            .front_matter
            .extra_fields
            .push((key.to_string(), value.to_string()));
    }
    if cli.no_supplementary {
        config.supplementary.disable_all();
    }
    config.verbose = cli.verbose;

    config.apply_target_defaults();
    Ok(config)
}

fn parse_format(value: &str) -> anyhow::Result<FrontMatterFormat> {
    Ok(match value {
        "yaml" => FrontMatterFormat::Yaml,
        "toml" => FrontMatterFormat::Toml,
        "json" => FrontMatterFormat::Json,
        "none" => FrontMatterFormat::None,
        other => bail!("unknown front matter format {other:?}"),
    })
}

fn parse_output_format(value: &str) -> anyhow::Result<OutputFormat> {
    Ok(match value {
        "markdown" => OutputFormat::Markdown,
        "html" => OutputFormat::Html,
        "structured-json" => OutputFormat::StructuredJson,
        other => bail!("unknown output format {other:?}"),
    })
}

fn parse_target(value: &str) -> anyhow::Result<SsgTarget> {
    Ok(match value {
        "generic" => SsgTarget::Generic,
        "hugo" => SsgTarget::Hugo,
        "eleventy" => SsgTarget::Eleventy,
        "jekyll" => SsgTarget::Jekyll,
        "astro" => SsgTarget::Astro,
        other => bail!("unknown target {other:?}"),
    })
}

fn parse_image_mode(value: &str) -> anyhow::Result<ImageMode> {
    Ok(match value {
        "reference" => ImageMode::Reference,
        "download" => ImageMode::Download,
        "optimize" => ImageMode::Optimize,
        other => bail!("unknown image mode {other:?}"),
    })
}

fn parse_embed_mode(value: &str) -> anyhow::Result<EmbedMode> {
    Ok(match value {
        "raw_html" => EmbedMode::RawHtml,
        "shortcodes" => EmbedMode::Shortcodes,
        "placeholders" => EmbedMode::Placeholders,
        other => bail!("unknown embed mode {other:?}"),
    })
}

fn parse_date_format(value: &str) -> anyhow::Result<DateFormat> {
    Ok(match value {
        "iso8601" => DateFormat::Iso8601,
        "yyyy-mm-dd" => DateFormat::YyyyMmDd,
        "unix" => DateFormat::Unix,
        other => bail!("unknown date format {other:?}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("meddler").chain(args.iter().copied()))
    }

    #[test]
    fn flags_map_onto_the_config() {
        let cli = parse(&[
            "export/",
            "--no-drafts",
            "--responses",
            "--images",
            "download",
            "--earnings",
            "--extra-field",
            "layout=post",
        ]);
        let config = build_config(&cli).unwrap();

        assert!(!config.include_drafts);
        assert!(config.include_responses);
        assert_eq!(config.images.mode, ImageMode::Download);
        assert!(config.front_matter.inject_earnings);
        assert_eq!(
            config.front_matter.extra_fields,
            vec![("layout".to_string(), "post".to_string())]
        );
    }

    #[test]
    fn hugo_target_applies_its_defaults() {
        let cli = parse(&["export/", "--target", "hugo"]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.format, FrontMatterFormat::Toml);
        assert_eq!(config.embeds.mode, EmbedMode::Shortcodes);
    }

    #[test]
    fn unknown_enum_values_are_rejected() {
        let cli = parse(&["export/", "--format", "xml"]);
        assert!(build_config(&cli).is_err());
    }
}
