use meddler_core::{EmbedMode, FrontMatterFormat, MeddlerConfig, SsgTarget};
use pretty_assertions::assert_eq;

#[test]
fn defaults_match_the_documented_baseline() {
    let config = MeddlerConfig::default();
    assert_eq!(config.format, FrontMatterFormat::Yaml);
    assert_eq!(config.target, SsgTarget::Generic);
    assert!(config.include_drafts);
    assert!(!config.include_responses);
    assert!(config.separate_drafts);
    assert_eq!(config.embeds.mode, EmbedMode::RawHtml);
    assert!(config.images.per_post_dirs);
    assert!(config.supplementary.any_enabled());
}

#[test]
fn hugo_forces_toml_and_shortcodes() {
    let mut config = MeddlerConfig::default();
    config.target = SsgTarget::Hugo;
    config.apply_target_defaults();

    assert_eq!(config.format, FrontMatterFormat::Toml);
    assert_eq!(config.embeds.mode, EmbedMode::Shortcodes);
    assert_eq!(config.embeds.shortcode_format, SsgTarget::Hugo);
}

#[test]
fn hugo_keeps_explicit_non_yaml_choices() {
    let mut config = MeddlerConfig::default();
    config.target = SsgTarget::Hugo;
    config.format = FrontMatterFormat::Json;
    config.embeds.mode = EmbedMode::Placeholders;
    config.apply_target_defaults();

    assert_eq!(config.format, FrontMatterFormat::Json);
    assert_eq!(config.embeds.mode, EmbedMode::Placeholders);
}

#[test]
fn yaml_only_targets_downgrade_toml() {
    for target in [SsgTarget::Jekyll, SsgTarget::Eleventy, SsgTarget::Astro] {
        let mut config = MeddlerConfig::default();
        config.target = target;
        config.format = FrontMatterFormat::Toml;
        config.apply_target_defaults();
        assert_eq!(config.format, FrontMatterFormat::Yaml);
    }
}

#[test]
fn override_pass_is_idempotent() {
    let mut config = MeddlerConfig::default();
    config.target = SsgTarget::Hugo;
    config.apply_target_defaults();
    let once = config.clone();
    config.apply_target_defaults();
    assert_eq!(config, once);
}

#[test]
fn disable_all_clears_every_dataset() {
    let mut config = MeddlerConfig::default();
    config.supplementary.disable_all();
    assert!(!config.supplementary.any_enabled());
}
