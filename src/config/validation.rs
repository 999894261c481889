use crate::config::types::{ArchiveConfig, BrowserConfig, Config, RenderConfig};
use crate::ConfigError;
use url::Url;

/// Longest pause allowed between books
const MAX_DELAY_MS: u64 = 10 * 60 * 1000;

/// Chrome's accepted print scale range
const MIN_SCALE: f64 = 0.1;
const MAX_SCALE: f64 = 2.0;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_archive_config(&config.archive)?;
    validate_browser_config(&config.browser)?;
    validate_render_config(&config.render)?;
    Ok(())
}

fn validate_archive_config(config: &ArchiveConfig) -> Result<(), ConfigError> {
    if config.output_root.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output-root cannot be empty".to_string(),
        ));
    }

    validate_url_template(&config.url_template, &config.item_suffix)?;

    if config.delay_ms > MAX_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "delay-ms must be <= {}, got {}",
            MAX_DELAY_MS, config.delay_ms
        )));
    }

    Ok(())
}

/// Checks that the template names the book and expands to an http(s) URL
fn validate_url_template(template: &str, suffix: &str) -> Result<(), ConfigError> {
    if !template.contains("{unit}") {
        return Err(ConfigError::Validation(format!(
            "url-template must contain the {{unit}} placeholder, got '{}'",
            template
        )));
    }

    let sample = format!("{}1{}", template.replace("{unit}", "genesis"), suffix);
    let url = Url::parse(&sample)
        .map_err(|e| ConfigError::InvalidUrl(format!("url-template '{}': {}", template, e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "url-template '{}' must use http or https",
            template
        )));
    }

    Ok(())
}

fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.navigation_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "navigation-timeout-secs must be >= 1".to_string(),
        ));
    }

    if let Some(path) = &config.chrome_executable {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "chrome-executable cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_render_config(config: &RenderConfig) -> Result<(), ConfigError> {
    if !(MIN_SCALE..=MAX_SCALE).contains(&config.scale) {
        return Err(ConfigError::Validation(format!(
            "scale must be between {} and {}, got {}",
            MIN_SCALE, MAX_SCALE, config.scale
        )));
    }

    if !(config.paper_width_in > 0.0 && config.paper_height_in > 0.0) {
        return Err(ConfigError::Validation(format!(
            "paper size must be positive, got {}x{} in",
            config.paper_width_in, config.paper_height_in
        )));
    }

    if config.font_family.trim().is_empty() {
        return Err(ConfigError::Validation(
            "font-family cannot be empty".to_string(),
        ));
    }

    let min_font_size = config.min_font_size.trim();
    if min_font_size.is_empty() {
        return Err(ConfigError::Validation(
            "min-font-size cannot be empty".to_string(),
        ));
    }
    if is_parent_relative_length(min_font_size) {
        return Err(ConfigError::Validation(format!(
            "min-font-size must be an absolute length such as 12pt, got {}",
            min_font_size
        )));
    }

    Ok(())
}

/// `em` and `%` sizes are relative to the parent element's font size
fn is_parent_relative_length(length: &str) -> bool {
    let lower = length.to_ascii_lowercase();
    lower.ends_with('%') || (lower.ends_with("em") && !lower.ends_with("rem"))
}
