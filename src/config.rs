use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::codec::EncodeParams;
use crate::pipeline::OutputFormat;

/// Default Nominatim search endpoint.
pub const DEFAULT_GEOCODER_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";

/// Top-level configuration for the geotag library.
///
/// Controls encoder parameters, the geocoding service, and how output files
/// are named.
///
/// # Loading
///
/// ```rust,no_run
/// use geotag::config::Config;
///
/// // From a JSON file
/// let config = Config::load(Some("config.json".as_ref())).unwrap();
///
/// // Or use defaults and customize
/// let mut config = Config::default();
/// config.encoding.jpeg_quality = 85;
/// config.output.file_suffix = "_geo".into();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Encoder quality and optimization settings per output format.
    pub encoding: EncodingConfig,
    /// Address lookup service.
    pub geocoder: GeocoderConfig,
    /// Output file naming.
    pub output: OutputConfig,
}

/// Encoder parameters for the first and second encode passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
    pub jpeg_optimize: bool,
    pub png_optimize: bool,
    /// WebP quality, 1-100.
    pub webp_quality: u8,
}

/// Geocoding service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// Search endpoint URL.
    pub endpoint: String,
    /// User agent sent with every request. The `USER_AGENT` environment
    /// variable takes precedence when set.
    pub user_agent: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Output file naming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Appended to the source file stem, e.g. `photo.png` → `photo_gps.jpeg`.
    pub file_suffix: String,
    /// If `true`, replace existing output files instead of skipping them.
    pub overwrite: bool,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 95,
            jpeg_optimize: true,
            png_optimize: true,
            webp_quality: 95,
        }
    }
}

impl EncodingConfig {
    /// Encoder parameters for `format`.
    pub fn params_for(&self, format: OutputFormat) -> EncodeParams {
        match format {
            OutputFormat::Jpeg => EncodeParams {
                quality: Some(self.jpeg_quality.clamp(1, 100)),
                optimize: self.jpeg_optimize,
            },
            OutputFormat::Png => EncodeParams {
                quality: None,
                optimize: self.png_optimize,
            },
            OutputFormat::WebP => EncodeParams {
                quality: Some(self.webp_quality.clamp(1, 100)),
                optimize: false,
            },
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GEOCODER_ENDPOINT.to_string(),
            user_agent: format!("geotag/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 10,
        }
    }
}

impl GeocoderConfig {
    /// The user agent to send: `USER_AGENT` from the environment if set,
    /// otherwise the configured value.
    pub fn effective_user_agent(&self) -> String {
        match std::env::var("USER_AGENT") {
            Ok(agent) if !agent.trim().is_empty() => agent,
            _ => self.user_agent.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_suffix: "_gps".to_string(),
            overwrite: false,
        }
    }
}

impl Config {
    /// Resolve the config file path — same directory as the executable.
    pub fn config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe().context("Failed to get executable path")?;
        let exe_dir = exe_path
            .parent()
            .context("Failed to get executable directory")?;
        Ok(exe_dir.join("config.json"))
    }

    /// Load config from the given path, or from the default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            log::warn!(
                "Config file not found at {}. Using defaults.",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;
        let config: Config =
            serde_json::from_str(&contents).context("Failed to parse config file")?;
        log::debug!("Loaded config from {}", config_path.display());
        Ok(config)
    }

    /// Save config to the given path, or to the default location.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, contents).context("Failed to write config file")?;
        log::info!("Config saved to {}", config_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // ── defaults ─────────────────────────────────────────────────────

    #[test]
    fn default_encoding_matches_pipeline_policy() {
        let encoding = EncodingConfig::default();
        assert_eq!(encoding.jpeg_quality, 95);
        assert!(encoding.jpeg_optimize);
        assert!(encoding.png_optimize);
        assert_eq!(encoding.webp_quality, 95);
    }

    #[test]
    fn default_geocoder() {
        let geocoder = GeocoderConfig::default();
        assert_eq!(geocoder.endpoint, DEFAULT_GEOCODER_ENDPOINT);
        assert!(geocoder.user_agent.starts_with("geotag/"));
        assert_eq!(geocoder.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn default_output() {
        let output = OutputConfig::default();
        assert_eq!(output.file_suffix, "_gps");
        assert!(!output.overwrite);
    }

    // ── params_for ───────────────────────────────────────────────────

    #[test]
    fn params_for_each_format() {
        let encoding = EncodingConfig::default();
        assert_eq!(
            encoding.params_for(OutputFormat::Jpeg),
            EncodeParams { quality: Some(95), optimize: true }
        );
        assert_eq!(
            encoding.params_for(OutputFormat::Png),
            EncodeParams { quality: None, optimize: true }
        );
        assert_eq!(
            encoding.params_for(OutputFormat::WebP),
            EncodeParams { quality: Some(95), optimize: false }
        );
    }

    #[test]
    fn params_clamp_quality() {
        let encoding = EncodingConfig {
            jpeg_quality: 0,
            webp_quality: 200,
            ..EncodingConfig::default()
        };
        assert_eq!(encoding.params_for(OutputFormat::Jpeg).quality, Some(1));
        assert_eq!(encoding.params_for(OutputFormat::WebP).quality, Some(100));
    }

    // ── load / save ──────────────────────────────────────────────────

    #[test]
    fn load_missing_file_returns_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(Some(&dir.path().join("missing.json"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.encoding.jpeg_quality = 80;
        config.geocoder.timeout_secs = 3;
        config.output.overwrite = true;
        config.save(Some(&path)).unwrap();

        assert_eq!(Config::load(Some(&path)).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "encoding": { "jpeg_quality": 70 } }"#).unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.encoding.jpeg_quality, 70);
        assert_eq!(config.encoding.webp_quality, 95);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
