use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
    pub output: OutputConfig,
    pub too_many_versions: TooManyVersionsConfig,
    pub zero_scans: ListConfig,
    pub unmapped_scans: ListConfig,
    pub high_frequency: HighFrequencyConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub log_file: String,
    pub console: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TooManyVersionsConfig {
    /// Lists shorter than this are printed in full.
    pub display_limit: usize,
    /// Rows kept in the primary log once the list spills to its overflow file.
    pub preview: usize,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ListConfig {
    pub display_limit: usize,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct HighFrequencyConfig {
    pub enabled: bool,
    pub min_summaries: usize,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            config_path: None,
            output: OutputConfig {
                dir: PathBuf::from("."),
                log_file: "tealeaves.log".to_string(),
                console: true,
            },
            too_many_versions: TooManyVersionsConfig {
                display_limit: 20,
                preview: 10,
            },
            zero_scans: ListConfig { display_limit: 200 },
            unmapped_scans: ListConfig { display_limit: 200 },
            high_frequency: HighFrequencyConfig {
                enabled: false,
                min_summaries: 3,
            },
        }
    }
}

impl EffectiveConfig {
    pub fn log_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.log_file)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    output: Option<RawOutputConfig>,
    too_many_versions: Option<RawTooManyVersionsConfig>,
    zero_scans: Option<RawListConfig>,
    unmapped_scans: Option<RawListConfig>,
    high_frequency: Option<RawHighFrequencyConfig>,
}

#[derive(Debug, Deserialize)]
struct RawOutputConfig {
    dir: Option<PathBuf>,
    log_file: Option<String>,
    console: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawTooManyVersionsConfig {
    display_limit: Option<usize>,
    preview: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawListConfig {
    display_limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawHighFrequencyConfig {
    enabled: Option<bool>,
    min_summaries: Option<usize>,
}

pub fn default_config_path(home_dir: &Path) -> PathBuf {
    home_dir.join(".config/tealeaves/config.toml")
}

pub fn load(config_path: Option<&Path>, home_dir: Option<&Path>) -> Result<EffectiveConfig> {
    let mut cfg = EffectiveConfig::default();

    let path = config_path
        .map(ToOwned::to_owned)
        .or_else(|| home_dir.map(default_config_path));

    if let Some(path) = path.filter(|p| p.exists()) {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let raw = parse(&s)?;
        apply_raw_config(&mut cfg, raw);
        cfg.config_path = Some(path.display().to_string());
    }

    apply_env_overrides(&mut cfg)?;
    validate(&cfg)?;

    Ok(cfg)
}

fn parse(s: &str) -> Result<RawConfig> {
    toml::from_str(s).context("failed to parse config file (TOML)")
}

fn apply_raw_config(cfg: &mut EffectiveConfig, raw: RawConfig) {
    if let Some(output) = raw.output {
        if let Some(dir) = output.dir {
            cfg.output.dir = dir;
        }
        if let Some(log_file) = output.log_file {
            cfg.output.log_file = log_file;
        }
        if let Some(console) = output.console {
            cfg.output.console = console;
        }
    }

    if let Some(tmv) = raw.too_many_versions {
        if let Some(display_limit) = tmv.display_limit {
            cfg.too_many_versions.display_limit = display_limit;
        }
        if let Some(preview) = tmv.preview {
            cfg.too_many_versions.preview = preview;
        }
    }

    if let Some(display_limit) = raw.zero_scans.and_then(|z| z.display_limit) {
        cfg.zero_scans.display_limit = display_limit;
    }

    if let Some(display_limit) = raw.unmapped_scans.and_then(|u| u.display_limit) {
        cfg.unmapped_scans.display_limit = display_limit;
    }

    if let Some(hf) = raw.high_frequency {
        if let Some(enabled) = hf.enabled {
            cfg.high_frequency.enabled = enabled;
        }
        if let Some(min_summaries) = hf.min_summaries {
            cfg.high_frequency.min_summaries = min_summaries;
        }
    }
}

fn apply_env_overrides(cfg: &mut EffectiveConfig) -> Result<()> {
    if let Ok(v) = std::env::var("TEALEAVES_OUTPUT_DIR") {
        let v = v.trim();
        if !v.is_empty() {
            cfg.output.dir = PathBuf::from(v);
        }
    }
    if let Ok(v) = std::env::var("TEALEAVES_LOG_FILE") {
        let v = v.trim();
        if !v.is_empty() {
            cfg.output.log_file = v.to_string();
        }
    }
    if let Ok(v) = std::env::var("TEALEAVES_CONSOLE") {
        cfg.output.console = parse_bool(&v).with_context(|| "TEALEAVES_CONSOLE")?;
    }
    if let Ok(v) = std::env::var("TEALEAVES_TOO_MANY_VERSIONS_DISPLAY_LIMIT") {
        cfg.too_many_versions.display_limit =
            parse_usize(&v).with_context(|| "TEALEAVES_TOO_MANY_VERSIONS_DISPLAY_LIMIT")?;
    }
    if let Ok(v) = std::env::var("TEALEAVES_TOO_MANY_VERSIONS_PREVIEW") {
        cfg.too_many_versions.preview =
            parse_usize(&v).with_context(|| "TEALEAVES_TOO_MANY_VERSIONS_PREVIEW")?;
    }
    if let Ok(v) = std::env::var("TEALEAVES_ZERO_SCANS_DISPLAY_LIMIT") {
        cfg.zero_scans.display_limit =
            parse_usize(&v).with_context(|| "TEALEAVES_ZERO_SCANS_DISPLAY_LIMIT")?;
    }
    if let Ok(v) = std::env::var("TEALEAVES_UNMAPPED_SCANS_DISPLAY_LIMIT") {
        cfg.unmapped_scans.display_limit =
            parse_usize(&v).with_context(|| "TEALEAVES_UNMAPPED_SCANS_DISPLAY_LIMIT")?;
    }
    if let Ok(v) = std::env::var("TEALEAVES_HIGH_FREQUENCY") {
        cfg.high_frequency.enabled = parse_bool(&v).with_context(|| "TEALEAVES_HIGH_FREQUENCY")?;
    }
    if let Ok(v) = std::env::var("TEALEAVES_HIGH_FREQUENCY_MIN_SUMMARIES") {
        cfg.high_frequency.min_summaries =
            parse_usize(&v).with_context(|| "TEALEAVES_HIGH_FREQUENCY_MIN_SUMMARIES")?;
    }

    Ok(())
}

fn validate(cfg: &EffectiveConfig) -> Result<()> {
    if cfg.output.log_file.trim().is_empty() {
        anyhow::bail!("output.log_file must not be empty");
    }
    Ok(())
}

fn parse_usize(s: &str) -> Result<usize> {
    s.trim()
        .parse::<usize>()
        .map_err(|_| anyhow::anyhow!("invalid count: {s} (expected a non-negative integer)"))
}

fn parse_bool(s: &str) -> Result<bool> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow::anyhow!(
            "invalid boolean: {s} (expected true|false|1|0|yes|no|on|off)"
        )),
    }
}
