use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};
use floor_render::ProjectionKind;
use reconciler::ColorStrategyKind;
use serde::Deserialize;
use shared::domain::IndexBase;
use url::Url;
use warehouse::LayoutConfig;

pub const SETTINGS_FILE: &str = "floor_monitor.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub feed_url: String,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub color_strategy: ColorStrategyKind,
    pub projection: ProjectionKind,
    pub layout_path: Option<PathBuf>,
    pub idle_tasks: Vec<String>,
    pub vehicle_index_base: IndexBase,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feed_url: "http://127.0.0.1:8080/api/warehouse/e1".into(),
            poll_interval_secs: 5,
            request_timeout_secs: 10,
            color_strategy: ColorStrategyKind::default(),
            projection: ProjectionKind::default(),
            layout_path: None,
            idle_tasks: vec!["无".into(), "none".into()],
            vehicle_index_base: IndexBase::One,
        }
    }
}

/// Keys accepted in `floor_monitor.toml`. Everything is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    feed_url: Option<String>,
    poll_interval_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    color_strategy: Option<ColorStrategyKind>,
    projection: Option<ProjectionKind>,
    layout_path: Option<PathBuf>,
    idle_tasks: Option<Vec<String>>,
    vehicle_index_base: Option<IndexBase>,
}

impl Settings {
    pub fn apply_file(&mut self, raw: &str) -> anyhow::Result<()> {
        let file_cfg: FileSettings = toml::from_str(raw)?;
        if let Some(v) = file_cfg.feed_url {
            self.feed_url = v;
        }
        if let Some(v) = file_cfg.poll_interval_secs {
            self.poll_interval_secs = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        if let Some(v) = file_cfg.color_strategy {
            self.color_strategy = v;
        }
        if let Some(v) = file_cfg.projection {
            self.projection = v;
        }
        if let Some(v) = file_cfg.layout_path {
            self.layout_path = Some(v);
        }
        if let Some(v) = file_cfg.idle_tasks {
            self.idle_tasks = v;
        }
        if let Some(v) = file_cfg.vehicle_index_base {
            self.vehicle_index_base = v;
        }
        Ok(())
    }

    /// Applies environment overrides. `APP__` keys win over the bare ones.
    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("FEED_URL") {
            self.feed_url = v;
        }
        if let Some(v) = lookup("APP__FEED_URL") {
            self.feed_url = v;
        }

        if let Some(v) = lookup("APP__POLL_INTERVAL_SECS") {
            self.poll_interval_secs = v
                .trim()
                .parse()
                .with_context(|| format!("APP__POLL_INTERVAL_SECS is not a number: '{v}'"))?;
        }
        if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = v
                .trim()
                .parse()
                .with_context(|| format!("APP__REQUEST_TIMEOUT_SECS is not a number: '{v}'"))?;
        }

        if let Some(v) = lookup("APP__COLOR_STRATEGY") {
            self.color_strategy = v.parse().map_err(anyhow::Error::msg)?;
        }
        if let Some(v) = lookup("APP__PROJECTION") {
            self.projection = v.parse().map_err(anyhow::Error::msg)?;
        }
        if let Some(v) = lookup("APP__LAYOUT_PATH") {
            self.layout_path = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("APP__VEHICLE_INDEX_BASE") {
            self.vehicle_index_base = v.parse().map_err(anyhow::Error::msg)?;
        }
        Ok(())
    }

    pub fn feed_url(&self) -> anyhow::Result<Url> {
        let url = Url::parse(self.feed_url.trim())
            .with_context(|| format!("invalid feed url '{}'", self.feed_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("feed url '{url}' must use http or https");
        }
        Ok(url)
    }

    pub fn poll_interval(&self) -> anyhow::Result<Duration> {
        if self.poll_interval_secs == 0 {
            bail!("poll interval must be at least one second");
        }
        Ok(Duration::from_secs(self.poll_interval_secs))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn load_layout(&self) -> anyhow::Result<LayoutConfig> {
        let Some(path) = &self.layout_path else {
            return Ok(LayoutConfig::standard_floor());
        };
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read layout file '{}'", path.display()))?;
        LayoutConfig::from_toml(&raw)
            .with_context(|| format!("invalid layout file '{}'", path.display()))
    }
}

/// Defaults, then the settings file if present, then the process environment.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => settings
            .apply_file(&raw)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    }

    settings.apply_env(|key| std::env::var(key).ok())?;
    Ok(settings)
}
