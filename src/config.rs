use std::fmt;
use std::path::Path;
use std::time::Duration;

use iced::Color;
use serde::Deserialize;

use crate::color::CssColor;

pub const MOBILE_BREAKPOINT: f32 = 768.0;

pub const DEFAULT_BACKGROUND: &str = "#0f172a";
pub const DEFAULT_GRID: &str = "rgba(125, 211, 252, 0.1)";
pub const DEFAULT_RAIN: &str = "rgba(200, 230, 255, 0.7)";

const DESKTOP_MAX_DEPTH: u32 = 4;
const MOBILE_MAX_DEPTH: u32 = 3;
const DESKTOP_PARTICLE_COUNT: usize = 150;
const MOBILE_PARTICLE_COUNT: usize = 75;
const DEFAULT_REPEL_RADIUS: f32 = 120.0;
const DEFAULT_REPEL_STRENGTH: f32 = 0.5;
const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 250;

/// Background configuration as the host layout hands it over. Every value is
/// optional; [`Config::resolve`] fills in the defaults.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub background_color: Option<CssColor>,
    pub grid_color: Option<CssColor>,
    pub rain_color: Option<CssColor>,
    pub max_depth: Option<u32>,
    pub particle_count: Option<usize>,
    pub repel_radius: Option<f32>,
    pub repel_strength: Option<f32>,
    pub class_name: Option<String>,
    pub headline: Option<String>,
    pub resize_debounce_ms: Option<u64>,
}

impl Config {
    pub fn merge(self, overrides: Config) -> Config {
        Config {
            background_color: overrides.background_color.or(self.background_color),
            grid_color: overrides.grid_color.or(self.grid_color),
            rain_color: overrides.rain_color.or(self.rain_color),
            max_depth: overrides.max_depth.or(self.max_depth),
            particle_count: overrides.particle_count.or(self.particle_count),
            repel_radius: overrides.repel_radius.or(self.repel_radius),
            repel_strength: overrides.repel_strength.or(self.repel_strength),
            class_name: overrides.class_name.or(self.class_name),
            headline: overrides.headline.or(self.headline),
            resize_debounce_ms: overrides.resize_debounce_ms.or(self.resize_debounce_ms),
        }
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(
            self.resize_debounce_ms
                .unwrap_or(DEFAULT_RESIZE_DEBOUNCE_MS),
        )
    }

    /// Concrete settings for the given viewport width. Narrow viewports get
    /// the reduced depth and particle count unless those were set explicitly.
    pub fn resolve(&self, viewport_width: f32) -> Settings {
        let mobile = is_mobile(viewport_width);
        Settings {
            background_color: color_or(self.background_color, DEFAULT_BACKGROUND),
            grid_color: color_or(self.grid_color, DEFAULT_GRID),
            rain_color: color_or(self.rain_color, DEFAULT_RAIN),
            max_depth: self.max_depth.unwrap_or(if mobile {
                MOBILE_MAX_DEPTH
            } else {
                DESKTOP_MAX_DEPTH
            }),
            particle_count: self.particle_count.unwrap_or(if mobile {
                MOBILE_PARTICLE_COUNT
            } else {
                DESKTOP_PARTICLE_COUNT
            }),
            repel_radius: self.repel_radius.unwrap_or(DEFAULT_REPEL_RADIUS),
            repel_strength: self.repel_strength.unwrap_or(DEFAULT_REPEL_STRENGTH),
        }
    }
}

pub fn is_mobile(viewport_width: f32) -> bool {
    viewport_width < MOBILE_BREAKPOINT
}

fn color_or(color: Option<CssColor>, fallback: &str) -> Color {
    match color {
        Some(color) => color.0,
        None => CssColor::parse(fallback)
            .map(Color::from)
            .unwrap_or(Color::BLACK),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub background_color: Color,
    pub grid_color: Color,
    pub rain_color: Color,
    pub max_depth: u32,
    pub particle_count: usize,
    pub repel_radius: f32,
    pub repel_strength: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Default,
    Hero,
    Brand,
    Performance,
    HighImpact,
    Mobile,
    Subtle,
}

impl Default for Preset {
    fn default() -> Self {
        Preset::Default
    }
}

impl Preset {
    #[cfg(test)]
    pub fn all() -> &'static [Preset] {
        &[
            Preset::Default,
            Preset::Hero,
            Preset::Brand,
            Preset::Performance,
            Preset::HighImpact,
            Preset::Mobile,
            Preset::Subtle,
        ]
    }

    pub fn config(self) -> Config {
        let css = |s: &str| CssColor::parse(s).ok();
        match self {
            Preset::Default => Config::default(),
            Preset::Hero => Config {
                background_color: css("#000000"),
                grid_color: css("rgba(125, 211, 252, 0.15)"),
                rain_color: css("rgba(200, 230, 255, 0.7)"),
                particle_count: Some(120),
                repel_radius: Some(120.0),
                repel_strength: Some(0.5),
                headline: Some("You name it, we will clean it".to_string()),
                ..Config::default()
            },
            Preset::Brand => Config {
                background_color: css("#1e293b"),
                grid_color: css("rgba(56, 189, 248, 0.3)"),
                rain_color: css("rgba(186, 230, 253, 0.7)"),
                ..Config::default()
            },
            Preset::Performance => Config {
                particle_count: Some(100),
                max_depth: Some(3),
                repel_radius: Some(80.0),
                ..Config::default()
            },
            Preset::HighImpact => Config {
                background_color: css("#0a0f1e"),
                grid_color: css("rgba(125, 211, 252, 0.25)"),
                rain_color: css("rgba(255, 255, 255, 0.8)"),
                particle_count: Some(200),
                max_depth: Some(5),
                ..Config::default()
            },
            Preset::Mobile => Config {
                background_color: css("#0f172a"),
                particle_count: Some(75),
                max_depth: Some(3),
                ..Config::default()
            },
            Preset::Subtle => Config {
                background_color: css("#020617"),
                grid_color: css("rgba(100, 116, 139, 0.15)"),
                rain_color: css("rgba(203, 213, 225, 0.4)"),
                particle_count: Some(80),
                max_depth: Some(3),
                ..Config::default()
            },
        }
    }
}

/// On-disk shape: an optional preset plus field overrides.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub preset: Preset,
    #[serde(flatten)]
    pub overrides: Config,
}

impl ConfigFile {
    pub fn into_config(self) -> Config {
        self.preset.config().merge(self.overrides)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "config read error: {}", err),
            Self::Parse(err) => write!(f, "config parse error: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

pub fn parse(json: &str) -> Result<Config, ConfigError> {
    Ok(serde_json::from_str::<ConfigFile>(json)?.into_config())
}

pub async fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let json = tokio::fs::read_to_string(path).await?;
    parse(&json)
}

/// Never fails: a missing or broken file leaves the background on defaults.
pub async fn load_or_default(path: impl AsRef<Path>) -> Config {
    let path = path.as_ref();
    match load(path).await {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "falling back to default configuration");
            Config::default()
        }
    }
}
