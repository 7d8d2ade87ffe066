use crate::events::AppEvent;
use async_channel::Sender;
use derive_more::{Deref, From, Into};
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use palette::{Srgb, Srgba};
use ringlayout::{RingError, RingSpec, RingVariant};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const ENV_PREFIX: &str = "STORYTRAY";
const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// An opaque `#rrggbb` (or `#rgb`) color from the config file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, DeserializeFromStr, SerializeDisplay, Deref, From, Into,
)]
pub struct HexColor(Srgb<u8>);

impl HexColor {
    pub fn to_srgba(self) -> Srgba<f64> {
        let (r, g, b) = self.0.into_format::<f64>().into_components();
        Srgba::new(r, g, b, 1.0)
    }
}

impl FromStr for HexColor {
    type Err = palette::rgb::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Srgb::<u8>::from_str(s.trim()).map(Self)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.0.into_components();
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub segments: usize,
    pub gap_degrees: f64,
    pub stroke_width: f64,
    pub avatar_radius: f64,
    pub avatar_color: HexColor,
    pub rotation_period_ms: u64,
    pub variant: RingVariant,
    pub colors: Vec<HexColor>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            segments: 3,
            gap_degrees: 6.0,
            stroke_width: 3.0,
            avatar_radius: 40.0,
            avatar_color: HexColor(Srgb::new(158, 158, 158)),
            rotation_period_ms: 1500,
            variant: RingVariant::Segmented,
            colors: ringlayout::ring::default_colors()
                .into_iter()
                .map(|c| {
                    let (r, g, b, _) = c.into_components();
                    HexColor(Srgb::new(r, g, b).into_format())
                })
                .collect(),
        }
    }
}


impl Config {
    pub fn ring_spec(&self) -> RingSpec {
        RingSpec::new(self.segments, self.gap_degrees, self.stroke_width)
            .with_colors(self.colors.iter().map(|c| c.to_srgba()).collect())
            .with_variant(self.variant)
    }

    pub fn rotation_period(&self) -> Duration {
        Duration::from_millis(self.rotation_period_ms)
    }

    /// Checks that a tray can be built from these settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rotation_period_ms == 0 {
            return Err(ConfigError::ZeroRotationPeriod);
        }
        self.ring_spec().validate()?;
        Ok(())
    }
}

/// Ring settings given on the command line. They win over the file and the
/// environment, on every reload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub segments: Option<usize>,
    pub gap_degrees: Option<f64>,
    pub variant: Option<RingVariant>,
}

impl Overrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(segments) = self.segments {
            config.segments = segments;
        }
        if let Some(gap) = self.gap_degrees {
            config.gap_degrees = gap;
        }
        if let Some(variant) = self.variant {
            config.variant = variant;
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No config directory on this platform")]
    NoConfigDir,
    #[error("Cannot read config: {0}")]
    Source(#[from] config::ConfigError),
    #[error("Config describes an unusable ring: {0}")]
    Ring(#[from] RingError),
    #[error("rotation_period_ms must be at least 1")]
    ZeroRotationPeriod,
    #[error("Cannot watch config: {0}")]
    Watch(#[from] notify::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Layers `config.toml`, `STORYTRAY_*` variables and the command-line
/// overrides into a checked [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
    overrides: Overrides,
}

impl ConfigLoader {
    pub fn new(overrides: Overrides) -> Result<Self, ConfigError> {
        let dirs = ProjectDirs::from("org", "storytray", "storytray")
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::with_path(dirs.config_dir().join("config.toml"), overrides))
    }

    pub fn with_path(path: impl Into<PathBuf>, overrides: Overrides) -> Self {
        Self {
            path: path.into(),
            overrides,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        let layered = config::Config::builder()
            .add_source(config::File::from(self.path.clone()).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;
        self.resolve(layered)
    }

    /// Turns already layered sources into a config, overrides applied last.
    pub fn resolve(&self, layered: config::Config) -> Result<Config, ConfigError> {
        let mut config: Config = layered.try_deserialize()?;
        self.overrides.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Like [`ConfigLoader::load`], but a broken file yields the built-in
    /// defaults (still with the overrides).
    pub fn load_or_default(&self) -> Config {
        self.load().unwrap_or_else(|e| {
            log::warn!("Using built-in ring settings: {}", e);
            let mut config = Config::default();
            self.overrides.apply(&mut config);
            config
        })
    }

    /// Writes the commented default file unless one is already there.
    pub fn write_default(&self) -> Result<&Path, ConfigError> {
        if let Some(dir) = self.path.parent() {
            fs_err::create_dir_all(dir)?;
        }
        if !self.path.exists() {
            fs_err::write(&self.path, DEFAULT_CONFIG)?;
        }
        Ok(&self.path)
    }

    fn touches_file(&self, event: &notify::Event) -> bool {
        matches!(
            event.kind,
            EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
        ) && event.paths.iter().any(|p| p == &self.path)
    }
}

/// Reloads the config whenever its file changes and hands the result to the
/// GTK side: the new config when it differs from `current`, or why it was
/// rejected. A burst of file events produces one reload.
pub async fn watch(
    loader: ConfigLoader,
    mut current: Config,
    tx: Sender<AppEvent>,
) -> Result<(), ConfigError> {
    let dir = loader
        .path()
        .parent()
        .map(Path::to_path_buf)
        .ok_or(ConfigError::NoConfigDir)?;
    fs_err::create_dir_all(&dir)?;

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;

    let touched = |res: notify::Result<notify::Event>| match res {
        Ok(event) => loader.touches_file(&event),
        Err(e) => {
            log::error!("Config watch error: {}", e);
            false
        }
    };

    while let Ok(first) = bridge_rx.recv().await {
        let mut changed = touched(first);
        while let Ok(next) = bridge_rx.try_recv() {
            changed |= touched(next);
        }
        if !changed {
            continue;
        }

        let event = match loader.load() {
            Ok(config) if config == current => continue,
            Ok(config) => {
                current = config.clone();
                AppEvent::ConfigReload(Box::new(config))
            }
            Err(e) => AppEvent::ConfigInvalid(e.to_string()),
        };
        if tx.send(event).await.is_err() {
            break;
        }
    }
    Ok(())
}
