use std::{
    env::{self, VarError},
    fs::{self, File},
    path::{Path, PathBuf},
};

use platform_dirs::AppDirs;
use serde::{Deserialize, Serialize};
use time::UtcOffset;

use crate::{
    data::{Period, Theme, View},
    error::Error,
};

const APP_NAME: &str = "Jukebox";
const CONFIG_FILENAME: &str = "config.json";
const SOURCE_ENV_VAR: &str = "JUKEBOX_SOURCE";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub period: Option<Period>,
    pub default_view: View,
    pub default_theme: Theme,
    pub utc_offset_hours: i8,
    pub source: Option<PathBuf>,
}

impl Config {
    fn app_dirs() -> Option<AppDirs> {
        const USE_XDG_ON_MACOS: bool = false;

        AppDirs::new(Some(APP_NAME), USE_XDG_ON_MACOS)
    }

    pub fn config_dir() -> Option<PathBuf> {
        Self::app_dirs().map(|dirs| dirs.config_dir)
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(CONFIG_FILENAME))
    }

    pub fn load() -> Result<Option<Config>, Error> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    /// Reads the config at `path`. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Option<Config>, Error> {
        match File::open(path) {
            Ok(file) => {
                log::info!("loading config: {:?}", path);
                let config = serde_json::from_reader(file)
                    .map_err(|err| Error::ConfigError(format!("{}: {err}", path.display())))?;
                Ok(Some(config))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self) -> Result<(), Error> {
        let path = Self::config_path()
            .ok_or_else(|| Error::ConfigError("no config directory".to_string()))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Error> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn utc_offset(&self) -> UtcOffset {
        UtcOffset::from_hms(self.utc_offset_hours, 0, 0).unwrap_or_else(|_| {
            log::warn!("invalid utc offset {}, using UTC", self.utc_offset_hours);
            UtcOffset::UTC
        })
    }

    /// Payload file to load, `JUKEBOX_SOURCE` taking precedence over the file.
    pub fn source(&self) -> Option<PathBuf> {
        env::var(SOURCE_ENV_VAR).map_or_else(
            |err| match err {
                VarError::NotPresent => self.source.clone(),
                VarError::NotUnicode(_) => {
                    log::error!("{SOURCE_ENV_VAR} is not a valid unicode");
                    self.source.clone()
                }
            },
            |path| Some(PathBuf::from(path)),
        )
    }
}
