use camino::{Utf8Path, Utf8PathBuf};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::models::error::Error;

pub const SETTINGS_FILE_NAME: &str = "mod_manager.toml";

/// Where the manager looks for mod archives and where it installs them.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Settings {
    pub game_dir: Utf8PathBuf,
    pub repo_dir: Utf8PathBuf,
}

impl Settings {
    /// Loads settings from `mod_manager.toml` in the current directory,
    /// falling back to the user's config directory.
    pub fn load() -> Result<Self, Error> {
        let candidates = [Some(Utf8PathBuf::from(SETTINGS_FILE_NAME)), config_dir_file()];

        for path in candidates.into_iter().flatten() {
            if path.exists() {
                return Self::read(&path);
            }
        }

        Err(Error::Config(format!(
            "no {SETTINGS_FILE_NAME} found; create one or pass --game-dir and --repo-dir"
        )))
    }

    /// Settings for one run: both flags together skip the file entirely,
    /// either alone overrides the loaded value.
    pub fn resolve(
        game_dir: Option<Utf8PathBuf>,
        repo_dir: Option<Utf8PathBuf>,
    ) -> Result<Self, Error> {
        if let (Some(game_dir), Some(repo_dir)) = (&game_dir, &repo_dir) {
            return Ok(Self {
                game_dir: game_dir.clone(),
                repo_dir: repo_dir.clone(),
            });
        }

        let mut settings = Self::load()?;
        if let Some(dir) = game_dir {
            settings.game_dir = dir;
        }
        if let Some(dir) = repo_dir {
            settings.repo_dir = dir;
        }
        Ok(settings)
    }

    fn read(path: &Utf8Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| Error::Config(e.to_string()))
    }
}

fn config_dir_file() -> Option<Utf8PathBuf> {
    let dirs = ProjectDirs::from("com", "mod-manager", "mod_manager")?;
    Utf8PathBuf::from_path_buf(dirs.config_dir().join(SETTINGS_FILE_NAME)).ok()
}
