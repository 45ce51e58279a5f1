use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::core::game_mod::GameMod;
use crate::core::registry::REGISTRY_FILE_NAME;
use crate::core::repo_mod::{InstallMode, RepoMod};
use crate::models::error::Error;
use crate::models::event::ModEvent;

/// One mod-manager instance: a repository of archived mods and a game
/// directory to install them into.
///
/// Listings are enumerated lazily and cached until [`reload`](Self::reload);
/// the filesystem, not the cache, is the source of truth.
#[derive(Debug)]
pub struct Instance {
    repo_dir: Utf8PathBuf,
    game_dir: Utf8PathBuf,
    repo_mods: Option<Vec<RepoMod>>,
    game_mods: Option<Vec<GameMod>>,
}

impl Instance {
    pub fn new(
        game_dir: impl Into<Utf8PathBuf>,
        repo_dir: impl Into<Utf8PathBuf>,
    ) -> Result<Self, Error> {
        let game_dir = game_dir.into();
        let repo_dir = repo_dir.into();

        for dir in [&game_dir, &repo_dir] {
            if !dir.is_dir() {
                return Err(Error::NotFound(dir.clone()));
            }
        }

        Ok(Self {
            repo_dir,
            game_dir,
            repo_mods: None,
            game_mods: None,
        })
    }

    pub fn game_dir(&self) -> &Utf8Path {
        &self.game_dir
    }

    pub fn repo_dir(&self) -> &Utf8Path {
        &self.repo_dir
    }

    /// Drops both cached listings.
    pub fn reload(&mut self) -> &mut Self {
        self.repo_mods = None;
        self.game_mods = None;
        self
    }

    /// Archived mods, one per entry at the top of the repo directory.
    /// A single unreadable archive aborts the whole listing.
    pub fn repo_mods(&mut self) -> Result<&[RepoMod], Error> {
        if self.repo_mods.is_none() {
            let mut mods = Vec::new();
            for path in list_dir(&self.repo_dir)? {
                mods.push(RepoMod::open(&path)?);
            }
            tracing::debug!(count = mods.len(), dir = %self.repo_dir, "scanned repository mods");
            self.repo_mods = Some(mods);
        }
        Ok(self.repo_mods.as_deref().unwrap_or_default())
    }

    /// Installed mods, one per descriptor under `<game_dir>/mod`.
    pub fn game_mods(&mut self) -> Result<&[GameMod], Error> {
        if self.game_mods.is_none() {
            let config_dir = self.game_dir.join("mod");
            if !config_dir.is_dir() {
                return Err(Error::NotFound(config_dir));
            }
            let mut mods = Vec::new();
            for path in list_dir(&config_dir)? {
                mods.push(GameMod::open(&path)?);
            }
            tracing::debug!(count = mods.len(), dir = %config_dir, "scanned installed mods");
            self.game_mods = Some(mods);
        }
        Ok(self.game_mods.as_deref().unwrap_or_default())
    }

    /// Installs every repository mod into the game directory, reporting one
    /// start/end event pair per mod. A failing mod is reported through its
    /// end event and the batch moves on to the next one.
    pub fn install(
        &mut self,
        mode: InstallMode,
        mut on_event: impl FnMut(ModEvent),
    ) -> Result<(), Error> {
        let game_dir = self.game_dir.clone();
        for repo_mod in self.repo_mods()? {
            on_event(ModEvent::InstallStart {
                metadata: repo_mod.metadata().clone(),
            });
            let outcome = repo_mod.install(&game_dir, mode);
            on_event(ModEvent::InstallEnd {
                metadata: repo_mod.metadata().clone(),
                outcome,
            });
        }
        Ok(())
    }

    /// Registers every installed mod into the game's catalog; the second
    /// phase of an install run. Same per-mod isolation as `install`.
    pub fn register(&mut self, mut on_event: impl FnMut(ModEvent)) -> Result<(), Error> {
        let registry_path = self.game_dir.join(REGISTRY_FILE_NAME);
        for game_mod in self.game_mods()? {
            on_event(ModEvent::RegisterStart {
                metadata: game_mod.metadata().clone(),
            });
            let outcome = game_mod.register(&registry_path);
            on_event(ModEvent::RegisterEnd {
                metadata: game_mod.metadata().clone(),
                outcome,
            });
        }
        Ok(())
    }
}

/// Top-level entries of `dir`, sorted by name so batches and their event
/// streams are deterministic.
fn list_dir(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>, Error> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = Utf8PathBuf::from_path_buf(entry.path()).map_err(Error::NonUtf8Path)?;
        paths.push(path);
    }
    paths.sort();
    Ok(paths)
}
