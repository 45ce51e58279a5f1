use std::fs::{self, File};
use std::io::{self, BufReader};

use camino::{Utf8Path, Utf8PathBuf};
use zip::ZipArchive;

use crate::core::parser;
use crate::models::error::Error;
use crate::models::event::InstallOutcome;
use crate::models::metadata::{Mod, ModMetadata};

/// How `install` treats a mod already present in the game tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InstallMode {
    /// Leave an installed mod alone.
    Keep,
    /// Re-extract over whatever is there.
    Replace,
}

/// A mod packaged as a zip archive in the repository, not yet installed.
///
/// Opening the archive locates its single `*.mod` descriptor entry and
/// parses it; the archive itself is re-opened on install, so the handle is
/// not held in between.
#[derive(Debug)]
pub struct RepoMod {
    archive_path: Utf8PathBuf,
    metadata: ModMetadata,
}

impl RepoMod {
    pub fn open(archive_path: &Utf8Path) -> Result<Self, Error> {
        if !archive_path.exists() {
            return Err(Error::NotFound(archive_path.to_owned()));
        }

        let metadata = Self::load_metadata(archive_path)?;

        Ok(Self {
            archive_path: archive_path.to_owned(),
            metadata,
        })
    }

    pub fn archive_path(&self) -> &Utf8Path {
        &self.archive_path
    }

    pub fn metadata(&self) -> &ModMetadata {
        &self.metadata
    }

    /// Unpacks the mod into `game_dir`: the descriptor goes to
    /// `game_dir/mod/<id>.mod`, entries under `<id>/` go to the declared
    /// asset directory with the prefix stripped, and anything else in the
    /// archive is left alone. Extraction overwrites silently; `Keep` only
    /// short-circuits before it starts.
    pub fn install(&self, game_dir: &Utf8Path, mode: InstallMode) -> Result<InstallOutcome, Error> {
        let config_dir = game_dir.join("mod");
        let asset_dir = game_dir.join(&self.metadata.install_path);

        fs::create_dir_all(&config_dir)?;
        fs::create_dir_all(&asset_dir)?;

        let header_name = format!("{}.mod", self.metadata.remote_file_id);

        if mode == InstallMode::Keep && config_dir.join(&header_name).exists() {
            return Ok(InstallOutcome::Exists);
        }

        let asset_prefix = format!("{}/", self.metadata.remote_file_id);
        let file = File::open(&self.archive_path)?;
        let mut archive = ZipArchive::new(file)?;

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;

            // Entries name their own paths; refuse any that would land
            // outside the target directory.
            if entry.enclosed_name().is_none() {
                continue;
            }

            let name = entry.name().to_owned();
            let target = if name == header_name {
                config_dir.join(&name)
            } else if let Some(asset) = name.strip_prefix(&asset_prefix) {
                asset_dir.join(asset)
            } else {
                continue;
            };

            if entry.is_dir() {
                fs::create_dir_all(&target)?;
                continue;
            }
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut output = File::create(&target)?;
            io::copy(&mut entry, &mut output)?;
        }

        tracing::debug!(id = %self.metadata.remote_file_id, game_dir = %game_dir, "installed mod");
        Ok(InstallOutcome::Ok)
    }

    fn load_metadata(archive_path: &Utf8Path) -> Result<ModMetadata, Error> {
        let file = File::open(archive_path)?;
        let mut archive = ZipArchive::new(file)?;

        let mut descriptor = None;
        for index in 0..archive.len() {
            let entry = archive.by_index(index)?;
            let name = Utf8Path::new(entry.name());
            if name.extension() == Some("mod") {
                descriptor = Some((index, name.to_owned()));
                break;
            }
        }

        let (index, entry_name) =
            descriptor.ok_or_else(|| Error::MissingDescriptor(archive_path.to_owned()))?;

        let entry = archive.by_index(index)?;
        let config = parser::parse_reader(BufReader::new(entry))?;

        let fallback_id = entry_name.file_stem().unwrap_or_default();
        Ok(ModMetadata::from_config(config.as_ref(), fallback_id))
    }
}

impl Mod for RepoMod {
    fn metadata(&self) -> &ModMetadata {
        &self.metadata
    }
}
