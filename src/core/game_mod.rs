use std::fs::File;
use std::io::BufReader;

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::core::parser;
use crate::core::registry::Registry;
use crate::models::error::Error;
use crate::models::metadata::{Mod, ModMetadata};

/// A mod already unpacked under the game's `mod` directory, backed by a
/// loose descriptor file.
#[derive(Debug)]
pub struct GameMod {
    /// Symlink-resolved descriptor path.
    descriptor_path: Utf8PathBuf,
    /// Directory the mod was installed relative to: the parent of the
    /// enclosing `mod` directory.
    install_root: Utf8PathBuf,
    /// Descriptor path relative to `install_root`; the launcher knows it
    /// as `gameRegistryId`.
    game_registry_id: Utf8PathBuf,
    metadata: ModMetadata,
}

impl GameMod {
    pub fn open(descriptor_path: &Utf8Path) -> Result<Self, Error> {
        if !descriptor_path.exists() {
            return Err(Error::NotFound(descriptor_path.to_owned()));
        }

        let file = File::open(descriptor_path)?;
        let config = parser::parse_reader(BufReader::new(file))?;
        let fallback_id = descriptor_path.file_stem().unwrap_or_default();
        let metadata = ModMetadata::from_config(config.as_ref(), fallback_id);

        let real_path = canonicalized(descriptor_path)?;
        let (install_root, game_registry_id) = derive_install_root(&real_path)?;

        Ok(Self {
            descriptor_path: real_path,
            install_root,
            game_registry_id,
            metadata,
        })
    }

    pub fn descriptor_path(&self) -> &Utf8Path {
        &self.descriptor_path
    }

    pub fn install_root(&self) -> &Utf8Path {
        &self.install_root
    }

    pub fn game_registry_id(&self) -> &Utf8Path {
        &self.game_registry_id
    }

    pub fn metadata(&self) -> &ModMetadata {
        &self.metadata
    }

    /// Reconciles this mod into the catalog at `registry_path` and rewrites
    /// the document. The catalog is re-read on every call so registrations
    /// earlier in the same run, and manual edits, are never clobbered.
    ///
    /// A mod already registered keeps its UUID key and gets its record
    /// merged field-by-field; an unknown mod gets a fresh UUID, embedded in
    /// the record as `id` so a consumer handed a bare record can still
    /// recover the key.
    pub fn register(&self, registry_path: &Utf8Path) -> Result<(), Error> {
        let mut registry = Registry::load(registry_path)?;
        let fresh = self.registry_record();

        let (key, record) = match registry.find_by_steam_id(&self.metadata.remote_file_id) {
            Some((key, existing)) => {
                // Overlay: fresh fields win, fields added by other tools
                // survive.
                let mut merged = existing.as_object().cloned().unwrap_or_default();
                for (field, value) in fresh {
                    merged.insert(field, value);
                }
                (key.clone(), merged)
            }
            None => {
                let key = Uuid::new_v4().to_string();
                let mut record = fresh;
                record.insert("id".to_owned(), Value::from(key.as_str()));
                (key, record)
            }
        };

        tracing::debug!(id = %self.metadata.remote_file_id, key = %key, "registering mod");
        registry.upsert(key, record);
        registry.persist()
    }

    fn registry_record(&self) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert(
            "gameRegistryId".to_owned(),
            Value::from(self.game_registry_id.as_str()),
        );
        record.insert("source".to_owned(), Value::from("local"));
        record.insert(
            "steamId".to_owned(),
            Value::from(self.metadata.remote_file_id.as_str()),
        );
        record.insert(
            "displayName".to_owned(),
            Value::from(self.metadata.name.as_str()),
        );
        record.insert("tags".to_owned(), Value::from(self.metadata.tags.clone()));
        record.insert(
            "requiredVersion".to_owned(),
            Value::from(self.metadata.game.version.as_str()),
        );
        record.insert(
            "dirPath".to_owned(),
            Value::from(self.metadata.install_path.as_str()),
        );
        record.insert("status".to_owned(), Value::from("ready_to_play"));
        record
    }
}

impl Mod for GameMod {
    fn metadata(&self) -> &ModMetadata {
        &self.metadata
    }
}

fn canonicalized(path: &Utf8Path) -> Result<Utf8PathBuf, Error> {
    let real = dunce::canonicalize(path)?;
    Utf8PathBuf::from_path_buf(real).map_err(Error::NonUtf8Path)
}

/// Walks up from the descriptor to the directory literally named `mod`,
/// then one level above it. Also hands back the descriptor's path relative
/// to that root, which is what the registry records.
fn derive_install_root(descriptor: &Utf8Path) -> Result<(Utf8PathBuf, Utf8PathBuf), Error> {
    let root = descriptor
        .ancestors()
        .find(|dir| dir.file_name() == Some("mod"))
        .and_then(Utf8Path::parent)
        .ok_or_else(|| Error::InstallRootNotFound(descriptor.to_owned()))?;

    let relative = descriptor
        .strip_prefix(root)
        .map_err(|_| Error::InstallRootNotFound(descriptor.to_owned()))?;

    Ok((root.to_owned(), relative.to_owned()))
}
