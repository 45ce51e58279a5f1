use camino::Utf8PathBuf;

use crate::core::parser::ConfigValue;

/// The one game this manager targets.
pub const GAME_NAME: &str = "Stellaris";

/// Which game, and which version of it, a mod declares support for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameReference {
    pub name: String,
    pub version: String,
}

impl GameReference {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Attributes shared by archived and installed mods, loaded from a parsed
/// descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModMetadata {
    pub name: String,
    pub tags: Vec<String>,
    /// Stable identifier joining a mod across its archive, its installed
    /// descriptor, and its registry record. Never empty.
    pub remote_file_id: String,
    /// Where the mod's assets land, relative to the game directory.
    pub install_path: Utf8PathBuf,
    pub game: GameReference,
}

impl ModMetadata {
    /// Builds metadata from a parsed descriptor. `fallback_id` is the
    /// descriptor's base filename, used when the descriptor carries no
    /// usable `remote_file_id`.
    pub fn from_config(config: Option<&ConfigValue>, fallback_id: &str) -> Self {
        let text = |key: &str| config.and_then(|c| c.get(key)).and_then(ConfigValue::as_text);

        let tags = config
            .and_then(|c| c.get("tags"))
            .and_then(ConfigValue::as_list)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_text().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default();

        let remote_file_id = text("remote_file_id")
            .filter(|id| !id.is_empty())
            .unwrap_or(fallback_id)
            .to_owned();

        Self {
            name: text("name").unwrap_or_default().to_owned(),
            tags,
            remote_file_id,
            install_path: Utf8PathBuf::from(text("path").unwrap_or_default()),
            game: GameReference::new(GAME_NAME, text("supported_version").unwrap_or_default()),
        }
    }
}

/// Read surface shared by both mod variants, for callers that render either
/// kind without caring which.
pub trait Mod {
    fn metadata(&self) -> &ModMetadata;
}
