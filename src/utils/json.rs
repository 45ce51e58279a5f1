use camino::Utf8Path;

use crate::models::error::Error;

pub struct Json;

impl Json {
    pub fn read<T: serde::de::DeserializeOwned>(path: &Utf8Path) -> Result<T, Error> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn write<T: serde::Serialize>(path: &Utf8Path, data: &T) -> Result<(), Error> {
        let text = serde_json::to_string_pretty(data)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}
