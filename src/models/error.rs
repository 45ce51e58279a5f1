use camino::Utf8PathBuf;

/// Central error type for the whole crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("file or directory '{0}' doesn't exist")]
    NotFound(Utf8PathBuf),

    /// A descriptor line that fits none of the dialect's statement forms,
    /// or that mixes pairs and bare values inside one block. Line numbers
    /// are 1-based and absolute within the descriptor.
    #[error("descriptor line {line} {reason}")]
    MalformedDescriptor { line: usize, reason: String },

    #[error("no .mod descriptor found in archive '{0}'")]
    MissingDescriptor(Utf8PathBuf),

    #[error("no 'mod' directory above descriptor '{0}'")]
    InstallRootNotFound(Utf8PathBuf),

    #[error("path '{}' is not valid UTF-8", .0.display())]
    NonUtf8Path(std::path::PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("registry document error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}
