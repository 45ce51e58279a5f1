use std::fs;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// Sets up an empty game/repo directory pair under one temp root.
pub fn setup_test_env() -> (TempDir, Utf8PathBuf, Utf8PathBuf) {
    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("non UTF-8 temp dir");

    let game_dir = root.join("stellaris");
    let repo_dir = root.join("repo");
    fs::create_dir_all(&game_dir).unwrap();
    fs::create_dir_all(&repo_dir).unwrap();

    (tmp, game_dir, repo_dir)
}

/// Renders a descriptor in the launcher dialect, `remote_file_id` included.
pub fn descriptor(name: &str, id: &str, version: &str, tags: &[&str]) -> String {
    let mut text = descriptor_without_id(name, id, version, tags);
    text.push_str(&format!("remote_file_id=\"{id}\"\n"));
    text
}

/// Same descriptor with no explicit `remote_file_id`, for exercising the
/// filename fallback. `id` still shapes the asset path.
pub fn descriptor_without_id(name: &str, id: &str, version: &str, tags: &[&str]) -> String {
    let mut text = String::new();
    text.push_str(&format!("name=\"{name}\"\n"));
    text.push_str("tags={\n");
    for tag in tags {
        text.push_str(&format!("\t\"{tag}\"\n"));
    }
    text.push_str("}\n");
    text.push_str(&format!("supported_version=\"{version}\"\n"));
    text.push_str(&format!("path=\"workshop/content/281990/{id}/\"\n"));
    text
}

/// Writes a mod archive into the repo: the descriptor entry named
/// `<id>.mod` plus any extra entries verbatim (callers namespace asset
/// entries under `<id>/` themselves).
pub fn write_mod_archive(
    repo_dir: &Utf8Path,
    file_name: &str,
    id: &str,
    descriptor_body: &str,
    entries: &[(&str, &str)],
) -> Utf8PathBuf {
    let path = repo_dir.join(file_name);
    let file = fs::File::create(&path).expect("Failed to create archive");
    let mut writer = zip::ZipWriter::new(file);

    writer
        .start_file(format!("{id}.mod"), SimpleFileOptions::default())
        .unwrap();
    writer.write_all(descriptor_body.as_bytes()).unwrap();

    for (name, content) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }

    writer.finish().expect("Failed to finish archive");
    path
}

/// Writes a loose descriptor under `<game_dir>/mod`, as an install would.
pub fn write_game_descriptor(game_dir: &Utf8Path, id: &str, body: &str) -> Utf8PathBuf {
    let mod_dir = game_dir.join("mod");
    fs::create_dir_all(&mod_dir).unwrap();
    let path = mod_dir.join(format!("{id}.mod"));
    fs::write(&path, body).unwrap();
    path
}
