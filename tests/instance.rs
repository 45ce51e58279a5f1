mod common;

use common::{descriptor, setup_test_env, write_game_descriptor, write_mod_archive};
use mod_manager_lib::core::instance::Instance;
use mod_manager_lib::core::registry::{Registry, REGISTRY_FILE_NAME};
use mod_manager_lib::core::repo_mod::InstallMode;
use mod_manager_lib::models::error::Error;
use mod_manager_lib::models::event::ModEvent;
use std::fs;

fn event_tag(event: ModEvent) -> String {
    match event {
        ModEvent::InstallStart { metadata } => format!("start {}", metadata.remote_file_id),
        ModEvent::InstallEnd { metadata, outcome } => match outcome {
            Ok(result) => format!("end {} {}", metadata.remote_file_id, result),
            Err(_) => format!("end {} error", metadata.remote_file_id),
        },
        ModEvent::RegisterStart { metadata } => format!("reg-start {}", metadata.remote_file_id),
        ModEvent::RegisterEnd { metadata, outcome } => match outcome {
            Ok(()) => format!("reg-end {} ok", metadata.remote_file_id),
            Err(_) => format!("reg-end {} error", metadata.remote_file_id),
        },
    }
}

#[test]
fn test_lists_repo_and_game_mods() {
    let (_tmp, game_dir, repo_dir) = setup_test_env();
    write_mod_archive(&repo_dir, "1.zip", "1", &descriptor("Mod 1", "1", "2.6", &[]), &[]);
    write_mod_archive(&repo_dir, "2.zip", "2", &descriptor("Mod 2", "2", "2.7", &[]), &[]);
    write_game_descriptor(&game_dir, "1", &descriptor("Mod 1", "1", "2.6", &[]));

    let mut instance = Instance::new(game_dir, repo_dir).expect("Failed to create instance");
    assert!(instance.game_dir().ends_with("stellaris"));
    assert!(instance.repo_dir().ends_with("repo"));

    let repo_mods = instance.repo_mods().expect("Failed to list repo mods");
    assert_eq!(repo_mods.len(), 2);
    assert_eq!(repo_mods[0].metadata().remote_file_id, "1");
    assert_eq!(repo_mods[1].metadata().remote_file_id, "2");

    let game_mods = instance.game_mods().expect("Failed to list game mods");
    assert_eq!(game_mods.len(), 1);
    assert_eq!(game_mods[0].metadata().name, "Mod 1");
}

#[test]
fn test_new_rejects_missing_directories() {
    let (_tmp, game_dir, repo_dir) = setup_test_env();

    match Instance::new(game_dir.join("nope"), repo_dir) {
        Err(Error::NotFound(_)) => {}
        other => panic!("Expected NotFound, got: {:?}", other),
    }
}

#[test]
fn test_listing_is_cached_until_reload() {
    let (_tmp, game_dir, repo_dir) = setup_test_env();
    write_mod_archive(&repo_dir, "1.zip", "1", &descriptor("Mod 1", "1", "2.6", &[]), &[]);

    let mut instance = Instance::new(game_dir, repo_dir.clone()).unwrap();
    assert_eq!(instance.repo_mods().unwrap().len(), 1);

    // A second archive appears; the cache hides it until reload.
    write_mod_archive(&repo_dir, "2.zip", "2", &descriptor("Mod 2", "2", "2.6", &[]), &[]);
    assert_eq!(instance.repo_mods().unwrap().len(), 1);

    instance.reload();
    assert_eq!(instance.repo_mods().unwrap().len(), 2);
}

#[test]
fn test_unreadable_archive_aborts_listing() {
    let (_tmp, game_dir, repo_dir) = setup_test_env();
    fs::write(repo_dir.join("1.zip"), "not an archive").unwrap();

    let mut instance = Instance::new(game_dir, repo_dir).unwrap();
    match instance.repo_mods() {
        Err(Error::Archive(_)) => {}
        other => panic!("Expected Archive error, got: {:?}", other.err()),
    }
}

#[test]
fn test_install_isolates_a_failing_mod() {
    let (_tmp, game_dir, repo_dir) = setup_test_env();
    let archive1 = write_mod_archive(&repo_dir, "1.zip", "1", &descriptor("Mod 1", "1", "2.6", &[]), &[]);
    write_mod_archive(&repo_dir, "2.zip", "2", &descriptor("Mod 2", "2", "2.6", &[]), &[]);

    let mut instance = Instance::new(game_dir, repo_dir).unwrap();

    // 1. Cache the listing while both archives are intact.
    instance.repo_mods().expect("Failed to list repo mods");

    // 2. Corrupt the first archive; its install will now fail.
    fs::write(&archive1, "garbage").unwrap();

    // 3. The batch reports the failure and still processes the second mod.
    let mut events = Vec::new();
    instance
        .install(InstallMode::Keep, |event| events.push(event_tag(event)))
        .expect("Batch itself should not fail");

    assert_eq!(events, vec!["start 1", "end 1 error", "start 2", "end 2 ok"]);
}

#[test]
fn test_install_then_register_full_run() {
    let (_tmp, game_dir, repo_dir) = setup_test_env();
    write_mod_archive(
        &repo_dir,
        "1.zip",
        "1",
        &descriptor("Mod 1", "1", "2.6", &["Overhaul"]),
        &[("1/common/a.txt", "a")],
    );
    write_mod_archive(
        &repo_dir,
        "2.zip",
        "2",
        &descriptor("Mod 2", "2", "2.7", &["Gameplay"]),
        &[("2/common/b.txt", "b")],
    );

    let mut instance = Instance::new(game_dir.clone(), repo_dir).unwrap();
    let mode = InstallMode::Keep;

    // 1. Install phase extracts both mods.
    let mut events = Vec::new();
    instance.install(mode, |event| events.push(event_tag(event))).unwrap();
    assert_eq!(events, vec!["start 1", "end 1 ok", "start 2", "end 2 ok"]);

    // 2. The game tree now holds the descriptors; register them.
    instance.reload();
    let mut events = Vec::new();
    instance.register(|event| events.push(event_tag(event))).unwrap();
    assert_eq!(events, vec!["reg-start 1", "reg-end 1 ok", "reg-start 2", "reg-end 2 ok"]);

    let registry_path = game_dir.join(REGISTRY_FILE_NAME);
    let registry = Registry::load(&registry_path).unwrap();
    assert_eq!(registry.len(), 2);
    let (key1, _) = registry.find_by_steam_id("1").expect("record not found");
    let key1 = key1.clone();

    // 3. A second run installs nothing new and keeps registry keys stable.
    instance.reload();
    let mut events = Vec::new();
    instance.install(mode, |event| events.push(event_tag(event))).unwrap();
    assert_eq!(events, vec!["start 1", "end 1 exists", "start 2", "end 2 exists"]);

    instance.register(|_| {}).unwrap();
    let registry = Registry::load(&registry_path).unwrap();
    assert_eq!(registry.len(), 2);
    let (key1_again, _) = registry.find_by_steam_id("1").expect("record not found");
    assert_eq!(key1_again, &key1);
}

#[test]
fn test_game_mods_without_mod_directory_is_not_found() {
    let (_tmp, game_dir, repo_dir) = setup_test_env();

    let mut instance = Instance::new(game_dir, repo_dir).unwrap();
    match instance.game_mods() {
        Err(Error::NotFound(path)) => assert!(path.as_str().ends_with("mod")),
        other => panic!("Expected NotFound, got: {:?}", other.err()),
    }
}
