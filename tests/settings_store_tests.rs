//! Settings Store Tests
//!
//! Durability of the sled-backed settings record across reopen, and the
//! handling of records written by older or foreign writers.

use hive_monitor::storage::{SettingsStore, SledSettingsStore, SETTINGS_KEY};
use hive_monitor::Settings;

#[test]
fn settings_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.db");
    let settings = Settings {
        refresh_interval_ms: 4_000,
        audio_enabled: false,
    };

    {
        let store = SledSettingsStore::open(&path).unwrap();
        store.save(&settings).unwrap();
    }

    let store = SledSettingsStore::open(&path).unwrap();
    assert_eq!(store.load().unwrap(), Some(settings));
}

#[test]
fn clear_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.db");

    {
        let store = SledSettingsStore::open(&path).unwrap();
        store.save(&Settings::default()).unwrap();
        store.clear().unwrap();
    }

    let store = SledSettingsStore::open(&path).unwrap();
    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn partial_record_fills_missing_fields_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let db = sled::open(dir.path().join("settings.db")).unwrap();
    let store = SledSettingsStore::from_db(&db).unwrap();

    db.open_tree("settings")
        .unwrap()
        .insert(SETTINGS_KEY, br#"{"refresh_interval_ms": 3000}"#.to_vec())
        .unwrap();

    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded.refresh_interval_ms, 3_000);
    assert!(loaded.audio_enabled);
}

#[test]
fn settings_tree_does_not_touch_the_default_tree() {
    let dir = tempfile::tempdir().unwrap();
    let db = sled::open(dir.path().join("settings.db")).unwrap();
    db.insert(SETTINGS_KEY, b"unrelated".to_vec()).unwrap();

    let store = SledSettingsStore::from_db(&db).unwrap();
    assert_eq!(store.load().unwrap(), None);

    store.save(&Settings::default()).unwrap();
    assert_eq!(db.get(SETTINGS_KEY).unwrap().unwrap().as_ref(), b"unrelated");
}
