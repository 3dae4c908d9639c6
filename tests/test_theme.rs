//! Theme store tests.

mod common;

use kwebstore_sdk::config::THEME_STORAGE_KEY;
use kwebstore_sdk::{MemoryStorage, Storage, Theme, ThemeStore};

#[test]
fn missing_theme_follows_system_preference() {
    let storage = MemoryStorage::new();
    assert_eq!(ThemeStore::open(&storage, true).theme(), Theme::Dark);
    assert_eq!(ThemeStore::open(&storage, false).theme(), Theme::Light);
    assert_eq!(storage.write_count(), 0);
}

#[test]
fn saved_theme_overrides_system_preference() {
    let storage = MemoryStorage::with_value(THEME_STORAGE_KEY, "light");
    assert_eq!(ThemeStore::open(&storage, true).theme(), Theme::Light);
}

#[test]
fn unrecognised_saved_value_falls_back() {
    let storage = MemoryStorage::with_value(THEME_STORAGE_KEY, "sepia");
    assert_eq!(ThemeStore::open(&storage, true).theme(), Theme::Dark);
}

#[test]
fn toggle_flips_and_persists_literal() {
    let storage = MemoryStorage::new();
    let mut store = ThemeStore::open(&storage, false);

    assert_eq!(store.toggle().unwrap(), Theme::Dark);
    assert_eq!(storage.get(THEME_STORAGE_KEY).unwrap().as_deref(), Some("dark"));

    assert_eq!(store.toggle().unwrap(), Theme::Light);
    assert_eq!(storage.get(THEME_STORAGE_KEY).unwrap().as_deref(), Some("light"));
}

#[test]
fn failed_write_keeps_current_theme() {
    let storage = MemoryStorage::new();
    let mut store = ThemeStore::open(&storage, false);
    storage.fail_writes(true);

    assert!(store.toggle().is_err());
    assert_eq!(store.theme(), Theme::Light);
}

#[test]
fn theme_parses_and_displays() {
    assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
    assert!("Dark".parse::<Theme>().is_err());
    assert_eq!(Theme::Light.to_string(), "light");
    assert!(Theme::Light.toggled().is_dark());
}

#[test]
fn unreadable_storage_falls_back_and_logs() {
    let storage = MemoryStorage::with_value(THEME_STORAGE_KEY, "light");
    storage.fail_reads(true);

    let (store, logs) = common::with_captured_logs(|| ThemeStore::open(&storage, true));

    assert_eq!(store.theme(), Theme::Dark);
    assert!(logs.contains("WARN"), "logs: {}", logs);
    assert!(logs.contains("Failed to read saved theme"), "logs: {}", logs);
    assert_eq!(storage.write_count(), 0);
}
