//! SDK entry point tests: builder wiring and shared storage.

mod common;

use kwebstore_sdk::config::{CART_STORAGE_KEY, THEME_STORAGE_KEY};
use kwebstore_sdk::{CartStore, MemoryStorage, Storage, StorefrontSdk, Theme};
use std::rc::Rc;

fn sdk_with_memory() -> (StorefrontSdk, Rc<MemoryStorage>) {
    let storage = Rc::new(MemoryStorage::new());
    let sdk = StorefrontSdk::builder()
        .base_url("http://localhost:9")
        .storage(storage.clone())
        .page_size(4)
        .build()
        .unwrap();
    (sdk, storage)
}

#[test]
fn builder_applies_configuration() {
    let (sdk, _storage) = sdk_with_memory();
    assert_eq!(sdk.catalog().base_url(), "http://localhost:9");
    assert_eq!(sdk.feed().page_size(), 4);
    assert_eq!(
        sdk.to_string(),
        "StorefrontSdk(base_url=http://localhost:9, page_size=4)"
    );
}

#[test]
fn cart_handles_from_sdk_are_one_store() {
    let (sdk, storage) = sdk_with_memory();
    let first = sdk.cart();
    let second = sdk.cart();
    assert!(Rc::ptr_eq(&first, &second));

    first.borrow_mut().add(common::product(1, 2.5), 2).unwrap();
    second.borrow_mut().add(common::product(2, 1.0), 1).unwrap();

    assert_eq!(first.borrow().item_count(), 3);
    assert_eq!(second.borrow().lines(), first.borrow().lines());
    let persisted = storage.get(CART_STORAGE_KEY).unwrap().unwrap();
    let lines: Vec<serde_json::Value> = serde_json::from_str(&persisted).unwrap();
    assert_eq!(lines.len(), 2);
}

#[test]
fn cart_writes_through_one_handle_are_not_lost_by_another() {
    let (sdk, storage) = sdk_with_memory();
    let stale_holder = sdk.cart();
    sdk.cart()
        .borrow_mut()
        .add(common::product(1, 1.0), 1)
        .unwrap();

    stale_holder.borrow_mut().toggle_selected(1).unwrap();

    let reopened = CartStore::open(&*storage);
    assert_eq!(reopened.lines().len(), 1);
    assert!(!reopened.get(1).unwrap().selected);
}

#[test]
fn theme_opened_from_sdk_persists() {
    let (sdk, storage) = sdk_with_memory();
    sdk.theme(false).borrow_mut().toggle().unwrap();

    assert_eq!(sdk.theme(true).borrow().theme(), Theme::Dark);
    assert!(Rc::ptr_eq(&sdk.theme(false), &sdk.theme(true)));
    assert_eq!(
        storage.get(THEME_STORAGE_KEY).unwrap().as_deref(),
        Some("dark")
    );
}

#[test]
fn default_storage_is_file_backed_under_storage_dir() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let dir = tmp_dir.path().join("kwebstore");
    let sdk = StorefrontSdk::builder().storage_dir(&dir).build().unwrap();

    sdk.cart()
        .borrow_mut()
        .add(common::product(3, 1.0), 1)
        .unwrap();
    assert!(dir.join(CART_STORAGE_KEY).is_file());
    assert_eq!(sdk.cart().borrow().item_count(), 1);

    let next_session = StorefrontSdk::builder().storage_dir(&dir).build().unwrap();
    assert_eq!(next_session.cart().borrow().item_count(), 1);
}
