// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use ledgerloop::config::{
    Config, KEY_CURRENCY, KEY_TIPS_API_KEY, KEY_TIPS_ENDPOINT, KEY_UPCOMING_DAYS, get_setting,
    list_settings, set_setting,
};
use ledgerloop::db::db_path;
use ledgerloop::store::SqliteStore;
use std::path::Path;

#[test]
fn defaults_without_settings() {
    let store = SqliteStore::open_in_memory().unwrap();
    let cfg = Config::load(store.conn()).unwrap();
    assert_eq!(cfg.currency, "R$");
    assert_eq!(cfg.upcoming_days, 5);
    assert!(cfg.tips.is_none());
}

#[test]
fn settings_round_trip_and_override_defaults() {
    let store = SqliteStore::open_in_memory().unwrap();
    let conn = store.conn();
    set_setting(conn, KEY_CURRENCY, "EUR").unwrap();
    set_setting(conn, KEY_UPCOMING_DAYS, "10").unwrap();
    set_setting(conn, KEY_UPCOMING_DAYS, "7").unwrap();
    set_setting(conn, KEY_TIPS_ENDPOINT, "http://localhost:1/tips").unwrap();
    set_setting(conn, KEY_TIPS_API_KEY, "secret").unwrap();

    assert_eq!(get_setting(conn, KEY_UPCOMING_DAYS).unwrap().as_deref(), Some("7"));
    assert_eq!(list_settings(conn).unwrap().len(), 4);

    let cfg = Config::load(conn).unwrap();
    assert_eq!(cfg.currency, "EUR");
    assert_eq!(cfg.upcoming_days, 7);
    let tips = cfg.tips.unwrap();
    assert_eq!(tips.url, "http://localhost:1/tips");
    assert!(tips.api_key.is_some());
}

#[test]
fn bad_settings_are_rejected() {
    let store = SqliteStore::open_in_memory().unwrap();
    let conn = store.conn();
    assert!(set_setting(conn, "colour", "blue").is_err());
    assert!(set_setting(conn, KEY_UPCOMING_DAYS, "soon").is_err());
    assert!(set_setting(conn, KEY_UPCOMING_DAYS, "-1").is_err());
    assert!(list_settings(conn).unwrap().is_empty());
}

#[test]
fn explicit_db_path_wins() {
    let p = db_path(Some(Path::new("/tmp/ledgerloop-test.sqlite"))).unwrap();
    assert_eq!(p, Path::new("/tmp/ledgerloop-test.sqlite"));
}

#[test]
fn file_database_keeps_records_between_opens() {
    use ledgerloop::db::open_or_init;
    use ledgerloop::directory::{create_user, find_user};

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.sqlite");
    {
        let mut store = open_or_init(Some(path.as_path())).unwrap();
        create_user(&mut store, "Ana", "ana@example.com").unwrap();
    }
    let store = open_or_init(Some(path.as_path())).unwrap();
    let user = find_user(&store, "ana@example.com").unwrap().unwrap();
    assert_eq!(user.name, "Ana");
}
