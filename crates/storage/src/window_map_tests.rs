// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 1, 0, 0).unwrap()
}

#[test]
fn missing_map_is_none() {
    let store = Store::in_memory().unwrap();
    assert!(store.window_map(&TenantId::new("tenant-1")).unwrap().is_none());
}

#[test]
fn put_then_get() {
    let store = Store::in_memory().unwrap();
    let tenant = TenantId::new("tenant-1");
    let map = WindowMapRecord {
        morning: Some(WindowId::new("win-am")),
        arvo: Some(WindowId::new("win-pm")),
    };
    store.put_window_map(&tenant, &map, now()).unwrap();

    let read = store.window_map(&tenant).unwrap().unwrap();
    assert_eq!(read, map);
    assert_eq!(read.id_for(Window::Morning).unwrap(), "win-am");
    assert_eq!(read.id_for(Window::Afternoon).unwrap(), "win-pm");
}

#[test]
fn refresh_overwrites_last_writer_wins() {
    let store = Store::in_memory().unwrap();
    let tenant = TenantId::new("tenant-1");
    store
        .put_window_map(
            &tenant,
            &WindowMapRecord { morning: Some(WindowId::new("old-am")), arvo: None },
            now(),
        )
        .unwrap();
    store
        .put_window_map(
            &tenant,
            &WindowMapRecord {
                morning: Some(WindowId::new("new-am")),
                arvo: Some(WindowId::new("new-pm")),
            },
            now(),
        )
        .unwrap();
    let read = store.window_map(&tenant).unwrap().unwrap();
    assert_eq!(read.morning.unwrap(), "new-am");
    assert_eq!(read.arvo.unwrap(), "new-pm");
}

#[test]
fn partial_map_round_trips() {
    let store = Store::in_memory().unwrap();
    let tenant = TenantId::new("tenant-1");
    let map = WindowMapRecord { morning: None, arvo: Some(WindowId::new("win-pm")) };
    store.put_window_map(&tenant, &map, now()).unwrap();
    let read = store.window_map(&tenant).unwrap().unwrap();
    assert!(read.morning.is_none());
    assert!(read.id_for(Window::Morning).is_none());
    assert_eq!(read.id_for(Window::Afternoon).unwrap(), "win-pm");
}
