// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn system_clock_moves_forward() {
    let clock = SystemClock;
    let a = clock.now();
    let b = clock.now();
    assert!(b >= a);
}

#[test]
fn fake_clock_advances() {
    let clock = FakeClock::new();
    let start = clock.now();

    clock.advance(Duration::seconds(30));
    assert_eq!(clock.now() - start, Duration::seconds(30));
}

#[test]
fn fake_clock_set_overrides() {
    let clock = FakeClock::new();
    let target = Utc::now() + Duration::days(1);

    clock.set(target);
    assert_eq!(clock.now(), target);
}

#[test]
fn fake_clock_clones_share_time() {
    let clock = FakeClock::new();
    let other = clock.clone();

    clock.advance(Duration::seconds(5));
    assert_eq!(clock.now(), other.now());
}
