// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn tilde_expands_to_home() {
    let home = dirs::home_dir().unwrap().display().to_string();
    assert_eq!(normalize("~", None), home);
}

#[test]
fn tilde_slash_prefix_expands() {
    let home = dirs::home_dir().unwrap();
    let normalized = normalize("~/projects/demo", None);
    assert!(normalized.starts_with(&home.display().to_string()));
    assert!(normalized.ends_with("demo"));
}

#[test]
fn absolute_input_stays_absolute() {
    let normalized = normalize("/tmp/pipeforge", None);
    assert_eq!(normalized, "/tmp/pipeforge");
}

#[test]
fn relative_input_joins_base() {
    let normalized = normalize("sub/dir", Some(Path::new("/base")));
    assert_eq!(normalized, format!("/base{0}sub{0}dir", MAIN_SEPARATOR));
}

#[test]
fn relative_without_base_joins_current_dir() {
    let cwd = std::env::current_dir().unwrap();
    let normalized = normalize("somewhere", None);
    assert!(normalized.starts_with(&cwd.display().to_string()));
}

#[test]
fn dot_segments_resolve() {
    assert_eq!(normalize("/a/b/../c/./d", None), "/a/c/d");
    assert!(!normalize("/a/./b/..", None).contains(".."));
}

#[test]
fn parent_never_escapes_root() {
    assert_eq!(normalize("/../../x", None), "/x");
}

#[test]
fn alternate_separators_replaced() {
    let normalized = normalize(r"/a\b\c", None);
    assert!(!normalized.contains(ALT_SEPARATOR));
}

#[test]
fn empty_and_whitespace_unchanged() {
    assert_eq!(normalize("", None), "");
    assert_eq!(normalize("   ", None), "   ");
}

#[test]
fn separator_only_normalize_keeps_relative() {
    let out = normalize_separators(Some(r"rel\path"));
    assert_eq!(out, Some(format!("rel{}path", MAIN_SEPARATOR)));
    assert_eq!(normalize_separators(None), None);
}
