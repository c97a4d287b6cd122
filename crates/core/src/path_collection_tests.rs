// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn wd() -> PathBuf {
    PathBuf::from("/work")
}

#[test]
fn single_flattens_to_one_absolute_path() {
    let c = PathCollection::Single(PathBuf::from("a.txt"));
    assert_eq!(c.flatten(&wd()), vec![PathBuf::from("/work/a.txt")]);
}

#[test]
fn single_absolute_path_is_not_rejoined() {
    let c = PathCollection::Single(PathBuf::from("/elsewhere/a.txt"));
    assert_eq!(c.flatten(&wd()), vec![PathBuf::from("/elsewhere/a.txt")]);
}

#[test]
fn sequence_preserves_declaration_order() {
    let c = PathCollection::Sequence(vec![
        PathBuf::from("b.txt"),
        PathBuf::from("a.txt"),
    ]);
    assert_eq!(
        c.flatten(&wd()),
        vec![PathBuf::from("/work/b.txt"), PathBuf::from("/work/a.txt")]
    );
}

#[test]
fn mapping_preserves_insertion_order_not_key_order() {
    let mut map = IndexMap::new();
    map.insert("z".to_string(), PathBuf::from("z.txt"));
    map.insert("a".to_string(), PathBuf::from("a.txt"));
    let c = PathCollection::Mapping(map);
    assert_eq!(
        c.flatten(&wd()),
        vec![PathBuf::from("/work/z.txt"), PathBuf::from("/work/a.txt")]
    );
}

#[test]
fn empty_flattens_to_empty_vec() {
    assert!(PathCollection::empty().flatten(&wd()).is_empty());
}
