// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn aligns_columns_to_widest_cell() {
    let mut table = Table::new(vec![Column { header: "NAME" }, Column { header: "STATUS" }]);
    table.push_row(vec!["a".to_string(), "should-run".to_string()]);
    table.push_row(vec!["much-longer-name".to_string(), "ok".to_string()]);

    let rendered = table.render();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("NAME"));
    assert_eq!(lines[1].split("  ").next().unwrap().trim_end(), "a");
}

#[test]
fn empty_table_renders_header_only() {
    let table = Table::new(vec![Column { header: "NAME" }]);
    assert_eq!(table.render(), "NAME\n");
}
