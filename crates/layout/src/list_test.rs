#![cfg(test)]

use crate::test_utils::layout;

#[test]
fn test_unordered_list_indents_and_bullets() {
    let pages = layout("<ul><li>one</li><li>two</li></ul>after");
    let lines = &pages[0].lines;

    assert_eq!(lines.len(), 3);
    for line in &lines[..2] {
        let marker = &line.spans[0];
        assert!(marker.marker);
        assert_eq!(marker.text, "\u{2022}");
        assert_eq!(marker.x, 102.0);
        assert_eq!(line.spans[1].x, 120.0);
    }
    assert_eq!(lines[0].text(), "one");
    assert_eq!(lines[2].spans[0].x, 80.0);
}

#[test]
fn test_ordered_list_counts_items() {
    let pages = layout("<ol><li>a</li><li>b</li><li>c</li></ol>");
    let markers: Vec<&str> = pages[0]
        .lines
        .iter()
        .map(|l| l.spans[0].text.as_str())
        .collect();
    assert_eq!(markers, vec!["1.", "2.", "3."]);
}

#[test]
fn test_nested_lists_indent_further() {
    let pages = layout("<ul><li>outer<ul><li>inner</li></ul></li></ul>");
    let lines = &pages[0].lines;
    assert_eq!(lines[0].spans[1].x, 120.0);
    assert_eq!(lines[1].spans[1].text, "inner");
    assert_eq!(lines[1].spans[1].x, 160.0);
}
