#![cfg(test)]

use crate::output::BreakKind;
use crate::test_utils::{layout, normalize_whitespace, reconstruct, test_geometry};

#[test]
fn test_empty_document_yields_single_blank_page() {
    let pages = layout("");
    assert_eq!(pages.len(), 1);
    assert!(pages[0].is_empty());
    assert!(pages[0].lines.is_empty());
    assert_eq!(pages[0].plain_text(), "");
}

#[test]
fn test_text_wrapping_stays_inside_margins() {
    let geometry = test_geometry();
    let text = "The quick brown fox jumps over the lazy dog and keeps running far beyond the \
                edge of the page until the line has to wrap at least once more.";
    let pages = layout(text);
    let page = &pages[0];

    assert!(page.lines.len() >= 2, "text should wrap");
    for line in &page.lines {
        for span in &line.spans {
            assert!(span.x >= geometry.left_edge() - 0.01);
            assert!(span.x + span.width <= geometry.right_edge() + 0.02);
        }
    }
    assert!(page.lines[..page.lines.len() - 1]
        .iter()
        .all(|l| l.break_kind == BreakKind::Wrap));
    assert_eq!(page.lines.last().map(|l| l.break_kind), Some(BreakKind::End));
}

#[test]
fn test_baselines_advance_by_line_pitch() {
    let pages = layout("one\ntwo\nthree");
    let baselines: Vec<f32> = pages[0].lines.iter().map(|l| l.baseline_y).collect();
    assert_eq!(baselines, vec![120.0, 160.0, 200.0]);
}

#[test]
fn test_blank_lines_are_preserved() {
    let pages = layout("first\n\n\nsecond");
    let texts: Vec<String> = pages[0].lines.iter().map(|l| l.text()).collect();
    assert_eq!(texts, vec!["first", "", "", "second"]);
    assert_eq!(pages[0].lines[3].paragraph_index, 3);
}

#[test]
fn test_overlong_word_is_hyphenated() {
    let geometry = test_geometry();
    let word = "a".repeat(60);
    let pages = layout(&format!("x {} y", word));
    let lines = &pages[0].lines;

    // "x" cannot share a line with the overlong word, which is then cut in two.
    assert_eq!(lines[0].text(), "x");
    assert_eq!(lines[1].break_kind, BreakKind::Hyphen);
    let head = &lines[1].spans[0];
    assert!(head.hyphenated);
    assert!(head.text.ends_with('-'));
    assert!(head.x + head.width <= geometry.right_edge() + 0.02);

    let tail = &lines[2].spans[0];
    assert_eq!(tail.char_offset, head.text.chars().count() - 1);
    assert_eq!(tail.word_index, head.word_index);
    assert_eq!(lines[2].spans[1].text, "y");

    assert_eq!(reconstruct(&pages), format!("x {} y", word));
}

#[test]
fn test_every_hyphenated_line_places_at_least_one_char() {
    let geometry = penmark_types::PageGeometry::new(
        60.0,
        200.0,
        penmark_types::Margins::all(20.0),
        20.0,
    )
    .unwrap();
    // 20px of usable width: one 10px char plus a 10px hyphen per line.
    let pages = crate::test_utils::layout_with("abcd", &geometry, &crate::NoImages).unwrap();
    let texts: Vec<String> = pages[0].lines.iter().map(|l| l.text()).collect();
    assert_eq!(texts, vec!["a-", "b-", "cd"]);
}

#[test]
fn test_bold_and_italic_flags_and_width() {
    let pages = layout("word <b>word</b> <i>word</i> <u>word</u>");
    let spans = &pages[0].lines[0].spans;
    assert_eq!(spans.len(), 4);
    assert!(!spans[0].style.bold);
    assert!(spans[1].style.bold);
    assert!(spans[1].width > spans[0].width);
    assert!(spans[2].style.italic);
    assert!(spans[3].underline);
    assert!(!spans[2].underline);
}

#[test]
fn test_heading_size_ends_with_closing_tag() {
    let pages = layout("<h1>Title</h1>Body text follows the heading.");
    let lines = &pages[0].lines;

    assert_eq!(lines[0].heading, Some(1));
    assert_eq!(lines[0].pitch, 80.0);
    assert_eq!(lines[0].spans[0].style.font_size_px, 40.0);

    assert_eq!(lines[1].heading, None);
    assert_eq!(lines[1].pitch, test_geometry().line_pitch());
    assert!(lines[1].spans.iter().all(|s| s.style.font_size_px == 20.0));
    assert_eq!(lines[1].baseline_y, 80.0 + 80.0 + 40.0);
}

#[test]
fn test_arabic_paragraph_is_right_aligned() {
    let geometry = test_geometry();
    let pages = layout("hello\nمرحبا بالعالم");
    let lines = &pages[0].lines;

    assert!(!lines[0].rtl);
    assert!((lines[0].spans[0].x - geometry.left_edge()).abs() < 0.01);

    assert!(lines[1].rtl);
    let first = &lines[1].spans[0];
    let second = &lines[1].spans[1];
    assert!((first.x + first.width - geometry.right_edge()).abs() < 0.01);
    assert!(second.x < first.x, "second word is placed to the left");
}

#[test]
fn test_order_is_preserved_across_pages() {
    let mut text = String::new();
    for i in 0..400 {
        text.push_str(&format!("word{} ", i));
        if i % 37 == 0 {
            text.push('\n');
        }
        if i % 101 == 0 {
            text.push_str("incomprehensibilitiesincomprehensibilitiesincomprehensibilities ");
        }
    }
    let pages = layout(&text);
    assert!(pages.len() > 1);
    assert_eq!(reconstruct(&pages), normalize_whitespace(&text));
}

#[test]
fn test_pagination_is_deterministic() {
    let text = "<p>Some <b>bold</b> words.</p>\n".repeat(120);
    assert_eq!(layout(&text), layout(&text));
}

#[test]
fn test_page_count_is_monotonic() {
    let mut previous = 0;
    let mut text = String::new();
    for _ in 0..40 {
        text.push_str("lorem ipsum dolor sit amet consectetur adipiscing elit ");
        let count = layout(&text).len();
        assert!(count >= previous);
        previous = count;
    }
    assert!(previous > 1);
}
