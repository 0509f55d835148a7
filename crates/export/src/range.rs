//! Page range specs such as `"1-3,5"`.

use std::collections::BTreeSet;

/// Parses a 1-based range spec into sorted, deduplicated 0-based page indices.
///
/// `"all"` selects every page. Tokens are comma separated and either a single page
/// number or an inclusive `a-b` range. Malformed tokens, reversed ranges and pages
/// beyond `page_count` are dropped; a range that runs past the last page is clamped.
pub fn parse_page_range(spec: &str, page_count: usize) -> Vec<usize> {
    let spec = spec.trim();
    if spec.eq_ignore_ascii_case("all") {
        return (0..page_count).collect();
    }

    let mut pages = BTreeSet::new();
    for token in spec.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token.split_once('-') {
            Some((start, end)) => {
                let (Ok(start), Ok(end)) = (start.trim().parse::<usize>(), end.trim().parse::<usize>())
                else {
                    log::debug!("Dropping malformed range token '{}'", token);
                    continue;
                };
                if start == 0 || start > end {
                    continue;
                }
                pages.extend((start..=end.min(page_count)).map(|n| n - 1));
            }
            None => match token.parse::<usize>() {
                Ok(n) if n >= 1 && n <= page_count => {
                    pages.insert(n - 1);
                }
                _ => log::debug!("Dropping page token '{}'", token),
            },
        }
    }
    pages.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_and_singles() {
        assert_eq!(parse_page_range("2-3,5", 6), vec![1, 2, 4]);
        assert_eq!(parse_page_range("1-3,5", 10), vec![0, 1, 2, 4]);
        assert_eq!(parse_page_range(" 4 , 2 ", 5), vec![1, 3]);
    }

    #[test]
    fn all_selects_every_page() {
        assert_eq!(parse_page_range("all", 4), vec![0, 1, 2, 3]);
        assert_eq!(parse_page_range("ALL", 0), Vec::<usize>::new());
    }

    #[test]
    fn out_of_range_and_malformed_tokens_are_dropped() {
        assert_eq!(parse_page_range("9", 3), Vec::<usize>::new());
        assert_eq!(parse_page_range("0,x,2-,-3,1-2-3,2", 3), vec![1]);
        assert_eq!(parse_page_range("", 3), Vec::<usize>::new());
    }

    #[test]
    fn duplicates_collapse_and_order_is_ascending() {
        assert_eq!(parse_page_range("3,1-3,1", 4), vec![0, 1, 2]);
    }

    #[test]
    fn reversed_ranges_are_dropped_and_long_ranges_clamped() {
        assert_eq!(parse_page_range("3-1", 5), Vec::<usize>::new());
        assert_eq!(parse_page_range("4-99", 5), vec![3, 4]);
        assert_eq!(parse_page_range("7-9", 5), Vec::<usize>::new());
    }
}
