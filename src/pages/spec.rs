//! Page-selection expressions
//!
//! A page spec selects which pages of a paginated resource to process:
//! `*` (all pages), single numbers, `a-b` ranges, `a-*` open ranges, and
//! comma-separated mixes such as `1,2,5-10,300-*`.

use crate::{HarvestError, Result};

/// Resolves a page spec against a known total page count
///
/// Returns an ordered, duplicate-free list of page numbers, each within
/// `[1, total_pages]`. First occurrence wins; repeats from overlapping terms
/// are dropped. An empty spec selects every page.
///
/// Ranges are clamped (`start` up to 1, `end` down to `total_pages`). A range
/// whose end is below its start is logged and skipped. A non-numeric term is
/// a user-input error and aborts the whole resolution.
pub fn resolve_page_spec(spec: &str, total_pages: u32) -> Result<Vec<u32>> {
    let mut pages = Vec::new();
    let mut push = |pages: &mut Vec<u32>, n: u32| {
        if !pages.contains(&n) {
            pages.push(n);
        }
    };

    if spec.trim().is_empty() {
        return Ok((1..=total_pages).collect());
    }

    for term in spec.split(',') {
        let term = term.trim();
        if term.is_empty() {
            continue;
        }

        if term == "*" {
            for n in 1..=total_pages {
                push(&mut pages, n);
            }
            continue;
        }

        if let Some((start_str, end_str)) = term.split_once('-') {
            let mut start = parse_page_number(start_str, term)?;
            let mut end = if end_str.trim() == "*" {
                total_pages
            } else {
                let end = parse_page_number(end_str, term)?;
                // Checked before clamping: `5-3` is invalid even when both
                // bounds are in range.
                if end < start {
                    tracing::warn!("Skipping invalid page range '{}' (end < start)", term);
                    continue;
                }
                end
            };

            start = start.max(1);
            end = end.min(total_pages);
            for n in start..=end {
                push(&mut pages, n);
            }
        } else {
            let n = parse_page_number(term, term)?;
            if n >= 1 && n <= total_pages {
                push(&mut pages, n);
            }
        }
    }

    Ok(pages)
}

fn parse_page_number(text: &str, term: &str) -> Result<u32> {
    text.trim().parse().map_err(|_| HarvestError::PageSpec {
        term: term.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_resolves_all_pages() {
        assert_eq!(resolve_page_spec("*", 4).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_spec_resolves_all_pages() {
        assert_eq!(resolve_page_spec("", 3).unwrap(), vec![1, 2, 3]);
        assert_eq!(resolve_page_spec("  ", 3).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_simple_range() {
        assert_eq!(resolve_page_spec("2-5", 10).unwrap(), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_open_range() {
        assert_eq!(resolve_page_spec("8-*", 10).unwrap(), vec![8, 9, 10]);
    }

    #[test]
    fn test_invalid_range_skipped() {
        assert_eq!(resolve_page_spec("3-1", 10).unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn test_invalid_range_does_not_poison_other_terms() {
        assert_eq!(resolve_page_spec("3-1,5", 10).unwrap(), vec![5]);
    }

    #[test]
    fn test_insertion_order_preserved() {
        assert_eq!(resolve_page_spec("1,3,2", 10).unwrap(), vec![1, 3, 2]);
    }

    #[test]
    fn test_overlapping_terms_first_occurrence_wins() {
        assert_eq!(
            resolve_page_spec("2-4,3-5", 10).unwrap(),
            vec![2, 3, 4, 5]
        );
    }

    #[test]
    fn test_range_clamped_to_total() {
        assert_eq!(resolve_page_spec("8-20", 10).unwrap(), vec![8, 9, 10]);
    }

    #[test]
    fn test_range_start_clamped_to_one() {
        assert_eq!(resolve_page_spec("0-2", 10).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_single_page_out_of_range_dropped() {
        assert_eq!(resolve_page_spec("99", 10).unwrap(), Vec::<u32>::new());
        assert_eq!(resolve_page_spec("0", 10).unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn test_non_numeric_term_aborts() {
        assert!(matches!(
            resolve_page_spec("1,abc,3", 10),
            Err(HarvestError::PageSpec { .. })
        ));
        assert!(matches!(
            resolve_page_spec("1-x", 10),
            Err(HarvestError::PageSpec { .. })
        ));
    }

    #[test]
    fn test_mixed_spec() {
        assert_eq!(
            resolve_page_spec("1, 2, 4-6, 9-*", 10).unwrap(),
            vec![1, 2, 4, 5, 6, 9, 10]
        );
    }

    #[test]
    fn test_all_output_within_bounds() {
        for spec in ["*", "0-99", "1,5,7-*", "3-3"] {
            let pages = resolve_page_spec(spec, 7).unwrap();
            assert!(pages.iter().all(|&n| (1..=7).contains(&n)), "{}", spec);
            let mut dedup = pages.clone();
            dedup.dedup();
            assert_eq!(dedup, pages, "duplicates in {}", spec);
        }
    }
}
