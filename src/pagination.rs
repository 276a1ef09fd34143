/*!
 * Page slicing with clamped bounds
 */

use crate::types::Page;

/// Parse a raw `page` query value; anything but a positive integer yields 1
pub fn parse_page(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|&p| p >= 1)
        .map_or(1, |p| usize::try_from(p).unwrap_or(usize::MAX))
}

/// Slice `items` into the requested page.
///
/// The page is clamped into `[1, page_count]`, and `page_count` is at least 1
/// so an empty listing still has a valid first page.
pub fn paginate<T: Clone>(items: &[T], requested_page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total = items.len();
    let page_count = total.div_ceil(per_page).max(1);
    let page = requested_page.clamp(1, page_count);

    let start = (page - 1) * per_page;
    let end = (start + per_page).min(total);
    let items = items.get(start..end).map(<[T]>::to_vec).unwrap_or_default();

    let has_prev = page > 1;
    let has_next = page < page_count;

    Page {
        items,
        page,
        per_page,
        total,
        page_count,
        has_prev,
        has_next,
        prev_page: has_prev.then(|| page - 1),
        next_page: has_next.then(|| page + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps_past_last_page() {
        let items: Vec<u32> = (0..20).collect();
        let page = paginate(&items, 3, 10);

        assert_eq!(page.page_count, 2);
        assert_eq!(page.page, 2);
        assert!(!page.has_next);
        assert!(page.has_prev);
        assert_eq!(page.prev_page, Some(1));
        assert_eq!(page.next_page, None);
        assert_eq!(page.items, (10..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_listing_has_one_page() {
        let items: Vec<u32> = Vec::new();
        let page = paginate(&items, 5, 10);

        assert_eq!(page.page_count, 1);
        assert_eq!(page.page, 1);
        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());
        assert!(!page.has_prev && !page.has_next);
    }

    #[test]
    fn test_partial_last_page() {
        let items: Vec<u32> = (0..25).collect();
        let page = paginate(&items, 3, 10);

        assert_eq!(page.page_count, 3);
        assert_eq!(page.items, vec![20, 21, 22, 23, 24]);

        let first = paginate(&items, 0, 10);
        assert_eq!(first.page, 1);
        assert_eq!(first.next_page, Some(2));
        assert_eq!(first.items.len(), 10);
    }

    #[test]
    fn test_zero_per_page_is_treated_as_one() {
        let items = vec!["a", "b"];
        let page = paginate(&items, 2, 0);
        assert_eq!(page.per_page, 1);
        assert_eq!(page.items, vec!["b"]);
    }

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("")), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("-3")), 1);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some(" 4 ")), 4);
    }
}
