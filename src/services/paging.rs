//! Page number windowing for result lists.

/// One button in the pager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

/// Pages around the current one shown on each side
pub const PAGE_WINDOW: u32 = 2;

/// Every page is listed up to this many pages
const SHOW_ALL_UP_TO: u32 = 10;

/// Number of pages for `total_count` results
pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    u32::try_from(total_count.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX)
}

/// Page buttons for `current` of `total`.
///
/// Short lists show every page. Longer lists show the first and last page,
/// `current ± window` clamped between them, and an ellipsis for each gap.
pub fn page_items(current: u32, total: u32, window: u32) -> Vec<PageItem> {
    if total <= SHOW_ALL_UP_TO {
        return (1..=total).map(PageItem::Page).collect();
    }

    let start = current.saturating_sub(window).max(2);
    let end = current.saturating_add(window).min(total - 1);

    let mut items = vec![PageItem::Page(1)];
    if start > 2 {
        items.push(PageItem::Ellipsis);
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < total - 1 {
        items.push(PageItem::Ellipsis);
    }
    items.push(PageItem::Page(total));
    items
}

/// The page to load for a click on `requested`, if it is a change
pub fn next_page(requested: u32, current: u32, total: u32) -> Option<u32> {
    (requested >= 1 && requested <= total && requested != current).then_some(requested)
}
