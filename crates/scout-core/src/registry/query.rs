//! Filtering, searching and pagination over parsed entries.

use super::entry::{CategoryFilter, Entry};

pub const SEARCH_DEFAULT_LIMIT: usize = 10;
pub const SEARCH_MAX_LIMIT: usize = 50;
pub const LIST_DEFAULT_LIMIT: usize = 20;
pub const LIST_MAX_LIMIT: usize = 100;

/// Apply the default when absent, then cap at `max`.
pub fn effective_limit(limit: Option<usize>, default: usize, max: usize) -> usize {
    limit.unwrap_or(default).min(max)
}

/// Keep entries in the given category. `All` keeps everything.
pub fn filter_by_category<'a>(entries: &'a [Entry], filter: &CategoryFilter) -> Vec<&'a Entry> {
    entries
        .iter()
        .filter(|entry| filter.matches(entry.category))
        .collect()
}

/// Case-insensitive substring search on name or description.
///
/// Preserves input order and truncates to the effective search limit.
pub fn search<'a, I>(entries: I, query: &str, limit: Option<usize>) -> Vec<&'a Entry>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let needle = query.to_lowercase();
    let limit = effective_limit(limit, SEARCH_DEFAULT_LIMIT, SEARCH_MAX_LIMIT);

    entries
        .into_iter()
        .filter(|entry| entry.matches_lowercase(&needle))
        .take(limit)
        .collect()
}

/// One window over a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub total: usize,
    pub offset: i64,
    pub limit: usize,
    pub has_more: bool,
}

/// Slice `[offset, offset + limit)` out of `items`.
///
/// Slicing follows the usual rules: a negative bound counts back from the
/// end, bounds past the end are clamped, and an inverted window is empty.
pub fn paginate<T>(items: &[T], offset: Option<i64>, limit: Option<usize>) -> Page<'_, T> {
    let total = items.len();
    let offset = offset.unwrap_or(0);
    let limit = effective_limit(limit, LIST_DEFAULT_LIMIT, LIST_MAX_LIMIT);
    let end = offset.saturating_add(limit as i64);

    let start_idx = resolve_bound(offset, total);
    let end_idx = resolve_bound(end, total);
    let window = if start_idx < end_idx {
        &items[start_idx..end_idx]
    } else {
        &items[0..0]
    };

    Page {
        items: window,
        total,
        offset,
        limit,
        has_more: end < total as i64,
    }
}

fn resolve_bound(bound: i64, len: usize) -> usize {
    let len = len as i64;
    let resolved = if bound < 0 { len + bound } else { bound };
    resolved.clamp(0, len) as usize
}
