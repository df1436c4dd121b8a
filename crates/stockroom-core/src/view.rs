// ── Derived view ──
//
// Pure functions that turn the inventory state into what a front end
// renders: the sorted collection, the current page, the empty-state
// classification, and pager metadata. Nothing here mutates state.

use std::cmp::Ordering;

use crate::inventory::InventoryState;
use crate::model::{Equipment, SortConfig, SortDirection, SortKey};

/// Maximum number of numbered links in the pager window.
pub const MAX_PAGE_LINKS: usize = 5;

// ── Sorting ─────────────────────────────────────────────────────────

fn cmp_opt<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => Ordering::Equal,
    }
}

/// Compare two records on one field. A value missing on either side means
/// no preference.
pub fn compare_by(a: &Equipment, b: &Equipment, key: SortKey) -> Ordering {
    match key {
        SortKey::Id => a.id.cmp(&b.id),
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::Code => a.code.cmp(&b.code),
        SortKey::Quantity => a
            .quantity
            .partial_cmp(&b.quantity)
            .unwrap_or(Ordering::Equal),
        SortKey::Type => {
            let (a, b): (&str, &str) = (a.equipment_type.as_ref(), b.equipment_type.as_ref());
            a.cmp(b)
        }
        SortKey::Location => a.location.cmp(&b.location),
        SortKey::Department => a.department.cmp(&b.department),
        SortKey::IsOperational => a.is_operational.cmp(&b.is_operational),
        SortKey::Notes => cmp_opt(a.notes.as_deref(), b.notes.as_deref()),
        SortKey::Validity => cmp_opt(a.validity, b.validity),
        SortKey::LastUpdate => cmp_opt(a.last_update, b.last_update),
        SortKey::CreatedAt => cmp_opt(a.created_at, b.created_at),
        SortKey::UpdatedAt => cmp_opt(a.updated_at, b.updated_at),
    }
}

/// Stable sort of a copy of `items`.
///
/// Missing values compare equal to everything, which makes the comparator
/// intransitive, so this is an insertion sort rather than `slice::sort_by`
/// (which may panic on an inconsistent order). Records only move past
/// strictly greater neighbours, so equal keys keep their fetch order.
pub fn sorted(items: &[Equipment], sort: SortConfig) -> Vec<Equipment> {
    let mut out = items.to_vec();
    for i in 1..out.len() {
        let mut j = i;
        while j > 0 {
            let mut ord = compare_by(&out[j - 1], &out[j], sort.key);
            if sort.direction == SortDirection::Desc {
                ord = ord.reverse();
            }
            if ord != Ordering::Greater {
                break;
            }
            out.swap(j - 1, j);
            j -= 1;
        }
    }
    out
}

// ── Pagination ──────────────────────────────────────────────────────

/// The records shown on `page` (1-based). Page 0 and pages past the end
/// are empty.
pub fn page_slice(items: &[Equipment], page: usize, per_page: usize) -> &[Equipment] {
    if page == 0 || per_page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(per_page);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(per_page).min(items.len());
    &items[start..end]
}

pub fn total_pages(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page)
}

/// The "showing X to Y of Z" line of the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowingRange {
    pub first: usize,
    pub last: usize,
    pub total: usize,
}

pub fn showing_range(page: usize, per_page: usize, total: usize) -> ShowingRange {
    let page = page.max(1);
    ShowingRange {
        first: (page - 1).saturating_mul(per_page).saturating_add(1).min(total),
        last: page.saturating_mul(per_page).min(total),
        total,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(usize),
    Ellipsis,
}

/// Numbered pager links around `current`: at most five consecutive pages,
/// plus the first and last page behind an ellipsis when they fall outside
/// that window.
pub fn page_window(current: usize, total_pages: usize) -> Vec<PageLink> {
    if total_pages <= MAX_PAGE_LINKS {
        return (1..=total_pages).map(PageLink::Page).collect();
    }

    let mut start = current.saturating_sub(2).max(1);
    let end = start.saturating_add(MAX_PAGE_LINKS - 1).min(total_pages);
    if end.saturating_sub(start) < MAX_PAGE_LINKS - 1 {
        start = end.saturating_sub(MAX_PAGE_LINKS - 1).max(1);
    }

    let mut links = Vec::with_capacity(MAX_PAGE_LINKS + 4);
    if start > 1 {
        links.push(PageLink::Page(1));
        if start > 2 {
            links.push(PageLink::Ellipsis);
        }
    }
    links.extend((start..=end).map(PageLink::Page));
    if end < total_pages {
        if end < total_pages - 1 {
            links.push(PageLink::Ellipsis);
        }
        links.push(PageLink::Page(total_pages));
    }
    links
}

// ── Empty state ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The current page has records.
    Populated,
    /// The backend returned nothing for the current filters.
    NoData,
    /// Records exist but the current page is out of range.
    FilteredEmpty,
}

pub fn classify(total: usize, page_len: usize) -> EmptyState {
    if total == 0 {
        EmptyState::NoData
    } else if page_len == 0 {
        EmptyState::FilteredEmpty
    } else {
        EmptyState::Populated
    }
}

// ── Combined view ───────────────────────────────────────────────────

/// Everything a grid needs for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryView {
    pub page_items: Vec<Equipment>,
    pub empty_state: EmptyState,
    pub current_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub showing: ShowingRange,
    pub page_links: Vec<PageLink>,
    /// Only worth drawing a pager when there is more than one page.
    pub show_pager: bool,
}

impl InventoryView {
    pub fn compute(state: &InventoryState) -> Self {
        let ordered = sorted(&state.items, state.sort);
        let page_items = page_slice(&ordered, state.current_page, state.items_per_page).to_vec();
        let total_items = ordered.len();
        let total_pages = total_pages(total_items, state.items_per_page);
        Self {
            empty_state: classify(total_items, page_items.len()),
            current_page: state.current_page,
            showing: showing_range(state.current_page, state.items_per_page, total_items),
            page_links: page_window(state.current_page, total_pages),
            show_pager: total_pages > 1,
            total_items,
            total_pages,
            page_items,
        }
    }
}
