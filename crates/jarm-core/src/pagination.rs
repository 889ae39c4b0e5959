// ── Pagination controller ──
//
// One `Paginator` per list (alerts, notifications). The page index is
// re-clamped every time the collection size changes, so a shrinking list
// always lands on a valid page.

use std::collections::HashSet;
use std::ops::Range;

use strum::Display;

/// Page state for one list with a fixed page size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    page_index: usize,
    page_size: usize,
    total: usize,
}

impl Paginator {
    /// A page size of zero is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
            total: 0,
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of non-empty pages.
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.page_size)
    }

    /// Highest valid index: `max(0, ceil(total / size) - 1)`.
    pub fn max_page(&self) -> usize {
        self.page_count().saturating_sub(1)
    }

    /// Clamp an arbitrary index against `total` items.
    pub fn clamp(&self, page_index: usize, total: usize) -> usize {
        page_index.min(total.div_ceil(self.page_size).saturating_sub(1))
    }

    /// Record a new collection size and re-clamp.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.page_index = self.clamp(self.page_index, total);
    }

    /// Advance one page. Returns `false` (no-op) on the last page.
    pub fn next(&mut self) -> bool {
        if self.page_index < self.max_page() {
            self.page_index += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page. Returns `false` (no-op) on the first page.
    pub fn prev(&mut self) -> bool {
        if self.page_index > 0 {
            self.page_index -= 1;
            true
        } else {
            false
        }
    }

    /// Item index range of the current page.
    pub fn range(&self) -> Range<usize> {
        let start = (self.page_index * self.page_size).min(self.total);
        let end = (start + self.page_size).min(self.total);
        start..end
    }

    /// The current page of `items`. Re-clamps against `items.len()` first.
    pub fn slice<'a, T>(&mut self, items: &'a [T]) -> &'a [T] {
        self.set_total(items.len());
        items.get(self.range()).unwrap_or_default()
    }

    /// `"Page 0 of 0"` when empty, otherwise one-based `"Page i of n"`.
    pub fn label(&self) -> String {
        if self.total == 0 {
            "Page 0 of 0".to_owned()
        } else {
            format!("Page {} of {}", self.page_index + 1, self.page_count())
        }
    }
}

// ── Binding registry ─────────────────────────────────────────────────

/// Logical control owning a set of navigation bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ControlId {
    AlertList,
    NotificationList,
    ChartPanel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum NavAction {
    Next,
    Prev,
    MarkRead,
    MarkAllRead,
}

/// Idempotent record of which (control, action) pairs are bound.
///
/// Re-rendering calls [`bind`](Self::bind) every frame; only the first
/// call per pair returns `true`, so a handler is attached exactly once.
#[derive(Debug, Default)]
pub struct BindingRegistry {
    bound: HashSet<(ControlId, NavAction)>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, control: ControlId, action: NavAction) -> bool {
        self.bound.insert((control, action))
    }

    pub fn is_bound(&self, control: ControlId, action: NavAction) -> bool {
        self.bound.contains(&(control, action))
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}
