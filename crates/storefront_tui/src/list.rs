//! Per-resource list state: rows, paging, search and load tracking.

use crate::Debouncer;
use std::time::{Duration, Instant};
use storefront_core::{Category, DEFAULT_PER_PAGE, ListQuery, MAX_PER_PAGE, Page, Product};

/// Page sizes offered by the size selector.
pub const PAGE_SIZES: [u32; 5] = [5, 10, 25, 50, 100];

/// A record that can be listed in a table.
pub trait Record {
    /// Column titles.
    const HEADERS: &'static [&'static str];

    /// Row identifier.
    fn id(&self) -> i64;

    /// Rendered cells, one per header.
    fn cells(&self) -> Vec<String>;
}

impl Record for Category {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "CategoryChoix", "Created"];

    fn id(&self) -> i64 {
        self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.category_choix.clone(),
            self.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ]
    }
}

impl Record for Product {
    const HEADERS: &'static [&'static str] =
        &["ID", "Name", "Price", "Qty", "Image", "Description"];

    fn id(&self) -> i64 {
        self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.price.map(|p| format!("{:.2}", p)).unwrap_or_default(),
            self.quantity_available.to_string(),
            self.image1.clone().unwrap_or_default(),
            self.description.clone().unwrap_or_default(),
        ]
    }
}

/// Inputs that determine which rows should be on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadKey {
    /// Requested page
    pub page: u32,
    /// Requested page size
    pub per_page: u32,
    /// Debounced search term
    pub search: String,
    /// Explicit reload counter
    pub reload: u64,
}

impl LoadKey {
    /// Query to send for this key.
    pub fn query(&self) -> ListQuery {
        ListQuery::new(self.page, self.per_page, self.search.clone())
    }
}

/// Rows and controls for one resource.
///
/// A load is due whenever the page, page size, debounced search or reload
/// counter differ from the last load started. A failed load is not retried
/// until one of them changes.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    /// Rows of the current page
    pub rows: Vec<T>,
    /// A load is in flight
    pub loading: bool,
    /// Current page, 1-based
    pub page: u32,
    /// Last page reported by the server
    pub last_page: u32,
    /// Matching rows across all pages
    pub total: u64,
    /// Rows per page
    pub per_page: u32,
    /// Search text exactly as typed
    pub search_input: String,
    /// Search text applied to loads
    pub search: String,
    /// Highlighted row
    pub selected: usize,
    debouncer: Debouncer,
    reload: u64,
    started: Option<LoadKey>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self::new(Debouncer::default())
    }
}

impl<T> ListState<T> {
    /// Empty list on page one.
    pub fn new(debouncer: Debouncer) -> Self {
        Self {
            rows: Vec::new(),
            loading: false,
            page: 1,
            last_page: 1,
            total: 0,
            per_page: DEFAULT_PER_PAGE,
            search_input: String::new(),
            search: String::new(),
            selected: 0,
            debouncer,
            reload: 0,
            started: None,
        }
    }

    /// Empty list whose search waits `delay` after the last keystroke.
    pub fn with_debounce(delay: Duration) -> Self {
        Self::new(Debouncer::new(delay))
    }

    fn key(&self) -> LoadKey {
        LoadKey {
            page: self.page,
            per_page: self.per_page,
            search: self.search.clone(),
            reload: self.reload,
        }
    }

    /// The load to start, if the inputs changed since the last one.
    pub fn pending_load(&self) -> Option<LoadKey> {
        let key = self.key();
        (self.started.as_ref() != Some(&key)).then_some(key)
    }

    /// Mark `key` as started.
    pub fn begin_load(&mut self, key: LoadKey) {
        self.loading = true;
        self.started = Some(key);
    }

    /// Replace rows with a loaded page.
    pub fn finish_load(&mut self, page: Page<T>) {
        self.rows = page.data;
        self.total = page.total;
        self.last_page = page.last_page.max(1);
        self.loading = false;
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
    }

    /// Keep prior rows after a failed load.
    pub fn fail_load(&mut self) {
        self.loading = false;
    }

    /// Ask for a fresh load with unchanged inputs.
    pub fn request_reload(&mut self) {
        self.reload = self.reload.wrapping_add(1);
    }

    /// Append a typed character to the search input.
    pub fn push_search(&mut self, ch: char, now: Instant) {
        self.search_input.push(ch);
        self.debouncer.input(self.search_input.clone(), now);
    }

    /// Remove the last character of the search input.
    pub fn pop_search(&mut self, now: Instant) {
        self.search_input.pop();
        self.debouncer.input(self.search_input.clone(), now);
    }

    /// Apply debounced search text; a changed term returns to page one.
    pub fn tick(&mut self, now: Instant) {
        if let Some(value) = self.debouncer.poll(now) {
            let value = value.trim().to_string();
            if value != self.search {
                self.search = value;
                self.page = 1;
                self.selected = 0;
            }
        }
    }

    /// Go to the next page when there is one.
    pub fn next_page(&mut self) {
        if self.page < self.last_page {
            self.page += 1;
            self.selected = 0;
        }
    }

    /// Go to the previous page when there is one.
    pub fn previous_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
            self.selected = 0;
        }
    }

    /// Change the page size; the page is kept, as the list pages do.
    pub fn set_per_page(&mut self, per_page: u32) {
        self.per_page = per_page.clamp(1, MAX_PER_PAGE);
    }

    /// Step through [`PAGE_SIZES`].
    pub fn cycle_per_page(&mut self, forward: bool) {
        let index = PAGE_SIZES
            .iter()
            .position(|size| *size == self.per_page)
            .unwrap_or(1);
        let next = if forward {
            (index + 1) % PAGE_SIZES.len()
        } else {
            (index + PAGE_SIZES.len() - 1) % PAGE_SIZES.len()
        };
        self.set_per_page(PAGE_SIZES[next]);
    }

    /// Move the highlight up.
    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move the highlight down.
    pub fn select_next(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    /// The highlighted row.
    pub fn selected_row(&self) -> Option<&T> {
        self.rows.get(self.selected)
    }
}

impl<T: Record> ListState<T> {
    /// Drop a deleted row locally and count it out of the total.
    pub fn remove_row(&mut self, id: i64) {
        let before = self.rows.len();
        self.rows.retain(|row| row.id() != id);
        if self.rows.len() < before {
            self.total = self.total.saturating_sub(1);
        }
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn category(id: i64) -> Category {
        Category {
            id,
            name: format!("Category {}", id),
            category_choix: "retail".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn load_is_due_only_when_inputs_change() {
        let mut list: ListState<Category> = ListState::default();
        let key = list.pending_load().unwrap();
        list.begin_load(key.clone());
        assert!(list.pending_load().is_none());

        list.fail_load();
        assert!(!list.loading);
        assert!(list.pending_load().is_none());

        list.request_reload();
        let next = list.pending_load().unwrap();
        assert_eq!(next.page, key.page);
        assert_ne!(next.reload, key.reload);
    }

    #[test]
    fn debounced_search_resets_page() {
        let start = Instant::now();
        let mut list: ListState<Category> = ListState::with_debounce(Duration::from_millis(500));
        list.last_page = 4;
        list.next_page();
        list.next_page();
        assert_eq!(list.page, 3);

        list.push_search('l', start);
        list.push_search('a', start + Duration::from_millis(100));
        assert_eq!(list.search_input, "la");
        list.tick(start + Duration::from_millis(300));
        assert_eq!(list.search, "");
        assert_eq!(list.page, 3);

        list.tick(start + Duration::from_millis(700));
        assert_eq!(list.search, "la");
        assert_eq!(list.page, 1);
    }

    #[test]
    fn remove_row_decrements_total() {
        let mut list: ListState<Category> = ListState::default();
        let query = ListQuery::new(1, 10, "");
        list.finish_load(Page::new(vec![category(3), category(2), category(1)], 13, &query));
        list.selected = 2;

        list.remove_row(1);
        assert_eq!(list.rows.len(), 2);
        assert_eq!(list.total, 12);
        assert_eq!(list.selected, 1);

        list.remove_row(99);
        assert_eq!(list.total, 12);
    }

    #[test]
    fn page_sizes_cycle() {
        let mut list: ListState<Product> = ListState::default();
        assert_eq!(list.per_page, 10);
        list.cycle_per_page(true);
        assert_eq!(list.per_page, 25);
        list.cycle_per_page(false);
        list.cycle_per_page(false);
        assert_eq!(list.per_page, 5);
        list.cycle_per_page(false);
        assert_eq!(list.per_page, 100);
    }
}
