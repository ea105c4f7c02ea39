//! List query coercion and the page object returned by list endpoints.

use serde::{Deserialize, Serialize};

/// Page size applied when the request does not name one.
pub const DEFAULT_PER_PAGE: u32 = 10;
/// Upper bound applied to requested page sizes.
pub const MAX_PER_PAGE: u32 = 100;

/// Page size limits, usually taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct PageLimits {
    /// Size used when none (or an invalid one) is requested
    #[serde(default = "default_per_page")]
    default_per_page: u32,
    /// Largest size honored
    #[serde(default = "max_per_page")]
    max_per_page: u32,
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

fn max_per_page() -> u32 {
    MAX_PER_PAGE
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_per_page: DEFAULT_PER_PAGE,
            max_per_page: MAX_PER_PAGE,
        }
    }
}

impl PageLimits {
    /// Build limits; a zero maximum is raised to one and the default is clamped into range.
    pub fn new(default_per_page: u32, max_per_page: u32) -> Self {
        let max_per_page = max_per_page.max(1);
        Self {
            default_per_page: default_per_page.clamp(1, max_per_page),
            max_per_page,
        }
    }
}

/// List parameters exactly as they arrive on the query string.
///
/// Every field is kept as text so malformed values can fall back to
/// defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawListQuery {
    /// Requested page, 1-based
    pub page: Option<String>,
    /// Requested page size
    pub per_page: Option<String>,
    /// Alias for `per_page` used by the admin pages
    pub showing: Option<String>,
    /// Substring filter
    pub search: Option<String>,
}

/// Coerced list parameters.
///
/// # Examples
///
/// ```
/// use storefront_core::{ListQuery, PageLimits, RawListQuery};
///
/// let raw = RawListQuery {
///     page: Some("abc".to_string()),
///     showing: Some("500".to_string()),
///     search: Some("  lamp ".to_string()),
///     ..Default::default()
/// };
/// let query = ListQuery::from_raw(&raw, PageLimits::default());
///
/// assert_eq!(*query.page(), 1);
/// assert_eq!(*query.per_page(), 100);
/// assert_eq!(query.search_term(), Some("lamp"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct ListQuery {
    page: u32,
    per_page: u32,
    search: String,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            search: String::new(),
        }
    }
}

impl ListQuery {
    /// Explicit parameters, clamped the same way as query-string input.
    pub fn new(page: u32, per_page: u32, search: impl Into<String>) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
            search: search.into().trim().to_string(),
        }
    }

    /// Coerce raw query-string values, falling back to defaults for anything
    /// missing, non-numeric, or non-positive.
    pub fn from_raw(raw: &RawListQuery, limits: PageLimits) -> Self {
        let page = parse_positive(raw.page.as_deref()).unwrap_or(1);
        let per_page = parse_positive(raw.per_page.as_deref())
            .or_else(|| parse_positive(raw.showing.as_deref()))
            .unwrap_or(limits.default_per_page)
            .min(limits.max_per_page);
        let search = raw.search.as_deref().unwrap_or_default().trim().to_string();
        Self {
            page,
            per_page,
            search,
        }
    }

    /// Search term, or `None` when every row matches.
    pub fn search_term(&self) -> Option<&str> {
        if self.search.is_empty() {
            None
        } else {
            Some(&self.search)
        }
    }

    /// Lowercased search term for in-memory matching.
    pub fn search_lowercase(&self) -> Option<String> {
        self.search_term().map(str::to_lowercase)
    }

    /// `%term%` with LIKE metacharacters escaped by backslash.
    pub fn like_pattern(&self) -> Option<String> {
        self.search_term().map(|term| {
            let mut pattern = String::with_capacity(term.len() + 2);
            pattern.push('%');
            for ch in term.chars() {
                if matches!(ch, '%' | '_' | '\\') {
                    pattern.push('\\');
                }
                pattern.push(ch);
            }
            pattern.push('%');
            pattern
        })
    }

    /// Rows to skip before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    /// Same filter and size, different page.
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    /// Query-string pairs understood by the list endpoints.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ];
        if let Some(term) = self.search_term() {
            pairs.push(("search", term.to_string()));
        }
        pairs
    }
}

fn parse_positive(value: Option<&str>) -> Option<u32> {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
}

/// One page of a filtered, ordered listing.
///
/// # Examples
///
/// ```
/// use storefront_core::{ListQuery, Page};
///
/// let query = ListQuery::new(3, 10, "");
/// let page = Page::new(vec![21, 22, 23, 24, 25, 26, 27], 27, &query);
///
/// assert_eq!(page.last_page, 3);
/// assert_eq!(page.from, Some(21));
/// assert_eq!(page.to, Some(27));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Page number of this slice, 1-based
    pub current_page: u32,
    /// Rows on this page
    pub data: Vec<T>,
    /// Position of the first row, `None` when the slice is empty
    pub from: Option<u64>,
    /// Position of the last row, `None` when the slice is empty
    pub to: Option<u64>,
    /// Number of the final page, at least 1
    pub last_page: u32,
    /// Page size used
    pub per_page: u32,
    /// Rows matching the filter across all pages
    pub total: u64,
}

impl<T> Page<T> {
    /// Assemble a page from a slice and the unpaginated count.
    pub fn new(data: Vec<T>, total: u64, query: &ListQuery) -> Self {
        let per_page = u64::from(query.per_page);
        let last_page = total.div_ceil(per_page).max(1);
        let offset = query.offset();
        let (from, to) = if data.is_empty() {
            (None, None)
        } else {
            (Some(offset + 1), Some(offset + data.len() as u64))
        };
        Self {
            current_page: query.page,
            data,
            from,
            to,
            last_page: u32::try_from(last_page).unwrap_or(u32::MAX),
            per_page: query.per_page,
            total,
        }
    }

    /// Transform the rows, keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            current_page: self.current_page,
            data: self.data.into_iter().map(f).collect(),
            from: self.from,
            to: self.to,
            last_page: self.last_page,
            per_page: self.per_page,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(page: Option<&str>, per_page: Option<&str>, showing: Option<&str>) -> RawListQuery {
        RawListQuery {
            page: page.map(String::from),
            per_page: per_page.map(String::from),
            showing: showing.map(String::from),
            search: None,
        }
    }

    #[test]
    fn missing_values_use_defaults() {
        let query = ListQuery::from_raw(&RawListQuery::default(), PageLimits::default());
        assert_eq!(query, ListQuery::default());
        assert_eq!(query.search_term(), None);
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let limits = PageLimits::new(15, 50);
        let query = ListQuery::from_raw(&raw(Some("-2"), Some("zero"), None), limits);
        assert_eq!(*query.page(), 1);
        assert_eq!(*query.per_page(), 15);

        let query = ListQuery::from_raw(&raw(Some("0"), Some("0"), None), limits);
        assert_eq!(*query.page(), 1);
        assert_eq!(*query.per_page(), 15);
    }

    #[test]
    fn per_page_wins_over_showing_and_is_capped() {
        let limits = PageLimits::new(10, 50);
        let query = ListQuery::from_raw(&raw(Some("2"), Some("25"), Some("5")), limits);
        assert_eq!(*query.per_page(), 25);

        let query = ListQuery::from_raw(&raw(None, None, Some("5")), limits);
        assert_eq!(*query.per_page(), 5);

        let query = ListQuery::from_raw(&raw(None, Some("1000"), None), limits);
        assert_eq!(*query.per_page(), 50);
    }

    #[test]
    fn like_pattern_escapes_metacharacters() {
        let query = ListQuery::new(1, 10, "50%_off\\");
        assert_eq!(query.like_pattern().as_deref(), Some("%50\\%\\_off\\\\%"));
    }

    #[test]
    fn empty_total_still_has_one_page() {
        let page: Page<u8> = Page::new(vec![], 0, &ListQuery::default());
        assert_eq!(page.last_page, 1);
        assert_eq!(page.from, None);
        assert_eq!(page.to, None);
    }

    #[test]
    fn page_past_the_end_reports_no_positions() {
        let query = ListQuery::new(5, 10, "");
        let page: Page<u8> = Page::new(vec![], 27, &query);
        assert_eq!(page.last_page, 3);
        assert_eq!(page.current_page, 5);
        assert_eq!(page.from, None);
    }

    #[test]
    fn offset_follows_page_and_size() {
        assert_eq!(ListQuery::new(1, 10, "").offset(), 0);
        assert_eq!(ListQuery::new(4, 25, "").offset(), 75);
    }
}
