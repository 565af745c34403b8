//! # Restaurant Listing State
//!
//! The filter / sort / search / pagination state behind the restaurant list,
//! kept free of I/O so every transition is a plain function call.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Listing State Transitions                            │
//! │                                                                         │
//! │  User control            Transition             Effect                  │
//! │  ────────────            ──────────             ──────                  │
//! │  cuisine chip ─────────► toggle_cuisine() ─┐                            │
//! │  rating select ────────► set_min_rating() ─┤                            │
//! │  open/closed ──────────► set_availability()┤    page = 1                │
//! │  search box ───────────► set_search() ─────┼──► changed? ──► refetch    │
//! │  sort select ──────────► set_sort() ───────┤                            │
//! │  per-page select ──────► set_per_page() ───┤                            │
//! │  "clear all" ──────────► clear_filters() ──┘                            │
//! │                                                                         │
//! │  pager ────────────────► go_to_page(n) ────► clamp [1, total_pages]    │
//! │                                                                         │
//! │  issue() ──► ListingQuery { generation: g } ──► backend                 │
//! │  reconcile(g, meta) ──► Stale | Applied | PageClamped (refetch)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stale Responses
//! Every issued query carries a generation number. Only the response to the
//! most recently issued query is applied; anything older is dropped, so a
//! slow response can never overwrite the results of a newer filter choice.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::PageMeta;
use crate::validation::validate_search_query;
use crate::{DEFAULT_PER_PAGE, PER_PAGE_OPTIONS};

/// Minimum-rating choices offered next to "any rating".
pub const RATING_OPTIONS: [f32; 4] = [4.5, 4.0, 3.5, 3.0];

// =============================================================================
// Filters
// =============================================================================

/// User-selected constraints sent to the listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    /// Cuisine ids; a restaurant matches if it serves any of them.
    pub cuisines: Vec<String>,
    /// Lower bound on the average rating.
    pub min_rating: Option<f32>,
    /// `Some(true)` open only, `Some(false)` closed only, `None` all.
    pub is_open: Option<bool>,
}

impl FilterSet {
    /// One per filter category in use.
    pub fn active_count(&self) -> usize {
        usize::from(!self.cuisines.is_empty())
            + usize::from(self.min_rating.is_some())
            + usize::from(self.is_open.is_some())
    }

    fn normalized(mut self) -> CoreResult<Self> {
        if let Some(rating) = self.min_rating {
            check_rating_option(rating)?;
        }
        let mut seen = Vec::with_capacity(self.cuisines.len());
        for id in self.cuisines.drain(..) {
            let id = id.trim().to_string();
            if !id.is_empty() && !seen.contains(&id) {
                seen.push(id);
            }
        }
        self.cuisines = seen;
        Ok(self)
    }
}

fn check_rating_option(rating: f32) -> CoreResult<()> {
    if RATING_OPTIONS.iter().any(|r| (r - rating).abs() < f32::EPSILON) {
        Ok(())
    } else {
        Err(ValidationError::NotAllowed {
            field: "min_rating".to_string(),
            allowed: RATING_OPTIONS.iter().map(|r| format!("{:.1}", r)).collect(),
        }
        .into())
    }
}

// =============================================================================
// Sort Option
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOption {
    #[default]
    #[serde(rename = "name-asc")]
    NameAsc,
    #[serde(rename = "name-desc")]
    NameDesc,
    #[serde(rename = "rating-desc")]
    RatingDesc,
    #[serde(rename = "rating-asc")]
    RatingAsc,
}

impl SortOption {
    pub const ALL: [SortOption; 4] = [
        SortOption::NameAsc,
        SortOption::NameDesc,
        SortOption::RatingDesc,
        SortOption::RatingAsc,
    ];

    /// Wire value for the `sort` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::NameAsc => "name-asc",
            SortOption::NameDesc => "name-desc",
            SortOption::RatingDesc => "rating-desc",
            SortOption::RatingAsc => "rating-asc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOption::NameAsc => "Name (A-Z)",
            SortOption::NameDesc => "Name (Z-A)",
            SortOption::RatingDesc => "Rating (High to Low)",
            SortOption::RatingAsc => "Rating (Low to High)",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOption::ALL
            .into_iter()
            .find(|opt| opt.as_str() == s.trim())
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "sort".to_string(),
                allowed: SortOption::ALL.iter().map(|o| o.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Query
// =============================================================================

/// A listing request as it leaves the client.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub generation: u64,
    pub page: u32,
    pub per_page: u32,
    pub sort: SortOption,
    pub search: Option<String>,
    pub filters: FilterSet,
}

impl ListingQuery {
    /// Query parameters in a stable order. Unset filters are omitted.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("limit", self.per_page.to_string()),
            ("sort", self.sort.as_str().to_string()),
        ];
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        if !self.filters.cuisines.is_empty() {
            params.push(("cuisines", self.filters.cuisines.join(",")));
        }
        if let Some(rating) = self.filters.min_rating {
            params.push(("minRating", format!("{:.1}", rating)));
        }
        if let Some(open) = self.filters.is_open {
            params.push(("isOpen", open.to_string()));
        }
        params
    }
}

/// Result of applying a response to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Response belongs to a superseded query and was ignored.
    Stale,
    /// Response was applied.
    Applied,
    /// The current page no longer exists; it was clamped to `page` and the
    /// caller should fetch again.
    PageClamped { page: u32 },
}

impl Reconciliation {
    pub fn needs_refetch(&self) -> bool {
        matches!(self, Reconciliation::PageClamped { .. })
    }
}

// =============================================================================
// Listing State
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ListingState {
    filters: FilterSet,
    search: String,
    sort: SortOption,
    page: u32,
    per_page: u32,
    meta: Option<PageMeta>,
    generation: u64,
}

impl Default for ListingState {
    fn default() -> Self {
        ListingState {
            filters: FilterSet::default(),
            search: String::new(),
            sort: SortOption::default(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            meta: None,
            generation: 0,
        }
    }
}

impl ListingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a configured page size instead of the default.
    pub fn with_per_page(per_page: u32) -> CoreResult<Self> {
        check_per_page(per_page)?;
        Ok(ListingState {
            per_page,
            ..Self::default()
        })
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> SortOption {
        self.sort
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Pagination block of the last applied response.
    pub fn meta(&self) -> Option<&PageMeta> {
        self.meta.as_ref()
    }

    pub fn total_pages(&self) -> u32 {
        self.meta.map(|m| m.total_pages).unwrap_or(0)
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// Applies `change` to the query-shaping fields. When they actually
    /// changed the page goes back to 1; otherwise nothing happens.
    fn transition(&mut self, change: impl FnOnce(&mut Self)) -> bool {
        let before = (
            self.filters.clone(),
            self.search.clone(),
            self.sort,
            self.per_page,
        );
        change(self);
        let changed = before.0 != self.filters
            || before.1 != self.search
            || before.2 != self.sort
            || before.3 != self.per_page;
        if changed {
            self.page = 1;
        }
        changed
    }

    pub fn replace_filters(&mut self, filters: FilterSet) -> CoreResult<bool> {
        let filters = filters.normalized()?;
        Ok(self.transition(|s| s.filters = filters))
    }

    /// Adds the cuisine if absent, removes it if present.
    pub fn toggle_cuisine(&mut self, cuisine_id: &str) -> bool {
        let id = cuisine_id.trim().to_string();
        if id.is_empty() {
            return false;
        }
        self.transition(|s| {
            if let Some(pos) = s.filters.cuisines.iter().position(|c| *c == id) {
                s.filters.cuisines.remove(pos);
            } else {
                s.filters.cuisines.push(id);
            }
        })
    }

    pub fn set_min_rating(&mut self, min_rating: Option<f32>) -> CoreResult<bool> {
        if let Some(rating) = min_rating {
            check_rating_option(rating)?;
        }
        Ok(self.transition(|s| s.filters.min_rating = min_rating))
    }

    pub fn set_availability(&mut self, is_open: Option<bool>) -> bool {
        self.transition(|s| s.filters.is_open = is_open)
    }

    /// Sets the name search. Surrounding whitespace is ignored.
    pub fn set_search(&mut self, query: &str) -> CoreResult<bool> {
        let query = validate_search_query(query)?;
        Ok(self.transition(|s| s.search = query))
    }

    pub fn set_sort(&mut self, sort: SortOption) -> bool {
        self.transition(|s| s.sort = sort)
    }

    pub fn set_per_page(&mut self, per_page: u32) -> CoreResult<bool> {
        check_per_page(per_page)?;
        Ok(self.transition(|s| s.per_page = per_page))
    }

    /// Drops every filter and the search text. Sort and page size stay.
    pub fn clear_filters(&mut self) -> bool {
        self.transition(|s| {
            s.filters = FilterSet::default();
            s.search.clear();
        })
    }

    /// Moves to page `n`, clamped into `[1, total_pages]`.
    ///
    /// Before the first response arrives the upper bound is unknown and
    /// only the lower bound applies.
    pub fn go_to_page(&mut self, n: u32) -> bool {
        let upper = match self.meta {
            Some(meta) => meta.total_pages.max(1),
            None => u32::MAX,
        };
        let target = n.clamp(1, upper);
        let changed = target != self.page;
        self.page = target;
        changed
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> bool {
        self.go_to_page(self.page.saturating_sub(1))
    }

    // -------------------------------------------------------------------------
    // Query / Reconciliation
    // -------------------------------------------------------------------------

    /// Issues a query for the current state under a fresh generation.
    pub fn issue(&mut self) -> ListingQuery {
        self.generation += 1;
        ListingQuery {
            generation: self.generation,
            page: self.page,
            per_page: self.per_page,
            sort: self.sort,
            search: if self.search.is_empty() {
                None
            } else {
                Some(self.search.clone())
            },
            filters: self.filters.clone(),
        }
    }

    /// Generation of the most recently issued query.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Applies a response's pagination block.
    pub fn reconcile(&mut self, generation: u64, meta: PageMeta) -> Reconciliation {
        if generation != self.generation {
            return Reconciliation::Stale;
        }
        self.meta = Some(meta);

        let last_page = meta.total_pages.max(1);
        if self.page > last_page {
            self.page = last_page;
            return Reconciliation::PageClamped { page: last_page };
        }
        Reconciliation::Applied
    }

    // -------------------------------------------------------------------------
    // Derived values
    // -------------------------------------------------------------------------

    pub fn active_filter_count(&self) -> usize {
        self.filters.active_count()
    }

    /// True when any filter or a search is narrowing the list.
    pub fn has_active_filters(&self) -> bool {
        self.active_filter_count() > 0 || !self.search.is_empty()
    }

    /// 1-based indices of the first and last item on the current page.
    pub fn result_range(&self) -> Option<(u64, u64)> {
        let meta = self.meta?;
        result_range(self.page, self.per_page, meta.total_items)
    }

    pub fn page_window(&self) -> Vec<PageSlot> {
        page_window(self.page, self.total_pages())
    }
}

fn check_per_page(per_page: u32) -> CoreResult<()> {
    if PER_PAGE_OPTIONS.contains(&per_page) {
        Ok(())
    } else {
        Err(CoreError::UnsupportedPageSize {
            requested: per_page,
            allowed: PER_PAGE_OPTIONS.to_vec(),
        })
    }
}

// =============================================================================
// Pager Helpers
// =============================================================================

/// One slot of the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSlot::Page(n) => write!(f, "{}", n),
            PageSlot::Ellipsis => f.write_str("…"),
        }
    }
}

/// Visible page numbers around `current`.
///
/// ```text
/// total ≤ 1            (nothing)
/// total ≤ 5            1 2 3 4 5
/// current ≤ 3          1 2 3 4 … N
/// current ≥ N - 2      1 … N-3 N-2 N-1 N
/// otherwise            1 … c-1 c c+1 … N
/// ```
pub fn page_window(current: u32, total: u32) -> Vec<PageSlot> {
    use PageSlot::{Ellipsis, Page};

    if total <= 1 {
        return Vec::new();
    }
    if total <= 5 {
        return (1..=total).map(Page).collect();
    }

    let current = current.clamp(1, total);
    if current <= 3 {
        vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(total)]
    } else if current >= total - 2 {
        vec![
            Page(1),
            Ellipsis,
            Page(total - 3),
            Page(total - 2),
            Page(total - 1),
            Page(total),
        ]
    } else {
        vec![
            Page(1),
            Ellipsis,
            Page(current - 1),
            Page(current),
            Page(current + 1),
            Ellipsis,
            Page(total),
        ]
    }
}

/// "Showing 10-18 of 43": 1-based first and last index on `page`.
pub fn result_range(page: u32, per_page: u32, total_items: u64) -> Option<(u64, u64)> {
    if total_items == 0 || page == 0 || per_page == 0 {
        return None;
    }
    let start = u64::from(page - 1) * u64::from(per_page) + 1;
    if start > total_items {
        return None;
    }
    let end = (u64::from(page) * u64::from(per_page)).min(total_items);
    Some((start, end))
}

// =============================================================================
// Unit Tests
// =============================================================================
