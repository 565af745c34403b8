//! # Restaurant Listing Controller
//!
//! Drives a [`ListingState`] against the backend listing endpoint.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  user control ──► ListingState transition ──► changed? ──no──► done     │
//! │                                                   │ yes                 │
//! │                                                   ▼                     │
//! │                  issue() ──► ListingQuery{generation} ──► catalog       │
//! │                                                   │                     │
//! │                                                   ▼                     │
//! │                  reconcile(generation, meta)                            │
//! │                     ├── Stale        → response dropped                 │
//! │                     ├── Applied      → results replaced                 │
//! │                     └── PageClamped  → fetch once more                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The catalog sits behind [`RestaurantCatalog`] so the controller can be
//! driven without a server.

use async_trait::async_trait;
use tavola_core::{
    Cuisine, FilterSet, ListingQuery, ListingState, Page, Reconciliation, Restaurant, SortOption,
};
use tracing::{debug, instrument};

use crate::error::ClientResult;
use crate::http::ApiClient;

/// Source of restaurant listings.
#[async_trait]
pub trait RestaurantCatalog: Send + Sync {
    async fn fetch_page(&self, query: &ListingQuery) -> ClientResult<Page<Restaurant>>;

    async fn fetch_cuisines(&self) -> ClientResult<Vec<Cuisine>>;
}

#[async_trait]
impl RestaurantCatalog for ApiClient {
    async fn fetch_page(&self, query: &ListingQuery) -> ClientResult<Page<Restaurant>> {
        self.list_restaurants(query).await
    }

    async fn fetch_cuisines(&self) -> ClientResult<Vec<Cuisine>> {
        self.all_cuisines().await
    }
}

pub struct ListingController<C: RestaurantCatalog> {
    catalog: C,
    state: ListingState,
    restaurants: Vec<Restaurant>,
    cuisines: Vec<Cuisine>,
}

impl<C: RestaurantCatalog> ListingController<C> {
    pub fn new(catalog: C) -> Self {
        Self::with_state(catalog, ListingState::new())
    }

    pub fn with_state(catalog: C, state: ListingState) -> Self {
        ListingController {
            catalog,
            state,
            restaurants: Vec::new(),
            cuisines: Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    pub fn cuisines(&self) -> &[Cuisine] {
        &self.cuisines
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    // -------------------------------------------------------------------------
    // Fetching
    // -------------------------------------------------------------------------

    /// Issues a query for the current state without sending it.
    ///
    /// For front ends that run fetches themselves and hand the responses
    /// back through [`apply`](Self::apply), possibly out of order.
    pub fn begin(&mut self) -> ListingQuery {
        self.state.issue()
    }

    /// Applies a response to the query issued under `generation`.
    pub fn apply(&mut self, generation: u64, page: Page<Restaurant>) -> Reconciliation {
        let outcome = self.state.reconcile(generation, page.pagination);
        match outcome {
            Reconciliation::Stale => {
                debug!(
                    generation,
                    current = self.state.generation(),
                    "Dropping stale listing response"
                );
            }
            Reconciliation::Applied | Reconciliation::PageClamped { .. } => {
                self.restaurants = page.data;
            }
        }
        outcome
    }

    /// Fetches the current page. When the backend reports that the page no
    /// longer exists, fetches the clamped page once more.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> ClientResult<Reconciliation> {
        let query = self.begin();
        let page = self.catalog.fetch_page(&query).await?;
        let outcome = self.apply(query.generation, page);

        if let Reconciliation::PageClamped { page } = outcome {
            debug!(page, "Requested page past the end, refetching");
            let query = self.begin();
            let response = self.catalog.fetch_page(&query).await?;
            return Ok(self.apply(query.generation, response));
        }
        Ok(outcome)
    }

    /// Loads the cuisine catalogue used by the cuisine filter.
    pub async fn load_cuisines(&mut self) -> ClientResult<&[Cuisine]> {
        self.cuisines = self.catalog.fetch_cuisines().await?;
        Ok(&self.cuisines)
    }

    async fn refresh_if(&mut self, changed: bool) -> ClientResult<bool> {
        if changed {
            self.refresh().await?;
        }
        Ok(changed)
    }

    // -------------------------------------------------------------------------
    // Controls
    // -------------------------------------------------------------------------
    //
    // Each returns whether the query changed; unchanged queries are not sent.

    pub async fn replace_filters(&mut self, filters: FilterSet) -> ClientResult<bool> {
        let changed = self.state.replace_filters(filters)?;
        self.refresh_if(changed).await
    }

    pub async fn toggle_cuisine(&mut self, cuisine_id: &str) -> ClientResult<bool> {
        let changed = self.state.toggle_cuisine(cuisine_id);
        self.refresh_if(changed).await
    }

    pub async fn set_min_rating(&mut self, min_rating: Option<f32>) -> ClientResult<bool> {
        let changed = self.state.set_min_rating(min_rating)?;
        self.refresh_if(changed).await
    }

    pub async fn set_availability(&mut self, is_open: Option<bool>) -> ClientResult<bool> {
        let changed = self.state.set_availability(is_open);
        self.refresh_if(changed).await
    }

    pub async fn set_search(&mut self, query: &str) -> ClientResult<bool> {
        let changed = self.state.set_search(query)?;
        self.refresh_if(changed).await
    }

    pub async fn set_sort(&mut self, sort: SortOption) -> ClientResult<bool> {
        let changed = self.state.set_sort(sort);
        self.refresh_if(changed).await
    }

    pub async fn set_per_page(&mut self, per_page: u32) -> ClientResult<bool> {
        let changed = self.state.set_per_page(per_page)?;
        self.refresh_if(changed).await
    }

    pub async fn clear_filters(&mut self) -> ClientResult<bool> {
        let changed = self.state.clear_filters();
        self.refresh_if(changed).await
    }

    pub async fn go_to_page(&mut self, n: u32) -> ClientResult<bool> {
        let changed = self.state.go_to_page(n);
        self.refresh_if(changed).await
    }

    pub async fn next_page(&mut self) -> ClientResult<bool> {
        let changed = self.state.next_page();
        self.refresh_if(changed).await
    }

    pub async fn prev_page(&mut self) -> ClientResult<bool> {
        let changed = self.state.prev_page();
        self.refresh_if(changed).await
    }
}
