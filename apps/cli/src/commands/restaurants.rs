//! Restaurant browsing commands.
//!
//! `restaurants list` builds a [`ListingState`] from the flags, starting
//! from the configured page size and sort, and lets the
//! [`ListingController`] fetch it. The page is applied last so that the
//! filter transitions (which reset to page 1) cannot undo it.

use clap::Args;
use serde::Serialize;
use tavola_client::config::ListingSettings;
use tavola_client::ListingController;
use tavola_core::{Cuisine, FilterSet, ListingState, MenuItem, Restaurant, SortOption};

use crate::error::CliResult;
use crate::render::{stars, Render, Rendered};
use crate::App;

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// One of 6, 9, 12, 18, 24
    #[arg(long)]
    pub per_page: Option<u32>,

    /// name-asc, name-desc, rating-desc or rating-asc
    #[arg(long)]
    pub sort: Option<SortOption>,

    #[arg(long)]
    pub search: Option<String>,

    /// Cuisine id; repeat to match any of several
    #[arg(long = "cuisine")]
    pub cuisines: Vec<String>,

    /// One of 4.5, 4.0, 3.5, 3.0
    #[arg(long)]
    pub min_rating: Option<f32>,

    /// Open restaurants only
    #[arg(long, conflicts_with = "closed")]
    pub open: bool,

    /// Closed restaurants only
    #[arg(long)]
    pub closed: bool,
}

impl ListArgs {
    pub fn to_state(&self, settings: &ListingSettings) -> CliResult<ListingState> {
        let mut state = ListingState::with_per_page(self.per_page.unwrap_or(settings.per_page))?;
        state.set_sort(self.sort.unwrap_or(settings.sort));
        if let Some(query) = &self.search {
            state.set_search(query)?;
        }

        let is_open = match (self.open, self.closed) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        state.replace_filters(FilterSet {
            cuisines: self.cuisines.clone(),
            min_rating: self.min_rating,
            is_open,
        })?;

        state.go_to_page(self.page);
        Ok(state)
    }
}

// =============================================================================
// Views
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RestaurantRow {
    pub id: String,
    pub name: String,
    pub rating: Option<f32>,
    pub is_open: bool,
    pub cuisines: Vec<String>,
}

impl From<&Restaurant> for RestaurantRow {
    fn from(r: &Restaurant) -> Self {
        RestaurantRow {
            id: r.id.clone(),
            name: r.name.clone(),
            rating: r.rating,
            is_open: r.is_open(),
            cuisines: r.cuisines.iter().map(|c| c.name.clone()).collect(),
        }
    }
}

impl Render for RestaurantRow {
    fn render(&self) -> String {
        format!(
            "{:<10} {:<28} {:<6} {:<7} {}",
            self.id,
            self.name,
            stars(self.rating),
            if self.is_open { "open" } else { "closed" },
            self.cuisines.join(", ")
        )
    }
}

fn render_rows(rows: &[RestaurantRow]) -> String {
    rows.iter().map(Render::render).collect::<Vec<_>>().join("\n")
}

#[derive(Debug, Serialize)]
pub struct ListView {
    pub restaurants: Vec<RestaurantRow>,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    /// First and last 1-based index shown.
    pub range: Option<(u64, u64)>,
    pub pages: Vec<String>,
    pub sort: SortOption,
    pub active_filters: usize,
}

impl ListView {
    pub fn new(state: &ListingState, restaurants: &[Restaurant]) -> Self {
        ListView {
            restaurants: restaurants.iter().map(RestaurantRow::from).collect(),
            page: state.page(),
            per_page: state.per_page(),
            total_pages: state.total_pages(),
            total_items: state.meta().map(|m| m.total_items).unwrap_or(0),
            range: state.result_range(),
            pages: state.page_window().iter().map(ToString::to_string).collect(),
            sort: state.sort(),
            active_filters: state.active_filter_count(),
        }
    }
}

impl Render for ListView {
    fn render(&self) -> String {
        let Some((first, last)) = self.range else {
            return "No restaurants match.".to_string();
        };

        let mut out = format!(
            "Showing {}-{} of {} restaurants (sorted by {})\n\n",
            first,
            last,
            self.total_items,
            self.sort.label()
        );
        out.push_str(&render_rows(&self.restaurants));

        if !self.pages.is_empty() {
            let pager = self
                .pages
                .iter()
                .map(|p| {
                    if *p == self.page.to_string() {
                        format!("[{}]", p)
                    } else {
                        p.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            out.push_str(&format!("\n\nPage {}", pager));
        }
        out
    }
}

#[derive(Debug, Serialize)]
pub struct SearchView {
    pub query: String,
    pub restaurants: Vec<RestaurantRow>,
}

impl Render for SearchView {
    fn render(&self) -> String {
        if self.restaurants.is_empty() {
            return format!("No restaurants found for \"{}\".", self.query);
        }
        render_rows(&self.restaurants)
    }
}

#[derive(Debug, Serialize)]
pub struct MenuView {
    pub restaurant_id: String,
    pub items: Vec<MenuItem>,
}

impl Render for MenuView {
    fn render(&self) -> String {
        if self.items.is_empty() {
            return "No menu items.".to_string();
        }
        self.items
            .iter()
            .map(|item| {
                let mut line = format!("{:<10} {:<32} {:>9}", item.id, item.name, item.price);
                if let Some(description) = &item.description {
                    line.push_str(&format!("\n           {}", description));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Serialize)]
pub struct DetailView {
    pub restaurant: Restaurant,
}

impl Render for DetailView {
    fn render(&self) -> String {
        let r = &self.restaurant;
        let mut out = format!(
            "{} ({})  {}  {}",
            r.name,
            r.id,
            stars(r.rating),
            if r.is_open() { "Open now" } else { "Closed" }
        );
        if !r.cuisines.is_empty() {
            let names: Vec<&str> = r.cuisines.iter().map(|c| c.name.as_str()).collect();
            out.push_str(&format!("\n{}", names.join(", ")));
        }
        if let Some(address) = &r.address {
            out.push_str(&format!("\n{}", address));
        }
        if let Some(hours) = r.availability.as_ref().and_then(|a| a.hours.as_ref()) {
            out.push_str(&format!("\nHours: {}", hours));
        }
        if let Some(contact) = &r.contact {
            if let Some(phone) = &contact.phone {
                out.push_str(&format!("\nPhone: {}", phone));
            }
            if let Some(email) = &contact.email {
                out.push_str(&format!("\nEmail: {}", email));
            }
        }
        if let Some(description) = &r.description {
            out.push_str(&format!("\n\n{}", description));
        }

        let menu = MenuView {
            restaurant_id: r.id.clone(),
            items: r.menu.clone(),
        };
        out.push_str(&format!("\n\nMenu\n{}", menu.render()));
        out
    }
}

#[derive(Debug, Serialize)]
pub struct CuisinesView {
    pub cuisines: Vec<Cuisine>,
}

impl Render for CuisinesView {
    fn render(&self) -> String {
        self.cuisines
            .iter()
            .map(|c| format!("{:<10} {}", c.id, c.name))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// =============================================================================
// Commands
// =============================================================================

pub async fn list(app: &App, args: ListArgs) -> CliResult<Rendered> {
    let state = args.to_state(&app.config.config().listing)?;
    let mut controller = ListingController::with_state(app.api.clone(), state);
    controller.refresh().await?;

    Rendered::view(&ListView::new(controller.state(), controller.restaurants()))
}

/// Restaurant details. The menu comes from the menu endpoint when the
/// detail payload has none embedded.
pub async fn show(app: &App, id: &str) -> CliResult<Rendered> {
    let mut restaurant = app.api.get_restaurant(id).await?;
    if restaurant.menu.is_empty() {
        restaurant.menu = app.api.restaurant_menu(id).await?;
    }
    Rendered::view(&DetailView { restaurant })
}

pub async fn menu(app: &App, id: &str) -> CliResult<Rendered> {
    let items = app.api.restaurant_menu(id).await?;
    Rendered::view(&MenuView {
        restaurant_id: id.to_string(),
        items,
    })
}

pub async fn search(app: &App, query: &str) -> CliResult<Rendered> {
    let hits = app.api.search_restaurants(query).await?;
    Rendered::view(&SearchView {
        query: query.to_string(),
        restaurants: hits.iter().map(RestaurantRow::from).collect(),
    })
}

pub async fn cuisines(app: &App, restaurant: Option<&str>) -> CliResult<Rendered> {
    let cuisines = match restaurant {
        Some(id) => app.api.restaurant_cuisines(id).await?,
        None => app.api.all_cuisines().await?,
    };
    Rendered::view(&CuisinesView { cuisines })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tavola_core::PageMeta;

    fn args() -> ListArgs {
        ListArgs {
            page: 1,
            per_page: None,
            sort: None,
            search: None,
            cuisines: Vec::new(),
            min_rating: None,
            open: false,
            closed: false,
        }
    }

    #[test]
    fn test_args_start_from_configured_listing_settings() {
        let settings = ListingSettings {
            per_page: 12,
            sort: SortOption::RatingDesc,
        };

        let state = args().to_state(&settings).unwrap();

        assert_eq!(state.per_page(), 12);
        assert_eq!(state.sort(), SortOption::RatingDesc);
        assert!(!state.has_active_filters());
    }

    #[test]
    fn test_page_survives_filter_flags() {
        let mut args = args();
        args.page = 3;
        args.closed = true;
        args.cuisines = vec!["2".into()];
        args.min_rating = Some(4.0);

        let state = args.to_state(&ListingSettings::default()).unwrap();

        assert_eq!(state.page(), 3);
        assert_eq!(state.filters().is_open, Some(false));
        assert_eq!(state.active_filter_count(), 3);
    }

    #[test]
    fn test_unlisted_rating_is_rejected() {
        let mut args = args();
        args.min_rating = Some(2.0);

        assert!(args.to_state(&ListingSettings::default()).is_err());
    }

    #[test]
    fn test_list_view_marks_current_page() {
        let mut state = ListingState::new();
        state.go_to_page(2);
        let query = state.issue();
        state.reconcile(
            query.generation,
            PageMeta {
                current_page: 2,
                total_pages: 3,
                total_items: 20,
                items_per_page: 9,
            },
        );

        let view = ListView::new(&state, &[]);

        assert_eq!(view.range, Some((10, 18)));
        assert_eq!(view.pages, vec!["1", "2", "3"]);
        assert!(view.render().ends_with("Page 1 [2] 3"));
    }

    #[test]
    fn test_empty_list_view() {
        let view = ListView::new(&ListingState::new(), &[]);
        assert_eq!(view.render(), "No restaurants match.");
    }
}
