//! Restaurant discovery: listing, details, menus and cuisines.

use serde::Deserialize;
use tavola_core::{Cuisine, ListingQuery, MenuItem, Page, PageMeta, Restaurant};
use tracing::debug;

use super::{Envelope, ListEnvelope};
use crate::error::ClientResult;
use crate::http::ApiClient;

const FETCH_RESTAURANTS_ERROR: &str = "Failed to fetch restaurants";
const FETCH_RESTAURANT_DETAILS_ERROR: &str = "Failed to fetch restaurant details and menu";
const SEARCH_RESTAURANTS_ERROR: &str = "Failed to search restaurants";
const FETCH_MENU_ERROR: &str = "Failed to fetch menu";
const FETCH_CUISINES_ERROR: &str = "Failed to fetch cuisines";
const FETCH_ALL_CUISINES_ERROR: &str = "Failed to fetch all cuisines";

/// Listing body: `{data, pagination}`, or a bare array from backends that
/// ignore paging.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListingBody {
    Paged(Page<Restaurant>),
    Bare(Vec<Restaurant>),
}

impl ApiClient {
    /// `GET /api/restaurants` with the listing query's parameters.
    pub async fn list_restaurants(&self, query: &ListingQuery) -> ClientResult<Page<Restaurant>> {
        let params = query.params();
        let body: ListingBody = self
            .get_json(&["api", "restaurants"], &params, None, FETCH_RESTAURANTS_ERROR)
            .await?;

        Ok(match body {
            ListingBody::Paged(page) => page,
            ListingBody::Bare(data) => {
                debug!(count = data.len(), "Listing returned without pagination");
                Page {
                    pagination: PageMeta::single_page(data.len()),
                    data,
                }
            }
        })
    }

    /// `GET /api/restaurants/{id}`. Embedded menu items are scoped to the
    /// restaurant.
    pub async fn get_restaurant(&self, id: &str) -> ClientResult<Restaurant> {
        let path = ["api", "restaurants", id];
        let body: Envelope<Restaurant> = self
            .get_json(&path, &[], None, FETCH_RESTAURANT_DETAILS_ERROR)
            .await?;

        let mut restaurant = body.into_inner();
        let scope = restaurant.id.clone();
        restaurant.menu = std::mem::take(&mut restaurant.menu)
            .into_iter()
            .map(|item| item.with_restaurant(&scope))
            .collect();
        Ok(restaurant)
    }

    /// `GET /api/restaurants/{id}/menu`
    pub async fn restaurant_menu(&self, restaurant_id: &str) -> ClientResult<Vec<MenuItem>> {
        let path = ["api", "restaurants", restaurant_id, "menu"];
        let body: ListEnvelope<MenuItem> =
            self.get_json(&path, &[], None, FETCH_MENU_ERROR).await?;

        Ok(body
            .into_vec()
            .into_iter()
            .map(|item| item.with_restaurant(restaurant_id))
            .collect())
    }

    /// `GET /api/restaurants/{id}/cuisines`
    pub async fn restaurant_cuisines(&self, restaurant_id: &str) -> ClientResult<Vec<Cuisine>> {
        let path = ["api", "restaurants", restaurant_id, "cuisines"];
        let body: ListEnvelope<Cuisine> = self
            .get_json(&path, &[], None, FETCH_CUISINES_ERROR)
            .await?;
        Ok(body.into_vec())
    }

    /// `GET /api/cuisines`
    pub async fn all_cuisines(&self) -> ClientResult<Vec<Cuisine>> {
        let body: ListEnvelope<Cuisine> = self
            .get_json(&["api", "cuisines"], &[], None, FETCH_ALL_CUISINES_ERROR)
            .await?;
        Ok(body.into_vec())
    }

    /// `GET /api/restaurants/search?q=`
    pub async fn search_restaurants(&self, query: &str) -> ClientResult<Vec<Restaurant>> {
        let params = [("q", query.to_string())];
        let body: ListEnvelope<Restaurant> = self
            .get_json(
                &["api", "restaurants", "search"],
                &params,
                None,
                SEARCH_RESTAURANTS_ERROR,
            )
            .await?;
        Ok(body.into_vec())
    }
}
