//! End-to-end client behaviour against an in-process fake backend.

mod common;

use common::{issue_token, Backend, ORDER_ID};
use serde_json::json;
use tavola_client::{
    place_order, AuthSession, ClientError, ListingController, OrderBook, RestaurantCatalog,
};
use tavola_core::{
    AddOutcome, Cart, CoreError, Money, OrderStatus, PaymentMethod, Reconciliation,
    SignupRequest, SortOption,
};

async fn logged_in(backend: &Backend) -> AuthSession {
    let session = AuthSession::new(backend.client());
    session.login("ana@example.com", "secret1").await.unwrap();
    session
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
async fn test_login_installs_session() {
    let backend = Backend::spawn().await;
    let session = AuthSession::new(backend.client());

    let user = session.login("ana@example.com", "secret1").await.unwrap();

    assert_eq!(user.name, "Ana");
    assert_eq!(user.address.as_deref(), Some("1 Main St"));
    assert!(session.is_authenticated().await);
    assert!(session.expires_at().await.is_some());
}

#[tokio::test]
async fn test_login_failure_surfaces_backend_message() {
    let backend = Backend::spawn().await;
    let session = AuthSession::new(backend.client());

    let err = session.login("ana@example.com", "nope").await.unwrap_err();

    assert_eq!(err.to_string(), "Invalid email or password");
    assert!(err.is_auth_failure());
    assert!(!session.is_authenticated().await);
}

#[tokio::test]
async fn test_signup_failure_falls_back_to_default_message() {
    let backend = Backend::spawn().await;
    let session = AuthSession::new(backend.client());

    let err = session
        .signup(SignupRequest {
            name: "Taken".into(),
            email: "taken@example.com".into(),
            password: "secret1".into(),
            phone_number: "+1 555 0101".into(),
            address: "3 Side St".into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Api { status: 400, .. }));
    assert_eq!(err.to_string(), "Signup failed. Please try again.");
}

#[tokio::test]
async fn test_signup_without_user_reads_claims() {
    let backend = Backend::spawn().await;
    let session = AuthSession::new(backend.client());

    let user = session
        .signup(SignupRequest {
            name: "Bo".into(),
            email: "bo@example.com".into(),
            password: "secret1".into(),
            phone_number: "+1 555 0102".into(),
            address: "4 Side St".into(),
        })
        .await
        .unwrap();

    assert_eq!(user.id, "u-2");
    assert_eq!(user.email, "bo@example.com");
}

#[tokio::test]
async fn test_refresh_profile() {
    let backend = Backend::spawn().await;
    let session = AuthSession::new(backend.client());
    let token = issue_token(json!(1), "Ana", "ana@example.com", 600);
    session.restore(&token).await.unwrap();
    assert!(session.user().await.unwrap().address.is_none());

    let profile = session.refresh_profile().await.unwrap();

    assert_eq!(profile.phone_number.as_deref(), Some("+1 555 0100"));
    assert_eq!(
        session.user().await.unwrap().address.as_deref(),
        Some("1 Main St")
    );
}

// =============================================================================
// Restaurants
// =============================================================================

#[tokio::test]
async fn test_listing_sends_filters_as_query_params() {
    let backend = Backend::spawn().await;
    let mut controller = ListingController::new(backend.client());

    controller.refresh().await.unwrap();
    controller.toggle_cuisine("1").await.unwrap();
    controller.set_min_rating(Some(4.0)).await.unwrap();
    controller.set_sort(SortOption::RatingDesc).await.unwrap();

    let recorded = backend.recorded();
    let last = recorded.listing_queries.last().unwrap();
    assert_eq!(recorded.listing_queries.len(), 4);
    assert_eq!(last["page"], "1");
    assert_eq!(last["limit"], "9");
    assert_eq!(last["sort"], "rating-desc");
    assert_eq!(last["cuisines"], "1");
    assert_eq!(last["minRating"], "4.0");
    assert!(!last.contains_key("isOpen"));
    assert!(!last.contains_key("search"));
}

#[tokio::test]
async fn test_listing_paginates_and_clamps() {
    let backend = Backend::spawn().await;
    let mut controller = ListingController::new(backend.client());
    controller.refresh().await.unwrap();
    assert_eq!(controller.restaurants().len(), 9);
    assert_eq!(controller.state().total_pages(), 3);

    controller.go_to_page(3).await.unwrap();
    assert_eq!(controller.restaurants().len(), 2);
    assert_eq!(controller.state().result_range(), Some((19, 20)));

    // 20 items at 6 per page leaves four pages, page 1 after the change
    controller.set_per_page(6).await.unwrap();
    assert_eq!(controller.state().page(), 1);
    assert_eq!(controller.state().total_pages(), 4);
}

#[tokio::test]
async fn test_stale_listing_response_is_dropped() {
    let backend = Backend::spawn().await;
    let mut controller = ListingController::new(backend.client());

    let old = controller.begin();
    let current = controller.begin();
    let old_page = controller.catalog().fetch_page(&old).await.unwrap();

    assert_eq!(controller.apply(old.generation, old_page), Reconciliation::Stale);
    assert!(controller.restaurants().is_empty());

    let page = controller.catalog().fetch_page(&current).await.unwrap();
    assert_eq!(controller.apply(current.generation, page), Reconciliation::Applied);
}

#[tokio::test]
async fn test_restaurant_detail_scopes_menu_items() {
    let backend = Backend::spawn().await;
    let api = backend.client();

    let restaurant = api.get_restaurant("r7").await.unwrap();
    assert!(restaurant.is_open());
    assert_eq!(restaurant.cuisines[0].name, "Italian");
    assert_eq!(restaurant.menu[0].restaurant_id.as_deref(), Some("r7"));

    let menu = api.restaurant_menu("r7").await.unwrap();
    assert_eq!(menu[0].price, Money::from_cents(1250));
    assert_eq!(menu[1].price, Money::from_cents(600));

    let mut cart = Cart::new();
    assert_eq!(cart.add_item(&menu[0]).unwrap(), AddOutcome::Added);
    assert_eq!(cart.restaurant_id(), Some("r7"));
}

#[tokio::test]
async fn test_missing_restaurant_reports_backend_message() {
    let backend = Backend::spawn().await;

    let err = backend.client().get_restaurant("404").await.unwrap_err();

    assert!(matches!(err, ClientError::Api { status: 404, .. }));
    assert_eq!(err.to_string(), "Restaurant not found");
}

#[tokio::test]
async fn test_get_retries_server_errors() {
    let backend = Backend::spawn().await;

    let cuisines = backend.client().all_cuisines().await.unwrap();

    assert_eq!(cuisines.len(), 2);
    assert_eq!(backend.recorded().cuisine_calls, 2);
}

#[tokio::test]
async fn test_search_accepts_bare_array() {
    let backend = Backend::spawn().await;

    let hits = backend.client().search_restaurants("07").await.unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Place 07");
}

// =============================================================================
// Checkout and orders
// =============================================================================

#[tokio::test]
async fn test_place_order_posts_cart_and_clears_it() {
    let backend = Backend::spawn().await;
    let session = logged_in(&backend).await;
    let menu = session.api().restaurant_menu("r7").await.unwrap();

    let mut cart = Cart::new();
    cart.add_item(&menu[0]).unwrap();
    cart.add_item(&menu[0]).unwrap();
    cart.add_item(&menu[1]).unwrap();

    let confirmation = place_order(&session, &mut cart, PaymentMethod::Card)
        .await
        .unwrap();

    assert!(cart.is_empty());
    assert_eq!(confirmation.display_id, "ORD-A1B2C3D4");
    assert_eq!(confirmation.status, OrderStatus::Pending);
    assert_eq!(confirmation.customer_name, "Ana");
    assert_eq!(confirmation.delivery_address.as_deref(), Some("1 Main St"));
    assert_eq!(confirmation.total, Money::from_cents(3100));
    assert_eq!(confirmation.lines.len(), 2);

    let recorded = backend.recorded();
    let body = &recorded.orders[0];
    assert_eq!(body["restaurantId"], "r7");
    assert_eq!(body["paymentMethod"], "card");
    assert_eq!(body["totalAmount"], 31.0);
    assert_eq!(body["items"][0]["menuItemId"], "m1");
    assert_eq!(body["items"][0]["quantity"], 2);
    assert_eq!(body["items"][0]["price"], 12.5);
}

#[tokio::test]
async fn test_failed_order_post_is_sent_once() {
    let backend = Backend::spawn().await;
    let session = logged_in(&backend).await;
    let menu = session.api().restaurant_menu("r7").await.unwrap();
    let mut cart = Cart::new();
    cart.add_item(&menu[0]).unwrap();
    backend.recorded().fail_next_order = true;

    let err = place_order(&session, &mut cart, PaymentMethod::Card)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Api { status: 503, .. }));
    assert_eq!(err.to_string(), "Failed to create the order. Please try again.");
    assert_eq!(backend.recorded().orders.len(), 1);
    assert_eq!(cart.total_items(), 1);
}

#[tokio::test]
async fn test_place_order_requires_login_and_keeps_cart() {
    let backend = Backend::spawn().await;
    let session = AuthSession::new(backend.client());
    let menu = session.api().restaurant_menu("r7").await.unwrap();
    let mut cart = Cart::new();
    cart.add_item(&menu[0]).unwrap();

    let err = place_order(&session, &mut cart, PaymentMethod::Card)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Unauthenticated));
    assert_eq!(cart.total_items(), 1);
    assert!(backend.recorded().orders.is_empty());
}

#[tokio::test]
async fn test_place_order_rejects_empty_cart() {
    let backend = Backend::spawn().await;
    let session = logged_in(&backend).await;

    let err = place_order(&session, &mut Cart::new(), PaymentMethod::CashOnDelivery)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Core(CoreError::EmptyCart)));
}

#[tokio::test]
async fn test_order_history_and_rating() {
    let backend = Backend::spawn().await;
    let session = logged_in(&backend).await;
    let mut book = OrderBook::new();

    let orders = book.fetch_orders(&session).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, OrderStatus::Delivered);
    assert_eq!(orders[0].total_amount, Money::from_cents(3100));

    let detail = book.fetch_order_details(&session, ORDER_ID).await.unwrap();
    assert_eq!(detail.items.len(), 2);
    assert!(!detail.is_rated());

    let rating = book
        .submit_rating(&session, ORDER_ID, 5, Some("  Lovely  "))
        .await
        .unwrap();
    assert_eq!(rating.comment.as_deref(), Some("Lovely"));

    let selected = book.selected().unwrap();
    assert_eq!(selected.order_rating, Some(5));
    assert_eq!(selected.order_comment.as_deref(), Some("Lovely"));

    let recorded = backend.recorded();
    assert_eq!(recorded.ratings[0].0, ORDER_ID);
    assert_eq!(recorded.ratings[0].1["comment"], "Lovely");
}

#[tokio::test]
async fn test_rating_conflict_leaves_selection_untouched() {
    let backend = Backend::spawn().await;
    let session = logged_in(&backend).await;
    let mut book = OrderBook::new();
    book.fetch_order_details(&session, "locked").await.unwrap();

    let err = book
        .submit_rating(&session, "locked", 4, None)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Order already rated");
    assert!(book.selected().unwrap().order_rating.is_none());
}

#[tokio::test]
async fn test_order_id_travels_as_one_path_segment() {
    let backend = Backend::spawn().await;
    let session = logged_in(&backend).await;
    let token = session.token().await.unwrap();

    let detail = session
        .api()
        .order_detail(&token, "../auth/profile?x=1")
        .await
        .unwrap();

    assert_eq!(detail.id, "../auth/profile?x=1");
    assert_eq!(backend.recorded().order_detail_ids, vec!["../auth/profile?x=1"]);
}

#[tokio::test]
async fn test_dot_segment_id_is_rejected_before_sending() {
    let backend = Backend::spawn().await;
    let session = logged_in(&backend).await;
    let token = session.token().await.unwrap();

    let err = session.api().order_detail(&token, "..").await.unwrap_err();

    assert!(matches!(err, ClientError::Core(CoreError::Validation(_))));
    assert!(backend.recorded().order_detail_ids.is_empty());
}
