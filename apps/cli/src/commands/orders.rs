//! Order history and ratings.

use serde::Serialize;
use tavola_client::OrderBook;
use tavola_core::format::{format_date, format_date_time, format_order_id};
use tavola_core::{OrderDetail, OrderSummary};

use crate::error::{CliError, CliResult, ErrorCode};
use crate::render::{Render, Rendered};
use crate::App;

#[derive(Debug, Serialize)]
pub struct OrderListView {
    pub orders: Vec<OrderSummary>,
}

impl Render for OrderListView {
    fn render(&self) -> String {
        if self.orders.is_empty() {
            return "No orders yet.".to_string();
        }
        self.orders
            .iter()
            .map(|o| {
                format!(
                    "{:<13} {:<18} {:<24} {:<10} {:>10}",
                    format_order_id(&o.id),
                    o.created_at.as_ref().map(format_date).unwrap_or_default(),
                    o.restaurant_name.as_deref().unwrap_or("-"),
                    o.status,
                    o.total_amount
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Serialize)]
pub struct OrderDetailView {
    pub display_id: String,
    pub order: OrderDetail,
}

impl OrderDetailView {
    pub fn new(order: OrderDetail) -> Self {
        OrderDetailView {
            display_id: format_order_id(&order.id),
            order,
        }
    }
}

impl Render for OrderDetailView {
    fn render(&self) -> String {
        let o = &self.order;
        let mut out = format!("Order {} ({})", self.display_id, o.status);
        if let Some(at) = &o.created_at {
            out.push_str(&format!("\nPlaced {}", format_date_time(at)));
        }
        if let Some(name) = &o.restaurant_name {
            out.push_str(&format!("\nFrom {}", name));
            if let Some(address) = &o.restaurant_address {
                out.push_str(&format!(", {}", address));
            }
        }

        out.push('\n');
        for line in &o.items {
            out.push_str(&format!(
                "\n  {} x {:<28} {:>10}",
                line.quantity,
                line.menu_item_name,
                line.line_total()
            ));
        }
        out.push_str(&format!("\n\nTotal {}", o.total_amount));
        if let Some(method) = &o.payment_method {
            out.push_str(&format!(" by {}", method));
        }
        if let Some(status) = &o.payment_status {
            out.push_str(&format!(" ({})", status));
        }

        match o.order_rating {
            Some(rating) => {
                out.push_str(&format!("\nRated {}/5", rating));
                if let Some(comment) = &o.order_comment {
                    out.push_str(&format!(": \"{}\"", comment));
                }
            }
            None => out.push_str("\nNot rated yet"),
        }
        out
    }
}

pub async fn list(app: &App) -> CliResult<Rendered> {
    let mut book = OrderBook::new();
    let orders = book.fetch_orders(app.session.session()).await?.to_vec();
    Rendered::view(&OrderListView { orders })
}

pub async fn show(app: &App, id: &str) -> CliResult<Rendered> {
    let mut book = OrderBook::new();
    let order = book
        .fetch_order_details(app.session.session(), id)
        .await?
        .clone();
    Rendered::view(&OrderDetailView::new(order))
}

/// Rates an order once. Orders that already carry a rating are refused
/// before anything is sent.
pub async fn rate(app: &App, id: &str, stars: u8, comment: Option<&str>) -> CliResult<Rendered> {
    let session = app.session.session();
    let mut book = OrderBook::new();

    if book.fetch_order_details(session, id).await?.is_rated() {
        return Err(CliError::new(
            ErrorCode::ValidationError,
            format!("Order {} is already rated", format_order_id(id)),
        ));
    }
    book.submit_rating(session, id, stars, comment).await?;

    match book.selected() {
        Some(order) => Rendered::view(&OrderDetailView::new(order.clone())),
        None => Err(CliError::not_found("Order", id)),
    }
}
