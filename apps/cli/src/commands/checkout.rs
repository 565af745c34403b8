//! `tavola checkout`

use tavola_client::{place_order, OrderConfirmation};
use tavola_core::PaymentMethod;

use crate::error::{CliError, CliResult};
use crate::render::{Render, Rendered};
use crate::App;

impl Render for OrderConfirmation {
    fn render(&self) -> String {
        let mut out = format!("Order placed! {} ({})\n", self.display_id, self.status);
        for line in &self.lines {
            out.push_str(&format!(
                "  {} x {:<28} {:>10}\n",
                line.quantity,
                line.name,
                line.line_total()
            ));
        }
        out.push_str(&format!(
            "Total {} paid by {}",
            self.total,
            self.payment_method.label()
        ));

        if !self.customer_name.is_empty() {
            out.push_str(&format!("\n\nDeliver to {}", self.customer_name));
        }
        if let Some(address) = &self.delivery_address {
            out.push_str(&format!("\n{}", address));
        }
        if let Some(phone) = &self.phone_number {
            out.push_str(&format!("\n{}", phone));
        }
        out
    }
}

/// Orders the cart. The stored cart is emptied only when the backend
/// accepts the order.
pub async fn checkout(app: &App, payment: PaymentMethod) -> CliResult<Rendered> {
    let session = app.session.session();
    let confirmation = app
        .cart
        .update_async(|mut cart| async move {
            let confirmation = place_order(session, &mut cart, payment)
                .await
                .map_err(CliError::from)?;
            Ok::<_, CliError>((confirmation, cart))
        })
        .await?;

    Rendered::view(&confirmation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tavola_core::{Money, OrderStatus};

    #[test]
    fn test_confirmation_render() {
        let confirmation = OrderConfirmation {
            order_id: "a1b2c3d4-e5f6".into(),
            display_id: "ORD-A1B2C3D4".into(),
            status: OrderStatus::Pending,
            customer_name: "Ana".into(),
            delivery_address: Some("1 Main St".into()),
            phone_number: None,
            total: Money::from_cents(3100),
            payment_method: PaymentMethod::CashOnDelivery,
            lines: Vec::new(),
        };

        let text = confirmation.render();

        assert!(text.starts_with("Order placed! ORD-A1B2C3D4"));
        assert!(text.contains("Total $31.00 paid by Cash on Delivery"));
        assert!(text.ends_with("Deliver to Ana\n1 Main St"));
    }
}
