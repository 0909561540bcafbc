//! Order confirmation e-mail rendering.
//!
//! Pure string formatting over a persisted order, same contract as the
//! document renderer: deterministic, grand total taken from the persisted
//! figure verbatim. Actual delivery is outside this crate.

use std::fmt::Write as _;

use eventhire_core::{Order, OrderItem};

/// Which e-mail to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderEmailKind {
    /// Sent when the order is recorded.
    Confirmation,
    /// Sent after payment completes.
    ThankYou,
}

impl OrderEmailKind {
    fn title(&self) -> &'static str {
        match self {
            OrderEmailKind::Confirmation => "Order Confirmation",
            OrderEmailKind::ThankYou => "Thank You for Your Order!",
        }
    }
}

/// Renders the order e-mail HTML.
pub fn order_confirmation(order: &Order, items: &[OrderItem], kind: OrderEmailKind) -> String {
    let order_date = order.created_at.format("%B %d, %Y");

    let mut rows = String::new();
    for item in items {
        let _ = write!(
            rows,
            r#"
              <tr>
                <td style="padding: 8px 0;">{title}</td>
                <td style="padding: 8px 0; text-align: right;">{quantity}</td>
                <td style="padding: 8px 0; text-align: right;">{line_total}</td>
              </tr>"#,
            title = item.title,
            quantity = item.quantity,
            line_total = item.line_total(),
        );
    }

    format!(
        r#"<html>
<body style="font-family: Arial, sans-serif;">
  <div style="max-width: 600px; margin: 0 auto; padding: 20px; border: 1px solid #ddd;">
    <header style="text-align: center; padding: 10px 0;">
      <h1 style="margin: 0;">{title}</h1>
    </header>
    <section style="margin: 20px 0;">
      <p>Hi {customer_name},</p>
      <p>Thank you for your order placed on <strong>{order_date}</strong>.</p>
      <h3>Order Summary</h3>
      <table style="width: 100%; border-collapse: collapse;">
        <thead>
          <tr>
            <th style="border-bottom: 2px solid #000; text-align: left; padding: 8px 0;">Product</th>
            <th style="border-bottom: 2px solid #000; text-align: right; padding: 8px 0;">Quantity</th>
            <th style="border-bottom: 2px solid #000; text-align: right; padding: 8px 0;">Price</th>
          </tr>
        </thead>
        <tbody>{rows}
        </tbody>
      </table>
      <h3>Total: {total_amount}</h3>
    </section>
    <footer style="text-align: center; margin-top: 20px;">
      <p>For any questions, reach us at:
        <a href="mailto:hire@eventhire.example">hire@eventhire.example</a>
      </p>
    </footer>
  </div>
</body>
</html>
"#,
        title = kind.title(),
        customer_name = order.customer_name,
        order_date = order_date,
        rows = rows,
        total_amount = order.total_amount(),
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use eventhire_core::OrderStatus;

    fn order() -> Order {
        let created = Utc.with_ymd_and_hms(2026, 8, 4, 12, 0, 0).unwrap();
        Order {
            id: "o-1".to_string(),
            order_number: "20260804-0001".to_string(),
            customer_name: "Ada Lovelace".to_string(),
            customer_email: "ada@example.com".to_string(),
            customer_phone: "+1 602 555 0011".to_string(),
            company_name: "Analytical Events".to_string(),
            event_name: "Charity Gala".to_string(),
            event_start_date: None,
            event_end_date: None,
            postal_code: None,
            shipping_address: None,
            message: None,
            subtotal_cents: 11925,
            shipping_cost_cents: 4500,
            collection_cost_cents: 4500,
            total_amount_cents: 20925,
            status: OrderStatus::Pending,
            payment_session_ref: None,
            created_at: created,
            updated_at: created,
        }
    }

    fn item() -> OrderItem {
        OrderItem {
            id: "i-1".to_string(),
            order_id: "o-1".to_string(),
            product_id: "p1".to_string(),
            title: "iPad 10.2 7-inch WiFi".to_string(),
            unit_price_cents: 3975,
            quantity: 3,
            line_total_cents: 11925,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_confirmation_email_contents() {
        let html = order_confirmation(&order(), &[item()], OrderEmailKind::Confirmation);

        assert!(html.contains("Order Confirmation"));
        assert!(html.contains("Hi Ada Lovelace,"));
        assert!(html.contains("August 04, 2026"));
        assert!(html.contains("iPad 10.2 7-inch WiFi"));
        assert!(html.contains("$119.25"));
        assert!(html.contains("Total: $209.25"));
    }

    #[test]
    fn test_thank_you_title() {
        let html = order_confirmation(&order(), &[], OrderEmailKind::ThankYou);
        assert!(html.contains("Thank You for Your Order!"));
    }
}
