//! # Document Renderer
//!
//! Renders the fixed-layout quote/receipt document from a persisted order.
//!
//! [`render_document`] is a pure function of the hydrated order and the
//! supplied generation date: rendering the same order twice produces
//! byte-identical output. The grand total is redisplayed from the persisted
//! `total_amount` verbatim, never recomputed, so the document always
//! matches what was charged.
//!
//! [`DocumentService`] wraps the renderer with order loading and optional
//! PDF conversion, falling back to the HTML body when the conversion
//! collaborator is unavailable.

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, warn};

use crate::error::CheckoutResult;
use crate::pdf::PdfRenderer;
use eventhire_core::{Order, OrderItem};
use eventhire_db::{Database, OrderRepository};

/// Company banner shown at the top of every document.
const COMPANY_BANNER: &str = "Eventhire - Event Technology Rentals • hire@eventhire.example";

/// Regions line under the banner.
const COMPANY_REGIONS: &str = "USA • CANADA • UK • EUROPE";

/// Contact branch block.
const CONTACT_BRANCH: &[&str] = &[
    "Eventhire USA Inc,",
    "85 Horsehill Road, Cedar Knolls,",
    "NJ 07927, USA",
    "",
    "Tel: +1 602 555 0011",
    "E-Mail: hire@eventhire.example",
];

/// Notes shown when the order carries no message.
const DEFAULT_NOTES: &str = "Chargers and cables will be included with the order.";

/// Which document to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Quote,
    Receipt,
}

impl DocumentKind {
    /// The banner title ("QUOTE" / "RECEIPT").
    pub fn title(&self) -> &'static str {
        match self {
            DocumentKind::Quote => "QUOTE",
            DocumentKind::Receipt => "RECEIPT",
        }
    }

    fn file_stem(&self) -> &'static str {
        match self {
            DocumentKind::Quote => "quote",
            DocumentKind::Receipt => "receipt",
        }
    }
}

/// A finished document, ready to hand to the caller.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub filename: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

/// Escapes text interpolated into the document markup.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn date_or_tbd(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "TBD".to_string())
}

/// Renders the document HTML.
///
/// Pure: no I/O, deterministic for the same inputs. `generated_on` is the
/// only field that varies between renderings of the same order.
pub fn render_document(
    order: &Order,
    items: &[OrderItem],
    kind: DocumentKind,
    generated_on: NaiveDate,
) -> String {
    let title = kind.title();

    let mut rows = String::new();
    for item in items {
        let _ = write!(
            rows,
            r#"
              <tr>
                <td>{title}</td>
                <td>{quantity}</td>
                <td>{unit_price}</td>
                <td>{line_total}</td>
              </tr>"#,
            title = escape(&item.title),
            quantity = item.quantity,
            unit_price = item.unit_price(),
            line_total = item.line_total(),
        );
    }
    if items.is_empty() {
        rows.push_str(
            r#"
              <tr>
                <td colspan="4" style="text-align: center; font-style: italic;">No items found</td>
              </tr>"#,
        );
    }

    let mut branch = String::new();
    for line in CONTACT_BRANCH {
        if line.is_empty() {
            branch.push_str("              <br>\n");
        } else {
            let _ = writeln!(branch, r#"              <div class="detail-row">{line}</div>"#);
        }
    }

    let address_row = match &order.shipping_address {
        Some(address) => format!(
            r#"
              <div class="detail-row">
                <span class="detail-label">Address:</span>
                <span>{}</span>
              </div>"#,
            escape(address)
        ),
        None => String::new(),
    };

    let notes = match &order.message {
        Some(message) if !message.trim().is_empty() => escape(message),
        _ => DEFAULT_NOTES.to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <title>{title} - {order_number}</title>
  <style>
    * {{ margin: 0; padding: 0; box-sizing: border-box; }}
    body {{ font-family: Arial, sans-serif; font-size: 12px; line-height: 1.4; color: #000; background: #fff; }}
    .document {{ width: 100%; max-width: 800px; margin: 0 auto; background: white; }}
    .header {{ background: #1e90ff; color: white; text-align: center; padding: 15px; }}
    .company-title {{ font-size: 16px; font-weight: bold; margin-bottom: 5px; }}
    .regions {{ font-size: 12px; margin-bottom: 10px; }}
    .document-info {{ display: flex; justify-content: space-between; align-items: center; background: #1e90ff; color: white; padding: 10px 15px; font-weight: bold; }}
    .main-content {{ border: 2px solid #1e90ff; }}
    .details-grid {{ display: grid; grid-template-columns: 1fr 1fr; border-bottom: 1px solid #000; }}
    .details-section {{ border-right: 1px solid #000; padding: 10px; }}
    .details-section:last-child {{ border-right: none; }}
    .section-header {{ background: #f0f0f0; font-weight: bold; padding: 5px; border-bottom: 1px solid #000; margin: -10px -10px 10px -10px; }}
    .detail-row {{ margin-bottom: 5px; }}
    .detail-label {{ font-weight: bold; display: inline-block; width: 120px; }}
    .items-table {{ width: 100%; border-collapse: collapse; }}
    .items-table th {{ background: #1e90ff; color: white; padding: 10px; text-align: center; font-weight: bold; border: 1px solid #000; }}
    .items-table td {{ padding: 8px 10px; border: 1px solid #000; text-align: center; }}
    .items-table td:first-child {{ text-align: left; }}
    .items-table td:last-child {{ text-align: right; font-weight: bold; }}
    .total-row {{ background: #f0f0f0; font-weight: bold; }}
    .grand-total {{ background: #1e90ff; color: white; font-size: 14px; }}
    .footer-note {{ text-align: center; padding: 10px; font-style: italic; border-top: 1px solid #000; }}
    @media print {{ body {{ margin: 0; }} .document {{ max-width: none; }} }}
  </style>
</head>
<body>
  <div class="document">
    <div class="header">
      <div class="company-title">{company_banner}</div>
      <div class="regions">{company_regions}</div>
    </div>

    <div class="document-info">
      <span>{title}</span>
      <span>Generated on: {generated_on}</span>
    </div>

    <div class="main-content">
      <div class="details-grid">
        <div class="details-section">
          <div class="section-header">EVENT DETAILS</div>
          <div class="detail-row">
            <span class="detail-label">Rental Start Date:</span>
            <span>{start_date}</span>
          </div>
          <div class="detail-row">
            <span class="detail-label">Rental End Date:</span>
            <span>{end_date}</span>
          </div>
        </div>

        <div class="details-section">
          <div class="section-header">CONTACT BRANCH</div>
{branch}        </div>
      </div>

      <div class="details-grid">
        <div class="details-section">
          <div class="section-header">CUSTOMER DETAILS</div>
          <div class="detail-row">
            <span class="detail-label">Name:</span>
            <span>{customer_name}</span>
          </div>
          <div class="detail-row">
            <span class="detail-label">Company:</span>
            <span>{company_name}</span>
          </div>
          <div class="detail-row">
            <span class="detail-label">Email:</span>
            <span>{customer_email}</span>
          </div>
          <div class="detail-row">
            <span class="detail-label">Phone:</span>
            <span>{customer_phone}</span>
          </div>
          <div class="detail-row">
            <span class="detail-label">Event:</span>
            <span>{event_name}</span>
          </div>{address_row}
        </div>

        <div class="details-section">
          <div class="section-header">{title} NOTES</div>
          <div>{notes}</div>
        </div>
      </div>

      <table class="items-table">
        <thead>
          <tr>
            <th style="width: 50%;">Description</th>
            <th style="width: 15%;">Quantity</th>
            <th style="width: 15%;">Price</th>
            <th style="width: 20%;">Subtotal</th>
          </tr>
        </thead>
        <tbody>{rows}
          <tr class="total-row">
            <td colspan="3">Delivery &amp; Setup:</td>
            <td>{shipping_cost}</td>
          </tr>
          <tr class="total-row">
            <td colspan="3">Pickup &amp; Collection:</td>
            <td>{collection_cost}</td>
          </tr>
          <tr class="grand-total">
            <td colspan="3">Total Estimated Cost:</td>
            <td>{total_amount}</td>
          </tr>
        </tbody>
      </table>

      <div class="footer-note">
        *{footer_note}
      </div>
    </div>
  </div>
</body>
</html>
"#,
        title = title,
        order_number = escape(&order.order_number),
        company_banner = COMPANY_BANNER,
        company_regions = COMPANY_REGIONS,
        generated_on = generated_on,
        start_date = date_or_tbd(order.event_start_date),
        end_date = date_or_tbd(order.event_end_date),
        branch = branch,
        customer_name = escape(&order.customer_name),
        company_name = escape(&order.company_name),
        customer_email = escape(&order.customer_email),
        customer_phone = escape(&order.customer_phone),
        event_name = escape(&order.event_name),
        address_row = address_row,
        notes = notes,
        rows = rows,
        shipping_cost = order.shipping_cost(),
        collection_cost = order.collection_cost(),
        total_amount = order.total_amount(),
        footer_note = DEFAULT_NOTES,
    )
}

// =============================================================================
// Document Service
// =============================================================================

/// Loads orders and produces finished documents.
pub struct DocumentService {
    orders: OrderRepository,
    /// PDF conversion collaborator. `None` (or any conversion failure)
    /// falls back to the HTML body.
    pdf: Option<Arc<dyn PdfRenderer>>,
}

impl DocumentService {
    /// Creates a service over the given database and PDF renderer.
    pub fn new(db: &Database, pdf: Option<Arc<dyn PdfRenderer>>) -> Self {
        DocumentService {
            orders: db.orders(),
            pdf,
        }
    }

    /// Generates the document for a persisted order.
    ///
    /// Loads the hydrated order, renders the HTML, and attempts PDF
    /// conversion when a renderer is configured. Conversion failure is
    /// logged and degrades to HTML; it never fails the operation.
    pub async fn generate(
        &self,
        order_id: &str,
        kind: DocumentKind,
    ) -> CheckoutResult<RenderedDocument> {
        let (order, items) = self.orders.get_hydrated(order_id).await?;

        debug!(order_id = %order_id, order_number = %order.order_number, kind = ?kind, "Rendering document");

        let html = render_document(&order, &items, kind, Utc::now().date_naive());
        let stem = format!("{}_{}", kind.file_stem(), order.order_number);

        if let Some(renderer) = &self.pdf {
            match renderer.render_pdf(&html).await {
                Ok(bytes) => {
                    return Ok(RenderedDocument {
                        filename: format!("{stem}.pdf"),
                        content_type: "application/pdf",
                        body: bytes,
                    });
                }
                Err(e) => {
                    warn!(error = %e, "PDF conversion degraded to HTML");
                }
            }
        }

        Ok(RenderedDocument {
            filename: format!("{stem}.html"),
            content_type: "text/html",
            body: html.into_bytes(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
