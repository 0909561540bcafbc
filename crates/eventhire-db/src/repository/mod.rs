//! # Repository Module
//!
//! Database repository implementations for Eventhire.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Checkout pipeline                                                     │
//! │       │                                                                 │
//! │       │  db.orders().next_order_number()                               │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  OrderRepository                                                       │
//! │  ├── next_order_number(&self)                                          │
//! │  ├── insert_order(&self, order)                                        │
//! │  ├── insert_items(&self, items)                                        │
//! │  └── get_hydrated(&self, id)                                           │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog CRUD and storefront listing
//! - [`order::OrderRepository`] - Order headers, line items, order numbers
//! - [`shipping_zone::ShippingZoneRepository`] - Region cost lookup

pub mod order;
pub mod product;
pub mod shipping_zone;
