//! # Repository Module
//!
//! One repository per API resource.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories over HTTP                               │
//! │                                                                         │
//! │  Command                                                                │
//! │       │                                                                 │
//! │       │  client.sales().list_by_date(date)                              │
//! │       ▼                                                                 │
//! │  SalesRepository                                                        │
//! │  ├── list_by_date(&self, date)   GET    /api/sales/date/{date}          │
//! │  ├── create(&self, payload)      POST   /api/sales                      │
//! │  └── delete(&self, id)           DELETE /api/sales/{id}                 │
//! │       │                                                                 │
//! │       │  ApiClient (bearer token, status mapping)                       │
//! │       ▼                                                                 │
//! │  Shop API                                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`AuthRepository`](auth::AuthRepository) - Login and logout
//! - [`InventoryRepository`](inventory::InventoryRepository) - Product list and edits
//! - [`SalesRepository`](sales::SalesRepository) - Committed transactions
//! - [`MonthlyRepository`](monthly::MonthlyRepository) - Monthly totals
//! - [`MemoRepository`](memo::MemoRepository) - Dashboard notes

pub mod auth;
pub mod inventory;
pub mod memo;
pub mod monthly;
pub mod sales;
