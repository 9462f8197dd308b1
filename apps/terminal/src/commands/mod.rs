//! # Commands Module
//!
//! Everything the `rodeo` binary can do, as plain async functions.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── auth.rs       ◄─── login, logout
//! ├── inventory.rs  ◄─── Catalog refresh, filters, product edits
//! ├── sale.rs       ◄─── Composing and committing a transaction
//! ├── ledger.rs     ◄─── Daily ledger load, expand, delete
//! ├── monthly.rs    ◄─── Monthly report
//! └── memo.rs       ◄─── Dashboard memos
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs the client
//! async fn monthly_report(client: &ApiClient)
//!
//! // Needs the catalog snapshot too
//! async fn list_inventory(client: &ApiClient, catalog: &CatalogState, ...)
//!
//! // The whole counter
//! async fn commit_sale(client, catalog, draft, ledger, ...)
//! ```

pub mod auth;
pub mod inventory;
pub mod ledger;
pub mod memo;
pub mod monthly;
pub mod sale;
