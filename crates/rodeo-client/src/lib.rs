//! # Rodeo Client
//!
//! HTTP collaborator for Rodeo Ledger: session handling, the shop API
//! repositories and the schema check between JSON rows and core types.
//!
//! ## Module Organization
//! ```text
//! rodeo_client/
//! ├── client.rs        # ClientConfig, ApiClient, status mapping
//! ├── session.rs       # AuthToken, TokenStore, Session
//! ├── wire.rs          # Raw JSON rows and their conversions
//! ├── error.rs         # ClientError
//! ├── repository/      # One repository per resource
//! │   ├── auth.rs
//! │   ├── inventory.rs
//! │   ├── sales.rs
//! │   ├── monthly.rs
//! │   └── memo.rs
//! └── testing.rs       # In-process mock API (tests, `test-support`)
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use rodeo_client::{ApiClient, ClientConfig, Session};
//!
//! let client = ApiClient::new(ClientConfig::new("http://localhost:5002")?, Session::in_memory())?;
//! client.auth().login("owner", "secret").await?;
//! let products = client.inventory().list().await?;
//! ```

pub mod client;
pub mod error;
pub mod repository;
pub mod session;
pub mod wire;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use client::{ApiClient, ClientConfig};
pub use error::{ClientError, ClientResult};
pub use session::{AuthToken, FileTokenStore, MemoryTokenStore, Session, TokenStore};
