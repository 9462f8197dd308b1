//! # Rodeo Terminal
//!
//! Counter terminal for the Rodeo shop ledger: the `rodeo` command line on
//! top of `rodeo-core` (rules) and `rodeo-client` (shop API).
//!
//! ## Module Organization
//! ```text
//! rodeo_terminal/
//! ├── lib.rs          ◄─── Terminal setup & command dispatch
//! ├── cli.rs          ◄─── clap command tree
//! ├── render.rs       ◄─── Text output
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── config.rs   ◄─── AppConfig (toml + RODEO_* env)
//! │   ├── catalog.rs  ◄─── Product snapshot for composing
//! │   ├── draft.rs    ◄─── Transaction draft & busy flag
//! │   └── ledger.rs   ◄─── Ticketed ledger view
//! ├── commands/
//! │   ├── auth.rs     ◄─── login / logout
//! │   ├── inventory.rs◄─── Product list & edits
//! │   ├── sale.rs     ◄─── Compose & commit a transaction
//! │   ├── ledger.rs   ◄─── Daily ledger, expand, delete
//! │   ├── monthly.rs  ◄─── Monthly report
//! │   └── memo.rs     ◄─── Dashboard memos
//! └── error.rs        ◄─── ApiError for commands
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (stderr, so stdout stays clean for `--json`)
//! 2. Load configuration
//! 3. Open the stored session token
//! 4. Create state objects (Catalog, Draft, Ledger)
//! 5. Dispatch the command and print its output

pub mod cli;
pub mod commands;
pub mod error;
pub mod render;
pub mod state;

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use rodeo_client::{ApiClient, FileTokenStore, Session};
use rodeo_core::{Money, ProductInput};

use cli::{Command, InventoryCommand, MemoCommand, SalesCommand};
use commands::{auth, inventory, ledger, memo, monthly, sale};
use error::ApiError;
use state::{AppConfig, CatalogState, DraftState, LedgerState};

const LOGGED_IN: &str = "로그인되었습니다.";
const LOGGED_OUT: &str = "로그아웃되었습니다.";
const MEMO_ADDED: &str = "메모가 추가되었습니다.";
const MEMO_DELETED: &str = "메모가 삭제되었습니다.";

/// Sets up logging.
///
/// Default: `warn,rodeo=info`, overridden with `RUST_LOG`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,rodeo=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// One-line `{"message": ...}` result for JSON output.
#[derive(Serialize)]
struct Message<'a> {
    message: &'a str,
}

/// The configured terminal with its state objects.
pub struct Terminal {
    config: AppConfig,
    client: ApiClient,
    catalog: CatalogState,
    draft: DraftState,
    ledger: LedgerState,
}

impl Terminal {
    /// Builds the terminal from configuration, with the token kept on disk.
    pub fn from_config(config: AppConfig) -> Result<Self, ApiError> {
        let token_path = config.token_path();
        debug!(path = %token_path.display(), "Opening token store");
        let session = Session::new(Arc::new(FileTokenStore::new(token_path)));
        let client = ApiClient::new(config.client_config()?, session)?;
        Ok(Terminal::with_client(config, client))
    }

    pub fn with_client(config: AppConfig, client: ApiClient) -> Self {
        Terminal {
            config,
            client,
            catalog: CatalogState::new(),
            draft: DraftState::new(),
            ledger: LedgerState::new(),
        }
    }

    /// Runs one command and returns what to print.
    pub async fn execute(&self, cmd: Command, json: bool) -> Result<String, ApiError> {
        match cmd {
            Command::Login(args) => {
                auth::login(&self.client, &args.username, &args.password).await?;
                info!(username = %args.username, "Signed in");
                message(json, LOGGED_IN)
            }
            Command::Logout => {
                auth::logout(&self.client)?;
                message(json, LOGGED_OUT)
            }
            Command::Inventory(cmd) => self.inventory(cmd, json).await,
            Command::Sales(cmd) => self.sales(cmd, json).await,
            Command::Monthly => {
                let report = monthly::monthly_report(&self.client).await?;
                output(json, &report, |r| render::monthly(r, &self.config.store.name))
            }
            Command::Memo(cmd) => self.memo(cmd, json).await,
        }
    }

    async fn inventory(&self, cmd: InventoryCommand, json: bool) -> Result<String, ApiError> {
        match cmd {
            InventoryCommand::List(args) => {
                let products = inventory::list_inventory(
                    &self.client,
                    &self.catalog,
                    &args.filter(),
                    args.search.as_deref(),
                )
                .await?;
                output(json, &products, |p| render::products(p))
            }
            InventoryCommand::Add(args) => {
                let input: ProductInput = args.into();
                message(json, inventory::add_product(&self.client, &self.catalog, &input).await?)
            }
            InventoryCommand::Update(args) => {
                let done =
                    inventory::update_product(&self.client, &self.catalog, args.id, args.changes())
                        .await?;
                message(json, done)
            }
            InventoryCommand::Delete { id } => {
                message(json, inventory::delete_product(&self.client, &self.catalog, id).await?)
            }
            InventoryCommand::Categories => {
                inventory::refresh_catalog(&self.client, &self.catalog).await?;
                let categories = self.catalog.categories();
                output(json, &categories, |c| render::categories(c))
            }
        }
    }

    async fn sales(&self, cmd: SalesCommand, json: bool) -> Result<String, ApiError> {
        match cmd {
            SalesCommand::List(args) => {
                let date = args.date.unwrap_or_else(today);
                ledger::load_ledger(&self.client, &self.ledger, date).await?;
                for id in args.expand {
                    ledger::toggle_expand(&self.ledger, id)?;
                }
                let summary = ledger::ledger_summary(&self.ledger);
                output(json, &summary, render::ledger)
            }
            SalesCommand::Record(args) => {
                inventory::refresh_catalog(&self.client, &self.catalog).await?;
                sale::compose_items(&self.draft, &self.catalog, &args.items)?;
                sale::set_payment(
                    &self.draft,
                    args.payment,
                    args.card_company.as_deref(),
                    Money::from_won(args.total),
                );

                let now = Local::now();
                let receipt = sale::commit_sale(
                    &self.client,
                    &self.catalog,
                    &self.draft,
                    &self.ledger,
                    self.config.settlement.allocation,
                    args.date.unwrap_or_else(|| now.date_naive()),
                    now.time(),
                )
                .await?;
                output(json, &receipt, render::receipt)
            }
            SalesCommand::Delete(args) => {
                if args.yes {
                    let date = args.date.unwrap_or_else(today);
                    ledger::load_ledger(&self.client, &self.ledger, date).await?;
                }
                let done = ledger::delete_transaction(
                    &self.client,
                    &self.ledger,
                    self.draft.busy(),
                    args.id,
                    args.yes,
                )
                .await?;

                if json {
                    return message(json, done);
                }
                let summary = ledger::ledger_summary(&self.ledger);
                Ok(format!("{}\n{}", done, render::ledger(&summary)))
            }
        }
    }

    async fn memo(&self, cmd: MemoCommand, json: bool) -> Result<String, ApiError> {
        match cmd {
            MemoCommand::List => {
                let memos = memo::list_memos(&self.client).await?;
                output(json, &memos, |m| render::memos(m))
            }
            MemoCommand::Add { content } => {
                let created = memo::add_memo(&self.client, &content).await?;
                if json {
                    return output(json, &created, |_| String::new());
                }
                Ok(format!("{}\n{}", MEMO_ADDED, render::memos(&[created])))
            }
            MemoCommand::Delete { id } => {
                memo::delete_memo(&self.client, id).await?;
                message(json, MEMO_DELETED)
            }
        }
    }
}

/// Loads configuration and runs one command.
pub async fn run(cli: cli::Cli) -> Result<String, ApiError> {
    let config = AppConfig::load()?;
    let terminal = Terminal::from_config(config)?;
    terminal.execute(cli.cmd, cli.json).await
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn output<T, F>(json: bool, value: &T, text: F) -> Result<String, ApiError>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    if json {
        serde_json::to_string_pretty(value).map_err(|e| ApiError::internal(e.to_string()))
    } else {
        Ok(text(value))
    }
}

fn message(json: bool, message: &str) -> Result<String, ApiError> {
    output(json, &Message { message }, |m| format!("{}\n", m.message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::error::ErrorCode;
    use clap::Parser;
    use rodeo_client::testing::{MockApi, MockState, TEST_PASSWORD, TEST_USERNAME};
    use rodeo_client::Session;
    use rodeo_core::Product;

    async fn run_args(terminal: &Terminal, args: &[&str]) -> Result<String, ApiError> {
        let cli = Cli::try_parse_from(std::iter::once("rodeo").chain(args.iter().copied()))
            .unwrap();
        terminal.execute(cli.cmd, cli.json).await
    }

    async fn stocked() -> MockApi {
        MockApi::start_with(MockState::new().with_products(vec![
            Product::new(1, "Pod A", "코일팟", Money::from_won(12_000), 8),
            Product::new(2, "Mango", "입호흡액상", Money::from_won(20_000), 30),
        ]))
        .await
    }

    #[tokio::test]
    async fn test_login_then_list_inventory() {
        let mock = stocked().await;
        let terminal =
            Terminal::with_client(AppConfig::default(), mock.client(Session::in_memory()));

        let denied = run_args(&terminal, &["inventory", "list"]).await.unwrap_err();
        assert_eq!(denied.code, ErrorCode::AuthRequired);

        let out = run_args(
            &terminal,
            &["login", "--username", TEST_USERNAME, "--password", TEST_PASSWORD],
        )
        .await
        .unwrap();
        assert_eq!(out, "로그인되었습니다.\n");

        let out = run_args(&terminal, &["inventory", "list", "--low-stock"]).await.unwrap();
        assert!(out.contains("Pod A"));
        assert!(!out.contains("Mango"));
    }

    #[tokio::test]
    async fn test_record_sale_json_receipt() {
        let mock = stocked().await;
        let terminal = Terminal::with_client(AppConfig::default(), mock.signed_in_client());

        let out = run_args(
            &terminal,
            &[
                "--json",
                "sales",
                "record",
                "--item",
                "코일팟/Pod A:2",
                "--item",
                "입호흡액상/Mango",
                "--total",
                "40000",
                "--payment",
                "transfer",
                "--date",
                "2024-05-01",
            ],
        )
        .await
        .unwrap();

        let receipt: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(receipt["totalAmount"], 40_000);
        assert_eq!(receipt["itemCount"], 2);
        assert_eq!(receipt["totalQuantity"], 3);
        assert_eq!(receipt["payment"], "계좌이체");

        let posted = mock.posted_sales().await;
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].items_total(), Money::from_won(40_000));
    }

    #[tokio::test]
    async fn test_sales_list_after_record() {
        let mock = stocked().await;
        let terminal = Terminal::with_client(AppConfig::default(), mock.signed_in_client());
        run_args(
            &terminal,
            &["sales", "record", "--item", "코일팟/Pod A", "--total", "12000", "--date", "2024-05-01"],
        )
        .await
        .unwrap();

        let out = run_args(&terminal, &["sales", "list", "--date", "2024-05-01", "--expand", "1001"])
            .await
            .unwrap();

        assert!(out.starts_with("2024-05-01 판매 내역"));
        assert!(out.contains("Pod A (1개)"));
        assert!(out.contains("현금"));
        assert!(out.contains("└"));
        assert!(out.ends_with("합계: 12,000원\n"));
    }

    #[tokio::test]
    async fn test_delete_needs_yes() {
        let mock = stocked().await;
        let terminal = Terminal::with_client(AppConfig::default(), mock.signed_in_client());

        let err = run_args(&terminal, &["sales", "delete", "1"]).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ConfirmationRequired);
        assert!(mock.requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_memo_json() {
        let mock = MockApi::start().await;
        let terminal = Terminal::with_client(AppConfig::default(), mock.signed_in_client());

        let out = run_args(&terminal, &["memo", "add", "택배 도착"]).await.unwrap();
        assert!(out.starts_with(MEMO_ADDED));

        let out = run_args(&terminal, &["--json", "memo", "list"]).await.unwrap();
        let memos: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(memos[0]["content"], "택배 도착");
    }
}
