//! # Command Line
//!
//! ```text
//! rodeo [--json] <command>
//!
//!   login --username owner            password from RODEO_PASSWORD or --password
//!   logout
//!   inventory list [--category 코일팟 | --low-stock] [--search pod]
//!   inventory add --name .. --category .. --price 12000 --quantity 10
//!   inventory update <id> [--price ..] [--quantity ..]
//!   inventory delete <id>
//!   inventory categories
//!   sales list [--date 2024-05-01] [--expand <id>]...
//!   sales record --item 코일팟/Pod A:2 --total 24000 --payment card --card-company 삼성
//!   sales delete <id> [--date ..] --yes
//!   monthly
//!   memo list | memo add <content> | memo delete <id>
//! ```

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use rodeo_core::catalog::InventoryFilter;
use rodeo_core::validation::parse_sale_date;
use rodeo_core::{Money, PaymentMethod, ProductInput, ValidationError};

use crate::commands::inventory::ProductChanges;
use crate::commands::sale::ItemSpec;

#[derive(Debug, Parser)]
#[command(
    name = "rodeo",
    version,
    about = "Counter terminal for the Rodeo shop ledger."
)]
pub struct Cli {
    /// Print results as JSON instead of text.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and keep the session token.
    Login(LoginArgs),
    /// Forget the stored session token.
    Logout,
    /// Products and stock.
    #[command(subcommand)]
    Inventory(InventoryCommand),
    /// Daily sales ledger.
    #[command(subcommand)]
    Sales(SalesCommand),
    /// Monthly sales report.
    Monthly,
    /// Dashboard memos.
    #[command(subcommand)]
    Memo(MemoCommand),
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long, env = "RODEO_PASSWORD", hide_env_values = true)]
    pub password: String,
}

// =============================================================================
// Inventory
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum InventoryCommand {
    /// List products, optionally filtered.
    List(ListProductsArgs),
    /// Add a product.
    Add(ProductArgs),
    /// Change fields of a product.
    Update(UpdateProductArgs),
    /// Delete a product.
    Delete { id: i64 },
    /// Categories present in the catalog.
    Categories,
}

#[derive(Debug, Args)]
pub struct ListProductsArgs {
    /// Only this category.
    #[arg(long, conflicts_with = "low_stock")]
    pub category: Option<String>,

    /// Only products at or below their low-stock threshold.
    #[arg(long, default_value_t = false)]
    pub low_stock: bool,

    /// Case-insensitive name search.
    #[arg(long)]
    pub search: Option<String>,
}

impl ListProductsArgs {
    pub fn filter(&self) -> InventoryFilter {
        match (&self.category, self.low_stock) {
            (_, true) => InventoryFilter::LowStock,
            (Some(category), false) => InventoryFilter::from_key(category),
            (None, false) => InventoryFilter::All,
        }
    }
}

#[derive(Debug, Args)]
pub struct ProductArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub category: String,

    /// Unit price in won.
    #[arg(long)]
    pub price: i64,

    #[arg(long, default_value_t = 0)]
    pub quantity: i64,
}

impl From<ProductArgs> for ProductInput {
    fn from(args: ProductArgs) -> Self {
        ProductInput {
            name: args.name,
            category: args.category,
            price: Money::from_won(args.price),
            quantity: args.quantity,
        }
    }
}

#[derive(Debug, Args)]
pub struct UpdateProductArgs {
    pub id: i64,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// Unit price in won.
    #[arg(long)]
    pub price: Option<i64>,

    #[arg(long)]
    pub quantity: Option<i64>,
}

impl UpdateProductArgs {
    pub fn changes(&self) -> ProductChanges {
        ProductChanges {
            name: self.name.clone(),
            category: self.category.clone(),
            price: self.price.map(Money::from_won),
            quantity: self.quantity,
        }
    }
}

// =============================================================================
// Sales
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum SalesCommand {
    /// Transactions recorded on a date (default: today).
    List(ListSalesArgs),
    /// Record a transaction.
    Record(RecordSaleArgs),
    /// Delete a recorded transaction.
    Delete(DeleteSaleArgs),
}

#[derive(Debug, Args)]
pub struct ListSalesArgs {
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Show the item table of these transactions.
    #[arg(long)]
    pub expand: Vec<i64>,
}

#[derive(Debug, Args)]
pub struct RecordSaleArgs {
    /// `카테고리/상품명:수량`; repeat for each line.
    #[arg(long = "item", required = true)]
    pub items: Vec<ItemSpec>,

    /// Amount the customer paid, in won.
    #[arg(long)]
    pub total: i64,

    /// cash, card or transfer (현금, 카드, 계좌이체).
    #[arg(long, default_value = "cash")]
    pub payment: PaymentMethod,

    #[arg(long)]
    pub card_company: Option<String>,

    /// Sale date (default: today).
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct DeleteSaleArgs {
    pub id: i64,

    /// Ledger date to reload afterwards (default: today).
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Confirm the deletion.
    #[arg(long, short = 'y', default_value_t = false)]
    pub yes: bool,
}

// =============================================================================
// Memo
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum MemoCommand {
    List,
    Add { content: String },
    Delete { id: i64 },
}

fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    parse_sale_date(input)
}
