//! # Text Output
//!
//! Plain-text views for the terminal. Each function returns the whole block
//! so the caller decides where it goes.

use std::fmt::Write;

use rodeo_core::catalog::is_low_stock;
use rodeo_core::memo::Memo;
use rodeo_core::monthly::MonthlyReport;
use rodeo_core::Product;

use crate::commands::ledger::LedgerSummary;
use crate::commands::sale::CommitReceipt;

const BAR_WIDTH: i64 = 30;
const LOW_STOCK_MARK: &str = "⚠ 재고부족";

pub fn products(products: &[Product]) -> String {
    if products.is_empty() {
        return "표시할 상품이 없습니다.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:>5}  {:<12} {:<24} {:>12} {:>6}", "ID", "카테고리", "상품명", "가격", "재고");
    for p in products {
        let mark = if is_low_stock(p) { LOW_STOCK_MARK } else { "" };
        let _ = writeln!(
            out,
            "{:>5}  {:<12} {:<24} {:>12} {:>6}  {}",
            p.id,
            p.category,
            p.name,
            p.price.to_string(),
            p.quantity,
            mark
        );
    }
    out
}

pub fn categories(categories: &[String]) -> String {
    let mut out = String::new();
    for category in categories {
        let _ = writeln!(out, "{}", category);
    }
    out
}

pub fn ledger(summary: &LedgerSummary) -> String {
    let mut out = String::new();
    if let Some(date) = summary.date {
        let _ = writeln!(out, "{} 판매 내역", date.format("%Y-%m-%d"));
    }
    if summary.transactions.is_empty() {
        let _ = writeln!(out, "판매 내역이 없습니다.");
        return out;
    }

    for tx in &summary.transactions {
        let _ = writeln!(
            out,
            "#{:<5} {:<14} {:<32} {:>12}  {}",
            tx.id,
            tx.display_time,
            tx.summary_line(),
            tx.total_amount.to_string(),
            tx.payment_display()
        );
        if tx.expanded {
            for item in &tx.items {
                let total = item
                    .item_total
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let _ = writeln!(
                    out,
                    "        └ {} [{}] x{}  {}",
                    item.product_name.as_deref().unwrap_or("-"),
                    item.category.as_deref().unwrap_or("-"),
                    item.quantity,
                    total
                );
            }
        }
    }
    let _ = writeln!(out, "합계: {}", summary.total_sales);
    out
}

pub fn monthly(report: &MonthlyReport, store_name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} 월별 매출", store_name);
    for month in &report.months {
        let bar = "█".repeat(report.bar_width(month, BAR_WIDTH).max(0) as usize);
        let _ = writeln!(
            out,
            "{}년 {:<4} {:<30} {}",
            month.year,
            month.label(),
            bar,
            month.total_sales
        );
    }

    let summary = &report.summary;
    let _ = writeln!(out, "연간 합계: {}", summary.annual_total);
    let _ = writeln!(out, "이번 달: {}", summary.current_month_sales);
    if let Some(top) = &summary.top_month {
        let _ = writeln!(out, "최고 매출: {}년 {}월 ({})", top.year, top.month, top.sales);
    }
    out
}

pub fn memos(memos: &[Memo]) -> String {
    if memos.is_empty() {
        return "메모가 없습니다.\n".to_string();
    }
    let mut out = String::new();
    for memo in memos {
        let _ = writeln!(out, "#{:<4} {}  {}", memo.id, memo.display_date(), memo.content);
    }
    out
}

pub fn receipt(receipt: &CommitReceipt) -> String {
    format!(
        "{}\n{}  {}개 품목 / {}개  {}  {}\n",
        receipt.message,
        receipt.sale_date.format("%Y-%m-%d"),
        receipt.item_count,
        receipt.total_quantity,
        receipt.total_amount,
        receipt.payment
    )
}
