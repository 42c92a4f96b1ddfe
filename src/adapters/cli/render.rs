//! Plain-text rendering of the ledger and its summaries.

use rust_decimal::Decimal;

use crate::domain::ledger::Ledger;
use crate::domain::summary::LedgerSummary;
use crate::domain::ticket::Column;

/// Amount with currency symbol and two decimals, e.g. `₹-60.00`.
pub fn money(symbol: &str, amount: Decimal) -> String {
    format!("{symbol}{amount:.2}")
}

/// Fraction as a percentage with one decimal, e.g. `62.5%`.
pub fn percent(fraction: Decimal) -> String {
    format!("{:.1}%", fraction * Decimal::ONE_HUNDRED)
}

/// Transaction history as an aligned table.
pub fn render_ledger(ledger: &Ledger) -> String {
    if ledger.is_empty() {
        return "No transactions recorded.\n".to_string();
    }

    let table = ledger.to_table();
    let right: Vec<bool> = Column::ALL
        .iter()
        .map(|c| !matches!(c, Column::Match | Column::Stand))
        .collect();
    let rows: Vec<Vec<String>> = std::iter::once(table.headers).chain(table.rows).collect();
    render_grid(&rows, &right)
}

/// Dashboard text: total, trend, match/stand breakdowns, share.
pub fn render_summary(summary: &LedgerSummary, symbol: &str) -> String {
    let mut lines = vec![format!(
        "Total Profit: {}",
        money(symbol, summary.total_profit)
    )];

    if summary.rows == 0 {
        lines.push(String::new());
        lines.push("No transactions recorded.".to_string());
        return lines.join("\n") + "\n";
    }

    lines.push(String::new());
    lines.push("Cumulative profit:".to_string());
    let trend: Vec<Vec<String>> = summary
        .cumulative_profit
        .iter()
        .enumerate()
        .map(|(i, p)| vec![(i + 1).to_string(), money(symbol, *p)])
        .collect();
    lines.push(indent(&render_grid(&trend, &[true, true])));

    lines.push("By match:".to_string());
    let mut by_match = vec![vec![
        "Match".to_string(),
        "Selling Price".to_string(),
        "Profit".to_string(),
    ]];
    by_match.extend(summary.by_match.iter().map(|(label, totals)| {
        vec![
            display_label(label),
            money(symbol, totals.selling_price_sum),
            money(symbol, totals.profit_sum),
        ]
    }));
    lines.push(indent(&render_grid(&by_match, &[false, true, true])));

    lines.push("By stand:".to_string());
    let mut by_stand = vec![vec!["Stand".to_string(), "Profit".to_string()]];
    by_stand.extend(
        summary
            .by_stand
            .iter()
            .map(|(label, profit)| vec![display_label(label), money(symbol, *profit)]),
    );
    lines.push(indent(&render_grid(&by_stand, &[false, true])));

    match &summary.profit_share {
        Some(shares) => {
            lines.push("Profit share by match:".to_string());
            let rows: Vec<Vec<String>> = shares
                .iter()
                .map(|(label, share)| vec![display_label(label), percent(*share)])
                .collect();
            lines.push(indent(&render_grid(&rows, &[false, true])));
        }
        None => lines.push("Profit share by match: undefined (total profit is zero)".to_string()),
    }

    lines.join("\n") + "\n"
}

fn display_label(label: &str) -> String {
    if label.is_empty() {
        "(blank)".to_string()
    } else {
        label.to_string()
    }
}

fn indent(block: &str) -> String {
    block.lines().map(|l| format!("  {l}\n")).collect()
}

/// Pad every cell to its column width; `right[i]` right-aligns column i.
fn render_grid(rows: &[Vec<String>], right: &[bool]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for row in rows {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, &w)| {
                let cell = row.get(i).map_or("", String::as_str);
                if right.get(i).copied().unwrap_or(false) {
                    format!("{cell:>w$}")
                } else {
                    format!("{cell:<w$}")
                }
            })
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }
    out
}
