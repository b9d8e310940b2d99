use crate::db::{repository, summary_repository};
use crate::error::Result;
use crate::models::transaction::TransactionType;
use crate::operations::{add, chart, report};
use rusqlite::Connection;
use std::io::{BufRead, Write};
use tracing::{debug, warn};

const MENU: &str = "
--- Personal Budget Tracker ---
1. Add Income
2. Add Expense
3. View Transactions
4. Categorized Spending
5. Monthly Summary
6. Visualize Spending by Category
7. Visualize Monthly Summary
8. Exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddIncome,
    AddExpense,
    View,
    CategorizedSpending,
    MonthlySummary,
    VisualizeSpending,
    VisualizeMonthly,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::AddIncome),
            "2" => Some(MenuChoice::AddExpense),
            "3" => Some(MenuChoice::View),
            "4" => Some(MenuChoice::CategorizedSpending),
            "5" => Some(MenuChoice::MonthlySummary),
            "6" => Some(MenuChoice::VisualizeSpending),
            "7" => Some(MenuChoice::VisualizeMonthly),
            "8" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// Runs the numbered menu until the user picks Exit or input ends.
pub fn run_menu<R: BufRead, W: Write>(conn: &Connection, input: &mut R, output: &mut W) -> Result<()> {
    loop {
        writeln!(output, "{}", MENU)?;
        let Some(line) = prompt(input, output, "Enter your choice: ")? else {
            debug!("input closed, leaving menu");
            break;
        };

        let Some(choice) = MenuChoice::parse(&line) else {
            writeln!(output, "Invalid choice! Please try again.")?;
            continue;
        };
        debug!(?choice, "menu choice");

        let keep_going = match dispatch(conn, choice, input, output) {
            Ok(keep_going) => keep_going,
            Err(e) if e.is_recoverable() => {
                warn!(error = %e, ?choice, "menu action failed");
                writeln!(output, "Error: {}", e)?;
                true
            }
            Err(e) => return Err(e),
        };

        if !keep_going {
            break;
        }
    }
    Ok(())
}

/// Runs one menu action. `Ok(false)` ends the menu.
fn dispatch<R: BufRead, W: Write>(
    conn: &Connection,
    choice: MenuChoice,
    input: &mut R,
    output: &mut W,
) -> Result<bool> {
    match choice {
        MenuChoice::AddIncome => add_from_prompts(conn, input, output, TransactionType::Income),
        MenuChoice::AddExpense => add_from_prompts(conn, input, output, TransactionType::Expense),
        MenuChoice::View => {
            let transactions = repository::get_all_transactions(conn)?;
            write!(output, "{}", report::format_transaction_history(&transactions))?;
            Ok(true)
        }
        MenuChoice::CategorizedSpending => {
            let totals = summary_repository::spending_by_category(conn)?;
            write!(output, "{}", report::format_spending_by_category(&totals))?;
            Ok(true)
        }
        MenuChoice::MonthlySummary => {
            let Some((month, year)) = prompt_month(input, output)? else {
                return Ok(false);
            };
            let summary = summary_repository::monthly_summary(conn, &month, &year)?;
            write!(output, "{}", report::format_monthly_summary(&month, &year, &summary))?;
            Ok(true)
        }
        MenuChoice::VisualizeSpending => {
            chart::show_spending_pie(conn)?;
            Ok(true)
        }
        MenuChoice::VisualizeMonthly => {
            let Some((month, year)) = prompt_month(input, output)? else {
                return Ok(false);
            };
            chart::show_monthly_bars(conn, &month, &year)?;
            Ok(true)
        }
        MenuChoice::Exit => {
            writeln!(output, "Goodbye!")?;
            Ok(false)
        }
    }
}

/// Returns `Ok(false)` when input ended mid-way.
fn add_from_prompts<R: BufRead, W: Write>(
    conn: &Connection,
    input: &mut R,
    output: &mut W,
    transaction_type: TransactionType,
) -> Result<bool> {
    let kind = transaction_type.as_str();
    let Some(category) = prompt(input, output, &format!("Enter {} category: ", kind))? else {
        return Ok(false);
    };
    let Some(description) = prompt(input, output, &format!("Enter {} description: ", kind))? else {
        return Ok(false);
    };
    let Some(amount) = prompt(input, output, "Enter amount: ")? else {
        return Ok(false);
    };

    add::add_transaction_to_db(conn, &category, &description, &amount, kind)?;
    writeln!(output, "{} added successfully!", transaction_type.label())?;
    Ok(true)
}

fn prompt_month<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Option<(String, String)>> {
    let Some(month) = prompt(input, output, "Enter the month (MM): ")? else {
        return Ok(None);
    };
    let Some(year) = prompt(input, output, "Enter the year (YYYY): ")? else {
        return Ok(None);
    };
    Ok(Some((month, year)))
}

fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, text: &str) -> Result<Option<String>> {
    write!(output, "{}", text)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let entered = line.trim_end_matches(['\n', '\r']);
    Ok(Some(entered.to_string()))
}
