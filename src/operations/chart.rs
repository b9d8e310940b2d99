use crate::db::summary_repository;
use crate::error::Result;
use crate::models::summary::{CategoryShare, MonthlySummary};
use crate::operations::terminal;
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Rect, Style},
    style::Stylize,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use ratatui::widgets::canvas::{Canvas, Points};
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::f64::consts::TAU;
use tracing::info;

/// Slices start here (in degrees, counter-clockwise from 3 o'clock).
const START_ANGLE_DEGREES: f64 = 140.0;

/// Pie fill density.
const RINGS: usize = 25;
const ARC_STEP: f64 = 0.05;

const PALETTE: [Color; 11] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::Blue,
    Color::Red,
    Color::LightCyan,
    Color::LightMagenta,
    Color::LightYellow,
    Color::LightGreen,
    Color::LightBlue,
];

/// Percentage of the expense total per category, computed from absolute values.
/// Every share is zero when the total is zero.
pub fn category_shares(totals: &[(String, Decimal)]) -> Vec<CategoryShare> {
    let total: f64 = totals
        .iter()
        .map(|(_, amount)| amount.abs().to_f64().unwrap_or(0.0))
        .sum();

    totals
        .iter()
        .map(|(category, amount)| {
            let value = amount.abs().to_f64().unwrap_or(0.0);
            let percent = if total > 0.0 { value / total * 100.0 } else { 0.0 };
            CategoryShare {
                category: category.clone(),
                amount: *amount,
                percent,
            }
        })
        .collect()
}

/// Bar heights in rows for each value, scaled so the largest value fills `bar_height`.
pub fn bar_heights(values: &[Decimal], bar_height: usize) -> Vec<usize> {
    let max_total = values
        .iter()
        .map(|v| v.to_f64().unwrap_or(0.0))
        .fold(0.0_f64, f64::max);
    if max_total <= 0.0 {
        return vec![0; values.len()];
    }

    values
        .iter()
        .map(|v| {
            let value = v.to_f64().unwrap_or(0.0).max(0.0);
            (value / max_total * bar_height as f64).ceil() as usize
        })
        .collect()
}

pub fn show_spending_pie(conn: &Connection) -> Result<()> {
    let totals = summary_repository::spending_by_category(conn)?;
    let shares = category_shares(&totals);
    info!(categories = shares.len(), "showing spending pie chart");

    terminal::with_terminal(|tui| {
        terminal::show_until_dismissed(tui, |frame| {
            let area = frame.area();
            render_spending_pie(frame, area, &shares);
        })
    })
}

pub fn show_monthly_bars(conn: &Connection, month: &str, year: &str) -> Result<()> {
    let summary = summary_repository::monthly_summary(conn, month, year)?;
    let title = format!("Monthly Summary for {}/{}", month, year);
    info!(month, year, "showing monthly bar chart");

    terminal::with_terminal(|tui| {
        terminal::show_until_dismissed(tui, |frame| {
            let area = frame.area();
            render_monthly_bars(frame, area, &title, &summary);
        })
    })
}

pub fn render_spending_pie(frame: &mut ratatui::Frame, area: Rect, shares: &[CategoryShare]) {
    let block = Block::default()
        .title(Line::from(vec![Span::styled(
            "Spending by Category  (press q to exit)",
            Style::default().fg(Color::White),
        )]))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if shares.iter().all(|s| s.percent <= 0.0) {
        let empty = Paragraph::new("No expenses to display.").alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let [pie_area, legend_area] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(inner);

    let mut slices = Vec::with_capacity(shares.len());
    let mut covered = 0.0;
    for (idx, share) in shares.iter().enumerate() {
        let start = START_ANGLE_DEGREES.to_radians() + covered / 100.0 * TAU;
        covered += share.percent;
        let end = START_ANGLE_DEGREES.to_radians() + covered / 100.0 * TAU;
        slices.push((slice_points(start, end), color_for(idx)));
    }

    let canvas = Canvas::default()
        .x_bounds([-1.0, 1.0])
        .y_bounds([-1.0, 1.0])
        .paint(|ctx| {
            for (points, color) in &slices {
                ctx.draw(&Points { coords: points, color: *color });
            }
        });
    frame.render_widget(canvas, pie_area);

    let mut lines = vec![Line::from(vec![
        Span::styled("Category", Style::default().fg(Color::White).bold()),
        Span::raw("  "),
        Span::styled("Share", Style::default().fg(Color::White).bold()),
    ])];
    for (idx, share) in shares.iter().enumerate() {
        let color = color_for(idx);
        lines.push(Line::from(vec![
            Span::styled(format!("{:15}", share.category), Style::default().fg(color)),
            Span::raw("  "),
            Span::styled(format!("{:>6.1}%", share.percent), Style::default().fg(color)),
        ]));
    }
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Left), legend_area);
}

pub fn render_monthly_bars(
    frame: &mut ratatui::Frame,
    area: Rect,
    title: &str,
    summary: &MonthlySummary,
) {
    let inner = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(area);

    let block = Block::default()
        .title(Line::from(vec![Span::styled(
            format!("{}  (press q to exit)", title),
            Style::default().fg(Color::White),
        )]))
        .title_bottom("Amount ($)")
        .borders(Borders::ALL);
    let chart_area = block.inner(inner[0]);
    frame.render_widget(block, inner[0]);

    let bar_height = chart_area.height.saturating_sub(1) as usize;
    if bar_height == 0 {
        return;
    }

    let bars = [
        ("Income", summary.income, Color::Green),
        ("Expenses", summary.expenses, Color::Red),
    ];
    let values: Vec<Decimal> = bars.iter().map(|(_, v, _)| *v).collect();
    let heights = bar_heights(&values, bar_height);

    // Two bars with a gap column on either side of each.
    let slot_width = std::cmp::max(3, chart_area.width as usize / bars.len());
    let bar_width = slot_width.saturating_sub(2).max(1);

    let mut lines: Vec<Line> = Vec::new();
    for row in 0..bar_height {
        let level = bar_height - row;
        let mut spans: Vec<Span> = Vec::new();
        for ((_, _, color), height) in bars.iter().zip(&heights) {
            spans.push(Span::raw(" "));
            if level <= *height {
                spans.push(Span::styled("█".repeat(bar_width), Style::default().fg(*color)));
            } else {
                spans.push(Span::raw(" ".repeat(bar_width)));
            }
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Left), chart_area);

    let mut labels: Vec<Span> = Vec::new();
    for (label, value, color) in &bars {
        let text = format!("{} ${:.2}", label, value);
        labels.push(Span::styled(
            format!(" {:width$} ", text, width = bar_width),
            Style::default().fg(*color),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(labels)).alignment(Alignment::Left),
        inner[1],
    );
}

/// Concentric rings of points filling the unit-circle sector between two angles (radians).
fn slice_points(start: f64, end: f64) -> Vec<(f64, f64)> {
    let sweep = (end - start).max(0.0);
    let arc_steps = (sweep / ARC_STEP).ceil().max(1.0) as usize;

    let mut points = Vec::with_capacity((RINGS + 1) * (arc_steps + 1));
    for ring in 0..=RINGS {
        let radius = ring as f64 / RINGS as f64;
        for step in 0..=arc_steps {
            let angle = start + sweep * step as f64 / arc_steps as f64;
            let (sin, cos) = angle.sin_cos();
            points.push((radius * cos, radius * sin));
        }
    }
    points
}

fn color_for(idx: usize) -> Color {
    PALETTE[idx % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn draw_pie(shares: &[CategoryShare]) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_spending_pie(frame, area, shares);
            })
            .unwrap();
        buffer_text(&terminal)
    }

    #[test]
    fn test_category_shares_sum_to_hundred() {
        let shares = category_shares(&[
            ("Food".to_string(), Decimal::new(25, 0)),
            ("Rent".to_string(), Decimal::new(75, 0)),
        ]);
        assert_eq!(shares.len(), 2);
        assert!((shares[0].percent - 25.0).abs() < 1e-9);
        assert!((shares[1].percent - 75.0).abs() < 1e-9);
        let sum: f64 = shares.iter().map(|s| s.percent).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_category_shares_use_absolute_values() {
        let shares = category_shares(&[
            ("Refunds".to_string(), Decimal::new(-50, 0)),
            ("Food".to_string(), Decimal::new(50, 0)),
        ]);
        assert!((shares[0].percent - 50.0).abs() < 1e-9);
        assert_eq!(shares[0].amount, Decimal::new(-50, 0));
    }

    #[test]
    fn test_category_shares_zero_total() {
        let shares = category_shares(&[("Food".to_string(), Decimal::ZERO)]);
        assert_eq!(shares[0].percent, 0.0);
        assert!(category_shares(&[]).is_empty());
    }

    #[test]
    fn test_bar_heights_scale_to_largest() {
        let heights = bar_heights(&[Decimal::new(1000, 0), Decimal::new(250, 0)], 20);
        assert_eq!(heights, vec![20, 5]);
    }

    #[test]
    fn test_bar_heights_all_zero() {
        let heights = bar_heights(&[Decimal::ZERO, Decimal::ZERO], 10);
        assert_eq!(heights, vec![0, 0]);
    }

    #[test]
    fn test_slice_points_stay_inside_sector() {
        let (start, end) = (0.5, 2.0);
        let points = slice_points(start, end);
        assert!(!points.is_empty());
        assert!(points.contains(&(0.0, 0.0)));
        for (x, y) in points.iter().filter(|(x, y)| (*x, *y) != (0.0, 0.0)) {
            let radius = x.hypot(*y);
            assert!(radius <= 1.0 + 1e-9);
            let angle = y.atan2(*x);
            assert!(angle >= start - 1e-9 && angle <= end + 1e-9, "angle {angle} outside sector");
        }
    }

    #[test]
    fn test_slice_points_reach_both_edges() {
        let points = slice_points(0.0, 1.0);
        let (x, y) = points[points.len() - 1];
        assert!((x - 1.0_f64.cos()).abs() < 1e-9);
        assert!((y - 1.0_f64.sin()).abs() < 1e-9);
        assert!(points.contains(&(1.0, 0.0)));
    }

    #[test]
    fn test_render_spending_pie_without_expenses() {
        let text = draw_pie(&category_shares(&[]));
        assert!(text.contains("Spending by Category  (press q to exit)"));
        assert!(text.contains("No expenses to display."));
        assert!(!text.contains("Category  Share"));
    }

    #[test]
    fn test_render_spending_pie_legend() {
        let text = draw_pie(&category_shares(&[
            ("Food".to_string(), Decimal::new(25, 0)),
            ("Rent".to_string(), Decimal::new(75, 0)),
        ]));
        assert!(!text.contains("No expenses to display."));
        assert!(text.contains("Category  Share"));
        assert!(text.contains("Food"));
        assert!(text.contains("  25.0%"));
        assert!(text.contains("  75.0%"));
    }

    #[test]
    fn test_render_monthly_bars() {
        let summary = MonthlySummary {
            income: Decimal::new(1000, 0),
            expenses: Decimal::new(250, 0),
        };
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_monthly_bars(frame, area, "Monthly Summary for 03/2025", &summary);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Monthly Summary for 03/2025  (press q to exit)"));
        assert!(text.contains("Amount ($)"));
        assert!(text.contains("Income $1000.00"));
        assert!(text.contains("Expenses $250.00"));
        assert!(text.contains("█"));
    }
}
