use crate::db::{repository, summary_repository};
use crate::error::{BudgetError, Result};
use crate::models::summary::CategoryShare;
use crate::models::transaction::{Transaction, TransactionType, DATE_FORMAT};
use crate::operations::{add, chart, terminal};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::Flex,
    prelude::{Alignment, Color, Constraint, Layout, Rect, Style},
    style::Stylize,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};
use rusqlite::Connection;
use std::time::Duration;
use tracing::{info, warn};

const BUTTONS: [Button; 4] = [
    Button::AddTransaction,
    Button::ViewTransactions,
    Button::VisualizeSpending,
    Button::Exit,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    AddTransaction,
    ViewTransactions,
    VisualizeSpending,
    Exit,
}

impl Button {
    fn label(self) -> &'static str {
        match self {
            Button::AddTransaction => "Add Transaction",
            Button::ViewTransactions => "View Transactions",
            Button::VisualizeSpending => "Visualize Spending",
            Button::Exit => "Exit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Main,
    AddForm,
    History,
    SpendingChart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Category,
    Description,
    Amount,
    Type,
    Submit,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::Category => FormField::Description,
            FormField::Description => FormField::Amount,
            FormField::Amount => FormField::Type,
            FormField::Type => FormField::Submit,
            FormField::Submit => FormField::Category,
        }
    }

    fn previous(self) -> Self {
        match self {
            FormField::Category => FormField::Submit,
            FormField::Description => FormField::Category,
            FormField::Amount => FormField::Description,
            FormField::Type => FormField::Amount,
            FormField::Submit => FormField::Type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddForm {
    pub category: String,
    pub description: String,
    pub amount: String,
    pub transaction_type: TransactionType,
    pub focus: FormField,
}

impl Default for AddForm {
    fn default() -> Self {
        Self {
            category: String::new(),
            description: String::new(),
            amount: String::new(),
            transaction_type: TransactionType::Income,
            focus: FormField::Category,
        }
    }
}

impl AddForm {
    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Category => Some(&mut self.category),
            FormField::Description => Some(&mut self.description),
            FormField::Amount => Some(&mut self.amount),
            FormField::Type | FormField::Submit => None,
        }
    }
}

pub struct GuiState {
    pub screen: Screen,
    pub selected_button: usize,
    pub form: AddForm,
    pub transactions: Vec<Transaction>,
    pub table_state: TableState,
    pub shares: Vec<CategoryShare>,
    pub notice: Option<Notice>,
}

impl Default for GuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl GuiState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Main,
            selected_button: 0,
            form: AddForm::default(),
            transactions: Vec::new(),
            table_state: TableState::default(),
            shares: Vec::new(),
            notice: None,
        }
    }

    fn selected(&self) -> Button {
        BUTTONS[self.selected_button]
    }

    fn move_button(&mut self, delta: i32) {
        let max_index = BUTTONS.len() as i32 - 1;
        self.selected_button = (self.selected_button as i32 + delta).clamp(0, max_index) as usize;
    }

    fn move_row(&mut self, delta: i32) {
        if self.transactions.is_empty() {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as i32;
        let max_index = self.transactions.len() as i32 - 1;
        self.table_state.select(Some((current + delta).clamp(0, max_index) as usize));
    }

    fn info(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice { kind: NoticeKind::Info, text: text.into() });
    }

    fn error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice { kind: NoticeKind::Error, text: text.into() });
    }

    /// Returns `Ok(true)` when the application should exit.
    fn activate(&mut self, conn: &Connection, button: Button) -> Result<bool> {
        match button {
            Button::AddTransaction => {
                self.form = AddForm::default();
                self.screen = Screen::AddForm;
            }
            Button::ViewTransactions => {
                self.transactions = repository::get_all_transactions(conn)?;
                self.table_state
                    .select(if self.transactions.is_empty() { None } else { Some(0) });
                self.screen = Screen::History;
            }
            Button::VisualizeSpending => {
                let totals = summary_repository::spending_by_category(conn)?;
                if totals.is_empty() {
                    self.info("No expenses to display.");
                } else {
                    self.shares = chart::category_shares(&totals);
                    self.screen = Screen::SpendingChart;
                }
            }
            Button::Exit => return Ok(true),
        }
        Ok(false)
    }

    fn submit_form(&mut self, conn: &Connection) -> Result<()> {
        let form = &self.form;
        let created = add::create_transaction(
            &form.category,
            &form.description,
            &form.amount,
            form.transaction_type.as_str(),
        );

        match created {
            Ok(transaction) => {
                repository::add_transaction(conn, &transaction)?;
                info!(kind = %transaction.transaction_type, "transaction added from form");
                self.info(format!("{} added successfully!", transaction.transaction_type.label()));
                self.form = AddForm::default();
                self.screen = Screen::Main;
            }
            Err(BudgetError::MissingField(field)) => {
                warn!(field, "form submitted with empty field");
                self.error("All fields are required.");
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Shows recoverable failures as an error dialog and keeps the GUI running.
    fn recover<T: Default>(&mut self, result: Result<T>) -> Result<T> {
        match result {
            Err(e) if e.is_recoverable() => {
                warn!(error = %e, screen = ?self.screen, "action failed");
                self.error(e.to_string());
                Ok(T::default())
            }
            other => other,
        }
    }
}

pub fn run_gui(conn: &Connection) -> Result<()> {
    info!("starting terminal GUI");
    terminal::with_terminal(|tui| {
        let mut state = GuiState::new();
        loop {
            tui.draw(|frame| render(frame, &mut state))?;

            if event::poll(Duration::from_millis(200))? {
                if let Event::Key(key) = event::read()? {
                    if handle_key(conn, &mut state, key)? {
                        break;
                    }
                }
            }
        }
        Ok(())
    })
}

/// Applies one key press. Returns `Ok(true)` when the application should exit.
pub fn handle_key(conn: &Connection, state: &mut GuiState, key: KeyEvent) -> Result<bool> {
    if key.kind == KeyEventKind::Release {
        return Ok(false);
    }

    // A notice is modal over whatever screen is showing.
    if state.notice.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            state.notice = None;
        }
        return Ok(false);
    }

    match state.screen {
        Screen::Main => match key.code {
            KeyCode::Up | KeyCode::BackTab => state.move_button(-1),
            KeyCode::Down | KeyCode::Tab => state.move_button(1),
            KeyCode::Enter => {
                let button = state.selected();
                let activated = state.activate(conn, button);
                return state.recover(activated);
            }
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            _ => {}
        },
        Screen::AddForm => {
            if key.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
            {
                state.screen = Screen::Main;
                return Ok(false);
            }

            match key.code {
                KeyCode::Esc => state.screen = Screen::Main,
                KeyCode::Tab | KeyCode::Down => state.form.focus = state.form.focus.next(),
                KeyCode::BackTab | KeyCode::Up => state.form.focus = state.form.focus.previous(),
                KeyCode::Enter => {
                    let submitted = state.submit_form(conn);
                    state.recover(submitted)?;
                }
                KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
                    if state.form.focus == FormField::Type =>
                {
                    state.form.transaction_type = state.form.transaction_type.toggle();
                }
                KeyCode::Backspace => {
                    if let Some(text) = state.form.focused_text() {
                        text.pop();
                    }
                }
                KeyCode::Char(ch) => {
                    if let Some(text) = state.form.focused_text() {
                        text.push(ch);
                    }
                }
                _ => {}
            }
        }
        Screen::History => match key.code {
            KeyCode::Up => state.move_row(-1),
            KeyCode::Down => state.move_row(1),
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('b') => state.screen = Screen::Main,
            _ => {}
        },
        Screen::SpendingChart => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('b')) {
                state.screen = Screen::Main;
            }
        }
    }

    Ok(false)
}

fn render(frame: &mut ratatui::Frame, state: &mut GuiState) {
    let size = frame.area();
    render_main(frame, size, state);

    match state.screen {
        Screen::Main => {}
        Screen::AddForm => render_add_form(frame, size, &state.form),
        Screen::History => render_history(frame, size, state),
        Screen::SpendingChart => {
            let area = popup_area(size, 90, 80);
            frame.render_widget(Clear, area);
            chart::render_spending_pie(frame, area, &state.shares);
        }
    }

    if let Some(ref notice) = state.notice {
        render_notice(frame, size, notice);
    }
}

fn render_main(frame: &mut ratatui::Frame, area: Rect, state: &GuiState) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Personal Budget Tracker",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
    ];
    for (idx, button) in BUTTONS.iter().enumerate() {
        let label = format!("[ {:^20} ]", button.label());
        let style = if idx == state.selected_button {
            Style::default().bg(Color::DarkGray).fg(Color::White).bold()
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(label, style)));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "↑/↓ select  Enter open  q/Esc exit",
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn render_add_form(frame: &mut ratatui::Frame, area: Rect, form: &AddForm) {
    let form_area = popup_area(area, 60, 60);
    frame.render_widget(Clear, form_area);

    let field_line = |label: &str, value: String, field: FormField| {
        let focused = form.focus == field;
        let style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        let cursor = if focused { "_" } else { "" };
        Line::from(vec![
            Span::styled(format!("{:<12}", label), Style::default().bold()),
            Span::styled(format!("{}{}", value, cursor), style),
        ])
    };

    let mut lines = vec![
        field_line("Category", form.category.clone(), FormField::Category),
        Line::from(""),
        field_line("Description", form.description.clone(), FormField::Description),
        Line::from(""),
        field_line("Amount", form.amount.clone(), FormField::Amount),
        Line::from(""),
        field_line("Type", format!("< {} >", form.transaction_type), FormField::Type),
        Line::from(""),
        Line::from(Span::styled(
            "[ Submit ]",
            if form.focus == FormField::Submit {
                Style::default().bg(Color::DarkGray).fg(Color::White).bold()
            } else {
                Style::default().fg(Color::White)
            },
        )),
    ];

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Tab/↑/↓ move  ←/→ type  Enter submit  Esc cancel",
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default().borders(Borders::ALL).title("Add Transaction");
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: false }),
        form_area,
    );
}

fn render_history(frame: &mut ratatui::Frame, area: Rect, state: &mut GuiState) {
    let history_area = popup_area(area, 90, 80);
    frame.render_widget(Clear, history_area);

    let block = Block::default()
        .title("Transaction History  (Esc to close)")
        .borders(Borders::ALL);
    let inner = block.inner(history_area);
    frame.render_widget(block, history_area);

    let header = Row::new([
        Cell::from("Date").style(Style::default().bold()),
        Cell::from("Category").style(Style::default().bold()),
        Cell::from("Description").style(Style::default().bold()),
        Cell::from("Amount").style(Style::default().bold()),
        Cell::from("Type").style(Style::default().bold()),
    ])
    .style(Style::default().fg(Color::White));

    let rows = state.transactions.iter().map(|tx| {
        Row::new([
            Cell::from(tx.date.format(DATE_FORMAT).to_string()),
            Cell::from(tx.category.clone()),
            Cell::from(tx.description.clone()),
            Cell::from(format!("{:.2}", tx.amount)),
            Cell::from(tx.transaction_type.as_str()),
        ])
    });

    let widths = [
        Constraint::Length(19),
        Constraint::Length(14),
        Constraint::Percentage(40),
        Constraint::Length(12),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White).bold())
        .highlight_symbol("➤ ")
        .column_spacing(1);

    frame.render_stateful_widget(table, inner, &mut state.table_state);

    if state.transactions.is_empty() {
        let empty = Paragraph::new("No transactions recorded yet")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
    }
}

fn render_notice(frame: &mut ratatui::Frame, area: Rect, notice: &Notice) {
    let dialog_area = popup_area(area, 50, 25);
    frame.render_widget(Clear, dialog_area);

    let (title, color) = match notice.kind {
        NoticeKind::Info => ("Info", Color::Green),
        NoticeKind::Error => ("Error", Color::Red),
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(notice.text.clone(), Style::default().fg(color))),
        Line::from(""),
        Line::from(Span::styled("Enter to close", Style::default().fg(Color::DarkGray))),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        dialog_area,
    );
}

/// A rectangle covering the given percentages of `area`, centred in both directions.
fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    popup
}
