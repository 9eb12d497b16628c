use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use parking_register::{
    Alert, AlertKind, Entry, EntryForm, KeyValueStore, ParkingAdapter, ALERT_TTL,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

const FIELD_LABELS: [&str; 5] = ["Owner", "Vehicle", "License Plate", "Entry Date", "Slot Number"];
const SLOT_FIELD: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(usize),
    Search,
    Table,
}

impl Focus {
    pub fn next(&self) -> Self {
        match self {
            Focus::Field(i) if *i + 1 < FIELD_LABELS.len() => Focus::Field(i + 1),
            Focus::Field(_) => Focus::Search,
            Focus::Search => Focus::Table,
            Focus::Table => Focus::Field(0),
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Focus::Field(0) => Focus::Table,
            Focus::Field(i) => Focus::Field(i - 1),
            Focus::Search => Focus::Field(FIELD_LABELS.len() - 1),
            Focus::Table => Focus::Search,
        }
    }
}

pub struct App<S: KeyValueStore> {
    pub adapter: ParkingAdapter<S>,
    pub fields: [String; 5],
    pub search: String,
    pub focus: Focus,
    pub rows: Vec<Entry>,
    pub state: TableState,
    pub alert: Option<(Alert, Instant)>,
    default_date: String,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(adapter: ParkingAdapter<S>, default_date: String) -> Self {
        let rows = adapter.visible_entries();
        let mut state = TableState::default();
        if !rows.is_empty() {
            state.select(Some(0));
        }

        let mut app = Self {
            adapter,
            fields: Default::default(),
            search: String::new(),
            focus: Focus::Field(0),
            rows,
            state,
            alert: None,
            default_date,
        };
        app.clear_input();
        app
    }

    /// Empty the form, keeping the date default and the suggested slot
    pub fn clear_input(&mut self) {
        self.fields = Default::default();
        self.fields[3] = self.default_date.clone();
        self.fields[SLOT_FIELD] = self.adapter.suggested_slot().to_string();
    }

    pub fn form(&self) -> EntryForm {
        EntryForm {
            owner: self.fields[0].clone(),
            vehicle: self.fields[1].clone(),
            license_plate: self.fields[2].clone(),
            entry_date: self.fields[3].clone(),
            slot_number: self.fields[SLOT_FIELD].clone(),
        }
    }

    pub fn submit(&mut self) {
        let outcome = self.adapter.on_submit(&self.form());

        if outcome.accepted.is_some() {
            self.clear_input();
            self.focus = Focus::Field(0);
        }
        self.show_alert(outcome.alert);
        self.refresh_rows();
    }

    pub fn delete_selected(&mut self) {
        let plate = match self.selected_entry() {
            Some(entry) => entry.license_plate.clone(),
            None => return,
        };

        let alert = self.adapter.on_delete_click(&plate);
        self.show_alert(alert);
        self.refresh_rows();
        self.fields[SLOT_FIELD] = self.adapter.suggested_slot().to_string();
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.state.selected().and_then(|i| self.rows.get(i))
    }

    pub fn input_char(&mut self, c: char) {
        match self.focus {
            Focus::Field(i) => self.fields[i].push(c),
            Focus::Search => {
                self.search.push(c);
                self.apply_search();
            }
            Focus::Table => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            Focus::Field(i) => {
                self.fields[i].pop();
            }
            Focus::Search => {
                self.search.pop();
                self.apply_search();
            }
            Focus::Table => {}
        }
    }

    fn apply_search(&mut self) {
        self.rows = self.adapter.on_search_input(&self.search);
        self.reset_selection();
    }

    fn refresh_rows(&mut self) {
        self.rows = self.adapter.visible_entries();
        match self.state.selected() {
            Some(i) if i < self.rows.len() => {}
            _ => self.reset_selection(),
        }
    }

    fn reset_selection(&mut self) {
        if self.rows.is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    pub fn next(&mut self) {
        let len = self.rows.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.rows.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    fn show_alert(&mut self, alert: Alert) {
        self.alert = Some((alert, Instant::now()));
    }

    /// Drop the alert once it has been on screen for `ALERT_TTL`
    pub fn expire_alert(&mut self, now: Instant) {
        if let Some((_, shown_at)) = &self.alert {
            if now.duration_since(*shown_at) >= ALERT_TTL {
                self.alert = None;
            }
        }
    }
}

pub fn run_ui<S: KeyValueStore>(app: &mut App<S>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend, S: KeyValueStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> io::Result<()> {
    loop {
        app.expire_alert(Instant::now());
        terminal.draw(|f| ui(f, app))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }

        let key = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            _ => continue,
        };

        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            return Ok(());
        }

        match (app.focus, key.code) {
            (_, KeyCode::Tab) => app.focus = app.focus.next(),
            (_, KeyCode::BackTab) => app.focus = app.focus.previous(),
            (Focus::Field(_), KeyCode::Enter) => app.submit(),
            (Focus::Field(_), KeyCode::Down) => app.focus = app.focus.next(),
            (Focus::Field(_), KeyCode::Up) => app.focus = app.focus.previous(),
            (Focus::Table, KeyCode::Char('q')) => return Ok(()),
            (Focus::Table, KeyCode::Down | KeyCode::Char('j')) => app.next(),
            (Focus::Table, KeyCode::Up | KeyCode::Char('k')) => app.previous(),
            (Focus::Table, KeyCode::Delete | KeyCode::Char('d')) => app.delete_selected(),
            (Focus::Search, KeyCode::Enter) => app.focus = Focus::Table,
            (_, KeyCode::Backspace) => app.backspace(),
            (_, KeyCode::Char(c)) => app.input_char(c),
            _ => {}
        }
    }
}

fn ui<S: KeyValueStore>(f: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Alert banner
            Constraint::Min(0),    // Form + table
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_alert(f, chunks[1], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[2]);

    render_form(f, body[0], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(body[1]);

    render_search(f, right[0], app);
    render_table(f, right[1], app);
    render_status_bar(f, chunks[3], app);
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    }
}

fn render_header<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let spans = vec![
        Span::styled(
            "Parking Lot Register",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Vehicles: {}", app.adapter.registry().len()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Next slot: {}", app.adapter.suggested_slot()),
            Style::default().fg(Color::Green),
        ),
    ];

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_alert<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let (text, color) = match &app.alert {
        Some((alert, _)) => (
            alert.message.as_str(),
            match alert.kind {
                AlertKind::Success => Color::Green,
                AlertKind::Danger => Color::Red,
            },
        ),
        None => ("", Color::DarkGray),
    };

    let banner = Paragraph::new(Span::styled(text, Style::default().fg(color)))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)));

    f.render_widget(banner, area);
}

fn render_form<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let mut lines = vec![Line::from("")];

    for (i, label) in FIELD_LABELS.iter().enumerate() {
        let focused = app.focus == Focus::Field(i);
        let cursor = if focused { "▏" } else { "" };

        lines.push(Line::from(vec![Span::styled(
            format!("  {}:", label),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )]));
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(format!("{}{}", app.fields[i], cursor), focus_style(focused)),
        ]));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "  Enter to add vehicle",
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    )));

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(matches!(app.focus, Focus::Field(_))))
            .title(" New Entry "),
    );

    f.render_widget(form, area);
}

fn render_search<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let focused = app.focus == Focus::Search;
    let cursor = if focused { "▏" } else { "" };

    let search = Paragraph::new(format!("{}{}", app.search, cursor)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(focused))
            .title(" Search "),
    );

    f.render_widget(search, area);
}

fn render_table<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &mut App<S>) {
    let header_cells = ["Owner", "Vehicle", "License Plate", "Entry Date", "Slot"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.rows.iter().map(|entry| {
        let cells = vec![
            Cell::from(truncate(&entry.owner, 20)),
            Cell::from(truncate(&entry.vehicle, 18)),
            Cell::from(entry.license_plate.clone()).style(Style::default().fg(Color::Cyan)),
            Cell::from(entry.entry_date.clone()),
            Cell::from(entry.slot_number.clone()).style(Style::default().fg(Color::Green)),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(22),
            Constraint::Length(20),
            Constraint::Length(15),
            Constraint::Length(12),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(app.focus == Focus::Table))
            .title(format!(" Vehicles ({}) ", app.rows.len())),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let hint = match app.focus {
        Focus::Field(_) => "Tab: next field | Enter: add | Esc: quit",
        Focus::Search => "Type to filter | Enter: go to table | Tab: next | Esc: quit",
        Focus::Table => "j/k: move | d: delete | Tab: next | q/Esc: quit",
    };

    let status = Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray)))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(status, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
