//! Ratatui-based terminal dashboard.
//!
//! The TUI provides a controls panel (data source, confidence level,
//! hypothesized mean, category filter) plus the raw table, the statistics
//! panels, and the three charts on a tab strip. Every control change re-runs
//! the shared evaluation pipeline; the memo cache makes revisiting a previous
//! setting instant.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::app::pipeline::{Evaluator, RunOutput};
use crate::domain::{
    CONFIDENCE_MAX, CONFIDENCE_MIN, CONFIDENCE_STEP, DataSource, EvalConfig, KNOWN_CATEGORIES,
    Verdict,
};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::{BarChart, BoxplotChart, HistogramChart};

/// Index layout of the controls list.
const FIELD_SOURCE: usize = 0;
const FIELD_CONFIDENCE: usize = 1;
const FIELD_MEAN: usize = 2;
const FIELD_FIRST_CATEGORY: usize = 3;
const FIELD_COUNT: usize = FIELD_FIRST_CATEGORY + KNOWN_CATEGORIES.len();

/// Default export paths for the `s`/`j` keys.
const EXPORT_CSV_PATH: &str = "sales_data.csv";
const EXPORT_JSON_PATH: &str = "sales_summary.json";

/// Start the dashboard with the given initial configuration.
pub fn run(config: EvalConfig) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::internal(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config);
    app.refresh();
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::internal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::internal(format!(
                "Failed to enter alternate screen: {e}"
            )));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Which panel the main area shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Table,
    Histogram,
    Boxplot,
    Bars,
}

impl View {
    fn next(self) -> View {
        match self {
            View::Table => View::Histogram,
            View::Histogram => View::Boxplot,
            View::Boxplot => View::Bars,
            View::Bars => View::Table,
        }
    }

    fn title(self) -> &'static str {
        match self {
            View::Table => "Sales Data",
            View::Histogram => "Distribution of Units Sold",
            View::Boxplot => "Units Sold by Category",
            View::Bars => "Total Units Sold by Category",
        }
    }
}

struct App {
    config: EvalConfig,
    evaluator: Evaluator,
    run: Option<RunOutput>,
    csv_files: Vec<PathBuf>,
    selected_field: usize,
    view: View,
    editing_mean: bool,
    mean_input: String,
    status: String,
}

impl App {
    fn new(config: EvalConfig) -> Self {
        let mut csv_files = crate::cli::picker::discover_csv_files();
        // An explicitly requested file may live outside the discovery tree;
        // keep it cyclable anyway.
        if let DataSource::File(path) = &config.source {
            if !csv_files.contains(path) {
                csv_files.insert(0, path.clone());
            }
        }

        Self {
            config,
            evaluator: Evaluator::new(),
            run: None,
            csv_files,
            selected_field: FIELD_SOURCE,
            view: View::Table,
            editing_mean: false,
            mean_input: String::new(),
            status: "Ready.".to_string(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::internal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::internal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::internal(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Handle one key press. Returns `true` to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing_mean {
            self.handle_mean_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < FIELD_COUNT - 1 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter => match self.selected_field {
                FIELD_MEAN => {
                    self.editing_mean = true;
                    self.mean_input.clear();
                    self.status =
                        "Editing hypothesized mean. Enter to apply, Esc to cancel.".to_string();
                }
                idx if idx >= FIELD_FIRST_CATEGORY => self.toggle_category(idx),
                _ => {}
            },
            KeyCode::Tab | KeyCode::Char('t') => {
                self.view = self.view.next();
            }
            KeyCode::Char('1') => self.view = View::Table,
            KeyCode::Char('2') => self.view = View::Histogram,
            KeyCode::Char('3') => self.view = View::Boxplot,
            KeyCode::Char('4') => self.view = View::Bars,
            KeyCode::Char('r') => {
                self.csv_files = crate::cli::picker::discover_csv_files();
                self.evaluator.invalidate_source(&self.config.source);
                self.refresh();
                self.status = "Reloaded.".to_string();
            }
            KeyCode::Char('s') => self.export_csv(),
            KeyCode::Char('j') => self.export_summary(),
            _ => {}
        }

        false
    }

    fn handle_mean_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing_mean = false;
                self.status = "Mean edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing_mean = false;
                self.apply_mean_input();
            }
            KeyCode::Backspace => {
                self.mean_input.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || c == '-' || c == '.' {
                    self.mean_input.push(c);
                }
            }
            _ => {}
        }
    }

    fn apply_mean_input(&mut self) {
        let trimmed = self.mean_input.trim();
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => {
                self.config.hypothesized_mean = v;
                self.refresh();
            }
            _ => {
                self.status = format!("Invalid mean '{trimmed}'.");
            }
        }
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.selected_field {
            FIELD_SOURCE => self.cycle_source(delta),
            FIELD_CONFIDENCE => {
                let next = self.config.confidence_level + delta as f64 * CONFIDENCE_STEP;
                self.config.confidence_level = next.clamp(CONFIDENCE_MIN, CONFIDENCE_MAX);
                self.refresh();
                self.status = format!("confidence: {:.2}", self.config.confidence_level);
            }
            FIELD_MEAN => {
                self.config.hypothesized_mean += delta as f64;
                self.refresh();
                self.status = format!("hypothesized mean: {:.2}", self.config.hypothesized_mean);
            }
            idx => self.toggle_category(idx),
        }
    }

    /// Move through `[sample, csv1, csv2, ...]`.
    fn cycle_source(&mut self, delta: i32) {
        let mut sources = vec![DataSource::Sample];
        sources.extend(self.csv_files.iter().cloned().map(DataSource::File));

        let current = sources
            .iter()
            .position(|s| *s == self.config.source)
            .unwrap_or(0);
        let next =
            (current as i64 + delta as i64).rem_euclid(sources.len() as i64) as usize;
        if next == current {
            return;
        }

        self.config.source = sources[next].clone();
        self.refresh();
        self.status = format!("source: {}", self.config.source.label());
    }

    fn toggle_category(&mut self, field_idx: usize) {
        let Some(&name) = KNOWN_CATEGORIES.get(field_idx - FIELD_FIRST_CATEGORY) else {
            return;
        };
        if !self.config.category_filter.remove(name) {
            self.config.category_filter.insert(name.to_string());
        }
        self.refresh();
        self.status = if self.config.category_filter.is_empty() {
            "filter: (none)".to_string()
        } else {
            let labels: Vec<&str> = self
                .config
                .category_filter
                .iter()
                .map(String::as_str)
                .collect();
            format!("filter: {}", labels.join(", "))
        };
    }

    /// Re-run the pipeline for the current inputs.
    ///
    /// A failure (unreadable or malformed CSV) lands in the status line and
    /// leaves the previous outputs on screen; the pass that produced them is
    /// still valid.
    fn refresh(&mut self) {
        match self.evaluator.evaluate(&self.config) {
            Ok(run) => {
                self.status = format!("n={} | {}", run.table.len(), self.config.source.label());
                self.run = Some(run);
            }
            Err(err) => {
                self.status = format!("Error: {err}");
            }
        }
    }

    fn export_csv(&mut self) {
        let Some(run) = &self.run else {
            self.status = "Nothing to export yet.".to_string();
            return;
        };
        let path = PathBuf::from(EXPORT_CSV_PATH);
        match crate::io::export::write_table_csv(&path, &run.table) {
            Ok(()) => self.status = format!("Wrote {}", path.display()),
            Err(err) => self.status = format!("Export failed: {err}"),
        }
    }

    fn export_summary(&mut self) {
        let Some(run) = &self.run else {
            self.status = "Nothing to export yet.".to_string();
            return;
        };
        let path = PathBuf::from(EXPORT_JSON_PATH);
        match crate::io::summary::write_summary_json(&path, run, &self.config) {
            Ok(()) => self.status = format!("Wrote {}", path.display()),
            Err(err) => self.status = format!("Export failed: {err}"),
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("sales", Style::default().fg(Color::Cyan)),
            Span::raw(" — sales data analysis dashboard"),
        ]));

        let n = self.run.as_ref().map(|r| r.table.len()).unwrap_or(0);
        let filter = if self.config.category_filter.is_empty() {
            "all".to_string()
        } else {
            let labels: Vec<&str> = self
                .config
                .category_filter
                .iter()
                .map(String::as_str)
                .collect();
            labels.join("+")
        };
        lines.push(Line::from(Span::styled(
            format!(
                "source: {} | n={n} | confidence: {:.0}% | H0 mean: {:.2} | filter: {filter}",
                self.config.source.label(),
                self.config.confidence_level * 100.0,
                self.config.hypothesized_mean,
            ),
            Style::default().fg(Color::Gray),
        )));

        if let Some(run) = &self.run {
            lines.push(Line::from(Span::styled(
                run.inference.verdict.sentence(),
                Style::default().fg(verdict_color(run.inference.verdict)),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(36), Constraint::Min(0)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(FIELD_COUNT as u16 + 2),
                Constraint::Min(0),
            ])
            .split(chunks[0]);

        self.draw_controls(frame, left[0]);
        self.draw_stats(frame, left[1]);
        self.draw_main(frame, chunks[1]);
    }

    fn draw_controls(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut items = Vec::with_capacity(FIELD_COUNT);
        items.push(ListItem::new(format!(
            "Source: {}",
            self.config.source.label()
        )));
        items.push(ListItem::new(format!(
            "Confidence: {:.2}",
            self.config.confidence_level
        )));
        let mean_label = if self.editing_mean {
            format!("H0 mean: {}_", self.mean_input)
        } else {
            format!("H0 mean: {:.2}", self.config.hypothesized_mean)
        };
        items.push(ListItem::new(mean_label));
        for name in KNOWN_CATEGORIES {
            let mark = if self.config.category_filter.contains(name) {
                "[x]"
            } else {
                "[ ]"
            };
            items.push(ListItem::new(format!("{mark} {name}")));
        }

        let list = List::new(items)
            .block(Block::default().title("Controls").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_stats(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Statistics").borders(Borders::ALL);

        let Some(run) = &self.run else {
            let p = Paragraph::new("Waiting for data...")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(p, area);
            return;
        };

        let s = &run.summary;
        let inference = &run.inference;
        let mut lines = vec![
            Line::from(format!("count  : {}", s.count)),
            Line::from(format!("mean   : {}", fmt_stat(s.mean))),
            Line::from(format!("median : {}", fmt_stat(s.median))),
            Line::from(format!("mode   : {}", fmt_stat(s.mode))),
            Line::from(format!("std    : {}", fmt_stat(s.std))),
            Line::from(format!(
                "range  : [{}, {}]",
                fmt_stat(s.min),
                fmt_stat(s.max)
            )),
            Line::from(""),
        ];

        if inference.interval.is_defined() {
            lines.push(Line::from(format!(
                "{:.0}% CI: ({:.2}, {:.2})",
                inference.interval.level * 100.0,
                inference.interval.lower,
                inference.interval.upper,
            )));
        } else {
            lines.push(Line::from(format!(
                "{:.0}% CI: insufficient data",
                inference.interval.level * 100.0
            )));
        }
        lines.push(Line::from(format!(
            "t = {} | p = {}",
            fmt_test(inference.test.t_stat),
            fmt_test(inference.test.p_value),
        )));
        lines.push(Line::from(Span::styled(
            verdict_short(inference.verdict),
            Style::default()
                .fg(verdict_color(inference.verdict))
                .add_modifier(Modifier::BOLD),
        )));

        let p = Paragraph::new(Text::from(lines)).block(block);
        frame.render_widget(p, area);
    }

    fn draw_main(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = format!(
            "[1] Table  [2] Histogram  [3] Boxplot  [4] Bars — {}",
            self.view.title()
        );
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("Waiting for data...")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        match self.view {
            View::Table => self.draw_table(frame, inner, run),
            View::Histogram => frame.render_widget(
                HistogramChart {
                    spec: &run.histogram,
                },
                inner,
            ),
            View::Boxplot => frame.render_widget(BoxplotChart { spec: &run.boxplot }, inner),
            View::Bars => frame.render_widget(BarChart { spec: &run.bars }, inner),
        }
    }

    fn draw_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect, run: &RunOutput) {
        let header = format!(
            "{:>6} {:<18} {:<12} {:>10} {:<10}",
            "id", "product", "category", "units_sold", "sale_date"
        );
        let mut items = vec![ListItem::new(Span::styled(
            header,
            Style::default().add_modifier(Modifier::BOLD),
        ))];

        for r in &run.table.records {
            let id = r
                .product_id
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string());
            let date = r
                .sale_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            items.push(ListItem::new(format!(
                "{:>6} {:<18} {:<12} {:>10} {:<10}",
                id,
                truncate(r.product_name.as_deref().unwrap_or("-"), 18),
                truncate(&r.category, 12),
                r.units_sold,
                date,
            )));
        }

        if run.table.is_empty() {
            items.push(ListItem::new(Span::styled(
                "(no rows match the current filter)",
                Style::default().fg(Color::Yellow),
            )));
        }

        frame.render_widget(List::new(items), area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help =
            "↑/↓ select  ←/→ adjust  Enter edit/toggle  Tab view  s csv  j json  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn verdict_color(verdict: Verdict) -> Color {
    match verdict {
        Verdict::SignificantlyDifferent => Color::Green,
        Verdict::NotSignificantlyDifferent => Color::Cyan,
        Verdict::InsufficientData => Color::Yellow,
    }
}

fn verdict_short(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::SignificantlyDifferent => "significantly different",
        Verdict::NotSignificantlyDifferent => "not significantly different",
        Verdict::InsufficientData => "insufficient data",
    }
}

fn fmt_stat(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.2}")
    }
}

fn fmt_test(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.4}")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    s.chars().take(max.saturating_sub(1)).collect::<String>() + "."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_cycle_covers_all_panels() {
        let mut view = View::Table;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(view);
            view = view.next();
        }
        assert_eq!(view, View::Table);
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn category_toggle_round_trips() {
        let mut app = App::new(EvalConfig::default());
        app.toggle_category(FIELD_FIRST_CATEGORY);
        assert!(app.config.category_filter.contains(KNOWN_CATEGORIES[0]));
        app.toggle_category(FIELD_FIRST_CATEGORY);
        assert!(app.config.category_filter.is_empty());
    }

    #[test]
    fn confidence_clamps_to_slider_range() {
        let mut app = App::new(EvalConfig::default());
        app.selected_field = FIELD_CONFIDENCE;
        for _ in 0..10 {
            app.adjust_field(1);
        }
        assert!((app.config.confidence_level - CONFIDENCE_MAX).abs() < 1e-9);
        for _ in 0..40 {
            app.adjust_field(-1);
        }
        assert!((app.config.confidence_level - CONFIDENCE_MIN).abs() < 1e-9);
    }

    #[test]
    fn parse_failure_keeps_previous_run() {
        let mut app = App::new(EvalConfig::default());
        app.refresh();
        assert!(app.run.is_some());

        app.config.source = DataSource::File(PathBuf::from("no-such-file.csv"));
        app.refresh();
        assert!(app.status.starts_with("Error:"), "{}", app.status);
        assert!(app.run.is_some(), "previous outputs must stay rendered");
    }
}
