//! Ratatui-based terminal UI.
//!
//! The TUI shows the KPI cards, the sales vs last-year line chart, the YoY
//! change bar chart and the data table. Presentation settings (theme,
//! smoothing, bar width, index column) change in place; `r` reloads the input
//! and `e` exports the current dataset.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Terminal,
};
use tracing::{info, warn};

use crate::app::pipeline::{self, DashboardRun};
use crate::chart::{DashboardChart, Rgba};
use crate::domain::{DashboardConfig, TrendDirection};
use crate::error::{AppError, EXIT_TERMINAL};

mod plotters_chart;

use plotters_chart::{BarPlottersChart, LinePlottersChart};

/// Bar width step for the arrow keys, in percent.
const BAR_WIDTH_STEP: i16 = 5;

/// Start the TUI.
pub fn run(config: DashboardConfig) -> Result<(), AppError> {
    // Load before touching the terminal so input errors print normally.
    let mut app = App::new(config)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_TERMINAL, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(EXIT_TERMINAL, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(EXIT_TERMINAL, format!("Failed to enter alternate screen: {e}")));
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

struct App {
    config: DashboardConfig,
    run: DashboardRun,
    chart: DashboardChart,
    selected_row: usize,
    status: String,
}

impl App {
    fn new(config: DashboardConfig) -> Result<Self, AppError> {
        let run = pipeline::run_dashboard(&config)?;
        let chart = run.chart(&config);
        let status = format!(
            "Loaded {} row(s) from {} ({} dropped).",
            run.prepared.rows_used,
            config.source_label(),
            run.prepared.rows_dropped()
        );
        Ok(Self {
            config,
            run,
            chart,
            selected_row: 0,
            status,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_TERMINAL, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_TERMINAL, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_TERMINAL, format!("Event read error: {e}")))? {
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

    /// Apply a key press. Returns `true` to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('t') => {
                self.config.theme = self.config.theme.toggle();
                self.rebuild_chart();
                self.status = format!("theme: {}", self.config.theme.display_name());
            }
            KeyCode::Char('s') => {
                self.config.smooth_line = !self.config.smooth_line;
                self.rebuild_chart();
                self.status = format!("line: {}", if self.config.smooth_line { "spline" } else { "linear" });
            }
            KeyCode::Left => {
                self.config.adjust_bar_width(-BAR_WIDTH_STEP);
                self.rebuild_chart();
                self.status = format!("bar width: {}%", self.config.bar_width_pct);
            }
            KeyCode::Right => {
                self.config.adjust_bar_width(BAR_WIDTH_STEP);
                self.rebuild_chart();
                self.status = format!("bar width: {}%", self.config.bar_width_pct);
            }
            KeyCode::Char('i') => {
                self.config.show_index = !self.config.show_index;
                self.status = format!("index column: {}", if self.config.show_index { "on" } else { "off" });
            }
            KeyCode::Up => {
                self.selected_row = self.selected_row.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_row + 1 < self.run.dataset().len() {
                    self.selected_row += 1;
                }
            }
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('e') => self.export(),
            _ => {}
        }
        false
    }

    fn rebuild_chart(&mut self) {
        self.chart = self.run.chart(&self.config);
    }

    /// Re-read the input. On failure the previous dataset stays on screen.
    fn reload(&mut self) {
        match pipeline::run_dashboard(&self.config) {
            Ok(run) => {
                self.status = format!(
                    "Reloaded {} row(s) ({} dropped).",
                    run.prepared.rows_used,
                    run.prepared.rows_dropped()
                );
                self.run = run;
                self.selected_row = self.selected_row.min(self.run.dataset().len().saturating_sub(1));
                self.rebuild_chart();
            }
            Err(err) => {
                warn!(error = %err, "reload failed");
                self.status = format!("Reload failed: {err}");
            }
        }
    }

    fn export(&mut self) {
        let path = export_path(&self.config);
        match crate::io::export::write_dataset_csv(&path, self.run.dataset(), self.config.show_index) {
            Ok(()) => {
                info!(path = %path.display(), "exported from TUI");
                self.status = format!("Exported: {}", path.display());
            }
            Err(err) => {
                warn!(error = %err, "export failed");
                self.status = format!("Export failed: {err}");
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let theme = ThemeStyles::new(&self.chart);
        frame.render_widget(Block::default().style(theme.base), size);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Percentage(45),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_kpis(frame, chunks[0], &theme);
        self.draw_line_chart(frame, chunks[1], &theme);

        let lower = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[2]);
        self.draw_bar_chart(frame, lower[0], &theme);
        self.draw_table(frame, lower[1], &theme);

        self.draw_footer(frame, chunks[3], &theme);
    }

    fn draw_kpis(&self, frame: &mut ratatui::Frame<'_>, area: Rect, theme: &ThemeStyles) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(area);

        let cards = crate::report::kpi_cards(&self.run.kpis, &self.config.currency_unit);
        for (card, rect) in cards.iter().zip(cols.iter()) {
            let mut lines = vec![Line::from(Span::styled(
                card.value.clone(),
                theme.accent.add_modifier(Modifier::BOLD),
            ))];
            if let Some(detail) = &card.detail {
                let style = if card.title == "Avg YoY change" {
                    match self.run.kpis.trend_direction {
                        TrendDirection::Rising => theme.positive,
                        TrendDirection::Falling => theme.negative,
                    }
                } else {
                    theme.muted
                };
                lines.push(Line::from(Span::styled(detail.clone(), style)));
            }

            let p = Paragraph::new(Text::from(lines))
                .block(Block::default().title(card.title).borders(Borders::ALL).border_style(theme.border));
            frame.render_widget(p, *rect);
        }
    }

    fn draw_line_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect, theme: &ThemeStyles) {
        let block = Block::default()
            .title(format!("{}  (sales ─, last year ┄)", self.chart.line.title))
            .borders(Borders::ALL)
            .border_style(theme.border);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if self.chart.line.categories.is_empty() {
            frame.render_widget(no_data(theme), inner);
            return;
        }

        let (chart_rect, insets) = chart_layout(inner);
        let widget = LinePlottersChart {
            spec: &self.chart.line,
            axis: self.chart.palette.axis_text,
            fmt_y: fmt_axis_millions,
        };
        frame.render_widget(widget, chart_rect);

        if let Some(insets) = insets {
            draw_axis_ticks(
                frame,
                inner,
                chart_rect,
                insets,
                &self.chart.line.categories,
                self.chart.line.y_bounds,
                theme.muted,
            );
        }
    }

    fn draw_bar_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect, theme: &ThemeStyles) {
        let block = Block::default()
            .title(format!("{}  width {}%", self.chart.bar.title, self.chart.bar.bar_width_pct))
            .borders(Borders::ALL)
            .border_style(theme.border);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if self.chart.bar.values.is_empty() {
            frame.render_widget(no_data(theme), inner);
            return;
        }

        let widget = BarPlottersChart {
            spec: &self.chart.bar,
            axis: self.chart.palette.axis_text,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect, theme: &ThemeStyles) {
        let dataset = self.run.dataset();
        let cols = dataset.columns();

        let mut header: Vec<Cell> = Vec::new();
        if self.config.show_index {
            header.push(Cell::from("#"));
        }
        header.extend(cols.as_array().into_iter().map(|h| Cell::from(h.to_string())));

        let rows = dataset.records().iter().enumerate().map(|(idx, r)| {
            let change_style = if r.change_percent >= 0.0 { theme.positive } else { theme.negative };
            let mut cells = Vec::with_capacity(5);
            if self.config.show_index {
                cells.push(Cell::from(idx.to_string()));
            }
            cells.push(Cell::from(r.period.clone()));
            cells.push(Cell::from(crate::report::format_currency(r.value, "")));
            cells.push(Cell::from(crate::report::format_currency(r.reference_value, "")));
            cells.push(Cell::from(crate::report::format_percent(r.change_percent)).style(change_style));
            Row::new(cells)
        });

        let mut widths = Vec::with_capacity(5);
        if self.config.show_index {
            widths.push(Constraint::Length(3));
        }
        widths.extend([
            Constraint::Length(9),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(8),
        ]);

        let table = Table::new(rows, widths)
            .header(Row::new(header).style(theme.accent.add_modifier(Modifier::BOLD)))
            .block(
                Block::default()
                    .title(format!("Data ({} rows)", dataset.len()))
                    .borders(Borders::ALL)
                    .border_style(theme.border),
            )
            .row_highlight_style(theme.highlight);

        let mut state = TableState::default().with_selected(if dataset.is_empty() {
            None
        } else {
            Some(self.selected_row)
        });
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect, theme: &ThemeStyles) {
        let help = "t theme  s smooth  ←/→ bar width  i index  ↑/↓ row  e export  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, theme.muted),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL).border_style(theme.border));
        frame.render_widget(p, area);
    }
}

/// Ratatui styles derived from the chart palette.
struct ThemeStyles {
    base: Style,
    border: Style,
    muted: Style,
    accent: Style,
    positive: Style,
    negative: Style,
    highlight: Style,
}

impl ThemeStyles {
    fn new(chart: &DashboardChart) -> Self {
        let p = &chart.palette;
        let base = match chart.theme {
            crate::domain::Theme::Dark => Style::default(),
            crate::domain::Theme::Light => Style::default().bg(Color::Rgb(248, 250, 252)).fg(Color::Rgb(15, 23, 42)),
        };
        Self {
            base,
            border: Style::default().fg(to_color(p.axis_line)),
            muted: Style::default().fg(to_color(p.axis_text)),
            accent: Style::default().fg(to_color(p.accent)),
            positive: Style::default().fg(to_color(p.positive)),
            negative: Style::default().fg(to_color(p.negative)),
            highlight: Style::default().fg(Color::Black).bg(to_color(p.accent)),
        }
    }
}

fn to_color(c: Rgba) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

fn no_data(theme: &ThemeStyles) -> Paragraph<'static> {
    Paragraph::new("No rows to display.")
        .style(theme.muted)
        .alignment(Alignment::Center)
}

/// Export target: next to the input file, or the current directory for the sample.
fn export_path(config: &DashboardConfig) -> PathBuf {
    let name = crate::io::export::default_export_file_name(chrono::Local::now());
    match config.input.as_deref().and_then(|p| p.parent()) {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(name),
        _ => PathBuf::from(name),
    }
}

/// `12500000` -> `12.5M`.
fn fmt_axis_millions(v: f64) -> String {
    format!("{:.1}M", v / 1_000_000.0)
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    categories: &[String],
    y_bounds: [f64; 2],
    style: Style,
) {
    // Category ticks: first, middle and last month.
    let n = categories.len();
    let picks: Vec<usize> = match n {
        0 => Vec::new(),
        1 => vec![0],
        2 => vec![0, 1],
        _ => vec![0, (n - 1) / 2, n - 1],
    };
    let y = chart.y + chart.height;
    if y < inner.y + inner.height {
        for idx in picks {
            // Categories sit at slot centres on a [-0.5, n - 0.5] axis.
            let u = (idx as f64 + 0.5) / n as f64;
            let x = chart.x + ((chart.width.saturating_sub(1)) as f64 * u).round() as u16;
            let label = &categories[idx];
            let label_len = label.chars().count() as u16;
            let start = x
                .saturating_sub(label_len / 2)
                .max(inner.x)
                .min((inner.x + inner.width).saturating_sub(label_len));
            frame.render_widget(
                Paragraph::new(label.as_str()).style(style),
                Rect {
                    x: start,
                    y,
                    width: label_len.min(inner.width),
                    height: 1,
                },
            );
        }
    }

    let ticks = 5usize;
    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_axis_millions(y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn app() -> App {
        App::new(DashboardConfig::default()).unwrap()
    }

    #[test]
    fn settings_keys_update_config_and_chart() {
        let mut app = app();
        assert!(!app.handle_key(KeyCode::Char('t')));
        assert_eq!(app.chart.theme, crate::domain::Theme::Light);

        app.handle_key(KeyCode::Char('s'));
        assert_eq!(app.chart.line.shape, crate::chart::LineShape::Linear);

        app.handle_key(KeyCode::Right);
        assert_eq!(app.chart.bar.bar_width_pct, 65);

        app.handle_key(KeyCode::Char('i'));
        assert!(app.config.show_index);

        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn row_selection_stays_in_bounds() {
        let mut app = app();
        app.handle_key(KeyCode::Up);
        assert_eq!(app.selected_row, 0);
        for _ in 0..50 {
            app.handle_key(KeyCode::Down);
        }
        assert_eq!(app.selected_row, 11);
    }

    #[test]
    fn failed_reload_keeps_previous_dataset() {
        let mut app = app();
        app.config.input = Some("/nonexistent/sales.csv".into());
        app.reload();
        assert_eq!(app.run.dataset().len(), 12);
        assert!(app.status.starts_with("Reload failed"));
    }

    #[test]
    fn draws_without_panicking() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        app.handle_key(KeyCode::Char('i'));
        app.handle_key(KeyCode::Char('t'));
        terminal.draw(|f| app.draw(f)).unwrap();
    }

    #[test]
    fn export_path_sits_next_to_input() {
        let config = DashboardConfig {
            input: Some("/data/q4/sales.csv".into()),
            ..DashboardConfig::default()
        };
        let path = export_path(&config);
        assert!(path.starts_with("/data/q4"));
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("sales_data_"));

        let sample = export_path(&DashboardConfig::default());
        assert_eq!(sample.parent(), Some(std::path::Path::new("")));
    }
}
