//! Ratatui-based terminal UI.
//!
//! The TUI provides a settings panel for choosing a sector, date range,
//! granularity, and forecast toggle, then renders KPI cards, the trend insight,
//! and the price chart. The dataset is loaded once before the UI starts.

use std::io;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use crate::app::pipeline::{ViewOutput, ViewRequest, build_view, resolve_criteria};
use crate::cli::ViewArgs;
use crate::data::MemoizedDataset;
use crate::domain::{Dataset, FilterCriteria, Granularity, shift_months};
use crate::error::AppError;
use crate::forecast::SeasonalTrendForecaster;
use crate::report::{ChartSpec, present_kpis};

mod plotters_chart;

use plotters_chart::PriceTrendChart;

const FIELD_COUNT: usize = 5;
const FIELD_SECTOR: usize = 0;
const FIELD_START: usize = 1;
const FIELD_END: usize = 2;
const FIELD_GRANULARITY: usize = 3;
const FIELD_FORECAST: usize = 4;

/// Start the TUI.
pub fn run(args: ViewArgs) -> Result<(), AppError> {
    // Load before entering the alternate screen.
    let memo = crate::app::open_dataset(&args.source);
    memo.require()?;
    let mut app = App::new(memo, &args)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::data(format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::data(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::data(format!("Failed to enter alternate screen: {e}")));
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
    memo: MemoizedDataset,
    sectors: Vec<String>,
    sector_idx: usize,
    start: NaiveDate,
    end: NaiveDate,
    granularity: Granularity,
    forecast: bool,
    selected_field: usize,
    status: String,
    forecaster: SeasonalTrendForecaster,
    view: Option<ViewOutput>,
    export_chart: Option<std::path::PathBuf>,
}

impl App {
    fn new(memo: MemoizedDataset, args: &ViewArgs) -> Result<Self, AppError> {
        let dataset = memo.require()?;
        let criteria = resolve_criteria(dataset, args.sector.as_deref(), args.start, args.end)?;
        let sectors = dataset.sectors();
        let sector_idx = sectors.iter().position(|s| *s == criteria.sector).unwrap_or(0);
        let status = format!("Loaded {} rows for {}.", dataset.len(), memo.region());

        let mut app = Self {
            memo,
            sectors,
            sector_idx,
            start: criteria.start,
            end: criteria.end,
            granularity: args.granularity,
            forecast: args.forecast,
            selected_field: 0,
            status,
            forecaster: SeasonalTrendForecaster::default(),
            view: None,
            export_chart: args.export_chart.clone(),
        };
        app.recompute();
        Ok(app)
    }

    fn dataset(&self) -> &Dataset {
        self.memo.get()
    }

    fn sector(&self) -> &str {
        self.sectors.get(self.sector_idx).map(String::as_str).unwrap_or("")
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::data(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::data(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::data(format!("Event read error: {e}")))? {
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

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_field + 1 < FIELD_COUNT {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::PageDown => self.adjust_field(-12),
            KeyCode::PageUp => self.adjust_field(12),
            KeyCode::Char('g') => {
                self.selected_field = FIELD_GRANULARITY;
                self.adjust_field(1);
            }
            KeyCode::Char('f') => {
                self.selected_field = FIELD_FORECAST;
                self.adjust_field(1);
            }
            KeyCode::Char('x') => self.export_chart(),
            _ => {}
        }
        false
    }

    /// Move the selected control by `delta` steps (months for dates).
    fn adjust_field(&mut self, delta: i32) {
        let Some((min_date, max_date)) = self.dataset().date_range() else {
            return;
        };
        match self.selected_field {
            FIELD_SECTOR => {
                let n = self.sectors.len().max(1) as i32;
                self.sector_idx = (self.sector_idx as i32 + delta.signum()).rem_euclid(n) as usize;
                self.status = format!("sector: {}", self.sector());
            }
            FIELD_START => {
                self.start = step_month(self.start, delta, min_date, self.end);
                self.status = format!("start: {}", self.start.format("%Y-%m"));
            }
            FIELD_END => {
                self.end = step_month(self.end, delta, self.start, max_date);
                self.status = format!("end: {}", self.end.format("%Y-%m"));
            }
            FIELD_GRANULARITY => {
                self.granularity = self.granularity.toggle();
                self.status = format!("granularity: {}", self.granularity.display_name());
            }
            FIELD_FORECAST => {
                self.forecast = !self.forecast;
                self.status = format!("forecast: {}", if self.forecast { "on" } else { "off" });
            }
            _ => return,
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        let criteria = match FilterCriteria::new(self.sector().to_string(), self.start, self.end) {
            Ok(c) => c,
            Err(err) => {
                self.status = err.to_string();
                return;
            }
        };
        let request = ViewRequest {
            criteria,
            granularity: self.granularity,
            forecast: self.forecast,
        };
        let view = build_view(self.memo.get(), &request, &self.forecaster);
        if self.forecast && self.granularity == Granularity::Monthly && view.forecast.is_none() {
            self.status = "Forecast unavailable for this selection.".to_string();
        }
        self.view = Some(view);
    }

    fn export_chart(&mut self) {
        let Some(view) = &self.view else {
            return;
        };
        let path = self
            .export_chart
            .clone()
            .unwrap_or_else(|| std::path::PathBuf::from("eia-chart.json"));
        self.status = match crate::io::write_chart_json(&path, &view.chart) {
            Ok(()) => format!("Wrote chart: {}", path.display()),
            Err(err) => format!("Export failed: {err}"),
        };
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_kpis(frame, chunks[1]);
        self.draw_body(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("eia", Style::default().fg(Color::Cyan)),
            Span::raw(format!(" | Energy Market Price Tracker - {}", self.memo.region())),
        ]));

        let n = self.view.as_ref().map(|v| v.filtered.len()).unwrap_or(0);
        lines.push(Line::from(Span::styled(
            format!(
                "sector: {} | {} → {} | {} | forecast: {} | n={n}",
                self.sector(),
                self.start.format("%Y-%m"),
                self.end.format("%Y-%m"),
                self.granularity.display_name(),
                if self.forecast { "on" } else { "off" },
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_kpis(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(view) = &self.view else {
            return;
        };
        let cards = present_kpis(&view.kpi);
        let constraints: Vec<Constraint> = cards
            .iter()
            .map(|_| Constraint::Ratio(1, cards.len() as u32))
            .collect();
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for ((label, value), rect) in cards.iter().zip(cols.iter()) {
            let p = Paragraph::new(Line::from(Span::styled(
                value.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .block(Block::default().title(label.as_str()).borders(Borders::ALL));
            frame.render_widget(p, *rect);
        }
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(7)])
            .split(area);

        self.draw_insight(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
        self.draw_settings(frame, chunks[2]);
    }

    fn draw_insight(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let text = match &self.view {
            Some(view) if view.kpi.is_empty() => "No data for this selection.".to_string(),
            Some(view) => view.insight.clone().unwrap_or_default(),
            None => String::new(),
        };
        let p = Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::LightBlue))
            .block(Block::default().title("Insight").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = self
            .view
            .as_ref()
            .map(|v| v.chart.title.clone())
            .unwrap_or_else(|| "Price Trend".to_string());
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(view) = self.view.as_ref().filter(|v| !v.chart.is_empty()) else {
            let msg = Paragraph::new("No data for this selection.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let (history, forecast, x_bounds, y_bounds) = chart_series(&view.chart);
        let fmt_x: fn(f64) -> String = match view.chart.granularity {
            Granularity::Monthly => fmt_axis_month,
            Granularity::Yearly => fmt_axis_year,
        };

        let (chart_rect, insets) = chart_layout(inner);
        let widget = PriceTrendChart {
            history: &history,
            forecast: &forecast,
            x_bounds,
            y_bounds,
            x_label: &view.chart.x_label,
            y_label: &view.chart.y_label,
            fmt_x,
            fmt_y: fmt_axis_price,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            let labels = AxisLabels {
                x: &view.chart.x_label,
                y: &view.chart.y_label,
                fmt_x,
            };
            draw_axis_ticks(frame, inner, chart_rect, insets, x_bounds, y_bounds, &labels);
        }
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items = vec![
            ListItem::new(format!("Sector: {}", self.sector())),
            ListItem::new(format!("Start: {}", self.start.format("%Y-%m"))),
            ListItem::new(format!("End: {}", self.end.format("%Y-%m"))),
            ListItem::new(format!("Granularity: {}", self.granularity.display_name())),
            ListItem::new(format!(
                "Forecast: {}",
                if self.forecast { "on" } else { "off" }
            )),
        ];

        let list = List::new(items)
            .block(Block::default().title("Filters").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  PgUp/PgDn ±1y  g granularity  f forecast  x export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Move `date` by `delta` months, staying within `[lo, hi]`.
fn step_month(date: NaiveDate, delta: i32, lo: NaiveDate, hi: NaiveDate) -> NaiveDate {
    let moved = shift_months(date, delta).unwrap_or(date);
    if lo > hi {
        return date;
    }
    moved.clamp(lo, hi)
}

/// Build chart series and padded bounds for Plotters.
fn chart_series(spec: &ChartSpec) -> (Vec<(f64, f64)>, Vec<(f64, f64)>, [f64; 2], [f64; 2]) {
    let history: Vec<(f64, f64)> = spec.history.iter().map(|p| (p.x, p.price)).collect();
    let forecast: Vec<(f64, f64)> = spec
        .forecast
        .iter()
        .flat_map(|f| f.iter())
        .map(|p| (p.x, p.price))
        .collect();

    let (mut x0, mut x1) = spec.x_bounds().unwrap_or((0.0, 1.0));
    if x1 <= x0 {
        x0 -= 0.5;
        x1 += 0.5;
    }

    let (mut y_min, mut y_max) = spec.y_bounds().unwrap_or((0.0, 1.0));
    if y_max <= y_min {
        y_min -= 0.5;
        y_max += 0.5;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);

    (history, forecast, [x0, x1], [y_min - pad, y_max + pad])
}

fn fmt_axis_month(v: f64) -> String {
    let months = (v * 12.0).round() as i64;
    let (year, month) = (months.div_euclid(12), months.rem_euclid(12) + 1);
    NaiveDate::from_ymd_opt(year as i32, month as u32, 1)
        .map(|d| d.format("%Y-%m").to_string())
        .unwrap_or_else(|| format!("{v:.1}"))
}

fn fmt_axis_year(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_price(v: f64) -> String {
    format!("{v:.1}")
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

struct AxisLabels<'a> {
    x: &'a str,
    y: &'a str,
    fmt_x: fn(f64) -> String,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
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
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    labels: &AxisLabels<'_>,
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = (labels.fmt_x)(x_val);
        let label_len = label.len() as u16;
        let start = x.saturating_sub((label.len() / 2) as u16);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
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

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_axis_price(y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label.len() as u16);
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

    let x_label = Paragraph::new(labels.x)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new(labels.y)
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}
