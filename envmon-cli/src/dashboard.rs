//! Terminal dashboard: current-value cards plus a trend chart of the window.

use std::{io, sync::Arc, time::Duration};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use envmon_core::{
    Config, DashboardState, HistoryEntry, Poller, ServerClient, Snapshot, codes,
};
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, BorderType, Chart, Dataset, GraphType, Paragraph, Wrap},
};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

mod colors {
    use ratatui::style::Color;

    pub const TEMPERATURE: Color = Color::Rgb(59, 130, 246);
    pub const HUMIDITY: Color = Color::Rgb(34, 197, 94);
    pub const PRESSURE: Color = Color::Rgb(168, 85, 247);
    pub const CONDITION: Color = Color::Rgb(249, 115, 22);
    pub const ERROR: Color = Color::Rgb(248, 113, 113);
    pub const MUTED: Color = Color::Rgb(148, 163, 184);
}

/// Static text around the live data.
#[derive(Debug, Clone)]
pub struct View {
    pub location_name: String,
    pub interval: Duration,
}

/// Poll the configured server and draw until the user quits.
pub async fn run(config: &Config) -> Result<()> {
    let source = Arc::new(ServerClient::new(
        &config.poll.server_url,
        config.poll.request_timeout(),
    )?);
    let (tx, rx) = watch::channel(DashboardState::default());
    let token = CancellationToken::new();
    let poller = tokio::spawn(Poller::new(source, config.poll.interval()).run(token.clone(), tx));

    let view = View {
        location_name: config.location.name.clone(),
        interval: config.poll.interval(),
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &rx, &view);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    token.cancel();
    if let Err(err) = poller.await {
        tracing::error!(error = %err, "Poller task failed");
    }

    result
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    rx: &watch::Receiver<DashboardState>,
    view: &View,
) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, &rx.borrow(), view))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c');
                if ctrl_c || matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                    return Ok(());
                }
            }
        }
    }
}

pub fn render(f: &mut Frame, state: &DashboardState, view: &View) {
    let area = f.area();
    let banner_height = if state.error.is_some() { 3 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Header
            Constraint::Length(banner_height), // Error banner
            Constraint::Length(5),             // Cards
            Constraint::Min(0),                // Chart
            Constraint::Length(1),             // Footer
        ])
        .split(area);

    render_header(f, state, view, chunks[0]);

    if let Some(err) = &state.error {
        let banner = Paragraph::new(err.as_str())
            .style(Style::default().fg(colors::ERROR))
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(colors::ERROR)),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(banner, chunks[1]);
    }

    match &state.current {
        Some(current) => {
            render_cards(f, current, chunks[2]);
            if !state.history.is_empty() {
                render_chart(f, &state.history, chunks[3]);
            }
        }
        None if state.is_loading() => {
            let loading = Paragraph::new("Loading…")
                .alignment(Alignment::Center)
                .style(Style::default().fg(colors::MUTED));
            f.render_widget(loading, chunks[2]);
        }
        None => {}
    }

    let footer = format!(
        "Data updates every {} seconds • q to quit",
        view.interval.as_secs_f64()
    );
    f.render_widget(
        Paragraph::new(footer)
            .alignment(Alignment::Center)
            .style(Style::default().fg(colors::MUTED)),
        chunks[4],
    );
}

fn render_header(f: &mut Frame, state: &DashboardState, view: &View, area: Rect) {
    let (name, coords) = match &state.location {
        Some(loc) => (
            loc.name.as_str(),
            format!(
                " ({}, {})",
                hemisphere(loc.latitude, 'N', 'S'),
                hemisphere(loc.longitude, 'E', 'W')
            ),
        ),
        None => (view.location_name.as_str(), String::new()),
    };
    let header = Line::from(vec![
        Span::styled(
            format!("{name} Environmental Monitor"),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(coords, Style::default().fg(colors::MUTED)),
    ]);
    f.render_widget(Paragraph::new(header), area);
}

/// `-33.8688` with ('N', 'S') reads as `33.8688°S`.
fn hemisphere(value: f64, positive: char, negative: char) -> String {
    let letter = if value < 0.0 { negative } else { positive };
    format!("{:.4}°{letter}", value.abs())
}

fn card<'a>(title: &'a str, value: String, caption: String, color: Color) -> Paragraph<'a> {
    Paragraph::new(vec![
        Line::from(Span::styled(
            value,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(caption, Style::default().fg(color))),
    ])
    .block(
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color))
            .title(Span::styled(title, Style::default().fg(color))),
    )
}

fn render_cards(f: &mut Frame, current: &Snapshot, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let observed = current
        .timestamp
        .split_once('T')
        .map_or(current.timestamp.as_str(), |(_, time)| time);

    f.render_widget(
        card(
            "Temperature",
            format!("{:.1}°C", current.temperature),
            observed.to_string(),
            colors::TEMPERATURE,
        ),
        cols[0],
    );
    f.render_widget(
        card(
            "Humidity",
            format!("{:.1}%", current.humidity),
            "Relative humidity".to_string(),
            colors::HUMIDITY,
        ),
        cols[1],
    );
    f.render_widget(
        card(
            "Pressure",
            format!("{:.1}", current.pressure),
            "hPa".to_string(),
            colors::PRESSURE,
        ),
        cols[2],
    );
    f.render_widget(
        card(
            "Condition",
            codes::describe(current.weather_code).to_string(),
            format!("Code: {}", current.weather_code),
            colors::CONDITION,
        ),
        cols[3],
    );
}

/// Chart-ready points. Pressure lives on a different scale, so it is mapped
/// linearly onto the temperature/humidity range.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub temperature: Vec<(f64, f64)>,
    pub humidity: Vec<(f64, f64)>,
    pub pressure: Vec<(f64, f64)>,
    pub y_bounds: [f64; 2],
    /// Actual pressure min/max behind the scaled series.
    pub pressure_range: (f64, f64),
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

pub fn chart_series(history: &[HistoryEntry]) -> ChartSeries {
    let points = |get: fn(&HistoryEntry) -> f64| -> Vec<(f64, f64)> {
        history
            .iter()
            .enumerate()
            .map(|(i, e)| (i as f64, get(e)))
            .filter(|(_, v)| v.is_finite())
            .collect()
    };

    let temperature = points(|e| e.temperature);
    let humidity = points(|e| e.humidity);

    let (lo, hi) = bounds(temperature.iter().chain(&humidity).map(|p| p.1)).unwrap_or((0.0, 100.0));
    let (lo, hi) = if hi - lo < 1.0 { (lo - 1.0, hi + 1.0) } else { (lo, hi) };

    let pressure_range = bounds(history.iter().map(|e| e.pressure)).unwrap_or((0.0, 0.0));
    let (plo, phi) = pressure_range;
    let pressure = points(|e| e.pressure)
        .into_iter()
        .map(|(x, p)| {
            let t = if phi > plo { (p - plo) / (phi - plo) } else { 0.5 };
            (x, lo + t * (hi - lo))
        })
        .collect();

    ChartSeries {
        temperature,
        humidity,
        pressure,
        y_bounds: [lo, hi],
        pressure_range,
    }
}

fn render_chart(f: &mut Frame, history: &[HistoryEntry], area: Rect) {
    let series = chart_series(history);
    let (plo, phi) = series.pressure_range;
    let pressure_label = format!("pressure ({plo:.1}–{phi:.1} hPa)");

    let datasets = vec![
        Dataset::default()
            .name("temperature")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(colors::TEMPERATURE))
            .data(&series.temperature),
        Dataset::default()
            .name("humidity")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(colors::HUMIDITY))
            .data(&series.humidity),
        Dataset::default()
            .name(pressure_label)
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(colors::PRESSURE))
            .data(&series.pressure),
    ];

    let first = history.first().map_or("", |e| e.timestamp.as_str());
    let last = history.last().map_or("", |e| e.timestamp.as_str());
    let [lo, hi] = series.y_bounds;

    let chart = Chart::new(datasets)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .title("Trend"),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(colors::MUTED))
                .bounds([0.0, (history.len().saturating_sub(1)).max(1) as f64])
                .labels(vec![first.to_string(), last.to_string()]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(colors::MUTED))
                .bounds([lo, hi])
                .labels(vec![format!("{lo:.1}"), format!("{hi:.1}")]),
        );

    f.render_widget(chart, area);
}
