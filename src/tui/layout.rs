//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Block, Borders, Chart, Clear, Dataset, Gauge, List, ListItem, Paragraph, Tabs,
};

use crate::dashboard::emergency::StopState;
use crate::dashboard::render::{GaugeReading, Scene};
use crate::dashboard::view::Panel;

use super::style;

/// Narrowest gauge that still fits its label.
const MIN_GAUGE_WIDTH: u16 = 12;
/// Borders plus one bar row.
const MIN_GAUGE_HEIGHT: u16 = 3;

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, scene: &Scene<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(1), // nav
            Constraint::Length(3), // gauges
            Constraint::Min(8),    // chart + KPIs
            Constraint::Length(7), // packs + alerts
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, scene, chunks[0]);
    render_nav(frame, scene, chunks[1]);
    render_gauges(frame, scene, chunks[2]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[3]);
    render_chart(frame, scene, body[0]);
    render_kpis(frame, scene, body[1]);

    let lists = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[4]);
    render_packs(frame, scene, lists[0]);
    render_alerts(frame, scene, lists[1]);

    render_footer(frame, chunks[5]);

    if let Some(prompt) = scene.emergency_prompt {
        render_dialog(frame, scene.emergency, prompt);
    }
}

/// Header bar: title, clock, link status, tick count.
fn render_header(frame: &mut Frame, scene: &Scene<'_>, area: Rect) {
    let link_color = if scene.connection == "Connected" {
        style::LINK_UP
    } else {
        style::LINK_DOWN
    };
    let header = Line::from(vec![
        Span::styled(
            " MICROGRID ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {} │ ", scene.clock)),
        Span::styled(
            format!("● {}", scene.connection),
            Style::default().fg(link_color),
        ),
        Span::raw(format!(" │ tick {}", scene.tick)),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn render_nav(frame: &mut Frame, scene: &Scene<'_>, area: Rect) {
    let titles: Vec<Line> = scene
        .nav
        .iter()
        .enumerate()
        .map(|(i, item)| Line::from(format!("{}:{}", i + 1, item.panel.title())))
        .collect();
    let selected = scene.nav.iter().position(|n| n.active).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(style::NAV_ACTIVE)
                .add_modifier(Modifier::BOLD),
        )
        .divider("│");
    frame.render_widget(tabs, area);
}

/// Splits `area` into one slot per gauge. A slot too small to draw a gauge
/// is `None`.
fn gauge_slots(area: Rect) -> [Option<Rect>; 4] {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);
    std::array::from_fn(|i| {
        cols.get(i)
            .copied()
            .filter(|r| r.width >= MIN_GAUGE_WIDTH && r.height >= MIN_GAUGE_HEIGHT)
    })
}

fn render_gauges(frame: &mut Frame, scene: &Scene<'_>, area: Rect) {
    for (slot, reading) in gauge_slots(area).into_iter().zip(scene.gauges.iter()) {
        if let Some(rect) = slot {
            frame.render_widget(gauge(reading), rect);
        }
    }
}

fn gauge(reading: &GaugeReading) -> Gauge<'static> {
    let color = style::gauge_color(reading.kind, reading.value);
    Gauge::default()
        .block(
            Block::default()
                .title(format!(" {} ", reading.kind.title()))
                .borders(Borders::ALL),
        )
        .gauge_style(Style::default().fg(color))
        .ratio(reading.ratio())
        .label(format!("{:.1} {}", reading.value, reading.unit))
}

/// Generation vs demand over the sliding window.
fn render_chart(frame: &mut Frame, scene: &Scene<'_>, area: Rect) {
    let generation: Vec<(f64, f64)> = scene
        .chart
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.generation))
        .collect();
    let demand: Vec<(f64, f64)> = scene
        .chart
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.demand))
        .collect();

    let y_bounds = style::auto_bounds_y(&generation, &demand);
    let x_hi = (scene.chart.len().saturating_sub(1) as f64).max(1.0);

    let datasets = vec![
        Dataset::default()
            .name("Generation")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(style::GENERATION_COLOR))
            .data(&generation),
        Dataset::default()
            .name("Demand")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(style::DEMAND_COLOR))
            .data(&demand),
    ];

    let first = scene.chart.front().map_or("", |p| p.label.as_str());
    let last = scene.chart.back().map_or("", |p| p.label.as_str());

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(" Generation vs Demand ")
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .bounds([0.0, x_hi])
                .labels(vec![first.to_string(), last.to_string()]),
        )
        .y_axis(
            Axis::default()
                .title("kW")
                .bounds(y_bounds)
                .labels(vec![
                    format!("{:.1}", y_bounds[0]),
                    format!("{:.1}", y_bounds[1]),
                ]),
        );

    frame.render_widget(chart, area);
}

/// KPI fields of the active panel.
fn render_kpis(frame: &mut Frame, scene: &Scene<'_>, area: Rect) {
    let lines: Vec<Line> = scene
        .kpis()
        .map(|(field, value)| {
            Line::from(vec![
                Span::styled(
                    format!("  {:<20}", field.label()),
                    Style::default().fg(style::FOOTER_FG),
                ),
                Span::raw(value),
            ])
        })
        .collect();
    let block = Block::default()
        .title(format!(" {} ", scene.panel))
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_packs(frame: &mut Frame, scene: &Scene<'_>, area: Rect) {
    let items: Vec<ListItem> = scene
        .packs()
        .iter()
        .map(|p| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("  Pack {} ", p.id)),
                Span::styled(
                    format!("{:>5.1}%", p.soc),
                    Style::default().fg(style::soc_color(p.soc)),
                ),
                Span::raw(format!(
                    "  SoH {:>4.1}%  {:>4.1}°C  {:>5.2} V",
                    p.soh, p.temp, p.voltage
                )),
            ]))
        })
        .collect();
    let highlight = scene.panel == Panel::Storage;
    frame.render_widget(
        List::new(items).block(titled_block(" Battery Packs ", highlight)),
        area,
    );
}

fn render_alerts(frame: &mut Frame, scene: &Scene<'_>, area: Rect) {
    let items: Vec<ListItem> = if scene.alerts().is_empty() {
        vec![ListItem::new("  No active alerts")]
    } else {
        scene
            .alerts()
            .iter()
            .map(|a| {
                ListItem::new(Line::from(vec![
                    Span::raw(format!("  {} ", a.time)),
                    Span::styled(
                        format!("{:<7}", a.kind.to_string()),
                        Style::default().fg(style::alert_color(a.kind)),
                    ),
                    Span::raw(format!(" {}", a.message)),
                ]))
            })
            .collect()
    };
    let highlight = scene.panel == Panel::Alerts;
    frame.render_widget(
        List::new(items).block(titled_block(" Alerts ", highlight)),
        area,
    );
}

fn titled_block(title: &'static str, highlight: bool) -> Block<'static> {
    let block = Block::default().title(title).borders(Borders::ALL);
    if highlight {
        block.border_style(Style::default().fg(style::NAV_ACTIVE))
    } else {
        block
    }
}

/// Centered emergency-stop dialog over the rest of the frame.
fn render_dialog(frame: &mut Frame, state: StopState, prompt: &str) {
    let area = centered(frame.area(), 50, 5);
    let title = match state {
        StopState::Acknowledged => " Acknowledged ",
        _ => " Emergency Stop ",
    };
    let dialog = Paragraph::new(Line::from(Span::styled(
        prompt,
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(style::EMERGENCY)),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(dialog, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

/// Footer with keybinding hints.
fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " q:Quit  1-5:Panel  Tab:Next  e:Emergency stop",
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}
