//! Ratatui rendering for the MarketPlus console - header, momentum leaders, breakout grid

use chrono::Local;
use ngta_breakout::{
    calc::format_price, BoardView, Direction, LeaderRow, ScannerStatus, Snapshot, SortOrder,
    TableView, Timeframe,
};
use ratatui::{
    layout::{Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use super::{app::ConsoleApp, feed::FeedStatus};

const C_BUY: Color = Color::Rgb(100, 220, 100);
const C_SELL: Color = Color::Rgb(220, 100, 100);
const C_NEUTRAL: Color = Color::Rgb(180, 180, 100);
const C_DIM: Color = Color::Rgb(120, 120, 120);
const C_BRIGHT: Color = Color::Rgb(220, 220, 220);
const C_ACCENT: Color = Color::Rgb(100, 180, 220);

const TABLES_PER_ROW: usize = 3;

fn direction_color(direction: Direction) -> Color {
    match direction {
        Direction::Bullish => C_BUY,
        Direction::Bearish => C_SELL,
    }
}

fn change_color(change_pct: f64) -> Color {
    if change_pct > 0.0 {
        C_BUY
    } else if change_pct < 0.0 {
        C_SELL
    } else {
        C_DIM
    }
}

fn feed_status_color(status: FeedStatus) -> Color {
    match status {
        FeedStatus::Live => C_BUY,
        FeedStatus::Loading | FeedStatus::Connecting => C_ACCENT,
        FeedStatus::Stale => C_NEUTRAL,
        FeedStatus::Offline => C_SELL,
    }
}

fn scanner_status_color(status: ScannerStatus) -> Color {
    match status {
        ScannerStatus::Running => C_BUY,
        ScannerStatus::Stopped => C_SELL,
        ScannerStatus::Unknown => C_DIM,
    }
}

/// Render the whole console for the latest snapshot, if one has arrived.
pub fn render_console(
    f: &mut Frame,
    app: &ConsoleApp,
    snapshot: Option<&Snapshot>,
    status: FeedStatus,
) {
    let chunks = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(8),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, chunks[0], snapshot, status);

    match snapshot {
        Some(snapshot) => {
            let view = app.view(snapshot);
            render_leaderboards(f, chunks[1], &view);
            render_breakout_grid(f, chunks[2], &view, app.focused());
        }
        None => render_waiting(f, chunks[1].union(chunks[2]), status),
    }

    render_footer(f, chunks[3]);
}

fn render_header(f: &mut Frame, area: Rect, snapshot: Option<&Snapshot>, status: FeedStatus) {
    let block = Block::default()
        .title(" NGTA MARKETPLUS ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(feed_status_color(status)));

    let separator = || Span::styled("  │  ", Style::default().fg(C_DIM));
    let mut spans = vec![
        Span::styled("Feed ", Style::default().fg(C_DIM)),
        Span::styled(
            status.as_str(),
            Style::default()
                .fg(feed_status_color(status))
                .add_modifier(Modifier::BOLD),
        ),
    ];

    if let Some(snapshot) = snapshot {
        let scanner = snapshot.scanner_status();
        let updated = snapshot
            .received_at()
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string();

        spans.extend([
            separator(),
            Span::styled("Scanner ", Style::default().fg(C_DIM)),
            Span::styled(scanner.as_str(), Style::default().fg(scanner_status_color(scanner))),
            separator(),
            Span::styled("Updated ", Style::default().fg(C_DIM)),
            Span::styled(updated, Style::default().fg(C_BRIGHT)),
            separator(),
            Span::styled(
                format!("{} instruments", snapshot.len()),
                Style::default().fg(C_BRIGHT),
            ),
        ]);
    }

    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_waiting(f: &mut Frame, area: Rect, status: FeedStatus) {
    let message = match status {
        FeedStatus::Offline => "Market data service unreachable, retrying...",
        _ => "Waiting for market data service...",
    };
    let block = Block::default().borders(Borders::ALL);
    let placeholder = Paragraph::new(Line::from(Span::styled(
        message,
        Style::default().fg(C_DIM),
    )))
    .block(block);
    f.render_widget(placeholder, area);
}

fn render_leaderboards(f: &mut Frame, area: Rect, view: &BoardView) {
    let chunks = Layout::default()
        .direction(LayoutDirection::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_leader_panel(f, chunks[0], " TOP GAINERS ", &view.leaderboards.gainers, C_BUY);
    render_leader_panel(f, chunks[1], " TOP LOSERS ", &view.leaderboards.losers, C_SELL);
}

fn render_leader_panel(f: &mut Frame, area: Rect, title: &str, rows: &[LeaderRow], color: Color) {
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    if rows.is_empty() {
        let empty = Paragraph::new(Span::styled("No movers", Style::default().fg(C_DIM)));
        f.render_widget(empty.block(block), area);
        return;
    }

    let rows = rows.iter().map(|row| {
        let volume_style = if row.high_volume {
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_DIM)
        };

        Row::new(vec![
            Cell::from(row.symbol.to_string())
                .style(Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD)),
            Cell::from(format!("₹{}", format_price(row.last_price)))
                .style(Style::default().fg(C_BRIGHT)),
            Cell::from(row.change_label()).style(Style::default().fg(change_color(row.change_pct))),
            Cell::from(format!("Vol {}", row.volume_label())).style(volume_style),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Min(12),
            Constraint::Length(12),
            Constraint::Length(9),
            Constraint::Length(11),
        ],
    )
    .block(block);

    f.render_widget(table, area);
}

fn render_breakout_grid(f: &mut Frame, area: Rect, view: &BoardView, focused: Timeframe) {
    let row_count = view.tables.len().div_ceil(TABLES_PER_ROW);
    let rows = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints(vec![Constraint::Ratio(1, row_count.max(1) as u32); row_count])
        .split(area);

    for (row_area, tables) in rows.iter().zip(view.tables.chunks(TABLES_PER_ROW)) {
        let columns = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints(vec![Constraint::Ratio(1, TABLES_PER_ROW as u32); TABLES_PER_ROW])
            .split(*row_area);

        for (column_area, table) in columns.iter().zip(tables) {
            render_breakout_table(f, *column_area, table, table.timeframe == focused);
        }
    }
}

fn render_breakout_table(f: &mut Frame, area: Rect, view: &TableView, focused: bool) {
    let group = view.timeframe.config().group;
    let sort = match view.sort {
        SortOrder::Descending => "Chg ▼",
        SortOrder::Ascending => "Chg ▲",
    };
    let title = format!(
        " {} · {} · {} · {} ",
        view.title,
        group.heading(),
        view.filter.label(),
        sort
    );

    let border_style = if focused {
        Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(C_DIM)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    if view.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(Span::styled(view.description, Style::default().fg(C_DIM))),
            Line::from(Span::styled(view.empty_message(), Style::default().fg(C_DIM))),
        ]);
        f.render_widget(empty.block(block), area);
        return;
    }

    let header = Row::new(["Symbol", "LTP", "Chg", "Signal", "Pivot", "Dist"].map(|label| {
        Cell::from(label).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    }))
    .height(1);

    let rows = view.rows.iter().map(|row| {
        let color = direction_color(row.direction());
        let mut symbol_style = Style::default().fg(C_BRIGHT);
        if row.high_strength {
            symbol_style = symbol_style.add_modifier(Modifier::BOLD);
        }

        Row::new(vec![
            Cell::from(row.symbol.to_string()).style(symbol_style),
            Cell::from(format_price(row.last_price)).style(Style::default().fg(C_BRIGHT)),
            Cell::from(ngta_breakout::format_signed_pct(row.change_pct))
                .style(Style::default().fg(change_color(row.change_pct))),
            Cell::from(row.badge.to_string()).style(Style::default().fg(color)),
            Cell::from(row.pivot_phrase.clone()).style(Style::default().fg(C_DIM)),
            Cell::from(row.pivot_distance_label.clone()).style(Style::default().fg(color)),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Min(10),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(11),
            Constraint::Length(20),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(block);

    f.render_widget(table, area);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let key = |label: &'static str| Span::styled(label, Style::default().fg(C_ACCENT));
    let help = |label: &'static str| Span::styled(label, Style::default().fg(C_DIM));

    let line = Line::from(vec![
        key(" Tab/←→"),
        help(" focus  "),
        key("f"),
        help(" filter  "),
        key("1/2/3"),
        help(" all/bullish/bearish  "),
        key("s"),
        help(" sort  "),
        key("r"),
        help(" refresh  "),
        key("q"),
        help(" quit"),
    ]);

    f.render_widget(Paragraph::new(line), area);
}
