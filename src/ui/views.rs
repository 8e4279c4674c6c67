use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::state::{Toast, ToastKind};
use crate::types::{
    BuildingAggregate, GameSnapshot, LeaderboardEntry, PlayerState, PriceQuote, BUILDING_CATALOG,
    BUILDING_GRID_ROWS, RESOURCE_CATALOG,
};

/// Quotes in canonical catalog order, one per known resource. Entries the
/// server did not return are synthesized with zeros so the table shape never
/// changes between refreshes.
pub fn canonical_quotes(prices: &[PriceQuote]) -> Vec<PriceQuote> {
    RESOURCE_CATALOG
        .iter()
        .map(|&name| {
            prices
                .iter()
                .find(|p| p.resource == name)
                .cloned()
                .unwrap_or(PriceQuote {
                    resource: name.to_string(),
                    current_price: 0.0,
                    change_from_prev_percent: 0.0,
                    change_from_start_percent: 0.0,
                })
        })
        .collect()
}

/// Building cards in the fixed 4-4-3 order, missing entries synthesized with
/// count 0 — the grid never changes shape regardless of what subset the
/// server reported.
pub fn canonical_buildings(buildings: &[BuildingAggregate]) -> Vec<BuildingAggregate> {
    BUILDING_CATALOG
        .iter()
        .map(|&name| {
            buildings
                .iter()
                .find(|b| b.name == name)
                .cloned()
                .unwrap_or_else(|| BuildingAggregate::empty(name))
        })
        .collect()
}

/// Stand-in for the resource artwork; unknown names get the fallback glyph.
pub fn resource_glyph(name: &str) -> &'static str {
    match name {
        "дерево" => "♣",
        "железо" => "⚒",
        "зерно" => "૪",
        "золото" => "◉",
        "камень" => "●",
        "овощи" => "♠",
        "рабы" => "♟",
        "рыба" => "≈",
        "скот" => "♞",
        _ => "▫",
    }
}

pub fn building_glyph(name: &str) -> &'static str {
    match name {
        "Лесоповал" => "♣",
        "Каменоломня" => "▲",
        "Теплицы" => "⌂",
        "Трактир" => "♨",
        "Посевные поля" => "≋",
        "Рыболовня" => "≈",
        "Кузнечная" => "⚒",
        "Ферма" => "♞",
        "Постоялый двор" => "⌂",
        "Куртизанские палатки" => "♦",
        "Золотой рудник" => "◉",
        _ => "▦",
    }
}

pub fn draw_header(frame: &mut Frame, area: Rect, snapshot: &GameSnapshot, player: &PlayerState) {
    let nickname = player.nickname.as_deref().unwrap_or("—");
    let line = Line::from(vec![
        Span::styled(
            format!(" Раунд {} ", snapshot.round),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("• Игроков: {} ", snapshot.num_players)),
        Span::raw("• "),
        Span::styled(nickname, Style::default().fg(Color::Cyan)),
        Span::raw(" • "),
        Span::styled(
            format!("{} монет", player.money.round() as i64),
            Style::default().fg(Color::Yellow),
        ),
    ]);
    let header = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL).title("Базар"))
        .alignment(Alignment::Left);
    frame.render_widget(header, area);
}

pub fn draw_leaderboard(frame: &mut Frame, area: Rect, entries: &[LeaderboardEntry]) {
    let rows: Vec<Row> = if entries.is_empty() {
        vec![Row::new(vec![
            Cell::from(""),
            Cell::from("Игроки еще не добавлены"),
            Cell::from(""),
            Cell::from(""),
        ])]
    } else {
        entries
            .iter()
            .enumerate()
            .map(|(i, player)| {
                Row::new(vec![
                    Cell::from(format!("{}", i + 1)),
                    Cell::from(player.name.clone()),
                    Cell::from(format!("{}", player.total_value.round() as i64)),
                    Cell::from(percent_span(player.growth_percent)),
                ])
            })
            .collect()
    };
    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Min(12),
            Constraint::Length(10),
            Constraint::Length(7),
        ],
    )
    .header(
        Row::new(vec!["#", "Игрок", "Монеты", "Рост"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title("Турнирная таблица"));
    frame.render_widget(table, area);
}

pub fn draw_prices(frame: &mut Frame, area: Rect, prices: &[PriceQuote]) {
    let rows: Vec<Row> = canonical_quotes(prices)
        .into_iter()
        .map(|quote| {
            Row::new(vec![
                Cell::from(format!(
                    "{} {}",
                    resource_glyph(&quote.resource),
                    capitalize(&quote.resource)
                )),
                Cell::from(format!("{}", quote.current_price.round() as i64)),
                Cell::from(percent_span(quote.change_from_prev_percent)),
                Cell::from(percent_span(quote.change_from_start_percent)),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Min(12),
            Constraint::Length(7),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    )
    .header(
        Row::new(vec!["Ресурс", "Цена", "За раунд", "С начала"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title("Цены"));
    frame.render_widget(table, area);
}

pub fn draw_resources(frame: &mut Frame, area: Rect, player: &PlayerState) {
    let block = Block::default().borders(Borders::ALL).title("Ресурсы");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Ratio(1, RESOURCE_CATALOG.len() as u32);
            RESOURCE_CATALOG.len()
        ])
        .split(inner);

    for (i, &name) in RESOURCE_CATALOG.iter().enumerate() {
        let amount = player.resource_amount(name);
        let card = Paragraph::new(vec![
            Line::from(Span::styled(
                format!("{} {}", resource_glyph(name), capitalize(name)),
                Style::default().fg(Color::Cyan),
            )),
            Line::from(Span::styled(
                amount.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(card, columns[i]);
    }
}

pub fn draw_buildings(frame: &mut Frame, area: Rect, buildings: &[BuildingAggregate]) {
    let block = Block::default().borders(Borders::ALL).title("Объекты");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cards = canonical_buildings(buildings);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Ratio(1, BUILDING_GRID_ROWS.len() as u32);
            BUILDING_GRID_ROWS.len()
        ])
        .split(inner);

    let mut offset = 0usize;
    for (row_idx, &row_len) in BUILDING_GRID_ROWS.iter().enumerate() {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, row_len as u32); row_len])
            .split(rows[row_idx]);
        for col in 0..row_len {
            let card = &cards[offset + col];
            let text = vec![
                Line::from(Span::styled(
                    format!("{} {}", building_glyph(&card.name), card.name),
                    Style::default().fg(Color::Green),
                )),
                Line::from(vec![
                    Span::styled(
                        card.count.to_string(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  {}% игроков", card.players_percentage.round() as i64),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
            ];
            frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), columns[col]);
        }
        offset += row_len;
    }
}

pub fn draw_footer(frame: &mut Frame, area: Rect, toast: Option<&Toast>) {
    let line = match toast {
        Some(toast) => {
            let color = match toast.kind {
                ToastKind::Success => Color::Green,
                ToastKind::Error => Color::Red,
            };
            Line::from(vec![
                Span::styled(format!(" {} ", toast.ts), Style::default().fg(Color::DarkGray)),
                Span::styled(toast.message.clone(), Style::default().fg(color)),
            ])
        }
        None => Line::from(Span::styled(
            " b объекты • r ресурсы • c строить • ←/→ листать • Esc закрыть • q выход",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

pub fn percent_span(value: f64) -> Line<'static> {
    let rounded = value.round() as i64;
    let (sign, color) = if rounded > 0 {
        ("+", Color::Green)
    } else if rounded < 0 {
        ("", Color::Red)
    } else {
        ("", Color::DarkGray)
    };
    Line::from(Span::styled(
        format!("{sign}{rounded}%"),
        Style::default().fg(color),
    ))
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
