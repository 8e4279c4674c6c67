use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Context, Line as CanvasLine, Points},
        Block, Borders, Clear, Paragraph, Wrap,
    },
    Frame,
};

use crate::chart::{self, DrawCmd};
use crate::types::{BuildingDetails, BuildingOffer, PlayerBuilding, PriceQuote, ResourceDetails};
use crate::ui::views::{building_glyph, capitalize, percent_span, resource_glyph};

/// Virtual coordinate box the chart is built in; the canvas widget scales it
/// to whatever terminal area the modal gets.
const CHART_W: f64 = 400.0;
const CHART_H: f64 = 300.0;

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

/// Title line with paging controls; a control is dimmed when disabled, a pure
/// function of the cursor index and catalog length.
fn nav_title(name: &str, can_prev: bool, can_next: bool) -> Line<'static> {
    let arrow = |enabled: bool, glyph: &'static str| {
        if enabled {
            Span::styled(glyph, Style::default().fg(Color::Yellow))
        } else {
            Span::styled(glyph, Style::default().fg(Color::DarkGray))
        }
    };
    Line::from(vec![
        arrow(can_prev, " ◀ "),
        Span::styled(
            name.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        arrow(can_next, " ▶ "),
    ])
}

pub fn draw_onboarding(frame: &mut Frame, nickname: &str, error: Option<&str>) {
    let area = centered_rect(46, 9, frame.size());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from("Введите никнейм:"),
        Line::from(""),
        Line::from(Span::styled(
            format!(" {nickname}▏"),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter — сохранить",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    if let Some(error) = error {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    let modal = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Авторизация"))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(modal, area);
}

/// Building detail modal. Count and percentage always come from the grid
/// cache (summary), never from the detail response; the fetch fills in the
/// owners column only.
#[allow(clippy::too_many_arguments)]
pub fn draw_building(
    frame: &mut Frame,
    name: &str,
    summary: (u32, f64),
    owned: &[&PlayerBuilding],
    details: Option<&BuildingDetails>,
    can_prev: bool,
    can_next: bool,
) {
    let area = centered_rect(64, 18, frame.size());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(nav_title(name, can_prev, can_next));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(inner);

    let (count, percentage) = summary;
    let mut left_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            building_glyph(name),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("Построено: "),
            Span::styled(count.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::raw("Игроков: "),
            Span::styled(
                format!("{}%", percentage.round() as i64),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
    ];
    if !owned.is_empty() {
        let statuses = owned
            .iter()
            .map(|b| b.status.label())
            .collect::<Vec<_>>()
            .join(", ");
        left_lines.push(Line::from(vec![
            Span::raw("Ваши: "),
            Span::styled(statuses, Style::default().fg(Color::Cyan)),
        ]));
    }
    left_lines.push(Line::from(""));
    left_lines.push(Line::from(Span::styled(
        "x — продать объект",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(
        Paragraph::new(left_lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        halves[0],
    );

    let mut owner_lines = vec![Line::from(Span::styled(
        "Владельцы",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    match details {
        Some(details) if !details.owners.is_empty() => {
            for owner in &details.owners {
                owner_lines.push(Line::from(vec![
                    Span::raw(owner.name.clone()),
                    Span::styled(
                        format!("  {}", owner.count),
                        Style::default().fg(Color::Yellow),
                    ),
                ]));
            }
        }
        Some(_) => owner_lines.push(Line::from(Span::styled(
            "Нет владельцев",
            Style::default().fg(Color::DarkGray),
        ))),
        None => owner_lines.push(Line::from(Span::styled(
            "Загрузка...",
            Style::default().fg(Color::DarkGray),
        ))),
    }
    frame.render_widget(
        Paragraph::new(owner_lines).wrap(Wrap { trim: true }),
        halves[1],
    );
}

/// Resource detail modal: stats and trade amount on the left, the price
/// history chart on the right. Until the detail fetch lands, the price rows
/// fall back to the cached quote from the main table.
#[allow(clippy::too_many_arguments)]
pub fn draw_resource(
    frame: &mut Frame,
    name: &str,
    owned: i64,
    quote: Option<&PriceQuote>,
    details: Option<&ResourceDetails>,
    amount: &str,
    can_prev: bool,
    can_next: bool,
) {
    let screen = frame.size();
    let area = centered_rect(
        screen.width.saturating_sub(8).min(100),
        screen.height.saturating_sub(4).min(28),
        screen,
    );
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(nav_title(&capitalize(name), can_prev, can_next));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(30)])
        .split(inner);

    let mut lines = vec![
        Line::from(Span::styled(
            resource_glyph(name),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    match (details, quote) {
        (Some(details), _) => {
            push_price_rows(
                &mut lines,
                details.current_price,
                details.change_from_prev_percent,
                details.change_from_start_percent,
            );
            lines.push(Line::from(vec![
                Span::raw("Спрос: "),
                Span::styled(details.demand_level.clone(), Style::default().fg(Color::Cyan)),
            ]));
            lines.push(Line::from(vec![
                Span::raw("Предложение: "),
                Span::styled(details.supply_level.clone(), Style::default().fg(Color::Cyan)),
            ]));
        }
        (None, Some(quote)) => {
            push_price_rows(
                &mut lines,
                quote.current_price,
                quote.change_from_prev_percent,
                quote.change_from_start_percent,
            );
            lines.push(Line::from(Span::styled(
                "Загрузка...",
                Style::default().fg(Color::DarkGray),
            )));
        }
        (None, None) => lines.push(Line::from(Span::styled(
            "Загрузка...",
            Style::default().fg(Color::DarkGray),
        ))),
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("У вас: "),
        Span::styled(owned.to_string(), Style::default().add_modifier(Modifier::BOLD)),
    ]));
    lines.push(Line::from(vec![
        Span::raw("Количество: "),
        Span::styled(
            format!("{amount}▏"),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from(Span::styled(
        "+ купить • - продать",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), halves[0]);

    let history = details.map(|d| d.price_history.as_slice()).unwrap_or(&[]);
    let cmds = chart::build(history, CHART_W, CHART_H);
    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::LEFT))
        .x_bounds([0.0, CHART_W])
        .y_bounds([0.0, CHART_H])
        .paint(move |ctx| paint_chart(ctx, &cmds));
    frame.render_widget(canvas, halves[1]);
}

fn push_price_rows(lines: &mut Vec<Line<'static>>, price: f64, prev: f64, start: f64) {
    lines.push(Line::from(vec![
        Span::raw("Цена: "),
        Span::styled(
            format!("{} монет", price.round() as i64),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from(vec![Span::raw("За раунд: ")]));
    lines.push(percent_span(prev));
    lines.push(Line::from(vec![Span::raw("С начала игры: ")]));
    lines.push(percent_span(start));
}

pub fn draw_build_offers(frame: &mut Frame, offers: &[BuildingOffer], selected: usize) {
    let area = centered_rect(70, 20, frame.size());
    frame.render_widget(Clear, area);

    let mut lines = Vec::new();
    if offers.is_empty() {
        lines.push(Line::from(Span::styled(
            "Загрузка...",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (i, offer) in offers.iter().enumerate() {
        let marker = if i == selected { "▶ " } else { "  " };
        let name_style = if offer.can_build {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(offer.name.clone(), name_style.add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("  {} монет", offer.cost.round() as i64),
                Style::default().fg(Color::Yellow),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!("    {}", offer.cost_details),
            Style::default().fg(Color::DarkGray),
        )));
        if !offer.can_build {
            lines.push(Line::from(Span::styled(
                "    Недостаточно ресурсов",
                Style::default().fg(Color::Red),
            )));
        }
    }

    let modal = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Строительство"))
        .wrap(Wrap { trim: false });
    frame.render_widget(modal, area);
}

/// Paints the chart draw list onto a canvas context, flipping the builder's
/// top-left-origin Y into canvas coordinates.
fn paint_chart(ctx: &mut Context, cmds: &[DrawCmd]) {
    let fy = |y: f64| CHART_H - y;
    for cmd in cmds {
        match cmd {
            DrawCmd::Axis { from, to } => ctx.draw(&CanvasLine {
                x1: from.0,
                y1: fy(from.1),
                x2: to.0,
                y2: fy(to.1),
                color: Color::White,
            }),
            DrawCmd::GridLine { from, to, label } => {
                ctx.draw(&CanvasLine {
                    x1: from.0,
                    y1: fy(from.1),
                    x2: to.0,
                    y2: fy(to.1),
                    color: Color::DarkGray,
                });
                ctx.print(
                    2.0,
                    fy(from.1),
                    Line::from(Span::styled(
                        label.clone(),
                        Style::default().fg(Color::DarkGray),
                    )),
                );
            }
            DrawCmd::Segment { from, to } => ctx.draw(&CanvasLine {
                x1: from.0,
                y1: fy(from.1),
                x2: to.0,
                y2: fy(to.1),
                color: Color::Green,
            }),
            DrawCmd::Marker { at } => ctx.draw(&Points {
                coords: &[(at.0, fy(at.1))],
                color: Color::LightGreen,
            }),
            DrawCmd::RoundLabel { at, text } => ctx.print(
                at.0,
                fy(at.1),
                Line::from(Span::styled(text.clone(), Style::default().fg(Color::Gray))),
            ),
            DrawCmd::Caption { at, text, vertical } => {
                if *vertical {
                    // No rotated text on a terminal; stack the caption glyphs.
                    for (i, ch) in text.chars().enumerate() {
                        ctx.print(
                            at.0,
                            fy(at.1) + (text.chars().count() as f64 / 2.0 - i as f64) * 14.0,
                            Line::from(ch.to_string()),
                        );
                    }
                } else {
                    ctx.print(at.0, fy(at.1), Line::from(text.clone()));
                }
            }
            DrawCmd::NoData { at, text } => ctx.print(
                at.0,
                fy(at.1),
                Line::from(Span::styled(
                    text.clone(),
                    Style::default().fg(Color::DarkGray),
                )),
            ),
        }
    }
}
