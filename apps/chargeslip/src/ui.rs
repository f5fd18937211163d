use crate::app::{App, FieldId};
use chargeslip_domain::value_objects::charges::ChargeKind;
use chargeslip_domain::value_objects::instrument::Segment;
use chargeslip_domain::value_objects::snapshot::{InputMode, Theme};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap};
use ratatui::Frame;

const LABEL_WIDTH: usize = 14;

struct Palette {
    bg: Color,
    fg: Color,
    muted: Color,
    accent: Color,
    gain: Color,
    loss: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                bg: Color::Black,
                fg: Color::Gray,
                muted: Color::DarkGray,
                accent: Color::Yellow,
                gain: Color::Green,
                loss: Color::Red,
            },
            Theme::Light => Self {
                bg: Color::White,
                fg: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                gain: Color::Green,
                loss: Color::Red,
            },
        }
    }

    fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    fn block<'a>(&self, title: &'a str) -> Block<'a> {
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.muted))
            .style(self.base())
    }
}

pub fn draw(frame: &mut Frame, app: &App) {
    let palette = Palette::for_theme(app.theme);
    let size = frame.area();
    frame.render_widget(Block::default().style(palette.base()), size);

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(12),
                Constraint::Length(7),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(size);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)].as_ref())
        .split(outer[2]);

    draw_segment_tabs(frame, outer[0], app, &palette);
    draw_category_tabs(frame, outer[1], app, &palette);
    draw_form(frame, body[0], app, &palette);
    draw_results(frame, body[1], app, &palette);
    draw_logs(frame, outer[3], app, &palette);
    draw_status(frame, outer[4], app, &palette);
}

fn tab_highlight(palette: &Palette) -> Style {
    Style::default()
        .fg(palette.accent)
        .add_modifier(Modifier::BOLD)
}

fn draw_segment_tabs(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let titles: Vec<Line> = Segment::ALL.iter().map(|s| Line::from(s.label())).collect();
    let selected = Segment::ALL
        .iter()
        .position(|s| *s == app.active_category.segment())
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .block(palette.block("Segment  < >"))
        .style(palette.base())
        .highlight_style(tab_highlight(palette));
    frame.render_widget(tabs, area);
}

fn draw_category_tabs(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let categories = app.active_category.segment().categories();
    let titles: Vec<Line> = categories.iter().map(|c| Line::from(c.label())).collect();
    let selected = categories
        .iter()
        .position(|c| *c == app.active_category)
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .block(palette.block("Product  [ ]"))
        .style(palette.base())
        .highlight_style(tab_highlight(palette));
    frame.render_widget(tabs, area);
}

fn draw_form(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let editor = app.editor();
    let fields = app.visible_fields();
    let mut lines: Vec<Line> = Vec::new();
    let mut cursor: Option<(u16, u16)> = None;

    for (row, field) in fields.iter().enumerate() {
        let focused = *field == app.focus;
        let marker = if focused { "> " } else { "  " };
        let label_style = if focused {
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.fg)
        };
        let value = match field {
            FieldId::Venue => format!("< {} >", editor.fields.venue.label()),
            FieldId::Commodity => format!(
                "< {} > lot {}",
                editor.fields.commodity.symbol(),
                app.quote.input.lot_multiplier
            ),
            _ => editor
                .input(*field)
                .map(|input| input.value.clone())
                .unwrap_or_default(),
        };
        lines.push(Line::from(vec![
            Span::styled(marker, label_style),
            Span::styled(
                format!("{:<width$}", field.label(), width = LABEL_WIDTH),
                label_style,
            ),
            Span::raw(value),
        ]));

        if focused {
            if let Some(input) = editor.input(*field) {
                let x = area.x + 1 + 2 + LABEL_WIDTH as u16 + input.cursor as u16;
                let y = area.y + 1 + row as u16;
                cursor = Some((x, y));
            }
        }
    }

    lines.push(Line::from(""));
    let mode_hint = match editor.fields.input_mode {
        InputMode::Quantity => "sizing: quantity (m: switch to amount)".to_string(),
        InputMode::Amount => format!(
            "sizing: amount -> quantity {} (m: switch)",
            app.quote.input.quantity
        ),
    };
    lines.push(Line::from(Span::styled(
        mode_hint,
        Style::default().fg(palette.muted),
    )));

    frame.render_widget(
        Paragraph::new(lines)
            .block(palette.block("Trade"))
            .wrap(Wrap { trim: false }),
        area,
    );
    if let Some(pos) = cursor {
        frame.set_cursor_position(pos);
    }
}

fn draw_results(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let rows: Vec<Row> = app
        .quote
        .rows
        .iter()
        .map(|row| {
            let mut style = Style::default().fg(palette.fg);
            match row.kind {
                ChargeKind::Total => style = style.add_modifier(Modifier::BOLD),
                ChargeKind::Pnl => {
                    let color = if row.amount < 0.0 {
                        palette.loss
                    } else {
                        palette.gain
                    };
                    style = style.fg(color).add_modifier(Modifier::BOLD);
                }
                _ => {}
            }
            Row::new(vec![
                Cell::from(row.label),
                Cell::from(Line::from(row.display.clone()).alignment(Alignment::Right)),
            ])
            .style(style)
        })
        .collect();

    let title = format!(
        "{} {} charges",
        app.active_category.segment().label(),
        app.active_category.label()
    );
    let table = Table::new(rows, [Constraint::Percentage(60), Constraint::Percentage(40)])
        .block(palette.block(&title))
        .style(palette.base());
    frame.render_widget(table, area);
}

fn draw_logs(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let height = area.height.saturating_sub(2) as usize;
    let visible = app.logs.lock().window(height, app.log_scroll);
    let text: Vec<Line> = visible.into_iter().map(Line::from).collect();
    frame.render_widget(
        Paragraph::new(text)
            .block(palette.block("Logs  PgUp/PgDn"))
            .style(Style::default().fg(palette.muted).bg(palette.bg))
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let line = if let Some(err) = &app.last_error {
        Line::from(Span::styled(
            format!("error: {err}"),
            Style::default().fg(palette.loss),
        ))
    } else if let Some(info) = &app.info_message {
        Line::from(Span::styled(
            format!("info: {info}"),
            Style::default().fg(palette.gain),
        ))
    } else {
        let save = if app.persistence_enabled() {
            "s save"
        } else {
            "autosave off"
        };
        Line::from(Span::styled(
            format!("Tab/↑↓ field | ←→ cursor/select | v exchange | c commodity | t theme | r reset | {save} | q quit"),
            Style::default().fg(palette.muted),
        ))
    };
    frame.render_widget(Paragraph::new(line).style(palette.base()), area);
}
