use ratatui::{
    Frame,
    layout::{Layout, Direction, Constraint, Rect},
    widgets::{Block, Borders, BorderType, List, ListItem, ListState, Paragraph, Clear},
    style::{Style, Modifier},
    text::{Line, Span},
};
use crate::app::{App, InputMode};
use crate::theme::{tag_colors, Theme};
use crate::types::Item;

// ===============================
// Top-level draw
// ===============================
pub fn draw(f:&mut Frame, app:&App, theme:&Theme){
    let show_debug = app.debug_visible() && !app.debug_log().is_empty();

    let mut constraints: Vec<Constraint> = Vec::with_capacity(5);
    constraints.push(Constraint::Length(1));                                // header
    constraints.push(Constraint::Length(3));                                // search + chips
    constraints.push(Constraint::Min(0));                                   // item list
    if show_debug { constraints.push(Constraint::Length(6)); }              // debug
    constraints.push(Constraint::Length(2));                                // footer

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    let mut idx = 0usize;
    header(f, chunks[idx], app, theme); idx += 1;
    toolbar(f, chunks[idx], app, theme); idx += 1;
    item_list(f, chunks[idx], app, theme); idx += 1;
    if show_debug {
        debug_panel(f, chunks[idx], app, theme); idx += 1;
    }
    footer(f, chunks[idx], app, theme);

    // Overlays render last
    if app.overlay().is_some() {
        draw_stats_overlay(f, app, theme);
    }
}

// ===============================
// Header / Toolbar
// ===============================
fn header(f:&mut Frame, area:Rect, app:&App, theme:&Theme){
    let mut spans = vec![Span::styled(
        app.header_title(),
        Style::default().fg(theme.focus_border).add_modifier(Modifier::BOLD),
    )];
    if !app.items().is_empty() {
        spans.push(Span::styled(
            format!("  {} shown", app.items().len()),
            Style::default().fg(theme.text_dim),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn toolbar(f:&mut Frame, area:Rect, app:&App, theme:&Theme){
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);
    search_bar(f, cols[0], app, theme);
    chips_bar(f, cols[1], app, theme);
}

fn search_bar(f:&mut Frame, area:Rect, app:&App, theme:&Theme){
    let focused = app.input_mode() == InputMode::Search;
    let text = app.search();
    let hint = "(Press / to search by name)";
    let shown = if text.is_empty() && !focused { hint } else { text };
    let border_color = if focused { theme.focus_border } else { theme.unfocused_border };

    let paragraph = Paragraph::new(shown)
        .style(Style::default().fg(if focused { theme.focus_border } else if text.is_empty() { theme.text_dim } else { theme.text }))
        .block(Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color)));
    f.render_widget(paragraph, area);

    if focused && area.width > 2 {
        let x = area.x + 1 + (text.chars().count().min((area.width.saturating_sub(2)) as usize) as u16);
        let y = area.y + 1;
        f.set_cursor_position((x, y));
    }
}

fn chips_bar(f:&mut Frame, area:Rect, app:&App, theme:&Theme){
    let focused = app.input_mode() == InputMode::Chips;
    let mut spans: Vec<Span> = Vec::new();
    for (i, tag) in app.filters().iter().enumerate() {
        let (fg, bg) = tag_colors(tag, theme);
        let mut style = Style::default().fg(fg).bg(bg);
        if focused && i == app.selected_chip() {
            style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
        }
        spans.push(Span::styled(format!(" {tag} ✕ "), style));
        spans.push(Span::raw(" "));
    }
    if spans.is_empty() {
        spans.push(Span::styled("(no type filters)", Style::default().fg(theme.text_dim)));
    }

    let title = if focused { " Filters (←/→ pick, Enter remove, Esc done) " } else { " Filters " };
    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(if focused { theme.focus_border } else { theme.unfocused_border })));
    f.render_widget(paragraph, area);
}

// ===============================
// Body
// ===============================
fn item_list(f:&mut Frame, area:Rect, app:&App, theme:&Theme){
    let focused = app.input_mode() == InputMode::Normal;
    let rows: Vec<ListItem> = app.items().iter().map(|it| item_row(it, theme)).collect();

    let mut st = ListState::default();
    if !app.items().is_empty() {
        st.select(Some(app.selected_index()));
    }

    let list = List::new(rows)
        .highlight_style(Style::default().bg(theme.selection_bg).fg(theme.selection_fg).add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ")
        .block(Block::default()
            .title(if focused { " [ Pokedex ] " } else { " Pokedex " })
            .borders(Borders::ALL)
            .border_type(if focused { BorderType::Double } else { BorderType::Rounded })
            .border_style(Style::default().fg(if focused { theme.focus_border } else { theme.unfocused_border })));
    f.render_stateful_widget(list, area, &mut st);
}

fn item_row<'a>(it:&'a Item, theme:&Theme) -> ListItem<'a> {
    if it.is_placeholder() {
        return ListItem::new(Line::from(vec![
            Span::styled(format!("{:>6}  ", "-"), Style::default().fg(theme.text_dim)),
            Span::styled(it.name.as_str(), Style::default().fg(theme.toast_error)),
        ]));
    }

    let mut spans = vec![
        Span::styled(format!("{:>6}  ", format!("#{}", it.id)), Style::default().fg(theme.text_dim)),
        Span::styled(format!("{:<16}", it.name), Style::default().fg(theme.text)),
    ];
    for tag in &it.tags {
        let (fg, bg) = tag_colors(tag, theme);
        spans.push(Span::styled(format!(" {tag} "), Style::default().fg(fg).bg(bg)));
        spans.push(Span::raw(" "));
    }
    ListItem::new(Line::from(spans))
}

// ===============================
// Footer / Debug
// ===============================
fn footer(f:&mut Frame, area:Rect, app:&App, theme:&Theme){
    let key = |k: &'static str| Span::styled(k, Style::default().fg(theme.focus_border));

    let mut status: Vec<Span> = Vec::new();
    if app.pagination_visible() {
        status.push(Span::raw(format!("Page {}/{}", app.current_page(), app.page_count())));
        status.push(Span::raw(" │ size "));
        status.push(Span::styled(app.page_size().to_string(), Style::default().fg(theme.focus_border).add_modifier(Modifier::BOLD)));
    } else {
        status.push(Span::styled(format!("{} type filter(s) active", app.filters().len()), Style::default().fg(theme.text_dim)));
    }
    if app.debug_visible() {
        status.push(Span::raw(" │ "));
        status.push(Span::styled("[DEBUG]", Style::default().fg(theme.debug_indicator)));
    }
    if let Some(toast) = app.toast_message() {
        status.push(Span::raw(" │ "));
        status.push(Span::styled(toast, Style::default().fg(theme.toast_error).add_modifier(Modifier::BOLD)));
    }

    let mut help: Vec<Span> = Vec::with_capacity(24);
    if app.pagination_visible() {
        help.extend([key("←/→"), Span::raw(" page │ "), key("s"), Span::raw(" size │ ")]);
    }
    help.extend([
        key("/"), Span::raw(" search │ "),
        key("1-9"), Span::raw(" filter by type │ "),
        key("x"), Span::raw(" remove filter │ "),
        key("Enter"), Span::raw(" stats │ "),
        key("r"), Span::raw(" reload │ "),
        key("q"), Span::raw(" quit"),
    ]);

    let w = Paragraph::new(vec![Line::from(status), Line::from(help)]);
    f.render_widget(w, area);
}

fn debug_panel(f:&mut Frame, area:Rect, app:&App, theme:&Theme){
    let log = app.debug_log();
    let lines_to_show = (area.height.saturating_sub(2)) as usize; // inner height
    let start = log.len().saturating_sub(lines_to_show);
    let lines: Vec<Line> = log[start..].iter().map(|msg| Line::from(Span::raw(msg.as_str()))).collect();

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(theme.text_dim))
        .block(Block::default()
            .title(" Debug ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.text_dim)));
    f.render_widget(paragraph, area);
}

// ===============================
// Overlays
// ===============================
fn draw_stats_overlay(f:&mut Frame, app:&App, theme:&Theme){
    let Some(overlay) = app.overlay() else { return };

    // Centered box sized to the stat list
    let area = f.area();
    let width = (area.width / 2).clamp(20.min(area.width), 48.min(area.width));
    let height = ((overlay.stats.len() as u16) + 4).min(area.height);
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    let rect = Rect { x, y, width, height };

    f.render_widget(Clear, rect);

    let mut lines: Vec<Line> = vec![Line::from(Span::styled("Stats:", Style::default().add_modifier(Modifier::BOLD)))];
    for s in &overlay.stats {
        lines.push(Line::from(format!("  • {}: {}", s.name, s.value)));
    }

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(theme.background).bg(theme.overlay_bg))
        .block(Block::default()
            .title(format!(" {} (Esc to close) ", overlay.name))
            .borders(Borders::ALL)
            .border_type(BorderType::Plain)
            .border_style(Style::default().fg(theme.background)));
    f.render_widget(paragraph, rect);
}
