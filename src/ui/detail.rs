//! Series page
//!
//! Header card, season selector and episode list on the left; details
//! sidebar on the right; "More like this" underneath. Uses the neon
//! theme with keyboard hints inline.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use crate::app::{App, Focus, TvDetailsPage};
use crate::models::{Episode, SeriesDetails};
use crate::ui::{modal, similar, Theme};

const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// Lines the overview is clamped to in the header card
const OVERVIEW_LINES: u16 = 3;

/// Render the whole page, modals included
pub fn render_page(frame: &mut Frame, area: Rect, app: &App) {
    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(Style::default().bg(Theme::BACKGROUND)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    if app.page.loading {
        render_loading(frame, chunks[0], app.tick);
    } else {
        render_body(frame, chunks[0], app);
    }
    render_status_bar(frame, chunks[1], app);

    if let Some(active) = app.page.active_modal() {
        modal::render_modal(frame, area, &app.page, active);
    }
}

fn render_loading(frame: &mut Frame, area: Rect, tick: u64) {
    let glyph = SPINNER[(tick as usize) % SPINNER.len()];
    let y = area.y + area.height / 2;
    let line_area = Rect {
        x: area.x,
        y,
        width: area.width,
        height: area.height.min(1),
    };

    let spinner = Paragraph::new(Line::from(vec![
        Span::styled(glyph, Theme::accent()),
        Span::styled(" Loading...", Theme::loading()),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(spinner, line_area);
}

fn render_body(frame: &mut Frame, area: Rect, app: &App) {
    let page = &app.page;

    // More like this gets its own strip only when there is something in it
    let (top, bottom) = if page.similar.is_empty() {
        (area, None)
    } else {
        let v = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(10), Constraint::Length(similar::PANEL_HEIGHT)])
            .split(area);
        (v[0], Some(v[1]))
    };

    let h = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(top);

    render_main_column(frame, h[0], app);
    render_sidebar(frame, h[1], page.details.as_ref());

    if let Some(bottom) = bottom {
        similar::render_similar(frame, bottom, &page.similar);
    }
}

fn render_main_column(frame: &mut Frame, area: Rect, app: &App) {
    let page = &app.page;
    let show_seasons = !page.seasons.is_empty();
    // Episodes belong to the season selector; a failed first fetch still says so
    let show_episodes = show_seasons || page.season_failed();

    let mut constraints = vec![Constraint::Length(header_height())];
    if show_seasons {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(3));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_header_card(frame, chunks[0], page.details.as_ref());
    if show_seasons {
        render_seasons_bar(frame, chunks[1], page, app.focus == Focus::Seasons);
    }
    if show_episodes {
        let last = chunks[chunks.len() - 1];
        render_episodes(frame, last, page, app.focus == Focus::Episodes);
    }
}

/// Border + name + badges + overview + hints
fn header_height() -> u16 {
    2 + 1 + 1 + OVERVIEW_LINES + 1
}

fn render_header_card(frame: &mut Frame, area: Rect, details: Option<&SeriesDetails>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(" TV SERIES ", Theme::title()));

    let Some(details) = details else {
        let empty = Paragraph::new("Series details unavailable (press r to retry)")
            .style(Theme::dimmed())
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(OVERVIEW_LINES),
            Constraint::Length(1),
        ])
        .split(inner);

    let title = Line::from(vec![
        Span::styled("▶ ", Theme::accent()),
        Span::styled(details.name.clone(), Theme::title()),
    ]);
    frame.render_widget(Paragraph::new(title), rows[0]);
    frame.render_widget(Paragraph::new(badges(details)), rows[1]);

    // Wrapped and cut to the rows we have
    let overview = Paragraph::new(details.overview.as_str())
        .style(Theme::text())
        .wrap(Wrap { trim: true });
    frame.render_widget(overview, rows[2]);

    let hints = Line::from(vec![
        Span::styled(" [w] Watch Now ", Theme::button_solid()),
        Span::raw("  "),
        Span::styled(" [d] Download ", Theme::button_bordered()),
    ]);
    frame.render_widget(Paragraph::new(hints), rows[3]);
}

/// Rating, first-air date, language and season-count badges
fn badges(details: &SeriesDetails) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("★ {}", details.rating_label()),
        Theme::rating(details.vote_average),
    )];

    let mut push = |text: String, style: Style| {
        spans.push(Span::styled(" │ ", Theme::dimmed()));
        spans.push(Span::styled(text, style));
    };

    if let Some(date) = details.first_air_date.as_deref().filter(|d| !d.is_empty()) {
        push(date.to_string(), Theme::date());
    }
    if let Some(lang) = details.language_label() {
        push(lang, Theme::badge());
    }
    if let Some(seasons) = details.seasons_label() {
        push(seasons, Theme::badge());
    }

    Line::from(spans)
}

fn focus_border(focused: bool) -> Style {
    if focused {
        Theme::border_focused()
    } else {
        Theme::border()
    }
}

fn render_seasons_bar(frame: &mut Frame, area: Rect, page: &TvDetailsPage, focused: bool) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(focus_border(focused))
        .title(Span::styled(" SEASONS ", Theme::title()));

    let mut spans = Vec::with_capacity(page.seasons.len() * 2);
    for season in &page.seasons {
        let style = if season.season_number == page.selected_season {
            Theme::button_solid()
        } else {
            Theme::button_bordered()
        };
        spans.push(Span::styled(format!(" {} ", season), style));
        spans.push(Span::raw(" "));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_episodes(frame: &mut Frame, area: Rect, page: &TvDetailsPage, focused: bool) {
    let episodes = page.visible_episodes();
    let title = format!(" EPISODES ({}) ", episodes.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(focus_border(focused))
        .title(Span::styled(title, Theme::title()));

    if episodes.is_empty() {
        let msg = if page.season_failed() {
            format!("Season {} unavailable (press r to retry)", page.selected_season)
        } else if page.episodes_season == Some(page.selected_season) {
            "No episodes".to_string()
        } else {
            "Loading episodes...".to_string()
        };
        let empty = Paragraph::new(msg)
            .style(Theme::dimmed())
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let inner = block.inner(area);
    // Two rows per episode
    let visible = (inner.height as usize / 2).max(1);
    let offset = page.episode_list.visible_offset(visible);
    let width = inner.width as usize;

    let items: Vec<ListItem> = episodes
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, ep)| episode_item(ep, focused && i == page.episode_list.selected, width))
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

/// `▸ 3  Name ... S1E3  2011-05-01` over a dimmed overview line
fn episode_item(ep: &Episode, selected: bool, width: usize) -> ListItem<'static> {
    let marker = if selected { "▸ " } else { "  " };
    let name_style = if selected {
        Theme::list_item_selected()
    } else {
        Theme::list_item()
    };

    let first = Line::from(vec![
        Span::styled(marker, Theme::accent()),
        Span::styled(format!("{:>2}  ", ep.episode_number), Theme::keybind()),
        Span::styled(ep.name.clone(), name_style),
        Span::styled("  ", Theme::dimmed()),
        Span::styled(ep.code(), Theme::secondary()),
        Span::styled("  ", Theme::dimmed()),
        Span::styled(ep.air_date.clone().unwrap_or_default(), Theme::date()),
    ]);

    let overview: String = ep.overview.chars().take(width.saturating_sub(6)).collect();
    let second = Line::from(vec![
        Span::raw("      "),
        Span::styled(overview, Theme::dimmed()),
    ]);

    ListItem::new(vec![first, second])
}

fn render_sidebar(frame: &mut Frame, area: Rect, details: Option<&SeriesDetails>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(" DETAILS ", Theme::title()));

    let Some(details) = details else {
        frame.render_widget(block, area);
        return;
    };

    let field = |label: &'static str, value: String| {
        vec![
            Line::from(Span::styled(label, Theme::accent())),
            Line::from(Span::styled(value, Theme::text())),
            Line::from(""),
        ]
    };

    let mut lines = Vec::new();
    lines.extend(field("Rating", details.rating_label()));
    if let Some(date) = &details.first_air_date {
        lines.extend(field("First aired", date.clone()));
    }
    if let Some(lang) = details.language_label() {
        lines.extend(field("Language", lang));
    }
    if let Some(seasons) = details.seasons_label() {
        lines.extend(field("Seasons", seasons));
    }
    lines.extend(field("Poster", details.poster().to_string()));

    let para = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(para, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let focus = match app.focus {
        Focus::Seasons => " SEASONS ",
        Focus::Episodes => " EPISODES ",
    };
    let mode = Span::styled(
        focus,
        Style::default().fg(Theme::BACKGROUND).bg(Theme::PRIMARY),
    );

    let detail = match &app.status {
        Some(status) => Span::styled(format!(" {} ", status), Theme::success()),
        None => Span::styled(
            " q:quit  tab:focus  ←→:season  w:watch  d:download  r:reload ",
            Theme::dimmed(),
        ),
    };

    let status = Paragraph::new(Line::from(vec![mode, detail])).style(Theme::status_bar());
    frame.render_widget(status, area);
}
