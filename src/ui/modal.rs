//! Choice popups (player picker, download options)

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::app::{Modal, TvDetailsPage};
use crate::ui::Theme;

/// Rect of `width` x `height` centered in `area`, clipped to fit
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

/// Draw `modal` over whatever is below it
pub fn render_modal(frame: &mut Frame, area: Rect, page: &TvDetailsPage, modal: Modal) {
    let choices = modal.choices();
    let cursor = page.modal_state(modal).cursor().unwrap_or(0);

    let mut lines = Vec::with_capacity(choices.len() + 3);
    if let (Modal::WatchEpisode, Some(target)) = (modal, page.episode_target()) {
        lines.push(Line::from(Span::styled(target.to_string(), Theme::secondary())));
    }
    lines.push(Line::from(""));

    for (i, choice) in choices.iter().enumerate() {
        let selected = i == cursor;
        let style = if selected {
            Theme::button_solid()
        } else {
            Theme::button_bordered()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("[{}] ", i + 1), Theme::keybind()),
            Span::styled(format!(" {} ", choice.label()), style),
        ]));
    }

    let height = lines.len() as u16 + 2;
    let popup = centered_rect(40, height, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Theme::border_focused())
        .title(Span::styled(format!(" {} ", modal.title()), Theme::title()))
        .style(Theme::modal());

    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(body, popup);
}
