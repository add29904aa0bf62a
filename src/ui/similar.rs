//! "More like this" strip
//!
//! Similar series laid out as cards side by side, as many as fit.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::models::SimilarSeries;
use crate::ui::Theme;

/// Rows the panel occupies, borders included
pub const PANEL_HEIGHT: u16 = 6;

const CARD_WIDTH: u16 = 24;

pub fn render_similar(frame: &mut Frame, area: Rect, similar: &[SimilarSeries]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(" MORE LIKE THIS ", Theme::title()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let fit = ((inner.width / CARD_WIDTH) as usize).min(similar.len());
    if fit == 0 {
        return;
    }

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Length(CARD_WIDTH); fit])
        .split(inner);

    for (series, card) in similar.iter().zip(cards.iter()) {
        frame.render_widget(similar_card(series, card.width), *card);
    }
}

fn similar_card(series: &SimilarSeries, width: u16) -> Paragraph<'static> {
    let name: String = series
        .name
        .chars()
        .take(width.saturating_sub(2) as usize)
        .collect();
    let year = series.year().map(|y| y.to_string()).unwrap_or_default();

    Paragraph::new(vec![
        Line::from(Span::styled(name, Theme::text())),
        Line::from(vec![
            Span::styled(format!("★ {}", series.rating_label()), Theme::rating(series.vote_average)),
            Span::raw("  "),
            Span::styled(year, Theme::date()),
        ]),
    ])
    .block(
        Block::default()
            .borders(Borders::LEFT)
            .border_style(Theme::border()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_cards_fit_width() {
        let similar: Vec<SimilarSeries> = (0..10)
            .map(|i| SimilarSeries {
                id: i,
                name: format!("Show {}", i),
                poster_url: None,
                vote_average: Some(7.0),
                first_air_date: Some("2020-01-01".to_string()),
            })
            .collect();

        let mut terminal = Terminal::new(TestBackend::new(60, PANEL_HEIGHT)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render_similar(f, area, &similar);
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Show 0"));
        assert!(text.contains("Show 1"));
        assert!(!text.contains("Show 2"));
    }
}
