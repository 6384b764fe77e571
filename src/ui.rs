use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::{App, AppState};
use retype::session::Outcome;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Typing => render_typing(self, area, buf),
            AppState::Results => render_results(self, area, buf),
        }
    }
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
    let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
    let dim_bold_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::DIM);
    let underlined_dim_bold_style = Style::default()
        .patch(dim_bold_style)
        .add_modifier(Modifier::UNDERLINED);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Length(1), // most recent score
                Constraint::Length(1), // live readouts
                Constraint::Length(1), // padding
                Constraint::Min(3),    // word strip
                Constraint::Length(1), // entry being typed
                Constraint::Length(1), // fetch notice
            ]
            .as_ref(),
        )
        .split(area);

    if let Some(rec) = &app.last_score {
        let recent = Paragraph::new(Span::styled(
            format!(
                "most recent: {} {} CPM ({} WPM)",
                rec.lang, rec.cpm, rec.wpm
            ),
            italic_style,
        ))
        .alignment(Alignment::Center);
        recent.render(chunks[0], buf);
    }

    let session = &app.session;
    let readouts = Paragraph::new(Span::styled(
        format!(
            "{} cpm   {} wpm   {}s left",
            session.cpm_corrected as i64, session.wpm as i64, session.seconds_remaining
        ),
        dim_bold_style,
    ))
    .alignment(Alignment::Center);
    readouts.render(chunks[1], buf);

    // Already-submitted words colored by word outcome, the current word
    // marked character by character against the entry, the rest dimmed.
    let mut spans: Vec<Span> = Vec::new();
    for (idx, word) in session.words.iter().enumerate() {
        if idx < session.cursor {
            let style = match app.word_marks.get(idx) {
                Some(Outcome::Correct) => green_bold_style,
                _ => red_bold_style,
            };
            spans.push(Span::styled(word.to_string(), style));
        } else if idx == session.cursor {
            let marks = session.entry_marks(&app.entry);
            for (i, c) in word.chars().enumerate() {
                let style = match marks.get(i) {
                    Some(Outcome::Correct) => green_bold_style,
                    Some(Outcome::Incorrect) => red_bold_style,
                    None => underlined_dim_bold_style,
                };
                spans.push(Span::styled(c.to_string(), style));
            }
        } else {
            spans.push(Span::styled(word.to_string(), dim_bold_style));
        }
        spans.push(Span::raw(" "));
    }

    let strip = Paragraph::new(Line::from(spans)).wrap(Wrap { trim: true });
    strip.render(chunks[3], buf);

    let entry = Paragraph::new(Span::styled(app.entry.clone(), bold_style))
        .alignment(Alignment::Center);
    entry.render(chunks[4], buf);

    if let Some(reason) = &app.fallback_reason {
        let notice = Paragraph::new(Span::styled(
            format!("word api unavailable, using the built-in list ({reason})"),
            Style::default().fg(Color::Yellow).patch(italic_style),
        ))
        .alignment(Alignment::Center);
        notice.render(chunks[5], buf);
    }
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_italic_style = Style::default()
        .add_modifier(Modifier::DIM)
        .add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Min(1),
                Constraint::Length(1), // headline
                Constraint::Length(1), // final score
                Constraint::Length(1), // settings
                Constraint::Length(1), // padding
                Constraint::Length(1), // legend
            ]
            .as_ref(),
        )
        .split(area);

    let session = &app.session;

    let headline = if session.words.is_empty() {
        Span::styled(
            "no words available for this language",
            Style::default().fg(Color::Yellow).patch(bold_style),
        )
    } else if session.seconds_remaining == 0 {
        Span::styled("time's up", bold_style)
    } else {
        Span::styled("all words typed", bold_style)
    };
    Paragraph::new(headline)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    if !session.words.is_empty() {
        let score = Paragraph::new(Span::styled(
            format!(
                "{} CPM ({} WPM)",
                session.cpm_corrected as i64, session.wpm as i64
            ),
            bold_style,
        ))
        .alignment(Alignment::Center);
        score.render(chunks[2], buf);
    }

    let settings = Paragraph::new(Span::styled(
        format!("lang: {}   {}s countdown", app.language(), app.seconds()),
        dim_italic_style,
    ))
    .alignment(Alignment::Center);
    settings.render(chunks[3], buf);

    let legend = Paragraph::new(Span::styled(
        "(r)estart (l)anguage (esc)ape",
        dim_italic_style,
    ))
    .alignment(Alignment::Center);
    legend.render(chunks[5], buf);
}
