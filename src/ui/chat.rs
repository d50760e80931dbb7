//! Transcript pane

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::types::{Message, MessageRole};

/// Split one line of message text on `**` markers into plain and bold spans
pub fn styled_line(text: &str, base: Style) -> Line<'static> {
    let spans: Vec<Span<'static>> = text
        .split("**")
        .enumerate()
        .filter(|(_, part)| !part.is_empty())
        .map(|(i, part)| {
            let style = if i % 2 == 1 {
                base.add_modifier(Modifier::BOLD)
            } else {
                base
            };
            Span::styled(part.to_string(), style)
        })
        .collect();
    Line::from(spans)
}

fn speaker(role: MessageRole) -> (&'static str, Style) {
    match role {
        MessageRole::Assistant => ("IT Support", Style::default().fg(Color::Cyan)),
        MessageRole::User => ("You", Style::default().fg(Color::Green)),
        MessageRole::System => (
            "System",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ),
    }
}

/// All lines for the given messages, speaker headers included
pub fn transcript_lines(messages: &[&Message]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in messages {
        let (name, style) = speaker(message.role);
        lines.push(Line::from(Span::styled(
            format!("{name} · {}", message.timestamp.format("%H:%M")),
            style.add_modifier(Modifier::BOLD),
        )));
        for text in message.content.lines() {
            lines.push(styled_line(text, Style::default()));
        }
        lines.push(Line::default());
    }
    lines
}

pub fn render_transcript(frame: &mut Frame, area: Rect, messages: &[&Message], processing: bool) {
    let mut lines = transcript_lines(messages);
    if processing {
        lines.push(Line::from(Span::styled(
            "Processing...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    // Offset in wrapped rows so the newest message stays in view
    let inner_width = area.width.saturating_sub(2);
    let height = area.height.saturating_sub(2) as usize;
    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    let rows = para.line_count(inner_width);
    let offset = u16::try_from(rows.saturating_sub(height)).unwrap_or(u16::MAX);

    let para = para
        .block(Block::default().borders(Borders::ALL).title(" Conversation "))
        .scroll((offset, 0));
    frame.render_widget(para, area);
}
