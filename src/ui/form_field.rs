//! Input widgets used by the step forms

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use tui_textarea::TextArea;

/// A form field widget that can handle different input types
pub enum FormField {
    /// Single-line text input; the cursor counts characters
    TextInput {
        value: String,
        cursor_pos: usize,
        placeholder: String,
        max_length: Option<usize>,
    },
    /// Multi-line text input using tui-textarea
    TextArea {
        textarea: Box<TextArea<'static>>,
        placeholder: String,
    },
    /// Choice from a fixed list, with an optional detail line per option
    EnumSelect {
        options: Vec<String>,
        details: Vec<String>,
        selected: usize,
        list_state: ListState,
    },
}

fn byte_index(value: &str, char_pos: usize) -> usize {
    value
        .char_indices()
        .nth(char_pos)
        .map(|(i, _)| i)
        .unwrap_or(value.len())
}

impl FormField {
    pub fn text(placeholder: &str, max_length: Option<usize>) -> Self {
        FormField::TextInput {
            value: String::new(),
            cursor_pos: 0,
            placeholder: placeholder.to_string(),
            max_length,
        }
    }

    pub fn text_area(placeholder: &str) -> Self {
        FormField::TextArea {
            textarea: Box::new(TextArea::default()),
            placeholder: placeholder.to_string(),
        }
    }

    pub fn select<S: Into<String>>(options: impl IntoIterator<Item = S>) -> Self {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        let mut list_state = ListState::default();
        list_state.select((!options.is_empty()).then_some(0));
        FormField::EnumSelect {
            options,
            details: Vec::new(),
            selected: 0,
            list_state,
        }
    }

    /// Select list where each option carries a second, dimmed line
    pub fn select_with_details<S: Into<String>>(
        options: impl IntoIterator<Item = (S, S)>,
    ) -> Self {
        let (options, details): (Vec<String>, Vec<String>) = options
            .into_iter()
            .map(|(o, d)| (o.into(), d.into()))
            .unzip();
        let mut list_state = ListState::default();
        list_state.select((!options.is_empty()).then_some(0));
        FormField::EnumSelect {
            options,
            details,
            selected: 0,
            list_state,
        }
    }

    /// Get the current value as a string
    pub fn value(&self) -> String {
        match self {
            FormField::TextInput { value, .. } => value.clone(),
            FormField::TextArea { textarea, .. } => textarea.lines().join("\n"),
            FormField::EnumSelect {
                options, selected, ..
            } => options.get(*selected).cloned().unwrap_or_default(),
        }
    }

    /// Index of the highlighted option; `None` for text fields
    pub fn selected_index(&self) -> Option<usize> {
        match self {
            FormField::EnumSelect {
                options, selected, ..
            } if !options.is_empty() => Some(*selected),
            _ => None,
        }
    }

    /// Set the value from a string
    pub fn set_value(&mut self, new_value: &str) {
        match self {
            FormField::TextInput {
                value, cursor_pos, ..
            } => {
                *value = new_value.to_string();
                *cursor_pos = value.chars().count();
            }
            FormField::TextArea { textarea, .. } => {
                textarea.select_all();
                textarea.cut();
                textarea.insert_str(new_value);
            }
            FormField::EnumSelect {
                options,
                selected,
                list_state,
                ..
            } => {
                if let Some(idx) = options.iter().position(|o| o == new_value) {
                    *selected = idx;
                    list_state.select(Some(idx));
                }
            }
        }
    }

    /// Handle a key event, returns true if the key was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self {
            FormField::TextInput {
                value,
                cursor_pos,
                max_length,
                ..
            } => match key.code {
                KeyCode::Char(c) => {
                    if max_length
                        .map(|m| value.chars().count() < m)
                        .unwrap_or(true)
                    {
                        value.insert(byte_index(value, *cursor_pos), c);
                        *cursor_pos += 1;
                    }
                    true
                }
                KeyCode::Backspace => {
                    if *cursor_pos > 0 {
                        *cursor_pos -= 1;
                        value.remove(byte_index(value, *cursor_pos));
                    }
                    true
                }
                KeyCode::Delete => {
                    if *cursor_pos < value.chars().count() {
                        value.remove(byte_index(value, *cursor_pos));
                    }
                    true
                }
                KeyCode::Left => {
                    *cursor_pos = cursor_pos.saturating_sub(1);
                    true
                }
                KeyCode::Right => {
                    if *cursor_pos < value.chars().count() {
                        *cursor_pos += 1;
                    }
                    true
                }
                KeyCode::Home => {
                    *cursor_pos = 0;
                    true
                }
                KeyCode::End => {
                    *cursor_pos = value.chars().count();
                    true
                }
                _ => false,
            },
            FormField::TextArea { textarea, .. } => {
                // Enter submits the step; Alt+Enter adds a line break
                if key.code == KeyCode::Enter && !key.modifiers.contains(KeyModifiers::ALT) {
                    return false;
                }
                if key.code == KeyCode::Enter {
                    textarea.insert_newline();
                    return true;
                }
                textarea.input(key)
            }
            FormField::EnumSelect {
                options,
                selected,
                list_state,
                ..
            } => match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    if *selected > 0 {
                        *selected -= 1;
                        list_state.select(Some(*selected));
                    }
                    true
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if *selected < options.len().saturating_sub(1) {
                        *selected += 1;
                        list_state.select(Some(*selected));
                    }
                    true
                }
                _ => false,
            },
        }
    }

    /// Render the field
    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let border_color = if focused { Color::Cyan } else { Color::Gray };

        match self {
            FormField::TextInput {
                value,
                cursor_pos,
                placeholder,
                max_length,
            } => {
                let content = if value.is_empty() && !focused {
                    Line::from(Span::styled(
                        placeholder.as_str(),
                        Style::default().fg(Color::DarkGray),
                    ))
                } else {
                    let mut text = value.clone();
                    if focused {
                        text.insert(byte_index(&text, *cursor_pos), '|');
                    }
                    let suffix = max_length
                        .map(|m| format!(" ({}/{})", value.chars().count(), m))
                        .unwrap_or_default();
                    Line::from(vec![
                        Span::raw(text),
                        Span::styled(suffix, Style::default().fg(Color::DarkGray)),
                    ])
                };

                let para = Paragraph::new(content)
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_style(Style::default().fg(border_color)),
                    )
                    .style(Style::default().fg(if focused {
                        Color::White
                    } else {
                        Color::Gray
                    }));
                frame.render_widget(para, area);
            }
            FormField::TextArea {
                textarea,
                placeholder,
            } => {
                textarea.set_cursor_line_style(Style::default());
                textarea.set_cursor_style(if focused {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                });
                textarea.set_block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(border_color)),
                );
                textarea.set_placeholder_text(placeholder.clone());
                textarea.set_placeholder_style(Style::default().fg(Color::DarkGray));

                frame.render_widget(&**textarea, area);
            }
            FormField::EnumSelect {
                options,
                details,
                selected,
                list_state,
            } => {
                let items: Vec<ListItem> = options
                    .iter()
                    .enumerate()
                    .map(|(i, opt)| {
                        let style = if i == *selected {
                            Style::default().add_modifier(Modifier::BOLD)
                        } else {
                            Style::default().fg(Color::Gray)
                        };
                        let mut lines = vec![Line::from(Span::styled(opt.as_str(), style))];
                        if let Some(detail) = details.get(i) {
                            lines.push(Line::from(Span::styled(
                                format!("  {detail}"),
                                Style::default().fg(Color::DarkGray),
                            )));
                        }
                        ListItem::new(lines)
                    })
                    .collect();

                let list = List::new(items)
                    .highlight_style(
                        Style::default()
                            .add_modifier(Modifier::REVERSED)
                            .fg(Color::Cyan),
                    )
                    .highlight_symbol("> ");

                frame.render_stateful_widget(list, area, list_state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_text_input_handles_chars() {
        let mut field = FormField::text("Floor", None);
        assert!(field.handle_key(key(KeyCode::Char('3'))));
        assert!(field.handle_key(key(KeyCode::Char('B'))));
        assert_eq!(field.value(), "3B");
    }

    #[test]
    fn test_text_input_respects_max_length() {
        let mut field = FormField::text("Phone", Some(3));
        for c in ['5', '5', '5', '1'] {
            field.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(field.value(), "555");
    }

    #[test]
    fn test_text_input_editing_with_multibyte_chars() {
        let mut field = FormField::text("Room", None);
        field.set_value("Sala é");
        field.handle_key(key(KeyCode::Backspace));
        assert_eq!(field.value(), "Sala ");
        field.handle_key(key(KeyCode::Home));
        field.handle_key(key(KeyCode::Delete));
        assert_eq!(field.value(), "ala ");
    }

    #[test]
    fn test_enum_select_navigation() {
        let mut field = FormField::select(["Surgery", "ICU", "Oncology"]);
        assert_eq!(field.value(), "Surgery");
        assert_eq!(field.selected_index(), Some(0));

        field.handle_key(key(KeyCode::Down));
        field.handle_key(key(KeyCode::Down));
        field.handle_key(key(KeyCode::Down));
        assert_eq!(field.value(), "Oncology");

        field.handle_key(key(KeyCode::Up));
        assert_eq!(field.value(), "ICU");

        field.set_value("Surgery");
        assert_eq!(field.selected_index(), Some(0));
    }

    #[test]
    fn test_text_area_leaves_enter_to_caller() {
        let mut field = FormField::text_area("Describe the issue");
        field.handle_key(key(KeyCode::Char('a')));
        assert!(!field.handle_key(key(KeyCode::Enter)));
        assert!(field.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT)));
        field.handle_key(key(KeyCode::Char('b')));
        assert_eq!(field.value(), "a\nb");
    }

    #[test]
    fn test_text_fields_have_no_selection() {
        assert_eq!(FormField::text("x", None).selected_index(), None);
    }
}
