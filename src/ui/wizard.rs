//! Form pane: one set of inputs per intake step

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::form_field::FormField;
use crate::session::{IntakeSession, SessionError};
use crate::steps::Step;
use crate::types::{catalog, ClinicColor, ClinicId, Priority};

/// Which location input receives typing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationFocus {
    Floor,
    Room,
}

pub fn clinic_color(color: ClinicColor) -> Color {
    match color {
        ClinicColor::Blue => Color::Blue,
        ClinicColor::Green => Color::Green,
        ClinicColor::Purple => Color::Magenta,
        ClinicColor::Pink => Color::LightMagenta,
    }
}

pub struct WizardForm {
    clinic: FormField,
    department: FormField,
    floor: FormField,
    room: FormField,
    phone: FormField,
    priority: FormField,
    description: FormField,
    location_focus: LocationFocus,
}

impl Default for WizardForm {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardForm {
    pub fn new() -> Self {
        Self {
            clinic: FormField::select(catalog().iter().map(|c| c.name)),
            department: FormField::select(Vec::<String>::new()),
            floor: FormField::text("e.g. 3", Some(10)),
            room: FormField::text("e.g. 302B", Some(10)),
            phone: FormField::text("(555) 123-4567", Some(20)),
            priority: FormField::select_with_details(
                Priority::all().iter().map(|p| (p.label(), p.description())),
            ),
            description: FormField::text_area(
                "What is happening? Include error messages and affected devices.",
            ),
            location_focus: LocationFocus::Floor,
        }
    }

    pub fn location_focus(&self) -> LocationFocus {
        self.location_focus
    }

    fn load_departments(&mut self, clinic: ClinicId) {
        self.department = FormField::select(clinic.clinic().departments.iter().copied());
    }

    /// Route a key to the input for `step`. Returns true if consumed.
    pub fn handle_key(&mut self, step: Step, key: KeyEvent) -> bool {
        if step == Step::Location && matches!(key.code, KeyCode::Tab | KeyCode::BackTab) {
            self.location_focus = match self.location_focus {
                LocationFocus::Floor => LocationFocus::Room,
                LocationFocus::Room => LocationFocus::Floor,
            };
            return true;
        }
        match self.field_mut(step) {
            Some(field) => field.handle_key(key),
            None => false,
        }
    }

    fn field_mut(&mut self, step: Step) -> Option<&mut FormField> {
        match step {
            Step::Clinic => Some(&mut self.clinic),
            Step::Department => Some(&mut self.department),
            Step::Location => Some(match self.location_focus {
                LocationFocus::Floor => &mut self.floor,
                LocationFocus::Room => &mut self.room,
            }),
            Step::Contact => Some(&mut self.phone),
            Step::Priority => Some(&mut self.priority),
            Step::Description => Some(&mut self.description),
            Step::Confirmation => None,
        }
    }

    /// Copy the inputs for `step` into the session
    pub fn apply(&mut self, step: Step, session: &mut IntakeSession) -> Result<(), SessionError> {
        match step {
            Step::Clinic => {
                if let Some(id) = self
                    .clinic
                    .selected_index()
                    .and_then(|i| ClinicId::all().get(i).copied())
                {
                    session.select_clinic(id);
                    self.load_departments(id);
                }
            }
            Step::Department => {
                if self.department.selected_index().is_some() {
                    session.select_department(&self.department.value())?;
                }
            }
            Step::Location => {
                session.set_floor(self.floor.value());
                session.set_room(self.room.value());
            }
            Step::Contact => session.set_phone(self.phone.value()),
            Step::Priority => {
                if let Some(p) = self
                    .priority
                    .selected_index()
                    .and_then(|i| Priority::all().get(i).copied())
                {
                    session.set_priority(p);
                }
            }
            Step::Description => session.set_description(self.description.value()),
            Step::Confirmation => {}
        }
        Ok(())
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        session: &IntakeSession,
        error: Option<&str>,
    ) {
        let step = session.current_step();
        let border = session
            .form()
            .clinic()
            .map(|c| clinic_color(c.clinic().color))
            .unwrap_or(Color::Gray);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(format!(
                " Step {}/{}: {} ",
                step.index() + 1,
                Step::ALL.len(),
                step.title()
            ));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        match step {
            Step::Location => {
                let halves = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(3), Constraint::Length(3)])
                    .split(chunks[0]);
                let focus = self.location_focus;
                self.floor
                    .render(frame, halves[0], focus == LocationFocus::Floor);
                self.room
                    .render(frame, halves[1], focus == LocationFocus::Room);
            }
            Step::Contact => {
                let area = Rect {
                    height: chunks[0].height.min(3),
                    ..chunks[0]
                };
                self.phone.render(frame, area, true);
            }
            Step::Confirmation => render_confirmation(frame, chunks[0], session),
            other => {
                if let Some(field) = self.field_mut(other) {
                    field.render(frame, chunks[0], true);
                }
            }
        }

        if let Some(error) = error {
            frame.render_widget(
                Paragraph::new(Span::styled(error, Style::default().fg(Color::Red))),
                chunks[1],
            );
        }

        frame.render_widget(
            Paragraph::new(Span::styled(
                key_hints(step, session),
                Style::default().fg(Color::DarkGray),
            )),
            chunks[2],
        );
    }
}

fn render_confirmation(frame: &mut Frame, area: Rect, session: &IntakeSession) {
    let form = session.form();
    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(
                format!("{label}: "),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(value),
        ])
    };
    let lines = vec![
        row("Clinic", form.clinic_name().unwrap_or("-").to_string()),
        row("Department", form.department().unwrap_or("-").to_string()),
        row("Location", form.location()),
        row("Phone", form.phone.clone()),
        row(
            "Priority",
            form.priority.map(|p| p.label()).unwrap_or("-").to_string(),
        ),
        row("Description", form.description.trim().to_string()),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

/// Footer text listing the keys that do something right now
pub fn key_hints(step: Step, session: &IntakeSession) -> String {
    if session.is_processing() {
        return "Processing...  Esc quit".to_string();
    }
    match (step, session.outcome()) {
        (Step::Confirmation, Some(o)) if o.is_success() => "n new ticket  Esc quit".to_string(),
        (Step::Confirmation, Some(_)) => {
            "Enter try again  e edit description  n new ticket  Esc quit".to_string()
        }
        (Step::Confirmation, None) => {
            "Enter submit  e edit description  Esc quit".to_string()
        }
        (Step::Location, _) => "Tab switch field  Enter continue  Esc quit".to_string(),
        (Step::Description, _) => "Alt+Enter new line  Enter continue  Esc quit".to_string(),
        (Step::Clinic | Step::Department | Step::Priority, _) => {
            "↑/↓ choose  Enter continue  Esc quit".to_string()
        }
        (Step::Contact, _) => "Enter continue  Esc quit".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(form: &mut WizardForm, step: Step, text: &str) {
        for c in text.chars() {
            form.handle_key(step, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_clinic_apply_loads_departments() {
        let mut form = WizardForm::new();
        let mut session = IntakeSession::new();

        form.handle_key(Step::Clinic, key(KeyCode::Down));
        form.apply(Step::Clinic, &mut session).unwrap();
        assert_eq!(session.form().clinic(), Some(ClinicId::Westview));

        form.handle_key(Step::Department, key(KeyCode::Down));
        form.apply(Step::Department, &mut session).unwrap();
        assert_eq!(session.form().department(), Some("Pediatrics"));
    }

    #[test]
    fn test_tab_switches_location_field() {
        let mut form = WizardForm::new();
        let mut session = IntakeSession::new();

        type_text(&mut form, Step::Location, "2");
        assert!(form.handle_key(Step::Location, key(KeyCode::Tab)));
        assert_eq!(form.location_focus(), LocationFocus::Room);
        type_text(&mut form, Step::Location, "201");

        form.apply(Step::Location, &mut session).unwrap();
        assert_eq!(session.form().floor, "2");
        assert_eq!(session.form().room, "201");
    }

    #[test]
    fn test_priority_apply() {
        let mut form = WizardForm::new();
        let mut session = IntakeSession::new();
        form.handle_key(Step::Priority, key(KeyCode::Down));
        form.handle_key(Step::Priority, key(KeyCode::Down));
        form.apply(Step::Priority, &mut session).unwrap();
        assert_eq!(session.form().priority, Some(Priority::all()[2]));
    }

    #[test]
    fn test_confirmation_ignores_keys() {
        let mut form = WizardForm::new();
        assert!(!form.handle_key(Step::Confirmation, key(KeyCode::Char('x'))));
    }

    #[test]
    fn test_key_hints_follow_step() {
        let session = IntakeSession::new();
        assert!(key_hints(Step::Clinic, &session).contains("choose"));
        assert!(key_hints(Step::Location, &session).contains("Tab"));
        assert!(key_hints(Step::Confirmation, &session).contains("Enter submit"));
    }
}
