pub mod chat;
pub mod form_field;
pub mod terminal_guard;
pub mod wizard;

pub use form_field::FormField;
pub use wizard::WizardForm;
