//! Domain types shared by the sequencer, classifier and submission layers.

pub mod clinic;
pub mod form;
pub mod message;
pub mod ticket;

pub use clinic::{catalog, Clinic, ClinicColor, ClinicId};
pub use form::{FormData, FormError, Priority};
pub use message::{Message, MessageRole, Transcript};
pub use ticket::{generate_ticket_id, Ticket, INITIAL_STATUS};
