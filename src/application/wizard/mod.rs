pub mod input;
pub mod launch;
pub mod machine;
pub mod state;

pub use input::{
    email_suggestions, format_phone_number, validate_identification, validate_phone_number,
};
pub use launch::{AdminMode, LaunchParams};
pub use machine::TicketWizard;
pub use state::{IdentificationForm, TicketDraft, WizardState, WizardStep};
