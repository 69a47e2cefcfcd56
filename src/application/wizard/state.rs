use crate::domain::entities::{
    Contact, CreatedTicket, Deal, IdentificationMethod, PhotoAttachment, Ticket, TicketMessage,
    UploadedFile,
};

/// The screen the wizard is currently showing
#[derive(Debug, Clone, PartialEq)]
pub enum WizardStep {
    Identify {
        error: Option<String>,
    },
    Tickets,
    Deals,
    CreateTicket {
        deal: Option<Deal>,
        error: Option<String>,
    },
    Success {
        ticket: CreatedTicket,
    },
    TicketDetails {
        ticket: Ticket,
        messages: Vec<TicketMessage>,
        attachments: Vec<PhotoAttachment>,
    },
}

impl WizardStep {
    pub fn identify() -> Self {
        WizardStep::Identify { error: None }
    }

    pub fn number(&self) -> u8 {
        match self {
            WizardStep::Identify { .. } => 1,
            WizardStep::Tickets => 2,
            WizardStep::Deals => 3,
            WizardStep::CreateTicket { .. } => 4,
            WizardStep::Success { .. } => 5,
            WizardStep::TicketDetails { .. } => 6,
        }
    }

    /// Error shown inline on the identification or ticket form
    pub fn error(&self) -> Option<&str> {
        match self {
            WizardStep::Identify { error } | WizardStep::CreateTicket { error, .. } => {
                error.as_deref()
            }
            _ => None,
        }
    }
}

impl Default for WizardStep {
    fn default() -> Self {
        Self::identify()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentificationForm {
    pub method: IdentificationMethod,
    pub value: String,
}

impl IdentificationForm {
    pub fn new(method: IdentificationMethod, value: impl Into<String>) -> Self {
        Self {
            method,
            value: value.into(),
        }
    }
}

impl Default for IdentificationForm {
    fn default() -> Self {
        Self::new(IdentificationMethod::Phone, "")
    }
}

/// Everything the wizard knows between two commands
#[derive(Debug, Clone, Default)]
pub struct WizardState {
    pub step: WizardStep,
    pub form: IdentificationForm,
    pub auto_submitted: bool,
    pub contact: Option<Contact>,
    pub tickets: Vec<Ticket>,
    pub deals: Vec<Deal>,
    pub is_submitting_ticket: bool,
}

impl WizardState {
    /// Deal picked on step 3, if the wizard is on the ticket form
    pub fn selected_deal(&self) -> Option<&Deal> {
        match &self.step {
            WizardStep::CreateTicket { deal, .. } => deal.as_ref(),
            _ => None,
        }
    }
}

/// Ticket form contents as typed by the customer
#[derive(Debug, Clone, Default)]
pub struct TicketDraft {
    pub subject: String,
    pub description: String,
    pub files: Vec<UploadedFile>,
    /// Only read when the wizard runs in admin mode
    pub admin_email: Option<String>,
    pub admin_notes: Option<String>,
}

impl TicketDraft {
    pub fn new(subject: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_files(mut self, files: Vec<UploadedFile>) -> Self {
        self.files = files;
        self
    }

    pub fn with_admin_note(mut self, email: impl Into<String>, notes: impl Into<String>) -> Self {
        self.admin_email = Some(email.into());
        self.admin_notes = Some(notes.into());
        self
    }
}
