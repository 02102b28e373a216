// src/models/identity.rs

use serde::{Deserialize, Serialize};

/// Name shown when the identity carries no full name.
pub const DEFAULT_PARTICIPANT_NAME: &str = "Participant";

/// Organization shown when the identity carries no company.
pub const DEFAULT_COMPANY_NAME: &str = "Entreprise";

/// The authenticated user, handed explicitly to the quiz and the exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    pub full_name: Option<String>,
    pub company_name: Option<String>,
}

impl Identity {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            full_name: None,
            company_name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = Some(name.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company_name = Some(company.into());
        self
    }

    pub fn display_name(&self) -> &str {
        non_blank(self.full_name.as_deref()).unwrap_or(DEFAULT_PARTICIPANT_NAME)
    }

    pub fn display_company(&self) -> &str {
        non_blank(self.company_name.as_deref()).unwrap_or(DEFAULT_COMPANY_NAME)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
