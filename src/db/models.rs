use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error as ThisError;

/// A row of the `banks` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Bank {
    pub id: i64,
    pub name: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ValidationError {
    #[error("Name and location are required")]
    MissingFields,
}

/// Name and location that passed validation: both trimmed and non-empty.
///
/// Repository writes only accept this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankInput {
    name: String,
    location: String,
}

impl BankInput {
    pub fn parse(name: Option<&str>, location: Option<&str>) -> Result<Self, ValidationError> {
        let name = name.map(str::trim).unwrap_or_default();
        let location = location.map(str::trim).unwrap_or_default();
        if name.is_empty() || location.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        Ok(Self {
            name: name.to_string(),
            location: location.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub(crate) fn into_bank(self, id: i64) -> Bank {
        Bank {
            id,
            name: self.name,
            location: self.location,
        }
    }
}

/// Raw `{name, location}` payload shared by the HTML form and the JSON API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BankPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl BankPayload {
    pub fn validate(&self) -> Result<BankInput, ValidationError> {
        BankInput::parse(self.name.as_deref(), self.location.as_deref())
    }
}
