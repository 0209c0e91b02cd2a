// src/infra/errors.rs — Error types for specialist-desk

use thiserror::Error;

use crate::presence::PresenceError;

#[derive(Error, Debug)]
pub enum DeskError {
    // User errors
    #[error("Specialist id must not be empty")]
    InvalidSpecialistId,

    #[error("No specialist selected. Pass --specialist <ID> or set dashboard.specialist_id.")]
    NoSpecialist,

    // Backend
    #[error(transparent)]
    Presence(#[from] PresenceError),

    // Infra
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DeskError {
    /// Errors the user can fix by changing their invocation or config.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            DeskError::InvalidSpecialistId | DeskError::NoSpecialist | DeskError::Config(_)
        )
    }
}
