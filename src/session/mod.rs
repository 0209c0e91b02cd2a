// src/session/mod.rs — Specialist session lifecycle
//
// One `SessionController` per dashboard run. It brings a specialist online
// when activated and takes them offline again when deactivated.

pub mod controller;

use thiserror::Error;

use crate::presence::SpecialistProfile;

pub use controller::{Deactivation, SessionController};

/// The only session failures shown to the user. `Display` is the exact message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("Specialist not found. Please register first.")]
    NotFound,

    #[error("Failed to load dashboard. Please try again.")]
    Unexpected,
}

/// What the dashboard renders from: `{specialist, loading, error}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub specialist: Option<SpecialistProfile>,
    pub loading: bool,
    pub error: Option<SessionError>,
}

impl SessionState {
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Default::default()
        }
    }

    pub fn ready(specialist: SpecialistProfile) -> Self {
        Self {
            specialist: Some(specialist),
            loading: false,
            error: None,
        }
    }

    pub fn failed(error: SessionError) -> Self {
        Self {
            specialist: None,
            loading: false,
            error: Some(error),
        }
    }
}
