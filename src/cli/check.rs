// src/cli/check.rs — One-shot activation: online, report, offline.

use std::sync::Arc;

use crate::presence::PresenceClient;
use crate::session::{SessionController, SessionState};
use crate::tui::widgets::DashboardHeader;

pub async fn run_check(presence: Arc<dyn PresenceClient>, specialist_id: &str) -> anyhow::Result<()> {
    let mut controller = SessionController::new(presence);
    drop(controller.set_specialist(specialist_id)?);

    let state = controller.settled().await;
    println!("{}", describe(&state));

    controller.deactivate().wait().await;
    println!("  Presence:   offline (requested)");

    match state.error {
        Some(error) => anyhow::bail!("{error}"),
        None => Ok(()),
    }
}

/// Human-readable summary of a settled session.
pub fn describe(state: &SessionState) -> String {
    match (&state.specialist, &state.error) {
        (Some(s), _) => {
            let header = DashboardHeader::new(s, 0);
            format!(
                "[{}] {} ({})\n  Status:     {}\n  Capacity:   {}",
                header.initial(),
                s.name,
                s.id,
                s.status,
                header.ratio()
            )
        }
        (None, Some(error)) => format!("  {error}"),
        (None, None) if state.loading => "  Loading...".to_string(),
        (None, None) => "  (no specialist)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presence::memory::MemoryPresence;
    use crate::presence::{SpecialistProfile, SpecialistStatus};
    use crate::session::SessionError;

    #[test]
    fn test_describe_ready() {
        let state = SessionState::ready(SpecialistProfile {
            id: "s1".into(),
            name: "noor".into(),
            status: SpecialistStatus::Online,
            max_concurrent_chats: 4,
        });
        let text = describe(&state);
        assert!(text.starts_with("[N] noor (s1)"));
        assert!(text.contains("Status:     online"));
        assert!(text.contains("Capacity:   0/4"));
    }

    #[test]
    fn test_describe_error() {
        let text = describe(&SessionState::failed(SessionError::NotFound));
        assert_eq!(text, "  Specialist not found. Please register first.");
    }

    #[tokio::test]
    async fn test_run_check_goes_online_then_offline() {
        let backend = Arc::new(MemoryPresence::demo("s1"));
        run_check(backend.clone(), "s1").await.unwrap();
        assert_eq!(
            backend.status_log(),
            vec![
                ("s1".to_string(), SpecialistStatus::Online),
                ("s1".to_string(), SpecialistStatus::Offline),
            ]
        );
    }

    #[tokio::test]
    async fn test_run_check_unknown_specialist_fails() {
        let backend = Arc::new(MemoryPresence::new());
        let err = run_check(backend.clone(), "ghost").await.unwrap_err();
        assert_eq!(err.to_string(), "Specialist not found. Please register first.");
        // Offline is still attempted for the id that was set.
        assert_eq!(
            backend.status_log(),
            vec![("ghost".to_string(), SpecialistStatus::Offline)]
        );
    }
}
