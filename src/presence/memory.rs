// src/presence/memory.rs — In-process chat backend
//
// Backs `--demo` mode and the test suite. Every status write is recorded
// so callers can assert on the exact presence traffic.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use super::{
    ActiveChatsSource, BotTurn, ChatContext, LiveChatSession, PresenceClient, PresenceError,
    SpecialistProfile, SpecialistStatus, UserInfo,
};

#[derive(Default)]
pub struct MemoryPresence {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    specialists: HashMap<String, SpecialistProfile>,
    chats: HashMap<String, Vec<LiveChatSession>>,
    status_log: Vec<(String, SpecialistStatus)>,
}

impl MemoryPresence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_specialist(self, profile: SpecialistProfile) -> Self {
        self.insert_specialist(profile);
        self
    }

    pub fn insert_specialist(&self, profile: SpecialistProfile) {
        let mut inner = self.lock();
        inner.specialists.insert(profile.id.clone(), profile);
    }

    pub fn set_chats(&self, specialist_id: &str, chats: Vec<LiveChatSession>) {
        let mut inner = self.lock();
        inner.chats.insert(specialist_id.to_string(), chats);
    }

    /// Current remote status of a specialist, if registered.
    pub fn status_of(&self, id: &str) -> Option<SpecialistStatus> {
        self.lock().specialists.get(id).map(|p| p.status)
    }

    /// Every `update_specialist_status` call in arrival order.
    pub fn status_log(&self) -> Vec<(String, SpecialistStatus)> {
        self.lock().status_log.clone()
    }

    /// A small seeded backend for trying the dashboard without a server.
    pub fn demo(specialist_id: &str) -> Self {
        let now = Utc::now();
        let backend = Self::new().with_specialist(SpecialistProfile {
            id: specialist_id.to_string(),
            name: "demo specialist".into(),
            status: SpecialistStatus::Offline,
            max_concurrent_chats: 5,
        });
        backend.set_chats(
            specialist_id,
            vec![
                LiveChatSession {
                    id: "chat-1001".into(),
                    created_at: now - Duration::minutes(12),
                    user_info: Some(UserInfo {
                        name: Some("Priya".into()),
                    }),
                    context: ChatContext {
                        bot_transcript: vec![BotTurn {
                            role: "bot".into(),
                            content: "Which product are you asking about?".into(),
                        }],
                    },
                },
                LiveChatSession {
                    id: "chat-1002".into(),
                    created_at: now - Duration::minutes(3),
                    user_info: None,
                    context: ChatContext::default(),
                },
            ],
        );
        backend
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Poisoning is ignored: the guarded data is plain values.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl PresenceClient for MemoryPresence {
    async fn get_specialist(&self, id: &str) -> Result<Option<SpecialistProfile>, PresenceError> {
        Ok(self.lock().specialists.get(id).cloned())
    }

    async fn update_specialist_status(
        &self,
        id: &str,
        status: SpecialistStatus,
    ) -> Result<(), PresenceError> {
        let mut inner = self.lock();
        inner.status_log.push((id.to_string(), status));
        match inner.specialists.get_mut(id) {
            Some(profile) => {
                profile.status = status;
                Ok(())
            }
            None => Err(PresenceError::UnknownSpecialist(id.to_string())),
        }
    }
}

#[async_trait]
impl ActiveChatsSource for MemoryPresence {
    async fn active_chats(
        &self,
        specialist_id: &str,
    ) -> Result<Vec<LiveChatSession>, PresenceError> {
        Ok(self
            .lock()
            .chats
            .get(specialist_id)
            .cloned()
            .unwrap_or_default())
    }
}
