use slotmap::{SlotMap, new_key_type};

use crate::session::ProjectSession;

new_key_type! {
    pub struct ProjectKey;
}

/// Owns the rig sessions of every open project.
///
/// Closing hands the session back so the caller can tear it down against
/// the host scene it was built on.
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: SlotMap<ProjectKey, ProjectSession>,
    active: Option<ProjectKey>,
}

impl SessionManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session. The first one becomes active.
    pub fn insert(&mut self, session: ProjectSession) -> ProjectKey {
        let key = self.sessions.insert(session);
        if self.active.is_none() {
            self.active = Some(key);
        }
        key
    }

    /// Removes a session for teardown.
    pub fn close(&mut self, key: ProjectKey) -> Option<ProjectSession> {
        if self.active == Some(key) {
            self.active = None;
        }
        self.sessions.remove(key)
    }

    /// Switches the active project. Unknown keys are ignored.
    pub fn set_active(&mut self, key: ProjectKey) -> bool {
        if self.sessions.contains_key(key) {
            self.active = Some(key);
            true
        } else {
            log::error!("Attempted to activate a closed project session");
            false
        }
    }

    #[must_use]
    pub fn active_key(&self) -> Option<ProjectKey> {
        self.active
    }

    #[must_use]
    pub fn active(&self) -> Option<&ProjectSession> {
        self.active.and_then(|key| self.sessions.get(key))
    }

    pub fn active_mut(&mut self) -> Option<&mut ProjectSession> {
        self.active.and_then(|key| self.sessions.get_mut(key))
    }

    #[must_use]
    pub fn get(&self, key: ProjectKey) -> Option<&ProjectSession> {
        self.sessions.get(key)
    }

    pub fn get_mut(&mut self, key: ProjectKey) -> Option<&mut ProjectSession> {
        self.sessions.get_mut(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Removes every session (plugin teardown).
    pub fn drain(&mut self) -> Vec<(ProjectKey, ProjectSession)> {
        self.active = None;
        self.sessions.drain().collect()
    }
}
