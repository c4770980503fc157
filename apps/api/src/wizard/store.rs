use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::render::TemplateId;
use crate::wizard::session::{SessionView, WizardSession};

/// In-memory wizard sessions, shared across handlers.
///
/// The lock is held only for synchronous session changes; nothing awaits
/// while holding it.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, WizardSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, template: TemplateId) -> SessionView {
        let session = WizardSession::new(template);
        let view = session.view();
        self.inner.write().await.insert(session.id(), session);
        info!("Created wizard session {}", view.id);
        view
    }

    pub async fn view(&self, id: Uuid) -> Result<SessionView, AppError> {
        self.inner
            .read()
            .await
            .get(&id)
            .map(WizardSession::view)
            .ok_or_else(|| not_found(id))
    }

    /// Runs `f` against the session under the write lock.
    pub async fn with_session<T, E, F>(&self, id: Uuid, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut WizardSession) -> Result<T, E>,
        AppError: From<E>,
    {
        let mut sessions = self.inner.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        Ok(f(session)?)
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        match self.inner.write().await.remove(&id) {
            Some(_) => {
                info!("Discarded wizard session {id}");
                Ok(())
            }
            None => Err(not_found(id)),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Drops sessions untouched for longer than `max_idle`. Returns how many.
    pub async fn sweep_idle(&self, max_idle: chrono::Duration) -> usize {
        let cutoff = Utc::now() - max_idle;
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.updated_at() >= cutoff);
        before - sessions.len()
    }

    /// Periodically sweeps idle sessions for the lifetime of the process.
    pub fn spawn_sweeper(&self, every: Duration, max_idle: chrono::Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let removed = store.sweep_idle(max_idle).await;
                if removed > 0 {
                    info!(
                        "Expired {removed} idle wizard session(s), {} active",
                        store.len().await
                    );
                }
            }
        })
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Wizard session {id} not found"))
}
