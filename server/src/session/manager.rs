//! Session manager for tracking all connected clients

use std::collections::HashMap;

use aerolink_shared::ServerMessage;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::SessionHandle;

/// Manages all active client sessions
///
/// One entry per client id, holding the send handle and the session's
/// telemetry job. Keeping both in one table means disconnect cleanup is a
/// single lookup-and-cancel.
pub struct SessionManager {
    /// Map of client_id -> session entry
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

struct SessionEntry {
    handle: SessionHandle,
    /// Active periodic telemetry job, at most one per session
    telemetry: Option<JoinHandle<()>>,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new client session
    pub async fn register(&self, handle: SessionHandle) {
        let client_id = handle.client_id.clone();
        let entry = SessionEntry {
            handle,
            telemetry: None,
        };
        self.sessions.write().await.insert(client_id, entry);
    }

    /// Remove a session and cancel its telemetry job
    ///
    /// Safe to call for a session that was already removed.
    pub async fn unregister(&self, client_id: &str) {
        if let Some(entry) = self.sessions.write().await.remove(client_id) {
            if let Some(task) = entry.telemetry {
                task.abort();
            }
        }
    }

    /// Get a send handle for a specific client
    pub async fn get(&self, client_id: &str) -> Option<SessionHandle> {
        self.sessions
            .read()
            .await
            .get(client_id)
            .map(|e| e.handle.clone())
    }

    /// Install a telemetry job for a session, replacing any previous one
    ///
    /// The previous job is aborted before the new one is stored. Returns
    /// false (and aborts the new job) when the session no longer exists.
    pub async fn set_telemetry(&self, client_id: &str, task: JoinHandle<()>) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(client_id) {
            Some(entry) => {
                if let Some(old) = entry.telemetry.replace(task) {
                    old.abort();
                }
                true
            }
            None => {
                task.abort();
                false
            }
        }
    }

    /// Cancel a session's telemetry job, if one is active
    ///
    /// Returns true when a job was actually cancelled.
    pub async fn clear_telemetry(&self, client_id: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        if let Some(entry) = sessions.get_mut(client_id) {
            if let Some(task) = entry.telemetry.take() {
                task.abort();
                return true;
            }
        }
        false
    }

    /// Whether a session currently has an active telemetry job
    pub async fn has_telemetry(&self, client_id: &str) -> bool {
        self.sessions
            .read()
            .await
            .get(client_id)
            .map(|e| e.telemetry.is_some())
            .unwrap_or(false)
    }

    /// Broadcast a message to all connected clients
    ///
    /// Sessions whose socket is gone are skipped silently.
    pub async fn broadcast(&self, msg: &ServerMessage) {
        let sessions = self.sessions.read().await;
        for entry in sessions.values() {
            entry.handle.send(msg);
        }
    }

    /// Get the list of connected client ids
    pub async fn client_ids(&self) -> Vec<String> {
        self.sessions.read().await.keys().cloned().collect()
    }

    /// Number of connected clients
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use tokio::sync::mpsc;
    use tokio::time::{sleep, Duration};

    fn make_handle(id: &str) -> (SessionHandle, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(8);
        (
            SessionHandle::new(id.to_string(), "127.0.0.1:0".parse().unwrap(), tx),
            rx,
        )
    }

    /// Job that counts its ticks so tests can observe cancellation
    fn ticking_task(counter: Arc<AtomicU64>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                sleep(Duration::from_millis(10)).await;
                counter.fetch_add(1, Ordering::SeqCst);
            }
        })
    }

    #[tokio::test]
    async fn test_register_and_get() {
        let manager = SessionManager::new();
        let (handle, _rx) = make_handle("c1");
        manager.register(handle).await;

        assert_eq!(manager.count().await, 1);
        assert_eq!(manager.get("c1").await.unwrap().client_id, "c1");
        assert!(manager.get("c2").await.is_none());
    }

    #[tokio::test]
    async fn test_unregister_is_idempotent() {
        let manager = SessionManager::new();
        let (handle, _rx) = make_handle("c1");
        manager.register(handle).await;

        manager.unregister("c1").await;
        manager.unregister("c1").await;
        manager.unregister("never-registered").await;
        assert_eq!(manager.count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unregister_aborts_telemetry_job() {
        let manager = SessionManager::new();
        let (handle, _rx) = make_handle("c1");
        manager.register(handle).await;

        let ticks = Arc::new(AtomicU64::new(0));
        manager
            .set_telemetry("c1", ticking_task(ticks.clone()))
            .await;

        sleep(Duration::from_millis(55)).await;
        assert!(ticks.load(Ordering::SeqCst) > 0);

        manager.unregister("c1").await;
        let frozen = ticks.load(Ordering::SeqCst);
        sleep(Duration::from_millis(100)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), frozen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_telemetry_replaces_previous_job() {
        let manager = SessionManager::new();
        let (handle, _rx) = make_handle("c1");
        manager.register(handle).await;

        let first = Arc::new(AtomicU64::new(0));
        let second = Arc::new(AtomicU64::new(0));

        assert!(manager.set_telemetry("c1", ticking_task(first.clone())).await);
        sleep(Duration::from_millis(35)).await;
        assert!(manager.set_telemetry("c1", ticking_task(second.clone())).await);

        let frozen = first.load(Ordering::SeqCst);
        sleep(Duration::from_millis(100)).await;
        assert_eq!(first.load(Ordering::SeqCst), frozen);
        assert!(second.load(Ordering::SeqCst) > 0);
        assert!(manager.has_telemetry("c1").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_telemetry_without_session_aborts_job() {
        let manager = SessionManager::new();
        let ticks = Arc::new(AtomicU64::new(0));

        assert!(!manager.set_telemetry("ghost", ticking_task(ticks.clone())).await);

        sleep(Duration::from_millis(100)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_clear_telemetry_reports_activity() {
        let manager = SessionManager::new();
        let (handle, _rx) = make_handle("c1");
        manager.register(handle).await;

        assert!(!manager.clear_telemetry("c1").await);

        let ticks = Arc::new(AtomicU64::new(0));
        manager.set_telemetry("c1", ticking_task(ticks)).await;
        assert!(manager.has_telemetry("c1").await);

        assert!(manager.clear_telemetry("c1").await);
        assert!(!manager.has_telemetry("c1").await);
        assert!(!manager.clear_telemetry("c1").await);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_open_sessions() {
        let manager = SessionManager::new();
        let (h1, mut rx1) = make_handle("c1");
        let (h2, rx2) = make_handle("c2");
        let (h3, mut rx3) = make_handle("c3");
        manager.register(h1).await;
        manager.register(h2).await;
        manager.register(h3).await;

        // c2's socket is gone
        drop(rx2);

        manager.broadcast(&ServerMessage::telemetry_stopped()).await;

        assert!(rx1.try_recv().is_ok());
        assert!(rx3.try_recv().is_ok());
        assert_eq!(manager.count().await, 3);
    }

    #[tokio::test]
    async fn test_client_ids_and_count() {
        let manager = SessionManager::new();
        assert_eq!(manager.count().await, 0);

        let (h1, _rx1) = make_handle("c1");
        let (h2, _rx2) = make_handle("c2");
        manager.register(h1).await;
        manager.register(h2).await;

        let mut ids = manager.client_ids().await;
        ids.sort();
        assert_eq!(ids, vec!["c1".to_string(), "c2".to_string()]);
        assert_eq!(manager.count().await, 2);
    }
}
