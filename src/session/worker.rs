//! Background session loop.
//!
//! The UI thread never awaits anything. It queues [`SessionRequest`]s and
//! polls [`SessionResult`]s once per frame:
//!
//! ```text
//! ┌──────────────────┐          ┌──────────────────┐
//! │    UI Thread     │          │   session_loop   │
//! │  (SliitScopeApp) │          │ (tokio task)     │
//! │                  │          │                  │
//! │  request_tx ───────────────▶│  request_rx      │
//! │                  │          │                  │
//! │  result_rx ◀────────────────│  result_tx       │
//! └──────────────────┘          └──────────────────┘
//! ```
//!
//! Requests are handled one at a time, so a mutation's render is always
//! delivered before the next request starts.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::store::DurableStore;
use crate::theme::{self, Theme};

use super::controller::{SessionController, SessionEvent, SessionUpdate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionRequest {
    /// Fetch the catalog and produce the first view.
    Start,
    Event(SessionEvent),
    LoadTheme,
    ToggleTheme,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionResult {
    Update(SessionUpdate),
    /// Theme to apply; sent only once the store holds it.
    Theme(Theme),
    ThemeFailed(String),
}

/// Process requests until the UI drops its sender.
pub async fn session_loop(
    mut controller: SessionController,
    store: Arc<dyn DurableStore>,
    mut request_rx: mpsc::UnboundedReceiver<SessionRequest>,
    result_tx: mpsc::UnboundedSender<SessionResult>,
) {
    log::info!("Starting session loop");
    let mut current_theme = Theme::default();

    while let Some(request) = request_rx.recv().await {
        let result = match request {
            SessionRequest::Start => SessionResult::Update(controller.start().await),
            SessionRequest::Event(event) => SessionResult::Update(controller.handle(event).await),
            SessionRequest::LoadTheme => match theme::load_theme(store.as_ref()).await {
                Ok(loaded) => {
                    current_theme = loaded;
                    SessionResult::Theme(loaded)
                }
                Err(e) => {
                    log::warn!("Theme unreadable, keeping {current_theme}: {e}");
                    SessionResult::Theme(current_theme)
                }
            },
            SessionRequest::ToggleTheme => {
                let next = current_theme.toggled();
                match theme::save_theme(store.as_ref(), next).await {
                    Ok(()) => {
                        log::info!("Theme set to {next}");
                        current_theme = next;
                        SessionResult::Theme(next)
                    }
                    Err(e) => {
                        log::error!("Theme not saved: {e}");
                        SessionResult::ThemeFailed(e.to_string())
                    }
                }
            }
        };

        if result_tx.send(result).is_err() {
            log::debug!("UI went away, dropping session result");
            break;
        }
    }

    log::info!("Session loop ended");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{PageAgent, StaticCatalog};
    use crate::data::model::Module;
    use crate::store::MemoryStore;

    fn spawn_loop(
        store: Arc<MemoryStore>,
    ) -> (
        mpsc::UnboundedSender<SessionRequest>,
        mpsc::UnboundedReceiver<SessionResult>,
    ) {
        let catalog = StaticCatalog(vec![Module::new("1", "2024 - Y1.S1 - Math")]);
        let (agent, handle, _enforced) = PageAgent::new(Box::new(catalog), store.clone());
        tokio::spawn(agent.run());

        let controller = SessionController::new(handle, store.clone());
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (result_tx, result_rx) = mpsc::unbounded_channel();
        tokio::spawn(session_loop(controller, store, request_rx, result_tx));
        (request_tx, result_rx)
    }

    #[tokio::test]
    async fn test_results_follow_request_order() {
        let store = Arc::new(MemoryStore::new());
        let (tx, mut rx) = spawn_loop(store);

        tx.send(SessionRequest::Start).unwrap();
        tx.send(SessionRequest::Event(SessionEvent::Toggle("1".into())))
            .unwrap();
        tx.send(SessionRequest::Event(SessionEvent::Toggle("1".into())))
            .unwrap();

        let mut hidden_counts = Vec::new();
        for _ in 0..3 {
            match rx.recv().await.unwrap() {
                SessionResult::Update(SessionUpdate::Rendered(view)) => {
                    hidden_counts.push(view.hidden)
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(hidden_counts, vec![0, 1, 0]);
    }

    #[tokio::test]
    async fn test_theme_toggle_persists() {
        let store = Arc::new(MemoryStore::new());
        let (tx, mut rx) = spawn_loop(store.clone());

        tx.send(SessionRequest::LoadTheme).unwrap();
        assert_eq!(rx.recv().await, Some(SessionResult::Theme(Theme::Dark)));

        tx.send(SessionRequest::ToggleTheme).unwrap();
        assert_eq!(rx.recv().await, Some(SessionResult::Theme(Theme::Light)));
        assert_eq!(
            theme::load_theme(store.as_ref()).await.unwrap(),
            Theme::Light
        );
    }
}
