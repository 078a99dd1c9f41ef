//! Page agent: the context that owns the module catalog and enforces
//! visibility on the page.
//!
//! It runs as its own task and is reached only through messages:
//!
//! ```text
//! ┌──────────────────┐  GET_MODULES (+ reply)  ┌──────────────────┐
//! │ Session (control │ ──────────────────────▶ │    PageAgent     │
//! │     surface)     │  SYNC_MODULES (no ack)  │  (catalog owner) │
//! │   AgentHandle    │ ──────────────────────▶ │      inbox       │
//! └──────────────────┘                         └──────────────────┘
//!                                                 │ re-reads hiddenModules
//!                                                 ▼
//!                                           watch<HiddenSet> (enforced)
//! ```

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot, watch};

use crate::data::loader;
use crate::data::model::{HiddenSet, Module};
use crate::error::{Error, Result};
use crate::store::{self, DurableStore};

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

/// Reply to `GET_MODULES`. A missing `modules` field means "no data".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulesResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<Vec<Module>>,
}

/// Messages accepted by the page agent.
#[derive(Debug)]
pub enum AgentCommand {
    /// Report the modules currently on the page.
    GetModules {
        reply: oneshot::Sender<ModulesResponse>,
    },
    /// Re-read the persisted hidden set and re-apply it. No reply.
    SyncModules,
}

impl AgentCommand {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GetModules { .. } => "GET_MODULES",
            Self::SyncModules => "SYNC_MODULES",
        }
    }
}

impl fmt::Display for AgentCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

// ---------------------------------------------------------------------------
// Handle used by the control surface
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AgentHandle {
    tx: mpsc::UnboundedSender<AgentCommand>,
}

impl AgentHandle {
    /// Wrap an existing inbox sender, for agents not built by [`PageAgent::new`].
    pub fn from_sender(tx: mpsc::UnboundedSender<AgentCommand>) -> Self {
        Self { tx }
    }

    /// Ask for the page's modules.
    ///
    /// Returns `None` if the agent is gone or drops the request without
    /// answering.
    pub async fn get_modules(&self) -> Option<ModulesResponse> {
        let (reply, response) = oneshot::channel();
        self.tx.send(AgentCommand::GetModules { reply }).ok()?;
        response.await.ok()
    }

    /// Post `SYNC_MODULES` without waiting for anything.
    ///
    /// An error only means the message could not be queued; delivery is
    /// never confirmed.
    pub fn post_sync(&self) -> Result<()> {
        self.tx
            .send(AgentCommand::SyncModules)
            .map_err(|_| Error::AgentUnavailable)
    }
}

// ---------------------------------------------------------------------------
// Catalog sources
// ---------------------------------------------------------------------------

/// Where the agent discovers the modules present on its page.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn scan(&self) -> anyhow::Result<Vec<Module>>;
}

/// Fixed module list.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog(pub Vec<Module>);

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn scan(&self) -> anyhow::Result<Vec<Module>> {
        Ok(self.0.clone())
    }
}

/// Catalog read from a `.json` / `.csv` file on every scan.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalog {
    async fn scan(&self) -> anyhow::Result<Vec<Module>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || loader::load_file(&path)).await?
    }
}

// ---------------------------------------------------------------------------
// The agent task
// ---------------------------------------------------------------------------

pub struct PageAgent {
    source: Box<dyn CatalogSource>,
    store: Arc<dyn DurableStore>,
    inbox: mpsc::UnboundedReceiver<AgentCommand>,
    enforced: watch::Sender<HiddenSet>,
}

impl PageAgent {
    /// Build an agent plus the handle to reach it and a receiver tracking
    /// which page modules it currently keeps hidden.
    pub fn new(
        source: Box<dyn CatalogSource>,
        store: Arc<dyn DurableStore>,
    ) -> (Self, AgentHandle, watch::Receiver<HiddenSet>) {
        let (tx, inbox) = mpsc::unbounded_channel();
        let (enforced, enforced_rx) = watch::channel(HiddenSet::new());
        let agent = Self {
            source,
            store,
            inbox,
            enforced,
        };
        (agent, AgentHandle { tx }, enforced_rx)
    }

    /// Apply the persisted hidden set, then serve commands until every
    /// handle is dropped.
    pub async fn run(mut self) {
        log::info!("Page agent started");
        self.apply_visibility().await;

        while let Some(command) = self.inbox.recv().await {
            log::debug!("Page agent received {command}");
            match command {
                AgentCommand::GetModules { reply } => {
                    let response = self.report_modules().await;
                    if reply.send(response).is_err() {
                        log::debug!("GET_MODULES requester went away");
                    }
                }
                AgentCommand::SyncModules => self.apply_visibility().await,
            }
        }

        log::info!("Page agent stopped");
    }

    async fn report_modules(&self) -> ModulesResponse {
        match self.source.scan().await {
            Ok(modules) => ModulesResponse {
                modules: Some(modules),
            },
            Err(e) => {
                log::warn!("Module scan failed: {e:#}");
                ModulesResponse::default()
            }
        }
    }

    async fn apply_visibility(&self) {
        let hidden = match store::load_hidden(self.store.as_ref()).await {
            Ok(hidden) => hidden,
            Err(e) => {
                log::warn!("Keeping current visibility, hidden set unreadable: {e}");
                return;
            }
        };
        let modules = match self.source.scan().await {
            Ok(modules) => modules,
            Err(e) => {
                log::warn!("Keeping current visibility, module scan failed: {e:#}");
                return;
            }
        };

        let on_page: HiddenSet = modules
            .iter()
            .filter(|m| hidden.contains(&m.id))
            .map(|m| m.id.clone())
            .collect();
        log::info!(
            "Applied visibility: {} of {} modules hidden",
            on_page.len(),
            modules.len()
        );
        self.enforced.send_replace(on_page);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn sample() -> Vec<Module> {
        vec![
            Module::new("1", "2024 - Y1.S1 - Math"),
            Module::new("2", "Misc"),
        ]
    }

    #[test]
    fn test_response_json_shape() {
        let parsed: ModulesResponse =
            serde_json::from_str(r#"{"modules":[{"id":"1","name":"Math"}]}"#).unwrap();
        assert_eq!(parsed.modules, Some(vec![Module::new("1", "Math")]));

        let empty: ModulesResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.modules, None);
    }

    #[test]
    fn test_command_kinds() {
        let (reply, _rx) = oneshot::channel();
        assert_eq!(AgentCommand::GetModules { reply }.kind(), "GET_MODULES");
        assert_eq!(AgentCommand::SyncModules.to_string(), "SYNC_MODULES");
    }

    #[tokio::test]
    async fn test_get_modules_round_trip() {
        let store = Arc::new(MemoryStore::new());
        let (agent, handle, _enforced) = PageAgent::new(Box::new(StaticCatalog(sample())), store);
        tokio::spawn(agent.run());

        let response = handle.get_modules().await.unwrap();
        assert_eq!(response.modules, Some(sample()));
    }

    #[tokio::test]
    async fn test_sync_applies_persisted_set() {
        let store = Arc::new(MemoryStore::new());
        let (agent, handle, mut enforced) =
            PageAgent::new(Box::new(StaticCatalog(sample())), store.clone());
        tokio::spawn(agent.run());

        // Ids not on the page are ignored.
        let hidden: HiddenSet = ["2", "99"].into_iter().collect();
        store::save_hidden(store.as_ref(), &hidden).await.unwrap();
        handle.post_sync().unwrap();

        let applied = enforced
            .wait_for(|set| set.contains("2"))
            .await
            .unwrap()
            .clone();
        assert_eq!(applied.iter().collect::<Vec<_>>(), vec!["2"]);
    }

    #[tokio::test]
    async fn test_unreachable_agent() {
        let store = Arc::new(MemoryStore::new());
        let (agent, handle, _enforced) = PageAgent::new(Box::new(StaticCatalog(sample())), store);
        drop(agent);

        assert!(handle.get_modules().await.is_none());
        assert!(matches!(handle.post_sync(), Err(Error::AgentUnavailable)));
    }

    #[tokio::test]
    async fn test_failed_scan_reports_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileCatalog::new(dir.path().join("missing.json"));
        let store = Arc::new(MemoryStore::new());
        let (agent, handle, _enforced) = PageAgent::new(Box::new(source), store);
        tokio::spawn(agent.run());

        let response = handle.get_modules().await.unwrap();
        assert_eq!(response.modules, None);
    }
}
