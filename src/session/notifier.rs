use crate::agent::AgentHandle;

/// Tells the page agent to re-apply the persisted hidden set.
///
/// One `SYNC_MODULES` per committed mutation, at most once, never awaited
/// and never retried. The store stays authoritative: an agent that misses a
/// sync picks up the same set on its next start or sync.
#[derive(Debug, Clone)]
pub struct SyncNotifier {
    agent: AgentHandle,
}

impl SyncNotifier {
    pub fn new(agent: AgentHandle) -> Self {
        Self { agent }
    }

    pub fn notify(&self) {
        match self.agent.post_sync() {
            Ok(()) => log::debug!("Posted SYNC_MODULES"),
            Err(e) => log::debug!("Dropped SYNC_MODULES: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::agent::{PageAgent, StaticCatalog};
    use crate::data::model::Module;
    use crate::store::{self, MemoryStore};

    #[tokio::test]
    async fn test_notify_reaches_agent() {
        let store = Arc::new(MemoryStore::new());
        let catalog = StaticCatalog(vec![Module::new("1", "Misc")]);
        let (agent, handle, mut enforced) = PageAgent::new(Box::new(catalog), store.clone());
        tokio::spawn(agent.run());

        store::save_hidden(store.as_ref(), &["1"].into_iter().collect())
            .await
            .unwrap();
        SyncNotifier::new(handle).notify();

        enforced.wait_for(|set| set.contains("1")).await.unwrap();
    }

    #[tokio::test]
    async fn test_notify_swallows_missing_agent() {
        let store = Arc::new(MemoryStore::new());
        let (agent, handle, _enforced) = PageAgent::new(Box::new(StaticCatalog::default()), store);
        drop(agent);

        // Must not panic or surface anything.
        SyncNotifier::new(handle).notify();
    }
}
