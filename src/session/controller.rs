use std::sync::Arc;

use crate::agent::AgentHandle;
use crate::data::filter;
use crate::data::model::{Group, Module, SortOrder, StatusFilter, ViewConfig};
use crate::store::DurableStore;

use super::hidden::HiddenSetManager;
use super::notifier::SyncNotifier;

// ---------------------------------------------------------------------------
// Events and outcomes
// ---------------------------------------------------------------------------

/// User actions that change the hidden set or the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Toggle(String),
    BulkHide(Vec<String>),
    BulkShow(Vec<String>),
    ClearAll,
    SetFilter(StatusFilter),
    SetSort(SortOrder),
    SetSearch(String),
}

impl SessionEvent {
    /// Whether the event changes the hidden set.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::Toggle(_) | Self::BulkHide(_) | Self::BulkShow(_) | Self::ClearAll
        )
    }
}

/// What the renderer should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub groups: Vec<Group>,
    pub config: ViewConfig,
    /// Modules in the catalog.
    pub total: usize,
    /// Catalog modules currently hidden.
    pub hidden: usize,
}

impl View {
    /// Ids of every module shown, in display order.
    pub fn shown_ids(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .flat_map(|g| g.members.iter().map(|m| m.id.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    Rendered(View),
    /// The page agent gave no usable module list; nothing is rendered.
    NoData,
    /// Nothing to do (e.g. a bulk action with an empty selection).
    Unchanged,
    /// The store refused a write; the previous view stays valid.
    PersistFailed(String),
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Orchestrates one control-surface session.
///
/// The catalog is fetched once and kept for the session; the hidden set is
/// re-read from the store whenever the view is recomputed. Mutations render
/// and notify only after the store acknowledges the write.
pub struct SessionController {
    agent: AgentHandle,
    hidden: HiddenSetManager,
    notifier: SyncNotifier,
    catalog: Option<Vec<Module>>,
    config: ViewConfig,
}

impl SessionController {
    pub fn new(agent: AgentHandle, store: Arc<dyn DurableStore>) -> Self {
        Self {
            notifier: SyncNotifier::new(agent.clone()),
            agent,
            hidden: HiddenSetManager::new(store),
            catalog: None,
            config: ViewConfig::default(),
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn catalog(&self) -> Option<&[Module]> {
        self.catalog.as_deref()
    }

    pub fn hidden(&self) -> &HiddenSetManager {
        &self.hidden
    }

    /// Fetch the catalog (first call only), load the hidden set and render.
    pub async fn start(&mut self) -> SessionUpdate {
        if self.catalog.is_none() {
            match self.agent.get_modules().await.and_then(|r| r.modules) {
                Some(modules) => {
                    log::info!("Session catalog: {} modules", modules.len());
                    self.catalog = Some(modules);
                }
                None => {
                    log::warn!("Page agent returned no modules");
                    return SessionUpdate::NoData;
                }
            }
        }
        self.hidden.refresh().await;
        self.render()
    }

    pub async fn handle(&mut self, event: SessionEvent) -> SessionUpdate {
        if self.catalog.is_none() {
            return SessionUpdate::NoData;
        }
        log::debug!("Session event: {event:?}");

        let mutation = match event {
            SessionEvent::SetFilter(filter) => {
                self.config.filter = filter;
                return self.rerender().await;
            }
            SessionEvent::SetSort(sort) => {
                self.config.sort = sort;
                return self.rerender().await;
            }
            SessionEvent::SetSearch(search) => {
                self.config.search = search;
                return self.rerender().await;
            }
            SessionEvent::Toggle(id) => self.hidden.toggle(&id).await.map(|_| ()),
            SessionEvent::BulkHide(ids) | SessionEvent::BulkShow(ids) if ids.is_empty() => {
                return SessionUpdate::Unchanged;
            }
            SessionEvent::BulkHide(ids) => self.hidden.bulk_hide(&ids).await.map(|_| ()),
            SessionEvent::BulkShow(ids) => self.hidden.bulk_show(&ids).await.map(|_| ()),
            SessionEvent::ClearAll => self.hidden.clear_all().await.map(|_| ()),
        };

        match mutation {
            Ok(()) => {
                self.notifier.notify();
                self.render()
            }
            Err(e) => {
                log::error!("Hidden set not saved: {e}");
                SessionUpdate::PersistFailed(e.to_string())
            }
        }
    }

    async fn rerender(&mut self) -> SessionUpdate {
        self.hidden.refresh().await;
        self.render()
    }

    fn render(&self) -> SessionUpdate {
        let Some(catalog) = &self.catalog else {
            return SessionUpdate::NoData;
        };
        let hidden = self.hidden.current();
        let groups = filter::process(catalog, hidden, &self.config);
        let view = View {
            total: catalog.len(),
            hidden: catalog.iter().filter(|m| hidden.contains(&m.id)).count(),
            groups,
            config: self.config.clone(),
        };
        log::debug!(
            "Rendered {} groups ({} of {} modules hidden)",
            view.groups.len(),
            view.hidden,
            view.total
        );
        SessionUpdate::Rendered(view)
    }
}
