use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use eframe::egui;
use tokio::sync::mpsc;

use crate::agent::{AgentHandle, FileCatalog, PageAgent};
use crate::config::Settings;
use crate::session::{session_loop, SessionController, SessionRequest, SessionResult};
use crate::state::AppState;
use crate::store::{DurableStore, JsonFileStore};
use crate::theme::Theme;
use crate::ui::{list, panels};

// ---------------------------------------------------------------------------
// Session wiring
// ---------------------------------------------------------------------------

/// Channels to the running session task. Dropping it ends the session, which
/// in turn drops the page agent's last handle and stops the agent.
struct SessionLink {
    catalog: Option<PathBuf>,
    request_tx: mpsc::UnboundedSender<SessionRequest>,
    result_rx: mpsc::UnboundedReceiver<SessionResult>,
}

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SliitScopeApp {
    pub state: AppState,
    store: Arc<dyn DurableStore>,
    link: SessionLink,
    /// Runs the session and page agent tasks.
    runtime: tokio::runtime::Runtime,
}

impl SliitScopeApp {
    pub fn new(settings: Settings) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .context("creating tokio runtime")?;

        log::info!("Using store {}", settings.store_path.display());
        let store: Arc<dyn DurableStore> = Arc::new(JsonFileStore::new(&settings.store_path));

        let mut state = AppState::default();
        match settings.catalog.clone() {
            Some(path) => state.reset_for_catalog(path),
            None => state.outbox.push(SessionRequest::LoadTheme),
        }

        let link = spawn_session(&runtime, store.clone(), settings.catalog);
        Ok(Self {
            state,
            store,
            link,
            runtime,
        })
    }

    /// Restart the session when the user picked another catalog.
    fn sync_catalog(&mut self) {
        if self.state.catalog_path != self.link.catalog {
            self.link = spawn_session(
                &self.runtime,
                self.store.clone(),
                self.state.catalog_path.clone(),
            );
        }
    }

    fn flush_requests(&mut self) {
        for request in self.state.take_requests() {
            if self.link.request_tx.send(request).is_err() {
                log::warn!("Session loop is gone, dropping request");
            }
        }
    }

    fn poll_results(&mut self) -> bool {
        let mut received = false;
        while let Ok(result) = self.link.result_rx.try_recv() {
            self.state.apply_result(result);
            received = true;
        }
        received
    }
}

/// Start a page agent for `catalog` (if any) and a session bound to it.
fn spawn_session(
    runtime: &tokio::runtime::Runtime,
    store: Arc<dyn DurableStore>,
    catalog: Option<PathBuf>,
) -> SessionLink {
    let (request_tx, request_rx) = mpsc::unbounded_channel();
    let (result_tx, result_rx) = mpsc::unbounded_channel();

    let agent_handle = match &catalog {
        Some(path) => {
            let (agent, handle, _enforced) =
                PageAgent::new(Box::new(FileCatalog::new(path)), store.clone());
            runtime.spawn(agent.run());
            handle
        }
        None => {
            // No page yet: an agent with no inbox reader answers nothing.
            let (tx, _rx) = mpsc::unbounded_channel();
            AgentHandle::from_sender(tx)
        }
    };

    let controller = SessionController::new(agent_handle, store.clone());
    runtime.spawn(session_loop(controller, store, request_rx, result_tx));

    SessionLink {
        catalog,
        request_tx,
        result_rx,
    }
}

impl eframe::App for SliitScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.poll_results() {
            ctx.request_repaint();
        }

        ctx.set_visuals(match self.state.theme {
            Theme::Dark => egui::Visuals::dark(),
            Theme::Light => egui::Visuals::light(),
        });

        // ---- Top panel: menu bar + controls ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
            ui.separator();
            panels::controls(ui, &mut self.state);
        });

        // ---- Bottom panel: bulk actions ----
        egui::TopBottomPanel::bottom("bulk_bar").show(ctx, |ui| {
            panels::bulk_bar(ui, &mut self.state);
        });

        // ---- Central panel: grouped modules ----
        egui::CentralPanel::default().show(ctx, |ui| {
            list::module_list(ui, &mut self.state);
        });

        self.sync_catalog();
        self.flush_requests();

        // Results arrive from another thread; keep polling while a session runs.
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
