use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::color::GroupColors;
use crate::data::model::{SortOrder, StatusFilter};
use crate::session::{SessionEvent, SessionRequest, SessionResult, SessionUpdate, View};
use crate::theme::Theme;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Widgets never talk to the session directly: they queue requests in
/// `outbox`, which the app drains once per frame.
pub struct AppState {
    /// Catalog file the page agent serves (None until one is chosen).
    pub catalog_path: Option<PathBuf>,

    /// Last view produced by the session.
    pub view: Option<View>,

    /// Header accent per group in `view`.
    pub group_colors: GroupColors,

    /// Control values, mirrored to the session on change.
    pub filter: StatusFilter,
    pub sort: SortOrder,
    pub search: String,

    /// Module ids ticked for a bulk action.
    pub selected: BTreeSet<String>,
    pub select_all: bool,

    pub theme: Theme,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a hidden-set write is in flight.
    pub saving: bool,

    /// Whether the page agent answered without a module list.
    pub no_data: bool,

    pub outbox: Vec<SessionRequest>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            catalog_path: None,
            view: None,
            group_colors: GroupColors::default(),
            filter: StatusFilter::default(),
            sort: SortOrder::default(),
            search: String::new(),
            selected: BTreeSet::new(),
            select_all: false,
            theme: Theme::default(),
            status_message: None,
            saving: false,
            no_data: false,
            outbox: Vec::new(),
        }
    }
}

impl AppState {
    /// Forget everything tied to the previous catalog and queue the new
    /// session's start. Theme survives.
    pub fn reset_for_catalog(&mut self, path: PathBuf) {
        let theme = self.theme;
        *self = Self {
            catalog_path: Some(path),
            theme,
            ..Self::default()
        };
        self.outbox
            .extend([SessionRequest::LoadTheme, SessionRequest::Start]);
    }

    pub fn take_requests(&mut self) -> Vec<SessionRequest> {
        std::mem::take(&mut self.outbox)
    }

    /// Fold a session result into the UI state.
    pub fn apply_result(&mut self, result: SessionResult) {
        match result {
            SessionResult::Update(SessionUpdate::Rendered(view)) => {
                self.group_colors = GroupColors::for_groups(&view.groups, self.accent_lightness());
                // The list is rebuilt, so ticks do not carry over.
                self.selected.clear();
                self.select_all = false;
                self.view = Some(view);
                self.no_data = false;
                self.saving = false;
                self.status_message = None;
            }
            SessionResult::Update(SessionUpdate::NoData) => {
                self.view = None;
                self.no_data = true;
                self.saving = false;
            }
            SessionResult::Update(SessionUpdate::Unchanged) => {
                self.saving = false;
            }
            SessionResult::Update(SessionUpdate::PersistFailed(reason)) => {
                self.saving = false;
                self.status_message = Some(format!("Not saved: {reason}"));
            }
            SessionResult::Theme(theme) => {
                self.theme = theme;
                if let Some(view) = &self.view {
                    self.group_colors =
                        GroupColors::for_groups(&view.groups, self.accent_lightness());
                }
            }
            SessionResult::ThemeFailed(reason) => {
                self.status_message = Some(format!("Theme not saved: {reason}"));
            }
        }
    }

    fn accent_lightness(&self) -> f32 {
        match self.theme {
            Theme::Dark => 0.65,
            Theme::Light => 0.4,
        }
    }

    fn send(&mut self, event: SessionEvent) {
        if event.is_mutation() {
            self.saving = true;
        }
        self.outbox.push(SessionRequest::Event(event));
    }

    // ---- View configuration ----

    pub fn set_filter(&mut self, filter: StatusFilter) {
        if self.filter != filter {
            self.filter = filter;
            self.send(SessionEvent::SetFilter(filter));
        }
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        if self.sort != sort {
            self.sort = sort;
            self.send(SessionEvent::SetSort(sort));
        }
    }

    /// Call after the search box text changed.
    pub fn search_changed(&mut self) {
        self.send(SessionEvent::SetSearch(self.search.clone()));
    }

    // ---- Hidden set ----

    pub fn toggle_module(&mut self, id: &str) {
        self.send(SessionEvent::Toggle(id.to_string()));
    }

    pub fn show_all(&mut self) {
        self.send(SessionEvent::ClearAll);
    }

    pub fn hide_selected(&mut self) {
        if let Some(ids) = self.selection() {
            self.send(SessionEvent::BulkHide(ids));
        }
    }

    pub fn show_selected(&mut self) {
        if let Some(ids) = self.selection() {
            self.send(SessionEvent::BulkShow(ids));
        }
    }

    fn selection(&self) -> Option<Vec<String>> {
        if self.selected.is_empty() {
            None
        } else {
            Some(self.selected.iter().cloned().collect())
        }
    }

    // ---- Selection ----

    pub fn set_selected(&mut self, id: &str, checked: bool) {
        if checked {
            self.selected.insert(id.to_string());
        } else {
            self.selected.remove(id);
        }
    }

    /// Tick or untick every module currently listed.
    pub fn set_select_all(&mut self, checked: bool) {
        self.select_all = checked;
        self.selected.clear();
        if checked {
            if let Some(view) = &self.view {
                self.selected.extend(view.shown_ids().map(str::to_string));
            }
        }
    }

    pub fn toggle_theme(&mut self) {
        self.outbox.push(SessionRequest::ToggleTheme);
    }
}
