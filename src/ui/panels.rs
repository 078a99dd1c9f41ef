use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::model::{SortOrder, StatusFilter};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open catalog…").clicked() {
                open_catalog_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(view) = &state.view {
            ui.label(format!("{} modules, {} hidden", view.total, view.hidden));
        }
        if state.saving {
            ui.spinner();
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            if ui
                .button(state.theme.icon())
                .on_hover_text("Toggle theme")
                .clicked()
            {
                state.toggle_theme();
            }
        });
    });

    if let Some(msg) = &state.status_message {
        ui.label(RichText::new(msg).color(Color32::RED));
    }
}

// ---------------------------------------------------------------------------
// Filter / sort / search controls
// ---------------------------------------------------------------------------

pub fn controls(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        let current = state.filter;
        egui::ComboBox::from_id_salt("filter_select")
            .selected_text(current.to_string())
            .show_ui(ui, |ui: &mut Ui| {
                for filter in StatusFilter::ALL {
                    if ui
                        .selectable_label(current == filter, filter.to_string())
                        .clicked()
                    {
                        state.set_filter(filter);
                    }
                }
            });

        let current = state.sort;
        egui::ComboBox::from_id_salt("sort_select")
            .selected_text(current.to_string())
            .show_ui(ui, |ui: &mut Ui| {
                for sort in SortOrder::ALL {
                    if ui.selectable_label(current == sort, sort.to_string()).clicked() {
                        state.set_sort(sort);
                    }
                }
            });

        if ui.button("Show all").on_hover_text("Unhide every module").clicked() {
            state.show_all();
        }
    });

    let search = ui.add(
        egui::TextEdit::singleline(&mut state.search)
            .hint_text("Search modules…")
            .desired_width(f32::INFINITY),
    );
    if search.changed() {
        state.search_changed();
    }
}

// ---------------------------------------------------------------------------
// Bulk actions
// ---------------------------------------------------------------------------

pub fn bulk_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        let mut all = state.select_all;
        if ui.checkbox(&mut all, "Select all").changed() {
            state.set_select_all(all);
        }

        let has_selection = !state.selected.is_empty();
        if ui
            .add_enabled(has_selection, egui::Button::new("Hide selected"))
            .clicked()
        {
            state.hide_selected();
        }
        if ui
            .add_enabled(has_selection, egui::Button::new("Show selected"))
            .clicked()
        {
            state.show_selected();
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_catalog_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open module catalog")
        .add_filter("Supported files", &["json", "csv"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening catalog {}", path.display());
        state.reset_for_catalog(path);
    }
}
