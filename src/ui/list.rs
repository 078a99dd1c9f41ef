use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Grouped module list (central panel)
// ---------------------------------------------------------------------------

/// Render the grouped module list.
pub fn module_list(ui: &mut Ui, state: &mut AppState) {
    let Some(view) = state.view.clone() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            if state.catalog_path.is_none() {
                ui.heading("Open a catalog to list modules  (File → Open catalog…)");
            } else if state.no_data {
                ui.label(RichText::new("No modules found on this page.").weak());
            } else {
                ui.spinner();
            }
        });
        return;
    };

    if view.groups.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(RichText::new("Nothing matches the current filters.").weak());
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for group in &view.groups {
                let accent = state.group_colors.color_for(&group.label);
                ui.add_space(6.0);
                ui.label(RichText::new(&group.label).strong().color(accent));
                ui.separator();

                for module in &group.members {
                    ui.horizontal(|ui: &mut Ui| {
                        let mut checked = state.selected.contains(&module.id);
                        if ui.checkbox(&mut checked, "").changed() {
                            state.set_selected(&module.id, checked);
                        }

                        let mut title = RichText::new(&module.name);
                        if module.hidden {
                            title = title.weak().italics();
                        }
                        ui.label(title).on_hover_text(&module.full_name);

                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui: &mut Ui| {
                                let (text, hint) = if module.hidden {
                                    ("Show", "Show this module")
                                } else {
                                    ("Hide", "Hide this module")
                                };
                                if ui.small_button(text).on_hover_text(hint).clicked() {
                                    state.toggle_module(&module.id);
                                }
                            },
                        );
                    });
                }
            }
        });
}
