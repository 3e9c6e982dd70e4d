//! Palette of addable node kinds.
//!
//! Stateless with respect to the graph: each click emits exactly one
//! add-intent; the owner picks the new node's id and initial position.

use crate::types::NodeKindInfo;

/// Show the palette. Returns the kind id the user asked to add, if any.
pub fn palette_ui(ui: &mut egui::Ui, kinds: &[NodeKindInfo], locked: bool) -> Option<String> {
    let mut picked = None;
    ui.heading("Nodes");
    ui.separator();
    ui.add_enabled_ui(!locked, |ui| {
        for kind in kinds {
            if ui
                .add_sized(
                    [ui.available_width(), 24.0],
                    egui::Button::new(&kind.display_name),
                )
                .clicked()
            {
                picked = Some(kind.kind_id.clone());
            }
        }
    });
    picked
}
