use crate::DrawingApp;
use crate::color::Argb;
use crate::shape::ShapeKind;

pub fn tools_panel(app: &mut DrawingApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let selected = app.engine().selected_tool();
            for kind in ShapeKind::ALL {
                if ui.selectable_label(selected == kind, kind.name()).clicked() {
                    log::info!("Tool selected from UI: {}", kind);
                    app.engine_mut().set_selected_tool(kind);
                }
            }
            ui.separator();

            tool_style(app, ui);
            ui.separator();

            ui.horizontal(|ui| {
                let availability = app.availability();
                if ui.add_enabled(availability.can_undo, egui::Button::new("Undo")).clicked() {
                    app.undo();
                }
                if ui.add_enabled(availability.can_redo, egui::Button::new("Redo")).clicked() {
                    app.redo();
                }
                if ui.button("Clear").clicked() {
                    app.clear();
                }
            });

            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    app.save_project();
                }
                if ui.button("Load").clicked() {
                    app.load_project();
                }
                if ui.button("Export").clicked() {
                    app.export_png();
                }
            });

            let engine = app.engine();
            ui.label(format!("Shapes: {}", engine.shapes().len()));
            ui.label(format!("Undone: {}", engine.history().undone().len()));
            if engine.is_dirty() {
                ui.label("Unsaved changes");
            }
            if let Some(status) = app.status() {
                ui.small(status);
            }
        });
}

/// Color and width editors for the selected tool
fn tool_style(app: &mut DrawingApp, ui: &mut egui::Ui) {
    let kind = app.engine().selected_tool();
    let Some(mut props) = app.engine().tool_data().iter().find(|t| t.shape_type == kind).copied() else {
        ui.label("No settings for this tool");
        return;
    };

    let mut changed = false;
    if !kind.is_freehand() && kind != ShapeKind::Line {
        changed |= color_row(ui, "Fill:", &mut props.fill_color);
    }
    if kind != ShapeKind::Eraser {
        changed |= color_row(ui, "Stroke:", &mut props.stroke_color);
    }
    ui.horizontal(|ui| {
        ui.label("Width:");
        changed |= ui.add(egui::Slider::new(&mut props.stroke_width, 1.0..=50.0)).changed();
    });

    if changed {
        app.engine_mut().update_tool_data(props);
    }
}

fn color_row(ui: &mut egui::Ui, label: &str, color: &mut Argb) -> bool {
    let mut color32 = color.to_color32();
    let changed = ui
        .horizontal(|ui| {
            ui.label(label);
            egui::color_picker::color_edit_button_srgba(ui, &mut color32, egui::color_picker::Alpha::OnlyBlend)
                .changed()
        })
        .inner;
    if changed {
        *color = Argb::from_color32(color32);
    }
    changed
}
