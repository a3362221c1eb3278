use crate::DrawingApp;

pub fn central_panel(app: &mut DrawingApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            let canvas_rect = ui.available_rect_before_wrap();
            // Claim the area so egui does not treat drags on it as window drags.
            ui.allocate_rect(canvas_rect, egui::Sense::click_and_drag());

            if app.handle_input(ctx, canvas_rect) {
                ctx.request_repaint();
            }

            if let Some(texture) = app.viewport_texture(ctx, canvas_rect) {
                let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                ui.painter()
                    .image(texture, canvas_rect, uv, egui::Color32::WHITE);
            }
        });
}
