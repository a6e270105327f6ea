use super::*;

impl<'a> WhiteboardUi<'a> {
    /// 노드 템플릿 팔레트를 렌더링한다.
    pub(super) fn render_palette(&mut self, ui: &mut egui::Ui) {
        let palette = *self.theme.palette();
        ui.heading("🧩 노드 팔레트");
        ui.separator();
        ui.label("추가할 노드 템플릿을 선택하세요.");
        ui.add_space(10.0);
        ui.spacing_mut().item_spacing.y = 8.0;
        for template in NODE_TEMPLATES.iter() {
            let visual = self.theme.node_visual(template.visual);
            let label = format!("{} {}", visual.icon, template.title);
            if ui
                .add_sized([ui.available_width(), 30.0], egui::Button::new(label))
                .clicked()
            {
                self.state.add_node(template);
            }
        }
        ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
            ui.add_space(6.0);
            ui.label(
                RichText::new("노드를 이쪽으로 끌어오면 삭제됩니다.")
                    .color(palette.fg_text_secondary)
                    .italics(),
            );
            ui.separator();
        });
    }
}
