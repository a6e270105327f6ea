use super::node::NodeFrameInput;
use super::*;

impl<'a> WhiteboardUi<'a> {
    /// 캔버스를 렌더링하고 카메라/노드/연결 상호작용을 처리한다.
    pub(super) fn render_canvas(&mut self, ui: &mut egui::Ui) {
        let colors = self.theme.board_colors();
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let origin = rect.min;
        painter.rect_filled(rect, 0.0, colors.canvas_fill);
        self.draw_grid(&painter, rect);
        self.draw_board_bounds(&painter, origin);

        // 휠 줌은 커서 아래 지점을 고정한다.
        if let Some(hover) = response.hover_pos() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let factor = if scroll > 0.0 { 1.1 } else { 0.9 };
                self.state.camera.zoom_at(hover, origin, factor);
            }
        }
        // 빈 캔버스 드래그는 팬, 클릭은 선택/보류/메뉴 해제.
        if response.dragged() {
            self.state.camera.pan_by(response.drag_delta());
        }
        if response.clicked() {
            self.state.clear_interaction();
        }
        // Delete 키는 선택된 노드를 지운다.
        if ui.input(|i| i.key_pressed(egui::Key::Delete)) {
            if let Some(selected) = self.state.selected_node_id.clone() {
                self.state.delete_node(&selected);
            }
        }

        let input = NodeFrameInput {
            origin,
            colors,
            pending_before: self.state.pending_connection.is_some(),
            released: ui.input(|i| i.pointer.primary_released()),
            dropped: ui.input(|i| i.raw.dropped_files.clone()),
            pointer: ui.ctx().pointer_latest_pos(),
        };

        self.pointer_over_port = false;
        let mut order: Vec<(u64, String)> = self
            .state
            .nodes
            .iter()
            .map(|node| (node.z, node.id.clone()))
            .collect();
        order.sort();
        for (_, node_id) in order {
            self.render_node(ui, &painter, &input, &node_id);
        }

        // 포트 밖에서 버튼이 올라오면 보류 중 연결은 부작용 없이 취소된다.
        if input.released && !self.pointer_over_port && self.state.pending_connection.is_some() {
            self.state.pending_connection = None;
        }

        self.draw_connections(ui, &painter, origin, colors);
        self.draw_pending_connection(&painter, origin, colors, input.pointer);
        self.render_connection_menu(ui, origin);
    }

    /// 보드 경계를 그린다. 노드는 경계 밖에도 놓일 수 있지만
    /// 작업 영역이 어디인지 시각적으로 보여 준다.
    fn draw_board_bounds(&self, painter: &egui::Painter, origin: egui::Pos2) {
        let colors = self.theme.board_colors();
        let camera = &self.state.camera;
        let bounds = egui::Rect::from_min_max(
            camera.to_screen(egui::pos2(0.0, 0.0), origin),
            camera.to_screen(self.state.board_size.to_pos2(), origin),
        );
        painter.rect_stroke(bounds, 0.0, egui::Stroke::new(1.0, colors.node_border));
    }

    /// 배경 격자를 그린다. 너무 축소되면 생략한다.
    fn draw_grid(&self, painter: &egui::Painter, rect: egui::Rect) {
        let colors = self.theme.board_colors();
        let camera = &self.state.camera;
        let spacing = 40.0 * camera.zoom;
        if spacing < 8.0 {
            return;
        }
        let stroke = egui::Stroke::new(1.0, colors.grid_line);
        let mut x = rect.min.x + camera.pan.x.rem_euclid(spacing);
        while x < rect.max.x {
            painter.line_segment(
                [egui::pos2(x, rect.min.y), egui::pos2(x, rect.max.y)],
                stroke,
            );
            x += spacing;
        }
        let mut y = rect.min.y + camera.pan.y.rem_euclid(spacing);
        while y < rect.max.y {
            painter.line_segment(
                [egui::pos2(rect.min.x, y), egui::pos2(rect.max.x, y)],
                stroke,
            );
            y += spacing;
        }
    }
}
