use super::*;

impl<'a> WhiteboardUi<'a> {
    /// 확정된 연결을 z 순서대로 그린다.
    ///
    /// 엔드포인트가 해석되지 않는 연결은 조용히 건너뛴다. 곡선은 캔버스
    /// 좌표에서 계산한 제어점을 화면으로 투영해 그린다.
    pub(super) fn draw_connections(
        &mut self,
        ui: &mut egui::Ui,
        painter: &egui::Painter,
        origin: egui::Pos2,
        colors: BoardColors,
    ) {
        let zoom = self.state.camera.zoom;
        let mut order: Vec<(u64, String)> = self
            .state
            .connections
            .iter()
            .map(|conn| (conn.z, conn.id.clone()))
            .collect();
        order.sort();
        for (_, conn_id) in order {
            let Some(points) = self.connection_screen_points(&conn_id, origin) else {
                continue;
            };
            painter.add(CubicBezierShape::from_points_stroke(
                points,
                false,
                egui::Color32::TRANSPARENT,
                egui::Stroke::new(2.0 * zoom, colors.connection_stroke),
            ));

            // 중간점 마커. 클릭하면 컨텍스트 메뉴를 토글한다.
            let midpoint = geometry::cubic_point(&points, 0.5);
            let marker_rect =
                egui::Rect::from_center_size(midpoint, egui::Vec2::splat(16.0 * zoom));
            let response = ui.interact(
                marker_rect,
                egui::Id::new(("wb_conn", conn_id.as_str())),
                egui::Sense::click(),
            );
            let radius = if response.hovered() { 6.5 } else { 5.0 };
            painter.circle_filled(midpoint, radius * zoom, colors.handle_fill);
            if response.clicked() {
                if self.state.open_connection_menu.as_deref() == Some(conn_id.as_str()) {
                    self.state.open_connection_menu = None;
                } else {
                    self.state.open_connection_menu = Some(conn_id.clone());
                }
            }
        }
    }

    /// 보류 중 연결을 출발 앵커에서 커서까지 점선으로 그린다.
    pub(super) fn draw_pending_connection(
        &self,
        painter: &egui::Painter,
        origin: egui::Pos2,
        colors: BoardColors,
        pointer: Option<egui::Pos2>,
    ) {
        let Some(pending) = &self.state.pending_connection else {
            return;
        };
        let Some(cursor) = pointer else {
            return;
        };
        let zoom = self.state.camera.zoom;
        let start = self.state.camera.to_screen(pending.anchor, origin);
        let (from, to) = match pending.kind {
            PortKind::Output => (start, cursor),
            PortKind::Input => (cursor, start),
        };
        let shape = CubicBezierShape::from_points_stroke(
            screen_bezier(from, to, zoom),
            false,
            egui::Color32::TRANSPARENT,
            egui::Stroke::new(2.0 * zoom, colors.connection_temp),
        );
        let flattened = shape.flatten(Some(0.5));
        painter.extend(egui::Shape::dashed_line(
            &flattened,
            egui::Stroke::new(2.0 * zoom, colors.connection_temp),
            5.0 * zoom,
            5.0 * zoom,
        ));
    }

    /// 열려 있는 연결 컨텍스트 메뉴를 렌더링한다.
    ///
    /// "노드 추가"는 중간 삽입을 위한 확장 지점으로만 남겨 둔다.
    pub(super) fn render_connection_menu(&mut self, ui: &mut egui::Ui, origin: egui::Pos2) {
        let Some(conn_id) = self.state.open_connection_menu.clone() else {
            return;
        };
        let Some(points) = self.connection_screen_points(&conn_id, origin) else {
            self.state.open_connection_menu = None;
            return;
        };
        let midpoint = geometry::cubic_point(&points, 0.5);
        let mut close = false;
        egui::Area::new(egui::Id::new("wb_conn_menu"))
            .order(egui::Order::Foreground)
            .fixed_pos(midpoint + egui::vec2(12.0, 8.0))
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_min_width(110.0);
                    if ui.button("연결 삭제").clicked() {
                        self.state.remove_connection(&conn_id);
                        close = true;
                    }
                    ui.add_enabled(false, egui::Button::new("노드 추가"))
                        .on_disabled_hover_text("연결 중간 삽입은 아직 지원되지 않습니다.");
                });
            });
        if close {
            self.state.open_connection_menu = None;
        }
    }

    /// 연결의 베지어 제어점 네 개를 화면 좌표로 돌려준다.
    /// 엔드포인트가 해석되지 않으면 None이다.
    fn connection_screen_points(
        &self,
        conn_id: &str,
        origin: egui::Pos2,
    ) -> Option<[egui::Pos2; 4]> {
        let conn = self
            .state
            .connections
            .iter()
            .find(|conn| conn.id == conn_id)?;
        let source = self.state.node(&conn.source_node_id)?;
        let target = self.state.node(&conn.target_node_id)?;
        let start = geometry::anchor_of(source, &conn.source_port_id)?;
        let end = geometry::anchor_of(target, &conn.target_port_id)?;
        let camera = &self.state.camera;
        let points = geometry::bezier_points(start, end);
        Some(points.map(|p| camera.to_screen(p, origin)))
    }
}

/// 화면 좌표 두 점 사이의 제어점을 만든다. 제어점 오프셋도 줌을 따른다.
fn screen_bezier(start: egui::Pos2, end: egui::Pos2, zoom: f32) -> [egui::Pos2; 4] {
    let offset = egui::vec2(geometry::CONTROL_OFFSET * zoom, 0.0);
    [start, start + offset, end - offset, end]
}
