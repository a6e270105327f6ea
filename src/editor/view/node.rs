use super::*;
use crate::editor::model::{DataKind, NodeData};

/// 노드 렌더링 한 프레임에 필요한 입력 묶음이다.
pub(super) struct NodeFrameInput {
    /// 캔버스 위젯의 좌상단 화면 좌표.
    pub origin: egui::Pos2,
    /// 캔버스 색상.
    pub colors: BoardColors,
    /// 프레임 시작 시 보류 연결이 있었는지 여부.
    pub pending_before: bool,
    /// 이번 프레임에 주 버튼이 올라왔는지 여부.
    pub released: bool,
    /// 이번 프레임에 드롭된 파일 목록.
    pub dropped: Vec<egui::DroppedFile>,
    /// 최신 포인터 위치.
    pub pointer: Option<egui::Pos2>,
}

/// 포트 렌더링용 스냅샷이다.
struct PortRow {
    id: String,
    kind: PortKind,
    label: String,
    anchor: egui::Pos2,
}

impl<'a> WhiteboardUi<'a> {
    /// 노드 하나를 그리고 드래그/포트/데이터 편집 상호작용을 처리한다.
    ///
    /// 템플릿이 등록되지 않은 노드는 그리지 않는다.
    pub(super) fn render_node(
        &mut self,
        ui: &mut egui::Ui,
        painter: &egui::Painter,
        input: &NodeFrameInput,
        node_id: &str,
    ) {
        let zoom = self.state.camera.zoom;
        let origin = input.origin;
        let colors = input.colors;

        // 상태를 변경하기 전에 필요한 값을 먼저 스냅샷한다.
        let (rect, title, visual, ports, data_fields, data_top) = {
            let Some(node) = self.state.node(node_id) else {
                return;
            };
            let Some(template) = find_template(&node.type_name) else {
                return;
            };
            let visual = self.theme.node_visual(template.visual);
            let size = geometry::node_size(node);
            let rect = egui::Rect::from_min_size(
                self.state.camera.to_screen(node.position, origin),
                size * zoom,
            );
            let mut ports: Vec<PortRow> = Vec::with_capacity(node.inputs.len() + node.outputs.len());
            for (idx, port) in node.inputs.iter().enumerate() {
                ports.push(PortRow {
                    id: port.id.clone(),
                    kind: PortKind::Input,
                    label: port.label.clone(),
                    anchor: geometry::port_anchor(node.position, PortKind::Input, idx),
                });
            }
            for (idx, port) in node.outputs.iter().enumerate() {
                ports.push(PortRow {
                    id: port.id.clone(),
                    kind: PortKind::Output,
                    label: port.label.clone(),
                    anchor: geometry::port_anchor(node.position, PortKind::Output, idx),
                });
            }
            let rows = node.inputs.len().max(node.outputs.len());
            let data_top =
                node.position.y + geometry::HEADER_HEIGHT + rows as f32 * geometry::ROW_HEIGHT;
            (
                rect,
                node.title.clone(),
                visual,
                ports,
                node.data.clone(),
                data_top,
            )
        };

        // 본문 드래그. 오프셋은 드래그 시작 프레임에 한 번만 기록된다.
        let response = ui.interact(
            rect,
            egui::Id::new(("wb_node", node_id)),
            egui::Sense::click_and_drag(),
        );
        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.state
                    .begin_drag(node_id, self.state.camera.to_canvas(pos, origin));
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.state
                    .drag_to(self.state.camera.to_canvas(pos, origin));
            }
        }
        if response.drag_released() {
            if let Some(dragged_id) = self.state.end_drag() {
                let over_palette = input
                    .pointer
                    .zip(self.palette_rect)
                    .is_some_and(|(pos, palette)| palette.contains(pos));
                if over_palette {
                    self.state.delete_node(&dragged_id);
                    return;
                }
            }
        }
        if response.clicked() {
            self.state.select_node(Some(node_id.to_string()));
        }

        // 본문 드로잉.
        let selected = self.state.selected_node_id.as_deref() == Some(node_id);
        let border = if selected {
            egui::Stroke::new(2.0 * zoom, colors.node_selected_border)
        } else {
            egui::Stroke::new(1.0, colors.node_border)
        };
        painter.rect_filled(rect, 8.0 * zoom, colors.node_fill);
        painter.rect_stroke(rect, 8.0 * zoom, border);
        painter.text(
            rect.min + egui::vec2(10.0, 8.0) * zoom,
            egui::Align2::LEFT_TOP,
            format!("{} {}", visual.icon, title),
            egui::FontId::proportional(14.0 * zoom),
            self.theme.palette().fg_text_primary,
        );
        painter.text(
            egui::pos2(rect.max.x - 8.0 * zoom, rect.min.y + 10.0 * zoom),
            egui::Align2::RIGHT_TOP,
            visual.label,
            egui::FontId::proportional(10.0 * zoom),
            visual.color,
        );

        for port in &ports {
            self.render_port(ui, painter, input, node_id, port);
        }
        self.render_data_fields(ui, input, node_id, &data_fields, data_top);
    }

    /// 포트 원과 레이블을 그리고 연결 제스처를 처리한다.
    ///
    /// 누름과 뗌 모두 같은 상호작용을 일으켜 클릭-클릭과 드래그-뗌이
    /// 동일한 결과를 낸다.
    fn render_port(
        &mut self,
        ui: &mut egui::Ui,
        painter: &egui::Painter,
        input: &NodeFrameInput,
        node_id: &str,
        port: &PortRow,
    ) {
        let zoom = self.state.camera.zoom;
        let screen = self.state.camera.to_screen(port.anchor, input.origin);
        let hit_rect = egui::Rect::from_center_size(screen, egui::Vec2::splat(18.0 * zoom));
        let response = ui.interact(
            hit_rect,
            egui::Id::new(("wb_port", node_id, port.id.as_str())),
            egui::Sense::click_and_drag(),
        );
        if response.hovered() {
            self.pointer_over_port = true;
        }
        if response.clicked() || response.drag_started() {
            self.state
                .begin_port_interaction(node_id, &port.id, port.kind, port.anchor);
        } else if input.released && input.pending_before && response.hovered() {
            self.state
                .begin_port_interaction(node_id, &port.id, port.kind, port.anchor);
        }

        let fill = match port.kind {
            PortKind::Input => input.colors.port_input,
            PortKind::Output => input.colors.port_output,
        };
        let radius = if response.hovered() {
            geometry::PORT_RADIUS + 2.0
        } else {
            geometry::PORT_RADIUS
        };
        painter.circle_filled(screen, radius * zoom, fill);
        let (align, offset) = match port.kind {
            PortKind::Input => (egui::Align2::LEFT_CENTER, egui::vec2(10.0, 0.0)),
            PortKind::Output => (egui::Align2::RIGHT_CENTER, egui::vec2(-10.0, 0.0)),
        };
        painter.text(
            screen + offset * zoom,
            align,
            &port.label,
            egui::FontId::proportional(11.0 * zoom),
            self.theme.palette().fg_text_secondary,
        );
    }

    /// 인라인 데이터 필드(텍스트/파일)를 렌더링한다.
    ///
    /// 모든 쓰기는 소유 상태의 `set_node_data`를 거친다.
    fn render_data_fields(
        &mut self,
        ui: &mut egui::Ui,
        input: &NodeFrameInput,
        node_id: &str,
        fields: &[NodeData],
        data_top: f32,
    ) {
        let zoom = self.state.camera.zoom;
        let palette = *self.theme.palette();
        let node_x = match self.state.node(node_id) {
            Some(node) => node.position.x,
            None => return,
        };
        let hovering_files = ui.input(|i| !i.raw.hovered_files.is_empty());
        for (idx, field) in fields.iter().enumerate() {
            let top = data_top + idx as f32 * geometry::DATA_ROW_HEIGHT;
            let field_rect = egui::Rect::from_min_size(
                self.state
                    .camera
                    .to_screen(egui::pos2(node_x + 10.0, top), input.origin),
                egui::vec2(geometry::NODE_WIDTH - 20.0, 26.0) * zoom,
            );
            match field.kind {
                DataKind::Text => {
                    let mut buffer = field.value.clone();
                    ui.allocate_ui_at_rect(field_rect, |ui| {
                        let edit = egui::TextEdit::singleline(&mut buffer)
                            .hint_text(field.name.as_str())
                            .font(egui::FontId::proportional(12.0 * zoom))
                            .desired_width(field_rect.width());
                        if ui.add(edit).changed() {
                            self.state.set_node_data(node_id, &field.name, buffer.clone());
                        }
                    });
                }
                DataKind::File => {
                    let pointer_inside = input
                        .pointer
                        .is_some_and(|pos| field_rect.contains(pos));
                    let label = if field.value.is_empty() {
                        format!("📎 {} 선택…", field.name)
                    } else {
                        format!("📎 {}", field.value)
                    };
                    let mut picked: Option<String> = None;
                    ui.allocate_ui_at_rect(field_rect, |ui| {
                        let button = egui::Button::new(
                            RichText::new(label).size(12.0 * zoom),
                        )
                        .min_size(field_rect.size());
                        if ui.add(button).clicked() {
                            if let Some(path) = rfd::FileDialog::new().pick_file() {
                                picked = path
                                    .file_name()
                                    .map(|name| name.to_string_lossy().to_string());
                            }
                        }
                        if hovering_files && pointer_inside {
                            ui.painter().rect_stroke(
                                field_rect,
                                4.0,
                                egui::Stroke::new(1.5, palette.accent_primary),
                            );
                        }
                    });
                    if picked.is_none() && pointer_inside {
                        picked = input.dropped.first().and_then(dropped_file_name);
                    }
                    if let Some(name) = picked {
                        self.state.set_node_data(node_id, &field.name, name);
                    }
                }
            }
        }
    }
}

/// 드롭된 파일의 표시 이름을 구한다. 파일 내용은 읽지 않는다.
fn dropped_file_name(file: &egui::DroppedFile) -> Option<String> {
    if let Some(path) = &file.path {
        return path
            .file_name()
            .map(|name| name.to_string_lossy().to_string());
    }
    if file.name.is_empty() {
        None
    } else {
        Some(file.name.clone())
    }
}
