use eframe::egui;

use super::camera::Camera;
use super::connection::Connection;
use super::error::EditorError;
use super::ids::IdAllocator;
use super::node::WhiteboardNode;
use super::port::{Port, PortKind};
use super::template::NodeTemplate;

/// 보드의 기본 크기이다.
pub const DEFAULT_BOARD_SIZE: egui::Vec2 = egui::vec2(2400.0, 1600.0);
/// 템플릿 인스턴스가 놓이는 기본 위치이다. 커서 위치를 따르지 않는다.
pub const DEFAULT_NODE_POSITION: egui::Pos2 = egui::pos2(200.0, 100.0);

/// 연결 그리기의 보류 상태이다. 출발 포트를 고르고 도착 포트를 기다린다.
#[derive(Debug, Clone)]
pub struct PendingPort {
    /// 출발 노드 ID.
    pub node_id: String,
    /// 출발 포트 ID.
    pub port_id: String,
    /// 출발 포트 방향.
    pub kind: PortKind,
    /// 임시 곡선의 시작 앵커(캔버스 좌표).
    pub anchor: egui::Pos2,
}

/// 진행 중인 노드 드래그이다. 오프셋은 드래그 시작 시 한 번만 기록하여
/// 첫 이동 프레임에 노드가 튀지 않게 한다.
#[derive(Debug, Clone)]
pub struct NodeDrag {
    /// 드래그 중인 노드 ID.
    pub node_id: String,
    /// `커서(캔버스 좌표) - 노드 위치`로 기록한 오프셋.
    pub offset: egui::Vec2,
}

/// 화이트보드 에디터의 전체 상태이다.
///
/// 노드/연결 목록의 소유자이며, 뷰는 참조만 받아 의도를 되돌려 보낸다.
/// 모든 변경은 이 구조체의 메서드를 거친다.
#[derive(Debug, Clone)]
pub struct WhiteboardState {
    /// 노드 목록.
    pub nodes: Vec<WhiteboardNode>,
    /// 연결 목록.
    pub connections: Vec<Connection>,
    /// 선택된 노드 ID.
    pub selected_node_id: Option<String>,
    /// 보류 중인 연결 출발점.
    pub pending_connection: Option<PendingPort>,
    /// 진행 중인 노드 드래그.
    pub dragging: Option<NodeDrag>,
    /// 중간점 메뉴가 열려 있는 연결 ID.
    pub open_connection_menu: Option<String>,
    /// 팬/줌 카메라. 보드 인스턴스마다 하나씩 둔다.
    pub camera: Camera,
    /// 보드 크기.
    pub board_size: egui::Vec2,
    /// 저장되지 않은 변경 여부.
    pub dirty: bool,
    /// 접두사별 ID 할당기.
    ids: IdAllocator,
    /// 전역 렌더 순서 카운터. 절대 줄어들지 않는다.
    z_counter: u64,
}

impl WhiteboardState {
    /// 빈 보드를 생성한다.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            connections: Vec::new(),
            selected_node_id: None,
            pending_connection: None,
            dragging: None,
            open_connection_menu: None,
            camera: Camera::new(),
            board_size: DEFAULT_BOARD_SIZE,
            dirty: false,
            ids: IdAllocator::new(),
            z_counter: 0,
        }
    }

    /// ID로 노드를 조회한다.
    pub fn node(&self, id: &str) -> Option<&WhiteboardNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// ID로 노드를 조회한다.
    pub fn node_mut(&mut self, id: &str) -> Option<&mut WhiteboardNode> {
        self.nodes.iter_mut().find(|node| node.id == id)
    }

    /// 다음 렌더 순서 값을 발급한다.
    fn next_z(&mut self) -> u64 {
        self.z_counter += 1;
        self.z_counter
    }

    /// 외부에서 들어온 ID를 할당기에 알린다. 프로젝트 로드 경로에서 쓴다.
    pub fn observe_id(&mut self, id: &str) {
        self.ids.observe(id);
    }

    /// 템플릿으로부터 새 노드를 만들어 추가하고 선택한다.
    ///
    /// 노드와 모든 포트의 ID는 단조 증가 카운터로 발급하므로
    /// 연속 호출에서도 충돌하지 않는다.
    pub fn add_node(&mut self, template: &NodeTemplate) -> String {
        let id = self.ids.next("node");
        let inputs: Vec<Port> = template
            .inputs
            .iter()
            .map(|spec| Port {
                id: self.ids.next("in"),
                kind: PortKind::Input,
                name: spec.name.to_string(),
                data_type: spec.data_type.to_string(),
                label: spec.label.to_string(),
            })
            .collect();
        let outputs: Vec<Port> = template
            .outputs
            .iter()
            .map(|spec| Port {
                id: self.ids.next("out"),
                kind: PortKind::Output,
                name: spec.name.to_string(),
                data_type: spec.data_type.to_string(),
                label: spec.label.to_string(),
            })
            .collect();
        let z = self.next_z();
        self.nodes.push(WhiteboardNode {
            id: id.clone(),
            type_name: template.type_name.to_string(),
            position: DEFAULT_NODE_POSITION,
            inputs,
            outputs,
            data: template.data.clone(),
            title: template.title.to_string(),
            z,
        });
        self.select_node(Some(id.clone()));
        self.dirty = true;
        id
    }

    /// 노드를 제거하고, 그 노드를 참조하는 모든 연결을 함께 제거한다.
    pub fn delete_node(&mut self, id: &str) {
        let before = self.nodes.len();
        self.nodes.retain(|node| node.id != id);
        if self.nodes.len() == before {
            return;
        }
        self.connections.retain(|conn| !conn.touches(id));
        if self.selected_node_id.as_deref() == Some(id) {
            self.selected_node_id = None;
        }
        if self
            .pending_connection
            .as_ref()
            .is_some_and(|p| p.node_id == id)
        {
            self.pending_connection = None;
        }
        if self.dragging.as_ref().is_some_and(|d| d.node_id == id) {
            self.dragging = None;
        }
        self.dirty = true;
        tracing::info!(node_id = id, "노드 삭제");
    }

    /// ID로 연결 하나를 제거한다.
    pub fn remove_connection(&mut self, conn_id: &str) {
        self.connections.retain(|conn| conn.id != conn_id);
        if self.open_connection_menu.as_deref() == Some(conn_id) {
            self.open_connection_menu = None;
        }
        self.dirty = true;
    }

    /// 노드 선택 상태를 갱신한다.
    pub fn select_node(&mut self, id: Option<String>) {
        self.selected_node_id = id;
    }

    /// 빈 캔버스 클릭 시 선택/보류/메뉴를 모두 정리한다.
    pub fn clear_interaction(&mut self) {
        self.selected_node_id = None;
        self.pending_connection = None;
        self.open_connection_menu = None;
    }

    /// 노드 위치를 갱신한다. 드래그 중 프레임마다 호출된다.
    pub fn update_node_position(&mut self, id: &str, position: egui::Pos2) {
        if let Some(node) = self.node_mut(id) {
            node.position = position;
            self.dirty = true;
        }
    }

    /// 노드와 그 노드에 닿은 연결을 모두 최상위로 끌어올린다.
    pub fn bring_to_front(&mut self, node_id: &str) {
        let z = self.next_z();
        if let Some(node) = self.node_mut(node_id) {
            node.z = z;
        } else {
            return;
        }
        let touching: Vec<usize> = self
            .connections
            .iter()
            .enumerate()
            .filter(|(_, conn)| conn.touches(node_id))
            .map(|(idx, _)| idx)
            .collect();
        for idx in touching {
            let z = self.next_z();
            self.connections[idx].z = z;
        }
    }

    /// 노드 드래그를 시작한다. 커서와 노드 위치의 차를 한 번만 기록한다.
    pub fn begin_drag(&mut self, node_id: &str, cursor_canvas: egui::Pos2) {
        let Some(node) = self.node(node_id) else {
            return;
        };
        self.dragging = Some(NodeDrag {
            node_id: node_id.to_string(),
            offset: cursor_canvas - node.position,
        });
        self.bring_to_front(node_id);
    }

    /// 드래그 중 커서 이동을 노드 위치에 반영한다.
    pub fn drag_to(&mut self, cursor_canvas: egui::Pos2) {
        if let Some(drag) = self.dragging.clone() {
            self.update_node_position(&drag.node_id, cursor_canvas - drag.offset);
        }
    }

    /// 드래그를 끝내고 드래그하던 노드 ID를 돌려준다.
    pub fn end_drag(&mut self) -> Option<String> {
        self.dragging.take().map(|drag| drag.node_id)
    }

    /// 노드 데이터 필드 값을 소유 상태를 통해 기록한다.
    pub fn set_node_data(&mut self, node_id: &str, data_name: &str, value: String) {
        if let Some(node) = self.node_mut(node_id) {
            if let Some(data) = node.data_mut(data_name) {
                data.value = value;
                self.dirty = true;
            }
        }
    }

    /// 포트 상호작용 한 번을 처리한다.
    ///
    /// 보류 상태가 없으면 이 포트를 출발점으로 기록하고 끝난다. 보류 상태가
    /// 있으면 연결 완성을 시도하고, 성공하든 거부되든 보류 상태는 비운다.
    /// 거부는 사용자 오류로 노출하지 않는다(클릭으로 취소되는 동작과 동일).
    /// 완성된 연결의 ID를 반환한다.
    pub fn begin_port_interaction(
        &mut self,
        node_id: &str,
        port_id: &str,
        kind: PortKind,
        anchor: egui::Pos2,
    ) -> Option<String> {
        let Some(pending) = self.pending_connection.take() else {
            self.pending_connection = Some(PendingPort {
                node_id: node_id.to_string(),
                port_id: port_id.to_string(),
                kind,
                anchor,
            });
            return None;
        };
        match self.complete_connection(&pending, node_id, port_id) {
            Ok(conn_id) => {
                tracing::info!(%conn_id, "연결 생성");
                Some(conn_id)
            }
            Err(err) => {
                tracing::debug!(%err, "연결 시도 거부");
                None
            }
        }
    }

    /// 보류 출발점과 두 번째 포트로 연결 생성을 시도한다.
    ///
    /// 같은 노드, 같은 방향, 동일 엔드포인트 중복은 모두 거부한다.
    /// 방향은 저장된 포트 기록으로 판정하므로 출발점이 입력이든 출력이든
    /// 결과 연결은 항상 출력 -> 입력이 된다.
    fn complete_connection(
        &mut self,
        pending: &PendingPort,
        node_id: &str,
        port_id: &str,
    ) -> Result<String, EditorError> {
        if pending.node_id == node_id {
            return Err(EditorError::SelfConnection(node_id.to_string()));
        }
        let first_kind = self
            .resolve_port_kind(&pending.node_id, &pending.port_id)
            .ok_or_else(|| EditorError::UnknownPort {
                node_id: pending.node_id.clone(),
                port_id: pending.port_id.clone(),
            })?;
        let second_kind =
            self.resolve_port_kind(node_id, port_id)
                .ok_or_else(|| EditorError::UnknownPort {
                    node_id: node_id.to_string(),
                    port_id: port_id.to_string(),
                })?;
        if first_kind == second_kind {
            return Err(EditorError::SameKindPorts);
        }
        let (source_node, source_port, target_node, target_port) = match first_kind {
            PortKind::Output => (
                pending.node_id.as_str(),
                pending.port_id.as_str(),
                node_id,
                port_id,
            ),
            PortKind::Input => (
                node_id,
                port_id,
                pending.node_id.as_str(),
                pending.port_id.as_str(),
            ),
        };
        if self
            .connections
            .iter()
            .any(|c| c.same_endpoints(source_node, source_port, target_node, target_port))
        {
            return Err(EditorError::DuplicateConnection {
                source_port_id: source_port.to_string(),
                target_port_id: target_port.to_string(),
            });
        }
        let id = self.ids.next("conn");
        let z = self.next_z();
        self.connections.push(Connection {
            id: id.clone(),
            source_node_id: source_node.to_string(),
            source_port_id: source_port.to_string(),
            target_node_id: target_node.to_string(),
            target_port_id: target_port.to_string(),
            z,
        });
        self.dirty = true;
        Ok(id)
    }

    /// 저장된 포트 기록에서 방향을 찾는다.
    fn resolve_port_kind(&self, node_id: &str, port_id: &str) -> Option<PortKind> {
        self.node(node_id)?.port(port_id).map(|port| port.kind)
    }
}

impl Default for WhiteboardState {
    /// 기본 상태를 반환한다.
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::model::node::DataKind;
    use crate::editor::model::template::{NodeVisualKind, PortSpec};
    use eframe::egui::pos2;
    use std::collections::HashSet;

    /// 출력 포트 하나를 가진 테스트 템플릿이다.
    fn source_template() -> NodeTemplate {
        NodeTemplate {
            type_name: "source",
            title: "Source",
            inputs: Vec::new(),
            outputs: vec![PortSpec {
                name: "out",
                data_type: "text",
                label: "Out",
            }],
            data: Vec::new(),
            visual: NodeVisualKind::Source,
        }
    }

    /// 입력 포트 하나를 가진 테스트 템플릿이다.
    fn sink_template() -> NodeTemplate {
        NodeTemplate {
            type_name: "sink",
            title: "Sink",
            inputs: vec![PortSpec {
                name: "in",
                data_type: "text",
                label: "In",
            }],
            outputs: Vec::new(),
            data: vec![crate::editor::model::node::NodeData {
                name: "text".into(),
                kind: DataKind::Text,
                value: String::new(),
            }],
            visual: NodeVisualKind::Transform,
        }
    }

    /// 반복 생성해도 노드/포트 ID가 세션 내에서 유일한지 확인한다.
    #[test]
    fn generated_ids_are_unique() {
        let mut state = WhiteboardState::new();
        let mut node_ids = HashSet::new();
        let mut port_ids = HashSet::new();
        for _ in 0..50 {
            let id = state.add_node(&source_template());
            assert!(node_ids.insert(id.clone()));
            let node = state.node(&id).unwrap();
            for port in node.inputs.iter().chain(node.outputs.iter()) {
                assert!(port_ids.insert(port.id.clone()), "포트 ID 중복: {}", port.id);
            }
        }
        // 삭제 후에도 카운터는 되감지 않는다.
        let last = node_ids.iter().next().unwrap().clone();
        state.delete_node(&last);
        let fresh = state.add_node(&source_template());
        assert!(node_ids.insert(fresh));
    }

    /// 출력 -> 입력 연결이 정확히 한 번 성립하고 중복 시도는 무시되는지 확인한다.
    #[test]
    fn identical_connection_is_created_once() {
        let mut state = WhiteboardState::new();
        let a = state.add_node(&source_template());
        let b = state.add_node(&sink_template());
        let out_port = state.node(&a).unwrap().outputs[0].id.clone();
        let in_port = state.node(&b).unwrap().inputs[0].id.clone();

        let anchor = pos2(0.0, 0.0);
        assert!(
            state
                .begin_port_interaction(&a, &out_port, PortKind::Output, anchor)
                .is_none()
        );
        let created = state.begin_port_interaction(&b, &in_port, PortKind::Input, anchor);
        assert!(created.is_some());
        assert_eq!(state.connections.len(), 1);

        // 동일한 제스처 반복은 아무것도 만들지 않는다.
        state.begin_port_interaction(&a, &out_port, PortKind::Output, anchor);
        let repeat = state.begin_port_interaction(&b, &in_port, PortKind::Input, anchor);
        assert!(repeat.is_none());
        assert_eq!(state.connections.len(), 1);
        assert!(state.pending_connection.is_none());
    }

    /// 입력 포트에서 시작해도 결과 연결은 항상 출력 -> 입력 방향인지 확인한다.
    #[test]
    fn connection_direction_is_normalized() {
        let mut state = WhiteboardState::new();
        let a = state.add_node(&source_template());
        let b = state.add_node(&sink_template());
        let out_port = state.node(&a).unwrap().outputs[0].id.clone();
        let in_port = state.node(&b).unwrap().inputs[0].id.clone();

        let anchor = pos2(0.0, 0.0);
        state.begin_port_interaction(&b, &in_port, PortKind::Input, anchor);
        state.begin_port_interaction(&a, &out_port, PortKind::Output, anchor);
        let conn = &state.connections[0];
        assert_eq!(conn.source_node_id, a);
        assert_eq!(conn.source_port_id, out_port);
        assert_eq!(conn.target_node_id, b);
        assert_eq!(conn.target_port_id, in_port);
    }

    /// 같은 방향 또는 같은 노드 연결 시도가 목록을 바꾸지 않고 보류를 비우는지 확인한다.
    #[test]
    fn invalid_attempts_reset_pending_without_side_effects() {
        let mut state = WhiteboardState::new();
        let a = state.add_node(&source_template());
        let b = state.add_node(&source_template());
        let c = state.add_node(&sink_template());
        let a_out = state.node(&a).unwrap().outputs[0].id.clone();
        let b_out = state.node(&b).unwrap().outputs[0].id.clone();
        let c_in = state.node(&c).unwrap().inputs[0].id.clone();

        let anchor = pos2(0.0, 0.0);
        // 출력 -> 출력
        state.begin_port_interaction(&a, &a_out, PortKind::Output, anchor);
        state.begin_port_interaction(&b, &b_out, PortKind::Output, anchor);
        assert!(state.connections.is_empty());
        assert!(state.pending_connection.is_none());

        // 같은 노드
        state.begin_port_interaction(&c, &c_in, PortKind::Input, anchor);
        state.begin_port_interaction(&c, &c_in, PortKind::Input, anchor);
        assert!(state.connections.is_empty());
        assert!(state.pending_connection.is_none());
    }

    /// 노드 삭제가 그 노드를 참조하는 연결만 함께 지우는지 확인한다.
    #[test]
    fn delete_node_cascades_referencing_connections_only() {
        let mut state = WhiteboardState::new();
        let a = state.add_node(&source_template());
        let b = state.add_node(&sink_template());
        let c = state.add_node(&source_template());
        let d = state.add_node(&sink_template());
        let anchor = pos2(0.0, 0.0);
        let a_out = state.node(&a).unwrap().outputs[0].id.clone();
        let b_in = state.node(&b).unwrap().inputs[0].id.clone();
        let c_out = state.node(&c).unwrap().outputs[0].id.clone();
        let d_in = state.node(&d).unwrap().inputs[0].id.clone();
        state.begin_port_interaction(&a, &a_out, PortKind::Output, anchor);
        state.begin_port_interaction(&b, &b_in, PortKind::Input, anchor);
        state.begin_port_interaction(&c, &c_out, PortKind::Output, anchor);
        state.begin_port_interaction(&d, &d_in, PortKind::Input, anchor);
        assert_eq!(state.connections.len(), 2);

        state.delete_node(&a);
        assert!(state.node(&a).is_none());
        assert_eq!(state.connections.len(), 1);
        assert!(state.connections[0].touches(&c));
    }

    /// 빈 그래프에서 연결 생성과 노드 삭제까지의 전체 시나리오를 검증한다.
    #[test]
    fn end_to_end_connect_then_delete_source() {
        let mut state = WhiteboardState::new();
        let first = state.add_node(&source_template());
        let second = state.add_node(&sink_template());
        assert_eq!(first, "node-1");
        assert_eq!(second, "node-2");
        let out_port = state.node(&first).unwrap().outputs[0].id.clone();
        let in_port = state.node(&second).unwrap().inputs[0].id.clone();
        assert_eq!(out_port, "out-1");
        assert_eq!(in_port, "in-1");

        let anchor = pos2(0.0, 0.0);
        state.begin_port_interaction(&first, &out_port, PortKind::Output, anchor);
        state.begin_port_interaction(&second, &in_port, PortKind::Input, anchor);
        assert_eq!(state.connections.len(), 1);
        let conn = &state.connections[0];
        assert_eq!(conn.source_node_id, "node-1");
        assert_eq!(conn.source_port_id, "out-1");
        assert_eq!(conn.target_node_id, "node-2");
        assert_eq!(conn.target_port_id, "in-1");

        state.delete_node(&first);
        assert!(state.connections.is_empty());
        assert_eq!(state.nodes.len(), 1);
        assert_eq!(state.nodes[0].id, "node-2");
    }

    /// 드래그 시작 시 기록한 오프셋이 유지되어 노드가 튀지 않는지 확인한다.
    #[test]
    fn drag_offset_is_captured_once() {
        let mut state = WhiteboardState::new();
        let id = state.add_node(&source_template());
        let start = state.node(&id).unwrap().position;
        let grab = pos2(start.x + 15.0, start.y + 9.0);
        state.begin_drag(&id, grab);
        state.drag_to(pos2(grab.x + 100.0, grab.y + 40.0));
        let moved = state.node(&id).unwrap().position;
        assert_eq!(moved, pos2(start.x + 100.0, start.y + 40.0));
        assert_eq!(state.end_drag().as_deref(), Some(id.as_str()));
        assert!(state.dragging.is_none());
    }

    /// 드래그 시작이 노드와 닿은 연결을 최상위로 올리는지 확인한다.
    #[test]
    fn drag_start_promotes_node_and_wires() {
        let mut state = WhiteboardState::new();
        let a = state.add_node(&source_template());
        let b = state.add_node(&sink_template());
        let anchor = pos2(0.0, 0.0);
        let a_out = state.node(&a).unwrap().outputs[0].id.clone();
        let b_in = state.node(&b).unwrap().inputs[0].id.clone();
        state.begin_port_interaction(&a, &a_out, PortKind::Output, anchor);
        state.begin_port_interaction(&b, &b_in, PortKind::Input, anchor);

        let other_z = state.node(&b).unwrap().z;
        state.begin_drag(&a, pos2(0.0, 0.0));
        let node_z = state.node(&a).unwrap().z;
        let conn_z = state.connections[0].z;
        assert!(node_z > other_z);
        assert!(conn_z > node_z);
    }

    /// 데이터 필드 쓰기가 소유 상태를 통해 반영되는지 확인한다.
    #[test]
    fn node_data_is_written_through_state() {
        let mut state = WhiteboardState::new();
        let id = state.add_node(&sink_template());
        state.set_node_data(&id, "text", "hello".into());
        let node = state.node(&id).unwrap();
        assert_eq!(node.data[0].value, "hello");
    }
}
