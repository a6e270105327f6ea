use eframe::egui;

use super::model::{
    Connection, DataKind, NodeData, Port, PortKind, WhiteboardNode, WhiteboardState,
};
use crate::pipeline::{
    PipelineConnection, PipelineData, PipelineNode, PipelinePayload, PipelinePort,
    PipelinePosition,
};

/// 에디터 상태를 실행/저장용 페이로드로 직렬화한다.
///
/// 엔드포인트가 더 이상 존재하지 않는 연결은 렌더링과 같은 규칙으로
/// 건너뛴다.
pub fn graph_to_payload(state: &WhiteboardState) -> PipelinePayload {
    let nodes = state.nodes.iter().map(node_to_wire).collect();
    let connections = state
        .connections
        .iter()
        .filter(|conn| connection_resolves(state, conn))
        .map(|conn| PipelineConnection {
            id: conn.id.clone(),
            source_node_id: conn.source_node_id.clone(),
            source_port_id: conn.source_port_id.clone(),
            target_node_id: conn.target_node_id.clone(),
            target_port_id: conn.target_port_id.clone(),
        })
        .collect();
    PipelinePayload { nodes, connections }
}

/// 페이로드(저장된 프로젝트)를 새 에디터 상태로 복원한다.
///
/// 불러온 모든 ID를 할당기에 알려 이후 발급되는 ID와 충돌하지 않게 한다.
pub fn payload_to_graph(payload: &PipelinePayload) -> WhiteboardState {
    let mut state = WhiteboardState::new();
    for node in &payload.nodes {
        state.observe_id(&node.id);
        for port in node.inputs.iter().chain(node.outputs.iter()) {
            state.observe_id(&port.id);
        }
        state.nodes.push(node_from_wire(node));
    }
    for conn in &payload.connections {
        state.observe_id(&conn.id);
        state.connections.push(Connection {
            id: conn.id.clone(),
            source_node_id: conn.source_node_id.clone(),
            source_port_id: conn.source_port_id.clone(),
            target_node_id: conn.target_node_id.clone(),
            target_port_id: conn.target_port_id.clone(),
            z: 0,
        });
    }
    state
}

/// 노드 하나를 직렬화한다.
fn node_to_wire(node: &WhiteboardNode) -> PipelineNode {
    PipelineNode {
        id: node.id.clone(),
        type_name: node.type_name.clone(),
        position: PipelinePosition {
            x: node.position.x,
            y: node.position.y,
        },
        inputs: node.inputs.iter().map(port_to_wire).collect(),
        outputs: node.outputs.iter().map(port_to_wire).collect(),
        data: node
            .data
            .iter()
            .map(|data| PipelineData {
                name: data.name.clone(),
                data_type: data.kind.as_str().to_string(),
                value: data.value.clone(),
            })
            .collect(),
        title: node.title.clone(),
    }
}

/// 포트 하나를 직렬화한다.
fn port_to_wire(port: &Port) -> PipelinePort {
    PipelinePort {
        id: port.id.clone(),
        kind: port.kind.as_str().to_string(),
        name: port.name.clone(),
        data_type: port.data_type.clone(),
        label: port.label.clone(),
    }
}

/// 직렬화된 노드를 에디터 노드로 복원한다.
///
/// 포트 방향은 태그보다 소속 목록(inputs/outputs)을 우선한다.
fn node_from_wire(node: &PipelineNode) -> WhiteboardNode {
    WhiteboardNode {
        id: node.id.clone(),
        type_name: node.type_name.clone(),
        position: egui::pos2(node.position.x, node.position.y),
        inputs: node
            .inputs
            .iter()
            .map(|port| port_from_wire(port, PortKind::Input))
            .collect(),
        outputs: node
            .outputs
            .iter()
            .map(|port| port_from_wire(port, PortKind::Output))
            .collect(),
        data: node
            .data
            .iter()
            .map(|data| NodeData {
                name: data.name.clone(),
                kind: DataKind::from_str(&data.data_type),
                value: data.value.clone(),
            })
            .collect(),
        title: node.title.clone(),
        z: 0,
    }
}

/// 직렬화된 포트를 복원한다.
fn port_from_wire(port: &PipelinePort, kind: PortKind) -> Port {
    Port {
        id: port.id.clone(),
        kind,
        name: port.name.clone(),
        data_type: port.data_type.clone(),
        label: port.label.clone(),
    }
}

/// 연결의 네 엔드포인트가 모두 현재 그래프에서 해석되는지 확인한다.
fn connection_resolves(state: &WhiteboardState, conn: &Connection) -> bool {
    let source = state
        .node(&conn.source_node_id)
        .and_then(|node| node.port(&conn.source_port_id));
    let target = state
        .node(&conn.target_node_id)
        .and_then(|node| node.port(&conn.target_port_id));
    source.is_some() && target.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::model::{NodeTemplate, NodeVisualKind, PortSpec};
    use eframe::egui::pos2;

    /// 입력/출력 포트를 하나씩 가진 테스트 템플릿이다.
    fn template() -> NodeTemplate {
        NodeTemplate {
            type_name: "proc",
            title: "Proc",
            inputs: vec![PortSpec {
                name: "in",
                data_type: "text",
                label: "In",
            }],
            outputs: vec![PortSpec {
                name: "out",
                data_type: "text",
                label: "Out",
            }],
            data: Vec::new(),
            visual: NodeVisualKind::Transform,
        }
    }

    /// 직렬화 후 복원해도 그래프 구조와 위치가 보존되는지 확인한다.
    #[test]
    fn payload_round_trip_preserves_graph() {
        let mut state = WhiteboardState::new();
        let a = state.add_node(&template());
        let b = state.add_node(&template());
        state.update_node_position(&a, pos2(40.0, 60.0));
        let out_port = state.node(&a).unwrap().outputs[0].id.clone();
        let in_port = state.node(&b).unwrap().inputs[0].id.clone();
        state.begin_port_interaction(&a, &out_port, PortKind::Output, pos2(0.0, 0.0));
        state.begin_port_interaction(&b, &in_port, PortKind::Input, pos2(0.0, 0.0));

        let payload = graph_to_payload(&state);
        let restored = payload_to_graph(&payload);
        assert_eq!(restored.nodes.len(), 2);
        assert_eq!(restored.connections.len(), 1);
        assert_eq!(restored.node(&a).unwrap().position, pos2(40.0, 60.0));
        assert_eq!(restored.connections[0].source_port_id, out_port);
    }

    /// 끊어진 연결이 페이로드에서 제외되는지 확인한다.
    #[test]
    fn dangling_connections_are_skipped() {
        let mut state = WhiteboardState::new();
        let a = state.add_node(&template());
        let b = state.add_node(&template());
        let out_port = state.node(&a).unwrap().outputs[0].id.clone();
        let in_port = state.node(&b).unwrap().inputs[0].id.clone();
        state.begin_port_interaction(&a, &out_port, PortKind::Output, pos2(0.0, 0.0));
        state.begin_port_interaction(&b, &in_port, PortKind::Input, pos2(0.0, 0.0));
        // 삭제 캐스케이드를 우회하여 의도적으로 끊어진 참조를 만든다.
        state.nodes.retain(|node| node.id != a);

        let payload = graph_to_payload(&state);
        assert_eq!(payload.nodes.len(), 1);
        assert!(payload.connections.is_empty());
    }

    /// 프로젝트 로드 뒤 새 노드 ID가 기존 ID와 충돌하지 않는지 확인한다.
    #[test]
    fn restored_state_keeps_issuing_fresh_ids() {
        let mut state = WhiteboardState::new();
        for _ in 0..3 {
            state.add_node(&template());
        }
        let payload = graph_to_payload(&state);
        let mut restored = payload_to_graph(&payload);
        let fresh = restored.add_node(&template());
        assert!(restored.nodes.iter().filter(|n| n.id == fresh).count() == 1);
        assert_eq!(fresh, "node-4");
    }
}
