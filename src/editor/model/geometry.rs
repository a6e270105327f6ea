use eframe::egui;

use super::node::WhiteboardNode;
use super::port::PortKind;

/// 노드 고정 폭.
pub const NODE_WIDTH: f32 = 200.0;
/// 첫 포트까지의 세로 오프셋(제목 영역 높이).
pub const HEADER_HEIGHT: f32 = 30.0;
/// 같은 방향 포트 사이의 행 높이.
pub const ROW_HEIGHT: f32 = 30.0;
/// 데이터 필드 한 행의 높이.
pub const DATA_ROW_HEIGHT: f32 = 34.0;
/// 노드 하단 여백.
pub const NODE_BOTTOM_PADDING: f32 = 12.0;
/// 베지어 제어점의 수평 오프셋. 세로 간격과 무관하게 수평 S자 곡선을 만든다.
pub const CONTROL_OFFSET: f32 = 100.0;
/// 포트 원의 반지름.
pub const PORT_RADIUS: f32 = 5.0;

/// 포트 앵커를 캔버스 좌표계에서 해석적으로 계산한다.
///
/// 입력은 노드 왼쪽 모서리, 출력은 오른쪽 모서리에 붙고, 같은 방향 포트의
/// 순번에 행 높이를 곱해 세로로 내려간다. 렌더링된 요소를 측정하지 않으므로
/// 팬/줌 상태나 렌더 타이밍에 영향을 받지 않는다.
pub fn port_anchor(position: egui::Pos2, kind: PortKind, index: usize) -> egui::Pos2 {
    let x = match kind {
        PortKind::Input => position.x,
        PortKind::Output => position.x + NODE_WIDTH,
    };
    egui::pos2(x, position.y + HEADER_HEIGHT + index as f32 * ROW_HEIGHT)
}

/// 노드와 포트 ID로 앵커를 구한다. 포트가 없으면 None을 반환한다.
pub fn anchor_of(node: &WhiteboardNode, port_id: &str) -> Option<egui::Pos2> {
    let port = node.port(port_id)?;
    let index = node.port_index(port_id)?;
    Some(port_anchor(node.position, port.kind, index))
}

/// 포트 행 수와 데이터 필드 수로 노드 크기를 계산한다.
pub fn node_size(node: &WhiteboardNode) -> egui::Vec2 {
    let rows = node.inputs.len().max(node.outputs.len());
    let height = HEADER_HEIGHT
        + rows as f32 * ROW_HEIGHT
        + node.data.len() as f32 * DATA_ROW_HEIGHT
        + NODE_BOTTOM_PADDING;
    egui::vec2(NODE_WIDTH, height)
}

/// 두 앵커 사이의 3차 베지어 제어점 네 개를 반환한다.
pub fn bezier_points(start: egui::Pos2, end: egui::Pos2) -> [egui::Pos2; 4] {
    [
        start,
        start + egui::vec2(CONTROL_OFFSET, 0.0),
        end - egui::vec2(CONTROL_OFFSET, 0.0),
        end,
    ]
}

/// 베지어 곡선 위의 매개변수 t 지점을 계산한다. 중간점 마커 배치에 쓴다.
pub fn cubic_point(points: &[egui::Pos2; 4], t: f32) -> egui::Pos2 {
    let u = 1.0 - t;
    let w0 = u * u * u;
    let w1 = 3.0 * u * u * t;
    let w2 = 3.0 * u * t * t;
    let w3 = t * t * t;
    egui::pos2(
        w0 * points[0].x + w1 * points[1].x + w2 * points[2].x + w3 * points[3].x,
        w0 * points[0].y + w1 * points[1].y + w2 * points[2].y + w3 * points[3].y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    /// 입력 포트는 왼쪽 모서리, 출력 포트는 오른쪽 모서리에 붙는지 확인한다.
    #[test]
    fn anchors_sit_on_declared_edges() {
        let position = pos2(120.0, 80.0);
        let input = port_anchor(position, PortKind::Input, 0);
        let output = port_anchor(position, PortKind::Output, 0);
        assert_eq!(input, pos2(120.0, 110.0));
        assert_eq!(output, pos2(120.0 + NODE_WIDTH, 110.0));
    }

    /// 같은 방향 포트의 순번에 따라 행 높이만큼 내려가는지 확인한다.
    #[test]
    fn anchors_step_down_by_row_height() {
        let position = pos2(0.0, 0.0);
        let first = port_anchor(position, PortKind::Input, 0);
        let third = port_anchor(position, PortKind::Input, 2);
        assert_eq!(third.y - first.y, 2.0 * ROW_HEIGHT);
    }

    /// 곡선의 양 끝점이 t=0, t=1에서 재현되는지 확인한다.
    #[test]
    fn cubic_point_hits_endpoints() {
        let points = bezier_points(pos2(0.0, 0.0), pos2(300.0, 90.0));
        assert_eq!(cubic_point(&points, 0.0), pos2(0.0, 0.0));
        assert_eq!(cubic_point(&points, 1.0), pos2(300.0, 90.0));
    }
}
