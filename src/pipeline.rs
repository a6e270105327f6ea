use serde::{Deserialize, Serialize};

/// 백엔드와 주고받는 좌표이다.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PipelinePosition {
    pub x: f32,
    pub y: f32,
}

/// 직렬화된 포트이다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelinePort {
    /// 포트 ID.
    pub id: String,
    /// "input" 또는 "output".
    #[serde(rename = "type")]
    pub kind: String,
    /// 포트 이름.
    pub name: String,
    /// 자유 형식 데이터 타입 태그.
    pub data_type: String,
    /// 표시 레이블.
    pub label: String,
}

/// 직렬화된 노드 데이터 필드이다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineData {
    /// 필드 이름.
    pub name: String,
    /// "text" 또는 "file".
    pub data_type: String,
    /// 현재 값.
    pub value: String,
}

/// 직렬화된 노드이다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineNode {
    /// 노드 ID.
    pub id: String,
    /// 템플릿 키.
    #[serde(rename = "type")]
    pub type_name: String,
    /// 캔버스 좌표계 위치.
    pub position: PipelinePosition,
    /// 입력 포트 목록.
    pub inputs: Vec<PipelinePort>,
    /// 출력 포트 목록.
    pub outputs: Vec<PipelinePort>,
    /// 데이터 필드 목록.
    #[serde(default)]
    pub data: Vec<PipelineData>,
    /// 표시 제목.
    pub title: String,
}

/// 직렬화된 연결이다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConnection {
    /// 연결 ID.
    pub id: String,
    /// 출력 쪽 노드 ID.
    pub source_node_id: String,
    /// 출력 포트 ID.
    pub source_port_id: String,
    /// 입력 쪽 노드 ID.
    pub target_node_id: String,
    /// 입력 포트 ID.
    pub target_port_id: String,
}

/// 실행 요청 본문이다. `{ nodes, connections }` JSON으로 전송된다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelinePayload {
    /// 노드 목록.
    pub nodes: Vec<PipelineNode>,
    /// 연결 목록.
    pub connections: Vec<PipelineConnection>,
}

/// 백엔드가 처리한 노드/연결 개수이다.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecutionCounts {
    /// 처리된 노드 수.
    pub nodes: usize,
    /// 처리된 연결 수.
    pub connections: usize,
}

/// 실행 결과 요약이다. 에디터는 이 요약을 상태 표시줄에 보여 주는 것 외에
/// 구조적으로 검증하지 않는다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionSummary {
    /// "success" 또는 "error".
    pub status: String,
    /// 처리 개수.
    #[serde(default)]
    pub counts: ExecutionCounts,
    /// 사람이 읽는 요약 문장.
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 연결 직렬화가 백엔드 계약의 camelCase 필드명을 쓰는지 확인한다.
    #[test]
    fn connection_wire_shape_matches_contract() {
        let conn = PipelineConnection {
            id: "conn-1".into(),
            source_node_id: "node-1".into(),
            source_port_id: "out-1".into(),
            target_node_id: "node-2".into(),
            target_port_id: "in-1".into(),
        };
        let value = serde_json::to_value(&conn).unwrap();
        assert_eq!(value["sourceNodeId"], "node-1");
        assert_eq!(value["sourcePortId"], "out-1");
        assert_eq!(value["targetNodeId"], "node-2");
        assert_eq!(value["targetPortId"], "in-1");
    }

    /// 노드 직렬화의 type/dataType 필드명을 확인한다.
    #[test]
    fn node_wire_shape_matches_contract() {
        let node = PipelineNode {
            id: "node-1".into(),
            type_name: "inputManager".into(),
            position: PipelinePosition { x: 200.0, y: 100.0 },
            inputs: Vec::new(),
            outputs: vec![PipelinePort {
                id: "out-1".into(),
                kind: "output".into(),
                name: "output".into(),
                data_type: "text".into(),
                label: "Output".into(),
            }],
            data: vec![PipelineData {
                name: "text".into(),
                data_type: "text".into(),
                value: "abc".into(),
            }],
            title: "Input Manager".into(),
        };
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], "inputManager");
        assert_eq!(value["outputs"][0]["type"], "output");
        assert_eq!(value["outputs"][0]["dataType"], "text");
        assert_eq!(value["data"][0]["dataType"], "text");
    }

    /// 요약 응답에서 counts/message가 빠져도 역직렬화되는지 확인한다.
    #[test]
    fn summary_tolerates_missing_fields() {
        let summary: ExecutionSummary = serde_json::from_str(r#"{"status":"success"}"#).unwrap();
        assert_eq!(summary.status, "success");
        assert_eq!(summary.counts, ExecutionCounts::default());
        assert!(summary.message.is_empty());
    }
}
