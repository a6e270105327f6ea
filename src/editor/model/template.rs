use once_cell::sync::Lazy;

use super::node::{DataKind, NodeData};

/// 템플릿이 선언하는 포트 사양이다.
#[derive(Debug, Clone)]
pub struct PortSpec {
    /// 포트 이름.
    pub name: &'static str,
    /// 자유 형식 데이터 타입 태그.
    pub data_type: &'static str,
    /// 표시 레이블.
    pub label: &'static str,
}

/// 테마에서 노드 강조색/아이콘을 고르는 시각 분류이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeVisualKind {
    /// 데이터가 파이프라인으로 들어오는 노드.
    Source,
    /// 입력을 가공하는 노드.
    Transform,
    /// 분류/추론 계열 노드.
    Model,
}

/// 노드 생성에만 쓰이는 스텐실이다. 생성 이후에는 참조되지 않으며 변경되지 않는다.
#[derive(Debug, Clone)]
pub struct NodeTemplate {
    /// 템플릿 키. 노드의 `type_name`으로 복사된다.
    pub type_name: &'static str,
    /// 노드 제목.
    pub title: &'static str,
    /// 입력 포트 사양.
    pub inputs: Vec<PortSpec>,
    /// 출력 포트 사양.
    pub outputs: Vec<PortSpec>,
    /// 기본 데이터 필드.
    pub data: Vec<NodeData>,
    /// 시각 분류.
    pub visual: NodeVisualKind,
}

/// 호스트 애플리케이션이 공급하는 기본 템플릿 목록이다.
pub static NODE_TEMPLATES: Lazy<Vec<NodeTemplate>> = Lazy::new(|| {
    vec![
        NodeTemplate {
            type_name: "inputManager",
            title: "Input Manager",
            inputs: vec![PortSpec {
                name: "input text",
                data_type: "text",
                label: "Input Text",
            }],
            outputs: vec![
                PortSpec {
                    name: "output",
                    data_type: "text",
                    label: "Output",
                },
                PortSpec {
                    name: "output number",
                    data_type: "text",
                    label: "Output Number",
                },
            ],
            data: vec![
                NodeData {
                    name: "text".into(),
                    kind: DataKind::Text,
                    value: String::new(),
                },
                NodeData {
                    name: "csv file".into(),
                    kind: DataKind::File,
                    value: String::new(),
                },
            ],
            visual: NodeVisualKind::Source,
        },
        NodeTemplate {
            type_name: "textProcessor",
            title: "Text Processor",
            inputs: vec![PortSpec {
                name: "input",
                data_type: "text",
                label: "Input Text",
            }],
            outputs: vec![PortSpec {
                name: "output",
                data_type: "text",
                label: "Processed Text",
            }],
            data: vec![NodeData {
                name: "text".into(),
                kind: DataKind::Text,
                value: String::new(),
            }],
            visual: NodeVisualKind::Transform,
        },
        NodeTemplate {
            type_name: "dataClassifier",
            title: "Data Classifier",
            inputs: vec![PortSpec {
                name: "data",
                data_type: "data",
                label: "Input Data",
            }],
            outputs: vec![PortSpec {
                name: "classes",
                data_type: "array",
                label: "Classifications",
            }],
            data: vec![NodeData {
                name: "classes".into(),
                kind: DataKind::Text,
                value: String::new(),
            }],
            visual: NodeVisualKind::Model,
        },
        NodeTemplate {
            type_name: "imageInput",
            title: "Image Input",
            inputs: Vec::new(),
            outputs: vec![PortSpec {
                name: "image",
                data_type: "image",
                label: "Output Image",
            }],
            data: Vec::new(),
            visual: NodeVisualKind::Source,
        },
    ]
});

/// 템플릿 키로 템플릿을 조회한다. 등록되지 않은 키는 None을 반환하며,
/// 해당 노드는 렌더링에서 건너뛴다.
pub fn find_template(type_name: &str) -> Option<&'static NodeTemplate> {
    NODE_TEMPLATES.iter().find(|t| t.type_name == type_name)
}
