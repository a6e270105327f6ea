use serde::{Deserialize, Serialize};

use crate::pipeline::{PipelineConnection, PipelineNode};

/// 프로젝트 공개 범위이다.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProjectVisibility {
    /// 소유자와 협업자만 볼 수 있다.
    Private,
    /// 모든 사용자가 볼 수 있다.
    Public,
}

impl Default for ProjectVisibility {
    /// 기본값은 비공개이다.
    fn default() -> Self {
        ProjectVisibility::Private
    }
}

/// 이름 붙은 프로젝트 하나이다. 에디터 입장에서는 외부에서 공급되는
/// 초기 상태이자 저장 대상일 뿐이다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// 서버가 발급하는 ID. 저장 전에는 비어 있다.
    #[serde(default)]
    pub id: Option<i64>,
    /// 프로젝트 이름.
    pub name: String,
    /// 소유자 사용자 ID.
    pub owner: String,
    /// 협업자 사용자 ID 목록.
    #[serde(default)]
    pub collaborators: Vec<String>,
    /// 공개 범위.
    #[serde(default)]
    pub visibility: ProjectVisibility,
    /// 저장된 노드 목록.
    #[serde(default)]
    pub nodes: Vec<PipelineNode>,
    /// 저장된 연결 목록.
    #[serde(default)]
    pub connections: Vec<PipelineConnection>,
}
