use anyhow::Context;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::pipeline::{ExecutionCounts, ExecutionSummary, PipelinePayload};
use crate::project::Project;

/// 파이프라인 실행 협력자를 추상화한다. 에디터는 요약을 표시할 뿐
/// 결과 구조를 검증하지 않는다.
#[async_trait]
pub trait PipelineBackend: Send + Sync {
    /// 직렬화된 그래프를 실행하고 요약을 돌려받는다.
    async fn execute(&self, payload: PipelinePayload) -> anyhow::Result<ExecutionSummary>;
}

/// PipelineBackend를 공유하기 위한 Arc 타입 별칭이다.
pub type SharedPipelineBackend = Arc<dyn PipelineBackend>;

/// 프로젝트 영속화 협력자를 추상화한다.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// 프로젝트를 저장하고 서버가 확정한 레코드를 돌려받는다.
    async fn create(&self, project: &Project) -> anyhow::Result<Project>;
    /// 사용자 소유 프로젝트 목록을 조회한다.
    async fn list(&self, user_id: &str) -> anyhow::Result<Vec<Project>>;
    /// 프로젝트를 삭제한다.
    async fn delete(&self, project_id: i64) -> anyhow::Result<()>;
}

/// ProjectStore를 공유하기 위한 Arc 타입 별칭이다.
pub type SharedProjectStore = Arc<dyn ProjectStore>;

/// 백엔드 작업이 끝났을 때 UI로 전달되는 이벤트이다.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    /// 실행 완료. 요약을 담는다.
    ExecuteFinished { summary: ExecutionSummary },
    /// 실행 실패. 그래프 상태에는 영향을 주지 않는다.
    ExecuteFailed { message: String },
    /// 프로젝트 목록 조회 완료.
    ProjectsListed { projects: Vec<Project> },
    /// 프로젝트 저장 완료.
    ProjectSaved { project: Project },
    /// 프로젝트 삭제 완료.
    ProjectDeleted { project_id: i64 },
    /// 프로젝트 작업 실패.
    ProjectFailed { message: String },
}

/// REST 백엔드 구현이다. 실행과 프로젝트 CRUD를 같은 베이스 URL로 보낸다.
pub struct HttpBackend {
    /// 재사용하는 HTTP 클라이언트.
    client: reqwest::Client,
    /// 끝에 슬래시가 없는 API 베이스 URL.
    base_url: String,
}

impl HttpBackend {
    /// 베이스 URL로 백엔드 클라이언트를 생성한다.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// 베이스 URL에 경로를 붙인다.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl PipelineBackend for HttpBackend {
    /// `{ nodes, connections }`를 POST하고 요약을 역직렬화한다.
    async fn execute(&self, payload: PipelinePayload) -> anyhow::Result<ExecutionSummary> {
        let url = self.url("execute-pipeline/");
        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .with_context(|| format!("실행 요청 전송 실패: {url}"))?
            .error_for_status()
            .context("백엔드가 실행 요청을 거부했습니다.")?;
        response
            .json::<ExecutionSummary>()
            .await
            .context("실행 요약 응답 파싱 실패")
    }
}

#[async_trait]
impl ProjectStore for HttpBackend {
    /// 프로젝트를 POST로 저장한다.
    async fn create(&self, project: &Project) -> anyhow::Result<Project> {
        let url = self.url("projects/");
        self.client
            .post(&url)
            .json(project)
            .send()
            .await
            .with_context(|| format!("프로젝트 저장 요청 실패: {url}"))?
            .error_for_status()
            .context("백엔드가 프로젝트 저장을 거부했습니다.")?
            .json::<Project>()
            .await
            .context("프로젝트 응답 파싱 실패")
    }

    /// 사용자 ID로 프로젝트 목록을 GET한다.
    async fn list(&self, user_id: &str) -> anyhow::Result<Vec<Project>> {
        let url = self.url("projects/");
        self.client
            .get(&url)
            .query(&[("user", user_id)])
            .send()
            .await
            .with_context(|| format!("프로젝트 목록 요청 실패: {url}"))?
            .error_for_status()
            .context("백엔드가 프로젝트 목록 조회를 거부했습니다.")?
            .json::<Vec<Project>>()
            .await
            .context("프로젝트 목록 응답 파싱 실패")
    }

    /// 프로젝트를 DELETE한다.
    async fn delete(&self, project_id: i64) -> anyhow::Result<()> {
        let url = self.url(&format!("projects/{project_id}/"));
        self.client
            .delete(&url)
            .send()
            .await
            .with_context(|| format!("프로젝트 삭제 요청 실패: {url}"))?
            .error_for_status()
            .context("백엔드가 프로젝트 삭제를 거부했습니다.")?;
        Ok(())
    }
}

/// 백엔드 없이 동작하는 오프라인 구현이다. 실행은 로컬 개수 집계로
/// 응답하고, 프로젝트는 메모리에만 저장한다.
#[derive(Default)]
pub struct OfflineBackend {
    /// 메모리에 저장된 프로젝트 목록.
    projects: Mutex<Vec<Project>>,
    /// 다음 프로젝트 ID.
    next_id: Mutex<i64>,
}

#[async_trait]
impl PipelineBackend for OfflineBackend {
    /// 전송 없이 개수만 집계하여 성공 요약을 돌려준다.
    async fn execute(&self, payload: PipelinePayload) -> anyhow::Result<ExecutionSummary> {
        let counts = ExecutionCounts {
            nodes: payload.nodes.len(),
            connections: payload.connections.len(),
        };
        tracing::info!(nodes = counts.nodes, connections = counts.connections, "오프라인 실행");
        Ok(ExecutionSummary {
            status: "success".into(),
            counts,
            message: format!(
                "Received {} nodes and {} connections",
                counts.nodes, counts.connections
            ),
        })
    }
}

#[async_trait]
impl ProjectStore for OfflineBackend {
    /// 메모리 목록에 프로젝트를 추가한다.
    async fn create(&self, project: &Project) -> anyhow::Result<Project> {
        let mut next_id = self.next_id.lock().await;
        *next_id += 1;
        let mut stored = project.clone();
        stored.id = Some(*next_id);
        self.projects.lock().await.push(stored.clone());
        Ok(stored)
    }

    /// 소유자가 일치하는 프로젝트만 돌려준다.
    async fn list(&self, user_id: &str) -> anyhow::Result<Vec<Project>> {
        let projects = self.projects.lock().await;
        Ok(projects
            .iter()
            .filter(|p| p.owner == user_id)
            .cloned()
            .collect())
    }

    /// ID가 일치하는 프로젝트를 제거한다.
    async fn delete(&self, project_id: i64) -> anyhow::Result<()> {
        self.projects
            .lock()
            .await
            .retain(|p| p.id != Some(project_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::convert::graph_to_payload;
    use crate::editor::model::{NodeTemplate, NodeVisualKind, PortKind, PortSpec, WhiteboardState};
    use eframe::egui::pos2;

    /// 전달받은 페이로드를 기록해 두는 목업 실행 백엔드이다.
    struct RecordingBackend {
        /// 실행 요청으로 받은 페이로드 목록.
        payloads: Mutex<Vec<PipelinePayload>>,
    }

    #[async_trait]
    impl PipelineBackend for RecordingBackend {
        /// 페이로드를 저장하고 개수 요약을 돌려준다.
        async fn execute(&self, payload: PipelinePayload) -> anyhow::Result<ExecutionSummary> {
            let counts = ExecutionCounts {
                nodes: payload.nodes.len(),
                connections: payload.connections.len(),
            };
            self.payloads.lock().await.push(payload);
            Ok(ExecutionSummary {
                status: "success".into(),
                counts,
                message: String::new(),
            })
        }
    }

    /// 출력 포트 하나짜리 템플릿이다.
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

    /// 입력 포트 하나짜리 템플릿이다.
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
            data: Vec::new(),
            visual: NodeVisualKind::Transform,
        }
    }

    /// 노드 2개/연결 1개 그래프 실행이 협력자에게 같은 개수의 페이로드를
    /// 전달하는지 확인한다.
    #[tokio::test]
    async fn execute_hands_collaborator_full_graph() {
        let mut state = WhiteboardState::new();
        let a = state.add_node(&source_template());
        let b = state.add_node(&sink_template());
        let out_port = state.node(&a).unwrap().outputs[0].id.clone();
        let in_port = state.node(&b).unwrap().inputs[0].id.clone();
        let anchor = pos2(0.0, 0.0);
        state.begin_port_interaction(&a, &out_port, PortKind::Output, anchor);
        state.begin_port_interaction(&b, &in_port, PortKind::Input, anchor);

        let backend = RecordingBackend {
            payloads: Mutex::new(Vec::new()),
        };
        let summary = backend.execute(graph_to_payload(&state)).await.unwrap();
        assert_eq!(summary.counts.nodes, 2);
        assert_eq!(summary.counts.connections, 1);
        let payloads = backend.payloads.lock().await;
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].nodes.len(), 2);
        assert_eq!(payloads[0].connections.len(), 1);
    }

    /// 오프라인 프로젝트 저장소가 소유자별로 목록을 거르는지 확인한다.
    #[tokio::test]
    async fn offline_store_scopes_projects_by_owner() {
        let store = OfflineBackend::default();
        let mine = Project {
            id: None,
            name: "mine".into(),
            owner: "user-1".into(),
            collaborators: Vec::new(),
            visibility: Default::default(),
            nodes: Vec::new(),
            connections: Vec::new(),
        };
        let theirs = Project {
            owner: "user-2".into(),
            name: "theirs".into(),
            ..mine.clone()
        };
        let saved = store.create(&mine).await.unwrap();
        store.create(&theirs).await.unwrap();
        let listed = store.list("user-1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "mine");

        store.delete(saved.id.unwrap()).await.unwrap();
        assert!(store.list("user-1").await.unwrap().is_empty());
    }
}
