use crate::backend::{
    BackendEvent, HttpBackend, OfflineBackend, SharedPipelineBackend, SharedProjectStore,
};
use crate::config::AppConfig;
use crate::editor::{WhiteboardState, WhiteboardUi, graph_to_payload, payload_to_graph};
use crate::pipeline::PipelinePayload;
use crate::project::{Project, ProjectVisibility};
use crate::theme::{Theme, blend_color};
use eframe::egui::{self, RichText, Widget};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// egui 애플리케이션의 전체 상태를 보관한다.
pub struct WhiteboardApp {
    /// UI 테마 정보.
    theme: Theme,
    /// 애플리케이션 설정.
    config: AppConfig,
    /// 화이트보드 에디터 상태.
    state: WhiteboardState,
    /// Tokio 런타임.
    runtime: Runtime,
    /// 파이프라인 실행 협력자.
    pipeline: SharedPipelineBackend,
    /// 프로젝트 영속화 협력자.
    projects: SharedProjectStore,
    /// 백엔드 이벤트 송신 채널.
    events_tx: UnboundedSender<BackendEvent>,
    /// 백엔드 이벤트 수신 채널.
    events_rx: UnboundedReceiver<BackendEvent>,
    /// 실행 요청이 진행 중인지 여부. 편집은 막지 않는다.
    executing: bool,
    /// 상태 표시줄 문구.
    status_line: Option<String>,
    /// 마지막 오류 메시지.
    last_error: Option<String>,
    /// 불러온 프로젝트 목록.
    project_list: Vec<Project>,
    /// 저장할 프로젝트 이름 입력 버퍼.
    project_name: String,
    /// 현재 열려 있는 프로젝트 ID.
    current_project: Option<i64>,
}

impl WhiteboardApp {
    /// egui Context와 설정을 받아 초기 상태를 구성한다.
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let theme = Theme::default();
        theme.apply(&cc.egui_ctx);
        let runtime = Runtime::new().expect("Tokio 런타임 생성 실패");
        let (pipeline, projects): (SharedPipelineBackend, SharedProjectStore) = if config.offline {
            let backend = Arc::new(OfflineBackend::default());
            (backend.clone(), backend)
        } else {
            let backend = Arc::new(HttpBackend::new(config.backend_base_url.clone()));
            (backend.clone(), backend)
        };
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            theme,
            config,
            state: WhiteboardState::new(),
            runtime,
            pipeline,
            projects,
            events_tx,
            events_rx,
            executing: false,
            status_line: None,
            last_error: None,
            project_list: Vec::new(),
            project_name: String::new(),
            current_project: None,
        }
    }

    /// 백엔드 이벤트를 모두 소비하여 UI 상태를 동기화한다.
    fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                BackendEvent::ExecuteFinished { summary } => {
                    self.executing = false;
                    let line = if summary.message.is_empty() {
                        format!(
                            "실행 완료 · 노드 {}개 · 연결 {}개",
                            summary.counts.nodes, summary.counts.connections
                        )
                    } else {
                        format!("실행 완료 · {}", summary.message)
                    };
                    self.status_line = Some(line);
                }
                BackendEvent::ExecuteFailed { message } => {
                    self.executing = false;
                    self.status_line = None;
                    self.last_error = Some(format!("실행 실패: {message}"));
                }
                BackendEvent::ProjectsListed { projects } => {
                    self.project_list = projects;
                }
                BackendEvent::ProjectSaved { project } => {
                    self.current_project = project.id;
                    self.status_line = Some(format!("프로젝트 저장됨 · {}", project.name));
                    self.project_list.retain(|p| p.id != project.id);
                    self.project_list.push(project);
                    self.state.dirty = false;
                }
                BackendEvent::ProjectDeleted { project_id } => {
                    self.project_list.retain(|p| p.id != Some(project_id));
                    if self.current_project == Some(project_id) {
                        self.current_project = None;
                    }
                    self.status_line = Some("프로젝트 삭제됨".into());
                }
                BackendEvent::ProjectFailed { message } => {
                    self.last_error = Some(format!("프로젝트 작업 실패: {message}"));
                }
            }
        }
    }

    /// 현재 그래프를 직렬화하여 실행 협력자에게 넘긴다.
    ///
    /// fire-and-forget이다. 요청이 떠 있는 동안에도 편집은 계속되며,
    /// 결과는 상태 표시줄 요약으로만 반영된다.
    fn execute_pipeline(&mut self) {
        if self.executing {
            return;
        }
        let payload = graph_to_payload(&self.state);
        if payload.nodes.is_empty() {
            self.last_error = Some("실행할 노드가 없습니다.".into());
            return;
        }
        let backend = self.pipeline.clone();
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let event = match backend.execute(payload).await {
                Ok(summary) => BackendEvent::ExecuteFinished { summary },
                Err(err) => {
                    tracing::error!(%err, "파이프라인 실행 실패");
                    BackendEvent::ExecuteFailed {
                        message: err.to_string(),
                    }
                }
            };
            let _ = tx.send(event);
        });
        self.executing = true;
        self.status_line = Some("파이프라인 실행 중…".into());
        self.last_error = None;
    }

    /// 현재 그래프를 프로젝트로 저장한다. 저장은 명시적 버튼으로만 일어난다.
    fn save_project(&mut self) {
        let name = if self.project_name.trim().is_empty() {
            "untitled".to_string()
        } else {
            self.project_name.trim().to_string()
        };
        let payload = graph_to_payload(&self.state);
        let project = Project {
            id: self.current_project,
            name,
            owner: self.config.user_id.clone(),
            collaborators: Vec::new(),
            visibility: ProjectVisibility::Private,
            nodes: payload.nodes,
            connections: payload.connections,
        };
        let store = self.projects.clone();
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let event = match store.create(&project).await {
                Ok(project) => BackendEvent::ProjectSaved { project },
                Err(err) => {
                    tracing::error!(%err, "프로젝트 저장 실패");
                    BackendEvent::ProjectFailed {
                        message: err.to_string(),
                    }
                }
            };
            let _ = tx.send(event);
        });
    }

    /// 사용자 소유 프로젝트 목록을 다시 불러온다.
    fn refresh_projects(&mut self) {
        let store = self.projects.clone();
        let user_id = self.config.user_id.clone();
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let event = match store.list(&user_id).await {
                Ok(projects) => BackendEvent::ProjectsListed { projects },
                Err(err) => {
                    tracing::warn!(%err, "프로젝트 목록 조회 실패");
                    BackendEvent::ProjectFailed {
                        message: err.to_string(),
                    }
                }
            };
            let _ = tx.send(event);
        });
    }

    /// 프로젝트를 삭제한다.
    fn delete_project(&mut self, project_id: i64) {
        let store = self.projects.clone();
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let event = match store.delete(project_id).await {
                Ok(()) => BackendEvent::ProjectDeleted { project_id },
                Err(err) => {
                    tracing::error!(%err, "프로젝트 삭제 실패");
                    BackendEvent::ProjectFailed {
                        message: err.to_string(),
                    }
                }
            };
            let _ = tx.send(event);
        });
    }

    /// 저장된 프로젝트로 에디터 상태를 교체한다.
    fn open_project(&mut self, project: &Project) {
        let payload = PipelinePayload {
            nodes: project.nodes.clone(),
            connections: project.connections.clone(),
        };
        self.state = payload_to_graph(&payload);
        self.current_project = project.id;
        self.project_name = project.name.clone();
        self.status_line = Some(format!("프로젝트 열림 · {}", project.name));
        self.last_error = None;
    }

    /// 상단 툴바를 그린다.
    fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        let palette = *self.theme.palette();
        let decorations = *self.theme.decorations();
        ui.vertical(|ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("✨ Node Pipeline Whiteboard")
                        .size(20.0)
                        .color(palette.fg_text_primary)
                        .strong(),
                );
                ui.add_space(12.0);
                ui.label(
                    RichText::new("템플릿을 놓고, 포트를 잇고, 파이프라인을 실행하세요.")
                        .color(palette.fg_text_secondary),
                );
            });
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = decorations.button_gap;
                ui.add_enabled_ui(!self.executing && !self.state.nodes.is_empty(), |ui| {
                    if ui
                        .add(PrimaryButton::new(&self.theme, "파이프라인 실행").icon("▶"))
                        .clicked()
                    {
                        self.execute_pipeline();
                    }
                });
                ui.add(
                    egui::TextEdit::singleline(&mut self.project_name)
                        .hint_text("프로젝트 이름")
                        .desired_width(160.0),
                );
                if ui
                    .add(PrimaryButton::new(&self.theme, "저장").icon("💾"))
                    .clicked()
                {
                    self.save_project();
                }
                if ui
                    .add(PrimaryButton::new(&self.theme, "목록").icon("🔄"))
                    .clicked()
                {
                    self.refresh_projects();
                }
                ui.menu_button("프로젝트 열기", |ui| {
                    if self.project_list.is_empty() {
                        ui.label(
                            RichText::new("불러온 프로젝트가 없습니다.")
                                .color(palette.fg_text_secondary),
                        );
                    }
                    let projects = self.project_list.clone();
                    for project in &projects {
                        ui.horizontal(|ui| {
                            if ui.button(&project.name).clicked() {
                                self.open_project(project);
                                ui.close_menu();
                            }
                            if let Some(id) = project.id {
                                if ui.small_button("삭제").clicked() {
                                    self.delete_project(id);
                                    ui.close_menu();
                                }
                            }
                        });
                    }
                });
            });
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if let Some(err) = &self.last_error {
                    ui.label(RichText::new(err).color(palette.accent_error).strong());
                } else if let Some(status) = &self.status_line {
                    ui.label(RichText::new(status).color(palette.accent_success));
                } else if self.state.dirty {
                    ui.label(
                        RichText::new("저장되지 않은 변경이 있습니다.")
                            .color(palette.fg_text_secondary),
                    );
                }
            });
        });
    }

    /// 하단 상태 패널을 그린다.
    fn render_status_bar(&self, ui: &mut egui::Ui) {
        let palette = *self.theme.palette();
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(format!(
                    "노드 {}개 · 연결 {}개",
                    self.state.nodes.len(),
                    self.state.connections.len()
                ))
                .color(palette.fg_text_secondary),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(format!("배율 {:.0}%", self.state.camera.zoom * 100.0))
                        .color(palette.fg_text_secondary),
                );
                if let Some(id) = self.current_project {
                    ui.label(
                        RichText::new(format!("프로젝트 #{id}"))
                            .color(palette.fg_text_secondary),
                    );
                }
            });
        });
    }
}

impl eframe::App for WhiteboardApp {
    /// egui 메인 루프에서 호출되어 UI를 갱신한다.
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        self.drain_events();
        self.theme.apply(ctx);
        let palette = *self.theme.palette();
        let decorations = *self.theme.decorations();
        let toolbar_frame = egui::Frame {
            fill: palette.bg_toolbar,
            stroke: egui::Stroke::new(1.0, palette.border_soft),
            rounding: egui::Rounding::same(decorations.toolbar_rounding),
            inner_margin: egui::Margin::symmetric(18.0, 14.0),
            ..Default::default()
        };
        egui::TopBottomPanel::top("toolbar")
            .frame(toolbar_frame)
            .resizable(false)
            .show(ctx, |ui| {
                self.render_toolbar(ui);
            });
        let status_frame = egui::Frame {
            fill: palette.bg_panel,
            stroke: egui::Stroke::new(1.0, palette.border_soft),
            inner_margin: egui::Margin::symmetric(18.0, 8.0),
            ..Default::default()
        };
        egui::TopBottomPanel::bottom("status")
            .frame(status_frame)
            .show(ctx, |ui| {
                self.render_status_bar(ui);
            });
        WhiteboardUi::new(&self.theme, &mut self.state).show(ctx);

        // 실행 요청이 떠 있는 동안에는 채널 폴링을 위해 다시 그린다.
        if self.executing {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

/// 단색 배경과 일정한 간격을 제공하는 기본 버튼 위젯이다.
struct PrimaryButton<'a> {
    theme: &'a Theme,
    label: &'a str,
    icon: &'a str,
}

impl<'a> PrimaryButton<'a> {
    /// 버튼의 기본 정보를 생성한다.
    fn new(theme: &'a Theme, label: &'a str) -> Self {
        Self {
            theme,
            label,
            icon: "",
        }
    }

    /// 버튼에 표시할 아이콘(이모지)을 설정한다.
    fn icon(mut self, icon: &'a str) -> Self {
        self.icon = icon;
        self
    }
}

impl<'a> Widget for PrimaryButton<'a> {
    /// egui 위젯 트레이트를 구현하여 버튼을 화면에 그린다.
    fn ui(self, ui: &mut egui::Ui) -> egui::Response {
        let decorations = self.theme.decorations();
        let palette = self.theme.palette();
        let enabled = ui.is_enabled();
        let button_padding = ui.style().spacing.button_padding.x;

        let galley = ui.painter().layout_no_wrap(
            self.label.to_string(),
            egui::TextStyle::Button.resolve(ui.style()),
            palette.fg_text_primary,
        );
        let icon_space = if self.icon.is_empty() { 0.0 } else { 24.0 };
        let desired_width = galley.size().x + icon_space + button_padding * 2.0;
        let size = egui::vec2(
            desired_width.max(decorations.button_min_width),
            decorations.button_height,
        );
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());

        let mut fill = palette.accent_primary;
        if !enabled {
            fill = blend_color(fill, palette.border_soft, 0.5);
        } else if response.is_pointer_button_down_on() {
            fill = blend_color(fill, palette.fg_text_primary, 0.2);
        } else if response.hovered() {
            fill = blend_color(fill, palette.bg_panel, 0.2);
        }
        ui.painter().rect_filled(
            rect,
            egui::Rounding::same(decorations.card_rounding),
            fill,
        );
        ui.painter().rect_stroke(
            rect,
            egui::Rounding::same(decorations.card_rounding),
            egui::Stroke::new(1.0, blend_color(fill, palette.border_soft, 0.6)),
        );

        let text_color = if enabled {
            egui::Color32::WHITE
        } else {
            blend_color(palette.fg_text_secondary, palette.bg_panel, 0.4)
        };
        let content_rect = rect.shrink2(egui::vec2(button_padding, 0.0));
        ui.allocate_ui_at_rect(content_rect, |ui| {
            ui.with_layout(egui::Layout::left_to_right(egui::Align::Center), |ui| {
                ui.spacing_mut().item_spacing.x = 8.0;
                if !self.icon.is_empty() {
                    ui.label(RichText::new(self.icon).size(15.0).color(text_color));
                }
                ui.label(
                    RichText::new(self.label)
                        .size(14.0)
                        .color(text_color)
                        .strong(),
                );
            });
        });
        response
    }
}
