use eframe::egui::{self, Color32};

use crate::editor::model::NodeVisualKind;

include!(concat!(env!("OUT_DIR"), "/custom_font.rs"));

/// 패널/텍스트/강조에 쓰는 공통 색상 묶음이다.
#[derive(Debug, Clone, Copy)]
pub struct ThemePalette {
    /// 툴바 배경.
    pub bg_toolbar: Color32,
    /// 사이드바 배경.
    pub bg_sidebar: Color32,
    /// 중앙 영역 배경.
    pub bg_main: Color32,
    /// 카드/패널 배경.
    pub bg_panel: Color32,
    /// 기본 텍스트.
    pub fg_text_primary: Color32,
    /// 보조 텍스트.
    pub fg_text_secondary: Color32,
    /// 옅은 테두리.
    pub border_soft: Color32,
    /// 주요 강조색.
    pub accent_primary: Color32,
    /// 오류 강조색.
    pub accent_error: Color32,
    /// 성공 강조색.
    pub accent_success: Color32,
}

/// 라운딩/여백 등 장식 수치 묶음이다.
#[derive(Debug, Clone, Copy)]
pub struct ThemeDecorations {
    /// 컨테이너 라운딩.
    pub container_rounding: f32,
    /// 카드 라운딩.
    pub card_rounding: f32,
    /// 툴바 라운딩.
    pub toolbar_rounding: f32,
    /// 카드 내부 여백.
    pub card_inner_margin: egui::Margin,
    /// 버튼 사이 간격.
    pub button_gap: f32,
    /// 버튼 최소 너비.
    pub button_min_width: f32,
    /// 버튼 높이.
    pub button_height: f32,
}

/// 화이트보드 캔버스 전용 색상이다.
#[derive(Debug, Clone, Copy)]
pub struct BoardColors {
    /// 캔버스 배경.
    pub canvas_fill: Color32,
    /// 배경 격자선.
    pub grid_line: Color32,
    /// 노드 본문 배경.
    pub node_fill: Color32,
    /// 노드 기본 테두리.
    pub node_border: Color32,
    /// 선택된 노드 테두리.
    pub node_selected_border: Color32,
    /// 확정된 연결 곡선.
    pub connection_stroke: Color32,
    /// 진행 중(점선) 연결 곡선.
    pub connection_temp: Color32,
    /// 입력 포트 원.
    pub port_input: Color32,
    /// 출력 포트 원.
    pub port_output: Color32,
    /// 연결 중간점 마커.
    pub handle_fill: Color32,
}

/// 노드 머리글에 쓰는 시각 요소이다.
#[derive(Debug, Clone, Copy)]
pub struct NodeVisual {
    /// 머리글 아이콘.
    pub icon: &'static str,
    /// 분류 레이블.
    pub label: &'static str,
    /// 강조색.
    pub color: Color32,
}

/// UI 전체에서 참조할 공통 테마 정보이다.
pub struct Theme {
    palette: ThemePalette,
    decorations: ThemeDecorations,
    board: BoardColors,
}

impl Default for Theme {
    /// 어두운 기본 테마를 정의한다.
    fn default() -> Self {
        Self {
            palette: ThemePalette {
                bg_toolbar: Color32::from_rgb(26, 27, 31),
                bg_sidebar: Color32::from_rgb(30, 31, 36),
                bg_main: Color32::from_rgb(22, 23, 27),
                bg_panel: Color32::from_rgb(36, 37, 43),
                fg_text_primary: Color32::from_rgb(228, 228, 232),
                fg_text_secondary: Color32::from_rgb(148, 150, 158),
                border_soft: Color32::from_rgb(52, 54, 62),
                accent_primary: Color32::from_rgb(82, 132, 255),
                accent_error: Color32::from_rgb(220, 80, 80),
                accent_success: Color32::from_rgb(60, 180, 120),
            },
            decorations: ThemeDecorations {
                container_rounding: 6.0,
                card_rounding: 8.0,
                toolbar_rounding: 6.0,
                card_inner_margin: egui::Margin::symmetric(14.0, 12.0),
                button_gap: 10.0,
                button_min_width: 92.0,
                button_height: 32.0,
            },
            board: BoardColors {
                canvas_fill: Color32::from_rgb(18, 19, 23),
                grid_line: Color32::from_rgb(28, 30, 36),
                node_fill: Color32::from_rgb(40, 42, 50),
                node_border: Color32::from_rgb(62, 65, 76),
                node_selected_border: Color32::from_rgb(82, 132, 255),
                connection_stroke: Color32::from_rgb(130, 134, 146),
                connection_temp: Color32::from_rgb(96, 100, 112),
                port_input: Color32::from_rgb(88, 140, 255),
                port_output: Color32::from_rgb(72, 190, 130),
                handle_fill: Color32::from_rgb(196, 150, 70),
            },
        }
    }
}

impl Theme {
    /// 공통 팔레트를 반환한다.
    pub fn palette(&self) -> &ThemePalette {
        &self.palette
    }

    /// 장식 수치를 반환한다.
    pub fn decorations(&self) -> &ThemeDecorations {
        &self.decorations
    }

    /// 캔버스 색상을 반환한다.
    pub fn board_colors(&self) -> BoardColors {
        self.board
    }

    /// 시각 분류에 대응하는 노드 머리글 요소를 반환한다.
    pub fn node_visual(&self, kind: NodeVisualKind) -> NodeVisual {
        match kind {
            NodeVisualKind::Source => NodeVisual {
                icon: "📥",
                label: "Source",
                color: Color32::from_rgb(88, 140, 255),
            },
            NodeVisualKind::Transform => NodeVisual {
                icon: "🔧",
                label: "Transform",
                color: Color32::from_rgb(196, 150, 70),
            },
            NodeVisualKind::Model => NodeVisual {
                icon: "🧠",
                label: "Model",
                color: Color32::from_rgb(170, 110, 220),
            },
        }
    }

    /// egui Context에 테마 기반 스타일을 적용한다.
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        visuals.window_rounding = egui::Rounding::same(6.0);
        visuals.widgets.inactive.bg_fill = self.palette.bg_panel;
        visuals.panel_fill = self.palette.bg_main;
        ctx.set_visuals(visuals);
        install_custom_font(ctx);
    }
}

/// 두 색을 t 비율로 섞는다.
pub fn blend_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| -> u8 { (x as f32 + (y as f32 - x as f32) * t).round() as u8 };
    Color32::from_rgb(mix(a.r(), b.r()), mix(a.g(), b.g()), mix(a.b(), b.b()))
}

/// build.rs에서 추출한 폰트를 egui에 등록한다.
pub fn install_custom_font(ctx: &egui::Context) {
    if let Some(bytes) = embedded_font_bytes() {
        let mut fonts = egui::FontDefinitions::default();
        fonts
            .font_data
            .insert("custom".into(), egui::FontData::from_static(bytes));
        fonts
            .families
            .entry(egui::FontFamily::Proportional)
            .or_default()
            .insert(0, "custom".into());
        fonts
            .families
            .entry(egui::FontFamily::Monospace)
            .or_default()
            .insert(0, "custom".into());
        ctx.set_fonts(fonts);
    }
}
