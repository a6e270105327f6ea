use super::*;

/// 화이트보드 화면 전체(팔레트 + 캔버스)를 담당하는 뷰이다.
///
/// 상태에 대한 가변 참조를 받아 프레임마다 생성되며, 모든 변경은
/// `WhiteboardState`의 메서드를 통해서만 일으킨다.
pub struct WhiteboardUi<'a> {
    /// 테마 참조.
    pub(super) theme: &'a Theme,
    /// 에디터 상태 참조.
    pub(super) state: &'a mut WhiteboardState,
    /// 이번 프레임의 팔레트 패널 영역. 드래그 삭제 판정에 쓴다.
    pub(super) palette_rect: Option<egui::Rect>,
    /// 이번 프레임에 커서가 포트 위에 있었는지 여부.
    pub(super) pointer_over_port: bool,
}

impl<'a> WhiteboardUi<'a> {
    /// 뷰 인스턴스를 생성한다.
    pub fn new(theme: &'a Theme, state: &'a mut WhiteboardState) -> Self {
        Self {
            theme,
            state,
            palette_rect: None,
            pointer_over_port: false,
        }
    }

    /// 좌측 팔레트와 중앙 캔버스를 구성한다.
    pub fn show(&mut self, ctx: &egui::Context) {
        let palette = *self.theme.palette();
        let decorations = *self.theme.decorations();
        let board = self.theme.board_colors();
        let palette_frame = egui::Frame {
            fill: palette.bg_sidebar,
            stroke: egui::Stroke::new(1.0, palette.border_soft),
            rounding: egui::Rounding::same(decorations.container_rounding),
            inner_margin: decorations.card_inner_margin,
            ..Default::default()
        };
        let palette_response = egui::SidePanel::left("whiteboard_palette")
            .frame(palette_frame)
            .resizable(false)
            .default_width(200.0)
            .show(ctx, |ui| {
                self.render_palette(ui);
            });
        self.palette_rect = Some(palette_response.response.rect);

        let canvas_frame = egui::Frame {
            fill: board.canvas_fill,
            stroke: egui::Stroke::new(1.0, palette.border_soft),
            rounding: egui::Rounding::same(decorations.container_rounding),
            inner_margin: egui::Margin::same(0.0),
            ..Default::default()
        };
        egui::CentralPanel::default()
            .frame(canvas_frame)
            .show(ctx, |ui| {
                self.render_canvas(ui);
            });
    }
}
