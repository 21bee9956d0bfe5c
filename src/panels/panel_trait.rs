use downcast_rs::{impl_downcast, Downcast};
use egui::Ui;

use crate::controllers::AnalysisEvent;
use crate::data::session::SessionData;

#[derive(Debug, Clone, Copy)]
pub struct PanelState {
    pub title: &'static str,
    pub icon: &'static str,
    pub visible: bool,
    pub detached: bool,
}

impl PanelState {
    pub fn new(title: &'static str, icon: &'static str) -> Self {
        Self {
            title,
            icon,
            visible: true,
            detached: false,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Tab label with the icon in front.
    pub fn label(&self) -> String {
        format!("{} {}", self.icon, self.title)
    }
}

pub trait Panel: Downcast {
    fn state(&self) -> &PanelState;
    fn state_mut(&mut self) -> &mut PanelState;

    fn title(&self) -> &'static str {
        self.state().title
    }

    // Optional hooks with default empty impls
    fn render_panel(&mut self, _ui: &mut Ui, _data: &mut SessionData<'_>) {}
    /// Called once per frame before rendering, also for hidden panels.
    fn update_data(&mut self, _data: &mut SessionData<'_>) {}
    /// Called for every accepted analysis result.
    fn handle_analysis(&mut self, _event: &AnalysisEvent, _data: &mut SessionData<'_>) {}
}

impl_downcast!(Panel);
