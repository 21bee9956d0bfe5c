pub mod analysis_ui;
pub mod explainer_ui;
pub mod function_input_ui;
pub mod history_ui;
pub mod integral_ui;
pub mod optimization_ui;
pub mod panel_trait;
pub mod plot2d_ui;
pub mod plot3d_ui;
pub mod widgets;

pub use analysis_ui::AnalysisPanel;
pub use explainer_ui::ExplainerPanel;
pub use function_input_ui::FunctionInputPanel;
pub use history_ui::HistoryPanel;
pub use integral_ui::IntegralPanel;
pub use optimization_ui::OptimizationPanel;
pub use panel_trait::{Panel, PanelState};
pub use plot2d_ui::Plot2dPanel;
pub use plot3d_ui::Plot3dPanel;
