//! Top-level entry point for running MultiCalc as a native window.

use std::sync::Arc;

use eframe::egui;

use crate::config::MultiCalcConfig;
use crate::data::analysis::{CommandModel, LanguageModel, UnconfiguredModel};

use super::{MultiCalcApp, MultiCalcPanel};

/// The model configured in `cfg.analysis.command`, or one that reports
/// "not configured" for every request.
pub fn model_from_config(cfg: &MultiCalcConfig) -> Arc<dyn LanguageModel> {
    match cfg.analysis.command.as_deref().and_then(CommandModel::from_argv) {
        Some(model) => {
            log::info!("analysis requests go to {:?}", cfg.analysis.command);
            Arc::new(model)
        }
        None => {
            log::info!("no analysis model configured");
            Arc::new(UnconfiguredModel)
        }
    }
}

/// Launch MultiCalc in a native window.
///
/// The call blocks until the window is closed.
pub fn run_multicalc(mut cfg: MultiCalcConfig) -> eframe::Result<()> {
    let title = cfg.title.clone();
    let mut opts = cfg
        .native_options
        .take()
        .unwrap_or_else(eframe::NativeOptions::default);

    // Try to set application icon from icon.svg if available.
    if opts.viewport.icon.is_none() {
        if let Some(icon) = load_app_icon_svg() {
            opts.viewport = opts.viewport.clone().with_icon(icon);
        }
    }

    // Set a bigger default window size if one is not provided by config.
    if opts.viewport.inner_size.is_none() {
        opts.viewport = opts
            .viewport
            .clone()
            .with_inner_size(egui::vec2(1400.0, 900.0));
    }

    let model = model_from_config(&cfg);
    let app = MultiCalcApp::new(MultiCalcPanel::new(cfg, model));

    eframe::run_native(
        &title,
        opts,
        Box::new(|cc| {
            // Install Phosphor icon font before creating the app.
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(app))
        }),
    )
}

/// Attempt to load the project's `icon.svg` as an [`egui::IconData`].
///
/// Returns `None` if the file does not exist or cannot be parsed/rendered.
fn load_app_icon_svg() -> Option<egui::IconData> {
    let svg_path = concat!(env!("CARGO_MANIFEST_DIR"), "/icon.svg");
    let data = std::fs::read(svg_path).ok()?;

    let opt = usvg::Options::default();
    let tree = usvg::Tree::from_data(&data, &opt).ok()?;
    let size = tree.size().to_int_size();
    if size.width() == 0 || size.height() == 0 {
        return None;
    }
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    Some(egui::IconData {
        rgba: pixmap.take(),
        width: size.width(),
        height: size.height(),
    })
}
