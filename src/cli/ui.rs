use colored::Colorize;
use eframe::egui;
use tokio::sync::mpsc;
use vpredict::{
    CHANNEL_BUFFER_DEFAULT, VERSION, api,
    api::{RenderModel, RequestController},
    gui::{GuiEvent, predict_viewer::PredictViewer},
};

use crate::cli::predict::print_model;

#[derive(clap::Args)]
pub struct UiCommand {
    #[arg(help = "Stock symbol to predict once the window opens, e.g. AAPL")]
    symbol: Option<String>,
}

impl UiCommand {
    pub async fn exec(&self) {
        let controller = RequestController::from_config().await;
        open_viewer(controller, self.symbol.as_deref(), None).await;
    }
}

pub async fn open_viewer(
    controller: RequestController,
    symbol: Option<&str>,
    model: Option<RenderModel>,
) {
    let (sender, mut receiver) = mpsc::channel::<GuiEvent>(CHANNEL_BUFFER_DEFAULT);

    tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            match event {
                GuiEvent::Rendered(model) => {
                    print_model(&model);
                }
            }
        }
    });

    let status_text = match api::get_config().await {
        Ok(config) => config.predict_api,
        Err(err) => err.to_string(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([960.0, 760.0]),
        ..Default::default()
    };

    if let Err(err) = eframe::run_native(
        &format!("Vpredict {VERSION}"),
        options,
        Box::new(move |cc| {
            Ok(Box::new(PredictViewer::new(
                cc,
                controller,
                symbol,
                model,
                &status_text,
                Some(sender),
            )))
        }),
    ) {
        println!("[!] {}", err.to_string().red());
    }
}
