use eframe::egui;
use egui_plot::{Corner, GridMark, Legend, Line, LineStyle, Plot};
use log::debug;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    CHANNEL_BUFFER_DEFAULT,
    controller::RequestController,
    error::SubmitError,
    gui::GuiEvent,
    presenter::{PercentCell, RenderModel, Sign},
    session::{PriceChart, RenderSession, Submission, UiState},
};

const COLOR_ACTUAL: egui::Color32 = egui::Color32::from_rgb(52, 152, 219);
const COLOR_PREDICTED: egui::Color32 = egui::Color32::from_rgb(46, 204, 113);
const COLOR_NEGATIVE: egui::Color32 = egui::Color32::from_rgb(231, 76, 60);

pub struct PredictViewer {
    controller: RequestController,
    session: RenderSession,
    symbol_input: String,
    status_text: String,

    outcome_sender: mpsc::Sender<OutcomeEvent>,
    outcome_receiver: mpsc::Receiver<OutcomeEvent>,
    in_flight: Option<JoinHandle<()>>,

    gui_event_sender: Option<mpsc::Sender<GuiEvent>>,
}

struct OutcomeEvent {
    generation: u64,
    outcome: Result<RenderModel, SubmitError>,
}

impl PredictViewer {
    pub fn new(
        cc: &eframe::CreationContext,
        controller: RequestController,
        initial_symbol: Option<&str>,
        initial_model: Option<RenderModel>,
        status_text: &str,
        gui_event_sender: Option<mpsc::Sender<GuiEvent>>,
    ) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let (outcome_sender, outcome_receiver) =
            mpsc::channel::<OutcomeEvent>(CHANNEL_BUFFER_DEFAULT);

        let symbol_input = initial_symbol.unwrap_or_default().to_string();

        let mut session = RenderSession::new();
        if let Some(model) = initial_model {
            if let Ok(Submission { generation, .. }) = session.begin(&symbol_input) {
                session.finish(generation, Ok(model));
            }
        }

        Self {
            controller,
            session,
            symbol_input,
            status_text: status_text.to_string(),

            outcome_sender,
            outcome_receiver,
            in_flight: None,

            gui_event_sender,
        }
    }

    fn submit(&mut self, ctx: &egui::Context) {
        if let Some(stale) = self.in_flight.take() {
            stale.abort();
        }

        match self.session.begin(&self.symbol_input) {
            Ok(Submission { generation, symbol }) => {
                let controller = self.controller.clone();
                let outcome_sender = self.outcome_sender.clone();
                let ctx = ctx.clone();

                self.in_flight = Some(tokio::spawn(async move {
                    let outcome = controller.request(&symbol).await;
                    let _ = outcome_sender
                        .send(OutcomeEvent {
                            generation,
                            outcome,
                        })
                        .await;
                    ctx.request_repaint();
                }));
            }
            Err(err) => debug!("[Viewer] {err}"),
        }
    }

    fn on_outcome(&mut self, event: OutcomeEvent) {
        let rendered = event.outcome.as_ref().ok().cloned();

        if self.session.finish(event.generation, event.outcome) {
            self.in_flight = None;

            if let (Some(model), Some(sender)) = (rendered, &self.gui_event_sender) {
                let _ = sender.try_send(GuiEvent::Rendered(Box::new(model)));
            }
        }
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        let loading = self.session.is_loading();

        ui.horizontal_centered(|ui| {
            ui.label("Stock Symbol");

            let input = ui.add(
                egui::TextEdit::singleline(&mut self.symbol_input)
                    .hint_text("e.g. AAPL")
                    .desired_width(160.0),
            );
            let entered = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            let clicked = ui
                .add_enabled(!loading, egui::Button::new("Predict"))
                .clicked();

            if (clicked || entered) && !loading {
                self.submit(ui.ctx());
            }
        });
    }

    fn show_status(&self, ui: &mut egui::Ui) {
        ui.horizontal_centered(|ui| {
            ui.label(
                egui::RichText::new(format!("🔗 {}", self.status_text))
                    .color(egui::Color32::DARK_GRAY)
                    .size(12.0),
            );
        });
    }

    fn show_content(&self, ui: &mut egui::Ui) {
        match self.session.state() {
            UiState::Idle => {
                ui.label(
                    egui::RichText::new("Enter a stock symbol to see next week's prediction")
                        .color(egui::Color32::GRAY),
                );
            }
            UiState::Loading { symbol } => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(format!("Predicting {symbol}..."));
                });
            }
            UiState::Error(err) => {
                ui.label(egui::RichText::new(format!("⚠ {err}")).color(COLOR_NEGATIVE));
            }
            UiState::Results(model) => {
                show_summary(ui, model);
                ui.separator();
                show_table(ui, model);
                ui.separator();

                if let Some(chart) = self.session.chart() {
                    show_chart(ui, chart);
                }
            }
        }
    }
}

impl eframe::App for PredictViewer {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        let already_run = ctx.data(|d| {
            d.get_temp::<bool>(egui::Id::new("startup_once"))
                .unwrap_or(false)
        });

        if !already_run {
            if *self.session.state() == UiState::Idle && !self.symbol_input.trim().is_empty() {
                self.submit(ctx);
            }

            ctx.data_mut(|d| d.insert_temp(egui::Id::new("startup_once"), true));
        }

        while let Ok(event) = self.outcome_receiver.try_recv() {
            self.on_outcome(event);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::TopBottomPanel::top("form_panel")
                .show_separator_line(false)
                .show_inside(ui, |ui| self.show_form(ui));

            egui::TopBottomPanel::bottom("status_panel")
                .show_separator_line(false)
                .show_inside(ui, |ui| self.show_status(ui));

            egui::CentralPanel::default().show_inside(ui, |ui| self.show_content(ui));
        });
    }
}

fn show_summary(ui: &mut egui::Ui, model: &RenderModel) {
    ui.heading(&model.company_name);
    ui.label(
        egui::RichText::new(format!("Ticker: {}", model.stock_symbol)).color(egui::Color32::GRAY),
    );
    ui.add_space(8.0);

    egui::Grid::new("summary_grid")
        .num_columns(4)
        .spacing([32.0, 6.0])
        .show(ui, |ui| {
            ui.label("Past Week");
            ui.label(&model.prices.past_week_open);
            ui.label(&model.prices.past_week_close);
            percent_label(ui, &model.past_week_change);
            ui.end_row();

            ui.label("Current Price");
            ui.label(egui::RichText::new(&model.prices.current).strong());
            ui.label("");
            ui.label("");
            ui.end_row();

            ui.label("Next Week");
            ui.label("");
            ui.label(&model.prices.predicted);
            percent_label(ui, &model.next_week_change);
            ui.end_row();
        });
}

fn show_table(ui: &mut egui::Ui, model: &RenderModel) {
    egui::Grid::new("prediction_table")
        .num_columns(3)
        .striped(true)
        .spacing([32.0, 4.0])
        .show(ui, |ui| {
            for title in ["Date", "Predicted Price", "Daily Change"] {
                ui.label(egui::RichText::new(title).color(egui::Color32::GRAY));
            }
            ui.end_row();

            for row in &model.rows {
                ui.label(&row.date);
                ui.label(&row.price);
                percent_label(ui, &row.change);
                ui.end_row();
            }
        });
}

fn show_chart(ui: &mut egui::Ui, chart: &PriceChart) {
    let series = &chart.series;

    Plot::new(("price_chart", chart.id))
        .legend(Legend::default().position(Corner::LeftTop))
        .x_axis_formatter(|mark: GridMark, _| {
            if mark.value.fract() == 0.0 {
                series.label_at(mark.value).unwrap_or_default().to_string()
            } else {
                "".to_string()
            }
        })
        .y_axis_formatter(|mark: GridMark, _| format!("${:.2}", mark.value))
        .label_formatter(|name, point| {
            if name.is_empty() {
                "".to_string()
            } else {
                format!(
                    "[{}] {} ${:.2}",
                    series.label_at(point.x).unwrap_or_default(),
                    name,
                    point.y
                )
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new("Actual Price", chart.actual_points.clone())
                    .width(2.0)
                    .color(COLOR_ACTUAL),
            );
            plot_ui.line(
                Line::new("Predicted Price", chart.predicted_points.clone())
                    .width(2.0)
                    .color(COLOR_PREDICTED)
                    .style(LineStyle::dashed_loose()),
            );
        });
}

fn percent_label(ui: &mut egui::Ui, cell: &PercentCell) {
    let color = match cell.sign {
        Some(Sign::Positive) => COLOR_PREDICTED,
        Some(Sign::Negative) => COLOR_NEGATIVE,
        None => egui::Color32::GRAY,
    };

    ui.label(egui::RichText::new(&cell.text).color(color));
}
