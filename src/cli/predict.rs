use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tabled::{
    Table,
    settings::{
        Alignment, Color,
        object::{Cell, Columns, Object, Rows},
    },
};
use tokio::time::Duration;
use vpredict::api::{PercentCell, RenderModel, RequestController, Sign};

use crate::cli::ui::open_viewer;

#[derive(clap::Args)]
pub struct PredictCommand {
    #[arg(help = "Stock symbol, e.g. AAPL")]
    symbol: String,

    #[arg(
        short = 'g',
        help = "Open GUI window to display additional information such as chart"
    )]
    gui: bool,
}

impl PredictCommand {
    pub async fn exec(&self) {
        let controller = RequestController::from_config().await;

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("[{elapsed}] {msg} {spinner:.cyan}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(self.symbol.trim().to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));

        match controller.submit(&self.symbol).await {
            Ok(model) => {
                spinner.finish_and_clear();
                print_model(&model);

                if self.gui {
                    open_viewer(controller, Some(&self.symbol), Some(model)).await;
                }
            }
            Err(err) => {
                spinner.finish_with_message(format!("{} ", err.to_string().red()));
            }
        }
    }
}

pub fn print_model(model: &RenderModel) {
    println!(
        "\n{} {}",
        model.company_name.bold(),
        format!("[Ticker: {}]", model.stock_symbol).bright_black()
    );
    println!("{}", summary_table(model));
    println!("{}", prediction_table(model));
}

fn summary_table(model: &RenderModel) -> Table {
    let table_data: Vec<Vec<String>> = vec![
        vec!["".to_string(), "Price".to_string(), "Change".to_string()],
        vec![
            "Past Week".to_string(),
            format!(
                "{} → {}",
                model.prices.past_week_open, model.prices.past_week_close
            ),
            model.past_week_change.text.to_string(),
        ],
        vec![
            "Current".to_string(),
            model.prices.current.to_string(),
            "".to_string(),
        ],
        vec![
            "Next Week".to_string(),
            model.prices.predicted.to_string(),
            model.next_week_change.text.to_string(),
        ],
    ];

    let mut table = tabled::builder::Builder::from_iter(&table_data).build();
    table.modify(Rows::first(), Color::FG_BRIGHT_BLACK);
    table.modify(Columns::first().not(Rows::first()), Color::FG_CYAN);
    table.modify(Columns::new(1..), Alignment::right());
    color_percent_cell(&mut table, 1, &model.past_week_change);
    color_percent_cell(&mut table, 3, &model.next_week_change);

    table
}

fn prediction_table(model: &RenderModel) -> Table {
    let mut table_data: Vec<Vec<String>> = vec![vec![
        "Date".to_string(),
        "Predicted Price".to_string(),
        "Daily Change".to_string(),
    ]];
    for row in &model.rows {
        table_data.push(vec![
            row.date.to_string(),
            row.price.to_string(),
            row.change.text.to_string(),
        ]);
    }

    let mut table = tabled::builder::Builder::from_iter(&table_data).build();
    table.modify(Rows::first(), Color::FG_BRIGHT_BLACK);
    table.modify(Columns::new(1..), Alignment::right());
    for (i, row) in model.rows.iter().enumerate() {
        color_percent_cell(&mut table, i + 1, &row.change);
    }

    table
}

fn color_percent_cell(table: &mut Table, row: usize, cell: &PercentCell) {
    let color = match cell.sign {
        Some(Sign::Positive) => Color::FG_GREEN,
        Some(Sign::Negative) => Color::FG_RED,
        None => Color::FG_BRIGHT_BLACK,
    };

    table.modify(Cell::new(row, 2), color);
}
