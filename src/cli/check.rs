use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tabled::settings::{Color, object::Columns};
use tokio::time::Duration;
use vpredict::api;

#[derive(clap::Args)]
pub struct CheckCommand;

impl CheckCommand {
    pub async fn exec(&self) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{msg}[{elapsed}] {spinner:.cyan}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));

        let predict_api = match api::get_config().await {
            Ok(config) => config.predict_api,
            Err(err) => {
                spinner.finish_with_message(format!("{} ", err.to_string().red()));
                return;
            }
        };

        let (status, ok) = match api::check().await {
            Ok(_) => ("✔".to_string(), true),
            Err(err) => (err.to_string(), false),
        };

        spinner.finish();

        let table_data: Vec<Vec<String>> = vec![vec![predict_api, status]];
        let mut table = tabled::builder::Builder::from_iter(&table_data).build();
        table.modify(Columns::first(), Color::FG_CYAN);
        if ok {
            table.modify(Columns::new(1..), Color::FG_GREEN);
        } else {
            table.modify(Columns::new(1..), Color::FG_RED);
        }
        println!("{table}");
    }
}
