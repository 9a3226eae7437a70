use colored::Colorize;
use tabled::settings::{Color, object::Columns};
use vpredict::{api, config::ConfigKey};

#[derive(clap::Args)]
pub struct ConfigShowCommand;

impl ConfigShowCommand {
    pub async fn exec(&self) {
        match api::get_config().await {
            Ok(config) => {
                let table_data: Vec<Vec<String>> = vec![
                    vec![ConfigKey::PredictApi.to_string(), config.predict_api],
                    vec![
                        ConfigKey::TimeoutSecs.to_string(),
                        config.timeout_secs.to_string(),
                    ],
                ];

                let mut table = tabled::builder::Builder::from_iter(&table_data).build();
                table.modify(Columns::first(), Color::FG_CYAN);
                println!("{table}");
            }
            Err(err) => {
                println!("[!] {}", err.to_string().red());
            }
        }
    }
}
