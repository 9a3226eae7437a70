use clap::Subcommand;

mod check;
mod config;
mod predict;
mod ui;

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Check whether the prediction service is reachable")]
    Check(Box<check::CheckCommand>),

    #[command(subcommand, about = "Show or change configurations")]
    Config(Box<config::ConfigCommand>),

    #[command(about = "Predict next week's prices of a stock")]
    #[clap(visible_aliases = &["p"])]
    Predict(Box<predict::PredictCommand>),

    #[command(about = "Open the prediction window")]
    Ui(Box<ui::UiCommand>),
}
