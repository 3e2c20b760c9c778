use clap::{Parser, Subcommand};

mod db;
mod seller;
mod session;

#[derive(Debug, Parser)]
#[command(name = "painel-app", about = "Painel admin CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Seller(seller::SellerCommand),
    Session(session::SessionCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Seller(command) => seller::run(command).await,
            Commands::Session(command) => session::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}
