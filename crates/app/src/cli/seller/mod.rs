use clap::{Args, Subcommand};

mod create;

#[derive(Debug, Args)]
pub(crate) struct SellerCommand {
    #[command(subcommand)]
    command: SellerSubcommand,
}

#[derive(Debug, Subcommand)]
enum SellerSubcommand {
    Create(create::CreateSellerArgs),
}

pub(crate) async fn run(command: SellerCommand) -> Result<(), String> {
    match command.command {
        SellerSubcommand::Create(args) => create::run(args).await,
    }
}
