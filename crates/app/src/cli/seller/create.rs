use clap::Args;
use painel_app::{
    auth::{AuthService, DEFAULT_SESSION_TTL, PgAuthService, SignUpForm, validate_sign_up},
    database,
};

#[derive(Debug, Args)]
pub(crate) struct CreateSellerArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Seller display name
    #[arg(long)]
    name: String,

    /// Login email
    #[arg(long)]
    email: String,

    /// Phone number; formatted as (xx) xxxxx-xxxx
    #[arg(long)]
    phone: String,

    /// Login password
    #[arg(long, env = "SELLER_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) async fn run(args: CreateSellerArgs) -> Result<(), String> {
    let sign_up = validate_sign_up(&SignUpForm {
        name: args.name,
        email: args.email,
        phone: args.phone,
        password_confirmation: args.password.clone(),
        password: args.password,
    })
    .map_err(|errors| format!("invalid seller: {errors}"))?;

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let seller = PgAuthService::new(pool, DEFAULT_SESSION_TTL)
        .sign_up(sign_up)
        .await
        .map_err(|error| format!("failed to create seller: {error}"))?;

    println!("seller_uuid: {}", seller.uuid);
    println!("seller_email: {}", seller.email);
    println!("seller_phone: {}", seller.phone);

    Ok(())
}
