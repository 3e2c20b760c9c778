use std::io;

use clap::{Args, Subcommand};

use painel_app::domain::products::{
    form::ProductForm,
    records::{ProductStatus, ProductUuid},
};
use painel_dashboard::{catalog::RefreshOutcome, errors::CatalogError};

use super::{Dashboard, render};

#[derive(Debug, Args)]
pub(crate) struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    /// List products, newest first
    List(ListArgs),
    /// Create a product
    Create(ProductFields),
    /// Edit a product; omitted fields keep their current value
    Edit(EditArgs),
    /// Permanently delete a product
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Case-insensitive name filter
    #[arg(long)]
    search: Option<String>,

    /// Only products with this status (ativo, inativo)
    #[arg(long)]
    status: Option<ProductStatus>,
}

/// Raw form fields, validated by the same rules as the dashboard form.
#[derive(Debug, Args)]
struct ProductFields {
    #[arg(long)]
    name: Option<String>,

    /// curso-online, mentoria or evento-online
    #[arg(long)]
    product_type: Option<String>,

    /// Price in reais, e.g. "R$ 1.234,56" or 100
    #[arg(long, allow_hyphen_values = true)]
    price: Option<String>,

    /// unico or recorrente
    #[arg(long)]
    payment_type: Option<String>,

    /// ativo or inativo
    #[arg(long)]
    status: Option<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    image_url: Option<String>,

    /// Affiliate commission percentage, 0 to 100
    #[arg(long)]
    commission_rate: Option<String>,

    #[arg(long)]
    facebook_pixel: Option<String>,

    #[arg(long)]
    google_analytics_pixel: Option<String>,
}

impl ProductFields {
    fn apply(self, form: &mut ProductForm) {
        if let Some(name) = self.name {
            form.name = name;
        }

        if let Some(product_type) = self.product_type {
            form.product_type = product_type;
        }

        if let Some(price) = self.price {
            form.price = price;
        }

        if let Some(payment_type) = self.payment_type {
            form.payment_type = payment_type;
        }

        let optional = [
            (self.status, &mut form.status),
            (self.description, &mut form.description),
            (self.image_url, &mut form.image_url),
            (self.commission_rate, &mut form.commission_rate),
            (self.facebook_pixel, &mut form.facebook_pixel),
            (self.google_analytics_pixel, &mut form.google_analytics_pixel),
        ];

        for (value, slot) in optional {
            if value.is_some() {
                *slot = value;
            }
        }
    }
}

#[derive(Debug, Args)]
struct EditArgs {
    id: ProductUuid,

    #[command(flatten)]
    fields: ProductFields,
}

#[derive(Debug, Args)]
struct DeleteArgs {
    id: ProductUuid,
}

pub(crate) async fn run(
    dashboard: &Dashboard,
    command: ProductsCommand,
    out: &mut impl io::Write,
) -> Result<(), String> {
    dashboard.require_session().await?;

    match command.command {
        ProductsSubcommand::List(args) => list(dashboard, args, out).await,
        ProductsSubcommand::Create(fields) => create(dashboard, fields, out).await,
        ProductsSubcommand::Edit(args) => edit(dashboard, args, out).await,
        ProductsSubcommand::Delete(args) => delete(dashboard, args).await,
    }
}

async fn list(
    dashboard: &Dashboard,
    args: ListArgs,
    out: &mut impl io::Write,
) -> Result<(), String> {
    let catalog = dashboard.catalog();

    if let RefreshOutcome::Failed(error) = catalog.mount().await {
        return Err(describe(&error));
    }

    catalog.set_search(args.search.unwrap_or_default());
    catalog.set_status_filter(args.status);

    render::write_products(out, &catalog.visible()).map_err(|error| error.to_string())
}

async fn create(
    dashboard: &Dashboard,
    fields: ProductFields,
    out: &mut impl io::Write,
) -> Result<(), String> {
    let mut form = ProductForm::default();

    fields.apply(&mut form);

    let catalog = dashboard.catalog();

    catalog.open_create_form();

    let outcome = catalog.create(form).await.map_err(|error| describe(&error))?;

    render::write_product(out, &outcome.value).map_err(|error| error.to_string())
}

async fn edit(
    dashboard: &Dashboard,
    args: EditArgs,
    out: &mut impl io::Write,
) -> Result<(), String> {
    let editor = dashboard.editor(args.id);

    editor.load().await.map_err(|error| describe(&error))?;
    editor.edit_form(|form| args.fields.apply(form));

    let saved = editor.save().await.map_err(|error| describe(&error))?;

    render::write_product(out, &saved).map_err(|error| error.to_string())
}

async fn delete(dashboard: &Dashboard, args: DeleteArgs) -> Result<(), String> {
    dashboard
        .catalog()
        .delete(args.id)
        .await
        .map(|_deleted| ())
        .map_err(|error| describe(&error))
}

fn describe(error: &CatalogError) -> String {
    match error {
        CatalogError::Validation(errors) => {
            errors
                .iter()
                .fold("invalid product:".to_string(), |message, error| {
                    format!("{message}\n  {}: {}", error.field, error.message)
                })
        }
        CatalogError::Auth => "session expired; run `painel login` again".to_string(),
        other => other.to_string(),
    }
}
