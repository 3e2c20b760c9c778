//! Terminal rendering for the dashboard CLI.

use std::io;

use rusty_money::{Money, iso};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};

use painel_app::domain::products::{form::format_price, records::ProductRecord};
use painel_dashboard::session::Session;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Centavos as Brazilian reais, e.g. `R$100,00`.
pub(crate) fn price(minor: u64) -> String {
    i64::try_from(minor).map_or_else(
        |_| format_price(minor),
        |minor| Money::from_minor(minor, iso::BRL).to_string(),
    )
}

pub(crate) fn write_products(
    out: &mut impl io::Write,
    products: &[ProductRecord],
) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products found");
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Name", "Type", "Payment", "Status", "Price", "Created"]);

    for product in products {
        builder.push_record([
            product.uuid.to_string(),
            product.name.clone(),
            product.product_type.as_str().to_string(),
            product.payment_type.as_str().to_string(),
            product.status.as_str().to_string(),
            price(product.price),
            product.created_at.strftime(TIMESTAMP_FORMAT).to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(5..6), Alignment::right());
    table.modify(Rows::first(), Alignment::center());

    writeln!(out, "{table}")
}

pub(crate) fn write_product(out: &mut impl io::Write, product: &ProductRecord) -> io::Result<()> {
    let optional = |value: Option<&str>| value.unwrap_or("-").to_string();

    let mut builder = Builder::default();

    builder.push_record(["ID".to_string(), product.uuid.to_string()]);
    builder.push_record(["Name".to_string(), product.name.clone()]);
    builder.push_record(["Type".to_string(), product.product_type.as_str().to_string()]);
    builder.push_record(["Price".to_string(), price(product.price)]);
    builder.push_record(["Payment".to_string(), product.payment_type.as_str().to_string()]);
    builder.push_record(["Status".to_string(), product.status.as_str().to_string()]);
    builder.push_record([
        "Description".to_string(),
        optional(product.description.as_deref()),
    ]);
    builder.push_record(["Image".to_string(), optional(product.image_url.as_deref())]);
    builder.push_record([
        "Commission".to_string(),
        product
            .commission_rate
            .map_or_else(|| "-".to_string(), |rate| format!("{rate}%")),
    ]);
    builder.push_record([
        "Facebook pixel".to_string(),
        optional(product.facebook_pixel.as_deref()),
    ]);
    builder.push_record([
        "Google Analytics".to_string(),
        optional(product.google_analytics_pixel.as_deref()),
    ]);
    builder.push_record([
        "Updated".to_string(),
        product.updated_at.strftime(TIMESTAMP_FORMAT).to_string(),
    ]);

    let mut table = builder.build();

    table.with(Style::modern_rounded());

    writeln!(out, "{table}")
}

pub(crate) fn write_session(out: &mut impl io::Write, session: &Session) -> io::Result<()> {
    writeln!(out, "email:      {}", session.email)?;
    writeln!(out, "owner_uuid: {}", session.owner_uuid)?;
    writeln!(
        out,
        "expires_at: {}",
        session.expires_at.strftime(TIMESTAMP_FORMAT)
    )
}
