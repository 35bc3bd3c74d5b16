use cafe_pos::{app_error::AppError, store::products, validation::ProductForm};
use clap::Args;
use diesel::SqliteConnection;

use super::output::Output;

#[derive(Args)]
pub struct ProductFields {
    #[arg(long)]
    name: String,

    #[arg(long, default_value = "")]
    description: String,

    /// Unit price, e.g. `120` or `95.50`
    #[arg(long)]
    price: String,

    /// Path to a product image; stored as given
    #[arg(long)]
    image: Option<String>,
}

impl ProductFields {
    fn form(&self) -> Result<ProductForm, AppError> {
        ProductForm::new(
            &self.name,
            &self.description,
            &self.price,
            self.image.as_deref(),
        )
    }
}

pub fn list(conn: &mut SqliteConnection, out: &Output) -> Result<(), AppError> {
    let products = products::list_products(conn)?;
    out.emit(&products, |out| {
        let rows = products
            .iter()
            .map(|p| {
                vec![
                    p.id.to_string(),
                    p.name.clone(),
                    out.money(p.price),
                    p.description.clone(),
                    p.image_path.clone().unwrap_or_default(),
                ]
            })
            .collect();
        out.table(&["ID", "Name", "Price", "Description", "Image"], rows);
    })
}

pub fn add(conn: &mut SqliteConnection, out: &Output, fields: &ProductFields) -> Result<(), AppError> {
    let form = fields.form()?;
    let product = products::create_product(conn, &form)?;
    out.emit(&product, |out| {
        out.message(&format!(
            "Product #{} '{}' added at {}",
            product.id,
            product.name,
            out.money(product.price)
        ))
    })
}

pub fn update(
    conn: &mut SqliteConnection,
    out: &Output,
    id: i32,
    fields: &ProductFields,
) -> Result<(), AppError> {
    let form = fields.form()?;
    let product = products::update_product(conn, id, &form)?;
    out.emit(&product, |out| {
        out.message(&format!(
            "Product #{} is now '{}' at {}",
            product.id,
            product.name,
            out.money(product.price)
        ))
    })
}

pub fn delete(conn: &mut SqliteConnection, out: &Output, id: i32) -> Result<(), AppError> {
    let product = products::delete_product(conn, id)?;
    out.emit(&product, |out| {
        out.message(&format!("Product #{} '{}' deleted", product.id, product.name))
    })
}
