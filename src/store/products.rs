use anyhow::Context;
use diesel::{Connection, ExpressionMethods, QueryDsl, RunQueryDsl, SelectableHelper, SqliteConnection};
use tracing::{info, warn};

use crate::{
    app_error::AppError,
    models::{ProductEntity, ProductFormEntity},
    schema::{order_items, products},
    validation::ProductForm,
};

fn form_entity(form: &ProductForm) -> ProductFormEntity<'_> {
    ProductFormEntity {
        name: &form.name,
        description: &form.description,
        price: form.price,
        image_path: form.image_path.as_deref(),
    }
}

/// Fetch the whole catalog in insertion order.
pub fn list_products(conn: &mut SqliteConnection) -> Result<Vec<ProductEntity>, AppError> {
    let products = products::table
        .order_by(products::id.asc())
        .select(ProductEntity::as_select())
        .load(conn)
        .context("Failed to get products")?;

    Ok(products)
}

pub fn get_product(conn: &mut SqliteConnection, id: i32) -> Result<ProductEntity, AppError> {
    let product = products::table
        .find(id)
        .select(ProductEntity::as_select())
        .first(conn)?;

    Ok(product)
}

pub fn create_product(
    conn: &mut SqliteConnection,
    form: &ProductForm,
) -> Result<ProductEntity, AppError> {
    let product: ProductEntity = diesel::insert_into(products::table)
        .values(form_entity(form))
        .returning(ProductEntity::as_returning())
        .get_result(conn)
        .context("Failed to create product")?;

    info!("Product #{} '{}' created at {}", product.id, product.name, product.price);
    Ok(product)
}

/// Overwrite every field of an existing product.
///
/// Order line items keep the unit price they captured, so past order totals
/// are unaffected by a price change.
pub fn update_product(
    conn: &mut SqliteConnection,
    id: i32,
    form: &ProductForm,
) -> Result<ProductEntity, AppError> {
    let product: ProductEntity = diesel::update(products::table.find(id))
        .set(&form_entity(form))
        .returning(ProductEntity::as_returning())
        .get_result(conn)?;

    info!("Product #{} updated to '{}' at {}", product.id, product.name, product.price);
    Ok(product)
}

/// Remove a product that no order line item refers to.
pub fn delete_product(conn: &mut SqliteConnection, id: i32) -> Result<ProductEntity, AppError> {
    let product = conn.transaction(|conn| {
        let line_items: i64 = order_items::table
            .filter(order_items::product_id.eq(id))
            .count()
            .get_result(conn)
            .context("Failed to count order items for product")?;

        if line_items > 0 {
            warn!("Product #{} is referenced by {} order line(s); not deleting", id, line_items);
            return Err(AppError::ProductInUse {
                product_id: id,
                line_items,
            });
        }

        let product: ProductEntity = diesel::delete(products::table.find(id))
            .returning(ProductEntity::as_returning())
            .get_result(conn)?;

        Ok::<ProductEntity, AppError>(product)
    })?;

    info!("Product #{} '{}' deleted", product.id, product.name);
    Ok(product)
}
