use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::entity::{additional_cost, item};

/// CHECK constraints that schema sync cannot express: `(name, table, predicate)`.
const CHECK_CONSTRAINTS: &[(&str, &str, &str)] = &[
    ("chk_items_status", "items", "status IN ('owned', 'sold')"),
    ("chk_items_purchase_price", "items", "purchase_price IS NULL OR purchase_price >= 0"),
    ("chk_items_sale_price", "items", "sale_price IS NULL OR sale_price >= 0"),
    ("chk_additional_costs_amount", "additional_costs", "amount >= 0"),
];

/// Ensure composite indexes and CHECK constraints exist.
///
/// SeaORM's schema-sync creates tables, columns, foreign keys and unique keys
/// from the entities; everything here is idempotent and safe to run on every
/// startup.
pub async fn ensure_schema_extras(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Default listing: WHERE user_id = ? ORDER BY created_at DESC
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_items_user_created")
        .table(item::Entity)
        .col(item::Column::UserId)
        .col(item::Column::CreatedAt)
        .to_string(PostgresQueryBuilder);
    run_logged(db, "index idx_items_user_created", &stmt).await;

    // Stats and status filters: WHERE user_id = ? GROUP BY status
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_items_user_status")
        .table(item::Entity)
        .col(item::Column::UserId)
        .col(item::Column::Status)
        .to_string(PostgresQueryBuilder);
    run_logged(db, "index idx_items_user_status", &stmt).await;

    // Cost listing: WHERE item_id = ? ORDER BY date DESC
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_additional_costs_item_date")
        .table(additional_cost::Entity)
        .col(additional_cost::Column::ItemId)
        .col(additional_cost::Column::Date)
        .to_string(PostgresQueryBuilder);
    run_logged(db, "index idx_additional_costs_item_date", &stmt).await;

    for (name, table, predicate) in CHECK_CONSTRAINTS {
        run_logged(db, &format!("constraint {name}"), &check_constraint_sql(name, table, predicate)).await;
    }

    Ok(())
}

/// `ADD CONSTRAINT` has no `IF NOT EXISTS`, so swallow the duplicate error server-side.
fn check_constraint_sql(name: &str, table: &str, predicate: &str) -> String {
    format!(
        "DO $$ BEGIN \
         ALTER TABLE \"{table}\" ADD CONSTRAINT \"{name}\" CHECK ({predicate}); \
         EXCEPTION WHEN duplicate_object THEN NULL; \
         END $$"
    )
}

async fn run_logged(db: &DatabaseConnection, what: &str, stmt: &str) {
    match db.execute_unprepared(stmt).await {
        Ok(_) => info!("Ensured {} exists", what),
        Err(e) => warn!("Failed to create {}: {}", what, e),
    }
}
