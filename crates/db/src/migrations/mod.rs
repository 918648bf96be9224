//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20260101_000001_create_user_table;
mod m20260101_000002_create_content_table;
mod m20260101_000003_create_report_table;
mod m20260101_000004_create_admin_session_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_user_table::Migration),
            Box::new(m20260101_000002_create_content_table::Migration),
            Box::new(m20260101_000003_create_report_table::Migration),
            Box::new(m20260101_000004_create_admin_session_table::Migration),
        ]
    }
}
