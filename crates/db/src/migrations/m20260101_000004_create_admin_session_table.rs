//! Create admin session table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdminSession::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminSession::Token)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AdminSession::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminSession::Username)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(ColumnDef::new(AdminSession::Role).string_len(32).not_null())
                    .col(
                        ColumnDef::new(AdminSession::IssuedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (logout-everywhere and audits)
        manager
            .create_index(
                Index::create()
                    .name("idx_admin_session_user_id")
                    .table(AdminSession::Table)
                    .col(AdminSession::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminSession::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AdminSession {
    Table,
    Token,
    UserId,
    Username,
    Role,
    IssuedAt,
}
