//! Create user table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(User::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(User::Username).string_len(128).not_null())
                    .col(ColumnDef::new(User::UsernameLower).string_len(128).not_null())
                    .col(ColumnDef::new(User::DisplayName).string_len(256))
                    .col(ColumnDef::new(User::PasswordHash).string_len(256))
                    .col(
                        ColumnDef::new(User::Role)
                            .string_len(32)
                            .not_null()
                            .default("resident"),
                    )
                    .col(ColumnDef::new(User::BanReason).string_len(1024))
                    .col(ColumnDef::new(User::BanType).string_len(32))
                    .col(ColumnDef::new(User::BannedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(User::BanExpiresAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(User::BannedBy).string_len(32))
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(User::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Unique index: username_lower
        manager
            .create_index(
                Index::create()
                    .name("idx_user_username_lower")
                    .table(User::Table)
                    .col(User::UsernameLower)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: ban_expires_at (visibility checks on temporary bans)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_ban_expires_at")
                    .table(User::Table)
                    .col(User::BanExpiresAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum User {
    Table,
    Id,
    Username,
    UsernameLower,
    DisplayName,
    PasswordHash,
    Role,
    BanReason,
    BanType,
    BannedAt,
    BanExpiresAt,
    BannedBy,
    CreatedAt,
    UpdatedAt,
}
