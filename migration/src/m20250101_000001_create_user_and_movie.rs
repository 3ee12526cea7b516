use sea_orm_migration::{prelude::*, schema::*};

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
                    .col(pk_auto(User::Id))
                    .col(string_len(User::Name, 100))
                    .col(string_len(User::NameKey, 100))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_name_key")
                    .table(User::Table)
                    .col(User::NameKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(pk_auto(Movie::Id))
                    .col(string_len(Movie::Name, 255))
                    .col(string_len(Movie::NameKey, 255))
                    .col(string_len_null(Movie::Director, 255))
                    .col(integer_null(Movie::Year))
                    .col(string_len_null(Movie::PosterUrl, 1024))
                    .col(integer(Movie::UserId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_user_id")
                            .from(Movie::Table, Movie::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_user_name_key")
                    .table(Movie::Table)
                    .col(Movie::UserId)
                    .col(Movie::NameKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Movie::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(User::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
    Name,
    NameKey,
}

#[derive(DeriveIden)]
enum Movie {
    Table,
    Id,
    Name,
    NameKey,
    Director,
    Year,
    PosterUrl,
    UserId,
}
