use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202412010001_create_registrations"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // centers (owned by event administration, read-only here)
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("centers"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("name")).string().not_null())
                    .col(ColumnDef::new(Alias::new("capacity")).integer().null())
                    .col(
                        ColumnDef::new(Alias::new("created_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .to_owned(),
            )
            .await?;

        // registrations (owned by member registration, read-only here)
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("registrations"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("event_id")).string().not_null())
                    .col(ColumnDef::new(Alias::new("member_id")).string().not_null())
                    .col(ColumnDef::new(Alias::new("center_id")).string().null())
                    .col(
                        ColumnDef::new(Alias::new("participation_mode"))
                            .enumeration(
                                Alias::new("participation_mode_type"),
                                vec![
                                    Alias::new("ONLINE"),
                                    Alias::new("ONSITE"),
                                    Alias::new("HYBRID"),
                                ],
                            )
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("status"))
                            .string()
                            .not_null()
                            .default("CONFIRMED"),
                    )
                    .col(
                        ColumnDef::new(Alias::new("created_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_registration_center")
                            .from(Alias::new("registrations"), Alias::new("center_id"))
                            .to(Alias::new("centers"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_registrations_event_id")
                    .table(Alias::new("registrations"))
                    .col(Alias::new("event_id"))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_registrations_event_id")
                    .table(Alias::new("registrations"))
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Alias::new("registrations")).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Alias::new("centers")).to_owned())
            .await
    }
}
