use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202412010002_create_attendance"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // attendance_records
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("attendance_records"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("event_id")).string().not_null())
                    // One record per registration. Concurrent writers that both miss the
                    // existence check are arbitrated here.
                    .col(
                        ColumnDef::new(Alias::new("registration_id"))
                            .string()
                            .not_null()
                            .unique_key(),
                    )
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
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("check_in_method"))
                            .enumeration(
                                Alias::new("check_in_method_type"),
                                vec![
                                    Alias::new("QR"),
                                    Alias::new("SAC"),
                                    Alias::new("MANUAL"),
                                    Alias::new("KIOSK"),
                                ],
                            )
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("check_in_time"))
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Alias::new("check_out_time")).timestamp().null())
                    .col(
                        ColumnDef::new(Alias::new("is_verified"))
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Alias::new("verified_by")).string().null())
                    .col(ColumnDef::new(Alias::new("notes")).text().null())
                    .col(
                        ColumnDef::new(Alias::new("created_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(
                        ColumnDef::new(Alias::new("updated_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_attendance_records_event_center")
                    .table(Alias::new("attendance_records"))
                    .col(Alias::new("event_id"))
                    .col(Alias::new("center_id"))
                    .to_owned(),
            )
            .await?;

        // attendance_corrections
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("attendance_corrections"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("attendance_id"))
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("correction_type"))
                            .enumeration(
                                Alias::new("correction_type"),
                                vec![
                                    Alias::new("CHECK_IN_TIME"),
                                    Alias::new("CHECK_OUT_TIME"),
                                    Alias::new("PARTICIPATION_MODE"),
                                    Alias::new("CENTER_CHANGE"),
                                ],
                            )
                            .not_null(),
                    )
                    .col(ColumnDef::new(Alias::new("old_value")).string().null())
                    .col(ColumnDef::new(Alias::new("new_value")).string().not_null())
                    .col(ColumnDef::new(Alias::new("reason")).text().not_null())
                    .col(ColumnDef::new(Alias::new("corrected_by")).string().not_null())
                    .col(
                        ColumnDef::new(Alias::new("created_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    // Records are never deleted, so no cascade.
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_att_corr_record")
                            .from(Alias::new("attendance_corrections"), Alias::new("attendance_id"))
                            .to(Alias::new("attendance_records"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_attendance_corrections_attendance_id")
                    .table(Alias::new("attendance_corrections"))
                    .col(Alias::new("attendance_id"))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_attendance_corrections_attendance_id")
                    .table(Alias::new("attendance_corrections"))
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_attendance_records_event_center")
                    .table(Alias::new("attendance_records"))
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(Alias::new("attendance_corrections"))
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(Alias::new("attendance_records"))
                    .to_owned(),
            )
            .await
    }
}
