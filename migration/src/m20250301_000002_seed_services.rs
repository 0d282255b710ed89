use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Reference data the public form depends on. Kept in a migration so a fresh
// database can accept submissions immediately.
const SERVICES: &[(&str, &str)] = &[
    ("Accueil", "Accueil et orientation des visiteurs"),
    ("Prélèvement", "Prise de sang et prélèvements"),
    ("Retrait des résultats", "Remise des résultats d'analyses"),
    ("Laboratoire", "Analyses médicales"),
    ("Caisse", "Facturation et encaissement"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (nom, description) in SERVICES {
            let insert = Query::insert()
                .into_table(Services::Table)
                .columns([Services::NomService, Services::DescriptionService, Services::Actif])
                .values_panic([(*nom).into(), (*description).into(), true.into()])
                .to_owned();
            manager.exec_stmt(insert).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (nom, _) in SERVICES {
            let delete = Query::delete()
                .from_table(Services::Table)
                .and_where(Expr::col(Services::NomService).eq(*nom))
                .to_owned();
            manager.exec_stmt(delete).await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Services {
    Table,
    NomService,
    DescriptionService,
    Actif,
}
