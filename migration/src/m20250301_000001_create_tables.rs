use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Back-office accounts. The SuperAdmin principal comes from
        // configuration and never lives in this table.
        manager
            .create_table(
                Table::create()
                    .table(Utilisateurs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Utilisateurs::IdUtilisateur)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Utilisateurs::NomUtilisateur)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Utilisateurs::MotDePasse).string().not_null())
                    .col(ColumnDef::new(Utilisateurs::Nom).string().not_null())
                    .col(ColumnDef::new(Utilisateurs::Prenom).string().null())
                    .col(ColumnDef::new(Utilisateurs::Email).string().null())
                    .col(ColumnDef::new(Utilisateurs::Role).string().not_null())
                    .col(
                        ColumnDef::new(Utilisateurs::Actif)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Utilisateurs::DerniereConnexion).date_time().null())
                    .col(ColumnDef::new(Utilisateurs::DateCreation).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SessionsUtilisateurs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SessionsUtilisateurs::IdSession)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SessionsUtilisateurs::IdUtilisateur)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SessionsUtilisateurs::DonneesSession).text().null())
                    .col(
                        ColumnDef::new(SessionsUtilisateurs::DateExpiration)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SessionsUtilisateurs::DateCreation)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SessionsUtilisateurs::Actif)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sessions_utilisateur")
                            .from(SessionsUtilisateurs::Table, SessionsUtilisateurs::IdUtilisateur)
                            .to(Utilisateurs::Table, Utilisateurs::IdUtilisateur)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_expiration")
                    .table(SessionsUtilisateurs::Table)
                    .col(SessionsUtilisateurs::DateExpiration)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Services::IdService)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Services::NomService).string().not_null())
                    .col(ColumnDef::new(Services::DescriptionService).string().null())
                    .col(ColumnDef::new(Services::Actif).boolean().not_null().default(true))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Enquetes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enquetes::IdEnquete)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Enquetes::DateHeureVisite).date_time().not_null())
                    .col(ColumnDef::new(Enquetes::NomVisiteur).string().not_null())
                    .col(ColumnDef::new(Enquetes::PrenomVisiteur).string().null())
                    .col(ColumnDef::new(Enquetes::Telephone).string().not_null())
                    .col(ColumnDef::new(Enquetes::Email).string().null())
                    .col(ColumnDef::new(Enquetes::RaisonPresence).string().not_null())
                    .col(ColumnDef::new(Enquetes::NiveauSatisfaction).string().not_null())
                    .col(ColumnDef::new(Enquetes::IdService).big_integer().not_null())
                    .col(ColumnDef::new(Enquetes::Commentaires).text().null())
                    .col(ColumnDef::new(Enquetes::Recommandations).text().null())
                    .col(ColumnDef::new(Enquetes::DateSoumission).date_time().not_null())
                    .col(ColumnDef::new(Enquetes::AdresseIp).string().null())
                    .col(ColumnDef::new(Enquetes::UserAgent).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enquetes_service")
                            .from(Enquetes::Table, Enquetes::IdService)
                            .to(Services::Table, Services::IdService),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enquetes_date_soumission")
                    .table(Enquetes::Table)
                    .col(Enquetes::DateSoumission)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::IdNotification)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::TypeNotification).string().not_null())
                    .col(ColumnDef::new(Notifications::Titre).string().not_null())
                    .col(ColumnDef::new(Notifications::Message).text().not_null())
                    .col(ColumnDef::new(Notifications::IdEnquete).big_integer().null())
                    .col(
                        ColumnDef::new(Notifications::IdUtilisateurDestinataire)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Notifications::Lu).boolean().not_null().default(false))
                    .col(ColumnDef::new(Notifications::DateLecture).date_time().null())
                    .col(ColumnDef::new(Notifications::DonneesSupplementaires).text().null())
                    .col(ColumnDef::new(Notifications::Actif).boolean().not_null().default(true))
                    .col(ColumnDef::new(Notifications::DateCreation).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notifications_lu")
                    .table(Notifications::Table)
                    .col(Notifications::Lu)
                    .col(Notifications::Actif)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LogsActivite::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LogsActivite::IdLog)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LogsActivite::IdUtilisateur).big_integer().not_null())
                    .col(ColumnDef::new(LogsActivite::Action).string().not_null())
                    .col(ColumnDef::new(LogsActivite::Description).text().null())
                    .col(ColumnDef::new(LogsActivite::AdresseIp).string().null())
                    .col(ColumnDef::new(LogsActivite::UserAgent).string().null())
                    .col(ColumnDef::new(LogsActivite::DateAction).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LogsActivite::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Enquetes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Services::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SessionsUtilisateurs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Utilisateurs::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Utilisateurs {
    Table,
    IdUtilisateur,
    NomUtilisateur,
    MotDePasse,
    Nom,
    Prenom,
    Email,
    Role,
    Actif,
    DerniereConnexion,
    DateCreation,
}

#[derive(DeriveIden)]
enum SessionsUtilisateurs {
    Table,
    IdSession,
    IdUtilisateur,
    DonneesSession,
    DateExpiration,
    DateCreation,
    Actif,
}

#[derive(DeriveIden)]
enum Services {
    Table,
    IdService,
    NomService,
    DescriptionService,
    Actif,
}

#[derive(DeriveIden)]
enum Enquetes {
    Table,
    IdEnquete,
    DateHeureVisite,
    NomVisiteur,
    PrenomVisiteur,
    Telephone,
    Email,
    RaisonPresence,
    NiveauSatisfaction,
    IdService,
    Commentaires,
    Recommandations,
    DateSoumission,
    AdresseIp,
    UserAgent,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    IdNotification,
    TypeNotification,
    Titre,
    Message,
    IdEnquete,
    IdUtilisateurDestinataire,
    Lu,
    DateLecture,
    DonneesSupplementaires,
    Actif,
    DateCreation,
}

#[derive(DeriveIden)]
enum LogsActivite {
    Table,
    IdLog,
    IdUtilisateur,
    Action,
    Description,
    AdresseIp,
    UserAgent,
    DateAction,
}
