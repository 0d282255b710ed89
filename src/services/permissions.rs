use serde::{Deserialize, Serialize};

/// Back-office roles. Closed enum so permission decisions are checked for
/// exhaustiveness at compile time; the string forms are the external
/// contract stored in `utilisateurs.role` and in token claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "SuperAdmin")]
    SuperAdmin,
    #[serde(rename = "Administrateur")]
    Administrateur,
    #[serde(rename = "Responsable Qualité")]
    ResponsableQualite,
    #[serde(rename = "Directrice Générale")]
    DirectriceGenerale,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SuperAdmin",
            Role::Administrateur => "Administrateur",
            Role::ResponsableQualite => "Responsable Qualité",
            Role::DirectriceGenerale => "Directrice Générale",
        }
    }

    pub fn depuis_contrat(s: &str) -> Option<Role> {
        match s {
            "SuperAdmin" => Some(Role::SuperAdmin),
            "Administrateur" => Some(Role::Administrateur),
            "Responsable Qualité" => Some(Role::ResponsableQualite),
            "Directrice Générale" => Some(Role::DirectriceGenerale),
            _ => None,
        }
    }
}

/// Actions the back office can perform. Adding a permission means extending
/// this enum and the table in [`permissions_du_role`], nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    VoirEnquetes,
    ExporterDonnees,
    VoirStatistiques,
    GererUtilisateurs,
    GererServices,
    VoirLogs,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::VoirEnquetes => "voir_enquetes",
            Permission::ExporterDonnees => "exporter_donnees",
            Permission::VoirStatistiques => "voir_statistiques",
            Permission::GererUtilisateurs => "gerer_utilisateurs",
            Permission::GererServices => "gerer_services",
            Permission::VoirLogs => "voir_logs",
        }
    }
}

/// Flat permission table. No inheritance between roles.
fn permissions_du_role(role: Role) -> &'static [Permission] {
    use Permission::*;
    match role {
        Role::SuperAdmin | Role::Administrateur => &[
            VoirEnquetes,
            ExporterDonnees,
            VoirStatistiques,
            GererUtilisateurs,
            GererServices,
            VoirLogs,
        ],
        Role::ResponsableQualite => &[VoirEnquetes, ExporterDonnees, VoirStatistiques],
        Role::DirectriceGenerale => &[VoirEnquetes, ExporterDonnees, VoirStatistiques, VoirLogs],
    }
}

/// SuperAdmin bypasses the table entirely; every other role consults it.
pub fn a_permission(role: Role, permission: Permission) -> bool {
    if role == Role::SuperAdmin {
        return true;
    }
    permissions_du_role(role).contains(&permission)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn superadmin_a_toutes_les_permissions() {
        for permission in [
            Permission::VoirEnquetes,
            Permission::ExporterDonnees,
            Permission::VoirStatistiques,
            Permission::GererUtilisateurs,
            Permission::GererServices,
            Permission::VoirLogs,
        ] {
            assert!(a_permission(Role::SuperAdmin, permission));
        }
    }

    #[test]
    fn responsable_qualite_ne_gere_pas_les_utilisateurs() {
        assert!(a_permission(Role::ResponsableQualite, Permission::VoirEnquetes));
        assert!(a_permission(Role::ResponsableQualite, Permission::ExporterDonnees));
        assert!(!a_permission(Role::ResponsableQualite, Permission::GererUtilisateurs));
        assert!(!a_permission(Role::ResponsableQualite, Permission::VoirLogs));
    }

    #[test]
    fn directrice_generale_voit_les_logs_sans_gerer() {
        assert!(a_permission(Role::DirectriceGenerale, Permission::VoirLogs));
        assert!(!a_permission(Role::DirectriceGenerale, Permission::GererUtilisateurs));
        assert!(!a_permission(Role::DirectriceGenerale, Permission::GererServices));
    }

    #[test]
    fn roles_font_l_aller_retour_avec_le_contrat() {
        for role in [
            Role::SuperAdmin,
            Role::Administrateur,
            Role::ResponsableQualite,
            Role::DirectriceGenerale,
        ] {
            assert_eq!(Role::depuis_contrat(role.as_str()), Some(role));
        }
        assert_eq!(Role::depuis_contrat("Stagiaire"), None);
    }
}
