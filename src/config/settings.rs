use crate::config::EnvironmentProvider;
use crate::errors::InternalError;

/// Process configuration, loaded once at boot.
///
/// Every component receives what it needs from here; nothing reads the
/// environment after startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub db_host: String,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub db_port: u16,
    pub db_pool_size: u32,

    /// Full connection URL override; takes precedence over the DB_* parts.
    pub database_url: Option<String>,

    pub http_host: String,
    pub http_port: u16,

    pub jwt_secret: String,
    pub jwt_expires_hours: i64,
    pub session_hours: i64,

    pub superadmin_username: String,
    pub superadmin_password: String,
    pub superadmin_role: String,
}

const REQUIRED_VARS: &[&str] = &[
    "DB_HOST",
    "DB_USER",
    "DB_NAME",
    "JWT_SECRET",
    "SUPERADMIN_USERNAME",
    "SUPERADMIN_PASSWORD",
];

impl Settings {
    /// Load settings, aborting with the full list of missing required
    /// variables rather than failing on the first one.
    pub fn load(env: &dyn EnvironmentProvider) -> Result<Self, InternalError> {
        let manquantes: Vec<&str> = REQUIRED_VARS
            .iter()
            .filter(|var| env.get_var(var).is_none())
            .copied()
            .collect();

        if !manquantes.is_empty() {
            return Err(InternalError::Configuration(format!(
                "missing required environment variables: {}",
                manquantes.join(", ")
            )));
        }

        Ok(Self {
            db_host: env.get_var("DB_HOST").unwrap_or_default(),
            db_user: env.get_var("DB_USER").unwrap_or_default(),
            db_password: env.get_var("DB_PASSWORD").unwrap_or_default(),
            db_name: env.get_var("DB_NAME").unwrap_or_default(),
            db_port: parse_or(env, "DB_PORT", 3306),
            db_pool_size: parse_or(env, "DB_POOL_SIZE", 10),
            database_url: env.get_var("DATABASE_URL"),
            http_host: env
                .get_var("HOST")
                .unwrap_or_else(|| "0.0.0.0".to_string()),
            http_port: parse_or(env, "PORT", 5000),
            jwt_secret: env.get_var("JWT_SECRET").unwrap_or_default(),
            jwt_expires_hours: parse_or(env, "JWT_EXPIRES_HOURS", 24),
            session_hours: parse_or(env, "SESSION_HOURS", 24),
            superadmin_username: env.get_var("SUPERADMIN_USERNAME").unwrap_or_default(),
            superadmin_password: env.get_var("SUPERADMIN_PASSWORD").unwrap_or_default(),
            superadmin_role: env
                .get_var("SUPERADMIN_ROLE")
                .unwrap_or_else(|| "SuperAdmin".to_string()),
        })
    }

    /// Connection URL for the MySQL pool.
    pub fn database_url(&self) -> String {
        match &self.database_url {
            Some(url) => url.clone(),
            None => format!(
                "mysql://{}:{}@{}:{}/{}",
                self.db_user, self.db_password, self.db_host, self.db_port, self.db_name
            ),
        }
    }

    pub fn adresse_ecoute(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

fn parse_or<T: std::str::FromStr>(env: &dyn EnvironmentProvider, key: &str, defaut: T) -> T {
    env.get_var(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    fn env_complet() -> MockEnvironment {
        MockEnvironment::empty().with_vars(&[
            ("DB_HOST", "localhost"),
            ("DB_USER", "app"),
            ("DB_NAME", "enquete_satisfaction"),
            ("JWT_SECRET", "secret-de-test"),
            ("SUPERADMIN_USERNAME", "root.admin"),
            ("SUPERADMIN_PASSWORD", "MotDePasse1!"),
        ])
    }

    #[test]
    fn charge_avec_valeurs_par_defaut() {
        let settings = Settings::load(&env_complet()).unwrap();
        assert_eq!(settings.db_port, 3306);
        assert_eq!(settings.db_pool_size, 10);
        assert_eq!(settings.http_port, 5000);
        assert_eq!(settings.jwt_expires_hours, 24);
        assert_eq!(settings.superadmin_role, "SuperAdmin");
        assert_eq!(
            settings.database_url(),
            "mysql://app:@localhost:3306/enquete_satisfaction"
        );
    }

    #[test]
    fn liste_toutes_les_variables_manquantes() {
        let env = MockEnvironment::empty().with_var("DB_HOST", "localhost");
        let err = Settings::load(&env).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("DB_USER"));
        assert!(message.contains("JWT_SECRET"));
        assert!(message.contains("SUPERADMIN_PASSWORD"));
        assert!(!message.contains("DB_HOST,"));
    }

    #[test]
    fn database_url_prend_la_priorite() {
        let env = env_complet().with_var("DATABASE_URL", "sqlite::memory:");
        let settings = Settings::load(&env).unwrap();
        assert_eq!(settings.database_url(), "sqlite::memory:");
    }
}
