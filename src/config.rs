use std::env;
use std::net::IpAddr;

/// Runtime settings, read from the environment after `.env` is loaded.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub cors_origin: Option<String>,
    pub db_max_connections: u32,
    pub bootstrap_admin: Option<AdminSeed>,
}

#[derive(Clone)]
pub struct AdminSeed {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let database_url = lookup("DATABASE_URL").ok_or("DATABASE_URL must be set")?;

        let jwt_secret = lookup("JWT_SECRET").ok_or("JWT_SECRET must be set")?;
        if jwt_secret.len() < 16 {
            return Err("JWT_SECRET must be at least 16 characters".into());
        }

        let host = match lookup("HOST") {
            Some(h) => h.parse().map_err(|_| format!("HOST is not an IP address: {h}"))?,
            None => IpAddr::from([127, 0, 0, 1]),
        };

        let port = match lookup("PORT") {
            Some(p) => p.parse().map_err(|_| format!("PORT is not a valid port: {p}"))?,
            None => 3000,
        };

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(n) => n
                .parse()
                .map_err(|_| format!("DB_MAX_CONNECTIONS is not a number: {n}"))?,
            None => 5,
        };

        let cors_origin = lookup("CORS_ORIGIN").filter(|o| !o.trim().is_empty() && o != "*");

        let bootstrap_admin = match (lookup("ADMIN_USERNAME"), lookup("ADMIN_EMAIL"), lookup("ADMIN_PASSWORD")) {
            (Some(username), Some(email), Some(password)) => Some(AdminSeed { username, email, password }),
            _ => None,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            host,
            port,
            cors_origin,
            db_max_connections,
            bootstrap_admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const BASE: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/dairy"),
        ("JWT_SECRET", "0123456789abcdef"),
    ];

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&BASE)).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host.to_string(), "127.0.0.1");
        assert_eq!(config.db_max_connections, 5);
        assert!(config.cors_origin.is_none());
        assert!(config.bootstrap_admin.is_none());
    }

    #[test]
    fn requires_database_and_strong_secret() {
        assert!(Config::from_lookup(lookup(&[("JWT_SECRET", "0123456789abcdef")])).is_err());
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/dairy"),
            ("JWT_SECRET", "short"),
        ]))
        .unwrap_err();
        assert!(err.contains("16"));
    }

    #[test]
    fn admin_seed_needs_all_three_fields() {
        let mut vars = BASE.to_vec();
        vars.push(("ADMIN_USERNAME", "admin"));
        vars.push(("ADMIN_EMAIL", "admin@dairy.test"));
        assert!(Config::from_lookup(lookup(&vars)).unwrap().bootstrap_admin.is_none());

        vars.push(("ADMIN_PASSWORD", "hunter22"));
        let config = Config::from_lookup(lookup(&vars)).unwrap();
        let seed = config.bootstrap_admin.unwrap();
        assert_eq!(seed.username, "admin");
        assert!(!format!("{seed:?}").contains("hunter22"));
    }

    #[test]
    fn wildcard_cors_means_any() {
        let mut vars = BASE.to_vec();
        vars.push(("CORS_ORIGIN", "*"));
        assert!(Config::from_lookup(lookup(&vars)).unwrap().cors_origin.is_none());
    }
}
