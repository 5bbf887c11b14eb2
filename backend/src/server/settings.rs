//! Application settings loaded via OrthoConfig.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use accounts::domain::{DEFAULT_RESET_TOKEN_TTL_MINUTES, PasswordRules};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_RESET_LINK_BASE: &str = "/reset-password";

/// Server settings layered from defaults, a config file, `ACCOUNTS_*`
/// environment variables and command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ACCOUNTS")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string; in-memory storage when absent.
    pub database_url: Option<String>,
    /// Maximum PostgreSQL connections held by the pool.
    pub database_pool_size: Option<u32>,
    /// Create the built-in admin and user accounts on startup.
    #[ortho_config(default = false)]
    pub seed_users: bool,
    /// Append audit records to this file instead of the `audit` log target.
    pub audit_log_path: Option<PathBuf>,
    /// Prefix of the links sent by the reset notifier.
    pub reset_link_base: Option<String>,
    /// Lifetime of password reset tokens.
    pub reset_token_ttl_minutes: Option<i64>,
    pub password_min_length: Option<usize>,
    pub password_mixed_case: Option<bool>,
    pub password_numbers: Option<bool>,
    pub password_symbols: Option<bool>,
}

impl AppSettings {
    /// Configured bind address, defaulting to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns an [`std::io::Error`] of kind `InvalidInput` when the address
    /// does not parse.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid bind_addr '{raw}': {err}"),
            )
        })
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn reset_link_base(&self) -> &str {
        self.reset_link_base
            .as_deref()
            .unwrap_or(DEFAULT_RESET_LINK_BASE)
    }

    /// Reset token lifetime; non-positive values fall back to the default.
    pub fn reset_token_ttl(&self) -> chrono::Duration {
        let minutes = self
            .reset_token_ttl_minutes
            .filter(|minutes| *minutes > 0)
            .unwrap_or(DEFAULT_RESET_TOKEN_TTL_MINUTES);
        chrono::Duration::minutes(minutes)
    }

    /// Password rules with unset fields taken from [`PasswordRules::default`].
    pub fn password_rules(&self) -> PasswordRules {
        let defaults = PasswordRules::default();
        PasswordRules {
            min_length: self.password_min_length.unwrap_or(defaults.min_length),
            mixed_case: self.password_mixed_case.unwrap_or(defaults.mixed_case),
            numbers: self.password_numbers.unwrap_or(defaults.numbers),
            symbols: self.password_symbols.unwrap_or(defaults.symbols),
        }
    }
}

/// Load settings from the process arguments and environment.
///
/// # Errors
///
/// Configuration errors are surfaced as [`std::io::Error`] so `main` can
/// return them directly.
pub fn load_settings() -> std::io::Result<AppSettings> {
    AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 12] = [
        "ACCOUNTS_BIND_ADDR",
        "ACCOUNTS_DATABASE_URL",
        "ACCOUNTS_DATABASE_POOL_SIZE",
        "ACCOUNTS_SEED_USERS",
        "ACCOUNTS_AUDIT_LOG_PATH",
        "ACCOUNTS_RESET_LINK_BASE",
        "ACCOUNTS_RESET_TOKEN_TTL_MINUTES",
        "ACCOUNTS_PASSWORD_MIN_LENGTH",
        "ACCOUNTS_PASSWORD_MIXED_CASE",
        "ACCOUNTS_PASSWORD_NUMBERS",
        "ACCOUNTS_PASSWORD_SYMBOLS",
        "ACCOUNTS_CONFIG_PATH",
    ];

    fn load_with(overrides: &[(&str, &str)]) -> AppSettings {
        let vars = VARS.map(|name| {
            let value = overrides
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned());
            (name, value)
        });
        let _guard = lock_env(vars);
        AppSettings::load_from_iter([OsString::from("accounts")]).expect("settings should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let settings = load_with(&[]);

        assert_eq!(
            settings.bind_addr().expect("default addr"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("addr")
        );
        assert!(settings.database_url().is_none());
        assert!(settings.database_pool_size.is_none());
        assert!(!settings.seed_users);
        assert!(settings.audit_log_path.is_none());
        assert_eq!(settings.reset_link_base(), "/reset-password");
        assert_eq!(settings.reset_token_ttl(), chrono::Duration::minutes(60));
        assert_eq!(settings.password_rules(), PasswordRules::default());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let settings = load_with(&[
            ("ACCOUNTS_BIND_ADDR", "127.0.0.1:9000"),
            ("ACCOUNTS_DATABASE_URL", "postgres://db/accounts"),
            ("ACCOUNTS_DATABASE_POOL_SIZE", "4"),
            ("ACCOUNTS_SEED_USERS", "true"),
            ("ACCOUNTS_AUDIT_LOG_PATH", "/tmp/audit.jsonl"),
            ("ACCOUNTS_RESET_TOKEN_TTL_MINUTES", "15"),
            ("ACCOUNTS_PASSWORD_MIN_LENGTH", "12"),
            ("ACCOUNTS_PASSWORD_SYMBOLS", "false"),
        ]);

        assert_eq!(
            settings.bind_addr().expect("addr"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("addr")
        );
        assert_eq!(settings.database_url(), Some("postgres://db/accounts"));
        assert_eq!(settings.database_pool_size, Some(4));
        assert!(settings.seed_users);
        assert_eq!(
            settings.audit_log_path,
            Some(PathBuf::from("/tmp/audit.jsonl"))
        );
        assert_eq!(settings.reset_token_ttl(), chrono::Duration::minutes(15));
        assert_eq!(
            settings.password_rules(),
            PasswordRules {
                min_length: 12,
                symbols: false,
                ..PasswordRules::default()
            }
        );
    }

    #[rstest]
    #[case(Some("   "), None)]
    #[case(Some("postgres://x"), Some("postgres://x"))]
    #[case(None, None)]
    fn blank_database_url_means_in_memory(
        #[case] raw: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let settings = AppSettings {
            database_url: raw.map(str::to_owned),
            ..blank()
        };
        assert_eq!(settings.database_url(), expected);
    }

    #[rstest]
    #[case(Some(0))]
    #[case(Some(-5))]
    fn non_positive_ttl_falls_back_to_default(#[case] minutes: Option<i64>) {
        let settings = AppSettings {
            reset_token_ttl_minutes: minutes,
            ..blank()
        };
        assert_eq!(settings.reset_token_ttl(), chrono::Duration::minutes(60));
    }

    #[rstest]
    fn malformed_bind_addr_is_rejected() {
        let settings = AppSettings {
            bind_addr: Some("not an address".to_owned()),
            ..blank()
        };
        let err = settings.bind_addr().expect_err("invalid");
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }

    fn blank() -> AppSettings {
        AppSettings {
            bind_addr: None,
            database_url: None,
            database_pool_size: None,
            seed_users: false,
            audit_log_path: None,
            reset_link_base: None,
            reset_token_ttl_minutes: None,
            password_min_length: None,
            password_mixed_case: None,
            password_numbers: None,
            password_symbols: None,
        }
    }
}
