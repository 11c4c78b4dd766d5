// [apps/sidecar/src/config.rs]
/*!
 * =================================================================
 * APARATO: CARGADOR DE CONFIGURACION
 * CLASIFICACION: INFRASTRUCTURE (ESTRATO L3)
 * RESPONSABILIDAD: LECTURA DE KEY=VALUE, SUPERPOSICION DE ENTORNO Y
 * RECARGA EN CALIENTE VIA SIGHUP
 * =================================================================
 */

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

/// Runtime configuration, reloadable without restarting the process.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP bind host.
    pub bind_addr: String,
    /// HTTP bind port.
    pub port: u16,
    /// Index store host.
    pub redis_host: String,
    /// Index store port.
    pub redis_port: u16,
    /// Oracle base URL.
    pub oracle_url: String,
    /// Score delta applied on a spam report.
    pub spam_weight: i64,
    /// Score delta subtracted on a ham report.
    pub ham_weight: i64,
    /// Sliding TTL, in days, for `lg_f:*`/`lg_s:*` entries.
    pub local_retention_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: "127.0.0.1".to_string(),
            port: 12421,
            redis_host: "localhost".to_string(),
            redis_port: 6379,
            oracle_url: "https://oracle.mailuminati.com".to_string(),
            spam_weight: 1,
            ham_weight: 2,
            local_retention_days: 15,
        }
    }
}

impl Config {
    /// Loads configuration from `path` (a `KEY=VALUE` file, `#` comments,
    /// optional double-quoting), falling back to environment variables for
    /// any key the file leaves unset, and finally to the built-in default.
    pub fn load(path: &Path) -> Self {
        let file_values = read_key_value_file(path);
        let defaults = Config::default();

        Config {
            bind_addr: resolve(&file_values, "GUARDIAN_BIND_ADDR", defaults.bind_addr),
            port: resolve_parsed(&file_values, "PORT", defaults.port),
            redis_host: resolve(&file_values, "REDIS_HOST", defaults.redis_host),
            redis_port: resolve_parsed(&file_values, "REDIS_PORT", defaults.redis_port),
            oracle_url: resolve(&file_values, "ORACLE_URL", defaults.oracle_url),
            spam_weight: resolve_parsed(&file_values, "SPAM_WEIGHT", defaults.spam_weight),
            ham_weight: resolve_parsed(&file_values, "HAM_WEIGHT", defaults.ham_weight),
            local_retention_days: resolve_parsed(
                &file_values,
                "LOCAL_RETENTION_DAYS",
                defaults.local_retention_days,
            ),
        }
    }
}

fn resolve(file_values: &HashMap<String, String>, key: &str, default: String) -> String {
    if let Some(v) = file_values.get(key) {
        return v.clone();
    }
    std::env::var(key).unwrap_or(default)
}

fn resolve_parsed<T: std::str::FromStr>(file_values: &HashMap<String, String>, key: &str, default: T) -> T {
    if let Some(v) = file_values.get(key) {
        if let Ok(parsed) = v.parse() {
            return parsed;
        }
        warn!(key, value = %v, "config value failed to parse, falling back");
    }
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn read_key_value_file(path: &Path) -> HashMap<String, String> {
    let mut values = HashMap::new();
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "config file unreadable, using environment and defaults only");
            return values;
        }
    };

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, raw_value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim().to_string();
        let value = raw_value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value)
            .to_string();
        values.insert(key, value);
    }

    info!(path = %path.display(), entries = values.len(), "config file loaded");
    values
}

/// Default config file path when no `--config` flag is given.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("mi-guardian.conf")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_quoted_and_commented_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# a comment\nPORT=9999\nORACLE_URL=\"https://example.test\"\n").unwrap();
        let config = Config::load(file.path());
        assert_eq!(config.port, 9999);
        assert_eq!(config.oracle_url, "https://example.test");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load(Path::new("/nonexistent/path/does-not-exist.conf"));
        assert_eq!(config.port, Config::default().port);
    }
}
