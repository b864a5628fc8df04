//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración con soporte para argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./segment_http --port 4000 \
//!   --read-timeout-ms 10000 \
//!   --write-timeout-ms 10000 \
//!   --log-level debug
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=4000 HTTP_HOST=0.0.0.0 ./segment_http
//! ```

use clap::Parser;
use std::time::Duration;

/// Niveles aceptados por `--log-level`
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Configuración del servidor HTTP/1.1
#[derive(Debug, Clone, Parser)]
#[command(name = "segment_http")]
#[command(about = "Servidor HTTP/1.1 sobre TCP crudo con router por segmentos")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "4000", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    // === Timeouts ===
    /// Deadline para leer un request completo, en milisegundos
    #[arg(long = "read-timeout-ms", default_value = "10000", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    /// Deadline para escribir una response completa, en milisegundos
    #[arg(long = "write-timeout-ms", default_value = "10000", env = "WRITE_TIMEOUT_MS")]
    pub write_timeout_ms: u64,

    // === Logging ===
    /// Nivel de log (RUST_LOG tiene prioridad si está definido)
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use segment_http::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:4000");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Port must be >= 1".to_string());
        }

        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }

        // Validar timeouts
        if self.read_timeout_ms == 0 {
            return Err("Read timeout must be > 0".to_string());
        }
        if self.write_timeout_ms == 0 {
            return Err("Write timeout must be > 0".to_string());
        }

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(format!("Log level must be one of {}", LOG_LEVELS.join(", ")));
        }

        Ok(())
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 4000,
            host: "127.0.0.1".to_string(),
            read_timeout_ms: 10_000,
            write_timeout_ms: 10_000,
            log_level: "info".to_string(),
        }
    }
}
