//! # Logging
//! src/logging.rs
//!
//! Todo el crate registra eventos con las macros de `tracing`. Aquí solo se
//! instala el subscriber: formato de texto y filtro por nivel.
//!
//! `RUST_LOG` tiene prioridad sobre el nivel de la configuración, así se
//! puede subir el detalle de un módulo sin tocar flags:
//!
//! ```bash
//! RUST_LOG=segment_http::router=debug ./segment_http
//! ```

use tracing_subscriber::EnvFilter;

/// Instala el subscriber global.
///
/// Llamarlo más de una vez no falla: si ya hay un subscriber se deja el
/// existente (útil en tests).
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("segment_http={}", level.to_ascii_lowercase())));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .try_init();
}
