//! # Segment HTTP - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor: lee la configuración, instala el logging,
//! arma el router y arranca el accept loop.

use segment_http::config::Config;
use segment_http::handlers;
use segment_http::logging;
use segment_http::router::Router;
use segment_http::server::Server;

fn main() {
    let config = Config::new();

    if let Err(e) = config.validate() {
        eprintln!("Configuración inválida: {}", e);
        std::process::exit(2);
    }

    logging::init(&config.log_level);
    tracing::info!(
        address = %config.address(),
        read_timeout_ms = config.read_timeout_ms,
        write_timeout_ms = config.write_timeout_ms,
        "starting segment_http"
    );

    // El router se arma una sola vez, antes de aceptar conexiones
    let mut router = Router::new();
    handlers::register_routes(&mut router);

    let server = Server::new(config, router).with_not_found(handlers::not_found_handler);

    if let Err(e) = server.run() {
        tracing::error!(error = %e, "fatal error");
        std::process::exit(1);
    }
}
