//! # Handlers del Servidor
//!
//! Lógica de negocio de ejemplo que se monta sobre el router. El core
//! (parser, router, writer) no depende de nada de aquí.
//!
//! - `/`: estado del servidor
//! - `/user/...`: ver `users`

pub mod users;

use crate::http::{Request, Response};
use crate::router::Router;
use serde_json::json;

pub use users::{add_user_handler, all_users_handler, get_user_by_name_handler, get_user_handler};

/// Registra todas las rutas de ejemplo.
///
/// El orden importa: `/all` va antes que `/:id` para no quedar tapado.
pub fn register_routes(router: &mut Router) {
    router.register("/", "/", status_handler);

    router
        .scope("/user")
        .route("/add", add_user_handler)
        .route("/all", all_users_handler)
        .route("/:id", get_user_handler)
        .route("/:id/:name", get_user_by_name_handler);
}

/// Handler para `/`
///
/// # Ejemplo de response
/// ```json
/// {"status": "running", "version": "0.1.0"}
/// ```
pub fn status_handler(_req: &Request, res: &mut Response) {
    let body = json!({
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
    });
    res.set_header("content-type", "application/json");
    res.set_body(body.to_string());
}

/// 404 en JSON con el path pedido
pub fn not_found_handler(req: &Request, res: &mut Response) {
    res.set_header("content-type", "application/json");
    res.set_body(json!({ "error": "not found", "path": req.path() }).to_string());
}
