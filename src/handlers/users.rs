//! # Handlers de usuarios
//! src/handlers/users.rs
//!
//! Rutas bajo el prefijo `/user`:
//! - `POST /user/add`: valida un usuario nuevo enviado como JSON
//! - `GET /user/all`: listado (paginado con `?page=N`)
//! - `GET /user/:id`: usuario por id
//! - `GET /user/:id/:name`: usuario por id y nombre
//!
//! Los handlers no guardan estado: cada conexión corre en su propio thread y
//! no comparten nada mutable, así que solo reflejan lo que reciben.

use crate::http::{Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Body esperado por `POST /user/add`
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Responde 405 si el método no es el esperado.
///
/// Retorna `true` si el handler debe seguir.
fn require_method(req: &Request, res: &mut Response, expected: Method) -> bool {
    if req.method() == expected {
        return true;
    }
    *res = Response::error(
        StatusCode::MethodNotAllowed,
        &format!("{} expects {}", req.path(), expected),
    );
    false
}

/// Escribe `value` como JSON; si falla la serialización responde 500
fn reply_json<T: Serialize>(res: &mut Response, value: &T) {
    if let Err(e) = res.set_json(value) {
        tracing::error!(error = %e, "could not serialize response");
        *res = Response::error(StatusCode::InternalServerError, "serialization failed");
    }
}

/// Handler para `POST /user/add`
///
/// # Ejemplo de request
/// ```json
/// {"name": "ada", "email": "ada@example.com"}
/// ```
pub fn add_user_handler(req: &Request, res: &mut Response) {
    if !require_method(req, res, Method::POST) {
        return;
    }

    let user: NewUser = match serde_json::from_slice(req.body()) {
        Ok(user) => user,
        Err(e) => {
            *res = Response::error(StatusCode::BadRequest, &format!("Invalid user: {}", e));
            return;
        }
    };

    if user.name.trim().is_empty() {
        *res = Response::error(StatusCode::BadRequest, "Field 'name' must not be empty");
        return;
    }

    res.set_status(StatusCode::Created);
    reply_json(res, &json!({ "created": user }));
}

/// Handler para `GET /user/all?page=N`
pub fn all_users_handler(req: &Request, res: &mut Response) {
    if !require_method(req, res, Method::GET) {
        return;
    }

    let page = match req.query_param("page").map(str::parse::<u32>) {
        None => 1,
        Some(Ok(page)) if page >= 1 => page,
        Some(_) => {
            *res = Response::error(StatusCode::BadRequest, "Parameter 'page' must be a positive integer");
            return;
        }
    };

    reply_json(res, &json!({ "page": page, "users": [] }));
}

/// Handler para `GET /user/:id`
///
/// # Ejemplo de response
/// ```json
/// {"id": "42", "query": {"verbose": "1"}}
/// ```
pub fn get_user_handler(req: &Request, res: &mut Response) {
    if !require_method(req, res, Method::GET) {
        return;
    }

    let id = req.path_param("id").unwrap_or_default();
    reply_json(res, &json!({ "id": id, "query": req.query_params() }));
}

/// Handler para `GET /user/:id/:name`
pub fn get_user_by_name_handler(req: &Request, res: &mut Response) {
    if !require_method(req, res, Method::GET) {
        return;
    }

    reply_json(
        res,
        &json!({
            "id": req.path_param("id").unwrap_or_default(),
            "name": req.path_param("name").unwrap_or_default(),
            "query": req.query_params(),
        }),
    );
}
