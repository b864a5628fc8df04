//! # Query strings
//! src/router/query.rs
//!
//! El query string solo puede venir en el último segmento del path:
//! `/user/42?x=1&y=2` → segmento final `42?x=1&y=2`.

use std::collections::HashMap;

/// Separa `"42?x=1"` en `("42", Some("x=1"))`.
pub fn split_query(segment: &str) -> (&str, Option<&str>) {
    match segment.split_once('?') {
        Some((value, query)) => (value, Some(query)),
        None => (segment, None),
    }
}

/// Parsea una query string en un HashMap
///
/// Ejemplo: `"num=10&text=hola%20mundo&debug"`
/// Retorna: `{"num": "10", "text": "hola mundo"}` (`debug` no tiene `=` y se descarta)
pub fn parse_query_string(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        params.insert(decode(key), decode(value));
    }

    params
}

/// Percent-decoding con `+` como espacio
fn decode(s: &str) -> String {
    let s = s.replace('+', " ");
    match urlencoding::decode(&s) {
        Ok(decoded) => decoded.into_owned(),
        // bytes que no forman UTF-8: se reemplazan en vez de perder el parámetro
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(s.as_bytes())).into_owned(),
    }
}
