use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use super::venn::VENN_PATH;
use crate::http;

pub const STATUS_PATH: &str = "/";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ServiceStatus {
    pub status: &'static str,
    pub endpoint: &'static str,
    pub method: &'static str,
}

pub const SERVICE_STATUS: ServiceStatus = ServiceStatus {
    status: "Servicio activo",
    endpoint: VENN_PATH,
    method: "POST",
};

pub fn handle_status(is_head: bool) -> Response<Full<Bytes>> {
    http::build_json_response(StatusCode::OK, &SERVICE_STATUS, is_head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_payload() {
        let json = serde_json::to_string(&SERVICE_STATUS).unwrap();
        assert_eq!(
            json,
            r#"{"status":"Servicio activo","endpoint":"/stakeholder-venn","method":"POST"}"#
        );
    }
}
