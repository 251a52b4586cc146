#![deny(missing_docs)]

//! # Mock Server
//!
//! Registers one Actix route per operation in the document and answers each
//! request with a mocked status and body.
//!
//! The loaded document lives in shared, read-only state. Requests never
//! write to it, so workers serve the same operation concurrently without locks.

use crate::config::Config;
use crate::error::{CliError, CliResult};
use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::{header, Method as HttpMethod, StatusCode};
use actix_web::middleware::{from_fn, DefaultHeaders, Next};
use actix_web::{web, App, Error, HttpRequest, HttpResponse, HttpServer};
use log::{debug, error, info, warn};
use mockery_core::{
    mock_reply, parse_status_header, Document, Method, Operation, RESPONSE_CODE_HEADER,
};
use rustls::crypto::ring;
use rustls::version::{TLS12, TLS13};
use rustls::ServerConfig;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

/// Header carrying the API key when authentication is enabled.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Shared, read-only state for all workers.
pub struct MockState {
    document: Document,
    content_type: String,
    api_key: Option<String>,
}

impl MockState {
    /// Creates the state for `document`.
    pub fn new(
        document: Document,
        content_type: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            document,
            content_type: content_type.into(),
            api_key,
        }
    }

    /// Creates the state from parsed configuration.
    pub fn from_config(document: Document, config: &Config) -> Self {
        Self::new(
            document,
            config.content_type.clone(),
            config.api_key().map(str::to_string),
        )
    }

    fn operation(&self, key: &RouteKey) -> Option<&Operation> {
        self.document
            .paths
            .items
            .get(&key.path)
            .and_then(|item| item.operation(key.method))
    }

    fn banner(&self) -> String {
        format!("{} v{}", self.document.title(), self.document.version())
    }
}

/// Identifies the operation a registered route serves.
#[derive(Debug, Clone)]
struct RouteKey {
    method: Method,
    path: String,
}

fn http_method(method: Method) -> HttpMethod {
    match method {
        Method::Get => HttpMethod::GET,
        Method::Post => HttpMethod::POST,
        Method::Put => HttpMethod::PUT,
        Method::Delete => HttpMethod::DELETE,
        Method::Patch => HttpMethod::PATCH,
    }
}

/// Builds the Actix application: mocked routes, index, 404 fallback and middleware.
pub fn build_app(
    state: web::Data<MockState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    // Header values must be visible ASCII.
    let server_header: String = format!("Mockery: {}", state.banner())
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .collect();
    let base_path = state.document.normalized_base_path();

    let mut app = App::new().app_data(state.clone());
    for route in state.document.routes() {
        let key = RouteKey {
            method: route.method,
            path: route.path.to_string(),
        };
        app = app.route(
            &route.full_path(&base_path),
            web::method(http_method(route.method)).to(
                move |req: HttpRequest, state: web::Data<MockState>| {
                    let key = key.clone();
                    async move { mock_response(&req, &state, &key) }
                },
            ),
        );
    }

    app.route("/", web::get().to(index))
        .default_service(web::to(not_found))
        .wrap(from_fn(require_api_key))
        .wrap(DefaultHeaders::new().add((header::SERVER, server_header)))
        .wrap(Cors::permissive())
}

/// Banner printed once when the binary starts.
pub fn startup_banner() -> String {
    format!(
        "mockery v{}\nMock HTTP server for OpenAPI v2 documents",
        env!("CARGO_PKG_VERSION")
    )
}

/// Runs the server until it is stopped.
pub async fn run(config: &Config, document: Document) -> CliResult<()> {
    let base_path = document.normalized_base_path();
    for route in document.routes() {
        info!(
            "Adding {} route {}",
            route.method,
            route.full_path(&base_path)
        );
        debug!(
            "   Creating handler id={} title={}",
            route.operation.operation_id.as_deref().unwrap_or("-"),
            route.operation.description
        );
    }

    let state = web::Data::new(MockState::from_config(document, config));
    warn!("Starting Mockery for {}", state.banner());

    let tls = match config.tls_files() {
        Some((cert, key)) => Some(load_tls_config(&cert, &key)?),
        None => None,
    };
    let use_tls = tls.is_some();

    let server = HttpServer::new(move || build_app(state.clone()));
    let addr = (config.host.as_str(), config.port);
    let server = match tls {
        Some(tls) => server.bind_rustls_0_23(addr, tls)?,
        None => server.bind(addr)?,
    };

    warn!(
        "Mockery server started on {}:{} (tls: {}, api key: {})",
        config.host,
        config.port,
        use_tls,
        config.api_key().is_some()
    );

    server.run().await?;
    Ok(())
}

/// Loads a PEM certificate chain and private key into a TLS 1.2+ server config.
pub fn load_tls_config(cert_path: &Path, key_path: &Path) -> CliResult<ServerConfig> {
    let certs = rustls_pemfile::certs(&mut BufReader::new(File::open(cert_path)?))
        .collect::<Result<Vec<_>, _>>()?;
    let key = rustls_pemfile::private_key(&mut BufReader::new(File::open(key_path)?))?
        .ok_or_else(|| CliError::MissingKey(key_path.to_path_buf()))?;

    let config = ServerConfig::builder_with_provider(Arc::new(ring::default_provider()))
        .with_protocol_versions(&[&TLS12, &TLS13])?
        .with_no_client_auth()
        .with_single_cert(certs, key)?;
    Ok(config)
}

fn mock_response(req: &HttpRequest, state: &MockState, key: &RouteKey) -> HttpResponse {
    let Some(operation) = state.operation(key) else {
        return HttpResponse::NotFound().finish();
    };

    info!(
        "Request {} {} id={}",
        req.method(),
        req.path(),
        operation.operation_id.as_deref().unwrap_or("-")
    );

    let requested = req
        .headers()
        .get(RESPONSE_CODE_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| {
            info!("Requested response code {}", raw);
            parse_status_header(raw)
        });

    let reply = mock_reply(
        operation,
        requested,
        &state.content_type,
        &state.document.registry(),
    );

    let status = StatusCode::from_u16(reply.status).unwrap_or_else(|_| {
        warn!("Status {} is not a valid HTTP status, using 200", reply.status);
        StatusCode::OK
    });

    match reply.body {
        Some(body) => HttpResponse::build(status)
            .content_type(state.content_type.as_str())
            .body(body.to_string()),
        None => HttpResponse::build(status).finish(),
    }
}

async fn index(state: web::Data<MockState>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(format!("Mockery - {}\n", state.banner()))
}

async fn not_found(req: HttpRequest) -> HttpResponse {
    error!("Not found: {}", req.path());
    HttpResponse::NotFound().finish()
}

/// Rejects requests without the configured API key. A no-op when none is configured.
async fn require_api_key(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    if let Some(reason) = api_key_rejection(&req) {
        error!("{}", reason);
        let res = HttpResponse::Unauthorized().finish();
        return Ok(req.into_response(res).map_into_right_body());
    }

    Ok(next.call(req).await?.map_into_left_body())
}

fn api_key_rejection(req: &ServiceRequest) -> Option<&'static str> {
    let expected = req
        .app_data::<web::Data<MockState>>()
        .and_then(|state| state.api_key.as_deref())?;

    match req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
    {
        None | Some("") => Some("Not authorised, missing API key"),
        Some(provided) if provided != expected => Some("Invalid API key"),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;
    use mockery_core::{parse_document_str, DocumentFormat};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    const PETSTORE: &str = r#"
swagger: "2.0"
info:
  title: Petstore
  version: "1.0.0"
basePath: /api/
paths:
  /pets:
    get:
      operationId: listPets
      responses:
        '200':
          description: OK
          schema:
            type: array
            items:
              $ref: '#/definitions/Pet'
        '404':
          description: Not found
          examples:
            application/json:
              error: no pets
    post:
      operationId: createPet
      responses:
        '201':
          description: Created
  /pets/{petId}:
    get:
      operationId: getPet
      responses:
        '200':
          description: OK
          schema:
            $ref: '#/definitions/Pet'
definitions:
  Pet:
    type: object
    properties:
      id:
        type: integer
        example: 7
      name:
        type: string
"#;

    fn state(api_key: Option<&str>) -> web::Data<MockState> {
        let document = parse_document_str(PETSTORE, DocumentFormat::Yaml).unwrap();
        web::Data::new(MockState::new(
            document,
            "application/json",
            api_key.map(str::to_string),
        ))
    }

    #[actix_web::test]
    async fn test_mocked_list_route() {
        let app = test::init_service(build_app(state(None))).await;
        let req = test::TestRequest::get().uri("/api/pets").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(
            resp.headers().get(header::SERVER).unwrap(),
            "Mockery: Petstore v1.0.0"
        );

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!([{ "id": 7, "name": "string" }]));
    }

    #[actix_web::test]
    async fn test_requested_response_code() {
        let app = test::init_service(build_app(state(None))).await;
        let req = test::TestRequest::get()
            .uri("/api/pets")
            .insert_header((RESPONSE_CODE_HEADER, "404"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "no pets" }));
    }

    #[actix_web::test]
    async fn test_fallback_without_example_is_empty() {
        let app = test::init_service(build_app(state(None))).await;
        let req = test::TestRequest::post().uri("/api/pets").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = test::read_body(resp).await;
        assert!(body.is_empty());
    }

    #[actix_web::test]
    async fn test_path_parameter_route() {
        let app = test::init_service(build_app(state(None))).await;
        let req = test::TestRequest::get().uri("/api/pets/42").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "id": 7, "name": "string" }));
    }

    #[actix_web::test]
    async fn test_index_and_not_found() {
        let app = test::init_service(build_app(state(None))).await;

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body = test::read_body(resp).await;
        assert_eq!(std::str::from_utf8(&body).unwrap(), "Mockery - Petstore v1.0.0\n");

        let req = test::TestRequest::get().uri("/api/unknown").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[::std::prelude::v1::test]
    fn test_startup_banner() {
        let banner = startup_banner();
        assert!(banner.starts_with("mockery v"));
        assert!(banner.contains(env!("CARGO_PKG_VERSION")));
    }

    #[::std::prelude::v1::test]
    fn test_tls_config_rejects_bad_pem() {
        let dir = tempfile::tempdir().unwrap();
        let cert = dir.path().join("cert.pem");
        let key = dir.path().join("key.pem");
        std::fs::write(&cert, "not a certificate").unwrap();
        std::fs::write(&key, "not a key").unwrap();

        let err = load_tls_config(&cert, &key).unwrap_err();
        assert!(matches!(err, CliError::MissingKey(path) if path == key));

        let err = load_tls_config(&dir.path().join("absent.pem"), &key).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }

    #[actix_web::test]
    async fn test_api_key_enforced() {
        let app = test::init_service(build_app(state(Some("secret")))).await;

        let req = test::TestRequest::get().uri("/api/pets").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/api/pets")
            .insert_header((API_KEY_HEADER, "wrong"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/api/pets")
            .insert_header((API_KEY_HEADER, "secret"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
