//! HTTP route tests
//!
//! Drive the axum router in-process with `tower::ServiceExt::oneshot`.

use std::fs;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use event_registry::config::ServerConfig;
use event_registry::provider::MockProvider;
use event_registry::server::router;
use event_registry::{EventLog, EventRegistry, EventService, Notifier};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

// ============================================================================
// HELPERS
// ============================================================================

struct TestApp {
    router: Router,
    _dirs: TempDir,
}

fn server_config(dirs: &TempDir) -> ServerConfig {
    let views = dirs.path().join("views");
    let public = dirs.path().join("public");
    fs::create_dir_all(&views).unwrap();
    fs::create_dir_all(&public).unwrap();
    fs::write(views.join("index.html"), "<h1>Cadastro de Eventos</h1>").unwrap();
    fs::write(views.join("aprovacao.html"), "<h1>Aprovação</h1>").unwrap();
    fs::write(public.join("app.js"), "console.log('ok');").unwrap();

    ServerConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        public_dir: public,
        views_dir: views,
    }
}

fn app_with(service: EventService) -> TestApp {
    let dirs = TempDir::new().unwrap();
    let config = server_config(&dirs);
    TestApp {
        router: router(service, &config),
        _dirs: dirs,
    }
}

fn app() -> TestApp {
    app_with(EventService::offline())
}

fn app_with_provider(provider: MockProvider) -> TestApp {
    let log = EventLog::new();
    app_with(EventService::new(
        EventRegistry::new(),
        Notifier::disabled(log.clone()),
        Some(Arc::new(provider)),
        log,
    ))
}

fn submission(protocol: &str, name: &str) -> Value {
    json!({
        "cabecalho": { "protocolo": protocol, "dataRegistro": "2024-03-01", "statusPrazo": "No prazo" },
        "informacoesGerais": { "evento": name, "tipo": "Culto", "responsavel": "Ana" },
        "dataLocal": { "data": "2024-05-12" },
        "publico": { "objetivo": "Louvor" },
        "financeiro": { "pago": false },
        "observacoes": { "texto": "Levar instrumentos" }
    })
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, body.to_vec())
}

async fn send_json(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let (status, _, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

// ============================================================================
// SUBMIT / LOOKUP
// ============================================================================

#[tokio::test]
async fn submit_creates_then_replaces() {
    let app = app();

    let (status, body) = send_json(&app, post_json("/api/eventos", &submission("p1", "Retreat"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "created");
    assert_eq!(body["protocol"], "P1");
    assert_eq!(body["message"], "Salvo com sucesso!");

    let (status, body) =
        send_json(&app, post_json("/api/eventos", &submission("P1", "Retreat (updated)"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "replaced");
}

#[tokio::test]
async fn malformed_submission_is_client_error() {
    let app = app();
    let body = json!({ "cabecalho": { "protocolo": "P1" } });

    let (status, body) = send_json(&app, post_json("/api/eventos", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "malformed_submission");
    assert_eq!(body["code"], "EVT-001");
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/eventos")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send_json(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "malformed_submission");
}

#[tokio::test]
async fn lookup_returns_original_submission() {
    let app = app();
    let sent = submission("ibr-42", "Vigília");
    send_json(&app, post_json("/api/eventos", &sent)).await;

    let (status, body) = send_json(&app, get("/api/eventos/ibr-42")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, sent);
}

#[tokio::test]
async fn lookup_unknown_is_not_found() {
    let app = app();
    let (status, body) = send_json(&app, get("/api/eventos/P404")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");
}

// ============================================================================
// EXPORT
// ============================================================================

#[tokio::test]
async fn export_returns_xlsx_attachment() {
    let app = app();
    send_json(&app, post_json("/api/eventos", &submission("P1", "Retreat"))).await;

    let (status, headers, body) = send(&app, get("/api/exportar")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Relatorio_IBR.xlsx\""
    );
    assert_eq!(&body[..2], b"PK");
}

// ============================================================================
// AI ASSIST
// ============================================================================

#[tokio::test]
async fn ideas_without_key_is_unavailable() {
    let app = app();
    let (status, body) = send_json(
        &app,
        post_json("/api/ia/ideias", &json!({ "evento": "Retiro", "tipo": "Jovens" })),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["kind"], "assist_not_configured");
}

#[tokio::test]
async fn ideas_returns_parsed_suggestion() {
    let provider = MockProvider::with_responses(vec![
        "```json\n{\"objetivo\":\"Integrar\",\"temaVersiculo\":\"Jo 13:35\",\"descricao\":\"Fim de semana\"}\n```".into(),
    ]);
    let app = app_with_provider(provider);

    let (status, body) = send_json(
        &app,
        post_json("/api/ia/ideias", &json!({ "evento": "Retiro", "tipo": "Jovens" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "objetivo": "Integrar", "temaVersiculo": "Jo 13:35", "descricao": "Fim de semana" })
    );
}

#[tokio::test]
async fn social_failure_is_bad_gateway() {
    let app = app_with_provider(MockProvider::failing("quota exceeded"));
    let (status, body) = send_json(
        &app,
        post_json("/api/ia/social", &json!({ "evento": "Culto", "data": "2024-05-12", "objetivo": "Louvor" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "collaborator_failure");
}

#[tokio::test]
async fn assist_bad_body_uses_error_shape() {
    let app = app_with_provider(MockProvider::new());

    for uri in ["/api/ia/ideias", "/api/ia/social"] {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"evento\": "))
            .unwrap();

        let (status, body) = send_json(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["kind"], "malformed_submission");
        assert_eq!(body["code"], "EVT-001");
    }

    let request = Request::builder()
        .method("POST")
        .uri("/api/ia/social")
        .body(Body::from("evento=Culto"))
        .unwrap();
    let (status, body) = send_json(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("EVT-001"));
}

#[tokio::test]
async fn social_returns_caption() {
    let app = app_with_provider(MockProvider::new().with_default("  Venha! 🙌  "));
    let (status, body) = send_json(
        &app,
        post_json("/api/ia/social", &json!({ "evento": "Culto", "data": "2024-05-12", "objetivo": "Louvor" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "texto": "Venha! 🙌" }));
}

// ============================================================================
// STATIC
// ============================================================================

#[tokio::test]
async fn serves_views_and_public_files() {
    let app = app();

    let (status, _, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("Cadastro de Eventos"));

    let (status, _, _) = send(&app, get("/aprovacao")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, body) = send(&app, get("/app.js")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"console.log('ok');");
}
