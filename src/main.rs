//src/main.rs

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tokio::net::TcpListener;

// Declaração dos nossos módulos
mod common;
mod config;
mod docs;
mod handlers;
mod models;
mod services;
mod store;

use crate::config::AppState;

fn build_router(app_state: AppState) -> Router {
    // Configuração: produtos e templates de roteamento
    let settings_routes = Router::new()
        .route(
            "/products",
            post(handlers::catalog::create_product).get(handlers::catalog::list_products),
        )
        .route(
            "/products/{name}",
            put(handlers::catalog::rename_product).delete(handlers::catalog::delete_product),
        )
        .route(
            "/products/{name}/steps",
            post(handlers::catalog::add_routing_step),
        )
        .route(
            "/products/{name}/steps/{index}",
            put(handlers::catalog::rename_routing_step)
                .delete(handlers::catalog::delete_routing_step),
        );

    // Configuração: hierarquia fábrica → sala
    let factory_routes = Router::new()
        .route(
            "/",
            post(handlers::catalog::create_factory).get(handlers::catalog::list_factories),
        )
        .route(
            "/{name}",
            put(handlers::catalog::rename_factory).delete(handlers::catalog::delete_factory),
        )
        .route("/{name}/rooms", post(handlers::catalog::create_room))
        .route(
            "/{name}/rooms/{room}",
            put(handlers::catalog::rename_room).delete(handlers::catalog::delete_room),
        );

    let inventory_routes = Router::new()
        .route("/stock-entry", post(handlers::inventory::add_stock))
        .route("/extract", post(handlers::inventory::extract_batch));

    let batch_routes = Router::new()
        .route("/names", get(handlers::history::list_batch_names))
        .route("/{id}/start", post(handlers::batches::start_step))
        .route("/{id}/finish", post(handlers::batches::finish_step))
        .route("/{id}/revert", post(handlers::batches::revert_step))
        .route("/{id}/archive", post(handlers::batches::archive_batch))
        .route("/{id}/steps", post(handlers::batches::insert_custom_step))
        .route(
            "/{id}/steps/{index}",
            delete(handlers::batches::delete_batch_step),
        )
        .route("/{id}/name", put(handlers::batches::rename_batch))
        .route("/{id}/quantity", put(handlers::batches::set_quantity))
        .route("/{id}/relocate", post(handlers::batches::relocate_batch));

    let location_routes = Router::new()
        .route("/sub-zones", post(handlers::catalog::create_sub_zone))
        .route(
            "/{factory}/{room}",
            get(handlers::history::location_snapshot),
        );

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/settings", settings_routes)
        .nest("/api/factories", factory_routes)
        .nest("/api/inventory", inventory_routes)
        .nest("/api/batches", batch_routes)
        .nest("/api/locations", location_routes)
        .route("/api/history", get(handlers::history::query_history))
        .route(
            "/api/dashboard/feed",
            get(handlers::dashboard::dashboard_feed),
        )
        .route(
            "/api/backup",
            get(handlers::backup::export_backup).post(handlers::backup::import_backup),
        )
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        .with_state(app_state)
}

#[tokio::main]
async fn main() {
    // Inicializa o logger.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new().expect("Falha ao inicializar o estado da aplicação.");

    let app = build_router(app_state);

    // Inicia o servidor
    let addr = AppState::server_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn test_app() -> Router {
        build_router(AppState::new().unwrap())
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    // Planta Sul/Sala 1/Zona A com produto Steel (Cut, Weld) e 1000 em estoque.
    async fn seeded_app() -> Router {
        let app = test_app();
        for (method, uri, body) in [
            ("POST", "/api/settings/products", json!({"name": "Steel"})),
            (
                "POST",
                "/api/settings/products/Steel/steps",
                json!({"description": "Cut"}),
            ),
            (
                "POST",
                "/api/settings/products/Steel/steps",
                json!({"description": "Weld"}),
            ),
            ("POST", "/api/factories", json!({"name": "Planta Sul"})),
            (
                "POST",
                "/api/factories/Planta%20Sul/rooms",
                json!({"name": "Sala 1"}),
            ),
            (
                "POST",
                "/api/locations/sub-zones",
                json!({"factory": "Planta Sul", "room": "Sala 1", "name": "Zona A"}),
            ),
            (
                "POST",
                "/api/inventory/stock-entry",
                json!({
                    "factory": "Planta Sul",
                    "room": "Sala 1",
                    "subZone": "Zona A",
                    "productType": "Steel",
                    "quantity": 1000
                }),
            ),
        ] {
            let (status, body_out) = send(&app, method, uri, Some(body)).await;
            assert!(
                status.is_success(),
                "seed {method} {uri} falhou: {status} {body_out}"
            );
        }
        app
    }

    async fn extract(app: &Router, name: &str, quantity: i64) -> Value {
        let (status, body) = send(
            app,
            "POST",
            "/api/inventory/extract",
            Some(json!({
                "factory": "Planta Sul",
                "room": "Sala 1",
                "subZone": "Zona A",
                "productType": "Steel",
                "name": name,
                "quantity": quantity
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }

    #[tokio::test]
    async fn health_check_responds() {
        let app = test_app();
        let (status, _) = send(&app, "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn full_batch_lifecycle_over_http() {
        let app = seeded_app().await;

        let batch = extract(&app, "Batch 1", 300).await;
        assert_eq!(batch["stepIndex"], json!(0));
        assert_eq!(batch["isProcessing"], json!(false));
        let id = batch["id"].as_str().unwrap().to_string();

        // O estoque caiu para 700.
        let (status, snapshot) = send(&app, "GET", "/api/locations/Planta%20Sul/Sala%201", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(snapshot["data"]["Zona A"]["stock"]["Steel"], json!(700.0));

        // Start → Finish na primeira etapa.
        let (status, started) =
            send(&app, "POST", &format!("/api/batches/{id}/start"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(started["isProcessing"], json!(true));

        let (_, finished) = send(&app, "POST", &format!("/api/batches/{id}/finish"), None).await;
        assert_eq!(finished["stepIndex"], json!(1));
        assert_eq!(finished["isProcessing"], json!(false));
        assert_eq!(finished["timeline"].as_array().unwrap().len(), 3);

        // Arquivar antes da hora é rejeitado.
        let (status, _) = send(&app, "POST", &format!("/api/batches/{id}/archive"), None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        // Conclui a última etapa e arquiva.
        send(&app, "POST", &format!("/api/batches/{id}/start"), None).await;
        send(&app, "POST", &format!("/api/batches/{id}/finish"), None).await;
        let (status, archived) =
            send(&app, "POST", &format!("/api/batches/{id}/archive"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(archived["dateCompleted"].as_str().is_some());
        assert_eq!(archived["entryType"], Value::Null); // fotografia crua, sem tag

        // Sumiu dos ativos e virou exatamente uma entrada de histórico.
        let (_, snapshot) = send(&app, "GET", "/api/locations/Planta%20Sul/Sala%201", None).await;
        assert_eq!(
            snapshot["data"]["Zona A"]["active"].as_array().unwrap().len(),
            0
        );
        let history = snapshot["data"]["Zona A"]["history"].as_array().unwrap();
        let batch_entries: Vec<&Value> = history
            .iter()
            .filter(|h| h["entryType"] == json!("Batch"))
            .collect();
        assert_eq!(batch_entries.len(), 1);
    }

    #[tokio::test]
    async fn insufficient_stock_is_rejected_over_http() {
        let app = seeded_app().await;
        extract(&app, "Batch 1", 300).await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/inventory/extract",
            Some(json!({
                "factory": "Planta Sul",
                "room": "Sala 1",
                "subZone": "Zona A",
                "productType": "Steel",
                "name": "Batch 2",
                "quantity": 1200
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("700"));

        let (_, snapshot) = send(&app, "GET", "/api/locations/Planta%20Sul/Sala%201", None).await;
        assert_eq!(snapshot["data"]["Zona A"]["stock"]["Steel"], json!(700.0));
    }

    #[tokio::test]
    async fn duplicate_names_return_conflict() {
        let app = seeded_app().await;
        extract(&app, "Batch 1", 10).await;
        let second = extract(&app, "Batch 2", 10).await;
        let id = second["id"].as_str().unwrap();

        let (status, _) = send(
            &app,
            "POST",
            "/api/inventory/extract",
            Some(json!({
                "factory": "Planta Sul",
                "room": "Sala 1",
                "subZone": "Zona A",
                "productType": "Steel",
                "name": "Batch 1",
                "quantity": 10
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(
            &app,
            "PUT",
            &format!("/api/batches/{id}/name"),
            Some(json!({"name": "Batch 1"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, names) = send(&app, "GET", "/api/batches/names", None).await;
        assert_eq!(names, json!(["Batch 1", "Batch 2"]));
    }

    #[tokio::test]
    async fn relocation_moves_the_batch_between_locations() {
        let app = seeded_app().await;
        send(
            &app,
            "POST",
            "/api/factories",
            Some(json!({"name": "Planta Norte"})),
        )
        .await;
        send(
            &app,
            "POST",
            "/api/factories/Planta%20Norte/rooms",
            Some(json!({"name": "Sala 9"})),
        )
        .await;

        let batch = extract(&app, "Batch 1", 50).await;
        let id = batch["id"].as_str().unwrap();

        let (status, moved) = send(
            &app,
            "POST",
            &format!("/api/batches/{id}/relocate"),
            Some(json!({
                "toFactory": "Planta Norte",
                "toRoom": "Sala 9",
                "toSubZone": "Recebimento"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(moved["quantity"], json!(50.0));

        let (_, origin) = send(&app, "GET", "/api/locations/Planta%20Sul/Sala%201", None).await;
        assert_eq!(
            origin["data"]["Zona A"]["active"].as_array().unwrap().len(),
            0
        );
        let (_, destination) =
            send(&app, "GET", "/api/locations/Planta%20Norte/Sala%209", None).await;
        let active = destination["data"]["Recebimento"]["active"].as_array().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0]["id"], batch["id"]);

        // Destino desconhecido é rejeitado.
        let (status, _) = send(
            &app,
            "POST",
            &format!("/api/batches/{id}/relocate"),
            Some(json!({
                "toFactory": "Fantasma",
                "toRoom": "Sala 1",
                "toSubZone": "Zona A"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn backup_round_trips_losslessly() {
        let app = seeded_app().await;
        let batch = extract(&app, "Batch 1", 300).await;
        let id = batch["id"].as_str().unwrap();
        send(&app, "POST", &format!("/api/batches/{id}/start"), None).await;

        let (status, exported) = send(&app, "GET", "/api/backup", None).await;
        assert_eq!(status, StatusCode::OK);

        // Restaura em um processo "novo" e exporta de novo: mesmo documento.
        let fresh = test_app();
        let (status, _) = send(&fresh, "POST", "/api/backup", Some(exported.clone())).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, re_exported) = send(&fresh, "GET", "/api/backup", None).await;
        assert_eq!(exported, re_exported);

        // E o lote restaurado continua operável.
        let (status, finished) =
            send(&fresh, "POST", &format!("/api/batches/{id}/finish"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(finished["stepIndex"], json!(1));
    }

    #[tokio::test]
    async fn dashboard_and_history_read_across_locations() {
        let app = seeded_app().await;
        let batch = extract(&app, "Batch 1", 300).await;
        let id = batch["id"].as_str().unwrap();
        send(&app, "POST", &format!("/api/batches/{id}/start"), None).await;

        let (status, feed) = send(&app, "GET", "/api/dashboard/feed", None).await;
        assert_eq!(status, StatusCode::OK);
        let entries = feed.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["status"], json!("InProcess"));
        assert_eq!(entries[0]["factory"], json!("Planta Sul"));
        // Linha do tempo do mais novo para o mais antigo.
        assert_eq!(
            entries[0]["timeline"][0]["description"],
            json!("Started: Cut")
        );

        let (status, report) = send(&app, "GET", "/api/history", None).await;
        assert_eq!(status, StatusCode::OK);
        let logs = report["stockLogs"].as_array().unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0]["action"], json!("Added to Stock"));

        // Período futuro não devolve nada.
        let (_, filtered) = send(
            &app,
            "GET",
            "/api/history?startDate=2099-01-01",
            None,
        )
        .await;
        assert!(filtered["stockLogs"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn validation_errors_return_bad_request() {
        let app = seeded_app().await;
        let (status, body) = send(
            &app,
            "POST",
            "/api/inventory/stock-entry",
            Some(json!({
                "factory": "Planta Sul",
                "room": "Sala 1",
                "subZone": "Zona A",
                "productType": "Steel",
                "quantity": -5
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["details"]["quantity"].is_array());
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = test_app();
        let (status, doc) = send(&app, "GET", "/api-docs/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(doc["paths"]["/api/inventory/extract"].is_object());
    }
}
