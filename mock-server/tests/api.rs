use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::app;
use serde_json::{json, Value};
use tower::{Service, ServiceExt};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

/// Send one request through a shared router so state carries over.
async fn call(app: &mut axum::routing::RouterIntoService<String>, req: Request<String>) -> axum::response::Response {
    ServiceExt::ready(app).await.unwrap().call(req).await.unwrap()
}

fn service() -> axum::routing::RouterIntoService<String> {
    let router: Router = app();
    router.into_service()
}

// --- cluster ---

#[tokio::test]
async fn cluster_health_is_green() {
    let resp = app()
        .oneshot(request("GET", "/_cluster/health", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let health = body_json(resp).await;
    assert_eq!(health["status"], "green");
    assert_eq!(health["cluster_name"], "mock-cluster");
    assert_eq!(health["number_of_nodes"], 1);
}

// --- indices ---

#[tokio::test]
async fn create_index_twice_conflicts() {
    let mut app = service();
    let resp = call(&mut app, request("PUT", "/twitter", r#"{"settings":{"number_of_shards":1}}"#)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created = body_json(resp).await;
    assert_eq!(created, json!({"acknowledged": true, "shards_acknowledged": true, "index": "twitter"}));

    let resp = call(&mut app, request("PUT", "/twitter", "")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err = body_json(resp).await;
    assert_eq!(err["error"]["type"], "resource_already_exists_exception");
    assert_eq!(err["status"], 400);
}

#[tokio::test]
async fn index_exists_and_delete() {
    let mut app = service();
    let resp = call(&mut app, request("HEAD", "/logs", "")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    call(&mut app, request("PUT", "/logs", "")).await;
    let resp = call(&mut app, request("HEAD", "/logs", "")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_bytes(resp).await.is_empty());

    let resp = call(&mut app, request("DELETE", "/logs", "")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"acknowledged": true}));

    let resp = call(&mut app, request("DELETE", "/logs", "")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let err = body_json(resp).await;
    assert_eq!(err["error"]["type"], "index_not_found_exception");
    assert_eq!(err["error"]["index"], "logs");
}

#[tokio::test]
async fn refresh_missing_index_is_404() {
    let resp = app()
        .oneshot(request("POST", "/nope/_refresh", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- documents ---

#[tokio::test]
async fn document_lifecycle() {
    let mut app = service();

    let resp = call(&mut app, request("PUT", "/t/_doc/1", r#"{"user":"kimchy"}"#)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let indexed = body_json(resp).await;
    assert_eq!(indexed["result"], "created");
    assert_eq!(indexed["_version"], 1);

    let resp = call(&mut app, request("PUT", "/t/_doc/1", r#"{"user":"sandrae"}"#)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["_version"], 2);

    let resp = call(&mut app, request("GET", "/t/_doc/1", "")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let doc = body_json(resp).await;
    assert_eq!(doc["found"], true);
    assert_eq!(doc["_source"], json!({"user": "sandrae"}));

    let resp = call(&mut app, request("HEAD", "/t/_doc/1", "")).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = call(&mut app, request("DELETE", "/t/_doc/1", "")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["result"], "deleted");

    let resp = call(&mut app, request("GET", "/t/_doc/1", "")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await, json!({"_index": "t", "_id": "1", "found": false}));

    let resp = call(&mut app, request("DELETE", "/t/_doc/1", "")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["result"], "not_found");
}

#[tokio::test]
async fn auto_id_and_create_conflict() {
    let mut app = service();
    let resp = call(&mut app, request("POST", "/t/_doc", r#"{"n":1}"#)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let id = body_json(resp).await["_id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    let resp = call(&mut app, request("PUT", &format!("/t/_doc/{id}?op_type=create"), r#"{"n":2}"#)).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(resp).await["error"]["type"], "version_conflict_engine_exception");
}

#[tokio::test]
async fn get_from_missing_index_is_error_body() {
    let resp = app()
        .oneshot(request("GET", "/missing/_doc/1", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["error"]["type"], "index_not_found_exception");
}

#[tokio::test]
async fn non_object_source_is_rejected() {
    let resp = app()
        .oneshot(request("PUT", "/t/_doc/1", "[1,2]"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"]["type"], "mapper_parsing_exception");
}

// --- bulk ---

#[tokio::test]
async fn bulk_applies_each_action() {
    let mut app = service();
    call(&mut app, request("PUT", "/t/_doc/2", r#"{"n":2}"#)).await;
    let body = concat!(
        "{\"index\":{\"_index\":\"t\",\"_id\":\"1\"}}\n",
        "{\"n\":1}\n",
        "{\"update\":{\"_index\":\"t\",\"_id\":\"2\"}}\n",
        "{\"doc\":{\"m\":true}}\n",
        "{\"create\":{\"_index\":\"t\",\"_id\":\"1\"}}\n",
        "{\"n\":3}\n",
        "{\"delete\":{\"_index\":\"t\",\"_id\":\"9\"}}\n",
    );
    let resp = call(&mut app, request("POST", "/_bulk", body)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let res = body_json(resp).await;
    assert_eq!(res["errors"], true);
    let items = res["items"].as_array().unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(items[0]["index"]["status"], 201);
    assert_eq!(items[1]["update"]["result"], "updated");
    assert_eq!(items[2]["create"]["status"], 409);
    assert_eq!(items[2]["create"]["error"]["type"], "version_conflict_engine_exception");
    assert_eq!(items[3]["delete"]["status"], 404);
    assert!(items[3]["delete"].get("error").is_none());

    let resp = call(&mut app, request("GET", "/t/_doc/2", "")).await;
    assert_eq!(body_json(resp).await["_source"], json!({"n": 2, "m": true}));
}

#[tokio::test]
async fn bulk_uses_path_index_as_default() {
    let mut app = service();
    let body = "{\"index\":{\"_id\":\"a\"}}\n{\"x\":1}\n";
    let resp = call(&mut app, request("POST", "/books/_bulk", body)).await;
    let res = body_json(resp).await;
    assert_eq!(res["errors"], false);
    assert_eq!(res["items"][0]["index"]["_index"], "books");
}

#[tokio::test]
async fn bulk_without_source_line_is_rejected() {
    let resp = app()
        .oneshot(request("POST", "/_bulk", "{\"index\":{\"_index\":\"t\"}}\n"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- search ---

async fn seed(app: &mut axum::routing::RouterIntoService<String>, count: usize) {
    let mut body = String::new();
    for i in 0..count {
        body.push_str(&format!("{{\"index\":{{\"_index\":\"s\",\"_id\":\"{i:02}\"}}}}\n{{\"i\":{i}}}\n"));
    }
    let resp = call(app, request("POST", "/_bulk", &body)).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn search_pages_with_from_and_size() {
    let mut app = service();
    seed(&mut app, 5).await;
    let resp = call(
        &mut app,
        request("POST", "/s/_search", r#"{"query":{"match_all":{}},"from":1,"size":2}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let res = body_json(resp).await;
    assert_eq!(res["hits"]["total"], json!({"value": 5, "relation": "eq"}));
    let hits = res["hits"]["hits"].as_array().unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0]["_id"], "01");
    assert_eq!(hits[1]["_source"], json!({"i": 2}));
    assert!(res.get("_scroll_id").is_none());
}

#[tokio::test]
async fn search_rejects_other_queries() {
    let mut app = service();
    seed(&mut app, 1).await;
    let resp = call(&mut app, request("POST", "/s/_search", r#"{"query":{"term":{"i":0}}}"#)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"]["type"], "parsing_exception");
}

#[tokio::test]
async fn scroll_walks_all_hits_then_clears() {
    let mut app = service();
    seed(&mut app, 5).await;

    let resp = call(&mut app, request("POST", "/s/_search?scroll=1m&size=2", r#"{"sort":["_doc"]}"#)).await;
    let first = body_json(resp).await;
    let scroll_id = first["_scroll_id"].as_str().unwrap().to_string();
    let mut seen = first["hits"]["hits"].as_array().unwrap().len();

    loop {
        let body = json!({"scroll": "1m", "scroll_id": scroll_id}).to_string();
        let resp = call(&mut app, request("POST", "/_search/scroll", &body)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let page = body_json(resp).await;
        let hits = page["hits"]["hits"].as_array().unwrap().len();
        if hits == 0 {
            break;
        }
        seen += hits;
    }
    assert_eq!(seen, 5);

    let body = json!({"scroll_id": [scroll_id]}).to_string();
    let resp = call(&mut app, request("DELETE", "/_search/scroll", &body)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"succeeded": true, "num_freed": 1}));

    let body = json!({"scroll": "1m", "scroll_id": scroll_id}).to_string();
    let resp = call(&mut app, request("POST", "/_search/scroll", &body)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["error"]["type"], "search_context_missing_exception");
}

// --- cat ---

#[tokio::test]
async fn cat_indices_lists_counts_and_honors_columns() {
    let mut app = service();
    seed(&mut app, 3).await;
    call(&mut app, request("PUT", "/empty", "")).await;

    let resp = call(&mut app, request("GET", "/_cat/indices?format=json", "")).await;
    let rows = body_json(resp).await;
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["index"], "empty");
    assert_eq!(rows[1]["index"], "s");
    assert_eq!(rows[1]["docs.count"], "3");

    let resp = call(&mut app, request("GET", "/_cat/indices?format=json&h=index,docs.count", "")).await;
    let rows = body_json(resp).await;
    assert_eq!(rows[1], json!({"index": "s", "docs.count": "3"}));
}
