//! In-memory stand-in for the search engine's REST API.
//!
//! Covers the endpoints the client integration tests exercise: cluster
//! health, index create/delete/exists/refresh, document CRUD, bulk, and
//! `match_all` search with paging and scrolling. Documents are searchable as
//! soon as they are written. Error replies use the engine's
//! `{"error": {...}, "status": N}` shape.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const CLUSTER_NAME: &str = "mock-cluster";

#[derive(Clone, Debug, PartialEq)]
pub struct StoredDoc {
    pub source: Value,
    pub version: i64,
    pub seq_no: i64,
}

#[derive(Clone, Debug, Default)]
pub struct IndexState {
    pub uuid: String,
    pub settings: Value,
    pub mappings: Value,
    pub docs: BTreeMap<String, StoredDoc>,
    pub deleted: i64,
    next_seq_no: i64,
}

impl IndexState {
    fn new() -> Self {
        Self {
            uuid: Uuid::new_v4().simple().to_string(),
            ..Self::default()
        }
    }

    fn bump_seq_no(&mut self) -> i64 {
        let seq_no = self.next_seq_no;
        self.next_seq_no += 1;
        seq_no
    }
}

/// Remaining hits of an open scroll.
#[derive(Clone, Debug)]
struct ScrollCursor {
    hits: Vec<Value>,
    position: usize,
    size: usize,
}

#[derive(Debug, Default)]
pub struct Store {
    pub indices: BTreeMap<String, IndexState>,
    scrolls: HashMap<String, ScrollCursor>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/_cluster/health", get(cluster_health))
        .route("/_cat/indices", get(cat_indices))
        .route("/_bulk", post(bulk))
        .route("/_search", post(search_all))
        .route("/_search/scroll", post(scroll_next).delete(scroll_clear))
        .route("/{index}", put(create_index).delete(delete_index).head(index_exists))
        .route("/{index}/_refresh", post(refresh))
        .route("/{index}/_bulk", post(bulk_into))
        .route("/{index}/_search", post(search))
        .route("/{index}/_doc", post(index_auto_id))
        .route(
            "/{index}/_doc/{id}",
            put(index_doc).get(get_doc).delete(delete_doc).head(doc_exists),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock search engine listening");
    }
    axum::serve(listener, app()).await
}

type Params = Query<HashMap<String, String>>;

fn error_reply(status: StatusCode, kind: &str, reason: impl Into<String>, index: Option<&str>) -> Response {
    let reason = reason.into();
    let mut cause = Map::new();
    cause.insert("type".into(), Value::String(kind.to_string()));
    cause.insert("reason".into(), Value::String(reason));
    if let Some(index) = index {
        cause.insert("index".into(), Value::String(index.to_string()));
    }
    let body = json!({
        "error": {
            "root_cause": [Value::Object(cause.clone())],
            "type": cause["type"],
            "reason": cause["reason"],
            "index": index,
        },
        "status": status.as_u16(),
    });
    (status, Json(body)).into_response()
}

fn index_not_found(index: &str) -> Response {
    error_reply(
        StatusCode::NOT_FOUND,
        "index_not_found_exception",
        format!("no such index [{index}]"),
        Some(index),
    )
}

fn parse_body(body: &str) -> Result<Value, Response> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| {
        error_reply(
            StatusCode::BAD_REQUEST,
            "parse_exception",
            format!("request body is not valid JSON: {e}"),
            None,
        )
    })
}

fn shards(total: i64) -> Value {
    json!({"total": total, "successful": total, "failed": 0})
}

/// Split a comma-joined index expression.
fn index_names(expr: &str) -> Vec<String> {
    expr.split(',').filter(|s| !s.is_empty()).map(str::to_string).collect()
}

async fn cluster_health(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    let indices = store.indices.len() as i64;
    Json(json!({
        "cluster_name": CLUSTER_NAME,
        "status": "green",
        "timed_out": false,
        "number_of_nodes": 1,
        "number_of_data_nodes": 1,
        "active_primary_shards": indices,
        "active_shards": indices,
        "relocating_shards": 0,
        "initializing_shards": 0,
        "unassigned_shards": 0,
        "delayed_unassigned_shards": 0,
        "number_of_pending_tasks": 0,
        "number_of_in_flight_fetch": 0,
        "task_max_waiting_in_queue_millis": 0,
        "active_shards_percent_as_number": 100.0,
    }))
}

async fn create_index(State(db): State<Db>, Path(index): Path<String>, body: String) -> Response {
    let body = match parse_body(&body) {
        Ok(body) => body,
        Err(reply) => return reply,
    };
    let mut store = db.write().await;
    if store.indices.contains_key(&index) {
        return error_reply(
            StatusCode::BAD_REQUEST,
            "resource_already_exists_exception",
            format!("index [{index}] already exists"),
            Some(&index),
        );
    }
    let mut state = IndexState::new();
    state.settings = body.get("settings").cloned().unwrap_or(Value::Null);
    state.mappings = body.get("mappings").cloned().unwrap_or(Value::Null);
    store.indices.insert(index.clone(), state);
    debug!(%index, "index created");
    Json(json!({"acknowledged": true, "shards_acknowledged": true, "index": index})).into_response()
}

async fn delete_index(State(db): State<Db>, Path(expr): Path<String>) -> Response {
    let names = index_names(&expr);
    let mut store = db.write().await;
    if let Some(missing) = names.iter().find(|name| !store.indices.contains_key(*name)) {
        return index_not_found(missing);
    }
    for name in &names {
        store.indices.remove(name);
    }
    debug!(indices = ?names, "indices deleted");
    Json(json!({"acknowledged": true})).into_response()
}

async fn index_exists(State(db): State<Db>, Path(expr): Path<String>) -> StatusCode {
    let store = db.read().await;
    if index_names(&expr).iter().all(|name| store.indices.contains_key(name)) {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn refresh(State(db): State<Db>, Path(expr): Path<String>) -> Response {
    let names = index_names(&expr);
    let store = db.read().await;
    if let Some(missing) = names.iter().find(|name| !store.indices.contains_key(*name)) {
        return index_not_found(missing);
    }
    Json(json!({"_shards": shards(names.len() as i64)})).into_response()
}

/// Outcome of a single write, shared by the document and bulk handlers.
struct WriteResult {
    status: StatusCode,
    body: Value,
}

fn write_doc(store: &mut Store, index: &str, id: &str, source: Value, create_only: bool) -> WriteResult {
    let state = store.indices.entry(index.to_string()).or_insert_with(IndexState::new);
    let previous = state.docs.get(id).map(|doc| doc.version);
    if create_only && previous.is_some() {
        return WriteResult {
            status: StatusCode::CONFLICT,
            body: json!({
                "type": "version_conflict_engine_exception",
                "reason": format!("[{id}]: version conflict, document already exists"),
                "index": index,
            }),
        };
    }
    let seq_no = state.bump_seq_no();
    let version = previous.map_or(1, |v| v + 1);
    state.docs.insert(id.to_string(), StoredDoc { source, version, seq_no });
    let (status, result) = match previous {
        Some(_) => (StatusCode::OK, "updated"),
        None => (StatusCode::CREATED, "created"),
    };
    WriteResult {
        status,
        body: json!({
            "_index": index,
            "_id": id,
            "_version": version,
            "result": result,
            "_shards": {"total": 2, "successful": 1, "failed": 0},
            "_seq_no": seq_no,
            "_primary_term": 1,
        }),
    }
}

fn remove_doc(store: &mut Store, index: &str, id: &str) -> WriteResult {
    let Some(state) = store.indices.get_mut(index) else {
        return WriteResult {
            status: StatusCode::NOT_FOUND,
            body: json!({
                "type": "index_not_found_exception",
                "reason": format!("no such index [{index}]"),
                "index": index,
            }),
        };
    };
    let seq_no = state.bump_seq_no();
    let removed = state.docs.remove(id);
    if removed.is_some() {
        state.deleted += 1;
    }
    let (status, result, version) = match removed {
        Some(doc) => (StatusCode::OK, "deleted", doc.version + 1),
        None => (StatusCode::NOT_FOUND, "not_found", 1),
    };
    WriteResult {
        status,
        body: json!({
            "_index": index,
            "_id": id,
            "_version": version,
            "result": result,
            "_shards": {"total": 2, "successful": 1, "failed": 0},
            "_seq_no": seq_no,
            "_primary_term": 1,
        }),
    }
}

async fn store_doc(db: &Db, index: &str, id: &str, params: &HashMap<String, String>, body: &str) -> Response {
    let source = match parse_body(body) {
        Ok(Value::Object(source)) => Value::Object(source),
        Ok(_) => {
            return error_reply(
                StatusCode::BAD_REQUEST,
                "mapper_parsing_exception",
                "document source must be a JSON object",
                Some(index),
            )
        }
        Err(reply) => return reply,
    };
    let create_only = params.get("op_type").is_some_and(|op| op == "create");
    let mut store = db.write().await;
    let written = write_doc(&mut store, index, id, source, create_only);
    if written.status == StatusCode::CONFLICT {
        let reason = written.body["reason"].as_str().unwrap_or_default().to_string();
        return error_reply(written.status, "version_conflict_engine_exception", reason, Some(index));
    }
    debug!(%index, %id, status = written.status.as_u16(), "document written");
    (written.status, Json(written.body)).into_response()
}

async fn index_doc(
    State(db): State<Db>,
    Path((index, id)): Path<(String, String)>,
    Query(params): Params,
    body: String,
) -> Response {
    store_doc(&db, &index, &id, &params, &body).await
}

async fn index_auto_id(
    State(db): State<Db>,
    Path(index): Path<String>,
    Query(params): Params,
    body: String,
) -> Response {
    let id = Uuid::new_v4().simple().to_string();
    store_doc(&db, &index, &id, &params, &body).await
}

async fn get_doc(State(db): State<Db>, Path((index, id)): Path<(String, String)>) -> Response {
    let store = db.read().await;
    let Some(state) = store.indices.get(&index) else {
        return index_not_found(&index);
    };
    match state.docs.get(&id) {
        Some(doc) => Json(json!({
            "_index": index,
            "_id": id,
            "_version": doc.version,
            "_seq_no": doc.seq_no,
            "_primary_term": 1,
            "found": true,
            "_source": doc.source,
        }))
        .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"_index": index, "_id": id, "found": false})),
        )
            .into_response(),
    }
}

async fn doc_exists(State(db): State<Db>, Path((index, id)): Path<(String, String)>) -> StatusCode {
    let store = db.read().await;
    match store.indices.get(&index) {
        Some(state) if state.docs.contains_key(&id) => StatusCode::OK,
        _ => StatusCode::NOT_FOUND,
    }
}

async fn delete_doc(State(db): State<Db>, Path((index, id)): Path<(String, String)>) -> Response {
    let mut store = db.write().await;
    if !store.indices.contains_key(&index) {
        return index_not_found(&index);
    }
    let removed = remove_doc(&mut store, &index, &id);
    debug!(%index, %id, status = removed.status.as_u16(), "document delete");
    (removed.status, Json(removed.body)).into_response()
}

async fn bulk(State(db): State<Db>, body: String) -> Response {
    run_bulk(&db, None, &body).await
}

async fn bulk_into(State(db): State<Db>, Path(index): Path<String>, body: String) -> Response {
    run_bulk(&db, Some(&index), &body).await
}

fn merge_objects(target: &mut Value, patch: &Value) {
    if let (Value::Object(target), Value::Object(patch)) = (target, patch) {
        for (key, value) in patch {
            target.insert(key.clone(), value.clone());
        }
    }
}

fn apply_update(store: &mut Store, index: &str, id: &str, spec: &Value) -> WriteResult {
    let existing = store
        .indices
        .get(index)
        .and_then(|state| state.docs.get(id))
        .map(|doc| doc.source.clone());
    let doc = spec.get("doc").cloned().unwrap_or(Value::Null);
    let source = match existing {
        Some(mut source) => {
            merge_objects(&mut source, &doc);
            source
        }
        None if spec.get("doc_as_upsert").and_then(Value::as_bool) == Some(true) => doc,
        None => match spec.get("upsert") {
            Some(upsert) => upsert.clone(),
            None => {
                return WriteResult {
                    status: StatusCode::NOT_FOUND,
                    body: json!({
                        "type": "document_missing_exception",
                        "reason": format!("[{id}]: document missing"),
                        "index": index,
                    }),
                }
            }
        },
    };
    write_doc(store, index, id, source, false)
}

async fn run_bulk(db: &Db, default_index: Option<&str>, body: &str) -> Response {
    let mut lines = body.lines().filter(|line| !line.trim().is_empty());
    let mut items = Vec::new();
    let mut errors = false;
    let mut store = db.write().await;
    while let Some(line) = lines.next() {
        let action: Map<String, Value> = match serde_json::from_str(line) {
            Ok(action) => action,
            Err(e) => {
                return error_reply(
                    StatusCode::BAD_REQUEST,
                    "illegal_argument_exception",
                    format!("malformed action/metadata line: {e}"),
                    None,
                )
            }
        };
        let Some((op, meta)) = action.into_iter().next() else {
            return error_reply(
                StatusCode::BAD_REQUEST,
                "illegal_argument_exception",
                "empty action/metadata line",
                None,
            );
        };
        let index = meta
            .get("_index")
            .and_then(Value::as_str)
            .or(default_index)
            .unwrap_or_default()
            .to_string();
        let id = meta
            .get("_id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());
        let payload = if op == "delete" {
            Value::Null
        } else {
            match lines.next().map(|line| serde_json::from_str::<Value>(line)) {
                Some(Ok(payload)) => payload,
                _ => {
                    return error_reply(
                        StatusCode::BAD_REQUEST,
                        "illegal_argument_exception",
                        format!("{op} action is missing its source line"),
                        None,
                    )
                }
            }
        };
        let result = match op.as_str() {
            "index" => write_doc(&mut store, &index, &id, payload, false),
            "create" => write_doc(&mut store, &index, &id, payload, true),
            "update" => apply_update(&mut store, &index, &id, &payload),
            "delete" => remove_doc(&mut store, &index, &id),
            other => {
                return error_reply(
                    StatusCode::BAD_REQUEST,
                    "illegal_argument_exception",
                    format!("unknown bulk action [{other}]"),
                    None,
                )
            }
        };
        let mut item = Map::new();
        let status = result.status.as_u16();
        // A missing delete target is reported but is not a failure.
        let failed = status >= 300 && !(op == "delete" && status == 404 && result.body.get("result").is_some());
        if failed {
            errors = true;
            item.insert("_index".into(), Value::String(index));
            item.insert("_id".into(), Value::String(id));
            item.insert("status".into(), json!(status));
            item.insert("error".into(), result.body);
        } else if let Value::Object(body) = result.body {
            item.extend(body);
            item.insert("status".into(), json!(status));
        }
        let mut entry = Map::new();
        entry.insert(op, Value::Object(item));
        items.push(Value::Object(entry));
    }
    debug!(items = items.len(), errors, "bulk applied");
    Json(json!({"took": 1, "errors": errors, "items": items})).into_response()
}

fn param_usize(params: &HashMap<String, String>, body: &Value, key: &str, default: usize) -> usize {
    params
        .get(key)
        .and_then(|v| v.parse().ok())
        .or_else(|| body.get(key).and_then(Value::as_u64).map(|v| v as usize))
        .unwrap_or(default)
}

fn search_page(hits: &[Value], total: usize, scroll_id: Option<&str>) -> Value {
    let max_score = if hits.is_empty() { Value::Null } else { json!(1.0) };
    let mut page = json!({
        "took": 1,
        "timed_out": false,
        "_shards": {"total": 1, "successful": 1, "skipped": 0, "failed": 0},
        "hits": {
            "total": {"value": total, "relation": "eq"},
            "max_score": max_score,
            "hits": hits,
        },
    });
    if let Some(id) = scroll_id {
        page["_scroll_id"] = Value::String(id.to_string());
    }
    page
}

async fn search_all(State(db): State<Db>, Query(params): Params, body: String) -> Response {
    run_search(&db, None, &params, &body).await
}

async fn search(State(db): State<Db>, Path(expr): Path<String>, Query(params): Params, body: String) -> Response {
    run_search(&db, Some(index_names(&expr)), &params, &body).await
}

async fn run_search(
    db: &Db,
    indices: Option<Vec<String>>,
    params: &HashMap<String, String>,
    body: &str,
) -> Response {
    let body = match parse_body(body) {
        Ok(body) => body,
        Err(reply) => return reply,
    };
    if let Some(query) = body.get("query") {
        let supported = query.as_object().is_some_and(|q| q.len() == 1 && q.contains_key("match_all"));
        if !supported {
            return error_reply(
                StatusCode::BAD_REQUEST,
                "parsing_exception",
                "only match_all queries are supported",
                None,
            );
        }
    }
    let from = param_usize(params, &body, "from", 0);
    let size = param_usize(params, &body, "size", 10);
    let mut store = db.write().await;
    let names = match indices {
        Some(names) => {
            if let Some(missing) = names.iter().find(|name| !store.indices.contains_key(*name)) {
                return index_not_found(missing);
            }
            names
        }
        None => store.indices.keys().cloned().collect(),
    };
    let hits: Vec<Value> = names
        .iter()
        .filter_map(|name| store.indices.get(name).map(|state| (name, state)))
        .flat_map(|(name, state)| {
            state.docs.iter().map(move |(id, doc)| {
                json!({
                    "_index": name,
                    "_id": id,
                    "_score": 1.0,
                    "_source": doc.source,
                })
            })
        })
        .collect();
    let total = hits.len();
    if params.contains_key("scroll") {
        let scroll_id = Uuid::new_v4().simple().to_string();
        let page: Vec<Value> = hits.iter().take(size).cloned().collect();
        let position = page.len();
        store.scrolls.insert(scroll_id.clone(), ScrollCursor { hits, position, size });
        debug!(%scroll_id, total, "scroll opened");
        return Json(search_page(&page, total, Some(&scroll_id))).into_response();
    }
    let page: Vec<Value> = hits.iter().skip(from).take(size).cloned().collect();
    Json(search_page(&page, total, None)).into_response()
}

#[derive(Debug, Deserialize)]
struct ScrollBody {
    scroll_id: String,
}

async fn scroll_next(State(db): State<Db>, body: String) -> Response {
    let request: ScrollBody = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(e) => {
            return error_reply(
                StatusCode::BAD_REQUEST,
                "illegal_argument_exception",
                format!("scroll request needs a scroll_id: {e}"),
                None,
            )
        }
    };
    let mut store = db.write().await;
    let Some(cursor) = store.scrolls.get_mut(&request.scroll_id) else {
        return error_reply(
            StatusCode::NOT_FOUND,
            "search_context_missing_exception",
            format!("No search context found for id [{}]", request.scroll_id),
            None,
        );
    };
    let end = (cursor.position + cursor.size).min(cursor.hits.len());
    let page = cursor.hits[cursor.position..end].to_vec();
    cursor.position = end;
    Json(search_page(&page, cursor.hits.len(), Some(&request.scroll_id))).into_response()
}

#[derive(Debug, Deserialize)]
struct ClearScrollBody {
    #[serde(default)]
    scroll_id: Vec<String>,
}

async fn scroll_clear(State(db): State<Db>, body: String) -> Response {
    let request: ClearScrollBody = serde_json::from_str(&body).unwrap_or(ClearScrollBody { scroll_id: Vec::new() });
    let mut store = db.write().await;
    let freed = request
        .scroll_id
        .iter()
        .filter(|id| store.scrolls.remove(*id).is_some())
        .count();
    let status = if freed == 0 && !request.scroll_id.is_empty() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };
    (status, Json(json!({"succeeded": true, "num_freed": freed}))).into_response()
}

async fn cat_indices(State(db): State<Db>, Query(params): Params) -> Json<Vec<Value>> {
    let store = db.read().await;
    let columns: Option<Vec<&str>> = params.get("h").map(|h| h.split(',').collect());
    let rows = store
        .indices
        .iter()
        .map(|(name, state)| {
            let row = json!({
                "health": "green",
                "status": "open",
                "index": name,
                "uuid": state.uuid,
                "pri": "1",
                "rep": "0",
                "docs.count": state.docs.len().to_string(),
                "docs.deleted": state.deleted.to_string(),
                "store.size": "1kb",
                "pri.store.size": "1kb",
            });
            match (&columns, row) {
                (Some(columns), Value::Object(mut row)) => {
                    row.retain(|key, _| columns.contains(&key.as_str()));
                    Value::Object(row)
                }
                (_, row) => row,
            }
        })
        .collect();
    Json(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_names_split_on_commas() {
        assert_eq!(index_names("a,b"), vec!["a", "b"]);
        assert_eq!(index_names("a,,b,"), vec!["a", "b"]);
        assert!(index_names("").is_empty());
    }

    #[test]
    fn write_doc_creates_then_updates() {
        let mut store = Store::default();
        let first = write_doc(&mut store, "t", "1", json!({"n": 1}), false);
        assert_eq!(first.status, StatusCode::CREATED);
        assert_eq!(first.body["result"], "created");
        assert_eq!(first.body["_version"], 1);
        let second = write_doc(&mut store, "t", "1", json!({"n": 2}), false);
        assert_eq!(second.status, StatusCode::OK);
        assert_eq!(second.body["result"], "updated");
        assert_eq!(second.body["_version"], 2);
        assert_eq!(store.indices["t"].docs["1"].source, json!({"n": 2}));
    }

    #[test]
    fn create_only_conflicts_on_existing_doc() {
        let mut store = Store::default();
        write_doc(&mut store, "t", "1", json!({}), false);
        let conflict = write_doc(&mut store, "t", "1", json!({}), true);
        assert_eq!(conflict.status, StatusCode::CONFLICT);
        assert_eq!(conflict.body["type"], "version_conflict_engine_exception");
    }

    #[test]
    fn update_merges_or_upserts() {
        let mut store = Store::default();
        write_doc(&mut store, "t", "1", json!({"a": 1, "b": 1}), false);
        apply_update(&mut store, "t", "1", &json!({"doc": {"b": 2}}));
        assert_eq!(store.indices["t"].docs["1"].source, json!({"a": 1, "b": 2}));

        let missing = apply_update(&mut store, "t", "2", &json!({"doc": {"x": 1}}));
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        let upserted = apply_update(&mut store, "t", "2", &json!({"doc": {"x": 1}, "doc_as_upsert": true}));
        assert_eq!(upserted.status, StatusCode::CREATED);
    }

    #[test]
    fn remove_doc_reports_not_found() {
        let mut store = Store::default();
        write_doc(&mut store, "t", "1", json!({}), false);
        assert_eq!(remove_doc(&mut store, "t", "1").body["result"], "deleted");
        let again = remove_doc(&mut store, "t", "1");
        assert_eq!(again.status, StatusCode::NOT_FOUND);
        assert_eq!(again.body["result"], "not_found");
        assert_eq!(store.indices["t"].deleted, 1);
    }
}
