//! HTTP request handlers

use super::auth::AuthContext;
use super::types::{
    ChatMessageRequest, CreateTransferRequest, ErrorResponse, StepResponse, SuccessResponse,
    TransferListResponse, UpdateTransferRequest,
};
use super::AppState;
use crate::db::{DbError, Transfer};
use crate::interview::{transition, Event, TransitionError};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Transfer registry
        .route("/api/v1/transfers", post(create_transfer).get(list_transfers))
        .route(
            "/api/v1/transfers/:id",
            get(get_transfer).put(update_transfer).delete(delete_transfer),
        )
        // Interview protocol
        .route("/api/v1/chat/transfers/:id/start", post(start_interview))
        .route("/api/v1/chat/transfers/:id/message", post(interview_message))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Transfer Registry
// ============================================================

async fn create_transfer(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<CreateTransferRequest>,
) -> Result<(StatusCode, Json<Transfer>), AppError> {
    if !auth.role.can_manage_transfers() {
        return Err(AppError::Forbidden(
            "Solo managers y admins pueden crear traspasos".to_string(),
        ));
    }
    if req.position.trim().is_empty() || req.outgoing_user.trim().is_empty() {
        return Err(AppError::BadRequest(
            "position y outgoing_user son obligatorios".to_string(),
        ));
    }

    let transfer = state
        .db
        .create_transfer(
            req.position.trim(),
            req.outgoing_user.trim(),
            req.manager_instructions.as_deref(),
        )
        .map_err(AppError::from_db)?;

    tracing::info!(transfer_id = transfer.id, "Transfer created");
    Ok((StatusCode::CREATED, Json(transfer)))
}

async fn list_transfers(
    State(state): State<AppState>,
    _auth: AuthContext,
) -> Result<Json<TransferListResponse>, AppError> {
    let transfers = state.db.list_transfers().map_err(AppError::from_db)?;
    Ok(Json(TransferListResponse { transfers }))
}

async fn get_transfer(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(id): Path<i64>,
) -> Result<Json<Transfer>, AppError> {
    let transfer = state.db.get_transfer(id).map_err(AppError::from_db)?;
    Ok(Json(transfer))
}

async fn update_transfer(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTransferRequest>,
) -> Result<Json<Transfer>, AppError> {
    if !auth.role.can_manage_transfers() {
        return Err(AppError::Forbidden(
            "Solo managers y admins pueden modificar traspasos".to_string(),
        ));
    }
    let transfer = state
        .db
        .update_transfer(id, req.position.trim(), req.outgoing_user.trim())
        .map_err(AppError::from_db)?;
    Ok(Json(transfer))
}

async fn delete_transfer(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if auth.role != super::RoleName::Admin {
        return Err(AppError::Forbidden(
            "Solo admins pueden eliminar traspasos".to_string(),
        ));
    }
    state.db.delete_transfer(id).map_err(AppError::from_db)?;
    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// Interview Protocol
// ============================================================

async fn start_interview(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(id): Path<i64>,
) -> Result<Json<StepResponse>, AppError> {
    run_interview_event(&state, id, Event::Start).await
}

async fn interview_message(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(id): Path<i64>,
    Json(req): Json<ChatMessageRequest>,
) -> Result<Json<StepResponse>, AppError> {
    run_interview_event(&state, id, Event::UserMessage { text: req.message }).await
}

/// Load-transition-persist around the pure state machine. Nothing is
/// written unless the transition succeeded, so a failed call leaves the
/// stored interview exactly as it was.
async fn run_interview_event(
    state: &AppState,
    transfer_id: i64,
    event: Event,
) -> Result<Json<StepResponse>, AppError> {
    let current = state
        .db
        .load_interview_state(transfer_id)
        .map_err(AppError::from_db)?;

    let next = transition(&current, event).map_err(|e| match e {
        TransitionError::EmptyMessage | TransitionError::NotStarted => {
            AppError::BadRequest(e.to_string())
        }
    })?;

    if next != current {
        state
            .db
            .save_interview_state(transfer_id, &next)
            .map_err(AppError::from_db)?;
    }
    tracing::debug!(
        transfer_id,
        pending_step = ?next.pending_step,
        thread_len = next.thread.len(),
        "Interview advanced"
    );
    Ok(Json(StepResponse::from_state(next)))
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("relevo ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    BadRequest(String),
    Forbidden(String),
    NotFound(String),
    Internal(String),
}

impl AppError {
    fn from_db(err: DbError) -> Self {
        match err {
            DbError::TransferNotFound(id) => {
                AppError::NotFound(format!("Transfer no encontrada: {id}"))
            }
            DbError::Sqlite(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_router() -> (Router, Database) {
        let db = Database::open_in_memory().unwrap();
        let router = create_router(AppState::new(db.clone(), Some("secreto".to_string())));
        (router, db)
    }

    fn request(method: &str, uri: &str, role: &str, body: Option<serde_json::Value>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", "Bearer secreto")
            .header("x-role", role);
        match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                builder.body(Body::from(json.to_string())).unwrap()
            }
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn transfer_crud_with_role_gating() {
        let (router, _db) = test_router();

        // A plain user may not create.
        let resp = router
            .clone()
            .oneshot(request(
                "POST",
                "/api/v1/transfers",
                "user",
                Some(serde_json::json!({"position": "SRE", "outgoing_user": "marta"})),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // A manager may.
        let resp = router
            .clone()
            .oneshot(request(
                "POST",
                "/api/v1/transfers",
                "manager",
                Some(serde_json::json!({"position": "SRE", "outgoing_user": "marta"})),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created = json_body(resp).await;
        let id = created["id"].as_i64().unwrap();

        // Anyone authenticated may read.
        let resp = router
            .clone()
            .oneshot(request("GET", &format!("/api/v1/transfers/{id}"), "user", None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        // Only admins may delete.
        let resp = router
            .clone()
            .oneshot(request("DELETE", &format!("/api/v1/transfers/{id}"), "manager", None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let resp = router
            .clone()
            .oneshot(request("DELETE", &format!("/api/v1/transfers/{id}"), "admin", None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_bearer_is_unauthorized_with_detail() {
        let (router, _db) = test_router();
        let req = Request::builder()
            .method("GET")
            .uri("/api/v1/transfers")
            .header("x-role", "user")
            .body(Body::empty())
            .unwrap();
        let resp = router.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(resp).await;
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn wrong_token_is_unauthorized() {
        let (router, _db) = test_router();
        let req = Request::builder()
            .method("GET")
            .uri("/api/v1/transfers")
            .header("authorization", "Bearer otro")
            .header("x-role", "user")
            .body(Body::empty())
            .unwrap();
        let resp = router.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn interview_start_and_message_flow() {
        let (router, db) = test_router();
        let t = db.create_transfer("SRE", "marta", None).unwrap();
        let path = |op: &str| format!("/api/v1/chat/transfers/{}/{op}", t.id);

        let resp = router
            .clone()
            .oneshot(request("POST", &path("start"), "user", None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["pending_step"], "responsibilities");
        assert_eq!(body["state"]["thread"].as_array().unwrap().len(), 1);
        assert_eq!(body["assistant"], body["state"]["thread"][0]["content"]);

        let resp = router
            .clone()
            .oneshot(request(
                "POST",
                &path("message"),
                "user",
                Some(serde_json::json!({"message": "Gestiono despliegues y soporte a clientes."})),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["pending_step"], "pending_work");
        assert_eq!(body["state"]["thread"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn start_is_idempotent_over_http() {
        let (router, db) = test_router();
        let t = db.create_transfer("SRE", "marta", None).unwrap();
        let uri = format!("/api/v1/chat/transfers/{}/start", t.id);

        let first = json_body(
            router
                .clone()
                .oneshot(request("POST", &uri, "user", None))
                .await
                .unwrap(),
        )
        .await;
        let second = json_body(
            router
                .clone()
                .oneshot(request("POST", &uri, "user", None))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(
            first["state"]["thread"].as_array().unwrap().len(),
            second["state"]["thread"].as_array().unwrap().len()
        );
    }

    #[tokio::test]
    async fn interview_on_missing_transfer_is_not_found() {
        let (router, _db) = test_router();
        let resp = router
            .oneshot(request("POST", "/api/v1/chat/transfers/999/start", "user", None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = json_body(resp).await;
        assert!(body["detail"].as_str().unwrap().contains("999"));
    }

    #[tokio::test]
    async fn empty_message_is_bad_request_and_commits_nothing() {
        let (router, db) = test_router();
        let t = db.create_transfer("SRE", "marta", None).unwrap();
        router
            .clone()
            .oneshot(request(
                "POST",
                &format!("/api/v1/chat/transfers/{}/start", t.id),
                "user",
                None,
            ))
            .await
            .unwrap();
        let before = db.load_interview_state(t.id).unwrap();

        let resp = router
            .oneshot(request(
                "POST",
                &format!("/api/v1/chat/transfers/{}/message", t.id),
                "user",
                Some(serde_json::json!({"message": "   "})),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(db.load_interview_state(t.id).unwrap(), before);
    }

    #[tokio::test]
    async fn message_before_start_is_bad_request() {
        let (router, db) = test_router();
        let t = db.create_transfer("SRE", "marta", None).unwrap();
        let resp = router
            .oneshot(request(
                "POST",
                &format!("/api/v1/chat/transfers/{}/message", t.id),
                "user",
                Some(serde_json::json!({"message": "hola"})),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
