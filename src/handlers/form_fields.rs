use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::auth_middleware;
use crate::models::form_field::{FieldType, FormField, NewFormField};
use crate::validation::{optional, required};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Extension},
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn form_field_routes() -> Router {
    let public_routes = Router::new().route("/api/form-fields", get(list_form_fields));

    let protected_routes = Router::new()
        .route("/api/form-fields", post(create_form_field))
        .layer(axum::middleware::from_fn(auth_middleware));

    public_routes.merge(protected_routes)
}

async fn list_form_fields(Extension(state): Extension<Arc<AppState>>) -> Json<Vec<FormField>> {
    Json(state.store.list_form_fields().await)
}

async fn create_form_field(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<NewFormField>, JsonRejection>,
) -> ApiResult<Json<FormField>> {
    let Json(payload) = payload?;

    let options = optional(payload.options);
    if let Some(raw) = &options {
        validate_options(raw)?;
    }
    if payload.field_type == FieldType::Select && options.is_none() {
        return Err(ApiError::Validation(
            "Select fields need a list of options".to_string(),
        ));
    }

    let field = state
        .store
        .create_form_field(NewFormField {
            field_name: required(&payload.field_name, "Field name is required")?,
            label: required(&payload.label, "Label is required")?,
            options,
            ..payload
        })
        .await;

    tracing::info!(field_id = field.id, field_name = %field.field_name, "form field created");
    Ok(Json(field))
}

/// Options are stored as a JSON-encoded array.
fn validate_options(raw: &str) -> ApiResult<()> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(_)) => Ok(()),
        _ => Err(ApiError::Validation(
            "Options must be a JSON array".to_string(),
        )),
    }
}
