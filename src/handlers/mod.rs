pub mod items;

use axum::Json;

use crate::models::Health;

/// Static liveness responder; never touches the store.
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}
