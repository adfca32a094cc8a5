use axum::http::StatusCode;

/// Liveness handler for `GET /healthz`.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Map a dependency check to the `GET /readyz` status.
///
/// Services call this from their own readiness handler after pinging the
/// dependencies they cannot serve without.
pub fn readiness<E: std::fmt::Display>(check: Result<(), E>) -> StatusCode {
    match check {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
