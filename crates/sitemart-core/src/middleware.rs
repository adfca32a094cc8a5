use axum::http::{HeaderName, HeaderValue, Request};
use tower::ServiceBuilder;
use tower::layer::util::{Identity, Stack};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};

pub const X_REQUEST_ID: &str = "x-request-id";

#[derive(Clone, Default)]
pub struct MakeUuidRequestId;

impl MakeRequestId for MakeUuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        // A hyphenated UUID is always a valid header value; None skips the header.
        HeaderValue::from_str(&uuid::Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Layers that assign an `x-request-id` to each incoming request (keeping one
/// supplied by the caller) and echo it on the response.
///
/// Apply with `.layer(request_id_layers())` outside the `TraceLayer` so the
/// id is present on the request span.
pub fn request_id_layers()
-> ServiceBuilder<Stack<PropagateRequestIdLayer, Stack<SetRequestIdLayer<MakeUuidRequestId>, Identity>>>
{
    let header = HeaderName::from_static(X_REQUEST_ID);
    ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(header.clone(), MakeUuidRequestId))
        .layer(PropagateRequestIdLayer::new(header))
}
