use std::time::Duration;

use tracing::{debug, info, warn};

use super::Middleware;
use crate::dispatcher::{HandlerRequest, HandlerResponse};

/// Logs each request on the way in and its outcome on the way out
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn before(&self, req: &mut HandlerRequest) -> Option<HandlerResponse> {
        debug!(
            request_id = %req.request_id,
            method = %req.method,
            path = %req.path,
            "Request received"
        );
        None
    }

    fn after(&self, req: &HandlerRequest, res: &mut HandlerResponse, latency: Duration) {
        let latency_ms = latency.as_millis() as u64;
        if res.status >= 500 {
            warn!(
                request_id = %req.request_id,
                method = %req.method,
                path = %req.path,
                status = res.status,
                latency_ms,
                "Request failed"
            );
        } else {
            info!(
                request_id = %req.request_id,
                method = %req.method,
                path = %req.path,
                status = res.status,
                latency_ms,
                "Request handled"
            );
        }
    }
}
