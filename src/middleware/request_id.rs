use std::time::Duration;

use super::Middleware;
use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::ids::RequestId;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Adopts a valid inbound `x-request-id` and echoes the id on the response
pub struct RequestIdMiddleware;

impl Middleware for RequestIdMiddleware {
    fn before(&self, req: &mut HandlerRequest) -> Option<HandlerResponse> {
        let inbound = req
            .get_header(REQUEST_ID_HEADER)
            .map(|header| RequestId::from_header_or_new(Some(header)));
        if let Some(id) = inbound {
            req.request_id = id;
        }
        None
    }

    fn after(&self, req: &HandlerRequest, res: &mut HandlerResponse, _latency: Duration) {
        res.set_header(REQUEST_ID_HEADER, req.request_id.to_string());
    }
}
