#![allow(dead_code)]

use routetree::dispatcher::{HandlerRequest, HandlerResponse, Next};
use routetree::{MethodSpec, RouteDefinition, RouteNode};
use serde_json::{json, Value};

pub fn ok(
    _: &HandlerRequest,
    res: &mut HandlerResponse,
    _: &mut Next,
    _: &RouteDefinition,
) -> anyhow::Result<()> {
    res.send_json(200, json!({ "ok": true }));
    Ok(())
}

/// Handler answering with a fixed body
pub fn respond(body: Value) -> MethodSpec {
    MethodSpec::new(move |_, res, _, _| {
        res.send_json(200, body.clone());
        Ok(())
    })
}

/// Handler echoing the path parameters and the bound definition
pub fn echo() -> MethodSpec {
    MethodSpec::new(|req, res, _, def| {
        res.send_json(
            200,
            json!({
                "params": req.path_params_map(),
                "route": def.name(),
                "path": def.path(),
            }),
        );
        Ok(())
    })
}

/// `pets` at `/pets/{id|number}` with `dogs`, and `cats` -> `tigers` below it
pub fn pets_tree() -> Vec<RouteNode> {
    vec![RouteNode::new("/pets/{id|number}")
        .named("pets")
        .get(echo())
        .route(RouteNode::new("/dogs").named("dogs").get(echo()))
        .route(
            RouteNode::new("/cats")
                .named("cats")
                .route(RouteNode::new("/tiggers").named("tigers").get(echo())),
        )]
}

/// Documentation-heavy tree: `items` with `onSale`, and `plants/carnivore/dangerous`
pub fn shop_tree() -> Vec<RouteNode> {
    vec![
        RouteNode::new("/items")
            .named("items")
            .get(MethodSpec::new(ok).response("200", "all items"))
            .post(
                MethodSpec::new(ok)
                    .response("200", "created")
                    .response("404", "no such shelf"),
            )
            .route(
                RouteNode::new("/on-sale").named("onSale").get(
                    MethodSpec::new(ok)
                        .response("200", "discounted items")
                        .response("404", "sale over"),
                ),
            ),
        RouteNode::new("/plants").named("plants").route(
            RouteNode::new("/carnivore/{name|string}")
                .named("carnivore")
                .route(RouteNode::new("/dangerous").named("dangerous").get(echo())),
        ),
    ]
}
