#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use http::Method;
use routetree::dispatcher::{HandlerRequest, HandlerResponse, HostHandler};
use routetree::middleware::{from_fn, Middleware, MetricsMiddleware};
use routetree::{
    compile, compile_router, CompileError, MethodSpec, RouteMethod, RouteNode, Router, RouterHost,
};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn get(router: &Router, uri: &str) -> HandlerResponse {
    router.handle(HandlerRequest::new(Method::GET, uri))
}

#[test]
fn test_handlers_mount_at_accumulated_paths() {
    let router = compile_router(&common::pets_tree()).unwrap();

    let pets = get(&router, "/pets/99");
    assert_eq!(pets.status, 200);
    assert_eq!(pets.body["params"]["id"], "99");
    assert_eq!(pets.body["route"], "pets");

    let dogs = get(&router, "/pets/99/dogs");
    assert_eq!(dogs.body["params"]["id"], "99");
    assert_eq!(dogs.body["route"], "pets-dogs");
    assert_eq!(dogs.body["path"], "/pets/:id/dogs");

    let tigers = get(&router, "/pets/5/cats/tiggers");
    assert_eq!(tigers.body["route"], "pets-cats-tigers");
}

#[test]
fn test_node_without_handler_is_not_found() {
    let router = compile_router(&common::pets_tree()).unwrap();
    assert_eq!(get(&router, "/pets/1/cats").status, 404);
    assert_eq!(get(&router, "/nowhere").status, 404);
    let post = router.handle(HandlerRequest::new(Method::POST, "/pets/1"));
    assert_eq!(post.status, 404);
}

#[test]
fn test_get_and_post_on_one_node() {
    let tree = vec![RouteNode::new("/new-item")
        .named("newItem")
        .get(common::respond(json!({ "message": "items" })))
        .post(MethodSpec::new(|req, res, _, _| {
            let item = req.body.as_ref().and_then(|b| b.get("new_item")).cloned();
            res.send_json(200, json!({ "new_item": item }));
            Ok(())
        }))];
    let router = compile_router(&tree).unwrap();

    let posted = router.handle(
        HandlerRequest::new(Method::POST, "/new-item").with_body(json!({ "new_item": "sponge" })),
    );
    assert_eq!(posted.body["new_item"], "sponge");
    assert_eq!(get(&router, "/new-item").body["message"], "items");
}

#[test]
fn test_query_parameters_reach_handlers() {
    let tree = vec![RouteNode::new("/pets").get(MethodSpec::new(|req, res, _, _| {
        res.send_json(
            200,
            json!({ "foo": req.get_query_param("foo"), "baz": req.get_query_param("baz") }),
        );
        Ok(())
    }))];
    let router = compile_router(&tree).unwrap();
    let res = get(&router, "/pets?foo=bar&baz=beez");
    assert_eq!(res.body, json!({ "foo": "bar", "baz": "beez" }));
}

#[test]
fn test_registries_are_visible_from_every_handler() {
    let tree = vec![RouteNode::new("/pets")
        .named("pets")
        .route(RouteNode::new("/tigers").named("tigers").get(MethodSpec::new(
            |req, res, _, _| {
                let defs = req.context.route_definitions.as_ref().unwrap();
                res.send_json(200, serde_json::to_value(defs.as_ref())?);
                Ok(())
            },
        )))
        .route(RouteNode::new("/dogs").named("dogs"))];
    let router = compile_router(&tree).unwrap();
    let res = get(&router, "/pets/tigers");
    assert_eq!(
        res.body,
        json!({
            "pets": { "name": "pets", "path": "/pets", "parameters": [] },
            "pets-dogs": { "name": "pets-dogs", "path": "/pets/dogs", "parameters": [] },
            "pets-tigers": { "name": "pets-tigers", "path": "/pets/tigers", "parameters": [] }
        })
    );
}

#[test]
fn test_redirect_through_reverse_routing() {
    let tree = vec![RouteNode::new("/pets")
        .named("pets")
        .route(RouteNode::new("/cats/{id|number}").named("cats").get(common::echo()))
        .route(RouteNode::new("/tigers/{id|number}").named("tigers").get(MethodSpec::new(
            |req, res, _, _| {
                let id = req.get_path_param("id").unwrap_or_default();
                let target = req
                    .context
                    .reverse("pets-cats", [("id", id)])
                    .ok_or_else(|| anyhow::anyhow!("pets-cats is not registered"))?;
                res.redirect(target);
                Ok(())
            },
        )))];
    let router = compile_router(&tree).unwrap();
    let res = get(&router, "/pets/tigers/12");
    assert_eq!(res.status, 302);
    assert_eq!(res.get_header("location"), Some("/pets/cats/12"));
}

#[test]
fn test_allowed_codes_in_context() {
    let tree = vec![RouteNode::new("/items").named("items").get(
        MethodSpec::new(|req, res, _, def| {
            let codes = req
                .context
                .allowed_codes(def.name(), RouteMethod::Get)
                .unwrap_or_default();
            res.send_json(200, json!(codes));
            Ok(())
        })
        .response("200", "ok")
        .response("404", "missing"),
    )];
    let router = compile_router(&tree).unwrap();
    assert_eq!(get(&router, "/items").body, json!(["200", "404"]));
}

#[test]
fn test_middleware_runs_in_order_and_only_in_scope() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let recorder = |label: &'static str| -> Arc<dyn Middleware> {
        let calls = Arc::clone(&calls);
        Arc::new(from_fn(move |_req| {
            calls.lock().unwrap().push(label);
            None
        }))
    };

    let tree = vec![
        RouteNode::new("/pets")
            .middleware(recorder("one"))
            .middleware(recorder("two"))
            .get(MethodSpec::new(common::ok))
            .route(
                RouteNode::new("/dogs")
                    .middleware(recorder("dogs"))
                    .get(MethodSpec::new(common::ok)),
            ),
        RouteNode::new("/plants").get(MethodSpec::new(common::ok)),
    ];
    let router = compile_router(&tree).unwrap();

    assert_eq!(get(&router, "/pets").status, 200);
    assert_eq!(*calls.lock().unwrap(), vec!["one", "two"]);

    calls.lock().unwrap().clear();
    get(&router, "/pets/dogs");
    assert_eq!(*calls.lock().unwrap(), vec!["one", "two", "dogs"]);

    calls.lock().unwrap().clear();
    get(&router, "/plants");
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn test_middleware_can_answer_early() {
    let tree = vec![RouteNode::new("/admin")
        .middleware(Arc::new(from_fn(|req| {
            req.get_header("authorization")
                .is_none()
                .then(|| HandlerResponse::error(401, "Unauthorized"))
        })))
        .get(MethodSpec::new(common::ok))];
    let router = compile_router(&tree).unwrap();

    assert_eq!(get(&router, "/admin").status, 401);
    let authed = router.handle(
        HandlerRequest::new(Method::GET, "/admin").with_header("Authorization", "Bearer x"),
    );
    assert_eq!(authed.status, 200);
}

#[test]
fn test_passing_falls_through_to_next_route() {
    let tree = vec![
        RouteNode::new("/pets/mine").get(MethodSpec::new(|req, res, next, _| {
            if req.get_query_param("skip").is_some() {
                next.pass();
            } else {
                res.send_json(200, json!("mine"));
            }
            Ok(())
        })),
        RouteNode::new("/pets/{id|string}").get(common::echo()),
    ];
    let router = compile_router(&tree).unwrap();

    assert_eq!(get(&router, "/pets/mine").body, json!("mine"));
    let fallthrough = get(&router, "/pets/mine?skip=1");
    assert_eq!(fallthrough.body["params"]["id"], "mine");
}

#[test]
fn test_own_handler_precedes_same_path_child() {
    let tree = vec![RouteNode::new("/pets")
        .get(common::respond(json!("parent")))
        .route(RouteNode::new("/").get(common::respond(json!("child"))))];
    let router = compile_router(&tree).unwrap();
    assert_eq!(get(&router, "/pets").body, json!("parent"));
}

#[test]
fn test_handler_errors_and_panics_become_500() {
    let tree = vec![
        RouteNode::new("/fails").get(MethodSpec::new(|_, _, _, _| {
            Err(anyhow::anyhow!("database unavailable"))
        })),
        RouteNode::new("/panics").get(MethodSpec::new(|_, _, _, _| panic!("boom"))),
    ];
    let router = compile_router(&tree).unwrap();

    let failed = get(&router, "/fails");
    assert_eq!(failed.status, 500);
    assert_eq!(failed.body["error"], "database unavailable");

    let panicked = get(&router, "/panics");
    assert_eq!(panicked.status, 500);
    assert_eq!(panicked.body["error"], "Internal Server Error");
}

#[test]
fn test_missing_path_registers_nothing() {
    let tree = vec![
        RouteNode::new("/ok").get(MethodSpec::new(common::ok)),
        RouteNode::new("/parent").route(RouteNode::default().named("broken")),
    ];
    let mut router = Router::new();
    let err = compile(&tree, &mut router).unwrap_err();
    assert_eq!(
        err,
        CompileError::MissingPath {
            location: "routes[1].routes[0]".into()
        }
    );
    assert!(router.routes().is_empty());
    assert_eq!(router.middleware_count(), 0);
}

#[test]
fn test_compile_reports_registries_and_counts() {
    let mut router = Router::new();
    let compiled = compile(&common::shop_tree(), &mut router).unwrap();
    assert_eq!(compiled.handlers_registered, 4);
    assert!(compiled.route_definitions.contains("plants-carnivore-dangerous"));
    assert_eq!(
        compiled
            .allowed_response_codes
            .codes("items", RouteMethod::Post)
            .unwrap()
            .len(),
        2
    );
    assert_eq!(router.middleware_count(), 1);
    let mut routes = router.routes();
    routes.sort();
    assert_eq!(
        routes,
        vec![
            (RouteMethod::Get, "/items"),
            (RouteMethod::Get, "/items/on-sale"),
            (RouteMethod::Get, "/plants/carnivore/:name/dangerous"),
            (RouteMethod::Post, "/items"),
        ]
    );
}

#[test]
fn test_documentation_only_methods_are_skipped() {
    let tree = vec![RouteNode::new("/docs")
        .get(MethodSpec::documented().response("200", "ok"))
        .post(MethodSpec::new(common::ok))];
    let router = compile_router(&tree).unwrap();
    assert_eq!(router.routes(), vec![(RouteMethod::Post, "/docs")]);
}

#[test]
fn test_metrics_middleware_on_host() {
    let metrics = Arc::new(MetricsMiddleware::new());
    let mut router = Router::new();
    router.register_middleware(Arc::clone(&metrics) as Arc<dyn Middleware>);
    compile(&common::pets_tree(), &mut router).unwrap();

    get(&router, "/pets/1");
    get(&router, "/missing");
    assert_eq!(metrics.request_count(), 2);
    assert_eq!(metrics.not_found(), 1);
}

/// Host that records what the compiler asks of it
#[derive(Default)]
struct RecordingHost {
    log: Arc<Mutex<Vec<String>>>,
}

impl RouterHost for RecordingHost {
    fn sub_router(&self) -> Self {
        RecordingHost {
            log: Arc::clone(&self.log),
        }
    }

    fn register_middleware(&mut self, _middleware: Arc<dyn Middleware>) {
        self.log.lock().unwrap().push("middleware".into());
    }

    fn register_route(&mut self, method: RouteMethod, path: &str, _handler: HostHandler) {
        self.log
            .lock()
            .unwrap()
            .push(format!("route {method} {path}"));
    }

    fn mount_sub_router(&mut self, path: &str, _sub: Self) {
        self.log.lock().unwrap().push(format!("mount {path}"));
    }
}

#[test]
fn test_custom_host_sees_children_before_mount() {
    let mut host = RecordingHost::default();
    let tree = vec![RouteNode::new("/pets/{id|number}")
        .get(MethodSpec::new(common::ok))
        .route(RouteNode::new("/dogs").post(MethodSpec::new(common::ok)))];
    compile(&tree, &mut host).unwrap();
    assert_eq!(
        *host.log.lock().unwrap(),
        vec![
            "middleware".to_string(),
            "route get /".to_string(),
            "route post /".to_string(),
            "mount /dogs".to_string(),
            "mount /pets/:id".to_string(),
        ]
    );
}

#[test]
fn test_router_shared_across_threads() {
    let router = Arc::new(compile_router(&common::pets_tree()).unwrap());
    std::thread::scope(|s| {
        for i in 0..8 {
            let router = Arc::clone(&router);
            s.spawn(move || {
                let res = router.handle(HandlerRequest::new(Method::GET, &format!("/pets/{i}/dogs")));
                assert_eq!(res.status, 200);
                assert_eq!(res.body["params"]["id"], i.to_string());
            });
        }
    });
}

#[test]
fn test_handler_status_without_body() {
    let tree = vec![RouteNode::new("/slow").get(MethodSpec::new(|_, res, _, _| {
        std::thread::sleep(Duration::from_millis(2));
        res.set_status(204);
        Ok(())
    }))];
    let router = compile_router(&tree).unwrap();
    assert_eq!(get(&router, "/slow").status, 204);
}
