// Integration tests for matching paths against routes

use pathway::{FilterOutcome, FilterRegistry, Params, Registry, RouteEntry, RouteSpec};

mod common;

fn route(spec: RouteSpec) -> std::sync::Arc<RouteEntry> {
    Registry::new().register("test", spec, false).unwrap()
}

#[test]
fn test_nested_optional_groups() {
    let entry = route(RouteSpec::new("a(/<b>(/<c>))"));

    assert_eq!(entry.matches("a", None).unwrap(), Params::new());
    assert_eq!(entry.matches("/a/x/", None).unwrap(), common::params(&[("b", "x")]));
    assert_eq!(
        entry.matches("a/x/y", None).unwrap(),
        common::params(&[("b", "x"), ("c", "y")])
    );
    assert!(entry.matches("a/x/y/z", None).is_none());
    assert!(entry.matches("b/x", None).is_none());
}

#[test]
fn test_defaults_fill_missing_keys() {
    let entry = route(
        RouteSpec::new("(<controller>(/<action>(/<id>)))")
            .default("controller", "welcome")
            .default("action", "index"),
    );

    let params = entry.matches("/", None).unwrap();
    assert_eq!(params["controller"], "Welcome");
    assert_eq!(params["action"], "index");
    assert!(!params.contains_key("id"));

    let params = entry.matches("blog_post/edit/3", None).unwrap();
    assert_eq!(params["controller"], "Blog_Post");
    assert_eq!(params["action"], "edit");
    assert_eq!(params["id"], "3");
}

#[test]
fn test_default_segment_stops_at_separators() {
    let entry = route(RouteSpec::new("file/<name>"));
    assert!(entry.matches("file/report", None).is_some());
    assert!(entry.matches("file/report.pdf", None).is_none());

    let entry = route(RouteSpec::new("file/<name>").regex("name", r"[\w.]+"));
    assert_eq!(entry.matches("file/report.pdf", None).unwrap()["name"], "report.pdf");
}

#[test]
fn test_method_list_gates_match() {
    let entry = route(RouteSpec::new("form/<id>").methods(["POST"]));

    let params = entry.matches("form/1", Some("POST")).unwrap();
    assert_eq!(params["method"], "POST");
    assert_eq!(params["id"], "1");

    assert!(entry.matches("form/1", Some("GET")).is_none());
    assert!(entry.matches("form/1", None).is_none());
}

#[test]
fn test_single_method_default() {
    let entry = route(RouteSpec::new("form").default("method", "PUT"));
    assert!(entry.matches("form", Some("PUT")).is_some());
    assert!(entry.matches("form", Some("put")).is_none());
}

#[test]
fn test_filter_veto_turns_match_into_miss() {
    let entry = route(RouteSpec::new("user/<id>").filter(|_: &RouteEntry, params: &Params, _: &str| {
        if params["id"] == "0" {
            FilterOutcome::Veto
        } else {
            FilterOutcome::Pass
        }
    }));

    assert!(entry.matches("user/0", None).is_none());
    assert_eq!(entry.matches("user/5", None).unwrap()["id"], "5");
}

#[test]
fn test_later_filter_sees_replaced_params() {
    let entry = route(
        RouteSpec::new("user/<id>")
            .filter(|_: &RouteEntry, params: &Params, _: &str| {
                let mut params = params.clone();
                params.insert("id".to_string(), "rewritten".to_string());
                FilterOutcome::Replace(params)
            })
            .filter(|_: &RouteEntry, params: &Params, path: &str| {
                assert_eq!(path, "user/5");
                if params["id"] == "rewritten" {
                    FilterOutcome::Pass
                } else {
                    FilterOutcome::Veto
                }
            }),
    );

    assert_eq!(entry.matches("/user/5", None).unwrap()["id"], "rewritten");
}

#[test]
fn test_named_filters_from_registry() {
    let mut filters = FilterRegistry::new();
    filters.register("no_admin", |_: &RouteEntry, params: &Params, _: &str| {
        if params.get("name").is_some_and(|n| n == "admin") {
            FilterOutcome::Veto
        } else {
            FilterOutcome::Pass
        }
    });

    let registry = Registry::new().with_filters(filters);
    registry
        .register(
            "profile",
            RouteSpec::new("profile/<name>")
                .regex("name", ".+")
                .named_filter("decode")
                .named_filter("no_admin"),
            false,
        )
        .unwrap();

    assert!(registry.find("profile/admin", None).is_none());
    assert_eq!(registry.find("profile/jo%20ann", None).unwrap().params["name"], "jo ann");
}

#[test]
fn test_generate_then_match_round_trip() {
    let entry = route(RouteSpec::new("archive/<year>(/<month>(/<day>))").regex("year", r"\d{4}"));
    let params = common::params(&[("year", "2024"), ("month", "05")]);

    let path = entry.generate(&params).unwrap();
    assert_eq!(path, "archive/2024/05");
    assert_eq!(entry.matches(&path, None).unwrap(), params);
}
