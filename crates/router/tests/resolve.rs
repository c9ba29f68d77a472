use router::{FALLBACK_KEY, RouteTable};

fn sample_table() -> RouteTable {
    RouteTable::builder()
        .route("/", "index.html", None)
        .route("/about.html", "about.html", None)
        .fallback("404.html", None)
        .build()
        .expect("valid table")
}

#[test]
fn resolves_registered_paths_exactly() {
    let table = sample_table();
    assert_eq!(table.resolve("/").fragment, "index.html");
    assert_eq!(table.resolve("/about.html").fragment, "about.html");
    assert_eq!(table.len(), 2);
}

#[test]
fn unknown_paths_fall_back() {
    let table = sample_table();
    let route = table.resolve("/missing");
    assert_eq!(route.fragment, "404.html");
    assert_eq!(route.path, FALLBACK_KEY);
}

#[test]
fn no_normalization_of_trailing_slash_or_query() {
    let table = sample_table();
    assert_eq!(table.resolve("/about.html/").fragment, "404.html");
    assert_eq!(table.resolve("/about.html?tab=1").fragment, "404.html");
    assert_eq!(table.resolve("/About.html").fragment, "404.html");
}

#[test]
fn duplicate_paths_are_rejected() {
    let err = RouteTable::builder()
        .route("/", "index.html", None)
        .route("/", "other.html", None)
        .fallback("404.html", None)
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("duplicate route"));
}

#[test]
fn missing_fallback_is_rejected() {
    let err = RouteTable::builder()
        .route("/", "index.html", None)
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("fallback"));
}

#[test]
fn fallback_key_is_reserved() {
    let err = RouteTable::builder()
        .route(FALLBACK_KEY, "sneaky.html", None)
        .fallback("404.html", None)
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("reserved"));
}
