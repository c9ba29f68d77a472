use dom::Document;

const HOST_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Bazaar</title></head>
<body>
  <nav>
    <a href="/" data-internal-link>Home</a>
    <a href="https://example.com">Elsewhere</a>
  </nav>
  <main id="app-content"><p>Loading…</p></main>
</body>
</html>"#;

#[test]
fn parses_host_page_and_finds_region_by_id() {
    let doc = Document::parse(HOST_PAGE);
    let region = doc.element_by_id("app-content").expect("content region");
    assert_eq!(doc.tag(region), Some("main"));
    assert!(doc.text_content(region).contains("Loading"));
}

#[test]
fn attributes_round_trip() {
    let mut doc = Document::parse(HOST_PAGE);
    let region = doc.element_by_id("app-content").expect("content region");
    assert_eq!(doc.attr(region, "id"), Some("app-content"));
    assert_eq!(doc.attr(region, "missing"), None);

    doc.set_attr(region, "data-page", "home");
    assert_eq!(doc.attr(region, "data-page"), Some("home"));
    doc.set_attr(region, "data-page", "login");
    assert_eq!(doc.attr(region, "data-page"), Some("login"));
}

#[test]
fn set_inner_html_replaces_children_wholesale() {
    let mut doc = Document::parse(HOST_PAGE);
    let region = doc.element_by_id("app-content").expect("content region");

    doc.set_inner_html(region, "<h1>Welcome</h1><p id=\"tagline\">Shop local.</p>");
    let text = doc.text_content(region);
    assert!(text.contains("Welcome"));
    assert!(text.contains("Shop local."));
    assert!(!text.contains("Loading"), "old content must be gone");
    assert!(doc.element_by_id("tagline").is_some());

    // A second swap drops the first fragment entirely.
    doc.set_inner_html(region, "<p>Nothing here.</p>");
    assert!(doc.element_by_id("tagline").is_none());
    assert!(doc.text_content(region).contains("Nothing here."));
}

#[test]
fn closest_walks_ancestors_including_self() {
    let doc = Document::parse(HOST_PAGE);
    let anchor = doc.first_by_tag("a").expect("nav anchor");
    let hit = doc.closest(anchor, |d, n| d.tag(n) == Some("nav"));
    assert!(hit.is_some());
    let selfhit = doc.closest(anchor, |d, n| d.attr(n, "data-internal-link").is_some());
    assert_eq!(selfhit, Some(anchor));
    assert!(doc.closest(anchor, |d, n| d.tag(n) == Some("footer")).is_none());
}

#[test]
fn serializes_mounted_markup() {
    let mut doc = Document::parse(HOST_PAGE);
    let region = doc.element_by_id("app-content").expect("content region");
    doc.set_inner_html(region, "<ul><li>One</li><li>Two</li></ul>");
    let markup = doc.inner_markup(region);
    assert_eq!(markup, "<ul><li>One</li><li>Two</li></ul>");

    let outer = doc.markup_of(region);
    assert!(outer.starts_with("<main"));
    assert!(outer.ends_with("</main>"));
}

#[test]
fn text_is_escaped_on_serialization() {
    let mut doc = Document::new();
    let root = doc.root();
    let div = doc.create_element("div");
    doc.append(root, div);
    let text = doc.create_text("a < b & c");
    doc.append(div, text);
    assert_eq!(doc.markup_of(div), "<div>a &lt; b &amp; c</div>");
}

#[test]
fn set_text_and_remove() {
    let mut doc = Document::parse(HOST_PAGE);
    let region = doc.element_by_id("app-content").expect("content region");
    doc.set_text(region, "plain");
    assert_eq!(doc.text_content(region).trim(), "plain");

    let nav = doc.first_by_tag("nav").expect("nav");
    doc.remove(nav);
    assert!(doc.first_by_tag("nav").is_none());
}
