use anyhow::anyhow;
use dom::Document;
use router::{
    MemorySource, NavOutcome, PageContext, RouteTable, Router,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use store::{MemoryStorage, Store};
use tokio::runtime::Runtime;
use url::Url;

const HOST_PAGE: &str = "<html><body>\
<nav><a href=\"/\" data-internal-link>Home</a></nav>\
<main id=\"app-content\"></main>\
</body></html>";

const HOME_FRAGMENT: &str = "<h1>Marketplace</h1><p>Shop local.</p>";
const ABOUT_FRAGMENT: &str = "<h1>About us</h1>";
const NOT_FOUND_FRAGMENT: &str = "<h1>404</h1><p>Nothing here.</p>";

fn base() -> Url {
    Url::parse("file:///pages/").expect("base url")
}

fn full_source() -> Arc<MemorySource> {
    Arc::new(
        MemorySource::new()
            .with("/pages/index.html", HOME_FRAGMENT)
            .with("/pages/about.html", ABOUT_FRAGMENT)
            .with("/pages/404.html", NOT_FOUND_FRAGMENT),
    )
}

fn table(mount_count: &Arc<AtomicUsize>) -> RouteTable {
    let counter = Arc::clone(mount_count);
    RouteTable::builder()
        .route(
            "/",
            "index.html",
            Some(Box::new(move |_ctx| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })),
        )
        .route("/about.html", "about.html", None)
        .fallback("404.html", None)
        .build()
        .expect("valid table")
}

struct Fixture {
    document: Document,
    store: Store,
    storage: MemoryStorage,
    router: Router,
}

impl Fixture {
    fn new(source: Arc<MemorySource>, mount_count: &Arc<AtomicUsize>) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            document: Document::parse(HOST_PAGE),
            store: Store::new(),
            storage: MemoryStorage::new(),
            router: Router::new(table(mount_count), base(), source, "/"),
        }
    }

    fn region_text(&self) -> String {
        let region = self
            .document
            .element_by_id("app-content")
            .expect("content region");
        self.document.text_content(region)
    }
}

#[test]
fn mounts_registered_route_and_runs_initializer_once() {
    let rt = Runtime::new().expect("runtime");
    let mounts = Arc::new(AtomicUsize::new(0));
    let mut fx = Fixture::new(full_source(), &mounts);

    let Fixture { document, store, storage, router } = &mut fx;
    let mut ctx = PageContext {
        document,
        store,
        storage: &mut *storage,
    };
    let outcome = rt
        .block_on(router.navigate_to(&mut ctx, "/", None))
        .expect("navigation");

    assert_eq!(outcome, NavOutcome::Mounted { path: "/".into() });
    assert_eq!(mounts.load(Ordering::SeqCst), 1);
    assert!(fx.region_text().contains("Shop local."));
}

#[test]
fn unknown_path_mounts_fallback_fragment() {
    let rt = Runtime::new().expect("runtime");
    let mounts = Arc::new(AtomicUsize::new(0));
    let mut fx = Fixture::new(full_source(), &mounts);

    let Fixture { document, store, storage, router } = &mut fx;
    let mut ctx = PageContext { document, store, storage: &mut *storage };
    let outcome = rt
        .block_on(router.navigate_to(&mut ctx, "/missing", None))
        .expect("navigation");

    assert_eq!(outcome, NavOutcome::Mounted { path: "/missing".into() });
    assert!(fx.region_text().contains("Nothing here."));
    assert_eq!(mounts.load(Ordering::SeqCst), 0, "fallback has no initializer");
}

#[test]
fn each_navigation_pushes_exactly_one_history_entry() {
    let rt = Runtime::new().expect("runtime");
    let mounts = Arc::new(AtomicUsize::new(0));
    let mut fx = Fixture::new(full_source(), &mounts);

    assert_eq!(fx.router.history().len(), 1);
    let Fixture { document, store, storage, router } = &mut fx;
    let mut ctx = PageContext { document, store, storage: &mut *storage };
    rt.block_on(router.navigate_to(&mut ctx, "/", None)).expect("nav");
    rt.block_on(router.navigate_to(&mut ctx, "/about.html", None)).expect("nav");

    assert_eq!(router.history().len(), 3);
    assert_eq!(router.history().current_path(), "/about.html");
}

#[test]
fn fetch_failure_redirects_to_fallback_and_pushes_history() {
    let rt = Runtime::new().expect("runtime");
    // The about fragment is withheld, so its fetch fails.
    let source = Arc::new(
        MemorySource::new()
            .with("/pages/index.html", HOME_FRAGMENT)
            .with("/pages/404.html", NOT_FOUND_FRAGMENT),
    );
    let mounts = Arc::new(AtomicUsize::new(0));
    let mut fx = Fixture::new(source, &mounts);

    let Fixture { document, store, storage, router } = &mut fx;
    let mut ctx = PageContext { document, store, storage: &mut *storage };
    let outcome = rt
        .block_on(router.navigate_to(&mut ctx, "/about.html", None))
        .expect("navigation");

    assert_eq!(outcome, NavOutcome::Mounted { path: "/404".into() });
    assert_eq!(router.history().current_path(), "/404");
    assert_eq!(router.history().len(), 3, "failed path plus redirect entry");
    assert_eq!(router.counters().fetch_failures, 1);
    assert!(fx.region_text().contains("Nothing here."));
}

#[test]
fn unfetchable_fallback_mounts_builtin_markup() {
    let rt = Runtime::new().expect("runtime");
    let source = Arc::new(MemorySource::new().with("/pages/index.html", HOME_FRAGMENT));
    let mounts = Arc::new(AtomicUsize::new(0));
    let mut fx = Fixture::new(source, &mounts);

    let Fixture { document, store, storage, router } = &mut fx;
    let mut ctx = PageContext { document, store, storage: &mut *storage };
    let outcome = rt
        .block_on(router.navigate_to(&mut ctx, "/about.html", None))
        .expect("navigation");

    assert_eq!(outcome, NavOutcome::Recovered);
    assert_eq!(router.counters().fetch_failures, 2);
    assert_eq!(router.counters().fallback_mounts, 1);
    assert!(fx.region_text().contains("Page not found"));
}

#[test]
fn handle_location_always_refetches() {
    let rt = Runtime::new().expect("runtime");
    let source = full_source();
    let mounts = Arc::new(AtomicUsize::new(0));
    let mut fx = Fixture::new(Arc::clone(&source), &mounts);

    let Fixture { document, store, storage, router } = &mut fx;
    let mut ctx = PageContext { document, store, storage: &mut *storage };
    rt.block_on(router.navigate_to(&mut ctx, "/", None)).expect("nav");
    assert_eq!(source.fetch_count(), 1);

    rt.block_on(router.handle_location(&mut ctx)).expect("re-render");
    rt.block_on(router.handle_location(&mut ctx)).expect("re-render");
    assert_eq!(source.fetch_count(), 3, "no fragment caching");
    assert_eq!(mounts.load(Ordering::SeqCst), 3, "initializer runs per mount");
    assert!(fx.region_text().contains("Shop local."));
}

#[test]
fn later_navigation_wins_when_completions_interleave() {
    let rt = Runtime::new().expect("runtime");
    let mounts = Arc::new(AtomicUsize::new(0));
    let mut fx = Fixture::new(full_source(), &mounts);

    let Fixture { document, store, storage, router } = &mut fx;
    let mut ctx = PageContext { document, store, storage: &mut *storage };

    // Two navigations begin before either fetch completes; the first
    // completion to arrive is the later navigation's.
    let first = router.navigate("/", None);
    let second = router.navigate("/about.html", None);
    let first_loaded = rt.block_on(router.load(&first));
    let second_loaded = rt.block_on(router.load(&second));

    let step = router.finish(&mut ctx, &second, second_loaded).expect("finish");
    assert!(matches!(step, router::NavStep::Mounted { .. }));

    let step = router.finish(&mut ctx, &first, first_loaded).expect("finish");
    assert!(matches!(step, router::NavStep::Superseded { .. }));
    assert_eq!(router.counters().superseded, 1);

    // The stale completion did not clobber the mounted content.
    assert!(fx.region_text().contains("About us"));
    assert_eq!(mounts.load(Ordering::SeqCst), 0, "stale initializer never ran");
}

#[test]
fn back_and_forward_rerender_adjacent_entries() {
    let rt = Runtime::new().expect("runtime");
    let mounts = Arc::new(AtomicUsize::new(0));
    let mut fx = Fixture::new(full_source(), &mounts);

    {
        let Fixture { document, store, storage, router } = &mut fx;
        let mut ctx = PageContext { document, store, storage: &mut *storage };
        rt.block_on(router.navigate_to(&mut ctx, "/", None)).expect("nav");
        rt.block_on(router.navigate_to(&mut ctx, "/about.html", None)).expect("nav");

        let went_back = rt.block_on(router.back(&mut ctx)).expect("back");
        assert_eq!(went_back, Some(NavOutcome::Mounted { path: "/".into() }));
    }
    assert!(fx.region_text().contains("Shop local."));

    {
        let Fixture { document, store, storage, router } = &mut fx;
        let mut ctx = PageContext { document, store, storage: &mut *storage };
        let went_forward = rt.block_on(router.forward(&mut ctx)).expect("forward");
        assert_eq!(
            went_forward,
            Some(NavOutcome::Mounted { path: "/about.html".into() })
        );
        let nowhere = rt.block_on(router.forward(&mut ctx)).expect("forward");
        assert_eq!(nowhere, None);
    }
    assert!(fx.region_text().contains("About us"));
}

#[test]
fn initializer_errors_propagate_to_the_caller() {
    let rt = Runtime::new().expect("runtime");
    let table = RouteTable::builder()
        .route(
            "/",
            "index.html",
            Some(Box::new(|_ctx| Err(anyhow!("initializer exploded")))),
        )
        .fallback("404.html", None)
        .build()
        .expect("valid table");
    let mut document = Document::parse(HOST_PAGE);
    let mut store = Store::new();
    let mut storage = MemoryStorage::new();
    let mut router = Router::new(table, base(), full_source(), "/");

    let mut ctx = PageContext {
        document: &mut document,
        store: &mut store,
        storage: &mut storage,
    };
    let err = rt
        .block_on(router.navigate_to(&mut ctx, "/", None))
        .unwrap_err();
    assert!(err.to_string().contains("initializer exploded"));
}
