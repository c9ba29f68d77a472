/// Telemetry utilities for formatting and emitting navigation counters.
/// Kept independent of router internals; callers pass counters explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavCounters {
    pub navigations: u64,
    pub mounts: u64,
    pub fetch_failures: u64,
    pub superseded: u64,
    pub fallback_mounts: u64,
}

pub fn nav_counters_json(counters: &NavCounters) -> String {
    format!(
        "{{\"navigations\":{},\"mounts\":{},\"fetch_failures\":{},\"superseded\":{},\"fallback_mounts\":{}}}",
        counters.navigations,
        counters.mounts,
        counters.fetch_failures,
        counters.superseded,
        counters.fallback_mounts
    )
}

pub fn maybe_emit(enabled: bool, json_line: &str) {
    if enabled {
        println!("{json_line}");
    }
}
