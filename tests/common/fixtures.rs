//! Response document fixtures.
//!
//! Fixtures live under `tests/fixtures/responses/` as they were captured
//! from the XML API, and are cached after the first load.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

static FIXTURE_CACHE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();

/// Load a response fixture by file stem, e.g. `"interface_import"`.
pub fn load_response(name: &str) -> String {
    let cache = FIXTURE_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut guard = cache.lock().unwrap();

    if let Some(cached) = guard.get(name) {
        return cached.clone();
    }

    let path = format!(
        "{}/tests/fixtures/responses/{}.xml",
        env!("CARGO_MANIFEST_DIR"),
        name
    );
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", path));
    guard.insert(name.to_string(), content.clone());
    content
}

/// Render a success document listing `members` under `container`.
pub fn import_response(container: &str, members: &[&str]) -> String {
    let body: String = members
        .iter()
        .map(|m| format!("<member>{}</member>", m))
        .collect();
    format!(
        r#"<response status="success"><result total-count="1" count="1"><{c}>{b}</{c}></result></response>"#,
        c = container,
        b = body
    )
}
