//! Fixture lookup shared by the unionbuf crates' tests.

use std::path::{Path, PathBuf};

const FIXTURE_DIR: &str = "fixtures";

/// Directory holding the JSON union descriptions.
///
/// Found by walking up from this crate's manifest until a `fixtures/` directory appears,
/// so it resolves the same from every workspace member.
pub fn fixtures_dir() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.ancestors()
		.map(|dir| dir.join(FIXTURE_DIR))
		.find(|dir| dir.is_dir())
		.unwrap_or_else(|| panic!("no {FIXTURE_DIR}/ directory above {}", manifest_dir.display()))
}

/// Path of one description under the fixture directory.
pub fn fixture_path(name: &str) -> PathBuf {
	fixtures_dir().join(name)
}

/// Description text, for tests that feed `Schema::from_json` directly.
pub fn fixture_text(name: &str) -> String {
	let path = fixture_path(name);
	std::fs::read_to_string(&path).unwrap_or_else(|err| panic!("fixture {} should be readable: {err}", path.display()))
}

/// Description parsed as untyped JSON.
pub fn fixture_json(name: &str) -> serde_json::Value {
	serde_json::from_str(&fixture_text(name)).unwrap_or_else(|err| panic!("fixture {name} should be valid json: {err}"))
}
