//! Library path checks.

use super::CheckResult;
use crate::models::config::PathsConfig;
use std::path::Path;

/// Check the library and unorganized folders exist.
pub fn check(paths: &PathsConfig) -> Vec<CheckResult> {
    vec![
        check_dir("Library", &paths.library),
        check_dir("Unorganized", &paths.unorganized),
    ]
}

fn check_dir(name: &str, path: &Path) -> CheckResult {
    if path.is_dir() {
        CheckResult::ok(name, &path.display().to_string())
    } else {
        CheckResult::fail(
            name,
            &format!("{} is not a directory", path.display()),
            "Create it or fix [paths] in the config",
        )
    }
}
