//! Source path shortening for display
//!
//! Each cut marker is matched as a whole path component, including the
//! first component of a relative path such as the ones `file!()` produces.
//! When it occurs, everything up to and including its last occurrence is
//! dropped. Markers are applied in order, each on the previous result.

use std::path::MAIN_SEPARATOR;

/// Shorten `path` using the ordered `cuts`
pub fn shorten(path: &str, cuts: &[String]) -> String {
    let mut shortened = path.to_string();
    for cut in cuts {
        if cut.is_empty() {
            continue;
        }
        let marker = format!("{sep}{cut}{sep}", sep = MAIN_SEPARATOR);
        let rest = match shortened.rsplit_once(&marker) {
            Some((_, rest)) => Some(rest),
            None => shortened
                .strip_prefix(cut.as_str())
                .and_then(|tail| tail.strip_prefix(MAIN_SEPARATOR)),
        };
        if let Some(rest) = rest.filter(|rest| !rest.is_empty()) {
            shortened = rest.to_string();
        }
    }
    shortened
}
