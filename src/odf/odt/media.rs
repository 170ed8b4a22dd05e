//! Image reference screening.
//!
//! Frame hrefs name entries inside the package, but nothing stops a
//! hostile producer from writing traversal sequences or platform paths
//! into them. Every href must pass [`is_safe_image_path`] before the
//! archive is queried at all.

use aho_corasick::AhoCorasick;
use memchr::memchr;
use once_cell::sync::Lazy;

/// Default cap on the decompressed size of a single image entry.
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024; // 10 MiB

/// Substrings that mark a path as pointing at platform directories.
/// Matched case-insensitively anywhere in the path.
static PLATFORM_MARKERS: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(["system", "windows"])
        .expect("platform marker patterns are valid")
});

/// Returns `true` if an image href is safe to use as a package entry name.
///
/// Rejected outright:
///
/// - empty paths
/// - any occurrence of `..` (traversal, in any position)
/// - any backslash (no legitimate package uses them; they only appear in
///   smuggled Windows paths)
/// - rooted paths (leading `/`, or a drive designator like `C:`)
/// - anything containing `system` or `windows` in any case
///
/// The check is over-broad on purpose. A false rejection costs one skipped
/// image; probing outside the package must stay impossible.
pub fn is_safe_image_path(path: &str) -> bool {
    if path.is_empty() {
        return false;
    }
    if path.contains("..") {
        return false;
    }
    let bytes = path.as_bytes();
    if memchr(b'\\', bytes).is_some() {
        return false;
    }
    if bytes[0] == b'/' {
        return false;
    }
    if bytes.get(1) == Some(&b':') {
        return false;
    }
    if PLATFORM_MARKERS.is_match(path) {
        return false;
    }
    true
}
