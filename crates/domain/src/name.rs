//! Domain-name helpers used by the cache's poisoning defense.

/// Normalize a domain name for comparison and keying: lowercase, trailing
/// dot stripped. The DNS root keeps its single dot so it stays non-empty.
pub fn normalize_name(name: &str) -> String {
    let trimmed = name.trim_end_matches('.');
    if trimmed.is_empty() {
        return ".".to_string();
    }
    trimmed.to_ascii_lowercase()
}

/// Check whether `name` is equal to, or a strict subdomain of, `layer`.
///
/// Comparison is case-insensitive and ignores trailing dots. The root
/// layer (`"."` or `""`) is above every name.
///
/// Examples:
/// - `name_is_beneath("ns1.example.com", "example.com")` → true
/// - `name_is_beneath("example.com", "example.com")` → true
/// - `name_is_beneath("badexample.com", "example.com")` → false
pub fn name_is_beneath(name: &str, layer: &str) -> bool {
    let name = normalize_name(name);
    let layer = normalize_name(layer);

    if layer == "." {
        return true;
    }
    if name == layer {
        return true;
    }
    name.ends_with(&format!(".{}", layer))
}
