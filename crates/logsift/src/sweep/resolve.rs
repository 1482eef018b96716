//! Target path resolution.

use super::types::{AccessRegistry, ScanTarget};

/// Expand a target's configured paths into the concrete directories to scan.
///
/// Server targets name their directories outright and pass through unchanged.
/// Application targets give paths relative to each host root registered for
/// their access class, so the result is the full cross product: for each
/// configured path, one entry per host root, concatenated as `root + path`.
///
/// An unknown access class or an empty path list yields an empty result.
pub fn resolve_paths(target: &ScanTarget, access: &AccessRegistry) -> Vec<String> {
    if target.kind.is_server() {
        return target.paths.clone();
    }

    let roots = access.roots(&target.access);
    let mut resolved = Vec::with_capacity(roots.len() * target.paths.len());
    for path in &target.paths {
        for root in roots {
            resolved.push(format!("{root}{path}"));
        }
    }
    resolved
}
