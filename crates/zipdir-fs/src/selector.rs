/// Canonical form of a request selector: one leading `/`, no trailing `/`.
///
/// The empty selector is the root, `/`.
pub fn normalize_selector(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Prefixes of `selector` from the full selector up to the root, removing
/// one segment per step, each paired with the suffix it leaves behind.
///
/// `/a/b/c` yields `(/a/b/c, None)`, `(/a/b, Some(c))`, `(/a, Some(b/c))`
/// and `(/, Some(a/b/c))`.
pub fn candidate_prefixes(selector: &str) -> Vec<(String, Option<String>)> {
    let segments: Vec<&str> = selector.split('/').filter(|s| !s.is_empty()).collect();

    (0..=segments.len())
        .rev()
        .map(|keep| {
            let base = format!("/{}", segments[..keep].join("/"));
            let rest = &segments[keep..];
            let remainder = (!rest.is_empty()).then(|| rest.join("/"));
            (base, remainder)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_selector() {
        assert_eq!(normalize_selector(""), "/");
        assert_eq!(normalize_selector("/"), "/");
        assert_eq!(normalize_selector("foo/bar/"), "/foo/bar");
        assert_eq!(normalize_selector("/foo.zip"), "/foo.zip");
        assert_eq!(normalize_selector(" /x \r\n"), "/x");
    }

    #[test]
    fn test_candidate_prefixes_walk_to_root() {
        let candidates = candidate_prefixes("/a.zip/inner.zip/file");
        assert_eq!(
            candidates,
            vec![
                ("/a.zip/inner.zip/file".to_string(), None),
                (
                    "/a.zip/inner.zip".to_string(),
                    Some("file".to_string())
                ),
                (
                    "/a.zip".to_string(),
                    Some("inner.zip/file".to_string())
                ),
                ("/".to_string(), Some("a.zip/inner.zip/file".to_string())),
            ]
        );
    }

    #[test]
    fn test_candidate_prefixes_of_root() {
        assert_eq!(candidate_prefixes("/"), vec![("/".to_string(), None)]);
    }
}
