//! JSON Pointer (RFC 6901) helpers used by [`Document`](crate::Document).

/// Unescapes one pointer token.
///
/// Per RFC 6901, `~1` becomes `/` and `~0` becomes `~`.
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    // Order matters: ~1 must be replaced before ~0
    component.replace("~1", "/").replace("~0", "~")
}

/// Escapes one pointer token.
///
/// Per RFC 6901, `/` becomes `~1` and `~` becomes `~0`.
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    // Order matters: ~ must be escaped before /
    component.replace('~', "~0").replace('/', "~1")
}

/// Splits a pointer string into unescaped tokens.
///
/// The empty pointer addresses the document root and yields no tokens. A
/// leading `/` is stripped; a pointer without one is accepted as relative.
/// No further validation is performed — a malformed path is the caller's
/// responsibility and simply fails to resolve.
pub fn parse_pointer(pointer: &str) -> Vec<String> {
    if pointer.is_empty() {
        return Vec::new();
    }
    let body = pointer.strip_prefix('/').unwrap_or(pointer);
    body.split('/').map(unescape_component).collect()
}

/// Formats tokens back into an absolute pointer string.
pub fn format_pointer(path: &[String]) -> String {
    let mut out = String::new();
    for component in path {
        out.push('/');
        out.push_str(&escape_component(component));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_root_and_single_tokens() {
        assert_eq!(parse_pointer(""), Vec::<String>::new());
        assert_eq!(parse_pointer("/"), vec![""]);
        assert_eq!(parse_pointer("/a/b/3/c"), vec!["a", "b", "3", "c"]);
    }

    #[test]
    fn parse_accepts_relative_pointers() {
        assert_eq!(parse_pointer("a/b"), vec!["a", "b"]);
    }

    #[test]
    fn escapes_round_trip() {
        for pointer in ["/a~0b", "/c~1d", "/a~0b/c~1d/1", "/x//y"] {
            let path = parse_pointer(pointer);
            assert_eq!(format_pointer(&path), pointer, "round trip for {pointer:?}");
        }
    }

    #[test]
    fn unescape_order_is_tilde_one_first() {
        assert_eq!(unescape_component("~01"), "~1");
        assert_eq!(escape_component("~1"), "~01");
    }
}
