//! Parse raw response header lines collected from libcurl.

/// Status code from an HTTP status line (`HTTP/1.1 200 OK`, `HTTP/2 404`).
pub(crate) fn status_code(line: &str) -> Option<u32> {
    let mut parts = line.split_whitespace();
    let proto = parts.next()?;
    if !proto.starts_with("HTTP/") {
        return None;
    }
    parts.next()?.parse().ok()
}

/// Value of the `Location` header of the last response, if any.
pub(crate) fn location(lines: &[String]) -> Option<String> {
    lines.iter().rev().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if name.trim().eq_ignore_ascii_case("location") {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        } else {
            None
        }
    })
}
