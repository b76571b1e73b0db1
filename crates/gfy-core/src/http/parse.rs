//! Parse raw header lines captured from libcurl into (name, value) pairs.

/// Collects the headers of the final response.
///
/// libcurl reports the headers of every hop when following redirects; a new
/// status line starts a new response, so earlier headers are discarded.
pub(crate) fn parse_headers(lines: &[String]) -> Vec<(String, String)> {
    let mut headers = Vec::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            headers.clear();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            headers.push((name.to_string(), value.trim().to_string()));
        }
    }

    headers
}
