//! Marker Extraction
//!
//! The external process may announce its result inline as
//! `ANALYSIS_JSON:<json>` anywhere in stdout or stderr.

/// Sentinel token preceding an inline JSON payload.
pub const ANALYSIS_MARKER: &str = "ANALYSIS_JSON:";

/// Extract the payload following the last marker occurrence.
///
/// Only the first line after the marker is returned; later emissions of the
/// marker override earlier ones.
pub fn extract_marked_json(text: &str) -> Option<&str> {
    let marker_index = text.rfind(ANALYSIS_MARKER)?;
    let after_marker = text[marker_index + ANALYSIS_MARKER.len()..].trim();
    if after_marker.is_empty() {
        return None;
    }

    let first_line = after_marker
        .split('\n')
        .next()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .unwrap_or_default();

    (!first_line.is_empty()).then_some(first_line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_first_line_only() {
        let text = "...\nANALYSIS_JSON: {\"a\":1}\nextra line\n";
        assert_eq!(extract_marked_json(text), Some("{\"a\":1}"));
    }

    #[test]
    fn test_extract_uses_last_marker() {
        let text = "ANALYSIS_JSON: {\"stage\":1}\nprogress...\nANALYSIS_JSON: {\"stage\":2}\n";
        assert_eq!(extract_marked_json(text), Some("{\"stage\":2}"));
    }

    #[test]
    fn test_extract_handles_crlf() {
        let text = "ANALYSIS_JSON:{\"a\":1}\r\ntrailer\r\n";
        assert_eq!(extract_marked_json(text), Some("{\"a\":1}"));
    }

    #[test]
    fn test_extract_absent_or_empty() {
        assert_eq!(extract_marked_json(""), None);
        assert_eq!(extract_marked_json("no marker here"), None);
        assert_eq!(extract_marked_json("ANALYSIS_JSON:   \n\n"), None);
    }

    #[test]
    fn test_extract_payload_on_following_line() {
        // Leading whitespace (including newlines) after the marker is trimmed.
        let text = "ANALYSIS_JSON:\n{\"late\":true}\nmore";
        assert_eq!(extract_marked_json(text), Some("{\"late\":true}"));
    }
}
