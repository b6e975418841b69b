/// Strips HTML tags from feed summary content, returning readable text.
///
/// Status feeds routinely wrap incident details in `<p>`, `<strong>`,
/// and similar markup. This removes anything between `<` and the next
/// `>`, decodes the handful of entities that show up in practice, and
/// trims surrounding whitespace.
///
/// An unmatched `<` with no closing `>` is kept verbatim — it is more
/// likely literal text (e.g. "latency < 100ms") than a truncated tag.
///
/// # Examples
///
/// ```
/// use statuswatch::util::strip_html;
///
/// assert_eq!(strip_html("<p>All systems <b>go</b></p>"), "All systems go");
/// assert_eq!(strip_html("5 &lt; 10"), "5 < 10");
/// ```
pub fn strip_html(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(open) = rest.find('<') {
        text.push_str(&rest[..open]);
        match rest[open..].find('>') {
            Some(close) => rest = &rest[open + close + 1..],
            None => {
                // No closing bracket in the remainder; treat as literal text
                text.push_str(&rest[open..]);
                rest = "";
                break;
            }
        }
    }
    text.push_str(rest);

    decode_entities(&text).trim().to_string()
}

/// Decodes the small set of entities common in feed summaries.
///
/// `&amp;` is decoded last so that double-encoded sequences like
/// `&amp;lt;` come out as the literal text `&lt;` rather than `<`.
fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(strip_html("Investigating elevated errors"), "Investigating elevated errors");
    }

    #[test]
    fn test_tags_removed() {
        assert_eq!(
            strip_html("<p>Resolved: <strong>API</strong> degradation</p>"),
            "Resolved: API degradation"
        );
    }

    #[test]
    fn test_self_closing_and_attributes() {
        assert_eq!(
            strip_html(r#"Down<br/>Up <a href="https://example.com">status page</a>"#),
            "DownUp status page"
        );
    }

    #[test]
    fn test_unclosed_bracket_kept_verbatim() {
        assert_eq!(strip_html("latency < 100ms"), "latency < 100ms");
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(strip_html("a &amp; b &lt;= c&nbsp;&#39;ok&#39;"), "a & b <= c 'ok'");
    }

    #[test]
    fn test_double_encoded_ampersand_stays_literal() {
        assert_eq!(strip_html("&amp;lt;not a tag&amp;gt;"), "&lt;not a tag&gt;");
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(strip_html("  <p> padded </p>  "), "padded");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn test_only_tags_yields_empty() {
        assert_eq!(strip_html("<div><span></span></div>"), "");
    }
}
