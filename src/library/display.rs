use std::borrow::Cow;

/// Percent-decode `raw` for display. Invalid sequences are shown verbatim.
pub fn decode_for_display(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(Cow::Borrowed(s)) => s.to_string(),
        Ok(Cow::Owned(s)) => s,
        Err(_) => raw.to_string(),
    }
}

/// Minimal HTML entity unescaping for attribute values found in listings.
pub(super) fn unescape_attr(value: &str) -> Cow<'_, str> {
    if !value.contains('&') {
        return Cow::Borrowed(value);
    }
    Cow::Owned(
        value
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&#x27;", "'")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&amp;", "&"),
    )
}
