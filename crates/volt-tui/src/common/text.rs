//! Display-width aware text helpers.

use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Shortens `text` to at most `max_width` terminal columns, ending in `…`
/// when anything was cut.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= 1 {
        return "…".to_string();
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Strips escape bytes and expands tabs to four spaces.
///
/// Model output is untrusted; a raw `\x1b` would let it drive the terminal.
pub fn sanitize_for_display(s: &str) -> Cow<'_, str> {
    if s.contains(['\x1b', '\t']) {
        Cow::Owned(s.replace('\x1b', "").replace('\t', "    "))
    } else {
        Cow::Borrowed(s)
    }
}
