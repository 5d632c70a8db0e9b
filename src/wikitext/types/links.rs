/*!
Internal `[[target|label]]` link reading.

Element groups (`element0 = [[Fire]] 12 [[Ice]] 8`) are keyed by the link
target, so only the target is kept; the label is skipped. Works on UTF-8
character boundaries.
*/

/// Read the internal link `[[...]]` starting at `start` in `input`.
///
/// Returns `Some((consumed_bytes, target))`, or `None` if the link is empty or
/// never closed.
///
/// Nested `[[` / `]]` pairs (file links with a linked caption) are counted so
/// the outer link closes at the right place.
pub fn parse_internal_link_at(input: &str, start: usize) -> Option<(usize, String)> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    if start + 1 >= len || bytes[start] != b'[' || bytes[start + 1] != b'[' {
        return None;
    }

    let mut idx = start + 2;
    let mut depth: usize = 1;
    let mut content = String::new();

    while idx < len {
        if idx + 1 < len && bytes[idx] == b'[' && bytes[idx + 1] == b'[' {
            depth += 1;
            content.push_str("[[");
            idx += 2;
            continue;
        }
        if idx + 1 < len && bytes[idx] == b']' && bytes[idx + 1] == b']' {
            depth -= 1;
            idx += 2;
            if depth == 0 {
                break;
            }
            content.push_str("]]");
            continue;
        }
        let ch = input[idx..].chars().next()?;
        content.push(ch);
        idx += ch.len_utf8();
    }

    if depth != 0 || content.trim().is_empty() {
        return None;
    }

    // first '|' separates target and label
    let target = content
        .split_once('|')
        .map_or(content.as_str(), |(target, _)| target)
        .trim()
        .to_string();

    Some((idx - start, target))
}
