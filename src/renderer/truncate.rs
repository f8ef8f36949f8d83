use tracing::debug;

const ELLIPSIS: &str = "...";

pub fn count_nonblank(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

/// Cuts the middle out of `text` when it has more than `max_chars` non-blank
/// characters, keeping about `max_chars / 2` of them on each side.
///
/// When the cut spans several lines, the right side is extended back to the
/// start of its line so the kept tail begins with a line break instead of
/// half a token.
pub fn truncate_nonblank(text: &str, max_chars: usize) -> String {
    let nonblank = count_nonblank(text);
    if nonblank <= max_chars {
        return text.to_string();
    }

    let keep = max_chars / 2;
    let left = prefix_end(text, keep);
    let mut right = suffix_start(text, keep).max(left);

    if text[left..right].contains('\n') {
        if let Some(newline) = text[..right].rfind('\n') {
            right = newline;
        }
    }

    let middle = &text[left..right];
    if middle.chars().count() <= ELLIPSIS.len() {
        return text.to_string();
    }

    debug!(
        nonblank,
        budget = max_chars,
        dropped = middle.len(),
        "truncating representation"
    );
    format!("{}{}{}", &text[..left], ELLIPSIS, &text[right..])
}

/// Byte offset just past the `n`-th non-blank character.
fn prefix_end(text: &str, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    text.char_indices()
        .filter(|(_, c)| !c.is_whitespace())
        .nth(n - 1)
        .map_or(text.len(), |(index, c)| index + c.len_utf8())
}

/// Byte offset of the `n`-th non-blank character counted from the end.
fn suffix_start(text: &str, n: usize) -> usize {
    if n == 0 {
        return text.len();
    }
    text.char_indices()
        .rev()
        .filter(|(_, c)| !c.is_whitespace())
        .nth(n - 1)
        .map_or(0, |(index, _)| index)
}
