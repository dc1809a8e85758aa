use std::ops::Range;

pub const BINARY_CHECK_SIZE: usize = 8000;

/// Decodes UTF-8, dropping undecodable byte sequences instead of replacing them
pub fn decode_lenient(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut rest = bytes;
    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                out.push_str(valid);
                break;
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                // valid_up_to() marks a UTF-8 prefix
                out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                match e.error_len() {
                    Some(len) => rest = &after[len..],
                    None => break,
                }
            }
        }
    }
    out
}

/// A NUL byte in the leading sample marks content as binary
pub fn looks_binary(bytes: &[u8]) -> bool {
    let sample = &bytes[..bytes.len().min(BINARY_CHECK_SIZE)];
    memchr::memchr(0, sample).is_some()
}

/// Splits on `\n`, `\r\n` and lone `\r`; a trailing terminator adds no empty line
pub fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Line indices surrounding `line_index`, clamped to `0..line_count`
pub fn context_window(
    line_index: usize,
    line_count: usize,
    context_lines: usize,
) -> (Range<usize>, Range<usize>) {
    let start = line_index.saturating_sub(context_lines);
    let end = (line_index + context_lines + 1).min(line_count);
    (start..line_index, (line_index + 1).min(end)..end)
}

/// Number of chars in `text[..byte_offset]`
pub fn char_offset(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].chars().count()
}

/// Collapses line breaks and truncates to `max_chars`, marking the cut with `...`
pub fn truncate_value(value: &str, max_chars: usize) -> String {
    let flat: String = value
        .trim()
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let mut cut: String = flat.chars().take(max_chars).collect();
        cut.push_str("...");
        cut
    }
}
