//! JSON text intake for the render pipeline.
//!
//! serde_json's built-in recursion limit (128 levels) sits well below the
//! configured node depth, so the parser runs unbounded over input whose
//! nesting has first been clipped to what the walker can ever visit.

use std::borrow::Cow;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Structural levels kept below the deepest node the walker inspects.
const NESTING_SLACK: usize = 8;

/// Parse document JSON whose node nesting may exceed serde_json's default limit.
pub(crate) fn parse_document_json(text: &str, max_depth: usize) -> serde_json::Result<Value> {
    let text = clip_nesting(text, nesting_ceiling(max_depth));
    let mut deserializer = serde_json::Deserializer::from_str(&text);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(value)
}

/// A node at walker depth `d` opens at structural level `2d + 1` (its own object
/// plus the enclosing `content` array), so anything past the ceiling lies under
/// a node the depth guard already skips.
fn nesting_ceiling(max_depth: usize) -> usize {
    max_depth
        .saturating_add(1)
        .saturating_mul(2)
        .saturating_add(NESTING_SLACK)
}

/// Replace every array or object opening beyond `ceiling` with `null`.
///
/// Input that is not valid JSON passes through with its structure untouched so
/// the parser reports the original error position.
fn clip_nesting(text: &str, ceiling: usize) -> Cow<'_, str> {
    if max_nesting(text) <= ceiling {
        return Cow::Borrowed(text);
    }

    let mut clipped = String::with_capacity(text.len());
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut segment_start = 0usize;
    let mut clipped_values = 0u32;
    let bytes = text.as_bytes();
    let mut index = 0usize;

    while index < bytes.len() {
        let byte = bytes[index];
        if in_string {
            match (escaped, byte) {
                (true, _) => escaped = false,
                (false, b'\\') => escaped = true,
                (false, b'"') => in_string = false,
                _ => {}
            }
            index += 1;
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'[' | b'{' if depth == ceiling => {
                clipped.push_str(&text[segment_start..index]);
                clipped.push_str("null");
                index = skip_value(bytes, index);
                segment_start = index;
                clipped_values += 1;
                continue;
            }
            b'[' | b'{' => depth += 1,
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
        index += 1;
    }
    clipped.push_str(&text[segment_start..]);

    debug!(
        target = "application::render::parse",
        ceiling, clipped_values, "Clipped document nesting beyond the render depth limit"
    );
    Cow::Owned(clipped)
}

fn max_nesting(text: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for &byte in text.as_bytes() {
        if in_string {
            match (escaped, byte) {
                (true, _) => escaped = false,
                (false, b'\\') => escaped = true,
                (false, b'"') => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    deepest
}

/// Index just past the container opening at `start`, or the end of input when
/// it never closes.
fn skip_value(bytes: &[u8], start: usize) -> usize {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if in_string {
            match (escaped, byte) {
                (true, _) => escaped = false,
                (false, b'\\') => escaped = true,
                (false, b'"') => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => depth += 1,
            b']' | b'}' => {
                depth -= 1;
                if depth == 0 {
                    return start + offset + 1;
                }
            }
            _ => {}
        }
    }

    bytes.len()
}
