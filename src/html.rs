//! HTML entity decoding for status text.
//!
//! The server escapes `<`, `>` and `&` in status text (and in `source` on
//! search responses). Decoding shifts character positions, so
//! [`decode_with_offsets`] also records where every raw character lands in the
//! decoded string; entity indices are translated through that table.

/// Longest entity body we look for between `&` and `;`.
const MAX_ENTITY_LEN: usize = 10;

/// Decoded text plus the raw-to-decoded position table.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub text: String,
    /// `offsets[i]` is the decoded char position of raw char `i`; one extra
    /// trailing slot maps the raw end to the decoded end.
    offsets: Vec<usize>,
}

impl Decoded {
    /// Translate a raw code-point index into a decoded code-point index.
    ///
    /// Indices inside an entity map to the position of its decoded character;
    /// indices past the raw end clamp to the decoded length.
    #[must_use]
    pub fn translate(&self, raw_index: usize) -> usize {
        let last = self.offsets.len() - 1;
        self.offsets[raw_index.min(last)]
    }
}

/// Decode HTML entities in `raw`. Unknown entities are left as written.
#[must_use]
pub fn decode(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    decode_with_offsets(raw).text
}

/// Decode `raw` and keep the position table.
#[must_use]
pub fn decode_with_offsets(raw: &str) -> Decoded {
    let chars: Vec<char> = raw.chars().collect();
    let mut text = String::with_capacity(raw.len());
    let mut offsets = vec![0; chars.len() + 1];
    let mut out = 0;
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '&' {
            if let Some((decoded, end)) = entity_at(&chars, i) {
                for slot in &mut offsets[i..=end] {
                    *slot = out;
                }
                text.push(decoded);
                out += 1;
                i = end + 1;
                continue;
            }
        }
        offsets[i] = out;
        text.push(chars[i]);
        out += 1;
        i += 1;
    }
    offsets[chars.len()] = out;

    Decoded { text, offsets }
}

/// Recognise an entity starting at `start` (which holds `&`).
/// Returns the decoded char and the index of the closing `;`.
fn entity_at(chars: &[char], start: usize) -> Option<(char, usize)> {
    let limit = chars.len().min(start + 2 + MAX_ENTITY_LEN);
    let end = (start + 1..limit).find(|&j| chars[j] == ';')?;
    let body: String = chars[start + 1..end].iter().collect();
    decode_entity(&body).map(|c| (c, end))
}

fn decode_entity(body: &str) -> Option<char> {
    match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let numeric = body.strip_prefix('#')?;
            let code = match numeric.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => numeric.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
