use anyhow::{anyhow, Result};

/// Wire encoding for C-strings and header text fields. Which one applies is
/// decided by build family and effective language, see
/// [`Build::text_encoding`](crate::Build::text_encoding).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    ShiftJis,
    Latin1,
    Utf16Le,
}

impl TextEncoding {
    /// Decode wire bytes (no terminator included). Invalid sequences decode
    /// lossily; callers that need byte fidelity compare a re-encode against
    /// the original.
    pub fn decode(self, data: &[u8]) -> String {
        match self {
            TextEncoding::ShiftJis => {
                let (text, _, _) = encoding_rs::SHIFT_JIS.decode(data);
                text.into_owned()
            }
            // latin-1 maps each byte to the same code point
            TextEncoding::Latin1 => {
                data.iter().map(|b| char::from(*b)).collect()
            }
            TextEncoding::Utf16Le => {
                let units: Vec<u16> = data
                    .chunks(2)
                    .map(|c| u16::from_le_bytes([c[0], *c.get(1).unwrap_or(&0)]))
                    .collect();
                String::from_utf16_lossy(&units)
            }
        }
    }

    /// Encode to wire bytes, without a terminator. Unmappable characters
    /// encode as `?`.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::ShiftJis => {
                let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode(text);
                bytes.into_owned()
            }
            TextEncoding::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                .collect(),
            TextEncoding::Utf16Le => text
                .encode_utf16()
                .flat_map(|unit| unit.to_le_bytes())
                .collect(),
        }
    }

    /// The NUL terminator for this encoding.
    pub fn terminator(self) -> &'static [u8] {
        match self {
            TextEncoding::Utf16Le => &[0, 0],
            _ => &[0],
        }
    }
}

/// Render `text` as a double-quoted source literal.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\x{:02X}", c as u32))
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Inverse of [`escape`], for the body of a quoted literal (quotes already
/// stripped). Recognized escapes: `\n \r \t \' \" \\ \xHH`.
pub fn unescape(body: &str) -> Result<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('x') => {
                let hi = chars.next();
                let lo = chars.next();
                let (Some(hi), Some(lo)) = (hi, lo) else {
                    return Err(anyhow!("truncated \\x escape"));
                };
                let byte = u8::from_str_radix(&format!("{hi}{lo}"), 16)
                    .map_err(|_| anyhow!("invalid \\x escape"))?;
                out.push(char::from(byte));
            }
            Some(other) => return Err(anyhow!("unknown escape \\{other}")),
            None => return Err(anyhow!("trailing backslash")),
        }
    }
    Ok(out)
}

pub fn hex_string(data: &[u8]) -> String {
    data.iter().map(|b| format!("{b:02X}")).collect()
}
