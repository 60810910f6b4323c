//! Conversion of numeric, string and bytes token text into literal values.
//!
//! Functions here return a plain reason string on failure; the parser wraps it
//! into `ParseError::InvalidLiteral` with the token's span.

/// Parse an `Int` token, applying a folded leading minus before the range check
/// so that `-9223372036854775808` is representable.
pub fn parse_int(text: &str, negative: bool) -> Result<i64, String> {
    let magnitude = parse_magnitude(text)?;
    if negative {
        if magnitude == i64::MIN.unsigned_abs() {
            Ok(i64::MIN)
        } else {
            i64::try_from(magnitude).map(|n| -n).map_err(|_| out_of_range())
        }
    } else {
        i64::try_from(magnitude).map_err(|_| out_of_range())
    }
}

pub fn parse_uint(text: &str) -> Result<u64, String> {
    let digits = text.strip_suffix(['u', 'U']).unwrap_or(text);
    parse_magnitude(digits)
}

pub fn parse_float(text: &str, negative: bool) -> Result<f64, String> {
    let value: f64 = text.parse().map_err(|e| format!("{e}"))?;
    if !value.is_finite() {
        return Err(out_of_range());
    }
    Ok(if negative { -value } else { value })
}

fn parse_magnitude(text: &str) -> Result<u64, String> {
    let (digits, radix) = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (text, 10),
    };
    u64::from_str_radix(digits, radix).map_err(|e| match e.kind() {
        std::num::IntErrorKind::PosOverflow => out_of_range(),
        _ => format!("malformed digits '{text}'"),
    })
}

fn out_of_range() -> String {
    "value out of range".to_string()
}

/// Decode a `String` token (prefix and quotes included).
pub fn decode_string(text: &str) -> Result<String, String> {
    let quoted = Quoted::split(text)?;
    let mut out = String::with_capacity(quoted.body.len());
    unescape(&quoted, false, |piece| match piece {
        Piece::Char(c) => out.push(c),
        // Numeric escapes in strings name code points.
        Piece::Byte(b) => out.push(char::from(b)),
    })?;
    Ok(out)
}

/// Decode a `Bytes` token (prefix and quotes included).
pub fn decode_bytes(text: &str) -> Result<Vec<u8>, String> {
    let quoted = Quoted::split(text)?;
    let mut out = Vec::with_capacity(quoted.body.len());
    unescape(&quoted, true, |piece| match piece {
        Piece::Char(c) => {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
        Piece::Byte(b) => out.push(b),
    })?;
    Ok(out)
}

struct Quoted<'a> {
    raw: bool,
    body: &'a str,
}

impl<'a> Quoted<'a> {
    fn split(text: &'a str) -> Result<Self, String> {
        let prefix_len = text.find(['"', '\'']).ok_or_else(|| "missing quote".to_string())?;
        let (prefix, quoted) = text.split_at(prefix_len);
        let raw = prefix.contains(['r', 'R']);
        let delim = if quoted.starts_with("\"\"\"") || quoted.starts_with("'''") {
            &quoted[..3]
        } else {
            &quoted[..1]
        };
        let body = quoted
            .strip_prefix(delim)
            .and_then(|rest| rest.strip_suffix(delim))
            .ok_or_else(|| "unterminated literal".to_string())?;
        Ok(Self { raw, body })
    }
}

enum Piece {
    Char(char),
    Byte(u8),
}

fn unescape(quoted: &Quoted<'_>, bytes: bool, mut push: impl FnMut(Piece)) -> Result<(), String> {
    let mut chars = quoted.body.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                // \r\n and lone \r both become \n
                chars.next_if_eq(&'\n');
                push(Piece::Char('\n'));
            }
            '\\' if !quoted.raw => {
                let Some(esc) = chars.next() else {
                    return Err("trailing backslash".to_string());
                };
                match esc {
                    'a' => push(Piece::Char('\x07')),
                    'b' => push(Piece::Char('\x08')),
                    'f' => push(Piece::Char('\x0C')),
                    'n' => push(Piece::Char('\n')),
                    'r' => push(Piece::Char('\r')),
                    't' => push(Piece::Char('\t')),
                    'v' => push(Piece::Char('\x0B')),
                    '"' | '\'' | '\\' | '?' | '`' => push(Piece::Char(esc)),
                    '0'..='3' => {
                        let value = take_digits(&mut chars, Some(esc), 2, 8)?;
                        push(Piece::Byte(value as u8));
                    }
                    'x' | 'X' => {
                        let value = take_digits(&mut chars, None, 2, 16)?;
                        push(Piece::Byte(value as u8));
                    }
                    'u' | 'U' if bytes => {
                        return Err(format!("'\\{esc}' escape is not allowed in bytes"));
                    }
                    'u' => push(Piece::Char(code_point(take_digits(&mut chars, None, 4, 16)?)?)),
                    'U' => push(Piece::Char(code_point(take_digits(&mut chars, None, 8, 16)?)?)),
                    other => return Err(format!("invalid escape sequence '\\{other}'")),
                }
            }
            _ => push(Piece::Char(c)),
        }
    }
    Ok(())
}

/// Read `count` digits of `radix`, optionally seeded with an already consumed
/// leading digit.
fn take_digits(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    first: Option<char>,
    count: usize,
    radix: u32,
) -> Result<u32, String> {
    let mut value = match first {
        Some(d) => d.to_digit(radix).ok_or_else(|| format!("invalid digit '{d}' in escape"))?,
        None => 0,
    };
    for _ in 0..count {
        let d = chars
            .next()
            .ok_or_else(|| "truncated escape sequence".to_string())?;
        let digit = d.to_digit(radix).ok_or_else(|| format!("invalid digit '{d}' in escape"))?;
        value = value * radix + digit;
    }
    Ok(value)
}

fn code_point(value: u32) -> Result<char, String> {
    char::from_u32(value).ok_or_else(|| format!("invalid code point U+{value:X}"))
}
