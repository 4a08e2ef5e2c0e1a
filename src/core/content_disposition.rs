//! Content-Disposition header parsing (filename and filename*).

pub const DEFAULT_FILENAME: &str = "download";

/// Filename to save a response under; `"download"` when the header is absent
/// or carries no usable name.
pub fn filename_or_default(header_value: Option<&str>) -> String {
    header_value
        .and_then(parse_filename)
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}

/// Extracts the filename from a raw Content-Disposition header value.
///
/// `filename*=UTF-8''...` (RFC 5987) takes precedence over `filename=`.
/// Quoted values are unescaped, bare tokens are taken as-is.
pub fn parse_filename(header_value: &str) -> Option<String> {
    let mut plain: Option<String> = None;

    for param in split_params(header_value.trim()) {
        let Some((name, value)) = param.split_once('=') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();

        if name == "filename*" {
            if let Some(decoded) = decode_ext_value(value) {
                if !decoded.is_empty() {
                    return Some(decoded);
                }
            }
        } else if name == "filename" {
            let v = unquote(value);
            if !v.is_empty() {
                plain = Some(v);
            }
        }
    }

    plain
}

// Splits on ';' outside of quoted strings.
fn split_params(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                out.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&s[start..]);
    out
}

fn unquote(v: &str) -> String {
    if v.len() >= 2 && v.starts_with('"') && v.ends_with('"') {
        let inner = &v[1..v.len() - 1];
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\\' {
                if let Some(&next) = chars.peek() {
                    if next == '"' || next == '\\' {
                        out.push(next);
                        chars.next();
                        continue;
                    }
                }
            }
            out.push(c);
        }
        out
    } else {
        v.trim_matches('"').to_string()
    }
}

// charset'language'pct-encoded; only UTF-8 and ISO-8859-1 are defined by the RFC.
fn decode_ext_value(v: &str) -> Option<String> {
    let v = v.trim_matches('"');
    let mut parts = v.splitn(3, '\'');
    let charset = parts.next()?.to_ascii_lowercase();
    let _lang = parts.next()?;
    let encoded = parts.next()?;
    let bytes = percent_decode(encoded);
    match charset.as_str() {
        "utf-8" => Some(String::from_utf8_lossy(&bytes).into_owned()),
        "iso-8859-1" => Some(bytes.iter().map(|&b| b as char).collect()),
        _ => None,
    }
}

fn percent_decode(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(h), Some(l)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                out.push(h << 4 | l);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted() {
        let r = parse_filename("attachment; filename=\"My Clip_20240101_120000.mp4\"");
        assert_eq!(r.as_deref(), Some("My Clip_20240101_120000.mp4"));
    }

    #[test]
    fn token() {
        assert_eq!(parse_filename("attachment; filename=song.mp3").as_deref(), Some("song.mp3"));
    }

    #[test]
    fn escaped_quotes_and_semicolons() {
        let r = parse_filename(r#"attachment; filename="a \"b\"; c.mp4""#);
        assert_eq!(r.as_deref(), Some(r#"a "b"; c.mp4"#));
    }

    #[test]
    fn extended_value_wins() {
        let r = parse_filename("attachment; filename=\"fallback.mp4\"; filename*=UTF-8''caf%C3%A9%20clip.mp4");
        assert_eq!(r.as_deref(), Some("café clip.mp4"));
        let r = parse_filename("attachment; FILENAME*=iso-8859-1'en'caf%E9.mp3");
        assert_eq!(r.as_deref(), Some("café.mp3"));
    }

    #[test]
    fn trailing_percent_kept() {
        let r = parse_filename("attachment; filename*=UTF-8''100%");
        assert_eq!(r.as_deref(), Some("100%"));
    }

    #[test]
    fn falls_back_to_default() {
        assert_eq!(filename_or_default(None), "download");
        assert_eq!(filename_or_default(Some("attachment")), "download");
        assert_eq!(filename_or_default(Some("attachment; filename=\"\"")), "download");
        assert_eq!(filename_or_default(Some("inline; filename=x.webm")), "x.webm");
    }
}
