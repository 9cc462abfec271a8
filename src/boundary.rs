//! 境界によるボディ分割
//!
//! ## 概要
//!
//! Content-Type から boundary を取り出し、multipart ボディをパート単位に分割します。
//!
//! 区切りは「任意の改行 1 つ + 1 個以上の `-` + boundary」です。
//! 最後の区切り以降 (終了境界の `--` など) は常に捨てられます。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_form_data::boundary::{extract_boundary, split_head_and_body, split_parts};
//!
//! let boundary = extract_boundary("multipart/form-data; boundary=xyz").unwrap();
//! let body = b"--xyz\r\n\
//!     Content-Disposition: form-data; name=\"a\"\r\n\r\n\
//!     1\r\n\
//!     --xyz--\r\n";
//!
//! // 先頭の区切りより前 (空のプリアンブル) も 1 要素になる
//! let parts = split_parts(body, boundary);
//! assert_eq!(parts.len(), 2);
//! assert!(parts[0].is_empty());
//!
//! let (head, value) = split_head_and_body(parts[1]);
//! assert_eq!(head, b"\r\nContent-Disposition: form-data; name=\"a\"");
//! assert_eq!(value, b"1");
//! ```

use crate::error::Rejection;

const FORM_DATA: &str = "multipart/form-data";
const BOUNDARY_MARKER: &str = "boundary=";

/// Content-Type ヘッダー値から boundary を取り出す
///
/// `boundary=` (大文字小文字を区別しない) の直後から行末までを boundary とし、
/// 前後のダブルクオートを 1 段除去する。
pub fn extract_boundary(content_type: &str) -> Result<&str, Rejection> {
    let lower = content_type.to_ascii_lowercase();
    if !lower.contains(FORM_DATA) {
        return Err(Rejection::NotMultipart);
    }

    // ASCII の小文字化はバイト位置を変えない
    let start = lower
        .find(BOUNDARY_MARKER)
        .ok_or(Rejection::NoBoundary)?
        + BOUNDARY_MARKER.len();
    let rest = &content_type[start..];
    let end = rest.find(['\r', '\n']).unwrap_or(rest.len());
    let token = &rest[..end];
    let token = token
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(token);

    if token.is_empty() {
        return Err(Rejection::NoBoundary);
    }
    Ok(token)
}

/// ボディを boundary で分割
///
/// 先頭の区切りより前 (プリアンブル) も 1 要素として含まれるが、
/// 最後の区切り以降は返さない。区切りが 1 つも無ければ空になる。
pub fn split_parts<'a>(body: &'a [u8], boundary: &str) -> Vec<&'a [u8]> {
    let boundary = boundary.as_bytes();
    let mut parts = Vec::new();
    if boundary.is_empty() {
        return parts;
    }

    // 現在のセグメントの開始位置
    let mut segment_start = 0;
    // boundary の検索開始位置
    let mut search_from = 0;

    while let Some(offset) = find_bytes(&body[search_from..], boundary) {
        let found = search_from + offset;

        if found == segment_start || body[found - 1] != b'-' {
            search_from = found + 1;
            continue;
        }

        let mut delimiter_start = found - 1;
        while delimiter_start > segment_start && body[delimiter_start - 1] == b'-' {
            delimiter_start -= 1;
        }
        delimiter_start -= preceding_line_break_len(&body[segment_start..delimiter_start]);

        parts.push(&body[segment_start..delimiter_start]);
        segment_start = found + boundary.len();
        search_from = segment_start;
    }

    parts
}

/// パートをヘッダーブロックとボディに分割
///
/// 最初の「改行 2 つ連続」で分ける。見つからなければ全体がヘッダーでボディは空。
pub fn split_head_and_body(part: &[u8]) -> (&[u8], &[u8]) {
    for pos in 0..part.len() {
        let first = line_break_len(part, pos);
        if first == 0 {
            continue;
        }
        let second = line_break_len(part, pos + first);
        if second > 0 {
            return (&part[..pos], &part[pos + first + second..]);
        }
    }
    (part, &[])
}

/// `pos` から始まる改行の長さ (CRLF は 2、CR/LF/VT/FF は 1、改行でなければ 0)
///
/// NEL (0x85) は UTF-8 の継続バイトにもなるため改行として扱わない。
fn line_break_len(data: &[u8], pos: usize) -> usize {
    match &data[pos.min(data.len())..] {
        [b'\r', b'\n', ..] => 2,
        [b'\r' | b'\n' | b'\x0b' | b'\x0c', ..] => 1,
        _ => 0,
    }
}

/// 末尾にある改行の長さ
fn preceding_line_break_len(data: &[u8]) -> usize {
    match data {
        [.., b'\r', b'\n'] => 2,
        [.., b'\r' | b'\n' | b'\x0b' | b'\x0c'] => 1,
        _ => 0,
    }
}

/// バイト列から部分列を検索
fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > haystack.len() {
        return None;
    }

    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_boundary() {
        assert_eq!(
            extract_boundary("multipart/form-data; boundary=abc123"),
            Ok("abc123")
        );
        assert_eq!(
            extract_boundary("Multipart/Form-Data; BOUNDARY=----WebKitFormBoundary"),
            Ok("----WebKitFormBoundary")
        );
        assert_eq!(
            extract_boundary("multipart/form-data; boundary=\"quoted\""),
            Ok("quoted")
        );
    }

    #[test]
    fn test_extract_boundary_rejections() {
        assert_eq!(
            extract_boundary("application/json"),
            Err(Rejection::NotMultipart)
        );
        assert_eq!(
            extract_boundary("multipart/mixed; boundary=abc"),
            Err(Rejection::NotMultipart)
        );
        assert_eq!(
            extract_boundary("multipart/form-data"),
            Err(Rejection::NoBoundary)
        );
        assert_eq!(
            extract_boundary("multipart/form-data; boundary="),
            Err(Rejection::NoBoundary)
        );
    }

    #[test]
    fn test_extract_boundary_stops_at_line_end() {
        assert_eq!(
            extract_boundary("multipart/form-data; boundary=abc\r\nX-Other: 1"),
            Ok("abc")
        );
    }

    #[test]
    fn test_split_parts_drops_trailing_segment() {
        let body = b"--b\r\nA\r\n--b\r\nB\r\n--b--\r\n";
        let parts = split_parts(body, "b");
        assert_eq!(parts, vec![&b""[..], &b"\r\nA"[..], &b"\r\nB"[..]]);
    }

    #[test]
    fn test_split_parts_without_delimiter() {
        assert!(split_parts(b"no delimiters here", "b").is_empty());
        // 先頭に `-` が無い boundary は区切りではない
        assert!(split_parts(b"\r\nb\r\nb", "b").is_empty());
    }

    #[test]
    fn test_split_parts_boundary_with_leading_dashes() {
        let body = b"------WebKit\r\nX\r\n------WebKit--";
        let parts = split_parts(body, "----WebKit");
        assert_eq!(parts, vec![&b""[..], &b"\r\nX"[..]]);
    }

    #[test]
    fn test_split_parts_keeps_nel_before_delimiter() {
        let body = b"--b\r\nA\x85--b\r\nB\xc3\x85\r\n--b--";
        let parts = split_parts(body, "b");
        assert_eq!(parts, vec![&b""[..], &b"\r\nA\x85"[..], &b"\r\nB\xc3\x85"[..]]);

        let (head, value) = split_head_and_body(b"H: v\x85\x85value");
        assert_eq!(head, b"H: v\x85\x85value");
        assert!(value.is_empty());
    }

    #[test]
    fn test_split_parts_lf_only() {
        let body = b"--b\nA\n--b\nB\n--b--\n";
        let parts = split_parts(body, "b");
        assert_eq!(parts, vec![&b""[..], &b"\nA"[..], &b"\nB"[..]]);
    }

    #[test]
    fn test_split_parts_strips_single_line_break_only() {
        let body = b"--b\r\nA\r\n\r\n--b--";
        let parts = split_parts(body, "b");
        assert_eq!(parts, vec![&b""[..], &b"\r\nA\r\n"[..]]);
    }

    #[test]
    fn test_split_head_and_body() {
        let (head, body) = split_head_and_body(b"\r\nName: v\r\n\r\nvalue\r\n\r\nmore");
        assert_eq!(head, b"\r\nName: v");
        assert_eq!(body, b"value\r\n\r\nmore");
    }

    #[test]
    fn test_split_head_and_body_lf() {
        let (head, body) = split_head_and_body(b"\nName: v\n\nvalue");
        assert_eq!(head, b"\nName: v");
        assert_eq!(body, b"value");
    }

    #[test]
    fn test_split_head_and_body_without_separator() {
        let (head, body) = split_head_and_body(b"\r\nName: v");
        assert_eq!(head, b"\r\nName: v");
        assert!(body.is_empty());
    }

    #[test]
    fn test_find_bytes() {
        assert_eq!(find_bytes(b"hello world", b"world"), Some(6));
        assert_eq!(find_bytes(b"hello", b"x"), None);
        assert_eq!(find_bytes(b"hello", b""), Some(0));
        assert_eq!(find_bytes(b"", b"x"), None);
    }
}
