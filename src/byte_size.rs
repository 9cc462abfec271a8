//! バイトサイズ文字列のパース
//!
//! ## 概要
//!
//! `"8M"` や `"0x400k"` のような設定値形式のサイズ文字列をバイト数に変換します。
//!
//! - 単位サフィックス: `k`, `m`, `g`, `t` (大文字小文字を区別しない)
//! - 基数プレフィックス: `0x` は 16 進数、先頭 `0` は 8 進数、それ以外は 10 進数
//! - 空文字列は 0
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_form_data::byte_size::{effective_upload_limit, parse_byte_size};
//!
//! assert_eq!(parse_byte_size("8M"), 8 * 1024 * 1024);
//! assert_eq!(parse_byte_size("0x10"), 16);
//! assert_eq!(parse_byte_size(""), 0);
//!
//! // 0 は「制限なし」として扱われる
//! assert_eq!(effective_upload_limit("0", "2M"), 2 * 1024 * 1024);
//! ```

/// バイト数
pub type ByteSize = u64;

/// 制限なしを表すサイズ
pub const UNLIMITED: ByteSize = ByteSize::MAX;

/// 単位サフィックスのカスケード順
///
/// サフィックスが見つかった位置から末尾まで、各段で 1024 倍する。
/// `t` なら t, g, m, k の 4 段、`k` なら 1 段。
const UNIT_CASCADE: [u8; 4] = [b't', b'g', b'm', b'k'];

/// サイズ文字列をバイト数に変換
///
/// 数値として解釈できない部分は無視し、先頭の有効な桁だけを使う。
/// オーバーフローした場合は [`UNLIMITED`] に飽和する。
///
/// # 例
///
/// ```rust
/// use shiguredo_form_data::byte_size::parse_byte_size;
///
/// assert_eq!(parse_byte_size("2k"), 2048);
/// assert_eq!(parse_byte_size("+1G"), 1024 * 1024 * 1024);
/// assert_eq!(parse_byte_size("010"), 8);
/// ```
pub fn parse_byte_size(input: &str) -> ByteSize {
    if input.is_empty() {
        return 0;
    }

    let lower = input.to_ascii_lowercase();
    let digits = lower.trim_start_matches('+');

    let magnitude = if let Some(hex) = digits.strip_prefix("0x") {
        parse_prefix_digits(hex, 16)
    } else if digits.starts_with('0') {
        parse_prefix_digits(digits, 8)
    } else {
        parse_prefix_digits(digits.trim_start(), 10)
    };

    let steps = lower
        .as_bytes()
        .last()
        .and_then(|suffix| UNIT_CASCADE.iter().position(|unit| unit == suffix))
        .map_or(0, |position| UNIT_CASCADE.len() - position);

    (0..steps).fold(magnitude, |size, _| size.saturating_mul(1024))
}

/// 実効アップロード上限を計算
///
/// `post_limit` (リクエストボディ全体の上限) と `per_file_limit` (ファイル単体の上限) の
/// 小さい方を返す。パース結果が 0 の側は制限なしとして扱う。
pub fn effective_upload_limit(post_limit: &str, per_file_limit: &str) -> ByteSize {
    let post = or_unlimited(parse_byte_size(post_limit));
    let per_file = or_unlimited(parse_byte_size(per_file_limit));
    post.min(per_file)
}

fn or_unlimited(size: ByteSize) -> ByteSize {
    if size == 0 { UNLIMITED } else { size }
}

/// 先頭から基数に合う桁だけを読み取る
fn parse_prefix_digits(s: &str, radix: u32) -> ByteSize {
    let mut value: ByteSize = 0;
    for c in s.chars() {
        let Some(digit) = c.to_digit(radix) else {
            break;
        };
        value = value
            .saturating_mul(ByteSize::from(radix))
            .saturating_add(ByteSize::from(digit));
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(parse_byte_size(""), 0);
    }

    #[test]
    fn test_plain_decimal() {
        assert_eq!(parse_byte_size("1024"), 1024);
        assert_eq!(parse_byte_size("+512"), 512);
    }

    #[test]
    fn test_units() {
        assert_eq!(parse_byte_size("1k"), 1024);
        assert_eq!(parse_byte_size("1K"), 1024);
        assert_eq!(parse_byte_size("3m"), 3 * 1024 * 1024);
        assert_eq!(parse_byte_size("2G"), 2 * 1024 * 1024 * 1024);
        assert_eq!(parse_byte_size("1t"), 1024u64.pow(4));
    }

    #[test]
    fn test_hex_and_octal() {
        assert_eq!(parse_byte_size("0x1A"), 26);
        assert_eq!(parse_byte_size("0X10k"), 16 * 1024);
        assert_eq!(parse_byte_size("017"), 15);
        assert_eq!(parse_byte_size("0"), 0);
        // 8 進数として解釈できない桁で打ち切り
        assert_eq!(parse_byte_size("09"), 0);
    }

    #[test]
    fn test_garbage_suffix() {
        assert_eq!(parse_byte_size("12abc"), 12);
        assert_eq!(parse_byte_size("M"), 0);
        assert_eq!(parse_byte_size("-5"), 0);
    }

    #[test]
    fn test_saturates() {
        assert_eq!(parse_byte_size("99999999999999999999999"), UNLIMITED);
        assert_eq!(parse_byte_size("18446744073709551615t"), UNLIMITED);
    }

    #[test]
    fn test_effective_upload_limit() {
        assert_eq!(effective_upload_limit("8M", "2M"), 2 * 1024 * 1024);
        assert_eq!(effective_upload_limit("1M", "2M"), 1024 * 1024);
        assert_eq!(effective_upload_limit("0", "2M"), 2 * 1024 * 1024);
        assert_eq!(effective_upload_limit("8M", ""), 8 * 1024 * 1024);
        assert_eq!(effective_upload_limit("", "0"), UNLIMITED);
    }
}
