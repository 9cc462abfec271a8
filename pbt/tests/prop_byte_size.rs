//! サイズ文字列のプロパティテスト (byte_size.rs, limits.rs)

use pbt::size_suffix;
use proptest::prelude::*;
use shiguredo_form_data::byte_size::{effective_upload_limit, parse_byte_size};
use shiguredo_form_data::{UNLIMITED, UploadLimits};

// ========================================
// parse_byte_size のテスト
// ========================================

#[test]
fn byte_size_empty_is_zero() {
    assert_eq!(parse_byte_size(""), 0);
}

// 単位サフィックスは 1024 の累乗を掛ける
proptest! {
    #[test]
    fn byte_size_suffix_multiplier(n in 1u64..100_000, (suffix, multiplier) in size_suffix()) {
        let input = format!("{}{}", n, suffix);
        prop_assert_eq!(parse_byte_size(&input), n * multiplier);
    }
}

// 先頭の `+` は無視される
proptest! {
    #[test]
    fn byte_size_leading_plus(n in 1u64..100_000, (suffix, multiplier) in size_suffix()) {
        let input = format!("+{}{}", n, suffix);
        prop_assert_eq!(parse_byte_size(&input), n * multiplier);
    }
}

// 16 進数
proptest! {
    #[test]
    fn byte_size_hex(n in 0u64..0xffff_ffff) {
        prop_assert_eq!(parse_byte_size(&format!("0x{:x}", n)), n);
        prop_assert_eq!(parse_byte_size(&format!("0X{:X}", n)), n);
    }
}

// 8 進数
proptest! {
    #[test]
    fn byte_size_octal(n in 0u64..0o7777_7777) {
        prop_assert_eq!(parse_byte_size(&format!("0{:o}", n)), n);
    }
}

// 任意の文字列でもパニックしない
proptest! {
    #[test]
    fn byte_size_never_panics(input in ".*") {
        let _ = parse_byte_size(&input);
    }
}

// 巨大な値は飽和する
proptest! {
    #[test]
    fn byte_size_saturates(digits in "[1-9][0-9]{25,40}") {
        prop_assert_eq!(parse_byte_size(&digits), UNLIMITED);
        prop_assert_eq!(parse_byte_size(&format!("{}t", digits)), UNLIMITED);
    }
}

// ========================================
// effective_upload_limit のテスト
// ========================================

// 両方とも正なら小さい方
proptest! {
    #[test]
    fn effective_limit_is_min(post in 1u64..1_000_000, per_file in 1u64..1_000_000) {
        let limit = effective_upload_limit(&post.to_string(), &per_file.to_string());
        prop_assert_eq!(limit, post.min(per_file));
    }
}

// 0 は制限なしとして扱う
proptest! {
    #[test]
    fn effective_limit_zero_is_unlimited(n in 1u64..1_000_000) {
        prop_assert_eq!(effective_upload_limit("0", &n.to_string()), n);
        prop_assert_eq!(effective_upload_limit(&n.to_string(), "0"), n);
    }
}

#[test]
fn effective_limit_both_zero() {
    assert_eq!(effective_upload_limit("0", "0"), UNLIMITED);
    assert_eq!(effective_upload_limit("", ""), UNLIMITED);
}

// ========================================
// UploadLimits のテスト
// ========================================

#[test]
fn upload_limits_default_values() {
    let limits = UploadLimits::default();

    assert_eq!(limits.max_file_size, 2 * 1024 * 1024); // 2MB
    assert_eq!(limits.max_file_count, 20);
}

#[test]
fn upload_limits_unlimited_values() {
    let limits = UploadLimits::unlimited();

    assert_eq!(limits.max_file_size, UNLIMITED);
    assert_eq!(limits.max_file_count, usize::MAX);
}

// from_ini_values は effective_upload_limit と一致する
proptest! {
    #[test]
    fn upload_limits_from_ini_values(
        post in 0u64..10_000,
        per_file in 0u64..10_000,
        count in 0usize..100
    ) {
        let post = post.to_string();
        let per_file = per_file.to_string();
        let limits = UploadLimits::from_ini_values(&post, &per_file, &count.to_string());

        prop_assert_eq!(limits.max_file_size, effective_upload_limit(&post, &per_file));
        prop_assert_eq!(limits.max_file_count, count);
    }
}
