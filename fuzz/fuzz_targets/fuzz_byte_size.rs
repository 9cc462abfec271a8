#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_form_data::UploadLimits;
use shiguredo_form_data::byte_size::{effective_upload_limit, parse_byte_size};

fuzz_target!(|data: (&str, &str, &str)| {
    let (post, per_file, count) = data;

    let _ = parse_byte_size(post);
    let limit = effective_upload_limit(post, per_file);
    assert!(limit > 0);

    let limits = UploadLimits::from_ini_values(post, per_file, count);
    assert_eq!(limits.max_file_size, limit);
});
