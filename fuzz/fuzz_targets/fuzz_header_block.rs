#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_form_data::boundary::{extract_boundary, split_head_and_body, split_parts};
use shiguredo_form_data::header_block::PartHeaders;

fuzz_target!(|data: &[u8]| {
    let headers = PartHeaders::parse_bytes(data);
    let _ = headers.field_name();
    let _ = headers.filename();
    let _ = headers.content_type();

    let (head, body) = split_head_and_body(data);
    assert!(head.len() + body.len() <= data.len());

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = extract_boundary(text);
    }

    // パニックしなければ OK
    for boundary in ["b", "boundary", "----WebKitFormBoundary"] {
        for part in split_parts(data, boundary) {
            let _ = split_head_and_body(part);
        }
    }
});
