#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shiguredo_form_data::{FormDataParser, UploadLimits};

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    content_type: String,
    max_file_size: u16,
    max_file_count: u8,
    body: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    let limits = UploadLimits {
        max_file_size: u64::from(input.max_file_size),
        max_file_count: usize::from(input.max_file_count),
    };
    let mut parser = FormDataParser::with_limits(limits);

    // 任意の Content-Type と固定の boundary の両方で試行
    for content_type in [
        input.content_type.as_str(),
        "multipart/form-data; boundary=boundary",
        "multipart/form-data; boundary=\"---\"",
    ] {
        if let Ok(form) = parser.parse_with_content_type(content_type, &input.body) {
            for file in form.files().leaves() {
                assert!(file.size() <= u64::from(input.max_file_size) || !file.is_ok());
            }
            let _ = nojson::Json(&form).to_string();
        }
    }

    parser.close_temp_files();
    assert!(parser.temp_files().is_empty());
});
