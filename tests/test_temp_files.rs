//! 一時ファイルの寿命のテスト
//!
//! パース結果の `tmp_name` が指すファイルが、いつまで読めていつ消えるかを確認する。
//!
//! ## なぜ PBT ではなくここでテストするのか
//!
//! PBT は「入力に対するパース結果の正しさ」を検証する。
//! 一時ファイルの寿命はパース結果ではなく、パーサーの所有権と呼び出し順序で決まる。
//!
//! - `close_temp_files` を呼んだ後にファイルが消えていること
//! - パーサーを drop した後にファイルが消えていること
//! - 拒否されたリクエストでは一時ファイルが 1 つも作られないこと
//!
//! これらは固定の入力と単純なアサーションで十分に表現できる。

use std::fs;
use std::path::PathBuf;

use shiguredo_form_data::{FormDataParser, Rejection, UploadError};

const CONTENT_TYPE: &str = "multipart/form-data; boundary=XyZ";

const BODY: &[u8] = b"--XyZ\r\n\
    Content-Disposition: form-data; name=\"title\"\r\n\r\n\
    report\r\n\
    --XyZ\r\n\
    Content-Disposition: form-data; name=\"docs[]\"; filename=\"a.txt\"\r\n\
    Content-Type: text/plain\r\n\r\n\
    first\r\n\
    --XyZ\r\n\
    Content-Disposition: form-data; name=\"docs[]\"; filename=\"b.txt\"\r\n\
    Content-Type: text/plain\r\n\r\n\
    second\r\n\
    --XyZ--\r\n";

fn stored_paths(parser: &mut FormDataParser) -> Vec<PathBuf> {
    let form = parser.parse_with_content_type(CONTENT_TYPE, BODY).unwrap();
    form.files()
        .leaves()
        .into_iter()
        .map(|file| {
            assert_eq!(file.error(), UploadError::Ok);
            file.tmp_path().unwrap().to_path_buf()
        })
        .collect()
}

#[test]
fn files_are_readable_until_closed() {
    let dir = tempfile::tempdir().unwrap();
    let mut parser = FormDataParser::new().with_temp_dir(dir.path());

    let paths = stored_paths(&mut parser);
    assert_eq!(paths.len(), 2);
    assert_eq!(fs::read(&paths[0]).unwrap(), b"first");
    assert_eq!(fs::read(&paths[1]).unwrap(), b"second");

    parser.close_temp_files();
    for path in &paths {
        assert!(fs::read(path).is_err());
    }
    assert!(parser.temp_files().is_empty());

    // 2 回目も失敗しない
    parser.close_temp_files();
}

#[test]
fn files_accumulate_across_parses() {
    let dir = tempfile::tempdir().unwrap();
    let mut parser = FormDataParser::new().with_temp_dir(dir.path());

    let first = stored_paths(&mut parser);
    let second = stored_paths(&mut parser);
    assert_eq!(parser.temp_files().len(), 4);
    assert!(first.iter().all(|p| p.exists()));
    assert!(second.iter().all(|p| p.exists()));

    parser.close_temp_files();
    assert!(first.iter().chain(&second).all(|p| !p.exists()));
}

#[test]
fn drop_removes_files() {
    let dir = tempfile::tempdir().unwrap();
    let paths = {
        let mut parser = FormDataParser::new().with_temp_dir(dir.path());
        stored_paths(&mut parser)
    };

    assert_eq!(paths.len(), 2);
    assert!(paths.iter().all(|p| !p.exists()));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn rejection_creates_no_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut parser = FormDataParser::new().with_temp_dir(dir.path());

    assert_eq!(
        parser.parse_with_content_type("text/plain", BODY),
        Err(Rejection::NotMultipart)
    );
    assert_eq!(
        parser.parse_with_content_type("multipart/form-data", BODY),
        Err(Rejection::NoBoundary)
    );
    assert_eq!(
        parser.parse_with_content_type(CONTENT_TYPE, b""),
        Err(Rejection::EmptyBody)
    );

    assert!(parser.temp_files().is_empty());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn oversized_file_creates_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut parser = FormDataParser::new()
        .with_temp_dir(dir.path())
        .with_max_file_size(5);

    let form = parser.parse_with_content_type(CONTENT_TYPE, BODY).unwrap();
    let docs = form.files().get("docs").and_then(|n| n.as_table()).unwrap();
    let errors: Vec<UploadError> = docs.leaves().into_iter().map(|f| f.error()).collect();
    assert_eq!(errors, [UploadError::Ok, UploadError::SizeExceeded]);

    assert_eq!(parser.temp_files().len(), 1);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}
