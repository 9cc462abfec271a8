//! multipart/form-data パーサー
//!
//! メモリ上にあるリクエストボディ全体を一度にパースし、
//! スカラーフィールドのツリーとアップロードファイルのツリーを返す。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_form_data::{FormDataParser, UploadError};
//!
//! let body = b"--b\r\n\
//!     Content-Disposition: form-data; name=\"appid\"\r\n\r\n\
//!     8ovpzwzBKFzz88y60N22\r\n\
//!     --b\r\n\
//!     Content-Disposition: form-data; name=\"file2\"; filename=\"upfile.txt\"\r\n\
//!     Content-Type: text/plain\r\n\r\n\
//!     upfile\r\n\
//!     --b--\r\n";
//!
//! let mut parser = FormDataParser::new();
//! let form = parser
//!     .parse(&[("Content-Type", "multipart/form-data; boundary=b")], body)
//!     .unwrap();
//!
//! assert_eq!(form.param("appid").unwrap().as_str(), Some("8ovpzwzBKFzz88y60N22"));
//!
//! let file = form.file("file2").unwrap();
//! assert_eq!(file.name(), "upfile.txt");
//! assert_eq!(file.media_type(), "text/plain");
//! assert_eq!(file.error(), UploadError::Ok);
//! assert_eq!(std::fs::read(file.tmp_path().unwrap()).unwrap(), b"upfile");
//!
//! parser.close_temp_files();
//! ```

use std::path::{Path, PathBuf};

use crate::boundary::{extract_boundary, split_head_and_body, split_parts};
use crate::byte_size::ByteSize;
use crate::error::Rejection;
use crate::form_tree::{FieldValue, FormNode, FormTable};
use crate::header_block::PartHeaders;
use crate::limits::UploadLimits;
use crate::temp_files::TempFiles;
use crate::upload::{DEFAULT_MEDIA_TYPE, UploadError, UploadedFile};

/// パース結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    /// スカラーフィールド
    params: FormTable<FieldValue>,
    /// アップロードファイル
    files: FormTable<UploadedFile>,
}

impl FormData {
    /// スカラーフィールドのツリーを取得
    pub fn params(&self) -> &FormTable<FieldValue> {
        &self.params
    }

    /// アップロードファイルのツリーを取得
    pub fn files(&self) -> &FormTable<UploadedFile> {
        &self.files
    }

    /// トップレベルのスカラーフィールドを取得
    pub fn param(&self, name: &str) -> Option<&FieldValue> {
        self.params.get(name).and_then(FormNode::as_value)
    }

    /// トップレベルのアップロードファイルを取得
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name).and_then(FormNode::as_value)
    }

    /// (スカラーフィールド, アップロードファイル) に分解
    pub fn into_parts(self) -> (FormTable<FieldValue>, FormTable<UploadedFile>) {
        (self.params, self.files)
    }
}

/// multipart/form-data パーサー
///
/// パース中に作成した一時ファイルはパーサーが所有し、
/// [`FormDataParser::close_temp_files`] を呼ぶかパーサーが drop されるまで残る。
/// 複数回 [`FormDataParser::parse`] を呼ぶと一時ファイルは蓄積される。
#[derive(Debug, Default)]
pub struct FormDataParser {
    /// 制限設定
    limits: UploadLimits,
    /// 一時ファイル
    temp_files: TempFiles,
}

impl FormDataParser {
    /// デフォルトの制限でパーサーを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 制限を指定してパーサーを作成
    pub fn with_limits(limits: UploadLimits) -> Self {
        FormDataParser {
            limits,
            temp_files: TempFiles::new(),
        }
    }

    /// ファイル 1 つあたりの最大サイズを設定
    pub fn with_max_file_size(mut self, size: ByteSize) -> Self {
        self.limits.max_file_size = size;
        self
    }

    /// 最大ファイル数を設定
    pub fn with_max_file_count(mut self, count: usize) -> Self {
        self.limits.max_file_count = count;
        self
    }

    /// 一時ファイルを作るディレクトリを設定
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_files.set_dir(Some(dir.into()));
        self
    }

    /// 制限設定を取得
    pub fn limits(&self) -> &UploadLimits {
        &self.limits
    }

    /// ファイル 1 つあたりの最大サイズを取得
    pub fn max_file_size(&self) -> ByteSize {
        self.limits.max_file_size
    }

    /// 最大ファイル数を取得
    pub fn max_file_count(&self) -> usize {
        self.limits.max_file_count
    }

    /// 一時ファイルを作るディレクトリを取得
    pub fn temp_dir(&self) -> Option<&Path> {
        self.temp_files.dir()
    }

    /// 保持している一時ファイルを取得
    pub fn temp_files(&self) -> &TempFiles {
        &self.temp_files
    }

    /// リクエストヘッダーとボディをパース
    ///
    /// `content-type` ヘッダーは大文字小文字を区別せずに探す。
    pub fn parse<K, V>(&mut self, headers: &[(K, V)], body: &[u8]) -> Result<FormData, Rejection>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let content_type = headers
            .iter()
            .find(|(name, _)| name.as_ref().eq_ignore_ascii_case("content-type"))
            .map_or("", |(_, value)| value.as_ref());
        self.parse_with_content_type(content_type, body)
    }

    /// Content-Type ヘッダー値とボディをパース
    pub fn parse_with_content_type(
        &mut self,
        content_type: &str,
        body: &[u8],
    ) -> Result<FormData, Rejection> {
        let boundary = extract_boundary(content_type).inspect_err(|rejection| {
            log::debug!("Rejected request body: {}", rejection);
        })?;
        if body.is_empty() {
            log::debug!("Rejected request body: {}", Rejection::EmptyBody);
            return Err(Rejection::EmptyBody);
        }

        let mut form = FormData::default();
        let mut file_count = 0;

        for part in split_parts(body, boundary) {
            if part.is_empty() {
                continue;
            }

            let (head, value) = split_head_and_body(part);
            let headers = PartHeaders::parse_bytes(head);

            let Some(name) = headers.field_name() else {
                log::debug!("Skipped part without a field name");
                continue;
            };

            match headers.filename() {
                Some(filename) => {
                    if file_count >= self.limits.max_file_count {
                        log::debug!(
                            "Skipped file part '{}': file count limit {} reached",
                            name,
                            self.limits.max_file_count
                        );
                        continue;
                    }
                    let media_type = headers.content_type().unwrap_or(DEFAULT_MEDIA_TYPE);
                    let file = self.ingest_file(filename, media_type, value);
                    form.files.insert(name, file);
                    file_count += 1;
                }
                None => {
                    log::trace!("Parsed field '{}' ({} bytes)", name, value.len());
                    form.params.insert(name, FieldValue::from(value));
                }
            }
        }

        Ok(form)
    }

    /// 一時ファイルをすべて閉じる
    ///
    /// 何度呼んでもよい。以前のパース結果の `tmp_name` は読めなくなる。
    pub fn close_temp_files(&mut self) {
        self.temp_files.close_all();
    }

    fn ingest_file(&mut self, filename: &str, media_type: &str, data: &[u8]) -> UploadedFile {
        let size = data.len() as ByteSize;
        if size > self.limits.max_file_size {
            log::debug!(
                "Uploaded file '{}' exceeds the size limit: {} > {}",
                filename,
                size,
                self.limits.max_file_size
            );
            return UploadedFile::failed(filename, media_type, UploadError::SizeExceeded, size);
        }

        match self.temp_files.store(data) {
            Ok(stored) => {
                log::trace!(
                    "Stored uploaded file '{}' at '{}' ({} bytes)",
                    filename,
                    stored.path.display(),
                    stored.size
                );
                UploadedFile::stored(filename, media_type, &stored.path, stored.size)
            }
            Err(e) => {
                log::warn!("Failed to store uploaded file '{}': {}", filename, e);
                UploadedFile::failed(filename, media_type, UploadError::CannotWrite, 0)
            }
        }
    }
}
