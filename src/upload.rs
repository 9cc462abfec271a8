//! アップロードされたファイルの記述子
//!
//! ## 概要
//!
//! ファイルパート 1 つ分の結果を表します。
//! フィールド構成 (`name`, `type`, `tmp_name`, `error`, `size`) は
//! 一般的なアップロード配列と同じ形で、JSON 出力でもこの名前を使います。
//!
//! `tmp_name` は [`TempFiles`](crate::temp_files::TempFiles) が所有する一時ファイルを指すだけで、
//! 一時ファイルが閉じられた後は読めなくなります。

use std::fmt;
use std::path::Path;

use crate::byte_size::ByteSize;

/// クライアントが Content-Type を送らなかった場合のメディアタイプ
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// ファイルごとのアップロード結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadError {
    /// 一時ファイルに保存できた
    Ok,
    /// サイズ上限を超えた
    SizeExceeded,
    /// 一時ファイルの作成または書き込みに失敗した
    CannotWrite,
}

impl UploadError {
    /// 数値のエラーコードを取得
    ///
    /// 一般的なアップロードエラーコードと同じ値 (`0`, `1`, `7`) を返す。
    pub fn code(&self) -> u8 {
        match self {
            UploadError::Ok => 0,
            UploadError::SizeExceeded => 1,
            UploadError::CannotWrite => 7,
        }
    }

    /// 数値のエラーコードから作成
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(UploadError::Ok),
            1 => Some(UploadError::SizeExceeded),
            7 => Some(UploadError::CannotWrite),
            _ => None,
        }
    }
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::Ok => write!(f, "ok"),
            UploadError::SizeExceeded => write!(f, "uploaded file exceeds the size limit"),
            UploadError::CannotWrite => write!(f, "failed to write uploaded file"),
        }
    }
}

/// アップロードされたファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// クライアントが送ったファイル名
    name: String,
    /// クライアントが送ったメディアタイプ
    media_type: String,
    /// 一時ファイルのパス (失敗時は空)
    tmp_name: String,
    /// 結果
    error: UploadError,
    /// サイズ
    size: ByteSize,
}

impl UploadedFile {
    /// 一時ファイルに保存できたファイルを作成
    pub fn stored(name: &str, media_type: &str, tmp_path: &Path, size: ByteSize) -> Self {
        UploadedFile {
            name: name.to_string(),
            media_type: media_type.to_string(),
            tmp_name: tmp_path.to_string_lossy().into_owned(),
            error: UploadError::Ok,
            size,
        }
    }

    /// 保存できなかったファイルを作成
    pub fn failed(name: &str, media_type: &str, error: UploadError, size: ByteSize) -> Self {
        UploadedFile {
            name: name.to_string(),
            media_type: media_type.to_string(),
            tmp_name: String::new(),
            error,
            size,
        }
    }

    /// クライアントが送ったファイル名を取得
    pub fn name(&self) -> &str {
        &self.name
    }

    /// メディアタイプを取得
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// 一時ファイルのパスを取得 (失敗時は空文字列)
    pub fn tmp_name(&self) -> &str {
        &self.tmp_name
    }

    /// 一時ファイルのパスを取得
    pub fn tmp_path(&self) -> Option<&Path> {
        if self.tmp_name.is_empty() {
            None
        } else {
            Some(Path::new(&self.tmp_name))
        }
    }

    /// 結果を取得
    pub fn error(&self) -> UploadError {
        self.error
    }

    /// サイズを取得
    pub fn size(&self) -> ByteSize {
        self.size
    }

    /// 保存に成功したかどうか
    pub fn is_ok(&self) -> bool {
        self.error == UploadError::Ok
    }
}
