//! 一時ファイルの管理
//!
//! ## 概要
//!
//! アップロードされたファイルごとに一時ファイルを作成し、その寿命を管理します。
//!
//! - 作成した一時ファイルはすべて [`TempFiles`] が所有する
//! - [`TempFiles::close_all`] で明示的に閉じて削除できる (何度呼んでもよい)
//! - [`TempFiles`] が drop されると残っている一時ファイルもすべて閉じる
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_form_data::temp_files::TempFiles;
//!
//! let mut temp_files = TempFiles::new();
//! let stored = temp_files.store(b"upfile").unwrap();
//! assert_eq!(stored.size, 6);
//! assert_eq!(std::fs::read(&stored.path).unwrap(), b"upfile");
//!
//! temp_files.close_all();
//! assert!(!stored.path.exists());
//! ```

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};

use crate::byte_size::ByteSize;

const TEMP_FILE_PREFIX: &str = "form-data-";

/// 保存した一時ファイルの情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// 一時ファイルのパス
    pub path: PathBuf,
    /// 書き込んだ後のファイルサイズ
    pub size: ByteSize,
}

/// 一時ファイルの所有者
#[derive(Debug, Default)]
pub struct TempFiles {
    /// 一時ファイルを作るディレクトリ (None ならシステムの一時ディレクトリ)
    dir: Option<PathBuf>,
    /// 作成済みの一時ファイル
    files: Vec<NamedTempFile>,
}

impl TempFiles {
    /// システムの一時ディレクトリを使う管理者を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 一時ファイルを作るディレクトリを指定して作成
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        TempFiles {
            dir: Some(dir.into()),
            files: Vec::new(),
        }
    }

    /// 一時ファイルを作るディレクトリを取得
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// 一時ディレクトリを設定
    pub(crate) fn set_dir(&mut self, dir: Option<PathBuf>) {
        self.dir = dir;
    }

    /// データを新しい一時ファイルに書き込む
    ///
    /// 書き込みに失敗した一時ファイルは保持せずにその場で削除する。
    pub fn store(&mut self, data: &[u8]) -> io::Result<StoredFile> {
        let mut builder = Builder::new();
        builder.prefix(TEMP_FILE_PREFIX);
        let mut file = match &self.dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        file.write_all(data)?;
        file.flush()?;
        let size = file.as_file().metadata()?.len();

        let stored = StoredFile {
            path: file.path().to_path_buf(),
            size,
        };
        self.files.push(file);
        Ok(stored)
    }

    /// 保持している一時ファイル数を取得
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// 一時ファイルを保持していないかどうか
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// 保持している一時ファイルのパスを取得
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(NamedTempFile::path)
    }

    /// すべての一時ファイルを閉じて削除
    ///
    /// 個々の削除に失敗しても残りの処理は続ける。
    pub fn close_all(&mut self) {
        for file in self.files.drain(..) {
            let path = file.path().to_path_buf();
            if let Err(e) = file.close() {
                log::warn!(
                    "Failed to remove temporary upload file '{}': {}",
                    path.display(),
                    e
                );
            }
        }
    }
}

impl Drop for TempFiles {
    fn drop(&mut self) {
        self.close_all();
    }
}
