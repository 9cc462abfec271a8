//! # shiguredo_form_data
//!
//! メモリ上の multipart/form-data リクエストボディのパーサー
//!
//! ## 特徴
//!
//! - **一括パース**: ボディ全体を受け取り、1 回の呼び出しで結果を返す
//! - **ブラケット記法**: `a[b][]` のようなフィールド名をツリーに展開する
//! - **一時ファイル管理**: アップロードファイルは一時ファイルに保存し、パーサーが寿命を管理する
//! - **制限**: ファイルサイズ上限とファイル数上限を設定できる
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_form_data::{FormDataParser, UploadLimits};
//!
//! let body = b"--b\r\n\
//!     Content-Disposition: form-data; name=\"user[name]\"\r\n\r\n\
//!     alice\r\n\
//!     --b\r\n\
//!     Content-Disposition: form-data; name=\"docs[]\"; filename=\"a.txt\"\r\n\
//!     Content-Type: text/plain\r\n\r\n\
//!     hello\r\n\
//!     --b--\r\n";
//!
//! let limits = UploadLimits::from_ini_values("8M", "2M", "20");
//! let mut parser = FormDataParser::with_limits(limits);
//! let form = parser
//!     .parse(&[("Content-Type", "multipart/form-data; boundary=b")], body)
//!     .unwrap();
//!
//! let name = form.params().get_path(&["user", "name"]).unwrap();
//! assert_eq!(name.as_value().unwrap().as_str(), Some("alice"));
//!
//! let docs = form.files().get("docs").unwrap().as_table().unwrap();
//! assert!(docs.is_list());
//! assert_eq!(docs.leaves()[0].size(), 5);
//!
//! // 一時ファイルを閉じる (drop でも閉じられる)
//! parser.close_temp_files();
//! ```

pub mod boundary;
pub mod byte_size;
mod error;
pub mod form_tree;
pub mod header_block;
mod json;
mod limits;
mod parser;
pub mod temp_files;
pub mod upload;

pub use byte_size::{ByteSize, UNLIMITED};
pub use error::Rejection;
pub use form_tree::{FieldValue, FormKey, FormNode, FormTable};
pub use limits::{
    DEFAULT_MAX_FILE_COUNT, DEFAULT_POST_MAX_SIZE, DEFAULT_UPLOAD_MAX_FILESIZE, UploadLimits,
};
pub use parser::{FormData, FormDataParser};
pub use upload::{UploadError, UploadedFile};
