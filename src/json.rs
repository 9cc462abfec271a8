//! パース結果の JSON 出力
//!
//! テーブルのキーが 0 からの連番なら配列、それ以外はオブジェクトとして出力する。
//! スカラーフィールドは UTF-8 として解釈し、不正なバイトは置換文字にする。
//!
//! ```rust
//! use shiguredo_form_data::FormDataParser;
//!
//! let body = b"--b\r\n\
//!     Content-Disposition: form-data; name=\"tags[]\"\r\n\r\n\
//!     a\r\n\
//!     --b--\r\n";
//! let mut parser = FormDataParser::new();
//! let form = parser
//!     .parse_with_content_type("multipart/form-data; boundary=b", body)
//!     .unwrap();
//!
//! assert_eq!(
//!     nojson::Json(&form).to_string(),
//!     r#"{"params":{"tags":["a"]},"files":[]}"#
//! );
//! ```

use std::fmt;

use nojson::{DisplayJson, JsonFormatter};

use crate::form_tree::{FieldValue, FormNode, FormTable};
use crate::parser::FormData;
use crate::upload::UploadedFile;

impl DisplayJson for FieldValue {
    fn fmt(&self, f: &mut JsonFormatter<'_, '_>) -> fmt::Result {
        f.string(String::from_utf8_lossy(self.as_bytes()))
    }
}

impl DisplayJson for UploadedFile {
    fn fmt(&self, f: &mut JsonFormatter<'_, '_>) -> fmt::Result {
        f.object(|f| {
            f.member("name", self.name())?;
            f.member("type", self.media_type())?;
            f.member("tmp_name", self.tmp_name())?;
            f.member("error", self.error().code())?;
            f.member("size", self.size())
        })
    }
}

impl<T: DisplayJson> DisplayJson for FormNode<T> {
    fn fmt(&self, f: &mut JsonFormatter<'_, '_>) -> fmt::Result {
        match self {
            FormNode::Value(value) => DisplayJson::fmt(value, f),
            FormNode::Table(table) => DisplayJson::fmt(table, f),
        }
    }
}

impl<T: DisplayJson> DisplayJson for FormTable<T> {
    fn fmt(&self, f: &mut JsonFormatter<'_, '_>) -> fmt::Result {
        if self.is_list() {
            f.array(|f| {
                for (_, node) in self.iter() {
                    f.element(node)?;
                }
                Ok(())
            })
        } else {
            f.object(|f| {
                for (key, node) in self.iter() {
                    f.member(key, node)?;
                }
                Ok(())
            })
        }
    }
}

impl DisplayJson for FormData {
    fn fmt(&self, f: &mut JsonFormatter<'_, '_>) -> fmt::Result {
        f.object(|f| {
            f.member("params", self.params())?;
            f.member("files", self.files())
        })
    }
}
