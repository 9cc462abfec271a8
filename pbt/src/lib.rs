//! PBT テスト共通ユーティリティ

use proptest::prelude::*;

// ========================================
// フィールド名生成
// ========================================

/// フィールド名のセグメント: 英字で始まる (1-12 文字)
///
/// 数字だけのセグメントはインデックスになるため含めない。
pub fn field_segment() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_]{0,11}".prop_map(|s| s)
}

/// 数字のセグメント (先頭ゼロなし)
pub fn index_segment() -> impl Strategy<Value = String> {
    (0u32..1000).prop_map(|n| n.to_string())
}

/// ブラケット記法のフィールド名: base *("[" segment "]")
pub fn bracket_field_name() -> impl Strategy<Value = (String, Vec<String>)> {
    (
        field_segment(),
        proptest::collection::vec(prop_oneof![field_segment(), index_segment()], 0..=3),
    )
        .prop_map(|(base, rest)| {
            let mut name = base.clone();
            for segment in &rest {
                name.push('[');
                name.push_str(segment);
                name.push(']');
            }
            let mut path = vec![base];
            path.extend(rest);
            (name, path)
        })
}

// ========================================
// 値と boundary 生成
// ========================================

/// テキスト値: 改行とハイフンを含まない
pub fn text_value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 _.,:;=!?]{0,32}".prop_map(|s| s)
}

/// boundary: 英数字のみ (8-40 文字)
pub fn boundary() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]{8,40}".prop_map(|s| s)
}

/// サイズの単位サフィックスと倍率
pub fn size_suffix() -> impl Strategy<Value = (&'static str, u64)> {
    prop_oneof![
        Just(("", 1u64)),
        Just(("k", 1024u64)),
        Just(("K", 1024u64)),
        Just(("m", 1024u64 * 1024)),
        Just(("M", 1024u64 * 1024)),
        Just(("g", 1024u64 * 1024 * 1024)),
        Just(("G", 1024u64 * 1024 * 1024)),
        Just(("t", 1024u64 * 1024 * 1024 * 1024)),
    ]
}

// ========================================
// ボディ生成
// ========================================

/// multipart/form-data ボディを組み立てる
pub struct BodyBuilder {
    boundary: String,
    body: Vec<u8>,
}

impl BodyBuilder {
    pub fn new(boundary: &str) -> Self {
        Self {
            boundary: boundary.to_string(),
            body: Vec::new(),
        }
    }

    /// Content-Type ヘッダー値
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// スカラーフィールドを追加
    pub fn field(mut self, name: &str, value: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n",
                self.boundary, name
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(value);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// ファイルパートを追加
    pub fn file(mut self, name: &str, filename: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n",
                self.boundary, name, filename
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// 終端の区切りを付けてボディを返す
    pub fn build(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.body
    }
}
