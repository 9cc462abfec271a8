//! パートヘッダーブロックのパース
//!
//! ## 概要
//!
//! multipart の 1 パート分のヘッダー行をまとめてパースします。
//! `Content-Disposition: form-data; name="x"; filename="y"` のように `;` を含む値は
//! 名前付き属性と名前なしトークンに分解されます。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_form_data::header_block::PartHeaders;
//!
//! let headers = PartHeaders::parse(
//!     "Content-Disposition: form-data; name=\"file\"; filename=\"a.txt\"\r\n\
//!      Content-Type: text/plain",
//! );
//!
//! let cd = headers.get("content-disposition").unwrap();
//! assert_eq!(cd.tokens(), ["form-data"]);
//! assert_eq!(cd.attribute("name"), Some("file"));
//! assert_eq!(cd.attribute("filename"), Some("a.txt"));
//! assert_eq!(headers.get("Content-Type").unwrap().as_str(), "text/plain");
//! ```

/// ヘッダー値
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    /// `;` を含まない値
    Bare(String),
    /// `;` 区切りの属性付きの値
    Attributes(HeaderAttributes),
}

impl HeaderValue {
    /// ヘッダー値全体を取得 (前後の空白は除去済み)
    pub fn as_str(&self) -> &str {
        match self {
            HeaderValue::Bare(value) => value,
            HeaderValue::Attributes(attributes) => &attributes.raw,
        }
    }

    /// 名前付き属性の値を取得
    ///
    /// 属性名は大文字小文字を区別しない。[`HeaderValue::Bare`] は常に `None`。
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            HeaderValue::Bare(_) => None,
            HeaderValue::Attributes(attributes) => attributes.get(name),
        }
    }

    /// 名前なしトークンを出現順に取得
    pub fn tokens(&self) -> &[String] {
        match self {
            HeaderValue::Bare(_) => &[],
            HeaderValue::Attributes(attributes) => &attributes.tokens,
        }
    }
}

/// `;` 区切りでパースしたヘッダー属性
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderAttributes {
    /// 元の値
    raw: String,
    /// `=` を含まないトークン
    tokens: Vec<String>,
    /// 名前付き属性 (名前は小文字、値は引用符を 1 段除去済み)
    named: Vec<(String, String)>,
}

impl HeaderAttributes {
    fn parse(raw: &str) -> Self {
        let mut attributes = HeaderAttributes {
            raw: raw.to_string(),
            tokens: Vec::new(),
            named: Vec::new(),
        };

        for segment in raw.split(';') {
            let segment = segment.trim();
            match segment.split_once('=') {
                None => attributes.tokens.push(segment.to_string()),
                Some((name, value)) => {
                    let name = name.trim().to_ascii_lowercase();
                    let value = strip_quotes(value.trim()).to_string();
                    attributes.set(name, value);
                }
            }
        }

        attributes
    }

    /// 名前付き属性の値を取得
    pub fn get(&self, name: &str) -> Option<&str> {
        self.named
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// 名前付き属性を出現順に取得
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.named.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 同名の属性は後勝ち
    fn set(&mut self, name: String, value: String) {
        if let Some(slot) = self.named.iter_mut().find(|(k, _)| *k == name) {
            slot.1 = value;
        } else {
            self.named.push((name, value));
        }
    }
}

/// パートヘッダーの集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartHeaders {
    /// (小文字のヘッダー名, 値)
    headers: Vec<(String, HeaderValue)>,
}

impl PartHeaders {
    /// ヘッダーブロックをパース
    ///
    /// 任意の改行で行に分割し、空行と `:` を含まない行は読み飛ばす。
    /// 同名ヘッダーは後勝ち。
    pub fn parse(block: &str) -> Self {
        let mut headers = PartHeaders::default();

        for line in block.split(is_line_break).filter(|line| !line.is_empty()) {
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim();

            let value = if value.contains(';') {
                HeaderValue::Attributes(HeaderAttributes::parse(value))
            } else {
                HeaderValue::Bare(value.to_string())
            };
            headers.set(name, value);
        }

        headers
    }

    /// バイト列のヘッダーブロックをパース (不正な UTF-8 は置換文字になる)
    pub fn parse_bytes(block: &[u8]) -> Self {
        Self::parse(&String::from_utf8_lossy(block))
    }

    /// ヘッダー値を取得 (ヘッダー名は大文字小文字を区別しない)
    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Content-Disposition の name 属性を取得
    pub fn field_name(&self) -> Option<&str> {
        self.get("content-disposition")?.attribute("name")
    }

    /// Content-Disposition の filename 属性を取得
    pub fn filename(&self) -> Option<&str> {
        self.get("content-disposition")?.attribute("filename")
    }

    /// Content-Type ヘッダー値を取得
    pub fn content_type(&self) -> Option<&str> {
        self.get("content-type").map(HeaderValue::as_str)
    }

    /// ヘッダー数を取得
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// ヘッダーが無いかどうか
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// ヘッダーを出現順に取得
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn set(&mut self, name: String, value: HeaderValue) {
        if let Some(slot) = self.headers.iter_mut().find(|(k, _)| *k == name) {
            slot.1 = value;
        } else {
            self.headers.push((name, value));
        }
    }
}

/// 改行文字 (CR, LF, VT, FF)
///
/// NEL (0x85) は UTF-8 の継続バイトと衝突するため含めない。
pub(crate) fn is_line_break(c: char) -> bool {
    matches!(c, '\r' | '\n' | '\x0b' | '\x0c')
}

/// 前後のダブルクオートを 1 段だけ除去
fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
