use std::fmt;

/// リクエスト全体を multipart/form-data として扱えない理由
///
/// いずれの場合もパース結果は一切返さず、一時ファイルも作らない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Content-Type が無い、または multipart/form-data ではない
    NotMultipart,
    /// multipart/form-data だが boundary パラメータが無い
    NoBoundary,
    /// ボディが空
    EmptyBody,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NotMultipart => write!(f, "content type is not multipart/form-data"),
            Rejection::NoBoundary => write!(f, "missing multipart boundary"),
            Rejection::EmptyBody => write!(f, "empty multipart body"),
        }
    }
}

impl std::error::Error for Rejection {}
