//! ブラケット記法のフィールド名によるツリー構築
//!
//! ## 概要
//!
//! `item[name]`, `item[]`, `a[b][][c]` のようなフィールド名を階層パスとして解釈し、
//! 値をネストしたテーブルに格納します。
//!
//! - `[key]` はテーブルのキー
//! - `[]` は暗黙のリストへの追加 (現在の最大インデックス + 1)
//! - `"0"`, `"12"` のような 10 進数のキーはインデックスとして扱う
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_form_data::form_tree::{FieldValue, FormTable};
//!
//! let mut params = FormTable::new();
//! params.insert("item[name]", FieldValue::from("x"));
//! params.insert("tags[]", FieldValue::from("a"));
//! params.insert("tags[]", FieldValue::from("b"));
//!
//! let name = params.get_path(&["item", "name"]).and_then(|n| n.as_value());
//! assert_eq!(name.and_then(FieldValue::as_str), Some("x"));
//!
//! let tags = params.get("tags").and_then(|n| n.as_table()).unwrap();
//! assert_eq!(tags.len(), 2);
//! assert_eq!(tags.get("1").and_then(|n| n.as_value()).unwrap().as_bytes(), b"b");
//! ```

use std::collections::HashMap;
use std::fmt;

/// フィールド名をパスセグメントに分割
///
/// `][` と `[` で区切り、各セグメントの前後の `]` を除去する。
/// 空のセグメントはリストへの追加を意味する。
///
/// ```rust
/// use shiguredo_form_data::form_tree::field_path;
///
/// assert_eq!(field_path("a[b][][c]"), ["a", "b", "", "c"]);
/// assert_eq!(field_path("plain"), ["plain"]);
/// ```
pub fn field_path(name: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut rest = name;

    while let Some(pos) = rest.find('[') {
        // `][` は 1 つの区切りとして扱う
        let segment = &rest[..pos];
        let segment = segment.strip_suffix(']').unwrap_or(segment);
        segments.push(segment.trim_matches(']'));
        rest = &rest[pos + 1..];
    }
    segments.push(rest.trim_matches(']'));

    segments
}

/// テーブルのキー
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FormKey {
    /// 整数インデックス
    Index(u64),
    /// 名前
    Name(String),
}

impl FormKey {
    /// パスセグメントからキーを作成
    ///
    /// 先頭ゼロの無い 10 進数は [`FormKey::Index`] になる。
    pub fn from_segment(segment: &str) -> Self {
        let canonical = !segment.is_empty()
            && segment.bytes().all(|b| b.is_ascii_digit())
            && (segment == "0" || !segment.starts_with('0'));
        match segment.parse() {
            Ok(index) if canonical => FormKey::Index(index),
            _ => FormKey::Name(segment.to_string()),
        }
    }
}

impl fmt::Display for FormKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormKey::Index(index) => write!(f, "{}", index),
            FormKey::Name(name) => write!(f, "{}", name),
        }
    }
}

/// ツリーのノード
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormNode<T> {
    /// 葉の値
    Value(T),
    /// ネストしたテーブル
    Table(FormTable<T>),
}

impl<T> FormNode<T> {
    /// 葉の値を取得
    pub fn as_value(&self) -> Option<&T> {
        match self {
            FormNode::Value(value) => Some(value),
            FormNode::Table(_) => None,
        }
    }

    /// テーブルを取得
    pub fn as_table(&self) -> Option<&FormTable<T>> {
        match self {
            FormNode::Value(_) => None,
            FormNode::Table(table) => Some(table),
        }
    }

    /// テーブルの子ノードを取得
    pub fn get(&self, key: &str) -> Option<&FormNode<T>> {
        self.as_table()?.get(key)
    }
}

/// 挿入順を保持するテーブル
///
/// キーの検索と `[]` による追加はエントリ数によらず定数時間で行う。
#[derive(Debug, Clone)]
pub struct FormTable<T> {
    /// 挿入順のエントリ
    entries: Vec<(FormKey, FormNode<T>)>,
    /// キーから `entries` の位置への索引
    positions: HashMap<FormKey, usize>,
    /// 次に追加するインデックス (整数キーの最大値 + 1)
    next_index: u64,
}

impl<T> Default for FormTable<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
            next_index: 0,
        }
    }
}

// 索引は entries から決まるので比較には含めない
impl<T: PartialEq> PartialEq for FormTable<T> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<T: Eq> Eq for FormTable<T> {}

impl<T> FormTable<T> {
    /// 空のテーブルを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// フィールド名が指すパスに値を格納
    ///
    /// 途中のテーブルは必要に応じて作成する。途中に葉があれば空のテーブルで置き換える。
    /// 最終位置に既存のノードがあれば上書きする。
    pub fn insert(&mut self, name: &str, value: T) {
        let segments = field_path(name);
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut table = self;
        for segment in parents {
            table = table.child_table(segment);
        }

        let node = FormNode::Value(value);
        if last.is_empty() {
            table.push(node);
        } else {
            table.set(FormKey::from_segment(last), node);
        }
    }

    /// キーでノードを取得
    pub fn get(&self, key: &str) -> Option<&FormNode<T>> {
        let pos = *self.positions.get(&FormKey::from_segment(key))?;
        Some(&self.entries[pos].1)
    }

    /// パスでノードを取得
    pub fn get_path(&self, path: &[&str]) -> Option<&FormNode<T>> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.get(first)?, |node, key| node.get(key))
    }

    /// エントリを挿入順に取得
    pub fn iter(&self) -> impl Iterator<Item = (&FormKey, &FormNode<T>)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// エントリ数を取得
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// キーが 0 から始まる連番かどうか
    pub fn is_list(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(i, (k, _))| *k == FormKey::Index(i as u64))
    }

    /// 葉を深さ優先で取得
    pub fn leaves(&self) -> Vec<&T> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a T>) {
        for (_, node) in &self.entries {
            match node {
                FormNode::Value(value) => leaves.push(value),
                FormNode::Table(table) => table.collect_leaves(leaves),
            }
        }
    }

    fn push(&mut self, node: FormNode<T>) -> usize {
        self.set(FormKey::Index(self.next_index), node)
    }

    fn set(&mut self, key: FormKey, node: FormNode<T>) -> usize {
        if let Some(&pos) = self.positions.get(&key) {
            self.entries[pos].1 = node;
            return pos;
        }

        if let FormKey::Index(index) = key {
            self.next_index = self.next_index.max(index.saturating_add(1));
        }
        let pos = self.entries.len();
        self.positions.insert(key.clone(), pos);
        self.entries.push((key, node));
        pos
    }

    /// セグメントが指す子テーブルを取得 (無ければ作成)
    fn child_table(&mut self, segment: &str) -> &mut FormTable<T> {
        let pos = if segment.is_empty() {
            self.push(FormNode::Table(FormTable::new()))
        } else {
            let key = FormKey::from_segment(segment);
            match self.positions.get(&key) {
                Some(&pos) => pos,
                None => self.set(key, FormNode::Table(FormTable::new())),
            }
        };

        let node = &mut self.entries[pos].1;
        if matches!(node, FormNode::Value(_)) {
            *node = FormNode::Table(FormTable::new());
        }
        match node {
            FormNode::Table(table) => table,
            FormNode::Value(_) => unreachable!("leaf replaced by table"),
        }
    }
}

/// スカラーフィールドの値 (バイト列のまま保持する)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue(Vec<u8>);

impl FieldValue {
    /// バイト列から作成
    pub fn new(bytes: Vec<u8>) -> Self {
        FieldValue(bytes)
    }

    /// バイト列を取得
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// UTF-8 文字列として取得
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// バイト列に変換
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// バイト長を取得
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue(value.as_bytes().to_vec())
    }
}

impl From<&[u8]> for FieldValue {
    fn from(value: &[u8]) -> Self {
        FieldValue(value.to_vec())
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        FieldValue(value)
    }
}
