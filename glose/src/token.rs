//! トークン型とストリームインターフェースの定義
//!
//! このモジュールは、解析パイプラインの各段が生成・変換するトークンと、
//! 各段が実装するプル型のストリームトレイトを提供します。

use crate::charbuf::CharBuf;
use crate::tag::Tag;

/// 注釈付きトークン
///
/// 表層形、タグ、見出し語、元テキスト中の文字位置を保持します。
///
/// # 所有権の契約
///
/// パイプラインはトークンの内部バッファを呼び出しごとに再利用します。
/// [`TokenStream::advance`]の次の呼び出しで内容は上書きされるため、
/// 値を保持し続ける必要がある消費者は[`Token::copy_from`]や
/// [`Clone`]で深いコピーを取らなければなりません。
#[derive(Debug, Clone)]
pub struct Token {
    /// 表層形。段によって正規化で書き換えられることがあります
    pub term: CharBuf,
    /// 形態統語タグ
    pub tag: Tag,
    /// 見出し語。空の場合は付与されていません
    pub lem: CharBuf,
    /// 元テキスト中の開始位置（文字単位、この位置を含む）
    pub start: usize,
    /// 元テキスト中の終了位置（文字単位、この位置を含まない）
    pub end: usize,
    /// 位置の増分。通常は1、直前のトークンと位置を共有する場合は0
    pub pos_inc: u32,
    /// トークンが占める位置の数。通常は1
    pub pos_len: u32,
}

impl Default for Token {
    fn default() -> Self {
        Self {
            term: CharBuf::new(),
            tag: Tag::Null,
            lem: CharBuf::new(),
            start: 0,
            end: 0,
            pos_inc: 1,
            pos_len: 1,
        }
    }
}

impl Token {
    /// 新しい空のトークンを生成します
    pub fn new() -> Self {
        Self::default()
    }

    /// 内容を初期状態に戻します。確保済みの領域は保持されます
    pub fn clear(&mut self) {
        self.term.clear();
        self.tag = Tag::Null;
        self.lem.clear();
        self.start = 0;
        self.end = 0;
        self.pos_inc = 1;
        self.pos_len = 1;
    }

    /// 他のトークンの内容を複製します
    ///
    /// 再割り当てを避けるため、既存のバッファに上書きコピーします。
    pub fn copy_from(&mut self, other: &Token) {
        self.term.copy_from(other.term.as_chars());
        self.tag = other.tag;
        self.lem.copy_from(other.lem.as_chars());
        self.start = other.start;
        self.end = other.end;
        self.pos_inc = other.pos_inc;
        self.pos_len = other.pos_len;
    }

    /// 見出し語を返します。付与されていない場合は`None`
    pub fn lemma(&self) -> Option<&[char]> {
        if self.lem.is_empty() {
            None
        } else {
            Some(self.lem.as_chars())
        }
    }
}

/// 解析パイプラインの各段が実装するプル型のストリーム
///
/// 各段は呼び出し側が所有する[`Token`]に次のトークンを書き込みます。
/// 内部に走査位置と先読み状態を持つため、1つの入力ストリームに
/// 1インスタンスを使用し、複数の呼び出し元から同時に使用しては
/// いけません。
pub trait TokenStream {
    /// 次のトークンを書き込みます
    ///
    /// # 引数
    ///
    /// * `token` - 書き込み先。前の内容は破棄されます
    ///
    /// # 戻り値
    ///
    /// トークンが得られた場合は`true`、ストリーム終端では`false`
    fn advance(&mut self, token: &mut Token) -> bool;

    /// ストリームを入力の先頭に巻き戻し、内部状態を初期化します
    fn reset(&mut self);
}
