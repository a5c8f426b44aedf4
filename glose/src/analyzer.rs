//! 解析パイプラインの組み立て
//!
//! このモジュールは、トークナイザー、品詞付与・見出し語化、複合固有名詞の
//! 結合を1本につないだ[`Analyzer`]を提供します。ホスト側の索引付けは
//! このストリームを消費し、コロケーション計算は同じストリームを
//! 語彙の頻度と共起の集計に使用します。
//!
//! # 例
//!
//! ```
//! use std::sync::Arc;
//! use glose::{Analyzer, Dictionaries, Token, TokenStream};
//!
//! let dics = Arc::new(Dictionaries::from_embedded()?);
//! let mut analyzer = Analyzer::new(dics);
//! analyzer.reset_text("Victor Hugo dit : « Non. »");
//! let mut token = Token::new();
//! assert!(analyzer.advance(&mut token));
//! assert_eq!(token.term, "Victor Hugo");
//! # Ok::<(), glose::GloseError>(())
//! ```

use std::sync::Arc;

use crate::dictionary::Dictionaries;
use crate::lemmatizer::Lemmatizer;
use crate::names::NameMerger;
use crate::token::{Token, TokenStream};
use crate::tokenizer::Tokenizer;

/// 完全な解析パイプライン
///
/// 内部に可変の走査状態を持つため、1つの入力ストリームに
/// 1インスタンスを使用します。辞書は読み取り専用なので、複数の
/// インスタンスで共有できます。
pub struct Analyzer {
    chain: NameMerger<Lemmatizer<Tokenizer>>,
}

impl Analyzer {
    /// 新しいパイプラインを生成します
    ///
    /// # 引数
    ///
    /// * `dics` - 共有辞書
    pub fn new(dics: Arc<Dictionaries>) -> Self {
        let tokenizer = Tokenizer::new(Arc::clone(&dics));
        let lemmatizer = Lemmatizer::new(tokenizer, Arc::clone(&dics));
        let chain = NameMerger::new(lemmatizer, dics);
        Self { chain }
    }

    /// 新しい入力に切り替え、パイプライン全体を巻き戻します
    ///
    /// 内部バッファは再割り当てなしで再利用されます。
    ///
    /// # 引数
    ///
    /// * `text` - 入力テキスト
    pub fn reset_text(&mut self, text: &str) {
        self.chain.input_mut().input_mut().reset_text(text);
        self.chain.reset();
    }

    /// トークナイザーへの参照を返します
    ///
    /// 構造タグ・スキップタグの設定や文字位置からバイト位置への変換に
    /// 使用します。
    pub fn tokenizer_mut(&mut self) -> &mut Tokenizer {
        self.chain.input_mut().input_mut()
    }

    /// 入力全体を解析し、所有権付きのトークン列を返します
    ///
    /// ストリーミングが不要な小さな入力のための便宜メソッドです。
    ///
    /// # 引数
    ///
    /// * `text` - 入力テキスト
    pub fn tokens(&mut self, text: &str) -> Vec<Token> {
        self.reset_text(text);
        let mut token = Token::new();
        let mut out = vec![];
        while self.advance(&mut token) {
            out.push(token.clone());
        }
        out
    }
}

impl TokenStream for Analyzer {
    fn advance(&mut self, token: &mut Token) -> bool {
        self.chain.advance(token)
    }

    fn reset(&mut self) {
        self.chain.reset();
    }
}
