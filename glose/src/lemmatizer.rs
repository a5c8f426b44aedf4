//! 品詞付与と見出し語化のフィルター
//!
//! このモジュールは、トークナイザーの出力に辞書引きでタグと見出し語を
//! 付与するストリーム段を提供します。曖昧性解消は行わず、語形に対して
//! 最も頻度の高いタグ+見出し語を辞書から与えます。誤りは完全に決定的で、
//! 学習が役に立たない古い時代のテキストでも頑健です。
//!
//! 大文字で始まる語の扱いはフランス語（および英語）の規則に基づきます:
//! 文頭以外の大文字語は、一般語として誤って大文字化されたものより
//! 固有名詞である可能性が高い、という推定です。この規則のために
//! 「直前のトークンが句読点だったか」という真偽値1つだけを
//! 呼び出しをまたいで保持します。

use std::sync::Arc;

use crate::charbuf::CharBuf;
use crate::chars;
use crate::dictionary::{Dictionaries, LexEntry};
use crate::tag::Tag;
use crate::token::{Token, TokenStream};
use crate::utils::roman_to_int;

/// 品詞付与・見出し語化の段
///
/// 規則の適用順（大文字で始まる語）:
///
/// 1. 全部大文字ならローマ数字を試し、成功すれば10進値を見出し語に持つ
///    数トークンにする
/// 2. 表記正規化の後、大文字のまま固有名詞辞書を引く。ヒットすれば
///    辞書の正規表記が表層形を上書きする（PARIS → Paris）
/// 3. ハイフンを含む語は最初の要素でも固有名詞辞書を引く
///    （Jean-Paul → Jean）
/// 4. 文中（直前が句読点でない）なら未知の固有名詞と推定する
/// 5. 文頭なら先頭を小文字化して一般語辞書を引く。外れたら大文字を
///    復元して既定のタグに戻す
#[derive(Debug)]
pub struct Lemmatizer<T> {
    input: T,
    dics: Arc<Dictionaries>,
    /// 直前に送出したトークンが句読点だったか。文頭は真として扱う
    waspun: bool,
    /// 辞書が外れた時に表層形を復元するための控え
    copy: CharBuf,
}

impl<T: TokenStream> Lemmatizer<T> {
    /// 新しい見出し語化の段を生成します
    ///
    /// # 引数
    ///
    /// * `input` - 前段のストリーム
    /// * `dics` - 共有辞書
    pub fn new(input: T, dics: Arc<Dictionaries>) -> Self {
        Self {
            input,
            dics,
            waspun: true,
            copy: CharBuf::new(),
        }
    }

    /// 前段への可変参照を返します
    pub fn input_mut(&mut self) -> &mut T {
        &mut self.input
    }

    /// 辞書エントリの内容をトークンに適用する
    fn apply(token: &mut Token, entry: &LexEntry) {
        token.tag = entry.tag;
        if let Some(orth) = &entry.orth {
            token.term.copy_from(orth);
        }
        if let Some(lem) = &entry.lem {
            token.lem.copy_from(lem);
        }
    }
}

impl<T: TokenStream> TokenStream for Lemmatizer<T> {
    fn advance(&mut self, token: &mut Token) -> bool {
        if !self.input.advance(token) {
            return false;
        }
        let waspun = self.waspun;
        self.waspun = false;
        if token.term.is_empty() {
            return true;
        }
        if token.tag.is_pun() {
            self.waspun = true;
            return true;
        }
        // トークナイザーが検出した数と省略形はそのまま
        if token.tag == Tag::Num || token.tag == Tag::Abbr {
            return true;
        }
        let c1 = token.term.char_at(0);
        if !chars::is_token(c1) {
            return true;
        }

        if chars::is_uppercase(c1) {
            // 全部大文字の連なりはローマ数字の可能性（XVIII 章番号など）
            let term = token.term.as_chars();
            if term.len() > 1 && term.iter().all(|&c| chars::is_uppercase(c)) {
                let n = roman_to_int(term);
                if n > 0 {
                    token.tag = Tag::Num;
                    token.lem.clear();
                    token.lem.push_str(&n.to_string());
                    return true;
                }
            }
            self.dics.norm(&mut token.term); // Etat -> État
            self.copy.copy_from(token.term.as_chars());
            // 固有名詞辞書、大文字のまま
            if let Some(entry) = self.dics.name(token.term.as_chars()) {
                Self::apply(token, entry);
                return true;
            }
            // Charles-François-Bienvenu: 最初の要素で引き直す
            if let Some(pos) = token.term.index_of('-') {
                if pos > 0 {
                    if let Some(entry) = self.dics.name(&token.term.as_chars()[..pos]) {
                        token.tag = entry.tag;
                        return true;
                    }
                }
            }
            if !waspun {
                // 文中の大文字語、辞書になければ固有名詞と推定する
                token.tag = Tag::Name;
                token.term.copy_from(self.copy.as_chars());
                return true;
            }
            // 文頭。先頭を小文字化して一般語を引く
            token.term.first_to_lower();
            if let Some(entry) = self.dics.word(token.term.as_chars()) {
                Self::apply(token, entry);
                return true;
            }
            // 外れたら大文字を復元する
            token.term.copy_from(self.copy.as_chars());
            token.tag = Tag::Unknown;
            return true;
        }

        self.dics.norm(&mut token.term); // oeil -> œil
        if let Some(entry) = self.dics.word(token.term.as_chars()) {
            Self::apply(token, entry);
        }
        true
    }

    fn reset(&mut self) {
        self.input.reset();
        self.waspun = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Tokenizer;

    fn pipeline(text: &str) -> Vec<Token> {
        let dics = Arc::new(Dictionaries::from_embedded().unwrap());
        let mut tokenizer = Tokenizer::new(Arc::clone(&dics));
        tokenizer.reset_text(text);
        let mut lem = Lemmatizer::new(tokenizer, dics);
        let mut token = Token::new();
        let mut out = vec![];
        while lem.advance(&mut token) {
            out.push(token.clone());
        }
        out
    }

    /// 一般語のタグと見出し語のテスト
    #[test]
    fn test_words() {
        let tokens = pipeline("les chats disent");
        assert_eq!(tokens[0].tag, Tag::DetArt);
        assert_eq!(tokens[1].tag, Tag::Sub);
        assert_eq!(tokens[1].lem, "chat");
        assert_eq!(tokens[2].tag, Tag::VerbExpr);
        assert_eq!(tokens[2].lem, "dire");
    }

    /// 文頭の大文字語が一般語に戻ることのテスト
    #[test]
    fn test_sentence_start() {
        let tokens = pipeline("Les chats. Vers le soir");
        assert_eq!(tokens[0].term, "les");
        assert_eq!(tokens[0].tag, Tag::DetArt);
        // 句読点の後も文頭の扱い
        assert_eq!(tokens[3].term, "vers");
        assert_eq!(tokens[3].tag, Tag::Prep);
    }

    /// 文中の大文字語が固有名詞と推定されることのテスト
    #[test]
    fn test_name_inference() {
        let tokens = pipeline("le sieur Gaudissart parle");
        let gaudissart = &tokens[2];
        assert_eq!(gaudissart.term, "Gaudissart");
        assert_eq!(gaudissart.tag, Tag::Name);
        assert!(gaudissart.lemma().is_none());
    }

    /// 固有名詞辞書と正規表記のテスト
    #[test]
    fn test_names() {
        let tokens = pipeline("Hugo visite PARIS");
        assert_eq!(tokens[0].tag, Tag::NameAuthor);
        // 辞書好みの表記が表層形を上書きする
        assert_eq!(tokens[2].term, "Paris");
        assert_eq!(tokens[2].tag, Tag::NamePlace);
    }

    /// ハイフン付き固有名詞の要素引きのテスト
    #[test]
    fn test_hyphen_prefix() {
        let tokens = pipeline("Charles-François-Bienvenu");
        assert_eq!(tokens[0].tag, Tag::NamePersM);
        assert_eq!(tokens[0].term, "Charles-François-Bienvenu");
    }

    /// ローマ数字のテスト
    #[test]
    fn test_roman() {
        let tokens = pipeline("chapitre XVIII ici");
        assert_eq!(tokens[1].tag, Tag::Num);
        assert_eq!(tokens[1].lem, "18");
        // 表層形は保たれる
        assert_eq!(tokens[1].term, "XVIII");
        // 大文字と小文字の混在はローマ数字にならない
        let tokens = pipeline("et Il dort");
        assert_eq!(tokens[1].tag, Tag::Name);
    }

    /// 表記正規化のテスト
    #[test]
    fn test_norm() {
        let tokens = pipeline("l'oeil de l'Etat");
        assert_eq!(tokens[1].term, "œil");
        assert_eq!(tokens[1].tag, Tag::Sub);
        // 文中の Etat は État に正規化され、辞書になければ固有名詞扱い
        assert_eq!(tokens[4].term, "État");
    }

    /// 辞書が外れた時に表層形が戻ることのテスト
    #[test]
    fn test_rollback() {
        let tokens = pipeline("Zorglub arrive");
        // 文頭: 小文字化して引き、外れたら大文字を復元
        assert_eq!(tokens[0].term, "Zorglub");
        assert_eq!(tokens[0].tag, Tag::Unknown);
    }
}
