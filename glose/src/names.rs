//! 複合固有名詞の結合フィルター
//!
//! このモジュールは、品詞付与の後段で、名前タグの付いたトークンの連なり
//! （連結辞を挟むものを含む）を1つのトークンに結合するストリーム段を
//! 提供します。Victor Hugo、Jean de La Salle のような辞書にない連なりも
//! 貪欲に結合し、結合後の文字列でもう一度固有名詞辞書を引いて、より
//! 特定的なタグや正規表記があれば採用します。
//!
//! 先読みで読んだトークンは必ず再送キューに保存され、結合が成立しない
//! 場合はそのまま順に再送されます。トークンが失われることはありません。

use std::collections::VecDeque;
use std::sync::Arc;

use crate::charbuf::CharBuf;
use crate::chars;
use crate::dictionary::Dictionaries;
use crate::tag::Tag;
use crate::token::{Token, TokenStream};

/// 複合固有名詞の結合段
///
/// 結合の対象は `名前 (連結辞 | 名前)* 名前` の形の連なりです。
/// 連結は単一の空白で行われますが、アポストロフィの後には空白を
/// 置きません。結合されたトークンの位置は最初の構成要素の開始から
/// 最後の構成要素の終了までを覆います。
#[derive(Debug)]
pub struct NameMerger<T> {
    input: T,
    dics: Arc<Dictionaries>,
    /// 先読みしたトークンの再送キュー。先頭が最も古い
    stack: VecDeque<Token>,
    /// 結合中の表層形
    term: CharBuf,
    /// 結合中の見出し語（Mr A. Nom > Nom のような人物キー候補）
    lem: CharBuf,
    /// 先読み用の作業トークン
    work: Token,
}

impl<T: TokenStream> NameMerger<T> {
    /// 新しい結合段を生成します
    ///
    /// # 引数
    ///
    /// * `input` - 前段のストリーム（品詞付与済み）
    /// * `dics` - 共有辞書。連結辞の集合と結合後の引き直しに使用します
    pub fn new(input: T, dics: Arc<Dictionaries>) -> Self {
        Self {
            input,
            dics,
            stack: VecDeque::new(),
            term: CharBuf::new(),
            lem: CharBuf::new(),
            work: Token::new(),
        }
    }

    /// 前段への可変参照を返します
    pub fn input_mut(&mut self) -> &mut T {
        &mut self.input
    }
}

impl<T: TokenStream> TokenStream for NameMerger<T> {
    fn advance(&mut self, token: &mut Token) -> bool {
        // 先読みで読み過ぎたトークンを先に再送する
        if let Some(saved) = self.stack.pop_front() {
            token.copy_from(&saved);
            return true;
        }
        if !self.input.advance(token) {
            return false;
        }

        let flags = token.tag;
        // 連なり全体のタグの候補
        let mut tag_end = flags;
        let mut name_found = false;
        if flags == Tag::NamePersM || flags == Tag::NamePersF {
            // 名（プレノム）なら人物
            tag_end = Tag::NamePers;
            name_found = true;
        } else if flags.is_name() && chars::is_uppercase(token.term.char_at(0)) {
            name_found = true;
        } else if flags == Tag::SubPers {
            // Monsieur Madeleine は結合、Madame va bien ? は巻き戻し
            tag_end = Tag::NamePers;
            self.stack.push_back(token.clone());
        } else if flags == Tag::SubPlace {
            // Rue Plumet
            tag_end = Tag::NamePlace;
            self.stack.push_back(token.clone());
        } else {
            // 名前の始まりではない
            return true;
        }

        self.term.clear();
        self.lem.clear();
        self.term.push_slice(token.term.as_chars());
        self.term.mark();
        // 称号（monsieur…）は人物キーの一部にしない
        if flags != Tag::SubPers && flags != Tag::SubPlace {
            if token.lem.is_empty() {
                self.lem.push_slice(token.term.as_chars());
            } else {
                self.lem.push_slice(token.lem.as_chars());
            }
        }
        self.lem.mark();

        let start = token.start;
        let mut end = token.end;

        // 先読み: 名前 (連結辞 | 名前)* 名前
        loop {
            if !self.input.advance(&mut self.work) {
                break;
            }
            // 常に保存。結合が確定したらキューは空にされる
            self.stack.push_back(self.work.clone());
            if self.dics.is_particle(self.work.term.as_chars()) {
                // Europe de l'atome に注意、mark はまだ進めない
                self.term.push(' ');
                self.term.push_slice(self.work.term.as_chars());
                if !self.lem.is_empty() {
                    self.lem.push(' ');
                }
                self.lem.push_slice(self.work.term.as_chars());
                continue;
            }
            if !self.work.term.is_empty() && chars::is_uppercase(self.work.term.char_at(0)) {
                let flags2 = self.work.tag;
                // 後から来る要素に応じて連なり全体のタグを決める
                if flags2 == Tag::NamePlace && tag_end != Tag::NamePers {
                    // le comte de Toulouse は人物であって地名ではない
                    tag_end = Tag::NamePlace;
                } else if flags2 == Tag::NamePers
                    || flags2 == Tag::NamePersM
                    || flags2 == Tag::NamePersF
                {
                    tag_end = Tag::NamePers;
                }
                // アポストロフィの後には空白を置かない
                if self.term.last() != Some('\'') {
                    self.term.push(' ');
                }
                self.term.push_slice(self.work.term.as_chars());
                if !self.lem.is_empty() && self.lem.last() != Some('\'') {
                    self.lem.push(' ');
                }
                if self.work.lem.is_empty() {
                    self.lem.push_slice(self.work.term.as_chars());
                } else {
                    self.lem.push_slice(self.work.lem.as_chars());
                }
                // 結合が確定、再送するものはない
                self.stack.clear();
                end = self.work.end;
                self.term.mark();
                self.lem.mark();
                name_found = true;
                continue;
            }
            break;
        }

        if !name_found {
            // 名前は見つからなかった。最初に保存したトークンから再送する
            if let Some(first) = self.stack.pop_front() {
                token.copy_from(&first);
            }
            return true;
        }

        // 確定した長さまで巻き戻す（末尾の浮いた連結辞を捨てる）
        self.term.rewind();
        self.lem.rewind();
        token.term.copy_from(self.term.as_chars());
        token.lem.copy_from(self.lem.as_chars());
        token.tag = tag_end;
        token.start = start;
        token.end = end;
        // 結合後の文字列で辞書を引き直す
        if let Some(entry) = self.dics.name(token.term.as_chars()) {
            token.tag = entry.tag;
            if let Some(orth) = &entry.orth {
                token.term.copy_from(orth);
            }
            if let Some(lem) = &entry.lem {
                token.lem.copy_from(lem);
            }
        }
        true
    }

    fn reset(&mut self) {
        self.input.reset();
        self.stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lemmatizer::Lemmatizer;
    use crate::tokenizer::Tokenizer;

    fn pipeline(text: &str) -> Vec<Token> {
        let dics = Arc::new(Dictionaries::from_embedded().unwrap());
        let mut tokenizer = Tokenizer::new(Arc::clone(&dics));
        tokenizer.reset_text(text);
        let lem = Lemmatizer::new(tokenizer, Arc::clone(&dics));
        let mut merger = NameMerger::new(lem, dics);
        let mut token = Token::new();
        let mut out = vec![];
        while merger.advance(&mut token) {
            out.push(token.clone());
        }
        out
    }

    /// 2語の名前の結合と辞書の引き直しのテスト
    #[test]
    fn test_two_names() {
        let tokens = pipeline("Victor Hugo écrit");
        assert_eq!(tokens[0].term, "Victor Hugo");
        // 結合後の引き直しでより特定的なタグが付く
        assert_eq!(tokens[0].tag, Tag::NameAuthor);
        assert_eq!(tokens[0].start, 0);
        assert_eq!(tokens[0].end, 11);
        assert_eq!(tokens[1].term, "écrit");
    }

    /// 連結辞を挟む名前のテスト
    #[test]
    fn test_particles() {
        let tokens = pipeline("Madame de Maintenon parle");
        // 文頭の Madame は madame に戻り、称号として結合を開く
        assert_eq!(tokens[0].term, "madame de Maintenon");
        assert_eq!(tokens[0].tag, Tag::NamePers);
        // 称号は人物キーに入らない
        assert_eq!(tokens[0].lem, "de Maintenon");
        assert_eq!(tokens[1].term, "parle");
    }

    /// 浮いた連結辞の巻き戻しのテスト
    #[test]
    fn test_dangling_particle() {
        let tokens = pipeline("Europe de la liberté");
        assert_eq!(tokens[0].term, "Europe");
        assert_eq!(tokens[0].tag, Tag::NamePlace);
        // 先読みされたトークンは失われず順に再送される
        assert_eq!(tokens[1].term, "de");
        assert_eq!(tokens[2].term, "la");
        assert_eq!(tokens[3].term, "liberté");
        // 結合されなかったので Europe の位置はそのまま
        assert_eq!(tokens[0].end, 6);
    }

    /// 称号だけでは結合しないことのテスト
    #[test]
    fn test_title_rewind() {
        let tokens = pipeline("madame va bien");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].term, "madame");
        assert_eq!(tokens[0].tag, Tag::SubPers);
        assert_eq!(tokens[1].term, "va");
    }

    /// 地名の連なりのテスト
    #[test]
    fn test_place() {
        let tokens = pipeline("la rue Plumet monte");
        assert_eq!(tokens[1].term, "rue Plumet");
        assert_eq!(tokens[1].tag, Tag::NamePlace);
        assert_eq!(tokens[2].term, "monte");
    }
}
