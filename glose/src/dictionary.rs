//! 字句解析のための辞書モジュール
//!
//! このモジュールは、トークン化・品詞付与・見出し語化に必要な語彙資源の
//! 読み込みと管理を行います。主な資源は以下の通りです:
//!
//! - ストップワード集合
//! - 一般語辞書（語形 → タグ + 見出し語）
//! - 固有名詞辞書（語形 → タグ + 正規表記）
//! - 表記正規化の対応表（Etat → État, oeil → œil…）
//! - エリジオンの対応表（l', qu'…）
//! - 終止符付き省略形の対応表（M., etc.…）
//! - ハイフン後接代名詞と人名連結辞の集合（言語固有の設定データ）
//! - マークアップ実体参照の対応表
//!
//! 資源はカンマ区切りのUTF-8テキストです。1行目は見出し行として捨てられ、
//! 空行と先頭セルが`#`で始まる行はコメントとして無視されます。
//! 既定のフランス語資源はクレートに埋め込まれており、
//! [`Dictionaries::from_embedded`]で読み込めます。各表は
//! リーダーから差し替え・追加できます。
//!
//! 辞書は起動時に一度構築された後は読み取り専用であり、`Arc`で複数の
//! 解析パイプラインから同期なしに共有できます。

use std::fs::File;
use std::io::Read;
use std::path::Path;

use hashbrown::{HashMap, HashSet};

use crate::charbuf::CharBuf;
use crate::errors::Result;
use crate::tag::Tag;
use crate::utils::read_rows;

/// 埋め込みの既定資源
const STOP_CSV: &str = include_str!("../data/stop.csv");
const WORD_CSV: &str = include_str!("../data/word.csv");
const NAME_CSV: &str = include_str!("../data/name.csv");
const NORM_CSV: &str = include_str!("../data/norm.csv");
const ELISION_CSV: &str = include_str!("../data/elision.csv");
const BREVIDOT_CSV: &str = include_str!("../data/brevidot.csv");
const CLITIC_CSV: &str = include_str!("../data/clitic.csv");
const PARTICLE_CSV: &str = include_str!("../data/particle.csv");
const ENTITIES_CSV: &str = include_str!("../data/entities.csv");

/// 文字列キーの辞書。`&[char]`ウィンドウで探索できます
type CharsMap<V> = HashMap<Box<[char]>, V>;
/// 文字列の集合。`&[char]`ウィンドウで探索できます
type CharsSet = HashSet<Box<[char]>>;

/// 辞書の1エントリ
///
/// 活用形からタグと正規表記・見出し語を引くための値です。
/// 固有名詞辞書では`orth`が辞書好みの正規表記（大文字小文字、
/// ダイアクリティカルマーク）の復元に使用されます。
#[derive(Debug, Clone)]
pub struct LexEntry {
    /// 形態統語タグ
    pub tag: Tag,
    /// 正規化された表記。省略可能
    pub orth: Option<Box<[char]>>,
    /// 見出し語。省略可能
    pub lem: Option<Box<[char]>>,
}

/// プロセス全体で共有される読み取り専用の語彙資源
///
/// # 例
///
/// ```
/// use glose::Dictionaries;
///
/// let dics = Dictionaries::from_embedded()?;
/// let key: Vec<char> = "sais".chars().collect();
/// let entry = dics.word(&key).unwrap();
/// assert_eq!(entry.tag.name(), "VERB");
/// # Ok::<(), glose::GloseError>(())
/// ```
#[derive(Debug, Default)]
pub struct Dictionaries {
    /// ストップワード
    stop: CharsSet,
    /// 一般語。キーは資源の表記のまま（通常は小文字）
    words: CharsMap<LexEntry>,
    /// 固有名詞。キーは大文字を保った表記
    names: CharsMap<LexEntry>,
    /// 表記正規化（古い綴り、タイポグラフィの異体）
    norm: CharsMap<Box<[char]>>,
    /// エリジオン形（アポストロフィ付きキー）→ 置換形
    elision: CharsMap<Box<[char]>>,
    /// 終止符付き省略形（終止符付きキー）→ 置換形（空もあり）
    brevidot: CharsMap<Box<[char]>>,
    /// ハイフンの後で切り離せる後接代名詞（tu, elle, y…）
    clitics: CharsSet,
    /// 人名の連結辞（de, du, von…）
    particles: CharsSet,
    /// マークアップ実体参照の名前（`&`と`;`を除く）→ 文字
    entities: CharsMap<char>,
}

impl Dictionaries {
    /// 空の辞書を生成します
    ///
    /// すべての表が空です。テストや完全な差し替えの出発点として
    /// 使用します。
    pub fn new() -> Self {
        Self::default()
    }

    /// 埋め込みの既定フランス語資源から辞書を構築します
    ///
    /// # 戻り値
    ///
    /// 成功時は構築済みの辞書を返します。
    ///
    /// # エラー
    ///
    /// 資源のフォーマットが壊れている場合にエラーを返します。
    pub fn from_embedded() -> Result<Self> {
        let mut dics = Self::new();
        dics.load_stop(STOP_CSV.as_bytes(), "stop.csv")?;
        dics.load_words(WORD_CSV.as_bytes(), "word.csv")?;
        dics.load_names(NAME_CSV.as_bytes(), "name.csv")?;
        dics.load_norm(NORM_CSV.as_bytes(), "norm.csv")?;
        dics.load_elision(ELISION_CSV.as_bytes(), "elision.csv")?;
        dics.load_brevidot(BREVIDOT_CSV.as_bytes(), "brevidot.csv")?;
        dics.load_clitics(CLITIC_CSV.as_bytes(), "clitic.csv")?;
        dics.load_particles(PARTICLE_CSV.as_bytes(), "particle.csv")?;
        dics.load_entities(ENTITIES_CSV.as_bytes(), "entities.csv")?;
        Ok(dics)
    }

    /// ディレクトリの資源ファイルから辞書を構築します
    ///
    /// ディレクトリには埋め込み資源と同じ名前のファイル（`stop.csv`,
    /// `word.csv`, `name.csv`, `norm.csv`, `elision.csv`, `brevidot.csv`,
    /// `clitic.csv`, `particle.csv`, `entities.csv`）が必要です。
    ///
    /// # 引数
    ///
    /// * `dir` - 資源ディレクトリ
    ///
    /// # エラー
    ///
    /// 資源ファイルが欠けている場合は致命的なエラーを返します。
    /// タガーは辞書なしでは機能しません。
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let open = |name: &str| File::open(dir.join(name));
        let mut dics = Self::new();
        dics.load_stop(open("stop.csv")?, "stop.csv")?;
        dics.load_words(open("word.csv")?, "word.csv")?;
        dics.load_names(open("name.csv")?, "name.csv")?;
        dics.load_norm(open("norm.csv")?, "norm.csv")?;
        dics.load_elision(open("elision.csv")?, "elision.csv")?;
        dics.load_brevidot(open("brevidot.csv")?, "brevidot.csv")?;
        dics.load_clitics(open("clitic.csv")?, "clitic.csv")?;
        dics.load_particles(open("particle.csv")?, "particle.csv")?;
        dics.load_entities(open("entities.csv")?, "entities.csv")?;
        Ok(dics)
    }

    /// ストップワード資源（1列: GRAPH）を読み込みます
    ///
    /// # 引数
    ///
    /// * `rdr` - 資源のリーダー
    /// * `name` - 診断用の資源名
    pub fn load_stop<R: Read>(&mut self, rdr: R, name: &'static str) -> Result<()> {
        let stop = &mut self.stop;
        read_rows(rdr, name, 1, |_, cells| {
            stop.insert(to_chars(&cells[0]));
        })
    }

    /// 一般語資源（3列: GRAPH, TAG, LEM。4列目は頻度として無視）を読み込みます
    ///
    /// 既存のエントリは上書きされます（後勝ち）。GRAPHセルが`-`で始まる行は
    /// その語形を一般語・固有名詞の両辞書から削除します。TAGが未知の行は
    /// 資源名と行番号を診断に出力してスキップされます。
    pub fn load_words<R: Read>(&mut self, rdr: R, name: &'static str) -> Result<()> {
        let words = &mut self.words;
        let names = &mut self.names;
        read_rows(rdr, name, 4, |line, cells| {
            let graph = cells[0].as_str();
            if let Some(rest) = graph.strip_prefix('-') {
                let key = to_chars(rest);
                words.remove(&key);
                names.remove(&key);
                return;
            }
            let Some(tag) = tag_of(&cells[1], name, line) else {
                return;
            };
            let lem = opt_chars(&cells[2]);
            words.insert(
                to_chars(graph),
                LexEntry {
                    tag,
                    orth: None,
                    lem,
                },
            );
        })
    }

    /// 固有名詞資源（3列: GRAPH, TAG, ORTH。4列目は頻度として無視）を読み込みます
    ///
    /// ORTHは辞書好みの正規表記で、表層形より優先されます
    /// （例: PARIS → Paris）。削除行と未知のTAGの扱いは
    /// [`Dictionaries::load_words`]と同じです。
    pub fn load_names<R: Read>(&mut self, rdr: R, name: &'static str) -> Result<()> {
        let words = &mut self.words;
        let names = &mut self.names;
        read_rows(rdr, name, 4, |line, cells| {
            let graph = cells[0].as_str();
            if let Some(rest) = graph.strip_prefix('-') {
                let key = to_chars(rest);
                words.remove(&key);
                names.remove(&key);
                return;
            }
            let Some(tag) = tag_of(&cells[1], name, line) else {
                return;
            };
            let orth = opt_chars(&cells[2]);
            names.insert(
                to_chars(graph),
                LexEntry {
                    tag,
                    orth,
                    lem: None,
                },
            );
        })
    }

    /// 表記正規化資源（2列: GRAPH, ORTH）を読み込みます
    pub fn load_norm<R: Read>(&mut self, rdr: R, name: &'static str) -> Result<()> {
        let norm = &mut self.norm;
        read_rows(rdr, name, 2, |_, cells| {
            norm.insert(to_chars(&cells[0]), to_chars(&cells[1]));
        })
    }

    /// エリジオン資源（2列: GRAPH, ORTH）を読み込みます
    ///
    /// キーはアポストロフィで終わる語形（`l'`, `qu'`…）、値はトークンとして
    /// 送出される置換形です。
    pub fn load_elision<R: Read>(&mut self, rdr: R, name: &'static str) -> Result<()> {
        let elision = &mut self.elision;
        read_rows(rdr, name, 2, |_, cells| {
            elision.insert(to_chars(&cells[0]), to_chars(&cells[1]));
        })
    }

    /// 終止符付き省略形資源（2列: GRAPH, ORTH）を読み込みます
    ///
    /// キーは終止符を含む語形（`etc.`…）、値は省略可能な置換形です。
    pub fn load_brevidot<R: Read>(&mut self, rdr: R, name: &'static str) -> Result<()> {
        let brevidot = &mut self.brevidot;
        read_rows(rdr, name, 2, |_, cells| {
            brevidot.insert(to_chars(&cells[0]), to_chars(&cells[1]));
        })
    }

    /// ハイフン後接代名詞資源（1列: GRAPH）を読み込みます
    pub fn load_clitics<R: Read>(&mut self, rdr: R, name: &'static str) -> Result<()> {
        let clitics = &mut self.clitics;
        read_rows(rdr, name, 1, |_, cells| {
            clitics.insert(to_chars(&cells[0]));
        })
    }

    /// 人名連結辞資源（1列: GRAPH）を読み込みます
    pub fn load_particles<R: Read>(&mut self, rdr: R, name: &'static str) -> Result<()> {
        let particles = &mut self.particles;
        read_rows(rdr, name, 1, |_, cells| {
            particles.insert(to_chars(&cells[0]));
        })
    }

    /// 実体参照資源（2列: NAME, CHAR）を読み込みます
    ///
    /// NAMEは`&`と`;`を除いた実体名です。CHARセルの先頭文字だけが
    /// 使用されます。
    pub fn load_entities<R: Read>(&mut self, rdr: R, name: &'static str) -> Result<()> {
        let entities = &mut self.entities;
        read_rows(rdr, name, 2, |line, cells| {
            match cells[1].chars().next() {
                Some(c) => {
                    entities.insert(to_chars(&cells[0]), c);
                }
                None => {
                    eprintln!("Skipped an entity without character, {name} line {line}");
                }
            }
        })
    }

    /// 一般語辞書を引きます
    ///
    /// # 引数
    ///
    /// * `key` - 探索する語形
    ///
    /// # 戻り値
    ///
    /// 一致するエントリ、なければ`None`
    #[inline(always)]
    pub fn word(&self, key: &[char]) -> Option<&LexEntry> {
        self.words.get(key)
    }

    /// 固有名詞辞書を引きます
    #[inline(always)]
    pub fn name(&self, key: &[char]) -> Option<&LexEntry> {
        self.names.get(key)
    }

    /// ストップワードかどうかを判定します
    #[inline(always)]
    pub fn is_stop(&self, key: &[char]) -> bool {
        self.stop.contains(key)
    }

    /// 表記正規化を適用します
    ///
    /// 対応表に一致があればバッファの内容を正規表記で置き換えます。
    ///
    /// # 戻り値
    ///
    /// 置き換えが行われた場合は`true`
    pub fn norm(&self, buf: &mut CharBuf) -> bool {
        match self.norm.get(buf.as_chars()) {
            Some(val) => {
                buf.copy_from(val);
                true
            }
            None => false,
        }
    }

    /// エリジオン形を引きます
    ///
    /// # 引数
    ///
    /// * `key` - アポストロフィで終わる語形
    ///
    /// # 戻り値
    ///
    /// トークンとして送出される置換形、なければ`None`
    #[inline(always)]
    pub fn elision(&self, key: &[char]) -> Option<&[char]> {
        self.elision.get(key).map(|v| &**v)
    }

    /// 終止符付き省略形を判定し、置換形があれば適用します
    ///
    /// # 引数
    ///
    /// * `buf` - 終止符を含む語形。一致して置換形が空でなければ
    ///   その場で書き換えられます
    ///
    /// # 戻り値
    ///
    /// 省略形として知られている場合は`true`
    pub fn brevidot(&self, buf: &mut CharBuf) -> bool {
        match self.brevidot.get(buf.as_chars()) {
            Some(val) => {
                if !val.is_empty() {
                    buf.copy_from(val);
                }
                true
            }
            None => false,
        }
    }

    /// ハイフンの後で切り離せる後接代名詞かどうかを判定します
    #[inline(always)]
    pub fn is_clitic(&self, key: &[char]) -> bool {
        self.clitics.contains(key)
    }

    /// 人名の連結辞かどうかを判定します
    #[inline(always)]
    pub fn is_particle(&self, key: &[char]) -> bool {
        self.particles.contains(key)
    }

    /// 実体参照の名前から文字を引きます
    ///
    /// # 引数
    ///
    /// * `key` - `&`と`;`を除いた実体名
    #[inline(always)]
    pub fn entity(&self, key: &[char]) -> Option<char> {
        self.entities.get(key).copied()
    }
}

/// 文字列を辞書キーに変換する
fn to_chars(s: &str) -> Box<[char]> {
    s.chars().collect()
}

/// 空でないセルを辞書値に変換する
fn opt_chars(s: &str) -> Option<Box<[char]>> {
    if s.is_empty() {
        None
    } else {
        Some(to_chars(s))
    }
}

/// TAGセルを解決する。未知の名前は診断を出力して行ごとスキップさせる
fn tag_of(cell: &str, name: &'static str, line: u64) -> Option<Tag> {
    let tag = Tag::from_name(cell);
    if tag.is_none() {
        eprintln!("Skipped a row with unknown tag {cell:?}, {name} line {line}");
    }
    tag
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    /// 埋め込み資源の読み込みと基本的な探索のテスト
    #[test]
    fn test_embedded() {
        let dics = Dictionaries::from_embedded().unwrap();
        assert!(dics.is_stop(&chars("le")));
        assert!(dics.is_stop(&chars("de")));
        assert!(!dics.is_stop(&chars("liberté")));
        let entry = dics.word(&chars("dit")).unwrap();
        assert_eq!(entry.tag, Tag::Verb);
        assert_eq!(entry.lem.as_deref(), Some(&chars("dire")[..]));
        let entry = dics.name(&chars("Hugo")).unwrap();
        assert_eq!(entry.tag, Tag::NameAuthor);
        assert!(dics.is_clitic(&chars("elle")));
        assert!(dics.is_particle(&chars("de")));
        assert_eq!(dics.entity(&chars("amp")), Some('&'));
        assert_eq!(dics.entity(&chars("eacute")), Some('é'));
    }

    /// 辞書の往復一致のテスト: 挿入したキーの探索は同じタグと
    /// 見出し語を返す
    #[test]
    fn test_roundtrip() {
        let mut dics = Dictionaries::new();
        let src = "GRAPH,TAG,LEM\nchats,SUB,chat\nparlait,VERB,parler\n";
        dics.load_words(src.as_bytes(), "test.csv").unwrap();
        let entry = dics.word(&chars("chats")).unwrap();
        assert_eq!(entry.tag, Tag::Sub);
        assert_eq!(entry.lem.as_deref(), Some(&chars("chat")[..]));
        let entry = dics.word(&chars("parlait")).unwrap();
        assert_eq!(entry.tag, Tag::Verb);
        assert_eq!(entry.lem.as_deref(), Some(&chars("parler")[..]));
    }

    /// `-`接頭辞によるエントリ削除のテスト
    #[test]
    fn test_removal() {
        let mut dics = Dictionaries::new();
        let src = "GRAPH,TAG,LEM\nrusses,SUB,russe\n";
        dics.load_words(src.as_bytes(), "test.csv").unwrap();
        assert!(dics.word(&chars("russes")).is_some());
        let src = "GRAPH,TAG,LEM\n-russes,,\n";
        dics.load_words(src.as_bytes(), "local.csv").unwrap();
        assert!(dics.word(&chars("russes")).is_none());
    }

    /// 正規化と省略形の書き換えのテスト
    #[test]
    fn test_rewrites() {
        let dics = Dictionaries::from_embedded().unwrap();
        let mut buf = CharBuf::from_str("Etat");
        assert!(dics.norm(&mut buf));
        assert_eq!(buf, "État");
        let mut buf = CharBuf::from_str("oeil");
        assert!(dics.norm(&mut buf));
        assert_eq!(buf, "œil");
        let mut buf = CharBuf::from_str("etc.");
        assert!(dics.brevidot(&mut buf));
        let mut buf = CharBuf::from_str("chat.");
        assert!(!dics.brevidot(&mut buf));
        assert_eq!(buf, "chat.");
    }
}
