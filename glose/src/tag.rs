//! 品詞タグの定義
//!
//! フランス語向けの形態統語タグ集合です。各タグは8ビットのコードを持ち、
//! 上位ニブルが大分類、下位ニブルが下位分類を表します。タグ名は辞書
//! リソースのTAG列に現れる文字列と一致します。ラベルはフランス語です。

/// タグの定義を一括して展開するマクロ
///
/// enum本体、コード・名前の相互変換、ラベル取得を同じ表から生成します。
macro_rules! tags {
    ($( $(#[$meta:meta])* $variant:ident = $code:literal, $name:literal, $label:literal; )*) => {
        /// 形態統語タグ
        ///
        /// 上位ニブルが大分類（動詞、名詞、固有名詞…）、下位ニブルが
        /// 下位分類を表す閉じた列挙型です。
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u32)]
        pub enum Tag {
            $( $(#[$meta])* $variant = $code, )*
        }

        impl Tag {
            /// タグの識別コードを返します
            #[inline(always)]
            pub const fn code(self) -> u32 {
                self as u32
            }

            /// コードからタグを取得します
            ///
            /// # 引数
            ///
            /// * `code` - タグの識別コード。上位ビットは無視されます
            ///
            /// # 戻り値
            ///
            /// 対応するタグ、未定義のコードの場合は`None`
            pub const fn from_code(code: u32) -> Option<Self> {
                match code & 0xFF {
                    $( $code => Some(Self::$variant), )*
                    _ => None,
                }
            }

            /// 名前からタグを取得します
            ///
            /// 辞書リソースのTAG列に現れる名前を解決します。
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( $name => Some(Self::$variant), )*
                    _ => None,
                }
            }

            /// タグの名前を返します
            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $name, )*
                }
            }

            /// タグのフランス語ラベルを返します
            pub const fn label(self) -> &'static str {
                match self {
                    $( Self::$variant => $label, )*
                }
            }
        }
    };
}

tags! {
    /// 情報なし
    Null = 0x00, "—", "Défaut, aucune information";
    /// 辞書に存在しないことが確認された語
    Unknown = 0x01, "UNKNOWN", "Inconnu des dictionnaires";
    /// XMLタグ
    Xml = 0x02, "XML", "<tag att=\"value\">, </tag>…";
    /// 処理段階から送られるメッセージ
    Test = 0x0F, "TEST", "Message d’une étape de traitement";

    /// 意味動詞
    Verb = 0x10, "VERB", "Verbe sémantique";
    /// 助動詞（être, avoir）
    VerbAux = 0x11, "VERBaux", "Auxilliaire";
    /// 準助動詞（aller, venir de…）
    VerbAux2 = 0x12, "VERBaux2", "Semi‑auxilliaire";
    /// 法動詞（devoir, pouvoir, falloir）
    VerbMod = 0x13, "VERBmod", "Modaux";
    /// 発話動詞（dire, répondre…）
    VerbExpr = 0x15, "VERBexpr", "Verbe d’expression";
    /// 過去分詞
    VerbPpass = 0x18, "VERBppass", "Participe passé";
    /// 現在分詞
    VerbGer = 0x19, "VERBger", "Gérondif";

    /// 普通名詞
    Sub = 0x20, "SUB", "Substantif";
    /// 人名を導く称号（monsieur, madame…）
    SubPers = 0x28, "SUBpers", "Titulature";
    /// 地名を導く名詞（rue, faubourg…）
    SubPlace = 0x29, "SUBplace", "Adressage";

    /// 形容詞
    Adj = 0x30, "ADJ", "Adjectif";

    /// 辞書にない固有名詞（大文字から推定）
    Name = 0x40, "NAME", "Nom propre inféré";
    /// 人名
    NamePers = 0x41, "NAMEpers", "Personne";
    /// 男性の名
    NamePersM = 0x42, "NAMEpersm", "Prénom masculin";
    /// 女性の名
    NamePersF = 0x43, "NAMEpersf", "Prénom féminin";
    /// 地名
    NamePlace = 0x44, "NAMEplace", "Lieu";
    /// 組織名
    NameOrg = 0x45, "NAMEorg", "Organisation";
    /// 民族名
    NamePeople = 0x46, "NAMEpeople", "Peuple";
    /// 出来事の名
    NameEvent = 0x47, "NAMEevent", "Événement";
    /// 著者名
    NameAuthor = 0x48, "NAMEauthor", "Auteur";
    /// 架空の人物名
    NameFict = 0x49, "NAMEfict", "Personnage";
    /// 神名
    NameGod = 0x4F, "NAMEgod", "Divinité";

    /// 意味副詞
    Adv = 0x50, "ADV", "Adverbe";
    /// 否定副詞（ne, pas, point…）
    AdvNeg = 0x51, "ADVneg", "Adverbe de négation";
    /// 疑問副詞
    AdvInter = 0x52, "ADVinter", "Adverbe interrogatif";
    /// 時空間の副詞
    AdvScen = 0x53, "ADVscen", "Adverbe spacio-temporel";
    /// 相の副詞（toujours, souvent…）
    AdvAsp = 0x54, "ADVasp", "Adverbe d’aspect";
    /// 程度の副詞（plus, très…）
    AdvDeg = 0x55, "ADVdeg", "Adverbe de degré";
    /// 様態の副詞
    AdvMod = 0x56, "ADVmod", "Adverbe de modalité";

    /// その他の限定詞
    Det = 0x60, "DET", "Déterminant";
    /// 冠詞（le, la, un, des…）
    DetArt = 0x61, "DETart", "Article";
    /// 前置詞融合限定詞（du, au…）
    DetPrep = 0x62, "DETprep", "Déterminant prépositionnel";
    /// 数量限定詞（deux, trois…）
    DetNum = 0x63, "DETnum", "Déterminant numéral";
    /// 不定限定詞（tout, quelques…）
    DetIndef = 0x6A, "DETindef", "Déterminant indéfini";
    /// 疑問限定詞（quel, quelles…）
    DetInter = 0x6B, "DETinter", "Déterminant interrogatif";
    /// 指示限定詞（ce, cette…）
    DetDem = 0x6C, "DETdem", "Déterminant démonstratif";
    /// 所有限定詞（son, ma, leurs…）
    DetPoss = 0x6D, "DETposs", "Déterminant possessif";

    /// その他の代名詞
    Pro = 0x70, "PRO", "Pronom";
    /// 人称代名詞（il, se, je, moi…）
    ProPers = 0x71, "PROpers", "Pronom personnel";
    /// 不定代名詞（y, rien, tout…）
    ProIndef = 0x7A, "PROindef", "Pronom indéfini";
    /// 指示代名詞（c’, ça, cela…）
    ProDem = 0x7C, "PROdem", "Pronom démonstratif";
    /// 所有代名詞（le mien, la sienne…）
    ProPoss = 0x7D, "PROposs", "Pronom possessif";

    /// その他の接続語
    Conn = 0x80, "CONN", "Connecteur";
    /// 等位接続詞（et, mais, ou…）
    ConjCoord = 0x81, "CONJcoord", "Conjonction de coordination";
    /// 従属接続詞（comme, si…）
    ConjSub = 0x82, "CONJsub", "Conjonction de subordination";
    /// 接続副詞（cependant, désormais…）
    AdvConj = 0x83, "ADVconj", "Adverbe de connexion";
    /// 前置詞（de, dans, par…）
    Prep = 0x88, "PREP", "Préposition";

    /// 数（3, milliers, centième…）
    Num = 0xA0, "NUM", "Numéral";
    /// 番号（1er, second…）
    NumNo = 0xA1, "NUMno", "Numéro";
    /// 参照番号（p. 50, f. 2…）
    Ref = 0xA2, "REF", "Référence";
    /// 数学演算子
    Math = 0xA3, "MATH", "Math";
    /// 単位（cm, kg…）
    NumUnit = 0xA4, "NUMunit", "Unités";

    /// その他の句読点
    Pun = 0xC0, "PUN", "Ponctuation";
    /// 節レベルの句読点（, ;）
    PunClause = 0xC1, "PUNclause", "Clause";
    /// 文レベルの句読点（. ? !）
    PunSent = 0xC2, "PUNsent", "Phrase";
    /// 段落（マークアップから解釈された構造）
    PunPara = 0xC3, "PUNpara", "Paragraphe";
    /// 節（マークアップから解釈された構造）
    PunSection = 0xC4, "PUNsection", "Section";

    /// 雑
    Misc = 0xF0, "MISC", "Divers";
    /// 省略形（名前や名詞の可能性あり）
    Abbr = 0xF1, "ABBR", "Abréviation";
    /// 間投詞（ho, ô, haha…）
    Excl = 0xF2, "EXCL", "Exclamation";
    /// 指示小詞（-ci, -là）
    PartDem = 0xF3, "PARTdem", "Particule démonstrative";
    /// ストップワード
    Stop = 0xF8, "STOP", "Mot “vide”";
    /// 非ストップワード
    NoStop = 0xF9, "NOSTOP", "Mot “plein”";
    /// 成句（parce que…）
    Loc = 0xFB, "LOC", "Locution";
}

impl Tag {
    /// 大分類（上位ニブル）のタグを返します
    ///
    /// 対応する大分類タグが定義されていない場合は[`Tag::Unknown`]を返します。
    pub const fn parent(self) -> Tag {
        match Tag::from_code(self.code() & 0xF0) {
            Some(tag) => tag,
            None => Tag::Unknown,
        }
    }

    /// 指定のコードと大分類を共有するかを判定します
    #[inline(always)]
    pub const fn same_parent(self, code: u32) -> bool {
        (code & 0xF0) == (self.code() & 0xF0)
    }

    /// 固有名詞の系列かどうかを判定します
    #[inline(always)]
    pub const fn is_name(self) -> bool {
        self.code() & 0xF0 == Tag::Name.code()
    }

    /// 動詞の系列かどうかを判定します
    #[inline(always)]
    pub const fn is_verb(self) -> bool {
        self.code() & 0xF0 == Tag::Verb.code()
    }

    /// 数の系列かどうかを判定します
    #[inline(always)]
    pub const fn is_num(self) -> bool {
        self.code() & 0xF0 == Tag::Num.code()
    }

    /// 句読点の系列かどうかを判定します
    ///
    /// マークアップから解釈された構造区切り（段落・節）も含みます。
    #[inline(always)]
    pub const fn is_pun(self) -> bool {
        self.code() & 0xF0 == Tag::Pun.code()
    }
}

impl Default for Tag {
    fn default() -> Self {
        Tag::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// コードと名前の往復変換のテスト
    #[test]
    fn test_roundtrip() {
        for tag in [Tag::Verb, Tag::NamePers, Tag::PunClause, Tag::Loc, Tag::Null] {
            assert_eq!(Tag::from_code(tag.code()), Some(tag));
            assert_eq!(Tag::from_name(tag.name()), Some(tag));
        }
        assert_eq!(Tag::from_name("VERBexpr"), Some(Tag::VerbExpr));
        assert_eq!(Tag::from_name("n’existe pas"), None);
        assert_eq!(Tag::from_code(0x99), None);
    }

    /// ニブル構造と大分類のテスト
    #[test]
    fn test_parents() {
        assert_eq!(Tag::VerbExpr.parent(), Tag::Verb);
        assert_eq!(Tag::NameAuthor.parent(), Tag::Name);
        assert!(Tag::NamePersF.is_name());
        assert!(Tag::NamePersF.same_parent(Tag::NamePlace.code()));
        assert!(!Tag::Sub.is_name());
        assert!(Tag::VerbAux.is_verb());
        assert!(Tag::PunSent.is_pun());
        assert!(Tag::PunPara.is_pun());
        assert!(Tag::Num.is_num());
        assert!(!Tag::PunSent.is_num());
    }
}
