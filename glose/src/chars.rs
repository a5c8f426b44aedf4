//! 文字分類テーブルを提供するモジュール
//!
//! ラテン文字テキストのトークン化に最適化された高速な文字分類器です。
//! BMP（基本多言語面）の全コードユニットについてプロパティのビット集合を
//! 事前計算したテーブルを一度だけ構築し、以後は単純な配列参照で分類します。
//! BMP外のコードポイントはその場で分類されます。

use std::sync::LazyLock;

/// 文字（letter）
pub const LETTER: u16 = 0b0000_0000_0000_0001;
/// 単語を構成しうる文字。文字・数字のほか `-` `'` `_` などを含みます
pub const TOKEN: u16 = 0b0000_0000_0000_0010;
/// 空白類（改行、タブ、ノーブレークスペースを含む）
pub const SPACE: u16 = 0b0000_0000_0000_0100;
/// 約物（単語間の句読記号）
pub const PUNCTUATION: u16 = 0b0000_0000_0000_1000;
/// 小文字
pub const LOWERCASE: u16 = 0b0000_0000_0001_0000;
/// 大文字
pub const UPPERCASE: u16 = 0b0000_0000_0010_0000;
/// 数字
pub const DIGIT: u16 = 0b0000_0001_0000_0000;
/// 文レベルの句読点（. ? ! …）
pub const PUNSENT: u16 = 0b0000_0010_0000_0000;
/// 節レベルの句読点（, ; : など、文内の区切り）
pub const PUNCL: u16 = 0b0000_0100_0000_0000;
/// 数学記号
pub const MATH: u16 = 0b0000_1000_0000_0000;
/// サロゲート下位
pub const LOWSUR: u16 = 0b0100_0000_0000_0000;
/// サロゲート上位
pub const HIGHSUR: u16 = 0b1000_0000_0000_0000;

/// BMPのサイズ（2バイトコードユニット）
const SIZE: usize = 0x10000;

/// コードユニットごとのプロパティテーブル
static PROPS: LazyLock<Box<[u16]>> = LazyLock::new(|| {
    let mut table = vec![0u16; SIZE].into_boxed_slice();
    for (cp, slot) in table.iter_mut().enumerate() {
        let cp = cp as u32;
        if (0xD800..0xDC00).contains(&cp) {
            *slot = HIGHSUR;
            continue;
        }
        if (0xDC00..0xE000).contains(&cp) {
            *slot = LOWSUR;
            continue;
        }
        // surrogates excluded above, conversion cannot fail
        if let Some(c) = char::from_u32(cp) {
            *slot = classify(c);
        }
    }
    table
});

/// 1文字を分類してプロパティのビット集合を計算する
fn classify(c: char) -> u16 {
    let mut props = 0u16;
    if c.is_control() {
        return SPACE; // \n, \r, \t…
    }
    if c.is_alphabetic() {
        props |= LETTER | TOKEN;
        if c.is_uppercase() {
            props |= UPPERCASE;
        }
        if c.is_lowercase() {
            props |= LOWERCASE;
        }
        return props;
    }
    if c.is_numeric() {
        return DIGIT | TOKEN;
    }
    if c.is_whitespace() {
        return SPACE; // ノーブレークスペースを含むUnicode空白
    }
    // '&' はUnicodeでは約物だが、実体参照の開始として単語側に分類する
    if c == '&' {
        return LETTER | TOKEN;
    }
    if matches!(c, '+' | '<' | '=' | '>' | '|' | '±' | '×' | '÷' | '√' | '∂' | '∅') {
        props |= MATH;
    }
    if c.is_ascii_punctuation()
        || matches!(
            c,
            '«' | '»' | '‘' | '’' | '“' | '”' | '—' | '–' | '…' | '·' | '¡' | '¿' | '⁂'
        )
    {
        props |= PUNCTUATION;
    }
    // ハイフンは複合語の一部の場合がある。アポストロフィ、ソフトハイフンも同様
    if matches!(c, '-' | '\u{AD}' | '\'' | '’' | '_') {
        props |= TOKEN;
    }
    if matches!(c, '�' | '°') {
        props |= LETTER | TOKEN;
    }
    if matches!(c, '.' | '…' | '?' | '!') {
        props |= PUNSENT;
    } else if matches!(c, ',' | ';' | ':' | '(' | ')' | '—' | '–' | '⁂' | '»' | '«') {
        props |= PUNCL;
    }
    props
}

/// 文字の内部プロパティを取得します
///
/// BMP内の文字はテーブル参照、BMP外の文字はその場で計算します。
///
/// # 引数
///
/// * `c` - 分類対象の文字
///
/// # 戻り値
///
/// プロパティのビット集合
#[inline(always)]
pub fn props(c: char) -> u16 {
    let cp = c as usize;
    if cp < SIZE {
        PROPS[cp]
    } else {
        classify(c)
    }
}

/// 数字かどうかを判定します
#[inline(always)]
pub fn is_digit(c: char) -> bool {
    props(c) & DIGIT != 0
}

/// 文字（letter）かどうかを判定します
#[inline(always)]
pub fn is_letter(c: char) -> bool {
    props(c) & LETTER != 0
}

/// 文字または数字かどうかを判定します
#[inline(always)]
pub fn is_letter_or_digit(c: char) -> bool {
    props(c) & (LETTER | DIGIT) != 0
}

/// 小文字かどうかを判定します
#[inline(always)]
pub fn is_lowercase(c: char) -> bool {
    props(c) & LOWERCASE != 0
}

/// 大文字かどうかを判定します
#[inline(always)]
pub fn is_uppercase(c: char) -> bool {
    props(c) & UPPERCASE != 0
}

/// 数学記号かどうかを判定します
#[inline(always)]
pub fn is_math(c: char) -> bool {
    props(c) & MATH != 0
}

/// UTF-16の上位サロゲートのコードユニットかどうかを判定します
#[inline(always)]
pub fn is_high_surrogate(cp: u16) -> bool {
    PROPS[cp as usize] & HIGHSUR != 0
}

/// UTF-16の下位サロゲートのコードユニットかどうかを判定します
#[inline(always)]
pub fn is_low_surrogate(cp: u16) -> bool {
    PROPS[cp as usize] & LOWSUR != 0
}

/// 単語間の約物かどうかを判定します
#[inline(always)]
pub fn is_punctuation(c: char) -> bool {
    props(c) & PUNCTUATION != 0
}

/// 約物または空白かどうかを判定します
#[inline(always)]
pub fn is_punctuation_or_space(c: char) -> bool {
    props(c) & (PUNCTUATION | SPACE) != 0
}

/// 文レベルの句読点（. ? ! …）かどうかを判定します
#[inline(always)]
pub fn is_sentence_punct(c: char) -> bool {
    props(c) & PUNSENT != 0
}

/// 節レベルの句読点（, ; : など）かどうかを判定します
#[inline(always)]
pub fn is_clause_punct(c: char) -> bool {
    props(c) & PUNCL != 0
}

/// 空白類かどうかを判定します
///
/// ISO制御文字（改行、タブ）とUnicode空白（ノーブレークスペースを含む）の
/// 両方を空白として扱います。
#[inline(always)]
pub fn is_space(c: char) -> bool {
    props(c) & SPACE != 0
}

/// 単語を構成しうる文字かどうかを判定します
///
/// 文字・数字のほか、字句解析の都合で `-` `'` `’` `_` ソフトハイフンなども
/// 単語側に分類されます。
#[inline(always)]
pub fn is_token(c: char) -> bool {
    props(c) & TOKEN != 0
}

/// 効率的な小文字化（大文字の場合のみ変換します）
#[inline(always)]
pub fn to_lower(c: char) -> char {
    if !is_uppercase(c) {
        return c;
    }
    // フランス語の範囲では1文字に収まる
    c.to_lowercase().next().unwrap_or(c)
}

/// 効率的な大文字化（小文字の場合のみ変換します）
#[inline(always)]
pub fn to_upper(c: char) -> char {
    if !is_lowercase(c) {
        return c;
    }
    c.to_uppercase().next().unwrap_or(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 基本的な文字分類のテスト
    #[test]
    fn test_classes() {
        assert!(is_letter('é'));
        assert!(is_letter('Œ'));
        assert!(is_uppercase('É'));
        assert!(is_lowercase('à'));
        assert!(is_digit('7'));
        assert!(is_token('œ'));
        assert!(is_token('-'));
        assert!(is_token('\''));
        assert!(is_token('’'));
        assert!(is_token('_'));
        assert!(is_token('&'));
        assert!(!is_token(' '));
        assert!(!is_token(','));
        assert!(is_space('\u{A0}'));
        assert!(is_space('\n'));
    }

    /// 句読点の2つのレベルのテスト
    #[test]
    fn test_punctuation_levels() {
        for c in ['.', '…', '?', '!'] {
            assert!(is_sentence_punct(c), "{c:?} should end a sentence");
            assert!(!is_clause_punct(c));
        }
        for c in [',', ';', ':', '(', ')', '—', '–', '«', '»'] {
            assert!(is_clause_punct(c), "{c:?} should break a clause");
            assert!(!is_sentence_punct(c));
        }
    }

    /// 大文字・小文字変換のテスト
    #[test]
    fn test_case() {
        assert_eq!(to_lower('É'), 'é');
        assert_eq!(to_lower('e'), 'e');
        assert_eq!(to_upper('ç'), 'Ç');
        assert_eq!(to_upper('3'), '3');
    }

    /// BMP外のコードポイントはその場で分類される
    #[test]
    fn test_supplementary() {
        assert!(is_letter('𝔄'));
        assert!(!is_letter('😀'));
    }

    /// サロゲートのコードユニットのテスト
    #[test]
    fn test_surrogates() {
        assert!(is_high_surrogate(0xD83D));
        assert!(is_low_surrogate(0xDE00));
        assert!(!is_high_surrogate(0x0041));
        assert!(!is_low_surrogate(0xD83D));
    }
}
