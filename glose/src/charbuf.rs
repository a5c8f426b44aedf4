//! 可変文字バッファを提供するモジュール
//!
//! このモジュールは、トークンの表層形や辞書キーとして使用される
//! 伸長可能な文字バッファ[`CharBuf`]を定義します。前方と後方の両方向に
//! 償却O(1)で伸長でき、再割り当てなしで繰り返し再利用できます。
//!
//! 辞書のキーは`Box<[char]>`で保持されるため、[`CharBuf::as_chars`]が返す
//! `&[char]`ウィンドウをそのまま探索キーとして使用でき、ハッシュ値は
//! キーと探索値で常に一致します。

use std::fmt;
use std::hash::{Hash, Hasher};

/// バッファが保持できる最大文字数
pub const MAX_LEN: usize = (u32::MAX / 2) as usize;

/// 前方・後方に伸長可能な可変文字バッファ
///
/// 内部は`Vec<char>`と先頭ギャップで構成されます。`push`は末尾への追加、
/// `prepend`は先頭への追加で、どちらも償却O(1)です。
///
/// トークンの表層形として使用される場合、バッファは次のトークンの生成時に
/// 上書きされます。値を保持し続ける必要がある場合、呼び出し側は
/// [`CharBuf::copy_from`]などで深いコピーを取る必要があります。
#[derive(Debug, Default, Clone)]
pub struct CharBuf {
    /// 先頭ギャップを含むデータ。内容は`data[start..]`
    data: Vec<char>,
    /// 内容の開始位置
    start: usize,
    /// [`CharBuf::mark`]で記録された長さ
    mark: usize,
}

impl CharBuf {
    /// 新しい空のバッファを生成します
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定された容量で新しいバッファを生成します
    ///
    /// # 引数
    ///
    /// * `capacity` - 事前確保する文字数
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity.min(MAX_LEN)),
            start: 0,
            mark: 0,
        }
    }

    /// 文字列から新しいバッファを生成します
    pub fn from_str(text: &str) -> Self {
        let mut buf = Self::new();
        buf.push_str(text);
        buf
    }

    /// 内容を空にします。確保済みの領域は保持されます
    #[inline(always)]
    pub fn clear(&mut self) {
        self.data.clear();
        self.start = 0;
        self.mark = 0;
    }

    /// 内容の文字数を返します
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.data.len() - self.start
    }

    /// 内容が空かどうかを判定します
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.data.len() == self.start
    }

    /// 内容への読み取り専用ウィンドウをコピーなしで返します
    #[inline(always)]
    pub fn as_chars(&self) -> &[char] {
        &self.data[self.start..]
    }

    /// 末尾に1文字を追加します
    #[inline(always)]
    pub fn push(&mut self, c: char) {
        self.data.push(c);
    }

    /// 末尾に文字スライスを追加します
    pub fn push_slice(&mut self, src: &[char]) {
        self.data.extend_from_slice(src);
    }

    /// 末尾に文字列の全文字を追加します
    pub fn push_str(&mut self, src: &str) {
        self.data.extend(src.chars());
    }

    /// 先頭に1文字を追加します
    ///
    /// 先頭ギャップが空の場合は内容の長さに応じたギャップを確保し直すため、
    /// 償却O(1)で動作します。
    pub fn prepend(&mut self, c: char) {
        if self.start == 0 {
            self.grow_front();
        }
        self.start -= 1;
        self.data[self.start] = c;
    }

    /// 先頭に文字列を追加します
    pub fn prepend_str(&mut self, src: &str) {
        for c in src.chars().rev() {
            self.prepend(c);
        }
    }

    /// 先頭ギャップを確保し直す
    fn grow_front(&mut self) {
        let len = self.len();
        let gap = usize::max(8, len);
        assert!(
            len + gap <= MAX_LEN,
            "CharBuf capacity overflow: {} chars",
            len + gap
        );
        let mut data = Vec::with_capacity(gap + len);
        data.resize(gap, '\0');
        data.extend_from_slice(&self.data[self.start..]);
        self.data = data;
        self.start = gap;
    }

    /// 内容を引数のスライスで置き換えます
    pub fn copy_from(&mut self, src: &[char]) {
        self.data.clear();
        self.start = 0;
        self.data.extend_from_slice(src);
    }

    /// 内容を引数の文字列で置き換えます
    pub fn copy_from_str(&mut self, src: &str) {
        self.data.clear();
        self.start = 0;
        self.data.extend(src.chars());
    }

    /// 内容を指定された長さに切り詰めます
    ///
    /// 現在の長さより大きい値は無視されます。
    #[inline(always)]
    pub fn truncate(&mut self, new_len: usize) {
        if new_len < self.len() {
            self.data.truncate(self.start + new_len);
        }
    }

    /// 指定位置の文字を返します
    #[inline(always)]
    pub fn char_at(&self, index: usize) -> char {
        self.data[self.start + index]
    }

    /// 指定位置の文字を書き換えます
    #[inline(always)]
    pub fn set_char_at(&mut self, index: usize, c: char) {
        self.data[self.start + index] = c;
    }

    /// 先頭の文字を返します。空の場合は`None`
    #[inline(always)]
    pub fn first(&self) -> Option<char> {
        self.as_chars().first().copied()
    }

    /// 末尾の文字を返します。空の場合は`None`
    #[inline(always)]
    pub fn last(&self) -> Option<char> {
        self.as_chars().last().copied()
    }

    /// 先頭から`n`文字を削除します
    pub fn delete_first(&mut self, n: usize) {
        self.start = usize::min(self.start + n, self.data.len());
    }

    /// 末尾から`n`文字を削除します
    pub fn delete_last(&mut self, n: usize) {
        let new_len = self.len().saturating_sub(n);
        self.data.truncate(self.start + new_len);
    }

    /// 指定の文字が含まれるかを判定します
    pub fn contains(&self, c: char) -> bool {
        self.as_chars().contains(&c)
    }

    /// 指定の文字が最初に現れる位置を返します
    pub fn index_of(&self, c: char) -> Option<usize> {
        self.as_chars().iter().position(|&x| x == c)
    }

    /// 指定の文字が最後に現れる位置を返します
    pub fn last_index_of(&self, c: char) -> Option<usize> {
        self.as_chars().iter().rposition(|&x| x == c)
    }

    /// 指定の接頭辞で始まるかを判定します
    pub fn starts_with(&self, prefix: &str) -> bool {
        let chars = self.as_chars();
        let mut i = 0;
        for c in prefix.chars() {
            if i >= chars.len() || chars[i] != c {
                return false;
            }
            i += 1;
        }
        true
    }

    /// 指定の接尾辞で終わるかを判定します
    pub fn ends_with(&self, suffix: &str) -> bool {
        let chars = self.as_chars();
        let suffix: Vec<char> = suffix.chars().collect();
        if suffix.len() > chars.len() {
            return false;
        }
        chars[chars.len() - suffix.len()..] == suffix[..]
    }

    /// `*`をワイルドカードとするグロブ照合を行います
    ///
    /// # 引数
    ///
    /// * `pattern` - 照合パターン。`*`は任意の文字列（空を含む）に一致します
    ///
    /// # 戻り値
    ///
    /// 内容全体がパターンに一致する場合は`true`
    pub fn glob(&self, pattern: &str) -> bool {
        let pat: Vec<char> = pattern.chars().collect();
        glob_match(self.as_chars(), &pat)
    }

    /// 内容全体を小文字化します
    pub fn to_lower(&mut self) {
        for i in self.start..self.data.len() {
            let c = self.data[i];
            if crate::chars::is_uppercase(c) {
                self.data[i] = crate::chars::to_lower(c);
            }
        }
    }

    /// 先頭の文字だけを小文字化します
    pub fn first_to_lower(&mut self) {
        if let Some(c) = self.first() {
            self.set_char_at(0, crate::chars::to_lower(c));
        }
    }

    /// 先頭の文字だけを大文字化します
    pub fn first_to_upper(&mut self) {
        if let Some(c) = self.first() {
            self.set_char_at(0, crate::chars::to_upper(c));
        }
    }

    /// 先頭を大文字、残りを小文字にします
    pub fn capitalize(&mut self) {
        self.to_lower();
        self.first_to_upper();
    }

    /// 現在の長さを巻き戻し位置として記録します
    ///
    /// 複合語の連結で、確定済みの長さを記録しておき、先読みが失敗した時に
    /// [`CharBuf::rewind`]で戻すために使用されます。
    #[inline(always)]
    pub fn mark(&mut self) {
        self.mark = self.len();
    }

    /// [`CharBuf::mark`]で記録した長さまで内容を切り詰めます
    #[inline(always)]
    pub fn rewind(&mut self) {
        self.truncate(self.mark);
    }

}

/// `*`ワイルドカードによる再帰的なグロブ照合
fn glob_match(text: &[char], pat: &[char]) -> bool {
    match pat.first() {
        None => text.is_empty(),
        Some('*') => {
            // 空一致から全消費まで順に試す
            for skip in 0..=text.len() {
                if glob_match(&text[skip..], &pat[1..]) {
                    return true;
                }
            }
            false
        }
        Some(&c) => text.first() == Some(&c) && glob_match(&text[1..], &pat[1..]),
    }
}

impl Hash for CharBuf {
    /// `&[char]`の探索キーとハッシュ値が一致するように内容だけをハッシュします
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_chars().hash(state);
    }
}

impl PartialEq for CharBuf {
    fn eq(&self, other: &Self) -> bool {
        self.as_chars() == other.as_chars()
    }
}

impl Eq for CharBuf {}

impl PartialEq<str> for CharBuf {
    fn eq(&self, other: &str) -> bool {
        let chars = self.as_chars();
        let mut i = 0;
        for c in other.chars() {
            if i >= chars.len() || chars[i] != c {
                return false;
            }
            i += 1;
        }
        i == chars.len()
    }
}

impl PartialEq<&str> for CharBuf {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl fmt::Display for CharBuf {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for c in self.as_chars() {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
