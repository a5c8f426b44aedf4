//! 上位k件の選択器
//!
//! このモジュールは、スコア付きの要素の流れから最も良いk件だけを
//! 保持する固定容量の選択器を提供します。容量に達するまでは全件を
//! 受け入れ、達した後は現在の最下位より厳密に良いスコアだけが
//! 最下位と入れ替わります。挿入ごとのソートは行わず、全体のソートは
//! 読み出し時に一度だけ行われます。
//!
//! NaNのスコアは常に拒否されます。オプションでちょうど0のスコアも
//! 拒否できます（連関スコアの0は「情報なし」を意味するため）。

/// スコア付きの要素
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored<T> {
    /// 比較に使われるスコア
    pub score: f64,
    /// 運ばれる値
    pub payload: T,
}

/// 固定容量の上位k件選択器
///
/// 既定の順序は大きいスコアが先です。[`Top::reverse`]で小さい方から
/// k件を選ぶようになります。
///
/// # 例
///
/// ```
/// use glose::Top;
///
/// let mut top = Top::new(2);
/// for (score, word) in [(1.0, "un"), (3.0, "trois"), (2.0, "deux")] {
///     top.push(score, word);
/// }
/// let sorted = top.into_sorted();
/// assert_eq!(sorted[0].payload, "trois");
/// assert_eq!(sorted[1].payload, "deux");
/// ```
#[derive(Debug, Clone)]
pub struct Top<T> {
    /// 保持する最大件数
    size: usize,
    /// 真なら小さいスコアを選ぶ
    reverse: bool,
    /// 真ならちょうど0のスコアを拒否する
    no_zero: bool,
    data: Vec<Scored<T>>,
    /// 容量に達したか
    full: bool,
    /// 次の挿入で置き換えられる要素の添字
    last: usize,
    /// 現在の最小スコア
    min: f64,
    /// 現在の最大スコア
    max: f64,
}

impl<T> Top<T> {
    /// 新しい選択器を生成します
    ///
    /// # 引数
    ///
    /// * `size` - 保持する最大件数
    pub fn new(size: usize) -> Self {
        Self {
            size,
            reverse: false,
            no_zero: false,
            data: Vec::with_capacity(size),
            full: size == 0,
            last: 0,
            min: f64::MAX,
            max: f64::MIN,
        }
    }

    /// 小さいスコアからk件を選ぶようにします
    pub fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// ちょうど0のスコアを拒否するようにします
    pub fn no_zero(mut self) -> Self {
        self.no_zero = true;
        self
    }

    /// 挿入済みの件数を返します。容量より少ないことがあります
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// 要素がないかどうかを判定します
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// スコアが挿入される可能性があるかを判定します
    ///
    /// スコアの計算が高価な場合、呼び出し側はこれを先に確かめて
    /// 計算自体を省けます。
    pub fn would_insert(&self, score: f64) -> bool {
        if score.is_nan() {
            return false;
        }
        if self.no_zero && score == 0.0 {
            return false;
        }
        if !self.full {
            return true;
        }
        if self.reverse {
            score < self.max
        } else {
            score > self.min
        }
    }

    /// スコア付きの要素を1つ流し込みます
    ///
    /// 容量に達するまでは常に保持されます。達した後は、現在の
    /// 置き換え対象（既定の順序では最小）より厳密に良い場合だけ
    /// 入れ替わります。
    ///
    /// # 引数
    ///
    /// * `score` - スコア。NaNは拒否されます
    /// * `payload` - 運ばれる値
    pub fn push(&mut self, score: f64, payload: T) {
        if score.is_nan() {
            return;
        }
        if self.no_zero && score == 0.0 {
            return;
        }
        if !self.full {
            if score > self.max {
                self.max = score;
            }
            if score < self.min {
                self.min = score;
            }
            self.data.push(Scored { score, payload });
            if self.data.len() < self.size {
                return;
            }
            // 容量に達した。置き換え対象を探しておく
            self.full = true;
            self.find_last();
            return;
        }
        if self.reverse {
            if score >= self.max {
                return;
            }
            if score < self.min {
                self.min = score;
            }
        } else {
            if score <= self.min {
                return;
            }
            if score > self.max {
                self.max = score;
            }
        }
        // 置き換え対象を上書きし、新しい対象を探し直す
        self.data[self.last] = Scored { score, payload };
        self.find_last();
    }

    /// 順序上の「最後」の要素（次に置き換えられるもの）を探す
    ///
    /// 既定の順序では最小、逆順では最大を探します。
    fn find_last(&mut self) {
        if self.data.is_empty() {
            return;
        }
        let mut last = 0;
        if self.reverse {
            let mut max = self.data[0].score;
            for (i, entry) in self.data.iter().enumerate().skip(1) {
                if entry.score > max {
                    max = entry.score;
                    last = i;
                }
            }
            self.max = max;
        } else {
            let mut min = self.data[0].score;
            for (i, entry) in self.data.iter().enumerate().skip(1) {
                if entry.score < min {
                    min = entry.score;
                    last = i;
                }
            }
            self.min = min;
        }
        self.last = last;
    }

    /// 選択された要素を順序に従ってソートして返します
    ///
    /// ソートはここで一度だけ行われます。既定では大きいスコアが先、
    /// [`Top::reverse`]の場合は小さいスコアが先です。
    pub fn into_sorted(mut self) -> Vec<Scored<T>> {
        if self.reverse {
            self.data.sort_by(|a, b| a.score.total_cmp(&b.score));
        } else {
            self.data.sort_by(|a, b| b.score.total_cmp(&a.score));
        }
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 決定的な擬似乱数列
    fn scores(n: usize) -> Vec<f64> {
        let mut state: u64 = 0x2545_F491_4F6C_DD1D;
        (0..n)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                f64::from((state >> 33) as u32) / f64::from(u32::MAX)
            })
            .collect()
    }

    /// 全件ソートと同じ上位k件が得られることのテスト
    #[test]
    fn test_against_full_sort() {
        let scores = scores(200);
        let mut top = Top::new(10);
        for (i, &score) in scores.iter().enumerate() {
            top.push(score, i);
        }
        let selected: Vec<f64> = top.into_sorted().iter().map(|e| e.score).collect();
        let mut all = scores.clone();
        all.sort_by(|a, b| b.total_cmp(a));
        assert_eq!(selected, &all[..10]);
    }

    /// 逆順で最小k件が得られることのテスト
    #[test]
    fn test_reverse() {
        let scores = scores(100);
        let mut top = Top::new(5).reverse();
        for (i, &score) in scores.iter().enumerate() {
            top.push(score, i);
        }
        let selected: Vec<f64> = top.into_sorted().iter().map(|e| e.score).collect();
        let mut all = scores.clone();
        all.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(selected, &all[..5]);
    }

    /// 容量未満なら全件保持されることのテスト
    #[test]
    fn test_not_full() {
        let mut top = Top::new(10);
        top.push(2.0, "b");
        top.push(1.0, "a");
        let sorted = top.into_sorted();
        assert_eq!(sorted.len(), 2);
        assert_eq!(sorted[0].payload, "b");
    }

    /// NaNと0の拒否のテスト
    #[test]
    fn test_rejections() {
        let mut top = Top::new(4).no_zero();
        top.push(f64::NAN, "nan");
        top.push(0.0, "zéro");
        top.push(1.0, "un");
        assert_eq!(top.len(), 1);
        assert!(!top.would_insert(f64::NAN));
        assert!(!top.would_insert(0.0));
        assert!(top.would_insert(0.5));
    }

    /// 同点は入れ替わらないことのテスト（厳密に良い場合だけ挿入）
    #[test]
    fn test_strictly_better() {
        let mut top = Top::new(2);
        top.push(1.0, "a");
        top.push(2.0, "b");
        // 最小と同点、入らない
        top.push(1.0, "c");
        let sorted = top.into_sorted();
        assert_eq!(sorted[1].payload, "a");
    }
}
