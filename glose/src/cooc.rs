//! 共起の集計
//!
//! このモジュールは、注目する語彙を限定した上で、テキスト（位置と語IDの
//! 列）の中の距離付き共起を数えるための構造を提供します:
//!
//! - [`Vocabulary`] - 整列・重複排除された語IDの配列。共起行列の座標は
//!   語IDそのものではなく、この配列の中の添字です
//! - [`CoocMatrix`] - 語彙添字で引く密な共起行列。周辺頻度と母数も保持し、
//!   [`crate::score::Association`]による遅延スコア計算を支えます
//! - [`CoocWindow`] - 窓距離内のイベントを保持する転がし窓。ちょうど
//!   1回ずつの共起カウントを保証します
//!
//! 窓のアルゴリズムは2段階です: まず窓内の生き残りを走査して「出会った」
//! 集合に印を付け（ピボット語自身が再出現したら印をリセット）、走査後に
//! 印の付いた添字だけを行列に加算します。走査中に直接加算すると、同じ窓に
//! 2回現れる語がピボットに対して二重に数えられてしまうためです。

use std::collections::VecDeque;

use crate::score::Association;

/// 整列・重複排除された語IDの配列
///
/// 下流の構造（行列、スコア入力）はすべて、この配列の中の添字で
/// 座標付けされます。配列は狭義単調増加で、二分探索で引けます。
/// 再構築した場合、派生した構造はすべて作り直す必要があります。
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    ids: Vec<i32>,
}

impl Vocabulary {
    /// 任意の整数列から語彙を構築します
    ///
    /// # 引数
    ///
    /// * `ids` - 語IDの列。整列され、重複は取り除かれます
    pub fn new(ids: &[i32]) -> Self {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        Self { ids }
    }

    /// 語彙の大きさを返します
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// 語彙が空かどうかを判定します
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// 語IDから語彙添字を引きます
    ///
    /// # 戻り値
    ///
    /// 語彙に含まれる場合はその添字、含まれない場合は`None`
    #[inline(always)]
    pub fn index_of(&self, term_id: i32) -> Option<usize> {
        self.ids.binary_search(&term_id).ok()
    }

    /// 語彙添字から語IDを返します
    #[inline(always)]
    pub fn id_at(&self, index: usize) -> i32 {
        self.ids[index]
    }

    /// 語IDの整列済みスライスを返します
    pub fn ids(&self) -> &[i32] {
        &self.ids
    }
}

/// 共起のペア
///
/// `source`と`target`は語彙添字です。無向の行列では常に
/// `source <= target`の正規形で保持され、(a,b)と(b,a)は同一視されます。
/// スコアは保持されません。集計後に[`CoocMatrix::score`]で
/// 必要になったときに計算されます。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// 語彙添字（無向なら小さい方）
    pub source: usize,
    /// 語彙添字（無向なら大きい方）
    pub target: usize,
    /// 共起の回数
    pub count: u32,
}

/// 語彙添字で引く密な共起行列
///
/// セルに加えて、スコア計算に必要な語ごとの周辺頻度と母数`N`を
/// 保持します。
#[derive(Debug, Clone)]
pub struct CoocMatrix {
    /// 一辺の大きさ（語彙の大きさ）
    len: usize,
    /// `len * len`のセル。無向では上三角だけが使われます
    cells: Vec<u32>,
    /// 語彙添字ごとの全体出現数
    marginals: Vec<u64>,
    /// イベントの母数
    n: u64,
    /// 向きを保持するか
    directed: bool,
}

impl CoocMatrix {
    /// 新しい行列を生成します
    ///
    /// # 引数
    ///
    /// * `len` - 語彙の大きさ
    /// * `directed` - 向きを保持するか。偽なら(a,b)と(b,a)は同じセル
    pub fn new(len: usize, directed: bool) -> Self {
        Self {
            len,
            cells: vec![0; len * len],
            marginals: vec![0; len],
            n: 0,
            directed,
        }
    }

    /// セルの添字を計算する。無向なら上三角に正規化する
    #[inline(always)]
    fn cell_index(&self, source: usize, target: usize) -> usize {
        if self.directed || source <= target {
            source * self.len + target
        } else {
            target * self.len + source
        }
    }

    /// ペアのカウントを1増やします
    ///
    /// # 引数
    ///
    /// * `source` - 語彙添字
    /// * `target` - 語彙添字
    ///
    /// # 戻り値
    ///
    /// 新しいカウント
    pub fn inc(&mut self, source: usize, target: usize) -> u32 {
        let cell = self.cell_index(source, target);
        self.cells[cell] += 1;
        self.cells[cell]
    }

    /// ペアのカウントを返します
    #[inline(always)]
    pub fn count(&self, source: usize, target: usize) -> u32 {
        self.cells[self.cell_index(source, target)]
    }

    /// 語彙添字の周辺頻度を返します
    #[inline(always)]
    pub fn marginal(&self, index: usize) -> u64 {
        self.marginals[index]
    }

    /// 語彙添字の周辺頻度を1増やします
    #[inline(always)]
    pub fn inc_marginal(&mut self, index: usize) {
        self.marginals[index] += 1;
    }

    /// イベントの母数を返します
    #[inline(always)]
    pub fn n(&self) -> u64 {
        self.n
    }

    /// イベントの母数を1増やします
    #[inline(always)]
    pub fn inc_n(&mut self) {
        self.n += 1;
    }

    /// カウントが正のペアを列挙します
    ///
    /// 無向の行列では上三角（`source <= target`）だけが列挙されるため、
    /// 各ペアはちょうど1回現れます。
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        let directed = self.directed;
        (0..self.len).flat_map(move |source| {
            let from = if directed { 0 } else { source };
            (from..self.len).filter_map(move |target| {
                let count = self.cells[source * self.len + target];
                if count == 0 || source == target {
                    None
                } else {
                    Some(Edge {
                        source,
                        target,
                        count,
                    })
                }
            })
        })
    }

    /// ペアの連関スコアを計算します
    ///
    /// 集計済みの周辺頻度と母数から、選択した式で2×2分割表を評価します。
    ///
    /// # 引数
    ///
    /// * `assoc` - スコアの式
    /// * `edge` - スコアを付けるペア
    pub fn score(&self, assoc: Association, edge: &Edge) -> f64 {
        assoc.score(
            f64::from(edge.count),
            self.marginals[edge.source] as f64,
            self.marginals[edge.target] as f64,
            self.n as f64,
        )
    }

    /// 別の行列の内容を加算します
    ///
    /// 並列に走らせた独立の集計を後から統合するためのものです。
    /// 走査中の可変状態の共有はサポートされません。
    ///
    /// # パニック
    ///
    /// 語彙の大きさまたは向きが一致しない場合はパニックします。
    pub fn merge(&mut self, other: &CoocMatrix) {
        assert_eq!(self.len, other.len, "vocabulary size mismatch");
        assert_eq!(self.directed, other.directed, "direction mismatch");
        for (cell, value) in self.cells.iter_mut().zip(&other.cells) {
            *cell += value;
        }
        for (marginal, value) in self.marginals.iter_mut().zip(&other.marginals) {
            *marginal += value;
        }
        self.n += other.n;
    }
}

/// 距離付き共起を集計する転がし窓
///
/// (位置, 語ID)のイベント列を受け取り、語彙に含まれる語だけについて、
/// 距離`distance`以内の共起を[`CoocMatrix`]に加算します。位置は単調
/// 非減少で与えられる前提です。1回の集計パス（1文書または1コーパス走査）
/// ごとに1インスタンスを使用します。
///
/// # 例
///
/// ```
/// use glose::{CoocWindow, Vocabulary};
///
/// let vocab = Vocabulary::new(&[1, 2]);
/// let mut window = CoocWindow::new(vocab, 1);
/// for (position, term_id) in [(0, 1), (1, 2), (2, 1)] {
///     window.push(position, term_id);
/// }
/// // A B A、距離1: (A,B)は位置0↔1と1↔2の2回。繰り返されたAが
/// // 同じBを二重に数えることはない
/// let edges: Vec<_> = window.matrix().edges().collect();
/// assert_eq!(edges.len(), 1);
/// assert_eq!(edges[0].count, 2);
/// ```
#[derive(Debug)]
pub struct CoocWindow {
    vocab: Vocabulary,
    /// 共起とみなす最大距離
    distance: usize,
    matrix: CoocMatrix,
    /// 窓内に残っている(位置, 語彙添字)のイベント
    buffer: VecDeque<(usize, usize)>,
    /// 1ステップの「出会った」集合
    seen: Vec<bool>,
}

impl CoocWindow {
    /// 新しい窓を生成します
    ///
    /// # 引数
    ///
    /// * `vocab` - 追跡する語彙
    /// * `distance` - 共起とみなす最大距離（位置の差）
    pub fn new(vocab: Vocabulary, distance: usize) -> Self {
        let len = vocab.len();
        Self {
            vocab,
            distance,
            matrix: CoocMatrix::new(len, false),
            buffer: VecDeque::with_capacity(distance + 1),
            seen: vec![false; len],
        }
    }

    /// 語彙を返します
    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// 集計された行列を返します
    pub fn matrix(&self) -> &CoocMatrix {
        &self.matrix
    }

    /// イベントを1つ進めます
    ///
    /// 語彙に含まれないIDは黙って無視されます。追跡する語だけを数えるのが
    /// この構造の目的であって、エラーではありません。
    ///
    /// # 引数
    ///
    /// * `position` - テキスト中の位置。単調非減少
    /// * `term_id` - 語ID
    pub fn push(&mut self, position: usize, term_id: i32) {
        let Some(index) = self.vocab.index_of(term_id) else {
            return;
        };
        self.matrix.inc_marginal(index);

        // 窓から出たイベントを落とす。位置は単調なので先頭から見ればよい
        while let Some(&(front, _)) = self.buffer.front() {
            if position - front > self.distance {
                self.buffer.pop_front();
            } else {
                break;
            }
        }

        // 第1段階: 生き残りを順に走査して出会った語彙添字に印を付ける
        self.seen.fill(false);
        for &(_, other) in &self.buffer {
            if other == index {
                // ピボット語の再出現。それより前の出会いは、その出現が
                // 押し込まれた時に既に数えられている
                self.seen.fill(false);
                continue;
            }
            if self.seen[other] {
                // 同じ語の繰り返しは数え直さない
                continue;
            }
            self.seen[other] = true;
            self.matrix.inc_n();
        }
        // 第2段階: 印の付いた添字を行列に加算する
        for other in 0..self.seen.len() {
            if self.seen[other] {
                self.matrix.inc(index, other);
            }
        }

        self.buffer.push_back((position, index));
    }

    /// 窓と行列を空にします
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.matrix = CoocMatrix::new(self.vocab.len(), false);
    }
}
