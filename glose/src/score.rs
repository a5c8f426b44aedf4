//! 共起の連関スコア
//!
//! このモジュールは、2×2分割表（共起数、2つの周辺頻度、母数）を1つの
//! 比較可能な値に変換する式の族を提供します。式は[`Association`]の
//! バリアントとして選択でき、すべて同じ4つの数値を受け取ります。
//!
//! 分母が0になる入力（周辺頻度が0、母数が0）は定義済みの値0.0を返し、
//! NaNを伝播させません。下流の選択器はNaNを拒否しますが、スコアの
//! 段階で既に生成しないことが契約です。

/// 連関スコアの式
///
/// # 例
///
/// ```
/// use glose::Association;
///
/// let jaccard = Association::Jaccard.score(2.0, 4.0, 3.0, 100.0);
/// assert!((jaccard - 0.4).abs() < 1e-9);
/// // 周辺頻度が0でもNaNにならない
/// assert_eq!(Association::Jaccard.score(0.0, 0.0, 0.0, 0.0), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Association {
    /// 生の共起数
    Count,
    /// Jaccard係数 j / (a + b − j)
    Jaccard,
    /// 2j / (a² + b²)
    ///
    /// 古典的なDice係数 2j/(a+b) ではない。互換性のため意図的に
    /// この式を保っている
    Dice,
    /// 自己情報量で正規化した正の相互情報量
    ///
    /// 共起数または周辺頻度が下限`k = 4`以下なら0、負の生PMIも0に
    /// 切り上げられます
    Ppmi,
    /// カイ二乗統計量 Σ(Oᵢ−Eᵢ)²/Eᵢ
    ///
    /// 観測された共起数が期待値を下回る場合は負号が付きます
    Chi2,
    /// G統計量 2·ΣOᵢ·ln(Oᵢ/Eᵢ)
    ///
    /// 観測された共起数が期待値を下回る場合は負号が付きます
    G,
}

/// PPMIの最小頻度の下限
const PPMI_CUTOFF: f64 = 4.0;

impl Association {
    /// 名前から式を取得します
    ///
    /// # 引数
    ///
    /// * `name` - 式の名前（小文字）
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "count" => Some(Self::Count),
            "jaccard" => Some(Self::Jaccard),
            "dice" => Some(Self::Dice),
            "ppmi" => Some(Self::Ppmi),
            "chi2" => Some(Self::Chi2),
            "g" => Some(Self::G),
            _ => None,
        }
    }

    /// 式の名前を返します
    pub const fn name(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Jaccard => "jaccard",
            Self::Dice => "dice",
            Self::Ppmi => "ppmi",
            Self::Chi2 => "chi2",
            Self::G => "g",
        }
    }

    /// 連関スコアを計算します
    ///
    /// # 引数
    ///
    /// * `oab` - 観測された共起数
    /// * `oa` - aの全体出現数（abを含む）
    /// * `ob` - bの全体出現数（abを含む）
    /// * `n` - イベントの母数
    ///
    /// # 戻り値
    ///
    /// 選択した式によるスコア。NaNになる入力では0.0
    pub fn score(self, oab: f64, oa: f64, ob: f64, n: f64) -> f64 {
        match self {
            Self::Count => oab,
            Self::Jaccard => {
                // m11 / (m10 + m01 + m11)
                let denom = oa + ob - oab;
                if denom <= 0.0 {
                    0.0
                } else {
                    oab / denom
                }
            }
            Self::Dice => {
                let denom = oa * oa + ob * ob;
                if denom <= 0.0 {
                    0.0
                } else {
                    2.0 * oab / denom
                }
            }
            Self::Ppmi => {
                // 稀な場合を切り捨てる
                if oab <= PPMI_CUTOFF || oa <= PPMI_CUTOFF || ob <= PPMI_CUTOFF || n <= 0.0 {
                    return 0.0;
                }
                let pmi = (((oab + PPMI_CUTOFF) / n) / ((oa / n) * (ob / n))).ln();
                if pmi < 0.0 {
                    return 0.0;
                }
                let self_info = -(oab / n).ln();
                if self_info <= 0.0 {
                    0.0
                } else {
                    pmi / self_info
                }
            }
            Self::Chi2 => {
                let (observed, expected) = match tables(oab, oa, ob, n) {
                    Some(t) => t,
                    None => return 0.0,
                };
                let mut sum = 0.0;
                for (o, e) in observed.iter().zip(&expected) {
                    if *o == 0.0 || *e == 0.0 {
                        continue;
                    }
                    let diff = o - e;
                    sum += diff * diff / e;
                }
                if oab < expected[0] {
                    -sum
                } else {
                    sum
                }
            }
            Self::G => {
                let (observed, expected) = match tables(oab, oa, ob, n) {
                    Some(t) => t,
                    None => return 0.0,
                };
                let mut sum = 0.0;
                for (o, e) in observed.iter().zip(&expected) {
                    if *o == 0.0 || *e == 0.0 {
                        continue;
                    }
                    sum += o * (o / e).ln();
                }
                if oab < expected[0] {
                    -2.0 * sum
                } else {
                    2.0 * sum
                }
            }
        }
    }
}

/// `Association` の `FromStr` 実装
impl std::str::FromStr for Association {
    type Err = crate::errors::GloseError;

    /// 文字列から式をパースする
    ///
    /// # 引数
    ///
    /// * `name` - パース対象の文字列（[`Association::name`]の名前）
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::from_name(name).ok_or_else(|| {
            crate::errors::GloseError::invalid_argument(
                "score",
                format!("unknown formula {name:?}"),
            )
        })
    }
}

/// 2×2分割表の観測値{Oab, Oa¬b, Ob¬a, O¬a¬b}と期待値{Eab, Ea¬b, Eb¬a, E¬a¬b}
///
/// - Eab = Oa·Ob/N, Ea¬b = Oa·(N−Ob)/N, Eb¬a = Ob·(N−Oa)/N,
///   E¬a¬b = (N−Oa)·(N−Ob)/N。ΣEᵢ = N
/// - Oab, Oa−Oab, Ob−Oab, N−Oa−Ob+Oab。ΣOᵢ = N
///
/// 母数や周辺頻度が0なら`None`（スコアは0になる）。
fn tables(oab: f64, oa: f64, ob: f64, n: f64) -> Option<([f64; 4], [f64; 4])> {
    if n <= 0.0 || oa <= 0.0 || ob <= 0.0 {
        return None;
    }
    let observed = [oab, oa - oab, ob - oab, n - oa - ob + oab];
    let expected = [
        oa * ob / n,
        oa * (n - ob) / n,
        ob * (n - oa) / n,
        (n - oa) * (n - ob) / n,
    ];
    Some((observed, expected))
}
