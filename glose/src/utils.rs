//! ユーティリティ関数を提供するモジュール
//!
//! このモジュールには、辞書リソースのCSV処理とローマ数字の解析が
//! 含まれています。

use std::io::Read;

use csv_core::ReadFieldResult;

use crate::errors::{GloseError, Result};

/// リーダーからCSVレコードを読み取り、行ごとにクロージャを呼び出します
///
/// 最初の行（見出し行）、空行、先頭セルが`#`で始まる行（コメント）は
/// スキップされます。各レコードのセルは`cols`個に正規化されます。
/// 余分なセルは無視され、足りないセルは空文字列になります。
///
/// # 引数
///
/// * `rdr` - リソースのリーダー
/// * `name` - 診断用のリソース名
/// * `cols` - レコードあたりのセル数
/// * `on_row` - `(行番号, セル)`で呼び出されるクロージャ
///
/// # エラー
///
/// 入出力エラー、またはセルが大きすぎる場合にエラーを返します。
pub(crate) fn read_rows<R, F>(mut rdr: R, name: &'static str, cols: usize, on_row: F) -> Result<()>
where
    R: Read,
    F: FnMut(u64, &[String]),
{
    let mut buf = vec![];
    rdr.read_to_end(&mut buf)?;
    parse_rows(&buf, name, cols, on_row)
}

/// バイト列からCSVレコードを解析します
///
/// 動作は[`read_rows`]と同じです。
pub(crate) fn parse_rows<F>(
    mut bytes: &[u8],
    name: &'static str,
    cols: usize,
    mut on_row: F,
) -> Result<()>
where
    F: FnMut(u64, &[String]),
{
    let mut rdr = csv_core::Reader::new();
    let mut output = [0u8; 4096];
    let mut field = String::new();
    let mut cells: Vec<String> = Vec::with_capacity(cols);
    let mut line: u64 = 1;

    loop {
        let (result, nin, nout) = rdr.read_field(bytes, &mut output);
        bytes = &bytes[nin..];
        match result {
            ReadFieldResult::InputEmpty => {
                // 末尾が改行で終わらない場合の部分セル。次の呼び出しで確定する
                field.push_str(std::str::from_utf8(&output[..nout])?);
            }
            ReadFieldResult::OutputFull => {
                return Err(GloseError::invalid_format(name, "Field too large"));
            }
            ReadFieldResult::Field { record_end } => {
                field.push_str(std::str::from_utf8(&output[..nout])?);
                if cells.len() < cols {
                    cells.push(std::mem::take(&mut field));
                } else {
                    field.clear();
                }
                if record_end {
                    let blank = cells.is_empty() || cells[0].is_empty();
                    let comment = !blank && cells[0].starts_with('#');
                    let header = line == 1;
                    if !blank && !comment && !header {
                        while cells.len() < cols {
                            cells.push(String::new());
                        }
                        on_row(line, &cells);
                    }
                    cells.clear();
                    line += 1;
                }
            }
            ReadFieldResult::End => break,
        }
    }
    Ok(())
}

/// ローマ数字を解析します
///
/// 減算記法（IV, XC…）に対応します。
///
/// # 引数
///
/// * `chars` - 解析対象の文字列
///
/// # 戻り値
///
/// 解析された値。ローマ数字以外の文字が含まれる場合は`-1`、
/// 空の場合は`0`を返します。
pub(crate) fn roman_to_int(chars: &[char]) -> i32 {
    const fn dec(c: char) -> i32 {
        match c {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            'C' => 100,
            'D' => 500,
            'M' => 1000,
            _ => -1,
        }
    }
    let len = chars.len();
    let mut value = 0;
    let mut i = 0;
    while i < len {
        let v1 = dec(chars[i]);
        if v1 < 0 {
            return -1; // ローマ数字以外の文字
        }
        // 次の文字の方が大きければ減算記法
        if i + 1 < len {
            let v2 = dec(chars[i + 1]);
            if v1 < v2 {
                value += v2 - v1;
                i += 2;
                continue;
            }
        }
        value += v1;
        i += 1;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ローマ数字解析のテスト
    #[test]
    fn test_roman() {
        let chars = |s: &str| s.chars().collect::<Vec<char>>();
        assert_eq!(roman_to_int(&chars("I")), 1);
        assert_eq!(roman_to_int(&chars("IV")), 4);
        assert_eq!(roman_to_int(&chars("XIV")), 14);
        assert_eq!(roman_to_int(&chars("XVIII")), 18);
        assert_eq!(roman_to_int(&chars("MCMXC")), 1990);
        assert_eq!(roman_to_int(&chars("Louis")), -1);
        assert_eq!(roman_to_int(&chars("")), 0);
    }

    /// CSVレコード解析のテスト
    #[test]
    fn test_parse_rows() {
        let src = "GRAPH,TAG\n# comment\n\nchat,SUB\nfenêtre,SUB\n\"a,b\",SUB";
        let mut rows: Vec<(u64, Vec<String>)> = vec![];
        parse_rows(src.as_bytes(), "test.csv", 2, |line, cells| {
            rows.push((line, cells.to_vec()));
        })
        .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].1, ["chat", "SUB"]);
        assert_eq!(rows[1].1, ["fenêtre", "SUB"]);
        // 引用符で囲まれたセル内のカンマ
        assert_eq!(rows[2].1, ["a,b", "SUB"]);
        // 行番号はコメント・空行を含めて数える
        assert_eq!(rows[0].0, 4);
    }

    /// セル数の正規化のテスト
    #[test]
    fn test_cols() {
        let src = "H1,H2,H3\nun\ndeux,2,II,extra\n";
        let mut rows: Vec<Vec<String>> = vec![];
        parse_rows(src.as_bytes(), "test.csv", 3, |_, cells| {
            rows.push(cells.to_vec());
        })
        .unwrap();
        assert_eq!(rows[0], ["un", "", ""]);
        assert_eq!(rows[1], ["deux", "2", "II"]);
    }
}
