//! 字句解析を実行するユーティリティ
//!
//! このバイナリは、標準入力から読み込んだテキストを解析し、
//! 指定された出力形式（csv、text、names）で結果を出力します。

use std::error::Error;
use std::io::{self, BufRead, BufWriter, Write};
use std::str::FromStr;
use std::sync::Arc;

use glose::{Analyzer, Dictionaries, Token, TokenStream};

use clap::Parser;

/// 出力モード
#[derive(Clone, Debug)]
enum OutputMode {
    Csv,
    Text,
    Names,
}

/// `OutputMode` の `FromStr` 実装
impl FromStr for OutputMode {
    type Err = &'static str;

    /// 文字列から出力モードをパースする
    ///
    /// # 引数
    ///
    /// * `mode` - パース対象の文字列（"csv"、"text"、"names"のいずれか）
    ///
    /// # 戻り値
    ///
    /// パースに成功した場合は対応する `OutputMode`、失敗した場合はエラーメッセージ
    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "csv" => Ok(Self::Csv),
            "text" => Ok(Self::Text),
            "names" => Ok(Self::Names),
            _ => Err("Could not parse a mode"),
        }
    }
}

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(name = "tokenize", about = "Annotates French text")]
struct Args {
    /// Output mode. Choices are csv, text, and names.
    #[clap(short = 'O', long, default_value = "csv")]
    output_mode: OutputMode,

    /// Prints lemmas instead of surface forms in text mode.
    #[clap(short = 'l', long)]
    lemma: bool,
}

/// メイン関数
///
/// 辞書をロードし、標準入力から読み込んだ各行を解析して、
/// 指定された形式で結果を標準出力に出力します。
///
/// # 戻り値
///
/// 実行が成功した場合は `Ok(())`、エラーが発生した場合はエラー情報
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    eprintln!("Loading the dictionaries...");
    let dics = Arc::new(Dictionaries::from_embedded()?);
    let mut analyzer = Analyzer::new(dics);
    let mut token = Token::new();

    let out = io::stdout();
    let mut out = BufWriter::new(out.lock());
    for line in io::stdin().lock().lines() {
        let line = line?;
        analyzer.reset_text(&line);
        let mut first = true;
        while analyzer.advance(&mut token) {
            match args.output_mode {
                OutputMode::Csv => {
                    writeln!(
                        out,
                        "{}\t{}\t{}\t{}\t{}",
                        token.term,
                        token.tag.name(),
                        token.lem,
                        token.start,
                        token.end
                    )?;
                }
                OutputMode::Text => {
                    if token.tag.is_pun() {
                        continue;
                    }
                    if !first {
                        write!(out, " ")?;
                    }
                    if args.lemma && !token.lem.is_empty() {
                        write!(out, "{}", token.lem)?;
                    } else {
                        write!(out, "{}", token.term)?;
                    }
                    first = false;
                }
                OutputMode::Names => {
                    if !token.tag.is_name() {
                        continue;
                    }
                    writeln!(out, "{}\t{}", token.term, token.tag.name())?;
                }
            }
        }
        match args.output_mode {
            OutputMode::Csv => writeln!(out, "EOL")?,
            OutputMode::Text => writeln!(out)?,
            OutputMode::Names => {}
        }
    }
    out.flush()?;

    Ok(())
}
