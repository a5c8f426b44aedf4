//! 共起の集計を実行するユーティリティ
//!
//! このバイナリは、標準入力から読み込んだコーパスを解析し、距離付きの
//! 窓で共起を数え、選択した連関スコアで上位の連語を標準出力に出力します。
//! ストップワードと句読点は集計から除かれます。

use std::error::Error;
use std::io::{self, BufWriter, Read, Write};
use std::sync::Arc;

use glose::{
    Analyzer, Association, CoocWindow, Dictionaries, IntIntMap, Token, TokenStream, Top,
    Vocabulary,
};

use hashbrown::HashMap;

use clap::Parser;

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(name = "cooc", about = "Scores word co-occurrences of a French corpus")]
struct Args {
    /// Maximum distance between two co-occurring words.
    #[clap(short = 'd', long, default_value_t = 5)]
    distance: usize,

    /// Number of pairs to print.
    #[clap(short = 'k', long, default_value_t = 30)]
    top: usize,

    /// Scoring formula. Choices are count, jaccard, dice, ppmi, chi2, and g.
    #[clap(short = 's', long, default_value = "g")]
    score: Association,

    /// Words below this frequency are not tracked.
    #[clap(short = 'm', long, default_value_t = 2)]
    min_count: i32,

    /// Counts lemmas instead of surface forms.
    #[clap(short = 'l', long)]
    lemma: bool,
}

/// メイン関数
///
/// 標準入力の全体を1つのコーパスとして解析し、語彙の頻度と共起を
/// 集計して、スコアの高い順に `score count formA formB` を出力します。
///
/// # 戻り値
///
/// 実行が成功した場合は `Ok(())`、エラーが発生した場合はエラー情報
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let assoc = args.score;

    eprintln!("Loading the dictionaries...");
    let dics = Arc::new(Dictionaries::from_embedded()?);
    let mut analyzer = Analyzer::new(Arc::clone(&dics));

    let mut corpus = String::new();
    io::stdin().lock().read_to_string(&mut corpus)?;

    // 1回目の走査: 語形にIDを割り当て、頻度とイベント列を集める
    let mut ids: HashMap<String, i32> = HashMap::new();
    let mut forms: Vec<String> = vec![String::new()]; // id 0 は番兵、使わない
    let mut freq = IntIntMap::new();
    let mut events: Vec<i32> = vec![];
    analyzer.reset_text(&corpus);
    let mut token = Token::new();
    while analyzer.advance(&mut token) {
        if token.tag.is_pun() || dics.is_stop(token.term.as_chars()) {
            continue;
        }
        let form = if args.lemma && !token.lem.is_empty() {
            token.lem.to_string()
        } else {
            token.term.to_string()
        };
        let next = ids.len() as i32 + 1;
        let id = *ids.entry(form.clone()).or_insert_with(|| {
            forms.push(form);
            next
        });
        freq.inc(id);
        events.push(id);
    }
    eprintln!("{} forms, {} events", ids.len(), events.len());

    // 頻度の足りる語だけを語彙にする
    let tracked: Vec<i32> = freq
        .iter()
        .filter(|&(_, count)| count >= args.min_count)
        .map(|(id, _)| id)
        .collect();
    let vocab = Vocabulary::new(&tracked);

    // 2回目の走査: 窓を転がして共起を数える
    let mut window = CoocWindow::new(vocab, args.distance);
    for (position, &id) in events.iter().enumerate() {
        window.push(position, id);
    }

    // スコア付けして上位を選ぶ
    let matrix = window.matrix();
    let mut top = Top::new(args.top).no_zero();
    for edge in matrix.edges() {
        top.push(matrix.score(assoc, &edge), edge);
    }

    let out = io::stdout();
    let mut out = BufWriter::new(out.lock());
    let vocab = window.vocab();
    for entry in top.into_sorted() {
        let edge = entry.payload;
        writeln!(
            out,
            "{:.4}\t{}\t{}\t{}",
            entry.score,
            edge.count,
            forms[vocab.id_at(edge.source) as usize],
            forms[vocab.id_at(edge.target) as usize],
        )?;
    }
    out.flush()?;

    Ok(())
}
