//! 解析パイプライン全体のテスト

use std::sync::Arc;

use crate::analyzer::Analyzer;
use crate::dictionary::Dictionaries;
use crate::tag::Tag;
use crate::token::Token;

fn analyzer() -> Analyzer {
    Analyzer::new(Arc::new(Dictionaries::from_embedded().unwrap()))
}

/// 具体的なシナリオ: 複合固有名詞、動詞、句読点、引用符、エリジオン、
/// 否定、文末の終止符が正しい順序と位置で出てくる
#[test]
fn test_sentence_scenario() {
    let text = "Jean-Paul dit : « Je n'en sais rien. »";
    let tokens = analyzer().tokens(text);
    let expected: &[(&str, Tag)] = &[
        ("Jean-Paul", Tag::NamePersM),
        ("dit", Tag::Verb),
        (":", Tag::PunClause),
        ("«", Tag::PunClause),
        ("je", Tag::ProPers),
        ("ne", Tag::AdvNeg),
        ("en", Tag::ProPers),
        ("sais", Tag::Verb),
        ("rien", Tag::ProIndef),
        (".", Tag::PunSent),
        ("»", Tag::PunClause),
    ];
    assert_eq!(tokens.len(), expected.len());
    for (token, (term, tag)) in tokens.iter().zip(expected) {
        assert_eq!(&token.term, term);
        assert_eq!(token.tag, *tag, "tag mismatch on {term:?}");
    }
    // 位置は重ならず、単調に増え、入力の範囲に収まる
    let total = text.chars().count();
    let mut last_end = 0;
    for token in &tokens {
        assert!(token.start >= last_end);
        assert!(token.end <= total);
        last_end = token.end;
    }
    // 見出し語
    assert_eq!(tokens[1].lem, "dire");
    assert_eq!(tokens[7].lem, "savoir");
}

/// 動詞と代名詞の倒置の分割と、複合固有名詞の保持が共存する
#[test]
fn test_inversion_and_compound() {
    let tokens = analyzer().tokens("Viendras-tu à Jean-Jacques Rousseau ?");
    let surfaces: Vec<String> = tokens.iter().map(|t| t.term.to_string()).collect();
    assert_eq!(
        surfaces,
        ["Viendras", "tu", "à", "Jean-Jacques Rousseau", "?"]
    );
    assert_eq!(tokens[3].tag, Tag::NamePers);
}

/// タグの混ざった入力の解析と構造トークン
#[test]
fn test_markup_pipeline() {
    let text = "<p>Victor Hugo écrit.</p><p>La mer monte.</p>";
    let tokens = analyzer().tokens(text);
    let surfaces: Vec<String> = tokens.iter().map(|t| t.term.to_string()).collect();
    assert_eq!(
        surfaces,
        ["<p>", "Victor Hugo", "écrit", ".", "<p>", "la", "mer", "monte", "."]
    );
    assert_eq!(tokens[0].tag, Tag::PunPara);
    assert_eq!(tokens[1].tag, Tag::NameAuthor);
    // 構造区切りの後は文頭の扱い: La は la に戻る
    assert_eq!(tokens[5].tag, Tag::DetArt);
}

/// 再利用の契約: 消費者がコピーを取らなければ内容は上書きされる、
/// コピーを取れば保持される
#[test]
fn test_reuse_contract() {
    let dics = Arc::new(Dictionaries::from_embedded().unwrap());
    let mut analyzer = Analyzer::new(dics);
    analyzer.reset_text("premier second");
    use crate::token::TokenStream;
    let mut token = Token::new();
    assert!(analyzer.advance(&mut token));
    let mut kept = Token::new();
    kept.copy_from(&token);
    assert!(analyzer.advance(&mut token));
    assert_eq!(&kept.term, "premier");
    assert_eq!(&token.term, "second");
}

/// 同じインスタンスを別の入力に再利用できる
#[test]
fn test_reset() {
    let mut analyzer = analyzer();
    let first = analyzer.tokens("Hugo parle.");
    assert_eq!(first[0].tag, Tag::NameAuthor);
    let second = analyzer.tokens("Une autre phrase, toute neuve.");
    assert_eq!(&second[0].term, "une");
    // 文頭の状態も巻き戻っている
    assert_eq!(second[0].tag, Tag::DetArt);
    let mut last_end = 0;
    for token in &second {
        assert!(token.start >= last_end);
        last_end = token.end;
    }
}

/// ストップワードの判定がパイプラインの出力に使える
#[test]
fn test_stopwords() {
    let dics = Arc::new(Dictionaries::from_embedded().unwrap());
    let mut analyzer = Analyzer::new(Arc::clone(&dics));
    let tokens = analyzer.tokens("la liberté des hommes");
    let kept: Vec<String> = tokens
        .iter()
        .filter(|t| !t.tag.is_pun() && !dics.is_stop(t.term.as_chars()))
        .map(|t| t.term.to_string())
        .collect();
    assert_eq!(kept, ["liberté", "hommes"]);
}
