//! # Glose
//!
//! Gloseは、フランス語の字句解析と語彙統計のためのライブラリです。
//!
//! ## 概要
//!
//! このライブラリは2つの中核を提供します。1つ目は、生テキスト
//! （タグの混ざったXML/HTMLを含む）を注釈付きトークン列（表層形、
//! 品詞タグ、見出し語、文字位置）に変換する、辞書駆動の手書き
//! トークナイザー・タガーのパイプラインです。2つ目は、限定した語彙の
//! 距離付き共起を数え、交換可能な統計式でスコア付けする共起集計の
//! サブシステムです。
//!
//! ## 主な機能
//!
//! - **トークン化**: 文・節の句読点、エリジオン、分割可能なハイフン、
//!   省略形、実体参照、マークアップの読み飛ばしを扱う文字単位の状態機械
//! - **品詞付与と見出し語化**: 辞書引きによる決定的な付与。大文字の
//!   規則で未知の固有名詞を推定
//! - **複合固有名詞の結合**: Victor Hugo のような連なりを1トークンに
//! - **共起統計**: 転がし窓によるちょうど1回ずつの共起カウント、
//!   6種類の連関スコア、上位k件の選択、疎ベクトル演算
//!
//! ## 使用例
//!
//! ```
//! use std::sync::Arc;
//! use glose::{Analyzer, Dictionaries, Tag};
//!
//! let dics = Arc::new(Dictionaries::from_embedded()?);
//! let mut analyzer = Analyzer::new(dics);
//! let tokens = analyzer.tokens("Jean-Paul dit : « Je n'en sais rien. »");
//!
//! assert_eq!(tokens[0].term, "Jean-Paul");
//! assert_eq!(tokens[0].tag, Tag::NamePersM);
//! assert_eq!(tokens[1].term, "dit");
//! assert_eq!(tokens[1].lem, "dire");
//! # Ok::<(), glose::GloseError>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

/// 解析パイプラインの組み立て
pub mod analyzer;

/// 可変文字バッファ
pub mod charbuf;

/// 文字分類テーブル
pub mod chars;

/// 共起の集計
pub mod cooc;

/// 語彙資源の読み込みと管理
pub mod dictionary;

/// エラー型の定義
pub mod errors;

/// 整数→整数マップ
pub mod intmap;

/// 品詞付与と見出し語化
pub mod lemmatizer;

/// 複合固有名詞の結合
pub mod names;

/// 連関スコアの式
pub mod score;

/// 品詞タグの定義
pub mod tag;

/// トークン型とストリームインターフェース
pub mod token;

/// トークナイザー
pub mod tokenizer;

/// 上位k件の選択器
pub mod top;

/// 内部ユーティリティ関数
mod utils;

#[cfg(test)]
mod tests;

// Re-exports
pub use analyzer::Analyzer;
pub use charbuf::CharBuf;
pub use cooc::{CoocMatrix, CoocWindow, Edge, Vocabulary};
pub use dictionary::{Dictionaries, LexEntry};
pub use errors::{GloseError, Result};
pub use intmap::IntIntMap;
pub use lemmatizer::Lemmatizer;
pub use names::NameMerger;
pub use score::Association;
pub use tag::Tag;
pub use token::{Token, TokenStream};
pub use tokenizer::Tokenizer;
pub use top::{Scored, Top};

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
