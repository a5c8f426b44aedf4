//! Gloseのテストモジュール群
//!
//! 各コンポーネント単体のテストはそれぞれのモジュールにあります。
//! ここには解析パイプライン全体と共起集計を通しで検証するテストを
//! 置きます。

mod analysis;
