//! inventur-scan
//!
//! Arbeitstabelle（Excel）を参照してバーコードを照合し、棚卸結果を
//! Excelファイルへ記録する。

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod layout;
pub mod logging;
pub mod terminal;
