use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "inventur-scan")]
#[command(about = "バーコード棚卸ツール（ロール・グラニュレート）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 対話式スキャンを開始
    Scan {
        /// Arbeitstabelle（デフォルト: 設定のデータフォルダ内）
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// データフォルダ（棚卸ファイルの保存先）
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// 自動保存を無効化（:s で手動保存）
        #[arg(long)]
        no_auto_save: bool,
    },

    /// 記録済みの一覧を表示
    List {
        /// JSONで出力
        #[arg(long)]
        json: bool,

        /// データフォルダ
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },

    /// Arbeitstabelleを検証
    Check {
        /// Arbeitstabelle
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },

    /// 棚卸ファイルのバックアップを作成
    Export {
        /// 出力先（フォルダ、または .xlsx ファイル）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// データフォルダ
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },

    /// 設定を表示・変更
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 自動保存のオン/オフ
        #[arg(long)]
        auto_save: Option<bool>,
    },
}
