//! ログ初期化
//!
//! tracing + tracing-subscriber。対話入力と混ざらないようファイルへ出力する。
//! RUST_LOG が設定されていればそちらを優先。

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_FILE_NAME: &str = "inventur.log";

fn filter(verbose: bool) -> EnvFilter {
    let default_level = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// ログ出力を初期化
///
/// ログファイルを開けない場合は標準エラーへ出力する。
pub fn init(log_dir: Option<&Path>, verbose: bool) {
    let file = log_dir.and_then(|dir| {
        std::fs::create_dir_all(dir).ok()?;
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(LOG_FILE_NAME))
            .ok()
    });

    let builder = fmt()
        .with_env_filter(filter(verbose))
        .with_target(false)
        .with_line_number(true);

    let result = match file {
        Some(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).try_init(),
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    if let Err(e) = result {
        eprintln!("ログ初期化エラー: {}", e);
    }
}

/// テスト用のログ初期化
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
