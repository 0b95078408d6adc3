use thiserror::Error;

#[derive(Error, Debug)]
pub enum InventurError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("Arbeitstabelleのシート「{sheet}」に必須列がありません: {columns}")]
    CatalogMissingColumns { sheet: String, columns: String },

    #[error("Excel読み込みエラー: {0}")]
    ExcelRead(String),

    #[error("Excel書き込みエラー: {0}")]
    ExcelWrite(String),

    #[error("バックアップエラー: {0}")]
    Backup(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("入力が中断されました")]
    Interrupted,

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] inventur_common::Error),
}

impl From<calamine::XlsxError> for InventurError {
    fn from(err: calamine::XlsxError) -> Self {
        InventurError::ExcelRead(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for InventurError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        InventurError::ExcelWrite(err.to_string())
    }
}

impl From<dialoguer::Error> for InventurError {
    fn from(err: dialoguer::Error) -> Self {
        match err {
            // Ctrl-C
            dialoguer::Error::IO(e) if e.kind() == std::io::ErrorKind::Interrupted => {
                InventurError::Interrupted
            }
            other => InventurError::Prompt(other.to_string()),
        }
    }
}

impl InventurError {
    /// 端末が使えなくなった等、セッションを続行できないエラーか
    pub fn is_fatal(&self) -> bool {
        matches!(self, InventurError::Prompt(_))
    }
}

pub type Result<T> = std::result::Result<T, InventurError>;
