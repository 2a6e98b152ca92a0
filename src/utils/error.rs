// src/utils/error.rs

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error("preference storage unavailable: {0}")]
    Storage(String),
    #[error("locale '{0}' is registered more than once")]
    DuplicateLocale(String),
    #[error("locale '{0}' is not registered")]
    UnknownLocale(String),
    #[error("no translation tree for fallback locale '{0}'")]
    MissingFallbackTree(String),
    #[error("{0}")]
    Msg(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<&'static str> for Error {
    fn from(s: &'static str) -> Self {
        Error::Msg(s.to_string())
    }
}

#[macro_export]
macro_rules! err {
    ($msg:literal $(,)?) => {
        $crate::utils::error::Error::Msg($msg.to_string())
    };
    ($err_expr:expr $(,)?) => {
        $crate::utils::error::Error::Msg($err_expr.into())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::utils::error::Error::Msg(format!($fmt, $($arg)*))
    };
}
