use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("item `{codename}` has type `{found}`, expected `{expected}`")]
    UnexpectedType {
        codename: String,
        expected: &'static str,
        found: String,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
    #[error("locale table is empty")]
    Empty,

    #[error("default locale `{0}` is not in the locale table")]
    UnknownDefault(String),

    #[error("locale `{0}` is listed more than once")]
    Duplicate(String),

    #[error("locale code `{0}` must be a lowercase tag like `en` or `pt-br`")]
    InvalidCode(String),
}
