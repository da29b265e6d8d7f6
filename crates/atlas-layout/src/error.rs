#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid layout option {name}: {message}")]
    InvalidOption {
        name: &'static str,
        message: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
