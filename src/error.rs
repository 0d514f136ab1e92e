use thiserror::Error;

#[derive(Debug, Error)]
pub enum SvgtrimError {
    #[error("can't inline transform that is more than a translate: {0}")]
    UnsupportedTransform(String),

    #[error("malformed document: {0}")]
    MalformedDocument(String),

    #[error("invalid SVG: {0}")]
    InvalidSvg(String),

    #[error("invalid SVG before simplification: {0}")]
    InvalidStructure(&'static str),

    #[error("invalid path data: {0}")]
    InvalidPath(String),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for SvgtrimError {
    fn from(err: quick_xml::Error) -> Self {
        Self::MalformedDocument(err.to_string())
    }
}
