use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no input provided")]
    NoInput,

    #[error("cannot derive an output name from '{}', use --output", .0.display())]
    OutputName(PathBuf),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("{0}")]
    Walk(#[from] walkdir::Error),

    #[error("failed to compress file: {0}")]
    Compress(Box<Error>),
}

impl Error {
    /// Wrap a packaging failure for reporting at the top level
    pub fn compress(err: Error) -> Self {
        Error::Compress(Box::new(err))
    }
}
