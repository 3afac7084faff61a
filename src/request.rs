use crate::error::Error;
use crate::result::Result;
use crate::utils;
use std::path::{Path, PathBuf};

/// What to package and where to write it
#[derive(Debug, PartialEq, Eq)]
pub struct PackageRequest {
    pub executable: Option<PathBuf>,
    pub supplemental: Vec<PathBuf>,
    pub output: PathBuf,
}

impl PackageRequest {
    /// Resolve positional inputs into a request.
    ///
    /// When the first input is a directory there is no executable and every
    /// input is archived as a supplemental path. Otherwise the first input is
    /// the executable, even if it does not exist (reading it fails later).
    pub fn resolve(inputs: &[PathBuf], output: Option<PathBuf>) -> Result<Self> {
        let (first, rest) = inputs.split_first().ok_or(Error::NoInput)?;

        let output = match output {
            Some(path) if !path.as_os_str().is_empty() => path,
            _ => default_output(first)?,
        };

        let request = if first.is_dir() {
            PackageRequest {
                executable: None,
                supplemental: inputs.to_vec(),
                output,
            }
        } else {
            PackageRequest {
                executable: Some(first.clone()),
                supplemental: rest.to_vec(),
                output,
            }
        };

        Ok(request)
    }
}

/// `<base name of first input>.zip`
fn default_output(first: &Path) -> Result<PathBuf> {
    let name = utils::base_name(first).ok_or_else(|| Error::OutputName(first.to_path_buf()))?;
    Ok(PathBuf::from(format!("{}.zip", name)))
}
