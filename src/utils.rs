use std::path::{Component, Path};

/// Final path component as a string, `None` for paths like `/` or `..`
pub fn base_name(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

/// Archive name for `path` relative to `root`, always `/`-separated
pub fn relative_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Archive name for a supplemental path given on the command line, kept as typed
pub fn given_name(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_base_name() {
        assert_eq!(base_name(Path::new("target/release/app")), Some("app".to_string()));
        assert_eq!(base_name(Path::new("site/")), Some("site".to_string()));
        assert_eq!(base_name(Path::new("/")), None);
    }

    #[test]
    fn test_relative_name() {
        let root = PathBuf::from("public");
        let path = root.join("css").join("site.css");
        assert_eq!(relative_name(&root, &path), "css/site.css");
    }

    #[test]
    fn test_given_name_is_verbatim() {
        assert_eq!(given_name(Path::new("conf/app.yaml")), "conf/app.yaml");
    }
}
