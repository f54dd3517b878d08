use std::{
    env,
    path::{Component, Path, PathBuf},
};

use crate::error::{Result, WriterError};

/// Turns a caller-supplied path into the path a commit will open.
pub trait PathNormalizer: Send + Sync {
    fn normalize(&self, path: &Path) -> Result<PathBuf>;
}

impl<F> PathNormalizer for F
where
    F: Fn(&Path) -> Result<PathBuf> + Send + Sync,
{
    fn normalize(&self, path: &Path) -> Result<PathBuf> {
        self(path)
    }
}

/// Makes a path absolute against the current directory and resolves `.` and
/// `..` components without touching the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexicalPathNormalizer;

impl PathNormalizer for LexicalPathNormalizer {
    fn normalize(&self, path: &Path) -> Result<PathBuf> {
        if path.as_os_str().is_empty() {
            return Err(WriterError::InvalidPath("path is empty".to_string()));
        }

        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            env::current_dir()?.join(path)
        };

        let mut normalized = PathBuf::new();
        for component in absolute.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    normalized.pop();
                }
                other => normalized.push(other.as_os_str()),
            }
        }

        if normalized.file_name().is_none() {
            return Err(WriterError::InvalidPath(format!(
                "{} does not name a file",
                path.display()
            )));
        }
        Ok(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dots_are_resolved() {
        let normalized = LexicalPathNormalizer
            .normalize(Path::new("/tmp/./reports/../out.csv"))
            .unwrap();
        assert_eq!(normalized, PathBuf::from("/tmp/out.csv"));
    }

    #[test]
    fn relative_paths_become_absolute() {
        let normalized = LexicalPathNormalizer
            .normalize(Path::new("out.csv"))
            .unwrap();
        assert!(normalized.is_absolute());
        assert!(normalized.ends_with("out.csv"));
    }

    #[test]
    fn paths_without_a_file_are_rejected() {
        assert!(matches!(
            LexicalPathNormalizer.normalize(Path::new("")),
            Err(WriterError::InvalidPath(_))
        ));
        assert!(matches!(
            LexicalPathNormalizer.normalize(Path::new("/")),
            Err(WriterError::InvalidPath(_))
        ));
    }

    #[test]
    fn closures_are_normalizers() {
        let fixed = |_: &Path| -> Result<PathBuf> { Ok(PathBuf::from("/data/fixed.csv")) };
        assert_eq!(
            fixed.normalize(Path::new("anything")).unwrap(),
            PathBuf::from("/data/fixed.csv")
        );
    }
}
