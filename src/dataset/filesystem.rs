use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::{AsciiParser, DatasetProvider, QualifiedName, XYDataset};
use crate::error::{PhzError, Result};

/// Provider over a directory tree of ASCII dataset files.
///
/// The qualified name of a file is its directory relative to the root
/// followed by the name the parser reads from the file. The tree is indexed
/// once, at construction.
#[derive(Debug, Clone)]
pub struct FileSystemProvider {
    root: PathBuf,
    parser: AsciiParser,
    index: BTreeMap<QualifiedName, PathBuf>,
}

impl FileSystemProvider {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let parser = AsciiParser;
        let mut index = BTreeMap::new();
        walk(&root, &root, &parser, &mut index)?;
        debug!("indexed {} datasets under {}", index.len(), root.display());
        Ok(Self { root, parser, index })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, name: &QualifiedName) -> Option<&Path> {
        self.index.get(name).map(PathBuf::as_path)
    }
}

fn walk(
    root: &Path,
    dir: &Path,
    parser: &AsciiParser,
    index: &mut BTreeMap<QualifiedName, PathBuf>,
) -> Result<()> {
    let mut entries = fs::read_dir(dir)
        .and_then(|it| it.collect::<io::Result<Vec<_>>>())
        .map_err(|e| PhzError::io(dir, e))?;
    entries.sort_by_key(fs::DirEntry::file_name);

    for entry in entries {
        let path = entry.path();
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        if path.is_dir() {
            walk(root, &path, parser, index)?;
            continue;
        }
        if !parser.is_dataset_file(&path) {
            warn!("skipping {}: not a dataset file", path.display());
            continue;
        }

        let mut segments: Vec<String> = path
            .parent()
            .and_then(|p| p.strip_prefix(root).ok())
            .map(|rel| {
                rel.components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        segments.push(parser.get_name(&path)?);
        let name = QualifiedName::new(segments)
            .map_err(|e| e.with_name(path.display().to_string()))?;

        if let Some(previous) = index.get(&name) {
            return Err(PhzError::parse(format!(
                "files {} and {} both define the dataset",
                previous.display(),
                path.display()
            ))
            .with_name(&name));
        }
        index.insert(name, path);
    }
    Ok(())
}

impl DatasetProvider for FileSystemProvider {
    fn list_contents(&self, group: &str) -> Result<Vec<QualifiedName>> {
        Ok(self
            .index
            .keys()
            .filter(|name| name.belongs_in_group(group))
            .cloned()
            .collect())
    }

    fn get_dataset(&self, name: &QualifiedName) -> Result<Option<XYDataset>> {
        let Some(path) = self.index.get(name) else {
            return Ok(None);
        };
        self.parser
            .get_dataset(path)
            .map(Some)
            .map_err(|e| e.with_name(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn indexes_nested_directories() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write(&root.join("CWW"), "ell.sed", "# NAME: Ell\n1000 1\n2000 2\n");
        write(&root.join("CWW/extra"), "sbc.sed", "# Sbc\n1000 1\n2000 2\n");
        write(root, "flat.txt", "1000 1\n2000 1\n");
        write(root, "README", "this is not a dataset\n");
        write(root, ".hidden", "1 2\n");

        let provider = FileSystemProvider::new(root).unwrap();
        let names: Vec<String> = provider
            .list_contents("")
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(names, vec!["CWW/Ell", "CWW/extra/Sbc", "flat"]);

        let cww = provider.list_contents("CWW").unwrap();
        assert_eq!(cww.len(), 2);

        let ds = provider
            .get_dataset(&QualifiedName::parse("CWW/Ell").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(ds.pairs(), &[(1000.0, 1.0), (2000.0, 2.0)]);
        assert!(
            provider
                .get_dataset(&QualifiedName::parse("CWW/Missing").unwrap())
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.txt", "# NAME: same\n1 1\n2 2\n");
        write(tmp.path(), "b.txt", "# NAME: same\n1 1\n2 2\n");
        let err = FileSystemProvider::new(tmp.path()).unwrap_err();
        assert!(matches!(err, PhzError::Parse { name: Some(ref n), .. } if n == "same"));
    }

    #[test]
    fn malformed_dataset_reports_its_name() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "bad.txt", "# NAME: bad\n1 1\n2 two\n");
        let provider = FileSystemProvider::new(tmp.path()).unwrap();
        let err = provider
            .get_dataset(&QualifiedName::parse("bad").unwrap())
            .unwrap_err();
        assert!(matches!(err, PhzError::Parse { name: Some(ref n), .. } if n == "bad"));
    }

    #[test]
    fn missing_root_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = FileSystemProvider::new(tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, PhzError::Io { .. }));
    }
}
