use crate::{CommonError, CommonResult};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions treated as seed sources when scanning a directory
pub const SEED_EXTENSIONS: &[&str] = &["ts", "js", "mts", "mjs", "cjs"];

/// File system abstraction for reading seed sources and testing
pub trait FileSystem {
    /// Check if a file or directory exists
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Seed sources below `dir`, sorted by path
    fn seed_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;
}

pub fn is_seed_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SEED_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
        && !path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.ends_with(".d.ts"))
            .unwrap_or(false)
}

/// A seed file read into memory
#[derive(Debug, Clone)]
pub struct SeedSource {
    pub path: PathBuf,
    pub content: String,
}

/// Read `input`, or every seed file below it when it is a directory
pub fn load_seed_sources(fs: &dyn FileSystem, input: &Path) -> CommonResult<Vec<SeedSource>> {
    if !fs.exists(input) {
        return Err(CommonError::InputNotFound(input.to_path_buf()));
    }

    let paths = if fs.is_dir(input) {
        fs.seed_files(input)?
    } else {
        vec![input.to_path_buf()]
    };

    paths
        .into_iter()
        .map(|path| -> CommonResult<SeedSource> {
            let content = fs.read_to_string(&path)?;
            Ok(SeedSource { path, content })
        })
        .collect()
}

/// Real file system implementation
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn seed_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_ignored_dir(e.file_name().to_str()))
        {
            let entry = entry.map_err(io::Error::from)?;
            if entry.file_type().is_file() && is_seed_file(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        Ok(files)
    }
}

fn is_ignored_dir(name: Option<&str>) -> bool {
    matches!(name, Some("node_modules") | Some(".git"))
}

/// Mock file system for testing
pub struct MockFileSystem {
    pub files: BTreeMap<PathBuf, String>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self {
            files: BTreeMap::new(),
        }
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.files.keys().any(|file| file != path && file.starts_with(path))
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )
        })
    }

    fn seed_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        // BTreeMap keys are already sorted
        Ok(self
            .files
            .keys()
            .filter(|file| file.starts_with(dir) && is_seed_file(file))
            .filter(|file| {
                let below = file.strip_prefix(dir).unwrap_or(file);
                !below
                    .parent()
                    .into_iter()
                    .flat_map(Path::components)
                    .any(|part| is_ignored_dir(part.as_os_str().to_str()))
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_seed_file() {
        assert!(is_seed_file(Path::new("prisma/seed.ts")));
        assert!(is_seed_file(Path::new("seed.mjs")));
        assert!(!is_seed_file(Path::new("types.d.ts")));
        assert!(!is_seed_file(Path::new("data.json")));
        assert!(!is_seed_file(Path::new("Makefile")));
    }

    #[test]
    fn test_mock_file_system() {
        let mut fs = MockFileSystem::new();
        fs.add_file("prisma/seed.ts", "const a = [];");
        fs.add_file("prisma/nested/more.js", "const b = [];");
        fs.add_file("prisma/schema.prisma", "model A {}");

        assert!(fs.exists(Path::new("prisma/seed.ts")));
        assert!(fs.is_dir(Path::new("prisma")));
        assert!(!fs.is_dir(Path::new("prisma/seed.ts")));
        assert!(fs.read_to_string(Path::new("missing.ts")).is_err());

        let files = fs.seed_files(Path::new("prisma")).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("prisma/nested/more.js"),
                PathBuf::from("prisma/seed.ts"),
            ]
        );
    }

    #[test]
    fn test_mock_seed_files_skip_node_modules() {
        let mut fs = MockFileSystem::new();
        fs.add_file("app/seed.ts", "const a = [];");
        fs.add_file("app/node_modules/pkg/index.js", "module.exports = {};");
        fs.add_file("app/.git/hooks/pre-commit.js", "");

        let files = fs.seed_files(Path::new("app")).unwrap();
        assert_eq!(files, vec![PathBuf::from("app/seed.ts")]);
    }

    #[test]
    fn test_load_seed_sources() {
        let mut fs = MockFileSystem::new();
        fs.add_file("seeds/a.ts", "const a = [];");
        fs.add_file("seeds/b.txt", "ignored");

        let sources = load_seed_sources(&fs, Path::new("seeds")).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].content, "const a = [];");

        let single = load_seed_sources(&fs, Path::new("seeds/b.txt")).unwrap();
        assert_eq!(single[0].content, "ignored");

        let err = load_seed_sources(&fs, Path::new("missing")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_real_seed_files_skip_node_modules() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir_all(root.join("seeds/extra")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("seeds/a.ts"), "const a = [];").unwrap();
        fs::write(root.join("seeds/extra/b.js"), "const b = [];").unwrap();
        fs::write(root.join("seeds/readme.md"), "# seeds").unwrap();
        fs::write(root.join("node_modules/pkg/index.js"), "module.exports = {};").unwrap();

        let files = RealFileSystem.seed_files(root).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![PathBuf::from("seeds/a.ts"), PathBuf::from("seeds/extra/b.js")]
        );
    }
}
