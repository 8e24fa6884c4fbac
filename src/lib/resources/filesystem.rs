//! Module defining and implementing filesystem resource loaders.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glob;

use super::Loader;


/// Normalize a resource name for the purpose of matching it against file names.
///
/// Matching is case-insensitive and ignores dashes, underscores and spaces,
/// so that e.g. `DejaVu-Sans` refers to `DejaVuSans.ttf`.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !(*c == '-' || *c == '_' || c.is_whitespace()))
        .flat_map(|c| c.to_lowercase())
        .collect()
}


/// Loader for file paths from given directories, searched recursively.
///
/// The resources here are just file *paths* (std::path::PathBuf),
/// and no substantial "loading" is performing (only path resolution).
///
/// This isn't particularly useful on its own, but can be wrapped around
/// to make more interesting loaders.
#[derive(Clone)]
pub struct PathLoader<'pl> {
    directories: Vec<PathBuf>,
    predicate: Arc<dyn Fn(&Path) -> bool + Send + Sync + 'pl>,
}

impl<'pl> PathLoader<'pl> {
    #[inline]
    pub fn new<D: AsRef<Path>>(directory: D) -> Self {
        Self::with_predicate(directory, |_| true)
    }

    /// Create a loader which only gives out paths to files
    /// that have one of the extensions given.
    pub fn for_extensions<D: AsRef<Path>, I, S>(directory: D, extensions: I) -> Self
        where I: IntoIterator<Item=S>, S: ToString
    {
        Self::with_predicate(directory, {
            let extensions: Vec<_> = extensions.into_iter()
                .map(|e| e.to_string()).map(|e| e.trim().to_lowercase())
                .collect();
            move |path| {
                let ext = path.extension().and_then(|e| e.to_str())
                    .map(|s| s.trim().to_lowercase());
                extensions.iter().any(|e| Some(e) == ext.as_ref())
            }
        })
    }

    pub fn with_predicate<D, P>(directory: D, predicate: P) -> Self
        where D: AsRef<Path>, P: Fn(&Path) -> bool + Send + Sync + 'pl
    {
        PathLoader{
            directories: vec![directory.as_ref().to_owned()],
            predicate: Arc::new(predicate),
        }
    }
}

impl<'pl> PathLoader<'pl> {
    /// Add another directory to search, after all the existing ones.
    pub fn add_directory<D: AsRef<Path>>(&mut self, directory: D) {
        let directory = directory.as_ref();
        if !self.directories.iter().any(|d| d == directory) {
            self.directories.push(directory.to_owned());
        }
    }

    #[inline]
    pub fn directories(&self) -> &[PathBuf] {
        &self.directories[..]
    }

    /// Find all the files in the loader's directories that satisfy its predicate.
    ///
    /// Files from earlier directories come first.
    pub fn files(&self) -> Vec<PathBuf> {
        let mut result = vec![];
        for directory in &self.directories {
            if !directory.is_dir() {
                trace!("Skipping non-existent directory {}", directory.display());
                continue;
            }
            let pattern = format!("{}/**/*",
                glob::Pattern::escape(&directory.to_string_lossy()));
            trace!("Globbing with {}", pattern);

            let glob_iter = match glob::glob(&pattern) {
                Ok(it) => it,
                Err(e) => {
                    warn!("Failed to glob over files with {}: {}", pattern, e);
                    continue;
                },
            };
            for entry in glob_iter {
                match entry {
                    Ok(path) => if path.is_file() && (self.predicate)(&path) {
                        result.push(path);
                    },
                    Err(e) => debug!("Cannot access {}: {}", e.path().display(), e),
                }
            }
        }
        result
    }
}

impl<'pl> Loader for PathLoader<'pl> {
    type Item = PathBuf;
    type Err = io::Error;

    /// "Load" a path "resource" from the loader's directories.
    ///
    /// A name which is itself a path to an existing file resolves to that file.
    /// Otherwise the first file whose stem matches the (normalized) name is used.
    fn load<'n>(&self, name: &'n str) -> Result<Self::Item, Self::Err> {
        let as_path = Path::new(name);
        if as_path.is_file() {
            trace!("Resource `{}` is a path to an existing file", name);
            return Ok(as_path.to_owned());
        }

        let wanted = normalize_name(name);
        if wanted.is_empty() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput,
                format!("invalid resource name `{}`", name)));
        }
        self.files().into_iter()
            .find(|path| path.file_stem().and_then(|s| s.to_str())
                .map(|stem| normalize_name(stem) == wanted).unwrap_or(false))
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound,
                format!("resource `{}` not found in {} director{}", name,
                    self.directories.len(),
                    if self.directories.len() == 1 { "y" } else { "ies" })))
    }
}

impl<'pl> fmt::Debug for PathLoader<'pl> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("PathLoader")
            .field("directories", &self.directories)
            .finish()
    }
}


/// Wrapper around PathLoader that loads the entire content of the files.
#[derive(Clone, Debug)]
pub struct BytesLoader<'pl> {
    inner: PathLoader<'pl>,
}

impl<'pl> BytesLoader<'pl> {
    #[inline]
    pub fn new(inner: PathLoader<'pl>) -> Self {
        BytesLoader{inner}
    }

    #[inline]
    pub fn paths(&self) -> &PathLoader<'pl> {
        &self.inner
    }

    #[inline]
    pub fn paths_mut(&mut self) -> &mut PathLoader<'pl> {
        &mut self.inner
    }
}
impl<'pl> From<PathLoader<'pl>> for BytesLoader<'pl> {
    fn from(input: PathLoader<'pl>) -> Self {
        Self::new(input)
    }
}

impl<'pl> Loader for BytesLoader<'pl> {
    type Item = Vec<u8>;
    type Err = io::Error;

    /// Load a file resource as its byte content.
    fn load<'n>(&self, name: &'n str) -> Result<Self::Item, Self::Err> {
        let path = self.inner.load(name)?;
        trace!("Reading resource `{}` from {}", name, path.display());
        let file = File::open(&path)?;

        let mut bytes = match fs::metadata(&path) {
            Ok(stat) => Vec::with_capacity(stat.len() as usize),
            Err(e) => {
                warn!("Failed to stat file of resource `{}` to obtain its size: {}",
                    name, e);
                Vec::new()
            },
        };

        let mut reader = BufReader::new(file);
        reader.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}


#[cfg(test)]
mod tests {
    use std::fs;
    use std::io;
    use spectral::prelude::*;
    use tempfile::TempDir;
    use resources::Loader;
    use super::{BytesLoader, PathLoader, normalize_name};

    fn touch(dir: &TempDir, name: &str, content: &str) {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn normalization() {
        assert_eq!("dejavusans", normalize_name("DejaVu-Sans"));
        assert_eq!("dejavusans", normalize_name("dejavu_sans"));
        assert_eq!("dejavusans", normalize_name("DejaVu Sans"));
        assert_eq!("", normalize_name(" - _"));
    }

    #[test]
    fn finds_files_recursively() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "a.ttf", "");
        touch(&dir, "nested/deeper/b.TTF", "");
        touch(&dir, "c.txt", "");
        let loader = PathLoader::for_extensions(dir.path(), vec!["ttf"]);

        let mut names: Vec<_> = loader.files().iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(vec!["a.ttf", "b.TTF"], names);
    }

    #[test]
    fn load_by_normalized_name() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "fonts/DejaVuSans.ttf", "");
        let loader = PathLoader::for_extensions(dir.path(), vec!["ttf"]);
        let path = loader.load("DejaVu-Sans").unwrap();
        assert!(path.ends_with("fonts/DejaVuSans.ttf"));
    }

    #[test]
    fn load_not_found() {
        let dir = TempDir::new().unwrap();
        let loader = PathLoader::new(dir.path());
        assert_that!(loader.load("nope").map_err(|e| e.kind()))
            .is_err().is_equal_to(io::ErrorKind::NotFound);
        assert_that!(loader.load("--").map_err(|e| e.kind()))
            .is_err().is_equal_to(io::ErrorKind::InvalidInput);
    }

    #[test]
    fn first_directory_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        touch(&first, "Impact.ttf", "first");
        touch(&second, "impact.ttf", "second");

        let mut loader = PathLoader::new(first.path());
        loader.add_directory(second.path());
        let bytes = BytesLoader::new(loader).load("impact").unwrap();
        assert_eq!(b"first".to_vec(), bytes);
    }

    #[test]
    fn load_existing_path() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "elsewhere/x.bin", "hi");
        let path = dir.path().join("elsewhere/x.bin");
        let loader = BytesLoader::new(PathLoader::new("/nonexistent/directory"));
        assert_eq!(b"hi".to_vec(), loader.load(path.to_str().unwrap()).unwrap());
    }
}
