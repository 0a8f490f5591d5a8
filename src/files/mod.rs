//! Recursive directory copy and line counting
//!
//! Every copied or scanned file is reported through the injected
//! [`AuditSink`]. Copy failures abort; scan failures on a single file are
//! recorded and skipped.
//!
//! Copies follow symlinked directories and fail on a link back to an
//! ancestor. Scans never descend into symlinked directories.

use crate::audit::AuditSink;
use log::Level;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Directory nesting allowed before a copy is abandoned
pub const DEFAULT_MAX_DEPTH: usize = 64;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("Source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("Directory nesting deeper than {limit} levels at {}", .path.display())]
    DepthExceeded { path: PathBuf, limit: usize },
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| FileError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn walk(fallback: &Path) -> impl FnOnce(walkdir::Error) -> Self + '_ {
        move |err| FileError::Io {
            path: err.path().unwrap_or(fallback).to_path_buf(),
            source: err.into(),
        }
    }
}

#[derive(Debug)]
pub struct FileProcessor<S: AuditSink> {
    sink: S,
    max_depth: usize,
}

impl<S: AuditSink> FileProcessor<S> {
    pub fn new(sink: S) -> Self {
        Self::with_max_depth(sink, DEFAULT_MAX_DEPTH)
    }

    /// `max_depth` is the deepest directory level visited below the root
    pub fn with_max_depth(sink: S, max_depth: usize) -> Self {
        Self { sink, max_depth }
    }

    /// Copy everything under `source` into `target`, overwriting existing files
    ///
    /// `target` and its parents are created as needed.
    pub fn copy_directory(&self, source: &Path, target: &Path) -> Result<(), FileError> {
        if !source.exists() {
            self.sink.record(
                Level::Error,
                &format!("Source directory not found: {}", source.display()),
            );
            return Err(FileError::SourceNotFound(source.to_path_buf()));
        }

        self.ensure_dir(target)?;

        // one extra level so files inside the deepest allowed directory are reached
        let walker = WalkDir::new(source)
            .min_depth(1)
            .max_depth(self.max_depth.saturating_add(1))
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(FileError::walk(source))?;
            let rel = entry
                .path()
                .strip_prefix(source)
                .unwrap_or_else(|_| Path::new(entry.file_name()));
            let target_item = target.join(rel);

            if entry.file_type().is_dir() {
                if entry.depth() > self.max_depth {
                    self.sink.record(
                        Level::Error,
                        &format!("Copy aborted, too deep: {}", entry.path().display()),
                    );
                    return Err(FileError::DepthExceeded {
                        path: entry.path().to_path_buf(),
                        limit: self.max_depth,
                    });
                }
                self.ensure_dir(&target_item)?;
                continue;
            }

            fs::copy(entry.path(), &target_item).map_err(FileError::io(entry.path()))?;
            self.sink.record(
                Level::Info,
                &format!("Copied file: {}", entry.file_name().to_string_lossy()),
            );
        }

        Ok(())
    }

    fn ensure_dir(&self, dir: &Path) -> Result<(), FileError> {
        fs::create_dir_all(dir).map_err(FileError::io(dir))?;
        self.sink.record(
            Level::Info,
            &format!("Created/verified target directory: {}", dir.display()),
        );
        Ok(())
    }

    /// Count lines of every file under `directory` whose extension is listed
    ///
    /// Extensions match with or without one leading dot (`".txt"` or `"txt"`).
    /// Files that cannot be read as text are recorded and skipped. A missing
    /// `directory` yields nothing.
    pub fn process_files<E: AsRef<str>>(
        &self,
        directory: &Path,
        extensions: &[E],
    ) -> Vec<(String, usize)> {
        let wanted: Vec<&str> = extensions
            .iter()
            .map(|e| {
                let e = e.as_ref();
                e.strip_prefix('.').unwrap_or(e)
            })
            .collect();

        let mut result = Vec::new();
        if !directory.exists() {
            return result;
        }

        let walker = WalkDir::new(directory)
            .min_depth(1)
            .max_depth(self.max_depth.saturating_add(1))
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.sink.record(Level::Error, &format!("Scan error: {}", e));
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                if entry.depth() > self.max_depth {
                    self.sink.record(
                        Level::Error,
                        &format!("Scan stopped, too deep: {}", entry.path().display()),
                    );
                }
                continue;
            }

            let matches = entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| wanted.contains(&ext));
            if !matches {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            match count_lines(entry.path()) {
                Ok(lines) => {
                    self.sink
                        .record(Level::Info, &format!("Processed file: {}", name));
                    result.push((name, lines));
                }
                Err(e) => {
                    self.sink
                        .record(Level::Error, &format!("Error processing {}: {}", name, e));
                }
            }
        }

        result
    }
}

fn count_lines(path: &Path) -> io::Result<usize> {
    let reader = BufReader::new(File::open(path)?);
    let mut count = 0;
    for line in reader.lines() {
        line?;
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::MemorySink;
    use tempfile::tempdir;

    fn write(path: &Path, contents: &[u8]) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_copy_directory_recursive() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("nested").join("target");
        write(&source.join("a.txt"), b"one\ntwo\n");
        write(&source.join("sub").join("b.log"), b"three");

        let sink = MemorySink::new();
        FileProcessor::new(&sink)
            .copy_directory(&source, &target)
            .unwrap();

        assert_eq!(fs::read(target.join("a.txt")).unwrap(), b"one\ntwo\n");
        assert_eq!(fs::read(target.join("sub").join("b.log")).unwrap(), b"three");
        assert!(sink.messages().contains(&"Copied file: b.log".to_string()));
    }

    #[test]
    fn test_copy_overwrites_existing_files() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        write(&source.join("a.txt"), b"new");
        write(&target.join("a.txt"), b"old contents");
        write(&target.join("keep.txt"), b"untouched");

        let sink = MemorySink::new();
        FileProcessor::new(&sink)
            .copy_directory(&source, &target)
            .unwrap();

        assert_eq!(fs::read(target.join("a.txt")).unwrap(), b"new");
        assert_eq!(fs::read(target.join("keep.txt")).unwrap(), b"untouched");
    }

    #[test]
    fn test_copy_missing_source() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("absent");
        let target = dir.path().join("target");

        let sink = MemorySink::new();
        let err = FileProcessor::new(&sink)
            .copy_directory(&source, &target)
            .unwrap_err();

        assert!(matches!(err, FileError::SourceNotFound(ref p) if p == &source));
        assert!(!target.exists());
        assert_eq!(sink.records()[0].0, Level::Error);
    }

    #[test]
    fn test_copy_depth_limit() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("source");
        write(&source.join("l1").join("l2").join("l3").join("f.txt"), b"x");

        let sink = MemorySink::new();
        let err = FileProcessor::with_max_depth(&sink, 2)
            .copy_directory(&source, &dir.path().join("target"))
            .unwrap_err();

        assert!(matches!(err, FileError::DepthExceeded { limit: 2, .. }));
    }

    #[test]
    fn test_process_files_counts_lines() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(&root.join("a.txt"), b"one\ntwo\nthree\n");
        write(&root.join("b.log"), b"no trailing newline");
        write(&root.join("skip.rs"), b"fn main() {}\n");
        write(&root.join("deep").join("c.txt"), b"");

        let sink = MemorySink::new();
        let result = FileProcessor::new(&sink).process_files(root, &[".txt", "log"]);

        assert_eq!(
            result,
            vec![
                ("a.txt".to_string(), 3),
                ("b.log".to_string(), 1),
                ("c.txt".to_string(), 0),
            ]
        );
    }

    #[test]
    fn test_process_files_skips_unreadable() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(&root.join("bad.txt"), &[0xff, 0xfe, b'\n']);
        write(&root.join("good.txt"), b"fine\n");

        let sink = MemorySink::new();
        let result = FileProcessor::new(&sink).process_files(root, &[".txt"]);

        assert_eq!(result, vec![("good.txt".to_string(), 1)]);
        assert!(
            sink.records()
                .iter()
                .any(|(level, msg)| *level == Level::Error && msg.starts_with("Error processing bad.txt"))
        );
    }

    #[test]
    fn test_process_missing_directory() {
        let dir = tempdir().unwrap();
        let sink = MemorySink::new();
        let result = FileProcessor::new(&sink).process_files(&dir.path().join("nope"), &[".txt"]);

        assert!(result.is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_process_files_strips_only_one_dot() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(&root.join("a.txt"), b"line\n");

        let sink = MemorySink::new();
        let processor = FileProcessor::new(&sink);

        assert!(processor.process_files(root, &["..txt"]).is_empty());
        assert_eq!(
            processor.process_files(root, &["txt"]),
            vec![("a.txt".to_string(), 1)]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_process_files_ignores_symlinked_directories() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let root = dir.path().join("root");
        write(&root.join("a.txt"), b"one\ntwo\n");
        symlink(&root, root.join("loop")).unwrap();
        symlink(&root, root.join("loop2")).unwrap();

        let sink = MemorySink::new();
        let result = FileProcessor::with_max_depth(&sink, 10).process_files(&root, &[".txt"]);

        assert_eq!(result, vec![("a.txt".to_string(), 2)]);
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_fails_on_symlink_cycle() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let source = dir.path().join("source");
        write(&source.join("a.txt"), b"x");
        symlink(&source, source.join("loop")).unwrap();

        let sink = MemorySink::new();
        let err = FileProcessor::new(&sink)
            .copy_directory(&source, &dir.path().join("target"))
            .unwrap_err();

        assert!(matches!(err, FileError::Io { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_follows_symlinked_directory() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let shared = dir.path().join("shared");
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        write(&shared.join("b.txt"), b"shared");
        fs::create_dir_all(&source).unwrap();
        symlink(&shared, source.join("linked")).unwrap();

        let sink = MemorySink::new();
        FileProcessor::new(&sink)
            .copy_directory(&source, &target)
            .unwrap();

        assert_eq!(fs::read(target.join("linked").join("b.txt")).unwrap(), b"shared");
    }
}
