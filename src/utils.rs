// ABOUTME: Utility functions for the slidecraft application
// ABOUTME: Provides helpers for path validation, output directories and file naming

use crate::errors::{DeckError, Result};
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// Characters that are not allowed in file names on common platforms.
const INVALID_FILE_NAME_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathKind {
    File,
    Directory,
}

fn validate_path(path: &Path, kind: PathKind) -> Result<()> {
    if !path.exists() {
        return Err(DeckError::PathNotFoundError(path.to_path_buf()));
    }
    let (matches, noun) = match kind {
        PathKind::File => (path.is_file(), "file"),
        PathKind::Directory => (path.is_dir(), "directory"),
    };
    if !matches {
        return Err(DeckError::ValidationError(format!(
            "Path is not a {}: {:?}",
            noun, path
        )));
    }
    Ok(())
}

/// Check an input file (template, content map or backdrop image) before reading it.
pub fn validate_file_exists(path: &Path) -> Result<()> {
    validate_path(path, PathKind::File)
}

/// Check a template catalog directory before scanning it.
pub fn validate_directory_exists(path: &Path) -> Result<()> {
    validate_path(path, PathKind::Directory)
}

/// Create an output directory if needed. An empty path means the current
/// directory and is accepted as is.
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Ok(());
    }
    if path.exists() {
        return validate_directory_exists(path);
    }
    debug!("Creating output directory {:?}", path);
    fs::create_dir_all(path).map_err(DeckError::FileReadError)
}

/// Make sure the directory a prepared content map will be written into exists.
pub fn ensure_parent_directory_exists(file_path: &Path) -> Result<()> {
    match file_path.parent() {
        Some(parent) => ensure_directory_exists(parent),
        None => Ok(()),
    }
}

/// Confirm a deck can be written into `path`, creating the directory first.
pub fn validate_directory_writable(path: &Path) -> Result<()> {
    ensure_directory_exists(path)?;

    // Write a throwaway file so a read-only directory is reported by name
    let scratch = path.join(format!(".slidecraft_{}.tmp", uuid::Uuid::new_v4()));
    if let Err(e) = fs::File::create(&scratch) {
        return Err(DeckError::ValidationError(format!(
            "Output directory is not writable: {:?} - {}",
            path, e
        )));
    }
    if let Err(e) = fs::remove_file(&scratch) {
        warn!("Failed to remove scratch file {:?}: {}", scratch, e);
    }
    Ok(())
}

/// Replace every character that is invalid in a file name with `_`.
///
/// Control characters (newlines, tabs and the like) are replaced too.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if INVALID_FILE_NAME_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}
