//! Dynamic plugin loading: `dlopen`/`LoadLibrary` a shared object and call
//! its exported registration entry point.
//!
//! Mirrors `LibraryManager::loadLibrary` from the original harness (path
//! existence check, one handle kept alive per loaded library, load
//! failures turned into a collected error rather than a panic) but hands
//! off the actual factory bookkeeping to `registry::with_batch`.

use std::ffi::OsStr;
use std::path::Path;

use libloading::{Library, Symbol};

use crate::errors::PluginError;
use crate::registry::{self, RegistrationBatch};

/// Signature every plugin library must export under this name.
pub type RegisterFn = unsafe extern "C" fn(&RegistrationBatch);

const ENTRY_POINT: &[u8] = b"tank_arena_register";

/// Loaded libraries are kept alive for the process lifetime: unloading a
/// library whose factories are still reachable from the registry would
/// leave dangling function pointers behind.
pub struct LoadedLibrary {
    path: String,
    _handle: Library,
}

/// Load one plugin file and run its registration entry point.
///
/// # Safety
/// Calls into arbitrary native code supplied by the library at `path`; the
/// harness makes no sandboxing guarantee (spec Non-goals).
pub unsafe fn load_plugin_library(path: &Path) -> Result<LoadedLibrary, PluginError> {
    let path_str = path.to_string_lossy().to_string();

    if !path.exists() {
        return Err(PluginError::LoadFailed {
            path: path_str,
            reason: "file does not exist".to_string(),
        });
    }

    let library = Library::new(path).map_err(|e| PluginError::LoadFailed {
        path: path_str.clone(),
        reason: e.to_string(),
    })?;

    let register: Symbol<RegisterFn> = library
        .get(ENTRY_POINT)
        .map_err(|_| PluginError::MissingEntryPoint { path: path_str.clone() })?;

    registry::with_batch(&path_str, |batch| {
        register(batch);
        Ok(())
    })?;

    Ok(LoadedLibrary { path: path_str, _handle: library })
}

impl LoadedLibrary {
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// List candidate plugin files in `dir` by platform shared-library
/// extension, sorted for deterministic load order.
pub fn enumerate_plugin_files(dir: &Path) -> std::io::Result<Vec<std::path::PathBuf>> {
    let ext: &OsStr = if cfg!(target_os = "windows") {
        OsStr::new("dll")
    } else if cfg!(target_os = "macos") {
        OsStr::new("dylib")
    } else {
        OsStr::new("so")
    };

    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension() == Some(ext) {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_a_load_failure() {
        let result = unsafe { load_plugin_library(Path::new("/nonexistent/path/libdoesnotexist.so")) };
        assert!(matches!(result, Err(PluginError::LoadFailed { .. })));
    }

    #[test]
    fn enumerate_returns_empty_for_dir_with_no_libraries() {
        let dir = tempfile::tempdir().unwrap();
        let files = enumerate_plugin_files(dir.path()).unwrap();
        assert!(files.is_empty());
    }
}
