//! Locations of the files gpuprov reads and writes.

use std::env;
use std::path::PathBuf;

use super::error::PathError;
use super::platform::{data_root, normalize_user_path};

/// Overrides the shell profile that receives toolkit exports.
pub const PROFILE_ENV: &str = "GPUPROV_PROFILE";

const MANIFEST_FILE: &str = "install-outcome.json";

/// Location of the `.env` file that stores user overrides.
pub fn env_file_path() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join(".env"))
}

/// Location of the last install outcome.
pub fn manifest_path() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join(MANIFEST_FILE))
}

/// Shell profile for toolkit exports: `GPUPROV_PROFILE` or `~/.bashrc`.
pub fn profile_path() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var(PROFILE_ENV)
        && !path.trim().is_empty()
    {
        return normalize_user_path(&path);
    }
    Ok(dirs::home_dir().ok_or(PathError::NoHomeDir)?.join(".bashrc"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::DATA_DIR_ENV;
    use crate::paths::test_utils::{ENV_LOCK, EnvVarGuard};

    #[test]
    fn test_files_live_under_data_root() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp = tempfile::tempdir().unwrap();
        let _env = EnvVarGuard::set(DATA_DIR_ENV, temp.path().to_string_lossy().as_ref());

        assert_eq!(manifest_path().unwrap(), temp.path().join("install-outcome.json"));
        assert_eq!(env_file_path().unwrap(), temp.path().join(".env"));
    }

    #[test]
    fn test_profile_override() {
        let _guard = ENV_LOCK.lock().unwrap();
        let _env = EnvVarGuard::set(PROFILE_ENV, "/tmp/gpuprov-test-profile");

        assert_eq!(
            profile_path().unwrap(),
            PathBuf::from("/tmp/gpuprov-test-profile")
        );
    }
}
