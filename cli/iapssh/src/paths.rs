//! Local filesystem resolution: SSH file paths, the gcloud IAP helper
//! script, and the login name.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::error::CliError;

/// Fixed SSH private key location, relative to the home directory.
const SSH_KEY_FILE: &str = ".ssh/id_rsa";

/// Known-hosts file that gcloud-managed SSH sessions write.
const KNOWN_HOSTS_FILE: &str = ".ssh/google_compute_known_hosts";

fn home_dir() -> Result<PathBuf, CliError> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or(CliError::NoHomeDir)
}

/// Path to the user's SSH private key (`~/.ssh/id_rsa`).
pub fn ssh_key_file() -> Result<PathBuf, CliError> {
    Ok(home_dir()?.join(SSH_KEY_FILE))
}

/// Path to the known-hosts file for compute hosts.
pub fn known_hosts_file() -> Result<PathBuf, CliError> {
    Ok(home_dir()?.join(KNOWN_HOSTS_FILE))
}

/// Locate the IAP tunnelling helper bundled with the installed gcloud CLI.
pub fn gcloud_helper_script() -> Result<PathBuf, CliError> {
    let path_var = env::var_os("PATH").unwrap_or_default();
    let executable = find_in_path("gcloud", &path_var).ok_or(CliError::GcloudNotFound)?;
    helper_script_from_executable(&executable).ok_or(CliError::GcloudNotFound)
}

/// Search a PATH-style variable for a file with the given name.
fn find_in_path(name: &str, path_var: &OsStr) -> Option<PathBuf> {
    env::split_paths(path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// The helper lives in the SDK's `lib/` directory, a sibling of `bin/`.
fn helper_script_from_executable(executable: &Path) -> Option<PathBuf> {
    let sdk_root = executable.parent()?.parent()?;
    Some(sdk_root.join("lib").join("gcloud.py"))
}

/// Login name of the current OS user, used when `-u` is not given.
pub fn login_name() -> Result<String, CliError> {
    env::var("USER")
        .or_else(|_| env::var("LOGNAME"))
        .ok()
        .filter(|name| !name.is_empty())
        .ok_or(CliError::NoLoginName)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn derives_helper_script_from_executable() {
        let helper =
            helper_script_from_executable(Path::new("/opt/google-cloud-sdk/bin/gcloud")).unwrap();
        assert_eq!(
            helper,
            PathBuf::from("/opt/google-cloud-sdk/lib/gcloud.py")
        );
    }

    #[test]
    fn finds_executable_on_path() {
        let dir = tempdir().unwrap();
        let bin_dir = dir.path().join("bin");
        std::fs::create_dir_all(&bin_dir).unwrap();
        File::create(bin_dir.join("gcloud")).unwrap();

        let path_var = env::join_paths([PathBuf::from("/nonexistent"), bin_dir.clone()]).unwrap();

        let found = find_in_path("gcloud", &path_var).unwrap();
        assert_eq!(found, bin_dir.join("gcloud"));
    }

    #[test]
    fn missing_executable_yields_none() {
        let dir = tempdir().unwrap();
        let path_var = env::join_paths([dir.path().to_path_buf()]).unwrap();
        assert!(find_in_path("gcloud", &path_var).is_none());
    }

    #[test]
    fn helper_path_sits_next_to_sdk_bin() {
        let dir = tempdir().unwrap();
        let bin_dir = dir.path().join("google-cloud-sdk").join("bin");
        std::fs::create_dir_all(&bin_dir).unwrap();
        File::create(bin_dir.join("gcloud")).unwrap();

        let path_var = env::join_paths([bin_dir.clone()]).unwrap();
        let executable = find_in_path("gcloud", &path_var).unwrap();
        let helper = helper_script_from_executable(&executable).unwrap();

        assert_eq!(
            helper,
            dir.path().join("google-cloud-sdk").join("lib").join("gcloud.py")
        );
    }
}
