//! Locates a Chromium-family executable on the host.

use std::path::{Path, PathBuf};

use pommel_core::error::{PommelError, Result};

/// Environment variable naming an explicit browser executable.
pub const BROWSER_PATH_VAR: &str = "POMMEL_BROWSER_PATH";

/// Executable names probed on `PATH`, most specific first.
const PATH_NAMES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "chrome",
    "msedge",
    "brave",
];

pub struct BrowserFinder {
    custom_path: Option<PathBuf>,
}

impl BrowserFinder {
    pub fn new(custom_path: Option<PathBuf>) -> Self {
        Self { custom_path }
    }

    /// Finder honoring `POMMEL_BROWSER_PATH` when set.
    pub fn from_env() -> Self {
        Self::new(std::env::var_os(BROWSER_PATH_VAR).map(PathBuf::from))
    }

    /// Find a usable executable: custom path first, then platform install
    /// locations, then `PATH`.
    pub fn find(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.custom_path {
            return validate(path);
        }

        for path in Self::default_locations() {
            if let Ok(valid) = validate(&path) {
                return Ok(valid);
            }
        }

        if let Some(found) = search_path() {
            return Ok(found);
        }

        Err(PommelError::BrowserLaunch(format!(
            "no chromium executable found (checked: {}). Set {BROWSER_PATH_VAR}, or attach to a running browser with --cdp-endpoint",
            Self::default_locations()
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }

    fn default_locations() -> Vec<PathBuf> {
        #[cfg(target_os = "macos")]
        return vec![
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
            PathBuf::from("/Applications/Chromium.app/Contents/MacOS/Chromium"),
            PathBuf::from("/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge"),
        ];

        #[cfg(target_os = "linux")]
        return vec![
            PathBuf::from("/usr/bin/google-chrome"),
            PathBuf::from("/usr/bin/google-chrome-stable"),
            PathBuf::from("/usr/bin/chromium"),
            PathBuf::from("/usr/bin/chromium-browser"),
            PathBuf::from("/snap/bin/chromium"),
        ];

        #[cfg(target_os = "windows")]
        return vec![
            PathBuf::from(r"C:\Program Files\Google\Chrome\Application\chrome.exe"),
            PathBuf::from(r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe"),
            PathBuf::from(r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe"),
        ];

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        return vec![];
    }
}

fn search_path() -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path_var) {
        for name in PATH_NAMES {
            let candidate = dir.join(name);
            if validate(&candidate).is_ok() {
                return Some(candidate);
            }
        }
    }
    None
}

/// A candidate must exist and, on unix, carry an execute bit.
fn validate(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(PommelError::BrowserLaunch(format!(
            "browser not found at: {}",
            path.display()
        )));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let metadata = std::fs::metadata(path)?;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(PommelError::BrowserLaunch(format!(
                "browser binary is not executable: {}",
                path.display()
            )));
        }
    }

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_path_is_honored_when_executable() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let finder = BrowserFinder::new(Some(path.clone()));
        assert_eq!(finder.find().unwrap(), path);
    }

    #[test]
    fn missing_custom_path_is_rejected() {
        let finder = BrowserFinder::new(Some(PathBuf::from("/nonexistent/chromium")));
        let err = finder.find().unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_custom_path_is_rejected() {
        use std::os::unix::fs::PermissionsExt;
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o644)).unwrap();

        let finder = BrowserFinder::new(Some(file.path().to_path_buf()));
        let err = finder.find().unwrap_err();
        assert!(err.to_string().contains("not executable"));
    }
}
