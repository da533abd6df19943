//! Location of the editor's user snippet folder.

use std::env;
use std::path::{Path, PathBuf};

use crate::ExportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Linux,
    Windows,
}

impl Platform {
    #[cfg(target_os = "macos")]
    pub const NATIVE: Platform = Platform::MacOs;
    #[cfg(target_os = "windows")]
    pub const NATIVE: Platform = Platform::Windows;
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    pub const NATIVE: Platform = Platform::Linux;
}

/// Inputs for resolving the snippet folder.
///
/// `portable` is the editor's portable data path; the host only sets it when
/// that directory exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetDirectory {
    pub platform: Platform,
    pub home: Option<PathBuf>,
    pub app_data: Option<PathBuf>,
    pub portable: Option<PathBuf>,
}

impl SnippetDirectory {
    /// Read `HOME`, `APPDATA` and `VSCODE_PORTABLE` for the native platform.
    pub fn from_env() -> Self {
        let var = |name: &str| env::var_os(name).map(PathBuf::from);
        Self {
            platform: Platform::NATIVE,
            home: var("HOME"),
            app_data: var("APPDATA"),
            portable: var("VSCODE_PORTABLE"),
        }
    }

    /// The editor's per-user settings folder.
    pub fn user_directory(&self) -> Result<PathBuf, ExportError> {
        match self.platform {
            Platform::MacOs => Ok(required(&self.home, "HOME")?
                .join("Library")
                .join("Application Support")
                .join("Code")
                .join("User")),
            Platform::Linux => Ok(required(&self.home, "HOME")?
                .join(".config")
                .join("Code")
                .join("User")),
            Platform::Windows => Ok(required(&self.app_data, "APPDATA")?
                .join("Code")
                .join("User")),
        }
    }

    /// Folder the snippet file belongs in. A portable install wins.
    pub fn resolve(&self) -> Result<PathBuf, ExportError> {
        match &self.portable {
            Some(portable) => Ok(portable.join("user-data").join("User").join("snippets")),
            None => Ok(self.user_directory()?.join("snippets")),
        }
    }
}

fn required<'a>(
    path: &'a Option<PathBuf>,
    variable: &'static str,
) -> Result<&'a Path, ExportError> {
    path.as_deref()
        .ok_or(ExportError::MissingEnvironment(variable))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn directory(platform: Platform) -> SnippetDirectory {
        SnippetDirectory {
            platform,
            home: Some(PathBuf::from("/home/ada")),
            app_data: Some(PathBuf::from("C:/Users/ada/AppData/Roaming")),
            portable: None,
        }
    }

    #[test]
    fn test_linux_directory() {
        assert_eq!(
            directory(Platform::Linux).resolve().unwrap(),
            Path::new("/home/ada").join(".config").join("Code").join("User").join("snippets")
        );
    }

    #[test]
    fn test_macos_directory() {
        assert_eq!(
            directory(Platform::MacOs).resolve().unwrap(),
            Path::new("/home/ada")
                .join("Library")
                .join("Application Support")
                .join("Code")
                .join("User")
                .join("snippets")
        );
    }

    #[test]
    fn test_windows_directory_uses_app_data() {
        assert_eq!(
            directory(Platform::Windows).resolve().unwrap(),
            Path::new("C:/Users/ada/AppData/Roaming")
                .join("Code")
                .join("User")
                .join("snippets")
        );
    }

    #[test]
    fn test_portable_wins() {
        let mut dir = directory(Platform::Windows);
        dir.portable = Some(PathBuf::from("/opt/code/data"));
        assert_eq!(
            dir.resolve().unwrap(),
            Path::new("/opt/code/data").join("user-data").join("User").join("snippets")
        );
    }

    #[test]
    fn test_missing_home() {
        let mut dir = directory(Platform::Linux);
        dir.home = None;
        assert_eq!(dir.resolve(), Err(ExportError::MissingEnvironment("HOME")));
    }

    #[test]
    fn test_missing_app_data() {
        let mut dir = directory(Platform::Windows);
        dir.app_data = None;
        assert_eq!(dir.resolve(), Err(ExportError::MissingEnvironment("APPDATA")));
    }
}
