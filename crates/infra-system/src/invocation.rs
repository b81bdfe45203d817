// Cross-platform PM2 invocation
//
// PM2 ships as a `.cmd` shim on Windows, which CreateProcess cannot start
// directly, so it is routed through `cmd /C`. Everywhere else the binary is
// executed directly with an argument vector; no shell string is ever built.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Target platform family for command construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}

/// Program and arguments ready for `Command::new(program).args(args)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn build(platform: Platform, pm2_bin: &str, args: &[String]) -> Self {
        match platform {
            Platform::Unix => Self {
                program: pm2_bin.to_string(),
                args: args.to_vec(),
            },
            Platform::Windows => {
                let mut full = Vec::with_capacity(args.len() + 2);
                full.push("/C".to_string());
                full.push(pm2_bin.to_string());
                full.extend_from_slice(args);
                Self {
                    program: "cmd".to_string(),
                    args: full,
                }
            }
        }
    }
}

/// Resolve the pm2 executable
///
/// A value containing a path separator is checked as-is. A bare name is
/// searched in `path_var`; on Windows each `PATHEXT` suffix is tried as well.
pub fn locate(
    platform: Platform,
    pm2_bin: &str,
    path_var: Option<OsString>,
    pathext: Option<OsString>,
) -> Option<PathBuf> {
    let candidate = Path::new(pm2_bin);
    if candidate.components().count() > 1 || candidate.is_absolute() {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let extensions: Vec<String> = match platform {
        Platform::Unix => vec![String::new()],
        Platform::Windows => {
            let mut exts = vec![String::new()];
            let pathext = pathext
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_else(|| ".COM;.EXE;.BAT;.CMD".to_string());
            exts.extend(
                pathext
                    .split(';')
                    .filter(|e| !e.is_empty())
                    .map(str::to_string),
            );
            exts
        }
    };

    let path_var = path_var?;
    std::env::split_paths(&path_var).find_map(|dir| {
        extensions.iter().find_map(|ext| {
            let full = dir.join(format!("{}{}", pm2_bin, ext));
            is_executable(&full).then_some(full)
        })
    })
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unix_invocation_is_direct() {
        let inv = Invocation::build(Platform::Unix, "pm2", &args(&["start", "my app.js"]));
        assert_eq!(inv.program, "pm2");
        assert_eq!(inv.args, args(&["start", "my app.js"]));
    }

    #[test]
    fn test_windows_invocation_goes_through_cmd() {
        let inv = Invocation::build(Platform::Windows, "pm2", &args(&["jlist"]));
        assert_eq!(inv.program, "cmd");
        assert_eq!(inv.args, args(&["/C", "pm2", "jlist"]));
    }

    #[test]
    fn test_locate_missing_binary() {
        let dir = tempfile::tempdir().unwrap();
        let path_var = std::env::join_paths([dir.path()]).unwrap();
        assert!(locate(Platform::current(), "pm2", Some(path_var), None).is_none());
        assert!(locate(Platform::current(), "pm2", None, None).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_locate_on_path_and_explicit() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("pm2");
        std::fs::write(&bin, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();

        let path_var = std::env::join_paths([dir.path()]).unwrap();
        assert_eq!(
            locate(Platform::Unix, "pm2", Some(path_var), None),
            Some(bin.clone())
        );
        assert_eq!(
            locate(Platform::Unix, bin.to_str().unwrap(), None, None),
            Some(bin.clone())
        );

        std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert!(locate(Platform::Unix, bin.to_str().unwrap(), None, None).is_none());
    }

    #[test]
    fn test_locate_windows_pathext() {
        let dir = tempfile::tempdir().unwrap();
        let shim = dir.path().join("pm2.CMD");
        std::fs::write(&shim, "@echo off\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&shim, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let path_var = std::env::join_paths([dir.path()]).unwrap();
        assert_eq!(
            locate(
                Platform::Windows,
                "pm2",
                Some(path_var),
                Some(OsString::from(".EXE;.CMD"))
            ),
            Some(shim)
        );
    }
}
