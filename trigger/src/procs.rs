use anyhow::Context;

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::SystemTime;

/// Points at the window binary, taking precedence over everything else.
pub const APP_PATH_ENV: &str = "WORD_LOOKUP_APP";

const APP_BIN: &str = "word-lookup";
// Name of the cargo-built binary when running from a checkout.
const APP_BIN_DEV: &str = "ui-gtk";

// Plain install locations checked besides `PATH`.
const SYSTEM_DIRS: &[&str] = &["/usr/bin", "/usr/local/bin"];

fn exe_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(Path::to_path_buf)
}

/// `target/debug` or `target/release` of a cargo checkout.
fn is_cargo_target(dir: &Path) -> bool {
    dir.ends_with("target/debug") || dir.ends_with("target/release")
}

/// First of `names` present in `dir`, in the order given.
fn first_in(dir: &Path, names: &[&str]) -> Option<PathBuf> {
    names.iter().map(|n| dir.join(n)).find(|p| p.is_file())
}

/// Every existing file called one of `names` in `home`, the system dirs, or on `PATH`.
fn candidates(names: &[&str], home: Option<&Path>) -> Vec<PathBuf> {
    let dirs: Vec<PathBuf> = home
        .map(Path::to_path_buf)
        .into_iter()
        .chain(SYSTEM_DIRS.iter().map(PathBuf::from))
        .collect();

    let mut found: Vec<PathBuf> = names
        .iter()
        .flat_map(|n| dirs.iter().map(move |d| d.join(n)))
        .filter(|p| p.is_file())
        .collect();
    found.extend(names.iter().filter_map(|n| which::which(n).ok()));
    found.sort();
    found.dedup();
    found
}

/// Most recently modified path; files without a readable mtime rank oldest.
fn newest(paths: Vec<PathBuf>) -> Option<PathBuf> {
    paths.into_iter().max_by_key(|p| {
        std::fs::metadata(p)
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH)
    })
}

fn search_app_binary() -> PathBuf {
    let names = [APP_BIN, APP_BIN_DEV];
    let home = exe_dir();

    // A fresh `cargo build` must beat whatever is installed.
    if let Some(dir) = home.as_deref().filter(|d| is_cargo_target(d)) {
        if let Some(p) = first_in(dir, &names) {
            return p;
        }
    }

    match newest(candidates(&names, home.as_deref())) {
        Some(p) => p,
        None => {
            log::debug!("{} not found, relying on the spawn-time lookup", APP_BIN);
            PathBuf::from(APP_BIN)
        }
    }
}

/// Path of the window binary to start.
///
/// `WORD_LOOKUP_APP`, then the configured path, each only if it exists;
/// otherwise the usual search.
pub fn resolve_app_binary(configured: Option<&Path>) -> PathBuf {
    let from_env = std::env::var_os(APP_PATH_ENV).map(PathBuf::from);
    for candidate in from_env.into_iter().chain(configured.map(Path::to_path_buf)) {
        if candidate.exists() {
            return candidate;
        }
        log::warn!("app binary {} does not exist, searching", candidate.display());
    }
    search_app_binary()
}

/// Start `bin` without waiting for it and without tying it to our terminal.
pub fn spawn_detached(bin: &Path) -> anyhow::Result<()> {
    let mut cmd = Command::new(bin);
    cmd.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());

    // Own process group: a Ctrl-C aimed at the launcher must not reach the window.
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    let child = cmd.spawn().with_context(|| format!("spawn {}", bin.display()))?;
    log::info!("started {} (pid {})", bin.display(), child.id());
    Ok(())
}
