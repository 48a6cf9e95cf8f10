// SPDX-License-Identifier: GPL-3.0-only

use std::process::Command;

const VERSION_OVERRIDE: &str = "ROTISSOMAT_VERSION";

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/tags");
    println!("cargo::rerun-if-env-changed={VERSION_OVERRIDE}");

    // Packaged builds (flatpak, distro) have no .git and pass the version in
    let version = std::env::var(VERSION_OVERRIDE).unwrap_or_else(|_| describe_version());

    println!("cargo::rustc-env=GIT_VERSION={version}");
}

/// Version string shown in the About drawer.
///
/// `v0.2.0` at a tag becomes `0.2.0-<hash>`, `v0.2.0-3-gabc1234` becomes
/// `0.2.0-dirty-abc1234`, and without tags the short hash or the crate
/// version is used.
fn describe_version() -> String {
    let hash = git(&["rev-parse", "--short", "HEAD"]);

    let Some(described) = git(&["describe", "--tags", "--always", "--match", "v*"]) else {
        return hash.unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
    };
    let described = described.strip_prefix('v').unwrap_or(&described);

    let parts: Vec<&str> = described.rsplitn(3, '-').collect();
    match parts.as_slice() {
        [commit, _ahead, base] => {
            let commit = commit.strip_prefix('g').unwrap_or(commit);
            format!("{base}-dirty-{commit}")
        }
        _ if hash.as_deref() == Some(described) => described.to_string(),
        _ => format!("{}-{}", described, hash.as_deref().unwrap_or("unknown")),
    }
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}
