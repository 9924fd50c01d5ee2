//! Stamps the binaries with LATESHOW_GIT_DESCRIBE and LATESHOW_BUILT_AT

use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    Some(text.trim().to_string()).filter(|text| !text.is_empty())
}

fn main() {
    let describe = git(&["describe", "--always", "--dirty", "--abbrev=8"])
        .unwrap_or_else(|| "untracked".to_string());
    let built_at = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");

    println!("cargo:rustc-env=LATESHOW_GIT_DESCRIBE={}", describe);
    println!("cargo:rustc-env=LATESHOW_BUILT_AT={}", built_at);
}
