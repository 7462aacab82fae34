fn main() {
    // Rebuild when the checked-out commit changes
    if let Some(git_dir) = git_stdout(&["rev-parse", "--git-dir"]) {
        let git_path = std::path::Path::new(&git_dir);
        for entry in ["HEAD", "packed-refs", "refs/heads", "refs/tags"] {
            if git_path.join(entry).exists() {
                println!("cargo:rerun-if-changed={git_dir}/{entry}");
            }
        }
    }

    if let Some(git_info) = git_stdout(&["describe", "--always", "--tags", "--long", "--dirty"]) {
        println!("cargo:rustc-env=_GIT_INFO={git_info}");
    }
}

fn git_stdout(args: &[&str]) -> Option<String> {
    let output = std::process::Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    std::str::from_utf8(&output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
