//! Build script of the command line program.
//!
//! Records the Git revision that the binary is built from,
//! so that it can be shown by `--version`.

use std::env;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::str;


/// File in the $OUT_DIR where the current revision is written.
const REVISION_FILE: &'static str = "revision";


fn main() {
    // The revision goes through a file for include_str!(),
    // as there is no way to set env!() variables for the crate code from here.
    let out_dir = match env::var("OUT_DIR") {
        Ok(dir) => dir,
        Err(e) => {
            println!("cargo:warning=OUT_DIR not set: {}", e);
            return;
        }
    };
    let revision = git_head_sha().unwrap_or_else(|e| {
        println!("cargo:warning=Failed to obtain current Git SHA: {}", e);
        String::new()
    });

    let rev_path = Path::new(&out_dir).join(REVISION_FILE);
    if let Err(e) = fs::write(&rev_path, revision.as_bytes()) {
        println!("cargo:warning=Failed to write {}: {}", rev_path.display(), e);
    }
}

fn git_head_sha() -> Result<String, Box<dyn Error>> {
    let output = Command::new("git")
        .args(&["rev-parse", "--short", "HEAD"])
        .output()?;
    if !output.status.success() {
        return Err("not a Git repository".into());
    }
    let sha = str::from_utf8(&output.stdout[..])?.trim().to_owned();
    Ok(sha)
}
