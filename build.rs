use std::env;
use std::process::Command;

fn main() {
    for var in ["RAINSTORM_BUILD", "CARGO_ENCODED_RUSTFLAGS", "GITHUB_SHA"] {
        println!("cargo:rerun-if-env-changed={}", var);
    }

    let build_id = env::var("RAINSTORM_BUILD")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(target_label);
    println!("cargo:rustc-env=RAINSTORM_BUILD={}", build_id);

    let sha = head_sha()
        .or_else(|| env::var("GITHUB_SHA").ok().and_then(|v| short_hex(&v)))
        .unwrap_or_default();
    println!("cargo:rustc-env=RAINSTORM_GIT_SHA={}", sha);
}

fn short_hex(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let short = &raw[..raw.len().min(7)];
    if short.is_empty() || !short.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(short.to_ascii_lowercase())
}

fn head_sha() -> Option<String> {
    let out = Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    short_hex(&String::from_utf8(out.stdout).ok()?)
}

// os-arch, plus the x86-64 microarchitecture level on linux.
fn target_label() -> String {
    let os = match env::var("CARGO_CFG_TARGET_OS").as_deref() {
        Ok("macos") => "darwin".to_string(),
        Ok(other) => other.to_string(),
        Err(_) => "unknown".to_string(),
    };
    let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_else(|_| "unknown".to_string());
    let features = env::var("CARGO_CFG_TARGET_FEATURE").unwrap_or_default();

    if arch != "x86_64" {
        return format!("{os}-{arch}-native");
    }
    if os != "linux" {
        return format!("{os}-{arch}");
    }
    let level = if features.contains("avx512f") {
        "v4"
    } else if features.contains("avx2") {
        "v3"
    } else if features.contains("sse4.2") {
        "v2"
    } else {
        "v1"
    };
    format!("{os}-{arch}-{level}")
}
