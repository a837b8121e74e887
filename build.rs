use std::env;
use std::path::PathBuf;

// Only the `ffmpeg` feature links against FFmpeg; the default build shells
// out to ffprobe at runtime and needs nothing here.
fn main() {
    println!("cargo:rerun-if-env-changed=FFMPEG_DIR");
    println!("cargo:rerun-if-env-changed=VCPKG_ROOT");
    println!("cargo:rerun-if-env-changed=VCPKGRS_TRIPLET");

    if env::var_os("CARGO_FEATURE_FFMPEG").is_none() {
        return;
    }
    if env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("windows") {
        return;
    }
    if env::var_os("FFMPEG_DIR").is_some() {
        return;
    }

    let Ok(vcpkg_root) = env::var("VCPKG_ROOT") else {
        println!(
            "cargo:warning=The `ffmpeg` feature needs FFmpeg development libraries. On Windows, install them via vcpkg and set FFMPEG_DIR."
        );
        return;
    };

    let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| "x64-windows".to_string());
    let candidate = PathBuf::from(vcpkg_root).join("installed").join(triplet);
    if candidate.exists() {
        println!(
            "cargo:warning=Found vcpkg FFmpeg at {}; set FFMPEG_DIR to it if ffmpeg-sys-next cannot locate the libraries.",
            candidate.display()
        );
    } else {
        println!(
            "cargo:warning=VCPKG_ROOT is set but {} does not exist.",
            candidate.display()
        );
    }
}
