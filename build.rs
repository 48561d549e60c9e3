fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    let version = env!("CARGO_PKG_VERSION");

    #[cfg(feature = "bin")]
    let full_version = format!(
        "{version} ({})",
        chrono::Utc::now().format("%Y-%m-%d")
    );
    #[cfg(not(feature = "bin"))]
    let full_version = version.to_string();

    println!("cargo:rustc-env=FULL_VERSION={full_version}");
}
