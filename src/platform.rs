/// Asset name suffix for the current platform, fixed at compile time
pub fn asset_suffix() -> &'static str {
    #[cfg(all(target_os = "windows", target_arch = "x86_64"))]
    return "win-x64.zip";

    #[cfg(all(target_os = "windows", target_arch = "aarch64"))]
    return "win-arm64.zip";

    #[cfg(all(target_os = "linux", target_arch = "x86_64"))]
    return "linux-x64.tar.gz";

    #[cfg(all(target_os = "macos", target_arch = "aarch64"))]
    return "macos-arm64.tar.gz";

    #[cfg(not(any(
        all(target_os = "windows", target_arch = "x86_64"),
        all(target_os = "windows", target_arch = "aarch64"),
        all(target_os = "linux", target_arch = "x86_64"),
        all(target_os = "macos", target_arch = "aarch64")
    )))]
    return "unknown";
}
