/// Get the version string for imagetag and libimagetag
pub fn get_version_string() -> String {
    format!(
        "imagetag {}\nlibimagetag {}",
        env!("CARGO_PKG_VERSION"),
        libimagetag::version()
    )
}

/// Print version information to stdout
pub fn print_version() {
    println!("{}", get_version_string());
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;
