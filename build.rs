fn main() {
    // Embeds package and git metadata for `fgmerge --version`
    built::write_built_file().expect("Failed to acquire build-time information");
    println!("cargo:rerun-if-changed=build.rs");
}
