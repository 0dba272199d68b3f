fn main() {
    // libpdfium.dylib ships in Contents/Frameworks (or next to the binary in dev builds)
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("macos") {
        println!("cargo:rustc-link-arg=-Wl,-rpath,@executable_path/../Frameworks");
        println!("cargo:rustc-link-arg=-Wl,-rpath,@executable_path");
    }

    println!("cargo:rerun-if-changed=build.rs");
}
