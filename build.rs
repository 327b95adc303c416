//! Build script for proto compilation.
//!
//! Generates the provider protocol types from `proto/provider.proto` into
//! `src/generated.rs` on every build. The generated file is not committed.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = std::path::PathBuf::from("src");
    tonic_prost_build::configure()
        .out_dir(&out_dir)
        .compile_protos(&["proto/provider.proto"], &["proto"])?;

    // tonic names the output after the proto package
    let generated = out_dir.join("hemmer.provider.v1.rs");
    let target = out_dir.join("generated.rs");
    if generated.exists() {
        std::fs::rename(generated, target)?;
    }

    println!("cargo:rerun-if-changed=proto/provider.proto");

    Ok(())
}
