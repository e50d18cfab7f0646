/// Builds the gRPC client and server code for `routeguide.proto` using
/// `tonic-prost-build`.
///
/// The generated module is exposed as `routeguide_tonic_core::proto` and the
/// encoded file descriptor set is written next to it so the server can
/// register it with the reflection service.
///
/// # Panics
///
/// Panics if code generation fails. Build scripts have no better channel to
/// report the failure.
use std::env;
use std::path::PathBuf;

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let descriptor_path = out_dir.join("routeguide_descriptor.bin");

    let mut config = tonic_prost_build::Config::new();
    config.file_descriptor_set_path(&descriptor_path);

    tonic_prost_build::configure()
        .compile_with_config(config, &["proto/routeguide.proto"], &["proto"])
        .unwrap();
}
