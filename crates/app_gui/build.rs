use std::env;

fn main() {
    let version =
        env::var("LANDCOVER_VERSION").unwrap_or_else(|_| env::var("CARGO_PKG_VERSION").unwrap());
    println!("cargo:rerun-if-env-changed=LANDCOVER_VERSION");
    println!("cargo:rustc-env=LANDCOVER_VERSION={version}");
}
