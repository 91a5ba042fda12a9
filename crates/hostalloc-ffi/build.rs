use std::env;
use std::path::PathBuf;

fn main() {
    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    // hostalloc-ffi -> hostalloc.h
    let package = env::var("CARGO_PKG_NAME").unwrap();
    let header = format!("{}.h", package.trim_end_matches("-ffi"));

    println!("cargo:rerun-if-changed=cbindgen.toml");
    println!("cargo:rerun-if-changed=src");

    let config = cbindgen::Config::from_file(crate_dir.join("cbindgen.toml"))
        .expect("cbindgen.toml must parse");

    let include_dir = crate_dir.join("include");
    std::fs::create_dir_all(&include_dir).expect("cannot create include/");

    let bindings = match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => bindings,
        Err(e) => panic!("cannot generate {header}: {e}"),
    };
    bindings.write_to_file(include_dir.join(&header));
}
