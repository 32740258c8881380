fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rustc-check-cfg=cfg(const_type_id)");
    // `TypeId::of` is const-stable since 1.91, but `TypeInfo::of` also calls
    // `type_name`, which is not yet stable as a const fn on any released
    // rustc (tried through 1.95). Leave the cfg declared but unset until
    // both are const-stable; bump this gate when `const_type_name` lands.
    let _ = version_check::is_min_version("1.91.0");
}
