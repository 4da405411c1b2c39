#[test]
fn version_is_the_package_version() {
    assert_eq!(tapir::VERSION, env!("CARGO_PKG_VERSION"));
    assert_eq!(tapir::graph::NodeId::new(3).to_string(), "n3");
}
