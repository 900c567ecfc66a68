//! Compile tests for the Model derive

#[test]
fn ui() {
    let t = trybuild::TestCases::new();

    t.pass("tests/ui/pass_basic.rs");
    t.pass("tests/ui/pass_relationships.rs");
    t.pass("tests/ui/pass_attributes.rs");
}
