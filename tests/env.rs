use vinculum::env::{current_dir, environment_var};

#[test]
fn test_environment_var_reads_process_environment() {
    // Cargo sets this for every test binary.
    assert_eq!(environment_var("CARGO_PKG_NAME"), "vinculum");
}

#[test]
fn test_environment_var_unset_is_empty() {
    assert_eq!(environment_var("VINCULUM_TEST_SURELY_UNSET_VARIABLE"), "");
}

#[test]
fn test_current_dir_matches_std() {
    let dir = current_dir().unwrap();

    assert!(dir.is_absolute());
    assert_eq!(dir, std::env::current_dir().unwrap());
}
