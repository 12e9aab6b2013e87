//! Shared test utilities for integration tests
//!
//! Provides a small C++ project fixture written in the declaration
//! shorthand, used across multiple test files.

use assert_fs::prelude::*;

/// Header written in shorthand declarations.
pub const LISP_HPP: &str = "\
class Value {
public:
    init(tag: int, data: void*);
    func tag(): int;
    static var count: size_t;
};
";

/// Source written in shorthand declarations.
pub const LISP_CPP: &str = "\
var registry: Registry(64);
func eval(expr: Value, env: Value): Value;

Value eval(Value expr, Value env) {
    let result = expr;
    var depth = 0;
    return result;
}
";

/// Create a temp project with one header, one source and a stray file.
pub fn make_lisp_fixture() -> assert_fs::TempDir
{
    // Initialize the temporary project root
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    tmp.child("src/lisp.hpp")
        .write_str(LISP_HPP)
        .expect("write lisp.hpp");

    tmp.child("src/lisp.cpp")
        .write_str(LISP_CPP)
        .expect("write lisp.cpp");

    // Not a C/C++ file; must be skipped and never read
    tmp.child("make_lib.py")
        .write_str("print('not bundled')\n")
        .expect("write make_lib.py");

    // Return the prepared directory to the caller
    tmp
}
