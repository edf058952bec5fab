use errors::{Diagnostic, Diagnostics};
use interpreter::{run_source, InterpretError};
use itertools::Itertools;
use lazy_regex::regex;
use test_suite_proc_macro::generate_tests;

use pretty_assertions::assert_eq;

#[derive(Debug, Default)]
struct Expectations {
    value: Option<String>,
    compile_errors: Vec<String>,
    runtime_error: Option<(usize, String)>,
}

/// Collects the `// expect: ...`, `// Error...` and `// runtime error: ...` comments of a unit.
///
/// Compile errors are attributed to the line of the comment unless it names a line itself, as in
/// `// [line 2] Error at end: ...`.
fn expectations(code: &str) -> Expectations {
    let compile_error_regex = regex!(r"// (\[line (\d+)\] )?(Error( at '.*'| at end)?: .*)");
    let runtime_error_regex = regex!(r"// runtime error: (.*)");
    let value_regex = regex!(r"// expect: (.*)");

    let mut expected = Expectations::default();
    for (i, line) in code.lines().enumerate() {
        if let Some(cap) = runtime_error_regex.captures(line) {
            assert!(expected.runtime_error.is_none(), "Only one runtime error per unit");
            expected.runtime_error = Some((i + 1, cap[1].to_string()));
        } else if let Some(cap) = compile_error_regex.captures(line) {
            let line = cap.get(2).map_or((i + 1).to_string(), |l| l.as_str().to_string());
            expected.compile_errors.push(format!("[line {}] {}", line, &cap[3]));
        } else if let Some(cap) = value_regex.captures(line) {
            assert!(expected.value.is_none(), "Only one value per unit");
            expected.value = Some(cap[1].to_string());
        }
    }
    expected
}

pub fn rlang_expect(code: &str) {
    let expected = expectations(code);
    let mut diagnostics = Diagnostics::default();

    match run_source(code, &mut diagnostics) {
        Ok(value) => {
            assert!(expected.compile_errors.is_empty(), "Expected compile errors but none occurred");
            assert!(expected.runtime_error.is_none(), "Expected runtime error but none occurred");
            assert!(diagnostics.is_empty());
            assert_eq!(Some(value.to_string()), expected.value);
        }
        Err(InterpretError::CompileError(errors)) => {
            assert!(expected.value.is_none(), "Unexpected compile errors:\n{errors}");
            assert!(expected.runtime_error.is_none());

            assert_eq!(errors.to_string(), expected.compile_errors.iter().join("\n"));
            assert_eq!(diagnostics, errors);
        }
        Err(InterpretError::RuntimeError(runtime_error)) => {
            assert!(expected.value.is_none(), "Unexpected runtime error: {runtime_error}");
            assert!(expected.compile_errors.is_empty());

            let (line, message) = expected.runtime_error.expect("Unexpected runtime error");
            assert_eq!((runtime_error.line.0, runtime_error.to_string()), (line, message));
            assert_eq!(diagnostics, Diagnostics::from(Diagnostic::from(runtime_error)));
        }
    }
}

fn expect_file(path: &str) {
    rlang_expect(&std::fs::read_to_string(path).unwrap());
}

generate_tests!("rlang");
