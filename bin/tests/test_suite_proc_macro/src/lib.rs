use std::{ffi::OsStr, path::Path};

use quote::{format_ident, quote};
use syn::{parse_macro_input, LitStr};

/// Expands to one `#[test]` per file with the given extension found below `bin/tests`.
/// Each test calls `expect_file(path)`, which has to be in scope at the call site.
#[proc_macro]
pub fn generate_tests(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let extension = parse_macro_input!(input as LitStr).value();
    let root_dir = format!("{}/..", env!("CARGO_MANIFEST_DIR"));

    let mut paths = walkdir::WalkDir::new(&root_dir)
        .into_iter()
        .flatten()
        .map(|entry| entry.into_path())
        .filter(|path| path.extension() == Some(OsStr::new(&extension)))
        .collect::<Vec<_>>();
    paths.sort();

    let tests = paths.iter().map(|path| {
        let test_file_path = path.to_string_lossy();
        let test_ident = format_ident!("test_{}", test_name(path, Path::new(&root_dir)));
        quote! {
            #[test]
            fn #test_ident() {
                expect_file(#test_file_path);
            }
        }
    });

    quote! {
        #[ctor::ctor]
        fn init() {
            let _ = env_logger::builder().is_test(true).try_init();
        }

        #(#tests)*
    }
    .into()
}

fn test_name(path: &Path, root_dir: &Path) -> String {
    path.strip_prefix(root_dir)
        .unwrap_or(path)
        .with_extension("")
        .to_string_lossy()
        .replace(&['/', '\\', '-', '.'][..], "_")
}
