//! Implementation of the procedural macros exported by `smithy-macros`.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{parse_macro_input, Ident, ItemFn, LitStr};

const LEVELS: [&str; 5] = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];

/// Run a test with a `tracing` subscriber that prints through the test harness.
///
/// The maximum level defaults to `DEBUG` and can be set with a string argument.
///
/// # Example
/// ```rust,ignore
/// use smithy_macros::test_traced;
/// use tracing::{debug, info};
///
/// #[test_traced("INFO")]
/// fn test_info_level() {
///     info!("This is an info log");
///     debug!("This is a debug log (won't be shown)");
///     assert_eq!(2 + 2, 4);
/// }
/// ```
#[proc_macro_attribute]
pub fn test_traced(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    // Parse the level
    let level = if attr.is_empty() {
        "DEBUG".to_string()
    } else {
        let lit = parse_macro_input!(attr as LitStr);
        let level = lit.value().to_uppercase();
        if !LEVELS.contains(&level.as_str()) {
            return syn::Error::new(
                lit.span(),
                "level must be one of TRACE, DEBUG, INFO, WARN or ERROR",
            )
            .to_compile_error()
            .into();
        }
        level
    };
    let level = Ident::new(&level, Span::call_site());

    // Wrap the body with a subscriber that writes to the test output
    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = input;
    let expanded = quote! {
        #[test]
        #(#attrs)*
        #vis #sig {
            let _ = ::smithy_macros::tracing_subscriber::fmt()
                .with_test_writer()
                .with_max_level(::smithy_macros::tracing::Level::#level)
                .try_init();
            #block
        }
    };
    TokenStream::from(expanded)
}
