//! Test attribute shared by the `rxsingle` unit and integration tests.
//!
//! `#[rxsingle_macro::test]` expands to `#[test]` for sync functions and to
//! `#[tokio::test]` for async ones, and to `wasm_bindgen_test` on wasm32.
//! Async tests may pick a runtime flavor: `#[rxsingle_macro::test(threaded)]`
//! runs the body on a multi-thread runtime, which the blocking completion
//! tests need so a producer task can make progress while the test waits.
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, Ident, ItemFn, LitStr};

const USAGE: &str = "rxsingle_macro::test accepts no argument, `current` or `threaded`";

fn flavor_of(name: &str, span: proc_macro2::Span) -> Result<proc_macro2::TokenStream, syn::Error> {
  match name {
    "current" => Ok(quote!(flavor = "current_thread")),
    "threaded" => Ok(quote!(flavor = "multi_thread", worker_threads = 2)),
    _ => Err(syn::Error::new(span, USAGE)),
  }
}

#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
  let input = parse_macro_input!(item as ItemFn);
  let is_async = input.sig.asyncness.is_some();
  let raw_args = proc_macro2::TokenStream::from(attr);

  let tokio_args = if raw_args.is_empty() {
    proc_macro2::TokenStream::new()
  } else if !is_async {
    return syn::Error::new(raw_args.span(), "runtime flavors only apply to async tests")
      .to_compile_error()
      .into();
  } else {
    let parsed = if let Ok(ident) = syn::parse2::<Ident>(raw_args.clone()) {
      flavor_of(&ident.to_string(), ident.span())
    } else if let Ok(lit) = syn::parse2::<LitStr>(raw_args.clone()) {
      flavor_of(&lit.value(), lit.span())
    } else {
      Err(syn::Error::new(raw_args.span(), USAGE))
    };
    match parsed {
      Ok(args) => args,
      Err(err) => return err.to_compile_error().into(),
    }
  };

  let wasm_attr = if is_async {
    quote!(wasm_bindgen_test::wasm_bindgen_test(async))
  } else {
    quote!(wasm_bindgen_test::wasm_bindgen_test)
  };
  let native_attr = if is_async { quote!(tokio::test(#tokio_args)) } else { quote!(test) };

  quote! {
    #[cfg_attr(target_arch = "wasm32", #wasm_attr)]
    #[cfg_attr(not(target_arch = "wasm32"), #native_attr)]
    #input
  }
  .into()
}
