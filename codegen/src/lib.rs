use proc_macro::TokenStream;

mod enumeration;
mod util;

#[proc_macro_derive(Enumeration, attributes(fixmap))]
pub fn enumeration(input: TokenStream) -> TokenStream {
    enumeration::derive(input.into()).unwrap_or_else(|err| err.to_compile_error()).into()
}
