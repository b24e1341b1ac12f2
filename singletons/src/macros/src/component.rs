use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

pub fn derive_component(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let struct_name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    // `::rusty_singletons` resolves inside the crate through `extern crate self as
    // rusty_singletons;` in lib.rs, and to the dependency everywhere else.
    TokenStream::from(quote! {
        impl #impl_generics ::rusty_singletons::Component
            for #struct_name #ty_generics #where_clause
        {
        }
    })
}
