use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Kind {
    Plain,
    Persistent,
    Regulator,
}

/// Options collected from `#[singleton(...)]` attributes.
struct Options {
    kind: Kind,
    destroy_duplicates: bool,
    keep_parent: bool,
}

pub fn derive_singleton(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    match expand(&ast) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(ast: &DeriveInput) -> syn::Result<TokenStream2> {
    let options = parse_options(ast)?;

    let struct_name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let mut policy = match options.kind {
        Kind::Plain => quote!(::rusty_singletons::Policy::SINGLETON),
        Kind::Persistent => quote!(::rusty_singletons::Policy::PERSISTENT),
        Kind::Regulator => quote!(::rusty_singletons::Policy::REGULATOR),
    };
    if options.destroy_duplicates {
        policy = quote!(#policy.with_duplicates(::rusty_singletons::Duplicates::Destroy));
    }

    let unparent = options.keep_parent.then(|| {
        quote! {
            fn auto_unparent_on_awake(&self) -> bool {
                false
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::rusty_singletons::Singleton
            for #struct_name #ty_generics #where_clause
        {
            const POLICY: ::rusty_singletons::Policy = #policy;
            #unparent
        }
    })
}

fn parse_options(ast: &DeriveInput) -> syn::Result<Options> {
    let mut kind = None;
    let mut destroy_duplicates = false;
    let mut keep_parent = false;

    for attr in ast.attrs.iter().filter(|attr| attr.path().is_ident("singleton")) {
        attr.parse_nested_meta(|meta| {
            let selected = if meta.path.is_ident("persistent") {
                Kind::Persistent
            } else if meta.path.is_ident("regulator") {
                Kind::Regulator
            } else if meta.path.is_ident("destroy_duplicates") {
                destroy_duplicates = true;
                return Ok(());
            } else if meta.path.is_ident("keep_parent") {
                keep_parent = true;
                return Ok(());
            } else {
                return Err(meta.error(concat!(
                    "expected one of `persistent`, `regulator`, ",
                    "`destroy_duplicates`, `keep_parent`",
                )));
            };

            if kind.replace(selected).is_some() {
                return Err(meta.error("singleton kind specified more than once"));
            }
            Ok(())
        })?;
    }

    let kind = kind.unwrap_or(Kind::Plain);
    if kind != Kind::Persistent && (destroy_duplicates || keep_parent) {
        return Err(syn::Error::new_spanned(
            &ast.ident,
            "`destroy_duplicates` and `keep_parent` only apply to `#[singleton(persistent)]`",
        ));
    }

    Ok(Options {
        kind,
        destroy_duplicates,
        keep_parent,
    })
}
