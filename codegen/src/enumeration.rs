use matches2::option_match;
use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::Parse;
use syn::punctuated::Punctuated;
use syn::{Error, Result};

use crate::util::{Attr, Named};

const INPUT_TYPE_ERROR: &str = "Enumeration can only be derived from fieldless enums";
const REPR_U128_ERROR: &str =
    "Enumeration ordinals are `i128`, so `#[repr(u128)]` is not supported";

pub(crate) fn derive(input: TokenStream) -> Result<TokenStream> {
    let input: syn::DeriveInput = syn::parse2(input)?;

    let mut args: Attr<ItemOpt> = Attr::default();
    for attr in &input.attrs {
        if attr.path().is_ident("fixmap") {
            let this_args: Attr<ItemOpt> = attr.parse_args()?;
            args.items.extend(this_args.items);
        }
    }

    let crate_name = args
        .find_one(|opt| option_match!(opt, ItemOpt::FixmapAs(_, crate_name) => crate_name))?
        .map_or_else(|| quote!(::fixmap), |(_, crate_name)| crate_name.clone());

    let item = match &input.data {
        syn::Data::Enum(item) => item,
        syn::Data::Struct(item) => {
            return Err(Error::new_spanned(item.struct_token, INPUT_TYPE_ERROR));
        }
        syn::Data::Union(item) => {
            return Err(Error::new_spanned(item.union_token, INPUT_TYPE_ERROR));
        }
    };

    for attr in &input.attrs {
        if attr.path().is_ident("repr") {
            let reprs = attr.parse_args_with(
                Punctuated::<syn::Meta, syn::Token![,]>::parse_terminated,
            )?;
            if let Some(repr) = reprs.iter().find(|repr| repr.path().is_ident("u128")) {
                return Err(Error::new_spanned(repr, REPR_U128_ERROR));
            }
        }
    }

    let mut variants = Vec::new();
    for variant in &item.variants {
        if !matches!(variant.fields, syn::Fields::Unit) {
            return Err(Error::new_spanned(&variant.fields, INPUT_TYPE_ERROR));
        }

        let variant_ident = &variant.ident;
        variants.push(quote!(Self::#variant_ident));
    }

    // `as` casts are not available on uninhabited enums.
    let ordinal = if variants.is_empty() { quote!(match self {}) } else { quote!(self as i128) };

    let input_ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let output = quote! {
        const _: () = {
            use #crate_name::determinant;

            impl #impl_generics determinant::Enumeration for #input_ident #ty_generics #where_clause {
                const VARIANTS: &'static [Self] = &[#(#variants),*];

                fn ordinal(self) -> i128 { #ordinal }
            }
        };
    };

    Ok(output)
}

enum ItemOpt {
    FixmapAs(syn::token::Paren, TokenStream),
}

impl Parse for Named<ItemOpt> {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let name = input.parse::<syn::Ident>()?;

        let value = match name.to_string().as_str() {
            "fixmap_as" => {
                let inner;
                let paren = syn::parenthesized!(inner in input);
                let args = inner.parse()?;
                ItemOpt::FixmapAs(paren, args)
            }
            _ => return Err(Error::new_spanned(&name, format!("Unknown argument `{}`", name))),
        };

        Ok(Named { name, value })
    }
}
