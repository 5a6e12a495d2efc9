//! Derive macros for fmbt model states.
//!
//! This crate provides `#[derive(State)]`, which implements the canonical
//! state rendering from the fields of a type.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Fields};

/// Derive macro implementing `fmbt::State`.
///
/// Fields are rendered with their `Debug` representation:
///
/// - structs with named fields as `{playing:false,song:1}`
/// - tuple structs as `Name(1,2)`
/// - unit structs and unit variants as their name
/// - enum variants with fields like structs, prefixed by the variant name,
///   e.g. `Playing{song:2}` or `Paused(2)`
///
/// The type must also implement `Clone`. Fields must render
/// deterministically, so avoid `HashMap` and other unordered collections.
///
/// # Example
///
/// ```rust,ignore
/// use fmbt::*;
///
/// #[derive(State, Clone)]
/// struct PlayerState {
///     playing: bool,
///     song: u32,
/// }
///
/// let state = PlayerState { playing: false, song: 1 };
/// assert_eq!(state.render(), "{playing:false,song:1}");
/// ```
#[proc_macro_derive(State)]
pub fn derive_state(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match state_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Generate the implementation of the State trait.
fn state_impl(input: &DeriveInput) -> Result<TokenStream2, syn::Error> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let render_body = match &input.data {
        Data::Struct(data) => struct_render(name, data),
        Data::Enum(data) => enum_render(data),
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "State derive macro does not support unions",
            ));
        }
    };

    let expanded = quote! {
        impl #impl_generics ::fmbt::State for #name #ty_generics #where_clause {
            fn render(&self) -> ::std::string::String {
                #render_body
            }
        }
    };

    Ok(expanded)
}

/// Render a struct by reading its fields through `self`.
fn struct_render(name: &syn::Ident, data: &syn::DataStruct) -> TokenStream2 {
    match &data.fields {
        Fields::Named(fields) => {
            let bindings: Vec<_> = fields
                .named
                .iter()
                .filter_map(|field| field.ident.clone())
                .map(|ident| (ident.to_string(), quote! { &self.#ident }))
                .collect();
            named_fields_render(quote! { "" }, &bindings)
        }
        Fields::Unnamed(fields) => {
            let values: Vec<_> = (0..fields.unnamed.len())
                .map(syn::Index::from)
                .map(|index| quote! { &self.#index })
                .collect();
            tuple_fields_render(&name.to_string(), &values)
        }
        Fields::Unit => {
            let label = name.to_string();
            quote! { ::std::string::String::from(#label) }
        }
    }
}

/// Render an enum by matching on its variants.
fn enum_render(data: &syn::DataEnum) -> TokenStream2 {
    let arms = data.variants.iter().map(|variant| {
        let variant_name = &variant.ident;
        let label = variant_name.to_string();

        match &variant.fields {
            Fields::Named(fields) => {
                let idents: Vec<_> = fields
                    .named
                    .iter()
                    .filter_map(|field| field.ident.clone())
                    .collect();
                let bindings: Vec<_> = idents
                    .iter()
                    .map(|ident| (ident.to_string(), quote! { #ident }))
                    .collect();
                let body = named_fields_render(quote! { #label }, &bindings);
                quote! {
                    Self::#variant_name { #(#idents),* } => { #body }
                }
            }
            Fields::Unnamed(fields) => {
                let vars: Vec<_> = (0..fields.unnamed.len())
                    .map(|i| format_ident!("field_{}", i))
                    .collect();
                let values: Vec<_> = vars.iter().map(|var| quote! { #var }).collect();
                let body = tuple_fields_render(&label, &values);
                quote! {
                    Self::#variant_name(#(#vars),*) => { #body }
                }
            }
            Fields::Unit => quote! {
                Self::#variant_name => ::std::string::String::from(#label)
            },
        }
    });

    quote! {
        match self {
            #(#arms),*
        }
    }
}

/// `prefix{a:..,b:..}` from (field name, field reference) pairs.
fn named_fields_render(prefix: TokenStream2, fields: &[(String, TokenStream2)]) -> TokenStream2 {
    let pushes = fields.iter().enumerate().map(|(i, (field_name, value))| {
        let label = if i == 0 {
            format!("{field_name}:")
        } else {
            format!(",{field_name}:")
        };
        quote! {
            rendered.push_str(#label);
            rendered.push_str(&::std::format!("{:?}", #value));
        }
    });

    quote! {
        let mut rendered = ::std::string::String::from(#prefix);
        rendered.push('{');
        #(#pushes)*
        rendered.push('}');
        rendered
    }
}

/// `Name(..,..)` from field references.
fn tuple_fields_render(name: &str, values: &[TokenStream2]) -> TokenStream2 {
    let pushes = values.iter().enumerate().map(|(i, value)| {
        let separator = if i == 0 { "" } else { "," };
        quote! {
            rendered.push_str(#separator);
            rendered.push_str(&::std::format!("{:?}", #value));
        }
    });

    quote! {
        let mut rendered = ::std::string::String::from(#name);
        rendered.push('(');
        #(#pushes)*
        rendered.push(')');
        rendered
    }
}
