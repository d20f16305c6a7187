//! Derive macros for `smithy-codec`.

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{
    parse_macro_input, parse_quote, Attribute, Data, DeriveInput, Fields, GenericParam, Index,
    Lifetime, LifetimeParam, Member,
};

/// Derive `Write` and `Read` for a struct, or declare a type as a scalar.
///
/// By default, a struct is encoded as its fields back to back, in declaration order, and its
/// handle spans from the first non-empty field to the end of the last one. Every field must
/// itself implement `Write` and `Read`.
///
/// With `#[serial(scalar)]`, the type is instead encoded as one aligned copy of its in-memory
/// image (see `smithy_codec::scalar!`). This is the only way to encode an enum or union, and
/// requires zerocopy's `IntoBytes`, `TryFromBytes` and `Immutable`.
///
/// A struct may have at most one lifetime parameter: it is the lifetime of the buffer that
/// borrowed fields (`&'a str`, `&'a [u8]`) are decoded from.
///
/// # Rejected definitions
///
/// A field without a layout:
///
/// ```compile_fail
/// use smithy_codec::Serial;
///
/// #[derive(Serial)]
/// struct Names {
///     names: Vec<String>,
/// }
/// ```
///
/// A reference to a struct, which would have to be followed out of the buffer:
///
/// ```compile_fail
/// use smithy_codec::Serial;
///
/// #[derive(Serial)]
/// struct Inner {
///     id: u32,
/// }
///
/// #[derive(Serial)]
/// struct Outer<'a> {
///     inner: &'a Inner,
/// }
/// ```
///
/// An enum without `#[serial(scalar)]`:
///
/// ```compile_fail
/// use smithy_codec::Serial;
///
/// #[derive(Serial)]
/// enum Kind {
///     A,
///     B(u32),
/// }
/// ```
///
/// More than one lifetime:
///
/// ```compile_fail
/// use smithy_codec::Serial;
///
/// #[derive(Serial)]
/// struct Pair<'a, 'b> {
///     a: &'a str,
///     b: &'b str,
/// }
/// ```
///
/// An unknown `serial` attribute:
///
/// ```compile_fail
/// use smithy_codec::Serial;
///
/// #[derive(Serial)]
/// #[serial(packed)]
/// struct Word {
///     value: u32,
/// }
/// ```
#[proc_macro_derive(Serial, attributes(serial))]
pub fn derive_serial(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    if is_scalar(&input.attrs)? {
        return expand_scalar(input);
    }
    match &input.data {
        Data::Struct(data) => expand_struct(input, &data.fields),
        Data::Enum(_) | Data::Union(_) => Err(syn::Error::new_spanned(
            &input.ident,
            "Serial can only be derived for structs; declare enums and unions with \
             #[serial(scalar)] and zerocopy's IntoBytes, TryFromBytes and Immutable",
        )),
    }
}

fn is_scalar(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut scalar = false;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serial")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("scalar") {
                scalar = true;
                Ok(())
            } else {
                Err(meta.error("unsupported serial attribute, expected `scalar`"))
            }
        })?;
    }
    Ok(scalar)
}

fn expand_scalar(input: &DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "scalar types cannot be generic",
        ));
    }
    let ident = &input.ident;
    Ok(quote! {
        ::smithy_codec::scalar!(#ident);
    })
}

fn expand_struct(input: &DeriveInput, fields: &Fields) -> syn::Result<TokenStream2> {
    let ident = &input.ident;
    let members: Vec<Member> = match fields {
        Fields::Named(named) => named
            .named
            .iter()
            .filter_map(|field| field.ident.clone().map(Member::Named))
            .collect(),
        Fields::Unnamed(unnamed) => (0..unnamed.unnamed.len())
            .map(|i| Member::Unnamed(Index::from(i)))
            .collect(),
        Fields::Unit => Vec::new(),
    };

    // Write: every type parameter must be encodable.
    let mut write_generics = input.generics.clone();
    for param in write_generics.type_params_mut() {
        param.bounds.push(parse_quote!(::smithy_codec::Write));
    }
    let (write_impl, ty_generics, write_where) = write_generics.split_for_impl();

    // Read: decode against the struct's own lifetime, or a fresh one if it has none.
    let lifetimes: Vec<&LifetimeParam> = input.generics.lifetimes().collect();
    let mut read_generics = input.generics.clone();
    let lifetime = match lifetimes.as_slice() {
        [] => {
            let lifetime = Lifetime::new("'__de", Span::call_site());
            read_generics.params.insert(
                0,
                GenericParam::Lifetime(LifetimeParam::new(lifetime.clone())),
            );
            lifetime
        }
        [param] => param.lifetime.clone(),
        [_, extra, ..] => {
            return Err(syn::Error::new_spanned(
                extra,
                "Serial structs may have at most one lifetime parameter",
            ))
        }
    };
    for param in read_generics.type_params_mut() {
        param.bounds.push(parse_quote!(::smithy_codec::Read<#lifetime>));
    }
    let (read_impl, _, read_where) = read_generics.split_for_impl();

    let construct = match fields {
        Fields::Named(_) => quote! {
            Self { #( #members: ::smithy_codec::Read::read(reader)?, )* }
        },
        Fields::Unnamed(_) => {
            let reads = members
                .iter()
                .map(|_| quote!(::smithy_codec::Read::read(reader)?));
            quote! { Self( #( #reads, )* ) }
        }
        Fields::Unit => quote! { Self },
    };

    Ok(quote! {
        impl #write_impl ::smithy_codec::Write for #ident #ty_generics #write_where {
            const SHAPE: ::smithy_codec::Shape = ::smithy_codec::Shape::Struct;

            #[allow(unused_variables)]
            fn write(
                &self,
                writer: &mut ::smithy_codec::SerialWriter,
            ) -> ::core::result::Result<::smithy_codec::Handle, ::smithy_codec::Error> {
                let span = ::smithy_codec::Handle::EMPTY;
                #( let span = span.join(::smithy_codec::Write::write(&self.#members, writer)?); )*
                ::core::result::Result::Ok(span)
            }

            fn encode_size(&self, offset: usize) -> usize {
                let end = offset;
                #( let end = end + ::smithy_codec::Write::encode_size(&self.#members, end); )*
                end - offset
            }
        }

        impl #read_impl ::smithy_codec::Read<#lifetime> for #ident #ty_generics #read_where {
            #[allow(unused_variables)]
            fn read(
                reader: &mut ::smithy_codec::SerialReader<#lifetime>,
            ) -> ::core::result::Result<Self, ::smithy_codec::Error> {
                ::core::result::Result::Ok(#construct)
            }
        }
    })
}
