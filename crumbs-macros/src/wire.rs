use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{Data, DataStruct, DeriveInput, Fields, Generics, Ident, Index, Path};

struct BodyInfo {
    ident: Ident,
    generics: Generics,
    path: Path,
}

impl BodyInfo {
    fn new(item: &DeriveInput) -> Self {
        Self {
            ident: item.ident.clone(),
            generics: item.generics.clone(),
            path: syn::parse_quote! { crumbs_wire },
        }
    }
}

fn struct_data(item: DeriveInput) -> Result<(BodyInfo, DataStruct), syn::Error> {
    let info = BodyInfo::new(&item);

    match item.data {
        Data::Struct(s) => Ok((info, s)),
        _ => Err(syn::Error::new(
            Span::call_site(),
            "Wire serialization is only implemented for structs.",
        )),
    }
}

fn serialize_struct(s: &DataStruct, info: &BodyInfo) -> TokenStream2 {
    let implementer = &info.ident;
    let path = &info.path;
    let (impl_generics, ty_generics, where_clause) = info.generics.split_for_impl();

    let types: Vec<_> = s.fields.iter().map(|field| &field.ty).collect();

    let (write_body, read_body) = match &s.fields {
        Fields::Unit => (
            quote! {
                let _ = dst;
                Ok(())
            },
            quote! {
                let _ = src;
                Ok(Self)
            },
        ),
        Fields::Unnamed(fields) => {
            let indices: Vec<_> = (0..fields.unnamed.len()).map(Index::from).collect();

            (
                quote! {
                    let mut dst = dst.into_iter();

                    #(
                        #path::WireIter::write_iter(&self.#indices, &mut dst)?;
                    )*

                    Ok(())
                },
                quote! {
                    let mut src = src.into_iter();

                    Ok(
                        Self(
                            #(
                                <#types as #path::WireIter>::read_iter(&mut src)?,
                            )*
                        )
                    )
                },
            )
        }
        Fields::Named(fields) => {
            let idents: Vec<_> = fields
                .named
                .iter()
                .filter_map(|field| field.ident.as_ref())
                .collect();

            (
                quote! {
                    let mut dst = dst.into_iter();

                    #(
                        #path::WireIter::write_iter(&self.#idents, &mut dst)?;
                    )*

                    Ok(())
                },
                quote! {
                    let mut src = src.into_iter();

                    Ok(
                        Self {
                            #(
                                #idents: <#types as #path::WireIter>::read_iter(&mut src)?,
                            )*
                        }
                    )
                },
            )
        }
    };

    quote! {
        impl #impl_generics #path::WireIter for #implementer #ty_generics #where_clause {
            const SIZE: usize = 0 #( + <#types as #path::WireIter>::SIZE )*;

            fn write_iter<'a>(&self, dst: impl IntoIterator<Item = &'a mut u8>) -> Result<(), #path::error::EndOfInput> {
                #write_body
            }

            fn read_iter<'a>(src: impl IntoIterator<Item = &'a u8>) -> Result<Self, #path::error::EndOfInput> {
                #read_body
            }
        }
    }
}

pub fn wire_iter(item: TokenStream) -> TokenStream {
    let item: DeriveInput = match syn::parse(item) {
        Ok(item) => item,
        Err(err) => return err.to_compile_error().into(),
    };

    match struct_data(item) {
        Ok((info, s)) => serialize_struct(&s, &info).into(),
        Err(err) => err.to_compile_error().into(),
    }
}

pub fn wire_buf(item: TokenStream) -> TokenStream {
    let item: DeriveInput = match syn::parse(item) {
        Ok(item) => item,
        Err(err) => return err.to_compile_error().into(),
    };

    if !item.generics.params.is_empty() {
        return syn::Error::new_spanned(
            &item.generics,
            "WireBuf is incompatible with generic types. You may still use WireIter.",
        )
        .to_compile_error()
        .into();
    }

    let (info, _) = match struct_data(item) {
        Ok(parts) => parts,
        Err(err) => return err.to_compile_error().into(),
    };

    let path = &info.path;
    let ident = &info.ident;

    // `Self` is not permitted in the array length, name the type instead
    quote! {
        // SAFETY: the frame length is the derived `WireIter::SIZE`,
        // which counts every field written by `write_iter`.
        unsafe impl #path::WireBuf for #ident {
            type Frame = [u8; <#ident as #path::WireIter>::SIZE];
        }
    }
    .into()
}
