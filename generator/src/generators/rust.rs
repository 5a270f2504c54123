use std::collections::BTreeSet;

use proc_macro2::{Literal, Span};
use syn::{parse_quote, Expr, Field as SynField, FieldMutability, Ident, ImplItem, Item, Type};

use dt_datamod::Field;

use super::common::{generated_by, walk_fields, FieldVisitor, GenerateError};

use check_keyword::CheckKeyword;
use heck::{ToPascalCase, ToShoutySnakeCase, ToSnakeCase};

#[derive(Default)]
struct RustVisitor {
    fields: Vec<SynField>,
    impl_items: Vec<ImplItem>,
    field_names: BTreeSet<String>,
}

impl RustVisitor {
    fn new() -> Self {
        Self::default()
    }

    fn name_to_ident(name: &str) -> Ident {
        if ["crate", "self", "super", "Self"].contains(&name) {
            // These are keywords that are not allowed as raw identifiers
            Ident::new(&format!("{}_", name), Span::call_site())
        } else if name.is_keyword() {
            Ident::new_raw(name, Span::call_site())
        } else {
            Ident::new(name, Span::call_site())
        }
    }

    fn host_type(field: &Field) -> Result<Type, GenerateError> {
        syn::parse_str(field.type_.host_type()).map_err(|source| GenerateError::HostType {
            field: field.name.clone(),
            host_type: field.type_.host_type().to_owned(),
            source,
        })
    }

    /// Adds the struct field and its size constant, returning both idents.
    fn push_field(
        &mut self,
        field: &Field,
        type_: Type,
    ) -> Result<(Ident, Ident), GenerateError> {
        let snake = field.name.to_snake_case();
        if !self.field_names.insert(snake.clone()) {
            return Err(GenerateError::DuplicateField(field.name.clone()));
        }
        let ident = Self::name_to_ident(&snake);
        self.fields.push(SynField {
            attrs: vec![],
            vis: parse_quote!(pub),
            mutability: FieldMutability::None,
            ident: Some(ident.clone()),
            colon_token: None,
            ty: type_,
        });

        let size_name = format!("{}_SIZE", field.name.to_shouty_snake_case());
        let size_ident = Ident::new(&size_name, Span::call_site());
        let size = Literal::usize_unsuffixed(field.type_.size());
        let doc = format!(" Storage width of `{}` (`{}`)", field.name, field.type_.name());
        self.impl_items.push(parse_quote! {
            #[doc = #doc]
            pub const #size_ident: usize = #size;
        });
        Ok((ident, size_ident))
    }
}

impl FieldVisitor for RustVisitor {
    fn visit_codec_field(
        &mut self,
        field: &Field,
        encode_func: &str,
        decode_func: &str,
    ) -> Result<(), GenerateError> {
        let type_ = Self::host_type(field)?;
        let (ident, size_ident) = self.push_field(field, type_.clone())?;

        let snake = field.name.to_snake_case();
        let encode_method = Ident::new(&format!("encode_{snake}"), Span::call_site());
        let decode_method = Ident::new(&format!("decode_{snake}"), Span::call_site());
        let encode_func = Ident::new(encode_func, Span::call_site());
        let decode_func = Ident::new(decode_func, Span::call_site());

        // Codecs shared between widths also take the declared width.
        let (encode_call, decode_call): (Expr, Expr) = if field.type_.codec_width().is_some() {
            (
                parse_quote!(codec::#encode_func(&self.#ident, Self::#size_ident)),
                parse_quote!(codec::#decode_func(data, Self::#size_ident)),
            )
        } else {
            (
                parse_quote!(codec::#encode_func(&self.#ident)),
                parse_quote!(codec::#decode_func(data)),
            )
        };

        self.impl_items.push(parse_quote! {
            pub fn #encode_method(&self) -> Result<Vec<u8>, codec::Error> {
                #encode_call
            }
        });
        self.impl_items.push(parse_quote! {
            pub fn #decode_method(data: &[u8]) -> Result<#type_, codec::Error> {
                #decode_call
            }
        });
        Ok(())
    }

    fn visit_table_field(&mut self, field: &Field) -> Result<(), GenerateError> {
        // Tables encode themselves; only the field is emitted.
        let type_ = Self::host_type(field)?;
        self.push_field(field, type_)?;
        Ok(())
    }
}

pub fn generate(name: &str, fields: &[Field]) -> Result<String, GenerateError> {
    let mut visitor = RustVisitor::new();
    walk_fields(&mut visitor, fields)?;

    let name = RustVisitor::name_to_ident(&name.to_pascal_case());
    let struct_fields = visitor.fields;
    let impl_items = visitor.impl_items;

    let items: Vec<Item> = vec![
        parse_quote! {
            use dt_builtins::{codec, Address, Hash, U256};
        },
        parse_quote! {
            #[derive(Debug)]
            pub struct #name {
                #(#struct_fields),*
            }
        },
        parse_quote! {
            impl #name {
                #(#impl_items)*
            }
        },
    ];

    let doc_comment = format!(" {}", generated_by());
    let root = syn::File {
        shebang: None,
        attrs: vec![
            parse_quote!(#![doc = #doc_comment]),
            parse_quote!(#![allow(dead_code, unused_imports)]),
        ],
        items,
    };
    Ok(prettyplease::unparse(&root))
}
