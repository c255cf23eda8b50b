//! Procedural macros for defining operations
//!
//! `#[operation]` implements `cardwall_operations::Operation` for a command
//! struct, deriving the parameter list from its fields. `#[param]` is a
//! field marker read by `#[operation]`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input, Attribute, DeriveInput, Expr, Field, Ident, Lit, Meta, Token, Type,
};

/// Attribute macro for defining an operation
///
/// # Usage
///
/// ```ignore
/// #[operation(verb = "add", noun = "card", description = "Create a new card")]
/// #[derive(Debug, Deserialize, Serialize)]
/// pub struct AddCard {
///     /// Column receiving the card
///     pub column: ColumnId,
///     /// The card title
///     #[param(short = 't', alias = "name")]
///     pub title: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn operation(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as OperationArgs);
    let input = parse_macro_input!(item as DeriveInput);

    match expand_operation(&args, &input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_operation(
    args: &OperationArgs,
    input: &DeriveInput,
) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let verb = &args.verb;
    let noun = &args.noun;
    let description = &args.description;

    let param_metas: Vec<_> = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            syn::Fields::Named(fields) => fields.named.iter().map(generate_param_meta).collect(),
            syn::Fields::Unit => Vec::new(),
            syn::Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    name,
                    "operation macro does not support tuple structs",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "operation macro only supports structs",
            ))
        }
    };

    let num_params = param_metas.len();
    let input = strip_param_attrs(input.clone());

    Ok(quote! {
        #input

        impl cardwall_operations::Operation for #name {
            fn verb(&self) -> &'static str {
                #verb
            }

            fn noun(&self) -> &'static str {
                #noun
            }

            fn description(&self) -> &'static str {
                #description
            }

            fn parameters(&self) -> &'static [cardwall_operations::ParamMeta] {
                static PARAMS: [cardwall_operations::ParamMeta; #num_params] = [
                    #(#param_metas),*
                ];
                &PARAMS
            }
        }
    })
}

/// Arguments for the #[operation(...)] attribute
struct OperationArgs {
    verb: String,
    noun: String,
    description: String,
}

impl Parse for OperationArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut verb = None;
        let mut noun = None;
        let mut description = None;

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            let value: Lit = input.parse()?;

            let value_str = match value {
                Lit::Str(s) => s.value(),
                _ => return Err(syn::Error::new_spanned(value, "expected string literal")),
            };

            match ident.to_string().as_str() {
                "verb" => verb = Some(value_str),
                "noun" => noun = Some(value_str),
                "description" => description = Some(value_str),
                other => {
                    return Err(syn::Error::new_spanned(
                        ident,
                        format!("unknown attribute: {}", other),
                    ))
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(OperationArgs {
            verb: verb.ok_or_else(|| input.error("missing 'verb' attribute"))?,
            noun: noun.ok_or_else(|| input.error("missing 'noun' attribute"))?,
            description: description
                .ok_or_else(|| input.error("missing 'description' attribute"))?,
        })
    }
}

/// Generate the ParamMeta expression for a field
fn generate_param_meta(field: &Field) -> proc_macro2::TokenStream {
    let name = field
        .ident
        .as_ref()
        .map(|ident| ident.to_string())
        .unwrap_or_default();
    let description = extract_doc_comment(&field.attrs);
    let required = !is_option_type(&field.ty);
    let param_type = rust_type_to_param_type(&field.ty);
    let (short, aliases) = extract_param_attrs(&field.attrs);

    let short_expr = match short {
        Some(c) => quote! { Some(#c) },
        None => quote! { None },
    };

    let required_call = if required {
        quote! { .required() }
    } else {
        quote! {}
    };

    quote! {
        cardwall_operations::ParamMeta::new(#name)
            .description(#description)
            .param_type(#param_type)
            #required_call
            .short_opt(#short_expr)
            .aliases(&[#(#aliases),*])
    }
}

/// Doc comment lines joined with spaces
fn extract_doc_comment(attrs: &[Attribute]) -> String {
    let docs: Vec<String> = attrs
        .iter()
        .filter_map(|attr| {
            if !attr.path().is_ident("doc") {
                return None;
            }
            if let Meta::NameValue(nv) = &attr.meta {
                if let Expr::Lit(lit) = &nv.value {
                    if let Lit::Str(s) = &lit.lit {
                        return Some(s.value().trim().to_string());
                    }
                }
            }
            None
        })
        .collect();

    docs.join(" ")
}

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(path) => path.path.segments.last(),
        _ => None,
    }
}

fn is_option_type(ty: &Type) -> bool {
    last_segment(ty).is_some_and(|segment| segment.ident == "Option")
}

/// Map a Rust field type to a ParamType expression.
///
/// Newtype ids, dates and enums fall through to String.
fn rust_type_to_param_type(ty: &Type) -> proc_macro2::TokenStream {
    let Some(segment) = last_segment(ty) else {
        return quote! { cardwall_operations::ParamType::String };
    };

    match segment.ident.to_string().as_str() {
        "Option" => {
            if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
                    return rust_type_to_param_type(inner);
                }
            }
            quote! { cardwall_operations::ParamType::String }
        }
        "Vec" | "BTreeSet" | "HashSet" => quote! { cardwall_operations::ParamType::Array },
        "bool" => quote! { cardwall_operations::ParamType::Boolean },
        "i32" | "i64" | "u32" | "u64" | "usize" | "isize" => {
            quote! { cardwall_operations::ParamType::Integer }
        }
        "f32" | "f64" => quote! { cardwall_operations::ParamType::Number },
        _ => quote! { cardwall_operations::ParamType::String },
    }
}

/// Read `#[param(short = 'x', alias = "y")]`
fn extract_param_attrs(attrs: &[Attribute]) -> (Option<char>, Vec<String>) {
    let mut short = None;
    let mut aliases = Vec::new();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("param")) {
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("short") {
                meta.input.parse::<Token![=]>()?;
                if let Lit::Char(c) = meta.input.parse::<Lit>()? {
                    short = Some(c.value());
                }
            } else if meta.path.is_ident("alias") {
                meta.input.parse::<Token![=]>()?;
                if let Lit::Str(s) = meta.input.parse::<Lit>()? {
                    aliases.push(s.value());
                }
            }
            Ok(())
        });
    }

    (short, aliases)
}

/// Remove `#[param]` markers so the struct compiles without them
fn strip_param_attrs(mut input: DeriveInput) -> DeriveInput {
    if let syn::Data::Struct(data) = &mut input.data {
        for field in data.fields.iter_mut() {
            field.attrs.retain(|attr| !attr.path().is_ident("param"));
        }
    }
    input
}

/// Field marker read by `#[operation]`; expands to the item unchanged
#[proc_macro_attribute]
pub fn param(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}
