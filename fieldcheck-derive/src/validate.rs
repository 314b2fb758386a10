use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Field, Fields, LitStr, parse_macro_input};

pub fn derive_validate_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Options read from `#[validate(...)]` on one field.
#[derive(Default)]
struct FieldOptions {
    rules: Option<String>,
    rename: Option<String>,
    skip: bool,
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let type_name = name.unraw().to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Validate can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Validate can only be derived for structs",
            ));
        }
    };

    let mut descriptors = Vec::new();
    let mut arms = Vec::new();

    for field in fields {
        let options = field_options(field)?;
        if options.skip {
            continue;
        }

        let Some(ident) = &field.ident else {
            continue;
        };
        let ident_name = ident.unraw().to_string();
        let reported = options.rename.unwrap_or_else(|| ident_name.clone());
        let rules = options.rules.unwrap_or_default();
        let index = descriptors.len();

        descriptors.push(quote! {
            ::fieldcheck::FieldDescriptor {
                name: #reported,
                ident: #ident_name,
                rules: #rules,
            }
        });
        arms.push(quote! {
            #index => ::fieldcheck::FieldValue::field_value(&self.#ident),
        });
    }

    Ok(quote! {
        impl #impl_generics ::fieldcheck::Validate for #name #ty_generics #where_clause {
            fn type_name(&self) -> &'static str {
                #type_name
            }

            fn fields(&self) -> &'static [::fieldcheck::FieldDescriptor] {
                const FIELDS: &[::fieldcheck::FieldDescriptor] = &[#(#descriptors),*];
                FIELDS
            }

            fn field(&self, index: usize) -> ::fieldcheck::Value<'_> {
                match index {
                    #(#arms)*
                    _ => ::fieldcheck::Value::Absent,
                }
            }
        }

        impl #impl_generics ::fieldcheck::FieldValue for #name #ty_generics #where_clause {
            fn field_value(&self) -> ::fieldcheck::Value<'_> {
                ::fieldcheck::Value::Struct(self)
            }
        }
    })
}

fn field_options(field: &Field) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();

    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("validate")) {
        // Shorthand: #[validate("required,email")]
        if let Ok(rules) = attr.parse_args::<LitStr>() {
            options.rules = Some(rules.value());
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                options.skip = true;
                Ok(())
            } else if meta.path.is_ident("rules") {
                let rules: LitStr = meta.value()?.parse()?;
                options.rules = Some(rules.value());
                Ok(())
            } else if meta.path.is_ident("rename") {
                let rename: LitStr = meta.value()?.parse()?;
                options.rename = Some(rename.value());
                Ok(())
            } else {
                Err(meta.error("expected `rules`, `rename` or `skip`"))
            }
        })?;
    }

    Ok(options)
}
