use crate::util::{replicate_bounds, where_clause_with_bounds};
use darling::{Error as DarlingError, FromDeriveInput, FromField, FromVariant, ast, util::Flag};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{DeriveInput, Generics, Ident};

///
/// ReplicateInput
///

#[derive(FromDeriveInput)]
#[darling(attributes(replica), supports(enum_any))]
struct ReplicateInput {
    ident: Ident,
    generics: Generics,
    data: ast::Data<ReplicateVariant, ()>,
}

///
/// ReplicateVariant
///

#[derive(FromVariant)]
#[darling(attributes(replica))]
struct ReplicateVariant {
    ident: Ident,
    fields: ast::Fields<ReplicateField>,
}

///
/// ReplicateField
///
/// `#[replica(copy)]` clones the field with `Clone` and skips it on update.
///

#[derive(FromField)]
#[darling(attributes(replica))]
struct ReplicateField {
    ident: Option<Ident>,
    copy: Flag,
}

///
/// Binding
///

struct Binding<'a> {
    field: &'a ReplicateField,
    var: Ident,
    label: Option<String>,
}

impl ReplicateVariant {
    fn bindings(&self) -> Vec<Binding<'_>> {
        let multiple = self.fields.len() > 1;

        self.fields
            .iter()
            .enumerate()
            .map(|(i, field)| match &field.ident {
                Some(ident) => Binding {
                    field,
                    var: format_ident!("field_{}", ident),
                    label: Some(ident.to_string()),
                },
                None => Binding {
                    field,
                    var: format_ident!("field_{}", i),
                    label: multiple.then(|| i.to_string()),
                },
            })
            .collect()
    }

    // pattern binding every field; `skip_copies` binds copied fields to `_`
    fn pattern(&self, bindings: &[Binding<'_>], skip_copies: bool) -> TokenStream {
        let ident = &self.ident;
        let vars = bindings.iter().map(|b| {
            if skip_copies && b.field.copy.is_present() {
                quote!(_)
            } else {
                let var = &b.var;
                quote!(#var)
            }
        });

        match self.fields.style {
            ast::Style::Unit => quote!(Self::#ident),
            ast::Style::Tuple => quote!(Self::#ident(#(#vars),*)),
            ast::Style::Struct => {
                let names = bindings.iter().map(|b| &b.field.ident);
                quote!(Self::#ident { #(#names: #vars),* })
            }
        }
    }

    fn replicate_arm(&self) -> TokenStream {
        let ident = &self.ident;
        let bindings = self.bindings();
        let pattern = self.pattern(&bindings, false);

        let values = bindings.iter().map(|b| {
            let var = &b.var;
            if b.field.copy.is_present() {
                return quote!(::core::clone::Clone::clone(#var));
            }

            let value = quote!(::replica::traits::Replicate::replicate(#var, walk));
            match &b.label {
                Some(label) => quote!(#value.map_err(|err| err.with_field(#label))?),
                None => quote!(#value?),
            }
        });

        let built = match self.fields.style {
            ast::Style::Unit => quote!(Self::#ident),
            ast::Style::Tuple => quote!(Self::#ident(#(#values),*)),
            ast::Style::Struct => {
                let names = bindings.iter().map(|b| &b.field.ident);
                quote!(Self::#ident { #(#names: #values),* })
            }
        };

        quote!(#pattern => #built,)
    }

    fn refresh_arm(&self) -> TokenStream {
        let bindings = self.bindings();
        let pattern = self.pattern(&bindings, true);

        let calls = bindings.iter().filter(|b| !b.field.copy.is_present()).map(|b| {
            let var = &b.var;
            let call = quote!(::replica::traits::Replicate::refresh(#var, walk));

            match &b.label {
                Some(label) => quote!(#call.map_err(|err| err.with_field(#label))?;),
                None => quote!(#call?;),
            }
        });

        quote!(#pattern => { #(#calls)* })
    }
}

// derive_replicate
pub fn derive_replicate(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    match ReplicateInput::from_derive_input(&input).and_then(|input| expand(&input)) {
        Ok(tokens) => tokens,
        Err(err) => err.write_errors(),
    }
}

fn expand(input: &ReplicateInput) -> Result<TokenStream, DarlingError> {
    let ident = &input.ident;
    let variants = match &input.data {
        ast::Data::Enum(variants) => variants,
        ast::Data::Struct(_) => {
            return Err(DarlingError::custom(
                "Replicate can only be derived for enums; derive Clonable for structs",
            )
            .with_span(ident));
        }
    };

    if variants.is_empty() {
        return Err(DarlingError::custom("Replicate cannot be derived for an enum without variants")
            .with_span(ident));
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let bounds = replicate_bounds(&input.generics);
    let where_clause = where_clause_with_bounds(where_clause, &bounds);

    let replicate_arms = variants.iter().map(ReplicateVariant::replicate_arm);
    let refresh_arms = variants.iter().map(ReplicateVariant::refresh_arm);

    Ok(quote! {
        impl #impl_generics ::replica::traits::Replicate for #ident #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn replicate(
                &self,
                walk: &mut ::replica::walk::CloneWalk,
            ) -> ::core::result::Result<Self, ::replica::ReplicaError> {
                ::core::result::Result::Ok(match self {
                    #(#replicate_arms)*
                })
            }

            #[allow(unused_variables)]
            fn refresh(
                &mut self,
                walk: &mut ::replica::walk::UpdateWalk<'_>,
            ) -> ::core::result::Result<(), ::replica::ReplicaError> {
                match self {
                    #(#refresh_arms)*
                }

                ::core::result::Result::Ok(())
            }
        }
    })
}
