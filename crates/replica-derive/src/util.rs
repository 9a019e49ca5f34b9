use proc_macro2::TokenStream;
use quote::quote;
use syn::{Generics, Path, WhereClause};

/// Extend an optional where clause with extra predicates.
pub fn where_clause_with_bounds(
    where_clause: Option<&WhereClause>,
    bounds: &[TokenStream],
) -> TokenStream {
    if bounds.is_empty() {
        return where_clause.map_or_else(|| quote!(), |wc| quote!(#wc));
    }

    if let Some(wc) = where_clause {
        let preds = &wc.predicates;
        quote!(where #preds, #(#bounds),*)
    } else {
        quote!(where #(#bounds),*)
    }
}

/// `T: Replicate` for every type parameter.
pub fn replicate_bounds(generics: &Generics) -> Vec<TokenStream> {
    generics
        .type_params()
        .map(|param| {
            let ident = &param.ident;
            quote!(#ident: ::replica::traits::Replicate)
        })
        .collect()
}

/// Source-like rendering of a path, used as a hook name.
pub fn path_label(path: &Path) -> String {
    let segments = path
        .segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect::<Vec<_>>()
        .join("::");

    if path.leading_colon.is_some() {
        format!("::{segments}")
    } else {
        segments
    }
}
