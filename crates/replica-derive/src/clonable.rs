use crate::util::path_label;
use darling::{Error as DarlingError, FromDeriveInput, FromField, ast, util::Flag};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Generics, Ident, Path, Type};

///
/// ClonableInput
///

#[derive(FromDeriveInput)]
#[darling(attributes(replica), supports(struct_named))]
struct ClonableInput {
    ident: Ident,
    generics: Generics,
    data: ast::Data<(), ClonableField>,

    #[darling(default)]
    path: Option<String>,
}

///
/// ClonableField
///

#[derive(FromField)]
#[darling(attributes(replica))]
struct ClonableField {
    ident: Option<Ident>,

    share: Flag,
    copy: Flag,
    with: Option<Path>,
    try_with: Option<Path>,
    sequence: Flag,
    rebuild: Option<Path>,
    base: Flag,

    no_update: Flag,
    recurse: Flag,
    update: Option<Type>,
    registered: Flag,
}

///
/// CloneKind
///

enum CloneKind {
    Deep,
    Share,
    Copy,
    Custom(Path),
    TryCustom(Path),
    Sequence,
    Rebuild(Path),
}

impl ClonableField {
    fn ident(&self) -> Result<&Ident, DarlingError> {
        self.ident
            .as_ref()
            .ok_or_else(|| DarlingError::custom("Clonable requires named fields"))
    }

    fn clone_kind(&self) -> Result<CloneKind, DarlingError> {
        let mut kinds = Vec::new();
        if self.share.is_present() {
            kinds.push(CloneKind::Share);
        }
        if self.copy.is_present() {
            kinds.push(CloneKind::Copy);
        }
        if let Some(path) = &self.with {
            kinds.push(CloneKind::Custom(path.clone()));
        }
        if let Some(path) = &self.try_with {
            kinds.push(CloneKind::TryCustom(path.clone()));
        }
        if let Some(path) = &self.rebuild {
            kinds.push(CloneKind::Rebuild(path.clone()));
        } else if self.sequence.is_present() {
            kinds.push(CloneKind::Sequence);
        }

        match kinds.len() {
            0 => Ok(CloneKind::Deep),
            1 => Ok(kinds.remove(0)),
            _ => Err(DarlingError::custom(
                "a field takes at most one of share, copy, with, try_with, sequence, rebuild",
            )),
        }
    }

    fn validate(&self) -> Result<(), DarlingError> {
        let ident = self.ident()?;

        if self.base.is_present() {
            let has_other = self.share.is_present()
                || self.copy.is_present()
                || self.with.is_some()
                || self.try_with.is_some()
                || self.sequence.is_present()
                || self.rebuild.is_some()
                || self.no_update.is_present()
                || self.recurse.is_present()
                || self.update.is_some();
            if has_other {
                return Err(
                    DarlingError::custom("a base field cannot carry other replica attributes")
                        .with_span(ident),
                );
            }
        }

        if self.no_update.is_present() && self.update.is_some() {
            return Err(DarlingError::custom("no_update and update are mutually exclusive")
                .with_span(ident));
        }
        if self.recurse.is_present() && (self.no_update.is_present() || self.update.is_some()) {
            return Err(
                DarlingError::custom("recurse cannot be combined with no_update or update")
                    .with_span(ident),
            );
        }
        if self.registered.is_present() && self.update.is_none() {
            return Err(DarlingError::custom("registered only applies together with update")
                .with_span(ident));
        }

        self.clone_kind().map(|_| ()).map_err(|err| err.with_span(ident))
    }

    fn clone_rule(kind: &CloneKind) -> TokenStream {
        match kind {
            CloneKind::Deep => quote!(::replica::table::CloneRule::deep()),
            CloneKind::Share => quote!(::replica::table::CloneRule::share()),
            CloneKind::Copy => quote!(::replica::table::CloneRule::copy()),
            CloneKind::Custom(path) => {
                let label = path_label(path);
                quote!(::replica::table::CloneRule::custom(#label, #path))
            }
            CloneKind::TryCustom(path) => {
                let label = path_label(path);
                quote!(::replica::table::CloneRule::try_custom(#label, #path))
            }
            CloneKind::Sequence => quote!(::replica::table::CloneRule::sequence()),
            CloneKind::Rebuild(path) => quote!(::replica::table::CloneRule::sequence_with(#path)),
        }
    }

    fn update_rule(&self, kind: &CloneKind) -> TokenStream {
        if self.no_update.is_present() {
            return quote!(::replica::table::UpdateRule::exclude());
        }
        if self.recurse.is_present() {
            return quote!(::replica::table::UpdateRule::recurse());
        }
        if let Some(spec) = &self.update {
            return if self.registered.is_present() {
                quote!(::replica::table::UpdateRule::registered::<#spec>())
            } else {
                quote!(::replica::table::UpdateRule::spec::<#spec>())
            };
        }

        match kind {
            CloneKind::Deep => quote!(::replica::table::UpdateRule::recurse()),
            CloneKind::Sequence | CloneKind::Rebuild(_) => {
                quote!(::replica::table::UpdateRule::elements())
            }
            CloneKind::Share | CloneKind::Copy | CloneKind::Custom(_) | CloneKind::TryCustom(_) => {
                quote!(::replica::table::UpdateRule::leave())
            }
        }
    }

    fn builder_call(&self) -> Result<TokenStream, DarlingError> {
        let ident = self.ident()?;

        if self.base.is_present() {
            return Ok(quote! {
                .inherit(|entity| &entity.#ident, |entity| &mut entity.#ident)
            });
        }

        let name = ident.to_string();
        let kind = self.clone_kind()?;
        let clone_rule = Self::clone_rule(&kind);
        let update_rule = self.update_rule(&kind);

        Ok(quote! {
            .field_with(
                #name,
                |entity| &entity.#ident,
                |entity| &mut entity.#ident,
                #clone_rule,
                #update_rule,
            )
        })
    }
}

// derive_clonable
pub fn derive_clonable(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    match ClonableInput::from_derive_input(&input).and_then(|input| expand(&input)) {
        Ok(tokens) => tokens,
        Err(err) => err.write_errors(),
    }
}

fn expand(input: &ClonableInput) -> Result<TokenStream, DarlingError> {
    let ident = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(DarlingError::custom(
            "Clonable cannot be derived for generic structs; implement it by hand",
        )
        .with_span(&input.generics));
    }

    let fields = match &input.data {
        ast::Data::Struct(fields) => &fields.fields,
        ast::Data::Enum(_) => {
            return Err(
                DarlingError::custom("Clonable can only be derived for structs").with_span(ident)
            );
        }
    };

    let mut errors = DarlingError::accumulator();
    for field in fields {
        if let Err(err) = field.validate() {
            errors.push(err);
        }
    }
    if fields.iter().filter(|field| field.base.is_present()).count() > 1 {
        errors.push(DarlingError::custom("at most one field can be the base").with_span(ident));
    }
    errors.finish()?;

    // own fields first, then the base link, matching the walk order
    let mut calls = Vec::with_capacity(fields.len());
    for field in fields.iter().filter(|field| !field.base.is_present()) {
        calls.push(field.builder_call()?);
    }
    for field in fields.iter().filter(|field| field.base.is_present()) {
        calls.push(field.builder_call()?);
    }

    let path = input.path.as_ref().map_or_else(
        || quote!(::core::concat!(::core::module_path!(), "::", ::core::stringify!(#ident))),
        |path| quote!(#path),
    );

    Ok(quote! {
        impl ::replica::traits::Clonable for #ident {
            const PATH: &'static str = #path;

            fn field_table() -> &'static ::replica::table::FieldTable<Self> {
                static TABLE: ::std::sync::OnceLock<::replica::table::FieldTable<#ident>> =
                    ::std::sync::OnceLock::new();

                TABLE.get_or_init(|| {
                    ::replica::table::FieldTable::<Self>::builder(
                        <Self as ::replica::traits::Clonable>::PATH,
                    )
                        #(#calls)*
                        .build()
                })
            }
        }
    })
}
