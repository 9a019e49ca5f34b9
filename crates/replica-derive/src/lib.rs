use proc_macro::TokenStream;

mod clonable;
mod replicate;
mod util;

/// Implement `Clonable` for a struct with named fields.
///
/// Field attributes, at most one clone rule per field:
/// `#[replica(share)]`, `#[replica(copy)]`, `#[replica(with = "path")]`,
/// `#[replica(try_with = "path")]`, `#[replica(sequence)]`,
/// `#[replica(rebuild = "path")]`, `#[replica(base)]`.
/// Update attributes: `#[replica(no_update)]`,
/// `#[replica(update = "Spec")]`, optionally with `registered`.
/// Container attribute: `#[replica(path = "...")]`.
#[proc_macro_derive(Clonable, attributes(replica))]
pub fn derive_clonable(input: TokenStream) -> TokenStream {
    clonable::derive_clonable(input.into()).into()
}

/// Implement `Replicate` for an enum by replicating every variant field.
#[proc_macro_derive(Replicate, attributes(replica))]
pub fn derive_replicate(input: TokenStream) -> TokenStream {
    replicate::derive_replicate(input.into()).into()
}
