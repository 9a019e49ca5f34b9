use derive_more::Display;

///
/// ClonePolicy
///
/// How the clone walk produces a field's value in the destination.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ClonePolicy {
    /// Same referent in origin and clone.
    #[display("share")]
    Share,

    /// Value produced by a typed hook.
    #[display("custom({hook})")]
    Custom { hook: &'static str },

    /// `Replicate::replicate`.
    #[display("deep")]
    Deep,

    /// Plain `Clone`.
    #[display("copy")]
    Copy,

    /// Elementwise through `Sequence`, rebuilt as `kind`.
    #[display("sequence({kind})")]
    Sequence { kind: &'static str },
}

///
/// UpdatePolicy
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum UpdatePolicy {
    #[display("exclude")]
    Exclude,

    #[display("apply({spec})")]
    ApplySpec { spec: &'static str },

    #[display("recurse")]
    Recurse,

    #[display("leave")]
    Leave,
}

///
/// FieldDescriptor
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[display("{name}: clone={clone}, update={update}")]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub clone: ClonePolicy,
    pub update: UpdatePolicy,
}

///
/// FieldLevel
///
/// Fields declared by one type in an inheritance chain.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldLevel {
    pub path: &'static str,
    pub fields: Vec<FieldDescriptor>,
}
