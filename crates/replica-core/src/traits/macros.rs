// impl_scalar
// plain values are copied by the clone walk and ignored by the update walk
macro_rules! impl_scalar {
    ($trait:ident) => {
        impl_scalar!(
            @impl $trait;
            bool, char, (),
            i8, i16, i32, i64, i128, isize,
            u8, u16, u32, u64, u128, usize,
            f32, f64,
            String, &'static str,
            std::time::Duration
        );
    };

    (@impl $trait:ident; $($ty:ty),* $(,)?) => {
        $(
            impl $trait for $ty {
                fn replicate(
                    &self,
                    _: &mut $crate::walk::CloneWalk,
                ) -> Result<Self, $crate::error::ReplicaError> {
                    Ok(Clone::clone(self))
                }
            }
        )*
    };
}
