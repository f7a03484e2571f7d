/// Define a `pub const` together with a `const fn` accessor named after it
/// in lower case, so callers can use either form in const context.
macro_rules! register_const {
    ($(#[$meta:meta])*$name:ident, $type:ty, $value:expr) => {
        $(#[$meta])*
        pub const $name: $type = $value;
        paste::paste! {
            $(#[$meta])*
            #[inline(always)]
            pub const fn [<$name:lower>]() -> $type {
                $name
            }
        }
    };
    () => {};
}

/// Define a `const fn` whose body is a derivation over other constants.
macro_rules! register_fn {
    ($(#[$meta:meta])*$name:ident($($arg:ident: $argty:ty),*), $type:ty, $value:expr) => {
        $(#[$meta])*
        #[inline(always)]
        pub const fn $name($($arg: $argty),*) -> $type {
            $value
        }
    };
    () => {};
}

pub(super) use {register_const, register_fn};
