/// Builds a `Vec<Value>` for one record.
///
/// Each element is converted with `Value::from`; the bare word `null`
/// stands for [`Value::Null`](crate::Value::Null).
///
/// # Examples
///
/// ```rust
/// use flatfile::{record, Value};
///
/// let values = record![1, "Bob", null, -2.5];
/// assert_eq!(
///     values,
///     vec![Value::Int(1), Value::from("Bob"), Value::Null, Value::Float(-2.5)]
/// );
/// ```
#[macro_export]
macro_rules! record {
    (@acc [$($out:expr,)*]) => {
        ::std::vec![$($out,)*]
    };

    (@acc [$($out:expr,)*] null $(, $($rest:tt)*)?) => {
        $crate::record!(@acc [$($out,)* $crate::Value::Null,] $($($rest)*)?)
    };

    (@acc [$($out:expr,)*] $next:expr $(, $($rest:tt)*)?) => {
        $crate::record!(@acc [$($out,)* $crate::Value::from($next),] $($($rest)*)?)
    };

    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };

    ($($items:tt)+) => {
        $crate::record!(@acc [] $($items)+)
    };
}
