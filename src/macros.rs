/// Builds a [`Value`](crate::Value) from record-like literal syntax.
///
/// Keys may be bare identifiers or string literals. Anything that is not a
/// literal array, object or keyword goes through `Value::from`; wrap negative
/// numbers and other multi-token expressions in parentheses. Array commas
/// follow record text: an empty slot, including one after a trailing comma,
/// is `undefined`.
///
/// ```rust
/// use jsrs::record;
///
/// let value = record!({
///     name: "Marcus Aurelius",
///     "born": { year: 121, place: "Rome" },
///     kids: [, "Faustina", undefined, null],
///     delta: (-3.5)
/// });
/// assert_eq!(
///     value.stringify(),
///     "{name:\"Marcus Aurelius\",born:{year:121,place:\"Rome\"},kids:[,\"Faustina\",,null],delta:-3.5}"
/// );
/// ```
#[macro_export]
macro_rules! record {
    (undefined) => {
        $crate::Value::Undefined
    };

    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(::std::vec::Vec::new())
    };

    ([ $($elems:tt)+ ]) => {{
        let mut elements = ::std::vec::Vec::new();
        $crate::record!(@elements elements; $($elems)+);
        $crate::Value::Array(elements)
    }};

    ({}) => {
        $crate::Value::Object($crate::RecordMap::new())
    };

    ({ $($key:tt : $value:tt),+ $(,)? }) => {{
        let mut object = $crate::RecordMap::new();
        $(
            object.insert(
                ::std::string::String::from($crate::record!(@key $key)),
                $crate::record!($value),
            );
        )+
        $crate::Value::Object(object)
    }};

    (@key $key:ident) => {
        stringify!($key)
    };

    (@key $key:literal) => {
        $key
    };

    // element list muncher; empty slots are `Undefined` exactly as in
    // record text, so a trailing comma adds one
    (@elements $vec:ident; ) => {
        $vec.push($crate::Value::Undefined);
    };

    (@elements $vec:ident; , $($rest:tt)*) => {
        $vec.push($crate::Value::Undefined);
        $crate::record!(@elements $vec; $($rest)*);
    };

    (@elements $vec:ident; $elem:tt) => {
        $vec.push($crate::record!($elem));
    };

    (@elements $vec:ident; $elem:tt , $($rest:tt)*) => {
        $vec.push($crate::record!($elem));
        $crate::record!(@elements $vec; $($rest)*);
    };

    ($other:expr) => {
        $crate::Value::from($other)
    };
}
