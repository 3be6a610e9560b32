//! Parameter values carried in a request envelope.
//!
//! The API accepts scalars (strings, integers, booleans) and, for multi-valued
//! fields such as `article_ids`, a single comma-separated string.

use std::fmt;

use serde_json::Value;

/// A single scalar parameter value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl Scalar {
    /// JSON representation of this scalar, keeping its type.
    pub fn to_json(&self) -> Value {
        match self {
            Scalar::Str(s) => Value::String(s.clone()),
            Scalar::Int(n) => Value::from(*n),
            Scalar::Bool(b) => Value::Bool(*b),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => f.write_str(s),
            Scalar::Int(n) => write!(f, "{n}"),
            Scalar::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// A named parameter's value: either a scalar or a list of scalars.
///
/// Lists are sent as one comma-joined string, which is how the server
/// expects id lists. Splitting that string on `,` gives back the items in
/// order, so a list must be non-empty and no string item may contain a comma:
///
/// ```
/// use ttrss_rpc_core::ParamValue;
///
/// let ids = ParamValue::from(vec![12, 13, 27]);
/// assert_eq!(ids.to_json(), serde_json::json!("12,13,27"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
}

impl ParamValue {
    /// JSON representation of this value as it appears in the envelope.
    ///
    /// # Panics
    ///
    /// Panics for an empty list, or a list with a string item containing `,`.
    pub fn to_json(&self) -> Value {
        match self {
            ParamValue::Scalar(scalar) => scalar.to_json(),
            ParamValue::List(items) => Value::String(join_list(items)),
        }
    }
}

fn join_list(items: &[Scalar]) -> String {
    assert!(!items.is_empty(), "list parameter must not be empty");

    let mut joined = String::new();
    for (i, item) in items.iter().enumerate() {
        if let Scalar::Str(s) = item {
            assert!(!s.contains(','), "list item `{s}` contains a comma");
        }
        if i > 0 {
            joined.push(',');
        }
        joined.push_str(&item.to_string());
    }
    joined
}

impl From<Scalar> for ParamValue {
    fn from(scalar: Scalar) -> Self {
        ParamValue::Scalar(scalar)
    }
}

macro_rules! impl_int_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Scalar {
                fn from(n: $ty) -> Self {
                    Scalar::Int(i64::from(n))
                }
            }

            impl From<$ty> for ParamValue {
                fn from(n: $ty) -> Self {
                    ParamValue::Scalar(Scalar::from(n))
                }
            }
        )*
    };
}

impl_int_scalar!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Scalar(Scalar::Bool(b))
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Scalar(Scalar::Str(s))
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Scalar(Scalar::from(s))
    }
}

impl From<&String> for ParamValue {
    fn from(s: &String) -> Self {
        ParamValue::Scalar(Scalar::Str(s.clone()))
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for ParamValue {
    fn from(items: Vec<T>) -> Self {
        ParamValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Scalar> + Clone> From<&[T]> for ParamValue {
    fn from(items: &[T]) -> Self {
        ParamValue::List(items.iter().cloned().map(Into::into).collect())
    }
}
