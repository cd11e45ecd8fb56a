//! Dependency lists and the shallow comparator.
//!
//! Effects and memos are gated on a list of [`Dep`] values. Two lists are
//! equal when they have the same length and every positional pair is
//! shallow-equal: scalars and strings by value, [`Dep::Ref`] by address.
//! A change deep inside a shared value whose `Rc` did not change is
//! invisible to the comparator.

use smallvec::SmallVec;
use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// An ordered dependency list.
pub type Deps = SmallVec<[Dep; 4]>;

/// A single dependency value.
#[derive(Clone)]
pub enum Dep {
    Unit,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Char(char),
    Str(Rc<str>),
    /// A shared value compared by pointer identity.
    Ref(Rc<dyn Any>),
}

impl Dep {
    /// Wrap a shared value so it is compared by identity, not contents.
    pub fn by_ref<T: Any>(value: &Rc<T>) -> Self {
        Dep::Ref(Rc::clone(value) as Rc<dyn Any>)
    }
}

impl PartialEq for Dep {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Dep::Unit, Dep::Unit) => true,
            (Dep::Bool(a), Dep::Bool(b)) => a == b,
            (Dep::Int(a), Dep::Int(b)) => a == b,
            (Dep::Uint(a), Dep::Uint(b)) => a == b,
            (Dep::Int(a), Dep::Uint(b)) | (Dep::Uint(b), Dep::Int(a)) => {
                u64::try_from(*a).is_ok_and(|a| a == *b)
            }
            (Dep::Float(a), Dep::Float(b)) => a == b,
            (Dep::Char(a), Dep::Char(b)) => a == b,
            (Dep::Str(a), Dep::Str(b)) => a == b,
            (Dep::Ref(a), Dep::Ref(b)) => std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)),
            _ => false,
        }
    }
}

impl fmt::Debug for Dep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dep::Unit => f.write_str("()"),
            Dep::Bool(v) => write!(f, "{v}"),
            Dep::Int(v) => write!(f, "{v}"),
            Dep::Uint(v) => write!(f, "{v}"),
            Dep::Float(v) => write!(f, "{v:?}"),
            Dep::Char(v) => write!(f, "{v:?}"),
            Dep::Str(v) => write!(f, "{v:?}"),
            Dep::Ref(v) => write!(f, "Ref({:p})", Rc::as_ptr(v)),
        }
    }
}

macro_rules! dep_from {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for Dep {
                fn from(value: $source) -> Self {
                    Dep::$variant(value as $target)
                }
            }
        )+
    };
}

dep_from!(Int as i64: i8, i16, i32, i64, isize, u8, u16, u32);
dep_from!(Uint as u64: u64, usize);
dep_from!(Float as f64: f32, f64);

impl From<()> for Dep {
    fn from(_: ()) -> Self {
        Dep::Unit
    }
}

impl From<bool> for Dep {
    fn from(value: bool) -> Self {
        Dep::Bool(value)
    }
}

impl From<char> for Dep {
    fn from(value: char) -> Self {
        Dep::Char(value)
    }
}

impl From<&str> for Dep {
    fn from(value: &str) -> Self {
        Dep::Str(Rc::from(value))
    }
}

impl From<String> for Dep {
    fn from(value: String) -> Self {
        Dep::Str(Rc::from(value))
    }
}

impl From<&String> for Dep {
    fn from(value: &String) -> Self {
        Dep::Str(Rc::from(value.as_str()))
    }
}

impl From<Rc<str>> for Dep {
    fn from(value: Rc<str>) -> Self {
        Dep::Str(value)
    }
}

impl<T: Any> From<&Rc<T>> for Dep {
    fn from(value: &Rc<T>) -> Self {
        Dep::by_ref(value)
    }
}

/// Build a [`Deps`] list, converting each element with `Dep::from`.
///
/// ```
/// use hookbox::{deps, Dep};
///
/// let deps = deps![1, "id", true];
/// assert_eq!(deps[1], Dep::from("id"));
/// ```
#[macro_export]
macro_rules! deps {
    () => {
        $crate::Deps::new()
    };
    ($($dep:expr),+ $(,)?) => {{
        let mut deps = $crate::Deps::new();
        $( deps.push($crate::Dep::from($dep)); )+
        deps
    }};
}

/// Compare two dependency lists.
///
/// Absent lists never compare equal, not even to another absent list, so
/// an effect or memo without dependencies runs on every call.
pub fn shallow_equal(a: Option<&[Dep]>, b: Option<&[Dep]>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.len() == b.len() && a.iter().zip(b).all(|(a, b)| a == b),
        _ => false,
    }
}
