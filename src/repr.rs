//! Printable forms of container contents
//!
//! Containers print as their kind name followed by a parenthesized body in
//! the familiar mapping/sequence/set notation, e.g.
//! `LockableDict({'kmax': 4, 'order': LockableList(['a', 'b'])})`.
//! [`Repr`] writes the body notation of a single value; nested containers
//! write their own kind prefix so it survives nesting.

use std::fmt;

/// Writes the literal notation of a value
pub trait Repr {
    /// Write the printable form of `self`
    fn fmt_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    /// Render the printable form into a string
    fn repr(&self) -> String {
        ReprDisplay(self).to_string()
    }
}

/// Adapter that displays a value through its [`Repr`] implementation
pub struct ReprDisplay<'a, T: ?Sized>(pub &'a T);

impl<T: Repr + ?Sized> fmt::Display for ReprDisplay<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_repr(f)
    }
}

/// Write a quoted string literal
pub fn write_str_literal(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    write!(f, "{}", quote)?;
    for c in s.chars() {
        match c {
            '\\' => write!(f, "\\\\")?,
            '\n' => write!(f, "\\n")?,
            '\t' => write!(f, "\\t")?,
            '\r' => write!(f, "\\r")?,
            c if c == quote => write!(f, "\\{}", c)?,
            c => write!(f, "{}", c)?,
        }
    }
    write!(f, "{}", quote)
}

/// Write `[a, b, ...]`
pub fn write_seq<'a, T, I>(f: &mut fmt::Formatter<'_>, items: I) -> fmt::Result
where
    T: Repr + ?Sized + 'a,
    I: IntoIterator<Item = &'a T>,
{
    write!(f, "[")?;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        item.fmt_repr(f)?;
    }
    write!(f, "]")
}

/// Write `{k: v, ...}`
pub fn write_map<'a, K, V, I>(f: &mut fmt::Formatter<'_>, entries: I) -> fmt::Result
where
    K: Repr + ?Sized + 'a,
    V: Repr + ?Sized + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    write!(f, "{{")?;
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        key.fmt_repr(f)?;
        write!(f, ": ")?;
        value.fmt_repr(f)?;
    }
    write!(f, "}}")
}

/// Write `{a, b, ...}`; an empty set writes nothing
pub fn write_set<'a, I>(f: &mut fmt::Formatter<'_>, items: I) -> fmt::Result
where
    I: IntoIterator<Item = &'a str>,
{
    let mut items = items.into_iter().peekable();
    if items.peek().is_none() {
        return Ok(());
    }
    write!(f, "{{")?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write_str_literal(f, item)?;
    }
    write!(f, "}}")
}

impl Repr for str {
    fn fmt_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_str_literal(f, self)
    }
}

impl Repr for String {
    fn fmt_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_str_literal(f, self)
    }
}

impl Repr for bool {
    fn fmt_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", if *self { "True" } else { "False" })
    }
}

impl Repr for f64 {
    fn fmt_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl<T: Repr> Repr for Option<T> {
    fn fmt_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Some(value) => value.fmt_repr(f),
            None => write!(f, "None"),
        }
    }
}

impl<T: Repr> Repr for Vec<T> {
    fn fmt_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_seq(f, self.iter())
    }
}

impl<T: Repr + ?Sized> Repr for &T {
    fn fmt_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).fmt_repr(f)
    }
}

macro_rules! impl_repr_integer {
    ($($ty:ty),*) => {
        $(
            impl Repr for $ty {
                fn fmt_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self)
                }
            }
        )*
    };
}

impl_repr_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_literal() {
        assert_eq!("Kmax".repr(), "'Kmax'");
        assert_eq!(String::from("it's").repr(), "\"it's\"");
        assert_eq!("a\\b".repr(), "'a\\\\b'");
    }

    #[test]
    fn test_scalars() {
        assert_eq!(5i64.repr(), "5");
        assert_eq!(true.repr(), "True");
        assert_eq!(1.5f64.repr(), "1.5");
        assert_eq!(None::<i64>.repr(), "None");
    }

    #[test]
    fn test_vec() {
        assert_eq!(vec!["a", "b"].repr(), "['a', 'b']");
        assert_eq!(Vec::<i64>::new().repr(), "[]");
    }
}
