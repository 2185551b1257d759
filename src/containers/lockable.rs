//! The one-way freeze transition shared by all lockable containers

/// A value that can be frozen in place and cloned back into a mutable form
///
/// Containers implement the full transition: `freeze` marks the container
/// and then freezes every owned value, so the whole ownership tree below a
/// frozen container is frozen as well. Plain values (strings, numbers) have
/// no lock state of their own; for them `freeze` does nothing and
/// `is_frozen` reports `true`.
pub trait Lockable {
    /// Transition to the frozen state and freeze all owned values
    ///
    /// Idempotent.
    fn freeze(&mut self);

    /// Check whether this value is frozen
    fn is_frozen(&self) -> bool;

    /// Create an independent, fully unlocked deep copy
    fn get_unlocked(&self) -> Self
    where
        Self: Sized;

    /// Check whether this value and everything it owns is frozen
    fn is_deeply_frozen(&self) -> bool {
        self.is_frozen()
    }
}

macro_rules! impl_plain_lockable {
    ($($ty:ty),*) => {
        $(
            impl Lockable for $ty {
                fn freeze(&mut self) {}

                fn is_frozen(&self) -> bool {
                    true
                }

                fn get_unlocked(&self) -> Self {
                    self.clone()
                }
            }
        )*
    };
}

impl_plain_lockable!(
    String, bool, char, f32, f64, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize
);

impl<T: Lockable> Lockable for Option<T> {
    fn freeze(&mut self) {
        if let Some(value) = self {
            value.freeze();
        }
    }

    fn is_frozen(&self) -> bool {
        self.as_ref().map_or(true, Lockable::is_frozen)
    }

    fn get_unlocked(&self) -> Self {
        self.as_ref().map(Lockable::get_unlocked)
    }

    fn is_deeply_frozen(&self) -> bool {
        self.as_ref().map_or(true, Lockable::is_deeply_frozen)
    }
}

impl<T: Lockable> Lockable for Box<T> {
    fn freeze(&mut self) {
        (**self).freeze();
    }

    fn is_frozen(&self) -> bool {
        (**self).is_frozen()
    }

    fn get_unlocked(&self) -> Self {
        Box::new((**self).get_unlocked())
    }

    fn is_deeply_frozen(&self) -> bool {
        (**self).is_deeply_frozen()
    }
}
