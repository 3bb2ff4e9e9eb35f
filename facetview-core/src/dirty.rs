/// Tracks mutable access to a value using a dirty flag.
///
/// The flag is raised whenever the value is reached through `DerefMut` and
/// lowered by [`Dirty::clean`]. Values start out dirty so that the first
/// upload always happens.
#[derive(Debug, Default)]
pub struct Dirty<T> {
    is_clean: bool,
    inner: T,
}

impl<T> Dirty<T> {
    /// Creates a new dirty value.
    pub fn new(inner: T) -> Self {
        Self {
            is_clean: false,
            inner,
        }
    }

    /// Lowers the flag without an update, for values that were just written out whole.
    pub fn mark_clean(this: &mut Self) {
        this.is_clean = true;
    }

    pub fn is_dirty(this: &Self) -> bool {
        !this.is_clean
    }

    /// Marks the value as clean and returns whether it was dirty.
    ///
    /// `update` only runs for a dirty value. If it fails the value stays dirty.
    pub fn clean<E>(this: &mut Self, update: impl FnOnce(&T) -> Result<(), E>) -> Result<bool, E> {
        if this.is_clean {
            return Ok(false);
        }

        update(&this.inner)?;
        this.is_clean = true;

        Ok(true)
    }
}

impl<T: Clone + PartialEq> Dirty<T> {
    /// Mutates the value, dirtying it only if it actually changed.
    pub fn modify(this: &mut Self, callback: impl FnOnce(&mut T)) {
        let mut modified = this.inner.clone();

        callback(&mut modified);

        if this.inner != modified {
            this.inner = modified;
            this.is_clean = false;
        }
    }
}

impl<T: Clone> Clone for Dirty<T> {
    fn clone(&self) -> Self {
        Self::new(self.inner.clone())
    }
}

impl<T> std::ops::Deref for Dirty<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> std::ops::DerefMut for Dirty<T> {
    fn deref_mut(&mut self) -> &mut T {
        self.is_clean = false;
        &mut self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_dirty_and_cleans_once() {
        let mut value = Dirty::new(1);
        let mut runs = 0;

        assert!(Dirty::clean(&mut value, |_| Ok::<_, ()>(runs += 1)).unwrap());
        assert!(!Dirty::clean(&mut value, |_| Ok::<_, ()>(runs += 1)).unwrap());
        assert_eq!(runs, 1);
    }

    #[test]
    fn test_failed_update_stays_dirty() {
        let mut value = Dirty::new(1);
        assert!(Dirty::clean(&mut value, |_| Err("nope")).is_err());
        assert!(Dirty::is_dirty(&value));
    }

    #[test]
    fn test_modify_without_change_stays_clean() {
        let mut value = Dirty::new(5);
        Dirty::clean(&mut value, |_| Ok::<_, ()>(())).unwrap();

        Dirty::modify(&mut value, |v| *v = 5);
        assert!(!Dirty::is_dirty(&value));

        Dirty::modify(&mut value, |v| *v = 6);
        assert!(Dirty::is_dirty(&value));
        assert_eq!(*value, 6);
    }

    #[test]
    fn test_mark_clean_skips_next_update() {
        let mut value = Dirty::new(3);
        Dirty::mark_clean(&mut value);
        assert!(!Dirty::is_dirty(&value));

        let mut runs = 0;
        assert!(!Dirty::clean(&mut value, |_| Ok::<_, ()>(runs += 1)).unwrap());
        assert_eq!(runs, 0);

        *value = 4;
        assert!(Dirty::clean(&mut value, |_| Ok::<_, ()>(runs += 1)).unwrap());
        assert_eq!(runs, 1);
    }

    #[test]
    fn test_deref_mut_dirties() {
        let mut value = Dirty::new(String::from("a"));
        Dirty::clean(&mut value, |_| Ok::<_, ()>(())).unwrap();
        value.push('b');
        assert!(Dirty::is_dirty(&value));
    }
}
