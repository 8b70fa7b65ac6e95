//! Fixed-capacity array of optional slots.
//!
//! The backing storage for both open-addressed tables and trie nodes. The
//! length is fixed at construction; growing a table means allocating a new
//! `FixedArray` and reinserting, never resizing in place.

pub struct FixedArray<T> {
    slots: Box<[Option<T>]>,
}

impl<T> FixedArray<T> {
    /// Allocate `len` empty slots.
    pub fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| None).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<&T> {
        self.slots[i].as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, i: usize) -> Option<&mut T> {
        self.slots[i].as_mut()
    }

    /// Occupy slot `i`, returning whatever it previously held.
    #[inline]
    pub fn set(&mut self, i: usize, value: T) -> Option<T> {
        self.slots[i].replace(value)
    }

    /// Vacate slot `i`, returning its contents.
    #[inline]
    pub fn take(&mut self, i: usize) -> Option<T> {
        self.slots[i].take()
    }

    /// All slots in index order, empty ones included.
    pub fn iter(&self) -> impl Iterator<Item = Option<&T>> {
        self.slots.iter().map(|slot| slot.as_ref())
    }

    /// Occupied slots in index order.
    pub fn occupied(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|slot| slot.as_ref())
    }
}

impl<T> IntoIterator for FixedArray<T> {
    type Item = Option<T>;
    type IntoIter = std::vec::IntoIter<Option<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_vec().into_iter()
    }
}
