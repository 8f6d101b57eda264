use super::Loc;

/// A set of heap locations, one bit per slot.
///
/// Grows on demand; the normalizer uses it to remember which slots it has
/// already brought to normal form.
#[derive(Clone, Debug, Default)]
pub struct BitSet {
    count: usize,
    data: Vec<u64>,
}

impl BitSet {
    /// Creates a new, empty bitset.
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates an empty bitset with room for `slots` locations.
    pub fn with_capacity(slots: usize) -> Self {
        BitSet {
            count: 0,
            data: Vec::with_capacity(slots.div_ceil(Self::BITS_PER_WORD)),
        }
    }

    const BITS_PER_WORD: usize = u64::BITS as usize;

    fn split(loc: Loc) -> (usize, u64) {
        let loc = loc as usize;
        (loc / Self::BITS_PER_WORD, 1 << (loc % Self::BITS_PER_WORD))
    }

    /// Whether the location is in the set.
    pub fn contains(&self, loc: Loc) -> bool {
        let (word, mask) = Self::split(loc);
        self.data.get(word).is_some_and(|w| w & mask != 0)
    }

    /// Adds the location; returns false if it was already present.
    pub fn insert(&mut self, loc: Loc) -> bool {
        let (word, mask) = Self::split(loc);
        if word >= self.data.len() {
            self.data.resize(word + 1, 0);
        }
        if self.data[word] & mask != 0 {
            return false;
        }
        self.data[word] |= mask;
        self.count += 1;
        true
    }

    /// Removes the location; returns false if it was not present.
    pub fn remove(&mut self, loc: Loc) -> bool {
        let (word, mask) = Self::split(loc);
        match self.data.get_mut(word) {
            Some(w) if *w & mask != 0 => {
                *w &= !mask;
                self.count -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
