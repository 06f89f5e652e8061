/// A named vertex channel: a flat `f32` array read `item_size` scalars at a time.
///
/// `version` is bumped whenever the contents change in place. Renderers compare it
/// against the version they last uploaded to decide whether a re-upload is needed.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferAttribute {
    pub array: Vec<f32>,
    pub item_size: usize,
    version: u64,
}

impl BufferAttribute {
    #[inline]
    pub fn new(array: Vec<f32>, item_size: usize) -> Self {
        debug_assert!(item_size > 0, "item_size must be non-zero");
        debug_assert!(
            array.len() % item_size == 0,
            "array length {} is not a multiple of item_size {}",
            array.len(),
            item_size
        );
        Self { array, item_size, version: 0 }
    }

    /// Number of items (vertices) stored in this channel.
    #[inline]
    pub fn count(&self) -> usize {
        self.array.len() / self.item_size
    }

    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Flags the contents as modified.
    #[inline]
    pub fn mark_needs_update(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Overwrites the contents in place and marks the channel dirty.
    ///
    /// # Panics
    /// Panics if `src` does not have the same length as the stored array.
    #[inline]
    pub fn copy_array(&mut self, src: &[f32]) {
        self.array.copy_from_slice(src);
        self.mark_needs_update();
    }

    /// Returns item `i` as a slice of `item_size` scalars.
    #[inline]
    pub fn item(&self, i: usize) -> Option<&[f32]> {
        let start = i.checked_mul(self.item_size)?;
        self.array.get(start..start + self.item_size)
    }
}

/// Triangle index channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexBuffer {
    pub array: Vec<u32>,
    version: u64,
}

impl IndexBuffer {
    #[inline]
    pub fn new(array: Vec<u32>) -> Self {
        Self { array, version: 0 }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.array.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[inline]
    pub fn mark_needs_update(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// # Panics
    /// Panics if `src` does not have the same length as the stored array.
    #[inline]
    pub fn copy_array(&mut self, src: &[u32]) {
        self.array.copy_from_slice(src);
        self.mark_needs_update();
    }
}
