//! Partitioning of a height range across parallel fetch workers.

/// Upstream page-size ceiling for one `getBlockHeaders` call.
pub const MAX_HEADERS_PER_REQUEST: u32 = 2000;

/// A contiguous sub-range of heights fetched by one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderRange {
    pub from_height: u32,
    pub count: u32,
}

/// One worker's partition of the overall height range.
///
/// A chunk of `size` heights starting at `from_height` is fetched in pages
/// of `step` headers, with one extra trailing page when `size` is not
/// evenly divisible by `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderChainChunk {
    from_height: u32,
    size: u32,
    step: u32,
}

impl HeaderChainChunk {
    pub fn new(from_height: u32, size: u32, step: u32) -> Self {
        Self {
            from_height,
            size,
            // A zero stride would never advance.
            step: step.max(1),
        }
    }

    pub fn from_height(&self) -> u32 {
        self.from_height
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    /// First height past the chunk.
    pub fn to_height(&self) -> u32 {
        self.from_height + self.size
    }

    /// Remainder not covered by full `step`-sized pages.
    pub fn extra_size(&self) -> u32 {
        self.size % self.step
    }

    /// The page fetches covering this chunk: full pages striding by
    /// `step`, then one trailing page for the remainder.
    pub fn pages(&self) -> Vec<HeaderRange> {
        let full_pages = self.size / self.step;
        let mut pages: Vec<HeaderRange> = (0..full_pages)
            .map(|index| HeaderRange {
                from_height: self.from_height + index * self.step,
                count: self.step,
            })
            .collect();

        let extra = self.extra_size();
        if extra > 0 {
            pages.push(HeaderRange {
                from_height: self.to_height() - extra,
                count: extra,
            });
        }
        pages
    }

    /// Partition `[from_height, tip_height)` into one chunk per peer.
    ///
    /// Every chunk starts at `from_height + chunk_size * index`; the last
    /// chunk absorbs the division remainder, so the union covers the range
    /// exactly with no gap and no overlap. The page size is capped at
    /// `page_ceiling`.
    pub fn partition(
        from_height: u32,
        tip_height: u32,
        peer_count: usize,
        page_ceiling: u32,
    ) -> Vec<HeaderChainChunk> {
        if peer_count == 0 || tip_height <= from_height {
            return Vec::new();
        }

        let peers = peer_count as u32;
        let height_diff = tip_height - from_height;
        let chunk_size = height_diff / peers;
        let step = chunk_size.min(page_ceiling).max(1);

        (0..peers)
            .filter_map(|index| {
                let start = from_height + chunk_size * index;
                let size = if index == peers - 1 {
                    tip_height - start
                } else {
                    chunk_size
                };
                (size > 0).then(|| HeaderChainChunk::new(start, size, step))
            })
            .collect()
    }
}
