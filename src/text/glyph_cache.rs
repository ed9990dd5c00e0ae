use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::face::GlyphMetrics;

/// Rasterized coverage of a single character.
pub struct RasterGlyph {
    pub metrics: GlyphMetrics,
    pub coverage: Vec<u8>,
}

#[derive(Default, Clone, Copy)]
struct LruNode {
    newer: Option<usize>,
    older: Option<usize>,
}

/// Bounded least-recently-used cache of rasterized glyphs for one face.
///
/// Animated playback redraws the same page many times, so glyphs are
/// rasterized once and then looked up by character.
pub struct GlyphCache {
    capacity: usize,
    slots: Vec<Option<(char, Arc<RasterGlyph>)>>,

    lru_nodes: Vec<LruNode>,
    lru_head: Option<usize>,
    lru_tail: Option<usize>,
    lru_map: HashMap<char, usize, fxhash::FxBuildHasher>,
    lru_empties: Vec<usize>,
}

impl GlyphCache {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new(capacity: NonZeroUsize) -> Self {
        let capacity = capacity.get();

        Self {
            capacity,
            slots: vec![None; capacity],
            lru_nodes: vec![LruNode::default(); capacity],
            lru_head: None,
            lru_tail: None,
            lru_map: HashMap::with_capacity_and_hasher(capacity, fxhash::FxBuildHasher::default()),
            lru_empties: (0..capacity).collect(),
        }
    }

    pub fn clear(&mut self) {
        self.lru_map.clear();
        self.lru_empties = (0..self.capacity).collect();
        self.slots.fill(None);
        self.lru_head = None;
        self.lru_tail = None;
    }

    pub fn len(&self) -> usize {
        self.lru_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lru_map.is_empty()
    }

    pub fn contains(&self, ch: char) -> bool {
        self.lru_map.contains_key(&ch)
    }

    /// Cached glyph for `ch`, rasterizing it with `f` on a miss.
    pub fn get_or_insert_with(
        &mut self,
        ch: char,
        f: impl FnOnce() -> RasterGlyph,
    ) -> Arc<RasterGlyph> {
        if let Some(index) = self.lru_map.get(&ch).copied()
            && let Some((_, glyph)) = &self.slots[index]
        {
            let glyph = Arc::clone(glyph);
            self.move_to_front(index);
            return glyph;
        }

        let index = self.push_front(ch);
        let glyph = Arc::new(f());
        self.slots[index] = Some((ch, Arc::clone(&glyph)));
        glyph
    }
}

/// internal helpers
impl GlyphCache {
    fn attach_to_head(&mut self, node_idx: usize, key: char) {
        self.lru_nodes[node_idx].newer = None;
        self.lru_nodes[node_idx].older = self.lru_head;
        self.lru_map.insert(key, node_idx);

        if let Some(old_head_idx) = self.lru_head {
            self.lru_nodes[old_head_idx].newer = Some(node_idx);
        }

        self.lru_head = Some(node_idx);
        if self.lru_tail.is_none() {
            self.lru_tail = Some(node_idx);
        }
    }

    fn detach_tail(&mut self) -> Option<usize> {
        let tail_idx = self.lru_tail?;

        if let Some(second_tail) = self.lru_nodes[tail_idx].newer {
            self.lru_nodes[second_tail].older = None;
            self.lru_tail = Some(second_tail);
        } else {
            // tail == head (capacity 1)
            self.lru_head = None;
            self.lru_tail = None;
        }

        if let Some((old_key, _)) = self.slots[tail_idx].take() {
            self.lru_map.remove(&old_key);
        }

        Some(tail_idx)
    }

    fn push_front(&mut self, key: char) -> usize {
        let target_idx = match self.lru_empties.pop() {
            Some(idx) => idx,
            // all slots are used; capacity is non-zero so a tail exists
            None => self.detach_tail().unwrap_or(0),
        };

        self.attach_to_head(target_idx, key);
        target_idx
    }

    fn move_to_front(&mut self, current_index: usize) {
        let older_idx = self.lru_nodes[current_index].older;
        let newer_idx = self.lru_nodes[current_index].newer;

        let Some(newer_idx) = newer_idx else {
            // already at head
            return;
        };

        // unlink
        self.lru_nodes[newer_idx].older = older_idx;
        match older_idx {
            Some(older_idx) => self.lru_nodes[older_idx].newer = Some(newer_idx),
            None => self.lru_tail = Some(newer_idx),
        }

        // relink at head
        if let Some(old_head_idx) = self.lru_head {
            self.lru_nodes[old_head_idx].newer = Some(current_index);
        }
        self.lru_nodes[current_index].older = self.lru_head;
        self.lru_nodes[current_index].newer = None;
        self.lru_head = Some(current_index);
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(width: usize) -> RasterGlyph {
        RasterGlyph {
            metrics: GlyphMetrics {
                width,
                height: 1,
                ..Default::default()
            },
            coverage: vec![255; width],
        }
    }

    #[test]
    fn caches_on_first_use() {
        let mut cache = GlyphCache::new(NonZeroUsize::new(2).unwrap());

        let g = cache.get_or_insert_with('a', || glyph(4));
        assert_eq!(g.metrics.width, 4);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lru_head, Some(1)); // empties pop from the back
        assert_eq!(cache.lru_tail, Some(1));

        let g = cache.get_or_insert_with('a', || glyph(9));
        assert_eq!(g.metrics.width, 4);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut cache = GlyphCache::new(NonZeroUsize::new(2).unwrap());

        cache.get_or_insert_with('a', || glyph(1));
        cache.get_or_insert_with('b', || glyph(2));
        assert_eq!(cache.lru_head, Some(0));
        assert_eq!(cache.lru_tail, Some(1));
        assert_eq!(cache.lru_nodes[0].older, Some(1));
        assert_eq!(cache.lru_nodes[1].newer, Some(0));

        cache.get_or_insert_with('c', || glyph(3));
        assert_eq!(cache.len(), 2);
        assert!(cache.contains('b'));
        assert!(cache.contains('c'));
        assert!(!cache.contains('a'));

        // slot 1 reused for 'c'
        assert_eq!(cache.lru_head, Some(1));
        assert_eq!(cache.lru_tail, Some(0));
    }

    #[test]
    fn hit_moves_to_front() {
        let mut cache = GlyphCache::new(NonZeroUsize::new(3).unwrap());

        cache.get_or_insert_with('a', || glyph(1)); // slot 2
        cache.get_or_insert_with('b', || glyph(1)); // slot 1
        cache.get_or_insert_with('c', || glyph(1)); // slot 0

        cache.get_or_insert_with('a', || glyph(99));

        let head = cache.lru_head.unwrap();
        let tail = cache.lru_tail.unwrap();
        assert_eq!(head, 2);
        assert_eq!(tail, 1);
        assert_eq!(cache.lru_nodes[head].older, Some(0));

        // 'b' is now the eviction candidate
        cache.get_or_insert_with('d', || glyph(1));
        assert!(!cache.contains('b'));
        assert!(cache.contains('a'));
    }

    #[test]
    fn capacity_one() {
        let mut cache = GlyphCache::new(NonZeroUsize::new(1).unwrap());

        cache.get_or_insert_with('a', || glyph(1));
        cache.get_or_insert_with('b', || glyph(1));
        assert_eq!(cache.lru_head, Some(0));
        assert_eq!(cache.lru_tail, Some(0));
        assert!(cache.contains('b'));
        assert!(!cache.contains('a'));
    }

    #[test]
    fn clear_resets_everything() {
        let mut cache = GlyphCache::new(NonZeroUsize::new(2).unwrap());
        cache.get_or_insert_with('a', || glyph(1));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.lru_head, None);
        let g = cache.get_or_insert_with('a', || glyph(7));
        assert_eq!(g.metrics.width, 7);
    }
}
