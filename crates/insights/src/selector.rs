/// Smallest subset size a slug can ask for.
pub const MIN_SELECTION: usize = 5;
/// Largest subset size a slug can ask for.
pub const MAX_SELECTION: usize = MIN_SELECTION + SELECTION_SPREAD as usize - 1;

const SELECTION_SPREAD: u32 = 11;

// LCG constants; changing any of them changes every route's comment subset.
const LCG_MULTIPLIER: u64 = 9301;
const LCG_INCREMENT: u64 = 49297;
const LCG_MODULUS: u64 = 233_280;

/// Rolling `h * 31 + unit` hash over UTF-16 code units with 32-bit
/// two's-complement wrap, returned as an absolute value.
///
/// `i32::MIN` has no positive counterpart in `i32`, so the absolute value is
/// taken into `u32` (`2147483648`).
pub fn slug_hash(slug: &str) -> u32 {
    slug.encode_utf16()
        .fold(0i32, |hash, unit| {
            (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit))
        })
        .unsigned_abs()
}

/// Number of comments a slug with this hash wants shown, in `5..=15`.
pub fn target_count(hash: u32) -> usize {
    MIN_SELECTION + (hash % SELECTION_SPREAD) as usize
}

/// Permutation of `0..len` produced by a Fisher-Yates pass driven by a
/// linear congruential generator seeded with `seed`.
pub fn shuffled_indices(len: usize, seed: u32) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..len).collect();
    let mut state = u64::from(seed);

    for i in (1..len).rev() {
        state = (state * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        let r = state as f64 / LCG_MODULUS as f64;
        let j = ((r * (i + 1) as f64).floor() as usize).min(i);
        indices.swap(i, j);
    }

    indices
}

/// Selects the comments shown for a route.
///
/// The same `items` and `slug` always give the same subset, in the order the
/// items appear in `items`.
pub fn select_for_route<'a, T>(items: &'a [T], slug: &str) -> Vec<&'a T> {
    selected_positions(items.len(), slug)
        .into_iter()
        .map(|idx| &items[idx])
        .collect()
}

/// Owning variant of [`select_for_route`].
pub fn select_for_route_cloned<T: Clone>(items: &[T], slug: &str) -> Vec<T> {
    select_for_route(items, slug).into_iter().cloned().collect()
}

fn selected_positions(len: usize, slug: &str) -> Vec<usize> {
    let hash = slug_hash(slug);
    let mut chosen = shuffled_indices(len, hash);
    chosen.truncate(target_count(hash));
    chosen.sort_unstable();
    chosen
}
