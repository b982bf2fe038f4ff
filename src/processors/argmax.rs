//! Reduction of a classifier output vector to its best class.

/// Index and value of the largest element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArgmaxResult {
    pub index: usize,
    pub score: f32,
}

/// Returns the position of the maximum value in `scores`.
///
/// Uses strict `>` so the first occurrence wins on ties. NaN values never
/// win. Returns `None` for an empty slice.
///
/// ```rust
/// use image_pred::processors::argmax;
///
/// let best = argmax(&[0.1, 0.7, 0.2]).unwrap();
/// assert_eq!(best.index, 1);
/// ```
pub fn argmax(scores: &[f32]) -> Option<ArgmaxResult> {
    let (&first, rest) = scores.split_first()?;
    let mut best = ArgmaxResult {
        index: 0,
        score: first,
    };
    for (offset, &score) in rest.iter().enumerate() {
        if score > best.score || (best.score.is_nan() && !score.is_nan()) {
            best = ArgmaxResult {
                index: offset + 1,
                score,
            };
        }
    }
    Some(best)
}
