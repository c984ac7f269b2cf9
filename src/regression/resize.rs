/// Fits `embedding` to exactly `target_size` values.
///
/// Longer vectors keep their first `target_size` entries; shorter ones are
/// zero-padded on the right. The projection is lossy: padding a truncated
/// vector back out does not recover the dropped tail.
///
/// ```
/// use grader::regression::resize_embedding;
///
/// assert_eq!(resize_embedding(vec![1.0, 2.0, 3.0], 2), vec![1.0, 2.0]);
/// assert_eq!(resize_embedding(vec![1.0], 3), vec![1.0, 0.0, 0.0]);
/// ```
pub fn resize_embedding(mut embedding: Vec<f32>, target_size: usize) -> Vec<f32> {
    embedding.resize(target_size, 0.0);
    embedding
}
