/// Indices of samples strictly greater than both neighbours.
///
/// The first and last samples are never extrema; plateaus produce none.
pub fn strict_local_maxima(data: &[f64]) -> Vec<usize> {
    if data.len() < 3 {
        return Vec::new();
    }
    (1..data.len() - 1)
        .filter(|&i| data[i] > data[i - 1] && data[i] > data[i + 1])
        .collect()
}

/// Indices of samples strictly smaller than both neighbours.
pub fn strict_local_minima(data: &[f64]) -> Vec<usize> {
    if data.len() < 3 {
        return Vec::new();
    }
    (1..data.len() - 1)
        .filter(|&i| data[i] < data[i - 1] && data[i] < data[i + 1])
        .collect()
}
