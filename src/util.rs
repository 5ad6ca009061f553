/// Mean and population standard deviation.
///
/// Returns NaN for an empty sequence, callers check for emptiness first.
pub fn mean_stdev(sequence: &[f64]) -> (f64, f64) {
    let n = sequence.len() as f64;
    let mean = sequence.iter().sum::<f64>() / n;
    let sq_sum: f64 = sequence.iter().map(|v| (v - mean) * (v - mean)).sum();
    (mean, (sq_sum / n).sqrt())
}

/// Median, averaging the two middle values for an even count.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Element with the most occurrences. Ties go to the one seen first.
pub fn most_frequent<T: PartialEq + Copy>(values: &[T]) -> Option<T> {
    let mut counts: Vec<(T, usize)> = Vec::new();
    for &v in values {
        match counts.iter_mut().find(|(e, _)| *e == v) {
            Some((_, c)) => *c += 1,
            None => counts.push((v, 1)),
        }
    }
    let mut best: Option<(T, usize)> = None;
    for (v, c) in counts {
        if best.is_none_or(|(_, bc)| c > bc) {
            best = Some((v, c));
        }
    }
    best.map(|(v, _)| v)
}
