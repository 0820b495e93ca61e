use crate::types::Event;

/// Sort one user's events by `ts` and cut them into gap-bounded runs.
///
/// The sort is stable, so events sharing a timestamp keep their input order.
/// A run boundary goes before an event whose gap to its predecessor is strictly
/// greater than `gap_threshold`.
pub fn split_into_runs<'a>(events: &[&'a Event], gap_threshold: i64) -> Vec<Vec<&'a Event>> {
    let mut sorted = events.to_vec();
    sorted.sort_by_key(|event| event.ts);

    let mut runs: Vec<Vec<&'a Event>> = Vec::new();
    let mut current: Vec<&'a Event> = Vec::new();

    for event in sorted {
        if let Some(prev) = current.last() {
            // i128 so extreme timestamps cannot overflow the subtraction
            let gap = i128::from(event.ts) - i128::from(prev.ts);
            if gap > i128::from(gap_threshold) {
                runs.push(std::mem::take(&mut current));
            }
        }
        current.push(event);
    }

    if !current.is_empty() {
        runs.push(current);
    }

    runs
}
