//! Small higher-order utilities used to compose property-resolver output
//! across prototypes. The "push the original on a truthy result" and "splice
//! list results" semantics are what the normalizer's key aggregation relies
//! on; each has its own unit test.

use crate::host::HostValue;

/// Keeps the items for which the predicate is truthy, preserving order. The
/// predicate sees `(value, index, items)`.
pub fn filter_items<F>(items: &[HostValue], mut predicate: F) -> Vec<HostValue>
where
    F: FnMut(&HostValue, usize, &[HostValue]) -> bool,
{
    let mut filtered = Vec::new();
    for (index, item) in items.iter().enumerate() {
        if predicate(item, index, items) {
            filtered.push(item.clone());
        }
    }
    filtered
}

/// Truthy-gated copy, not a transform: an item is included only when the
/// callback's result is truthy, and the *original* item is pushed, never the
/// callback's return value.
pub fn map_items<F>(items: &[HostValue], mut f: F) -> Vec<HostValue>
where
    F: FnMut(&HostValue, usize, &[HostValue]) -> HostValue,
{
    let mut mapped = Vec::new();
    for (index, item) in items.iter().enumerate() {
        if f(item, index, items).truthy() {
            mapped.push(item.clone());
        }
    }
    mapped
}

/// Like [`map_items`], except a `List` result is spliced element-wise in
/// place of the original item. Any other truthy result keeps the original;
/// a falsy result skips it.
pub fn flatten_map<F>(items: &[HostValue], mut f: F) -> Vec<HostValue>
where
    F: FnMut(&HostValue, usize, &[HostValue]) -> HostValue,
{
    let mut mapped = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let result = f(item, index, items);
        if !result.truthy() {
            continue;
        }
        match result {
            HostValue::List(elements) => mapped.extend(elements),
            _ => mapped.push(item.clone()),
        }
    }
    mapped
}

/// Full reversal into a new list, first element included.
pub fn reverse_list(items: &[HostValue]) -> Vec<HostValue> {
    items.iter().rev().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i64]) -> Vec<HostValue> {
        values.iter().map(|&v| HostValue::Int(v)).collect()
    }

    #[test]
    fn filter_keeps_order() {
        let items = ints(&[1, 2, 3, 4]);
        let even = filter_items(&items, |item, _, _| item.as_i64() % 2 == 0);
        assert_eq!(even, ints(&[2, 4]));
    }

    #[test]
    fn filter_predicate_sees_index_and_container() {
        let items = ints(&[10, 20, 30]);
        let tail = filter_items(&items, |_, index, all| index + 1 == all.len());
        assert_eq!(tail, ints(&[30]));
    }

    #[test]
    fn map_pushes_original_not_callback_result() {
        let items = ints(&[1, 0, 3]);
        // Callback returns a marker value; the output must still hold the
        // original items, gated on the marker's truthiness.
        let kept = map_items(&items, |item, _, _| {
            if item.truthy() {
                HostValue::Str("marker".into())
            } else {
                HostValue::Undefined
            }
        });
        assert_eq!(kept, ints(&[1, 3]));
    }

    #[test]
    fn map_skips_on_falsy_result() {
        let items = ints(&[5, 6]);
        let kept = map_items(&items, |_, _, _| HostValue::Str(String::new()));
        assert!(kept.is_empty());
    }

    #[test]
    fn flatten_map_splices_list_results() {
        let items = ints(&[1, 2]);
        let flat = flatten_map(&items, |item, _, _| {
            HostValue::List(vec![
                HostValue::Int(item.as_i64() * 10),
                HostValue::Int(item.as_i64() * 10 + 1),
            ])
        });
        assert_eq!(flat, ints(&[10, 11, 20, 21]));
    }

    #[test]
    fn flatten_map_keeps_original_for_non_list_truthy_results() {
        let items = ints(&[7]);
        let flat = flatten_map(&items, |_, _, _| HostValue::Bool(true));
        assert_eq!(flat, ints(&[7]));
    }

    #[test]
    fn flatten_map_skips_falsy_and_splices_empty_lists_to_nothing() {
        let items = ints(&[1, 2, 3]);
        let flat = flatten_map(&items, |item, _, _| match item.as_i64() {
            1 => HostValue::Undefined,
            2 => HostValue::List(Vec::new()),
            _ => HostValue::List(vec![HostValue::Int(9)]),
        });
        assert_eq!(flat, ints(&[9]));
    }

    #[test]
    fn reverse_is_complete() {
        let items = ints(&[1, 2, 3]);
        assert_eq!(reverse_list(&items), ints(&[3, 2, 1]));
        assert!(reverse_list(&[]).is_empty());
        assert_eq!(reverse_list(&ints(&[4])), ints(&[4]));
    }
}
