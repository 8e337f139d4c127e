use std::collections::HashSet;
use std::rc::Rc;

use crate::host::HostRef;

/// Walks a single-parent "inherits from" relation, nearest link first,
/// stopping at a null terminator or at the first link already collected.
/// Identity, not value, is what the cycle guard compares, so adversarially
/// or accidentally self-referential chains terminate in O(chain length).
///
/// Generic over the link representation: `parent_of` follows the relation,
/// `identity` keys the visited set.
pub fn walk_chain_with<T, P, I>(start: Option<T>, mut parent_of: P, mut identity: I) -> Vec<T>
where
    P: FnMut(&T) -> Option<T>,
    I: FnMut(&T) -> usize,
{
    let mut collected = Vec::new();
    let mut seen = HashSet::new();
    let mut current = start;
    while let Some(link) = current {
        if !seen.insert(identity(&link)) {
            break;
        }
        current = parent_of(&link);
        collected.push(link);
    }
    collected
}

/// The ordered list of distinct prototypes of a host object, from its
/// immediate prototype outward. Empty when the object has no prototype link.
pub fn proto_chain(obj: &HostRef) -> Vec<HostRef> {
    walk_chain_with(
        obj.borrow().proto(),
        |proto| proto.borrow().proto(),
        |proto| Rc::as_ptr(proto) as usize,
    )
}
