use std::collections::HashSet;
use std::rc::Rc;

use tracing::debug;

use crate::host::HostObject;

/// Property names excluded from every normalized record, passed explicitly
/// into the resolver rather than living in module state.
#[derive(Debug, Clone)]
pub struct KeyConfig {
    deny: HashSet<String>,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            deny: ["constructor", "toString"]
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

impl KeyConfig {
    pub fn new<I, S>(deny: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            deny: deny.into_iter().map(Into::into).collect(),
        }
    }

    pub fn deny(&mut self, name: &str) {
        self.deny.insert(name.to_string());
    }

    pub fn is_denied(&self, name: &str) -> bool {
        self.deny.contains(name)
    }
}

/// ALL-UPPERCASE names are constant-like declarations, not instance data.
pub fn is_constant_name(name: &str) -> bool {
    name.to_uppercase() == name
}

/// Uppercases the first character, leaving the remainder unchanged. Identity
/// on the empty string.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Resolves the ordered set of distinct property names to copy from an
/// object. Host environments differ in which reflection capability is
/// available, so the resolver degrades through a strategy ladder and takes
/// the first non-empty result:
///
/// 1. all own names, non-enumerable included;
/// 2. own enumerable names;
/// 3. a manual own-plus-inherited enumerable walk;
/// 4. the prototype's own names;
/// 5. the constructor prototype's own names.
///
/// The result is filtered against the deny-list and the constant-name
/// heuristic. When every strategy comes up empty the resolver returns an
/// empty list, never an error.
pub fn resolve_keys(obj: &HostObject, config: &KeyConfig) -> Vec<String> {
    let raw = raw_keys(obj);
    if raw.is_empty() {
        debug!(class = obj.class().name(), "no resolvable property names");
        return raw;
    }

    let mut seen = HashSet::new();
    raw.into_iter()
        .filter(|key| seen.insert(key.clone()))
        .filter(|key| !config.is_denied(key) && !is_constant_name(key))
        .collect()
}

fn raw_keys(obj: &HostObject) -> Vec<String> {
    let reflection = obj.reflection();

    if reflection.own_names {
        let names = obj.own_names();
        if !names.is_empty() {
            return names;
        }
    }

    if reflection.own_keys {
        let names = obj.own_enumerable_names();
        if !names.is_empty() {
            return names;
        }
    }

    let names = enumerable_walk(obj);
    if !names.is_empty() {
        return names;
    }

    if let Some(proto) = obj.proto() {
        let names = proto.borrow().own_names();
        if !names.is_empty() {
            return names;
        }
    }

    if let Some(proto) = obj.constructor_proto() {
        let names = proto.borrow().own_names();
        if !names.is_empty() {
            return names;
        }
    }

    Vec::new()
}

/// Own enumerable names followed by inherited enumerable names, chain order,
/// with the same identity-keyed cycle guard the walker uses.
fn enumerable_walk(obj: &HostObject) -> Vec<String> {
    let mut names = obj.own_enumerable_names();
    let mut seen = HashSet::new();
    let mut current = obj.proto();
    while let Some(proto) = current {
        if !seen.insert(Rc::as_ptr(&proto) as usize) {
            break;
        }
        let proto = proto.borrow();
        names.extend(proto.own_enumerable_names());
        current = proto.proto();
    }
    names
}
