use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Shared handle to a host object. Identity (not value) is what the chain
/// walker and the property lookup compare, so cyclic and repeated prototype
/// links terminate.
pub type HostRef = Rc<RefCell<HostObject>>;

/// A borrowed snapshot of a host-runtime value. The crate never mutates host
/// values and never executes host behavior; functions are carried by name
/// only and are never invoked.
#[derive(Debug, Clone)]
pub enum HostValue {
    Undefined,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Floats32(Vec<f32>),
    Floats64(Vec<f64>),
    List(Vec<HostValue>),
    Object(HostRef),
    Function(String),
}

/// Runtime-constructor identity of a host object. Dispatch happens on this
/// tag rather than on string comparison; `Named` covers every host type
/// outside the closed special-case set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostClass {
    /// A declared map/hash pointing straight at the base object constructor.
    Plain,
    Element,
    Node,
    NodeList,
    Document,
    HtmlElement,
    HtmlDocument,
    Blob,
    File,
    TouchList,
    MediaStream,
    Gamepad,
    DataTransfer,
    InputDeviceCapabilities,
    MutationRecord,
    Named(String),
}

impl HostClass {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Object" => Self::Plain,
            "Element" => Self::Element,
            "Node" => Self::Node,
            "NodeList" => Self::NodeList,
            "Document" => Self::Document,
            "HTMLElement" => Self::HtmlElement,
            "HTMLDocument" => Self::HtmlDocument,
            "Blob" => Self::Blob,
            "File" => Self::File,
            "TouchList" => Self::TouchList,
            "MediaStream" => Self::MediaStream,
            "Gamepad" => Self::Gamepad,
            "DataTransfer" => Self::DataTransfer,
            "InputDeviceCapabilities" => Self::InputDeviceCapabilities,
            "MutationRecord" => Self::MutationRecord,
            other => Self::Named(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Plain => "Object",
            Self::Element => "Element",
            Self::Node => "Node",
            Self::NodeList => "NodeList",
            Self::Document => "Document",
            Self::HtmlElement => "HTMLElement",
            Self::HtmlDocument => "HTMLDocument",
            Self::Blob => "Blob",
            Self::File => "File",
            Self::TouchList => "TouchList",
            Self::MediaStream => "MediaStream",
            Self::Gamepad => "Gamepad",
            Self::DataTransfer => "DataTransfer",
            Self::InputDeviceCapabilities => "InputDeviceCapabilities",
            Self::MutationRecord => "MutationRecord",
            Self::Named(name) => name,
        }
    }

    /// Live DOM handles. These never cross the boundary; the normalizer
    /// drops them to `Value::Null`.
    pub fn is_node_like(&self) -> bool {
        matches!(
            self,
            Self::Element
                | Self::Node
                | Self::NodeList
                | Self::Document
                | Self::HtmlElement
                | Self::HtmlDocument
        )
    }
}

impl Default for HostClass {
    fn default() -> Self {
        Self::Plain
    }
}

/// Which enumeration APIs the host exposes for an object. Environments differ
/// in which reflection capability is available; the property resolver
/// degrades through its strategy ladder based on these flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reflection {
    /// All own property names, including non-enumerable ones.
    pub own_names: bool,
    /// Own enumerable property names only.
    pub own_keys: bool,
}

impl Default for Reflection {
    fn default() -> Self {
        Self {
            own_names: true,
            own_keys: true,
        }
    }
}

/// An externally-owned host object: a class tag, a single-parent prototype
/// link, and an ordered own-property list. Repeated inserts overwrite in
/// place, preserving the original position.
#[derive(Debug, Default)]
pub struct HostObject {
    class: HostClass,
    proto: Option<HostRef>,
    constructor_proto: Option<HostRef>,
    entries: Vec<(String, HostValue)>,
    index_by_key: HashMap<String, usize>,
    non_enumerable: HashSet<String>,
    reflection: Reflection,
}

impl HostObject {
    pub fn of_class(class: HostClass) -> Self {
        Self {
            class,
            ..Self::default()
        }
    }

    /// Object whose constructor resolves to the named host type. Known
    /// special names map onto their dedicated class tags.
    pub fn named(name: &str) -> Self {
        Self::of_class(HostClass::from_name(name))
    }

    /// A declared map/hash with no meaningful constructor.
    pub fn plain() -> Self {
        Self::of_class(HostClass::Plain)
    }

    pub fn class(&self) -> &HostClass {
        &self.class
    }

    pub fn proto(&self) -> Option<HostRef> {
        self.proto.clone()
    }

    pub fn constructor_proto(&self) -> Option<HostRef> {
        self.constructor_proto.clone()
    }

    pub fn reflection(&self) -> Reflection {
        self.reflection
    }

    pub fn set(&mut self, key: &str, value: HostValue) {
        if let Some(index) = self.index_by_key.get(key).copied() {
            if let Some((_, existing)) = self.entries.get_mut(index) {
                *existing = value;
                return;
            }
        }
        let index = self.entries.len();
        self.entries.push((key.to_string(), value));
        self.index_by_key.insert(key.to_string(), index);
    }

    pub fn set_proto(&mut self, proto: Option<HostRef>) {
        self.proto = proto;
    }

    pub fn set_constructor_proto(&mut self, proto: Option<HostRef>) {
        self.constructor_proto = proto;
    }

    pub fn set_reflection(&mut self, reflection: Reflection) {
        self.reflection = reflection;
    }

    pub fn mark_non_enumerable(&mut self, key: &str) {
        self.non_enumerable.insert(key.to_string());
    }

    pub fn with(mut self, key: &str, value: HostValue) -> Self {
        self.set(key, value);
        self
    }

    pub fn with_non_enumerable(mut self, key: &str, value: HostValue) -> Self {
        self.set(key, value);
        self.mark_non_enumerable(key);
        self
    }

    pub fn with_proto(mut self, proto: &HostRef) -> Self {
        self.proto = Some(Rc::clone(proto));
        self
    }

    pub fn with_constructor_proto(mut self, proto: &HostRef) -> Self {
        self.constructor_proto = Some(Rc::clone(proto));
        self
    }

    pub fn with_reflection(mut self, reflection: Reflection) -> Self {
        self.reflection = reflection;
        self
    }

    pub fn into_ref(self) -> HostRef {
        Rc::new(RefCell::new(self))
    }

    pub fn into_value(self) -> HostValue {
        HostValue::Object(self.into_ref())
    }

    pub fn own(&self, key: &str) -> Option<&HostValue> {
        self.index_by_key
            .get(key)
            .and_then(|index| self.entries.get(*index))
            .map(|(_, value)| value)
    }

    /// All own property names in insertion order, non-enumerable included.
    pub fn own_names(&self) -> Vec<String> {
        self.entries.iter().map(|(key, _)| key.clone()).collect()
    }

    /// Own enumerable property names in insertion order.
    pub fn own_enumerable_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(key, _)| !self.non_enumerable.contains(key))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Reads a property through the prototype chain, nearest definition
    /// first. Cyclic chains terminate via pointer identity; a missing
    /// property reads as `Undefined`.
    pub fn get(&self, key: &str) -> HostValue {
        if let Some(value) = self.own(key) {
            return value.clone();
        }
        let mut seen = HashSet::new();
        let mut current = self.proto.clone();
        while let Some(proto) = current {
            if !seen.insert(Rc::as_ptr(&proto) as usize) {
                break;
            }
            let proto = proto.borrow();
            if let Some(value) = proto.own(key) {
                return value.clone();
            }
            current = proto.proto.clone();
        }
        HostValue::Undefined
    }
}

impl HostValue {
    /// Truthiness with host-runtime semantics: empty strings, zero numbers,
    /// `Null` and `Undefined` are falsy; containers are truthy even when
    /// empty.
    pub fn truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(v) => *v,
            Self::Int(v) => *v != 0,
            Self::Float(v) => *v != 0.0 && !v.is_nan(),
            Self::Str(v) => !v.is_empty(),
            Self::Bytes(_)
            | Self::Floats32(_)
            | Self::Floats64(_)
            | Self::List(_)
            | Self::Object(_)
            | Self::Function(_) => true,
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    /// Runtime type name, the way the original probed constructor identity.
    /// `Undefined` and `Null` have none.
    pub fn type_name(&self) -> Option<String> {
        match self {
            Self::Undefined | Self::Null => None,
            Self::Bool(_) => Some("Boolean".to_string()),
            Self::Int(_) | Self::Float(_) => Some("Number".to_string()),
            Self::Str(_) => Some("String".to_string()),
            Self::Bytes(_) => Some("Uint8Array".to_string()),
            Self::Floats32(_) => Some("Float32Array".to_string()),
            Self::Floats64(_) => Some("Float64Array".to_string()),
            Self::List(_) => Some("Array".to_string()),
            Self::Object(obj) => Some(obj.borrow().class().name().to_string()),
            Self::Function(_) => Some("Function".to_string()),
        }
    }

    pub fn as_object(&self) -> Option<&HostRef> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[HostValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Lenient numeric read used by the typed adapters: missing or
    /// non-numeric data reads as zero, never as a failure.
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Int(v) => *v as f64,
            Self::Float(v) => *v,
            _ => 0.0,
        }
    }

    pub fn as_i64(&self) -> i64 {
        match self {
            Self::Int(v) => *v,
            Self::Float(v) => *v as i64,
            _ => 0,
        }
    }

    pub fn as_bool(&self) -> bool {
        matches!(self, Self::Bool(true))
    }

    pub fn as_str(&self) -> String {
        match self {
            Self::Str(v) => v.clone(),
            _ => String::new(),
        }
    }
}

impl PartialEq for HostValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Floats32(a), Self::Floats32(b)) => a == b,
            (Self::Floats64(a), Self::Floats64(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            // Objects compare by identity; value comparison cannot terminate
            // on cyclic graphs.
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            (Self::Function(a), Self::Function(b)) => a == b,
            _ => false,
        }
    }
}
