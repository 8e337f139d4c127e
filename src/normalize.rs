use std::rc::Rc;

use tracing::{trace, warn};

use crate::adapters::{
    to_data_transfer, to_gamepad, to_input_capability, to_media_stream, to_touches,
};
use crate::chain::proto_chain;
use crate::combinators::{filter_items, flatten_map, reverse_list};
use crate::env::HostEnv;
use crate::host::{HostClass, HostRef, HostValue};
use crate::keys::{KeyConfig, capitalize, resolve_keys};
use crate::value::{Record, Value};

/// The recursive clone/flatten routine. Type-dispatches on the input's
/// runtime kind: primitives copy unchanged, numeric buffers are copied
/// element-wise, lists recurse per element, the known host families go
/// through their typed adapters, and every other object takes the default
/// path — aggregate property names across the prototype chain and copy each
/// value under its capitalized name.
///
/// Total over well-formed host graphs: absent inputs, prototype-less
/// objects and cyclic chains all produce values, never errors.
pub struct Normalizer<'e> {
    env: &'e dyn HostEnv,
    config: KeyConfig,
}

impl<'e> Normalizer<'e> {
    pub fn new(env: &'e dyn HostEnv) -> Self {
        Self {
            env,
            config: KeyConfig::default(),
        }
    }

    pub fn with_config(env: &'e dyn HostEnv, config: KeyConfig) -> Self {
        Self { env, config }
    }

    pub fn config(&self) -> &KeyConfig {
        &self.config
    }

    pub(crate) fn env(&self) -> &'e dyn HostEnv {
        self.env
    }

    pub fn normalize(&self, value: &HostValue) -> Value {
        // Recursion depth follows the input graph; grow the stack at the
        // entry point.
        stacker::grow(32 * 1024 * 1024, || self.normalize_value(value))
    }

    fn normalize_value(&self, value: &HostValue) -> Value {
        match value {
            HostValue::Undefined | HostValue::Null => Value::Null,
            HostValue::Bool(v) => Value::Bool(*v),
            HostValue::Int(v) => Value::Int(*v),
            HostValue::Float(v) => Value::Float(*v),
            HostValue::Str(v) => Value::Str(v.clone()),
            HostValue::Bytes(bytes) => Value::Bytes(bytes.clone()),
            HostValue::Floats32(floats) => Value::Floats(floats.clone()),
            // Floating buffers narrow to 32-bit whatever the source width.
            HostValue::Floats64(floats) => {
                Value::Floats(floats.iter().map(|&f| f as f32).collect())
            }
            HostValue::List(items) => Value::List(
                items
                    .iter()
                    .map(|item| self.normalize_value(item))
                    .collect(),
            ),
            // Functions never cross the boundary.
            HostValue::Function(_) => Value::Null,
            HostValue::Object(obj) => {
                if let Some(special) = self.special_object(value, obj) {
                    return special;
                }
                if obj.borrow().class().is_node_like() {
                    return Value::Null;
                }
                self.normalize_object(obj)
            }
        }
    }

    /// The closed special-case catalog: families whose meaningful state is
    /// accessor-derived and unreachable by property aggregation.
    fn special_object(&self, value: &HostValue, obj: &HostRef) -> Option<Value> {
        let class = obj.borrow().class().clone();
        match class {
            HostClass::Blob | HostClass::File => Some(self.extracted_bytes(value)),
            HostClass::TouchList => Some(to_touches(value).into_value()),
            HostClass::MediaStream => Some(to_media_stream(value).into_value()),
            HostClass::Gamepad => Some(to_gamepad(value).into_value()),
            HostClass::DataTransfer => Some(to_data_transfer(value, self.env).into_value()),
            HostClass::InputDeviceCapabilities => Some(to_input_capability(value).into_value()),
            _ => None,
        }
    }

    fn extracted_bytes(&self, value: &HostValue) -> Value {
        match self.env.extract_bytes(value) {
            Ok(bytes) => Value::Bytes(bytes),
            Err(err) => {
                warn!(error = %err, "byte extraction failed");
                Value::Unavailable(err.to_string())
            }
        }
    }

    /// Default object path: walk the prototype chain, drop plain-object and
    /// node-like roots, reverse so the farthest ancestor contributes first,
    /// aggregate each root's resolved keys into one list, then copy every
    /// named property off the instance under its capitalized name. Nearer
    /// definitions come later in iteration and overwrite farther ones.
    fn normalize_object(&self, obj: &HostRef) -> Value {
        let instance = obj.borrow();
        trace!(class = instance.class().name(), "normalizing host object");

        let roots = proto_chain(obj);
        // An object rooted in a live DOM type stays a handle; handles are
        // not representable on the far side.
        if roots
            .iter()
            .any(|root| root.borrow().class().is_node_like())
        {
            return Value::Null;
        }

        let root_values: Vec<HostValue> = roots
            .iter()
            .map(|root| HostValue::Object(Rc::clone(root)))
            .collect();
        let named = filter_items(&root_values, |root, _, _| {
            root.type_name().as_deref() != Some("Object")
        });
        let mut root_protos = reverse_list(&named);

        // A declared map/hash points straight at the base constructor; the
        // object itself stands in as the sole root.
        if root_protos.is_empty() {
            root_protos.push(HostValue::Object(Rc::clone(obj)));
        }

        let keys = flatten_map(&root_protos, |root, _, _| {
            let Some(root_obj) = root.as_object() else {
                return HostValue::Undefined;
            };
            let names = resolve_keys(&root_obj.borrow(), &self.config);
            HostValue::List(
                names
                    .into_iter()
                    .filter(|name| !matches!(instance.get(name), HostValue::Function(_)))
                    .map(HostValue::Str)
                    .collect(),
            )
        });

        let mut record = Record::new();
        for key in keys {
            let HostValue::Str(name) = key else {
                continue;
            };
            let value = instance.get(&name);
            record.set_entry(capitalize(&name), self.normalize_property(&value));
        }
        Value::Record(record)
    }

    /// Property values copy shallowly: the dispatch rules apply, except that
    /// an object of no special family yields `Null` instead of a nested
    /// default-path walk.
    fn normalize_property(&self, value: &HostValue) -> Value {
        match value {
            HostValue::Object(obj) => self
                .special_object(value, obj)
                .unwrap_or(Value::Null),
            other => self.normalize_value(other),
        }
    }
}
