use tracing::trace;

use crate::adapters::{to_motion_data, to_rotation_data};
use crate::env::HostEnv;
use crate::host::{HostClass, HostRef, HostValue};
use crate::keys::KeyConfig;
use crate::normalize::Normalizer;
use crate::value::{Record, Value};

/// Dispatches an incoming host event against a fixed, closed set of known
/// event constructors. Mutation records get their node-reference fields
/// re-written through the HTML stringification collaborator; device sensor
/// events get purpose-built records; everything else falls through to the
/// deep normalizer.
pub struct Classifier<'e> {
    normalizer: Normalizer<'e>,
}

impl<'e> Classifier<'e> {
    pub fn new(env: &'e dyn HostEnv) -> Self {
        Self {
            normalizer: Normalizer::new(env),
        }
    }

    pub fn with_config(env: &'e dyn HostEnv, config: KeyConfig) -> Self {
        Self {
            normalizer: Normalizer::with_config(env, config),
        }
    }

    pub fn normalizer(&self) -> &Normalizer<'e> {
        &self.normalizer
    }

    pub fn classify(&self, event: &HostValue) -> Value {
        let Some(obj) = event.as_object() else {
            return self.normalizer.normalize(event);
        };
        let class = obj.borrow().class().clone();
        trace!(class = class.name(), "classifying host event");
        match &class {
            HostClass::MutationRecord => self.mutation_record(event, obj),
            // Media-stream events fall through: the normalizer's own class
            // dispatch reaches the media-stream adapter.
            HostClass::MediaStream => self.normalizer.normalize(event),
            HostClass::Named(name) if name == "DeviceMotionEvent" => self.device_motion(obj),
            HostClass::Named(name) if name == "DeviceOrientationEvent" => {
                self.device_orientation(event, obj)
            }
            _ => self.normalizer.normalize(event),
        }
    }

    /// Deep-normalize first, then overwrite the four node-reference fields
    /// with markup text read off the live event: node lists become lists of
    /// markup strings (original order, falsy results skipped), siblings
    /// become a single string or `Null`.
    fn mutation_record(&self, event: &HostValue, obj: &HostRef) -> Value {
        let mut record = match self.normalizer.normalize(event) {
            Value::Record(record) => record,
            other => return other,
        };

        let (added, removed, previous, next) = {
            let obj = obj.borrow();
            (
                obj.get("addedNodes"),
                obj.get("removedNodes"),
                obj.get("previousSibling"),
                obj.get("nextSibling"),
            )
        };

        record.set_entry("AddedNodes".to_string(), self.markup_list(&added));
        record.set_entry("RemovedNodes".to_string(), self.markup_list(&removed));
        record.set_entry("PreviousSibling".to_string(), self.markup(&previous));
        record.set_entry("NextSibling".to_string(), self.markup(&next));
        Value::Record(record)
    }

    fn markup_list(&self, nodes: &HostValue) -> Value {
        let Some(items) = nodes.as_list() else {
            return Value::List(Vec::new());
        };
        let mut markup = Vec::new();
        for node in items {
            // Falsy stringification results are skipped, the same truthy
            // gate map_items applies.
            match self.normalizer.env().stringify_html(node, true) {
                Some(text) if !text.is_empty() => markup.push(Value::Str(text)),
                _ => {}
            }
        }
        Value::List(markup)
    }

    fn markup(&self, node: &HostValue) -> Value {
        if node.is_nullish() {
            return Value::Null;
        }
        match self.normalizer.env().stringify_html(node, true) {
            Some(text) => Value::Str(text),
            None => Value::Null,
        }
    }

    fn device_motion(&self, obj: &HostRef) -> Value {
        let obj = obj.borrow();
        Value::Record(Record::from(vec![
            (
                "Interval".to_string(),
                Value::Float(obj.get("interval").as_f64()),
            ),
            (
                "Acceleration".to_string(),
                to_motion_data(&obj.get("acceleration")).into_value(),
            ),
            (
                "AccelerationIncludingGravity".to_string(),
                to_motion_data(&obj.get("accelerationIncludingGravity")).into_value(),
            ),
            (
                "RotationRate".to_string(),
                to_rotation_data(&obj.get("rotationRate")).into_value(),
            ),
        ]))
    }

    fn device_orientation(&self, event: &HostValue, obj: &HostRef) -> Value {
        let rotation = to_rotation_data(event);
        let absolute = obj.borrow().get("absolute").as_bool();
        Value::Record(Record::from(vec![
            ("Absolute".to_string(), Value::Bool(absolute)),
            ("Alpha".to_string(), Value::Float(rotation.alpha)),
            ("Beta".to_string(), Value::Float(rotation.beta)),
            ("Gamma".to_string(), Value::Float(rotation.gamma)),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Result;
    use crate::host::HostObject;

    /// Stringifies element handles by reading a `markup` property off the
    /// node, standing in for a real DOM serializer.
    struct MarkupEnv;

    impl HostEnv for MarkupEnv {
        fn stringify_html(&self, node: &HostValue, _deep: bool) -> Option<String> {
            let obj = node.as_object()?;
            let markup = obj.borrow().get("markup").as_str();
            if markup.is_empty() { None } else { Some(markup) }
        }

        fn extract_bytes(&self, _blob_like: &HostValue) -> Result<Vec<u8>> {
            Err(crate::Error::NoByteSource)
        }
    }

    fn node(markup: &str) -> HostValue {
        HostObject::named("HTMLElement")
            .with("markup", HostValue::Str(markup.into()))
            .into_value()
    }

    #[test]
    fn unknown_events_fall_through_to_the_normalizer() {
        let event = HostObject::named("CustomEvent")
            .with("detail", HostValue::Str("saved".into()))
            .into_value();
        let record = Classifier::new(&MarkupEnv).classify(&event);
        assert_eq!(record.get("Detail"), Some(&Value::Str("saved".into())));
    }

    #[test]
    fn mutation_record_fields_become_markup() {
        let event = HostObject::named("MutationRecord")
            .with("type", HostValue::Str("childList".into()))
            .with(
                "addedNodes",
                HostValue::List(vec![node("<p>a</p>"), node("<p>b</p>")]),
            )
            .with("removedNodes", HostValue::List(Vec::new()))
            .with("previousSibling", node("<hr>"))
            .with("nextSibling", HostValue::Null)
            .into_value();

        let record = Classifier::new(&MarkupEnv).classify(&event);
        assert_eq!(
            record.get("AddedNodes"),
            Some(&Value::List(vec![
                Value::Str("<p>a</p>".into()),
                Value::Str("<p>b</p>".into()),
            ]))
        );
        assert_eq!(record.get("RemovedNodes"), Some(&Value::List(Vec::new())));
        assert_eq!(record.get("PreviousSibling"), Some(&Value::Str("<hr>".into())));
        assert_eq!(record.get("NextSibling"), Some(&Value::Null));
        assert_eq!(record.get("Type"), Some(&Value::Str("childList".into())));
    }

    #[test]
    fn mutation_record_skips_nodes_that_do_not_stringify() {
        let blank = HostObject::named("HTMLElement").into_value();
        let event = HostObject::named("MutationRecord")
            .with("addedNodes", HostValue::List(vec![blank, node("<i>x</i>")]))
            .into_value();

        let record = Classifier::new(&MarkupEnv).classify(&event);
        assert_eq!(
            record.get("AddedNodes"),
            Some(&Value::List(vec![Value::Str("<i>x</i>".into())]))
        );
    }

    #[test]
    fn device_motion_events_use_the_sensor_adapters() {
        let accel = HostObject::plain()
            .with("x", HostValue::Float(0.1))
            .with("y", HostValue::Float(0.2))
            .with("z", HostValue::Float(0.3))
            .into_value();
        let rotation = HostObject::plain()
            .with("alpha", HostValue::Float(30.0))
            .with("beta", HostValue::Float(60.0))
            .with("gamma", HostValue::Float(90.0))
            .into_value();
        let event = HostObject::named("DeviceMotionEvent")
            .with("interval", HostValue::Float(16.0))
            .with("acceleration", accel)
            .with("rotationRate", rotation)
            .into_value();

        let record = Classifier::new(&MarkupEnv).classify(&event);
        assert_eq!(record.get("Interval"), Some(&Value::Float(16.0)));
        let accel = record.get("Acceleration").unwrap();
        assert_eq!(accel.get("X"), Some(&Value::Float(0.1)));
        // Absent sensor readings zero-fill rather than fail.
        let gravity = record.get("AccelerationIncludingGravity").unwrap();
        assert_eq!(gravity.get("X"), Some(&Value::Float(0.0)));
        let rate = record.get("RotationRate").unwrap();
        assert_eq!(rate.get("Gamma"), Some(&Value::Float(90.0)));
    }

    #[test]
    fn device_orientation_events_flatten_the_rotation_triple() {
        let event = HostObject::named("DeviceOrientationEvent")
            .with("absolute", HostValue::Bool(true))
            .with("alpha", HostValue::Float(10.0))
            .with("beta", HostValue::Float(20.0))
            .with("gamma", HostValue::Float(30.0))
            .into_value();

        let record = Classifier::new(&MarkupEnv).classify(&event);
        assert_eq!(record.get("Absolute"), Some(&Value::Bool(true)));
        assert_eq!(record.get("Alpha"), Some(&Value::Float(10.0)));
        assert_eq!(record.get("Beta"), Some(&Value::Float(20.0)));
        assert_eq!(record.get("Gamma"), Some(&Value::Float(30.0)));
    }

    #[test]
    fn media_stream_events_reach_the_stream_adapter() {
        let event = HostObject::named("MediaStream")
            .with("active", HostValue::Bool(true))
            .with("id", HostValue::Str("stream-9".into()))
            .into_value();
        let record = Classifier::new(&MarkupEnv).classify(&event);
        assert_eq!(record.get("Active"), Some(&Value::Bool(true)));
        assert_eq!(record.get("ID"), Some(&Value::Str("stream-9".into())));
        assert_eq!(record.get("Audios"), Some(&Value::List(Vec::new())));
    }
}
