use event_normalizer::{
    Button, Gamepad, HostObject, HostValue, KeyConfig, NoopEnv, Normalizer, Value, reverse_list,
    to_gamepad, to_touches,
};

fn normalize(value: &HostValue) -> Value {
    Normalizer::new(&NoopEnv).normalize(value)
}

#[test]
fn reverse_list_is_a_complete_reversal() {
    // The first element must survive; a loop bound of `i > 0` would drop it.
    let items = vec![
        HostValue::Str("a".into()),
        HostValue::Str("b".into()),
        HostValue::Str("c".into()),
    ];
    assert_eq!(
        reverse_list(&items),
        vec![
            HostValue::Str("c".into()),
            HostValue::Str("b".into()),
            HostValue::Str("a".into()),
        ]
    );
}

#[test]
fn prototype_less_object_normalizes_to_empty_mapping() {
    let record = normalize(&HostObject::plain().into_value());
    assert_eq!(record, Value::Record(Default::default()));
}

#[test]
fn touch_list_of_two_preserves_fields_and_reports_length() {
    let touch = |id: f64, x: f64, y: f64| {
        HostObject::named("Touch")
            .with("identifier", HostValue::Float(id))
            .with("clientX", HostValue::Float(x))
            .with("clientY", HostValue::Float(y))
            .with("pageX", HostValue::Float(x + 1.0))
            .with("pageY", HostValue::Float(y + 1.0))
            .with("offsetX", HostValue::Float(x + 2.0))
            .with("offsetY", HostValue::Float(y + 2.0))
            .with("screenX", HostValue::Float(x + 3.0))
            .with("screenY", HostValue::Float(y + 3.0))
            .into_value()
    };
    let list = HostObject::named("TouchList")
        .with("items", HostValue::List(vec![touch(1.0, 10.0, 20.0), touch(2.0, 30.0, 40.0)]))
        .into_value();

    let touches = to_touches(&list);
    assert_eq!(touches.length, 2);
    assert_eq!(touches.touches.len(), 2);
    assert_eq!(touches.touches[0].identifier, 1.0);
    assert_eq!(touches.touches[0].client_x, 10.0);
    assert_eq!(touches.touches[0].screen_y, 23.0);
    assert_eq!(touches.touches[1].identifier, 2.0);
    assert_eq!(touches.touches[1].page_x, 31.0);
    assert_eq!(touches.touches[1].offset_y, 42.0);
}

#[test]
fn gamepad_extracts_axes_and_buttons() {
    let button = HostObject::plain()
        .with("value", HostValue::Float(1.0))
        .with("pressed", HostValue::Bool(true))
        .into_value();
    let pad = HostObject::named("Gamepad")
        .with("id", HostValue::Str("pad-1".into()))
        .with("index", HostValue::Int(0))
        .with("connected", HostValue::Bool(true))
        .with(
            "axes",
            HostValue::List(vec![HostValue::Float(0.1), HostValue::Float(-0.5)]),
        )
        .with("buttons", HostValue::List(vec![button]))
        .into_value();

    let gamepad = to_gamepad(&pad);
    assert_eq!(
        gamepad,
        Gamepad {
            display_id: String::new(),
            id: "pad-1".into(),
            index: 0,
            mapping: String::new(),
            connected: true,
            timestamp: 0.0,
            axes: vec![0.1, -0.5],
            buttons: vec![Button {
                value: 1.0,
                pressed: true
            }],
        }
    );

    // The same shape comes out of the generic normalizer, since gamepads
    // dispatch through their adapter.
    let record = normalize(&pad);
    assert_eq!(
        record.get("Axes"),
        Some(&Value::List(vec![Value::Float(0.1), Value::Float(-0.5)]))
    );
    let buttons = record.get("Buttons").unwrap();
    let Value::List(buttons) = buttons else {
        panic!("buttons should be a list");
    };
    assert_eq!(buttons[0].get("Value"), Some(&Value::Float(1.0)));
    assert_eq!(buttons[0].get("Pressed"), Some(&Value::Bool(true)));
}

#[test]
fn deny_listed_and_constant_names_stay_out_of_the_wire_shape() {
    let proto = HostObject::named("Widget")
        .with("constructor", HostValue::Function("Widget".into()))
        .with("toString", HostValue::Function("toString".into()))
        .with("WIDGET_KIND", HostValue::Int(4))
        .with("label", HostValue::Undefined)
        .into_ref();
    let widget = HostObject::named("Widget")
        .with("label", HostValue::Str("play".into()))
        .with_proto(&proto)
        .into_value();

    let json = serde_json::to_value(normalize(&widget)).unwrap();
    assert_eq!(json, serde_json::json!({ "Label": "play" }));
}

#[test]
fn normalizing_a_normalized_flat_mapping_is_stable() {
    let source = HostObject::plain()
        .with("detail", HostValue::Str("saved".into()))
        .with("count", HostValue::Int(3))
        .with("ratio", HostValue::Float(0.5))
        .with("active", HostValue::Bool(true))
        .into_value();
    let first = normalize(&source);

    let mut refed = HostObject::plain();
    for (key, value) in first.as_record().unwrap().iter() {
        let host = match value {
            Value::Bool(v) => HostValue::Bool(*v),
            Value::Int(v) => HostValue::Int(*v),
            Value::Float(v) => HostValue::Float(*v),
            Value::Str(v) => HostValue::Str(v.clone()),
            other => panic!("flat mapping should only hold primitives, got {other:?}"),
        };
        refed.set(key, host);
    }

    let second = normalize(&refed.into_value());
    assert_eq!(second, first);
}

#[test]
fn custom_deny_lists_flow_through_the_normalizer() {
    let value = HostObject::plain()
        .with("secret", HostValue::Str("s".into()))
        .with("open", HostValue::Str("o".into()))
        .into_value();

    let mut config = KeyConfig::default();
    config.deny("secret");
    let record = Normalizer::with_config(&NoopEnv, config).normalize(&value);
    let record = record.as_record().unwrap();
    assert!(!record.contains_key("Secret"));
    assert!(record.contains_key("Open"));
}

#[test]
fn normalized_records_serialize_to_plain_json() {
    let base = HostObject::named("Event")
        .with("bubbles", HostValue::Undefined)
        .with("eventPhase", HostValue::Undefined)
        .into_ref();
    let event = HostObject::named("WheelEvent")
        .with("deltaX", HostValue::Float(1.5))
        .with("deltaY", HostValue::Float(-3.0))
        .with("bubbles", HostValue::Bool(true))
        .with("eventPhase", HostValue::Int(2))
        .with_proto(&base)
        .into_value();

    let json = serde_json::to_value(normalize(&event)).unwrap();
    assert_eq!(json["Bubbles"], serde_json::json!(true));
    assert_eq!(json["EventPhase"], serde_json::json!(2));
    // Own keys ride along only through prototype-declared names; deltas are
    // not declared on any root here, so they stay off the wire.
    assert!(json.get("DeltaX").is_none());
}
