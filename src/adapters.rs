//! Purpose-built extractors for known host object families. These families
//! expose accessor-style data that naive property enumeration cannot reach,
//! so each adapter reads a fixed field set into a flat record instead of
//! going through the generic normalizer.
//!
//! Host integrations materialize accessor results as plain properties before
//! handing objects over: a media stream's track accessors land under
//! `audioTracks`/`videoTracks`, a track's settings accessor under
//! `settings`, a touch list's indexed items under `items`.
//!
//! Every adapter is total over a possibly-null input: a null or undefined
//! root yields a zero-valued result of the correct shape, and a missing
//! sub-collection yields an empty list for that field, never an absent
//! field.

use serde::Serialize;
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use tracing::warn;

use crate::env::HostEnv;
use crate::host::HostValue;
use crate::value::{Record, Value};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MotionData {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RotationData {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InputDeviceCapabilities {
    pub fires_touch_event: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MediaTrackSettings {
    #[serde(rename = "DeviceID")]
    pub device_id: String,
    #[serde(rename = "GroupID")]
    pub group_id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MediaAudioTrackSettings {
    #[serde(flatten)]
    pub base: MediaTrackSettings,
    pub channel_count: i64,
    pub echo_cancellation: bool,
    pub latency: f64,
    pub sample_rate: i64,
    pub sample_size: i64,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MediaVideoTrackSettings {
    #[serde(flatten)]
    pub base: MediaTrackSettings,
    pub aspect_ratio: f64,
    pub facing_mode: String,
    pub frame_rate: f64,
    pub height: i64,
    pub width: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MediaStreamTrack {
    pub enabled: bool,
    #[serde(rename = "ID")]
    pub id: String,
    pub kind: String,
    pub label: String,
    pub muted: bool,
    pub ready_state: bool,
    pub remote: bool,
    pub audio_settings: Option<MediaAudioTrackSettings>,
    pub video_settings: Option<MediaVideoTrackSettings>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MediaStream {
    pub active: bool,
    pub ended: bool,
    #[serde(rename = "ID")]
    pub id: String,
    pub audios: Vec<MediaStreamTrack>,
    pub videos: Vec<MediaStreamTrack>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Touch {
    pub identifier: f64,
    pub client_x: f64,
    pub client_y: f64,
    pub page_x: f64,
    pub page_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub screen_x: f64,
    pub screen_y: f64,
}

/// The count is reported alongside the list for consumers that expect an
/// explicit length next to the touches.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TouchList {
    pub touches: Vec<Touch>,
    pub length: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Button {
    pub value: f64,
    pub pressed: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Gamepad {
    #[serde(rename = "DisplayID")]
    pub display_id: String,
    #[serde(rename = "ID")]
    pub id: String,
    pub index: i64,
    pub mapping: String,
    pub connected: bool,
    pub timestamp: f64,
    pub axes: Vec<f64>,
    pub buttons: Vec<Button>,
}

/// Outcome of reading one item's binary payload. A collaborator failure is
/// attached here rather than aborting the whole transfer record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BytePayload {
    Bytes(Vec<u8>),
    Unavailable(String),
}

impl Default for BytePayload {
    fn default() -> Self {
        Self::Bytes(Vec::new())
    }
}

impl Serialize for BytePayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Bytes(bytes) => {
                let mut seq = serializer.serialize_seq(Some(bytes.len()))?;
                for byte in bytes {
                    seq.serialize_element(byte)?;
                }
                seq.end()
            }
            Self::Unavailable(reason) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Unavailable", reason)?;
                map.end()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataTransferItem {
    pub name: String,
    pub size: i64,
    pub data: BytePayload,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataTransferItemList {
    pub items: Vec<DataTransferItem>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataTransfer {
    pub drop_effect: String,
    pub effect_allowed: String,
    pub types: Vec<String>,
    pub items: DataTransferItemList,
    pub files: Vec<DataTransferItem>,
}

/// Motion triple from a sensor reading; zeros when absent.
pub fn to_motion_data(o: &HostValue) -> MotionData {
    let Some(obj) = o.as_object() else {
        return MotionData::default();
    };
    let obj = obj.borrow();
    MotionData {
        x: obj.get("x").as_f64(),
        y: obj.get("y").as_f64(),
        z: obj.get("z").as_f64(),
    }
}

/// Orientation triple from a rotation-rate reading; zeros when absent.
pub fn to_rotation_data(o: &HostValue) -> RotationData {
    let Some(obj) = o.as_object() else {
        return RotationData::default();
    };
    let obj = obj.borrow();
    RotationData {
        alpha: obj.get("alpha").as_f64(),
        beta: obj.get("beta").as_f64(),
        gamma: obj.get("gamma").as_f64(),
    }
}

pub fn to_input_capability(o: &HostValue) -> InputDeviceCapabilities {
    let Some(obj) = o.as_object() else {
        return InputDeviceCapabilities::default();
    };
    let obj = obj.borrow();
    InputDeviceCapabilities {
        fires_touch_event: obj.get("firesTouchEvent").as_bool(),
    }
}

pub fn to_media_stream(o: &HostValue) -> MediaStream {
    let Some(obj) = o.as_object() else {
        return MediaStream::default();
    };
    let obj = obj.borrow();
    MediaStream {
        active: obj.get("active").as_bool(),
        ended: obj.get("ended").as_bool(),
        id: obj.get("id").as_str(),
        audios: media_tracks(&obj.get("audioTracks"), true),
        videos: media_tracks(&obj.get("videoTracks"), false),
    }
}

fn media_tracks(tracks: &HostValue, audio: bool) -> Vec<MediaStreamTrack> {
    let Some(items) = tracks.as_list() else {
        return Vec::new();
    };
    items.iter().map(|track| media_track(track, audio)).collect()
}

fn media_track(track: &HostValue, audio: bool) -> MediaStreamTrack {
    let Some(obj) = track.as_object() else {
        return MediaStreamTrack::default();
    };
    let obj = obj.borrow();
    let settings = obj.get("settings");
    let settings_obj = settings.as_object();

    let read = |key: &str| -> HostValue {
        settings_obj
            .map(|s| s.borrow().get(key))
            .unwrap_or(HostValue::Undefined)
    };
    let base = MediaTrackSettings {
        device_id: read("deviceId").as_str(),
        group_id: read("groupId").as_str(),
    };

    let mut record = MediaStreamTrack {
        enabled: obj.get("enabled").as_bool(),
        id: obj.get("id").as_str(),
        kind: obj.get("kind").as_str(),
        label: obj.get("label").as_str(),
        muted: obj.get("muted").as_bool(),
        ready_state: obj.get("readyState").as_bool(),
        remote: obj.get("remote").as_bool(),
        audio_settings: None,
        video_settings: None,
    };

    if audio {
        record.audio_settings = Some(MediaAudioTrackSettings {
            base,
            channel_count: read("channelCount").as_i64(),
            echo_cancellation: read("echoCancellation").as_bool(),
            latency: read("latency").as_f64(),
            sample_rate: read("sampleRate").as_i64(),
            sample_size: read("sampleSize").as_i64(),
            volume: read("volume").as_f64(),
        });
    } else {
        record.video_settings = Some(MediaVideoTrackSettings {
            base,
            aspect_ratio: read("aspectRatio").as_f64(),
            facing_mode: read("facingMode").as_str(),
            frame_rate: read("frameRate").as_f64(),
            height: read("height").as_i64(),
            width: read("width").as_i64(),
        });
    }
    record
}

pub fn to_touches(o: &HostValue) -> TouchList {
    let Some(obj) = o.as_object() else {
        return TouchList::default();
    };
    let obj = obj.borrow();
    let items = obj.get("items");
    let touches: Vec<Touch> = items
        .as_list()
        .map(|items| items.iter().map(to_touch).collect())
        .unwrap_or_default();
    let length = touches.len() as i64;
    TouchList { touches, length }
}

fn to_touch(o: &HostValue) -> Touch {
    let Some(obj) = o.as_object() else {
        return Touch::default();
    };
    let obj = obj.borrow();
    Touch {
        identifier: obj.get("identifier").as_f64(),
        client_x: obj.get("clientX").as_f64(),
        client_y: obj.get("clientY").as_f64(),
        page_x: obj.get("pageX").as_f64(),
        page_y: obj.get("pageY").as_f64(),
        offset_x: obj.get("offsetX").as_f64(),
        offset_y: obj.get("offsetY").as_f64(),
        screen_x: obj.get("screenX").as_f64(),
        screen_y: obj.get("screenY").as_f64(),
    }
}

pub fn to_gamepad(o: &HostValue) -> Gamepad {
    let Some(obj) = o.as_object() else {
        return Gamepad::default();
    };
    let obj = obj.borrow();

    let axes = obj
        .get("axes")
        .as_list()
        .map(|axes| axes.iter().map(HostValue::as_f64).collect())
        .unwrap_or_default();

    let buttons = obj
        .get("buttons")
        .as_list()
        .map(|buttons| buttons.iter().map(to_button).collect())
        .unwrap_or_default();

    Gamepad {
        display_id: obj.get("displayId").as_str(),
        id: obj.get("id").as_str(),
        index: obj.get("index").as_i64(),
        mapping: obj.get("mapping").as_str(),
        connected: obj.get("connected").as_bool(),
        timestamp: obj.get("timestamp").as_f64(),
        axes,
        buttons,
    }
}

fn to_button(o: &HostValue) -> Button {
    let Some(obj) = o.as_object() else {
        return Button::default();
    };
    let obj = obj.borrow();
    Button {
        value: obj.get("value").as_f64(),
        pressed: obj.get("pressed").as_bool(),
    }
}

pub fn to_data_transfer(o: &HostValue, env: &dyn HostEnv) -> DataTransfer {
    let Some(obj) = o.as_object() else {
        return DataTransfer::default();
    };
    let obj = obj.borrow();

    let items = obj
        .get("items")
        .as_list()
        .map(|items| {
            items
                .iter()
                .map(|item| to_transfer_item(item, env))
                .collect()
        })
        .unwrap_or_default();

    let files = obj
        .get("files")
        .as_list()
        .map(|files| {
            files
                .iter()
                .map(|file| to_transfer_item(file, env))
                .collect()
        })
        .unwrap_or_default();

    DataTransfer {
        drop_effect: obj.get("dropEffect").as_str(),
        effect_allowed: obj.get("effectAllowed").as_str(),
        types: env.string_list_from(&obj.get("types")),
        items: DataTransferItemList { items },
        files,
    }
}

fn to_transfer_item(o: &HostValue, env: &dyn HostEnv) -> DataTransferItem {
    let Some(obj) = o.as_object() else {
        return DataTransferItem::default();
    };
    let (name, size) = {
        let obj = obj.borrow();
        (obj.get("name").as_str(), obj.get("size").as_i64())
    };
    let data = match env.extract_bytes(o) {
        Ok(bytes) => BytePayload::Bytes(bytes),
        Err(err) => {
            warn!(item = %name, error = %err, "byte extraction failed");
            BytePayload::Unavailable(err.to_string())
        }
    };
    DataTransferItem { name, size, data }
}

impl MotionData {
    pub fn into_value(self) -> Value {
        Value::Record(Record::from(vec![
            ("X".to_string(), Value::Float(self.x)),
            ("Y".to_string(), Value::Float(self.y)),
            ("Z".to_string(), Value::Float(self.z)),
        ]))
    }
}

impl RotationData {
    pub fn into_value(self) -> Value {
        Value::Record(Record::from(vec![
            ("Alpha".to_string(), Value::Float(self.alpha)),
            ("Beta".to_string(), Value::Float(self.beta)),
            ("Gamma".to_string(), Value::Float(self.gamma)),
        ]))
    }
}

impl InputDeviceCapabilities {
    pub fn into_value(self) -> Value {
        Value::Record(Record::from(vec![(
            "FiresTouchEvent".to_string(),
            Value::Bool(self.fires_touch_event),
        )]))
    }
}

impl MediaStreamTrack {
    pub fn into_value(self) -> Value {
        let mut record = Record::from(vec![
            ("Enabled".to_string(), Value::Bool(self.enabled)),
            ("ID".to_string(), Value::Str(self.id)),
            ("Kind".to_string(), Value::Str(self.kind)),
            ("Label".to_string(), Value::Str(self.label)),
            ("Muted".to_string(), Value::Bool(self.muted)),
            ("ReadyState".to_string(), Value::Bool(self.ready_state)),
            ("Remote".to_string(), Value::Bool(self.remote)),
        ]);
        if let Some(audio) = self.audio_settings {
            record.set_entry(
                "AudioSettings".to_string(),
                Value::Record(Record::from(vec![
                    ("DeviceID".to_string(), Value::Str(audio.base.device_id)),
                    ("GroupID".to_string(), Value::Str(audio.base.group_id)),
                    ("ChannelCount".to_string(), Value::Int(audio.channel_count)),
                    (
                        "EchoCancellation".to_string(),
                        Value::Bool(audio.echo_cancellation),
                    ),
                    ("Latency".to_string(), Value::Float(audio.latency)),
                    ("SampleRate".to_string(), Value::Int(audio.sample_rate)),
                    ("SampleSize".to_string(), Value::Int(audio.sample_size)),
                    ("Volume".to_string(), Value::Float(audio.volume)),
                ])),
            );
        }
        if let Some(video) = self.video_settings {
            record.set_entry(
                "VideoSettings".to_string(),
                Value::Record(Record::from(vec![
                    ("DeviceID".to_string(), Value::Str(video.base.device_id)),
                    ("GroupID".to_string(), Value::Str(video.base.group_id)),
                    ("AspectRatio".to_string(), Value::Float(video.aspect_ratio)),
                    ("FacingMode".to_string(), Value::Str(video.facing_mode)),
                    ("FrameRate".to_string(), Value::Float(video.frame_rate)),
                    ("Height".to_string(), Value::Int(video.height)),
                    ("Width".to_string(), Value::Int(video.width)),
                ])),
            );
        }
        Value::Record(record)
    }
}

impl MediaStream {
    pub fn into_value(self) -> Value {
        Value::Record(Record::from(vec![
            ("Active".to_string(), Value::Bool(self.active)),
            ("Ended".to_string(), Value::Bool(self.ended)),
            ("ID".to_string(), Value::Str(self.id)),
            (
                "Audios".to_string(),
                Value::List(
                    self.audios
                        .into_iter()
                        .map(MediaStreamTrack::into_value)
                        .collect(),
                ),
            ),
            (
                "Videos".to_string(),
                Value::List(
                    self.videos
                        .into_iter()
                        .map(MediaStreamTrack::into_value)
                        .collect(),
                ),
            ),
        ]))
    }
}

impl Touch {
    pub fn into_value(self) -> Value {
        Value::Record(Record::from(vec![
            ("Identifier".to_string(), Value::Float(self.identifier)),
            ("ClientX".to_string(), Value::Float(self.client_x)),
            ("ClientY".to_string(), Value::Float(self.client_y)),
            ("PageX".to_string(), Value::Float(self.page_x)),
            ("PageY".to_string(), Value::Float(self.page_y)),
            ("OffsetX".to_string(), Value::Float(self.offset_x)),
            ("OffsetY".to_string(), Value::Float(self.offset_y)),
            ("ScreenX".to_string(), Value::Float(self.screen_x)),
            ("ScreenY".to_string(), Value::Float(self.screen_y)),
        ]))
    }
}

impl TouchList {
    pub fn into_value(self) -> Value {
        Value::Record(Record::from(vec![
            (
                "Touches".to_string(),
                Value::List(self.touches.into_iter().map(Touch::into_value).collect()),
            ),
            ("Length".to_string(), Value::Int(self.length)),
        ]))
    }
}

impl Button {
    pub fn into_value(self) -> Value {
        Value::Record(Record::from(vec![
            ("Value".to_string(), Value::Float(self.value)),
            ("Pressed".to_string(), Value::Bool(self.pressed)),
        ]))
    }
}

impl Gamepad {
    pub fn into_value(self) -> Value {
        Value::Record(Record::from(vec![
            ("DisplayID".to_string(), Value::Str(self.display_id)),
            ("ID".to_string(), Value::Str(self.id)),
            ("Index".to_string(), Value::Int(self.index)),
            ("Mapping".to_string(), Value::Str(self.mapping)),
            ("Connected".to_string(), Value::Bool(self.connected)),
            ("Timestamp".to_string(), Value::Float(self.timestamp)),
            (
                "Axes".to_string(),
                Value::List(self.axes.into_iter().map(Value::Float).collect()),
            ),
            (
                "Buttons".to_string(),
                Value::List(self.buttons.into_iter().map(Button::into_value).collect()),
            ),
        ]))
    }
}

impl BytePayload {
    pub fn into_value(self) -> Value {
        match self {
            Self::Bytes(bytes) => Value::Bytes(bytes),
            Self::Unavailable(reason) => Value::Unavailable(reason),
        }
    }
}

impl DataTransferItem {
    pub fn into_value(self) -> Value {
        Value::Record(Record::from(vec![
            ("Name".to_string(), Value::Str(self.name)),
            ("Size".to_string(), Value::Int(self.size)),
            ("Data".to_string(), self.data.into_value()),
        ]))
    }
}

impl DataTransfer {
    pub fn into_value(self) -> Value {
        Value::Record(Record::from(vec![
            ("DropEffect".to_string(), Value::Str(self.drop_effect)),
            ("EffectAllowed".to_string(), Value::Str(self.effect_allowed)),
            (
                "Types".to_string(),
                Value::List(self.types.into_iter().map(Value::Str).collect()),
            ),
            (
                "Items".to_string(),
                Value::Record(Record::from(vec![(
                    "Items".to_string(),
                    Value::List(
                        self.items
                            .items
                            .into_iter()
                            .map(DataTransferItem::into_value)
                            .collect(),
                    ),
                )])),
            ),
            (
                "Files".to_string(),
                Value::List(
                    self.files
                        .into_iter()
                        .map(DataTransferItem::into_value)
                        .collect(),
                ),
            ),
        ]))
    }
}
