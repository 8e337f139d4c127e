//! Converts opaque, host-provided object graphs (DOM events, media and device
//! objects, and their prototype chains) into plain, serializable records that
//! can cross a process or runtime boundary.
//!
//! The producing side holds live objects with non-enumerable, inherited, or
//! host-native properties; the consuming side needs a stable, JSON-like
//! representation with predictable field names and no live references. The
//! crate walks an object's prototype chain with a cycle guard, resolves its
//! effective property set across layered reflection fallbacks, special-cases
//! a fixed catalog of host object families (touch lists, media streams,
//! gamepads, data transfers, input capability descriptors), and re-keys
//! everything else into a plain capitalized mapping.
//!
//! Normalization is one-way and lossy by design: functions and live DOM
//! handles are not representable on the far side of the boundary.
//!
//! ```
//! use event_normalizer::{HostObject, HostValue, NoopEnv, Normalizer, Value};
//!
//! let event = HostObject::named("CustomEvent")
//!     .with("detail", HostValue::Str("saved".into()))
//!     .into_value();
//!
//! let env = NoopEnv;
//! let record = Normalizer::new(&env).normalize(&event);
//! assert_eq!(record.get("Detail"), Some(&Value::Str("saved".into())));
//! ```

use thiserror::Error;

mod adapters;
mod chain;
mod classify;
mod combinators;
mod env;
mod host;
mod keys;
mod normalize;
mod value;

pub use adapters::{
    Button, BytePayload, DataTransfer, DataTransferItem, DataTransferItemList, Gamepad,
    InputDeviceCapabilities, MediaAudioTrackSettings, MediaStream, MediaStreamTrack,
    MediaTrackSettings, MediaVideoTrackSettings, MotionData, RotationData, Touch, TouchList,
    to_data_transfer, to_gamepad, to_input_capability, to_media_stream, to_motion_data,
    to_rotation_data, to_touches,
};
pub use chain::{proto_chain, walk_chain_with};
pub use classify::Classifier;
pub use combinators::{filter_items, flatten_map, map_items, reverse_list};
pub use env::{HostEnv, NoopEnv};
pub use host::{HostClass, HostObject, HostRef, HostValue, Reflection};
pub use keys::{KeyConfig, capitalize, is_constant_name, resolve_keys};
pub use normalize::Normalizer;
pub use value::{Record, Value};

pub type Result<T> = std::result::Result<T, Error>;

/// The synchronous normalization surface is total; only the byte-extraction
/// boundary can fail, and that failure is attached to the field being
/// populated rather than aborting the record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("byte extraction failed: {0}")]
    ByteExtraction(String),
    #[error("no byte source attached to this environment")]
    NoByteSource,
}
