//! Message-type dispatch table.
//!
//! Network messages carry their type as a numeric id — in the
//! `msgType` field of JSON messages, or as the first float32 of a
//! binary envelope. Handlers are registered per [`MsgType`] at
//! construction; dispatch looks the handler up instead of switching
//! over the ids inline, so new message types extend the table without
//! touching the dispatch path.

use std::collections::HashMap;

use log::warn;

use vistra_core::{MsgType, FLOAT_BYTES};

/// One inbound transport message, as received off the wire.
#[derive(Clone, Debug)]
pub enum InboundMessage {
    /// A parsed JSON message; the `msgType` field routes it.
    Json(serde_json::Value),
    /// A binary message; the envelope leads with the protocol version
    /// float, and the second float32 — the message type — routes it.
    Binary(Vec<u8>),
}

type JsonHandler<Ctx> = Box<dyn FnMut(&mut Ctx, serde_json::Value)>;
type BinaryHandler<Ctx> = Box<dyn FnMut(&mut Ctx, Vec<u8>)>;

/// A registry of message handlers keyed by [`MsgType`].
///
/// `Ctx` is the state handlers mutate — typically the session that
/// owns this dispatcher — passed in at dispatch time so handlers and
/// state can live side by side in one struct.
pub struct Dispatcher<Ctx> {
    json: HashMap<MsgType, JsonHandler<Ctx>>,
    binary: HashMap<MsgType, BinaryHandler<Ctx>>,
}

impl<Ctx> Default for Dispatcher<Ctx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx> Dispatcher<Ctx> {
    /// An empty dispatch table.
    pub fn new() -> Self {
        Self {
            json: HashMap::new(),
            binary: HashMap::new(),
        }
    }

    /// Register the handler for a JSON message type. Replaces any
    /// previous handler for that type.
    pub fn on_json(
        &mut self,
        msg_type: MsgType,
        handler: impl FnMut(&mut Ctx, serde_json::Value) + 'static,
    ) {
        let _ = self.json.insert(msg_type, Box::new(handler));
    }

    /// Register the handler for a binary message type. Replaces any
    /// previous handler for that type.
    pub fn on_binary(
        &mut self,
        msg_type: MsgType,
        handler: impl FnMut(&mut Ctx, Vec<u8>) + 'static,
    ) {
        let _ = self.binary.insert(msg_type, Box::new(handler));
    }

    /// Route a message to its registered handler.
    ///
    /// Returns `false` — after logging — for messages with a missing,
    /// unknown, or unregistered type; an out-of-range id suggests the
    /// backend is out of sync with this client.
    pub fn dispatch(&mut self, ctx: &mut Ctx, message: InboundMessage) -> bool {
        match message {
            InboundMessage::Json(value) => {
                let Some(id) = value.get("msgType").and_then(serde_json::Value::as_u64) else {
                    warn!("JSON message without a msgType field");
                    return false;
                };
                let Some(msg_type) = u32::try_from(id).ok().and_then(MsgType::from_id) else {
                    warn!("unrecognized JSON message of type {id}");
                    return false;
                };
                match self.json.get_mut(&msg_type) {
                    Some(handler) => {
                        handler(ctx, value);
                        true
                    }
                    None => {
                        warn!("no handler registered for JSON message {msg_type:?}");
                        false
                    }
                }
            }
            InboundMessage::Binary(bytes) => {
                let Some(msg_type) = binary_msg_type(&bytes) else {
                    warn!("unexpected binary message head");
                    return false;
                };
                match self.binary.get_mut(&msg_type) {
                    Some(handler) => {
                        handler(ctx, bytes);
                        true
                    }
                    None => {
                        warn!("no handler registered for binary message {msg_type:?}");
                        false
                    }
                }
            }
        }
    }
}

/// Read the message-type id of a binary message: the second envelope
/// float, after the protocol version.
fn binary_msg_type(bytes: &[u8]) -> Option<MsgType> {
    if bytes.len() < 2 * FLOAT_BYTES {
        return None;
    }
    let tag = f32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if !tag.is_finite() || tag.fract() != 0.0 || tag < 0.0 {
        return None;
    }
    MsgType::from_id(tag as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Default)]
    struct Seen {
        json: Vec<u32>,
        binary: Vec<usize>,
    }

    #[test]
    fn json_messages_route_by_msg_type() {
        let mut dispatcher: Dispatcher<Seen> = Dispatcher::new();
        dispatcher.on_json(MsgType::VisDataArrive, |seen, value| {
            seen.json.push(value["bundleSize"].as_u64().unwrap() as u32);
        });

        let mut seen = Seen::default();
        let handled = dispatcher.dispatch(
            &mut seen,
            InboundMessage::Json(json!({ "msgType": 1, "bundleSize": 3 })),
        );
        assert!(handled);
        assert_eq!(seen.json, vec![3]);
    }

    #[test]
    fn binary_messages_route_by_the_type_float() {
        let mut dispatcher: Dispatcher<Seen> = Dispatcher::new();
        dispatcher.on_binary(MsgType::VisDataArrive, |seen, bytes| {
            seen.binary.push(bytes.len());
        });

        // [version, msgType] envelope head.
        let mut bytes = 2.0f32.to_le_bytes().to_vec();
        bytes.extend(1.0f32.to_le_bytes());

        let mut seen = Seen::default();
        assert!(dispatcher.dispatch(&mut seen, InboundMessage::Binary(bytes)));
        assert_eq!(seen.binary, vec![8]);
    }

    #[test]
    fn unknown_and_unregistered_types_are_dropped() {
        let mut dispatcher: Dispatcher<Seen> = Dispatcher::new();
        let mut seen = Seen::default();

        // Out-of-range id.
        assert!(!dispatcher.dispatch(&mut seen, InboundMessage::Json(json!({ "msgType": 99 }))));
        // Known id, nothing registered.
        assert!(!dispatcher.dispatch(&mut seen, InboundMessage::Json(json!({ "msgType": 12 }))));
        // Missing field.
        assert!(!dispatcher.dispatch(&mut seen, InboundMessage::Json(json!({ "data": [] }))));
        // Binary message too short for a head float.
        assert!(!dispatcher.dispatch(&mut seen, InboundMessage::Binary(vec![1, 2])));
    }

    #[test]
    fn a_new_handler_replaces_the_old_one() {
        let mut dispatcher: Dispatcher<Seen> = Dispatcher::new();
        dispatcher.on_json(MsgType::VisDataArrive, |seen, _| seen.json.push(1));
        dispatcher.on_json(MsgType::VisDataArrive, |seen, _| seen.json.push(2));

        let mut seen = Seen::default();
        let _ = dispatcher.dispatch(&mut seen, InboundMessage::Json(json!({ "msgType": 1 })));
        assert_eq!(seen.json, vec![2]);
    }
}
