//! JSON message channel.
//!
//! Implements `QueryChannel` over the envelope the Wox core speaks to its UI:
//!
//! ```text
//! {"Id": "...", "Type": "WebsocketMsgTypeRequest", "Method": "Query",
//!  "Success": true, "Data": {"query": "abc", "type": "text"}}
//! ```
//!
//! Outgoing messages are serialised to strings and pushed to an
//! `mpsc` receiver owned by whatever transport is in use. Incoming responses
//! are fed to [`MessageChannel::handle_incoming`], which routes query results
//! to the sink of the request with the same id. The core may answer a single
//! request several times, so routes are kept after delivery; only the oldest
//! routes are dropped once more than `MAX_ROUTES` are outstanding.

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use wox_core::{ChannelError, Query, ResultBatch};

use crate::channel::{BatchSink, QueryChannel};

/// Method name for query requests.
pub const METHOD_QUERY: &str = "Query";

/// Method name for action requests.
pub const METHOD_ACTION: &str = "Action";

/// Number of request ids remembered for routing replies.
const MAX_ROUTES: usize = 64;

// =============================================================================
// Envelope
// =============================================================================

/// Direction of a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MessageType {
    #[serde(rename = "WebsocketMsgTypeRequest")]
    Request,
    #[serde(rename = "WebsocketMsgTypeResponse")]
    Response,
}

/// The message envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct WoxMessage {
    pub id: String,
    #[serde(rename = "Type")]
    pub kind: MessageType,
    pub method: String,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl WoxMessage {
    /// A new request with a fresh id.
    pub fn request(method: &str, data: serde_json::Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind: MessageType::Request,
            method: method.to_string(),
            success: true,
            data,
        }
    }

    /// A successful response to `request`.
    pub fn response_to(request: &WoxMessage, data: serde_json::Value) -> Self {
        Self {
            id: request.id.clone(),
            kind: MessageType::Response,
            method: request.method.clone(),
            success: true,
            data,
        }
    }

    /// A failed response to `request`.
    pub fn error_to(request: &WoxMessage, message: impl Into<String>) -> Self {
        Self {
            id: request.id.clone(),
            kind: MessageType::Response,
            method: request.method.clone(),
            success: false,
            data: serde_json::Value::String(message.into()),
        }
    }
}

// =============================================================================
// Routes
// =============================================================================

#[derive(Default)]
struct Routes {
    sinks: HashMap<String, BatchSink>,
    order: VecDeque<String>,
}

impl Routes {
    fn insert(&mut self, id: String, sink: BatchSink) {
        self.order.push_back(id.clone());
        self.sinks.insert(id, sink);
        while self.order.len() > MAX_ROUTES {
            if let Some(oldest) = self.order.pop_front() {
                self.sinks.remove(&oldest);
            }
        }
    }
}

// =============================================================================
// Message Channel
// =============================================================================

pub struct MessageChannel {
    outbound: mpsc::UnboundedSender<String>,
    routes: Mutex<Routes>,
}

impl MessageChannel {
    /// Create a channel and the receiver of its outgoing messages.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (outbound, rx) = mpsc::unbounded_channel();
        let channel = Self {
            outbound,
            routes: Mutex::new(Routes::default()),
        };
        (channel, rx)
    }

    fn send(&self, message: &WoxMessage) -> Result<(), ChannelError> {
        let text =
            serde_json::to_string(message).map_err(|e| ChannelError::Encode(e.to_string()))?;
        self.outbound.send(text).map_err(|_| ChannelError::Closed)
    }

    /// Route one incoming message.
    ///
    /// Returns `Ok(true)` if a batch was delivered. Requests, non-query
    /// responses and replies to unknown ids are ignored.
    pub fn handle_incoming(&self, raw: &str) -> Result<bool, ChannelError> {
        let message: WoxMessage =
            serde_json::from_str(raw).map_err(|e| ChannelError::Decode(e.to_string()))?;

        if message.kind != MessageType::Response {
            tracing::debug!("Ignoring request {:?} from core", message.method);
            return Ok(false);
        }

        if !message.success {
            let text = match &message.data {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Err(ChannelError::Remote {
                method: message.method,
                message: text,
            });
        }

        if message.method != METHOD_QUERY {
            return Ok(false);
        }

        let Some(sink) = self.routes.lock().sinks.get(&message.id).cloned() else {
            tracing::debug!("No route for response {}", message.id);
            return Ok(false);
        };

        let batch: ResultBatch = serde_json::from_value(message.data)
            .map_err(|e| ChannelError::Decode(e.to_string()))?;

        if sink.deliver(batch) {
            Ok(true)
        } else {
            Err(ChannelError::Closed)
        }
    }

    /// Number of request ids that replies can still be routed to.
    pub fn pending_routes(&self) -> usize {
        self.routes.lock().sinks.len()
    }
}

impl QueryChannel for MessageChannel {
    fn submit(&self, query: Query, sink: BatchSink) {
        let data = match serde_json::to_value(&query) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Failed to encode query {:?}: {}", query.text, e);
                return;
            }
        };

        let request = WoxMessage::request(METHOD_QUERY, data);
        self.routes.lock().insert(request.id.clone(), sink);

        if let Err(e) = self.send(&request) {
            tracing::warn!("Failed to send query {:?}: {}", query.text, e);
        }
    }

    fn send_action(&self, action_id: String) {
        let request = WoxMessage::request(METHOD_ACTION, serde_json::json!({ "id": action_id }));
        if let Err(e) = self.send(&request) {
            tracing::warn!("Failed to send action {:?}: {}", action_id, e);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
