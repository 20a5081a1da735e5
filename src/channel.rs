//! In-process messaging channel.
//!
//! A [`LocalChannel`] is an explicitly constructed hub; each participant calls
//! [`LocalChannel::connect`] to get its own [`ChannelClient`] and disconnects when done
//! (or on drop). Every emitted event is broadcast to all connected clients, the sender
//! included, in emission order.

use std::sync::{Arc, Mutex, MutexGuard, mpsc};

use crate::foundation::error::{CloudError, CloudResult};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum ChannelEvent {
    /// Admin published a new prompt.
    Question(String),
    /// Respondent submitted a response.
    Word(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(u64);

#[derive(Default)]
struct Hub {
    next_id: u64,
    subscribers: Vec<(ClientId, mpsc::Sender<ChannelEvent>)>,
}

#[derive(Clone, Default)]
pub struct LocalChannel {
    hub: Arc<Mutex<Hub>>,
}

impl LocalChannel {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> CloudResult<MutexGuard<'_, Hub>> {
        self.hub
            .lock()
            .map_err(|_| CloudError::channel("channel hub poisoned"))
    }

    pub fn connect(&self) -> CloudResult<ChannelClient> {
        let (tx, rx) = mpsc::channel();
        let mut hub = self.lock()?;
        let id = ClientId(hub.next_id);
        hub.next_id += 1;
        hub.subscribers.push((id, tx));
        tracing::debug!(client = id.0, "channel client connected");
        Ok(ChannelClient {
            id,
            channel: Some(self.clone()),
            rx,
        })
    }

    pub fn connected_clients(&self) -> usize {
        self.lock().map_or(0, |hub| hub.subscribers.len())
    }

    fn broadcast(&self, event: &ChannelEvent) -> CloudResult<()> {
        let mut hub = self.lock()?;
        hub.subscribers
            .retain(|(_, tx)| tx.send(event.clone()).is_ok());
        Ok(())
    }

    fn remove(&self, id: ClientId) {
        if let Ok(mut hub) = self.lock() {
            hub.subscribers.retain(|(sid, _)| *sid != id);
        }
    }
}

/// One participant's connection.
pub struct ChannelClient {
    id: ClientId,
    channel: Option<LocalChannel>,
    rx: mpsc::Receiver<ChannelEvent>,
}

impl ChannelClient {
    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn is_connected(&self) -> bool {
        self.channel.is_some()
    }

    pub fn emit(&self, event: ChannelEvent) -> CloudResult<()> {
        let channel = self
            .channel
            .as_ref()
            .ok_or_else(|| CloudError::channel("client is disconnected"))?;
        channel.broadcast(&event)
    }

    /// Next pending event, without blocking.
    pub fn try_next(&self) -> Option<ChannelEvent> {
        self.rx.try_recv().ok()
    }

    pub fn drain(&self) -> Vec<ChannelEvent> {
        self.rx.try_iter().collect()
    }

    pub fn disconnect(&mut self) {
        if let Some(channel) = self.channel.take() {
            channel.remove(self.id);
            tracing::debug!(client = self.id.0, "channel client disconnected");
        }
    }
}

impl Drop for ChannelClient {
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn broadcast_reaches_every_client_in_order() {
        let ch = LocalChannel::new();
        let a = ch.connect().unwrap();
        let b = ch.connect().unwrap();

        a.emit(ChannelEvent::Question("q".into())).unwrap();
        a.emit(ChannelEvent::Word("w".into())).unwrap();

        for c in [&a, &b] {
            assert_eq!(
                c.drain(),
                vec![ChannelEvent::Question("q".into()), ChannelEvent::Word("w".into())]
            );
        }
    }

    #[test]
    fn disconnect_stops_delivery_and_emit() {
        let ch = LocalChannel::new();
        let mut a = ch.connect().unwrap();
        let b = ch.connect().unwrap();
        assert_eq!(ch.connected_clients(), 2);

        a.disconnect();
        assert!(!a.is_connected());
        assert_eq!(ch.connected_clients(), 1);
        assert!(a.emit(ChannelEvent::Word("x".into())).is_err());

        b.emit(ChannelEvent::Word("y".into())).unwrap();
        assert_eq!(a.try_next(), None);
        assert_eq!(b.try_next(), Some(ChannelEvent::Word("y".into())));
    }

    #[test]
    fn drop_disconnects() {
        let ch = LocalChannel::new();
        {
            let _c = ch.connect().unwrap();
            assert_eq!(ch.connected_clients(), 1);
        }
        assert_eq!(ch.connected_clients(), 0);
    }

    #[test]
    fn events_serialize_as_tagged_json() {
        let v = serde_json::to_value(ChannelEvent::Word("red".into())).unwrap();
        assert_eq!(v, json!({"type": "word", "text": "red"}));
        let e: ChannelEvent =
            serde_json::from_value(json!({"type": "question", "text": "Why?"})).unwrap();
        assert_eq!(e, ChannelEvent::Question("Why?".into()));
    }
}
