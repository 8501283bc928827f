//! Message channels between the host and its observers
//!
//! The simulation only ever sees the [`MessageChannel`] trait: a
//! non-blocking, bidirectional pipe of whole messages that can be closed from
//! either end. [`MemoryChannel`] is the in-process transport used by tests and
//! embedded observers; `tcp` provides the socket-backed one.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use crate::net::messages::{ClientMessage, ServerMessage};

/// Non-blocking bidirectional message pipe
pub trait MessageChannel<Out, In> {
    /// Queue `message` and push out whatever is pending; `None` only flushes
    fn send(&mut self, message: Option<Out>);

    /// Next complete incoming message, if one is available
    fn receive(&mut self) -> Option<In>;

    fn is_open(&self) -> bool;

    fn close(&mut self);
}

/// The host's end of an observer connection
pub type ServerChannel = Box<dyn MessageChannel<ServerMessage, ClientMessage> + Send>;

/// Yields newly connected observers
pub trait ConnectionSource {
    /// Next pending connection, without blocking
    fn accept(&mut self) -> Option<ServerChannel>;
}

/// In-process channel over a pair of mpsc queues
#[derive(Debug)]
pub struct MemoryChannel<Out, In> {
    outgoing: Option<Sender<Out>>,
    incoming: Option<Receiver<In>>,
}

/// Two connected ends
pub fn memory_pair<A, B>() -> (MemoryChannel<A, B>, MemoryChannel<B, A>) {
    let (a_tx, a_rx) = mpsc::channel();
    let (b_tx, b_rx) = mpsc::channel();
    (
        MemoryChannel {
            outgoing: Some(a_tx),
            incoming: Some(b_rx),
        },
        MemoryChannel {
            outgoing: Some(b_tx),
            incoming: Some(a_rx),
        },
    )
}

impl<Out, In> MessageChannel<Out, In> for MemoryChannel<Out, In> {
    fn send(&mut self, message: Option<Out>) {
        let (Some(tx), Some(message)) = (&self.outgoing, message) else {
            return;
        };
        if tx.send(message).is_err() {
            self.close();
        }
    }

    fn receive(&mut self) -> Option<In> {
        let rx = self.incoming.as_ref()?;
        match rx.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.close();
                None
            }
        }
    }

    fn is_open(&self) -> bool {
        self.outgoing.is_some() && self.incoming.is_some()
    }

    fn close(&mut self) {
        self.outgoing = None;
        self.incoming = None;
    }
}

/// Observer-side end of an in-process connection
pub type ClientMemoryChannel = MemoryChannel<ClientMessage, ServerMessage>;

/// In-process connection source
#[derive(Debug)]
pub struct MemoryListener {
    pending: Receiver<MemoryChannel<ServerMessage, ClientMessage>>,
}

/// Dials a [`MemoryListener`]
#[derive(Debug, Clone)]
pub struct MemoryConnector {
    dial: Sender<MemoryChannel<ServerMessage, ClientMessage>>,
}

pub fn memory_listener() -> (MemoryListener, MemoryConnector) {
    let (dial, pending) = mpsc::channel();
    (MemoryListener { pending }, MemoryConnector { dial })
}

impl MemoryConnector {
    /// Open a connection; the listener hands the other end out on its next accept
    pub fn connect(&self) -> ClientMemoryChannel {
        let (server, client) = memory_pair();
        if self.dial.send(server).is_err() {
            tracing::warn!("Memory listener is gone; connection closed immediately");
        }
        client
    }
}

impl ConnectionSource for MemoryListener {
    fn accept(&mut self) -> Option<ServerChannel> {
        self.pending
            .try_recv()
            .ok()
            .map(|channel| Box::new(channel) as ServerChannel)
    }
}
