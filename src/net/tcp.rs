//! Non-blocking TCP transport
//!
//! Sockets are put in non-blocking mode and driven from the tick loop: sends
//! append to an outgoing buffer that is flushed as far as the socket allows,
//! receives read whatever is available and hand out complete frames.

use std::io::{ErrorKind, Read, Write};
use std::marker::PhantomData;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::net::channel::{ConnectionSource, MessageChannel, ServerChannel};
use crate::net::error::ChannelError;
use crate::net::framing::{decode_payload, encode_frame, FrameDecoder};
use crate::net::messages::{ClientMessage, ServerMessage};

const READ_CHUNK: usize = 4096;
/// Unsent data allowed to pile up, in multiples of the frame limit
const OUTGOING_FRAMES: usize = 16;

/// Framed message channel over a non-blocking socket
#[derive(Debug)]
pub struct TcpChannel<Out, In> {
    stream: Option<TcpStream>,
    outgoing: Vec<u8>,
    max_outgoing: usize,
    decoder: FrameDecoder,
    /// Peer finished sending; close once buffered frames are drained
    eof: bool,
    _marker: PhantomData<fn(Out) -> In>,
}

/// Observer-side TCP channel
pub type ClientTcpChannel = TcpChannel<ClientMessage, ServerMessage>;

impl<Out, In> TcpChannel<Out, In> {
    pub fn new(stream: TcpStream, max_frame_bytes: usize) -> Result<Self, ChannelError> {
        stream.set_nonblocking(true)?;
        stream.set_nodelay(true)?;
        Ok(Self {
            stream: Some(stream),
            outgoing: Vec::new(),
            max_outgoing: max_frame_bytes.saturating_mul(OUTGOING_FRAMES),
            decoder: FrameDecoder::new(max_frame_bytes),
            eof: false,
            _marker: PhantomData,
        })
    }

    pub fn connect(addr: impl ToSocketAddrs, max_frame_bytes: usize) -> Result<Self, ChannelError> {
        let stream = TcpStream::connect(addr)?;
        Self::new(stream, max_frame_bytes)
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.stream.as_ref().and_then(|s| s.peer_addr().ok())
    }

    fn flush(&mut self) {
        let Some(stream) = self.stream.as_mut() else {
            return;
        };
        while !self.outgoing.is_empty() {
            match stream.write(&self.outgoing) {
                Ok(0) => {
                    self.shutdown("peer stopped accepting data");
                    return;
                }
                Ok(n) => {
                    self.outgoing.drain(..n);
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => return,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.shutdown(&format!("write failed: {}", e));
                    return;
                }
            }
        }
    }

    fn fill(&mut self) {
        let Some(stream) = self.stream.as_mut() else {
            return;
        };
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            match stream.read(&mut chunk) {
                Ok(0) => {
                    self.eof = true;
                    return;
                }
                Ok(n) => self.decoder.push(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::WouldBlock => return,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::debug!("read failed: {}", e);
                    self.eof = true;
                    return;
                }
            }
        }
    }

    fn shutdown(&mut self, reason: &str) {
        if let Some(stream) = self.stream.take() {
            tracing::debug!("Closing connection: {}", reason);
            let _ = stream.shutdown(std::net::Shutdown::Both);
        }
        self.outgoing.clear();
    }
}

impl<Out: Serialize, In: DeserializeOwned> MessageChannel<Out, In> for TcpChannel<Out, In> {
    fn send(&mut self, message: Option<Out>) {
        if self.stream.is_none() {
            return;
        }
        if let Some(message) = message {
            match encode_frame(&message) {
                Ok(frame) => self.outgoing.extend(frame),
                Err(e) => tracing::warn!("Dropping unencodable message: {}", e),
            }
        }
        self.flush();
        if self.outgoing.len() > self.max_outgoing {
            tracing::warn!("Peer is not reading, {} bytes queued", self.outgoing.len());
            self.shutdown("outgoing buffer full");
        }
    }

    fn receive(&mut self) -> Option<In> {
        if self.stream.is_none() {
            return None;
        }
        if !self.eof {
            self.fill();
        }
        loop {
            match self.decoder.next_frame() {
                Ok(Some(payload)) => match decode_payload(&payload) {
                    Ok(message) => return Some(message),
                    Err(e) => tracing::debug!("Ignoring malformed message: {}", e),
                },
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!("{}", e);
                    self.shutdown("bad frame");
                    return None;
                }
            }
        }
        if self.eof {
            self.shutdown("peer closed");
        }
        None
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn close(&mut self) {
        self.flush();
        self.shutdown("closed locally");
    }
}

/// Accepts observer connections on a non-blocking listener
#[derive(Debug)]
pub struct TcpAcceptor {
    listener: TcpListener,
    max_frame_bytes: usize,
}

impl TcpAcceptor {
    pub fn bind(addr: impl ToSocketAddrs, max_frame_bytes: usize) -> Result<Self, ChannelError> {
        let listener = TcpListener::bind(addr)?;
        listener.set_nonblocking(true)?;
        Ok(Self {
            listener,
            max_frame_bytes,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ChannelError> {
        Ok(self.listener.local_addr()?)
    }
}

impl ConnectionSource for TcpAcceptor {
    fn accept(&mut self) -> Option<ServerChannel> {
        match self.listener.accept() {
            Ok((stream, addr)) => match TcpChannel::<ServerMessage, ClientMessage>::new(
                stream,
                self.max_frame_bytes,
            ) {
                Ok(channel) => {
                    tracing::info!("Accepted connection from {}", addr);
                    Some(Box::new(channel))
                }
                Err(e) => {
                    tracing::warn!("Could not set up connection from {}: {}", addr, e);
                    None
                }
            },
            Err(e) if e.kind() == ErrorKind::WouldBlock => None,
            Err(e) => {
                tracing::warn!("Accept failed: {}", e);
                None
            }
        }
    }
}
