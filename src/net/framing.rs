//! Length-prefixed JSON frames
//!
//! Each frame is a 4-byte big-endian payload length followed by one
//! JSON-encoded message.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::net::error::ChannelError;

const HEADER_LEN: usize = 4;

/// Encode one message as a complete frame
pub fn encode_frame<T: Serialize>(message: &T) -> Result<Vec<u8>, ChannelError> {
    let payload = serde_json::to_vec(message)?;
    let len = u32::try_from(payload.len()).map_err(|_| ChannelError::FrameTooLarge {
        size: payload.len(),
        max: u32::MAX as usize,
    })?;

    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

pub fn decode_payload<T: DeserializeOwned>(payload: &[u8]) -> Result<T, ChannelError> {
    Ok(serde_json::from_slice(payload)?)
}

/// Reassembles frames from a byte stream that may split or merge them
#[derive(Debug)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
    max_frame_bytes: usize,
}

impl FrameDecoder {
    pub fn new(max_frame_bytes: usize) -> Self {
        Self {
            buffer: Vec::new(),
            max_frame_bytes,
        }
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Next complete payload; `Ok(None)` until enough bytes have arrived
    pub fn next_frame(&mut self) -> Result<Option<Vec<u8>>, ChannelError> {
        if self.buffer.len() < HEADER_LEN {
            return Ok(None);
        }
        let mut header = [0u8; HEADER_LEN];
        header.copy_from_slice(&self.buffer[..HEADER_LEN]);
        let size = u32::from_be_bytes(header) as usize;
        if size > self.max_frame_bytes {
            return Err(ChannelError::FrameTooLarge {
                size,
                max: self.max_frame_bytes,
            });
        }
        if self.buffer.len() < HEADER_LEN + size {
            return Ok(None);
        }

        let payload = self.buffer[HEADER_LEN..HEADER_LEN + size].to_vec();
        self.buffer.drain(..HEADER_LEN + size);
        Ok(Some(payload))
    }

    /// Bytes held that do not yet form a complete frame
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::messages::ServerMessage;

    #[test]
    fn test_header_is_big_endian_length() {
        let frame = encode_frame(&"hi").unwrap();
        // "\"hi\"" is 4 bytes
        assert_eq!(&frame[..4], &[0, 0, 0, 4]);
        assert_eq!(&frame[4..], b"\"hi\"");
    }

    #[test]
    fn test_decoder_handles_split_frames() {
        let frame = encode_frame(&ServerMessage::Identity {
            id: crate::core::types::ActorId(2),
        })
        .unwrap();
        let mut decoder = FrameDecoder::new(1024);

        decoder.push(&frame[..3]);
        assert!(decoder.next_frame().unwrap().is_none());
        decoder.push(&frame[3..]);

        let payload = decoder.next_frame().unwrap().unwrap();
        let message: ServerMessage = decode_payload(&payload).unwrap();
        assert_eq!(
            message,
            ServerMessage::Identity {
                id: crate::core::types::ActorId(2)
            }
        );
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn test_decoder_handles_merged_frames() {
        let mut bytes = encode_frame(&1u32).unwrap();
        bytes.extend(encode_frame(&2u32).unwrap());
        let mut decoder = FrameDecoder::new(1024);
        decoder.push(&bytes);

        let first: u32 = decode_payload(&decoder.next_frame().unwrap().unwrap()).unwrap();
        let second: u32 = decode_payload(&decoder.next_frame().unwrap().unwrap()).unwrap();
        assert_eq!((first, second), (1, 2));
        assert!(decoder.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_oversized_frame_rejected() {
        let mut decoder = FrameDecoder::new(8);
        decoder.push(&100u32.to_be_bytes());

        assert!(matches!(
            decoder.next_frame(),
            Err(ChannelError::FrameTooLarge { size: 100, max: 8 })
        ));
    }
}
