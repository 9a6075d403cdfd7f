use super::protocol::Message;

pub const LENGTH_PREFIX_SIZE: usize = 4;
pub const MAX_FRAME_SIZE: usize = 64 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("frame of {0} bytes exceeds the maximum frame size")]
    FrameTooLarge(usize),
    #[error("serialization failed: {0}")]
    Serialize(serde_json::Error),
    #[error("deserialization failed: {0}")]
    Deserialize(serde_json::Error),
}

/// Serializes a message as a 4-byte big-endian length followed by JSON.
pub fn encode_frame(message: &Message) -> Result<Vec<u8>, CodecError> {
    let body = serde_json::to_vec(message).map_err(CodecError::Serialize)?;
    if body.len() > MAX_FRAME_SIZE {
        return Err(CodecError::FrameTooLarge(body.len()));
    }

    let mut frame = Vec::with_capacity(LENGTH_PREFIX_SIZE + body.len());
    frame.extend_from_slice(&(body.len() as u32).to_be_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

pub fn decode_message(body: &[u8]) -> Result<Message, CodecError> {
    serde_json::from_slice(body).map_err(CodecError::Deserialize)
}

/// Reassembles frames from an arbitrary split of the byte stream.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Returns the next complete frame body, or `None` until more bytes arrive.
    /// An oversized length header leaves the stream unrecoverable.
    pub fn next_frame(&mut self) -> Result<Option<Vec<u8>>, CodecError> {
        if self.buffer.len() < LENGTH_PREFIX_SIZE {
            return Ok(None);
        }

        let mut header = [0u8; LENGTH_PREFIX_SIZE];
        header.copy_from_slice(&self.buffer[..LENGTH_PREFIX_SIZE]);
        let len = u32::from_be_bytes(header) as usize;
        if len > MAX_FRAME_SIZE {
            return Err(CodecError::FrameTooLarge(len));
        }

        let end = LENGTH_PREFIX_SIZE + len;
        if self.buffer.len() < end {
            return Ok(None);
        }

        let body = self.buffer[LENGTH_PREFIX_SIZE..end].to_vec();
        self.buffer.drain(..end);
        Ok(Some(body))
    }
}
