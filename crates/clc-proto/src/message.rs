//! Request and response envelopes exchanged with cluster members.

/// A protocol message: a type tag followed by an ordered list of frames.
///
/// The frame layout is owned by the codec that produced the message; the
/// invocation layer forwards messages without looking inside.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientMessage {
    message_type: u32,
    frames: Vec<Vec<u8>>,
}

impl ClientMessage {
    /// Create an empty message of the given type.
    #[must_use]
    pub const fn new(message_type: u32) -> Self {
        Self {
            message_type,
            frames: Vec::new(),
        }
    }

    /// Append a frame, builder style.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<Vec<u8>>) -> Self {
        self.frames.push(frame.into());
        self
    }

    /// Append a frame.
    pub fn push_frame(&mut self, frame: impl Into<Vec<u8>>) {
        self.frames.push(frame.into());
    }

    /// The message type tag.
    #[must_use]
    pub const fn message_type(&self) -> u32 {
        self.message_type
    }

    /// Frame at `index`, if present.
    #[must_use]
    pub fn frame(&self, index: usize) -> Option<&[u8]> {
        self.frames.get(index).map(Vec::as_slice)
    }

    /// All frames in order.
    #[must_use]
    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_keep_insertion_order() {
        let mut msg = ClientMessage::new(0x0102_00).with_frame(b"first".to_vec());
        msg.push_frame(b"second".to_vec());
        assert_eq!(msg.message_type(), 0x0102_00);
        assert_eq!(msg.frames().len(), 2);
        assert_eq!(msg.frame(0), Some(&b"first"[..]));
        assert_eq!(msg.frame(1), Some(&b"second"[..]));
        assert_eq!(msg.frame(2), None);
    }
}
