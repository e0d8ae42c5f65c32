//! Host command protocol over the vendor bulk interface
//!
//! A message is one USB transfer: packets are collected until a short packet
//! (including a zero-length one) arrives. Requests and replies are JSON.
//!
//! ```text
//! -> {"op":"set","effect":"drift","max_lit":8}
//! <- {"status":"ok","board":{...},"settings":{"effect":"drift","max_lit":8,"brightness":8}}
//! ```

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::board::{BoardInfo, BOARD};
use crate::effect::EffectKind;
use crate::settings::Settings;

/// Longest accepted request
pub const MAX_MESSAGE_SIZE: usize = 256;
/// Reply buffer large enough for the info reply
pub const REPLY_BUFFER_SIZE: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// Not a valid request
    Malformed,
    /// Valid request, but a value is not accepted
    OutOfRange,
    /// Request longer than MAX_MESSAGE_SIZE
    TooLong,
    /// Reply buffer too small
    ReplyOverflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum Op {
    /// Report board identity and settings
    Info,
    /// Change some settings
    Set,
    /// Restore default settings
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    pub op: Op,
    #[serde(default)]
    pub effect: Option<EffectKind>,
    #[serde(default)]
    pub max_lit: Option<u8>,
    #[serde(default)]
    pub brightness: Option<u8>,
}

impl Command {
    pub fn parse(bytes: &[u8]) -> Result<Self, ProtocolError> {
        serde_json_core::from_slice::<Command>(bytes)
            .map(|(command, _)| command)
            .map_err(|_| ProtocolError::Malformed)
    }

    /// Apply to `settings`, all or nothing. Returns true if anything changed.
    pub fn apply(&self, settings: &mut Settings) -> Result<bool, ProtocolError> {
        let next = match self.op {
            Op::Info => return Ok(false),
            Op::Reset => Settings::DEFAULT,
            Op::Set => Settings {
                effect: self.effect.unwrap_or(settings.effect),
                max_lit: self.max_lit.unwrap_or(settings.max_lit),
                brightness: self.brightness.unwrap_or(settings.brightness),
            },
        };
        next.validate().map_err(|_| ProtocolError::OutOfRange)?;

        let changed = next != *settings;
        *settings = next;
        Ok(changed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Status {
    Ok,
    Malformed,
    OutOfRange,
    TooLong,
}

impl From<ProtocolError> for Status {
    fn from(e: ProtocolError) -> Self {
        match e {
            ProtocolError::Malformed => Status::Malformed,
            ProtocolError::OutOfRange => Status::OutOfRange,
            ProtocolError::TooLong | ProtocolError::ReplyOverflow => Status::TooLong,
        }
    }
}

#[derive(Serialize)]
struct InfoReply<'a> {
    status: Status,
    board: &'a BoardInfo,
    settings: &'a Settings,
}

#[derive(Serialize)]
struct ErrorReply {
    status: Status,
}

/// Outcome of one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Response {
    /// Reply bytes written to the buffer
    pub len: usize,
    /// Settings were modified and should be applied and persisted
    pub changed: bool,
}

/// Handle one assembled request, writing the reply to `reply`.
/// Fails only if the reply does not fit, leaving `settings` untouched.
pub fn respond(
    request: Result<&[u8], ProtocolError>,
    settings: &mut Settings,
    reply: &mut [u8],
) -> Result<Response, ProtocolError> {
    // committed only once the reply is written
    let mut next = *settings;
    let result = request
        .and_then(Command::parse)
        .and_then(|command| command.apply(&mut next));

    let written = match result {
        Ok(_) => serde_json_core::to_slice(
            &InfoReply {
                status: Status::Ok,
                board: &BOARD,
                settings: &next,
            },
            reply,
        ),
        Err(e) => serde_json_core::to_slice(&ErrorReply { status: e.into() }, reply),
    };
    let len = written.map_err(|_| ProtocolError::ReplyOverflow)?;

    let changed = result.unwrap_or(false);
    if changed {
        *settings = next;
    }
    Ok(Response { len, changed })
}

/// Collects bulk OUT packets into one request
pub struct MessageAssembler<const N: usize> {
    buf: Vec<u8, N>,
    overflow: bool,
}

impl<const N: usize> Default for MessageAssembler<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MessageAssembler<N> {
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            overflow: false,
        }
    }

    /// Add a packet. Returns the request once a short packet ends the transfer;
    /// call `clear` before pushing the next one.
    pub fn push(
        &mut self,
        packet: &[u8],
        max_packet_size: usize,
    ) -> Option<Result<&[u8], ProtocolError>> {
        if !self.overflow && self.buf.extend_from_slice(packet).is_err() {
            self.overflow = true;
        }
        if packet.len() >= max_packet_size {
            return None;
        }
        if self.overflow {
            Some(Err(ProtocolError::TooLong))
        } else {
            Some(Ok(self.buf.as_slice()))
        }
    }

    pub fn clear(&mut self) {
        self.buf.clear();
        self.overflow = false;
    }
}

/// Split a reply into packets, ending with a zero-length packet when the
/// last one is full
pub fn packets(data: &[u8], max_packet_size: usize) -> impl Iterator<Item = &[u8]> {
    let zlp = data.len() % max_packet_size == 0;
    data.chunks(max_packet_size).chain(zlp.then_some(&data[..0]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const INFO_REPLY: &[u8] = br#"{"status":"ok","board":{"name":"Framework 16 LED Matrix Input Module (Joe Schroedl)","manufacturer":"Joe Schroedl","product":"LED Matrix Module","flash_storage_bytes":1441792},"settings":{"effect":"pulse","max_lit":5,"brightness":8}}"#;

    fn run(request: &[u8], settings: &mut Settings) -> (Response, std::vec::Vec<u8>) {
        let mut reply = [0u8; REPLY_BUFFER_SIZE];
        let response = respond(Ok(request), settings, &mut reply).unwrap();
        (response, reply[..response.len].to_vec())
    }

    #[test]
    fn test_info() {
        let mut settings = Settings::DEFAULT;
        let (response, reply) = run(br#"{"op":"info"}"#, &mut settings);
        assert!(!response.changed);
        assert_eq!(reply, INFO_REPLY);
    }

    #[test]
    fn test_set_partial() {
        let mut settings = Settings::DEFAULT;
        let (response, _) = run(br#"{"op":"set","effect":"drift","max_lit":9}"#, &mut settings);
        assert!(response.changed);
        assert_eq!(
            settings,
            Settings {
                effect: EffectKind::Drift,
                max_lit: 9,
                brightness: Settings::DEFAULT.brightness,
            }
        );

        // same values again
        let (response, _) = run(br#"{"op":"set","max_lit":9}"#, &mut settings);
        assert!(!response.changed);
    }

    #[test]
    fn test_reset() {
        let mut settings = Settings {
            effect: EffectKind::Burst,
            max_lit: 1,
            brightness: 100,
        };
        let (response, reply) = run(br#"{"op":"reset"}"#, &mut settings);
        assert!(response.changed);
        assert_eq!(settings, Settings::DEFAULT);
        assert_eq!(reply, INFO_REPLY);
    }

    #[rstest]
    #[case(br#"{"op":"set","brightness":101}"#, br#"{"status":"out_of_range"}"#)]
    #[case(br#"{"op":"dance"}"#, br#"{"status":"malformed"}"#)]
    #[case(br#"{"effect":"drift"}"#, br#"{"status":"malformed"}"#)]
    #[case(b"", br#"{"status":"malformed"}"#)]
    #[case(br#"{"op":"set","max_lit":300}"#, br#"{"status":"malformed"}"#)]
    fn test_rejected(#[case] request: &[u8], #[case] expected: &[u8]) {
        let mut settings = Settings::DEFAULT;
        let (response, reply) = run(request, &mut settings);
        assert!(!response.changed);
        assert_eq!(settings, Settings::DEFAULT);
        assert_eq!(reply, expected);
    }

    #[test]
    fn test_too_long_reply() {
        let mut settings = Settings::DEFAULT;
        let mut reply = [0u8; REPLY_BUFFER_SIZE];
        let response = respond(Err(ProtocolError::TooLong), &mut settings, &mut reply).unwrap();
        assert_eq!(&reply[..response.len], br#"{"status":"too_long"}"#);
    }

    #[test]
    fn test_reply_overflow() {
        let mut settings = Settings::DEFAULT;
        let mut reply = [0u8; 32];
        assert_eq!(
            respond(Ok(br#"{"op":"info"}"#), &mut settings, &mut reply),
            Err(ProtocolError::ReplyOverflow)
        );
    }

    #[test]
    fn test_reply_overflow_keeps_settings() {
        let mut settings = Settings::DEFAULT;
        let mut reply = [0u8; 32];
        assert_eq!(
            respond(Ok(br#"{"op":"set","max_lit":9}"#), &mut settings, &mut reply),
            Err(ProtocolError::ReplyOverflow)
        );
        assert_eq!(settings, Settings::DEFAULT);
    }

    #[test]
    fn test_assembler_multi_packet() {
        let mut assembler = MessageAssembler::<MAX_MESSAGE_SIZE>::new();
        let message = [b'a'; 100];
        assert_eq!(assembler.push(&message[..64], 64), None);
        assert_eq!(assembler.push(&message[64..], 64), Some(Ok(&message[..])));
        assembler.clear();

        // exact multiple needs a zero-length packet
        assert_eq!(assembler.push(&message[..64], 64), None);
        assert_eq!(assembler.push(&[], 64), Some(Ok(&message[..64])));
    }

    #[test]
    fn test_assembler_overflow() {
        let mut assembler = MessageAssembler::<128>::new();
        let packet = [b'x'; 64];
        for _ in 0..3 {
            assert_eq!(assembler.push(&packet, 64), None);
        }
        assert_eq!(
            assembler.push(&packet[..1], 64),
            Some(Err(ProtocolError::TooLong))
        );
        assembler.clear();
        assert_eq!(assembler.push(b"{}", 64), Some(Ok(&b"{}"[..])));
    }

    #[rstest]
    #[case(0, &[0])]
    #[case(10, &[10])]
    #[case(64, &[64, 0])]
    #[case(130, &[64, 64, 2])]
    #[case(128, &[64, 64, 0])]
    fn test_packets(#[case] len: usize, #[case] expected: &[usize]) {
        let data = [0u8; 256];
        let sizes: std::vec::Vec<usize> = packets(&data[..len], 64).map(|p| p.len()).collect();
        assert_eq!(sizes, expected);
    }
}
