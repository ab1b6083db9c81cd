use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::messages::{error::MessageError, replication_message::ReplicationMessage};

/// Most messages a single packet's count header can describe
pub const MAX_MESSAGES_PER_PACKET: usize = u16::MAX as usize;

/// Largest encoded value a Request or Update may carry
pub const MAX_PAYLOAD_BYTES: usize = 1024;

/// A BitWrite implementation backed by a growable buffer, so packets are not
/// bound to a fixed MTU
pub struct PacketWriter {
    scratch: u8,
    scratch_index: u8,
    buffer: Vec<u8>,
    bits_written: u32,
}

impl PacketWriter {
    pub fn new() -> Self {
        Self {
            scratch: 0,
            scratch_index: 0,
            buffer: Vec::new(),
            bits_written: 0,
        }
    }

    fn flush_scratch(&mut self) {
        if self.scratch_index > 0 {
            let byte = (self.scratch << (8 - self.scratch_index)).reverse_bits();
            self.buffer.push(byte);
            self.scratch = 0;
            self.scratch_index = 0;
        }
    }

    pub fn to_bytes(mut self) -> Vec<u8> {
        self.flush_scratch();
        self.buffer
    }

    pub fn bits_written(&self) -> u32 {
        self.bits_written
    }
}

impl Default for PacketWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BitWrite for PacketWriter {
    fn write_bit(&mut self, bit: bool) {
        self.scratch <<= 1;

        if bit {
            self.scratch |= 1;
        }

        self.scratch_index += 1;
        self.bits_written += 1;

        if self.scratch_index >= 8 {
            self.buffer.push(self.scratch.reverse_bits());
            self.scratch_index = 0;
            self.scratch = 0;
        }
    }

    fn write_byte(&mut self, byte: u8) {
        let mut temp = byte;
        for _ in 0..8 {
            self.write_bit(temp & 1 != 0);
            temp >>= 1;
        }
    }

    fn is_counter(&self) -> bool {
        false
    }

    fn count_bits(&mut self, _bits: u32) {}
}

/// Serializes a single value, as carried in a message payload
pub fn encode_value<T: Serde>(value: &T) -> Vec<u8> {
    let mut writer = PacketWriter::new();
    value.ser(&mut writer);
    writer.to_bytes()
}

pub fn decode_value<T: Serde>(payload: &[u8]) -> Result<T, SerdeErr> {
    let mut reader = BitReader::new(payload);
    T::de(&mut reader)
}

/// Reads a length prefix in naia's variable integer layout (`BITS` value
/// bits per group, each group led by a continuation bit). Lengths above `max`
/// are refused before anything is allocated.
pub(crate) fn read_length<const BITS: u8>(
    reader: &mut BitReader,
    max: usize,
) -> Result<usize, SerdeErr> {
    let mut length: u64 = 0;
    let mut shift: u32 = 0;
    loop {
        let proceed = reader.read_bit()?;
        for _ in 0..BITS {
            if reader.read_bit()? {
                if shift >= u64::BITS {
                    return Err(SerdeErr);
                }
                length |= 1u64 << shift;
            }
            shift += 1;
        }
        if length > max as u64 {
            return Err(SerdeErr);
        }
        if !proceed {
            return Ok(length as usize);
        }
        if shift >= u64::BITS {
            return Err(SerdeErr);
        }
    }
}

/// Wire-compatible with `Vec<u8>`'s Serde impl, capped at `max` bytes
pub(crate) fn read_bytes(reader: &mut BitReader, max: usize) -> Result<Vec<u8>, SerdeErr> {
    let length = read_length::<5>(reader, max)?;
    let mut bytes = Vec::with_capacity(length);
    for _ in 0..length {
        bytes.push(u8::de(reader)?);
    }
    Ok(bytes)
}

/// Wire-compatible with `String`'s Serde impl, capped at `max` bytes.
/// Invalid UTF-8 is refused.
pub(crate) fn read_string(reader: &mut BitReader, max: usize) -> Result<String, SerdeErr> {
    let length = read_length::<9>(reader, max)?;
    let mut bytes = Vec::with_capacity(length);
    for _ in 0..length {
        bytes.push(u8::de(reader)?);
    }
    String::from_utf8(bytes).map_err(|_| SerdeErr)
}

/// Packs messages into as few packets as the count header allows, each laid
/// out as a u16 count followed by the messages in order
pub fn write_packets(messages: &[ReplicationMessage]) -> Vec<Vec<u8>> {
    messages
        .chunks(MAX_MESSAGES_PER_PACKET)
        .map(|chunk| {
            let mut writer = PacketWriter::new();
            (chunk.len() as u16).ser(&mut writer);
            for message in chunk {
                message.ser(&mut writer);
            }
            writer.to_bytes()
        })
        .collect()
}

/// Reads every message of a packet, rejecting the whole packet on the first
/// malformed message
pub fn read_packet(bytes: &[u8]) -> Result<Vec<ReplicationMessage>, MessageError> {
    let mut reader = BitReader::new(bytes);
    let count = u16::de(&mut reader).map_err(|_| MessageError::MissingHeader {
        length: bytes.len(),
    })?;

    let mut messages = Vec::with_capacity(count as usize);
    for index in 0..count {
        let message = ReplicationMessage::de(&mut reader)
            .map_err(|_| MessageError::MalformedMessage { index, count })?;
        messages.push(message);
    }
    Ok(messages)
}
