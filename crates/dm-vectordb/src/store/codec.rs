//! Binary index format.
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! magic "DMVI" | version u16 | dimension u32 | count u64
//! count x { id str | text str | pairs u32 | pairs x (key str, value str) | dimension x f32 }
//! checksum u64   (xxHash64, seed 0, over every preceding byte)
//! ```
//!
//! Strings are a u32 byte length followed by UTF-8 bytes.

use std::hash::Hasher;
use std::io::{Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use dm_core::{Metadata, Record};
use twox_hash::XxHash64;

use crate::error::{Result, VectorDbError};
use crate::index::VectorIndex;

pub const MAGIC: &[u8; 4] = b"DMVI";
pub const FORMAT_VERSION: u16 = 1;

const HEADER_LEN: usize = 4 + 2 + 4 + 8;
const CHECKSUM_LEN: usize = 8;
// Smallest possible record: empty id/text lengths, zero pairs, no floats.
const MIN_RECORD_LEN: usize = 4 + 4 + 4;

pub fn checksum(bytes: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(bytes);
    hasher.finish()
}

pub fn encode(index: &VectorIndex) -> Result<Vec<u8>> {
    let mut buf: Vec<u8> = Vec::with_capacity(HEADER_LEN + index.len() * (index.dimension() * 4 + 64));
    buf.write_all(MAGIC)?;
    buf.write_u16::<LittleEndian>(FORMAT_VERSION)?;
    buf.write_u32::<LittleEndian>(index.dimension() as u32)?;
    buf.write_u64::<LittleEndian>(index.len() as u64)?;
    for (record, vector) in index.iter() {
        write_str(&mut buf, &record.id)?;
        write_str(&mut buf, &record.text)?;
        buf.write_u32::<LittleEndian>(record.metadata.len() as u32)?;
        for (k, v) in record.metadata.iter() {
            write_str(&mut buf, k)?;
            write_str(&mut buf, v)?;
        }
        for &x in vector {
            buf.write_f32::<LittleEndian>(x)?;
        }
    }
    let sum = checksum(&buf);
    buf.write_u64::<LittleEndian>(sum)?;
    Ok(buf)
}

pub fn decode(bytes: &[u8]) -> Result<VectorIndex> {
    if bytes.len() < HEADER_LEN + CHECKSUM_LEN {
        return Err(corrupt(format!("file too short ({} bytes)", bytes.len())));
    }
    let (payload, tail) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    let stored = u64::from_le_bytes(
        tail.try_into()
            .map_err(|_| corrupt("checksum field truncated"))?,
    );
    if checksum(payload) != stored {
        return Err(corrupt("checksum mismatch"));
    }

    let mut cur = Cursor::new(payload);
    let mut magic = [0u8; 4];
    cur.read_exact(&mut magic).map_err(truncated)?;
    if &magic != MAGIC {
        return Err(corrupt("bad magic"));
    }
    let version = cur.read_u16::<LittleEndian>().map_err(truncated)?;
    if version != FORMAT_VERSION {
        return Err(corrupt(format!("unsupported format version {version}")));
    }
    let dimension = cur.read_u32::<LittleEndian>().map_err(truncated)? as usize;
    let count = cur.read_u64::<LittleEndian>().map_err(truncated)?;
    if dimension == 0 {
        return Err(corrupt("dimension is zero"));
    }
    if count == 0 {
        return Err(corrupt("record count is zero"));
    }
    let per_record = MIN_RECORD_LEN as u64 + dimension as u64 * 4;
    let remaining = (payload.len() - HEADER_LEN) as u64;
    if count.saturating_mul(per_record) > remaining {
        return Err(corrupt(format!(
            "header claims {count} records of dimension {dimension}, payload holds {remaining} bytes"
        )));
    }

    let mut records = Vec::with_capacity(count as usize);
    for i in 0..count {
        let id = read_str(&mut cur)?;
        let text = read_str(&mut cur)?;
        let pairs = cur.read_u32::<LittleEndian>().map_err(truncated)?;
        let mut raw = Vec::with_capacity((pairs as usize).min(64));
        for _ in 0..pairs {
            let k = read_str(&mut cur)?;
            let v = read_str(&mut cur)?;
            raw.push((k, v));
        }
        let metadata = Metadata::try_from_pairs(raw)
            .map_err(|e| corrupt(format!("record {i}: {e}")))?;
        let mut vector = vec![0f32; dimension];
        cur.read_f32_into::<LittleEndian>(&mut vector).map_err(truncated)?;
        records.push((Record { id, text, metadata }, vector));
    }
    if cur.position() as usize != payload.len() {
        return Err(corrupt(format!(
            "{} trailing bytes after last record",
            payload.len() - cur.position() as usize
        )));
    }

    VectorIndex::build(records).map_err(|e| corrupt(e.to_string()))
}

fn write_str(buf: &mut Vec<u8>, s: &str) -> std::io::Result<()> {
    buf.write_u32::<LittleEndian>(s.len() as u32)?;
    buf.write_all(s.as_bytes())
}

fn read_str(cur: &mut Cursor<&[u8]>) -> Result<String> {
    let len = cur.read_u32::<LittleEndian>().map_err(truncated)? as usize;
    let left = cur.get_ref().len() - cur.position() as usize;
    if len > left {
        return Err(corrupt(format!("string length {len} exceeds remaining {left} bytes")));
    }
    let mut buf = vec![0u8; len];
    cur.read_exact(&mut buf).map_err(truncated)?;
    String::from_utf8(buf).map_err(|_| corrupt("string is not valid UTF-8"))
}

fn corrupt(msg: impl Into<String>) -> VectorDbError {
    VectorDbError::CorruptIndex(msg.into())
}

fn truncated(_: std::io::Error) -> VectorDbError {
    corrupt("unexpected end of data")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VectorIndex {
        VectorIndex::build(vec![
            (
                Record::new("a", "alpha").with_metadata(Metadata::new().with("k1", "v1").with("k0", "v0")),
                vec![1.0, 0.0, 0.5],
            ),
            (Record::new("b", "beta"), vec![0.0, 1.0, -0.5]),
        ])
        .unwrap()
    }

    /// Re-seal a payload with a fresh checksum so structural checks are reached.
    fn reseal(mut payload: Vec<u8>) -> Vec<u8> {
        let sum = checksum(&payload);
        payload.extend_from_slice(&sum.to_le_bytes());
        payload
    }

    #[test]
    fn test_decode_restores_records_and_order() {
        let bytes = encode(&sample()).unwrap();
        let idx = decode(&bytes).unwrap();
        assert_eq!(idx.dimension(), 3);
        let ids: Vec<&str> = idx.iter().map(|(r, _)| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        let keys: Vec<&str> = idx.get("a").unwrap().metadata.keys().collect();
        assert_eq!(keys, vec!["k1", "k0"]);
        assert_eq!(idx.vector("b"), Some(&[0.0, 1.0, -0.5][..]));
    }

    #[test]
    fn test_flipped_byte_fails_checksum() {
        let mut bytes = encode(&sample()).unwrap();
        bytes[HEADER_LEN + 2] ^= 0xff;
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, VectorDbError::CorruptIndex(m) if m.contains("checksum")));
    }

    #[test]
    fn test_truncated_file_is_corrupt() {
        let bytes = encode(&sample()).unwrap();
        for cut in [0, 5, HEADER_LEN, bytes.len() / 2, bytes.len() - 1] {
            assert!(
                matches!(decode(&bytes[..cut]), Err(VectorDbError::CorruptIndex(_))),
                "cut at {cut} should be corrupt"
            );
        }
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let bytes = encode(&sample()).unwrap();
        let mut payload = bytes[..bytes.len() - CHECKSUM_LEN].to_vec();
        payload.extend_from_slice(&[0, 0, 0]);
        let err = decode(&reseal(payload)).unwrap_err();
        assert!(matches!(err, VectorDbError::CorruptIndex(m) if m.contains("trailing")));
    }

    #[test]
    fn test_inflated_dimension_rejected() {
        let bytes = encode(&sample()).unwrap();
        let mut payload = bytes[..bytes.len() - CHECKSUM_LEN].to_vec();
        payload[6..10].copy_from_slice(&4u32.to_le_bytes());
        assert!(matches!(decode(&reseal(payload)), Err(VectorDbError::CorruptIndex(_))));
    }

    #[test]
    fn test_zero_count_rejected() {
        let bytes = encode(&sample()).unwrap();
        let mut payload = bytes[..HEADER_LEN].to_vec();
        payload[10..18].copy_from_slice(&0u64.to_le_bytes());
        let err = decode(&reseal(payload)).unwrap_err();
        assert!(matches!(err, VectorDbError::CorruptIndex(m) if m.contains("zero")));
    }

    #[test]
    fn test_bad_magic_rejected() {
        let bytes = encode(&sample()).unwrap();
        let mut payload = bytes[..bytes.len() - CHECKSUM_LEN].to_vec();
        payload[0] = b'X';
        let err = decode(&reseal(payload)).unwrap_err();
        assert!(matches!(err, VectorDbError::CorruptIndex(m) if m.contains("magic")));
    }
}
