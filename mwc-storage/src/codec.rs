//! Binary stream primitives
//!
//! Big-endian integers, `u8` booleans, `u32` length-prefixed UTF-8 strings and
//! count-prefixed sequences. Every read names the field it was after, so a
//! truncated stream reports where it stopped.

use crate::{Error, Result};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// Largest element count accepted for any sequence
pub const MAX_ELEMENTS: usize = 100_000;

/// Largest string accepted (1 MiB)
pub const MAX_STRING_BYTES: usize = 1 << 20;

/// A value with its own versioned sub-format
pub trait Record: Sized {
    /// Write the current version of the record
    fn encode<W: Write>(&self, writer: &mut W) -> Result<()>;

    /// Read any supported version of the record
    fn decode<R: Read>(reader: &mut R) -> Result<Self>;
}

fn read_err(what: &str) -> impl FnOnce(io::Error) -> Error + '_ {
    move |e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::Truncated(what.to_string())
        } else {
            Error::Io(e)
        }
    }
}

pub(crate) fn write_u8<W: Write>(writer: &mut W, value: u8) -> Result<()> {
    writer.write_u8(value)?;
    Ok(())
}

pub(crate) fn write_u32<W: Write>(writer: &mut W, value: u32) -> Result<()> {
    writer.write_u32::<BigEndian>(value)?;
    Ok(())
}

pub(crate) fn write_i64<W: Write>(writer: &mut W, value: i64) -> Result<()> {
    writer.write_i64::<BigEndian>(value)?;
    Ok(())
}

pub(crate) fn write_u64<W: Write>(writer: &mut W, value: u64) -> Result<()> {
    writer.write_u64::<BigEndian>(value)?;
    Ok(())
}

pub(crate) fn write_bool<W: Write>(writer: &mut W, value: bool) -> Result<()> {
    write_u8(writer, u8::from(value))
}

pub(crate) fn write_string<W: Write>(writer: &mut W, value: &str) -> Result<()> {
    if value.len() > MAX_STRING_BYTES {
        return Err(Error::Corrupt(format!(
            "string of {} bytes exceeds {}",
            value.len(),
            MAX_STRING_BYTES
        )));
    }
    write_u32(writer, value.len() as u32)?;
    writer.write_all(value.as_bytes())?;
    Ok(())
}

pub(crate) fn write_count<W: Write>(writer: &mut W, count: usize) -> Result<()> {
    if count > MAX_ELEMENTS {
        return Err(Error::Corrupt(format!(
            "{} elements exceed the limit of {}",
            count, MAX_ELEMENTS
        )));
    }
    write_u32(writer, count as u32)
}

pub(crate) fn read_u8<R: Read>(reader: &mut R, what: &str) -> Result<u8> {
    reader.read_u8().map_err(read_err(what))
}

pub(crate) fn read_u32<R: Read>(reader: &mut R, what: &str) -> Result<u32> {
    reader.read_u32::<BigEndian>().map_err(read_err(what))
}

pub(crate) fn read_i64<R: Read>(reader: &mut R, what: &str) -> Result<i64> {
    reader.read_i64::<BigEndian>().map_err(read_err(what))
}

pub(crate) fn read_u64<R: Read>(reader: &mut R, what: &str) -> Result<u64> {
    reader.read_u64::<BigEndian>().map_err(read_err(what))
}

pub(crate) fn read_bool<R: Read>(reader: &mut R, what: &str) -> Result<bool> {
    match read_u8(reader, what)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(Error::Corrupt(format!("{}: invalid bool byte {}", what, other))),
    }
}

pub(crate) fn read_string<R: Read>(reader: &mut R, what: &str) -> Result<String> {
    let len = read_u32(reader, what)? as usize;
    if len > MAX_STRING_BYTES {
        return Err(Error::Corrupt(format!(
            "{}: string length {} exceeds {}",
            what, len, MAX_STRING_BYTES
        )));
    }
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).map_err(read_err(what))?;
    String::from_utf8(buf).map_err(|_| Error::Corrupt(format!("{}: invalid UTF-8", what)))
}

/// Read a sequence length, rejecting anything above [`MAX_ELEMENTS`]
pub(crate) fn read_count<R: Read>(reader: &mut R, what: &str) -> Result<usize> {
    let count = read_u32(reader, what)? as usize;
    if count > MAX_ELEMENTS {
        return Err(Error::Corrupt(format!(
            "{}: count {} exceeds the limit of {}",
            what, count, MAX_ELEMENTS
        )));
    }
    Ok(count)
}

pub(crate) fn write_opt_string<W: Write>(writer: &mut W, value: Option<&str>) -> Result<()> {
    match value {
        Some(s) => {
            write_bool(writer, true)?;
            write_string(writer, s)
        }
        None => write_bool(writer, false),
    }
}

pub(crate) fn read_opt_string<R: Read>(reader: &mut R, what: &str) -> Result<Option<String>> {
    if read_bool(reader, what)? {
        Ok(Some(read_string(reader, what)?))
    } else {
        Ok(None)
    }
}

pub(crate) fn write_records<W: Write, T: Record>(writer: &mut W, items: &[T]) -> Result<()> {
    write_count(writer, items.len())?;
    for item in items {
        item.encode(writer)?;
    }
    Ok(())
}

pub(crate) fn read_records<R: Read, T: Record>(reader: &mut R, what: &str) -> Result<Vec<T>> {
    let count = read_count(reader, what)?;
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(T::decode(reader)?);
    }
    Ok(items)
}
