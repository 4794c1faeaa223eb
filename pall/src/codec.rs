// Copyright 2026 The pall Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Framing shared by all serializable containers.
//!
//! A frame is a 4-byte big-endian element count followed by that many element bodies, each of
//! them written and read by the caller's codec callbacks.
//! Composites prefix the concatenated frames of their buckets with the bucket count.

use std::io::{self, Read, Write};

use crate::error::Result;
use crate::traits::{DeserializeFn, SerializeFn};

pub(crate) fn write_count<W: Write>(writer: &mut W, count: u32) -> io::Result<()> {
    writer.write_all(&count.to_be_bytes())
}

pub(crate) fn read_count<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

/// Writes `count` followed by the body of every element.
pub(crate) fn write_frame<'a, T, W, I>(
    writer: &mut W,
    serialize: &SerializeFn<T>,
    count: u32,
    elements: I,
) -> io::Result<()>
where
    T: 'a,
    W: Write,
    I: Iterator<Item = &'a T>,
{
    write_count(writer, count)?;

    let writer: &mut dyn Write = writer;
    for element in elements {
        serialize(&mut *writer, element)?;
    }

    Ok(())
}

/// Reads a frame and passes every decoded element to `insert`.
///
/// Elements decoded before a failure have already been inserted when the error is returned.
pub(crate) fn read_frame<T, R, F>(
    reader: &mut R,
    deserialize: &DeserializeFn<T>,
    mut insert: F,
) -> Result<()>
where
    R: Read,
    F: FnMut(T) -> Result<()>,
{
    let count = read_count(reader)?;

    let reader: &mut dyn Read = reader;
    for _ in 0..count {
        let data = deserialize(&mut *reader)?;
        insert(data)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn write_u16(writer: &mut dyn Write, value: &u16) -> io::Result<()> {
        writer.write_all(&value.to_be_bytes())
    }

    fn read_u16(reader: &mut dyn Read) -> io::Result<u16> {
        let mut buf = [0u8; 2];
        reader.read_exact(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    #[test]
    fn test_frame_layout() {
        let mut buf = Vec::new();
        write_frame(&mut buf, &write_u16, 2, [0x0102u16, 0x0304].iter()).unwrap();
        assert_eq!(buf, [0, 0, 0, 2, 1, 2, 3, 4]);

        let mut values = Vec::new();
        read_frame(&mut buf.as_slice(), &read_u16, |value| {
            values.push(value);
            Ok(())
        })
        .unwrap();
        assert_eq!(values, [0x0102, 0x0304]);
    }

    #[test]
    fn test_short_read_keeps_prefix() {
        let buf = [0u8, 0, 0, 3, 0, 1, 0, 2, 0];

        let mut values = Vec::new();
        let result = read_frame(&mut &buf[..], &read_u16, |value| {
            values.push(value);
            Ok(())
        });
        assert!(matches!(result, Err(Error::Io(_))));
        assert_eq!(values, [1, 2]);
    }

    #[test]
    fn test_truncated_count() {
        let buf = [0u8, 0];
        assert!(read_count(&mut &buf[..]).is_err());
    }
}
