use alloc::vec::Vec;

use crate::{CoreError, CoreResult};

/// Magic word written by the reference catalog compiler, little-endian.
pub const MO_MAGIC: u32 = 0x9504_12de;

/// Fixed header length in bytes.
pub const HEADER_LEN: usize = 28;

/// Smallest input accepted as a catalog. A header alone is not enough;
/// the reference rejects anything under 32 bytes.
pub const MIN_FILE_LEN: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoHeader {
    pub magic: u32,
    pub revision: u32,
    pub count: u32,
    pub orig_offset: u32,
    pub trans_offset: u32,
    pub hash_size: u32,
    pub hash_offset: u32,
}

/// One row of an offset table: the byte length of a string and its
/// absolute offset in the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OffsetEntry {
    pub length: u32,
    pub offset: u32,
}

pub fn parse_header(input: &[u8]) -> CoreResult<MoHeader> {
    if input.is_empty() {
        return Err(CoreError::Empty);
    }
    if input.len() < MIN_FILE_LEN {
        return Err(CoreError::TooSmall(input.len()));
    }
    let mut cursor = 0usize;
    let magic = read_u32(input, &mut cursor)?;
    if magic != MO_MAGIC {
        return Err(CoreError::BadMagic(magic));
    }
    let revision = read_u32(input, &mut cursor)?;
    let count = read_u32(input, &mut cursor)?;
    let orig_offset = read_u32(input, &mut cursor)?;
    let trans_offset = read_u32(input, &mut cursor)?;
    let hash_size = read_u32(input, &mut cursor)?;
    let hash_offset = read_u32(input, &mut cursor)?;

    Ok(MoHeader {
        magic,
        revision,
        count,
        orig_offset,
        trans_offset,
        hash_size,
        hash_offset,
    })
}

/// Reads `count` length/offset rows starting at `offset`. The catalog
/// carries two such tables, one for originals and one for translations,
/// aligned by index.
pub fn parse_offset_table(input: &[u8], offset: u32, count: u32) -> CoreResult<Vec<OffsetEntry>> {
    let start = offset as usize;
    let len = (count as usize)
        .checked_mul(8)
        .ok_or(CoreError::BadOffset(offset))?;
    let end = start.checked_add(len).ok_or(CoreError::BadOffset(offset))?;
    if end > input.len() {
        return Err(CoreError::BadOffset(offset));
    }
    let mut cursor = start;
    let mut table = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let length = read_u32(input, &mut cursor)?;
        let offset = read_u32(input, &mut cursor)?;
        table.push(OffsetEntry { length, offset });
    }
    Ok(table)
}

/// Reads the raw bytes referenced by an offset-table row. A zero-length
/// entry yields an empty slice, not an error.
pub fn read_entry<'a>(input: &'a [u8], entry: OffsetEntry) -> CoreResult<&'a [u8]> {
    if entry.length == 0 {
        return Ok(&[]);
    }
    let start = entry.offset as usize;
    let end = start
        .checked_add(entry.length as usize)
        .ok_or(CoreError::BadOffset(entry.offset))?;
    if end > input.len() {
        return Err(CoreError::BadOffset(entry.offset));
    }
    Ok(&input[start..end])
}

fn read_u32(input: &[u8], cursor: &mut usize) -> CoreResult<u32> {
    let end = *cursor + 4;
    if end > input.len() {
        return Err(CoreError::BadOffset(*cursor as u32));
    }
    let value = u32::from_le_bytes([
        input[*cursor],
        input[*cursor + 1],
        input[*cursor + 2],
        input[*cursor + 3],
    ]);
    *cursor = end;
    Ok(value)
}
