//! Builders for pack buffers used by tests.

use super::structures::{Manifest, PackEntry};

pub fn entry(name: &str, offset: u32, size: u32, aux: u32) -> PackEntry {
    PackEntry {
        name: name.to_string(),
        offset,
        size,
        aux,
    }
}

fn block_len(block: &[PackEntry]) -> usize {
    8 + block.iter().map(|e| 16 + e.name.len()).sum::<usize>()
}

/// Encode directory blocks back to back, followed by the terminator.
pub fn encode_directory(blocks: &[Vec<PackEntry>]) -> Vec<u8> {
    let mut out = Vec::new();
    for block in blocks {
        let next = out.len() + block_len(block);
        out.extend_from_slice(&(next as u32).to_be_bytes());
        out.extend_from_slice(&(block.len() as u32).to_be_bytes());
        for e in block {
            out.extend_from_slice(&(e.name.len() as u32).to_be_bytes());
            out.extend_from_slice(e.name.as_bytes());
            out.extend_from_slice(&e.offset.to_be_bytes());
            out.extend_from_slice(&e.size.to_be_bytes());
            out.extend_from_slice(&e.aux.to_be_bytes());
        }
    }
    out.extend_from_slice(&0u32.to_be_bytes());
    out
}

/// Encode a complete pack: one directory block per group, then file data.
pub fn encode_pack(groups: &[&[(&str, &[u8])]]) -> (Vec<u8>, Manifest) {
    let dir_len: usize = 4 + groups
        .iter()
        .map(|g| 8 + g.iter().map(|(name, _)| 16 + name.len()).sum::<usize>())
        .sum::<usize>();

    let mut offset = dir_len;
    let mut blocks = Vec::new();
    for group in groups {
        let mut block = Vec::new();
        for (i, (name, data)) in group.iter().enumerate() {
            block.push(entry(name, offset as u32, data.len() as u32, i as u32));
            offset += data.len();
        }
        blocks.push(block);
    }

    let mut out = encode_directory(&blocks);
    for (_, data) in groups.iter().flat_map(|g| g.iter()) {
        out.extend_from_slice(data);
    }
    (out, Manifest::from(blocks.concat()))
}
