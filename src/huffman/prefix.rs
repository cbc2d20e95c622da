// Decode-side Huffman machinery: parse the lengths-only header and
// flatten the canonical code into a byte-chunked prefix table.
//
// The table is a flat array of 256-entry pages, eight tree levels
// collapsed per page. An entry either names a leaf (`skip` in 1..=8, the
// number of peeked bits the codeword actually used) or forwards to a
// deeper page at `next`. Decoding a symbol is one byte peek and one table
// walk per eight code bits.

use std::io::{Read, Write};

use crate::bitio::BitReader;
use crate::error::Error;
use crate::huffman::codebook::Codebook;

const NO_CHILD: u32 = u32::MAX;

/// One prefix-table slot.
#[derive(Clone, Copy, Debug, Default)]
struct LutEntry {
    /// Leaf: the decoded bitlength symbol.
    value: u8,
    /// Leaf: bits consumed out of the peeked byte. Zero marks a node.
    skip: u8,
    /// Node: offset of the child page.
    next: u32,
}

/// Byte-indexed decoder for a canonical Huffman code.
pub struct PrefixTable {
    entries: Vec<LutEntry>,
}

// Binary-tree node used while flattening; children index into an arena.
struct TreeNode {
    value: u8,
    child: [u32; 2],
}

// Parse the codeword-length header: symbol count minus one (6 bits), the
// first length (6 bits), then unary-signed differences. The dump sink,
// when present, receives the same trace the CLI prints for --info.
fn read_code_lengths<R: Read>(
    br: &mut BitReader<R>,
    log: &mut Option<Box<dyn Write>>,
) -> Result<Vec<u8>, Error> {
    let mut size = 12u64; // header cost in bits, for the dump
    let n = br.read_bits(6) + 1;
    let mut lengths = vec![0u8; n as usize];
    lengths[0] = br.read_bits(6) as u8;
    br.check()?;

    if let Some(l) = log.as_mut() {
        let _ = writeln!(l, "max bitlength        {}", n - 1);
        let _ = writeln!(l, "codelength h[0]      {}", lengths[0]);
    }

    if n > 1 {
        let mut change: i32 = 0;
        let mut waiting_for = 0u64;
        let mut i = 1usize;

        loop {
            size += 1;
            if br.read_bit() == 1 {
                let next = i32::from(lengths[i - 1]) + change;
                if !(0..=63).contains(&next) {
                    br.check()?;
                    return Err(Error::InvalidCodebook);
                }
                lengths[i] = next as u8;
                i += 1;

                if i == n as usize {
                    break;
                }

                waiting_for = 0;
                change = 0;
                continue;
            }

            waiting_for += 1;
            size += 1;
            if br.read_bit() == 1 {
                change += 1;
            } else {
                change -= 1;
            }

            if waiting_for > n {
                br.check()?;
                return Err(Error::InvalidCodebook);
            }
        }
        br.check()?;
    }

    if let Some(l) = log.as_mut() {
        let _ = writeln!(l, "dictionary size      {size}b");
    }

    Ok(lengths)
}

impl PrefixTable {
    /// Parse a codebook header off the stream and flatten it. Returns
    /// `None` for the trivial single-symbol codebook, where every delta
    /// is one and no payload bits follow.
    pub fn unpack<R: Read>(
        br: &mut BitReader<R>,
        log: &mut Option<Box<dyn Write>>,
    ) -> Result<Option<Self>, Error> {
        let lengths = read_code_lengths(br, log)?;

        if lengths.len() == 1 {
            if let Some(l) = log.as_mut() {
                let _ = writeln!(l, "\nTrivial codebook: only zero bitlength deltas\n");
            }
            return Ok(None);
        }

        let codebook = Codebook::from_lengths(&lengths);

        if let Some(l) = log.as_mut() {
            let _ = writeln!(l, "\nCodebook bitlengths:");
            codebook.dump(l);
        }

        Ok(Some(Self::from_codebook(&codebook)))
    }

    /// Flatten a codebook into pages.
    pub fn from_codebook(codebook: &Codebook) -> Self {
        // Rebuild the binary tree. Codeword bits are walked LSB-first,
        // which is wire emission order.
        let mut tree = vec![TreeNode {
            value: 0,
            child: [NO_CHILD; 2],
        }];

        for symbol in 0..codebook.len() {
            let entry = codebook.entry(symbol as u8);
            let mut code = entry.code;
            let mut at = 0usize;
            let mut depth = 0u8;

            // Walk the part of the path that already exists.
            loop {
                let next = tree[at].child[(code & 1) as usize];
                if next == NO_CHILD {
                    break;
                }
                at = next as usize;
                code >>= 1;
                depth += 1;
            }

            // Create the rest.
            for _ in depth..entry.len {
                let next = tree.len() as u32;
                tree.push(TreeNode {
                    value: 0,
                    child: [NO_CHILD; 2],
                });
                tree[at].child[(code & 1) as usize] = next;
                at = next as usize;
                code >>= 1;
            }

            tree[at].value = symbol as u8;
        }

        // Fill pages depth-first: every 8-bit continuation of a node
        // either lands inside the page (a leaf entry, possibly shared by
        // several suffixes) or spills into a freshly allocated child page.
        let mut entries = vec![LutEntry::default(); 256];
        let mut todo = vec![(0usize, 0usize)]; // (tree node, page offset)

        while let Some((node, offset)) = todo.pop() {
            for byte in 0..256usize {
                let mut at = node;
                let mut skip = 0u8;
                while skip < 8 {
                    let next = tree[at].child[(byte >> skip) & 1];
                    if next == NO_CHILD {
                        break;
                    }
                    at = next as usize;
                    skip += 1;
                }

                if tree[at].child[0] == NO_CHILD {
                    entries[offset + byte] = LutEntry {
                        value: tree[at].value,
                        skip,
                        next: 0,
                    };
                    continue;
                }

                let child_page = entries.len();
                entries[offset + byte] = LutEntry {
                    value: 0,
                    skip: 0,
                    next: child_page as u32,
                };
                entries.resize(child_page + 256, LutEntry::default());
                todo.push((at, child_page));
            }
        }

        Self { entries }
    }

    /// Decode one symbol off the bit stream.
    #[inline]
    pub fn decode_symbol<R: Read>(&self, br: &mut BitReader<R>) -> u8 {
        let mut page = 0usize;
        loop {
            let byte = br.peek_byte();
            let entry = self.entries[page + byte as usize];
            if entry.skip != 0 {
                br.skip_bits(u32::from(entry.skip));
                return entry.value;
            }
            br.skip_bits(8);
            page = entry.next as usize;
        }
    }

    /// Number of 256-entry pages.
    pub fn pages(&self) -> usize {
        self.entries.len() / 256
    }
}
