//! Non-adaptive Huffman codec used to compress and obfuscate the archive
//! index.
//!
//! The tree construction deliberately deviates from canonical Huffman (see
//! [`build_tree`]) so that archives produced here match the byte layout of
//! archives produced by the format's original implementation. Nodes live in
//! an arena (`Vec<Node>`) rather than behind `Rc`/`RefCell`, so both
//! construction and the decoder's iterative rebuild are plain index
//! arithmetic.

use crate::bitio::{BitReader, BitWriter};
use crate::error::PacError;
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug)]
pub struct Node {
    pub weight: u32,
    pub symbol: u8,
    pub left: Option<u32>,
    pub right: Option<u32>,
}

impl Node {
    fn leaf(symbol: u8, weight: u32) -> Self {
        Self { weight, symbol, left: None, right: None }
    }
    fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// An arena of nodes plus the index of the root. Lives only for the
/// duration of one encode or decode call.
pub struct Tree {
    pub nodes: Vec<Node>,
    pub root: u32,
}

/// Count occurrences of each byte value in `data`, listed in the order
/// each symbol is first seen (not byte-ascending). Ties in `build_tree`'s
/// descending-weight sort and the two-symbol skip-sort path keep this
/// input order, so the order here has to match the one the original's
/// frequency pass produces on first sight of a symbol.
fn frequencies(data: &[u8]) -> Vec<(u8, u32)> {
    let mut counts = [0u32; 256];
    let mut seen = [false; 256];
    let mut order: Vec<u8> = Vec::new();
    for &b in data {
        if !seen[b as usize] {
            seen[b as usize] = true;
            order.push(b);
        }
        counts[b as usize] += 1;
    }
    order.into_iter().map(|b| (b, counts[b as usize])).collect()
}

/// Build the tree from a frequency table, reproducing the original's
/// non-canonical placement rule exactly: leaves are sorted by descending
/// weight (skipped when there are two or fewer distinct symbols); the two
/// smallest remaining items are popped from the back and combined; the new
/// internal node is inserted three positions before the end of the working
/// deque when it outweighs the two items still at the back, otherwise it is
/// pushed to the back. This is not canonical Huffman but is self-describing
/// since the tree is always serialized alongside the payload.
pub fn build_tree(freqs: &[(u8, u32)]) -> Tree {
    let mut nodes: Vec<Node> = Vec::with_capacity(freqs.len() * 2);
    let mut working: VecDeque<u32> = VecDeque::new();

    if freqs.is_empty() {
        // Empty input still gets a degenerate single-leaf tree so the
        // format's "always emit a tree section" rule holds.
        nodes.push(Node::leaf(0, 0));
        return Tree { nodes, root: 0 };
    }

    let mut sorted: Vec<(u8, u32)> = freqs.to_vec();
    if sorted.len() > 2 {
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
    }
    for (sym, w) in sorted {
        nodes.push(Node::leaf(sym, w));
        working.push_back((nodes.len() - 1) as u32);
    }

    if working.len() == 1 {
        return Tree { nodes, root: working[0] };
    }

    while working.len() > 1 {
        let first = working.pop_back().unwrap();
        let second = working.pop_back().unwrap();
        let new_weight = nodes[first as usize].weight + nodes[second as usize].weight;
        nodes.push(Node { weight: new_weight, symbol: 0, left: Some(first), right: Some(second) });
        let new_idx = (nodes.len() - 1) as u32;

        if working.len() >= 2 {
            let back1 = nodes[working[working.len() - 1] as usize].weight;
            let back2 = nodes[working[working.len() - 2] as usize].weight;
            if new_weight > back1 + back2 {
                let insert_at = working.len().saturating_sub(3);
                working.insert(insert_at, new_idx);
                continue;
            }
        }
        working.push_back(new_idx);
    }

    Tree { nodes, root: working[0] }
}

/// Depth-first path assignment: left = 0, right = 1. Returns one bit
/// sequence per leaf, indexed by symbol value (`None` for symbols absent
/// from the tree).
fn assign_codes(tree: &Tree) -> Vec<Option<Vec<bool>>> {
    let mut codes: Vec<Option<Vec<bool>>> = vec![None; 256];
    let mut stack: Vec<(u32, Vec<bool>)> = vec![(tree.root, Vec::new())];
    while let Some((idx, path)) = stack.pop() {
        let node = &tree.nodes[idx as usize];
        if node.is_leaf() {
            codes[node.symbol as usize] = Some(path);
        } else {
            if let Some(l) = node.left {
                let mut lp = path.clone();
                lp.push(false);
                stack.push((l, lp));
            }
            if let Some(r) = node.right {
                let mut rp = path.clone();
                rp.push(true);
                stack.push((r, rp));
            }
        }
    }
    codes
}

/// Serialize the tree depth-first: `1` + recurse for an internal node,
/// `0` + 8-bit symbol for a leaf.
fn serialize_tree(tree: &Tree, w: &mut BitWriter) {
    fn walk(tree: &Tree, idx: u32, w: &mut BitWriter) {
        let node = &tree.nodes[idx as usize];
        if node.is_leaf() {
            w.put_bit(false);
            w.put_bits(8, node.symbol as u32);
        } else {
            w.put_bit(true);
            walk(tree, node.left.unwrap(), w);
            walk(tree, node.right.unwrap(), w);
        }
    }
    walk(tree, tree.root, w);
}

fn read_bit_checked(r: &mut BitReader) -> Result<bool, PacError> {
    if r.exhausted() {
        return Err(PacError::TreeMalformed);
    }
    let bit = r.get_bit();
    if r.exhausted() {
        return Err(PacError::TreeMalformed);
    }
    Ok(bit)
}

fn read_symbol_checked(r: &mut BitReader) -> Result<u8, PacError> {
    if r.exhausted() {
        return Err(PacError::TreeMalformed);
    }
    let symbol = r.get_bits(8) as u8;
    if r.exhausted() {
        return Err(PacError::TreeMalformed);
    }
    Ok(symbol)
}

/// A still-open slot in the tree under construction: an internal node
/// (`u32` index) waiting for its left or right child.
enum Slot {
    Left(u32),
    Right(u32),
}

/// Rebuild the tree from its serialized form using an explicit stack
/// (recursion depth can reach 255 for pathological inputs). Slots are
/// processed LIFO, so a node's left subtree is built to completion before
/// its right slot is popped, naturally unwinding to the nearest ancestor
/// with an unfilled right child once a left branch bottoms out at a leaf.
fn deserialize_tree(r: &mut BitReader) -> Result<Tree, PacError> {
    let mut nodes: Vec<Node> = Vec::new();

    let is_internal = read_bit_checked(r)?;
    if !is_internal {
        let symbol = read_symbol_checked(r)?;
        nodes.push(Node::leaf(symbol, 0));
        return Ok(Tree { nodes, root: 0 });
    }
    nodes.push(Node { weight: 0, symbol: 0, left: None, right: None });
    let root = (nodes.len() - 1) as u32;

    let mut stack: Vec<Slot> = vec![Slot::Right(root), Slot::Left(root)];
    while let Some(slot) = stack.pop() {
        let (parent, is_left) = match slot {
            Slot::Left(p) => (p, true),
            Slot::Right(p) => (p, false),
        };
        let is_internal = read_bit_checked(r)?;
        let child = if is_internal {
            nodes.push(Node { weight: 0, symbol: 0, left: None, right: None });
            let idx = (nodes.len() - 1) as u32;
            stack.push(Slot::Right(idx));
            stack.push(Slot::Left(idx));
            idx
        } else {
            let symbol = read_symbol_checked(r)?;
            nodes.push(Node::leaf(symbol, 0));
            (nodes.len() - 1) as u32
        };
        if is_left {
            nodes[parent as usize].left = Some(child);
        } else {
            nodes[parent as usize].right = Some(child);
        }
    }

    Ok(Tree { nodes, root })
}

/// Encode `data` into a Huffman bit stream, prefixed by the serialized tree.
pub fn encode(data: &[u8]) -> Vec<u8> {
    let freqs = frequencies(data);
    let tree = build_tree(&freqs);
    let codes = assign_codes(&tree);
    let mut w = BitWriter::new();
    serialize_tree(&tree, &mut w);
    for &b in data {
        let code = codes[b as usize].as_ref().expect("symbol present in tree by construction");
        for &bit in code {
            w.put_bit(bit);
        }
    }
    w.into_bytes()
}

/// Decode `encoded` into exactly `original_size` bytes, reading the tree
/// from the front of the stream.
pub fn decode(encoded: &[u8], original_size: usize) -> Result<Vec<u8>, PacError> {
    let mut r = BitReader::new(encoded);
    let tree = deserialize_tree(&mut r)?;
    let mut out = Vec::with_capacity(original_size);
    if tree.nodes.len() == 1 {
        // Single distinct symbol: every decoded byte is that one leaf.
        let symbol = tree.nodes[0].symbol;
        out.resize(original_size, symbol);
        return Ok(out);
    }
    while out.len() < original_size {
        let mut idx = tree.root;
        loop {
            let node = &tree.nodes[idx as usize];
            if node.is_leaf() {
                out.push(node.symbol);
                break;
            }
            if r.exhausted() {
                return Err(PacError::BitStreamExhausted);
            }
            idx = if r.get_bit() { node.right.unwrap() } else { node.left.unwrap() };
        }
    }
    Ok(out)
}
