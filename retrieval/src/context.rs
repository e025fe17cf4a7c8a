//! Bounded prompt context from retrieved chunks.

use crate::index::ScoredChunk;

/// Placed between chunks in the assembled context.
pub const CHUNK_SEPARATOR: &str = "\n\n";

/// Assembled context and how many of the retrieved chunks it holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledContext {
    pub text: String,

    /// Number of leading chunks included.
    pub used: usize,
}

/// Join chunk texts in retrieval order, within `max_chars` chars.
///
/// Lower-ranked chunks are dropped first and no chunk is ever split. The
/// top chunk is always kept, even when it alone exceeds the bound.
pub fn assemble_context(chunks: &[ScoredChunk], max_chars: usize) -> AssembledContext {
    let separator_len = CHUNK_SEPARATOR.chars().count();
    let mut total = 0;
    let mut used = 0;

    for (i, scored) in chunks.iter().enumerate() {
        let len = scored.chunk.text.chars().count();
        let added = if i == 0 { len } else { len + separator_len };
        if i > 0 && total + added > max_chars {
            break;
        }
        total += added;
        used += 1;
    }

    let text = chunks[..used]
        .iter()
        .map(|scored| scored.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join(CHUNK_SEPARATOR);

    AssembledContext { text, used }
}

/// [`assemble_context`] without the bookkeeping.
pub fn assemble(chunks: &[ScoredChunk], max_chars: usize) -> String {
    assemble_context(chunks, max_chars).text
}
