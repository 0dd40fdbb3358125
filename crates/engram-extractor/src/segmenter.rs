//! Text segmentation into overlap-linked chunks
//!
//! All positions and sizes are measured in characters, not bytes, so the
//! strategies behave identically for CJK and Latin text.

use crate::config::SegmentStrategy;
use crate::error::ExtractorError;
use std::fmt;
use tracing::debug;
use uuid::Uuid;

/// Sentence-terminal punctuation recognized by the semantic strategy
const SENTENCE_TERMINATORS: [char; 6] = ['。', '！', '？', '.', '!', '?'];

/// Unique identifier of a chunk within one segmentation pass
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChunkId(Uuid);

impl ChunkId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bounded, possibly-overlapping slice of source text.
///
/// Chunks are consumed immediately by the extractor and never persisted.
/// `overlap_before`/`overlap_after` chain each chunk to its positional
/// neighbors in the segmentation order.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Unique chunk identifier
    pub id: ChunkId,
    /// Text content of the chunk
    pub content: String,
    /// Starting character offset in the source text
    pub source_position: usize,
    /// Content length in characters
    pub size: usize,
    /// Id of the previous chunk in the sequence
    pub overlap_before: Option<ChunkId>,
    /// Id of the next chunk in the sequence
    pub overlap_after: Option<ChunkId>,
    /// Configured overlap carried into this chunk (0 for the first)
    pub overlap_size: usize,
}

impl Chunk {
    fn new(content: String, source_position: usize) -> Self {
        let size = content.chars().count();
        Self {
            id: ChunkId::new(),
            content,
            source_position,
            size,
            overlap_before: None,
            overlap_after: None,
            overlap_size: 0,
        }
    }
}

/// Splits input text into ordered, possibly-overlapping chunks
pub struct Segmenter {
    chunk_size: usize,
    overlap: usize,
    strategy: SegmentStrategy,
}

impl Segmenter {
    /// Create a segmenter, rejecting configurations that cannot make
    /// monotonic progress.
    pub fn new(
        chunk_size: usize,
        overlap: usize,
        strategy: SegmentStrategy,
    ) -> Result<Self, ExtractorError> {
        if chunk_size == 0 {
            return Err(ExtractorError::Config(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if overlap >= chunk_size {
            return Err(ExtractorError::Config(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
            strategy,
        })
    }

    /// Segment the given text according to the configured strategy.
    ///
    /// Empty or whitespace-only input yields an empty sequence, not an error.
    pub fn segment(&self, text: &str) -> Vec<Chunk> {
        if text.trim().is_empty() {
            debug!("input text is empty, producing no chunks");
            return Vec::new();
        }

        let mut chunks = match self.strategy {
            SegmentStrategy::Fixed => self.segment_fixed(text, 0),
            SegmentStrategy::Semantic => self.segment_semantic(text),
            SegmentStrategy::Paragraph => self.segment_paragraph(text),
        };

        link_neighbors(&mut chunks, self.overlap);

        debug!(
            "segmented {} chars into {} chunks with strategy {}",
            text.chars().count(),
            chunks.len(),
            self.strategy
        );
        chunks
    }

    /// Sliding window over characters; `base` offsets positions when a
    /// sub-range of a larger text is segmented.
    fn segment_fixed(&self, text: &str, base: usize) -> Vec<Chunk> {
        let chars: Vec<char> = text.chars().collect();
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            let content: String = chars[start..end].iter().collect();
            chunks.push(Chunk::new(content, base + start));

            if end == chars.len() {
                break;
            }
            // Progress is guaranteed because overlap < chunk_size.
            start = end - self.overlap;
        }

        chunks
    }

    /// Accumulate whole sentences under the chunk size, seeding each new
    /// chunk with the trailing overlap of the one just closed.
    fn segment_semantic(&self, text: &str) -> Vec<Chunk> {
        let Some(sentences) = split_sentences(text) else {
            // No sentence boundaries at all; degrade to the fixed window.
            return self.segment_fixed(text, 0);
        };

        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;
        let mut current_start = 0;
        let mut position = 0;

        for sentence in sentences {
            let sentence_len = sentence.chars().count();

            if current_len + sentence_len > self.chunk_size && !current.is_empty() {
                let closed = std::mem::take(&mut current);
                let seed = tail_chars(&closed, self.overlap);
                let seed_len = seed.chars().count();
                chunks.push(Chunk::new(closed, current_start));

                current_start = position - seed_len;
                current = seed;
                current.push_str(&sentence);
                current_len = seed_len + sentence_len;
            } else {
                if current.is_empty() {
                    current_start = position;
                }
                current.push_str(&sentence);
                current_len += sentence_len;
            }

            position += sentence_len;
        }

        if !current.is_empty() {
            chunks.push(Chunk::new(current, current_start));
        }

        chunks
    }

    /// Accumulate whole paragraphs under the chunk size; a single paragraph
    /// larger than the chunk size is handed to the fixed window with its
    /// positions offset back into the source.
    fn segment_paragraph(&self, text: &str) -> Vec<Chunk> {
        let paragraphs = split_paragraphs(text);
        if paragraphs.is_empty() {
            return self.segment_fixed(text, 0);
        }

        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;
        let mut current_start = 0;

        for (position, paragraph) in paragraphs {
            let paragraph_len = paragraph.chars().count();
            // Separator kept with the accumulating content so following
            // paragraphs stay visually distinct inside a chunk.
            let block_len = paragraph_len + 2;

            if paragraph_len > self.chunk_size {
                if !current.is_empty() {
                    chunks.push(Chunk::new(current.trim_end().to_string(), current_start));
                    current = String::new();
                    current_len = 0;
                }
                chunks.extend(self.segment_fixed(&paragraph, position));
                continue;
            }

            if current_len + block_len > self.chunk_size && !current.is_empty() {
                let closed = current.trim_end().to_string();
                chunks.push(Chunk::new(closed.clone(), current_start));

                let seed = tail_chars(&closed, self.overlap);
                let seed_len = seed.chars().count();
                current_start = position.saturating_sub(seed_len);
                current = seed;
                current.push_str(&paragraph);
                current.push_str("\n\n");
                current_len = seed_len + block_len;
            } else {
                if current.is_empty() {
                    current_start = position;
                }
                current.push_str(&paragraph);
                current.push_str("\n\n");
                current_len += block_len;
            }
        }

        if !current.is_empty() {
            chunks.push(Chunk::new(current.trim_end().to_string(), current_start));
        }

        chunks
    }
}

/// Split text into sentences, each keeping its terminator and trailing
/// whitespace so character positions stay exact. Returns `None` when the
/// text contains no sentence-terminal punctuation.
fn split_sentences(text: &str) -> Option<Vec<String>> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut found_terminator = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if SENTENCE_TERMINATORS.contains(&c) {
            found_terminator = true;
            while let Some(&next) = chars.peek() {
                if next.is_whitespace() {
                    current.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            sentences.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        sentences.push(current);
    }

    found_terminator.then_some(sentences)
}

/// Split text at blank-line boundaries, yielding each trimmed paragraph
/// with its starting character offset.
fn split_paragraphs(text: &str) -> Vec<(usize, String)> {
    let chars: Vec<char> = text.chars().collect();
    let mut paragraphs = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '\n' {
            // A whitespace run containing a second newline separates paragraphs.
            let mut j = i + 1;
            let mut last_newline = None;
            while j < chars.len() && chars[j].is_whitespace() {
                if chars[j] == '\n' {
                    last_newline = Some(j);
                }
                j += 1;
            }
            if let Some(last_newline) = last_newline {
                push_trimmed(&chars, start, i, &mut paragraphs);
                start = last_newline + 1;
                i = start;
                continue;
            }
        }
        i += 1;
    }

    push_trimmed(&chars, start, chars.len(), &mut paragraphs);
    paragraphs
}

fn push_trimmed(chars: &[char], start: usize, end: usize, out: &mut Vec<(usize, String)>) {
    let mut s = start;
    while s < end && chars[s].is_whitespace() {
        s += 1;
    }
    let mut e = end;
    while e > s && chars[e - 1].is_whitespace() {
        e -= 1;
    }
    if s < e {
        out.push((s, chars[s..e].iter().collect()));
    }
}

/// Last `overlap` characters of a closed chunk, the seed of the next one
fn tail_chars(content: &str, overlap: usize) -> String {
    if overlap == 0 {
        return String::new();
    }
    let chars: Vec<char> = content.chars().collect();
    let start = chars.len().saturating_sub(overlap);
    chars[start..].iter().collect()
}

/// Post-pass connecting each chunk to its positional neighbors and filling
/// in the overlap size for every chunk after the first.
fn link_neighbors(chunks: &mut [Chunk], overlap: usize) {
    let ids: Vec<ChunkId> = chunks.iter().map(|c| c.id.clone()).collect();

    for (i, chunk) in chunks.iter_mut().enumerate() {
        if i > 0 {
            chunk.overlap_before = Some(ids[i - 1].clone());
            chunk.overlap_size = overlap;
        }
        if i + 1 < ids.len() {
            chunk.overlap_after = Some(ids[i + 1].clone());
        }
    }
}
