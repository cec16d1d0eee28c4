//! Document chunker: splits raw text into overlapping fixed-size windows.
//!
//! Windows are measured in characters, not bytes, so multi-byte text never
//! splits inside a code point. Deterministic and pure: the same input always
//! produces the same window sequence.

use docbot_core::PipelineError;

/// Validated chunking parameters. Construction is the only place the
/// `chunk_size > overlap` precondition is checked; `split` can then assume it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkParams {
    chunk_size: usize,
    overlap: usize,
}

impl ChunkParams {
    /// Validates and builds chunking parameters. `chunk_size` must be greater
    /// than `overlap`; violations are a startup configuration error.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self, PipelineError> {
        if chunk_size == 0 || overlap >= chunk_size {
            return Err(PipelineError::Config(format!(
                "chunk_size ({}) must be greater than overlap ({})",
                chunk_size, overlap
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Distance between the starts of consecutive windows.
    pub fn stride(&self) -> usize {
        self.chunk_size - self.overlap
    }
}

/// Splits `text` into consecutive windows of `chunk_size` characters, each
/// successive window starting `stride` characters after the previous one.
/// The final window may be shorter than `chunk_size`. Empty input yields no
/// windows.
pub fn split(text: &str, params: &ChunkParams) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut windows = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + params.chunk_size()).min(chars.len());
        windows.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += params.stride();
    }
    windows
}
