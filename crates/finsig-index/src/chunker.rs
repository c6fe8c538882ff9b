//! Boundary-aware text chunking.

use finsig_core::ConfigError;

/// Fraction of the window that counts as "near the end" when looking for a
/// sentence boundary to cut at.
const BOUNDARY_ZONE: f64 = 0.7;

#[derive(Debug, Clone, Copy)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
        }
    }
}

impl ChunkingConfig {
    /// Reject configurations that could stall the chunk walk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidChunking`] when `chunk_size` is zero or
    /// `overlap >= chunk_size`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidChunking(
                "chunk_size must be > 0".to_string(),
            ));
        }
        if self.overlap >= self.chunk_size {
            return Err(ConfigError::InvalidChunking(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// One chunk of a document's text.
///
/// `char_start`/`char_end` are character offsets of the untrimmed window in
/// the original text; `text` is the window with surrounding whitespace
/// trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSpan {
    pub text: String,
    pub char_start: usize,
    pub char_end: usize,
}

/// Split text into overlapping, sentence-aware chunks.
///
/// Walks the text in windows of `chunk_size` characters. When a window does
/// not reach the end of the text and its last period falls in the final 30%
/// of the window, the window is cut just after that period so chunks avoid
/// ending mid-sentence. The next window starts `overlap` characters before
/// the previous end, so consecutive chunks share context; the walk always
/// advances by at least one character. The final window is clamped to the
/// text end and terminates the walk.
///
/// Empty input yields no chunks; input shorter than `chunk_size` yields
/// exactly one chunk. Pure function of its inputs.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidChunking`] for an invalid config, before
/// looking at the text.
pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Result<Vec<ChunkSpan>, ConfigError> {
    config.validate()?;

    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut spans = Vec::new();
    let mut start = 0_usize;

    while start < len {
        let window_end = start + config.chunk_size;

        if window_end >= len {
            push_span(&mut spans, &chars, start, len);
            break;
        }

        let mut end = window_end;
        let window = &chars[start..end];
        if let Some(pos) = window.iter().rposition(|&c| c == '.') {
            #[allow(clippy::cast_precision_loss)]
            if pos as f64 > config.chunk_size as f64 * BOUNDARY_ZONE {
                end = start + pos + 1;
            }
        }

        push_span(&mut spans, &chars, start, end);

        // Overlap the next window, but never stall.
        start = end.saturating_sub(config.overlap).max(start + 1);
    }

    Ok(spans)
}

fn push_span(spans: &mut Vec<ChunkSpan>, chars: &[char], start: usize, end: usize) {
    let text: String = chars[start..end].iter().collect();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return;
    }
    spans.push(ChunkSpan {
        text: trimmed.to_string(),
        char_start: start,
        char_end: end,
    });
}
