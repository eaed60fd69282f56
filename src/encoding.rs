use encoding_rs::{EncoderResult, EUC_KR};

use crate::{constants::CRLF, error::SessionError, Result};

/// Decodes EUC-KR bytes into text. Malformed or truncated sequences become
/// U+FFFD; this never fails.
#[must_use]
pub fn decode_text(bytes: &[u8]) -> String {
    let (text, had_errors) = EUC_KR.decode_without_bom_handling(bytes);
    if had_errors {
        tracing::trace!(len = bytes.len(), "replaced malformed EUC-KR input");
    }

    text.into_owned()
}

/// Encodes a command line as EUC-KR and terminates it with CR LF.
///
/// EUC-KR never produces `IAC` (0xFF), so the result needs no escaping.
///
/// # Errors
///
/// Returns [`SessionError::EncodingFailure`] naming the first character EUC-KR
/// cannot represent.
pub fn encode_text(text: &str) -> Result<Vec<u8>> {
    let mut encoder = EUC_KR.new_encoder();
    let capacity = encoder
        .max_buffer_length_from_utf8_without_replacement(text.len())
        .unwrap_or(text.len());
    let mut output = Vec::with_capacity(capacity + CRLF.len());
    let mut remaining = text;

    loop {
        let (result, read) =
            encoder.encode_from_utf8_to_vec_without_replacement(remaining, &mut output, true);
        remaining = &remaining[read..];

        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::OutputFull => output.reserve(remaining.len() * 2),
            EncoderResult::Unmappable(character) => {
                return Err(SessionError::EncodingFailure { character })
            }
        }
    }

    output.extend_from_slice(CRLF);
    Ok(output)
}
