use super::{Chunks, ChunksError};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    ChunksError(ChunksError),
    InvalidPayload,
}

/// A type for reading server-sent events from a chunk stream.
///
/// Only the `data` field is surfaced. Comment lines and the other fields
/// (`event`, `id`, `retry`) are skipped, and multi-line data is joined
/// with `\n`. Bytes are buffered raw so a code point split across two
/// chunks still decodes.
pub struct Sse {
    buf: Vec<u8>,
    chunks: Chunks,
}

impl Sse {
    #[inline]
    pub fn new(chunks: Chunks) -> Self {
        Self {
            buf: Vec::new(),
            chunks,
        }
    }

    pub async fn next_event(&mut self) -> Result<Option<String>, Error> {
        loop {
            if let Some(event) = self.try_parse_event()? {
                return Ok(Some(event));
            }

            // Not enough buffered data for an event, read more. A dangling
            // partial event at the end of the stream is dropped.
            match self.chunks.next_chunk().await.map_err(Error::ChunksError)? {
                Some(bytes) => self.buf.extend_from_slice(&bytes),
                None => return Ok(None),
            }
        }
    }

    fn try_parse_event(&mut self) -> Result<Option<String>, Error> {
        loop {
            let Some((end, sep_len)) = find_boundary(&self.buf) else {
                return Ok(None);
            };
            let block: Vec<u8> = self.buf.drain(..end + sep_len).collect();
            let Ok(block) = std::str::from_utf8(&block[..end]) else {
                return Err(Error::InvalidPayload);
            };

            let mut data: Option<String> = None;
            for line in block.lines() {
                if line.is_empty() || line.starts_with(':') {
                    continue;
                }
                let Some((field, value)) = line.split_once(':') else {
                    return Err(Error::InvalidPayload);
                };
                if field != "data" {
                    continue;
                }
                let value = value.strip_prefix(' ').unwrap_or(value);
                match &mut data {
                    Some(data) => {
                        data.push('\n');
                        data.push_str(value);
                    }
                    None => data = Some(value.to_owned()),
                }
            }

            // A block without data is a keep-alive, move on to the next.
            if let Some(data) = data {
                return Ok(Some(data));
            }
        }
    }
}

/// Returns the start and length of the first blank-line separator.
fn find_boundary(buf: &[u8]) -> Option<(usize, usize)> {
    let lf = buf.windows(2).position(|w| w == b"\n\n").map(|i| (i, 2));
    let crlf = buf
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|i| (i, 4));
    match (lf, crlf) {
        (Some(lf), Some(crlf)) => Some(if lf.0 <= crlf.0 { lf } else { crlf }),
        (lf, crlf) => lf.or(crlf),
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    fn sse_from(parts: &[&'static [u8]]) -> Sse {
        Sse::new(Chunks::from_vec_deque(
            parts.iter().copied().map(Bytes::from_static).collect(),
        ))
    }

    #[tokio::test]
    async fn test_normal_events() {
        let mut sse = sse_from(&[b"data: hello\n\n", b"data: bye\n\n"]);
        assert_eq!(sse.next_event().await.unwrap().unwrap(), "hello");
        assert_eq!(sse.next_event().await.unwrap().unwrap(), "bye");
        assert_eq!(sse.next_event().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_quirk_streaming() {
        let mut sse = sse_from(&[b"data:", b" hello\n", b"\n"]);
        assert_eq!(sse.next_event().await.unwrap().unwrap(), "hello");
        assert_eq!(sse.next_event().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_comments_crlf_and_multiline() {
        let mut sse = sse_from(&[
            b": keep-alive\n\n",
            b"event: message\r\ndata: first\r\ndata: second\r\n\r\n",
            b"data: last\n\n",
        ]);
        assert_eq!(sse.next_event().await.unwrap().unwrap(), "first\nsecond");
        assert_eq!(sse.next_event().await.unwrap().unwrap(), "last");
        assert_eq!(sse.next_event().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_split_code_point() {
        // "Café" with the two bytes of "é" split across chunks.
        let mut sse = sse_from(&[b"data: Caf\xc3", b"\xa9\n\n"]);
        assert_eq!(sse.next_event().await.unwrap().unwrap(), "Café");
    }

    #[tokio::test]
    async fn test_invalid_data() {
        let mut sse = sse_from(&[b"xxxxxx\n\n"]);
        assert_eq!(sse.next_event().await.unwrap_err(), Error::InvalidPayload);

        let mut sse = sse_from(&[b"xxxxxx\n"]);
        assert_eq!(sse.next_event().await.unwrap(), None);

        let mut sse = sse_from(&[b"data: hello\n", b"data: bye\n"]);
        assert_eq!(sse.next_event().await.unwrap(), None);
    }
}
