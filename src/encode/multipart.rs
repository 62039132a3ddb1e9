use bytes::{BufMut, Bytes, BytesMut};

/// Boundary token separating parts of the frame stream.
pub const BOUNDARY: &str = "frame";

/// `Content-Type` of the frame stream response.
pub const CONTENT_TYPE: &str = "multipart/x-mixed-replace; boundary=frame";

/// Wrap one encoded image as a self-contained multipart part:
/// `--frame\r\nContent-Type: <mime>\r\n\r\n<payload>\r\n`.
pub fn frame_part(mime: &str, payload: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(payload.len() + BOUNDARY.len() + mime.len() + 24);
    buf.put_slice(b"--");
    buf.put_slice(BOUNDARY.as_bytes());
    buf.put_slice(b"\r\nContent-Type: ");
    buf.put_slice(mime.as_bytes());
    buf.put_slice(b"\r\n\r\n");
    buf.put_slice(payload);
    buf.put_slice(b"\r\n");
    buf.freeze()
}

/// [`frame_part`] for a PNG payload.
pub fn png_part(png: &[u8]) -> Bytes {
    frame_part("image/png", png)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/multipart.rs"]
mod tests;
