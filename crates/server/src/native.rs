//! Browser native-messaging transport.
//!
//! Each message is a 32-bit length in native byte order followed by that many
//! bytes of UTF-8 JSON. Requests are answered concurrently; a request carrying
//! a `requestId` gets it echoed on its reply so the caller can pair them up.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::error::FrameError;
use crate::messages::{self, AckResponse};
use crate::pipeline::Pipeline;

/// Largest frame accepted from the browser.
pub const MAX_INBOUND_FRAME: usize = 64 * 1024 * 1024;

/// Largest frame the browser accepts from a host.
pub const MAX_OUTBOUND_FRAME: usize = 1024 * 1024;

const REQUEST_ID: &str = "requestId";

/// Read one frame. `None` means the stream ended cleanly between frames;
/// ending inside a frame, length prefix included, is [`FrameError::Truncated`].
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Option<Vec<u8>>, FrameError> {
    let mut len_buf = [0u8; 4];
    let mut filled = 0;
    while filled < len_buf.len() {
        match reader.read(&mut len_buf[filled..]).await? {
            0 if filled == 0 => return Ok(None),
            0 => return Err(FrameError::Truncated { expected: len_buf.len() }),
            n => filled += n,
        }
    }

    let len = u32::from_ne_bytes(len_buf) as usize;
    if len > MAX_INBOUND_FRAME {
        return Err(FrameError::TooLarge { len, limit: MAX_INBOUND_FRAME });
    }

    let mut payload = vec![0u8; len];
    match reader.read_exact(&mut payload).await {
        Ok(_) => Ok(Some(payload)),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Err(FrameError::Truncated { expected: len }),
        Err(e) => Err(e.into()),
    }
}

/// Write one frame and flush.
pub async fn write_frame<W: AsyncWrite + Unpin>(writer: &mut W, payload: &[u8]) -> Result<(), FrameError> {
    if payload.len() > MAX_OUTBOUND_FRAME {
        return Err(FrameError::TooLarge { len: payload.len(), limit: MAX_OUTBOUND_FRAME });
    }

    let len = payload.len() as u32;
    writer.write_all(&len.to_ne_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Answer one raw frame, producing the bytes of the reply frame.
async fn answer(pipeline: &Pipeline, frame: &[u8]) -> Result<Vec<u8>, FrameError> {
    let (request_id, reply) = match serde_json::from_slice::<serde_json::Value>(frame) {
        Ok(message) => {
            let request_id = message.get(REQUEST_ID).cloned();
            let reply = serde_json::to_value(messages::dispatch(pipeline, message).await)?;
            (request_id, reply)
        }
        Err(e) => {
            tracing::warn!("received a frame that is not JSON: {e}");
            (None, serde_json::to_value(AckResponse::error(format!("invalid JSON: {e}")))?)
        }
    };

    let bytes = serde_json::to_vec(&with_request_id(reply, request_id.clone()))?;
    if bytes.len() <= MAX_OUTBOUND_FRAME {
        return Ok(bytes);
    }

    tracing::error!(len = bytes.len(), "reply exceeds the outbound frame limit");
    let fallback = serde_json::to_value(AckResponse::error(format!(
        "response of {} bytes exceeds the {MAX_OUTBOUND_FRAME} byte limit",
        bytes.len()
    )))?;
    Ok(serde_json::to_vec(&with_request_id(fallback, request_id))?)
}

fn with_request_id(mut reply: serde_json::Value, request_id: Option<serde_json::Value>) -> serde_json::Value {
    if let (Some(id), Some(object)) = (request_id, reply.as_object_mut()) {
        object.insert(REQUEST_ID.to_string(), id);
    }
    reply
}

/// Serve frames from `reader` until it ends, writing replies to `writer`.
///
/// Returns once every in-flight request has been answered.
pub async fn serve<R, W>(pipeline: Pipeline, mut reader: R, mut writer: W) -> Result<(), FrameError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (tx, mut rx) = mpsc::channel::<Vec<u8>>(32);

    let read_side = async move {
        let mut requests = JoinSet::new();
        let result = loop {
            let frame = match read_frame(&mut reader).await {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    tracing::info!("input closed, shutting down");
                    break Ok(());
                }
                Err(e) => break Err(e),
            };

            let pipeline = pipeline.clone();
            let tx = tx.clone();
            requests.spawn(async move {
                match answer(&pipeline, &frame).await {
                    Ok(reply) => {
                        if tx.send(reply).await.is_err() {
                            tracing::warn!("reply dropped, output channel closed");
                        }
                    }
                    Err(e) => tracing::error!("failed to answer message: {e}"),
                }
            });
        };

        while let Some(joined) = requests.join_next().await {
            if let Err(e) = joined {
                tracing::error!("request task aborted: {e}");
            }
        }
        result
    };

    let write_side = async move {
        while let Some(reply) = rx.recv().await {
            write_frame(&mut writer, &reply).await?;
        }
        Ok::<(), FrameError>(())
    };

    let (read_result, write_result) = tokio::join!(read_side, write_side);
    write_result?;
    read_result
}
