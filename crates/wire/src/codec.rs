// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire codec shared by the worker phone-home channel and the client
//! subscription channel: a 4-byte big-endian length prefix followed by a
//! JSON payload.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Frames larger than this are rejected outright rather than allocating
/// an attacker-controlled buffer size.
pub const MAX_FRAME_BYTES: u32 = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("operation timed out")]
    Timeout,
    #[error("connection closed")]
    ConnectionClosed,
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("frame of {0} bytes exceeds the {max} byte limit", max = MAX_FRAME_BYTES)]
    FrameTooLarge(u32),
}

/// Serialize `value` to its length-prefixed wire representation.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ProtocolError> {
    let payload = serde_json::to_vec(value)?;
    let len = u32::try_from(payload.len()).map_err(|_| ProtocolError::FrameTooLarge(u32::MAX))?;
    let mut out = Vec::with_capacity(4 + payload.len());
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Deserialize a length-prefixed JSON payload (without the length prefix).
pub fn decode<T: DeserializeOwned>(payload: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(payload)?)
}

/// Read one length-prefixed frame's raw JSON bytes from `reader`.
pub async fn read_frame_bytes<R>(reader: &mut R, timeout: Duration) -> Result<Vec<u8>, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    tokio::time::timeout(timeout, async {
        let mut len_buf = [0u8; 4];
        match reader.read_exact(&mut len_buf).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(ProtocolError::ConnectionClosed)
            }
            Err(e) => return Err(ProtocolError::Io(e)),
        }
        let len = u32::from_be_bytes(len_buf);
        if len > MAX_FRAME_BYTES {
            return Err(ProtocolError::FrameTooLarge(len));
        }
        let mut payload = vec![0u8; len as usize];
        reader.read_exact(&mut payload).await?;
        Ok(payload)
    })
    .await
    .map_err(|_| ProtocolError::Timeout)?
}

/// Read one length-prefixed JSON frame from `reader`.
pub async fn read_message<T, R>(reader: &mut R, timeout: Duration) -> Result<T, ProtocolError>
where
    T: DeserializeOwned,
    R: AsyncRead + Unpin,
{
    let payload = read_frame_bytes(reader, timeout).await?;
    decode(&payload)
}

/// Write one length-prefixed JSON frame to `writer`.
pub async fn write_message<T, W>(writer: &mut W, value: &T, timeout: Duration) -> Result<(), ProtocolError>
where
    T: Serialize,
    W: AsyncWrite + Unpin,
{
    let frame = encode(value)?;
    tokio::time::timeout(timeout, async {
        writer.write_all(&frame).await?;
        writer.flush().await?;
        Ok(())
    })
    .await
    .map_err(|_| ProtocolError::Timeout)?
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
