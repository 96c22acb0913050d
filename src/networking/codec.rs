//! Frame codec
//!
//! Each frame is a big-endian `u32` payload length followed by a bincode
//! encoded [`NetPacket`].

use super::{NetworkError, NetworkResult};
use shared::protocol::NetPacket;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Largest accepted payload
pub const MAX_FRAME_LEN: usize = 64 * 1024;

pub fn encode_frame(packet: &NetPacket) -> NetworkResult<Vec<u8>> {
    let payload = bincode::serialize(packet)?;
    if payload.len() > MAX_FRAME_LEN {
        return Err(NetworkError::FrameTooLarge {
            len: payload.len(),
            max: MAX_FRAME_LEN,
        });
    }
    let mut frame = Vec::with_capacity(4 + payload.len());
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

pub async fn write_frame<W>(writer: &mut W, packet: &NetPacket) -> NetworkResult<()>
where
    W: AsyncWrite + Unpin,
{
    let frame = encode_frame(packet)?;
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one frame; `Ok(None)` on a clean end of stream between frames
pub async fn read_frame<R>(reader: &mut R) -> NetworkResult<Option<NetPacket>>
where
    R: AsyncRead + Unpin,
{
    let len = match reader.read_u32().await {
        Ok(len) => len as usize,
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if len > MAX_FRAME_LEN {
        return Err(NetworkError::FrameTooLarge {
            len,
            max: MAX_FRAME_LEN,
        });
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(Some(bincode::deserialize(&payload)?))
}
