//! Wire protocol
//!
//! One exchange per connection, all frames fixed-size:
//!
//! | Direction | Bytes | Layout |
//! |---|---|---|
//! | server → client | 9 | `challenge[8] \|\| difficulty[1]` |
//! | client → server | 9 | `solution[8] \|\| handler_id[1]` |
//! | server → client | line | handler output or one of the error lines below |

use crate::error::{ConnectionError, ConnectionResult};
use pow::{Challenge, Difficulty, NONCE_SIZE, Solution};
use std::fmt;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

pub const CHALLENGE_FRAME_LEN: usize = NONCE_SIZE + 1;
pub const REQUEST_FRAME_LEN: usize = NONCE_SIZE + 1;

pub const HANDLER_NOT_FOUND_LINE: &str = "Handler not found\n";
pub const INVALID_SOLUTION_LINE: &str = "Invalid PoW solution\n";
pub const TIMEOUT_LINE: &str = "Timeout waiting for PoW solution\n";
pub const QUOTE_PREFIX: &str = "Here is your quote: ";
pub const QUOTE_FAILURE_PREFIX: &str = "Failed to get quote: ";

/// One-byte selector of the capability to run after a valid solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u8);

impl HandlerId {
    pub const QUOTE: HandlerId = HandlerId(0x01);

    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl From<u8> for HandlerId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

/// `challenge[8] || difficulty[1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeFrame {
    pub challenge: Challenge,
    pub difficulty: Difficulty,
}

impl ChallengeFrame {
    pub fn encode(&self) -> [u8; CHALLENGE_FRAME_LEN] {
        let mut frame = [0u8; CHALLENGE_FRAME_LEN];
        frame[..NONCE_SIZE].copy_from_slice(self.challenge.as_bytes());
        frame[NONCE_SIZE] = self.difficulty.bits();
        frame
    }

    pub fn decode(frame: [u8; CHALLENGE_FRAME_LEN]) -> Self {
        let mut challenge = [0u8; NONCE_SIZE];
        challenge.copy_from_slice(&frame[..NONCE_SIZE]);
        Self {
            challenge: Challenge::from_bytes(challenge),
            difficulty: Difficulty::new(frame[NONCE_SIZE]),
        }
    }
}

/// `solution[8] || handler_id[1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestFrame {
    pub solution: Solution,
    pub handler_id: HandlerId,
}

impl RequestFrame {
    pub fn encode(&self) -> [u8; REQUEST_FRAME_LEN] {
        let mut frame = [0u8; REQUEST_FRAME_LEN];
        frame[..NONCE_SIZE].copy_from_slice(self.solution.as_bytes());
        frame[NONCE_SIZE] = self.handler_id.value();
        frame
    }
}

/// Read the client reply as two exact reads: the solution, then the handler id.
///
/// A short read fails the whole request; there is no resynchronisation.
pub async fn read_request<R>(reader: &mut R) -> ConnectionResult<RequestFrame>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut solution = [0u8; NONCE_SIZE];
    reader
        .read_exact(&mut solution)
        .await
        .map_err(ConnectionError::ReadSolution)?;

    let mut handler_id = [0u8; 1];
    reader
        .read_exact(&mut handler_id)
        .await
        .map_err(ConnectionError::ReadHandlerId)?;

    Ok(RequestFrame {
        solution: Solution::from_bytes(solution),
        handler_id: HandlerId::new(handler_id[0]),
    })
}

/// Read the 9-byte challenge frame sent by the server.
pub async fn read_challenge<R>(reader: &mut R) -> std::io::Result<ChallengeFrame>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut frame = [0u8; CHALLENGE_FRAME_LEN];
    reader.read_exact(&mut frame).await?;
    Ok(ChallengeFrame::decode(frame))
}

pub async fn write_line<W>(writer: &mut W, line: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_frame_layout() {
        let frame = ChallengeFrame {
            challenge: Challenge::from_bytes([0xde, 0xad, 0xbe, 0xef, 0, 1, 2, 3]),
            difficulty: Difficulty::new(21),
        };
        let bytes = frame.encode();
        assert_eq!(bytes, [0xde, 0xad, 0xbe, 0xef, 0, 1, 2, 3, 21]);
        assert_eq!(ChallengeFrame::decode(bytes), frame);
    }

    #[test]
    fn test_request_frame_layout() {
        let frame = RequestFrame {
            solution: Solution::from_bytes([9; NONCE_SIZE]),
            handler_id: HandlerId::QUOTE,
        };
        assert_eq!(frame.encode(), [9, 9, 9, 9, 9, 9, 9, 9, 0x01]);
    }

    #[test]
    fn test_handler_id_display() {
        assert_eq!(HandlerId::QUOTE.to_string(), "0x01");
        assert_eq!(HandlerId::new(0xff).to_string(), "0xff");
    }

    #[tokio::test]
    async fn test_read_request_splits_fields() {
        let mut input: &[u8] = &[1, 2, 3, 4, 5, 6, 7, 8, 0x02];
        let request = read_request(&mut input).await.unwrap();
        assert_eq!(request.solution.as_bytes(), &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(request.handler_id, HandlerId::new(0x02));
    }

    #[tokio::test]
    async fn test_read_request_short_solution() {
        let mut input: &[u8] = &[1, 2, 3];
        let err = read_request(&mut input).await.unwrap_err();
        assert!(matches!(err, ConnectionError::ReadSolution(_)));
    }

    #[tokio::test]
    async fn test_read_request_missing_handler_id() {
        let mut input: &[u8] = &[1, 2, 3, 4, 5, 6, 7, 8];
        let err = read_request(&mut input).await.unwrap_err();
        assert!(matches!(err, ConnectionError::ReadHandlerId(_)));
    }
}
