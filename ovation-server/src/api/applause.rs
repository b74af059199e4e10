//! Applause HTTP handlers
//!
//! `POST /applause/send` records a reaction; `GET /applause` is the long
//! poll: a newline-delimited JSON stream of level updates for one meeting.

use crate::api::error::{ApiError, Result as ApiResult};
use crate::api::extractors::current_user::CurrentUser;
use crate::state::AppState;

use ovation_applause::{LevelUpdate, MeetingId, Metrics};

use std::convert::Infallible;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{StatusCode, header},
    response::Response,
};
use bytes::Bytes;
use futures::Stream;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct MeetingQuery {
    meeting_id: Option<String>,
}

fn parse_meeting_id(query: &MeetingQuery) -> Result<MeetingId, ApiError> {
    query
        .meeting_id
        .as_deref()
        .ok_or_else(|| ApiError::invalid("Query meeting_id is required."))?
        .parse()
        .map_err(|_| ApiError::invalid("Query meeting_id has to be an int."))
}

/// POST /applause/send?meeting_id=<int>
///
/// Registers that the caller applauded. Repeated sends are deduplicated by
/// the backend, so the handler only validates the boundary.
pub async fn send(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<MeetingQuery>,
) -> ApiResult<StatusCode> {
    let user_id = user.require()?;
    let meeting_id = parse_meeting_id(&query)?;

    state.applause.send(meeting_id, user_id).await?;
    state.metrics.applause_sent();

    Ok(StatusCode::OK)
}

/// GET /applause?meeting_id=<int>
///
/// The first line is always the zero message, sent before blocking begins;
/// afterwards one line per level change of the requested meeting. The
/// stream ends on shutdown or when the client goes away; the cursor lives
/// inside the stream, so the client carries no state besides the open
/// connection.
pub async fn receive(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<MeetingQuery>,
) -> ApiResult<Response> {
    user.require()?;
    let meeting_id = parse_meeting_id(&query)?;

    state.metrics.receiver_connected();
    let stream = receive_stream(state, meeting_id);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from_stream(stream))
        .map_err(|e| ApiError::internal(format!("building stream response: {}", e)))
}

enum Phase {
    ZeroMessage,
    Listening(u64),
}

/// Decrements the active-receiver gauge however the stream ends, including
/// the client disconnecting mid-poll.
struct ReceiverGauge {
    metrics: Metrics,
}

impl Drop for ReceiverGauge {
    fn drop(&mut self) {
        self.metrics.receiver_disconnected();
    }
}

fn receive_stream(
    state: AppState,
    meeting_id: MeetingId,
) -> impl Stream<Item = Result<Bytes, Infallible>> {
    let gauge = ReceiverGauge {
        metrics: state.metrics.clone(),
    };

    futures::stream::unfold(
        (state, gauge, Phase::ZeroMessage),
        move |(state, gauge, phase)| async move {
            match phase {
                Phase::ZeroMessage => {
                    let line = encode_line(&LevelUpdate::default());
                    Some((Ok(line), (state, gauge, Phase::Listening(0))))
                }

                Phase::Listening(cursor) => {
                    match state.applause.receive(cursor, meeting_id).await {
                        Ok((next_cursor, update)) => {
                            let line = encode_line(&update);
                            Some((Ok(line), (state, gauge, Phase::Listening(next_cursor))))
                        }
                        Err(err) => {
                            if !err.is_cancellation() {
                                log::warn!(
                                    "Receive applause data for meeting {}: {}",
                                    meeting_id,
                                    err
                                );
                            }
                            None
                        }
                    }
                }
            }
        },
    )
}

fn encode_line(update: &LevelUpdate) -> Bytes {
    // A struct of two integers always encodes.
    let mut line = serde_json::to_vec(update).unwrap_or_else(|_| b"{}".to_vec());
    line.push(b'\n');
    Bytes::from(line)
}
