use super::failure::StoreFailure;
use super::row::{Bind, StoreQuery, StoreRow};
use crate::config::RetryPolicy;
use crate::error::{GridError, IsRetryable};
use backon::{ConstantBuilder, RetryableWithContext};
use futures::StreamExt;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub enum LaneMessage {
    /// Run one statement on this lane's connection and return its rows.
    Query(StoreQuery, RpcReplyPort<Result<Vec<StoreRow>, GridError>>),

    /// Close the connection and stop the lane.
    Close(RpcReplyPort<Result<(), GridError>>),
}

/// Handle to one worker lane. The lane's connection never leaves its actor.
#[derive(Clone)]
pub struct LaneHandle {
    actor: ActorRef<LaneMessage>,
    lane: usize,
}

impl LaneHandle {
    pub fn lane(&self) -> usize {
        self.lane
    }

    pub async fn query(&self, query: StoreQuery) -> Result<Vec<StoreRow>, GridError> {
        ractor::call!(self.actor, LaneMessage::Query, query).map_err(|e| {
            GridError::RactorError(format!("lane {} Query RPC failed: {e}", self.lane))
        })?
    }

    pub async fn close(&self) -> Result<(), GridError> {
        ractor::call!(self.actor, LaneMessage::Close).map_err(|e| {
            GridError::RactorError(format!("lane {} Close RPC failed: {e}", self.lane))
        })?
    }

    /// Stop without waiting; the connection is dropped in `post_stop`.
    pub fn stop(&self) {
        self.actor.stop(None);
    }
}

pub struct LaneArgs {
    pub lane: usize,
    pub options: SqliteConnectOptions,
    pub retry: RetryPolicy,
}

struct LaneState {
    lane: usize,
    conn: Option<SqliteConnection>,
    retry: RetryPolicy,
}

struct ConnectionLane;

#[ractor::async_trait]
impl Actor for ConnectionLane {
    type Msg = LaneMessage;
    type State = LaneState;
    type Arguments = LaneArgs;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let conn = args
            .options
            .connect()
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?;

        debug!(lane = args.lane, "Connection lane opened");
        Ok(LaneState {
            lane: args.lane,
            conn: Some(conn),
            retry: args.retry,
        })
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            LaneMessage::Query(query, reply) => {
                let res = self.run_query(state, &query).await;
                let _ = reply.send(res);
            }
            LaneMessage::Close(reply) => {
                let res = match state.conn.take() {
                    Some(conn) => conn.close().await.map_err(|e| {
                        GridError::Store(format!("lane {} close failed: {e}", state.lane))
                    }),
                    None => Ok(()),
                };
                let _ = reply.send(res);
                myself.stop(None);
            }
        }
        Ok(())
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        if let Some(conn) = state.conn.take() {
            if let Err(e) = conn.close().await {
                warn!(lane = state.lane, error = %e, "Connection lane close failed");
            }
        }
        Ok(())
    }
}

impl ConnectionLane {
    async fn run_query(
        &self,
        state: &mut LaneState,
        query: &StoreQuery,
    ) -> Result<Vec<StoreRow>, GridError> {
        let Some(conn) = state.conn.take() else {
            return Err(GridError::Closed);
        };
        let lane = state.lane;
        let policy = state.retry;

        let (conn, res) = (|mut conn: SqliteConnection| async move {
            let res = fetch_rows(&mut conn, query).await;
            (conn, res)
        })
        .retry(retry_builder(policy))
        .context(conn)
        .when(|e: &StoreFailure| e.is_retryable())
        .notify(|err: &StoreFailure, dur| {
            debug!(lane, error = %err, "Store contended, retrying in {dur:?}");
        })
        .await;
        state.conn = Some(conn);

        match res {
            Ok(rows) => Ok(rows),
            Err(failure) => {
                if failure.is_retryable() {
                    warn!(
                        lane,
                        attempts = policy.max_attempts,
                        error = %failure,
                        sql = query.sql(),
                        "Store still contended after final attempt; returning partial rows"
                    );
                }
                failure.into_partial()
            }
        }
    }
}

fn retry_builder(policy: RetryPolicy) -> ConstantBuilder {
    // `max_times` counts retries, not attempts.
    let retries = usize::try_from(policy.max_attempts.saturating_sub(1)).unwrap_or(usize::MAX);
    ConstantBuilder::default()
        .with_delay(policy.interval)
        .with_max_times(retries)
}

async fn fetch_rows(
    conn: &mut SqliteConnection,
    query: &StoreQuery,
) -> Result<Vec<StoreRow>, StoreFailure> {
    let mut stmt = sqlx::query(query.sql());
    for bind in query.binds() {
        stmt = match *bind {
            Bind::Integer(v) => stmt.bind(v),
            Bind::Real(v) => stmt.bind(v),
        };
    }

    let mut rows = Vec::new();
    let mut stream = stmt.fetch(&mut *conn);
    while let Some(next) = stream.next().await {
        match next {
            Ok(row) => {
                let row = StoreRow::from_sqlite(&row)
                    .map_err(|e| StoreFailure::Malformed(e.to_string()))?;
                rows.push(row);
            }
            Err(e) => return Err(StoreFailure::from_sqlx(e, rows)),
        }
    }
    Ok(rows)
}

/// Spawn one lane actor owning a fresh connection built from `args.options`.
pub async fn spawn(args: LaneArgs) -> Result<LaneHandle, String> {
    let lane = args.lane;
    let (actor, _jh) = Actor::spawn(None, ConnectionLane, args)
        .await
        .map_err(|e| e.to_string())?;

    info!(lane, "Connection lane started");
    Ok(LaneHandle { actor, lane })
}
