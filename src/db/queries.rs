use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{ChatSession, SearchHistoryEntry, TripCriteria};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.naive_utc().format(TIMESTAMP_FORMAT).to_string()
}

fn parse_ts(raw: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

// ── Sessions ──

/// Loads a session that has not yet expired.
pub fn get_session(conn: &Connection, id: &str) -> anyhow::Result<Option<ChatSession>> {
    let now = format_ts(&Utc::now());
    let mut stmt = conn.prepare(
        "SELECT id, criteria, transcript, last_activity, expires_at FROM chat_sessions WHERE id = ?1 AND expires_at > ?2",
    )?;

    let result = stmt.query_row(params![id, now], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
        ))
    });

    match result {
        Ok((id, criteria_json, transcript_json, last_activity, expires_at)) => {
            let criteria: TripCriteria = serde_json::from_str(&criteria_json).unwrap_or_else(|e| {
                tracing::warn!(session_id = %id, error = %e, "unreadable criteria, starting fresh");
                TripCriteria::default()
            });
            let transcript = serde_json::from_str(&transcript_json).unwrap_or_else(|e| {
                tracing::warn!(session_id = %id, error = %e, "unreadable transcript, starting fresh");
                Vec::new()
            });

            Ok(Some(ChatSession {
                id,
                criteria,
                transcript,
                last_activity: parse_ts(&last_activity),
                expires_at: parse_ts(&expires_at),
            }))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn save_session(conn: &Connection, session: &ChatSession) -> anyhow::Result<()> {
    let criteria_json = serde_json::to_string(&session.criteria)?;
    let transcript_json = serde_json::to_string(&session.transcript)?;

    conn.execute(
        "INSERT INTO chat_sessions (id, criteria, transcript, last_activity, expires_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET criteria = ?2, transcript = ?3, last_activity = ?4, expires_at = ?5",
        params![
            session.id,
            criteria_json,
            transcript_json,
            format_ts(&session.last_activity),
            format_ts(&session.expires_at),
        ],
    )?;
    Ok(())
}

pub fn delete_session(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let deleted = conn.execute("DELETE FROM chat_sessions WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

/// Deletes every expired session along with its search history.
pub fn expire_old_sessions(conn: &Connection) -> anyhow::Result<usize> {
    let now = format_ts(&Utc::now());
    let deleted = conn.execute("DELETE FROM chat_sessions WHERE expires_at <= ?1", params![now])?;
    Ok(deleted)
}

// ── Search history ──

pub fn record_search(
    conn: &Connection,
    session_id: &str,
    query: &str,
    at: &DateTime<Utc>,
) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO search_history (session_id, query, created_at) VALUES (?1, ?2, ?3)",
        params![session_id, query, format_ts(at)],
    )?;
    Ok(())
}

/// Most recent first.
pub fn recent_searches(
    conn: &Connection,
    session_id: &str,
    limit: usize,
) -> anyhow::Result<Vec<SearchHistoryEntry>> {
    let mut stmt = conn.prepare(
        "SELECT query, created_at FROM search_history WHERE session_id = ?1 ORDER BY id DESC LIMIT ?2",
    )?;

    let entries = stmt
        .query_map(params![session_id, limit as i64], |row| {
            let query: String = row.get(0)?;
            let created_at: String = row.get(1)?;
            Ok(SearchHistoryEntry {
                query,
                timestamp: parse_ts(&created_at),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(entries)
}
