use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use crate::core::flows::FlowCount;
use crate::core::location::LocationIndex;
use crate::models::{
    ForceId, FlowKind, Intention, IntentionTarget, LocationTables, Municipality, MunicipalityId,
    Officer, OfficerId, ScopeMode, State, StateId, Unit, UnitId,
};
use crate::services::snapshot::MatchSnapshot;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Invalid row: {0}")]
    InvalidRow(String),
}

const OFFICER_COLUMNS: &str = r#"
    o.id, o.name, o.force_id, o.current_unit_id, o.accepts_interstate,
    (o.verification_status = 'VERIFIED') AS verified,
    f.acronym AS force_acronym, f.scope_category
"#;

/// Read-only PostgreSQL access to officers, intentions and reference data
///
/// The tables are owned by the profile and intention subsystems; this
/// service never writes to them.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Load the whole unit / municipality / state hierarchy
    pub async fn load_location_tables(&self) -> Result<LocationTables, PostgresError> {
        let units = sqlx::query("SELECT id, name, municipality_id FROM units")
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|row| {
                Ok(Unit {
                    id: UnitId(row.try_get("id")?),
                    name: row.try_get("name")?,
                    municipality_id: row.try_get::<Option<i64>, _>("municipality_id")?.map(MunicipalityId),
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        let municipalities = sqlx::query(
            r#"
            SELECT id, name, state_id,
                   latitude::DOUBLE PRECISION AS latitude,
                   longitude::DOUBLE PRECISION AS longitude
            FROM municipalities
            "#,
        )
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| {
            Ok(Municipality {
                id: MunicipalityId(row.try_get("id")?),
                name: row.try_get("name")?,
                state_id: row.try_get::<Option<i64>, _>("state_id")?.map(StateId),
                latitude: row.try_get("latitude")?,
                longitude: row.try_get("longitude")?,
            })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()?;

        let states = sqlx::query("SELECT id, acronym FROM states")
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|row| {
                Ok(State {
                    id: StateId(row.try_get("id")?),
                    acronym: row.try_get("acronym")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        tracing::debug!(
            "Loaded {} units, {} municipalities, {} states",
            units.len(),
            municipalities.len(),
            states.len()
        );

        Ok(LocationTables {
            units,
            municipalities,
            states,
        })
    }

    /// Load everything one match query reads, from a single read-only snapshot
    ///
    /// Candidates are capped at `candidate_ceiling + 1` rows so the matcher
    /// can detect an oversized scope without reading all of it. Intentions are
    /// only fetched when the candidate set fits under the ceiling.
    pub async fn load_snapshot(
        &self,
        officer_id: OfficerId,
        candidate_ceiling: usize,
        locations: Arc<LocationIndex>,
    ) -> Result<MatchSnapshot, PostgresError> {
        let mut snapshot = MatchSnapshot::new(locations);
        let mut tx = self.pool.begin().await?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let requester = sqlx::query(&format!(
            "SELECT {} FROM officers o JOIN forces f ON f.id = o.force_id WHERE o.id = $1",
            OFFICER_COLUMNS
        ))
        .bind(officer_id.0)
        .fetch_optional(&mut *tx)
        .await?
        .map(|row| officer_from_row(&row))
        .transpose()?;

        let requester = match requester {
            Some(officer) if officer.current_unit_id.is_some() => officer,
            Some(unposted) => {
                snapshot.insert_officer(unposted);
                tx.commit().await?;
                return Ok(snapshot);
            }
            None => {
                tx.commit().await?;
                return Ok(snapshot);
            }
        };

        let candidates = load_candidates(&mut tx, &requester, candidate_ceiling).await?;
        let within_ceiling = candidates.len() <= candidate_ceiling;

        let mut ids: Vec<i64> = candidates.iter().map(|c| c.id.0).collect();
        ids.push(requester.id.0);

        snapshot.insert_officer(requester);
        for candidate in candidates {
            snapshot.insert_officer(candidate);
        }

        if within_ceiling {
            let rows = sqlx::query(
                r#"
                SELECT officer_id, priority, granularity, unit_id, municipality_id, state_id
                FROM intentions
                WHERE officer_id = ANY($1)
                ORDER BY officer_id, priority
                "#,
            )
            .bind(&ids[..])
            .fetch_all(&mut *tx)
            .await?;

            for row in &rows {
                let officer: i64 = row.try_get("officer_id")?;
                let priority: i32 = row.try_get("priority")?;
                let granularity: Option<String> = row.try_get("granularity")?;
                match intention_from_columns(
                    officer,
                    priority,
                    granularity.as_deref(),
                    row.try_get("unit_id")?,
                    row.try_get("municipality_id")?,
                    row.try_get("state_id")?,
                ) {
                    Some(intention) => snapshot.insert_intention(intention),
                    None => tracing::debug!(
                        "Dropping malformed intention of officer {} (priority {}, granularity {:?})",
                        officer,
                        priority,
                        granularity
                    ),
                }
            }
        }

        tx.commit().await?;

        tracing::debug!(
            "Snapshot for officer {}: {} officers, {} intentions",
            officer_id,
            snapshot.officer_count(),
            snapshot.intention_count()
        );

        Ok(snapshot)
    }

    /// Grouped counts for the demand map
    ///
    /// Returns `(leaving, arriving)`; the side the kind does not need is empty.
    pub async fn load_flow_counts(
        &self,
        kind: FlowKind,
        state_id: Option<i64>,
        force_id: Option<i64>,
    ) -> Result<(Vec<FlowCount>, Vec<FlowCount>), PostgresError> {
        let mut leaving = Vec::new();
        let mut arriving = Vec::new();

        if kind != FlowKind::Arriving {
            let rows = sqlx::query(
                r#"
                SELECT m.id, COUNT(DISTINCT o.id) AS total
                FROM municipalities m
                JOIN units u ON u.municipality_id = m.id
                JOIN officers o ON o.current_unit_id = u.id
                WHERE m.latitude IS NOT NULL AND m.longitude IS NOT NULL
                  AND ($1::BIGINT IS NULL OR m.state_id = $1)
                  AND ($2::BIGINT IS NULL OR o.force_id = $2)
                GROUP BY m.id
                "#,
            )
            .bind(state_id)
            .bind(force_id)
            .fetch_all(&self.pool)
            .await?;

            leaving = rows.iter().map(flow_count_from_row).collect::<Result<_, _>>()?;
        }

        if kind != FlowKind::Leaving {
            let rows = sqlx::query(
                r#"
                SELECT m.id, COUNT(*) AS total
                FROM intentions i
                JOIN municipalities m ON m.id = i.municipality_id
                JOIN officers o ON o.id = i.officer_id
                WHERE i.granularity = 'MUNICIPALITY'
                  AND m.latitude IS NOT NULL AND m.longitude IS NOT NULL
                  AND ($1::BIGINT IS NULL OR m.state_id = $1)
                  AND ($2::BIGINT IS NULL OR o.force_id = $2)
                GROUP BY m.id
                "#,
            )
            .bind(state_id)
            .bind(force_id)
            .fetch_all(&self.pool)
            .await?;

            arriving = rows.iter().map(flow_count_from_row).collect::<Result<_, _>>()?;
        }

        Ok((leaving, arriving))
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

/// Verified, posted officers in the requester's scope, excluding the requester
async fn load_candidates(
    tx: &mut Transaction<'_, Postgres>,
    requester: &Officer,
    candidate_ceiling: usize,
) -> Result<Vec<Officer>, PostgresError> {
    let limit = i64::try_from(candidate_ceiling.saturating_add(1)).unwrap_or(i64::MAX);
    let base = format!(
        r#"
        SELECT {} FROM officers o JOIN forces f ON f.id = o.force_id
        WHERE o.id <> $1
          AND o.current_unit_id IS NOT NULL
          AND o.verification_status = 'VERIFIED'
        "#,
        OFFICER_COLUMNS
    );

    let rows = match ScopeMode::for_requester(requester) {
        ScopeMode::Interstate { scope_category } => {
            sqlx::query(&format!("{} AND f.scope_category = $2 ORDER BY o.id LIMIT $3", base))
                .bind(requester.id.0)
                .bind(scope_category)
                .bind(limit)
                .fetch_all(&mut **tx)
                .await?
        }
        ScopeMode::SameForce { force_id, .. } => {
            sqlx::query(&format!("{} AND o.force_id = $2 ORDER BY o.id LIMIT $3", base))
                .bind(requester.id.0)
                .bind(force_id.0)
                .bind(limit)
                .fetch_all(&mut **tx)
                .await?
        }
    };

    rows.iter().map(officer_from_row).collect()
}

fn officer_from_row(row: &PgRow) -> Result<Officer, PostgresError> {
    Ok(Officer {
        id: OfficerId(row.try_get("id")?),
        name: row.try_get("name")?,
        current_unit_id: row.try_get::<Option<i64>, _>("current_unit_id")?.map(UnitId),
        force_id: ForceId(row.try_get("force_id")?),
        force_acronym: row.try_get("force_acronym")?,
        scope_category: row.try_get("scope_category")?,
        accepts_interstate_transfer: row.try_get("accepts_interstate")?,
        verified: row.try_get::<Option<bool>, _>("verified")?.unwrap_or(false),
    })
}

fn flow_count_from_row(row: &PgRow) -> Result<FlowCount, PostgresError> {
    let total: i64 = row.try_get("total")?;
    Ok(FlowCount {
        municipality_id: MunicipalityId(row.try_get("id")?),
        count: u64::try_from(total)
            .map_err(|_| PostgresError::InvalidRow(format!("negative count {}", total)))?,
    })
}

/// Convert one intentions row into the tagged form
///
/// Rows with an unknown or null granularity, a missing id for the chosen
/// level, or a priority below 1 are rejected.
pub fn intention_from_columns(
    officer_id: i64,
    priority: i32,
    granularity: Option<&str>,
    unit_id: Option<i64>,
    municipality_id: Option<i64>,
    state_id: Option<i64>,
) -> Option<Intention> {
    let priority = u32::try_from(priority).ok().filter(|p| *p >= 1)?;
    let target = match granularity? {
        "UNIT" => IntentionTarget::Unit(UnitId(unit_id?)),
        "MUNICIPALITY" => IntentionTarget::Municipality(MunicipalityId(municipality_id?)),
        "STATE" => IntentionTarget::State(StateId(state_id?)),
        _ => return None,
    };

    Some(Intention::new(OfficerId(officer_id), priority, target))
}
