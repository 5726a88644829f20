use crate::database::DbError;
use common_types::{Project, SegmentSummary, TopicSpan, TranscriptSegment, Video};
use sqlx::{Executor, PgPool, Postgres};
use std::collections::HashMap;

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: String,
    name: String,
}

#[derive(sqlx::FromRow)]
struct VideoRow {
    id: String,
    title: String,
}

#[derive(sqlx::FromRow)]
struct TranscriptRow {
    video_id: String,
    start: String,
    end: String,
    text: String,
}

#[derive(sqlx::FromRow)]
struct SummaryRow {
    video_id: String,
    start: String,
    end: String,
    description: String,
}

#[derive(sqlx::FromRow)]
struct TopicRow {
    video_id: String,
    start: String,
    end: String,
    topic: String,
}

pub struct ProjectStore;

impl ProjectStore {
    /// Resolves a project by its unique name and loads every video with its
    /// searchable facets. Facet rows keep their stored order.
    pub async fn find_by_name_with_videos(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<Project>, DbError> {
        let Some(project) = sqlx::query_as::<_, ProjectRow>(
            r"
            SELECT id, name
            FROM project
            WHERE name = $1
            ",
        )
        .bind(name)
        .fetch_optional(pool)
        .await?
        else {
            return Ok(None);
        };

        let video_rows = sqlx::query_as::<_, VideoRow>(
            r"
            SELECT id, title
            FROM video
            WHERE project_id = $1
            ORDER BY created_at
            ",
        )
        .bind(&project.id)
        .fetch_all(pool)
        .await?;

        let mut transcript = facet_by_video(
            sqlx::query_as::<_, TranscriptRow>(
                r#"
                SELECT ts.video_id, ts.start_ts AS start, ts.end_ts AS "end", ts.text
                FROM transcript_segment ts
                JOIN video v ON v.id = ts.video_id
                WHERE v.project_id = $1
                ORDER BY ts.video_id, ts.position
                "#,
            )
            .bind(&project.id)
            .fetch_all(pool)
            .await?,
            |row| {
                (
                    row.video_id,
                    TranscriptSegment {
                        start: row.start,
                        end: row.end,
                        text: row.text,
                    },
                )
            },
        );

        let mut segments = facet_by_video(
            sqlx::query_as::<_, SummaryRow>(
                r#"
                SELECT vs.video_id, vs.start_ts AS start, vs.end_ts AS "end", vs.description
                FROM video_segment vs
                JOIN video v ON v.id = vs.video_id
                WHERE v.project_id = $1
                ORDER BY vs.video_id, vs.position
                "#,
            )
            .bind(&project.id)
            .fetch_all(pool)
            .await?,
            |row| {
                (
                    row.video_id,
                    SegmentSummary {
                        start: row.start,
                        end: row.end,
                        description: row.description,
                    },
                )
            },
        );

        let mut topics = facet_by_video(
            sqlx::query_as::<_, TopicRow>(
                r#"
                SELECT vt.video_id, vt.start_ts AS start, vt.end_ts AS "end", vt.topic
                FROM video_topic vt
                JOIN video v ON v.id = vt.video_id
                WHERE v.project_id = $1
                ORDER BY vt.video_id, vt.position
                "#,
            )
            .bind(&project.id)
            .fetch_all(pool)
            .await?,
            |row| {
                (
                    row.video_id,
                    TopicSpan {
                        start: row.start,
                        end: row.end,
                        topic: row.topic,
                    },
                )
            },
        );

        let videos = video_rows
            .into_iter()
            .map(|row| Video {
                transcript: transcript.remove(&row.id).unwrap_or_default(),
                segments: segments.remove(&row.id).unwrap_or_default(),
                topics: topics.remove(&row.id).unwrap_or_default(),
                id: row.id,
                title: row.title,
            })
            .collect();

        Ok(Some(Project {
            id: project.id,
            name: project.name,
            videos,
        }))
    }

    pub async fn find_id_by_name(
        executor: impl Executor<'_, Database = Postgres>,
        name: &str,
    ) -> Result<Option<String>, DbError> {
        Ok(sqlx::query_scalar("SELECT id FROM project WHERE name = $1")
            .bind(name)
            .fetch_optional(executor)
            .await?)
    }
}

fn facet_by_video<R, T>(
    rows: Vec<R>,
    split: impl Fn(R) -> (String, T),
) -> HashMap<String, Vec<T>> {
    let mut grouped: HashMap<String, Vec<T>> = HashMap::new();
    for row in rows {
        let (video_id, item) = split(row);
        grouped.entry(video_id).or_default().push(item);
    }
    grouped
}
