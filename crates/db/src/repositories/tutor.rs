use crate::models::DbTutor;
use eyre::Result;
use sqlx::{Pool, Postgres};
use std::collections::HashMap;
use uuid::Uuid;

/// Display names of the given tutors. Unknown ids are simply absent.
pub async fn get_tutor_names(pool: &Pool<Postgres>, ids: &[Uuid]) -> Result<HashMap<Uuid, String>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let tutors = sqlx::query_as::<_, DbTutor>(
        r#"
        SELECT id, display_name
        FROM tutors
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(tutors
        .into_iter()
        .map(|tutor| (tutor.id, tutor.display_name))
        .collect())
}
